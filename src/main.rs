use croquis::config::Config;
use croquis::metrics::register_metrics;
use croquis::startup::create_web_server;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    std_logger::Config::logfmt().init();

    register_metrics();

    let config = Config::get().expect("Unable to get the Config.");
    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)
        .await
        .unwrap_or_else(|error| panic!("Could not bind to '{address}'. Error: '{error}'."));

    if let Err(error) = create_web_server(config, listener).await {
        log::error!("The web server stopped. Error: '{error}'.");
    }
}
