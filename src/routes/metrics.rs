use axum::response::{IntoResponse, Response};
use hyper::StatusCode;
use prometheus::{Encoder, TextEncoder};

use crate::metrics::REGISTRY;

pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(error) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        log::error!("Could not encode custom metrics: {error}");
    }
    if let Err(error) = encoder.encode(&prometheus::gather(), &mut buffer) {
        log::error!("Could not encode prometheus metrics: {error}");
    }

    let body = match String::from_utf8(buffer) {
        Ok(body) => body,
        Err(error) => {
            log::error!("Metrics could not be from_utf8'd: {error}");
            String::default()
        }
    };

    (StatusCode::OK, body).into_response()
}
