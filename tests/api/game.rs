use std::time::Duration;

use tokio::time::sleep;
use tokio_tungstenite::tungstenite::Message;

use crate::helpers::{PlayerEntry, TestApp, TestClient};

const VOCABULARY: [&str; 8] = [
    "chat",
    "maison",
    "voiture",
    "ordinateur",
    "arbre",
    "soleil",
    "montagne",
    "pomme",
];

#[tokio::test]
async fn create_room_returns_an_id_and_the_initial_roster() {
    let app = TestApp::spawn_app().await;
    let mut alice = TestClient::connect(&app, "alice").await;

    alice.send_create_room().await;

    let _room_id = alice.expect_room_created().await;
    assert_eq!(
        alice.expect_player_list().await,
        vec![PlayerEntry {
            nickname: "alice".to_string(),
            points: 0,
            is_creator: true,
        }]
    );
}

#[tokio::test]
async fn joining_a_room_broadcasts_the_roster_in_join_order() {
    let app = TestApp::spawn_app().await;
    let mut alice = TestClient::connect(&app, "alice").await;
    alice.send_create_room().await;
    let room_id = alice.expect_room_created().await;
    let _ = alice.expect_player_list().await;

    let mut bob = TestClient::connect(&app, "bob").await;
    bob.send_join_room(&room_id).await;

    bob.expect_room_joined(&room_id).await;
    let roster = bob.expect_player_list().await;
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].nickname, "alice");
    assert!(roster[0].is_creator);
    assert_eq!(roster[1].nickname, "bob");
    assert!(!roster[1].is_creator);
    let _ = alice.expect_player_list().await;

    let mut charlie = TestClient::connect(&app, "charlie").await;
    charlie.send_join_room(&room_id).await;

    charlie.expect_room_joined(&room_id).await;
    let roster = charlie.expect_player_list().await;
    let nicknames: Vec<&str> = roster
        .iter()
        .map(|player| player.nickname.as_str())
        .collect();
    assert_eq!(nicknames, vec!["alice", "bob", "charlie"]);
    let _ = alice.expect_player_list().await;
    let _ = bob.expect_player_list().await;
}

#[tokio::test]
async fn joining_an_unknown_room_is_silently_ignored() {
    let app = TestApp::spawn_app().await;
    let mut alice = TestClient::connect(&app, "alice").await;

    alice.send_join_room("AAAAAA").await;

    alice.expect_silence().await;

    // The connection stays usable
    alice.send_create_room().await;
    let _ = alice.expect_room_created().await;
}

#[tokio::test]
async fn room_commands_before_joining_a_room_are_ignored() {
    let app = TestApp::spawn_app().await;
    let mut alice = TestClient::connect(&app, "alice").await;

    alice.send_chat("AAAAAA", "bonjour").await;
    alice.send_start_game("AAAAAA").await;
    alice.send_draw("AAAAAA", r#"{"x":1,"y":2}"#).await;

    alice.expect_silence().await;

    // The connection stays usable
    alice.send_create_room().await;
    let _ = alice.expect_room_created().await;
}

#[tokio::test]
async fn the_creator_can_start_the_game() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;

    alice.send_start_game(&room_id).await;

    alice.expect_game_started().await;
    bob.expect_game_started().await;
    assert_eq!(alice.expect_draw_turn().await, "alice");
    assert_eq!(bob.expect_draw_turn().await, "alice");
    let word = alice.expect_word_to_draw().await;
    assert!(VOCABULARY.contains(&word.as_str()));

    // The word is only revealed to the drawer
    bob.expect_silence().await;
}

#[tokio::test]
async fn a_non_creator_cannot_start_the_game() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;

    bob.send_start_game(&room_id).await;

    alice.expect_silence().await;
    bob.expect_silence().await;
}

#[tokio::test]
async fn starting_the_game_for_another_room_is_ignored() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;
    assert_ne!(room_id, "ZZZZZZ");

    alice.send_start_game("ZZZZZZ").await;

    alice.expect_silence().await;
    bob.expect_silence().await;
}

#[tokio::test]
async fn chat_messages_are_relayed_to_every_member() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;

    alice.send_chat(&room_id, "bonjour").await;

    assert_eq!(
        alice.expect_chat().await,
        ("alice".to_string(), "bonjour".to_string())
    );
    assert_eq!(
        bob.expect_chat().await,
        ("alice".to_string(), "bonjour".to_string())
    );
}

#[tokio::test]
async fn chat_for_another_room_is_ignored() {
    let (_app, _room_id, mut alice, mut bob) = room_with_two_members().await;

    bob.send_chat("ZZZZZZ", "bonjour").await;

    alice.expect_silence().await;
    bob.expect_silence().await;
}

#[tokio::test]
async fn drawing_for_another_room_is_ignored() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;
    assert_ne!(room_id, "ZZZZZZ");

    let stroke = r#"{"x":5,"y":6}"#;
    alice.send_draw("ZZZZZZ", stroke).await;

    alice.expect_silence().await;
    bob.expect_silence().await;

    // The same stroke for the right room relays
    alice.send_draw(&room_id, stroke).await;
    assert_eq!(
        alice.expect_draw().await,
        ("alice".to_string(), stroke.to_string())
    );
    assert_eq!(
        bob.expect_draw().await,
        ("alice".to_string(), stroke.to_string())
    );
}

#[tokio::test]
async fn drawing_strokes_are_relayed_to_every_member() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;
    start_turn(&room_id, &mut alice, &mut bob).await;

    let stroke = r#"{"x":12,"y":34}"#;
    bob.send_draw(&room_id, stroke).await;

    assert_eq!(
        alice.expect_draw().await,
        ("bob".to_string(), stroke.to_string())
    );
    assert_eq!(
        bob.expect_draw().await,
        ("bob".to_string(), stroke.to_string())
    );
}

#[tokio::test]
async fn a_wrong_guess_is_relayed_as_a_chat_message() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;
    let _word = start_turn(&room_id, &mut alice, &mut bob).await;

    bob.send_chat(&room_id, "definitely not the word").await;

    assert_eq!(
        alice.expect_chat().await,
        ("bob".to_string(), "definitely not the word".to_string())
    );
    assert_eq!(
        bob.expect_chat().await,
        ("bob".to_string(), "definitely not the word".to_string())
    );
}

#[tokio::test]
async fn a_correct_guess_awards_points_and_is_not_revealed() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;
    let word = start_turn(&room_id, &mut alice, &mut bob).await;

    bob.send_chat(&room_id, &word).await;

    let announcement = ("System".to_string(), "bob a deviné le mot !".to_string());
    assert_eq!(alice.expect_chat().await, announcement);
    assert_eq!(bob.expect_chat().await, announcement);
    assert_eq!(
        alice.expect_player_list().await,
        vec![
            PlayerEntry {
                nickname: "alice".to_string(),
                points: 0,
                is_creator: true,
            },
            PlayerEntry {
                nickname: "bob".to_string(),
                points: 100,
                is_creator: false,
            },
        ]
    );
    let _ = bob.expect_player_list().await;

    // Once a member guessed right their chat is muted until the next turn
    bob.send_chat(&room_id, "gg").await;
    alice.expect_silence().await;
    bob.expect_silence().await;

    // Members that have not guessed yet keep chatting normally
    alice.send_chat(&room_id, "bravo").await;
    assert_eq!(
        alice.expect_chat().await,
        ("alice".to_string(), "bravo".to_string())
    );
    assert_eq!(
        bob.expect_chat().await,
        ("alice".to_string(), "bravo".to_string())
    );
}

#[tokio::test]
async fn restarting_the_turn_rotates_the_drawer_and_resets_guesses() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;
    let word = start_turn(&room_id, &mut alice, &mut bob).await;

    bob.send_chat(&room_id, &word).await;
    let _ = alice.expect_chat().await;
    let _ = bob.expect_chat().await;
    let _ = alice.expect_player_list().await;
    let _ = bob.expect_player_list().await;

    // Second turn, the next member in join order draws
    alice.send_start_game(&room_id).await;
    alice.expect_game_started().await;
    bob.expect_game_started().await;
    assert_eq!(alice.expect_draw_turn().await, "bob");
    assert_eq!(bob.expect_draw_turn().await, "bob");
    let word = bob.expect_word_to_draw().await;

    alice.send_chat(&room_id, &word).await;

    let announcement = ("System".to_string(), "alice a deviné le mot !".to_string());
    assert_eq!(alice.expect_chat().await, announcement);
    assert_eq!(bob.expect_chat().await, announcement);
    assert_eq!(
        alice.expect_player_list().await,
        vec![
            PlayerEntry {
                nickname: "alice".to_string(),
                points: 100,
                is_creator: true,
            },
            PlayerEntry {
                nickname: "bob".to_string(),
                points: 100,
                is_creator: false,
            },
        ]
    );
    let _ = bob.expect_player_list().await;
}

#[tokio::test]
async fn the_tenth_correct_guess_wins_the_game() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;

    for round in 1..=10u32 {
        alice.send_start_game(&room_id).await;
        alice.expect_game_started().await;
        bob.expect_game_started().await;
        let drawer = alice.expect_draw_turn().await;
        let _ = bob.expect_draw_turn().await;
        if round % 2 == 1 {
            assert_eq!(drawer, "alice");
        } else {
            assert_eq!(drawer, "bob");
        }
        // The drawer is allowed to guess their own word, so bob can score
        // every round no matter who draws
        let word = if drawer == "alice" {
            alice.expect_word_to_draw().await
        } else {
            bob.expect_word_to_draw().await
        };

        bob.send_chat(&room_id, &word).await;

        let announcement = ("System".to_string(), "bob a deviné le mot !".to_string());
        assert_eq!(alice.expect_chat().await, announcement);
        assert_eq!(bob.expect_chat().await, announcement);

        if round == 10 {
            let win = (
                "System".to_string(),
                "bob a gagné avec 1000 points !".to_string(),
            );
            assert_eq!(alice.expect_game_won().await, win);
            assert_eq!(bob.expect_game_won().await, win);
        }

        // Before the winning round the roster follows the announcement
        // directly, receiving it here proves no game_won was sent
        let roster = alice.expect_player_list().await;
        assert_eq!(roster[1].points, 100 * round);
        let _ = bob.expect_player_list().await;
    }
}

#[tokio::test]
async fn a_disconnected_player_leaves_the_roster() {
    let (_app, _room_id, mut alice, bob) = room_with_two_members().await;

    bob.close().await;

    assert_eq!(
        alice.expect_player_list().await,
        vec![PlayerEntry {
            nickname: "alice".to_string(),
            points: 0,
            is_creator: true,
        }]
    );
}

#[tokio::test]
async fn after_the_creator_leaves_nobody_can_start_the_game() {
    let (_app, room_id, alice, mut bob) = room_with_two_members().await;

    alice.close().await;

    let roster = bob.expect_player_list().await;
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].nickname, "bob");
    assert!(!roster[0].is_creator);

    bob.send_start_game(&room_id).await;
    bob.expect_silence().await;
}

#[tokio::test]
async fn a_malformed_message_closes_the_connection() {
    let (_app, _room_id, mut alice, mut bob) = room_with_two_members().await;

    alice.send_raw_message(Message::Text("invalid".to_string())).await;

    alice.expect_closed().await;
    // The other member sees the departure
    assert_eq!(bob.expect_player_list().await.len(), 1);
}

#[tokio::test]
async fn a_malformed_message_in_the_lobby_closes_the_connection() {
    let app = TestApp::spawn_app().await;
    let mut alice = TestClient::connect(&app, "alice").await;

    alice.send_raw_message(Message::Text("invalid".to_string())).await;

    alice.expect_closed().await;
}

#[tokio::test]
async fn a_binary_message_closes_the_connection() {
    let app = TestApp::spawn_app().await;
    let mut alice = TestClient::connect(&app, "alice").await;

    alice.send_raw_message(Message::Binary(vec![1, 2, 3])).await;

    alice.expect_closed().await;
}

#[tokio::test]
async fn an_unrecognized_message_type_is_ignored() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;

    alice
        .send_raw_message(Message::Text(r#"{"type": "wave"}"#.to_string()))
        .await;

    alice.expect_silence().await;

    // The connection stays usable
    alice.send_chat(&room_id, "toujours là").await;
    let _ = alice.expect_chat().await;
    let _ = bob.expect_chat().await;
}

#[tokio::test]
async fn creating_a_room_while_in_one_moves_the_player() {
    let (_app, room_id, mut alice, mut bob) = room_with_two_members().await;

    bob.send_create_room().await;

    let new_room_id = bob.expect_room_created().await;
    assert_ne!(new_room_id, room_id);
    assert_eq!(
        bob.expect_player_list().await,
        vec![PlayerEntry {
            nickname: "bob".to_string(),
            points: 0,
            is_creator: true,
        }]
    );
    // The old room saw bob leave
    assert_eq!(alice.expect_player_list().await.len(), 1);
}

#[tokio::test]
async fn joining_another_room_moves_the_player() {
    let (app, _room_id, mut alice, mut bob) = room_with_two_members().await;
    let mut charlie = TestClient::connect(&app, "charlie").await;
    charlie.send_create_room().await;
    let other_room_id = charlie.expect_room_created().await;
    let _ = charlie.expect_player_list().await;

    bob.send_join_room(&other_room_id).await;

    bob.expect_room_joined(&other_room_id).await;
    let roster = bob.expect_player_list().await;
    let nicknames: Vec<&str> = roster
        .iter()
        .map(|player| player.nickname.as_str())
        .collect();
    assert_eq!(nicknames, vec!["charlie", "bob"]);
    let _ = charlie.expect_player_list().await;
    assert_eq!(alice.expect_player_list().await.len(), 1);
}

#[tokio::test]
async fn an_empty_room_expires_after_the_inactivity_timeout() {
    let app = TestApp::spawn_app().await;
    let mut alice = TestClient::connect(&app, "alice").await;
    alice.send_create_room().await;
    let room_id = alice.expect_room_created().await;
    let _ = alice.expect_player_list().await;

    alice.close().await;

    // Wait until the room is closed
    sleep(app.inactivity_timeout + Duration::from_secs(1)).await;

    // Try to join the same room again
    let mut bob = TestClient::connect(&app, "bob").await;
    bob.send_join_room(&room_id).await;
    bob.expect_silence().await;
}

#[tokio::test]
async fn a_room_with_members_survives_idle_periods() {
    let (app, room_id, mut alice, mut bob) = room_with_two_members().await;

    sleep(app.inactivity_timeout + Duration::from_millis(500)).await;

    alice.send_chat(&room_id, "toujours là").await;
    assert_eq!(
        alice.expect_chat().await,
        ("alice".to_string(), "toujours là".to_string())
    );
    assert_eq!(
        bob.expect_chat().await,
        ("alice".to_string(), "toujours là".to_string())
    );
}

/// Spawns an app and puts alice (creator) and bob in a fresh room, with all
/// the roster messages already drained.
async fn room_with_two_members() -> (TestApp, String, TestClient, TestClient) {
    let app = TestApp::spawn_app().await;

    let mut alice = TestClient::connect(&app, "alice").await;
    alice.send_create_room().await;
    let room_id = alice.expect_room_created().await;
    let _ = alice.expect_player_list().await;

    let mut bob = TestClient::connect(&app, "bob").await;
    bob.send_join_room(&room_id).await;
    bob.expect_room_joined(&room_id).await;
    let _ = bob.expect_player_list().await;
    let _ = alice.expect_player_list().await;

    (app, room_id, alice, bob)
}

/// Starts the first turn with alice drawing and returns the word she has to
/// draw, with the start messages on both sockets drained.
async fn start_turn(room_id: &str, alice: &mut TestClient, bob: &mut TestClient) -> String {
    alice.send_start_game(room_id).await;
    alice.expect_game_started().await;
    bob.expect_game_started().await;
    assert_eq!(alice.expect_draw_turn().await, "alice");
    assert_eq!(bob.expect_draw_turn().await, "alice");
    let word = alice.expect_word_to_draw().await;
    assert!(VOCABULARY.contains(&word.as_str()));
    word
}
