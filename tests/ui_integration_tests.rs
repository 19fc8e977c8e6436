use actix_web::web;
use awc::Client;
use std::fs;
use token_plot::config::ServerConfig;
use token_plot::logging;
use token_plot::ui::routes::{bind_server, AppState};

fn test_config() -> ServerConfig {
    ServerConfig {
        port: 0, // Let the OS pick a free port
        jitter_seed: Some(2024),
        ..ServerConfig::default()
    }
}

#[actix_rt::test]
async fn test_tokenize_and_history_over_http() {
    logging::initialize_for_tests();

    let config = test_config();
    let state = web::Data::new(AppState::from_config(&config).expect("tokenizer should build"));
    let (server, addrs) = bind_server(&config, state.clone()).expect("server should bind");
    let handle = server.handle();
    actix_rt::spawn(server);
    let base = format!("http://{}", addrs[0]);

    let client = Client::default();

    // Empty landing page
    let mut response = client.get(format!("{}/", base)).send().await.expect("GET / failed");
    assert_eq!(response.status().as_u16(), 200);
    let body = response.body().await.expect("Failed to read response body");
    let body_str = std::str::from_utf8(&body).expect("Response body was not valid UTF-8");
    assert!(body_str.contains("No previous inputs yet."));

    // Form submission renders the plot
    let mut response = client
        .post(format!("{}/tokenize", base))
        .send_form(&[("sentence", "The quick brown fox")])
        .await
        .expect("POST /tokenize failed");
    assert_eq!(response.status().as_u16(), 200);
    let body = response.body().await.expect("Failed to read response body");
    let body_str = std::str::from_utf8(&body).expect("Response body was not valid UTF-8");
    assert!(body_str.contains("Tokens: <strong>The, quick, brown, fox</strong>"));
    assert!(body_str.contains("<strong>4.00</strong> characters"));
    assert!(body_str.contains("x: [0,1,2,3]"));
    assert!(body_str.contains("y: [3,5,5,3]"));

    // Empty sentence is rejected and not recorded
    let response = client
        .post(format!("{}/tokenize", base))
        .send_form(&[("sentence", "")])
        .await
        .expect("POST /tokenize failed");
    assert_eq!(response.status().as_u16(), 400, "Expected Bad Request for an empty sentence");

    // JSON submission returns the structured payload
    let mut response = client
        .post(format!("{}/tokenize", base))
        .send_json(&serde_json::json!({ "sentence": "cat dog elephant" }))
        .await
        .expect("POST /tokenize (json) failed");
    assert_eq!(response.status().as_u16(), 200);
    let payload: serde_json::Value = response.json().await.expect("Response was not JSON");
    assert_eq!(payload["prediction"], "4.67");
    assert_eq!(payload["ys"], serde_json::json!([3, 3, 8]));

    let mut response = client.get(format!("{}/history", base)).send().await.expect("GET /history failed");
    let history: Vec<String> = response.json().await.expect("History was not JSON");
    assert_eq!(history, vec!["The quick brown fox", "cat dog elephant"]);

    handle.stop(true).await;
}

#[actix_rt::test]
async fn test_static_directory_is_served() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("style.css"), "body { color: black; }").expect("write asset");

    let config = ServerConfig {
        static_dir: Some(dir.path().to_path_buf()),
        ..test_config()
    };
    let state = web::Data::new(AppState::from_config(&config).expect("tokenizer should build"));
    let (server, addrs) = bind_server(&config, state).expect("server should bind");
    let handle = server.handle();
    actix_rt::spawn(server);

    let client = Client::default();
    let mut response = client
        .get(format!("http://{}/static/style.css", addrs[0]))
        .send()
        .await
        .expect("GET /static/style.css failed");
    assert_eq!(response.status().as_u16(), 200);
    let body = response.body().await.expect("Failed to read response body");
    assert_eq!(&body[..], b"body { color: black; }");

    handle.stop(true).await;
}
