//! End-to-end tests for template registration and the dispatch pipeline.

mod common;

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use dyngate::config::GatewayConfig;
use dyngate::http::GatewayServer;
use serde_json::json;

async fn start_gateway(addr: SocketAddr, config: GatewayConfig) {
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    let server = GatewayServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, std::future::pending()).await;
    });
    tokio::time::sleep(Duration::from_millis(200)).await;
}

fn gateway_config(bind: SocketAddr, backend: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = bind.to_string();
    config.backend.soap_endpoint = format!("http://{backend}/soap");
    config
}

#[tokio::test]
async fn test_register_then_invoke_maps_backend_reply() {
    let backend_addr: SocketAddr = "127.0.0.1:28411".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28412".parse().unwrap();

    let calls = common::start_mock_backend(
        backend_addr,
        "<Envelope><Body>order created</Body></Envelope>",
    )
    .await;
    start_gateway(gateway_addr, gateway_config(gateway_addr, backend_addr)).await;

    let client = common::client();
    let base = format!("http://{gateway_addr}");

    let res = common::register_templates(
        &client,
        &base,
        "order",
        "<Envelope><Body>{op}</Body></Envelope>",
        "<Envelope><Body>{result}</Body></Envelope>",
    )
    .await;
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("SOAP templates uploaded successfully."));

    let res = client
        .post(format!("{base}/soap-call/order"))
        .json(&json!({"op": "create"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Dynamic SOAP call successful"));
    assert_eq!(body["data"], json!({"result": "order created"}));
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn test_invalid_template_is_rejected_and_route_stays_absent() {
    let backend_addr: SocketAddr = "127.0.0.1:28421".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28422".parse().unwrap();

    let calls = common::start_mock_backend(backend_addr, "unused").await;
    start_gateway(gateway_addr, gateway_config(gateway_addr, backend_addr)).await;

    let client = common::client();
    let base = format!("http://{gateway_addr}");

    let res = common::register_templates(
        &client,
        &base,
        "bad",
        "<NotAnEnvelope/>",
        "<Envelope><Body>{result}</Body></Envelope>",
    )
    .await;
    assert_eq!(res.status(), 500);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("<Envelope"));

    // The rejected route must remain absent from the registry.
    let res = client
        .post(format!("{base}/soap-call/bad"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(calls.get(), 0);
}

#[tokio::test]
async fn test_unregistered_route_never_calls_backend() {
    let backend_addr: SocketAddr = "127.0.0.1:28431".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28432".parse().unwrap();

    let calls = common::start_mock_backend(backend_addr, "unused").await;
    start_gateway(gateway_addr, gateway_config(gateway_addr, backend_addr)).await;

    let client = common::client();
    let res = client
        .post(format!("http://{gateway_addr}/soap-call/neverRegistered"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("neverRegistered"));
    assert_eq!(calls.get(), 0);
}

#[tokio::test]
async fn test_payload_mismatch_is_a_client_error() {
    let backend_addr: SocketAddr = "127.0.0.1:28441".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28442".parse().unwrap();

    let calls = common::start_mock_backend(backend_addr, "unused").await;
    start_gateway(gateway_addr, gateway_config(gateway_addr, backend_addr)).await;

    let client = common::client();
    let base = format!("http://{gateway_addr}");
    common::register_templates(
        &client,
        &base,
        "order",
        "<Envelope><Body>{op}</Body></Envelope>",
        "<Envelope><Body>{result}</Body></Envelope>",
    )
    .await;

    let res = client
        .post(format!("{base}/soap-call/order"))
        .json(&json!({"unrelated": 1}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("{op}"));
    assert_eq!(calls.get(), 0);
}

#[tokio::test]
async fn test_hung_backend_is_cancelled_within_the_bound() {
    let backend_addr: SocketAddr = "127.0.0.1:28451".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28452".parse().unwrap();

    let calls = common::start_hanging_backend(backend_addr).await;
    let mut config = gateway_config(gateway_addr, backend_addr);
    config.timeouts.backend_secs = 1;
    start_gateway(gateway_addr, config).await;

    let client = common::client();
    let base = format!("http://{gateway_addr}");
    common::register_templates(
        &client,
        &base,
        "slow",
        "<Envelope><Body>{op}</Body></Envelope>",
        "<Envelope><Body>{result}</Body></Envelope>",
    )
    .await;

    let start = Instant::now();
    let res = client
        .post(format!("{base}/soap-call/slow"))
        .json(&json!({"op": "wait"}))
        .send()
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(res.status(), 504);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("cancelled"));
    assert!(
        elapsed < Duration::from_millis(2500),
        "call should return within timeout + epsilon, took {elapsed:?}"
    );
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn test_reregistration_takes_effect_for_subsequent_invocations() {
    let backend_addr: SocketAddr = "127.0.0.1:28461".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28462".parse().unwrap();

    common::start_mock_backend(backend_addr, "<Envelope><Body>done</Body></Envelope>").await;
    start_gateway(gateway_addr, gateway_config(gateway_addr, backend_addr)).await;

    let client = common::client();
    let base = format!("http://{gateway_addr}");

    common::register_templates(
        &client,
        &base,
        "order",
        "<Envelope><Body>{op}</Body></Envelope>",
        "<Envelope><Body>{result}</Body></Envelope>",
    )
    .await;
    common::register_templates(
        &client,
        &base,
        "order",
        "<Envelope><Body>{op}</Body></Envelope>",
        "<Envelope><Body>{outcome}</Body></Envelope>",
    )
    .await;

    let res = client
        .post(format!("{base}/soap-call/order"))
        .json(&json!({"op": "create"}))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["data"], json!({"outcome": "done"}));
}

#[tokio::test]
async fn test_repeated_invocations_yield_identical_results() {
    let backend_addr: SocketAddr = "127.0.0.1:28471".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28472".parse().unwrap();

    let calls =
        common::start_mock_backend(backend_addr, "<Envelope><Body>fixed</Body></Envelope>").await;
    start_gateway(gateway_addr, gateway_config(gateway_addr, backend_addr)).await;

    let client = common::client();
    let base = format!("http://{gateway_addr}");
    common::register_templates(
        &client,
        &base,
        "order",
        "<Envelope><Body>{op}</Body></Envelope>",
        "<Envelope><Body>{result}</Body></Envelope>",
    )
    .await;

    let mut bodies = Vec::new();
    for _ in 0..3 {
        let res = client
            .post(format!("{base}/soap-call/order"))
            .json(&json!({"op": "status"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        bodies.push(res.json::<serde_json::Value>().await.unwrap());
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
    assert_eq!(calls.get(), 3);
}

#[tokio::test]
async fn test_remove_route_then_invoke_is_not_found() {
    let backend_addr: SocketAddr = "127.0.0.1:28481".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28482".parse().unwrap();

    common::start_mock_backend(backend_addr, "<Envelope><Body>done</Body></Envelope>").await;
    start_gateway(gateway_addr, gateway_config(gateway_addr, backend_addr)).await;

    let client = common::client();
    let base = format!("http://{gateway_addr}");
    common::register_templates(
        &client,
        &base,
        "order",
        "<Envelope><Body>{op}</Body></Envelope>",
        "<Envelope><Body>{result}</Body></Envelope>",
    )
    .await;

    let res = client
        .delete(format!("{base}/soap-call/order"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .delete(format!("{base}/soap-call/order"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let res = client
        .post(format!("{base}/soap-call/order"))
        .json(&json!({"op": "create"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_backend_error_status_maps_to_bad_gateway() {
    let backend_addr: SocketAddr = "127.0.0.1:28491".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:28492".parse().unwrap();

    common::start_programmable_backend(backend_addr, || async {
        (500, "backend exploded".to_string())
    })
    .await;
    start_gateway(gateway_addr, gateway_config(gateway_addr, backend_addr)).await;

    let client = common::client();
    let base = format!("http://{gateway_addr}");
    common::register_templates(
        &client,
        &base,
        "order",
        "<Envelope><Body>{op}</Body></Envelope>",
        "<Envelope><Body>{result}</Body></Envelope>",
    )
    .await;

    let res = client
        .post(format!("{base}/soap-call/order"))
        .json(&json!({"op": "create"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("500"));
}
