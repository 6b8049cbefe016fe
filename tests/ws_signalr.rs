use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bittrex_api_client::BittrexError;
use bittrex_api_client::ws::{
    BittrexWsClient, ExchangeSubscription, SubscriptionEvent, SubscriptionState, WsConfig,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn push(nonce: u64) -> Message {
    let frame = json!({
        "C": format!("d-{nonce}"),
        "M": [{
            "H": "CoreHub",
            "M": "updateExchangeState",
            "A": [{
                "MarketName": "BTC-ETH",
                "Nounce": nonce,
                "Buys": [{"Type": 0, "Rate": 0.05, "Quantity": 3}],
                "Sells": [],
                "Fills": []
            }]
        }]
    });
    Message::Text(frame.to_string().into())
}

/// How the hub behaves once the snapshot has been served.
enum HubEnding {
    /// Send a keep-alive and one more delta, then close the socket.
    Close,
    /// Keep the socket open without sending anything.
    Silent,
}

async fn mount_handshake(server: &MockServer, disconnect_timeout: f64) {
    Mock::given(method("GET"))
        .and(path("/signalr/negotiate"))
        .and(query_param("clientProtocol", "1.5"))
        .and(query_param("connectionData", r#"[{"name":"corehub"}]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Url": "/signalr",
            "ConnectionToken": "token+/=",
            "ConnectionId": "4a3b",
            "KeepAliveTimeout": 20.0,
            "DisconnectTimeout": disconnect_timeout,
            "TryWebSockets": true,
            "ProtocolVersion": "1.5"
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/signalr/start"))
        .and(query_param("transport", "webSockets"))
        .and(query_param("connectionToken", "token+/="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Response": "started" })))
        .expect(1)
        .mount(server)
        .await;
}

/// Accept one socket and play the hub side of a subscription.
///
/// `extra` frames are sent right after the snapshot reply.
async fn serve_hub(listener: TcpListener, extra: Vec<Message>, ending: HubEnding) -> Vec<Value> {
    let (stream, _) = listener.accept().await.unwrap();
    let mut socket = accept_async(stream).await.unwrap();
    let mut invocations = Vec::new();

    socket
        .send(Message::Text(r#"{"C":"init","S":1,"M":[]}"#.into()))
        .await
        .unwrap();

    while invocations.len() < 2 {
        let text = match socket.next().await {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(_)) => continue,
            other => panic!("socket ended early: {other:?}"),
        };
        let invocation: Value = serde_json::from_str(text.as_str()).unwrap();
        let id = invocation["I"].clone();

        match invocation["M"].as_str().unwrap() {
            "SubscribeToExchangeDeltas" => {
                socket.send(Message::Text(json!({"I": id, "R": true}).to_string().into())).await.unwrap();
            }
            "QueryExchangeState" => {
                // A delta overtaking the snapshot reply.
                socket.send(push(101)).await.unwrap();
                let reply = json!({
                    "I": id,
                    "R": {"MarketName": null, "Nounce": 100, "Buys": [], "Sells": [], "Fills": []}
                });
                socket.send(Message::Text(reply.to_string().into())).await.unwrap();
            }
            other => panic!("unexpected invocation {other}"),
        }
        invocations.push(invocation);
    }

    for frame in extra {
        socket.send(frame).await.unwrap();
    }

    if let HubEnding::Close = ending {
        socket.send(Message::Text("{}".into())).await.unwrap();
        socket.send(push(102)).await.unwrap();
        socket.close(None).await.unwrap();
    }
    while let Some(Ok(_)) = socket.next().await {}

    invocations
}

fn config(server: &MockServer, address: std::net::SocketAddr) -> WsConfig {
    WsConfig::builder()
        .urls(
            format!("{}/signalr", server.uri()),
            format!("ws://{address}/signalr"),
        )
        .connect_timeout(Duration::from_secs(5))
        .call_timeout(Duration::from_secs(5))
        .close_grace(Duration::from_millis(500))
        .build()
}

async fn drain(subscription: &mut ExchangeSubscription) -> (Vec<u64>, Vec<BittrexError>) {
    let mut nonces = Vec::new();
    let mut errors = Vec::new();
    timeout(Duration::from_secs(10), async {
        while let Some(event) = subscription.recv().await {
            match event {
                SubscriptionEvent::Update(update) => nonces.push(update.nonce),
                SubscriptionEvent::Error(error) => errors.push(error),
            }
        }
    })
    .await
    .unwrap();
    (nonces, errors)
}

#[tokio::test]
async fn test_subscription_over_signalr() {
    init_tracing();
    let server = MockServer::start().await;
    mount_handshake(&server, 30.0).await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let hub = tokio::spawn(serve_hub(listener, Vec::new(), HubEnding::Close));

    let mut subscription =
        BittrexWsClient::with_config(config(&server, address)).subscribe_exchange_updates(Some("BTC-ETH"));

    let mut updates = Vec::new();
    let mut errors = Vec::new();
    timeout(Duration::from_secs(10), async {
        while let Some(event) = subscription.recv().await {
            match event {
                SubscriptionEvent::Update(update) => updates.push(update),
                SubscriptionEvent::Error(error) => errors.push(error),
            }
        }
    })
    .await
    .unwrap();

    let nonces: Vec<u64> = updates.iter().map(|update| update.nonce).collect();
    assert_eq!(nonces, vec![100, 101, 102]);
    assert!(updates[0].initial);
    assert_eq!(updates[0].market_name.as_deref(), Some("BTC-ETH"));
    assert_eq!(updates[1].buys[0].quantity.to_string(), "3");

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], BittrexError::RemoteDisconnect { .. }));

    let invocations = hub.await.unwrap();
    assert_eq!(invocations[0]["H"], "CoreHub");
    assert_eq!(invocations[0]["A"], json!(["BTC-ETH"]));
    assert_eq!(invocations[1]["M"], "QueryExchangeState");
    assert_ne!(invocations[0]["I"], invocations[1]["I"]);
}

#[tokio::test]
async fn test_silent_hub_hits_disconnect_timeout() {
    init_tracing();
    let server = MockServer::start().await;
    mount_handshake(&server, 0.5).await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let hub = tokio::spawn(serve_hub(listener, Vec::new(), HubEnding::Silent));

    let mut subscription =
        BittrexWsClient::with_config(config(&server, address)).subscribe_exchange_updates(Some("BTC-ETH"));

    let snapshot = timeout(Duration::from_secs(5), subscription.next_update())
        .await
        .unwrap()
        .unwrap();
    assert!(snapshot.initial);

    let (nonces, errors) = drain(&mut subscription).await;
    assert_eq!(nonces, vec![101]);
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        BittrexError::RemoteDisconnect { reason } => assert!(reason.contains("500ms"), "{reason}"),
        other => panic!("expected RemoteDisconnect, got {other:?}"),
    }
    assert_eq!(subscription.state(), SubscriptionState::Failed);

    timeout(Duration::from_secs(5), hub).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_oversized_disconnect_timeout_falls_back() {
    let server = MockServer::start().await;
    mount_handshake(&server, 1e300).await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let hub = tokio::spawn(serve_hub(listener, Vec::new(), HubEnding::Close));

    let mut subscription =
        BittrexWsClient::with_config(config(&server, address)).subscribe_exchange_updates(Some("BTC-ETH"));

    let (nonces, errors) = drain(&mut subscription).await;
    assert_eq!(nonces, vec![100, 101, 102]);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], BittrexError::RemoteDisconnect { .. }));
    hub.await.unwrap();
}

#[tokio::test]
async fn test_binary_frames_must_be_utf8() {
    let server = MockServer::start().await;
    mount_handshake(&server, 30.0).await;

    // Lossy decoding of this frame would yield a valid delta with nonce 150.
    let mut invalid = br#"{"C":"d-"#.to_vec();
    invalid.push(0xff);
    invalid.extend_from_slice(br#"","M":[{"H":"CoreHub","M":"updateExchangeState","A":[{"MarketName":"BTC-ETH","Nounce":150,"Buys":[],"Sells":[],"Fills":[]}]}]}"#);
    let valid = match push(103) {
        Message::Text(text) => Message::Binary(text.as_str().as_bytes().to_vec().into()),
        other => other,
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let hub = tokio::spawn(serve_hub(
        listener,
        vec![Message::Binary(invalid.into()), valid],
        HubEnding::Close,
    ));

    let mut subscription =
        BittrexWsClient::with_config(config(&server, address)).subscribe_exchange_updates(Some("BTC-ETH"));

    let (nonces, errors) = drain(&mut subscription).await;
    assert_eq!(nonces, vec![100, 101, 103, 102]);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], BittrexError::RemoteDisconnect { .. }));
    hub.await.unwrap();
}

#[tokio::test]
async fn test_negotiate_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/signalr/negotiate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let config = WsConfig::builder()
        .urls(format!("{}/signalr", server.uri()), "ws://127.0.0.1:9/signalr")
        .build();
    let mut subscription = BittrexWsClient::with_config(config).subscribe_exchange_updates(Some("BTC-ETH"));

    assert!(subscription.next_update().await.is_none());
    match subscription.next_error().await {
        Some(BittrexError::ConnectFailed(reason)) => {
            assert!(reason.contains("503"));
            assert!(reason.contains("maintenance"));
        }
        other => panic!("expected ConnectFailed, got {other:?}"),
    }
}
