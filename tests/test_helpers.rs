#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use ulid::Ulid;
use ugi_signal_server::server::SignalingCore;
use ugi_signal_server::session_store::{GameIdentity, InMemorySessionStore, SessionIdentity};
use ugi_signal_server::websocket::create_router;

pub const TEST_ORIGIN: &str = "http://example.test";

pub type WsSink = futures_util::stream::SplitSink<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    tokio_tungstenite::tungstenite::Message,
>;
pub type WsStream =
    futures_util::stream::SplitStream<
        tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    >;

/// Connects a websocket client to the signaling endpoint with a fixed
/// `Origin` header, matching what `handler::websocket_handler` reads for
/// INIT's origin check.
pub async fn connect_signaling(addr: SocketAddr, ugi: Ulid) -> (WsSink, WsStream) {
    use futures_util::StreamExt;
    use tokio_tungstenite::tungstenite::client::IntoClientRequest;

    let url = format!("ws://{addr}/api/v0/signaling?ugi={ugi}");
    let mut request = url.into_client_request().expect("valid websocket url");
    request
        .headers_mut()
        .insert("Origin", TEST_ORIGIN.parse().unwrap());

    let (stream, _response) = tokio_tungstenite::connect_async(request)
        .await
        .expect("websocket handshake succeeds");
    stream.split()
}

/// Spins up the full router on an ephemeral localhost port, backed by a
/// seedable `InMemorySessionStore`. Returns the bound address and the store
/// so tests can seed games/sessions before connecting.
pub async fn start_test_server() -> (SocketAddr, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let core = Arc::new(SignalingCore::new(store.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = create_router("*").with_state(core);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    (addr, store)
}

pub async fn send_frame(sink: &mut WsSink, frame: ugi_signal_server::protocol::Frame) {
    use futures_util::SinkExt;
    let text = frame.encode().expect("frame serializes");
    sink.send(tokio_tungstenite::tungstenite::Message::Text(text.into()))
        .await
        .expect("frame sends");
}

pub async fn recv_frame(stream: &mut WsStream) -> ugi_signal_server::protocol::Frame {
    use futures_util::StreamExt;
    let msg = tokio::time::timeout(std::time::Duration::from_secs(5), stream.next())
        .await
        .expect("a frame arrives before the timeout")
        .expect("the stream did not close early")
        .expect("no websocket transport error");
    let text = msg.into_text().expect("server sends a text frame");
    ugi_signal_server::protocol::Frame::decode(&text).expect("server sends valid frame JSON")
}

pub fn ulid_seed(seed: u128) -> Ulid {
    Ulid::from(seed)
}

/// Seeds one game (UGI) and one session token bound to `TEST_ORIGIN`,
/// returning (ugi, token, player_ulid).
pub fn seed_player(
    store: &InMemorySessionStore,
    ugi_seed: u128,
    token_seed: u128,
    player_seed: u128,
    username: &str,
) -> (Ulid, Ulid, Ulid) {
    let ugi = ulid_seed(ugi_seed);
    let token = ulid_seed(token_seed);
    let player = ulid_seed(player_seed);

    store.seed_game(
        ugi,
        GameIdentity {
            game_name: "G".into(),
            developer_name: "D".into(),
        },
    );
    store.seed_session(
        token,
        SessionIdentity {
            username: username.into(),
            ulid: player,
            origin: TEST_ORIGIN.into(),
            expiry: Utc::now() + Duration::hours(1),
        },
    );

    (ugi, token, player)
}
