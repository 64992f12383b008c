//! End-to-end tests: an in-process server driven over WebSocket and HTTP.

use std::{collections::HashMap, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use kaiwa_server::{
    domain::{ChatState, Timestamp},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryChatRepository},
    ui::Server,
    usecase::{
        ChatRouter, GetActiveUsersUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        spawn_coordinator,
    },
};
use kaiwa_shared::time::{Clock, SystemClock};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::Mutex, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Server running on an ephemeral port for the duration of a test
struct TestServer {
    addr: String,
    server_task: JoinHandle<()>,
    coordinator_task: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let state = ChatState::new(Timestamp::new(clock.now_millis())).unwrap();
        let repository = Arc::new(InMemoryChatRepository::new(Arc::new(Mutex::new(state))));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));

        let router = ChatRouter::new(repository.clone(), message_pusher, clock);
        let (coordinator, coordinator_task) = spawn_coordinator(router);

        let server = Server::new(
            coordinator,
            Arc::new(GetRoomsUseCase::new(repository.clone())),
            Arc::new(GetRoomDetailUseCase::new(repository.clone())),
            Arc::new(GetActiveUsersUseCase::new(repository)),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let server_task = tokio::spawn(async move {
            axum::serve(listener, server.into_router()).await.unwrap();
        });

        TestServer {
            addr,
            server_task,
            coordinator_task,
        }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn get_json(&self, path: &str) -> Value {
        reqwest::get(self.http_url(path))
            .await
            .unwrap()
            .json::<Value>()
            .await
            .unwrap()
    }

    async fn active_users(&self) -> Vec<String> {
        let body = self.get_json("/api/users").await;
        body["users"]
            .as_array()
            .unwrap()
            .iter()
            .map(|user| user.as_str().unwrap().to_string())
            .collect()
    }

    async fn rooms(&self) -> Vec<Value> {
        self.get_json("/api/rooms").await.as_array().unwrap().clone()
    }

    async fn member_count(&self, room: &str) -> Option<u64> {
        self.rooms()
            .await
            .iter()
            .find(|summary| summary["name"] == room)
            .map(|summary| summary["member_count"].as_u64().unwrap())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server_task.abort();
        self.coordinator_task.abort();
    }
}

/// Polls `check` until it holds; disconnect cleanup runs asynchronously
async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("condition not met in time");
}

/// WebSocket client speaking the JSON protocol
struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl TestClient {
    async fn connect(server: &TestServer) -> Self {
        let (stream, _) = connect_async(server.ws_url()).await.unwrap();
        TestClient { stream }
    }

    /// Connects and registers, waiting for the confirmation
    async fn register(server: &TestServer, name: &str) -> Self {
        let mut client = Self::connect(server).await;
        client
            .send(json!({"type": "register", "username": name}))
            .await;
        let registered = client.recv_until("registration_successful").await;
        assert_eq!(registered["username"], name);
        client
    }

    async fn send(&mut self, value: Value) {
        self.stream
            .send(Message::text(value.to_string()))
            .await
            .unwrap();
    }

    async fn send_raw(&mut self, text: &str) {
        self.stream.send(Message::text(text)).await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("stream closed")
                .unwrap();
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    /// Skips events until one of the given type arrives
    async fn recv_until(&mut self, event_type: &str) -> Value {
        loop {
            let event = self.recv().await;
            if event["type"] == event_type {
                return event;
            }
        }
    }

    async fn close(mut self) {
        self.stream.close(None).await.unwrap();
    }
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックエンドポイントが ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body = server.get_json("/api/health").await;

    // then (期待する結果):
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_general_room_exists_at_startup() {
    // テスト項目: 起動直後から general ルームが存在し、詳細を取得できる
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let detail = server.get_json("/api/rooms/general").await;

    // then (期待する結果):
    assert_eq!(detail["name"], "general");
    assert_eq!(detail["created_by"], "system");
    assert_eq!(detail["members"], json!([]));
}

#[tokio::test]
async fn test_unknown_room_detail_returns_404() {
    // テスト項目: 存在しないルームの詳細は 404 になる
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = reqwest::get(server.http_url("/api/rooms/nowhere"))
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_frame_reports_invalid_input() {
    // テスト項目: 不正な JSON を送ると invalid_input のエラーが本人に返り、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;

    // when (操作):
    client.send_raw("this is not json").await;
    let error = client.recv_until("error_message").await;

    // then (期待する結果):
    assert_eq!(error["code"], "invalid_input");
    client
        .send(json!({"type": "register", "username": "alice"}))
        .await;
    client.recv_until("registration_successful").await;
}

#[tokio::test]
async fn test_short_name_is_rejected() {
    // テスト項目: 3 文字未満のユーザー名は登録できない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;

    // when (操作):
    client.send(json!({"type": "register", "username": "al"})).await;
    let error = client.recv_until("error_message").await;

    // then (期待する結果):
    assert_eq!(error["code"], "invalid_input");
    assert!(server.active_users().await.is_empty());
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    // テスト項目: 使用中のユーザー名での登録は name_taken で拒否される
    // given (前提条件):
    let server = TestServer::start().await;
    let _alice = TestClient::register(&server, "alice").await;
    let mut impostor = TestClient::connect(&server).await;

    // when (操作):
    impostor
        .send(json!({"type": "register", "username": "alice"}))
        .await;
    let error = impostor.recv_until("error_message").await;

    // then (期待する結果):
    assert_eq!(error["code"], "name_taken");
    assert_eq!(server.active_users().await, vec!["alice".to_string()]);
}

#[tokio::test]
async fn test_group_message_reaches_everyone_and_history() {
    // テスト項目: グループメッセージが全員に届き、履歴に残る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::register(&server, "alice").await;
    let mut bob = TestClient::register(&server, "bob").await;

    // when (操作):
    alice
        .send(json!({"type": "send_group_message", "message": "hi"}))
        .await;
    let received = bob.recv_until("receive_group_message").await;
    alice.send(json!({"type": "get_group_history"})).await;
    let history = alice.recv_until("group_history").await;

    // then (期待する結果):
    assert_eq!(received["message"]["sender"], "alice");
    assert_eq!(received["message"]["content"], "hi");
    let messages = history["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], "alice");
    assert_eq!(messages[0]["content"], "hi");
}

#[tokio::test]
async fn test_private_history_is_shared_by_both_parties() {
    // テスト項目: プライベートメッセージの履歴は送信者・受信者のどちらから見ても同じ
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::register(&server, "alice").await;
    let mut bob = TestClient::register(&server, "bob").await;

    // when (操作):
    alice
        .send(json!({"type": "send_private_message", "receiver": "bob", "message": "hey"}))
        .await;
    bob.recv_until("receive_private_message").await;
    alice
        .send(json!({"type": "get_private_history", "username": "bob"}))
        .await;
    bob.send(json!({"type": "get_private_history", "username": "alice"}))
        .await;
    let from_alice = alice.recv_until("private_history").await;
    let from_bob = bob.recv_until("private_history").await;

    // then (期待する結果):
    assert_eq!(from_alice["messages"], from_bob["messages"]);
    let messages = from_alice["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["content"], "hey");
}

#[tokio::test]
async fn test_disconnect_updates_presence_and_rooms() {
    // テスト項目: 切断したユーザーはアクティブ一覧とルームから外れ、
    //             自分だけが残っていたルームは削除される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::register(&server, "alice").await;
    let mut bob = TestClient::register(&server, "bob").await;
    bob.send(json!({"type": "join_room", "room_name": "general"}))
        .await;
    bob.recv_until("room_joined").await;
    assert_eq!(server.member_count("general").await, Some(1));

    let mut carol = TestClient::register(&server, "carol").await;
    carol
        .send(json!({"type": "create_room", "room_name": "lonely", "description": "just me"}))
        .await;
    carol.recv_until("room_created").await;
    assert_eq!(server.member_count("lonely").await, Some(1));

    // when (操作):
    bob.close().await;
    carol.close().await;

    // then (期待する結果):
    let server_ref = &server;
    wait_until(|| async move { server_ref.active_users().await == vec!["alice".to_string()] })
        .await;
    wait_until(|| async move { server_ref.member_count("lonely").await.is_none() }).await;
    assert_eq!(server.member_count("general").await, Some(0));
    let deleted = alice.recv_until("room_deleted").await;
    assert_eq!(deleted["room_name"], "lonely");
}

#[tokio::test]
async fn test_room_message_is_limited_to_members() {
    // テスト項目: ルームメッセージはメンバーにだけ届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::register(&server, "alice").await;
    let mut bob = TestClient::register(&server, "bob").await;
    let mut carol = TestClient::register(&server, "carol").await;
    for client in [&mut alice, &mut bob] {
        client
            .send(json!({"type": "join_room", "room_name": "general"}))
            .await;
        client.recv_until("room_joined").await;
    }

    // when (操作):
    alice
        .send(json!({"type": "send_room_message", "room": "general", "message": "members only"}))
        .await;
    let received = bob.recv_until("receive_room_message").await;
    carol
        .send(json!({"type": "send_group_message", "message": "marker"}))
        .await;

    // then (期待する結果):
    assert_eq!(received["message"]["room"], "general");
    assert_eq!(received["message"]["content"], "members only");
    // carol は自分の marker より前にルームメッセージを受け取らない
    loop {
        let event = carol.recv().await;
        assert_ne!(event["type"], "receive_room_message");
        if event["type"] == "receive_group_message" {
            break;
        }
    }
}

#[tokio::test]
async fn test_logout_keeps_socket_open() {
    // テスト項目: ログアウト後もソケットは開いたままで、別名で再登録できる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::register(&server, "alice").await;

    // when (操作):
    alice.send(json!({"type": "logout"})).await;
    let logged_out = alice.recv_until("logged_out").await;

    // then (期待する結果):
    assert_eq!(logged_out["username"], "alice");
    assert!(server.active_users().await.is_empty());
    alice
        .send(json!({"type": "register", "username": "alice2"}))
        .await;
    alice.recv_until("registration_successful").await;
}
