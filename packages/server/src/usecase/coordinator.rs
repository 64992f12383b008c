//! Serialization point
//!
//! 全ての状態変更はこのタスクを通して 1 つずつ処理されます。
//! 接続ハンドラーは状態に直接触れず、`Command` をチャンネルに送るだけです。
//! 処理順に送信キューへ積むため、各接続が受け取るイベントの順序は処理順と一致します。

use tokio::{sync::mpsc, task::JoinHandle};

use crate::domain::{ConnectionId, Intent, PusherChannel, ValueObjectError};

use super::{error::CoordinatorError, router::ChatRouter};

/// コーディネーターへのコマンド
#[derive(Debug)]
pub enum Command {
    Connect {
        connection: ConnectionId,
        sender: PusherChannel,
    },
    Intent {
        connection: ConnectionId,
        intent: Intent,
    },
    Reject {
        connection: ConnectionId,
        error: ValueObjectError,
    },
    Disconnect {
        connection: ConnectionId,
    },
}

/// コマンド投入口
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl CoordinatorHandle {
    pub fn connect(
        &self,
        connection: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), CoordinatorError> {
        self.send(Command::Connect { connection, sender })
    }

    pub fn submit(&self, connection: ConnectionId, intent: Intent) -> Result<(), CoordinatorError> {
        self.send(Command::Intent { connection, intent })
    }

    pub fn reject(
        &self,
        connection: ConnectionId,
        error: ValueObjectError,
    ) -> Result<(), CoordinatorError> {
        self.send(Command::Reject { connection, error })
    }

    pub fn disconnect(&self, connection: ConnectionId) -> Result<(), CoordinatorError> {
        self.send(Command::Disconnect { connection })
    }

    fn send(&self, command: Command) -> Result<(), CoordinatorError> {
        self.commands
            .send(command)
            .map_err(|_| CoordinatorError::Closed)
    }
}

/// コーディネータータスクを起動する
///
/// 全ての `CoordinatorHandle` が破棄されるとタスクは終了する。
pub fn spawn_coordinator(router: ChatRouter) -> (CoordinatorHandle, JoinHandle<()>) {
    let (commands, mut rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Connect { connection, sender } => {
                    router.connect(connection, sender).await
                }
                Command::Intent { connection, intent } => router.handle(connection, intent).await,
                Command::Reject { connection, error } => router.reject(connection, error).await,
                Command::Disconnect { connection } => router.disconnect(connection).await,
            }
        }
        tracing::info!("Coordinator stopped");
    });
    (CoordinatorHandle { commands }, task)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kaiwa_shared::time::FixedClock;

    use super::*;
    use crate::{
        domain::ChatRepository,
        usecase::test_support::{content, create_test_pusher, create_test_repository, user},
    };

    fn spawn() -> (CoordinatorHandle, JoinHandle<()>, Arc<dyn ChatRepository>) {
        let repository: Arc<dyn ChatRepository> = create_test_repository();
        let router = ChatRouter::new(
            repository.clone(),
            create_test_pusher(),
            Arc::new(FixedClock::new(0)),
        );
        let (handle, task) = spawn_coordinator(router);
        (handle, task, repository)
    }

    async fn next_type(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
        let text = rx.recv().await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        json["type"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_commands_are_processed_in_order() {
        // テスト項目: 投入したコマンドが順番通りに処理される
        // given (前提条件):
        let (handle, _task, repository) = spawn();
        let connection = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        handle.connect(connection, tx).unwrap();
        handle
            .submit(connection, Intent::Register { name: user("alice") })
            .unwrap();
        for i in 0..5 {
            handle
                .submit(
                    connection,
                    Intent::SendGroup {
                        content: content(&format!("m{}", i)),
                    },
                )
                .unwrap();
        }
        handle.submit(connection, Intent::GetGroupHistory).unwrap();

        // then (期待する結果):
        assert_eq!(next_type(&mut rx).await, "registration_successful");
        assert_eq!(next_type(&mut rx).await, "chat_notification");
        assert_eq!(next_type(&mut rx).await, "active_users");
        for _ in 0..5 {
            assert_eq!(next_type(&mut rx).await, "receive_group_message");
        }
        assert_eq!(next_type(&mut rx).await, "group_history");
        let history = repository.group_history().await;
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m0", "m1", "m2", "m3", "m4"]);
    }

    #[tokio::test]
    async fn test_disconnect_drops_outbound_channel() {
        // テスト項目: 切断コマンドでユーザーが非アクティブになり、送信チャンネルが閉じる
        // given (前提条件):
        let (handle, _task, repository) = spawn();
        let connection = ConnectionId::generate();
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle.connect(connection, tx).unwrap();
        handle
            .submit(connection, Intent::Register { name: user("alice") })
            .unwrap();

        // when (操作):
        handle.disconnect(connection).unwrap();

        // then (期待する結果):
        let mut received = 0;
        while rx.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, 3);
        assert!(repository.active_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_handle_fails_after_coordinator_stops() {
        // テスト項目: コーディネーター停止後の投入は Closed エラーになる
        // given (前提条件):
        let (handle, task, _repository) = spawn();
        task.abort();
        let _ = task.await;

        // when (操作):
        let result = handle.disconnect(ConnectionId::generate());

        // then (期待する結果):
        assert_eq!(result, Err(CoordinatorError::Closed));
    }
}
