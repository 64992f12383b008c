//! UseCase: アクティブユーザー一覧の取得

use std::sync::Arc;

use crate::domain::{ChatRepository, UserName};

/// アクティブユーザー一覧取得のユースケース
pub struct GetActiveUsersUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetActiveUsersUseCase {
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// 名前順のアクティブユーザー一覧
    pub async fn execute(&self) -> Vec<UserName> {
        self.repository.active_users().await
    }
}
