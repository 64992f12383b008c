//! UseCase 層
//!
//! Intent ごとのユースケースと、それらを 1 本の処理順に並べる
//! コーディネーターを提供します。

mod coordinator;
mod create_room;
mod disconnect_user;
mod error;
mod get_active_users;
mod get_history;
mod get_rooms;
mod join_room;
mod leave_room;
mod notify_typing;
mod presence;
mod register_user;
mod router;
mod send_message;

pub use coordinator::{Command, CoordinatorHandle, spawn_coordinator};
pub use create_room::CreateRoomUseCase;
pub use disconnect_user::DisconnectUserUseCase;
pub use error::{CoordinatorError, GetRoomDetailError};
pub use get_active_users::GetActiveUsersUseCase;
pub use get_history::GetHistoryUseCase;
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use notify_typing::NotifyTypingUseCase;
pub use presence::PresenceDispatcher;
pub use register_user::RegisterUserUseCase;
pub use router::ChatRouter;
pub use send_message::SendMessageUseCase;
