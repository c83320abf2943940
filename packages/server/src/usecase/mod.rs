//! Application use cases.
//!
//! Each use case owns `Arc`s of the collaborators it needs and is shared by
//! the UI layer through `AppState`.

mod error;
mod get_messages;
mod join_room;
mod leave_room;
mod manage_rooms;
mod reconcile_rooms;
mod send_message;

pub use error::{JoinRoomError, ManageRoomsError, ReconcileError, SendMessageError};
pub use get_messages::GetMessagesUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use manage_rooms::{ManageRoomsUseCase, NewRoom, RoomWithPresence};
pub use reconcile_rooms::ReconcileRoomsUseCase;
pub use send_message::{ChatSubmission, SendMessageUseCase};
