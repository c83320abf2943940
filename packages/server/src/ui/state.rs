//! Shared handler state.

use std::sync::Arc;

use crate::usecase::{
    GetMessagesUseCase, JoinRoomUseCase, LeaveRoomUseCase, ManageRoomsUseCase, SendMessageUseCase,
};

/// Use cases reachable from the HTTP and WebSocket handlers
pub struct AppState {
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub manage_rooms_usecase: Arc<ManageRoomsUseCase>,
    pub get_messages_usecase: Arc<GetMessagesUseCase>,
}
