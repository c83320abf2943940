//! UseCase: accept one chat frame from a connection.
//!
//! Order matters: the credential is checked first, then the target room, then
//! the message is persisted, and only the stored record is handed to the hub.
//! A failure at any step leaves every later step untouched.

use std::sync::Arc;

use crate::domain::{
    AuthClaims, AuthError, Authenticator, MessageDraft, MessageRepository, StoredMessage,
};
use crate::infrastructure::hub::{Connection, RoomHub};

use super::error::SendMessageError;

/// Decoded chat frame as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSubmission {
    /// Empty means the connection's own room
    pub room_id: String,
    pub username: String,
    pub user_id: String,
    pub content: String,
    /// Already trimmed; `None` when absent or blank
    pub token: Option<String>,
}

pub struct SendMessageUseCase {
    message_repository: Arc<dyn MessageRepository>,
    authenticator: Arc<dyn Authenticator>,
    require_token: bool,
}

impl SendMessageUseCase {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        authenticator: Arc<dyn Authenticator>,
        require_token: bool,
    ) -> Self {
        Self {
            message_repository,
            authenticator,
            require_token,
        }
    }

    /// Verify, persist and enqueue one submission.
    ///
    /// Any error means the connection should be terminated.
    pub async fn execute(
        &self,
        hub: &RoomHub,
        connection: &Connection,
        submission: ChatSubmission,
    ) -> Result<StoredMessage, SendMessageError> {
        let ChatSubmission {
            room_id,
            mut username,
            mut user_id,
            content,
            token,
        } = submission;

        if let Some(claims) = self.authenticate(connection, token.as_deref()).await? {
            if !username.is_empty() && username != claims.username {
                return Err(AuthError::IdentityMismatch(username).into());
            }
            if username.is_empty() {
                username = claims.username;
            }
            if user_id.is_empty() {
                user_id = claims.user_id;
            }
        }

        if !room_id.is_empty() && room_id != connection.room_id().as_str() {
            return Err(SendMessageError::RoomMismatch {
                expected: connection.room_id().to_string(),
                actual: room_id,
            });
        }

        let stored = self
            .message_repository
            .create_message(MessageDraft {
                room_id: connection.room_id().clone(),
                username,
                user_id,
                content,
            })
            .await?;

        hub.enqueue(stored.clone()).await?;
        tracing::debug!(
            room_id = %stored.room_id,
            connection_id = %connection.id(),
            message_id = stored.id.as_str(),
            "Message accepted"
        );
        Ok(stored)
    }

    /// Claims of the submission's credential, or of the connection's earlier one.
    async fn authenticate(
        &self,
        connection: &Connection,
        token: Option<&str>,
    ) -> Result<Option<AuthClaims>, AuthError> {
        match token {
            Some(token) => {
                let claims = self.authenticator.verify(token).await?;
                connection.set_identity(claims.clone()).await;
                Ok(Some(claims))
            }
            None if self.require_token => Err(AuthError::MissingToken),
            None => Ok(connection.identity().await),
        }
    }
}
