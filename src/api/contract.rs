use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::apex::utils::ChatResult;
use crate::chat::schemas::{Attachment, Conversation, Mention, Message, MessageKind};
use crate::mentions::schemas::MentionSuggestion;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UploadedMedia {
    pub url: String,
    pub thumbnail_url: Option<String>,
}

// Boundary to the platform REST API, injected into the conversation view
// so tests can substitute a fake without module-level state.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn fetch_conversation(&self, conversation_id: &str) -> ChatResult<Conversation>;

    // chronological ascending; list order is render order
    async fn fetch_messages(&self, conversation_id: &str) -> ChatResult<Vec<Message>>;

    async fn send_message(
        &self,
        conversation_id: &str,
        content: &str,
        kind: MessageKind,
        reply_to: Option<&str>,
        attachments: &[Attachment],
        mentions: &[Mention],
    ) -> ChatResult<Message>;

    async fn edit_message(&self, message_id: &str, new_content: &str) -> ChatResult<Message>;

    // fails once the server-side edit window has elapsed
    async fn delete_message(&self, message_id: &str) -> ChatResult<()>;

    async fn add_reaction(&self, message_id: &str, emoji: &str) -> ChatResult<()>;

    async fn upload_media(
        &self,
        file_name: &str,
        mime_type: &str,
        data: Bytes,
    ) -> ChatResult<UploadedMedia>;

    async fn mark_conversation_read(&self, conversation_id: &str) -> ChatResult<()>;

    async fn fetch_current_user(&self) -> ChatResult<CurrentUser>;

    async fn search_mentions(&self, query: &str) -> ChatResult<Vec<MentionSuggestion>>;
}
