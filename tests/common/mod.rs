#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use threadline::ChatApi;
use threadline::api::contract::{CurrentUser, UploadedMedia};
use threadline::apex::utils::{ChatError, ChatResult};
use threadline::chat::schemas::{
    Attachment, AttachmentKind, Conversation, ConversationKind, Mention, Message, MessageKind,
    Participant, Reaction,
};
use threadline::mentions::schemas::MentionSuggestion;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    FetchConversation(String),
    FetchMessages(String),
    SendMessage {
        conversation_id: String,
        content: String,
        kind: MessageKind,
        reply_to: Option<String>,
        attachments: Vec<Attachment>,
        mentions: Vec<Mention>,
    },
    EditMessage {
        message_id: String,
        content: String,
    },
    DeleteMessage(String),
    AddReaction {
        message_id: String,
        emoji: String,
    },
    UploadMedia {
        file_name: String,
        mime_type: String,
    },
    MarkRead(String),
    FetchCurrentUser,
    SearchMentions(String),
}

/// Scriptable in-memory collaborator. Records every call and keeps a
/// message store so re-fetches observe the effects of earlier calls.
pub struct FakeChatApi {
    pub calls: Mutex<Vec<ApiCall>>,
    pub conversation: Mutex<Conversation>,
    pub messages: Mutex<Vec<Message>>,
    pub current_user: CurrentUser,
    pub suggestions: Mutex<Vec<MentionSuggestion>>,
    pub fail_send: AtomicBool,
    pub fail_edit: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_reaction: AtomicBool,
    pub fail_fetch_messages: AtomicBool,
    pub fail_mark_read: AtomicBool,
    pub failing_uploads: Mutex<HashSet<String>>,
    next_message_id: AtomicU64,
}

impl FakeChatApi {
    pub fn new(conversation: Conversation, current_user: CurrentUser) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            conversation: Mutex::new(conversation),
            messages: Mutex::new(Vec::new()),
            current_user,
            suggestions: Mutex::new(Vec::new()),
            fail_send: AtomicBool::new(false),
            fail_edit: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
            fail_reaction: AtomicBool::new(false),
            fail_fetch_messages: AtomicBool::new(false),
            fail_mark_read: AtomicBool::new(false),
            failing_uploads: Mutex::new(HashSet::new()),
            next_message_id: AtomicU64::new(99),
        }
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seed_messages(&self, messages: Vec<Message>) {
        *self.messages.lock().unwrap() = messages;
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChatApi for FakeChatApi {
    async fn fetch_conversation(&self, conversation_id: &str) -> ChatResult<Conversation> {
        self.record(ApiCall::FetchConversation(conversation_id.to_string()));
        Ok(self.conversation.lock().unwrap().clone())
    }

    async fn fetch_messages(&self, conversation_id: &str) -> ChatResult<Vec<Message>> {
        self.record(ApiCall::FetchMessages(conversation_id.to_string()));
        if self.fail_fetch_messages.load(Ordering::SeqCst) {
            return Err(ChatError::api(500, "messages unavailable"));
        }
        Ok(self.messages.lock().unwrap().clone())
    }

    async fn send_message(
        &self,
        conversation_id: &str,
        content: &str,
        kind: MessageKind,
        reply_to: Option<&str>,
        attachments: &[Attachment],
        mentions: &[Mention],
    ) -> ChatResult<Message> {
        self.record(ApiCall::SendMessage {
            conversation_id: conversation_id.to_string(),
            content: content.to_string(),
            kind,
            reply_to: reply_to.map(str::to_string),
            attachments: attachments.to_vec(),
            mentions: mentions.to_vec(),
        });

        if self.fail_send.load(Ordering::SeqCst) {
            return Err(ChatError::api(500, "send refused"));
        }

        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        let message = Message {
            id: format!("M{}", id),
            conversation_id: conversation_id.to_string(),
            sender_id: self.current_user.id.clone(),
            content: content.to_string(),
            kind,
            created_at: Utc::now(),
            edited_at: None,
            attachments: attachments.to_vec(),
            reactions: Vec::new(),
            mentions: mentions.to_vec(),
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn edit_message(&self, message_id: &str, new_content: &str) -> ChatResult<Message> {
        self.record(ApiCall::EditMessage {
            message_id: message_id.to_string(),
            content: new_content.to_string(),
        });

        if self.fail_edit.load(Ordering::SeqCst) {
            return Err(ChatError::api(403, "the edit window has closed"));
        }

        let mut messages = self.messages.lock().unwrap();
        let Some(message) = messages.iter_mut().find(|m| m.id == message_id) else {
            return Err(ChatError::api(404, "message not found"));
        };
        message.content = new_content.to_string();
        message.edited_at = Some(Utc::now());
        Ok(message.clone())
    }

    async fn delete_message(&self, message_id: &str) -> ChatResult<()> {
        self.record(ApiCall::DeleteMessage(message_id.to_string()));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ChatError::EditWindowExpired);
        }
        self.messages.lock().unwrap().retain(|m| m.id != message_id);
        Ok(())
    }

    async fn add_reaction(&self, message_id: &str, emoji: &str) -> ChatResult<()> {
        self.record(ApiCall::AddReaction {
            message_id: message_id.to_string(),
            emoji: emoji.to_string(),
        });

        if self.fail_reaction.load(Ordering::SeqCst) {
            return Err(ChatError::api(500, "reaction refused"));
        }

        let mut messages = self.messages.lock().unwrap();
        if let Some(message) = messages.iter_mut().find(|m| m.id == message_id) {
            message.reactions.push(Reaction {
                emoji: emoji.to_string(),
                user_id: self.current_user.id.clone(),
                message_id: message_id.to_string(),
            });
        }
        Ok(())
    }

    async fn upload_media(
        &self,
        file_name: &str,
        mime_type: &str,
        _data: Bytes,
    ) -> ChatResult<UploadedMedia> {
        self.record(ApiCall::UploadMedia {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
        });

        if self.failing_uploads.lock().unwrap().contains(file_name) {
            return Err(ChatError::api(500, "storage rejected the file"));
        }

        Ok(UploadedMedia {
            url: format!("https://cdn.threadline.test/{}", file_name),
            thumbnail_url: mime_type
                .starts_with("image/")
                .then(|| format!("https://cdn.threadline.test/thumbs/{}", file_name)),
        })
    }

    async fn mark_conversation_read(&self, conversation_id: &str) -> ChatResult<()> {
        self.record(ApiCall::MarkRead(conversation_id.to_string()));
        if self.fail_mark_read.load(Ordering::SeqCst) {
            return Err(ChatError::api(500, "read receipt refused"));
        }
        Ok(())
    }

    async fn fetch_current_user(&self) -> ChatResult<CurrentUser> {
        self.record(ApiCall::FetchCurrentUser);
        Ok(self.current_user.clone())
    }

    async fn search_mentions(&self, query: &str) -> ChatResult<Vec<MentionSuggestion>> {
        self.record(ApiCall::SearchMentions(query.to_string()));
        let query = query.to_lowercase();
        Ok(self
            .suggestions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&query))
            .cloned()
            .collect())
    }
}

pub fn user(id: &str, username: &str) -> CurrentUser {
    CurrentUser {
        id: id.to_string(),
        username: username.to_string(),
    }
}

pub fn direct_conversation(id: &str, other_username: &str) -> Conversation {
    Conversation {
        id: id.to_string(),
        kind: ConversationKind::Direct {
            other: Participant {
                id: format!("{}-other", id),
                username: other_username.to_string(),
                display_name: other_username.to_string(),
                avatar_url: None,
            },
        },
        created_at: Utc::now(),
    }
}

pub fn group_conversation(id: &str, name: &str) -> Conversation {
    Conversation {
        id: id.to_string(),
        kind: ConversationKind::Group {
            name: name.to_string(),
        },
        created_at: Utc::now(),
    }
}

pub fn text_message(
    id: &str,
    conversation_id: &str,
    sender_id: &str,
    content: &str,
    created_at: DateTime<Utc>,
) -> Message {
    Message {
        id: id.to_string(),
        conversation_id: conversation_id.to_string(),
        sender_id: sender_id.to_string(),
        content: content.to_string(),
        kind: MessageKind::Text,
        created_at,
        edited_at: None,
        attachments: Vec::new(),
        reactions: Vec::new(),
        mentions: Vec::new(),
    }
}

pub fn attachment(kind: AttachmentKind, file_name: &str, mime_type: &str) -> Attachment {
    Attachment {
        kind,
        file_url: format!("https://cdn.threadline.test/{}", file_name),
        file_name: file_name.to_string(),
        file_size: 1024,
        mime_type: mime_type.to_string(),
        thumbnail_url: None,
    }
}
