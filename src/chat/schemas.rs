use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const EDIT_WINDOW_SECS: i64 = 15 * 60;
pub const MAX_MESSAGE_LENGTH: usize = 4000;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Image,
    ItemShare,
    Voice,
    File,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Video,
    Audio,
    File,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Attachment {
    pub kind: AttachmentKind,
    pub file_url: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Reaction {
    pub emoji: String,
    pub user_id: String,
    pub message_id: String,
}

// derived from the raw reaction list on every render pass, never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionAggregate {
    pub emoji: String,
    pub count: usize,
    pub has_reacted: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MentionKind {
    User,
    Brand,
    Club,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Mention {
    pub kind: MentionKind,
    pub target_id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub content: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
}

impl Message {
    pub fn is_valid_voice(&self) -> bool {
        self.kind == MessageKind::Voice
            && self.content.is_empty()
            && self.attachments.len() == 1
            && self.attachments[0].kind == AttachmentKind::Audio
    }

    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Participant {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EntityPage {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "conversation_type", rename_all = "snake_case")]
pub enum ConversationKind {
    Direct { other: Participant },
    Entity { entity: EntityPage },
    Group { name: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Conversation {
    pub id: String,
    #[serde(flatten)]
    pub kind: ConversationKind,
    pub created_at: DateTime<Utc>,
}

// resolved once at fetch time instead of branching on the conversation
// type at every render site
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationDisplay {
    pub title: String,
    pub avatar_url: Option<String>,
}

impl Conversation {
    pub fn display(&self) -> ConversationDisplay {
        match &self.kind {
            ConversationKind::Direct { other } => ConversationDisplay {
                title: other.display_name.clone(),
                avatar_url: other.avatar_url.clone(),
            },
            ConversationKind::Entity { entity } => ConversationDisplay {
                title: entity.name.clone(),
                avatar_url: entity.logo_url.clone(),
            },
            ConversationKind::Group { name } => ConversationDisplay {
                title: name.clone(),
                avatar_url: None,
            },
        }
    }

    pub fn canonical_handle(&self) -> Option<&str> {
        match &self.kind {
            ConversationKind::Direct { other } => Some(&other.username),
            ConversationKind::Entity { entity } => Some(&entity.slug),
            ConversationKind::Group { .. } => None,
        }
    }
}
