use serde::{Deserialize, Serialize};

use crate::chat::schemas::{Mention, MentionKind};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MentionSuggestion {
    pub id: String,
    pub kind: MentionKind,
    pub name: String,
}

// Byte offsets of the in-progress `@token`, tracked explicitly so applying
// a suggestion replaces the token it was offered for, never a lookalike
// elsewhere in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MentionQuery {
    pub span: MentionSpan,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingMention {
    pub kind: MentionKind,
    pub target_id: String,
    pub text: String,
}

impl PendingMention {
    pub fn into_mention(self) -> Mention {
        Mention {
            kind: self.kind,
            target_id: self.target_id,
            text: self.text,
        }
    }
}
