use std::mem::take;

use crate::api::contract::ChatApi;
use crate::apex::utils::{ChatError, ChatResult};
use crate::chat::schemas::{
    Attachment, AttachmentKind, MAX_MESSAGE_LENGTH, Mention, MessageKind,
};
use crate::chat::timeline::MessageTimeline;
use crate::mentions::schemas::PendingMention;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    // preconditions failed, no collaborator call made
    Skipped,
    // send refused, composer state restored for retry
    Failed,
}

// Submit clears the visible state before the round trip completes and
// restores it verbatim when the send fails.
pub struct MessageComposer {
    conversation_id: String,
    draft: String,
    pending_attachments: Vec<Attachment>,
    pending_mentions: Vec<PendingMention>,
    pending_voice: Option<Attachment>,
    sending: bool,
    editing_message_id: Option<String>,
    pending_delete: Option<String>,
    wants_focus: bool,
}

impl MessageComposer {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            draft: String::new(),
            pending_attachments: Vec::new(),
            pending_mentions: Vec::new(),
            pending_voice: None,
            sending: false,
            editing_message_id: None,
            pending_delete: None,
            wants_focus: false,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn pending_attachments(&self) -> &[Attachment] {
        &self.pending_attachments
    }

    pub fn push_attachment(&mut self, attachment: Attachment) {
        self.pending_attachments.push(attachment);
    }

    // local splice only, no server call
    pub fn remove_attachment(&mut self, index: usize) -> Option<Attachment> {
        if index < self.pending_attachments.len() {
            Some(self.pending_attachments.remove(index))
        } else {
            None
        }
    }

    pub fn pending_mentions(&self) -> &[PendingMention] {
        &self.pending_mentions
    }

    pub fn push_mention(&mut self, mention: PendingMention) {
        self.pending_mentions.push(mention);
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    // true once after a submit settles so the view can refocus the input
    pub fn take_focus_request(&mut self) -> bool {
        take(&mut self.wants_focus)
    }

    pub async fn submit(
        &mut self,
        api: &dyn ChatApi,
        timeline: &mut MessageTimeline,
    ) -> SubmitOutcome {
        let content = self.draft.trim().to_string();
        if (content.is_empty() && self.pending_attachments.is_empty()) || self.sending {
            return SubmitOutcome::Skipped;
        }
        if content.len() > MAX_MESSAGE_LENGTH {
            tracing::debug!(
                conversation_id = %self.conversation_id,
                length = content.len(),
                "draft over message length limit, not sending"
            );
            return SubmitOutcome::Skipped;
        }

        let draft_backup = take(&mut self.draft);
        let attachments = take(&mut self.pending_attachments);
        let mentions = take(&mut self.pending_mentions);
        self.sending = true;

        let kind = outgoing_kind(&content, &attachments);
        let outgoing_mentions: Vec<Mention> = mentions
            .iter()
            .cloned()
            .map(PendingMention::into_mention)
            .collect();

        let result = api
            .send_message(
                &self.conversation_id,
                &content,
                kind,
                None,
                &attachments,
                &outgoing_mentions,
            )
            .await;

        self.sending = false;
        self.wants_focus = true;

        match result {
            Ok(message) => {
                timeline.append(message);
                SubmitOutcome::Sent
            }
            Err(err) => {
                tracing::error!(
                    conversation_id = %self.conversation_id,
                    error = %err,
                    "message send failed, composer state restored"
                );
                self.draft = draft_backup;
                self.pending_attachments = attachments;
                self.pending_mentions = mentions;
                SubmitOutcome::Failed
            }
        }
    }

    // Voice path: the recording goes through the media pipeline first,
    // then out as a `voice` message with empty content and the single
    // audio attachment. A failed send keeps the uploaded attachment so
    // retrying never re-records or re-uploads.
    pub async fn send_voice(
        &mut self,
        api: &dyn ChatApi,
        timeline: &mut MessageTimeline,
        attachment: Attachment,
    ) -> SubmitOutcome {
        if self.sending || attachment.kind != AttachmentKind::Audio {
            return SubmitOutcome::Skipped;
        }

        self.sending = true;
        let result = api
            .send_message(
                &self.conversation_id,
                "",
                MessageKind::Voice,
                None,
                std::slice::from_ref(&attachment),
                &[],
            )
            .await;
        self.sending = false;
        self.wants_focus = true;

        match result {
            Ok(message) => {
                self.pending_voice = None;
                timeline.append(message);
                SubmitOutcome::Sent
            }
            Err(err) => {
                tracing::error!(
                    conversation_id = %self.conversation_id,
                    error = %err,
                    "voice message send failed, recording kept for retry"
                );
                self.pending_voice = Some(attachment);
                SubmitOutcome::Failed
            }
        }
    }

    pub fn pending_voice(&self) -> Option<&Attachment> {
        self.pending_voice.as_ref()
    }

    pub async fn retry_voice(
        &mut self,
        api: &dyn ChatApi,
        timeline: &mut MessageTimeline,
    ) -> SubmitOutcome {
        match self.pending_voice.take() {
            Some(attachment) => self.send_voice(api, timeline, attachment).await,
            None => SubmitOutcome::Skipped,
        }
    }

    pub fn editing_message_id(&self) -> Option<&str> {
        self.editing_message_id.as_deref()
    }

    // one edit target at a time
    pub fn begin_edit(&mut self, message_id: impl Into<String>) {
        self.editing_message_id = Some(message_id.into());
    }

    pub fn cancel_edit(&mut self) {
        self.editing_message_id = None;
    }

    // on failure the editor stays open so the user can retry
    pub async fn submit_edit(
        &mut self,
        api: &dyn ChatApi,
        timeline: &mut MessageTimeline,
        new_content: &str,
    ) -> ChatResult<()> {
        let Some(message_id) = self.editing_message_id.clone() else {
            return Ok(());
        };

        let updated = api.edit_message(&message_id, new_content).await?;
        timeline.replace_by_id(updated);
        self.editing_message_id = None;
        Ok(())
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    // staged behind the confirmation modal
    pub fn request_delete(&mut self, message_id: impl Into<String>) {
        self.pending_delete = Some(message_id.into());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub async fn confirm_delete(
        &mut self,
        api: &dyn ChatApi,
        timeline: &mut MessageTimeline,
    ) -> ChatResult<()> {
        let Some(message_id) = self.pending_delete.take() else {
            return Ok(());
        };

        match api.delete_message(&message_id).await {
            Ok(()) => {
                timeline.remove_by_id(&message_id);
                Ok(())
            }
            Err(ChatError::Api { status: 403, .. }) => Err(ChatError::EditWindowExpired),
            Err(err) => Err(err),
        }
    }
}

// Attachment-only with an image first in line becomes `image`,
// attachment-only otherwise `file`, anything with text is `text`.
fn outgoing_kind(content: &str, attachments: &[Attachment]) -> MessageKind {
    if content.is_empty() {
        match attachments.first() {
            Some(first) if first.kind == AttachmentKind::Image => MessageKind::Image,
            Some(_) => MessageKind::File,
            None => MessageKind::Text,
        }
    } else {
        MessageKind::Text
    }
}
