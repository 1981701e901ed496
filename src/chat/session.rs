use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::contract::{ChatApi, CurrentUser};
use crate::apex::utils::{ChatError, ChatResult};
use crate::chat::composer::{MessageComposer, SubmitOutcome};
use crate::chat::schemas::{Conversation, ConversationDisplay, Message};
use crate::chat::timeline::{self, MessageTimeline};

// Page scroll stays suppressed while a conversation view is mounted; the
// guard releases on drop, including when the mount itself fails.
pub struct ScrollLock {
    suppressed: Arc<AtomicBool>,
}

impl ScrollLock {
    pub fn acquire(flag: Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { suppressed: flag }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.suppressed.store(false, Ordering::SeqCst);
    }
}

pub struct SessionMount {
    pub session: ConversationSession,
    // canonical path to replace the route with when reached via an opaque id
    pub redirect: Option<String>,
}

pub struct ConversationSession {
    api: Arc<dyn ChatApi>,
    pub conversation: Conversation,
    pub display: ConversationDisplay,
    pub current_user: CurrentUser,
    pub timeline: MessageTimeline,
    pub composer: MessageComposer,
    mark_read_task: Option<JoinHandle<()>>,
    _scroll_lock: ScrollLock,
}

impl ConversationSession {
    pub async fn mount(
        api: Arc<dyn ChatApi>,
        route_param: &str,
        scroll_flag: Arc<AtomicBool>,
    ) -> ChatResult<SessionMount> {
        let scroll_lock = ScrollLock::acquire(scroll_flag);

        let conversation_fut = async {
            let conversation = api.fetch_conversation(route_param).await?;

            // Mark-as-read fires as soon as metadata resolves and is never
            // awaited by the mount; failures only reach the log.
            let mark_api = Arc::clone(&api);
            let conversation_id = conversation.id.clone();
            let task = tokio::spawn(async move {
                if let Err(err) = mark_api.mark_conversation_read(&conversation_id).await {
                    tracing::warn!(
                        target: "best_effort",
                        conversation_id = %conversation_id,
                        error = %err,
                        "mark conversation read failed"
                    );
                }
            });

            Ok::<(Conversation, JoinHandle<()>), ChatError>((conversation, task))
        };

        let ((conversation, mark_read_task), messages, current_user) = futures::try_join!(
            conversation_fut,
            api.fetch_messages(route_param),
            api.fetch_current_user(),
        )?;

        let redirect = canonical_redirect(route_param, &conversation);
        let display = conversation.display();
        let composer = MessageComposer::new(conversation.id.clone());

        Ok(SessionMount {
            session: ConversationSession {
                api,
                conversation,
                display,
                current_user,
                timeline: MessageTimeline::from_messages(messages),
                composer,
                mark_read_task: Some(mark_read_task),
                _scroll_lock: scroll_lock,
            },
            redirect,
        })
    }

    pub async fn send_draft(&mut self) -> SubmitOutcome {
        let api = Arc::clone(&self.api);
        self.composer.submit(api.as_ref(), &mut self.timeline).await
    }

    pub async fn submit_edit(&mut self, new_content: &str) -> ChatResult<()> {
        let api = Arc::clone(&self.api);
        self.composer
            .submit_edit(api.as_ref(), &mut self.timeline, new_content)
            .await
    }

    pub async fn confirm_delete(&mut self) -> ChatResult<()> {
        let api = Arc::clone(&self.api);
        self.composer
            .confirm_delete(api.as_ref(), &mut self.timeline)
            .await
    }

    pub async fn add_reaction(&mut self, message_id: &str, emoji: &str) {
        let api = Arc::clone(&self.api);
        self.timeline
            .add_reaction(
                api.as_ref(),
                &self.conversation.id,
                &self.current_user.id,
                message_id,
                emoji,
            )
            .await
    }

    // re-fetches the message list and replaces it wholesale
    pub async fn refresh(&mut self) -> ChatResult<()> {
        let messages = self.api.fetch_messages(&self.conversation.id).await?;
        self.timeline.replace_all(messages);
        Ok(())
    }

    pub fn can_edit_or_delete(&self, message: &Message) -> bool {
        timeline::can_edit_or_delete(message, &self.current_user.id, Utc::now())
    }

    pub fn is_own(&self, message: &Message) -> bool {
        message.sender_id == self.current_user.id
    }

    // only needed by tests asserting the fire-and-forget happened
    pub async fn mark_read_settled(&mut self) {
        if let Some(task) = self.mark_read_task.take() {
            let _ = task.await;
        }
    }
}

// Idempotent: a handle never parses as a UUID, so re-running against the
// canonical route is a no-op.
pub fn canonical_redirect(route_param: &str, conversation: &Conversation) -> Option<String> {
    if Uuid::parse_str(route_param).is_err() {
        return None;
    }
    conversation
        .canonical_handle()
        .map(|handle| format!("/messages/{}", handle))
}
