use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::api::contract::ChatApi;
use crate::chat::schemas::{EDIT_WINDOW_SECS, Message, Reaction, ReactionAggregate};

// List order is whatever the fetch returned; every mutation lands on the
// whole list before the next render can observe it.
#[derive(Debug, Default)]
pub struct MessageTimeline {
    messages: Vec<Message>,
}

impl MessageTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn replace_all(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn replace_by_id(&mut self, message: Message) -> bool {
        match self.messages.iter_mut().find(|m| m.id == message.id) {
            Some(slot) => {
                *slot = message;
                true
            }
            None => false,
        }
    }

    pub fn remove_by_id(&mut self, message_id: &str) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != message_id);
        self.messages.len() != before
    }

    // React, then re-fetch server truth. If the re-fetch fails after the
    // reaction was accepted, patch the raw reaction in locally so the
    // user's own reaction is never missing from the display.
    pub async fn add_reaction(
        &mut self,
        api: &dyn ChatApi,
        conversation_id: &str,
        current_user_id: &str,
        message_id: &str,
        emoji: &str,
    ) {
        if let Err(err) = api.add_reaction(message_id, emoji).await {
            tracing::warn!(target: "best_effort", %message_id, error = %err, "reaction add failed");
            return;
        }

        match api.fetch_messages(conversation_id).await {
            Ok(messages) => self.messages = messages,
            Err(err) => {
                tracing::warn!(target: "best_effort", %conversation_id, error = %err, "reaction refresh failed");
                if let Some(message) = self.messages.iter_mut().find(|m| m.id == message_id) {
                    message.reactions.push(Reaction {
                        emoji: emoji.to_string(),
                        user_id: current_user_id.to_string(),
                        message_id: message_id.to_string(),
                    });
                }
            }
        }
    }
}

// Counts and flags do not depend on input order; emojis keep
// first-appearance order.
pub fn group_reactions(reactions: &[Reaction], current_user_id: &str) -> Vec<ReactionAggregate> {
    let mut aggregates: Vec<ReactionAggregate> = Vec::new();

    for reaction in reactions {
        let has_reacted = reaction.user_id == current_user_id;
        match aggregates.iter_mut().find(|a| a.emoji == reaction.emoji) {
            Some(aggregate) => {
                aggregate.count += 1;
                aggregate.has_reacted |= has_reacted;
            }
            None => aggregates.push(ReactionAggregate {
                emoji: reaction.emoji.clone(),
                count: 1,
                has_reacted,
            }),
        }
    }

    aggregates
}

// Calendar dates compared in the viewer's timezone, not UTC.
pub fn needs_date_separator<Tz: TimeZone>(
    previous: Option<&Message>,
    message: &Message,
    tz: &Tz,
) -> bool {
    match previous {
        None => true,
        Some(previous) => {
            previous.created_at.with_timezone(tz).date_naive()
                != message.created_at.with_timezone(tz).date_naive()
        }
    }
}

// Client-side convenience gate only; the server may still refuse (clock
// skew). Inclusive at exactly the window boundary.
pub fn can_edit_or_delete(message: &Message, current_user_id: &str, now: DateTime<Utc>) -> bool {
    message.sender_id == current_user_id
        && now.signed_duration_since(message.created_at) <= Duration::seconds(EDIT_WINDOW_SECS)
}
