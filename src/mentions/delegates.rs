use crate::api::contract::ChatApi;
use crate::mentions::schemas::{MentionQuery, MentionSpan, MentionSuggestion, PendingMention};

// Suggestions are live only while the token containing the caret starts
// with `@` and carries at least one query character after it.
pub fn active_query(text: &str, caret: usize) -> Option<MentionQuery> {
    let caret = caret.min(text.len());
    if !text.is_char_boundary(caret) {
        return None;
    }

    let start = text[..caret]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let end = text[caret..]
        .find(char::is_whitespace)
        .map(|offset| caret + offset)
        .unwrap_or(text.len());

    let token = &text[start..end];
    let query = token.strip_prefix('@')?;
    if query.is_empty() {
        return None;
    }

    Some(MentionQuery {
        span: MentionSpan { start, end },
        query: query.to_string(),
    })
}

// Replaces exactly the tracked span with `@{name} ` (trailing space) and
// reports the new caret plus the mention record to buffer for send.
pub fn apply_suggestion(
    text: &str,
    span: MentionSpan,
    suggestion: &MentionSuggestion,
) -> (String, usize, PendingMention) {
    let replacement = format!("@{} ", suggestion.name);

    let mut rewritten = String::with_capacity(text.len() + replacement.len());
    rewritten.push_str(&text[..span.start]);
    rewritten.push_str(&replacement);
    rewritten.push_str(&text[span.end..]);

    let caret = span.start + replacement.len();

    let pending = PendingMention {
        kind: suggestion.kind,
        target_id: suggestion.id.clone(),
        text: format!("@{}", suggestion.name),
    };

    (rewritten, caret, pending)
}

// lookup failures only suppress the popup, never surfaced to the user
pub async fn suggestions_for_caret(
    api: &dyn ChatApi,
    text: &str,
    caret: usize,
) -> Vec<MentionSuggestion> {
    let Some(active) = active_query(text, caret) else {
        return Vec::new();
    };

    match api.search_mentions(&active.query).await {
        Ok(results) => results,
        Err(err) => {
            tracing::debug!(target: "best_effort", query = %active.query, error = %err, "mention lookup failed");
            Vec::new()
        }
    }
}
