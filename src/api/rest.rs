use async_trait::async_trait;
use bytes::Bytes;
use dotenv::dotenv;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use std::{env::var, time::Duration};

use super::contract::{ChatApi, CurrentUser, UploadedMedia};
use crate::apex::utils::{ChatError, ChatResult};
use crate::chat::schemas::{Attachment, Conversation, Mention, Message, MessageKind};
use crate::mentions::schemas::MentionSuggestion;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_BASE_URL: &str = "https://api.threadline.app";

pub struct RestConfig {
    pub base_url: String,
    pub api_token: String,
}

impl RestConfig {
    pub fn from_env() -> ChatResult<Self> {
        dotenv().ok();

        let base_url =
            var("THREADLINE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_token = var("THREADLINE_API_TOKEN")
            .map_err(|_| ChatError::Config("THREADLINE_API_TOKEN must be set".to_string()))?;

        Ok(Self {
            base_url,
            api_token,
        })
    }
}

pub struct RestChatApi {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct ConversationBody {
    conversation: Conversation,
}

#[derive(Deserialize)]
struct MessagesBody {
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct MessageBody {
    message: Message,
}

#[derive(Deserialize)]
struct MediaBody {
    media: UploadedMedia,
}

#[derive(Deserialize)]
struct UserBody {
    user: CurrentUser,
}

#[derive(Deserialize)]
struct SuggestionsBody {
    results: Vec<MentionSuggestion>,
}

impl RestChatApi {
    pub fn new(config: RestConfig) -> ChatResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            api_token: config.api_token,
        })
    }

    pub fn from_env() -> ChatResult<Self> {
        Self::new(RestConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(&self.api_token)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .bearer_auth(&self.api_token)
    }

    async fn accept(&self, response: reqwest::Response) -> ChatResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Surface the server's own message verbatim; it is the authority on
        // why an action was refused.
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| format!("request failed with status {}", status));

        Err(ChatError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ChatApi for RestChatApi {
    async fn fetch_conversation(&self, conversation_id: &str) -> ChatResult<Conversation> {
        let response = self
            .get(&format!("/chat/conversations/{}", conversation_id))
            .send()
            .await?;
        let body: ConversationBody = self.accept(response).await?.json().await?;
        Ok(body.conversation)
    }

    async fn fetch_messages(&self, conversation_id: &str) -> ChatResult<Vec<Message>> {
        let response = self
            .get(&format!("/chat/conversations/{}/messages", conversation_id))
            .send()
            .await?;
        let body: MessagesBody = self.accept(response).await?.json().await?;
        Ok(body.messages)
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
        let response = self
            .post(&format!("/chat/conversations/{}/messages", conversation_id))
            .json(&json!({
                "content": content,
                "type": kind,
                "reply_to": reply_to,
                "attachments": attachments,
                "mentions": mentions,
            }))
            .send()
            .await?;
        let body: MessageBody = self.accept(response).await?.json().await?;
        Ok(body.message)
    }

    async fn edit_message(&self, message_id: &str, new_content: &str) -> ChatResult<Message> {
        let response = self
            .client
            .put(self.url(&format!("/chat/messages/{}/edit", message_id)))
            .bearer_auth(&self.api_token)
            .json(&json!({ "content": new_content }))
            .send()
            .await?;
        let body: MessageBody = self.accept(response).await?.json().await?;
        Ok(body.message)
    }

    async fn delete_message(&self, message_id: &str) -> ChatResult<()> {
        let response = self
            .client
            .delete(self.url(&format!("/chat/messages/{}", message_id)))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        match self.accept(response).await {
            Ok(_) => Ok(()),
            Err(ChatError::Api { status: 403, .. }) => Err(ChatError::EditWindowExpired),
            Err(err) => Err(err),
        }
    }

    async fn add_reaction(&self, message_id: &str, emoji: &str) -> ChatResult<()> {
        let response = self
            .post(&format!("/chat/messages/{}/reactions", message_id))
            .json(&json!({ "emoji": emoji }))
            .send()
            .await?;
        self.accept(response).await?;
        Ok(())
    }

    async fn upload_media(
        &self,
        file_name: &str,
        mime_type: &str,
        data: Bytes,
    ) -> ChatResult<UploadedMedia> {
        let file_part = Part::bytes(data.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|_| ChatError::Upload {
                file_name: file_name.to_string(),
                reason: format!("invalid mime type {}", mime_type),
            })?;

        let form = Form::new().part("file", file_part);

        let response = self
            .post("/media/upload")
            .multipart(form)
            .send()
            .await?;
        let body: MediaBody = self.accept(response).await?.json().await?;
        Ok(body.media)
    }

    async fn mark_conversation_read(&self, conversation_id: &str) -> ChatResult<()> {
        let response = self
            .post(&format!("/chat/conversations/{}/read", conversation_id))
            .send()
            .await?;
        self.accept(response).await?;
        Ok(())
    }

    async fn fetch_current_user(&self) -> ChatResult<CurrentUser> {
        let response = self.get("/auth/user").send().await?;
        let body: UserBody = self.accept(response).await?.json().await?;
        Ok(body.user)
    }

    async fn search_mentions(&self, query: &str) -> ChatResult<Vec<MentionSuggestion>> {
        let response = self
            .get("/chat/mentions/search")
            .query(&[("q", query)])
            .send()
            .await?;
        let body: SuggestionsBody = self.accept(response).await?.json().await?;
        Ok(body.results)
    }
}
