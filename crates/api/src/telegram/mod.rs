//! Telegram Bot API implementation of the chat transport.

pub mod types;

use crate::transport::{self, Prompt, Transport};
use model::{ChatId, MessageId, RawQuiz};
use serde::{
    de::{DeserializeOwned, IgnoredAny},
    Deserialize, Serialize,
};
use serde_json::json;
use types::{InputPollOption, Message, SendPoll};

#[derive(Deserialize)]
struct Reply<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

pub struct Telegram {
    http: reqwest::Client,
    /// Method prefix, including the bot token.
    endpoint: Box<str>,
}

impl Telegram {
    pub fn new(token: &str) -> Self {
        let endpoint = format!("https://api.telegram.org/bot{token}/").into_boxed_str();
        Self { http: reqwest::Client::new(), endpoint }
    }

    /// Subscribes the bot to `message` and `poll` updates delivered to `url`.
    pub async fn set_webhook(&self, url: &str, secret: Option<&str>) -> transport::Result<()> {
        let mut body = json!({ "url": url, "allowed_updates": ["message", "poll"] });
        if let Some(secret) = secret {
            body["secret_token"] = json!(secret);
        }
        let _: bool = self.call("setWebhook", &body).await?;
        log::info!("webhook registered");
        Ok(())
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> transport::Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let url = [self.endpoint.as_ref(), method].concat();
        // Strip the URL from errors so that the token never reaches the logs.
        let response = self.http.post(url).json(body).send().await.map_err(|err| {
            log::error!("`{method}` request failed: {}", err.without_url());
            transport::Error::Network
        })?;

        let Reply { ok, result, description } = response.json::<Reply<R>>().await.map_err(|err| {
            log::error!("`{method}` reply is malformed: {}", err.without_url());
            transport::Error::Schema
        })?;

        match (ok, result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(transport::Error::Schema),
            (false, _) => {
                let reason = description.unwrap_or_default();
                log::warn!("`{method}` rejected: {reason}");
                Err(transport::Error::Rejected(reason.into_boxed_str()))
            }
        }
    }

    fn poll<'a>(chat: ChatId, quiz: &'a RawQuiz) -> SendPoll<'a> {
        SendPoll {
            chat_id: chat,
            question: &quiz.question,
            options: quiz.options.iter().map(|text| InputPollOption { text }).collect(),
            kind: "quiz",
            correct_option_id: quiz.correct_option_index,
            explanation: quiz.explanation.as_deref(),
            open_period: None,
            is_closed: false,
            reply_to_message_id: None,
            reply_markup: None,
        }
    }
}

impl Transport for Telegram {
    async fn create_prompt(&self, chat: ChatId, quiz: &RawQuiz, open_period: u16) -> transport::Result<Prompt> {
        let body = SendPoll { open_period: Some(open_period), ..Self::poll(chat, quiz) };
        let Message { message_id, poll, .. } = self.call("sendPoll", &body).await?;
        let poll = poll.ok_or(transport::Error::Schema)?;
        Ok(Prompt { poll: poll.id.into_boxed_str(), message: message_id })
    }

    async fn close_prompt(&self, chat: ChatId, message: MessageId) -> transport::Result<()> {
        let body = json!({ "chat_id": chat, "message_id": message });
        let _: IgnoredAny = self.call("stopPoll", &body).await?;
        Ok(())
    }

    async fn send_text(&self, chat: ChatId, text: &str) -> transport::Result<()> {
        let body = json!({ "chat_id": chat, "text": text });
        let _: IgnoredAny = self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn send_photo(&self, chat: ChatId, image: &str) -> transport::Result<()> {
        let body = json!({ "chat_id": chat, "photo": image });
        let _: IgnoredAny = self.call("sendPhoto", &body).await?;
        Ok(())
    }

    async fn send_preview(&self, chat: ChatId, reply_to: MessageId, quiz: &RawQuiz) -> transport::Result<()> {
        let body = SendPoll {
            is_closed: true,
            reply_to_message_id: Some(reply_to),
            reply_markup: Some(json!({ "remove_keyboard": true })),
            ..Self::poll(chat, quiz)
        };
        let _: IgnoredAny = self.call("sendPoll", &body).await?;
        Ok(())
    }

    async fn request_submission(&self, chat: ChatId) -> transport::Result<()> {
        let body = json!({
            "chat_id": chat,
            "text": "Press the button to compose a new quiz.",
            "reply_markup": {
                "keyboard": [[{ "text": "Create a quiz", "request_poll": { "type": "quiz" } }]],
                "one_time_keyboard": true,
                "resize_keyboard": true,
            },
        });
        let _: IgnoredAny = self.call("sendMessage", &body).await?;
        Ok(())
    }
}
