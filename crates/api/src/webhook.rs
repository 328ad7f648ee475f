use crate::{bot::Bot, telegram::types::Update, transport::Transport};
use db::Repository;
use http_body_util::{BodyExt, Full};
use hyper::{
    body::{Body, Bytes},
    Method, Request, Response, StatusCode,
};

/// Header echoing the secret registered alongside the webhook.
const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

pub async fn try_respond<B, R, T>(
    req: Request<B>,
    secret: Option<&str>,
    bot: &Bot<R, T>,
) -> Result<Response<Full<Bytes>>, StatusCode>
where
    B: Body,
    R: Repository,
    T: Transport,
{
    if req.method() != Method::POST {
        return Err(StatusCode::METHOD_NOT_ALLOWED);
    }

    // Validate the shared secret
    if let Some(secret) = secret {
        let token = req.headers().get(SECRET_HEADER).ok_or(StatusCode::UNAUTHORIZED)?;
        if token.as_bytes() != secret.as_bytes() {
            return Err(StatusCode::UNAUTHORIZED);
        }
    }

    let payload = req.into_body().collect().await.map_err(|_| StatusCode::BAD_REQUEST)?.to_bytes();
    let update: Update = serde_json::from_slice(&payload).map_err(|err| {
        log::warn!("malformed update: {err}");
        StatusCode::BAD_REQUEST
    })?;
    drop(payload);

    let id = update.update_id;
    match update.into_event() {
        Some(event) => bot.on_event(event).await,
        None => log::debug!("ignored update {id}"),
    }

    Ok(Response::new(Full::default()))
}

/// Like [`try_respond`], but failures become empty responses with the corresponding status.
pub async fn respond<B, R, T>(req: Request<B>, secret: Option<&str>, bot: &Bot<R, T>) -> Response<Full<Bytes>>
where
    B: Body,
    R: Repository,
    T: Transport,
{
    try_respond(req, secret, bot).await.unwrap_or_else(|code| {
        let mut res = Response::new(Full::default());
        *res.status_mut() = code;
        res
    })
}

#[cfg(test)]
mod tests {
    use super::{respond, SECRET_HEADER};
    use crate::{
        bot::{Bot, Config},
        transport::{self, Prompt, Transport},
    };
    use core::num::NonZeroU16;
    use db::Memory;
    use http_body_util::Full;
    use hyper::{body::Bytes, Method, Request, StatusCode};
    use model::{ChatId, MessageId, RawQuiz};

    /// Transport that accepts everything except new prompts.
    struct Sink;

    impl Transport for Sink {
        async fn create_prompt(&self, _: ChatId, _: &RawQuiz, _: u16) -> transport::Result<Prompt> {
            Err(transport::Error::Network)
        }

        async fn close_prompt(&self, _: ChatId, _: MessageId) -> transport::Result<()> {
            Ok(())
        }

        async fn send_text(&self, _: ChatId, _: &str) -> transport::Result<()> {
            Ok(())
        }

        async fn send_photo(&self, _: ChatId, _: &str) -> transport::Result<()> {
            Ok(())
        }

        async fn send_preview(&self, _: ChatId, _: MessageId, _: &RawQuiz) -> transport::Result<()> {
            Ok(())
        }

        async fn request_submission(&self, _: ChatId) -> transport::Result<()> {
            Ok(())
        }
    }

    fn bot() -> Bot<Memory, Sink> {
        let config = Config { session_length: NonZeroU16::new(5).unwrap(), open_period: 20 };
        Bot::new(Memory::default(), Sink, config)
    }

    fn request(method: Method, token: Option<&str>, body: &'static str) -> Request<Full<Bytes>> {
        let mut builder = Request::builder().method(method).uri("/");
        if let Some(token) = token {
            builder = builder.header(SECRET_HEADER, token);
        }
        builder.body(Full::new(Bytes::from_static(body.as_bytes()))).unwrap()
    }

    const HELP: &str = r#"{"update_id":1,"message":{"message_id":2,"chat":{"id":3},"text":"/help"}}"#;

    #[tokio::test(flavor = "current_thread")]
    async fn accepts_authentic_updates() {
        let bot = bot();
        let res = respond(request(Method::POST, Some("hunter2"), HELP), Some("hunter2"), &bot).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = respond(request(Method::POST, None, r#"{"update_id":9}"#), None, &bot).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rejects_bad_requests() {
        let bot = bot();
        let res = respond(request(Method::GET, Some("hunter2"), HELP), Some("hunter2"), &bot).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

        let res = respond(request(Method::POST, None, HELP), Some("hunter2"), &bot).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = respond(request(Method::POST, Some("hunter3"), HELP), Some("hunter2"), &bot).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = respond(request(Method::POST, None, "{"), None, &bot).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failures_do_not_fail_the_delivery() {
        let bot = bot();
        let start = r#"{"update_id":4,"message":{"message_id":5,"chat":{"id":3},"text":"/quiz"}}"#;
        let res = respond(request(Method::POST, None, start), None, &bot).await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}
