use anyhow::Context;
use api::{webhook, Bot, Config, Telegram};
use core::{num::NonZeroU16, pin::pin};
use db::{Database, NoTls};
use hyper::{server::conn::http1, service::service_fn};
use hyper_util::rt::TokioIo;
use std::{
    convert::Infallible,
    env,
    net::{Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tokio::{net::TcpListener, runtime::Runtime};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let port: u16 = env::var("PORT")?.parse()?;
    let token = env::var("BOT_TOKEN")?;
    let secret = env::var("WEBHOOK_SECRET").ok().map(Arc::<str>::from);
    let webhook_url = env::var("WEBHOOK_URL").ok();
    let session_length = env::var("QUIZ_PER_SESSION").map_or(Ok(5), |length| length.parse::<u16>())?;
    let session_length = NonZeroU16::new(session_length).context("QUIZ_PER_SESSION must be positive")?;
    let open_period = env::var("SECOND_PER_QUIZ").map_or(Ok(20), |seconds| seconds.parse::<u16>())?;

    let mut config = db::Config::new();
    config
        .user(env::var("PG_USERNAME")?.as_str())
        .password(env::var("PG_PASSWORD")?)
        .host(env::var("PG_HOSTNAME")?.as_str())
        .dbname(env::var("PG_DATABASE")?.as_str());

    // Connect to the database
    let runtime = Runtime::new()?;
    let (client, conn) = runtime.block_on(config.connect(NoTls))?;
    runtime.spawn(async move {
        if let Err(err) = conn.await {
            log::error!("database connection closed: {err}");
        }
    });

    // Subscribe to updates
    let telegram = Telegram::new(&token);
    drop(token);
    if let Some(url) = webhook_url.as_deref() {
        runtime.block_on(telegram.set_webhook(url, secret.as_deref()))?;
    }

    let config = Config { session_length, open_period };
    let bot = Arc::new(Bot::new(Database::from(client), telegram, config));
    log::info!("runs have {session_length} questions open for {open_period} seconds each");

    runtime.block_on(async {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        let tcp = TcpListener::bind(addr).await?;
        log::info!("listening on {addr}");

        let mut stop = pin!(tokio::signal::ctrl_c());
        loop {
            let stream = tokio::select! {
                biased;
                res = &mut stop => {
                    res?;
                    break;
                }
                res = tcp.accept() => {
                    let (stream, peer) = res?;
                    log::debug!("new connection from {peer}");
                    stream
                }
            };

            let bot = bot.clone();
            let secret = secret.clone();
            let service = service_fn(move |req| {
                let bot = bot.clone();
                let secret = secret.clone();
                async move { Ok::<_, Infallible>(webhook::respond(req, secret.as_deref(), &bot).await) }
            });

            tokio::spawn(async move {
                if let Err(err) = http1::Builder::new().serve_connection(TokioIo::new(stream), service).await {
                    log::error!("connection failed: {err}");
                }
            });
        }

        log::info!("shutting down with {} runs in progress", bot.clear_sessions());
        anyhow::Ok(())
    })?;

    Ok(())
}
