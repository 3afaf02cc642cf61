use std::sync::Arc;

use anyhow::{anyhow, Context};
use teloxide::prelude::*;
use tracing::{info, warn};

use gatebot_core::{
    config::Config,
    dispatcher::{AppContext, Dispatcher, StopReason},
    errors::PlatformError,
    messaging::port::ChatClient,
    store::Datastore,
};

use crate::{map_request_error, PollingSettings, TelegramClient};

/// Build the app context around a teloxide bot and run the receive loop until
/// a shutdown signal, stream closure or a rejected token.
pub async fn run_polling(
    cfg: Arc<Config>,
    datastore: Arc<dyn Datastore>,
) -> anyhow::Result<StopReason> {
    let bot = Bot::new(cfg.bot_token.clone());

    let username = match bot.get_me().await.map_err(map_request_error) {
        Ok(me) => {
            let username = me.user.username.clone();
            info!(
                bot = username.as_deref().unwrap_or("<unnamed>"),
                "connected to Telegram"
            );
            username
        }
        Err(PlatformError::Unauthorized) => {
            return Err(PlatformError::Unauthorized).context("bot token was rejected");
        }
        Err(e) => {
            warn!(error = %e, "getMe failed, commands for other bots will not be filtered");
            None
        }
    };
    info!(database = datastore.database_name(), "datastore attached");

    let chat: Arc<dyn ChatClient> = Arc::new(
        TelegramClient::new(bot, PollingSettings::from(cfg.as_ref())).with_username(username),
    );

    let dispatcher = Dispatcher::new(AppContext {
        config: cfg,
        chat,
        datastore,
    });

    let reason = dispatcher
        .run(shutdown_signal())
        .await
        .context("receive loop stopped")?;
    info!(?reason, "bot stopped");

    ensure_clean_stop(reason)
}

/// Telegram's update stream never ends on its own, so a closed stream means
/// polling died and the process should exit with a failure.
pub fn ensure_clean_stop(reason: StopReason) -> anyhow::Result<StopReason> {
    match reason {
        StopReason::Shutdown => Ok(reason),
        StopReason::StreamClosed => Err(anyhow!("update stream closed unexpectedly")),
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install ctrl+c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received terminate signal, shutting down"),
    }
}
