// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chatline serve` command implementation.
//!
//! Wires the OpenAI provider, LINE channel, event log and the configured
//! responder into the webhook gateway, and runs the push scheduler beside it
//! until a shutdown signal arrives.

use std::sync::Arc;

use chatline_agent::{
    Completer, ConversationResponder, InventoryResponder, Responder, RetrievalResponder,
    SessionStore,
};
use chatline_audit::JsonlEventLog;
use chatline_config::ResponderMode;
use chatline_config::model::ChatlineConfig;
use chatline_core::ChatlineError;
use chatline_core::traits::{ChannelAdapter, EmbeddingAdapter, EventLogAdapter, ProviderAdapter};
use chatline_cron::{PushScheduler, SystemClock};
use chatline_gateway::{
    ActiveUserTx, EventDispatcher, ExchangeHandler, FollowHandler, GatewayState, start_server,
};
use chatline_line::{EventKind, LineChannel, WebhookVerifier};
use chatline_memory::CorpusRetriever;
use chatline_openai::OpenAiProvider;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::shutdown;

/// Runs the webhook server until SIGINT or SIGTERM.
pub async fn run_serve(config: ChatlineConfig) -> Result<(), ChatlineError> {
    init_tracing(&config.agent.log_level);

    info!(
        name = config.agent.name.as_str(),
        mode = %config.agent.mode,
        "starting chatline"
    );

    let channel_secret = config.line.channel_secret.as_deref().ok_or_else(|| {
        ChatlineError::Config("line.channel_secret (or LINE_CHANNEL_SECRET) is required".into())
    })?;
    let verifier = WebhookVerifier::new(channel_secret)?;

    let openai = Arc::new(OpenAiProvider::new(&config.openai)?);
    let channel: Arc<dyn ChannelAdapter + Send + Sync> = Arc::new(LineChannel::new(&config.line)?);
    let event_log: Arc<dyn EventLogAdapter + Send + Sync> =
        Arc::new(JsonlEventLog::new(&config.event_log.path));

    let responder = build_responder(&config, openai.clone(), openai.clone()).await?;

    let (active_user_tx, active_user_rx) = watch::channel(None);
    let dispatcher = build_dispatcher(
        &config,
        responder,
        channel.clone(),
        event_log.clone(),
        Arc::new(active_user_tx),
    );

    let cancel = shutdown::install_signal_handler();

    let background = if config.push.enabled || config.push.demo_enabled {
        let clock = Arc::new(SystemClock::from_config(&config.push)?);
        let scheduler = Arc::new(PushScheduler::new(
            &config.push,
            channel.clone(),
            event_log.clone(),
            clock,
            active_user_rx,
        ));
        spawn_push_tasks(&config, scheduler, &cancel)
    } else {
        info!("push scheduler disabled");
        Vec::new()
    };

    let served = start_server(&config.server, GatewayState::new(verifier, dispatcher), cancel.clone()).await;
    if let Err(e) = &served {
        error!(error = %e, "webhook server stopped with an error");
    }

    cancel.cancel();
    for task in background {
        if let Err(e) = task.await {
            warn!(error = %e, "background task did not finish cleanly");
        }
    }

    if let Err(e) = channel.shutdown().await {
        warn!(error = %e, "channel shutdown failed");
    }

    info!("chatline serve shutdown complete");
    served
}

fn spawn_push_tasks(
    config: &ChatlineConfig,
    scheduler: Arc<PushScheduler>,
    cancel: &CancellationToken,
) -> Vec<JoinHandle<()>> {
    let mut tasks = Vec::new();

    if config.push.enabled {
        let push = scheduler.clone();
        let push_cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            push.run(push_cancel).await;
        }));
    }

    if config.push.demo_enabled {
        let demo_cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            scheduler.run_demo(demo_cancel).await;
        }));
    }

    tasks
}

/// Builds the responder selected by `agent.mode`.
///
/// Retrieval mode reads and embeds the corpus here, so a missing file or a
/// failing embedding API stops startup.
pub async fn build_responder(
    config: &ChatlineConfig,
    provider: Arc<dyn ProviderAdapter + Send + Sync>,
    embedder: Arc<dyn EmbeddingAdapter + Send + Sync>,
) -> Result<Arc<dyn Responder>, ChatlineError> {
    let completer = Completer::from_config(provider, &config.openai, &config.agent);

    let responder: Arc<dyn Responder> = match config.agent.mode {
        ResponderMode::Conversation => Arc::new(ConversationResponder::new(
            Arc::new(SessionStore::new()),
            completer,
            config.agent.persona.clone(),
        )),
        ResponderMode::Retrieval => {
            let retriever =
                CorpusRetriever::from_file(&config.corpus.path, &config.corpus, embedder).await?;
            info!(
                path = config.corpus.path.as_str(),
                chunks = retriever.index().len(),
                "corpus loaded"
            );
            Arc::new(RetrievalResponder::new(
                Arc::new(SessionStore::new()),
                completer,
                Arc::new(retriever),
            ))
        }
        ResponderMode::Inventory => Arc::new(InventoryResponder::new(
            completer,
            config.inventory.branch_id.clone(),
            config.inventory.echo_intent,
        )),
    };
    Ok(responder)
}

/// Message events go to the exchange handler, follow events record the
/// push target.
pub fn build_dispatcher(
    config: &ChatlineConfig,
    responder: Arc<dyn Responder>,
    channel: Arc<dyn ChannelAdapter + Send + Sync>,
    event_log: Arc<dyn EventLogAdapter + Send + Sync>,
    active_user: ActiveUserTx,
) -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new();
    dispatcher
        .register(
            EventKind::Message,
            Arc::new(ExchangeHandler::new(
                &config.agent,
                responder,
                channel,
                event_log,
                active_user.clone(),
            )),
        )
        .register(EventKind::Follow, Arc::new(FollowHandler::new(active_user)));
    dispatcher
}

/// Initialize tracing with the configured log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chatline={log_level},tower_http={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
