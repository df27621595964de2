use crate::app_config::Tommotica;
use crate::appliance_updated_reducer::reduce_appliance_updated;
use crate::backoff::exponential_backoff;
use crate::registry::Registry;
use crate::tommotica::{ApplianceUpdated, PushChannel, PushEvent, TommoticaError, TransportError};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, instrument, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberState {
    Disconnected,
    Connecting,
    Subscribed,
}

#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub retry_delay: Duration,
    pub retry_max_delay: Duration,
    pub stale_connection_timeout: Duration,
}

impl From<&Tommotica> for SubscriberConfig {
    fn from(config: &Tommotica) -> Self {
        SubscriberConfig {
            retry_delay: config.retry_delay(),
            retry_max_delay: config.retry_max_delay(),
            stale_connection_timeout: config.stale_connection_timeout(),
        }
    }
}

#[derive(Debug)]
struct Running {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Keeps a push session open in the background and routes inbound updates to the registry.
///
/// Connection errors never escape: the subscriber reconnects with exponential backoff until `stop` is called or the
/// subscriber is dropped.
#[derive(Debug)]
pub struct EventSubscriber {
    channel: Arc<dyn PushChannel>,
    registry: Arc<Registry>,
    config: SubscriberConfig,
    state_tx: Arc<watch::Sender<SubscriberState>>,
    running: Option<Running>,
}

impl EventSubscriber {
    pub fn new(channel: Arc<dyn PushChannel>, registry: Arc<Registry>, config: SubscriberConfig) -> Self {
        let (state_tx, _) = watch::channel(SubscriberState::Disconnected);

        EventSubscriber {
            channel,
            registry,
            config,
            state_tx: Arc::new(state_tx),
            running: None,
        }
    }

    /// Spawns the subscription loop, does nothing if it is already running.
    pub fn start(&mut self) {
        if self.running.is_some() {
            debug!("📡 Event subscriber is already running");
            return;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run(
            self.channel.clone(),
            self.registry.clone(),
            self.config.clone(),
            self.state_tx.clone(),
            shutdown_rx,
        ));

        self.running = Some(Running { shutdown_tx, handle });
        info!("✅  Started event subscriber");
    }

    /// Ends the subscription loop and waits for it, closing the current session.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        running.shutdown_tx.send_replace(true);
        if let Err(e) = running.handle.await {
            error!("❌ Event subscriber task failed: {}", e);
        }
        info!("🛑 Stopped event subscriber");
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn state(&self) -> watch::Receiver<SubscriberState> {
        self.state_tx.subscribe()
    }
}

#[instrument(skip_all)]
async fn run(
    channel: Arc<dyn PushChannel>,
    registry: Arc<Registry>,
    config: SubscriberConfig,
    state_tx: Arc<watch::Sender<SubscriberState>>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut strategy = exponential_backoff(config.retry_delay, config.retry_max_delay);

    loop {
        let mut subscribed = false;
        let error = tokio::select! {
            _ = shutdown_requested(&mut shutdown_rx) => break,
            error = session(channel.as_ref(), &registry, &config, &state_tx, &mut subscribed) => error,
        };
        state_tx.send_replace(SubscriberState::Disconnected);

        if subscribed {
            strategy = exponential_backoff(config.retry_delay, config.retry_max_delay);
        }
        let delay = strategy.next().unwrap_or(config.retry_max_delay);
        warn!(delay = ?delay, "⚠️ Push session error: {}. Reconnecting...", error);

        tokio::select! {
            _ = shutdown_requested(&mut shutdown_rx) => break,
            _ = sleep(delay) => {}
        }
    }

    state_tx.send_replace(SubscriberState::Disconnected);
    debug!("📡 Subscription loop ended");
}

// Resolves once a shutdown is requested or the subscriber is gone
async fn shutdown_requested(shutdown_rx: &mut watch::Receiver<bool>) {
    let _ = shutdown_rx.wait_for(|shutdown| *shutdown).await;
}

/// Runs one session until it fails, the returned error says why.
async fn session(
    channel: &dyn PushChannel,
    registry: &Registry,
    config: &SubscriberConfig,
    state_tx: &watch::Sender<SubscriberState>,
    subscribed: &mut bool,
) -> TommoticaError {
    state_tx.send_replace(SubscriberState::Connecting);
    info!("📡 Connecting to push channel...");

    let mut stream = match channel.open().await {
        Ok(stream) => stream,
        Err(e) => return e,
    };

    *subscribed = true;
    state_tx.send_replace(SubscriberState::Subscribed);
    info!("📡 Connecting to push channel... OK");

    loop {
        match timeout(config.stale_connection_timeout, stream.next()).await {
            Ok(Some(Ok(PushEvent::Updated(update)))) => dispatch(registry, update).await,
            Ok(Some(Ok(PushEvent::KeepAlive))) => trace!("📡 Keep alive"),
            Ok(Some(Err(e))) => return e,
            Ok(None) => return TransportError::SessionClosed.into(),
            Err(_) => return TransportError::Stale(config.stale_connection_timeout).into(),
        }
    }
}

async fn dispatch(registry: &Registry, update: ApplianceUpdated) {
    match reduce_appliance_updated(registry, update).await {
        Ok(_) => {}
        Err(TommoticaError::UnknownAppliance(id)) => {
            debug!(appliance_id = id, "🔸 Dropping update for unknown appliance '{}'", id);
        }
        Err(e) => warn!("⚠️ Dropping update: {}", e),
    }
}
