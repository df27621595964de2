use crate::app_config::AppConfig;
use crate::backoff::exponential_backoff;
use crate::domain::Appliance;
use crate::registry::Registry;
use crate::subscriber::{EventSubscriber, SubscriberConfig, SubscriberState};
use crate::tommotica::{
    PushChannel, SignalRChannel, TommoticaClient, TommoticaClientError, TommoticaController, TommoticaError, TommoticaLight, discover,
    new_client, new_push_client,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_retry::Retry;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
struct DiscoverySettings {
    attempts: usize,
    retry_delay: Duration,
    retry_max_delay: Duration,
}

/// Owns the registry and wires discovery, the event subscriber and the command client together.
#[derive(Debug)]
pub struct Coordinator {
    client: TommoticaClient,
    base_url: String,
    discovery: DiscoverySettings,
    registry: Arc<Registry>,
    controller: Arc<TommoticaController>,
    subscriber: EventSubscriber,
}

impl Coordinator {
    /// Creates a coordinator receiving updates through SignalR.
    pub fn new(config: &AppConfig) -> Result<Self, TommoticaClientError> {
        let channel = SignalRChannel::new(new_push_client(config)?, config.tommotica().base_url());
        Self::with_channel(config, Arc::new(channel))
    }

    pub fn with_channel(config: &AppConfig, channel: Arc<dyn PushChannel>) -> Result<Self, TommoticaClientError> {
        let tommotica = config.tommotica();
        let client = new_client(config)?;
        let base_url = tommotica.base_url();
        let registry = Arc::new(Registry::new());

        Ok(Coordinator {
            controller: Arc::new(TommoticaController::new(client.clone(), base_url.clone())),
            subscriber: EventSubscriber::new(channel, registry.clone(), SubscriberConfig::from(tommotica)),
            discovery: DiscoverySettings {
                attempts: tommotica.discovery_attempts(),
                retry_delay: tommotica.retry_delay(),
                retry_max_delay: tommotica.retry_max_delay(),
            },
            client,
            base_url,
            registry,
        })
    }

    /// Launches the event subscriber, then discovers and registers all appliances.
    ///
    /// Updates arriving before discovery completes are dropped. A discovery failure after the last attempt is
    /// returned, the subscriber keeps running until `shutdown`.
    #[instrument(skip(self), fields(url = %self.base_url))]
    pub async fn start(&mut self) -> Result<Vec<TommoticaLight>, TommoticaError> {
        self.subscriber.start();

        let appliances = self.discover().await?;
        self.registry.register(appliances).await;

        let lights = self.lights().await;
        info!("🔥 Tracking {} appliance(s)", lights.len());
        Ok(lights)
    }

    async fn discover(&self) -> Result<Vec<Appliance>, TommoticaError> {
        let strategy = exponential_backoff(self.discovery.retry_delay, self.discovery.retry_max_delay)
            .take(self.discovery.attempts.saturating_sub(1));

        Retry::spawn(strategy, || async {
            discover(&self.client, &self.base_url).await.inspect_err(|e| {
                warn!("⚠️ Discovering Tommotica appliances... failed, {}", e);
            })
        })
        .await
    }

    /// All registered appliances as lights, in discovery order.
    pub async fn lights(&self) -> Vec<TommoticaLight> {
        self.registry
            .all()
            .await
            .into_iter()
            .map(|appliance| TommoticaLight::new(appliance, self.controller.clone()))
            .collect()
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn subscriber_state(&self) -> watch::Receiver<SubscriberState> {
        self.subscriber.state()
    }

    /// Stops the event subscriber and waits for it to end.
    pub async fn shutdown(&mut self) {
        self.subscriber.stop().await;
    }
}
