use crate::domain::Appliance;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Default)]
struct Appliances {
    by_id: HashMap<String, Arc<Appliance>>,
    ordered: Vec<Arc<Appliance>>,
}

/// The live collection of appliances, keyed by id. Entries are never removed.
#[derive(Debug, Default)]
pub struct Registry {
    appliances: RwLock<Appliances>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Adds the appliances, an id that is already registered keeps its existing appliance.
    #[instrument(skip_all)]
    pub async fn register(&self, appliances: Vec<Appliance>) {
        let num_appliances = appliances.len();
        debug!("🔵 Registering {} appliance(s)...", num_appliances);

        let mut write_guard = self.appliances.write().await;
        let mut registered = 0;
        for appliance in appliances {
            if write_guard.by_id.contains_key(appliance.id()) {
                warn!(appliance_id = appliance.id(), "⚠️ Appliance '{}' is already registered, ignoring", appliance.name());
                continue;
            }

            let appliance = Arc::new(appliance);
            write_guard.by_id.insert(appliance.id().to_string(), appliance.clone());
            write_guard.ordered.push(appliance);
            registered += 1;
        }

        info!("🔵 Registering {} appliance(s)... OK, {} added", num_appliances, registered);
    }

    pub async fn lookup(&self, id: &str) -> Option<Arc<Appliance>> {
        self.appliances.read().await.by_id.get(id).cloned()
    }

    /// All appliances in registration order.
    pub async fn all(&self) -> Vec<Arc<Appliance>> {
        self.appliances.read().await.ordered.clone()
    }

    pub async fn len(&self) -> usize {
        self.appliances.read().await.ordered.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
