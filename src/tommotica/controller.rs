use crate::domain::{Appliance, ApplianceCommand, ApplianceState};
use crate::tommotica::client::{TommoticaClient, ensure_success};
use crate::tommotica::error::{TommoticaError, TransportError};
use tracing::{info, instrument, warn};

/// Issues state changes to the upstream service.
#[derive(Debug, Clone)]
pub struct TommoticaController {
    client: TommoticaClient,
    base_url: String,
}

impl TommoticaController {
    pub fn new(client: TommoticaClient, base_url: String) -> Self {
        TommoticaController { client, base_url }
    }

    /// Sends the full desired state and applies the state the upstream answers with.
    ///
    /// The desired state is built from the locally known state, an update the subscriber hasn't seen yet may be
    /// reverted. Nothing is applied locally unless the upstream confirms.
    #[instrument(skip_all, fields(appliance_id = appliance.id()))]
    pub async fn set_state(&self, appliance: &Appliance, command: ApplianceCommand) -> Result<ApplianceState, TommoticaError> {
        let desired = command.desired_state(appliance)?;
        info!(?command, "🟢 Changing appliance '{}'...", appliance.name());

        let url = format!("{}/api/appliance/{}/State", self.base_url, appliance.id());
        let result = self
            .client
            .put(url)
            .query(&[("api-version", "2")])
            .json(&desired)
            .send()
            .await
            .map_err(TransportError::from)
            .and_then(ensure_success);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!("⚠️ Changing appliance '{}'... failed, {}", appliance.name(), e);
                return Err(e.into());
            }
        };

        let body = response.bytes().await?;
        let state = serde_json::from_slice::<ApplianceState>(&body)?;
        appliance.apply(state.clone())?;

        info!(on = state.on, dim_level = ?state.dim_level, "🟢 Changing appliance '{}'... OK", appliance.name());
        Ok(state)
    }
}
