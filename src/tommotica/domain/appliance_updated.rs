use crate::domain::ApplianceState;
use serde::Deserialize;

// Payload of the `updated` event on the appliance hub
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplianceUpdated {
    pub id: String,
    pub state: ApplianceState,
}
