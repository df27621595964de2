use crate::domain::Appliance;
use crate::tommotica::client::{TommoticaClient, ensure_success};
use crate::tommotica::domain::HouseGet;
use crate::tommotica::error::TommoticaError;
use tracing::{debug, info, instrument};

/// Enumerates all appliances of the house, in floor, room, appliance order.
#[instrument(skip(client))]
pub async fn discover(client: &TommoticaClient, base_url: &str) -> Result<Vec<Appliance>, TommoticaError> {
    info!("🔍 Discovering Tommotica appliances...");

    let response = client.get(format!("{}/api/house", base_url)).query(&[("api-version", "2")]).send().await?;
    let body = ensure_success(response)?.bytes().await?;
    let house = serde_json::from_slice::<HouseGet>(&body)?;

    let appliances = house
        .floors
        .into_iter()
        .flat_map(|floor| floor.rooms)
        .flat_map(|room| room.appliances)
        .map(|appliance| {
            debug!(appliance_id = appliance.id, "🔍 Found appliance '{}': {:?}", appliance.name, appliance.state);
            Appliance::new(appliance.id, appliance.name, appliance.state)
        })
        .collect::<Vec<Appliance>>();

    info!("🔍 Discovering Tommotica appliances... OK, {} found", appliances.len());
    Ok(appliances)
}
