use crate::registry::Registry;
use crate::tommotica::{ApplianceUpdated, TommoticaError};
use tracing::{debug, info};

/// Applies an inbound update to the matching appliance if its observable state changed.
///
/// Returns whether the state was replaced. An unknown id yields `UnknownAppliance`, callers drop those.
pub(crate) async fn reduce_appliance_updated(registry: &Registry, update: ApplianceUpdated) -> Result<bool, TommoticaError> {
    let Some(appliance) = registry.lookup(&update.id).await else {
        return Err(TommoticaError::UnknownAppliance(update.id));
    };

    let previous = appliance.state();
    let replaced = appliance.update(update.state)?;
    if !replaced {
        debug!(appliance_id = appliance.id(), "🔵 Appliance '{}' is unchanged", appliance.name());
        return Ok(false);
    }

    let current = appliance.state();
    info!(
        appliance_id = appliance.id(),
        "🟢 Updated appliance '{}', on '{}' (was '{}'), dim level '{:?}' (was '{:?}')",
        appliance.name(),
        current.on,
        previous.on,
        current.dim_level,
        previous.dim_level
    );

    Ok(replaced)
}
