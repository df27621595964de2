pub mod appliance;
pub mod appliance_state;
pub mod commands;
pub mod light;

pub use appliance::{Appliance, CapabilityError};
pub use appliance_state::ApplianceState;
pub use commands::ApplianceCommand;
pub use light::{Light, SupportedFeatures, TurnOnOptions};
