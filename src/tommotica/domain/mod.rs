mod appliance_updated;
mod house_get;
mod signalr;

pub use appliance_updated::ApplianceUpdated;
pub use house_get::HouseGet;
pub use signalr::{HubInvocation, HubName, NegotiateResponse, PersistentResponse, StartResponse};
