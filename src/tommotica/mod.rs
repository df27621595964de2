mod client;
mod controller;
mod discoverer;
mod domain;
mod error;
mod light;
mod signalr;

pub(crate) use client::ensure_success;
pub use client::{TommoticaClient, TommoticaClientError, new_client, new_push_client};
pub use controller::TommoticaController;
pub use discoverer::discover;
pub use domain::ApplianceUpdated;
pub use error::{TommoticaError, TransportError};
pub use light::TommoticaLight;
pub use signalr::{PushChannel, PushEvent, PushStream, SignalRChannel};
