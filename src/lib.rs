pub mod app_config;
mod appliance_updated_reducer;
mod backoff;
pub mod coordinator;
mod dim_level_serde;
pub mod domain;
pub mod extensions;
pub mod presentation_listener;
pub mod registry;
pub mod sse;
pub mod subscriber;
pub mod tommotica;
