use crate::domain::CapabilityError;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TommoticaError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    #[error("malformed push session: {0}")]
    MalformedSession(String),
    #[error("unknown appliance '{0}'")]
    UnknownAppliance(String),
    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

impl From<reqwest::Error> for TommoticaError {
    fn from(error: reqwest::Error) -> Self {
        TommoticaError::Transport(TransportError::Request(error))
    }
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("request to '{url}' failed with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("push session closed")]
    SessionClosed,
    #[error("no data received for {0:?}")]
    Stale(Duration),
}
