use crate::dim_level_serde::{deserialize_dim_level, serialize_dim_level};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Complete state of an appliance as exchanged with the upstream service.
///
/// Fields the upstream sends that are not modelled here are kept in `extra` and sent back unchanged,
/// commands always carry the full state object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplianceState {
    pub on: bool,
    /// Dim level as the upstream reports it, 0-100.
    #[serde(
        default,
        deserialize_with = "deserialize_dim_level",
        serialize_with = "serialize_dim_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub dim_level: Option<f64>,
    /// Transition hint in seconds, write-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_time: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApplianceState {
    pub fn new(on: bool, dim_level: Option<f64>) -> Self {
        ApplianceState {
            on,
            dim_level,
            transition_time: None,
            extra: Map::new(),
        }
    }

    /// Compares the observable part of two states. Transition hints and unknown fields are ignored.
    pub fn differs(&self, other: &ApplianceState, dimmable: bool) -> bool {
        self.on != other.on || (dimmable && self.dim_level != other.dim_level)
    }
}
