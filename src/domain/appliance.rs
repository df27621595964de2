use crate::domain::appliance_state::ApplianceState;
use crate::extensions::dim_level_ext::DimLevelConversions;
use thiserror::Error;
use tokio::sync::watch;

/// One controllable appliance. The state is replaced wholesale on every confirmed update, readers always see a
/// complete value.
#[derive(Debug)]
pub struct Appliance {
    id: String,
    name: String,
    dimmable: bool,
    state: watch::Sender<ApplianceState>,
}

impl Appliance {
    /// Creates an appliance, the presence of a dim level in the initial state decides whether it is dimmable.
    pub fn new(id: String, name: String, state: ApplianceState) -> Self {
        let dimmable = state.dim_level.is_some();
        let (state, _) = watch::channel(state);

        Appliance { id, name, dimmable, state }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimmable(&self) -> bool {
        self.dimmable
    }

    pub fn state(&self) -> ApplianceState {
        self.state.borrow().clone()
    }

    pub fn is_on(&self) -> bool {
        self.state.borrow().on
    }

    pub fn brightness(&self) -> Option<u8> {
        if !self.dimmable {
            return None;
        }

        self.state.borrow().dim_level.map(DimLevelConversions::dim_level_to_brightness)
    }

    pub fn differs(&self, other: &ApplianceState) -> bool {
        self.state.borrow().differs(other, self.dimmable)
    }

    /// Receives a notification whenever the state is replaced.
    pub fn subscribe(&self) -> watch::Receiver<ApplianceState> {
        self.state.subscribe()
    }

    /// Unconditionally replaces the state.
    pub fn apply(&self, state: ApplianceState) -> Result<(), CapabilityError> {
        self.ensure_capability(&state)?;
        self.state.send_replace(state);
        Ok(())
    }

    /// Replaces the state only if it differs from the current one, returns whether it was replaced.
    ///
    /// The comparison and the replacement happen under the same lock so a concurrent `apply` can't slip in between.
    pub fn update(&self, state: ApplianceState) -> Result<bool, CapabilityError> {
        self.ensure_capability(&state)?;

        let dimmable = self.dimmable;
        let mut pending = Some(state);
        let replaced = self.state.send_if_modified(|current| match pending.take() {
            Some(state) if current.differs(&state, dimmable) => {
                *current = state;
                true
            }
            _ => false,
        });

        Ok(replaced)
    }

    fn ensure_capability(&self, state: &ApplianceState) -> Result<(), CapabilityError> {
        if state.dim_level.is_some() != self.dimmable {
            return Err(CapabilityError::Mismatch {
                appliance_id: self.id.clone(),
                dimmable: self.dimmable,
            });
        }

        Ok(())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum CapabilityError {
    #[error("appliance '{appliance_id}' does not support {feature}")]
    Unsupported { appliance_id: String, feature: &'static str },
    #[error("state for appliance '{appliance_id}' does not match its capability (dimmable: {dimmable})")]
    Mismatch { appliance_id: String, dimmable: bool },
}
