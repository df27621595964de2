use crate::domain::{Appliance, ApplianceCommand, ApplianceState, Light, SupportedFeatures, TurnOnOptions};
use crate::tommotica::controller::TommoticaController;
use crate::tommotica::error::TommoticaError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

const UNIQUE_ID_PREFIX: &str = "tommotica_";

/// A registered appliance presented as a light.
#[derive(Debug, Clone)]
pub struct TommoticaLight {
    appliance: Arc<Appliance>,
    controller: Arc<TommoticaController>,
}

impl TommoticaLight {
    pub fn new(appliance: Arc<Appliance>, controller: Arc<TommoticaController>) -> Self {
        TommoticaLight { appliance, controller }
    }
}

#[async_trait]
impl Light for TommoticaLight {
    type Error = TommoticaError;

    fn unique_id(&self) -> String {
        format!("{}{}", UNIQUE_ID_PREFIX, self.appliance.id())
    }

    fn name(&self) -> &str {
        self.appliance.name()
    }

    fn is_on(&self) -> bool {
        self.appliance.is_on()
    }

    fn brightness(&self) -> Option<u8> {
        self.appliance.brightness()
    }

    fn supported_features(&self) -> SupportedFeatures {
        if self.appliance.dimmable() {
            SupportedFeatures::BRIGHTNESS | SupportedFeatures::TRANSITION
        } else {
            SupportedFeatures::NONE
        }
    }

    fn subscribe(&self) -> watch::Receiver<ApplianceState> {
        self.appliance.subscribe()
    }

    async fn turn_on(&self, options: TurnOnOptions) -> Result<(), TommoticaError> {
        let command = ApplianceCommand::TurnOn {
            brightness: options.brightness,
            transition: options.transition,
        };

        self.controller.set_state(&self.appliance, command).await.map(|_| ())
    }

    async fn turn_off(&self) -> Result<(), TommoticaError> {
        self.controller.set_state(&self.appliance, ApplianceCommand::TurnOff).await.map(|_| ())
    }
}
