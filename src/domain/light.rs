use crate::domain::appliance_state::ApplianceState;
use async_trait::async_trait;
use std::fmt::Debug;
use std::ops::BitOr;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SupportedFeatures(u8);

impl SupportedFeatures {
    pub const NONE: SupportedFeatures = SupportedFeatures(0);
    pub const BRIGHTNESS: SupportedFeatures = SupportedFeatures(1);
    pub const TRANSITION: SupportedFeatures = SupportedFeatures(1 << 1);

    pub fn contains(self, other: SupportedFeatures) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SupportedFeatures {
    type Output = SupportedFeatures;

    fn bitor(self, rhs: SupportedFeatures) -> SupportedFeatures {
        SupportedFeatures(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TurnOnOptions {
    /// Brightness, 0-255.
    pub brightness: Option<u8>,
    pub transition: Option<Duration>,
}

/// What a host needs to present and control a light.
#[async_trait]
pub trait Light: Debug + Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn unique_id(&self) -> String;
    fn name(&self) -> &str;
    fn is_on(&self) -> bool;
    fn brightness(&self) -> Option<u8>;
    fn supported_features(&self) -> SupportedFeatures;

    /// Notified whenever the presentation of the light needs refreshing.
    fn subscribe(&self) -> watch::Receiver<ApplianceState>;

    async fn turn_on(&self, options: TurnOnOptions) -> Result<(), Self::Error>;
    async fn turn_off(&self) -> Result<(), Self::Error>;
}
