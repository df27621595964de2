use crate::domain::appliance::{Appliance, CapabilityError};
use crate::domain::appliance_state::ApplianceState;
use crate::extensions::dim_level_ext::BrightnessConversions;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplianceCommand {
    TurnOn {
        /// Host brightness, 0-255.
        brightness: Option<u8>,
        transition: Option<Duration>,
    },
    TurnOff,
}

impl ApplianceCommand {
    /// Builds the full state to send, starting from the currently known state of the appliance.
    pub fn desired_state(&self, appliance: &Appliance) -> Result<ApplianceState, CapabilityError> {
        let mut state = appliance.state();

        match *self {
            ApplianceCommand::TurnOn { brightness, transition } => {
                if !appliance.dimmable() {
                    if brightness.is_some() {
                        return Err(unsupported(appliance, "brightness"));
                    }
                    if transition.is_some() {
                        return Err(unsupported(appliance, "transition"));
                    }
                }

                state.on = true;
                if let Some(brightness) = brightness {
                    state.dim_level = Some(f64::from(brightness.brightness_to_dim_level()));
                }
                state.transition_time = transition.map(|transition| transition.as_secs_f64());
            }
            ApplianceCommand::TurnOff => {
                state.on = false;
            }
        }

        Ok(state)
    }
}

fn unsupported(appliance: &Appliance, feature: &'static str) -> CapabilityError {
    CapabilityError::Unsupported {
        appliance_id: appliance.id().to_string(),
        feature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dimmable() -> Appliance {
        Appliance::new("3".to_string(), "Hallway".to_string(), ApplianceState::new(false, Some(30.0)))
    }

    fn switch() -> Appliance {
        Appliance::new("4".to_string(), "Porch".to_string(), ApplianceState::new(false, None))
    }

    #[test]
    fn turn_on_converts_the_brightness_and_attaches_the_transition() -> Result<(), CapabilityError> {
        let command = ApplianceCommand::TurnOn {
            brightness: Some(128),
            transition: Some(Duration::from_millis(1500)),
        };

        let state = command.desired_state(&dimmable())?;

        assert!(state.on);
        assert_eq!(state.dim_level, Some(50.0));
        assert_eq!(state.transition_time, Some(1.5));
        Ok(())
    }

    #[test]
    fn turn_on_without_brightness_keeps_the_known_dim_level() -> Result<(), CapabilityError> {
        let command = ApplianceCommand::TurnOn {
            brightness: None,
            transition: None,
        };

        let state = command.desired_state(&dimmable())?;

        assert_eq!(state, ApplianceState::new(true, Some(30.0)));
        Ok(())
    }

    #[test]
    fn turn_on_a_switch() -> Result<(), CapabilityError> {
        let command = ApplianceCommand::TurnOn {
            brightness: None,
            transition: None,
        };

        let state = command.desired_state(&switch())?;

        assert_eq!(state, ApplianceState::new(true, None));
        Ok(())
    }

    #[test]
    fn turn_on_a_switch_with_brightness_is_rejected() {
        let command = ApplianceCommand::TurnOn {
            brightness: Some(10),
            transition: None,
        };

        let result = command.desired_state(&switch());

        assert_eq!(
            result,
            Err(CapabilityError::Unsupported {
                appliance_id: "4".to_string(),
                feature: "brightness"
            })
        );
    }

    #[test]
    fn turn_on_a_switch_with_transition_is_rejected() {
        let command = ApplianceCommand::TurnOn {
            brightness: None,
            transition: Some(Duration::from_secs(1)),
        };

        let result = command.desired_state(&switch());

        assert!(matches!(result, Err(CapabilityError::Unsupported { feature: "transition", .. })));
    }

    #[test]
    fn turn_off_only_changes_on() -> Result<(), CapabilityError> {
        let appliance = Appliance::new("5".to_string(), "Study".to_string(), ApplianceState::new(true, Some(80.0)));

        let state = ApplianceCommand::TurnOff.desired_state(&appliance)?;

        assert_eq!(state, ApplianceState::new(false, Some(80.0)));
        Ok(())
    }

    #[test]
    fn desired_state_does_not_touch_the_appliance() -> Result<(), CapabilityError> {
        let appliance = dimmable();

        ApplianceCommand::TurnOn {
            brightness: Some(255),
            transition: None,
        }
        .desired_state(&appliance)?;

        assert_eq!(appliance.state(), ApplianceState::new(false, Some(30.0)));
        Ok(())
    }
}
