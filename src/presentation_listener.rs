use crate::domain::Light;
use tracing::{info, instrument};

/// Logs the presentation of the light every time it needs refreshing, until the light goes away.
#[instrument(skip_all, fields(light = %light.unique_id()))]
pub async fn presentation_listener<L: Light>(light: L) {
    let mut rx = light.subscribe();

    while rx.changed().await.is_ok() {
        rx.borrow_and_update();
        info!("💡 {}", presentation(&light));
    }
}

fn presentation(light: &impl Light) -> String {
    match (light.is_on(), light.brightness()) {
        (true, Some(brightness)) => format!("'{}' is on at brightness {}", light.name(), brightness),
        (true, None) => format!("'{}' is on", light.name()),
        (false, _) => format!("'{}' is off", light.name()),
    }
}
