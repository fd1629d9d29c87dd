
mod composer_tests;

use std::sync::Arc;

use crate::{Device, Timing};
use mock::ScriptedBridge;

/// Device over a scripted bridge with all settle delays zeroed, so flow
/// tests run without wall-clock sleeps.
fn scripted_device(bridge: &Arc<ScriptedBridge>) -> Device {
    Device::new(bridge.clone(), Timing::zero())
}

// Initialize tracing for tests that want to be read with logs on
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_target(false)
        .try_init();
}
