//! Android UI automation for bulk messaging over adb
//!
//! This crate drives the Google Messages app through `adb shell input` and
//! `uiautomator` dumps: capture a snapshot of the screen, find the element
//! to act on, tap or type, wait for the app to catch up, capture again.
//! There is no stable automation API underneath, so everything here treats
//! the screen as the only source of truth.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

pub mod bridge;
pub mod cleanup;
pub mod composer;
pub mod config;
pub mod errors;
pub mod input;
pub mod messages;
pub mod navigator;
pub mod run;
pub mod selector;
pub mod snapshot;
#[cfg(test)]
mod tests;

pub use bridge::{AdbBridge, DeviceBridge, Key};
pub use config::{AdbConfig, Timing};
pub use errors::AutomationError;
pub use input::{load_message_body, load_recipients, InputError};
pub use run::{run_bulk_send, RunOptions, RunStats};
pub use selector::Selector;
pub use snapshot::{Bounds, Snapshot, UiNode};

/// Holds the output of one adb invocation
pub struct CommandOutput {
    pub exit_status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// A live automation session against one Android device.
///
/// All flows share a `Device` as their I/O surface. Element handles come
/// from [`Snapshot`]s captured here and borrow from them, so a handle cannot
/// outlive its capture; after any action that changes the screen, capture a
/// fresh snapshot before looking anything up.
pub struct Device {
    bridge: Arc<dyn DeviceBridge>,
    timing: Timing,
}

impl Device {
    pub fn new(bridge: Arc<dyn DeviceBridge>, timing: Timing) -> Self {
        Self { bridge, timing }
    }

    /// Capture and parse the current on-screen element tree.
    pub async fn capture_snapshot(&self) -> Result<Snapshot, AutomationError> {
        let xml = self.bridge.dump_ui().await?;
        Snapshot::parse(&xml)
    }

    /// Tap the center of an element from the current snapshot.
    pub async fn tap(&self, node: &UiNode) -> Result<(), AutomationError> {
        let (x, y) = node.center();
        debug!(x, y, id = %node.resource_id, "tap");
        self.bridge.tap(x, y).await
    }

    /// Long-press an element by holding a zero-distance swipe on its center.
    pub async fn long_press(&self, node: &UiNode, hold: Duration) -> Result<(), AutomationError> {
        let center = node.center();
        debug!(x = center.0, y = center.1, hold_ms = hold.as_millis() as u64, "long press");
        self.bridge.swipe(center, center, hold).await
    }

    /// Send a single key event.
    pub async fn press_key(&self, key: Key) -> Result<(), AutomationError> {
        self.bridge.key_event(key).await
    }

    /// Type literal text into whatever field holds focus.
    pub async fn type_text(&self, text: &str) -> Result<(), AutomationError> {
        self.bridge.input_text(text).await
    }

    /// Run a raw device-side shell command.
    pub async fn shell(&self, cmd: &str) -> Result<CommandOutput, AutomationError> {
        self.bridge.shell(cmd).await
    }

    /// Blind settle pause. uiautomator has no change notifications, so
    /// flows pad every transition with one of the [`Timing`] delays.
    pub async fn settle(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }
}
