use std::path::PathBuf;
use std::time::Duration;

/// How the adb transport is reached. Passed explicitly into
/// [`AdbBridge::connect`](crate::bridge::AdbBridge::connect); there is no
/// environment-variable plumbing.
#[derive(Debug, Clone)]
pub struct AdbConfig {
    /// Path to the adb executable.
    pub adb_path: PathBuf,
    /// Device serial to target. `None` auto-detects a single attached device.
    pub serial: Option<String>,
}

impl Default for AdbConfig {
    fn default() -> Self {
        Self {
            adb_path: PathBuf::from("adb"),
            serial: None,
        }
    }
}

/// Blind settle delays between UI actions.
///
/// These are not event-driven waits; they are empirically tuned pauses that
/// give the target app time to redraw before the next snapshot. Values were
/// carried over from field testing against current Google Messages builds.
#[derive(Debug, Clone)]
pub struct Timing {
    /// After launching the conversation-list activity.
    pub app_launch: Duration,
    /// After a tap or key event that opens a new screen.
    pub screen_change: Duration,
    /// After typing a recipient, while contact suggestions populate.
    pub suggestion_wait: Duration,
    /// After each back navigation.
    pub nav_settle: Duration,
    /// After raw text injection.
    pub text_settle: Duration,
    /// Between composer attempts.
    pub retry_pause: Duration,
    /// After tapping an input field, before it accepts keys.
    pub focus_settle: Duration,
    /// After a bare key event such as select-all.
    pub key_settle: Duration,
    /// Between the back presses of a failure unwind.
    pub unwind_step: Duration,
    /// Hold duration of the long-press gesture on a conversation row.
    pub long_press_hold: Duration,
    /// After giving up on a recipient, before moving to the next one.
    pub failure_pause: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            app_launch: Duration::from_secs(3),
            screen_change: Duration::from_secs(3),
            suggestion_wait: Duration::from_secs(3),
            nav_settle: Duration::from_secs(2),
            text_settle: Duration::from_secs(2),
            retry_pause: Duration::from_secs(2),
            focus_settle: Duration::from_secs(1),
            key_settle: Duration::from_millis(500),
            unwind_step: Duration::from_secs(1),
            long_press_hold: Duration::from_millis(1000),
            failure_pause: Duration::from_secs(1),
        }
    }
}

impl Timing {
    /// All delays zeroed. Used by tests so macro flows run without
    /// wall-clock sleeps.
    pub fn zero() -> Self {
        Self {
            app_launch: Duration::ZERO,
            screen_change: Duration::ZERO,
            suggestion_wait: Duration::ZERO,
            nav_settle: Duration::ZERO,
            text_settle: Duration::ZERO,
            retry_pause: Duration::ZERO,
            focus_settle: Duration::ZERO,
            key_settle: Duration::ZERO,
            unwind_step: Duration::ZERO,
            long_press_hold: Duration::ZERO,
            failure_pause: Duration::ZERO,
        }
    }
}
