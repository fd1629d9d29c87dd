//! Transport layer: everything that actually talks to a device.
//!
//! [`DeviceBridge`] is the seam the rest of the crate is written against.
//! The production implementation shells out to adb; tests substitute a
//! scripted bridge that replays canned UI dumps and records actions.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::AdbConfig;
use crate::errors::AutomationError;
use crate::CommandOutput;

/// Key events the send macro relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Back,
    Enter,
    SelectAll,
}

impl Key {
    /// Symbolic keycode understood by `input keyevent`.
    pub fn code(self) -> &'static str {
        match self {
            Key::Back => "KEYCODE_BACK",
            Key::Enter => "KEYCODE_ENTER",
            Key::SelectAll => "KEYCODE_CTRL_A",
        }
    }
}

/// Raw I/O against one automation target.
///
/// Only [`shell`](DeviceBridge::shell) and [`dump_ui`](DeviceBridge::dump_ui)
/// are required; the input methods are provided in terms of `shell` and the
/// `input` tool present on every Android build.
#[async_trait]
pub trait DeviceBridge: Send + Sync {
    /// Run a device-side shell command and capture its output.
    async fn shell(&self, cmd: &str) -> Result<CommandOutput, AutomationError>;

    /// Capture the current UI hierarchy as raw uiautomator XML.
    async fn dump_ui(&self) -> Result<String, AutomationError>;

    /// Tap at absolute screen coordinates.
    async fn tap(&self, x: i32, y: i32) -> Result<(), AutomationError> {
        self.shell(&format!("input tap {x} {y}")).await?;
        Ok(())
    }

    /// Swipe between two points. A zero-distance swipe held for `hold`
    /// doubles as a long press, which `input` has no direct verb for.
    async fn swipe(
        &self,
        from: (i32, i32),
        to: (i32, i32),
        hold: Duration,
    ) -> Result<(), AutomationError> {
        self.shell(&format!(
            "input swipe {} {} {} {} {}",
            from.0,
            from.1,
            to.0,
            to.1,
            hold.as_millis()
        ))
        .await?;
        Ok(())
    }

    /// Send a single key event.
    async fn key_event(&self, key: Key) -> Result<(), AutomationError> {
        self.shell(&format!("input keyevent {}", key.code())).await?;
        Ok(())
    }

    /// Inject literal text into the focused field. The text is wrapped in
    /// single quotes for the device-side shell; callers must not pass text
    /// containing one.
    async fn input_text(&self, text: &str) -> Result<(), AutomationError> {
        self.shell(&format!("input text '{text}'")).await?;
        Ok(())
    }
}

/// The production transport: spawns the configured adb executable with
/// `-s <serial>` so every command is pinned to one device.
pub struct AdbBridge {
    adb_path: PathBuf,
    serial: String,
}

impl AdbBridge {
    /// Connect to the device named in `config`, or auto-detect when no
    /// serial was given and exactly one attached device is ready.
    pub async fn connect(config: AdbConfig) -> Result<Self, AutomationError> {
        let output = Command::new(&config.adb_path)
            .arg("devices")
            .output()
            .await?;
        if !output.status.success() {
            return Err(AutomationError::CommandFailed(format!(
                "adb devices exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let listing = String::from_utf8_lossy(&output.stdout);
        let ready = parse_device_list(&listing);
        debug!(?ready, "attached devices");

        let serial = match config.serial {
            Some(serial) => {
                if ready.iter().any(|s| s == &serial) {
                    serial
                } else {
                    return Err(AutomationError::DeviceNotFound(format!(
                        "device {serial} is not attached and ready"
                    )));
                }
            }
            None => match ready.as_slice() {
                [only] => only.clone(),
                [] => {
                    return Err(AutomationError::DeviceNotFound(
                        "no attached device is in the `device` state".to_string(),
                    ))
                }
                _ => {
                    return Err(AutomationError::DeviceNotFound(format!(
                        "{} devices attached, pass a serial to pick one",
                        ready.len()
                    )))
                }
            },
        };

        info!(serial = %serial, "connected");
        Ok(Self {
            adb_path: config.adb_path,
            serial,
        })
    }

    async fn run(&self, args: &[&str]) -> Result<CommandOutput, AutomationError> {
        debug!(?args, "adb");
        let output = Command::new(&self.adb_path)
            .arg("-s")
            .arg(&self.serial)
            .args(args)
            .output()
            .await?;

        let result = CommandOutput {
            exit_status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        if !output.status.success() {
            return Err(AutomationError::CommandFailed(format!(
                "adb {} exited with {:?}: {}",
                args.join(" "),
                result.exit_status,
                result.stderr.trim()
            )));
        }
        Ok(result)
    }
}

#[async_trait]
impl DeviceBridge for AdbBridge {
    async fn shell(&self, cmd: &str) -> Result<CommandOutput, AutomationError> {
        self.run(&["shell", cmd]).await
    }

    async fn dump_ui(&self) -> Result<String, AutomationError> {
        // exec-out keeps the XML out of the shell's tty mangling. The dumper
        // still appends a status line after the document; Snapshot::parse
        // trims it.
        let output = self
            .run(&["exec-out", "uiautomator", "dump", "/dev/tty"])
            .await?;
        Ok(output.stdout)
    }
}

/// Serials in the `device` state from `adb devices` output. The header line
/// and devices stuck in `offline` or `unauthorized` fall out naturally.
pub(crate) fn parse_device_list(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(serial), Some("device")) => Some(serial.to_string()),
                _ => None,
            }
        })
        .collect()
}
