use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("no usable device: {0}")]
    DeviceNotFound(String),

    #[error("failed to spawn adb: {0}")]
    AdbSpawn(#[from] std::io::Error),

    #[error("adb command failed: {0}")]
    CommandFailed(String),

    #[error("could not parse UI snapshot: {0}")]
    SnapshotParse(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("invalid element pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("send failed for {recipient} after {attempts} attempts")]
    SendFailed { recipient: String, attempts: u32 },
}
