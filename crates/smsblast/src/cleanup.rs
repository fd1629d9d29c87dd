//! Deleting the conversation a send just created.

use tracing::{info, warn};

use crate::errors::AutomationError;
use crate::messages;
use crate::selector::Selector;
use crate::Device;

/// Long-press the topmost conversation row and confirm its deletion.
///
/// Strictly best-effort: a conversation left behind costs nothing, so any
/// missing affordance or bridge failure is logged and swallowed.
pub async fn delete_most_recent_conversation(device: &Device) {
    if let Err(err) = try_delete(device).await {
        warn!(error = %err, "could not delete conversation");
    }
}

async fn try_delete(device: &Device) -> Result<(), AutomationError> {
    let timing = device.timing();

    let snapshot = device.capture_snapshot().await?;
    let row = snapshot
        .find(&Selector::id(messages::CONVERSATION_ROW_ID))
        .ok_or_else(|| AutomationError::ElementNotFound("conversation row".to_string()))?;
    device.long_press(row, timing.long_press_hold).await?;
    device.settle(timing.nav_settle).await;

    let snapshot = device.capture_snapshot().await?;
    let delete = snapshot
        .find(&Selector::id(messages::DELETE_ACTION_ID))
        .ok_or_else(|| AutomationError::ElementNotFound("delete action".to_string()))?;
    device.tap(delete).await?;
    device.settle(timing.focus_settle).await;

    let snapshot = device.capture_snapshot().await?;
    let confirm = snapshot
        .find(&Selector::id(messages::CONFIRM_BUTTON_ID))
        .ok_or_else(|| AutomationError::ElementNotFound("delete confirmation".to_string()))?;
    device.tap(confirm).await?;
    device.settle(timing.nav_settle).await;

    info!("conversation deleted");
    Ok(())
}
