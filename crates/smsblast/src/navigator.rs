//! Best-effort recovery back to the conversation list.

use regex::Regex;
use tracing::{debug, warn};

use crate::bridge::Key;
use crate::errors::AutomationError;
use crate::messages;
use crate::selector::Selector;
use crate::snapshot::{Snapshot, UiNode};
use crate::Device;

/// Back navigations issued before checking for the home-screen landmark.
const MAX_BACK_STEPS: usize = 2;

/// Walk back toward the conversation list from wherever the app is.
///
/// Each step prefers the on-screen back affordance and falls back to the
/// hardware back key. Returns whether the home-screen landmark was visible
/// afterwards; callers proceed either way, so this never fails. A bridge
/// error mid-walk degrades to raw back keys.
pub async fn return_to_home(device: &Device) -> bool {
    match walk_back(device).await {
        Ok(found) => {
            if !found {
                warn!("conversation list landmark not visible after back navigation");
            }
            found
        }
        Err(err) => {
            warn!(error = %err, "back navigation failed, sending raw back keys");
            for _ in 0..MAX_BACK_STEPS {
                if let Err(err) = device.press_key(Key::Back).await {
                    warn!(error = %err, "raw back key failed");
                }
                device.settle(device.timing().nav_settle).await;
            }
            false
        }
    }
}

async fn walk_back(device: &Device) -> Result<bool, AutomationError> {
    let back = Selector::DescriptionMatches(Regex::new(messages::BACK_DESC_PATTERN)?);
    for step in 1..=MAX_BACK_STEPS {
        let snapshot = device.capture_snapshot().await?;
        match snapshot.find(&back) {
            Some(affordance) => {
                debug!(step, "tapping back affordance");
                device.tap(affordance).await?;
            }
            None => {
                debug!(step, "no back affordance on screen, sending back key");
                device.press_key(Key::Back).await?;
            }
        }
        device.settle(device.timing().nav_settle).await;
    }

    let snapshot = device.capture_snapshot().await?;
    Ok(locate_start_chat(&snapshot).is_some())
}

/// The home-screen landmark: the start-chat button, looked up by id with a
/// text fallback for builds that label it instead.
pub(crate) fn locate_start_chat(snapshot: &Snapshot) -> Option<&UiNode> {
    snapshot
        .find(&Selector::id(messages::START_CHAT_ID))
        .or_else(|| snapshot.find(&Selector::text_contains(messages::START_CHAT_TEXT)))
}
