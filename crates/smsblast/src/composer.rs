//! The per-recipient send macro.
//!
//! One attempt is a fixed snapshot, locate, act sequence through the
//! Messages UI. Attempt outcomes are tagged: a missing affordance means the
//! screen has not caught up yet, so the macro re-enters from the top after a
//! pause; a bridge failure means the device is in an unknown state, so the
//! macro unwinds with back presses first. Only an exhausted retry budget
//! reaches the caller as an error.

use tracing::{debug, info, warn};

use crate::bridge::Key;
use crate::errors::AutomationError;
use crate::messages;
use crate::navigator;
use crate::selector::Selector;
use crate::snapshot::{Snapshot, UiNode};
use crate::Device;

/// Attempts per recipient before giving up.
pub const MAX_SEND_ATTEMPTS: u32 = 3;

/// Back presses used to unwind a partially completed attempt.
const UNWIND_BACK_PRESSES: usize = 3;

enum AttemptError {
    /// An expected affordance was not on screen.
    MissingUi(&'static str),
    /// The bridge failed mid-macro.
    Device(AutomationError),
}

impl From<AutomationError> for AttemptError {
    fn from(err: AutomationError) -> Self {
        AttemptError::Device(err)
    }
}

/// Drive one message to one recipient, retrying the whole macro on failure.
///
/// `recipient` is expected in E.164 form. With `draft_only` the composed
/// text is left sitting in the conversation and the send button is never
/// touched.
pub async fn compose_and_send(
    device: &Device,
    recipient: &str,
    body: &str,
    draft_only: bool,
) -> Result<(), AutomationError> {
    for attempt in 1..=MAX_SEND_ATTEMPTS {
        match attempt_send(device, recipient, body, draft_only).await {
            Ok(()) => {
                let outcome = if draft_only { "draft saved" } else { "sent" };
                info!(recipient = %recipient, attempt, outcome, "recipient done");
                return Ok(());
            }
            Err(AttemptError::MissingUi(stage)) => {
                warn!(recipient = %recipient, attempt, stage, "affordance not on screen");
                device.settle(device.timing().retry_pause).await;
            }
            Err(AttemptError::Device(err)) => {
                warn!(recipient = %recipient, attempt, error = %err, "attempt failed");
                if attempt < MAX_SEND_ATTEMPTS {
                    unwind(device).await;
                    device.settle(device.timing().retry_pause).await;
                }
            }
        }
    }
    Err(AutomationError::SendFailed {
        recipient: recipient.to_string(),
        attempts: MAX_SEND_ATTEMPTS,
    })
}

async fn attempt_send(
    device: &Device,
    recipient: &str,
    body: &str,
    draft_only: bool,
) -> Result<(), AttemptError> {
    let timing = device.timing();

    // Home screen: enter the new-conversation flow.
    let snapshot = device.capture_snapshot().await?;
    let Some(start_chat) = navigator::locate_start_chat(&snapshot) else {
        return Err(AttemptError::MissingUi("start chat"));
    };
    device.tap(start_chat).await?;
    device.settle(timing.screen_change).await;

    // Recipient field. Select-all first so a leftover entry from a previous
    // attempt gets replaced instead of appended to.
    let snapshot = device.capture_snapshot().await?;
    let Some(field) = snapshot.find(&Selector::id(messages::CONTACT_SEARCH_FIELD_ID)) else {
        return Err(AttemptError::MissingUi("contact search field"));
    };
    device.tap(field).await?;
    device.settle(timing.focus_settle).await;
    device.press_key(Key::SelectAll).await?;
    device.settle(timing.key_settle).await;

    // The text channel cannot carry '+', so the number goes in bare, and
    // enter commits it as the recipient.
    let bare_number = recipient.strip_prefix('+').unwrap_or(recipient);
    device.type_text(bare_number).await?;
    device.settle(timing.suggestion_wait).await;
    device.press_key(Key::Enter).await?;
    device.settle(timing.screen_change).await;

    // Some builds keep the suggestion list up instead of committing. Tap the
    // row that matches the recipient; failing that, another enter moves on.
    let snapshot = device.capture_snapshot().await?;
    if snapshot
        .find(&Selector::id(messages::CONTACT_SUGGESTION_LIST_ID))
        .is_some()
    {
        match pick_suggestion(&snapshot, recipient) {
            Some(row) => {
                debug!(recipient = %recipient, row = %row.text, "tapping suggestion");
                device.tap(row).await?;
            }
            None => {
                debug!(recipient = %recipient, "no matching suggestion, committing with enter");
                device.press_key(Key::Enter).await?;
            }
        }
        device.settle(timing.screen_change).await;
    }

    // Conversation screen. The compose field takes focus on entry, so the
    // body can be injected without another lookup.
    device.settle(timing.text_settle).await;
    let snapshot = device.capture_snapshot().await?;
    debug!(nodes = snapshot.iter().count(), "conversation screen up");
    device.type_text(body).await?;
    device.settle(timing.text_settle).await;

    // Unsent text is already a draft, so draft mode stops here. Never go
    // near the send control without text present: with an empty draft it
    // records audio instead.
    if !draft_only {
        let snapshot = device.capture_snapshot().await?;
        match snapshot.find(&Selector::id(messages::SEND_BUTTON_ID)) {
            Some(send) => device.tap(send).await?,
            None => {
                debug!("send button not found, committing with enter");
                device.press_key(Key::Enter).await?;
            }
        }
        device.settle(timing.screen_change).await;
    }

    Ok(())
}

/// Scan clickable rows for one that looks like the recipient: the last ten
/// digits of the number, or the "Send to" row Messages offers for a raw
/// number. Inherently locale-sensitive; E.164 input keeps it workable.
fn pick_suggestion<'a>(snapshot: &'a Snapshot, recipient: &str) -> Option<&'a UiNode> {
    let digits: String = recipient.chars().filter(char::is_ascii_digit).collect();
    let tail = &digits[digits.len().saturating_sub(10)..];
    snapshot
        .find_all(&Selector::attribute("clickable", "true"))
        .into_iter()
        .find(|node| {
            if node.text.is_empty() {
                return false;
            }
            (!tail.is_empty() && node.text.contains(tail))
                || node.text.contains(messages::SEND_TO_LABEL)
        })
}

/// Back out of whatever screen an aborted attempt left up. Failures here
/// are logged and swallowed; the retry loop continues regardless.
async fn unwind(device: &Device) {
    for _ in 0..UNWIND_BACK_PRESSES {
        if let Err(err) = device.press_key(Key::Back).await {
            warn!(error = %err, "unwind back press failed");
        }
        device.settle(device.timing().unwind_step).await;
    }
}
