//! UI map for the Google Messages app.
//!
//! Resource ids below were lifted from uiautomator dumps of current
//! Messages builds. The bare names are Compose test tags, which surface in
//! dumps as resource-ids without a `package:id/` prefix. When the macro
//! stops finding its affordances after an app update, re-check these first
//! (`smsblast --dump-ui` prints what the device actually shows).

use crate::errors::AutomationError;
use crate::Device;

pub const PACKAGE: &str = "com.google.android.apps.messaging";

/// Home screen activity, the conversation list.
pub const CONVERSATION_LIST_ACTIVITY: &str = ".ui.ConversationListActivity";

/// "Start chat" button on the home screen. Also serves as the landmark that
/// tells us we are back on the conversation list.
pub const START_CHAT_ID: &str = "com.google.android.apps.messaging:id/start_chat_fab";
/// Fallback for builds where the button carries a label instead of the id.
pub const START_CHAT_TEXT: &str = "Start chat";

/// Recipient entry field on the new-conversation screen.
pub const CONTACT_SEARCH_FIELD_ID: &str = "ContactSearchField";
/// Suggestion list shown while a recipient is being typed.
pub const CONTACT_SUGGESTION_LIST_ID: &str = "ContactSuggestionList";
/// Label prefix on the raw-number suggestion row ("Send to +1...").
pub const SEND_TO_LABEL: &str = "Send to";

/// Send button inside a conversation. Only valid once draft text is
/// present; with an empty draft the same control starts a voice recording.
pub const SEND_BUTTON_ID: &str = "Compose:Draft:Send";

/// Topmost conversation row on the home screen.
pub const CONVERSATION_ROW_ID: &str = "com.google.android.apps.messaging:id/swipeableContainer";
/// Delete action in the action bar a long-pressed row brings up.
pub const DELETE_ACTION_ID: &str = "com.google.android.apps.messaging:id/action_delete";
/// Positive button of the platform confirmation dialog.
pub const CONFIRM_BUTTON_ID: &str = "android:id/button1";

/// Content description carried by back affordances across Messages screens.
pub const BACK_DESC_PATTERN: &str = "Back";

/// Bring Messages to the foreground on its conversation list and give it
/// time to draw.
pub async fn launch(device: &Device) -> Result<(), AutomationError> {
    device
        .shell(&format!("am start -n {PACKAGE}/{CONVERSATION_LIST_ACTIVITY}"))
        .await?;
    device.settle(device.timing().app_launch).await;
    Ok(())
}
