use std::sync::Arc;

use crate::bridge::Key;
use crate::composer::{compose_and_send, MAX_SEND_ATTEMPTS};
use crate::errors::AutomationError;
use crate::tests::fixtures::{
    self, CONTACT_FIELD_CENTER, SEND_BUTTON_CENTER, START_CHAT_CENTER, SUGGESTION_ROW_CENTER,
};
use crate::tests::mock::{Action, ScriptedBridge};
use crate::tests::{init_tracing, scripted_device};

const RECIPIENT: &str = "+14155552671";
const BODY: &str = "Service window tonight 22:00";

#[tokio::test]
async fn sends_through_the_full_macro() {
    init_tracing();
    let bridge = Arc::new(ScriptedBridge::new([
        fixtures::home_screen(),
        fixtures::new_chat_screen(),
        fixtures::suggestion_screen("Send to +14155552671"),
        fixtures::conversation_with_send(),
        fixtures::conversation_with_send(),
    ]));
    let device = scripted_device(&bridge);

    compose_and_send(&device, RECIPIENT, BODY, false)
        .await
        .unwrap();

    assert_eq!(
        bridge.actions(),
        vec![
            Action::Dump,
            Action::Tap(START_CHAT_CENTER.0, START_CHAT_CENTER.1),
            Action::Dump,
            Action::Tap(CONTACT_FIELD_CENTER.0, CONTACT_FIELD_CENTER.1),
            Action::Key(Key::SelectAll),
            // The '+' never goes over the text channel.
            Action::Text("14155552671".to_string()),
            Action::Key(Key::Enter),
            Action::Dump,
            Action::Tap(SUGGESTION_ROW_CENTER.0, SUGGESTION_ROW_CENTER.1),
            Action::Dump,
            Action::Text(BODY.to_string()),
            Action::Dump,
            Action::Tap(SEND_BUTTON_CENTER.0, SEND_BUTTON_CENTER.1),
        ]
    );
}

#[tokio::test]
async fn suggestion_row_matches_on_number_tail() {
    let bridge = Arc::new(ScriptedBridge::new([
        fixtures::home_screen(),
        fixtures::new_chat_screen(),
        // Plain digits, no "Send to" label.
        fixtures::suggestion_screen("4155552671"),
        fixtures::conversation_with_send(),
        fixtures::conversation_with_send(),
    ]));
    let device = scripted_device(&bridge);

    compose_and_send(&device, RECIPIENT, BODY, false)
        .await
        .unwrap();

    assert_eq!(
        bridge.count(|a| *a == Action::Tap(SUGGESTION_ROW_CENTER.0, SUGGESTION_ROW_CENTER.1)),
        1
    );
}

#[tokio::test]
async fn unmatched_suggestions_fall_back_to_enter() {
    let bridge = Arc::new(ScriptedBridge::new([
        fixtures::home_screen(),
        fixtures::new_chat_screen(),
        fixtures::suggestion_screen("Bob Smith"),
        fixtures::conversation_with_send(),
        fixtures::conversation_with_send(),
    ]));
    let device = scripted_device(&bridge);

    compose_and_send(&device, RECIPIENT, BODY, false)
        .await
        .unwrap();

    let actions = bridge.actions();
    assert_eq!(
        actions
            .iter()
            .filter(|a| **a == Action::Key(Key::Enter))
            .count(),
        2,
        "recipient commit plus the suggestion fallback"
    );
    assert!(!actions.contains(&Action::Tap(
        SUGGESTION_ROW_CENTER.0,
        SUGGESTION_ROW_CENTER.1
    )));
}

#[tokio::test]
async fn draft_mode_never_reaches_for_the_send_button() {
    // The sticky screen has an armed send button the whole time; draft mode
    // must still leave it alone.
    let bridge = Arc::new(ScriptedBridge::new([
        fixtures::home_screen(),
        fixtures::new_chat_screen(),
        fixtures::conversation_with_send(),
    ]));
    let device = scripted_device(&bridge);

    compose_and_send(&device, RECIPIENT, BODY, true)
        .await
        .unwrap();

    let actions = bridge.actions();
    assert!(!actions.contains(&Action::Tap(SEND_BUTTON_CENTER.0, SEND_BUTTON_CENTER.1)));
    assert_eq!(bridge.count(|a| *a == Action::Dump), 4);
    assert_eq!(
        actions.last(),
        Some(&Action::Text(BODY.to_string())),
        "the draft text is the final action"
    );
}

#[tokio::test]
async fn retries_until_the_screen_catches_up() {
    let bridge = Arc::new(ScriptedBridge::new([
        fixtures::home_screen_loading(),
        fixtures::home_screen_loading(),
        fixtures::home_screen(),
        fixtures::new_chat_screen(),
        fixtures::suggestion_screen("Send to +14155552671"),
        fixtures::conversation_with_send(),
        fixtures::conversation_with_send(),
    ]));
    let device = scripted_device(&bridge);

    compose_and_send(&device, RECIPIENT, BODY, false)
        .await
        .unwrap();

    assert_eq!(bridge.count(|a| *a == Action::Dump), 7);
    // Missing affordances re-enter the macro without unwinding.
    assert_eq!(bridge.count(|a| *a == Action::Key(Key::Back)), 0);
}

#[tokio::test]
async fn gives_up_after_the_attempt_budget() {
    let bridge = Arc::new(ScriptedBridge::new([fixtures::home_screen_loading()]));
    let device = scripted_device(&bridge);

    let err = compose_and_send(&device, RECIPIENT, BODY, false)
        .await
        .unwrap_err();

    match err {
        AutomationError::SendFailed {
            recipient,
            attempts,
        } => {
            assert_eq!(recipient, RECIPIENT);
            assert_eq!(attempts, MAX_SEND_ATTEMPTS);
        }
        other => panic!("expected SendFailed, got {other}"),
    }
    assert_eq!(bridge.count(|a| *a == Action::Dump), MAX_SEND_ATTEMPTS as usize);
}

#[tokio::test]
async fn device_errors_unwind_before_the_next_attempt() {
    let bridge = Arc::new(ScriptedBridge::new([
        fixtures::home_screen(),
        fixtures::home_screen(),
        fixtures::new_chat_screen(),
        fixtures::suggestion_screen("Send to +14155552671"),
        fixtures::conversation_with_send(),
        fixtures::conversation_with_send(),
    ]));
    bridge.fail_next_taps(1);
    let device = scripted_device(&bridge);

    compose_and_send(&device, RECIPIENT, BODY, false)
        .await
        .unwrap();

    let actions = bridge.actions();
    assert_eq!(
        bridge.count(|a| *a == Action::Key(Key::Back)),
        3,
        "one unwind of three back presses"
    );
    // The unwind happens before the second attempt's first capture.
    let first_back = actions
        .iter()
        .position(|a| *a == Action::Key(Key::Back))
        .unwrap();
    assert_eq!(actions[..first_back], [Action::Dump]);
}

#[tokio::test]
async fn no_unwind_after_the_final_attempt() {
    let bridge = Arc::new(ScriptedBridge::new([fixtures::home_screen()]));
    bridge.fail_next_taps(MAX_SEND_ATTEMPTS as usize);
    let device = scripted_device(&bridge);

    let err = compose_and_send(&device, RECIPIENT, BODY, false)
        .await
        .unwrap_err();

    assert!(matches!(err, AutomationError::SendFailed { .. }));
    // Two unwinds between three attempts, none after the last.
    assert_eq!(bridge.count(|a| *a == Action::Key(Key::Back)), 6);
    assert_eq!(bridge.count(|a| *a == Action::Dump), 3);
}
