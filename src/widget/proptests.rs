//! Property-based tests for rendering and input handling
//!
//! - Untrusted text never reaches the markup unescaped
//! - Blank free text never produces entries or requests
//! - Removing typing placeholders leaves every other entry in order

use super::{escape_html, ChatEntry, DialogueDriver, MessageLog};
use crate::backend::testing::MockBackend;
use crate::widget::DEFAULT_AUTO_PROMPT_DELAY;
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

/// Arbitrary text biased toward markup characters
fn arb_markup_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("<".to_string()),
            Just(">".to_string()),
            Just("\"".to_string()),
            Just("'".to_string()),
            Just("&".to_string()),
            Just("&amp;".to_string()),
            "[a-zA-Z0-9 /=]{1,8}",
        ],
        0..20,
    )
    .prop_map(|parts| parts.concat())
}

fn arb_blank_text() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,12}"
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {


    #[test]
    fn prop_escaped_text_has_no_raw_markup(text in arb_markup_text()) {
        let escaped = escape_html(&text);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
        prop_assert!(!escaped.contains('\''));
    }

    /// Every `&` in the output starts an entity we produced
    #[test]
    fn prop_escaped_ampersands_are_entities(text in arb_markup_text()) {
        let escaped = escape_html(&text);
        for (i, _) in escaped.match_indices('&') {
            let rest = escaped.get(i..).unwrap_or_default();
            prop_assert!(
                ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;"]
                    .iter()
                    .any(|entity| rest.starts_with(entity)),
                "stray ampersand in {escaped}"
            );
        }
    }

    #[test]
    fn prop_user_entry_markup_is_inert(text in arb_markup_text()) {
        let html = ChatEntry::user(&text).to_html();
        let inner = html
            .strip_prefix(r#"<div class="ai-msg user">"#)
            .and_then(|rest| rest.strip_suffix("</div>"));
        prop_assert_eq!(inner.map(str::to_string), Some(escape_html(&text)));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_blank_text_is_a_no_op(text in arb_blank_text()) {
        let mock = Arc::new(MockBackend::new());
        let driver = DialogueDriver::new(Arc::clone(&mock), None, DEFAULT_AUTO_PROMPT_DELAY);

        runtime().block_on(driver.send_free_text(&text));

        prop_assert!(driver.entries().is_empty());
        prop_assert!(mock.recorded_calls().is_empty());
    }

    #[test]
    fn prop_remove_keeps_other_entries_in_order(
        labels in proptest::collection::vec("[a-z]{1,6}", 1..12),
        typing_at in proptest::collection::vec(any::<bool>(), 1..12),
    ) {
        let mut log = MessageLog::default();
        let mut typing_ids = Vec::new();
        for (label, typing) in labels.iter().zip(typing_at.iter().chain(std::iter::repeat(&false))) {
            log.push(ChatEntry::user(label));
            if *typing {
                let entry = ChatEntry::typing();
                typing_ids.push(entry.id);
                log.push(entry);
            }
        }

        for id in typing_ids {
            prop_assert!(log.remove(id));
        }

        let remaining: Vec<_> = log.entries().iter().map(ChatEntry::to_plain_text).collect();
        let expected: Vec<_> = labels.iter().map(|l| format!("> {l}")).collect();
        prop_assert_eq!(remaining, expected);
    }
}
