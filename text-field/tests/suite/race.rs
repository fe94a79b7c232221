use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use oxi_text_field::FieldSettings;
use oxi_text_field::KeyOutcome;
use oxi_text_field::Suggestion;
use pretty_assertions::assert_eq;

use crate::common::Harness;
use crate::common::ScriptedTransport;
use crate::common::lookup_content;
use crate::common::simple_lookup;
use crate::common::suggestions;

fn two_char_settings() -> FieldSettings {
    FieldSettings {
        min_query_chars: 2,
        ..FieldSettings::default()
    }
}

/// Issues lookups for "jo" and then "john"; both stay in flight.
async fn two_lookups_in_flight() -> Harness {
    let mut h = Harness::with_settings(
        lookup_content(None, simple_lookup()),
        ScriptedTransport::gated(),
        two_char_settings(),
    );

    h.field.on_text_input("jo");
    h.next_event().await;
    h.field.on_text_input("john");
    h.next_event().await;
    h
}

#[tokio::test(start_paused = true)]
async fn late_reply_of_older_query_is_dropped() {
    let mut h = two_lookups_in_flight().await;

    h.transport
        .release("john", suggestions(&[("j1", "John Doe"), ("j2", "John Roe")]))
        .await;
    h.next_event().await;
    h.transport
        .release("jo", suggestions(&[("x", "Joanna")]))
        .await;
    h.next_event().await;

    assert_eq!(h.transport.queried_values(), vec!["jo", "john"]);
    assert_eq!(h.labels(), vec!["John Doe", "John Roe"]);
    assert!(h.field.is_dropdown_open());
    assert_eq!(
        h.field.active_suggestion(),
        Some(&Suggestion::new("j1", "John Doe"))
    );
}

#[tokio::test(start_paused = true)]
async fn early_reply_of_older_query_is_dropped_too() {
    let mut h = two_lookups_in_flight().await;

    h.transport
        .release("jo", suggestions(&[("x", "Joanna")]))
        .await;
    h.next_event().await;
    assert!(h.field.search_results().is_empty());
    assert!(h.field.is_lookup_in_flight());

    h.transport
        .release("john", suggestions(&[("j1", "John Doe")]))
        .await;
    h.next_event().await;

    assert_eq!(h.labels(), vec!["John Doe"]);
    assert!(h.field.is_dropdown_open());
    assert!(!h.field.is_lookup_in_flight());
}

#[tokio::test(start_paused = true)]
async fn empty_reply_closes_dropdown() {
    let transport = ScriptedTransport::immediate();
    transport.reply("abc", suggestions(&[("1", "one")]));
    let mut h = Harness::new(lookup_content(None, simple_lookup()), transport);

    h.field.on_text_input("abc");
    h.settle().await;
    assert!(h.field.is_dropdown_open());

    h.field.on_text_input("abcx");
    h.settle().await;
    assert!(h.field.search_results().is_empty());
    assert!(!h.field.is_dropdown_open());
}

#[tokio::test(start_paused = true)]
async fn reply_for_input_shortened_below_minimum_is_dropped() {
    let mut h = Harness::new(
        lookup_content(None, simple_lookup()),
        ScriptedTransport::gated(),
    );

    h.field.on_text_input("abc");
    h.next_event().await;
    assert!(h.field.is_lookup_in_flight());

    h.field.on_text_input("ab");
    assert!(!h.field.is_lookup_in_flight());

    h.transport
        .release("abc", suggestions(&[("1", "abc-one")]))
        .await;
    h.next_event().await;

    assert!(!h.field.is_dropdown_open());
    assert!(h.field.search_results().is_empty());
    assert_eq!(
        h.field
            .handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
        KeyOutcome::Ignored
    );
    assert_eq!(h.field.value(), Some("ab"));
    assert_eq!(h.transport.queried_values(), vec!["abc"]);
}

#[tokio::test(start_paused = true)]
async fn reply_for_replaced_value_is_dropped_while_timer_is_armed() {
    let mut h = Harness::new(
        lookup_content(None, simple_lookup()),
        ScriptedTransport::gated(),
    );

    h.field.on_text_input("abc");
    h.next_event().await;
    h.field.on_text_input("abcd");

    h.transport
        .release("abc", suggestions(&[("1", "abc-one")]))
        .await;
    h.next_event().await;

    assert!(h.field.search_results().is_empty());
    assert!(!h.field.is_dropdown_open());
    assert!(h.field.is_query_pending());
}
