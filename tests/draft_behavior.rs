//! Behavior-driven tests for draft portfolio editing
//!
//! These tests verify how the draft store reacts to form edits, additions and
//! removals, focusing on what the user sees in the holdings list and form.

use folio_core::{DraftCommand, DraftError, DraftStore, FormDraft, FormField, ValidationError};
use serde_json::json;

use folio_tests::add;

// =============================================================================
// Draft: Adding holdings
// =============================================================================

#[test]
fn when_form_is_complete_adding_resets_form_regardless_of_content() {
    // Given: A form with mixed-case, padded input
    let mut store = DraftStore::new();
    store.set_form_field(FormField::Ticker, "  tsla ");
    store.set_form_field(FormField::Quantity, "3");
    store.set_form_field(FormField::CostBasis, "212.40");

    // When: The user adds the holding
    store
        .apply(DraftCommand::AddHolding)
        .expect("complete form should be accepted");

    // Then: The form is back to its initial empty value
    assert_eq!(store.form(), &FormDraft::default());
    assert_eq!(store.holdings()[0].ticker.as_str(), "TSLA");
    assert_eq!(store.holdings()[0].cost_basis, 212.40);
}

#[test]
fn when_ticker_is_empty_add_is_rejected_and_holdings_unchanged() {
    // Given: An existing holding and a form without a ticker
    let mut store = DraftStore::new();
    add(&mut store, "AAPL", "1", "100");
    let before = store.snapshot();
    store.set_form_field(FormField::Ticker, "");
    store.set_form_field(FormField::Quantity, "10");
    store.set_form_field(FormField::CostBasis, "150");

    // When: The user tries to add it
    let error = store
        .apply(DraftCommand::AddHolding)
        .expect_err("missing ticker must be rejected");

    // Then: A validation error names the field and nothing changed
    assert_eq!(
        error,
        DraftError::Validation(ValidationError::MissingField {
            field: FormField::Ticker
        })
    );
    assert_eq!(store.holdings(), before.as_slice());
    assert_eq!(store.form().quantity, "10");
}

#[test]
fn when_same_ticker_is_added_twice_both_entries_are_kept() {
    // Given: An empty draft
    let mut store = DraftStore::new();

    // When: The same ticker is added twice with different lots
    add(&mut store, "aapl", "10", "150");
    add(&mut store, "AAPL", "5", "170");

    // Then: Both lots exist independently
    assert_eq!(store.holdings().len(), 2);
    assert_eq!(store.holdings()[0].quantity, 10.0);
    assert_eq!(store.holdings()[1].quantity, 5.0);
}

#[test]
fn when_quantity_is_not_a_number_user_gets_actionable_error() {
    let mut store = DraftStore::new();
    store.set_form_field(FormField::Ticker, "AAPL");
    store.set_form_field(FormField::Quantity, "12abc");
    store.set_form_field(FormField::CostBasis, "150");

    let error = store.add_holding().expect_err("must be rejected");

    assert!(error.to_string().contains("quantity"));
    assert!(store.is_empty());
}

// =============================================================================
// Draft: Removing holdings
// =============================================================================

#[test]
fn when_removing_out_of_range_index_holdings_are_unchanged() {
    // Given: Two holdings
    let mut store = DraftStore::new();
    add(&mut store, "AAPL", "1", "1");
    add(&mut store, "MSFT", "2", "2");
    let before = store.clone();

    // When: A stale index is removed
    store
        .apply(DraftCommand::RemoveHolding { index: 2 })
        .expect("out-of-range removal is a no-op");
    store
        .apply(DraftCommand::RemoveHolding { index: usize::MAX })
        .expect("out-of-range removal is a no-op");

    // Then: The store is exactly as before
    assert_eq!(store, before);
}

#[test]
fn when_removing_does_not_touch_the_form() {
    let mut store = DraftStore::new();
    add(&mut store, "AAPL", "1", "1");
    store.set_form_field(FormField::Ticker, "goog");

    store
        .apply(DraftCommand::RemoveHolding { index: 0 })
        .expect("in-range removal");

    assert!(store.is_empty());
    assert_eq!(store.form().ticker, "goog");
}

// =============================================================================
// Draft: Snapshots and dispatch
// =============================================================================

#[test]
fn when_snapshot_is_taken_later_edits_do_not_leak_into_it() {
    let mut store = DraftStore::new();
    add(&mut store, "AAPL", "10", "150");

    let snapshot = store.snapshot();
    add(&mut store, "MSFT", "1", "1");
    store.remove_holding(0);

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].ticker.as_str(), "AAPL");
}

#[test]
fn when_presentation_dispatches_unknown_action_caller_gets_programming_error() {
    let mut store = DraftStore::new();
    add(&mut store, "AAPL", "10", "150");
    let before = store.clone();

    let error = store
        .dispatch(&json!({"type": "CLEAR_ALL"}))
        .expect_err("unknown action must be rejected");

    assert!(error.is_programming());
    assert_eq!(store, before);
}

#[test]
fn when_remove_action_lacks_index_caller_gets_programming_error() {
    let mut store = DraftStore::new();

    let error = store
        .dispatch(&json!({"type": "REMOVE_HOLDING"}))
        .expect_err("malformed action must be rejected");

    assert!(error.is_programming());
}
