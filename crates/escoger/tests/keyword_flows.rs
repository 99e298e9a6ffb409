//! End-to-end keyword flows against the in-process driver.
//!
//! These tests drive whole keyword invocations through `SelectLibrary`,
//! the way a test-execution host would.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use escoger::mock::{MockDriver, MockSelect};
use escoger::{EscogerError, SelectLibrary, SessionCapabilities};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

// ============================================================================
// Select / read round-trips
// ============================================================================

#[test]
fn test_select_by_value_then_read_back() {
    init_tracing();
    let lib = SelectLibrary::new(MockDriver::new().select(
        MockSelect::single("id=country")
            .option("us", "United States")
            .option("uk", "United Kingdom"),
    ));

    lib.select_from_list_by_value("id=country", &strings(&["us"]))
        .unwrap();

    assert_eq!(
        lib.get_selected_list_label("id=country").unwrap(),
        "United States"
    );
    assert_eq!(lib.get_selected_list_value("id=country").unwrap(), "us");
}

#[test]
fn test_select_all_selects_five_of_five_in_dom_order() {
    init_tracing();
    let lib = SelectLibrary::new(MockDriver::new().select(
        MockSelect::multiple("id=days")
            .option("mo", "Monday")
            .option("tu", "Tuesday")
            .option("we", "Wednesday")
            .option("th", "Thursday")
            .option("fr", "Friday"),
    ));

    lib.select_all_from_list("id=days").unwrap();

    assert_eq!(
        lib.get_selected_list_labels("id=days").unwrap(),
        ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
    );
}

#[test]
fn test_unselect_everything_clears_three_selections() {
    init_tracing();
    let lib = SelectLibrary::new(MockDriver::new().select(
        MockSelect::multiple("id=tags")
            .option_selected("a", "Alpha")
            .option_selected("b", "Beta")
            .option_selected("c", "Gamma"),
    ));

    lib.unselect_from_list("id=tags", &[]).unwrap();

    assert!(lib.driver().selected_texts("id=tags").is_empty());
    assert!(matches!(
        lib.get_selected_list_labels("id=tags"),
        Err(EscogerError::NoSelection { .. })
    ));
}

#[test]
fn test_irregular_whitespace_label_resolves_on_broken_backend() {
    init_tracing();
    let lib = SelectLibrary::new(
        MockDriver::new()
            .select(
                MockSelect::single("id=city")
                    .option("bos", "Boston")
                    .option("ny", "New   York"),
            )
            .break_exact_text_queries(),
    );

    lib.select_from_list("id=city", &strings(&["New York"]))
        .unwrap();

    assert_eq!(lib.get_selected_list_value("id=city").unwrap(), "ny");
}

// ============================================================================
// Escalation policy through the keyword surface
// ============================================================================

#[test]
fn test_single_select_mid_miss_succeeds_last_miss_fails() {
    init_tracing();
    let lib = SelectLibrary::new(MockDriver::new().select(
        MockSelect::single("id=country")
            .option("us", "United States")
            .option("de", "Germany"),
    ));

    // Miss in the middle, hit at the end: success with a warning.
    lib.select_from_list("id=country", &strings(&["Atlantis", "de"]))
        .unwrap();
    assert_eq!(lib.get_selected_list_value("id=country").unwrap(), "de");

    // Hit then miss at the end: fatal.
    let err = lib
        .select_from_list("id=country", &strings(&["us", "Atlantis"]))
        .unwrap_err();
    assert!(matches!(err, EscogerError::OptionNotFound { .. }));
}

#[test]
fn test_multi_select_any_miss_fails() {
    init_tracing();
    let lib = SelectLibrary::new(MockDriver::new().select(
        MockSelect::multiple("id=fruits")
            .option("ap", "Apple")
            .option("ba", "Banana"),
    ));

    let err = lib
        .select_from_list("id=fruits", &strings(&["Mango", "Apple"]))
        .unwrap_err();
    assert!(matches!(err, EscogerError::OptionsNotFound { .. }));
    // The resolvable token was still applied before escalation.
    assert_eq!(lib.driver().selected_texts("id=fruits"), ["Apple"]);
}

#[test]
fn test_unselect_on_single_select_is_rejected_before_mutation() {
    init_tracing();
    let lib = SelectLibrary::new(MockDriver::new().select(
        MockSelect::single("id=country").option_selected("us", "United States"),
    ));

    let err = lib
        .unselect_from_list_by_value("id=country", &strings(&["us"]))
        .unwrap_err();
    assert!(matches!(err, EscogerError::NotMultiselect { .. }));
    assert_eq!(
        lib.driver().selected_texts("id=country"),
        ["United States"]
    );
}

// ============================================================================
// Assertions
// ============================================================================

#[test]
fn test_empty_expectation_passes_on_empty_selection_and_fails_otherwise() {
    init_tracing();
    let lib = SelectLibrary::new(
        MockDriver::new()
            .select(MockSelect::single("id=empty").option("a", "A"))
            .select(MockSelect::single("id=full").option_selected("b", "B")),
    );

    lib.list_selection_should_be("id=empty", &[]).unwrap();

    let err = lib.list_selection_should_be("id=full", &[]).unwrap_err();
    assert!(matches!(err, EscogerError::SelectionMismatch { .. }));
}

#[test]
fn test_no_selection_assertion() {
    init_tracing();
    let lib = SelectLibrary::new(
        MockDriver::new()
            .select(MockSelect::single("id=empty").option("a", "A"))
            .select(MockSelect::single("id=full").option_selected("b", "B")),
    );

    lib.list_should_have_no_selections("id=empty").unwrap();

    let err = lib.list_should_have_no_selections("id=full").unwrap_err();
    match err {
        EscogerError::UnexpectedSelection { selected, .. } => assert_eq!(selected, ["B"]),
        other => panic!("expected UnexpectedSelection, got {other:?}"),
    }
}

#[test]
fn test_selection_should_be_mixes_values_and_labels() {
    init_tracing();
    let lib = SelectLibrary::new(MockDriver::new().select(
        MockSelect::multiple("id=fruits")
            .option_selected("ap", "Apple")
            .option_selected("ba", "Banana"),
    ));

    // One expectation by value, one by label.
    lib.list_selection_should_be("id=fruits", &strings(&["ap", "Banana"]))
        .unwrap();
}

// ============================================================================
// Marionette sessions
// ============================================================================

#[test]
fn test_marionette_session_selects_without_native_clicks() {
    init_tracing();
    let lib = SelectLibrary::new(
        MockDriver::new()
            .with_capabilities(SessionCapabilities::marionette())
            .select(
                MockSelect::multiple("id=fruits")
                    .option("ap", "Apple")
                    .option("ba", "Banana")
                    .with_change_handler(),
            ),
    );

    lib.select_from_list("id=fruits", &strings(&["Apple", "ba"]))
        .unwrap();

    assert_eq!(
        lib.get_selected_list_labels("id=fruits").unwrap(),
        ["Apple", "Banana"]
    );
    assert_eq!(lib.driver().click_count(), 0);
    assert_eq!(lib.driver().change_event_count("id=fruits"), 2);
}

#[test]
fn test_marionette_session_without_change_handler_still_succeeds() {
    init_tracing();
    let lib = SelectLibrary::new(
        MockDriver::new()
            .with_capabilities(SessionCapabilities::marionette())
            .select(MockSelect::single("id=country").option("us", "United States")),
    );

    lib.select_from_list("id=country", &strings(&["us"]))
        .unwrap();
    assert_eq!(lib.get_selected_list_value("id=country").unwrap(), "us");
}
