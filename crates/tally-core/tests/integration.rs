//! Integration tests for tally-core.
//!
//! These tests drive the public API from host payload to display string.

use tally_core::{
    Channel, ConfigError, KeySet, LocalBus, Bus, Payload, PayloadError, StatisticKind,
    SummaryModel, TallyError,
};

fn model(json: &str) -> SummaryModel {
    SummaryModel::from_payload(Payload::from_json(json).expect("valid json")).expect("valid payload")
}

// =============================================================================
// Host Scenarios
// =============================================================================

#[test]
fn test_distinct_count_of_repeated_values() {
    let m = model(r#"{"data": [1, 2, 2, 3], "settings": {"statistic": "distinct_count"}}"#);
    assert_eq!(m.display(None, None).unwrap(), "3");
}

#[test]
fn test_duplicates_of_repeated_values() {
    let m = model(r#"{"data": [1, 2, 2, 3], "settings": {"statistic": "duplicates"}}"#);
    assert_eq!(m.display(None, None).unwrap(), "1");
}

#[test]
fn test_mean_with_one_digit() {
    let m = model(r#"{"data": [10, 20, 30], "settings": {"statistic": "mean", "digits": 1}}"#);
    assert_eq!(m.display(None, None).unwrap(), "20.0");
}

#[test]
fn test_count_rate_from_flags() {
    let m = model(
        r#"{
            "data": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            "denominator_flag": [true, true, true, true, false, false, false, false, false, false],
            "numerator_flag":   [true, false, true, false, true, true, false, false, false, false],
            "settings": {"statistic": "count_rate", "suffix": " ignored"}
        }"#,
    );
    assert_eq!(m.display(None, None).unwrap(), "50%");
}

#[test]
fn test_empty_filter_is_full_dataset() {
    let m = model(r#"{"data": [1, 2, 3], "settings": {"statistic": "count"}}"#);
    let empty = KeySet::from_event(Some(vec![]));
    assert_eq!(m.display(empty.as_ref(), None).unwrap(), "3");
}

#[test]
fn test_disjoint_filter_and_selection() {
    let m = model(
        r#"{"data": [1, 2, 3, 4], "key": ["a", "b", "c", "d"], "settings": {"statistic": "count"}}"#,
    );
    let filter = KeySet::new(["a", "b"]);
    let selection = KeySet::new(["c", "d"]);
    assert_eq!(m.display(Some(&filter), Some(&selection)).unwrap(), "0");
}

#[test]
fn test_nested_list_values_count_and_dedupe() {
    let m = model(r#"{"data": [[1, 2], [1, 2], [3]], "settings": {"statistic": "duplicates"}}"#);
    assert_eq!(m.display(None, None).unwrap(), "1");
}

// =============================================================================
// Formatting Through Settings
// =============================================================================

#[test]
fn test_big_mark_prefix_suffix() {
    let m = model(
        r#"{"data": [1200000, 34567.5], "settings": {"statistic": "sum", "digits": 2,
            "big_mark": ",", "prefix": "$", "suffix": " total"}}"#,
    );
    assert_eq!(m.display(None, None).unwrap(), "$1,234,567.50 total");
}

#[test]
fn test_overflowing_sum_shows_infinity() {
    let m = model(r#"{"data": [1.7e308, 1.7e308], "settings": {"statistic": "sum", "big_mark": ","}}"#);
    assert_eq!(m.display(None, None).unwrap(), "Infinity");
}

#[test]
fn test_category_rate_with_records() {
    let m = model(
        r#"{
            "data": [
                {"id": 1, "stage": "won"},
                {"id": 2, "stage": "lost"},
                {"id": 3, "stage": "won"},
                {"id": 4, "stage": "open"}
            ],
            "key": ["o1", "o2", "o3", "o4"],
            "settings": {"statistic": "rate", "selector": "stage", "numerator": "won",
                         "denominator": ["won", "lost"], "digits": 1}
        }"#,
    );
    assert_eq!(m.display(None, None).unwrap(), "66.7%");

    let filter = KeySet::new(["o1", "o2"]);
    assert_eq!(m.display(Some(&filter), None).unwrap(), "50.0%");
}

#[test]
fn test_numeric_rate_weights() {
    let m = model(
        r#"{
            "data": [null, null, null],
            "denominator_flag": [true, true, false],
            "numerator_flag": [true, false, true],
            "numerator_value": [25, 40, 1000],
            "denominator_value": [100, 100, 1000],
            "settings": {"statistic": "numeric_rate", "digits": 1}
        }"#,
    );
    assert_eq!(m.display(None, None).unwrap(), "12.5%");
}

#[test]
fn test_numeric_rate_sums_record_ids_by_category() {
    let m = model(
        r#"{
            "data": [{"id": 30, "stage": "won"}, {"id": 70, "stage": "lost"}],
            "settings": {"statistic": "rate", "rate_type": "numeric_rate",
                         "selector": "stage", "numerator": ["won"]}
        }"#,
    );
    assert_eq!(m.display(None, None).unwrap(), "30%");
}

// =============================================================================
// Error Taxonomy
// =============================================================================

#[test]
fn test_unknown_statistic_rejected_at_construction() {
    let payload = Payload::from_json(r#"{"data": [1], "settings": {"statistic": "median"}}"#).unwrap();
    let err = SummaryModel::from_payload(payload).unwrap_err();
    assert!(matches!(
        err,
        TallyError::Config(ConfigError::UnknownStatistic(ref s)) if s == "median"
    ));
}

#[test]
fn test_rate_without_flags_or_selector_rejected() {
    let payload =
        Payload::from_json(r#"{"data": [1], "settings": {"statistic": "count_rate"}}"#).unwrap();
    assert!(matches!(
        SummaryModel::from_payload(payload).unwrap_err(),
        TallyError::Config(ConfigError::MissingRateClassification(_))
    ));
}

#[test]
fn test_key_length_mismatch_rejected() {
    let payload = Payload::from_json(
        r#"{"data": [1, 2, 3], "key": ["a", "b"], "settings": {"statistic": "count"}}"#,
    )
    .unwrap();
    assert!(matches!(
        SummaryModel::from_payload(payload).unwrap_err(),
        TallyError::Payload(PayloadError::LengthMismatch { field: "key", .. })
    ));
}

#[test]
fn test_mean_of_empty_subset_is_error() {
    let m = model(r#"{"data": [1, 2], "settings": {"statistic": "mean"}}"#);
    let filter = KeySet::new(["nope"]);
    assert!(matches!(
        m.display(Some(&filter), None).unwrap_err(),
        TallyError::Statistic(_)
    ));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        Payload::from_json("{not json").unwrap_err(),
        TallyError::Payload(PayloadError::Json(_))
    ));
}

// =============================================================================
// Bus-Driven Recompute
// =============================================================================

#[test]
fn test_bus_state_feeds_model() {
    let m = model(r#"{"data": [5, 6, 7], "settings": {"statistic": "max"}}"#);
    let bus = LocalBus::new();
    bus.set_filter("g", ["0", "1"]);
    bus.set_selection("g", ["1", "2"]);

    let filter = KeySet::from_event(bus.current("g", Channel::Filter));
    let selection = KeySet::from_event(bus.current("g", Channel::Selection));
    assert_eq!(m.display(filter.as_ref(), selection.as_ref()).unwrap(), "6");
    assert_eq!(m.settings().statistic, StatisticKind::Max);
}
