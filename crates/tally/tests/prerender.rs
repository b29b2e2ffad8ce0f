//! Native tests for the facade crate.

use tally::widgets::BLANK;
use tally::{prerender, prerender_json, Payload, Settings, StatisticKind, TallyError};

#[test]
fn test_prerender_built_payload() {
    let mut settings = Settings::new(StatisticKind::Max.name());
    settings.prefix = Some("up to ".to_string());
    let payload = Payload::new(vec![3.into(), 9.into(), 4.into()], settings);
    assert_eq!(prerender(payload).unwrap(), "up to 9");
}

#[test]
fn test_prerender_rate_from_flags() {
    let json = serde_json::json!({
        "data": [1, 2, 3, 4],
        "numerator_flag": [true, false, false, true],
        "denominator_flag": [true, true, true, true],
        "settings": {"statistic": "count_rate"}
    });
    assert_eq!(prerender_json(&json.to_string()).unwrap(), "50%");
}

#[test]
fn test_prerender_degenerate_subset_is_blank() {
    assert_eq!(
        prerender_json(r#"{"data": [], "settings": {"statistic": "max"}}"#).unwrap(),
        BLANK
    );
}

#[test]
fn test_prerender_malformed_payload() {
    assert!(matches!(
        prerender_json(r#"{"data": [1, 2], "key": ["a"], "settings": {"statistic": "count"}}"#),
        Err(TallyError::Payload(_))
    ));
}
