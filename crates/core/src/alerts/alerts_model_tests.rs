use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

#[test]
fn test_above_and_below_boundaries() {
    let above = AlertCondition::Above {
        target_price: dec!(180),
    };
    assert!(!price_condition_met(&above, dec!(179.99)));
    assert!(price_condition_met(&above, dec!(180.00)));

    let below = AlertCondition::Below {
        target_price: dec!(100),
    };
    assert!(price_condition_met(&below, dec!(100)));
    assert!(!price_condition_met(&below, dec!(100.01)));
}

#[test]
fn test_percent_change_moves_in_either_direction() {
    let condition = AlertCondition::PercentChange {
        threshold_percent: dec!(5),
        reference_price: Some(dec!(100)),
    };
    assert!(price_condition_met(&condition, dec!(106)));
    assert!(!price_condition_met(&condition, dec!(104)));
    assert!(price_condition_met(&condition, dec!(95)));
    assert!(price_condition_met(&condition, dec!(105)));
}

#[test]
fn test_percent_change_without_reference_never_triggers() {
    let condition = AlertCondition::PercentChange {
        threshold_percent: dec!(1),
        reference_price: None,
    };
    assert!(!price_condition_met(&condition, dec!(1000)));

    let zero_reference = AlertCondition::PercentChange {
        threshold_percent: dec!(1),
        reference_price: Some(dec!(0)),
    };
    assert!(!price_condition_met(&zero_reference, dec!(1000)));
}

#[test]
fn test_percent_move_rounds_ratio_before_scaling() {
    // 1/3 -> 0.3333 -> 33.33
    assert_eq!(percent_move(dec!(4), dec!(3)), Some(dec!(33.3300)));
    assert_eq!(percent_move(dec!(4), dec!(0)), None);
}

#[test]
fn test_percent_move_out_of_range_is_none() {
    let tiny_reference = Decimal::new(1, 27);
    assert_eq!(percent_move(dec!(100), tiny_reference), None);

    let condition = AlertCondition::PercentChange {
        threshold_percent: dec!(5),
        reference_price: Some(tiny_reference),
    };
    assert!(!price_condition_met(&condition, dec!(100)));
}

#[test]
fn test_reminders_never_match_on_price() {
    let condition = AlertCondition::EarningsReminder { days_notice: None };
    assert!(!price_condition_met(&condition, dec!(100)));
}

#[test]
fn test_reminder_due_is_inclusive_at_midnight() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 28).unwrap();

    let day_before_midnight = Utc.with_ymd_and_hms(2026, 10, 27, 0, 0, 0).unwrap();
    assert!(reminder_due(date, 1, day_before_midnight));

    let just_before = Utc.with_ymd_and_hms(2026, 10, 26, 23, 59, 59).unwrap();
    assert!(!reminder_due(date, 1, just_before));

    let far_ahead = Utc.with_ymd_and_hms(2026, 10, 20, 12, 0, 0).unwrap();
    assert!(reminder_due(date, 8, far_ahead));
    assert!(!reminder_due(date, 7, far_ahead));
}

#[test]
fn test_reminder_due_for_past_dates() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
    assert!(reminder_due(date, 0, now));
}

#[test]
fn test_reminder_due_with_huge_notice_window() {
    let date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
    assert!(reminder_due(date, i64::MAX / 2, now));
    assert!(reminder_due(date, i64::MAX, now));
}

#[test]
fn test_days_notice_defaults_to_one() {
    let condition = AlertCondition::DividendPayment { days_notice: None };
    assert_eq!(condition.days_notice(), Some(1));

    let condition = AlertCondition::EarningsReminder {
        days_notice: Some(3),
    };
    assert_eq!(condition.days_notice(), Some(3));

    let condition = AlertCondition::Above {
        target_price: dec!(1),
    };
    assert_eq!(condition.days_notice(), None);
}

#[test]
fn test_target_price_carries_threshold_for_percent_change() {
    let condition = AlertCondition::PercentChange {
        threshold_percent: dec!(5),
        reference_price: Some(dec!(100)),
    };
    assert_eq!(condition.target_price(), Some(dec!(5)));
    assert_eq!(condition.reference_price(), Some(dec!(100)));
    assert_eq!(condition.kind(), AlertKind::PercentChange);

    let json = serde_json::to_value(&condition).unwrap();
    assert_eq!(json["kind"], "PERCENT_CHANGE");
    assert!(json.get("targetPrice").is_some());
}

#[test]
fn test_new_alert_validation() {
    let missing_target = NewAlert::new("AAPL", AlertKind::Above);
    assert!(matches!(
        missing_target.condition(),
        Err(AlertError::InvalidAlert(_))
    ));

    let negative = NewAlert::new("AAPL", AlertKind::Below).with_target_price(dec!(-1));
    assert!(negative.condition().is_err());

    let no_reference = NewAlert::new("AAPL", AlertKind::PercentChange).with_target_price(dec!(5));
    assert!(no_reference.condition().is_err());

    let percent = NewAlert::new("AAPL", AlertKind::PercentChange)
        .with_target_price(dec!(5))
        .with_reference_price(dec!(100));
    assert_eq!(
        percent.condition().unwrap(),
        AlertCondition::PercentChange {
            threshold_percent: dec!(5),
            reference_price: Some(dec!(100)),
        }
    );

    let negative_days = NewAlert::new("AAPL", AlertKind::EarningsReminder).with_days_notice(-1);
    assert!(negative_days.condition().is_err());

    let too_many_days =
        NewAlert::new("AAPL", AlertKind::EarningsReminder).with_days_notice(i64::MAX / 2);
    assert!(matches!(
        too_many_days.condition(),
        Err(AlertError::InvalidAlert(_))
    ));

    let year_ahead = NewAlert::new("AAPL", AlertKind::EarningsReminder).with_days_notice(365);
    assert_eq!(
        year_ahead.condition().unwrap(),
        AlertCondition::EarningsReminder {
            days_notice: Some(365)
        }
    );

    let reminder = NewAlert::new("AAPL", AlertKind::DividendPayment);
    assert_eq!(
        reminder.condition().unwrap(),
        AlertCondition::DividendPayment { days_notice: None }
    );
}

#[test]
fn test_alert_kind_parsing() {
    assert_eq!("percent_change".parse::<AlertKind>().unwrap(), AlertKind::PercentChange);
    assert_eq!(" ABOVE ".parse::<AlertKind>().unwrap(), AlertKind::Above);
    assert!("SIDEWAYS".parse::<AlertKind>().is_err());
    assert!(AlertKind::Below.is_price_based());
    assert!(!AlertKind::EarningsReminder.is_price_based());
}

#[test]
fn test_new_alert_deserializes_flat_request() {
    let json = r#"{"symbol": "msft", "alertType": "ABOVE", "targetPrice": 420.5}"#;
    let request: NewAlert = serde_json::from_str(json).unwrap();
    assert_eq!(request.kind, AlertKind::Above);
    assert_eq!(request.target_price, Some(dec!(420.5)));
    assert!(request.reference_price.is_none());
}
