#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::shared::DomainError;
    use crate::streak::{
        DailyThreshold, ThresholdChange, ThresholdError, ThresholdPolicy, ThresholdSchedule,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn threshold(value: u32) -> DailyThreshold {
        DailyThreshold::new(value).unwrap()
    }

    #[test]
    fn test_accepts_bounds() {
        assert_eq!(ThresholdPolicy::validate(1.0).unwrap().value(), 1);
        assert_eq!(ThresholdPolicy::validate(9999.0).unwrap().value(), 9999);
        assert_eq!(ThresholdPolicy::validate_integer(1).unwrap().value(), 1);
        assert_eq!(ThresholdPolicy::validate_integer(9999).unwrap().value(), 9999);
    }

    #[test]
    fn test_rejects_out_of_range() {
        for value in [0.0, -1.0, 10000.0] {
            assert_eq!(
                ThresholdPolicy::validate(value),
                Err(ThresholdError::OutOfRange),
                "value {value}"
            );
        }
        assert_eq!(
            ThresholdPolicy::validate_integer(-1),
            Err(ThresholdError::OutOfRange)
        );
        assert_eq!(
            ThresholdPolicy::validate_integer(i64::MAX),
            Err(ThresholdError::OutOfRange)
        );
    }

    #[test]
    fn test_rejects_non_integers() {
        for value in [1.5, f64::NAN, f64::INFINITY, -0.25] {
            assert_eq!(
                ThresholdPolicy::validate(value),
                Err(ThresholdError::NotInteger),
                "value {value}"
            );
        }
    }

    #[test]
    fn test_parse_text_input() {
        assert_eq!(ThresholdPolicy::parse(" 30 ").unwrap().value(), 30);
        assert_eq!(ThresholdPolicy::parse("1.5"), Err(ThresholdError::NotInteger));
        assert_eq!(ThresholdPolicy::parse("ten"), Err(ThresholdError::NotInteger));
        assert_eq!(ThresholdPolicy::parse("0"), Err(ThresholdError::OutOfRange));
    }

    #[test]
    fn test_error_messages_become_validation_errors() {
        let err: DomainError = ThresholdError::NotInteger.into();
        assert!(matches!(
            err,
            DomainError::Validation(ref msg) if msg == "Daily threshold must be an integer"
        ));

        let err: DomainError = ThresholdError::OutOfRange.into();
        assert_eq!(err.message(), "Daily threshold must be between 1 and 9999");
    }

    #[test]
    fn test_serde_rejects_out_of_range_values() {
        let ok: DailyThreshold = serde_json::from_str("42").unwrap();
        assert_eq!(ok.value(), 42);
        assert!(serde_json::from_str::<DailyThreshold>("0").is_err());
        assert!(serde_json::from_str::<DailyThreshold>("10000").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "42");
    }

    #[test]
    fn test_schedule_without_changes_is_constant() {
        let schedule = ThresholdSchedule::constant(threshold(12));
        assert_eq!(schedule.threshold_on(date(1999, 1, 1)), threshold(12));
        assert_eq!(schedule.threshold_on(date(2099, 1, 1)), threshold(12));
    }

    #[test]
    fn test_schedule_picks_threshold_in_effect() {
        let schedule = ThresholdSchedule::new(
            vec![
                ThresholdChange::new(date(2024, 3, 1), threshold(20), threshold(30)),
                ThresholdChange::new(date(2024, 1, 1), threshold(10), threshold(20)),
            ],
            threshold(30),
        );

        assert_eq!(schedule.threshold_on(date(2023, 12, 31)), threshold(10));
        assert_eq!(schedule.threshold_on(date(2024, 1, 1)), threshold(20));
        assert_eq!(schedule.threshold_on(date(2024, 2, 29)), threshold(20));
        assert_eq!(schedule.threshold_on(date(2024, 3, 1)), threshold(30));
        assert_eq!(schedule.threshold_on(date(2025, 1, 1)), threshold(30));
        assert_eq!(schedule.changes()[0].effective_from(), date(2024, 1, 1));
    }
}
