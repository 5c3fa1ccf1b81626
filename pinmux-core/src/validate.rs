//! Configuration validation and duplicate signal detection
//!
//! Both checks are pure functions over data the caller already holds. A valid
//! configuration is `Ok(())`; an absent conflict is `None`.

use crate::pins::BallMap;
use crate::types::{Configuration, PinMuxError, Result, Selections};

/// Validate one `(ball, function index)` selection against the ball map
pub fn validate_entry(ball: &str, index: i64, balls: &BallMap) -> Result<()> {
    let entry = balls
        .get(ball)
        .ok_or_else(|| PinMuxError::UnknownBall(ball.to_string()))?;

    if !entry.has_function(index) {
        return Err(PinMuxError::InvalidFunctionIndex {
            ball: ball.to_string(),
            index,
        });
    }

    Ok(())
}

/// Validate a whole configuration against the ball map
///
/// Entries are checked in the configuration's iteration order and the first
/// violation is returned.
pub fn validate_configuration(config: &Configuration, balls: &BallMap) -> Result<()> {
    for (ball, &index) in config {
        validate_entry(ball, index, balls)?;
    }

    log::debug!("Configuration with {} entries is valid", config.len());
    Ok(())
}

/// Find another ball in the working set that already selects `signal`
///
/// The working set is the editor's current state, not the pin table: a
/// signal that several balls *can* carry only conflicts once two of them
/// select it. The target ball's own selection never conflicts with itself.
///
/// # Returns
/// * `Some(ball)` - first other ball (in working-set order) selecting `signal`
/// * `None` - no conflict
pub fn find_duplicate_signal<'a>(
    signal: &str,
    target_ball: &str,
    selections: &'a Selections,
) -> Option<&'a str> {
    selections
        .iter()
        .find(|(ball, selected)| ball.as_str() != target_ball && selected.as_str() == signal)
        .map(|(ball, _)| ball.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::normalize;
    use crate::types::RawRow;

    fn ball_map() -> BallMap {
        let rows = vec![
            RawRow::from_strs("", "A1", "UART_TX", "0", "0"),
            RawRow::from_strs("", "", "GPIO1", "1", ""),
            RawRow::from_strs("", "", "PWM1", "4", ""),
            RawRow::from_strs("", "A2", "GPIO2", "0", "0"),
        ];
        normalize(&rows).0
    }

    fn config(entries: &[(&str, i64)]) -> Configuration {
        entries.iter().map(|(b, i)| (b.to_string(), *i)).collect()
    }

    fn selections(entries: &[(&str, &str)]) -> Selections {
        entries
            .iter()
            .map(|(b, s)| (b.to_string(), s.to_string()))
            .collect()
    }

    #[test]
    fn test_valid_configuration() {
        let balls = ball_map();
        assert!(validate_configuration(&config(&[("A1", 4), ("A2", 0)]), &balls).is_ok());
        assert!(validate_configuration(&Configuration::new(), &balls).is_ok());
    }

    #[test]
    fn test_unknown_ball_rejected() {
        let balls = ball_map();
        let err = validate_configuration(&config(&[("A1", 0), ("Z9", 0)]), &balls).unwrap_err();
        assert!(matches!(err, PinMuxError::UnknownBall(ref b) if b == "Z9"));
    }

    #[test]
    fn test_index_gap_rejected() {
        let balls = ball_map();
        // A1 lists indices 0, 1 and 4; 2 falls in the gap
        let err = validate_entry("A1", 2, &balls).unwrap_err();
        match err {
            PinMuxError::InvalidFunctionIndex { ball, index } => {
                assert_eq!(ball, "A1");
                assert_eq!(index, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(validate_entry("A1", -1, &balls).is_err());
    }

    #[test]
    fn test_first_violation_wins() {
        let balls = ball_map();
        // BTreeMap order: A1 before Z9
        let err = validate_configuration(&config(&[("Z9", 0), ("A1", 9)]), &balls).unwrap_err();
        assert!(matches!(err, PinMuxError::InvalidFunctionIndex { ref ball, index: 9 } if ball == "A1"));
    }

    #[test]
    fn test_duplicate_signal_detected() {
        let working = selections(&[("A1", "UART_TX"), ("A2", "GPIO1")]);

        assert_eq!(find_duplicate_signal("UART_TX", "A3", &working), Some("A1"));
        assert_eq!(find_duplicate_signal("UART_TX", "A1", &working), None);
        assert_eq!(find_duplicate_signal("SPI_CLK", "A3", &working), None);
    }

    #[test]
    fn test_duplicate_check_ignores_schema() {
        // Nothing selects GPIO1 yet, even though several balls could carry it
        let working = selections(&[("A1", "UART_TX")]);
        assert_eq!(find_duplicate_signal("GPIO1", "A2", &working), None);
        assert_eq!(find_duplicate_signal("GPIO1", "A2", &Selections::new()), None);
    }
}
