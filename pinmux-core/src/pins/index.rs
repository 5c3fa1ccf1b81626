//! Reverse signal index
//!
//! Derives signal name -> ball locations from a normalized ball map.

use crate::pins::directory::{BallMap, SignalIndex};

/// Build the signal index for a ball map
///
/// Balls are visited in the order they were first seen in the pin table, so
/// each signal lists its balls in that order too.
pub fn build_signal_index(balls: &BallMap) -> SignalIndex {
    let mut index = SignalIndex::new();

    for entry in balls.iter() {
        for signal in &entry.signals {
            index.add(signal, &entry.location);
        }
    }

    log::debug!("Indexed {} signals across {} balls", index.len(), balls.len());
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::normalize::normalize;
    use crate::types::RawRow;

    #[test]
    fn test_signal_shared_by_several_balls() {
        let rows = vec![
            RawRow::from_strs("", "B2", "GPIO1", "0", "0"),
            RawRow::from_strs("", "", "UART_TX", "1", ""),
            RawRow::from_strs("", "A1", "UART_TX", "0", "0"),
            RawRow::from_strs("", "", "GPIO1", "1", ""),
            RawRow::from_strs("", "", "GPIO1", "2", ""),
        ];

        let (balls, _) = normalize(&rows);
        let index = build_signal_index(&balls);

        let signals: Vec<&str> = index.iter().map(|(s, _)| s).collect();
        assert_eq!(signals, vec!["GPIO1", "UART_TX"]);
        assert_eq!(index.balls_for("GPIO1").to_vec(), vec!["B2", "A1"]);
        assert_eq!(index.balls_for("UART_TX").to_vec(), vec!["B2", "A1"]);
    }

    #[test]
    fn test_every_signal_points_back_to_its_balls() {
        let rows = vec![
            RawRow::from_strs("", "C1", "SPI_CLK", "0", "0"),
            RawRow::from_strs("", "", "GPIO7", "3", ""),
            RawRow::from_strs("", "C2", "SPI_MOSI", "0", "0"),
        ];

        let (balls, _) = normalize(&rows);
        let index = build_signal_index(&balls);

        for entry in balls.iter() {
            for signal in &entry.signals {
                assert!(index.balls_for(signal).contains(&entry.location));
            }
        }
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_empty_ball_map() {
        let index = build_signal_index(&BallMap::new());
        assert!(index.is_empty());
    }
}
