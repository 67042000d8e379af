// Gap to the winner's average pace

use std::collections::HashMap;

use log::debug;

use crate::errors::LapChartError;

/// Lap durations in seconds keyed by driver id
pub type LapTimes = HashMap<String, Vec<f64>>;
/// Gap series in seconds keyed by driver id
pub type GapTimes = HashMap<String, Vec<f64>>;

/// Total of a series, zero when empty.
pub fn sum_of(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Arithmetic mean of a series.
pub fn mean(values: &[f64]) -> Result<f64, LapChartError> {
    if values.is_empty() {
        return Err(LapChartError::EmptySeries);
    }
    Ok(sum_of(values) / values.len() as f64)
}

/// Computes, for every driver, the cumulative gap to a benchmark car lapping at
/// the winner's average pace.
///
/// `gap[i] = winner_average * (i + 1) - (laps[0] + ... + laps[i])`
///
/// A positive gap means the driver is ahead of the benchmark after lap `i + 1`,
/// a negative gap means the driver is behind it. The benchmark is synthetic: a
/// constant pace, not the winner's actual lap by lap progress.
pub fn calculate_gaps(lap_times: &LapTimes, winner_laps: &[f64]) -> Result<GapTimes, LapChartError> {
    if let Some(lap_number) = winner_laps.iter().position(|lap| !lap.is_finite()) {
        return Err(LapChartError::InvalidLapTime {
            driver_id: "winner".to_string(),
            lap_number: lap_number + 1,
        });
    }
    let winner_average = mean(winner_laps)?;
    debug!(
        "Winner average over {} laps is {:.3}s",
        winner_laps.len(),
        winner_average
    );

    lap_times
        .iter()
        .map(|(driver_id, laps)| {
            driver_gaps(laps, winner_average)
                .map(|gaps| (driver_id.clone(), gaps))
                .ok_or_else(|| LapChartError::InvalidLapTime {
                    driver_id: driver_id.clone(),
                    lap_number: laps.iter().position(|lap| !lap.is_finite()).unwrap_or(0) + 1,
                })
        })
        .collect()
}

/// Gap series for a single driver, `None` if any lap is not a finite time.
pub fn driver_gaps(laps: &[f64], winner_average: f64) -> Option<Vec<f64>> {
    let mut cumulative = 0.;
    laps.iter()
        .enumerate()
        .map(|(i, lap)| {
            if !lap.is_finite() {
                return None;
            }
            cumulative += lap;
            Some(winner_average * (i + 1) as f64 - cumulative)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lap_times(entries: &[(&str, &[f64])]) -> LapTimes {
        entries
            .iter()
            .map(|(driver, laps)| (driver.to_string(), laps.to_vec()))
            .collect()
    }

    #[test]
    fn test_sum_of() {
        assert_eq!(sum_of(&[]), 0.);
        assert_eq!(sum_of(&[1., 2., 3.]), 6.);
    }

    #[test]
    fn test_mean_of_empty_series() {
        assert!(matches!(mean(&[]), Err(LapChartError::EmptySeries)));
        assert_eq!(mean(&[60., 62.]).unwrap(), 61.);
    }

    #[test]
    fn test_driver_behind_benchmark_has_negative_gap() {
        let gaps = calculate_gaps(&lap_times(&[("slow", &[60., 65.])]), &[60., 60.]).unwrap();
        assert_eq!(gaps["slow"], vec![0., -5.]);
    }

    #[test]
    fn test_driver_ahead_of_benchmark_has_positive_gap() {
        let gaps = calculate_gaps(&lap_times(&[("fast", &[58., 59.])]), &[60., 60.]).unwrap();
        assert_eq!(gaps["fast"], vec![2., 3.]);
    }

    #[test]
    fn test_winner_ends_level_with_own_average() {
        let winner = [61., 59., 63., 57.];
        let gaps = calculate_gaps(&lap_times(&[("winner", &winner)]), &winner).unwrap();
        let series = &gaps["winner"];
        assert_eq!(series.len(), winner.len());
        assert!(series.last().unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_series_length_follows_driver_laps() {
        let gaps = calculate_gaps(
            &lap_times(&[("lapped", &[70., 70.]), ("dnf", &[])]),
            &[60., 60., 60.],
        )
        .unwrap();
        assert_eq!(gaps["lapped"], vec![-10., -20.]);
        assert!(gaps["dnf"].is_empty());
    }

    #[test]
    fn test_empty_winner_laps_is_an_error() {
        let result = calculate_gaps(&lap_times(&[("a", &[60.])]), &[]);
        assert!(matches!(result, Err(LapChartError::EmptySeries)));
    }

    #[test]
    fn test_non_finite_laps_are_rejected() {
        let result = calculate_gaps(&lap_times(&[("a", &[60., f64::NAN])]), &[60.]);
        match result {
            Err(LapChartError::InvalidLapTime {
                driver_id,
                lap_number,
            }) => {
                assert_eq!(driver_id, "a");
                assert_eq!(lap_number, 2);
            }
            other => panic!("Expected InvalidLapTime, got {:?}", other),
        }

        let result = calculate_gaps(&lap_times(&[("a", &[60.])]), &[f64::INFINITY]);
        assert!(matches!(result, Err(LapChartError::InvalidLapTime { .. })));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_gap_matches_prefix_sum(
            laps in prop::collection::vec(50.0f64..120.0, 0..40),
            winner in prop::collection::vec(50.0f64..120.0, 1..40),
        ) {
            let gaps = calculate_gaps(&lap_times(&[("d", &laps)]), &winner).unwrap();
            let series = &gaps["d"];
            let average = mean(&winner).unwrap();
            prop_assert_eq!(series.len(), laps.len());
            for (i, gap) in series.iter().enumerate() {
                let expected = average * (i + 1) as f64 - sum_of(&laps[..=i]);
                prop_assert!((gap - expected).abs() < 1e-6);
            }
        }
    }
}
