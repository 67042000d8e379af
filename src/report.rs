// Plain text gap table for the terminal

use std::fmt::Write;

use itertools::Itertools;

use crate::errors::LapChartError;
use crate::format::{format_gap, format_race_time};
use crate::gaps::sum_of;
use crate::race::RaceData;

const PIT_MARKER: &str = "P";
const TOTAL_LABEL: &str = "Time";

/// Renders one row per lap and one column per driver, in finishing order.
/// Laps a driver did not complete are left blank, pit laps carry a `P` marker.
/// The last row holds each driver's summed race time.
pub fn gap_table(race: &RaceData, include_micros: bool) -> Result<String, LapChartError> {
    let gaps = &race.gap_times()?;
    let columns = race
        .drivers
        .iter()
        .filter(|driver| gaps.contains_key(&driver.driver_id))
        .collect_vec();

    let cells = |lap_index: usize| {
        columns.iter().map(move |driver| {
            let Some(gap) = gaps[&driver.driver_id].get(lap_index) else {
                return String::new();
            };
            let pitted = race
                .pit_laps
                .get(&driver.driver_id)
                .is_some_and(|laps| laps.contains(&(lap_index as u32 + 1)));
            let marker = if pitted { PIT_MARKER } else { "" };
            format!("{}{}", format_gap(*gap, include_micros), marker)
        })
    };

    let totals = columns
        .iter()
        .map(|driver| {
            race.lap_times
                .get(&driver.driver_id)
                .map(|laps| format_race_time(sum_of(laps)))
                .unwrap_or_default()
        })
        .collect_vec();

    // names may hold multi-byte characters, padding counts chars
    let width = columns
        .iter()
        .map(|driver| driver.name.chars().count())
        .chain(totals.iter().map(|total| total.chars().count()))
        .chain(
            (0..race.lap_count())
                .flat_map(|lap| cells(lap).map(|cell| cell.chars().count())),
        )
        .max()
        .unwrap_or(0);

    let mut table = String::new();
    // writing into a String cannot fail
    let _ = writeln!(
        table,
        "{:>4}  {}",
        "Lap",
        columns
            .iter()
            .map(|driver| format!("{:>width$}", driver.name))
            .join("  ")
    );
    for lap_index in 0..race.lap_count() {
        let _ = writeln!(
            table,
            "{:>4}  {}",
            lap_index + 1,
            cells(lap_index)
                .map(|cell| format!("{:>width$}", cell))
                .join("  ")
        );
    }
    let _ = writeln!(
        table,
        "{:>4}  {}",
        TOTAL_LABEL,
        totals
            .iter()
            .map(|total| format!("{:>width$}", total))
            .join("  ")
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::{DriverEntry, LapRecord, RaceEntry, SessionKind};

    fn lap(driver_id: &str, lap_number: u32, lap_time: f64, pitstop: bool) -> RaceEntry {
        RaceEntry::Lap(LapRecord {
            driver_id: driver_id.to_string(),
            session: SessionKind::Race,
            lap_number,
            lap_time,
            position: 1,
            pitstop,
            sectors: None,
        })
    }

    fn driver(driver_id: &str, name: &str, position: u32) -> RaceEntry {
        RaceEntry::Driver(DriverEntry {
            driver_id: driver_id.to_string(),
            name: name.to_string(),
            position,
        })
    }

    #[test]
    fn test_gap_table() {
        let race = RaceData::from_entries(vec![
            driver("b", "Bee", 2),
            driver("a", "Ace", 1),
            lap("a", 1, 60., false),
            lap("a", 2, 60., false),
            lap("b", 1, 60., false),
            lap("b", 2, 65., true),
        ]);

        let table = gap_table(&race, false).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], " Lap       Ace       Bee");
        assert_eq!(lines[1], "   1       +00       +00");
        assert_eq!(lines[2], "   2       +00      -05P");
        assert_eq!(lines[3], "Time  2m00.000  2m05.000");
    }

    #[test]
    fn test_short_series_leave_blank_cells() {
        let race = RaceData::from_entries(vec![
            driver("a", "Ace", 1),
            driver("c", "Cee", 3),
            lap("a", 1, 60., false),
            lap("a", 2, 60., false),
            lap("c", 1, 62., false),
        ]);
        let table = gap_table(&race, true).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[2].starts_with("   2   +00.000"));
        assert!(lines[2].trim_end().ends_with("+00.000"));
        assert_eq!(lines[3], "Time  2m00.000  1m02.000");
    }

    #[test]
    fn test_columns_align_with_accented_names() {
        let race = RaceData::from_entries(vec![
            driver("a", "Ace", 1),
            driver("p", "Sérgio Pérez", 2),
            lap("a", 1, 60., false),
            lap("p", 1, 61., false),
        ]);
        let table = gap_table(&race, false).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], " Lap           Ace  Sérgio Pérez");
        assert!(lines.iter().all(|line| line.chars().count() == 32));
    }

    #[test]
    fn test_gap_table_without_winner() {
        let race = RaceData::from_entries(vec![driver("b", "Bee", 2), lap("b", 1, 60., false)]);
        assert!(matches!(gap_table(&race, true), Err(LapChartError::NoWinner)));
    }
}
