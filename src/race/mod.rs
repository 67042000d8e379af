// Race results and lap records feeding the charts

pub mod loader;

use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub use loader::load_race_jsonl;

use crate::charts::{GAP_CHART, LAP_CHART, SeriesSource};
use crate::errors::LapChartError;
use crate::gaps::{GapTimes, LapTimes, calculate_gaps};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Practice,
    Qualifying,
    #[default]
    Race,
}

/// A classified driver of the race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverEntry {
    pub driver_id: String,
    pub name: String,
    /// Finishing position, 1 is the winner and 0 means not classified
    #[serde(default)]
    pub position: u32,
}

/// A single completed lap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    pub driver_id: String,
    #[serde(default)]
    pub session: SessionKind,
    /// 1-based lap number
    pub lap_number: u32,
    /// Lap duration in seconds
    pub lap_time: f64,
    /// Running position at the end of the lap
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub pitstop: bool,
    #[serde(default)]
    pub sectors: Option<[f64; 3]>,
}

/// One line of a race file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceEntry {
    Driver(DriverEntry),
    Lap(LapRecord),
}

/// Lap times of a race, ready to be charted.
#[derive(Debug, Clone, Default)]
pub struct RaceData {
    /// Drivers in finishing order, unclassified drivers last
    pub drivers: Vec<DriverEntry>,
    /// Race session lap times ordered by lap number
    pub lap_times: LapTimes,
    /// Lap numbers on which each driver pitted
    pub pit_laps: HashMap<String, Vec<u32>>,
}

impl RaceData {
    pub fn from_entries(entries: impl IntoIterator<Item = RaceEntry>) -> Self {
        let mut drivers = Vec::new();
        let mut laps = Vec::new();
        for entry in entries {
            match entry {
                RaceEntry::Driver(driver) => drivers.push(driver),
                RaceEntry::Lap(lap) if lap.session == SessionKind::Race => laps.push(lap),
                RaceEntry::Lap(lap) => {
                    debug!(
                        "Skipping {:?} lap {} of driver {}",
                        lap.session, lap.lap_number, lap.driver_id
                    );
                }
            }
        }

        drivers.sort_by_key(|driver| match driver.position {
            0 => u32::MAX,
            position => position,
        });

        let pit_laps = laps
            .iter()
            .filter(|lap| lap.pitstop)
            .map(|lap| (lap.driver_id.clone(), lap.lap_number))
            .into_group_map()
            .into_iter()
            .map(|(driver_id, mut lap_numbers)| {
                lap_numbers.sort_unstable();
                (driver_id, lap_numbers)
            })
            .collect();

        let lap_times = laps
            .into_iter()
            .map(|lap| (lap.driver_id.clone(), lap))
            .into_group_map()
            .into_iter()
            .map(|(driver_id, laps)| {
                let series = laps
                    .into_iter()
                    .sorted_by_key(|lap| lap.lap_number)
                    .dedup_by(|a, b| a.lap_number == b.lap_number)
                    .map(|lap| lap.lap_time)
                    .collect();
                (driver_id, series)
            })
            .collect();

        Self {
            drivers,
            lap_times,
            pit_laps,
        }
    }

    pub fn winner(&self) -> Result<&DriverEntry, LapChartError> {
        self.drivers
            .iter()
            .find(|driver| driver.position == 1)
            .ok_or(LapChartError::NoWinner)
    }

    pub fn winner_laps(&self) -> Result<&[f64], LapChartError> {
        let winner = self.winner()?;
        Ok(self
            .lap_times
            .get(&winner.driver_id)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    pub fn driver_name<'a>(&'a self, driver_id: &'a str) -> &'a str {
        self.drivers
            .iter()
            .find(|driver| driver.driver_id == driver_id)
            .map(|driver| driver.name.as_str())
            .unwrap_or(driver_id)
    }

    pub fn gap_times(&self) -> Result<GapTimes, LapChartError> {
        calculate_gaps(&self.lap_times, self.winner_laps()?)
    }

    /// Series for each chart kind. The gap chart is left out, with a warning,
    /// when gaps cannot be computed so no invalid values reach a plot.
    pub fn chart_sources(&self) -> Vec<(&'static str, SeriesSource)> {
        let mut sources = vec![(LAP_CHART, self.lap_times.clone())];
        match self.gap_times() {
            Ok(gaps) => sources.push((GAP_CHART, gaps)),
            Err(e) => warn!("Gap chart unavailable: {}", e),
        }
        sources
    }

    pub fn lap_count(&self) -> usize {
        self.lap_times.values().map(Vec::len).max().unwrap_or(0)
    }
}
