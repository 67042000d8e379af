use std::path::Path;

use log::info;

use super::{RaceData, RaceEntry};
use crate::errors::LapChartError;

/// Loads a race file where every line is a JSON encoded [`RaceEntry`].
pub fn load_race_jsonl(source_file: &Path) -> Result<RaceData, LapChartError> {
    if !source_file.is_file() {
        return Err(LapChartError::InvalidRaceFile {
            path: format!("{:?}", source_file),
        });
    }

    let entries = serde_jsonlines::json_lines(source_file)
        .map_err(|e| LapChartError::RaceFileLoaderError { source: e })?
        .collect::<Result<Vec<RaceEntry>, std::io::Error>>()
        .map_err(|e| LapChartError::RaceFileLoaderError { source: e })?;

    let race = RaceData::from_entries(entries);
    info!(
        "Loaded {:?}, found {} drivers and {} laps of race data",
        source_file,
        race.drivers.len(),
        race.lap_count()
    );
    Ok(race)
}
