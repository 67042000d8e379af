// Error types for lapgraph

use snafu::Snafu;
use std::io;

use crate::palette::SlotId;

#[derive(Debug, Snafu)]
pub enum LapChartError {
    // Errors for the driver selection
    #[snafu(display("All {palette_size} chart colors are in use, remove a driver first"))]
    CapacityExceeded { palette_size: usize },
    #[snafu(display("Driver {driver_id} is not displayed"))]
    DriverNotFound { driver_id: String },
    #[snafu(display("Color slot {slot} is already free"))]
    SlotAlreadyFree { slot: SlotId },
    #[snafu(display("Color slot {slot} is not part of the palette"))]
    UnknownSlot { slot: SlotId },
    #[snafu(display("A chart named {name} is already registered"))]
    DuplicateChart { name: String },

    // Errors for the gap calculation
    #[snafu(display("Cannot compute an average over an empty lap series"))]
    EmptySeries,
    #[snafu(display("Lap {lap_number} of driver {driver_id} is not a finite time"))]
    InvalidLapTime { driver_id: String, lap_number: usize },

    // Errors for the time formatter
    #[snafu(display("Invalid lap time string: {input}"))]
    InvalidLapString { input: String },

    // Errors while loading race data
    #[snafu(display("Error loading race file"))]
    RaceFileLoaderError { source: io::Error },
    #[snafu(display("Invalid race file: {path}"))]
    InvalidRaceFile { path: String },
    #[snafu(display("Race data has no classified winner"))]
    NoWinner,

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },
}
