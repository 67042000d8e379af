// Library interface for lapgraph
// This allows integration tests and benches to access internal modules

pub mod charts;
pub mod config;
pub mod errors;
pub mod format;
pub mod gaps;
pub mod palette;
pub mod race;
pub mod report;
pub mod ui;

// Re-export commonly used types
pub use charts::{ChartRegistry, ChartSurface, Dataset, Driver, PlotSurface};
pub use errors::LapChartError;
pub use format::{seconds_to_lap_string, LapTimeFormat};
pub use gaps::{calculate_gaps, sum_of, GapTimes, LapTimes};
pub use palette::{ColorPool, ColorSlot, SlotId};
pub use race::{load_race_jsonl, RaceData};
