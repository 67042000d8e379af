// Synchronized charts sharing one driver selection

pub mod registry;
pub mod surface;

use std::collections::HashMap;

use crate::palette::SlotId;

pub use registry::{Affordances, ChartRegistry, SelectionEvent};
pub use surface::PlotSurface;

/// Name of the chart showing raw lap times
pub const LAP_CHART: &str = "lap";
/// Name of the chart showing the gap to the winner's average pace
pub const GAP_CHART: &str = "gap";

/// Series shown by a chart, keyed by driver id
pub type SeriesSource = HashMap<String, Vec<f64>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Driver {
    pub driver_id: String,
    pub name: String,
}

impl Driver {
    pub fn new(driver_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            driver_id: driver_id.into(),
            name: name.into(),
        }
    }
}

/// One driver's series as rendered on one chart.
///
/// The dataset carries the identity of its color slot, so releasing the color
/// never requires reading it back from the rendered output.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub driver: Driver,
    pub slot: SlotId,
    pub rgb: [u8; 3],
    pub series: Vec<f64>,
    pub chart: String,
}

impl Dataset {
    /// Series as plot points, x is the 1-based lap number
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.series
            .iter()
            .enumerate()
            .map(|(i, value)| [(i + 1) as f64, *value])
            .collect()
    }
}

/// Rendering target of a chart.
pub trait ChartSurface {
    /// Appends a dataset
    fn add_dataset(&mut self, dataset: Dataset);

    /// Removes every dataset matching the predicate and returns how many were removed
    fn remove_datasets(&mut self, predicate: &dyn Fn(&Dataset) -> bool) -> usize;

    /// Re-renders the chart
    fn update(&mut self);

    fn dataset_count(&self) -> usize;
}

/// Messages shown on the add/remove controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Add,
    Remove,
    CapacityExceeded,
}

impl Affordance {
    pub fn message(&self) -> &'static str {
        match self {
            Affordance::Add => "Add the selected driver to the charts",
            Affordance::Remove => "Remove the selected driver from the charts",
            Affordance::CapacityExceeded => {
                "All chart colors are in use, remove a driver to add another"
            }
        }
    }
}
