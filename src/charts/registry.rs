use log::{debug, info, warn};

use super::{Affordance, ChartSurface, Dataset, Driver, PlotSurface, SeriesSource};
use crate::errors::LapChartError;
use crate::palette::{ColorPool, ColorSlot, SlotId};

/// Notifications produced by selection changes, drained by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    DriverAdded { driver_id: String, slot: SlotId },
    DriverRemoved { driver_id: String, slot: SlotId },
    /// Every color is in use, adding is no longer possible
    CapacityReached,
    /// A color became available again after the pool was exhausted
    CapacityAvailable,
}

/// Enabled state and hover text of the add/remove controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub add_enabled: bool,
    pub add_title: Affordance,
    pub remove_enabled: bool,
    pub remove_title: Affordance,
}

struct RegisteredChart<S> {
    name: String,
    source: SeriesSource,
    surface: S,
}

impl<S: ChartSurface> RegisteredChart<S> {
    fn dataset_for(&self, driver: &Driver, slot: &ColorSlot) -> Dataset {
        let series = match self.source.get(&driver.driver_id) {
            Some(series) => series.clone(),
            None => {
                warn!(
                    "Chart {} has no series for driver {}, showing an empty dataset",
                    self.name, driver.driver_id
                );
                Vec::new()
            }
        };
        Dataset {
            driver: driver.clone(),
            slot: slot.id,
            rgb: slot.rgb,
            series,
            chart: self.name.clone(),
        }
    }
}

struct ActiveDriver {
    driver: Driver,
    slot: ColorSlot,
}

/// Keeps the driver selection of several charts in sync under a bounded palette.
///
/// Every active driver owns exactly one color slot, shared by all of its
/// datasets, and has exactly one dataset on every registered chart. Mutations
/// update every chart before returning.
pub struct ChartRegistry<S = PlotSurface> {
    pool: ColorPool,
    charts: Vec<RegisteredChart<S>>,
    active: Vec<ActiveDriver>,
    events: Vec<SelectionEvent>,
}

impl<S: ChartSurface> Default for ChartRegistry<S> {
    fn default() -> Self {
        Self::new(ColorPool::default())
    }
}

impl<S: ChartSurface> ChartRegistry<S> {
    pub fn new(pool: ColorPool) -> Self {
        Self {
            pool,
            charts: Vec::new(),
            active: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Adds a chart to the synchronized set. Drivers that are already active
    /// get a dataset on the new chart with their existing color.
    pub fn register_chart(
        &mut self,
        name: impl Into<String>,
        source: SeriesSource,
        surface: S,
    ) -> Result<(), LapChartError> {
        let name = name.into();
        if self.charts.iter().any(|chart| chart.name == name) {
            return Err(LapChartError::DuplicateChart { name });
        }

        let mut chart = RegisteredChart {
            name,
            source,
            surface,
        };
        if !self.active.is_empty() {
            for active in &self.active {
                let dataset = chart.dataset_for(&active.driver, &active.slot);
                chart.surface.add_dataset(dataset);
            }
            chart.surface.update();
        }
        info!(
            "Registered chart {} with {} drivers shown",
            chart.name,
            self.active.len()
        );
        self.charts.push(chart);
        Ok(())
    }

    /// Removes a chart from the set and hands its surface back. Color slots
    /// stay bound to their drivers.
    pub fn unregister_chart(&mut self, name: &str) -> Option<S> {
        let index = self.charts.iter().position(|chart| chart.name == name)?;
        debug!("Unregistered chart {}", name);
        Some(self.charts.remove(index).surface)
    }

    /// Shows a driver on every chart.
    ///
    /// Returns `Ok(false)` without changes if the driver is already shown and
    /// `CapacityExceeded` if every color is taken.
    pub fn add_driver(&mut self, driver_id: &str, driver_name: &str) -> Result<bool, LapChartError> {
        if self.is_active(driver_id) {
            debug!("Driver {} is already shown", driver_id);
            return Ok(false);
        }
        if !self.pool.has_free() {
            return Err(LapChartError::CapacityExceeded {
                palette_size: self.pool.size(),
            });
        }

        let slot = self.pool.acquire()?;
        let driver = Driver::new(driver_id, driver_name);
        for chart in self.charts.iter_mut() {
            let dataset = chart.dataset_for(&driver, &slot);
            chart.surface.add_dataset(dataset);
            chart.surface.update();
        }

        info!("Added driver {} with color {}", driver_id, slot.name);
        self.events.push(SelectionEvent::DriverAdded {
            driver_id: driver_id.to_string(),
            slot: slot.id,
        });
        self.active.push(ActiveDriver { driver, slot });

        if self.active.len() == self.pool.size() {
            info!("All {} chart colors are in use", self.pool.size());
            self.events.push(SelectionEvent::CapacityReached);
        }
        Ok(true)
    }

    /// Removes a driver from every chart and frees its color. Removing a
    /// driver that is not shown is a no-op returning `false`.
    pub fn remove_driver(&mut self, driver_id: &str) -> bool {
        let Some(index) = self
            .active
            .iter()
            .position(|active| active.driver.driver_id == driver_id)
        else {
            debug!("Driver {} is not shown, nothing to remove", driver_id);
            return false;
        };

        let was_exhausted = !self.pool.has_free();
        let ActiveDriver { slot, .. } = self.active.remove(index);
        for chart in self.charts.iter_mut() {
            let removed = chart
                .surface
                .remove_datasets(&|dataset: &Dataset| dataset.driver.driver_id == driver_id);
            if removed != 1 {
                warn!(
                    "Chart {} held {} datasets for driver {}",
                    chart.name, removed, driver_id
                );
            }
            chart.surface.update();
        }

        // one release per driver, never per chart
        if let Err(e) = self.pool.release(slot.id) {
            warn!("Could not release color of driver {}: {}", driver_id, e);
        }

        info!("Removed driver {}", driver_id);
        self.events.push(SelectionEvent::DriverRemoved {
            driver_id: driver_id.to_string(),
            slot: slot.id,
        });
        if was_exhausted {
            self.events.push(SelectionEvent::CapacityAvailable);
        }
        true
    }

    /// Adds the driver if hidden, removes it if shown. Returns whether the
    /// driver is shown afterwards.
    pub fn toggle_driver(&mut self, driver_id: &str, driver_name: &str) -> Result<bool, LapChartError> {
        if self.remove_driver(driver_id) {
            Ok(false)
        } else {
            self.add_driver(driver_id, driver_name)
        }
    }

    pub fn is_active(&self, driver_id: &str) -> bool {
        self.active
            .iter()
            .any(|active| active.driver.driver_id == driver_id)
    }

    /// Shown drivers in the order they were added
    pub fn active_drivers(&self) -> impl Iterator<Item = &Driver> {
        self.active.iter().map(|active| &active.driver)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn slot_for(&self, driver_id: &str) -> Result<&ColorSlot, LapChartError> {
        self.active
            .iter()
            .find(|active| active.driver.driver_id == driver_id)
            .map(|active| &active.slot)
            .ok_or_else(|| LapChartError::DriverNotFound {
                driver_id: driver_id.to_string(),
            })
    }

    pub fn chart(&self, name: &str) -> Option<&S> {
        self.charts
            .iter()
            .find(|chart| chart.name == name)
            .map(|chart| &chart.surface)
    }

    pub fn chart_names(&self) -> impl Iterator<Item = &str> {
        self.charts.iter().map(|chart| chart.name.as_str())
    }

    pub fn pool(&self) -> &ColorPool {
        &self.pool
    }

    /// State of the add/remove controls for the driver currently selected in the UI.
    pub fn affordances(&self, selected_driver: Option<&str>) -> Affordances {
        let selected_active = selected_driver.is_some_and(|id| self.is_active(id));
        let add_title = if self.pool.has_free() || selected_active {
            Affordance::Add
        } else {
            Affordance::CapacityExceeded
        };
        Affordances {
            add_enabled: selected_driver.is_some() && !selected_active && self.pool.has_free(),
            add_title,
            remove_enabled: selected_active,
            remove_title: Affordance::Remove,
        }
    }

    /// Drains the notifications produced since the last call.
    pub fn take_events(&mut self) -> Vec<SelectionEvent> {
        std::mem::take(&mut self.events)
    }
}
