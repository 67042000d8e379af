use egui::Color32;
use log::{info, warn};

use crate::charts::{ChartRegistry, PlotSurface, SelectionEvent};
use crate::config::AppConfig;
use crate::race::RaceData;

pub mod app;

pub use app::LapChartApp;

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);
pub(crate) const PALETTE_BROWN: Color32 = Color32::from_rgb(72, 30, 20);
pub(crate) const PALETTE_MAROON: Color32 = Color32::from_rgb(155, 57, 34);

pub(crate) fn slot_color(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// Builds a registry with the charts enabled in the config, in config order.
pub fn build_registry(race: &RaceData, app_config: &AppConfig) -> ChartRegistry<PlotSurface> {
    let mut registry = ChartRegistry::new(app_config.color_pool());
    let mut sources = race.chart_sources();
    for chart_name in &app_config.charts {
        let Some(index) = sources.iter().position(|(name, _)| *name == chart_name.as_str()) else {
            warn!("No data available for chart {}", chart_name);
            continue;
        };
        let (name, source) = sources.swap_remove(index);
        if let Err(e) = registry.register_chart(name, source, PlotSurface::new()) {
            warn!("Skipping chart {}: {}", name, e);
        }
    }
    registry
}

/// Shows the given drivers, stopping quietly once every color is taken.
pub fn preselect_drivers(
    registry: &mut ChartRegistry<PlotSurface>,
    race: &RaceData,
    driver_ids: &[String],
) {
    for driver_id in driver_ids {
        if let Err(e) = registry.add_driver(driver_id, race.driver_name(driver_id)) {
            warn!("Could not show driver {}: {}", driver_id, e);
            break;
        }
    }
    info!("Showing {} drivers", registry.active_count());
}

/// Status line text for the latest selection changes, if any is worth showing.
pub fn status_for_events(events: &[SelectionEvent]) -> Option<String> {
    events.iter().rev().find_map(|event| match event {
        SelectionEvent::CapacityReached => {
            Some("All chart colors are in use, remove a driver to add another".to_string())
        }
        SelectionEvent::CapacityAvailable => Some("A chart color is available again".to_string()),
        _ => None,
    })
}
