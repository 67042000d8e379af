use std::path::Path;

use egui::{Color32, ComboBox, Layout, RichText, Ui, Visuals, style::Widgets};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use log::{debug, error, info};

use super::{
    PALETTE_BLACK, PALETTE_BROWN, PALETTE_MAROON, build_registry, preselect_drivers, slot_color,
    status_for_events,
};
use crate::charts::{ChartRegistry, GAP_CHART, PlotSurface};
use crate::config::AppConfig;
use crate::format::{format_gap, format_lap_time};
use crate::race::{RaceData, load_race_jsonl};

enum UiState {
    Empty,
    Error { message: String },
    Display,
}

/// Desktop viewer with a driver picker and one synchronized plot per chart.
pub struct LapChartApp {
    app_config: AppConfig,
    ui_state: UiState,
    race: RaceData,
    registry: ChartRegistry<PlotSurface>,
    selected_driver: Option<String>,
    status_message: Option<String>,
}

impl LapChartApp {
    pub fn new(
        race: Option<RaceData>,
        driver_ids: &[String],
        app_config: AppConfig,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            hyperlink_color: PALETTE_MAROON,
            faint_bg_color: PALETTE_BLACK,
            extreme_bg_color: PALETTE_BROWN,
            panel_fill: PALETTE_BLACK,
            widgets: Widgets::dark(),
            striped: false,
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        let mut app = Self {
            registry: ChartRegistry::new(app_config.color_pool()),
            app_config,
            ui_state: UiState::Empty,
            race: RaceData::default(),
            selected_driver: None,
            status_message: None,
        };
        if let Some(race) = race {
            app.show_race(race, driver_ids);
        }
        app
    }

    fn show_race(&mut self, race: RaceData, driver_ids: &[String]) {
        self.registry = build_registry(&race, &self.app_config);
        preselect_drivers(&mut self.registry, &race, driver_ids);
        self.status_message = status_for_events(&self.registry.take_events());
        self.selected_driver = race.drivers.first().map(|d| d.driver_id.clone());
        self.race = race;
        self.ui_state = UiState::Display;
    }

    fn open_race_file(&mut self, path: &Path) {
        match load_race_jsonl(path) {
            Ok(race) => {
                info!("Opened race file {:?}", path);
                self.show_race(race, &[]);
            }
            Err(e) => {
                error!("Could not open race file {:?}: {}", path, e);
                self.ui_state = UiState::Error {
                    message: e.to_string(),
                };
            }
        }
    }

    fn show_selectors(&mut self, ui: &mut Ui) {
        ui.with_layout(Layout::left_to_right(egui::Align::Center), |ui| {
            if ui.button("📂 Open race").clicked()
                && let Some(path) = rfd::FileDialog::new()
                    .add_filter("Race data", &["jsonl", "json"])
                    .pick_file()
            {
                self.open_race_file(&path);
            }
            ui.separator();

            let selected_text = self
                .selected_driver
                .as_deref()
                .map(|id| self.race.driver_name(id).to_string())
                .unwrap_or_default();
            ui.label(RichText::new("Driver: ").color(Color32::WHITE));
            ComboBox::from_id_salt("driver_list")
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for driver in &self.race.drivers {
                        ui.selectable_value(
                            &mut self.selected_driver,
                            Some(driver.driver_id.clone()),
                            &driver.name,
                        );
                    }
                });

            let affordances = self.registry.affordances(self.selected_driver.as_deref());
            let add = ui
                .add_enabled(affordances.add_enabled, egui::Button::new("Add"))
                .on_hover_text(affordances.add_title.message())
                .on_disabled_hover_text(affordances.add_title.message());
            let remove = ui
                .add_enabled(affordances.remove_enabled, egui::Button::new("Remove"))
                .on_hover_text(affordances.remove_title.message());

            if let Some(driver_id) = self.selected_driver.clone() {
                if add.clicked() {
                    let name = self.race.driver_name(&driver_id).to_string();
                    if let Err(e) = self.registry.add_driver(&driver_id, &name) {
                        self.status_message = Some(e.to_string());
                    }
                }
                if remove.clicked() {
                    self.registry.remove_driver(&driver_id);
                }
            }

            let events = self.registry.take_events();
            if !events.is_empty() {
                self.status_message = status_for_events(&events);
            }

            ui.separator();
            ui.label(format!(
                "{}/{} colors in use",
                self.registry.active_count(),
                self.registry.pool().size()
            ));
            if let Some(message) = &self.status_message {
                ui.label(RichText::new(message).color(Color32::LIGHT_GRAY));
            }
        });
    }

    fn show_chart(&self, chart_name: &str, ui: &mut Ui) {
        let Some(surface) = self.registry.chart(chart_name) else {
            return;
        };
        let lap_format = self.app_config.lap_time_format();
        let include_micros = self.app_config.show_lap_micros;
        let is_gap_chart = chart_name == GAP_CHART;

        ui.label(RichText::new(chart_title(chart_name)).color(Color32::WHITE).strong());
        Plot::new(format!("{}_chart", chart_name))
            .show_background(false)
            .legend(Legend::default())
            .height(self.app_config.plot_height)
            .x_axis_label("Lap")
            .y_axis_formatter(move |mark, _range| {
                if is_gap_chart {
                    format_gap(mark.value, include_micros)
                } else {
                    format_lap_time(mark.value, &lap_format)
                }
            })
            .show(ui, |plot_ui| {
                for dataset in surface.datasets() {
                    plot_ui.line(
                        Line::new(dataset.driver.name.clone(), PlotPoints::new(dataset.points()))
                            .color(slot_color(dataset.rgb)),
                    );
                }
            });
    }
}

fn chart_title(chart_name: &str) -> String {
    match chart_name {
        GAP_CHART => "Gap to winner's average pace".to_string(),
        crate::charts::LAP_CHART => "Lap times".to_string(),
        other => other.to_string(),
    }
}

impl eframe::App for LapChartApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let outer_min = ctx.input(|is| is.viewport().outer_rect.map(|rect| rect.min));
        if self.app_config.track_window_position(outer_min) {
            debug!("Window moved to {:?}", self.app_config.window_position);
        }

        egui::TopBottomPanel::top("selection").show(ctx, |ui| {
            self.show_selectors(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| match &self.ui_state {
            UiState::Empty => {
                ui.label("Open a race file to show lap charts");
            }
            UiState::Error { message } => {
                ui.label(RichText::new(message).color(Color32::RED));
            }
            UiState::Display => {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let chart_names: Vec<String> =
                        self.registry.chart_names().map(str::to_string).collect();
                    for chart_name in chart_names {
                        self.show_chart(&chart_name, ui);
                        ui.add_space(8.);
                    }
                });
            }
        });
    }
}
