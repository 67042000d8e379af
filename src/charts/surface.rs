use super::{ChartSurface, Dataset};

/// In-memory chart surface. The viewer draws its datasets with `egui_plot`
/// every frame; `revision` tells how many times the chart was asked to re-render.
#[derive(Debug, Default, Clone)]
pub struct PlotSurface {
    datasets: Vec<Dataset>,
    revision: usize,
}

impl PlotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn revision(&self) -> usize {
        self.revision
    }

    pub fn dataset_for(&self, driver_id: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.driver.driver_id == driver_id)
    }
}

impl ChartSurface for PlotSurface {
    fn add_dataset(&mut self, dataset: Dataset) {
        self.datasets.push(dataset);
    }

    fn remove_datasets(&mut self, predicate: &dyn Fn(&Dataset) -> bool) -> usize {
        let before = self.datasets.len();
        self.datasets.retain(|dataset| !predicate(dataset));
        before - self.datasets.len()
    }

    fn update(&mut self) {
        self.revision += 1;
    }

    fn dataset_count(&self) -> usize {
        self.datasets.len()
    }
}
