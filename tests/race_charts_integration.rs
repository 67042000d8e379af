// Integration tests for the race file -> gap calculation -> synchronized charts workflow

use lapgraph::charts::{GAP_CHART, LAP_CHART};
use lapgraph::config::AppConfig;
use lapgraph::report::gap_table;
use lapgraph::ui::{build_registry, preselect_drivers};
use lapgraph::{ChartSurface, LapChartError, RaceData, load_race_jsonl, sum_of};
use std::path::Path;

const SAMPLE_RACE: &str = "tests/data/sample_race.jsonl";

fn sample_race() -> RaceData {
    load_race_jsonl(Path::new(SAMPLE_RACE)).expect("sample race should load")
}

#[test]
fn test_sample_race_loads() {
    let race = sample_race();

    assert_eq!(race.drivers.len(), 12);
    assert_eq!(race.winner().unwrap().name, "Ana Costa");
    assert_eq!(race.drivers.last().unwrap().driver_id, "19");
    assert_eq!(race.lap_count(), 8);
    assert_eq!(race.lap_times["19"].len(), 4);
    // qualifying laps are not part of the race series
    assert!(race.lap_times.values().all(|laps| laps.iter().all(|lap| *lap > 81.)));
    assert_eq!(race.pit_laps["27"], vec![5]);
}

#[test]
fn test_winner_gap_closes_at_zero() {
    let race = sample_race();
    let gaps = race.gap_times().unwrap();
    let winner = race.winner().unwrap();

    let winner_gaps = &gaps[&winner.driver_id];
    assert_eq!(winner_gaps.len(), 8);
    assert!(winner_gaps.last().unwrap().abs() < 1e-9);

    // every other classified driver is slower on average, so ends behind the benchmark
    for driver in race.drivers.iter().filter(|d| d.position > 1 && d.position <= 10) {
        let last = *gaps[&driver.driver_id].last().unwrap();
        assert!(last < 0., "{} should be behind, gap {}", driver.name, last);
    }
}

#[test]
fn test_selection_stays_in_sync_across_charts() {
    let race = sample_race();
    let mut registry = build_registry(&race, &AppConfig::default());
    let all_ids: Vec<String> = race.drivers.iter().map(|d| d.driver_id.clone()).collect();

    preselect_drivers(&mut registry, &race, &all_ids);
    assert_eq!(registry.active_count(), registry.pool().size());
    assert!(matches!(
        registry.add_driver("19", "Lea Rossi"),
        Err(LapChartError::CapacityExceeded { .. })
    ));

    // free one color and use it for the unclassified driver
    assert!(registry.remove_driver("4"));
    assert!(registry.add_driver("19", race.driver_name("19")).unwrap());

    let lap_chart = registry.chart(LAP_CHART).unwrap();
    let gap_chart = registry.chart(GAP_CHART).unwrap();
    assert_eq!(lap_chart.dataset_count(), 10);
    assert_eq!(gap_chart.dataset_count(), 10);
    for dataset in lap_chart.datasets() {
        let gap_dataset = gap_chart.dataset_for(&dataset.driver.driver_id).unwrap();
        assert_eq!(dataset.slot, gap_dataset.slot);
        assert_eq!(dataset.series.len(), gap_dataset.series.len());
    }
    assert_eq!(
        sum_of(&lap_chart.dataset_for("19").unwrap().series),
        sum_of(&race.lap_times["19"])
    );

    for driver_id in all_ids {
        registry.remove_driver(&driver_id);
    }
    assert_eq!(registry.active_count(), 0);
    assert_eq!(registry.pool().free_count(), registry.pool().size());
    assert_eq!(registry.chart(LAP_CHART).unwrap().dataset_count(), 0);
}

#[test]
fn test_gap_report_for_sample_race() {
    let race = sample_race();
    let table = gap_table(&race, true).unwrap();
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines.len(), 10);
    assert!(lines[0].contains("Ana Costa"));
    assert!(lines[0].contains("Lea Rossi"));
    assert!(lines[5].contains('P'));
    assert!(lines[9].starts_with("Time"));
    assert_eq!(
        lines[9].split_whitespace().count(),
        race.drivers.len() + 1
    );
}
