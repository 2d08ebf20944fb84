use std::sync::atomic::AtomicBool;

use comau_kinematics::{
    comau_reference_cases, AngleRange, ConfigurationSearcher, RobotConfig, SearchConfig,
    SearchResult,
};
use nalgebra::Vector3;

fn rounded_deg(result: &SearchResult<Vec<f64>>) -> Vec<i64> {
    result
        .angles_deg()
        .iter()
        .map(|a| a.round() as i64)
        .collect()
}

#[test]
fn wide_grid_finds_the_singular_pose() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let target = Vector3::new(0.45, 0.0, 0.87);
    let searcher = ConfigurationSearcher::new(SearchConfig::comau_wide());
    assert_eq!(searcher.config().grid_size(), 27_664);

    let outcome = searcher.search(&chain, &target).unwrap();
    assert_eq!(outcome.evaluated, 27_664);
    assert!(!outcome.cancelled);
    assert_eq!(outcome.matches.len(), 4);
    assert_eq!(rounded_deg(&outcome.matches[0]), [0, 45, -60, 0, 30, 0]);

    let best = outcome.best().unwrap();
    assert_eq!(rounded_deg(best), [0, 45, -60, 0, 60, 0]);
    assert!((best.error - 0.0211).abs() < 1e-4);
    assert_eq!(outcome.closest.as_ref(), Some(best));
}

#[test]
fn wide_grid_finds_the_numerical_example_pose() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let target = comau_reference_cases()[3].target;
    let outcome = ConfigurationSearcher::new(SearchConfig::comau_wide())
        .par_search(&chain, &target)
        .unwrap();

    assert_eq!(outcome.matches.len(), 3);
    assert_eq!(rounded_deg(outcome.best().unwrap()), [0, -45, 0, 0, 60, 0]);
}

#[test]
fn shoulder_and_elbow_alone_cannot_reach_the_singular_pose() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let config = SearchConfig::new(vec![
        AngleRange::fixed(0.0),
        AngleRange::degrees(-90.0, 180.0, 15.0),
        AngleRange::degrees(-90.0, 90.0, 15.0),
        AngleRange::fixed(0.0),
        AngleRange::fixed(0.0),
        AngleRange::fixed(0.0),
    ]);
    let outcome = ConfigurationSearcher::new(config)
        .search(&chain, &Vector3::new(0.45, 0.0, 0.87))
        .unwrap();

    assert!(outcome.is_exhausted());
    assert_eq!(outcome.evaluated, 19 * 13);
    let closest = outcome.closest.unwrap();
    assert!(closest.error > 0.05 && closest.error < 0.08);
}

#[test]
fn on_grid_configuration_is_found_exactly() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let config = SearchConfig::new(vec![
        AngleRange::degrees(0.0, 60.0, 30.0),
        AngleRange::degrees(-30.0, 30.0, 30.0),
        AngleRange::degrees(-30.0, 30.0, 30.0),
        AngleRange::fixed(0.0),
        AngleRange::degrees(0.0, 60.0, 30.0),
        AngleRange::fixed(0.0),
    ])
    .with_tolerance(1e-6);
    let searcher = ConfigurationSearcher::new(config);
    let q = [
        30f64.to_radians(),
        -30f64.to_radians(),
        30f64.to_radians(),
        0.0,
        60f64.to_radians(),
        0.0,
    ];
    let target = chain.tip_position(&q).unwrap();

    let outcome = searcher.search(&chain, &target).unwrap();
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(rounded_deg(&outcome.matches[0]), [30, -30, 30, 0, 60, 0]);
    assert!(outcome.matches[0].error < 1e-9);
}

#[test]
fn parallel_and_sequential_agree_on_the_wide_grid() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let searcher = ConfigurationSearcher::new(SearchConfig::comau_wide().with_tolerance(0.1));
    let target = Vector3::new(0.45, 0.0, 0.87);
    assert_eq!(
        searcher.search(&chain, &target).unwrap(),
        searcher.par_search(&chain, &target).unwrap()
    );
}

#[test]
fn preset_cancel_flag_stops_both_searches() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let cancel = AtomicBool::new(true);
    let searcher = ConfigurationSearcher::new(SearchConfig::comau_wide());
    let target = Vector3::new(0.45, 0.0, 0.87);

    let sequential = searcher
        .search_with_cancel(&chain, &target, &cancel)
        .unwrap();
    let parallel = searcher
        .par_search_with_cancel(&chain, &target, &cancel)
        .unwrap();
    for outcome in [sequential, parallel] {
        assert!(outcome.cancelled);
        assert!(outcome.matches.is_empty());
        assert!(!outcome.is_exhausted());
    }
}

#[test]
fn respecting_limits_never_returns_out_of_range_tuples() {
    let chain = RobotConfig::comau_smart_six().chain().unwrap();
    let config = SearchConfig::new(vec![
        AngleRange::fixed(0.0),
        AngleRange::degrees(-180.0, 180.0, 30.0),
        AngleRange::degrees(-180.0, 180.0, 30.0),
        AngleRange::fixed(0.0),
        AngleRange::fixed(0.0),
        AngleRange::fixed(0.0),
    ])
    .with_tolerance(1.0)
    .with_respect_limits(true);
    let outcome = ConfigurationSearcher::new(config)
        .search(&chain, &Vector3::new(0.87, 0.0, 1.17))
        .unwrap();

    assert!(outcome.evaluated < 13 * 13);
    for result in &outcome.matches {
        assert!(chain.limit_violations(&result.candidate).unwrap().is_empty());
    }
}
