use cherrypick_layout::adapters::{InMemoryControlRequestStore, StaticControlPlate};
use cherrypick_layout::{
    ControlWell, LayoutConfig, LayoutError, LayoutProcessor, PickRequest, PlateOverlays,
};

fn request(id: u64, batch_id: u64) -> PickRequest {
    PickRequest {
        id,
        source_plate_barcode: "DN1".to_string(),
        source_well_label: format!("A{}", id + 1),
        batch_id,
    }
}

fn control_wells(count: usize) -> Vec<ControlWell> {
    (1..=count as u64)
        .map(|id| ControlWell {
            id,
            plate_barcode: "CTRL1".to_string(),
            well_label: format!("A{}", id),
        })
        .collect()
}

fn build_with_controls(
    config: LayoutConfig,
    batch_id: u64,
    request_count: usize,
    controls: usize,
) -> Result<Vec<Vec<usize>>, LayoutError> {
    let control = StaticControlPlate::new(control_wells(controls));
    let mut store = InMemoryControlRequestStore::new();
    let requests = (0..request_count as u64)
        .map(|id| request(id, batch_id))
        .collect();
    let processor = LayoutProcessor::build(
        &config,
        requests,
        PlateOverlays {
            control_plate: Some(&control),
            ..Default::default()
        },
        &mut store,
    )?;
    Ok((0..processor.total_plates())
        .map(|plate| processor.control_positions(plate).to_vec())
        .collect())
}

#[test]
fn batch_zero_walks_controls_across_a_five_well_plate() {
    // 5 filler wells are impossible to arrange on a real rectangular plate
    // without one spare, so drive the allocator through a 1x5 strip where
    // every plate still has room for requests beside the two controls.
    let config = LayoutConfig::new(5, 1, 5);
    // 13 requests at 3 per plate spread the run over 5 plates.
    let positions = build_with_controls(config, 0, 13, 2).unwrap();
    assert_eq!(positions.len(), 5);
    assert_eq!(positions[0], vec![0, 1]);
    assert_eq!(positions[1], vec![1, 2]);
    assert_eq!(positions[2], vec![2, 3]);
    assert_eq!(positions[3], vec![3, 4]);
    assert_eq!(positions[4], vec![4, 0]);
}

#[test]
fn batch_12345_places_three_controls_on_hundred_well_plates() {
    let config = LayoutConfig::new(100, 10, 10);
    // 285 requests at 97 per plate need 3 plates.
    let positions = build_with_controls(config, 12345, 285, 3).unwrap();
    assert_eq!(positions.len(), 3);
    assert_eq!(positions[0], vec![45, 24, 1]);
    assert_eq!(positions[1], vec![46, 25, 2]);
    assert_eq!(positions[2], vec![47, 26, 3]);
}

#[test]
fn consecutive_batch_ids_shift_the_first_control() {
    let config = LayoutConfig::new(100, 10, 10);
    let positions = build_with_controls(config, 12346, 285, 3).unwrap();
    assert_eq!(positions[0], vec![46, 24, 1]);
    assert_eq!(positions[1], vec![47, 25, 2]);
    assert_eq!(positions[2], vec![48, 26, 3]);
}

#[test]
fn batch_ids_differing_in_higher_digits_shift_later_controls() {
    let config = LayoutConfig::new(100, 10, 10);

    let positions = build_with_controls(config.clone(), 12445, 285, 3).unwrap();
    assert_eq!(positions[0], vec![45, 25, 1]);
    assert_eq!(positions[1], vec![46, 26, 2]);
    assert_eq!(positions[2], vec![47, 27, 3]);

    let positions = build_with_controls(config, 12545, 285, 3).unwrap();
    assert_eq!(positions[0], vec![45, 26, 1]);
    assert_eq!(positions[1], vec![46, 27, 2]);
    assert_eq!(positions[2], vec![47, 28, 3]);
}

#[test]
fn too_many_controls_for_the_plate_fail_validation_without_side_effects() {
    let control = StaticControlPlate::new(control_wells(10));
    let mut store = InMemoryControlRequestStore::new();
    let err = LayoutProcessor::build(
        &LayoutConfig::new(6, 2, 3),
        vec![request(1, 4)],
        PlateOverlays {
            control_plate: Some(&control),
            ..Default::default()
        },
        &mut store,
    )
    .unwrap_err();
    let LayoutError::Validation(failures) = err else {
        panic!("expected a validation failure, got {:?}", err);
    };
    assert!(failures
        .iter()
        .any(|f| f.field == "control_positions" && f.plate == Some(0)));
    assert_eq!(store.created_count(), 0);
}

#[test]
fn rebuilding_the_same_run_yields_identical_placements() {
    let config = LayoutConfig::standard_96();
    let first = build_with_controls(config.clone(), 887766, 200, 3).unwrap();
    let second = build_with_controls(config, 887766, 200, 3).unwrap();
    assert_eq!(first, second);
}
