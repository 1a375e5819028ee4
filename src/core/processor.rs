use crate::config::LayoutConfig;
use crate::core::controls;
use crate::core::geometry::PlateShape;
use crate::core::renderer::{LayoutRenderer, RendererParams};
use crate::domain::model::{ControlWell, PickRequest, Position};
use crate::domain::ports::{ControlRequestStore, ControlWellsProvider, ReservedPositionsProvider};
use crate::utils::error::Result;
use crate::utils::validation::{require_non_empty, FieldFailure, Validate, ValidationFailures};
use std::collections::{HashMap, HashSet, VecDeque};

/// Hard cap on destination plates per run. Guards against misconfigured tiny
/// plate sizes or oversized batches looping forever.
const MAX_PLATES: usize = 99;

/// Optional plate facts overlaid on an allocation run.
#[derive(Default)]
pub struct PlateOverlays<'a> {
    /// Source wells flagged as controls; each gets a destination position on
    /// every plate.
    pub control_plate: Option<&'a dyn ControlWellsProvider>,
    /// Positions reserved identically on every destination plate.
    pub template_plate: Option<&'a dyn ReservedPositionsProvider>,
    /// Unfilled positions reserved on the first destination plate only.
    pub partial_plate: Option<&'a dyn ReservedPositionsProvider>,
}

/// Orchestrates one allocation run: splits the request queue across as many
/// destination plates as needed, derives per-plate exclusion sets, allocates
/// control positions, and builds one validated [`LayoutRenderer`] per plate.
///
/// Everything is computed eagerly at construction; instances are transient
/// and hold no caches shared with other runs. The only side effect is lazy
/// creation of control requests through the [`ControlRequestStore`] seam, and
/// it is skipped entirely when the configuration is already invalid.
#[derive(Debug)]
pub struct LayoutProcessor {
    size: usize,
    shape: PlateShape,
    batch_id: u64,
    requests: Vec<PickRequest>,
    requests_for_plate: Vec<Vec<PickRequest>>,
    allocated_requests_positions: Vec<Vec<Position>>,
    control_requests: Vec<PickRequest>,
    control_positions_by_plate: Vec<Vec<Position>>,
    template_positions: Vec<Position>,
    partial_plate_positions: Vec<Position>,
    plates: Vec<LayoutRenderer>,
}

impl LayoutProcessor {
    pub fn build(
        config: &LayoutConfig,
        requests: Vec<PickRequest>,
        overlays: PlateOverlays<'_>,
        store: &mut dyn ControlRequestStore,
    ) -> Result<Self> {
        let mut failures = ValidationFailures::new();
        if let Err(config_failures) = config.validate() {
            failures.extend(config_failures);
        }
        require_non_empty(&mut failures, "requests", &requests);
        failures.into_result()?;

        let size = config.size;
        let shape = config.plate_shape();
        let batch_id = requests[0].batch_id;
        if requests.iter().any(|request| request.batch_id != batch_id) {
            tracing::warn!(
                batch_id,
                "request queue mixes batch ids; control placement seeds from the first"
            );
        }

        let template_positions: Vec<Position> = overlays
            .template_plate
            .map(|plate| plate.reserved_positions())
            .unwrap_or_default();
        let partial_plate_positions: Vec<Position> = overlays
            .partial_plate
            .map(|plate| plate.reserved_positions())
            .unwrap_or_default();
        let control_wells: Vec<ControlWell> = overlays
            .control_plate
            .map(|plate| plate.control_wells())
            .unwrap_or_default();

        let mut failures = ValidationFailures::new();
        let mut queue: VecDeque<PickRequest> = requests.iter().cloned().collect();
        let mut requests_for_plate: Vec<Vec<PickRequest>> = Vec::new();
        let mut allocated_requests_positions: Vec<Vec<Position>> = Vec::new();
        let mut control_positions_by_plate: Vec<Vec<Position>> = Vec::new();

        while !queue.is_empty() {
            let plate = requests_for_plate.len();
            if plate == MAX_PLATES {
                failures.push(FieldFailure::new(
                    "requests",
                    format!("max limit of cherrypicking is {} plates", MAX_PLATES),
                ));
                break;
            }

            let available = derive_available_positions(
                size,
                &template_positions,
                partial_for_plate(&partial_plate_positions, plate),
            );
            let control_positions = if overlays.control_plate.is_some() {
                match controls::control_positions(
                    batch_id,
                    plate,
                    &available,
                    control_wells.len(),
                ) {
                    Ok(positions) => positions,
                    Err(failure) => {
                        failures.extend(ValidationFailures::from(failure).annotated_with_plate(plate));
                        break;
                    }
                }
            } else {
                Vec::new()
            };

            let available_requests =
                subtract_positions(&available, &control_positions);
            let take = available_requests.len().min(queue.len());
            let chunk: Vec<PickRequest> = queue.drain(..take).collect();
            let allocated = available_requests[..chunk.len()].to_vec();

            tracing::debug!(
                plate,
                requests = chunk.len(),
                controls = control_positions.len(),
                "partitioned destination plate"
            );
            requests_for_plate.push(chunk);
            allocated_requests_positions.push(allocated);
            control_positions_by_plate.push(control_positions);
        }
        failures.into_result()?;

        // Side effects start here; invalid configurations never reach the
        // store.
        let control_requests =
            resolve_control_requests(&control_wells, batch_id, store)?;

        let total_plates = requests_for_plate.len();
        let mut failures = ValidationFailures::new();
        let mut plates = Vec::with_capacity(total_plates);
        for plate in 0..total_plates {
            let params = RendererParams {
                size,
                shape: Some(shape),
                requests: requests_for_plate[plate].clone(),
                requests_positions: allocated_requests_positions[plate].clone(),
                control_requests: overlays
                    .control_plate
                    .map(|_| control_requests.clone()),
                control_positions: overlays
                    .control_plate
                    .map(|_| control_positions_by_plate[plate].clone()),
                template_positions: overlays
                    .template_plate
                    .map(|_| template_positions.clone()),
                partial_plate_positions: overlays
                    .partial_plate
                    .map(|_| partial_for_plate(&partial_plate_positions, plate).to_vec()),
            };
            match LayoutRenderer::new(params) {
                Ok(renderer) => plates.push(renderer),
                Err(renderer_failures) => {
                    failures.extend(renderer_failures.annotated_with_plate(plate));
                }
            }
        }
        failures.into_result()?;

        tracing::info!(
            batch_id,
            total_plates,
            requests = requests.len(),
            controls = control_requests.len(),
            "layout allocation complete"
        );
        Ok(Self {
            size,
            shape,
            batch_id,
            requests,
            requests_for_plate,
            allocated_requests_positions,
            control_requests,
            control_positions_by_plate,
            template_positions,
            partial_plate_positions,
            plates,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn shape(&self) -> PlateShape {
        self.shape
    }

    pub fn batch_id(&self) -> u64 {
        self.batch_id
    }

    pub fn requests(&self) -> &[PickRequest] {
        &self.requests
    }

    pub fn total_plates(&self) -> usize {
        self.plates.len()
    }

    pub fn plates(&self) -> &[LayoutRenderer] {
        &self.plates
    }

    pub fn requests_for_plate(&self, plate: usize) -> &[PickRequest] {
        self.requests_for_plate
            .get(plate)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The run's control requests, one per control well, shared by every
    /// plate.
    pub fn control_requests_for_plate(&self, _plate: usize) -> &[PickRequest] {
        &self.control_requests
    }

    pub fn control_positions(&self, plate: usize) -> &[Position] {
        self.control_positions_by_plate
            .get(plate)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Identical for every plate index.
    pub fn template_positions(&self, _plate: usize) -> &[Position] {
        &self.template_positions
    }

    /// Non-empty only for the first plate.
    pub fn partial_plate_positions(&self, plate: usize) -> &[Position] {
        partial_for_plate(&self.partial_plate_positions, plate)
    }

    pub fn available_positions(&self, plate: usize) -> Vec<Position> {
        derive_available_positions(
            self.size,
            &self.template_positions,
            self.partial_plate_positions(plate),
        )
    }

    pub fn available_requests_positions(&self, plate: usize) -> Vec<Position> {
        subtract_positions(&self.available_positions(plate), self.control_positions(plate))
    }

    pub fn allocated_requests_positions(&self, plate: usize) -> &[Position] {
        self.allocated_requests_positions
            .get(plate)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn partial_for_plate(partial_plate_positions: &[Position], plate: usize) -> &[Position] {
    if plate == 0 {
        partial_plate_positions
    } else {
        &[]
    }
}

/// `[0, size)` minus the partial and template reservations, ascending.
fn derive_available_positions(
    size: usize,
    template_positions: &[Position],
    partial_plate_positions: &[Position],
) -> Vec<Position> {
    let reserved: HashSet<Position> = template_positions
        .iter()
        .chain(partial_plate_positions)
        .copied()
        .collect();
    (0..size)
        .filter(|position| !reserved.contains(position))
        .collect()
}

fn subtract_positions(positions: &[Position], removed: &[Position]) -> Vec<Position> {
    let removed: HashSet<Position> = removed.iter().copied().collect();
    positions
        .iter()
        .copied()
        .filter(|position| !removed.contains(position))
        .collect()
}

/// One control request per control well, shared across the run's plates.
/// Resolution order per well: run-local identity, then the store's existing
/// request, then creation (which appends to the batch in the external store).
fn resolve_control_requests(
    control_wells: &[ControlWell],
    batch_id: u64,
    store: &mut dyn ControlRequestStore,
) -> Result<Vec<PickRequest>> {
    let mut by_well: HashMap<u64, PickRequest> = HashMap::new();
    let mut requests = Vec::with_capacity(control_wells.len());
    for well in control_wells {
        let request = match by_well.get(&well.id) {
            Some(request) => request.clone(),
            None => match store.existing_control_request(well) {
                Some(request) => request,
                None => {
                    tracing::debug!(well_id = well.id, batch_id, "creating control request");
                    store.create_control_request(well, batch_id)?
                }
            },
        };
        by_well.insert(well.id, request.clone());
        requests.push(request);
    }
    Ok(requests)
}
