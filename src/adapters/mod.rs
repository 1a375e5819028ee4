// Adapters layer: concrete implementations of the domain ports. The real
// deployment wires these to the LIMS request/batch store; the in-memory and
// static variants back tests and standalone use.

use crate::domain::model::{ControlWell, PickRequest, Position};
use crate::domain::ports::{ControlRequestStore, ControlWellsProvider, ReservedPositionsProvider};
use crate::utils::error::Result;
use std::collections::HashMap;

/// Control-request store keeping created requests in memory, keyed by source
/// well id. Ids are handed out from a configurable counter so tests can
/// assert on them.
#[derive(Debug, Default)]
pub struct InMemoryControlRequestStore {
    next_id: u64,
    created: usize,
    by_well: HashMap<u64, PickRequest>,
}

impl InMemoryControlRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(next_id: u64) -> Self {
        Self {
            next_id,
            ..Self::default()
        }
    }

    /// Pre-seeds a request for a control well, as if a previous allocation
    /// run had already created it. Seeded entries do not count as creations.
    pub fn seed(&mut self, well_id: u64, request: PickRequest) {
        self.by_well.insert(well_id, request);
    }

    /// Number of requests created through the store, excluding seeded ones.
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Number of requests held, created and seeded alike.
    pub fn stored_count(&self) -> usize {
        self.by_well.len()
    }
}

impl ControlRequestStore for InMemoryControlRequestStore {
    fn existing_control_request(&self, well: &ControlWell) -> Option<PickRequest> {
        self.by_well.get(&well.id).cloned()
    }

    fn create_control_request(
        &mut self,
        well: &ControlWell,
        batch_id: u64,
    ) -> Result<PickRequest> {
        let request = PickRequest {
            id: self.next_id,
            source_plate_barcode: well.plate_barcode.clone(),
            source_well_label: well.well_label.clone(),
            batch_id,
        };
        self.next_id += 1;
        self.created += 1;
        self.by_well.insert(well.id, request.clone());
        Ok(request)
    }
}

/// Control plate backed by a fixed list of control wells.
#[derive(Debug, Clone)]
pub struct StaticControlPlate {
    wells: Vec<ControlWell>,
}

impl StaticControlPlate {
    pub fn new(wells: Vec<ControlWell>) -> Self {
        Self { wells }
    }
}

impl ControlWellsProvider for StaticControlPlate {
    fn control_wells(&self) -> Vec<ControlWell> {
        self.wells.clone()
    }
}

/// Template or partial plate backed by a fixed position set.
#[derive(Debug, Clone)]
pub struct StaticReservedPlate {
    positions: Vec<Position>,
}

impl StaticReservedPlate {
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }
}

impl ReservedPositionsProvider for StaticReservedPlate {
    fn reserved_positions(&self) -> Vec<Position> {
        self.positions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well(id: u64) -> ControlWell {
        ControlWell {
            id,
            plate_barcode: "CTRL1".to_string(),
            well_label: "A1".to_string(),
        }
    }

    #[test]
    fn create_then_lookup_round_trips() {
        let mut store = InMemoryControlRequestStore::starting_at(100);
        let created = store.create_control_request(&well(1), 42).unwrap();
        assert_eq!(created.id, 100);
        assert_eq!(created.batch_id, 42);
        assert_eq!(store.created_count(), 1);
        assert_eq!(store.existing_control_request(&well(1)), Some(created));
    }

    #[test]
    fn seeded_requests_are_stored_but_not_counted_as_created() {
        let mut store = InMemoryControlRequestStore::new();
        store.seed(
            3,
            PickRequest {
                id: 77,
                source_plate_barcode: "CTRL1".to_string(),
                source_well_label: "A3".to_string(),
                batch_id: 42,
            },
        );
        assert_eq!(store.created_count(), 0);
        assert_eq!(store.stored_count(), 1);
    }

    #[test]
    fn unknown_well_has_no_existing_request() {
        let store = InMemoryControlRequestStore::new();
        assert!(store.existing_control_request(&well(9)).is_none());
    }
}
