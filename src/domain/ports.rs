use crate::domain::model::{ControlWell, PickRequest, Position};
use crate::utils::error::Result;

/// Exposed by a control plate: the source wells flagged as controls.
pub trait ControlWellsProvider {
    fn control_wells(&self) -> Vec<ControlWell>;
}

/// Exposed by template and partial plates: well positions to keep reserved.
/// A template plate reports the positions its own wells occupy (reserved on
/// every destination plate); a partial plate reports its currently-unfilled
/// positions (reserved on the first destination plate only).
pub trait ReservedPositionsProvider {
    fn reserved_positions(&self) -> Vec<Position>;
}

/// The engine's single side-effect seam: lookup and creation of control
/// requests against the external request/batch store. Creating appends the
/// new request to the batch's request collection; a creation failure aborts
/// the whole allocation run.
pub trait ControlRequestStore {
    fn existing_control_request(&self, well: &ControlWell) -> Option<PickRequest>;

    fn create_control_request(&mut self, well: &ControlWell, batch_id: u64)
        -> Result<PickRequest>;
}
