use crate::domain::model::Position;
use crate::utils::validation::FieldFailure;

/// Chooses destination positions for control samples on one plate.
///
/// The batch id is decoded mixed-radix style against a shrinking copy of the
/// free-position pool: each draw removes the `n mod pool_len`-th entry and
/// divides `n` by the pool length, so one batch id maps to one permutation
/// prefix. The drawn position is then shifted by the plate index modulo the
/// initial pool size, walking the whole pattern one well forward on every
/// subsequent plate. Together this keeps consecutive batches and consecutive
/// plates on the same robot bed from repeating an identical control pattern.
///
/// Pure and deterministic: fixed `(batch_id, plate_index, free_positions,
/// control_count)` always yields the same output. The shift can land on a
/// position outside the free pool; the renderer's disjointness validation is
/// the authority on clashes.
pub fn control_positions(
    batch_id: u64,
    plate_index: usize,
    free_positions: &[Position],
    control_count: usize,
) -> Result<Vec<Position>, FieldFailure> {
    // Checked up front so the draw loop can never hit an empty pool.
    if control_count > free_positions.len() {
        return Err(FieldFailure::new(
            "control_positions",
            format!(
                "{} controls do not fit in {} free positions",
                control_count,
                free_positions.len()
            ),
        ));
    }
    if control_count == 0 {
        return Ok(Vec::new());
    }

    let span = free_positions.len();
    let mut pool = free_positions.to_vec();
    let mut n = batch_id;
    let mut positions = Vec::with_capacity(control_count);

    for _ in 0..control_count {
        let current_size = pool.len() as u64;
        let position = pool.remove((n % current_size) as usize);
        positions.push((position + plate_index) % span);
        n /= current_size;
    }

    tracing::debug!(
        batch_id,
        plate_index,
        ?positions,
        "allocated control positions"
    );
    Ok(positions)
}
