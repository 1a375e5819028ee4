use crate::core::geometry::PlateShape;
use crate::domain::model::{PickRequest, Position, WellContent};
use crate::utils::validation::{FieldFailure, ValidationFailures};
use std::collections::HashSet;

/// Construction input for one destination plate. Control requests and
/// positions must be given together; template and partial positions each
/// stand alone.
#[derive(Debug, Clone, Default)]
pub struct RendererParams {
    pub size: usize,
    pub shape: Option<PlateShape>,
    pub requests: Vec<PickRequest>,
    pub requests_positions: Vec<Position>,
    pub control_requests: Option<Vec<PickRequest>>,
    pub control_positions: Option<Vec<Position>>,
    pub template_positions: Option<Vec<Position>>,
    pub partial_plate_positions: Option<Vec<Position>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Request(usize),
    Control(usize),
    Template,
    Partial,
    Unused,
}

/// One destination plate's finalized partition of positions into requests,
/// controls, template-reserved, partial-reserved and unused wells. All
/// invariants are checked at construction; an instance is always renderable.
#[derive(Debug, Clone)]
pub struct LayoutRenderer {
    size: usize,
    shape: PlateShape,
    requests: Vec<PickRequest>,
    requests_positions: Vec<Position>,
    control_requests: Vec<PickRequest>,
    control_positions: Vec<Position>,
    template_positions: Vec<Position>,
    partial_plate_positions: Vec<Position>,
    slots: Vec<Slot>,
}

impl LayoutRenderer {
    pub fn new(params: RendererParams) -> Result<Self, ValidationFailures> {
        let mut failures = ValidationFailures::new();

        if params.size == 0 {
            failures.push(FieldFailure::new("size", "must be a positive integer"));
        }
        let shape = match params.shape {
            Some(shape) => {
                if params.size > 0 && !shape.matches_size(params.size) {
                    failures.push(FieldFailure::new(
                        "shape",
                        format!(
                            "{} rows x {} columns does not decompose size {}",
                            shape.rows(),
                            shape.columns(),
                            params.size
                        ),
                    ));
                }
                shape
            }
            None => {
                failures.push(FieldFailure::new("shape", "is required"));
                PlateShape::new(1, params.size.max(1))
            }
        };

        match (&params.control_requests, &params.control_positions) {
            (Some(_), None) => {
                failures.push(FieldFailure::new(
                    "control_positions",
                    "required when control_requests are given",
                ));
            }
            (None, Some(_)) => {
                failures.push(FieldFailure::new(
                    "control_requests",
                    "required when control_positions are given",
                ));
            }
            _ => {}
        }

        let control_requests = params.control_requests.unwrap_or_default();
        let control_positions = params.control_positions.unwrap_or_default();
        let template_positions = params.template_positions.unwrap_or_default();
        let partial_plate_positions = params.partial_plate_positions.unwrap_or_default();

        if params.requests_positions.len() != params.requests.len() {
            failures.push(FieldFailure::new(
                "requests_positions",
                format!(
                    "{} positions for {} requests",
                    params.requests_positions.len(),
                    params.requests.len()
                ),
            ));
        }
        if control_positions.len() != control_requests.len() {
            failures.push(FieldFailure::new(
                "control_positions",
                format!(
                    "{} positions for {} control requests",
                    control_positions.len(),
                    control_requests.len()
                ),
            ));
        }

        let sets: [(&str, &[Position]); 4] = [
            ("requests_positions", &params.requests_positions),
            ("control_positions", &control_positions),
            ("template_positions", &template_positions),
            ("partial_plate_positions", &partial_plate_positions),
        ];

        let mut seen: HashSet<Position> = HashSet::new();
        for (field, positions) in sets {
            let mut within: HashSet<Position> = HashSet::new();
            for &position in positions {
                if params.size > 0 && position >= params.size {
                    failures.push(FieldFailure::new(
                        field,
                        format!("position {} outside plate of size {}", position, params.size),
                    ));
                }
                if !within.insert(position) {
                    failures.push(FieldFailure::new(
                        field,
                        format!("duplicate position {}", position),
                    ));
                } else if !seen.insert(position) {
                    failures.push(FieldFailure::new(
                        field,
                        format!("position {} clashes with another position set", position),
                    ));
                }
            }
        }

        failures.into_result()?;

        let mut slots = vec![Slot::Unused; params.size];
        for (index, &position) in params.requests_positions.iter().enumerate() {
            slots[position] = Slot::Request(index);
        }
        for (index, &position) in control_positions.iter().enumerate() {
            slots[position] = Slot::Control(index);
        }
        for &position in &template_positions {
            slots[position] = Slot::Template;
        }
        for &position in &partial_plate_positions {
            slots[position] = Slot::Partial;
        }

        Ok(Self {
            size: params.size,
            shape,
            requests: params.requests,
            requests_positions: params.requests_positions,
            control_requests,
            control_positions,
            template_positions,
            partial_plate_positions,
            slots,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn shape(&self) -> PlateShape {
        self.shape
    }

    pub fn requests(&self) -> &[PickRequest] {
        &self.requests
    }

    pub fn requests_positions(&self) -> &[Position] {
        &self.requests_positions
    }

    pub fn control_requests(&self) -> &[PickRequest] {
        &self.control_requests
    }

    pub fn control_positions(&self) -> &[Position] {
        &self.control_positions
    }

    pub fn template_positions(&self) -> &[Position] {
        &self.template_positions
    }

    pub fn partial_plate_positions(&self) -> &[Position] {
        &self.partial_plate_positions
    }

    /// Classifies one well. `position` must be in `[0, size)`.
    pub fn render(&self, position: Position) -> WellContent {
        assert!(
            position < self.size,
            "position {} outside plate of size {}",
            position,
            self.size
        );
        match self.slots[position] {
            Slot::Request(index) => {
                let request = &self.requests[index];
                WellContent::Request {
                    id: request.id,
                    source_barcode: request.source_plate_barcode.clone(),
                    source_well: request.source_well_label.clone(),
                }
            }
            Slot::Control(index) => {
                let request = &self.control_requests[index];
                WellContent::Control {
                    id: request.id,
                    source_barcode: request.source_plate_barcode.clone(),
                    source_well: request.source_well_label.clone(),
                }
            }
            Slot::Template => WellContent::TemplateEmpty,
            Slot::Partial => WellContent::Empty,
            Slot::Unused => WellContent::Unused,
        }
    }

    pub fn by_row(&self) -> Vec<WellContent> {
        self.render_order(&self.shape.row_major_order())
    }

    pub fn by_column(&self) -> Vec<WellContent> {
        self.render_order(&self.shape.column_major_order())
    }

    pub fn by_interleaved_column(&self) -> Vec<WellContent> {
        self.render_order(&self.shape.interleaved_column_order())
    }

    fn render_order(&self, order: &[Position]) -> Vec<WellContent> {
        order.iter().map(|&position| self.render(position)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: u64, barcode: &str, well: &str) -> PickRequest {
        PickRequest {
            id,
            source_plate_barcode: barcode.to_string(),
            source_well_label: well.to_string(),
            batch_id: 1,
        }
    }

    fn base_params() -> RendererParams {
        RendererParams {
            size: 6,
            shape: Some(PlateShape::new(2, 3)),
            requests: vec![request(1, "DN1", "A1")],
            requests_positions: vec![0],
            control_requests: Some(vec![request(2, "DN2", "A1")]),
            control_positions: Some(vec![1]),
            template_positions: Some(vec![2]),
            partial_plate_positions: Some(vec![3]),
        }
    }

    #[test]
    fn valid_params_build_a_renderer() {
        assert!(LayoutRenderer::new(base_params()).is_ok());
    }

    #[test]
    fn shape_is_required() {
        let mut params = base_params();
        params.shape = None;
        let failures = LayoutRenderer::new(params).unwrap_err();
        assert!(failures.iter().any(|f| f.field == "shape"));
    }

    #[test]
    fn shape_must_decompose_size() {
        let mut params = base_params();
        params.shape = Some(PlateShape::new(2, 2));
        assert!(LayoutRenderer::new(params).is_err());
    }

    #[test]
    fn zero_size_is_invalid() {
        let mut params = base_params();
        params.size = 0;
        let failures = LayoutRenderer::new(params).unwrap_err();
        assert!(failures.iter().any(|f| f.field == "size"));
    }

    #[test]
    fn control_fields_must_come_as_a_pair() {
        let mut params = base_params();
        params.control_positions = None;
        let failures = LayoutRenderer::new(params).unwrap_err();
        assert!(failures.iter().any(|f| f.field == "control_positions"));

        let mut params = base_params();
        params.control_requests = None;
        let failures = LayoutRenderer::new(params).unwrap_err();
        assert!(failures.iter().any(|f| f.field == "control_requests"));
    }

    #[test]
    fn every_request_needs_a_position() {
        let mut params = base_params();
        params.requests.push(request(3, "DN3", "B1"));
        let failures = LayoutRenderer::new(params).unwrap_err();
        assert!(failures.iter().any(|f| f.field == "requests_positions"));
    }

    #[test]
    fn clashing_position_sets_are_invalid() {
        let mut params = base_params();
        params.template_positions = Some(vec![0]);
        let failures = LayoutRenderer::new(params).unwrap_err();
        assert!(failures
            .iter()
            .any(|f| f.field == "template_positions" && f.message.contains("clashes")));
    }

    #[test]
    fn out_of_range_positions_are_invalid() {
        let mut params = base_params();
        params.partial_plate_positions = Some(vec![6]);
        let failures = LayoutRenderer::new(params).unwrap_err();
        assert!(failures
            .iter()
            .any(|f| f.field == "partial_plate_positions" && f.message.contains("outside")));
    }

    #[test]
    fn duplicate_positions_within_a_set_are_invalid() {
        let mut params = base_params();
        params.requests.push(request(3, "DN3", "B1"));
        params.requests_positions = vec![4, 4];
        let failures = LayoutRenderer::new(params).unwrap_err();
        assert!(failures
            .iter()
            .any(|f| f.field == "requests_positions" && f.message.contains("duplicate")));
    }

    #[test]
    fn all_failures_are_reported_at_once() {
        let mut params = base_params();
        params.size = 0;
        params.control_positions = None;
        params.requests_positions = vec![];
        let failures = LayoutRenderer::new(params).unwrap_err();
        assert!(failures.len() >= 3);
    }

    #[test]
    fn render_classifies_every_category() {
        let renderer = LayoutRenderer::new(base_params()).unwrap();
        assert_eq!(
            renderer.render(0),
            WellContent::Request {
                id: 1,
                source_barcode: "DN1".to_string(),
                source_well: "A1".to_string(),
            }
        );
        assert_eq!(
            renderer.render(1),
            WellContent::Control {
                id: 2,
                source_barcode: "DN2".to_string(),
                source_well: "A1".to_string(),
            }
        );
        assert_eq!(renderer.render(2), WellContent::TemplateEmpty);
        assert_eq!(renderer.render(3), WellContent::Empty);
        assert_eq!(renderer.render(4), WellContent::Unused);
        assert_eq!(renderer.render(5), WellContent::Unused);
    }

    #[test]
    #[should_panic(expected = "outside plate of size")]
    fn render_rejects_an_out_of_range_position() {
        let renderer = LayoutRenderer::new(base_params()).unwrap();
        renderer.render(6);
    }

    #[test]
    fn category_counts_reproduce_the_input_set_sizes() {
        let renderer = LayoutRenderer::new(base_params()).unwrap();
        let rendered = renderer.by_row();
        let count = |predicate: fn(&WellContent) -> bool| {
            rendered.iter().filter(|content| predicate(content)).count()
        };
        assert_eq!(count(|c| matches!(c, WellContent::Request { .. })), 1);
        assert_eq!(count(|c| matches!(c, WellContent::Control { .. })), 1);
        assert_eq!(count(|c| matches!(c, WellContent::TemplateEmpty)), 1);
        assert_eq!(count(|c| matches!(c, WellContent::Empty)), 1);
        assert_eq!(count(|c| matches!(c, WellContent::Unused)), 2);
    }

    #[test]
    fn traversals_agree_with_render() {
        let renderer = LayoutRenderer::new(base_params()).unwrap();
        let shape = renderer.shape();
        assert_eq!(renderer.by_row().len(), renderer.size());
        for (index, position) in shape.column_major_order().into_iter().enumerate() {
            assert_eq!(renderer.by_column()[index], renderer.render(position));
        }
        for (index, position) in shape.interleaved_column_order().into_iter().enumerate() {
            assert_eq!(
                renderer.by_interleaved_column()[index],
                renderer.render(position)
            );
        }
    }
}
