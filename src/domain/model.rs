use serde::{Deserialize, Serialize};

/// Linear well address in `[0, size)`, row-major (A1 = 0, A2 = 1, ...).
pub type Position = usize;

/// One unit of cherrypicking work: a source well to transfer onto a
/// destination well. The engine only assigns it a destination position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRequest {
    pub id: u64,
    pub source_plate_barcode: String,
    pub source_well_label: String,
    pub batch_id: u64,
}

/// A source well flagged as a control sample. Identity is `id`; the engine
/// links each control well to exactly one control request per allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlWell {
    pub id: u64,
    pub plate_barcode: String,
    pub well_label: String,
}

/// Worksheet marker for wells kept empty by the template plate.
pub const TEMPLATE_EMPTY_WELL: (u64, &str, &str) = (0, "---", "");
/// Worksheet marker for wells kept empty (partial plate or trailing filler).
pub const EMPTY_WELL: (u64, &str, &str) = (0, "Empty", "");

/// Classification of one destination well after allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WellContent {
    Request {
        id: u64,
        source_barcode: String,
        source_well: String,
    },
    Control {
        id: u64,
        source_barcode: String,
        source_well: String,
    },
    /// Reserved by the template plate on every destination plate.
    TemplateEmpty,
    /// Reserved by the partial plate on the first destination plate.
    Empty,
    /// Trailing unused well, e.g. on the last partially filled plate.
    Unused,
}

impl WellContent {
    /// Projects the content onto the `(id, barcode, well label)` tuple the
    /// pipetting worksheets print.
    pub fn worksheet_row(&self) -> (u64, String, String) {
        match self {
            WellContent::Request {
                id,
                source_barcode,
                source_well,
            }
            | WellContent::Control {
                id,
                source_barcode,
                source_well,
            } => (*id, source_barcode.clone(), source_well.clone()),
            WellContent::TemplateEmpty => {
                let (id, barcode, well) = TEMPLATE_EMPTY_WELL;
                (id, barcode.to_string(), well.to_string())
            }
            WellContent::Empty | WellContent::Unused => {
                let (id, barcode, well) = EMPTY_WELL;
                (id, barcode.to_string(), well.to_string())
            }
        }
    }
}
