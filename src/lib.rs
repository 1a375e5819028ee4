pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{LayoutConfig, ShapeConfig};
pub use crate::core::geometry::PlateShape;
pub use crate::core::processor::{LayoutProcessor, PlateOverlays};
pub use crate::core::renderer::{LayoutRenderer, RendererParams};
pub use crate::domain::model::{ControlWell, PickRequest, Position, WellContent};
pub use crate::domain::ports::{
    ControlRequestStore, ControlWellsProvider, ReservedPositionsProvider,
};
pub use crate::utils::error::{LayoutError, Result};
pub use crate::utils::logger::init_logger;
pub use crate::utils::validation::{FieldFailure, Validate, ValidationFailures};
