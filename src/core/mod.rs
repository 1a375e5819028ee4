pub mod controls;
pub mod geometry;
pub mod processor;
pub mod renderer;

pub use crate::domain::model::{ControlWell, PickRequest, Position, WellContent};
pub use crate::domain::ports::{
    ControlRequestStore, ControlWellsProvider, ReservedPositionsProvider,
};
pub use crate::utils::error::Result;
