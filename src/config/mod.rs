use crate::core::geometry::PlateShape;
use crate::utils::error::Result;
use crate::utils::validation::{require_positive, FieldFailure, Validate, ValidationFailures};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Destination plate geometry for one allocation run. Deserializable from
/// TOML so deployments can describe their plate purposes in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub size: usize,
    pub shape: ShapeConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeConfig {
    pub rows: usize,
    pub columns: usize,
}

impl LayoutConfig {
    /// Standard 96-well plate, 8 rows by 12 columns.
    pub fn standard_96() -> Self {
        Self {
            size: 96,
            shape: ShapeConfig {
                rows: 8,
                columns: 12,
            },
        }
    }

    pub fn new(size: usize, rows: usize, columns: usize) -> Self {
        Self {
            size,
            shape: ShapeConfig { rows, columns },
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn plate_shape(&self) -> PlateShape {
        PlateShape::new(self.shape.rows, self.shape.columns)
    }
}

impl TryFrom<&LayoutConfig> for PlateShape {
    type Error = ValidationFailures;

    fn try_from(config: &LayoutConfig) -> std::result::Result<Self, Self::Error> {
        config.validate()?;
        Ok(config.plate_shape())
    }
}

impl Validate for LayoutConfig {
    fn validate(&self) -> std::result::Result<(), ValidationFailures> {
        let mut failures = ValidationFailures::new();
        require_positive(&mut failures, "size", self.size);
        require_positive(&mut failures, "shape.rows", self.shape.rows);
        require_positive(&mut failures, "shape.columns", self.shape.columns);
        if self.shape.rows * self.shape.columns != self.size {
            failures.push(FieldFailure::new(
                "shape",
                format!(
                    "{} rows x {} columns does not decompose size {}",
                    self.shape.rows, self.shape.columns, self.size
                ),
            ));
        }
        failures.into_result()
    }
}
