use serde::Serialize;
use std::fmt;

/// One field-scoped validation problem, optionally attributed to a
/// destination plate index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldFailure {
    pub field: String,
    pub plate: Option<usize>,
    pub message: String,
}

impl FieldFailure {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            plate: None,
            message: message.into(),
        }
    }

    pub fn for_plate(plate: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            plate: Some(plate),
            message: message.into(),
        }
    }

    fn qualified_field(&self) -> String {
        match self.plate {
            Some(plate) => format!("plate_{}_{}", plate, self.field),
            None => self.field.clone(),
        }
    }
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.qualified_field(), self.message)
    }
}

/// Accumulator for validation failures. The engine never stops at the first
/// problem: callers get every failure for a configuration at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationFailures(Vec<FieldFailure>);

impl ValidationFailures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failure: FieldFailure) {
        self.0.push(failure);
    }

    pub fn extend(&mut self, other: ValidationFailures) {
        self.0.extend(other.0);
    }

    /// Re-attributes every failure to the given plate index. Used when a
    /// per-plate check surfaces through the processor.
    pub fn annotated_with_plate(mut self, plate: usize) -> Self {
        for failure in &mut self.0 {
            failure.plate = Some(plate);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldFailure> {
        self.0.iter()
    }

    /// Finishes an accumulation pass: `Ok` when nothing was recorded.
    pub fn into_result(self) -> std::result::Result<(), ValidationFailures> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|failure| failure.to_string()).collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl From<FieldFailure> for ValidationFailures {
    fn from(failure: FieldFailure) -> Self {
        Self(vec![failure])
    }
}

pub trait Validate {
    fn validate(&self) -> std::result::Result<(), ValidationFailures>;
}

pub fn require_positive(
    failures: &mut ValidationFailures,
    field: &str,
    value: usize,
) {
    if value == 0 {
        failures.push(FieldFailure::new(field, "must be a positive integer"));
    }
}

pub fn require_non_empty<T>(failures: &mut ValidationFailures, field: &str, values: &[T]) {
    if values.is_empty() {
        failures.push(FieldFailure::new(field, "must not be empty"));
    }
}
