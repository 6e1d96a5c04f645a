use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("`{field}` must not be blank")]
    BlankField { field: &'static str },
    #[error("reorder must list every {entity} of the registration exactly once")]
    ReorderMismatch { entity: &'static str },
}

impl DomainError {
    pub fn blank(field: &'static str) -> Self {
        Self::BlankField { field }
    }

    pub fn reorder_mismatch(entity: &'static str) -> Self {
        Self::ReorderMismatch { entity }
    }
}
