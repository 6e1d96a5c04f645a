//! Input checks shared by every repository backend.

use std::collections::HashSet;

use uuid::Uuid;

use super::error::DomainError;

pub fn require_non_blank(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::blank(field));
    }
    Ok(())
}

/// A reorder request must be a permutation of the parent's current children.
pub fn validate_reorder(
    current: &[Uuid],
    requested: &[Uuid],
    entity: &'static str,
) -> Result<(), DomainError> {
    if current.len() != requested.len() {
        return Err(DomainError::reorder_mismatch(entity));
    }

    let current: HashSet<&Uuid> = current.iter().collect();
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !current.contains(id) || !seen.insert(id) {
            return Err(DomainError::reorder_mismatch(entity));
        }
    }

    Ok(())
}

/// Display order assigned to position `index` after a reorder.
pub fn display_order_for(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}
