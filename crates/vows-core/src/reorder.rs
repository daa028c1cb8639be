//! Page ordering.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::{VowsError, VowsResult};

/// Move the element at `from` to index `to`, shifting the elements in
/// between. Out-of-range indices leave the list unchanged.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Check that `requested` is an exact permutation of `current`: the same
/// ids, each exactly once.
pub fn validate_permutation(current: &[Uuid], requested: &[Uuid]) -> VowsResult<()> {
    if current.len() != requested.len() {
        return Err(VowsError::validation(format!(
            "expected {} page ids, got {}",
            current.len(),
            requested.len()
        )));
    }

    let known: HashSet<&Uuid> = current.iter().collect();
    let mut seen = HashSet::with_capacity(requested.len());
    for id in requested {
        if !known.contains(id) {
            return Err(VowsError::validation(format!(
                "page {id} does not belong to this planner"
            )));
        }
        if !seen.insert(id) {
            return Err(VowsError::validation(format!("page {id} listed twice")));
        }
    }
    Ok(())
}
