//! Service selection
//!
//! Computes the retained subset of a project's services from an allow-list
//! (--include) or a deny-list (--exclude), and reports the requested names
//! that do not exist in the document.

use std::collections::HashSet;

use crate::compose::Project;
use crate::error::{Result, SkiffError};

/// The include/exclude selection for one invocation
///
/// Duplicate names collapse into set membership; matching is case-sensitive.
#[derive(Debug, Default)]
pub struct SelectionRequest {
    include: HashSet<String>,
    exclude: HashSet<String>,
}

impl SelectionRequest {
    /// Build a request, rejecting the include+exclude combination before any
    /// file I/O happens
    pub fn new(
        include: impl IntoIterator<Item = String>,
        exclude: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        let include: HashSet<String> = include.into_iter().collect();
        let exclude: HashSet<String> = exclude.into_iter().collect();

        if !include.is_empty() && !exclude.is_empty() {
            return Err(SkiffError::ConflictingSelection);
        }

        Ok(Self { include, exclude })
    }

    /// True when neither list was given; selection is the identity
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Filter the project's services according to the request
///
/// Returns the filtered project and the requested names absent from the
/// document, sorted lexicographically. All non-service sections pass through
/// unchanged, and surviving services keep their document order.
pub fn select(project: Project, request: &SelectionRequest) -> (Project, Vec<String>) {
    if request.is_empty() {
        return (project, Vec::new());
    }

    let include_mode = !request.include.is_empty();
    let wanted = if include_mode {
        &request.include
    } else {
        &request.exclude
    };

    let mut seen: HashSet<&String> = HashSet::new();
    let Project { services, rest } = project;

    let services = services
        .into_iter()
        .filter(|(name, _)| {
            if let Some(requested) = wanted.get(name) {
                seen.insert(requested);
                include_mode
            } else {
                !include_mode
            }
        })
        .collect();

    let mut missing: Vec<String> = wanted
        .iter()
        .filter(|name| !seen.contains(name))
        .cloned()
        .collect();
    missing.sort();

    (Project { services, rest }, missing)
}
