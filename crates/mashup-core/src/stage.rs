//! Per-item and per-stage outcomes for list-narrowing stages

use crate::error::{MashupError, Stage};
use std::path::PathBuf;

/// An item a stage had to drop, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl ItemFailure {
    pub fn new(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result of running one stage over a list: survivors in input order plus
/// whatever was skipped.
#[derive(Debug)]
pub struct Narrowed<T> {
    pub kept: Vec<T>,
    pub skipped: Vec<ItemFailure>,
}

impl<T> Narrowed<T> {
    /// Fail the run when nothing survived.
    pub fn require_any(self, stage: Stage) -> Result<Self, MashupError> {
        if self.kept.is_empty() {
            Err(MashupError::NoItems { stage })
        } else {
            Ok(self)
        }
    }
}

impl<T> Default for Narrowed<T> {
    fn default() -> Self {
        Self {
            kept: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> FromIterator<Result<T, ItemFailure>> for Narrowed<T> {
    fn from_iter<I: IntoIterator<Item = Result<T, ItemFailure>>>(iter: I) -> Self {
        let mut narrowed = Narrowed::default();
        for outcome in iter {
            match outcome {
                Ok(item) => narrowed.kept.push(item),
                Err(failure) => narrowed.skipped.push(failure),
            }
        }
        narrowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_preserves_order() {
        let narrowed: Narrowed<u32> = vec![
            Ok(1),
            Err(ItemFailure::new("b.webm", "bad header")),
            Ok(3),
        ]
        .into_iter()
        .collect();

        assert_eq!(narrowed.kept, vec![1, 3]);
        assert_eq!(narrowed.skipped.len(), 1);
        assert_eq!(narrowed.skipped[0].reason, "bad header");
    }

    #[test]
    fn test_require_any() {
        let empty: Narrowed<u32> = vec![Err(ItemFailure::new("a", "x"))].into_iter().collect();
        let err = empty.require_any(Stage::Transcode).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Transcode));

        let some: Narrowed<u32> = vec![Ok(7)].into_iter().collect();
        assert_eq!(some.require_any(Stage::Trim).unwrap().kept, vec![7]);
    }
}
