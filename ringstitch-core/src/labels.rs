//! Collision-free labels for output rows.
//!
//! Table builders key rows by entity or geometry ID. When two rows would
//! share a label the later one gets a numeric suffix: `42`, `42.0`, `42.1`.

use std::collections::HashSet;

/// Return `candidate`, or the first `candidate.N` not present in `taken`.
///
/// # Examples
/// ```
/// use std::collections::HashSet;
/// use ringstitch_core::unique_label;
///
/// let taken = HashSet::from(["7".to_owned(), "7.0".to_owned()]);
/// assert_eq!(unique_label("8", &taken), "8");
/// assert_eq!(unique_label("7", &taken), "7.1");
/// ```
pub fn unique_label<S>(candidate: &str, taken: &HashSet<String, S>) -> String
where
    S: std::hash::BuildHasher,
{
    if !taken.contains(candidate) {
        return candidate.to_owned();
    }
    (0_u64..)
        .map(|suffix| format!("{candidate}.{suffix}"))
        .find(|label| !taken.contains(label))
        .unwrap_or_else(|| candidate.to_owned())
}

/// Remembers every label it hands out.
#[derive(Debug, Clone, Default)]
pub struct LabelRegistry {
    taken: HashSet<String>,
}

impl LabelRegistry {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique label derived from `candidate`.
    pub fn claim(&mut self, candidate: &str) -> String {
        let label = unique_label(candidate, &self.taken);
        self.taken.insert(label.clone());
        label
    }

    /// Whether `label` has already been handed out.
    pub fn contains(&self, label: &str) -> bool {
        self.taken.contains(label)
    }
}
