//! Reserved way tags.
//!
//! Provides helpers to:
//! - copy `name`, `highway` and `oneway` into dedicated way fields; and
//! - optionally strip those keys from the remaining tag map.
use ringstitch_core::Tags;

const NAME: &str = "name";
const KIND: &str = "highway";
const ONEWAY: &str = "oneway";

/// Way fields derived from reserved tags.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ReservedTags {
    pub(crate) name: Option<String>,
    pub(crate) kind: Option<String>,
    pub(crate) oneway: bool,
}

/// Derive the reserved way fields from `tags`.
///
/// When `extract` is set the reserved keys are removed from `tags`. Keys
/// such as `oneway:bicycle` are never reserved.
pub(crate) fn take_reserved(tags: &mut Tags, extract: bool) -> ReservedTags {
    let mut read = |key: &str| {
        if extract {
            tags.remove(key)
        } else {
            tags.get(key).cloned()
        }
    };
    let name = read(NAME);
    let kind = read(KIND);
    let oneway = read(ONEWAY).is_some_and(|value| value == "yes");
    ReservedTags { name, kind, oneway }
}
