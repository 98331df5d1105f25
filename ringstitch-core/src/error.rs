//! Fatal errors raised while tracing geometry.

use thiserror::Error;

use crate::entity::OsmId;

/// Integrity failures that make traced geometry unusable.
///
/// Ring closure failures are not errors; they are reported as data on
/// [`ResolvedRelation`](crate::ResolvedRelation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// A way references a node that is not in the store.
    #[error("way {way_id} references node {node_id}, which is not in the store")]
    DanglingNode {
        /// Way being traced.
        way_id: OsmId,
        /// Missing node reference.
        node_id: OsmId,
    },
}
