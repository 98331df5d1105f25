//! Multilinestring chains grouped by role.
//!
//! Ways sharing a role are not required to connect: every way becomes its
//! own chain, traced front to back.

use crate::entity::{OsmId, Role, Way};
use crate::error::TopologyError;
use crate::store::EntityStore;
use crate::trace::{TraceBuffer, trace_way};

use super::{Chain, RoleChains};

pub(super) fn assemble_chains(
    store: &EntityStore,
    relation_id: OsmId,
    members: Vec<(&Way, &Role)>,
) -> Result<Vec<RoleChains>, TopologyError> {
    let mut groups: Vec<RoleChains> = Vec::new();

    for (way, role) in members {
        let mut buffer = TraceBuffer::with_capacity(way.nodes.len());
        if trace_way(store, way, None, false, &mut buffer)?.is_none() {
            continue;
        }
        let (coords, node_ids) = buffer.into_parts();
        let chain = Chain {
            way_id: way.id,
            coords,
            node_ids,
        };

        match groups.iter_mut().find(|group| group.role == *role) {
            Some(group) => group.chains.push(chain),
            None => groups.push(RoleChains {
                id: format!("{relation_id}-{}", role.label()),
                role: role.clone(),
                chains: vec![chain],
            }),
        }
    }

    Ok(groups)
}
