//! Greedy multipolygon ring assembly.
//!
//! Each ring starts from a seed member (the first `outer` member still
//! pending, else the first pending member) and grows by repeatedly taking
//! the first pending member with the seed's role that can extend the open
//! end. There is no backtracking: a ring that cannot be extended is
//! abandoned and the members it consumed are not offered again. A ring that
//! closes on fewer than `MIN_RING_COORDS` coordinates is abandoned too.

use log::debug;

use crate::entity::{OsmId, Role, Way};
use crate::error::TopologyError;
use crate::store::EntityStore;
use crate::trace::{TraceBuffer, trace_way};

use super::{AbandonedRing, Ring};

/// Fewest coordinates a closed ring needs to bound an area.
pub(super) const MIN_RING_COORDS: usize = 4;

/// Rings that closed plus the attempts that did not.
#[derive(Debug, Default)]
pub(super) struct RingSet {
    pub(super) rings: Vec<Ring>,
    pub(super) abandoned: Vec<AbandonedRing>,
}

/// Per-ring progress: `Tracing` until the open end meets the seed's first
/// node or no pending member extends it.
enum RingState {
    Tracing { first: OsmId, open_end: OsmId },
    Closed,
    Abandoned,
}

pub(super) fn assemble_rings(
    store: &EntityStore,
    mut pending: Vec<(&Way, &Role)>,
) -> Result<RingSet, TopologyError> {
    let mut set = RingSet::default();

    while !pending.is_empty() {
        let seed_index = pending
            .iter()
            .position(|(_, role)| role.is_outer())
            .unwrap_or(0);
        let (seed, role) = pending.remove(seed_index);

        let mut buffer = TraceBuffer::with_capacity(seed.nodes.len());
        let mut way_ids = vec![seed.id];
        let mut state = match (seed.front(), trace_way(store, seed, None, false, &mut buffer)?) {
            (Some(first), Some(open_end)) if first == open_end => RingState::Closed,
            (Some(first), Some(open_end)) => RingState::Tracing { first, open_end },
            _ => RingState::Abandoned,
        };

        while let RingState::Tracing { first, open_end } = state {
            state = match extend(store, &mut pending, role, open_end, &mut buffer)? {
                Some((way_id, end)) => {
                    way_ids.push(way_id);
                    if end == first {
                        RingState::Closed
                    } else {
                        RingState::Tracing {
                            first,
                            open_end: end,
                        }
                    }
                }
                None => RingState::Abandoned,
            };
        }

        if matches!(state, RingState::Closed) && buffer.len() >= MIN_RING_COORDS {
            let (coords, node_ids) = buffer.into_parts();
            set.rings.push(Ring {
                role: role.clone(),
                coords,
                node_ids,
                way_ids,
            });
        } else {
            debug!(
                "Abandoned {} ring through ways {:?} after {} coordinates",
                role,
                way_ids,
                buffer.len()
            );
            set.abandoned.push(AbandonedRing {
                role: role.clone(),
                way_ids,
            });
        }
    }

    Ok(set)
}

/// Append the first pending member with `role` that joins at `open_end`,
/// removing it from `pending`. Returns its way ID and the new open end.
fn extend(
    store: &EntityStore,
    pending: &mut Vec<(&Way, &Role)>,
    role: &Role,
    open_end: OsmId,
    buffer: &mut TraceBuffer,
) -> Result<Option<(OsmId, OsmId)>, TopologyError> {
    let mut found = None;
    for (index, (way, member_role)) in pending.iter().enumerate() {
        if *member_role != role {
            continue;
        }
        if let Some(end) = trace_way(store, way, Some(open_end), true, buffer)? {
            found = Some((index, way.id, end));
            break;
        }
    }
    Ok(found.map(|(index, way_id, end)| {
        pending.remove(index);
        (way_id, end)
    }))
}
