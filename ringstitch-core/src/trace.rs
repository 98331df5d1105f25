//! Emits a way's coordinates in the orientation required by a chain.

use geo::{Coord, LineString, Polygon};

use crate::entity::{OsmId, Way};
use crate::error::TopologyError;
use crate::store::EntityStore;

/// Coordinates with the node ID that produced each one.
///
/// Both vectors always have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TraceBuffer {
    coords: Vec<Coord<f64>>,
    node_ids: Vec<OsmId>,
}

impl TraceBuffer {
    /// Construct an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an empty buffer with room for `capacity` coordinates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            coords: Vec::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
        }
    }

    /// Emitted coordinates.
    pub fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }

    /// Node ID for each emitted coordinate.
    pub fn node_ids(&self) -> &[OsmId] {
        &self.node_ids
    }

    /// Number of emitted coordinates.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Split into coordinates and node IDs.
    pub fn into_parts(self) -> (Vec<Coord<f64>>, Vec<OsmId>) {
        (self.coords, self.node_ids)
    }

    fn truncate(&mut self, len: usize) {
        self.coords.truncate(len);
        self.node_ids.truncate(len);
    }
}

/// Append `way` to `buffer` so that emission starts at `join`.
///
/// With `join == None` the way is emitted front to back. Otherwise the way
/// is emitted forward when it starts at `join` and reversed when it ends
/// there. When `append` is set the first emitted coordinate is skipped since
/// it repeats the previous way's last one.
///
/// Returns the far endpoint, or `Ok(None)` when neither endpoint matches
/// `join` (or the way is empty); nothing is written in that case.
///
/// # Errors
///
/// Returns [`TopologyError::DanglingNode`] when a node reference is missing
/// from `store`. The buffer is restored to its previous length.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use ringstitch_core::{EntityStore, Node, TraceBuffer, Way, trace_way};
///
/// # fn main() -> Result<(), ringstitch_core::TopologyError> {
/// let mut store = EntityStore::new();
/// for id in 1..=3 {
///     store.insert_node(Node::new(id, Coord { x: id as f64, y: 0.0 }));
/// }
/// let way = Way::new(7, vec![1, 2, 3]);
///
/// let mut buffer = TraceBuffer::new();
/// let end = trace_way(&store, &way, Some(3), false, &mut buffer)?;
/// assert_eq!(end, Some(1));
/// assert_eq!(buffer.node_ids(), &[3, 2, 1]);
/// # Ok(())
/// # }
/// ```
pub fn trace_way(
    store: &EntityStore,
    way: &Way,
    join: Option<OsmId>,
    append: bool,
    buffer: &mut TraceBuffer,
) -> Result<Option<OsmId>, TopologyError> {
    let (Some(front), Some(back)) = (way.front(), way.back()) else {
        return Ok(None);
    };
    let forward = match join {
        None => true,
        Some(node) if node == front => true,
        Some(node) if node == back => false,
        Some(_) => return Ok(None),
    };

    let skip = usize::from(append);
    let start_len = buffer.len();
    let emitted = if forward {
        emit(store, way, way.nodes.iter().skip(skip), buffer)
    } else {
        emit(store, way, way.nodes.iter().rev().skip(skip), buffer)
    };
    if let Err(err) = emitted {
        buffer.truncate(start_len);
        return Err(err);
    }

    Ok(Some(if forward { back } else { front }))
}

fn emit<'a>(
    store: &EntityStore,
    way: &Way,
    node_ids: impl Iterator<Item = &'a OsmId>,
    buffer: &mut TraceBuffer,
) -> Result<(), TopologyError> {
    for &node_id in node_ids {
        let node = store.node(node_id).ok_or(TopologyError::DanglingNode {
            way_id: way.id,
            node_id,
        })?;
        buffer.coords.push(node.location);
        buffer.node_ids.push(node_id);
    }
    Ok(())
}

/// Geometry of a single way, independent of any relation.
#[derive(Debug, Clone, PartialEq)]
pub enum WayGeometry {
    /// Closed way traced as a polygon exterior.
    Polygon(Polygon<f64>),
    /// Open way traced as a line.
    LineString(LineString<f64>),
}

/// Trace a standalone way into a polygon or a line depending on closure.
///
/// Empty ways yield an empty line.
///
/// # Errors
///
/// Returns [`TopologyError::DanglingNode`] when a node reference is missing.
pub fn way_geometry(store: &EntityStore, way: &Way) -> Result<WayGeometry, TopologyError> {
    let mut buffer = TraceBuffer::with_capacity(way.nodes.len());
    trace_way(store, way, None, false, &mut buffer)?;
    let (coords, _) = buffer.into_parts();
    let line = LineString::new(coords);
    Ok(if way.is_polygonal() {
        WayGeometry::Polygon(Polygon::new(line, Vec::new()))
    } else {
        WayGeometry::LineString(line)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Node;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> EntityStore {
        let mut store = EntityStore::new();
        for (id, x) in [(1, 0.0), (2, 1.0), (3, 2.0), (4, 3.0)] {
            store.insert_node(Node::new(id, Coord { x, y: 0.0 }));
        }
        store
    }

    #[rstest]
    #[case(None, false, vec![1, 2, 3], Some(3))]
    #[case(Some(1), false, vec![1, 2, 3], Some(3))]
    #[case(Some(3), false, vec![3, 2, 1], Some(1))]
    #[case(Some(1), true, vec![2, 3], Some(3))]
    #[case(Some(3), true, vec![2, 1], Some(1))]
    fn orients_to_join(
        store: EntityStore,
        #[case] join: Option<OsmId>,
        #[case] append: bool,
        #[case] expected_nodes: Vec<OsmId>,
        #[case] expected_end: Option<OsmId>,
    ) {
        let way = Way::new(10, vec![1, 2, 3]);
        let mut buffer = TraceBuffer::new();
        let end = trace_way(&store, &way, join, append, &mut buffer);
        assert_eq!(end, Ok(expected_end));
        assert_eq!(buffer.node_ids(), expected_nodes.as_slice());
        assert_eq!(buffer.coords().len(), buffer.node_ids().len());
    }

    #[rstest]
    fn unmatched_join_writes_nothing(store: EntityStore) {
        let way = Way::new(10, vec![1, 2, 3]);
        let mut buffer = TraceBuffer::new();
        assert_eq!(trace_way(&store, &way, Some(4), true, &mut buffer), Ok(None));
        assert!(buffer.is_empty());
    }

    #[rstest]
    fn empty_way_never_matches(store: EntityStore) {
        let mut buffer = TraceBuffer::new();
        let result = trace_way(&store, &Way::new(11, Vec::new()), None, false, &mut buffer);
        assert_eq!(result, Ok(None));
    }

    #[rstest]
    fn dangling_node_is_fatal_and_rolls_back(store: EntityStore) {
        let mut buffer = TraceBuffer::new();
        let first = Way::new(10, vec![1, 2]);
        assert_eq!(trace_way(&store, &first, None, false, &mut buffer), Ok(Some(2)));

        let broken = Way::new(12, vec![2, 3, 99]);
        let result = trace_way(&store, &broken, Some(2), true, &mut buffer);
        assert_eq!(
            result,
            Err(TopologyError::DanglingNode {
                way_id: 12,
                node_id: 99
            })
        );
        assert_eq!(buffer.node_ids(), &[1, 2]);
    }

    #[rstest]
    fn classifies_standalone_geometry(store: EntityStore) {
        let ring = Way::new(20, vec![1, 2, 3, 1]);
        let line = Way::new(21, vec![1, 4]);
        assert!(matches!(
            way_geometry(&store, &ring),
            Ok(WayGeometry::Polygon(polygon)) if polygon.exterior().0.len() == 4
        ));
        assert!(matches!(
            way_geometry(&store, &line),
            Ok(WayGeometry::LineString(line)) if line.0.len() == 2
        ));
    }
}
