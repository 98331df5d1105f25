//! Relation topology resolution.
//!
//! Turns a relation's way members into closed rings (multipolygons) or
//! per-role chains (multilinestrings). Every output coordinate carries the
//! node ID it came from and every ring lists the ways it was stitched from.
//!
//! Resolution only reads the [`EntityStore`]. Each relation writes to its
//! own output, so relations can be resolved in parallel.

use geo::{Coord, LineString, MultiLineString, Polygon};
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{ProgressCounter, ProgressHook};
use crate::entity::{OsmId, Relation, RelationKind, Role, Way};
use crate::error::TopologyError;
use crate::labels::LabelRegistry;
use crate::store::EntityStore;

mod chains;
mod rings;


/// Separator used when joining way IDs into a ring label.
pub const WAY_ID_SEPARATOR: &str = "-";

/// A closed ring stitched from one or more ways sharing a role.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ring {
    /// Role shared by every contributing way.
    pub role: Role,
    /// Ring coordinates; the first and last coincide.
    pub coords: Vec<Coord<f64>>,
    /// Node ID for each coordinate.
    pub node_ids: Vec<OsmId>,
    /// Contributing ways in stitching order.
    pub way_ids: Vec<OsmId>,
}

impl Ring {
    /// Contributing way IDs joined by [`WAY_ID_SEPARATOR`].
    ///
    /// # Examples
    /// ```
    /// use ringstitch_core::{Ring, Role};
    ///
    /// let ring = Ring {
    ///     role: Role::Outer,
    ///     coords: Vec::new(),
    ///     node_ids: Vec::new(),
    ///     way_ids: vec![11, 12],
    /// };
    /// assert_eq!(ring.way_label(), "11-12");
    /// ```
    pub fn way_label(&self) -> String {
        self.way_ids
            .iter()
            .map(OsmId::to_string)
            .collect::<Vec<_>>()
            .join(WAY_ID_SEPARATOR)
    }

    /// Whether the ring ends on the node it started from.
    pub fn is_closed(&self) -> bool {
        !self.node_ids.is_empty() && self.node_ids.first() == self.node_ids.last()
    }

    /// Ring as a line string.
    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(self.coords.clone())
    }

    /// Ring as a polygon exterior without holes.
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(self.to_line_string(), Vec::new())
    }
}

/// A ring attempt that could not be closed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AbandonedRing {
    /// Role the attempt was matching.
    pub role: Role,
    /// Ways consumed by the attempt before it was given up.
    pub way_ids: Vec<OsmId>,
}

/// One way traced as an open line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Chain {
    /// Source way.
    pub way_id: OsmId,
    /// Line coordinates.
    pub coords: Vec<Coord<f64>>,
    /// Node ID for each coordinate.
    pub node_ids: Vec<OsmId>,
}

impl Chain {
    /// Chain as a line string.
    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(self.coords.clone())
    }
}

/// Chains of one multilinestring role group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoleChains {
    /// Role shared by the group.
    pub role: Role,
    /// Composite `"{relation}-{role}"` identifier; the empty role is
    /// written as `(no role)`.
    pub id: String,
    /// One chain per member way, in member order.
    pub chains: Vec<Chain>,
}

impl RoleChains {
    /// All chains of the group as one multi line string.
    pub fn to_multi_line_string(&self) -> MultiLineString<f64> {
        MultiLineString::new(self.chains.iter().map(Chain::to_line_string).collect())
    }
}

/// Geometry resolved for one relation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedRelation {
    /// Source relation.
    pub relation_id: OsmId,
    /// Kind the relation was resolved as.
    pub kind: RelationKind,
    /// Closed rings (multipolygon only).
    pub rings: Vec<Ring>,
    /// Ring attempts that did not close (multipolygon only).
    pub abandoned_rings: Vec<AbandonedRing>,
    /// Chains grouped by role in order of first appearance
    /// (multilinestring only).
    pub chains: Vec<RoleChains>,
    /// Member way IDs absent from the store.
    pub missing_ways: Vec<OsmId>,
    /// Member way IDs that have no nodes.
    pub empty_ways: Vec<OsmId>,
}

impl ResolvedRelation {
    fn empty(relation_id: OsmId, kind: RelationKind) -> Self {
        Self {
            relation_id,
            kind,
            rings: Vec::new(),
            abandoned_rings: Vec::new(),
            chains: Vec::new(),
            missing_ways: Vec::new(),
            empty_ways: Vec::new(),
        }
    }

    /// Number of ring attempts that failed to close.
    pub fn failed_ring_count(&self) -> usize {
        self.abandoned_rings.len()
    }

    /// Whether the relation produced no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty() && self.chains.iter().all(|group| group.chains.is_empty())
    }

    /// A unique label per chain, derived from its group's composite ID.
    ///
    /// Repeated IDs within a group get `.0`, `.1`, … suffixes.
    pub fn chain_labels(&self) -> Vec<String> {
        let mut registry = LabelRegistry::new();
        self.chains
            .iter()
            .flat_map(|group| group.chains.iter().map(move |_| group.id.as_str()))
            .map(|candidate| registry.claim(candidate))
            .collect()
    }
}

/// Resolves relations against a borrowed store.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use ringstitch_core::{EntityStore, Member, Node, Relation, RelationKind, Resolver, Way};
///
/// # fn main() -> Result<(), ringstitch_core::TopologyError> {
/// let mut store = EntityStore::new();
/// for (id, x, y) in [(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 1.0, 1.0), (4, 0.0, 1.0)] {
///     store.insert_node(Node::new(id, Coord { x, y }));
/// }
/// store.insert_way(Way::new(10, vec![1, 2, 3]));
/// store.insert_way(Way::new(11, vec![3, 4, 1]));
/// let relation = Relation::new(
///     100,
///     vec![Member::new(10, "outer"), Member::new(11, "outer")],
/// );
///
/// let resolved = Resolver::new(&store).resolve(&relation, RelationKind::Multipolygon)?;
/// assert_eq!(resolved.rings.len(), 1);
/// assert_eq!(resolved.rings[0].node_ids, vec![1, 2, 3, 4, 1]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Resolver<'a> {
    store: &'a EntityStore,
    progress: Option<ProgressHook>,
}

impl<'a> Resolver<'a> {
    /// Construct a resolver reading from `store`.
    pub const fn new(store: &'a EntityStore) -> Self {
        Self {
            store,
            progress: None,
        }
    }

    /// Report the number of resolved relations through `hook`.
    #[must_use]
    pub fn with_progress(mut self, hook: ProgressHook) -> Self {
        self.progress = Some(hook);
        self
    }

    /// Resolve one relation as `kind`.
    ///
    /// Members whose way is missing or empty are reported on the result and
    /// never traced.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DanglingNode`] when a traced way references a
    /// node missing from the store.
    pub fn resolve(
        &self,
        relation: &Relation,
        kind: RelationKind,
    ) -> Result<ResolvedRelation, TopologyError> {
        let mut resolved = ResolvedRelation::empty(relation.id, kind);
        let mut members: Vec<(&Way, &Role)> = Vec::with_capacity(relation.members.len());
        for member in &relation.members {
            match self.store.way(member.way_id) {
                None => resolved.missing_ways.push(member.way_id),
                Some(way) if way.is_empty() => resolved.empty_ways.push(member.way_id),
                Some(way) => members.push((way, &member.role)),
            }
        }
        if !resolved.missing_ways.is_empty() {
            debug!(
                "Relation {} skipped {} member ways missing from the store: {:?}",
                relation.id,
                resolved.missing_ways.len(),
                resolved.missing_ways
            );
        }

        match kind {
            RelationKind::Multipolygon => {
                let set = rings::assemble_rings(self.store, members)?;
                resolved.rings = set.rings;
                resolved.abandoned_rings = set.abandoned;
            }
            RelationKind::Multilinestring => {
                resolved.chains = chains::assemble_chains(self.store, relation.id, members)?;
            }
        }
        Ok(resolved)
    }

    /// Resolve every stored relation in document order, classifying each
    /// with `classify`.
    ///
    /// # Errors
    ///
    /// Stops at the first [`TopologyError`].
    pub fn resolve_all<F>(&self, classify: F) -> Result<Vec<ResolvedRelation>, TopologyError>
    where
        F: Fn(&Relation) -> RelationKind,
    {
        let counter = ProgressCounter::new(self.progress.as_ref());
        self.store
            .relations()
            .iter()
            .map(|relation| {
                let resolved = self.resolve(relation, classify(relation));
                counter.advance();
                resolved
            })
            .collect()
    }

    /// Resolve every stored relation on the rayon thread pool.
    ///
    /// Output keeps document order. Progress callbacks may arrive from any
    /// worker thread.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if any relation fails.
    #[cfg(feature = "parallel")]
    pub fn par_resolve_all<F>(&self, classify: F) -> Result<Vec<ResolvedRelation>, TopologyError>
    where
        F: Fn(&Relation) -> RelationKind + Sync,
    {
        use rayon::prelude::*;

        let counter = ProgressCounter::new(self.progress.as_ref());
        self.store
            .relations()
            .par_iter()
            .map(|relation| {
                let resolved = self.resolve(relation, classify(relation));
                counter.advance();
                resolved
            })
            .collect()
    }
}
