//! Keyed collections of nodes, ways and relations.
//!
//! The store is filled once by the ingest pass and read-only afterwards;
//! the tracer and resolver only ever borrow it immutably.

use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entity::{EntityClass, Node, OsmId, Relation, Tags, Way};

/// Exact element and child counts gathered by a read-only pre-scan.
///
/// Used to reserve storage up front so the build pass does not reallocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElementCounts {
    /// `<node>` elements.
    pub nodes: usize,
    /// `<way>` elements.
    pub ways: usize,
    /// `<relation>` elements.
    pub relations: usize,
    /// `<tag>` children of nodes.
    pub node_tags: usize,
    /// `<tag>` children of ways.
    pub way_tags: usize,
    /// `<nd>` children of ways.
    pub way_nodes: usize,
    /// `<tag>` children of relations.
    pub relation_tags: usize,
    /// `<member>` children of relations.
    pub relation_members: usize,
}

/// Nodes and ways keyed by ID plus relations in document order.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use ringstitch_core::{EntityStore, Node};
///
/// let mut store = EntityStore::default();
/// assert!(store.insert_node(Node::new(9, Coord { x: 1.0, y: 1.0 })));
/// assert!(!store.insert_node(Node::new(9, Coord { x: 2.0, y: 2.0 })));
/// assert_eq!(store.node(9).map(|node| node.lon()), Some(1.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityStore {
    nodes: HashMap<OsmId, Node>,
    ways: HashMap<OsmId, Way>,
    relations: Vec<Relation>,
}

impl EntityStore {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a store with room for the pre-scanned element counts.
    pub fn with_capacity(counts: &ElementCounts) -> Self {
        Self {
            nodes: HashMap::with_capacity(counts.nodes),
            ways: HashMap::with_capacity(counts.ways),
            relations: Vec::with_capacity(counts.relations),
        }
    }

    /// Insert a node unless its ID is already present.
    ///
    /// Returns `false` when the node was dropped as a duplicate; the first
    /// occurrence always wins.
    pub fn insert_node(&mut self, node: Node) -> bool {
        match self.nodes.entry(node.id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(node);
                true
            }
        }
    }

    /// Insert a way, returning the way previously stored under the same ID.
    ///
    /// Ways are not deduplicated here; callers use [`Self::contains_way`] to
    /// detect collisions before inserting when they need to.
    pub fn insert_way(&mut self, way: Way) -> Option<Way> {
        self.ways.insert(way.id, way)
    }

    /// Append a relation, keeping document order.
    pub fn push_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    /// Look up a node by ID.
    pub fn node(&self, id: OsmId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Look up a way by ID.
    pub fn way(&self, id: OsmId) -> Option<&Way> {
        self.ways.get(&id)
    }

    /// Whether a node with this ID is stored.
    pub fn contains_node(&self, id: OsmId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Whether a way with this ID is stored.
    pub fn contains_way(&self, id: OsmId) -> bool {
        self.ways.contains_key(&id)
    }

    /// Iterate over stored nodes in arbitrary order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate over stored ways in arbitrary order.
    pub fn ways(&self) -> impl Iterator<Item = &Way> {
        self.ways.values()
    }

    /// Stored way IDs in ascending order.
    pub fn way_ids(&self) -> Vec<OsmId> {
        let mut ids: Vec<OsmId> = self.ways.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Relations in document order.
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Number of stored nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored ways.
    pub fn way_count(&self) -> usize {
        self.ways.len()
    }

    /// Number of stored relations.
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Closed, non-empty ways sorted by ID.
    pub fn polygonal_ways(&self) -> Vec<&Way> {
        self.sorted_ways(Way::is_polygonal)
    }

    /// Open, non-empty ways sorted by ID.
    pub fn linear_ways(&self) -> Vec<&Way> {
        self.sorted_ways(|way| !way.is_empty() && !way.is_polygonal())
    }

    fn sorted_ways(&self, keep: impl Fn(&Way) -> bool) -> Vec<&Way> {
        let mut ways: Vec<&Way> = self.ways.values().filter(|way| keep(way)).collect();
        ways.sort_unstable_by_key(|way| way.id);
        ways
    }

    /// Sorted, distinct tag keys used by one entity class.
    ///
    /// Gives external table builders a stable column layout.
    ///
    /// # Examples
    /// ```
    /// use ringstitch_core::{EntityClass, EntityStore, Way};
    ///
    /// let mut store = EntityStore::default();
    /// let mut way = Way::new(1, vec![1, 2]);
    /// way.tags.insert("surface".into(), "gravel".into());
    /// way.tags.insert("access".into(), "no".into());
    /// store.insert_way(way);
    ///
    /// assert_eq!(store.unique_tag_keys(EntityClass::Way), vec!["access", "surface"]);
    /// assert!(store.unique_tag_keys(EntityClass::Node).is_empty());
    /// ```
    pub fn unique_tag_keys(&self, class: EntityClass) -> Vec<String> {
        let keys: BTreeSet<&str> = match class {
            EntityClass::Node => collect_keys(self.nodes.values().map(|node| &node.tags)),
            EntityClass::Way => collect_keys(self.ways.values().map(|way| &way.tags)),
            EntityClass::Relation => {
                collect_keys(self.relations.iter().map(|relation| &relation.tags))
            }
        };
        keys.into_iter().map(str::to_owned).collect()
    }
}

fn collect_keys<'a>(tags: impl Iterator<Item = &'a Tags>) -> BTreeSet<&'a str> {
    tags.flat_map(|tags| tags.keys().map(String::as_str))
        .collect()
}
