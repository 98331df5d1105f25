//! OpenStreetMap primitives as held by the [`EntityStore`](crate::EntityStore).
//!
//! Entities are immutable once built. A way only carries node references;
//! coordinates are looked up through the store when the way is traced.

use std::collections::HashMap;
use std::fmt;

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// OSM identifier. Unique within one entity class.
pub type OsmId = i64;

/// Free-form OSM key/value tags.
pub type Tags = HashMap<String, String>;

/// The three entity classes stored separately by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityClass {
    /// `<node>` elements.
    Node,
    /// `<way>` elements.
    Way,
    /// `<relation>` elements.
    Relation,
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        };
        f.write_str(name)
    }
}

/// A point with tags.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use ringstitch_core::Node;
///
/// let node = Node::new(1, Coord { x: 13.4, y: 52.5 });
/// assert_eq!(node.lon(), 13.4);
/// assert_eq!(node.lat(), 52.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// OSM node identifier.
    pub id: OsmId,
    /// Position of the node.
    pub location: Coord<f64>,
    /// Node tags.
    pub tags: Tags,
}

impl Node {
    /// Construct an untagged node.
    pub fn new(id: OsmId, location: Coord<f64>) -> Self {
        Self::with_tags(id, location, Tags::new())
    }

    /// Construct a node with the provided tags.
    pub const fn with_tags(id: OsmId, location: Coord<f64>, tags: Tags) -> Self {
        Self { id, location, tags }
    }

    /// Longitude in degrees.
    pub const fn lon(&self) -> f64 {
        self.location.x
    }

    /// Latitude in degrees.
    pub const fn lat(&self) -> f64 {
        self.location.y
    }
}

/// An ordered list of node references.
///
/// `name`, `kind` and `oneway` mirror the `name`, `highway` and `oneway`
/// tags. Whether those keys also remain in `tags` depends on the ingest
/// configuration.
///
/// # Examples
/// ```
/// use ringstitch_core::Way;
///
/// let ring = Way::new(1, vec![1, 2, 3, 1]);
/// assert!(ring.is_polygonal());
///
/// let line = Way::new(2, vec![1, 2, 3, 4]);
/// assert!(!line.is_polygonal());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Way {
    /// OSM way identifier.
    pub id: OsmId,
    /// Display name taken from the `name` tag.
    pub name: Option<String>,
    /// Thematic type taken from the `highway` tag.
    pub kind: Option<String>,
    /// `true` only when the `oneway` tag is exactly `yes`.
    pub oneway: bool,
    /// Way tags.
    pub tags: Tags,
    /// Node references in document order.
    pub nodes: Vec<OsmId>,
}

impl Way {
    /// Construct an untagged way over `nodes`.
    pub fn new(id: OsmId, nodes: Vec<OsmId>) -> Self {
        Self {
            id,
            nodes,
            ..Self::default()
        }
    }

    /// First node reference.
    pub fn front(&self) -> Option<OsmId> {
        self.nodes.first().copied()
    }

    /// Last node reference.
    pub fn back(&self) -> Option<OsmId> {
        self.nodes.last().copied()
    }

    /// Whether the way has no node references at all.
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the way closes on itself. Empty ways are never polygonal.
    pub fn is_polygonal(&self) -> bool {
        !self.is_empty() && self.front() == self.back()
    }
}

/// Member role of a relation.
///
/// Only `outer` and `inner` carry topology meaning. Every other role is
/// kept verbatim and compared by equality; the empty string means "no role".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    /// `outer` ring member.
    Outer,
    /// `inner` ring member.
    Inner,
    /// Any other role, including the empty one.
    Other(String),
}

/// Output label for members without a role.
pub const NO_ROLE_LABEL: &str = "(no role)";

impl Role {
    /// The raw role string as it appeared in the document.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Outer => "outer",
            Self::Inner => "inner",
            Self::Other(role) => role,
        }
    }

    /// Lossy boolean view used where only outer versus not-outer matters.
    pub const fn is_outer(&self) -> bool {
        matches!(self, Self::Outer)
    }

    /// Whether the member carried no role.
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Self::Other(role) if role.is_empty())
    }

    /// Role name for output, `(no role)` when empty.
    pub fn label(&self) -> &str {
        if self.is_unspecified() {
            NO_ROLE_LABEL
        } else {
            self.as_str()
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "outer" => Self::Outer,
            "inner" => Self::Inner,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "outer" => Self::Outer,
            "inner" => Self::Inner,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A way reference inside a relation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Member {
    /// Referenced way.
    pub way_id: OsmId,
    /// Role of the way within the relation.
    pub role: Role,
}

impl Member {
    /// Construct a member from a way ID and any role-like value.
    pub fn new(way_id: OsmId, role: impl Into<Role>) -> Self {
        Self {
            way_id,
            role: role.into(),
        }
    }
}

/// A tagged, ordered group of way members.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Relation {
    /// OSM relation identifier.
    pub id: OsmId,
    /// Relation tags.
    pub tags: Tags,
    /// Way members in document order.
    pub members: Vec<Member>,
}

impl Relation {
    /// Construct an untagged relation.
    pub fn new(id: OsmId, members: Vec<Member>) -> Self {
        Self {
            id,
            tags: Tags::new(),
            members,
        }
    }
}

/// How a relation's members are stitched together.
///
/// The kind is an input to the resolver. [`RelationKind::from_tags`] is the
/// conventional classification for callers without their own rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RelationKind {
    /// Members close into polygon rings.
    Multipolygon,
    /// Members become independent chains grouped by role.
    Multilinestring,
}

impl RelationKind {
    /// Classify by the relation's `type` tag.
    ///
    /// # Examples
    /// ```
    /// use ringstitch_core::{Relation, RelationKind};
    ///
    /// let mut relation = Relation::new(1, Vec::new());
    /// relation.tags.insert("type".into(), "multipolygon".into());
    /// assert_eq!(RelationKind::from_tags(&relation.tags), RelationKind::Multipolygon);
    /// ```
    pub fn from_tags(tags: &Tags) -> Self {
        match tags.get("type").map(String::as_str) {
            Some("multipolygon" | "boundary") => Self::Multipolygon,
            _ => Self::Multilinestring,
        }
    }

    /// Whether this kind assembles polygon rings.
    pub const fn is_polygon(self) -> bool {
        matches!(self, Self::Multipolygon)
    }
}
