//! Core model and topology resolution for OSM extracts.
//!
//! Responsibilities:
//! - Hold nodes, ways and relations in an [`EntityStore`].
//! - Trace ways into coordinate sequences with node provenance.
//! - Stitch relation members into closed rings or per-role chains.
//!
//! Boundaries:
//! - No parsing; `ringstitch-data` turns documents into a store.
//! - No output formats; callers convert the resolved geometry.
//!
//! Invariants:
//! - The store is read-only once built; resolution only borrows it.
//! - Ring assembly is greedy and never backtracks.

#![forbid(unsafe_code)]

pub mod config;
pub mod entity;
pub mod error;
pub mod labels;
pub mod resolve;
pub mod store;
pub mod trace;

pub use config::{IngestConfig, ParityPolicy, ProgressHook, TagOrder};
pub use entity::{
    EntityClass, Member, NO_ROLE_LABEL, Node, OsmId, Relation, RelationKind, Role, Tags, Way,
};
pub use error::TopologyError;
pub use labels::{LabelRegistry, unique_label};
pub use resolve::{
    AbandonedRing, Chain, ResolvedRelation, Resolver, Ring, RoleChains, WAY_ID_SEPARATOR,
};
pub use store::{ElementCounts, EntityStore};
pub use trace::{TraceBuffer, WayGeometry, trace_way, way_geometry};
