//! Facade crate for the ringstitch OSM topology engine.
//!
//! This crate re-exports the core model and resolver together with the OSM XML
//! ingest, so callers can go from a document to stitched geometry with one
//! dependency.
//!
//! # Examples
//! ```
//! use ringstitch::{IngestConfig, RelationKind, Resolver, parse_osm_xml};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = r#"<osm>
//!   <node id="1" lat="0" lon="0"/><node id="2" lat="0" lon="1"/>
//!   <node id="3" lat="1" lon="1"/><node id="4" lat="1" lon="0"/>
//!   <way id="10"><nd ref="1"/><nd ref="2"/><nd ref="3"/></way>
//!   <way id="11"><nd ref="3"/><nd ref="4"/><nd ref="1"/></way>
//!   <relation id="7">
//!     <member type="way" ref="10" role="outer"/>
//!     <member type="way" ref="11" role="outer"/>
//!     <tag k="type" v="multipolygon"/>
//!   </relation>
//! </osm>"#;
//! let store = parse_osm_xml(xml, &IngestConfig::default())?;
//! let resolved = Resolver::new(&store)
//!     .resolve_all(|relation| RelationKind::from_tags(&relation.tags))?;
//! assert_eq!(resolved[0].rings.len(), 1);
//! assert_eq!(resolved[0].rings[0].way_label(), "10-11");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub use ringstitch_core::{
    AbandonedRing, Chain, ElementCounts, EntityClass, EntityStore, IngestConfig, LabelRegistry,
    Member, Node, OsmId, ParityPolicy, ProgressHook, Relation, RelationKind, ResolvedRelation,
    Resolver, Ring, Role, RoleChains, TagOrder, Tags, TopologyError, TraceBuffer, Way,
    WayGeometry, trace_way, unique_label, way_geometry,
};

pub use ringstitch_data::{
    NumberError, OsmIngestReport, OsmIngestSummary, OsmXmlError, count_osm_xml, ingest_osm_xml,
    parse_osm_xml,
};
