use log::info;
use ringstitch_core::{ElementCounts, EntityStore, IngestConfig};

use crate::error::OsmXmlError;
use crate::xml::XmlDocument;

mod accumulator;
mod prescan;
mod raw;
mod tags;

use accumulator::EntityAccumulator;
use prescan::ElementCounter;

/// Summary of raw OSM elements discovered during ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OsmIngestSummary {
    /// Number of `<node>` elements discovered.
    pub nodes: u64,
    /// Number of `<way>` elements discovered.
    pub ways: u64,
    /// Number of `<relation>` elements discovered.
    pub relations: u64,
    /// Nodes dropped because an earlier node had the same ID.
    pub duplicate_nodes: u64,
    /// Ways that replaced an earlier way with the same ID.
    pub duplicate_ways: u64,
    /// Entities dropped under [`ParityPolicy::SkipEntity`](ringstitch_core::ParityPolicy).
    pub skipped_entities: u64,
    /// Relation members dropped for not referencing a way.
    pub skipped_members: u64,
    /// Tag values discarded because no key preceded them.
    pub dropped_tag_values: u64,
    /// Ways stored without any node references.
    pub empty_ways: u64,
    /// Entities whose ID was missing or zero.
    pub zero_ids: u64,
}

/// Detailed report of an OSM ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct OsmIngestReport {
    /// Nodes, ways and relations ready for resolution.
    pub store: EntityStore,
    /// Element counts and anomaly counters.
    pub summary: OsmIngestSummary,
}

/// Build an entity store from an OSM XML document.
///
/// # Examples
/// ```
/// use ringstitch_core::IngestConfig;
/// use ringstitch_data::parse_osm_xml;
///
/// # fn main() -> Result<(), ringstitch_data::OsmXmlError> {
/// let xml = r#"<osm>
///   <node id="1" lat="0" lon="0"/>
///   <node id="2" lat="0" lon="1"/>
///   <way id="10"><nd ref="1"/><nd ref="2"/><tag k="highway" v="path"/></way>
/// </osm>"#;
/// let store = parse_osm_xml(xml, &IngestConfig::default())?;
/// assert_eq!(store.node_count(), 2);
/// assert_eq!(store.way(10).and_then(|way| way.kind.as_deref()), Some("path"));
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`OsmXmlError`] when the document is malformed, a numeric
/// attribute does not parse, or a tag policy rejects an entity.
pub fn parse_osm_xml(xml: &str, config: &IngestConfig) -> Result<EntityStore, OsmXmlError> {
    ingest_osm_xml(xml, config).map(|report| report.store)
}

/// Ingest an OSM XML document, producing both the store and a summary.
///
/// # Examples
/// ```
/// use ringstitch_core::IngestConfig;
/// use ringstitch_data::ingest_osm_xml;
///
/// # fn main() -> Result<(), ringstitch_data::OsmXmlError> {
/// let xml = r#"<osm><node id="1" lat="52.5" lon="13.4"/><node id="1" lat="0" lon="0"/></osm>"#;
/// let report = ingest_osm_xml(xml, &IngestConfig::default())?;
/// assert_eq!(report.summary.nodes, 2);
/// assert_eq!(report.summary.duplicate_nodes, 1);
/// assert_eq!(report.store.node_count(), 1);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// See [`parse_osm_xml`].
pub fn ingest_osm_xml(xml: &str, config: &IngestConfig) -> Result<OsmIngestReport, OsmXmlError> {
    let document = XmlDocument::parse(xml)?;
    let store = if config.presize {
        EntityStore::with_capacity(&count_document(&document)?)
    } else {
        EntityStore::new()
    };

    let mut accumulator = EntityAccumulator::new(config, store);
    document.walk(&mut accumulator)?;
    let report = accumulator.into_report();
    let summary = &report.summary;
    info!(
        "ingested {} nodes, {} ways and {} relations ({} duplicate nodes, {} skipped entities)",
        summary.nodes,
        summary.ways,
        summary.relations,
        summary.duplicate_nodes,
        summary.skipped_entities
    );
    Ok(report)
}

/// Count entities and their children without building anything.
///
/// # Examples
/// ```
/// use ringstitch_data::count_osm_xml;
///
/// # fn main() -> Result<(), ringstitch_data::OsmXmlError> {
/// let counts = count_osm_xml(r#"<osm><way id="1"><nd ref="1"/><nd ref="2"/></way></osm>"#)?;
/// assert_eq!((counts.ways, counts.way_nodes), (1, 2));
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`OsmXmlError`] when the document is not well-formed.
pub fn count_osm_xml(xml: &str) -> Result<ElementCounts, OsmXmlError> {
    count_document(&XmlDocument::parse(xml)?)
}

fn count_document(document: &XmlDocument) -> Result<ElementCounts, OsmXmlError> {
    let mut counter = ElementCounter::default();
    document.walk(&mut counter)?;
    Ok(counter.counts)
}
