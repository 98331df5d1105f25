//! Internal accumulator for OpenStreetMap (OSM) XML ingestion.
//!
//! Receives entity elements from the walker, applies the tag policies and
//! fills the entity store while building the summary for the public ingest
//! entry points.
use geo::Coord;
use log::{debug, warn};
use ringstitch_core::{
    EntityClass, EntityStore, IngestConfig, Member, Node, OsmId, ParityPolicy, Relation, Way,
};

use super::raw::{RawNode, RawRelation, RawWay, TagPairs};
use super::tags::take_reserved;
use super::{OsmIngestReport, OsmIngestSummary};
use crate::error::OsmXmlError;
use crate::xml::{OsmVisitor, XmlElement};

#[derive(Debug)]
pub(super) struct EntityAccumulator<'a> {
    config: &'a IngestConfig,
    store: EntityStore,
    summary: OsmIngestSummary,
    processed: u64,
}

impl<'a> EntityAccumulator<'a> {
    pub(super) fn new(config: &'a IngestConfig, store: EntityStore) -> Self {
        Self {
            config,
            store,
            summary: OsmIngestSummary::default(),
            processed: 0,
        }
    }

    pub(super) fn into_report(self) -> OsmIngestReport {
        OsmIngestReport {
            store: self.store,
            summary: self.summary,
        }
    }

    /// Record one entity and decide whether it enters the store.
    fn admit(
        &mut self,
        class: EntityClass,
        id: OsmId,
        tags: &TagPairs,
    ) -> Result<bool, OsmXmlError> {
        self.processed += 1;
        if let Some(hook) = &self.config.progress {
            hook.tick(self.processed);
        }
        self.summary.dropped_tag_values += tags.dropped();
        if id == 0 {
            warn!("{class} has a missing or zero id");
            self.summary.zero_ids += 1;
        }
        if tags.is_balanced() {
            return Ok(true);
        }
        match self.config.parity {
            ParityPolicy::Fail => Err(OsmXmlError::TagParity {
                class,
                id,
                keys: tags.keys(),
                values: tags.values(),
            }),
            ParityPolicy::SkipEntity => {
                warn!(
                    "skipping {class} {id}: {} tag keys but {} tag values",
                    tags.keys(),
                    tags.values()
                );
                self.summary.skipped_entities += 1;
                Ok(false)
            }
        }
    }
}

impl OsmVisitor for EntityAccumulator<'_> {
    fn visit_node(&mut self, element: &XmlElement) -> Result<(), OsmXmlError> {
        let raw = RawNode::read(element, self.config.tag_order)?;
        self.summary.nodes += 1;
        if !self.admit(EntityClass::Node, raw.id, &raw.tags)? {
            return Ok(());
        }
        let location = Coord {
            x: raw.lon,
            y: raw.lat,
        };
        let node = Node::with_tags(raw.id, location, raw.tags.into_tags());
        if !self.store.insert_node(node) {
            debug!("node {} repeats an earlier id; keeping the first", raw.id);
            self.summary.duplicate_nodes += 1;
        }
        Ok(())
    }

    fn visit_way(&mut self, element: &XmlElement) -> Result<(), OsmXmlError> {
        let raw = RawWay::read(element, self.config.tag_order)?;
        self.summary.ways += 1;
        if !self.admit(EntityClass::Way, raw.id, &raw.tags)? {
            return Ok(());
        }
        let mut tags = raw.tags.into_tags();
        let reserved = take_reserved(&mut tags, self.config.extract_reserved_tags);
        if raw.nodes.is_empty() {
            debug!("way {} has no node references", raw.id);
            self.summary.empty_ways += 1;
        }
        let way = Way {
            id: raw.id,
            name: reserved.name,
            kind: reserved.kind,
            oneway: reserved.oneway,
            tags,
            nodes: raw.nodes,
        };
        if self.store.insert_way(way).is_some() {
            warn!("way {} appears more than once; keeping the last", raw.id);
            self.summary.duplicate_ways += 1;
        }
        Ok(())
    }

    fn visit_relation(&mut self, element: &XmlElement) -> Result<(), OsmXmlError> {
        let raw = RawRelation::read(element, self.config.tag_order)?;
        self.summary.relations += 1;
        self.summary.skipped_members += raw.skipped_members;
        if !self.admit(EntityClass::Relation, raw.id, &raw.tags)? {
            return Ok(());
        }
        let members = raw
            .members
            .into_iter()
            .map(|(way_id, role)| Member::new(way_id, role))
            .collect();
        self.store.push_relation(Relation {
            id: raw.id,
            tags: raw.tags.into_tags(),
            members,
        });
        Ok(())
    }
}
