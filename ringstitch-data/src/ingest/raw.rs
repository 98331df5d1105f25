//! Raw entity records read from XML elements.
//!
//! Records hold attribute values as found, before any policy is applied.
//! The builder validates them and turns them into store entities.

use std::str::FromStr;

use log::warn;
use ringstitch_core::{EntityClass, OsmId, TagOrder, Tags};

use crate::error::{NumberError, OsmXmlError};
use crate::xml::{ElementKind, XmlElement};

/// Tag key/value pairs collected from `<tag>` children.
///
/// Attributes of each `<tag>` are consumed in order: `k` opens a pending key
/// and a later `v` in the same element completes it. A `v` with no pending
/// key is dropped. A key left pending at the end of its element is discarded.
#[derive(Debug, Default)]
pub(crate) struct TagPairs {
    pending: Option<String>,
    pairs: Vec<(String, String)>,
    keys: usize,
    values: usize,
    dropped: u64,
}

impl TagPairs {
    fn key(&mut self, key: &str) {
        self.keys += 1;
        self.pending = Some(key.to_owned());
    }

    fn value(&mut self, value: &str) -> bool {
        self.values += 1;
        match self.pending.take() {
            Some(key) => {
                self.pairs.push((key, value.to_owned()));
                true
            }
            None => {
                self.dropped += 1;
                false
            }
        }
    }

    fn read(
        element: &XmlElement,
        class: EntityClass,
        id: OsmId,
        order: TagOrder,
    ) -> Result<Self, OsmXmlError> {
        let mut tags = Self::default();
        for tag in element.children_of(&ElementKind::Tag) {
            tags.pending = None;
            for (name, text) in &tag.attributes {
                match name.as_str() {
                    "k" => tags.key(text),
                    "v" => {
                        if !tags.value(text) && order == TagOrder::Strict {
                            return Err(OsmXmlError::OrphanTagValue { class, id });
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(tags)
    }

    /// `k` attributes seen.
    pub(crate) const fn keys(&self) -> usize {
        self.keys
    }

    /// `v` attributes seen, paired or not.
    pub(crate) const fn values(&self) -> usize {
        self.values
    }

    /// Values seen with no pending key.
    pub(crate) const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Whether as many `v` attributes as `k` attributes were seen.
    pub(crate) const fn is_balanced(&self) -> bool {
        self.keys == self.values
    }

    /// Collapse the pairs into a map. A repeated key keeps its first value.
    pub(crate) fn into_tags(self) -> Tags {
        let mut tags = Tags::with_capacity(self.pairs.len());
        for (key, value) in self.pairs {
            tags.entry(key).or_insert(value);
        }
        tags
    }
}

#[derive(Debug)]
pub(crate) struct RawNode {
    pub(crate) id: OsmId,
    pub(crate) lat: f64,
    pub(crate) lon: f64,
    pub(crate) tags: TagPairs,
}

impl RawNode {
    pub(crate) fn read(element: &XmlElement, order: TagOrder) -> Result<Self, OsmXmlError> {
        let id: OsmId = number(element, "node", "id")?.unwrap_or_default();
        let lat: f64 = number(element, "node", "lat")?.unwrap_or_default();
        let lon: f64 = number(element, "node", "lon")?.unwrap_or_default();
        let tags = TagPairs::read(element, EntityClass::Node, id, order)?;
        Ok(Self { id, lat, lon, tags })
    }
}

#[derive(Debug)]
pub(crate) struct RawWay {
    pub(crate) id: OsmId,
    pub(crate) tags: TagPairs,
    pub(crate) nodes: Vec<OsmId>,
}

impl RawWay {
    pub(crate) fn read(element: &XmlElement, order: TagOrder) -> Result<Self, OsmXmlError> {
        let id: OsmId = number(element, "way", "id")?.unwrap_or_default();
        let tags = TagPairs::read(element, EntityClass::Way, id, order)?;
        let mut nodes = Vec::new();
        for nd in element.children_of(&ElementKind::Nd) {
            match number(nd, "nd", "ref")? {
                Some(node_id) => nodes.push(node_id),
                None => warn!("way {id} has an <nd> without a ref; skipping it"),
            }
        }
        Ok(Self { id, tags, nodes })
    }
}

#[derive(Debug)]
pub(crate) struct RawRelation {
    pub(crate) id: OsmId,
    pub(crate) tags: TagPairs,
    /// `(way_id, role)` pairs in document order.
    pub(crate) members: Vec<(OsmId, String)>,
    /// Members dropped for referencing something other than a way or for
    /// lacking a reference.
    pub(crate) skipped_members: u64,
}

impl RawRelation {
    pub(crate) fn read(element: &XmlElement, order: TagOrder) -> Result<Self, OsmXmlError> {
        let id: OsmId = number(element, "relation", "id")?.unwrap_or_default();
        let tags = TagPairs::read(element, EntityClass::Relation, id, order)?;
        let mut members = Vec::new();
        let mut skipped_members = 0;
        for member in element.children_of(&ElementKind::Member) {
            if member.attr("type").is_some_and(|kind| kind != "way") {
                skipped_members += 1;
                continue;
            }
            let Some(way_id) = number(member, "member", "ref")? else {
                warn!("relation {id} has a <member> without a ref; skipping it");
                skipped_members += 1;
                continue;
            };
            let role = member.attr("role").unwrap_or_default().to_owned();
            members.push((way_id, role));
        }
        Ok(Self {
            id,
            tags,
            members,
            skipped_members,
        })
    }
}

/// Parse an optional numeric attribute.
fn number<T>(
    element: &XmlElement,
    kind: &'static str,
    attribute: &'static str,
) -> Result<Option<T>, OsmXmlError>
where
    T: FromStr,
    T::Err: Into<NumberError>,
{
    element
        .attr(attribute)
        .map(|text| {
            text.trim()
                .parse::<T>()
                .map_err(|source| OsmXmlError::InvalidNumber {
                    element: kind,
                    attribute,
                    value: text.to_owned(),
                    source: source.into(),
                })
        })
        .transpose()
}
