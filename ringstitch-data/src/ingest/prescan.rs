//! Read-only counting pass used to size the store before the build pass.
use ringstitch_core::ElementCounts;

use crate::error::OsmXmlError;
use crate::xml::{ElementKind, OsmVisitor, XmlElement};

#[derive(Debug, Default)]
pub(super) struct ElementCounter {
    pub(super) counts: ElementCounts,
}

impl ElementCounter {
    fn tags(element: &XmlElement) -> usize {
        element.children_of(&ElementKind::Tag).count()
    }
}

impl OsmVisitor for ElementCounter {
    fn visit_node(&mut self, element: &XmlElement) -> Result<(), OsmXmlError> {
        self.counts.nodes += 1;
        self.counts.node_tags += Self::tags(element);
        Ok(())
    }

    fn visit_way(&mut self, element: &XmlElement) -> Result<(), OsmXmlError> {
        self.counts.ways += 1;
        self.counts.way_tags += Self::tags(element);
        self.counts.way_nodes += element.children_of(&ElementKind::Nd).count();
        Ok(())
    }

    fn visit_relation(&mut self, element: &XmlElement) -> Result<(), OsmXmlError> {
        self.counts.relations += 1;
        self.counts.relation_tags += Self::tags(element);
        self.counts.relation_members += element.children_of(&ElementKind::Member).count();
        Ok(())
    }
}
