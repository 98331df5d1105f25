//! Depth-first traversal dispatching OSM entities to a visitor.

use crate::error::OsmXmlError;

use super::{ElementKind, XmlElement};

/// Receives each OSM entity element found by [`walk`].
///
/// The visitor owns the entity's whole subtree; the walker never descends
/// into `<node>`, `<way>` or `<relation>` children itself.
pub trait OsmVisitor {
    /// Called for every `<node>` element.
    ///
    /// # Errors
    ///
    /// An error aborts the walk.
    fn visit_node(&mut self, element: &XmlElement) -> Result<(), OsmXmlError>;

    /// Called for every `<way>` element.
    ///
    /// # Errors
    ///
    /// An error aborts the walk.
    fn visit_way(&mut self, element: &XmlElement) -> Result<(), OsmXmlError>;

    /// Called for every `<relation>` element.
    ///
    /// # Errors
    ///
    /// An error aborts the walk.
    fn visit_relation(&mut self, element: &XmlElement) -> Result<(), OsmXmlError>;
}

/// Visit `root` and its descendants in document order.
///
/// Entity elements go to the visitor; every other element is treated as a
/// wrapper and its children are visited in turn, at any depth.
///
/// # Errors
///
/// Propagates the first visitor error.
pub fn walk<V>(root: &XmlElement, visitor: &mut V) -> Result<(), OsmXmlError>
where
    V: OsmVisitor + ?Sized,
{
    let mut stack = vec![root];
    while let Some(element) = stack.pop() {
        match element.kind {
            ElementKind::Node => visitor.visit_node(element)?,
            ElementKind::Way => visitor.visit_way(element)?,
            ElementKind::Relation => visitor.visit_relation(element)?,
            ElementKind::Tag | ElementKind::Nd | ElementKind::Member | ElementKind::Other(_) => {
                stack.extend(element.children.iter().rev());
            }
        }
    }
    Ok(())
}
