//! Errors raised while turning OSM XML into an entity store.

use std::num::{ParseFloatError, ParseIntError};

use quick_xml::events::attributes::AttrError;
use ringstitch_core::{EntityClass, OsmId};
use thiserror::Error;

/// Numeric attribute text that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    /// Identifier or reference was not an integer.
    #[error(transparent)]
    Int(#[from] ParseIntError),
    /// Coordinate was not a decimal number.
    #[error(transparent)]
    Float(#[from] ParseFloatError),
}

/// Errors returned when ingesting an OSM XML document.
///
/// Every variant aborts the whole document; no partial store is returned.
#[derive(Debug, Error)]
pub enum OsmXmlError {
    /// The document is not well-formed XML.
    #[error("failed to parse OSM XML: {source}")]
    Xml {
        /// Parser failure.
        #[source]
        source: quick_xml::Error,
    },
    /// An attribute on `element` could not be read.
    #[error("malformed attribute on <{element}>: {source}")]
    Attribute {
        /// Element carrying the attribute.
        element: String,
        /// Attribute failure.
        #[source]
        source: AttrError,
    },
    /// The document ended while `element` was still open.
    #[error("OSM XML ended before <{element}> was closed")]
    Unclosed {
        /// Innermost open element.
        element: String,
    },
    /// A closing tag had no matching opening tag.
    #[error("OSM XML closes </{element}> which was never opened")]
    UnexpectedClose {
        /// Name on the closing tag.
        element: String,
    },
    /// A numeric attribute held text that is not a number.
    #[error("invalid {attribute}={value:?} on <{element}>: {source}")]
    InvalidNumber {
        /// Element carrying the attribute.
        element: &'static str,
        /// Attribute name.
        attribute: &'static str,
        /// Raw attribute text.
        value: String,
        /// Parse failure.
        #[source]
        source: NumberError,
    },
    /// A tag value preceded its key while strict tag order was requested.
    #[error("{class} {id} has a tag value without a preceding key")]
    OrphanTagValue {
        /// Class of the offending entity.
        class: EntityClass,
        /// Entity identifier.
        id: OsmId,
    },
    /// An entity has a different number of `k` and `v` tag attributes.
    #[error("{class} {id} has {keys} tag keys but {values} tag values")]
    TagParity {
        /// Class of the offending entity.
        class: EntityClass,
        /// Entity identifier.
        id: OsmId,
        /// `k` attributes seen.
        keys: usize,
        /// `v` attributes seen.
        values: usize,
    },
}

impl From<quick_xml::Error> for OsmXmlError {
    fn from(source: quick_xml::Error) -> Self {
        Self::Xml { source }
    }
}
