//! OSM XML element tree.
//!
//! The document is read once with `quick-xml` into a small tree of typed
//! elements. Text, comments, declarations and processing instructions carry
//! nothing the ingest needs and are dropped.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::OsmXmlError;

mod walker;

pub use walker::{OsmVisitor, walk};

/// Element names the ingest understands; everything else is a wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// `<node>`
    Node,
    /// `<way>`
    Way,
    /// `<relation>`
    Relation,
    /// `<tag k=".." v=".."/>`
    Tag,
    /// `<nd ref=".."/>`
    Nd,
    /// `<member type=".." ref=".." role=".."/>`
    Member,
    /// Any other element, such as `<osm>`, `<bounds>` or `<modify>`.
    Other(String),
}

impl ElementKind {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"node" => Self::Node,
            b"way" => Self::Way,
            b"relation" => Self::Relation,
            b"tag" => Self::Tag,
            b"nd" => Self::Nd,
            b"member" => Self::Member,
            other => Self::Other(String::from_utf8_lossy(other).into_owned()),
        }
    }

    /// Element name as written in the document.
    pub fn name(&self) -> &str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
            Self::Tag => "tag",
            Self::Nd => "nd",
            Self::Member => "member",
            Self::Other(name) => name,
        }
    }
}

/// One element with its attributes in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Element kind.
    pub kind: ElementKind,
    /// Unescaped `(name, value)` attribute pairs in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<Self>,
}

impl XmlElement {
    /// First value of attribute `name`, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements of the given kind.
    pub fn children_of<'a>(&'a self, kind: &'a ElementKind) -> impl Iterator<Item = &'a Self> {
        self.children.iter().filter(move |child| child.kind == *kind)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, OsmXmlError> {
        let kind = ElementKind::from_name(start.local_name().as_ref());
        let mut attributes = Vec::new();
        for entry in start.attributes() {
            let attribute = entry.map_err(|source| OsmXmlError::Attribute {
                element: kind.name().to_owned(),
                source,
            })?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value: Cow<'_, str> = attribute.unescape_value()?;
            attributes.push((key, value.into_owned()));
        }
        Ok(Self {
            kind,
            attributes,
            children: Vec::new(),
        })
    }
}

/// A parsed document: its top-level elements.
///
/// # Examples
/// ```
/// use ringstitch_data::xml::{ElementKind, XmlDocument};
///
/// # fn main() -> Result<(), ringstitch_data::OsmXmlError> {
/// let document = XmlDocument::parse(r#"<osm><node id="1" lat="0" lon="0"/></osm>"#)?;
/// let root = &document.roots()[0];
/// assert_eq!(root.kind, ElementKind::Other("osm".into()));
/// assert_eq!(root.children[0].attr("id"), Some("1"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlDocument {
    roots: Vec<XmlElement>,
}

impl XmlDocument {
    /// Parse `xml` into an element tree.
    ///
    /// # Errors
    ///
    /// Returns [`OsmXmlError::Xml`] or [`OsmXmlError::Attribute`] for
    /// malformed markup, [`OsmXmlError::Unclosed`] when the input ends
    /// inside an element and [`OsmXmlError::UnexpectedClose`] for a stray
    /// closing tag.
    pub fn parse(xml: &str) -> Result<Self, OsmXmlError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut roots = Vec::new();
        let mut open: Vec<XmlElement> = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Start(start) => open.push(XmlElement::from_start(&start)?),
                Event::Empty(start) => {
                    let element = XmlElement::from_start(&start)?;
                    attach(&mut open, &mut roots, element);
                }
                Event::End(end) => {
                    let element = open.pop().ok_or_else(|| OsmXmlError::UnexpectedClose {
                        element: String::from_utf8_lossy(end.local_name().as_ref()).into_owned(),
                    })?;
                    attach(&mut open, &mut roots, element);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(unclosed) = open.pop() {
            return Err(OsmXmlError::Unclosed {
                element: unclosed.kind.name().to_owned(),
            });
        }
        Ok(Self { roots })
    }

    /// Top-level elements in document order.
    pub fn roots(&self) -> &[XmlElement] {
        &self.roots
    }

    /// Visit every OSM entity in the document with `visitor`.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by the visitor.
    pub fn walk<V>(&self, visitor: &mut V) -> Result<(), OsmXmlError>
    where
        V: OsmVisitor + ?Sized,
    {
        self.roots.iter().try_for_each(|root| walk(root, visitor))
    }
}

fn attach(open: &mut [XmlElement], roots: &mut Vec<XmlElement>, element: XmlElement) {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None => roots.push(element),
    }
}
