//! OSM XML ingestion for the ringstitch engine.
//!
//! Responsibilities:
//! - Parse OSM XML into a typed element tree.
//! - Walk entity elements through wrappers such as `<create>` and `<modify>`.
//! - Apply tag pairing, reserved-tag and parity policies while filling an
//!   [`EntityStore`](ringstitch_core::EntityStore).
//!
//! Boundaries:
//! - Do not resolve geometry (lives in `ringstitch-core`).
//! - Read documents from memory only; callers own file and network access.
//!
//! Invariants:
//! - A document either produces a complete store or an error; no partial
//!   stores are returned.
//! - No global mutable state.

#![forbid(unsafe_code)]

mod error;
mod ingest;
pub mod xml;

pub use error::{NumberError, OsmXmlError};
pub use ingest::{OsmIngestReport, OsmIngestSummary, count_osm_xml, ingest_osm_xml, parse_osm_xml};

#[cfg(test)]
mod tests;
