use super::*;
use ringstitch_core::{
    EntityClass, IngestConfig, ParityPolicy, ProgressHook, RelationKind, Resolver, Role, TagOrder,
    TopologyError, TraceBuffer, trace_way,
};
use rstest::{fixture, rstest};
use std::sync::{Arc, Mutex};

mod support {
    include!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/support/mod.rs"));
}

use support::{assert_close, read_fixture};

#[fixture]
fn unit_square() -> String {
    read_fixture("unit_square")
}

#[fixture]
fn courtyard() -> String {
    read_fixture("courtyard")
}

#[fixture]
fn config() -> IngestConfig {
    IngestConfig::default()
}

#[rstest]
fn ingests_unit_square_building(unit_square: String, config: IngestConfig) {
    let report = ingest_osm_xml(&unit_square, &config).expect("fixture ingests");
    let store = &report.store;
    assert_eq!(store.node_count(), 4);
    assert_eq!(store.way_count(), 1);
    assert_eq!(store.relation_count(), 0);

    let polygons = store.polygonal_ways();
    assert_eq!(polygons.len(), 1, "expected one closed way");
    let way = polygons.first().expect("closed way present");
    assert_eq!(way.nodes.len(), 5);
    assert_eq!(way.name.as_deref(), Some("Gatehouse"));
    assert!(!way.tags.contains_key("name"));
    assert_eq!(way.tags.get("building").map(String::as_str), Some("yes"));
    assert!(store.linear_ways().is_empty());
}

#[rstest]
fn summarises_element_counts(unit_square: String, config: IngestConfig) {
    let summary = ingest_osm_xml(&unit_square, &config)
        .expect("fixture ingests")
        .summary;
    assert_eq!(
        summary,
        OsmIngestSummary {
            nodes: 4,
            ways: 1,
            ..OsmIngestSummary::default()
        }
    );
}

#[rstest]
fn keeps_out_of_range_coordinates(config: IngestConfig) {
    let xml = r#"<osm>
        <node id="1" lat="10" lon="20"/>
        <node id="2" lat="95" lon="500"/>
    </osm>"#;
    let report = ingest_osm_xml(xml, &config).expect("document ingests");
    let node = report.store.node(2).expect("node stored");
    assert_close(node.lon(), 500.0);
    assert_eq!(report.store.node_count(), 2);
}

#[rstest]
fn finds_entities_inside_change_wrappers(courtyard: String, config: IngestConfig) {
    let store = parse_osm_xml(&courtyard, &config).expect("fixture ingests");
    assert_eq!(store.node_count(), 8);
    assert_eq!(store.way_ids(), vec![10, 11, 12, 20, 21]);
    assert_eq!(store.relation_count(), 2);
}

#[rstest]
fn resolves_courtyard_multipolygon(courtyard: String, config: IngestConfig) {
    let store = parse_osm_xml(&courtyard, &config).expect("fixture ingests");
    let relation = store.relations().first().expect("relation present");
    let kind = RelationKind::from_tags(&relation.tags);
    assert_eq!(kind, RelationKind::Multipolygon);

    let resolved = Resolver::new(&store)
        .resolve(relation, kind)
        .expect("all nodes present");
    assert_eq!(resolved.failed_ring_count(), 0);
    let rings: Vec<(Role, Vec<i64>)> = resolved
        .rings
        .iter()
        .map(|ring| (ring.role.clone(), ring.way_ids.clone()))
        .collect();
    assert_eq!(
        rings,
        vec![(Role::Outer, vec![11, 10]), (Role::Inner, vec![12])]
    );
    assert!(resolved.rings.iter().all(|ring| ring.is_closed()));
}

#[rstest]
fn resolves_route_chains_by_role(courtyard: String, config: IngestConfig) {
    let store = parse_osm_xml(&courtyard, &config).expect("fixture ingests");
    let resolved = Resolver::new(&store)
        .resolve_all(|relation| RelationKind::from_tags(&relation.tags))
        .expect("all nodes present");
    let route = resolved.get(1).expect("route relation resolved");
    assert_eq!(route.kind, RelationKind::Multilinestring);
    assert_eq!(route.missing_ways, vec![99]);
    let groups: Vec<&str> = route.chains.iter().map(|group| group.id.as_str()).collect();
    assert_eq!(groups, vec!["600-(no role)", "600-spur"]);
}

#[rstest]
fn counts_skipped_relation_members(courtyard: String, config: IngestConfig) {
    let report = ingest_osm_xml(&courtyard, &config).expect("fixture ingests");
    assert_eq!(report.summary.skipped_members, 1);
    let relation = report.store.relations().first().expect("relation present");
    assert_eq!(relation.members.len(), 3);
}

#[rstest]
fn derives_reserved_way_fields(courtyard: String) {
    let config = IngestConfig::default();
    let store = parse_osm_xml(&courtyard, &config).expect("fixture ingests");
    let footway = store.way(20).expect("way 20 stored");
    assert_eq!(footway.kind.as_deref(), Some("footway"));
    assert!(footway.oneway);
    assert!(footway.tags.is_empty());
    let spur = store.way(21).expect("way 21 stored");
    assert!(!spur.oneway);
}

#[rstest]
fn keeps_reserved_tags_when_extraction_is_disabled(courtyard: String) {
    let config = IngestConfig::default().with_reserved_tag_extraction(false);
    let store = parse_osm_xml(&courtyard, &config).expect("fixture ingests");
    let footway = store.way(20).expect("way 20 stored");
    assert_eq!(footway.kind.as_deref(), Some("footway"));
    assert_eq!(footway.tags.get("highway").map(String::as_str), Some("footway"));
    assert_eq!(footway.tags.get("oneway").map(String::as_str), Some("yes"));
}

#[rstest]
fn first_node_with_an_id_wins(config: IngestConfig) {
    let xml = r#"<osm>
        <node id="7" lat="1" lon="2"><tag k="name" v="first"/></node>
        <node id="7" lat="3" lon="4"><tag k="name" v="second"/></node>
    </osm>"#;
    let report = ingest_osm_xml(xml, &config).expect("document ingests");
    let node = report.store.node(7).expect("node stored");
    assert_close(node.lon(), 2.0);
    assert_eq!(node.tags.get("name").map(String::as_str), Some("first"));
    assert_eq!(report.summary.duplicate_nodes, 1);
}

#[rstest]
fn counts_way_id_collisions(config: IngestConfig) {
    let xml = r#"<osm>
        <way id="5"><nd ref="1"/></way>
        <way id="5"><nd ref="2"/><nd ref="3"/></way>
    </osm>"#;
    let report = ingest_osm_xml(xml, &config).expect("document ingests");
    assert_eq!(report.summary.duplicate_ways, 1);
    assert_eq!(report.store.way_count(), 1);
}

#[rstest]
fn rejects_unbalanced_tags_by_default(config: IngestConfig) {
    let xml = r#"<osm><way id="8"><nd ref="1"/><tag k="highway"/></way></osm>"#;
    match ingest_osm_xml(xml, &config) {
        Err(OsmXmlError::TagParity {
            class,
            id,
            keys,
            values,
        }) => {
            assert_eq!(class, EntityClass::Way);
            assert_eq!((id, keys, values), (8, 1, 0));
        }
        other => panic!("expected a tag parity error, got {other:?}"),
    }
}

#[rstest]
fn skips_unbalanced_entities_when_configured() {
    let xml = r#"<osm>
        <node id="1" lat="0" lon="0"><tag k="name"/></node>
        <node id="2" lat="0" lon="0"/>
    </osm>"#;
    let config = IngestConfig::default().with_parity_policy(ParityPolicy::SkipEntity);
    let report = ingest_osm_xml(xml, &config).expect("document ingests");
    assert!(!report.store.contains_node(1));
    assert!(report.store.contains_node(2));
    assert_eq!(report.summary.skipped_entities, 1);
    assert_eq!(report.summary.dropped_tag_values, 0);
}

#[rstest]
fn drops_value_before_key_and_keeps_the_entity(config: IngestConfig) {
    let xml = r#"<osm><node id="1" lat="0" lon="0"><tag v="x" k="a"/></node></osm>"#;
    let report = ingest_osm_xml(xml, &config).expect("orphan values are tolerated");
    let node = report.store.node(1).expect("node stored");
    assert!(!node.tags.contains_key("a"));
    assert_eq!(report.summary.dropped_tag_values, 1);
    assert_eq!(report.summary.skipped_entities, 0);
}

#[rstest]
fn does_not_pair_keys_across_tag_elements(config: IngestConfig) {
    let xml = r#"<osm><way id="6"><nd ref="1"/><tag k="name"/><tag v="High Street"/></way></osm>"#;
    let report = ingest_osm_xml(xml, &config).expect("document ingests");
    let way = report.store.way(6).expect("way stored");
    assert_eq!(way.name, None);
    assert!(way.tags.is_empty());
    assert_eq!(report.summary.dropped_tag_values, 1);
}

#[rstest]
#[case(TagOrder::Lenient, false)]
#[case(TagOrder::Strict, true)]
fn tag_order_controls_orphan_values(#[case] order: TagOrder, #[case] rejected: bool) {
    let xml =
        r#"<osm><node id="3" lat="0" lon="0"><tag v="x" k="a"/><tag k="b" v="y"/></node></osm>"#;
    let config = IngestConfig::default().with_tag_order(order);
    let result = ingest_osm_xml(xml, &config);
    if rejected {
        assert!(matches!(
            result,
            Err(OsmXmlError::OrphanTagValue {
                class: EntityClass::Node,
                id: 3
            })
        ));
    } else {
        let report = result.expect("lenient order drops the orphan value");
        let node = report.store.node(3).expect("node stored");
        assert_eq!(node.tags.get("a"), None);
        assert_eq!(node.tags.get("b").map(String::as_str), Some("y"));
        assert_eq!(report.summary.dropped_tag_values, 1);
    }
}

#[rstest]
fn rejects_invalid_coordinates(config: IngestConfig) {
    let xml = r#"<osm><node id="1" lat="fifty" lon="0"/></osm>"#;
    match ingest_osm_xml(xml, &config) {
        Err(OsmXmlError::InvalidNumber {
            element,
            attribute,
            value,
            ..
        }) => {
            assert_eq!((element, attribute, value.as_str()), ("node", "lat", "fifty"));
        }
        other => panic!("expected an invalid number error, got {other:?}"),
    }
}

#[rstest]
fn keeps_zero_ids_and_counts_them(config: IngestConfig) {
    let xml = r#"<osm><node lat="1" lon="1"/><way><nd ref="0"/></way></osm>"#;
    let report = ingest_osm_xml(xml, &config).expect("document ingests");
    assert_eq!(report.summary.zero_ids, 2);
    assert!(report.store.contains_node(0));
    assert!(report.store.contains_way(0));
}

#[rstest]
fn counts_empty_ways(config: IngestConfig) {
    let xml = r#"<osm><way id="4"><tag k="highway" v="path"/></way></osm>"#;
    let report = ingest_osm_xml(xml, &config).expect("document ingests");
    assert_eq!(report.summary.empty_ways, 1);
    assert!(report.store.way(4).is_some_and(ringstitch_core::Way::is_empty));
}

#[rstest]
fn dangling_references_surface_when_traced(config: IngestConfig) {
    let xml = r#"<osm>
        <node id="1" lat="0" lon="0"/>
        <way id="9"><nd ref="1"/><nd ref="404"/></way>
    </osm>"#;
    let store = parse_osm_xml(xml, &config).expect("ingest does not check references");
    let way = store.way(9).expect("way stored");
    let mut buffer = TraceBuffer::new();
    assert_eq!(
        trace_way(&store, way, None, false, &mut buffer),
        Err(TopologyError::DanglingNode {
            way_id: 9,
            node_id: 404
        })
    );
    assert!(buffer.is_empty());
}

#[rstest]
fn presizing_builds_the_same_store(courtyard: String) {
    let plain = parse_osm_xml(&courtyard, &IngestConfig::default()).expect("fixture ingests");
    let presized = parse_osm_xml(&courtyard, &IngestConfig::default().with_presize(true))
        .expect("fixture ingests");
    assert_eq!(plain, presized);
}

#[rstest]
fn counts_match_the_fixture(courtyard: String) {
    let counts = count_osm_xml(&courtyard).expect("fixture counts");
    assert_eq!((counts.nodes, counts.ways, counts.relations), (8, 5, 2));
    assert_eq!(counts.way_nodes, 15);
    assert_eq!(counts.relation_members, 7);
    assert_eq!(counts.way_tags, 3);
    assert_eq!(counts.relation_tags, 3);
}

#[rstest]
fn reports_progress_while_building(courtyard: String) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    let hook = ProgressHook::new(5, move |count| {
        if let Ok(mut calls) = sink.lock() {
            calls.push(count);
        }
    });
    let config = IngestConfig::default().with_progress(hook);
    parse_osm_xml(&courtyard, &config).expect("fixture ingests");
    let recorded = calls.lock().map(|calls| calls.clone()).unwrap_or_default();
    assert_eq!(recorded, vec![5, 10, 15]);
}

#[rstest]
#[case("")]
#[case("<osm>")]
#[case("<osm></way>")]
fn rejects_malformed_documents(#[case] xml: &str, config: IngestConfig) {
    let result = ingest_osm_xml(xml, &config);
    if xml.is_empty() {
        let report = result.expect("an empty document holds no entities");
        assert_eq!(report.store.node_count(), 0);
    } else {
        assert!(result.is_err(), "expected failure for {xml:?}");
    }
}
