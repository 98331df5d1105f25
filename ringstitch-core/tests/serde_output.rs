//! Resolved geometry serialises for downstream table builders.
#![cfg(feature = "serde")]

mod support;

use ringstitch_core::{RelationKind, Resolver};
use support::{add_ways, relation, square_store};

#[test]
fn resolved_relation_serialises_with_provenance() {
    let mut store = square_store();
    add_ways(&mut store, &[(10, &[1, 2, 3]), (11, &[3, 4, 1])]);
    let target = relation(100, &[(10, "outer"), (11, "outer")]);
    let resolved = Resolver::new(&store)
        .resolve(&target, RelationKind::Multipolygon)
        .expect("ring resolves");

    let json = serde_json::to_value(&resolved).expect("serialisable");
    assert_eq!(json["relation_id"], 100);
    assert_eq!(json["kind"], "Multipolygon");
    assert_eq!(json["rings"][0]["way_ids"], serde_json::json!([10, 11]));
    assert_eq!(json["rings"][0]["role"], "Outer");
    assert_eq!(
        json["rings"][0]["node_ids"],
        serde_json::json!([1, 2, 3, 4, 1])
    );
}
