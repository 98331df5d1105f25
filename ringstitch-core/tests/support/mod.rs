use geo::Coord;
use ringstitch_core::{EntityStore, Member, Node, OsmId, Relation, Way};

/// Store with the corners of the unit square as nodes 1 to 4 and three
/// further nodes 5 to 7 away from it.
pub fn square_store() -> EntityStore {
    let mut store = EntityStore::new();
    let corners = [
        (1, 0.0, 0.0),
        (2, 1.0, 0.0),
        (3, 1.0, 1.0),
        (4, 0.0, 1.0),
        (5, 5.0, 5.0),
        (6, 6.0, 5.0),
        (7, 6.0, 6.0),
    ];
    for (id, x, y) in corners {
        store.insert_node(Node::new(id, Coord { x, y }));
    }
    store
}

/// Insert ways given as `(id, node refs)` pairs.
pub fn add_ways(store: &mut EntityStore, ways: &[(OsmId, &[OsmId])]) {
    for (id, nodes) in ways {
        store.insert_way(Way::new(*id, nodes.to_vec()));
    }
}

/// Relation over `(way id, role)` pairs.
pub fn relation(id: OsmId, members: &[(OsmId, &str)]) -> Relation {
    Relation::new(
        id,
        members
            .iter()
            .map(|(way_id, role)| Member::new(*way_id, *role))
            .collect(),
    )
}
