use maquette_scene::geom::size2;
use maquette_scene::{
    Error, Node, NodeKind, NodePatch, NodeSpec, SceneGraph, SchemaRegistry, SlabSpec,
};

fn graph() -> SceneGraph {
    SceneGraph::new(SchemaRegistry::new())
}

fn node(kind: NodeKind) -> Node {
    Node::new(SchemaRegistry::new().default_spec(kind))
}

fn node_with_id(id: &str, kind: NodeKind) -> Node {
    Node::with_id(id, SchemaRegistry::new().default_spec(kind))
}

/// site -> building -> level, returning (graph, site, building, level).
fn scaffold() -> (SceneGraph, String, String, String) {
    let mut g = graph();
    let site = g.insert_root(node(NodeKind::Site)).unwrap();
    let building = g.insert(&site, node(NodeKind::Building)).unwrap();
    let level = g.insert(&building, node(NodeKind::Level)).unwrap();
    (g, site, building, level)
}

#[test]
fn insert_rejects_duplicate_ids() {
    let (mut g, site, _, _) = scaffold();
    let first = g.insert(&site, node_with_id("item-1", NodeKind::Item));
    assert!(first.is_ok());

    let second = g.insert(&site, node_with_id("item-1", NodeKind::Item));
    assert_eq!(
        second,
        Err(Error::DuplicateId {
            id: "item-1".to_string()
        })
    );
    assert_eq!(g.children_of(&site).iter().filter(|c| *c == "item-1").count(), 1);
}

#[test]
fn minted_ids_are_kind_prefixed_and_unique() {
    let (mut g, _, _, level) = scaffold();
    let a = g.insert(&level, node(NodeKind::Wall)).unwrap();
    let b = g.insert(&level, node(NodeKind::Wall)).unwrap();
    assert!(a.starts_with("wall-"));
    assert!(b.starts_with("wall-"));
    assert_ne!(a, b);
}

#[test]
fn parent_and_child_lists_agree() {
    let (g, site, building, level) = scaffold();

    let b = g.get(&building).unwrap();
    assert_eq!(b.parent.as_deref(), Some(site.as_str()));
    assert_eq!(
        g.children_of(&site)
            .iter()
            .filter(|c| **c == building)
            .count(),
        1
    );

    let l = g.get(&level).unwrap();
    assert_eq!(l.parent.as_deref(), Some(building.as_str()));
}

#[test]
fn insert_preserves_sibling_order() {
    let (mut g, _, _, level) = scaffold();
    let a = g.insert(&level, node(NodeKind::Wall)).unwrap();
    let b = g.insert(&level, node(NodeKind::Column)).unwrap();
    let c = g.insert(&level, node(NodeKind::Wall)).unwrap();
    assert_eq!(g.children_of(&level), &[a, b, c]);
}

#[test]
fn insert_rejects_kind_violations() {
    let (mut g, site, _, level) = scaffold();
    // A level cannot host a door; doors belong to walls.
    let err = g.insert(&level, node(NodeKind::Door)).unwrap_err();
    assert_eq!(
        err,
        Error::ChildNotAllowed {
            parent: NodeKind::Level,
            child: NodeKind::Door
        }
    );
    // Sites only host buildings and items.
    assert!(g.insert(&site, node(NodeKind::Wall)).is_err());
}

#[test]
fn only_sites_can_be_roots() {
    let mut g = graph();
    assert!(g.insert_root(node(NodeKind::Building)).is_err());
    assert!(g.insert_root(node(NodeKind::Site)).is_ok());
}

#[test]
fn get_is_total_over_missing_ids() {
    let (g, _, _, _) = scaffold();
    assert!(g.get("wall-nope").is_none());
    assert!(g.children_of("wall-nope").is_empty());
    assert_eq!(g.ancestors("wall-nope").count(), 0);
}

#[test]
fn update_patches_attributes() {
    let (mut g, _, _, level) = scaffold();
    let slab = g.insert(&level, node(NodeKind::Slab)).unwrap();

    let patch = NodePatch {
        name: Some("ground slab".to_string()),
        spec: Some(NodeSpec::Slab(SlabSpec {
            size: size2(8.0, 6.0),
            thickness: 0.3,
        })),
        ..NodePatch::default()
    };
    g.update(&slab, &patch).unwrap();

    let n = g.get(&slab).unwrap();
    assert_eq!(n.name, "ground slab");
    assert_eq!(n.spec.as_slab().unwrap().thickness, 0.3);
}

#[test]
fn update_rejects_missing_and_invalid() {
    let (mut g, _, _, level) = scaffold();
    let slab = g.insert(&level, node(NodeKind::Slab)).unwrap();

    assert_eq!(
        g.update("slab-nope", &NodePatch::default()),
        Err(Error::NotFound {
            id: "slab-nope".to_string()
        })
    );

    // Negative thickness violates the slab schema; the node is unchanged.
    let bad = NodePatch::spec(NodeSpec::Slab(SlabSpec {
        size: size2(1.0, 1.0),
        thickness: -0.2,
    }));
    assert!(matches!(
        g.update(&slab, &bad),
        Err(Error::SchemaViolation { .. })
    ));
    assert_eq!(g.get(&slab).unwrap().spec.as_slab().unwrap().thickness, 0.2);
}

#[test]
fn update_cannot_change_kind() {
    let (mut g, _, _, level) = scaffold();
    let slab = g.insert(&level, node(NodeKind::Slab)).unwrap();
    let patch = NodePatch::spec(SchemaRegistry::new().default_spec(NodeKind::Wall));
    assert!(matches!(
        g.update(&slab, &patch),
        Err(Error::SchemaViolation { .. })
    ));
}

#[test]
fn reparent_moves_between_groups() {
    let (mut g, _, _, level) = scaffold();
    let group_a = g.insert(&level, node(NodeKind::Group)).unwrap();
    let group_b = g.insert(&level, node(NodeKind::Group)).unwrap();
    let wall = g.insert(&group_a, node(NodeKind::Wall)).unwrap();
    let other = g.insert(&group_b, node(NodeKind::Wall)).unwrap();

    g.reparent(&wall, &group_b, 0).unwrap();

    assert!(g.children_of(&group_a).is_empty());
    assert_eq!(g.children_of(&group_b), &[wall.clone(), other]);
    assert_eq!(g.get(&wall).unwrap().parent.as_deref(), Some(group_b.as_str()));
}

#[test]
fn reparent_rejects_cycles_for_all_descendants() {
    let (mut g, _, _, level) = scaffold();
    let outer = g.insert(&level, node(NodeKind::Group)).unwrap();
    let inner = g.insert(&outer, node(NodeKind::Group)).unwrap();
    let leaf = g.insert(&inner, node(NodeKind::Group)).unwrap();

    for target in [&outer, &inner, &leaf] {
        assert_eq!(
            g.reparent(&outer, target, 0),
            Err(Error::Cycle {
                id: outer.clone(),
                new_parent: target.clone()
            })
        );
    }
    // Graph unchanged after the rejections.
    assert_eq!(g.get(&inner).unwrap().parent.as_deref(), Some(outer.as_str()));
}

#[test]
fn reparent_respects_containment() {
    let (mut g, site, _, level) = scaffold();
    let wall = g.insert(&level, node(NodeKind::Wall)).unwrap();
    assert!(matches!(
        g.reparent(&wall, &site, 0),
        Err(Error::ChildNotAllowed { .. })
    ));
}

#[test]
fn delete_cascades_to_all_descendants() {
    let (mut g, _, building, level) = scaffold();
    let wall = g.insert(&level, node(NodeKind::Wall)).unwrap();
    let door = g.insert(&wall, node(NodeKind::Door)).unwrap();
    let window = g.insert(&wall, node(NodeKind::Window)).unwrap();

    let removed = g.delete(&level);
    assert_eq!(removed.len(), 4);

    for id in [&level, &wall, &door, &window] {
        assert!(g.get(id).is_none());
    }
    assert!(g.children_of(&building).is_empty());
}

#[test]
fn delete_keeps_lookups_consistent_for_remaining_nodes() {
    let (mut g, _, _, level) = scaffold();
    let a = g.insert(&level, node(NodeKind::Wall)).unwrap();
    let b = g.insert(&level, node(NodeKind::Column)).unwrap();
    let c = g.insert(&level, node(NodeKind::Wall)).unwrap();
    let door = g.insert(&a, node(NodeKind::Door)).unwrap();

    // Removing a mid-storage subtree must not invalidate any surviving lookup.
    g.delete(&a);

    assert!(g.get(&a).is_none());
    assert!(g.get(&door).is_none());
    assert_eq!(g.get(&b).unwrap().id, b);
    assert_eq!(g.get(&c).unwrap().id, c);
    assert_eq!(g.children_of(&level), &[b.clone(), c.clone()]);

    // And the graph keeps accepting writes against the surviving nodes.
    let d = g.insert(&level, node(NodeKind::Wall)).unwrap();
    assert_eq!(g.children_of(&level), &[b, c, d]);
}

#[test]
fn delete_of_absent_id_is_a_noop() {
    let (mut g, _, _, _) = scaffold();
    let before = g.len();
    assert!(g.delete("wall-nope").is_empty());
    assert_eq!(g.len(), before);
}

#[test]
fn ancestors_walk_rootward_and_restart() {
    let (mut g, site, building, level) = scaffold();
    let wall = g.insert(&level, node(NodeKind::Wall)).unwrap();
    let door = g.insert(&wall, node(NodeKind::Door)).unwrap();

    let chain: Vec<&str> = g.ancestors(&door).map(|n| n.id.as_str()).collect();
    assert_eq!(chain, vec![&wall, &level, &building, &site]);

    // Restartable: a second walk observes current state, not a shared cursor.
    let again: Vec<&str> = g.ancestors(&door).map(|n| n.id.as_str()).collect();
    assert_eq!(again, chain);
}

#[test]
fn kind_queries_are_scoped() {
    let (mut g, _, building, level) = scaffold();
    let other_level = g.insert(&building, node(NodeKind::Level)).unwrap();
    let zone_a = g.insert(&level, node(NodeKind::Zone)).unwrap();
    let zone_b = g.insert(&other_level, node(NodeKind::Zone)).unwrap();

    assert_eq!(g.nodes_of_kind(NodeKind::Zone).len(), 2);

    let on_level: Vec<&str> = g
        .nodes_of_kind_under(&level, NodeKind::Zone)
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(on_level, vec![zone_a.as_str()]);

    let on_other: Vec<&str> = g
        .nodes_of_kind_under(&other_level, NodeKind::Zone)
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(on_other, vec![zone_b.as_str()]);
}
