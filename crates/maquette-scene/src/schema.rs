//! Node schema registry: the single source of truth for what a valid graph looks like.
//!
//! The registry owns three concerns: per-kind attribute validation, the parent/child
//! containment table, and default construction for omitted attributes. Both the graph and the
//! processors consult it; no other component duplicates schema knowledge.

use crate::error::{Error, Result};
use crate::geom::{point2, size2};
use crate::node::{
    BuildingSpec, CeilingSpec, ColumnSpec, GroupSpec, ItemSpec, LevelSpec, Node, NodeKind,
    NodeSpec, OpeningSpec, RoofSpec, SiteSpec, SlabSpec, StairSpec, WallSpec, ZoneSpec,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Kinds that may appear at the root of the forest.
    pub fn can_root(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Site
    }

    /// Pure containment lookup used by `insert` and `reparent`.
    pub fn can_contain(&self, parent: NodeKind, child: NodeKind) -> bool {
        permitted_children(parent).contains(&child)
    }

    pub fn permitted_children(&self, parent: NodeKind) -> &'static [NodeKind] {
        permitted_children(parent)
    }

    /// Validates a node's kind-specific attributes. Invalid input is always reported, never
    /// coerced; defaults apply only to fields omitted at construction time.
    pub fn validate(&self, node: &Node) -> Result<()> {
        let kind = node.kind();
        if node.id.is_empty() {
            return violation(kind, "node id must not be empty");
        }
        if !(0.0..=1.0).contains(&node.opacity) {
            return violation(kind, "opacity must be within [0, 1]");
        }
        if !node.position.x.is_finite()
            || !node.position.y.is_finite()
            || !node.position.z.is_finite()
        {
            return violation(kind, "position must be finite");
        }

        match &node.spec {
            NodeSpec::Site(s) => {
                if s.extent.width <= 0.0 || s.extent.height <= 0.0 {
                    return violation(kind, "site extent must be positive");
                }
            }
            NodeSpec::Building(_) | NodeSpec::Group(_) => {}
            NodeSpec::Level(l) => {
                if l.height <= 0.0 {
                    return violation(kind, "level height must be positive");
                }
            }
            NodeSpec::Wall(w) => {
                if w.thickness <= 0.0 {
                    return violation(kind, "wall thickness must be positive");
                }
                if w.height <= 0.0 {
                    return violation(kind, "wall height must be positive");
                }
                for p in [w.start, w.end] {
                    if !p.x.is_finite() || !p.y.is_finite() {
                        return violation(kind, "wall endpoints must be finite");
                    }
                }
            }
            NodeSpec::Slab(s) => {
                if s.thickness <= 0.0 {
                    return violation(kind, "slab thickness must be positive");
                }
                if s.size.width <= 0.0 || s.size.height <= 0.0 {
                    return violation(kind, "slab size must be positive");
                }
            }
            NodeSpec::Column(c) => {
                if c.radius <= 0.0 {
                    return violation(kind, "column radius must be positive");
                }
                if c.height <= 0.0 {
                    return violation(kind, "column height must be positive");
                }
            }
            NodeSpec::Roof(r) => {
                if !(0.0..=90.0).contains(&r.pitch) {
                    return violation(kind, "roof pitch must be within [0, 90] degrees");
                }
                if r.overhang < 0.0 {
                    return violation(kind, "roof overhang must not be negative");
                }
            }
            NodeSpec::Stair(s) => {
                if s.steps == 0 {
                    return violation(kind, "stair must have at least one step");
                }
                if s.rise <= 0.0 || s.run <= 0.0 {
                    return violation(kind, "stair rise and run must be positive");
                }
            }
            NodeSpec::Door(o) | NodeSpec::Window(o) => {
                if o.width <= 0.0 {
                    return violation(kind, "opening width must be positive");
                }
                if !o.offset.is_finite() || o.offset < 0.0 {
                    return violation(kind, "opening offset must be a non-negative grid position");
                }
            }
            NodeSpec::Item(i) => {
                if i.width <= 0.0 {
                    return violation(kind, "item width must be positive");
                }
                if !i.offset.is_finite() {
                    return violation(kind, "item offset must be finite");
                }
            }
            NodeSpec::Ceiling(c) => {
                if c.thickness <= 0.0 {
                    return violation(kind, "ceiling thickness must be positive");
                }
            }
            NodeSpec::Zone(z) => {
                for p in &z.area {
                    if !p.x.is_finite() || !p.y.is_finite() {
                        return violation(kind, "zone area points must be finite");
                    }
                }
            }
        }

        Ok(())
    }

    /// Fills base attributes a tool may omit at creation time. Kind payload defaults are the
    /// serde field defaults on `NodeSpec`; this only covers the non-payload base.
    pub fn fill_defaults(&self, node: &mut Node) {
        if node.name.is_empty() {
            node.name = node.kind().as_str().to_string();
        }
    }

    /// Default payload construction for a kind, used by creation tools.
    pub fn default_spec(&self, kind: NodeKind) -> NodeSpec {
        match kind {
            NodeKind::Site => NodeSpec::Site(SiteSpec {
                extent: size2(100.0, 100.0),
            }),
            NodeKind::Building => NodeSpec::Building(BuildingSpec {}),
            NodeKind::Level => NodeSpec::Level(LevelSpec { height: 3.0 }),
            NodeKind::Wall => NodeSpec::Wall(WallSpec {
                start: point2(0.0, 0.0),
                end: point2(1.0, 0.0),
                thickness: 0.2,
                height: 2.5,
                inner_material: "plaster".to_string(),
                outer_material: "plaster".to_string(),
                interior_side: crate::node::Side::Front,
            }),
            NodeKind::Slab => NodeSpec::Slab(SlabSpec {
                size: size2(1.0, 1.0),
                thickness: 0.2,
            }),
            NodeKind::Column => NodeSpec::Column(ColumnSpec {
                radius: 0.15,
                height: 2.5,
            }),
            NodeKind::Roof => NodeSpec::Roof(RoofSpec {
                pitch: 30.0,
                overhang: 0.3,
            }),
            NodeKind::Stair => NodeSpec::Stair(StairSpec {
                steps: 16,
                rise: 0.18,
                run: 0.28,
            }),
            NodeKind::Door => NodeSpec::Door(OpeningSpec {
                offset: 0.0,
                width: 2.0,
                side: None,
            }),
            NodeKind::Window => NodeSpec::Window(OpeningSpec {
                offset: 0.0,
                width: 2.0,
                side: None,
            }),
            NodeKind::Item => NodeSpec::Item(ItemSpec {
                attach: crate::node::Attachment::None,
                side: None,
                offset: 0.0,
                width: 2.0,
            }),
            NodeKind::Ceiling => NodeSpec::Ceiling(CeilingSpec { thickness: 0.1 }),
            NodeKind::Zone => NodeSpec::Zone(ZoneSpec::default()),
            NodeKind::Group => NodeSpec::Group(GroupSpec {}),
        }
    }
}

fn violation<T>(kind: NodeKind, message: &str) -> Result<T> {
    Err(Error::SchemaViolation {
        kind,
        message: message.to_string(),
    })
}

fn permitted_children(parent: NodeKind) -> &'static [NodeKind] {
    match parent {
        NodeKind::Site => &[NodeKind::Building, NodeKind::Item],
        NodeKind::Building => &[NodeKind::Level],
        NodeKind::Level => &[
            NodeKind::Wall,
            NodeKind::Slab,
            NodeKind::Column,
            NodeKind::Roof,
            NodeKind::Stair,
            NodeKind::Ceiling,
            NodeKind::Zone,
            NodeKind::Group,
            NodeKind::Item,
        ],
        NodeKind::Wall => &[NodeKind::Door, NodeKind::Window, NodeKind::Item],
        NodeKind::Ceiling => &[NodeKind::Item],
        NodeKind::Group => &[
            NodeKind::Wall,
            NodeKind::Slab,
            NodeKind::Column,
            NodeKind::Roof,
            NodeKind::Stair,
            NodeKind::Ceiling,
            NodeKind::Item,
            NodeKind::Group,
        ],
        NodeKind::Slab
        | NodeKind::Column
        | NodeKind::Roof
        | NodeKind::Stair
        | NodeKind::Door
        | NodeKind::Window
        | NodeKind::Item
        | NodeKind::Zone => &[],
    }
}
