//! Parent-frame bounding boxes for the solid level elements.
//!
//! Boxes are derived (recomputed, never persisted): renderers and hit-testing read them, but
//! the node's structural position stays the source of truth.

use maquette_scene::geom::{Aabb, point3};
use maquette_scene::{NodeKind, NodeSpec, SceneGraph};

use crate::config::EnvironmentConfig;
use crate::pipeline::{AttributePatch, Processor};

pub struct BoundsProcessor;

impl Processor for BoundsProcessor {
    fn name(&self) -> &'static str {
        "bounds"
    }

    fn observes(&self, kind: NodeKind) -> bool {
        matches!(kind, NodeKind::Wall | NodeKind::Slab | NodeKind::Column)
    }

    fn process(
        &self,
        graph: &SceneGraph,
        _config: &EnvironmentConfig,
        affected: &[String],
    ) -> Vec<AttributePatch> {
        let mut patches = Vec::new();
        for id in affected {
            let Some(node) = graph.get(id) else {
                continue;
            };
            let z0 = node.derived.elevation + node.position.z;
            let bounds = match &node.spec {
                NodeSpec::Wall(w) => {
                    let half = w.thickness / 2.0;
                    let min_x = w.start.x.min(w.end.x) - half + node.position.x;
                    let max_x = w.start.x.max(w.end.x) + half + node.position.x;
                    let min_y = w.start.y.min(w.end.y) - half + node.position.y;
                    let max_y = w.start.y.max(w.end.y) + half + node.position.y;
                    Some(Aabb::new(
                        point3(min_x, min_y, z0),
                        point3(max_x, max_y, z0 + w.height),
                    ))
                }
                NodeSpec::Slab(s) => Some(Aabb::new(
                    point3(node.position.x, node.position.y, z0),
                    point3(
                        node.position.x + s.size.width,
                        node.position.y + s.size.height,
                        z0 + s.thickness,
                    ),
                )),
                NodeSpec::Column(c) => Some(Aabb::new(
                    point3(node.position.x - c.radius, node.position.y - c.radius, z0),
                    point3(
                        node.position.x + c.radius,
                        node.position.y + c.radius,
                        z0 + c.height,
                    ),
                )),
                _ => None,
            };

            if bounds != node.derived.bounds {
                patches.push(AttributePatch::bounds(id.clone(), bounds));
            }
        }
        patches
    }
}
