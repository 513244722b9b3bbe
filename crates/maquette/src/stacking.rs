//! Vertical elevation stacking.
//!
//! Nodes positioned directly against their level's baseline are lifted by the sibling slab's
//! thickness; ceilings additionally ride on top of the sibling walls. Nodes attached to an
//! elevated ancestor (any ancestor in the stacking set) are skipped: their attachment is
//! relative, not absolute, so they inherit elevation structurally.

use maquette_scene::{NodeKind, NodeSpec, SceneGraph};

use crate::config::EnvironmentConfig;
use crate::pipeline::{AttributePatch, Processor};

pub struct StackingProcessor;

impl Processor for StackingProcessor {
    fn name(&self) -> &'static str {
        "stacking"
    }

    fn observes(&self, kind: NodeKind) -> bool {
        kind.is_stacking()
    }

    fn process(
        &self,
        graph: &SceneGraph,
        config: &EnvironmentConfig,
        affected: &[String],
    ) -> Vec<AttributePatch> {
        let mut patches = Vec::new();
        for id in affected {
            let Some(node) = graph.get(id) else {
                continue;
            };
            if has_elevated_ancestor(graph, id) {
                continue;
            }

            let slab_thickness = sibling_slab_thickness(graph, id);
            let elevation = match node.kind() {
                NodeKind::Ceiling => {
                    slab_thickness.unwrap_or(0.0) + sibling_wall_height(graph, id, config)
                }
                _ => slab_thickness.unwrap_or(0.0),
            };

            if (elevation - node.derived.elevation).abs() > f64::EPSILON {
                patches.push(AttributePatch::elevation(id.clone(), elevation));
            }
        }
        patches
    }
}

/// True when the rootward walk hits a stacking-kind ancestor before the first non-stacking
/// one. The walk is bounded by the graph's `MAX_DEPTH` cap, so non-termination is
/// structurally impossible.
fn has_elevated_ancestor(graph: &SceneGraph, id: &str) -> bool {
    // The walk terminates at the first non-stacking ancestor, so the immediate parent alone
    // decides the outcome.
    graph
        .ancestors(id)
        .next()
        .is_some_and(|ancestor| ancestor.kind().is_stacking())
}

/// Thickness of the first committed slab among `id`'s siblings, if any.
fn sibling_slab_thickness(graph: &SceneGraph, id: &str) -> Option<f64> {
    for sibling in graph.siblings_of(id) {
        let Some(node) = graph.get(sibling) else {
            continue;
        };
        if node.preview {
            continue;
        }
        if let NodeSpec::Slab(slab) = &node.spec {
            return Some(slab.thickness);
        }
    }
    None
}

/// Tallest committed wall among `id`'s siblings, falling back to the environment default when
/// the level has no walls yet.
fn sibling_wall_height(graph: &SceneGraph, id: &str, config: &EnvironmentConfig) -> f64 {
    let mut tallest: Option<f64> = None;
    for sibling in graph.siblings_of(id) {
        let Some(node) = graph.get(sibling) else {
            continue;
        };
        if node.preview {
            continue;
        }
        if let NodeSpec::Wall(wall) = &node.spec {
            tallest = Some(tallest.map_or(wall.height, |t: f64| t.max(wall.height)));
        }
    }
    tallest.unwrap_or_else(|| config.wall_height())
}
