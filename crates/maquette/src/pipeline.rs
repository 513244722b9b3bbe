//! Derived-attribute processor pipeline.
//!
//! Processors compute attributes that are functions of graph structure rather than of direct
//! user input. Each pass reads the graph and emits `(node id, attribute)` patches; the
//! pipeline applies them as a second phase, so passes never mutate the graph re-entrantly.
//! Passes run synchronously, in declared order, over exactly the affected node set (never the
//! whole graph), keeping interactive edits bounded by the size of the edit.

use maquette_scene::geom::Aabb;
use maquette_scene::{NodeKind, SceneGraph};

use crate::config::EnvironmentConfig;

/// One derived attribute for one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DerivedAttr {
    Elevation(f64),
    Bounds(Option<Aabb>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributePatch {
    pub id: String,
    pub attr: DerivedAttr,
}

impl AttributePatch {
    pub fn elevation(id: impl Into<String>, elevation: f64) -> Self {
        Self {
            id: id.into(),
            attr: DerivedAttr::Elevation(elevation),
        }
    }

    pub fn bounds(id: impl Into<String>, bounds: Option<Aabb>) -> Self {
        Self {
            id: id.into(),
            attr: DerivedAttr::Bounds(bounds),
        }
    }
}

pub trait Processor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Node kinds this processor reacts to. The pipeline filters the affected set before
    /// calling `process`.
    fn observes(&self, kind: NodeKind) -> bool;

    /// Computes patches for the affected nodes. Read-only access to the whole graph; must not
    /// error on well-formed graphs.
    fn process(
        &self,
        graph: &SceneGraph,
        config: &EnvironmentConfig,
        affected: &[String],
    ) -> Vec<AttributePatch>;
}

pub struct Pipeline {
    processors: Vec<Box<dyn Processor>>,
}

impl Pipeline {
    pub fn empty() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// The built-in pass order: vertical stacking first (bounds depend on elevation).
    pub fn standard() -> Self {
        let mut p = Self::empty();
        p.push(Box::new(crate::stacking::StackingProcessor));
        p.push(Box::new(crate::bounds::BoundsProcessor));
        p
    }

    /// Registers an additional pass after the existing ones. This is the seam by which new
    /// node kinds contribute derived attributes without touching the graph engine.
    pub fn push(&mut self, processor: Box<dyn Processor>) {
        self.processors.push(processor);
    }

    /// Runs every pass over the affected set and writes the resulting patches back.
    pub fn run(&self, graph: &mut SceneGraph, config: &EnvironmentConfig, affected: &[String]) {
        for processor in &self.processors {
            let relevant: Vec<String> = affected
                .iter()
                .filter(|id| {
                    graph
                        .get(id)
                        .is_some_and(|n| processor.observes(n.kind()))
                })
                .cloned()
                .collect();
            if relevant.is_empty() {
                continue;
            }
            let patches = processor.process(graph, config, &relevant);
            if !patches.is_empty() {
                tracing::debug!(
                    processor = processor.name(),
                    patches = patches.len(),
                    "applying derived-attribute patches"
                );
            }
            for patch in patches {
                let Some(node) = graph.get(&patch.id) else {
                    continue;
                };
                let mut derived = node.derived;
                match patch.attr {
                    DerivedAttr::Elevation(e) => derived.elevation = e,
                    DerivedAttr::Bounds(b) => derived.bounds = b,
                }
                graph.set_derived(&patch.id, derived);
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}
