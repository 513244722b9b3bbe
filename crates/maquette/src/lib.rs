#![forbid(unsafe_code)]

//! `maquette` is a headless scene-graph engine for interactive 3D building design.
//!
//! Design goals:
//! - a single-writer mutation cycle: validate, apply, reprocess derived attributes, snapshot
//! - edits bounded by the size of the edit, not the document (processors run over the
//!   affected closure only)
//! - deterministic, testable outputs (documents round-trip modulo recomputed derived state)
//!
//! Rendering, UI and persistence transports are external collaborators: they consume the
//! engine's public contract (ids, nodes, documents) and never hold references across a
//! mutation boundary.

pub mod bounds;
pub mod config;
pub mod document;
pub mod error;
pub mod grid;
pub mod history;
pub mod pipeline;
pub mod placement;
pub mod stacking;

pub use config::EnvironmentConfig;
pub use document::{DocumentNode, NamedGroup, SavedView, SceneDocument, ZoneMembers};
pub use error::{Error, Result};
pub use maquette_scene::{
    Attachment, BuildingSpec, CeilingSpec, ColumnSpec, Derived, GroupSpec, ItemSpec, LevelSpec,
    Node, NodeKind, NodePatch, NodeSpec, OpeningSpec, RoofSpec, SceneGraph, SchemaRegistry, Side,
    SiteSpec, SlabSpec, StairSpec, WallSpec, ZoneSpec, geom, mint_id,
};
pub use pipeline::{AttributePatch, DerivedAttr, Pipeline, Processor};
pub use placement::{Candidate, PlacementDecision};

use rustc_hash::FxHashSet;

/// The engine owns the live graph, the environment config, the processor pipeline and the
/// undo history. It is an explicitly constructed value (not an ambient singleton), so tests
/// and multi-document sessions construct as many as they need.
pub struct Engine {
    graph: SceneGraph,
    environment: EnvironmentConfig,
    pipeline: Pipeline,
    history: history::History,
    zones: Vec<ZoneMembers>,
    views: Vec<SavedView>,
    groups: Vec<NamedGroup>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_environment(EnvironmentConfig::default())
    }

    pub fn with_environment(environment: EnvironmentConfig) -> Self {
        Self {
            graph: SceneGraph::new(SchemaRegistry::new()),
            environment,
            pipeline: Pipeline::standard(),
            history: history::History::new(),
            zones: Vec::new(),
            views: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn environment(&self) -> &EnvironmentConfig {
        &self.environment
    }

    /// Registers an extra processor pass; the seam for new node kinds.
    pub fn register_processor(&mut self, processor: Box<dyn Processor>) {
        self.pipeline.push(processor);
    }

    // ---- mutation API ---------------------------------------------------------------------

    /// Inserts a root node (a site) and reprocesses its closure.
    pub fn insert_root(&mut self, node: Node) -> maquette_scene::Result<String> {
        let before = self.graph.clone();
        let id = self.graph.insert_root(node)?;
        self.commit(before, std::iter::once(id.clone()));
        Ok(id)
    }

    /// Inserts `node` as the last child of `parent_id` and reprocesses the affected closure.
    pub fn insert(&mut self, parent_id: &str, node: Node) -> maquette_scene::Result<String> {
        let before = self.graph.clone();
        let id = self.graph.insert(parent_id, node)?;
        self.commit(before, std::iter::once(id.clone()));
        Ok(id)
    }

    /// Applies a partial patch to `id` and reprocesses the affected closure.
    pub fn update(&mut self, id: &str, patch: &NodePatch) -> maquette_scene::Result<()> {
        let before = self.graph.clone();
        self.graph.update(id, patch)?;
        self.commit(before, std::iter::once(id.to_string()));
        Ok(())
    }

    /// Moves `id` under `new_parent_id` at `index`; both the old and the new sibling sets are
    /// reprocessed.
    pub fn reparent(
        &mut self,
        id: &str,
        new_parent_id: &str,
        index: usize,
    ) -> maquette_scene::Result<()> {
        let before = self.graph.clone();
        let old_parent = self
            .graph
            .get(id)
            .and_then(|n| n.parent.clone());
        self.graph.reparent(id, new_parent_id, index)?;

        let mut seeds = vec![id.to_string()];
        if let Some(old_parent) = old_parent {
            seeds.extend(self.graph.children_of(&old_parent).to_vec());
        }
        self.commit(before, seeds);
        Ok(())
    }

    /// Deletes `id` and all descendants. Deleting an absent id is a no-op; returns the removed
    /// ids in preorder.
    pub fn delete(&mut self, id: &str) -> Vec<String> {
        if !self.graph.contains(id) {
            return Vec::new();
        }
        let before = self.graph.clone();
        let former_parent = self.graph.get(id).and_then(|n| n.parent.clone());
        let removed = self.graph.delete(id);

        let seeds = former_parent
            .map(|p| self.graph.children_of(&p).to_vec())
            .unwrap_or_default();
        self.commit(before, seeds);
        removed
    }

    /// Restores the previous committed state. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.graph.clone();
        match self.history.undo(current) {
            Some(previous) => {
                self.graph = previous;
                true
            }
            None => false,
        }
    }

    /// Re-applies the state undone last. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = self.graph.clone();
        match self.history.redo(current) {
            Some(next) => {
                self.graph = next;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- read accessors -------------------------------------------------------------------

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.graph.get(id)
    }

    pub fn ancestors<'a>(&'a self, id: &str) -> maquette_scene::Ancestors<'a> {
        self.graph.ancestors(id)
    }

    pub fn children_of(&self, id: &str) -> &[String] {
        self.graph.children_of(id)
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.graph.nodes_of_kind(kind)
    }

    /// All zone nodes within the subtree of a level.
    pub fn zones_on_level(&self, level_id: &str) -> Vec<&Node> {
        self.graph.nodes_of_kind_under(level_id, NodeKind::Zone)
    }

    /// Gates a hosted element's requested host-local position. Advisory: tools consult it
    /// before committing an insert; the graph itself does not enforce it.
    pub fn can_place(
        &self,
        host_id: &str,
        candidate: &Candidate,
    ) -> maquette_scene::Result<PlacementDecision> {
        let Some(host) = self.graph.get(host_id) else {
            return Err(maquette_scene::Error::NotFound {
                id: host_id.to_string(),
            });
        };
        let Some(wall) = host.spec.as_wall() else {
            return Err(maquette_scene::Error::SchemaViolation {
                kind: host.kind(),
                message: "placement host must be a wall".to_string(),
            });
        };
        let host_len = grid::wall_length_units(wall, self.environment.tile_size());
        Ok(placement::can_place(&self.graph, host_id, host_len, candidate))
    }

    // ---- document boundary ----------------------------------------------------------------

    /// Replaces the live graph with a validated document. Rejection leaves the prior state
    /// unchanged; success recomputes all derived attributes and drops the edit history.
    pub fn load_document(&mut self, document: &SceneDocument) -> Result<()> {
        let graph = document.build_graph(SchemaRegistry::new())?;

        self.graph = graph;
        self.environment = document.environment.clone();
        self.zones = document.zones.clone();
        self.views = document.views.clone();
        self.groups = document.groups.clone();
        self.history.clear();

        let all: Vec<String> = self.graph.iter().map(|n| n.id.clone()).collect();
        self.pipeline.run(&mut self.graph, &self.environment, &all);
        tracing::debug!(nodes = all.len(), "document loaded");
        Ok(())
    }

    /// Snapshots the live state into document form (derived attributes dropped).
    pub fn save_document(&self) -> SceneDocument {
        SceneDocument::from_graph(
            &self.graph,
            self.environment.clone(),
            self.zones.clone(),
            self.views.clone(),
            self.groups.clone(),
        )
    }

    // ---- internals ------------------------------------------------------------------------

    /// Second phase of every committed mutation: expand the touched seeds to their closure,
    /// run the pipeline, then record the pre-mutation state for undo. Runs only after the
    /// structural mutation has already succeeded, so external readers never observe a partial
    /// state.
    fn commit(&mut self, before: SceneGraph, seeds: impl IntoIterator<Item = String>) {
        let affected = self.affected_closure(seeds);
        self.pipeline.run(&mut self.graph, &self.environment, &affected);
        self.history.record(before);
        tracing::debug!(affected = affected.len(), "mutation committed");
    }

    /// Mutated nodes plus their sibling sets and subtrees, deduplicated, in first-seen order.
    fn affected_closure(&self, seeds: impl IntoIterator<Item = String>) -> Vec<String> {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut out: Vec<String> = Vec::new();
        let mut push = |id: String, seen: &mut FxHashSet<String>, out: &mut Vec<String>| {
            if seen.insert(id.clone()) {
                out.push(id);
            }
        };

        for seed in seeds {
            for id in self.graph.descendants(&seed) {
                push(id, &mut seen, &mut out);
            }
            for sibling in self.graph.siblings_of(&seed) {
                push(sibling.to_string(), &mut seen, &mut out);
            }
        }
        out
    }
}
