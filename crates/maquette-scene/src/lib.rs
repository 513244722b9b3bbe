#![forbid(unsafe_code)]

//! Scene graph data structures for maquette.
//!
//! Design goals:
//! - a strongly validated, hierarchical document of architectural nodes
//! - stable string identifiers as the only cross-component reference
//! - structural invariants (id uniqueness, forest acyclicity, bidirectional parent/child
//!   agreement) enforced at mutation time, never repaired after the fact

pub mod error;
pub mod geom;
pub mod graph;
pub mod node;
pub mod schema;

pub use error::{Error, Result};
pub use graph::{Ancestors, MAX_DEPTH, SceneGraph};
pub use node::{
    Attachment, BuildingSpec, CeilingSpec, ColumnSpec, Derived, GroupSpec, ItemSpec, LevelSpec,
    Node, NodeKind, NodePatch, NodeSpec, OpeningSpec, RoofSpec, Side, SiteSpec, SlabSpec,
    StairSpec, WallSpec, ZoneSpec, mint_id,
};
pub use schema::SchemaRegistry;
