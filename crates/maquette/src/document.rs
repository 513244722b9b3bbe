//! Whole-document load/save boundary.
//!
//! A scene document is the only serialization contract of the core: an environment block, a
//! tree of nodes rooted at one or more sites, and auxiliary collections referencing nodes by
//! id. Loading validates the entire document before it replaces the live graph; a document
//! that fails validation is rejected wholesale. Derived attributes are skipped on save and
//! recomputed on load, so a load/save round trip is stable.

use serde::{Deserialize, Serialize};

use maquette_scene::geom::Point3;
use maquette_scene::{Node, SceneGraph, SchemaRegistry};

use crate::config::EnvironmentConfig;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    #[serde(flatten)]
    pub node: Node,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    pub fn new(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }
}

/// Maps a zone node to the member nodes it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneMembers {
    pub zone: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

/// A saved camera view, optionally framing one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedView {
    pub name: String,
    pub position: Point3,
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub sites: Vec<DocumentNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<ZoneMembers>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<SavedView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<NamedGroup>,
}

impl SceneDocument {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let out = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(out)
    }

    /// Validates the whole document against the registry and builds a fresh graph. Errors
    /// leave no partial state behind: the caller's live graph is untouched until this returns.
    pub fn build_graph(&self, registry: SchemaRegistry) -> Result<SceneGraph> {
        let mut graph = SceneGraph::new(registry);
        for site in &self.sites {
            let id = graph.insert_root(detached(&site.node))?;
            insert_children(&mut graph, &id, &site.children)?;
        }

        for zone in &self.zones {
            require(&graph, "zones", &zone.zone)?;
            for member in &zone.members {
                require(&graph, "zones", member)?;
            }
        }
        for view in &self.views {
            if let Some(target) = &view.target {
                require(&graph, "views", target)?;
            }
        }
        for group in &self.groups {
            for member in &group.members {
                require(&graph, "groups", member)?;
            }
        }

        Ok(graph)
    }

    /// Snapshots a live graph (plus auxiliary collections) into document form. Structural
    /// links become nesting; derived attributes are dropped.
    ///
    /// Auxiliary references to nodes no longer in the graph are pruned here rather than at
    /// mutation time: deletes can be undone, and the collections are not versioned with the
    /// graph snapshots, so filtering at the snapshot boundary keeps every saved document
    /// loadable regardless of the edit history that produced it.
    pub fn from_graph(
        graph: &SceneGraph,
        environment: EnvironmentConfig,
        zones: Vec<ZoneMembers>,
        views: Vec<SavedView>,
        groups: Vec<NamedGroup>,
    ) -> Self {
        let sites = graph
            .roots()
            .iter()
            .filter_map(|id| document_node(graph, id))
            .collect();
        let zones = zones
            .into_iter()
            .filter(|z| graph.contains(&z.zone))
            .map(|mut z| {
                z.members.retain(|m| graph.contains(m));
                z
            })
            .collect();
        let views = views
            .into_iter()
            .map(|mut v| {
                if v.target.as_deref().is_some_and(|t| !graph.contains(t)) {
                    v.target = None;
                }
                v
            })
            .collect();
        let groups = groups
            .into_iter()
            .map(|mut g| {
                g.members.retain(|m| graph.contains(m));
                g
            })
            .collect();
        Self {
            environment,
            sites,
            zones,
            views,
            groups,
        }
    }
}

fn require(graph: &SceneGraph, collection: &'static str, id: &str) -> Result<()> {
    if graph.contains(id) {
        Ok(())
    } else {
        Err(Error::DanglingReference {
            collection,
            id: id.to_string(),
        })
    }
}

fn insert_children(graph: &mut SceneGraph, parent: &str, children: &[DocumentNode]) -> Result<()> {
    for child in children {
        let id = graph.insert(parent, detached(&child.node))?;
        insert_children(graph, &id, &child.children)?;
    }
    Ok(())
}

fn document_node(graph: &SceneGraph, id: &str) -> Option<DocumentNode> {
    let node = graph.get(id)?;
    let children = node
        .children
        .iter()
        .filter_map(|c| document_node(graph, c))
        .collect();
    Some(DocumentNode {
        node: detached(node),
        children,
    })
}

/// Clones a node without its structural links or derived state.
fn detached(node: &Node) -> Node {
    let mut out = node.clone();
    out.parent = None;
    out.children = Vec::new();
    out.derived = Default::default();
    out
}
