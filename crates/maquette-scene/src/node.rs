//! Typed architectural node model.
//!
//! Every node couples a kind-agnostic base (id, name, transform, visibility, metadata) with a
//! closed, kind-specific payload (`NodeSpec`). Keeping the payload a closed enum means adding a
//! node kind is a compile-time-checked change in this file plus a registry entry.

use crate::geom::{Aabb, Point2, Point3, Size2, Vector3};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed enumeration of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Site,
    Building,
    Level,
    Wall,
    Slab,
    Column,
    Roof,
    Stair,
    Door,
    Window,
    Item,
    Ceiling,
    Zone,
    Group,
}

impl NodeKind {
    pub const ALL: [NodeKind; 14] = [
        NodeKind::Site,
        NodeKind::Building,
        NodeKind::Level,
        NodeKind::Wall,
        NodeKind::Slab,
        NodeKind::Column,
        NodeKind::Roof,
        NodeKind::Stair,
        NodeKind::Door,
        NodeKind::Window,
        NodeKind::Item,
        NodeKind::Ceiling,
        NodeKind::Zone,
        NodeKind::Group,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Site => "site",
            NodeKind::Building => "building",
            NodeKind::Level => "level",
            NodeKind::Wall => "wall",
            NodeKind::Slab => "slab",
            NodeKind::Column => "column",
            NodeKind::Roof => "roof",
            NodeKind::Stair => "stair",
            NodeKind::Door => "door",
            NodeKind::Window => "window",
            NodeKind::Item => "item",
            NodeKind::Ceiling => "ceiling",
            NodeKind::Zone => "zone",
            NodeKind::Group => "group",
        }
    }

    /// Kinds that participate in vertical elevation stacking.
    pub fn is_stacking(self) -> bool {
        matches!(
            self,
            NodeKind::Wall
                | NodeKind::Column
                | NodeKind::Slab
                | NodeKind::Item
                | NodeKind::Stair
                | NodeKind::Ceiling
        )
    }

    /// Kinds positioned along a linear host's local axis in grid units.
    pub fn is_grid_hosted(self) -> bool {
        matches!(self, NodeKind::Door | NodeKind::Window | NodeKind::Item)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which face of a wall a hosted element occupies. Elements without a side (doors by default)
/// affect both faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

/// How a furnishing item attaches to its surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Attachment {
    Wall,
    WallSide,
    Ceiling,
    #[default]
    None,
}

fn default_wall_thickness() -> f64 {
    0.2
}

fn default_wall_height() -> f64 {
    2.5
}

fn default_material() -> String {
    "plaster".to_string()
}

fn default_interior_side() -> Side {
    Side::Front
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub start: Point2,
    pub end: Point2,
    #[serde(default = "default_wall_thickness")]
    pub thickness: f64,
    #[serde(default = "default_wall_height")]
    pub height: f64,
    #[serde(default = "default_material")]
    pub inner_material: String,
    #[serde(default = "default_material")]
    pub outer_material: String,
    #[serde(default = "default_interior_side")]
    pub interior_side: Side,
}

impl WallSpec {
    pub fn length(&self) -> f64 {
        (self.end - self.start).length()
    }

    /// Unit vector from `start` to `end`; zero-length walls fall back to +x.
    pub fn axis(&self) -> crate::geom::Vector2 {
        let d = self.end - self.start;
        let len = d.length();
        if len <= f64::EPSILON {
            euclid::vec2(1.0, 0.0)
        } else {
            d / len
        }
    }
}

fn default_slab_thickness() -> f64 {
    0.2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabSpec {
    pub size: Size2,
    #[serde(default = "default_slab_thickness")]
    pub thickness: f64,
}

fn default_column_radius() -> f64 {
    0.15
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    #[serde(default = "default_column_radius")]
    pub radius: f64,
    #[serde(default = "default_wall_height")]
    pub height: f64,
}

fn default_roof_pitch() -> f64 {
    30.0
}

fn default_roof_overhang() -> f64 {
    0.3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoofSpec {
    #[serde(default = "default_roof_pitch")]
    pub pitch: f64,
    #[serde(default = "default_roof_overhang")]
    pub overhang: f64,
}

fn default_stair_steps() -> u32 {
    16
}

fn default_stair_rise() -> f64 {
    0.18
}

fn default_stair_run() -> f64 {
    0.28
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StairSpec {
    #[serde(default = "default_stair_steps")]
    pub steps: u32,
    #[serde(default = "default_stair_rise")]
    pub rise: f64,
    #[serde(default = "default_stair_run")]
    pub run: f64,
}

fn default_ceiling_thickness() -> f64 {
    0.1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeilingSpec {
    #[serde(default = "default_ceiling_thickness")]
    pub thickness: f64,
}

fn default_opening_width() -> f64 {
    2.0
}

/// Door/window payload. `offset` is the center position along the host wall's axis in grid
/// units; hosted elements are stored host-local so wall edits do not rewrite them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningSpec {
    pub offset: f64,
    #[serde(default = "default_opening_width")]
    pub width: f64,
    #[serde(default)]
    pub side: Option<Side>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    #[serde(default)]
    pub attach: Attachment,
    #[serde(default)]
    pub side: Option<Side>,
    #[serde(default)]
    pub offset: f64,
    #[serde(default = "default_opening_width")]
    pub width: f64,
}

fn default_site_extent() -> Size2 {
    crate::geom::size2(100.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSpec {
    #[serde(default = "default_site_extent")]
    pub extent: Size2,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BuildingSpec {}

fn default_level_height() -> f64 {
    3.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    #[serde(default = "default_level_height")]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneSpec {
    #[serde(default)]
    pub area: Vec<Point2>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupSpec {}

/// Kind-specific payload. The `kind` tag doubles as the node's kind discriminant in the
/// document format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeSpec {
    Site(SiteSpec),
    Building(BuildingSpec),
    Level(LevelSpec),
    Wall(WallSpec),
    Slab(SlabSpec),
    Column(ColumnSpec),
    Roof(RoofSpec),
    Stair(StairSpec),
    Door(OpeningSpec),
    Window(OpeningSpec),
    Item(ItemSpec),
    Ceiling(CeilingSpec),
    Zone(ZoneSpec),
    Group(GroupSpec),
}

impl NodeSpec {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeSpec::Site(_) => NodeKind::Site,
            NodeSpec::Building(_) => NodeKind::Building,
            NodeSpec::Level(_) => NodeKind::Level,
            NodeSpec::Wall(_) => NodeKind::Wall,
            NodeSpec::Slab(_) => NodeKind::Slab,
            NodeSpec::Column(_) => NodeKind::Column,
            NodeSpec::Roof(_) => NodeKind::Roof,
            NodeSpec::Stair(_) => NodeKind::Stair,
            NodeSpec::Door(_) => NodeKind::Door,
            NodeSpec::Window(_) => NodeKind::Window,
            NodeSpec::Item(_) => NodeKind::Item,
            NodeSpec::Ceiling(_) => NodeKind::Ceiling,
            NodeSpec::Zone(_) => NodeKind::Zone,
            NodeSpec::Group(_) => NodeKind::Group,
        }
    }

    pub fn as_wall(&self) -> Option<&WallSpec> {
        match self {
            NodeSpec::Wall(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_slab(&self) -> Option<&SlabSpec> {
        match self {
            NodeSpec::Slab(s) => Some(s),
            _ => None,
        }
    }

    /// Host-local placement of a grid-hosted payload: `(center offset, width, side)`.
    pub fn hosted_extent(&self) -> Option<(f64, f64, Option<Side>)> {
        match self {
            NodeSpec::Door(o) | NodeSpec::Window(o) => Some((o.offset, o.width, o.side)),
            NodeSpec::Item(i) => Some((i.offset, i.width, i.side)),
            _ => None,
        }
    }
}

/// Derived attributes, recomputed by the processor pipeline. Never persisted as authoritative
/// state: the document format skips them and load recomputes them from structure.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Derived {
    pub elevation: f64,
    pub bounds: Option<Aabb>,
}

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

fn is_true(b: &bool) -> bool {
    *b
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Atomic element of the scene graph.
///
/// Structural links (`parent`, `children`) are owned by the graph and excluded from
/// serialization; the document format nests children instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub spec: NodeSpec,
    #[serde(default = "Point3::origin")]
    pub position: Point3,
    #[serde(default = "Vector3::zero")]
    pub rotation: Vector3,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub visible: bool,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub preview: bool,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
    #[serde(skip)]
    pub parent: Option<String>,
    #[serde(skip)]
    pub children: Vec<String>,
    #[serde(skip)]
    pub derived: Derived,
}

impl Node {
    /// Creates a node with a freshly minted kind-prefixed id and base defaults.
    pub fn new(spec: NodeSpec) -> Self {
        let id = mint_id(spec.kind());
        Self::with_id(id, spec)
    }

    pub fn with_id(id: impl Into<String>, spec: NodeSpec) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            spec,
            position: Point3::origin(),
            rotation: Vector3::zero(),
            visible: true,
            opacity: 1.0,
            preview: false,
            meta: Map::new(),
            parent: None,
            children: Vec::new(),
            derived: Derived::default(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn at(mut self, position: Point3) -> Self {
        self.position = position;
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.spec.kind()
    }
}

/// Mints a globally unique, kind-prefixed identifier (`wall-9f3a…`). The prefix exists for
/// debuggability; uniqueness comes from the uuid suffix.
pub fn mint_id(kind: NodeKind) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", kind.as_str(), &suffix[..12])
}

/// Partial update applied by `SceneGraph::update`. Absent fields are untouched. A `spec`
/// replacement must keep the node's kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub position: Option<Point3>,
    #[serde(default)]
    pub rotation: Option<Vector3>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub spec: Option<NodeSpec>,
    #[serde(default)]
    pub meta: Option<Map<String, Value>>,
}

impl NodePatch {
    pub fn position(position: Point3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn spec(spec: NodeSpec) -> Self {
        Self {
            spec: Some(spec),
            ..Self::default()
        }
    }
}
