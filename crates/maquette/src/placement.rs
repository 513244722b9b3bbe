//! Placement gating for grid-positioned children of linear hosts.
//!
//! The check is advisory: it gates tool placement (and drives preview-invalid rendering), it
//! is not a structural invariant of `insert`. Callers that bypass it can write overlapping
//! children; the graph stays well-formed either way.

use maquette_scene::{SceneGraph, Side};

/// Required width of a hosted element in grid units when the tool does not override it.
pub const DEFAULT_ELEMENT_WIDTH: f64 = 2.0;

/// Hosted elements need this much clearance from either host endpoint.
pub const ENDPOINT_CLEARANCE: f64 = 1.0;

/// Representative points this far apart or closer count as coincident.
pub const COINCIDENCE_TOLERANCE: f64 = 0.01;

/// A not-yet-committed hosted element: center offset along the host axis (grid units),
/// required width, and the wall face it occupies (`None` affects both faces, e.g. doors).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub offset: f64,
    pub width: f64,
    pub side: Option<Side>,
}

impl Candidate {
    pub fn new(offset: f64) -> Self {
        Self {
            offset,
            width: DEFAULT_ELEMENT_WIDTH,
            side: None,
        }
    }

    pub fn on_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementDecision {
    Accepted,
    /// Center is within one grid unit of a host endpoint.
    EndpointClearance,
    /// Two or more representative points coincide with a committed sibling's.
    Overlap { sibling: String },
}

impl PlacementDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PlacementDecision::Accepted)
    }
}

/// Decides whether `candidate` may occupy its requested host-local position on the host with
/// id `host_id` and length `host_len_units` (grid units). Preview siblings are ignored.
pub fn can_place(
    graph: &SceneGraph,
    host_id: &str,
    host_len_units: f64,
    candidate: &Candidate,
) -> PlacementDecision {
    if candidate.offset < ENDPOINT_CLEARANCE || candidate.offset > host_len_units - ENDPOINT_CLEARANCE
    {
        return PlacementDecision::EndpointClearance;
    }

    let cand_points = representative_points(candidate.offset, candidate.width);
    for child_id in graph.children_of(host_id) {
        let Some(child) = graph.get(child_id) else {
            continue;
        };
        if child.preview {
            continue;
        }
        let Some((offset, width, side)) = child.spec.hosted_extent() else {
            continue;
        };

        // Opposite explicit faces of the same wall cannot physically conflict. An unset side
        // means the element affects both faces, so the check always applies.
        if let (Some(a), Some(b)) = (candidate.side, side) {
            if a != b {
                continue;
            }
        }

        let sibling_points = representative_points(offset, width);
        if shared_point_count(&cand_points, &sibling_points) >= 2 {
            return PlacementDecision::Overlap {
                sibling: child.id.clone(),
            };
        }
    }

    PlacementDecision::Accepted
}

/// Center plus the two half-width endpoints along the host axis.
fn representative_points(center: f64, width: f64) -> [f64; 3] {
    let half = width / 2.0;
    [center - half, center, center + half]
}

/// One shared point is touching (permitted); two or more is an overlap.
fn shared_point_count(a: &[f64; 3], b: &[f64; 3]) -> usize {
    a.iter()
        .filter(|p| b.iter().any(|q| (*p - q).abs() <= COINCIDENCE_TOLERANCE))
        .count()
}
