//! Environment configuration block carried by scene documents.
//!
//! Stored as a raw JSON value with dotted-path accessors so unknown keys written by other
//! tools survive a load/save round trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_WALL_HEIGHT: f64 = 2.5;
pub const DEFAULT_GRID_SIZE: u32 = 200;
pub const DEFAULT_TILE_SIZE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig(Value);

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl EnvironmentConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.get(dotted_path)?.as_f64()
    }

    pub fn get_u64(&self, dotted_path: &str) -> Option<u64> {
        self.get(dotted_path)?.as_u64()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Callers can construct a config from any JSON value via `from_value`. Environment
        // blocks are objects; coerce a non-object here so this API never panics on user input.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let entry = cur
                .entry(seg.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            let Value::Object(next) = entry else {
                return;
            };
            cur = next;
        }
    }

    /// Default wall height used when a level has no wall sibling to stack a ceiling against.
    pub fn wall_height(&self) -> f64 {
        self.get_f64("wall.height").unwrap_or(DEFAULT_WALL_HEIGHT)
    }

    /// Number of tiles per grid side.
    pub fn grid_size(&self) -> u32 {
        self.get_u64("grid.size")
            .map(|v| v as u32)
            .unwrap_or(DEFAULT_GRID_SIZE)
    }

    /// World-space edge length of one grid tile.
    pub fn tile_size(&self) -> f64 {
        self.get_f64("grid.tile_size").unwrap_or(DEFAULT_TILE_SIZE)
    }
}
