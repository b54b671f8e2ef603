use serde::{Deserialize, Serialize};

use crate::board::BoardGeometry;
use crate::layout::STANDARD_LAYOUT;

/// Settings for one game table: the board and the opening placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub geometry: BoardGeometry,
    /// Layout text, reloaded on every reset.
    pub layout: String,
}

impl GameConfig {
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            geometry: BoardGeometry::STANDARD,
            layout: STANDARD_LAYOUT.to_string(),
        }
    }
}
