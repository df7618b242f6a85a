//! Colours and sizes used to draw a view.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Border width as a fraction of the square size when no explicit width is set.
pub const DEFAULT_BORDER_SIZE_FACTOR: f64 = 0.5;
/// Edge width as a fraction of the square size when no explicit width is set.
pub const DEFAULT_EDGE_SIZE_FACTOR: f64 = 0.025;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    /// Size of one square in viewBox units.
    #[validate(range(exclusive_min = 0.0))]
    pub size: f64,
    /// Border width. `None` uses `DEFAULT_BORDER_SIZE_FACTOR * size`.
    pub border_size: Option<f64>,
    /// Width of the outline around the squares. `None` uses
    /// `DEFAULT_EDGE_SIZE_FACTOR * size`, `Some(0.0)` draws no edge.
    pub edge_size: Option<f64>,
    /// Light and dark square colours.
    pub board: [String; 2],
    /// Label colours on light and dark squares.
    pub text: [String; 2],
    pub border: String,
    pub border_text: String,
    pub edge: String,
    pub font_family: String,
    /// Fill for each piece colour character (uncoloured piece sets only).
    pub pieces: HashMap<String, String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            size: 40.0,
            border_size: None,
            edge_size: None,
            board: ["#efd9b5".into(), "#b58862".into()],
            text: ["#b58862".into(), "#efd9b5".into()],
            border: "#efd9b5".into(),
            border_text: "#b58862".into(),
            edge: "#b58862".into(),
            font_family: "system-ui, sans-serif".into(),
            pieces: HashMap::from([
                ("b".to_string(), "black".to_string()),
                ("w".to_string(), "white".to_string()),
            ]),
        }
    }
}

impl Theme {
    /// Parse a (possibly partial) JSON theme; missing fields take default values.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let theme: Theme = serde_json::from_str(json)?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn default_border_width(&self) -> f64 {
        self.border_size.unwrap_or(self.size * DEFAULT_BORDER_SIZE_FACTOR)
    }

    pub fn edge_width(&self) -> f64 {
        self.edge_size.unwrap_or(self.size * DEFAULT_EDGE_SIZE_FACTOR)
    }

    /// Fill colour for a piece colour character.
    pub fn piece_fill(&self, color: char) -> Option<&str> {
        self.pieces.get(&color.to_string()).map(String::as_str)
    }
}
