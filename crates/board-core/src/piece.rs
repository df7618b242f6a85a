//! Piece sets and how piece keys are looked up in them.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::square::PieceKey;
use crate::theme::Theme;

/// Artwork for one piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// SVG markup drawn in the piece's own coordinate space.
    pub svg: String,
    /// Size as `[w, h]`; falls back to the set's size.
    #[serde(default)]
    pub size: Option<[f64; 2]>,
    /// Height used instead of the set's height when pawns are scaled.
    #[serde(default)]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub name: String,
    pub link: String,
    pub license: String,
}

/// A collection of piece artwork with the sizing it was drawn at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceSet {
    #[serde(default)]
    pub attribution: Option<Attribution>,
    /// The (maximum) height of a piece; pieces are scaled so this fits a square.
    pub height: f64,
    /// Default `[w, h]` for pieces without their own size.
    #[serde(default)]
    pub size: Option<[f64; 2]>,
    /// True when the artwork is already coloured and keyed by the full piece
    /// key, false when it is keyed by type and filled from the theme.
    #[serde(default, rename = "clr")]
    pub colored: bool,
    pub pieces: HashMap<String, Piece>,
}

impl PieceSet {
    pub fn from_json(json: &str) -> Result<Arc<Self>> {
        let set: PieceSet = serde_json::from_str(json)?;
        if set.height <= 0.0 {
            return Err(BoardError::Configuration(format!(
                "piece set height must be positive, got {}",
                set.height
            )));
        }
        Ok(Arc::new(set))
    }

    /// Size of a piece, falling back to the set's size and then a square of
    /// the set's height.
    pub fn piece_size(&self, piece: &Piece) -> [f64; 2] {
        piece
            .size
            .or(self.size)
            .unwrap_or([self.height, self.height])
    }

    /// Uncoloured Unicode chess glyphs filled from the theme's piece colours.
    pub fn glyphs() -> Arc<Self> {
        let glyphs = [
            ('p', '\u{265F}'),
            ('n', '\u{265E}'),
            ('b', '\u{265D}'),
            ('r', '\u{265C}'),
            ('q', '\u{265B}'),
            ('k', '\u{265A}'),
        ];
        let pieces = glyphs
            .into_iter()
            .map(|(kind, glyph)| {
                let piece = Piece {
                    svg: glyph_svg(glyph, None),
                    size: None,
                    // Pawns are drawn as large as the other pieces.
                    height: (kind == 'p').then_some(GLYPH_PAWN_HEIGHT),
                };
                (kind.to_string(), piece)
            })
            .collect();

        Arc::new(PieceSet {
            attribution: None,
            height: GLYPH_HEIGHT,
            size: Some([GLYPH_HEIGHT, GLYPH_HEIGHT]),
            colored: false,
            pieces,
        })
    }

    /// Pre-coloured Unicode glyphs: outlined white pieces, solid black pieces.
    pub fn outline_glyphs() -> Arc<Self> {
        let white = ['\u{2659}', '\u{2658}', '\u{2657}', '\u{2656}', '\u{2655}', '\u{2654}'];
        let black = ['\u{265F}', '\u{265E}', '\u{265D}', '\u{265C}', '\u{265B}', '\u{265A}'];
        let mut pieces = HashMap::new();
        for (i, kind) in ['p', 'n', 'b', 'r', 'q', 'k'].into_iter().enumerate() {
            for (color, glyph) in [('w', white[i]), ('b', black[i])] {
                let piece = Piece {
                    svg: glyph_svg(glyph, Some("#000")),
                    size: None,
                    height: (kind == 'p').then_some(GLYPH_PAWN_HEIGHT),
                };
                pieces.insert(format!("{color}{kind}"), piece);
            }
        }

        Arc::new(PieceSet {
            attribution: None,
            height: GLYPH_HEIGHT,
            size: Some([GLYPH_HEIGHT, GLYPH_HEIGHT]),
            colored: true,
            pieces,
        })
    }
}

const GLYPH_HEIGHT: f64 = 45.0;
const GLYPH_PAWN_HEIGHT: f64 = 54.0;

fn glyph_svg(glyph: char, fill: Option<&str>) -> String {
    let fill = fill.map(|f| format!(" fill=\"{f}\"")).unwrap_or_default();
    format!(
        "<text x=\"22.5\" y=\"39\" font-size=\"42\" text-anchor=\"middle\" stroke=\"#000\" stroke-width=\"0.75\"{fill}>{glyph}</text>"
    )
}

/// Artwork and fill for one piece key.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPiece<'a> {
    pub piece: &'a Piece,
    /// Fill override taken from the theme (uncoloured sets only).
    pub fill: Option<String>,
}

/// How piece keys map to artwork, chosen once per view from the piece set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceLookup {
    /// The full key names the artwork, no fill is applied.
    Colored,
    /// The key is `{color}{type}`: type names the artwork, color picks a fill.
    Colorless,
}

impl PieceLookup {
    pub fn for_set(set: &PieceSet) -> Self {
        if set.colored {
            PieceLookup::Colored
        } else {
            PieceLookup::Colorless
        }
    }

    pub fn resolve<'a>(
        self,
        set: &'a PieceSet,
        theme: &Theme,
        key: &PieceKey,
    ) -> Result<ResolvedPiece<'a>> {
        let not_found = || BoardError::PieceNotFound(key.to_string());
        match self {
            PieceLookup::Colored => {
                let piece = set.pieces.get(key.as_str()).ok_or_else(not_found)?;
                Ok(ResolvedPiece { piece, fill: None })
            }
            PieceLookup::Colorless => {
                let (color, kind) = key.split().ok_or_else(not_found)?;
                let piece = set
                    .pieces
                    .get(&kind.to_string())
                    .ok_or_else(not_found)?;
                let fill = theme.piece_fill(color).map(str::to_string);
                Ok(ResolvedPiece { piece, fill })
            }
        }
    }
}
