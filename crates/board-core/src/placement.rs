//! Where a piece sits inside its square.
//!
//! Pieces are centred horizontally and stand on a baseline shared by the whole
//! set, so a short piece keeps its feet where a tall one would.

use crate::piece::{Piece, PieceSet};
use crate::svg::num;

/// Scale and offset of a piece relative to the top left of its square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    /// Compute the placement of `piece` from `set` in a square of size `sq`.
    ///
    /// With `scale_pawns` a piece's own height replaces the set height when
    /// scaling, and the piece is anchored to the bottom of the set's baseline box.
    pub fn resolve(set: &PieceSet, piece: &Piece, sq: f64, scale_pawns: bool) -> Self {
        let [w, h] = set.piece_size(piece);
        let height = if scale_pawns {
            piece.height.unwrap_or(set.height)
        } else {
            set.height
        };
        let scale = sq / height;
        let baseline_scale = sq / set.height;

        let offset_x = (sq - w * scale) / 2.0;
        let offset_y = if scale_pawns {
            (sq + h * baseline_scale) / 2.0 - h * scale
        } else {
            (sq - h * baseline_scale) / 2.0
        };

        Placement {
            scale,
            offset_x,
            offset_y,
        }
    }

    /// The SVG transform placing the piece in a square whose top left is
    /// `[left, top]`.
    pub fn transform(&self, [left, top]: [f64; 2]) -> String {
        format!(
            "translate({} {}) scale({})",
            num(left + self.offset_x),
            num(top + self.offset_y),
            num(self.scale)
        )
    }
}
