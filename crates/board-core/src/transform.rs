//! Coordinate transformations: the symmetries of a rectangle.
//!
//! Every transform maps a `[col, row]` coordinate on a board of `[width, height]`
//! (the dimensions of the untransformed board) to a coordinate in the view.
//! Transforms that swap axes produce a `[height, width]` view.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// A `[col, row]` coordinate, or a `[width, height]` pair of dimensions.
pub type Coordinates = [usize; 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transform {
    /// Rotate 180 degrees.
    #[serde(rename = "rotate")]
    Rotate,
    /// Rotate 90 degrees anticlockwise.
    #[serde(rename = "rotateL")]
    RotateL,
    /// Rotate 90 degrees clockwise.
    #[serde(rename = "rotateR")]
    RotateR,
    /// Mirror left to right.
    #[serde(rename = "flipH")]
    FlipH,
    /// Mirror top to bottom.
    #[serde(rename = "flipV")]
    FlipV,
    /// Reflect in the diagonal from the top left to the bottom right.
    #[serde(rename = "flipD", alias = "flipBR")]
    FlipD,
    /// Reflect in the diagonal from the bottom left to the top right.
    #[serde(rename = "transpose", alias = "flipBL")]
    Transpose,
}

impl Transform {
    pub const ALL: [Transform; 7] = [
        Transform::Rotate,
        Transform::RotateL,
        Transform::RotateR,
        Transform::FlipH,
        Transform::FlipV,
        Transform::FlipD,
        Transform::Transpose,
    ];

    /// Map `[col, row]` on a board of `dims` to view coordinates, or `None`
    /// when `xy` lies outside the board.
    pub fn apply(self, dims: Coordinates, xy: Coordinates) -> Option<Coordinates> {
        let [w, h] = dims;
        let [col, row] = xy;
        if col >= w || row >= h {
            return None;
        }
        Some(match self {
            Transform::Rotate => [w - col - 1, h - row - 1],
            Transform::RotateR => [h - row - 1, col],
            Transform::RotateL => [row, w - col - 1],
            Transform::FlipV => [col, h - row - 1],
            Transform::FlipH => [w - col - 1, row],
            Transform::Transpose => [h - row - 1, w - col - 1],
            Transform::FlipD => [row, col],
        })
    }

    /// True if the transform turns a `w x h` board into an `h x w` view.
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Transform::RotateL | Transform::RotateR | Transform::Transpose | Transform::FlipD
        )
    }

    /// Dimensions of the view produced from a board of `dims`.
    pub fn view_dims(self, dims: Coordinates) -> Coordinates {
        if self.swaps_axes() {
            [dims[1], dims[0]]
        } else {
            dims
        }
    }

    /// The transform that undoes this one when applied with `view_dims(dims)`.
    pub fn inverse(self) -> Transform {
        match self {
            Transform::RotateL => Transform::RotateR,
            Transform::RotateR => Transform::RotateL,
            other => other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Transform::Rotate => "rotate",
            Transform::RotateL => "rotateL",
            Transform::RotateR => "rotateR",
            Transform::FlipH => "flipH",
            Transform::FlipV => "flipV",
            Transform::FlipD => "flipD",
            Transform::Transpose => "transpose",
        }
    }
}

/// Apply an optional transform; `None` is the identity.
pub fn apply(
    transform: Option<Transform>,
    dims: Coordinates,
    xy: Coordinates,
) -> Option<Coordinates> {
    match transform {
        Some(t) => t.apply(dims, xy),
        None => (xy[0] < dims[0] && xy[1] < dims[1]).then_some(xy),
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rotate" => Ok(Transform::Rotate),
            "rotateL" => Ok(Transform::RotateL),
            "rotateR" => Ok(Transform::RotateR),
            "flipH" => Ok(Transform::FlipH),
            "flipV" => Ok(Transform::FlipV),
            "flipD" | "flipBR" => Ok(Transform::FlipD),
            "transpose" | "flipBL" => Ok(Transform::Transpose),
            other => Err(BoardError::Configuration(format!(
                "unknown transform '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_coordinate(dims: Coordinates) -> impl Iterator<Item = Coordinates> {
        (0..dims[1]).flat_map(move |row| (0..dims[0]).map(move |col| [col, row]))
    }

    #[test]
    fn test_rotate_right() {
        assert_eq!(Transform::RotateR.apply([5, 3], [2, 1]), Some([1, 2]));
    }

    #[test]
    fn test_corner_mappings() {
        let dims = [3, 7];
        assert_eq!(Transform::Rotate.apply(dims, [0, 0]), Some([2, 6]));
        assert_eq!(Transform::RotateR.apply(dims, [0, 0]), Some([6, 0]));
        assert_eq!(Transform::RotateL.apply(dims, [0, 0]), Some([0, 2]));
        assert_eq!(Transform::FlipH.apply(dims, [0, 0]), Some([2, 0]));
        assert_eq!(Transform::FlipV.apply(dims, [0, 0]), Some([0, 6]));
        assert_eq!(Transform::FlipD.apply(dims, [1, 5]), Some([5, 1]));
        assert_eq!(Transform::Transpose.apply(dims, [0, 0]), Some([6, 2]));
    }

    #[test]
    fn test_results_stay_inside_the_view() {
        for dims in [[3, 7], [8, 8], [1, 4]] {
            for t in Transform::ALL {
                let [vw, vh] = t.view_dims(dims);
                for xy in every_coordinate(dims) {
                    let [c, r] = t.apply(dims, xy).unwrap();
                    assert!(c < vw && r < vh, "{t} moved {xy:?} outside {dims:?}");
                }
            }
        }
    }

    #[test]
    fn test_inverse_restores_every_coordinate() {
        for dims in [[3, 7], [8, 8], [5, 2]] {
            for t in Transform::ALL {
                let view_dims = t.view_dims(dims);
                for xy in every_coordinate(dims) {
                    let there = t.apply(dims, xy).unwrap();
                    assert_eq!(t.inverse().apply(view_dims, there), Some(xy), "{t} on {dims:?}");
                }
            }
        }
    }

    #[test]
    fn test_rotate_twice_is_identity() {
        let dims = [4, 6];
        for xy in every_coordinate(dims) {
            let once = Transform::Rotate.apply(dims, xy).unwrap();
            assert_eq!(Transform::Rotate.apply(dims, once), Some(xy));
        }
    }

    #[test]
    fn test_rotate_left_then_right_is_identity() {
        let dims = [4, 6];
        for xy in every_coordinate(dims) {
            let left = Transform::RotateL.apply(dims, xy).unwrap();
            assert_eq!(Transform::RotateR.apply([6, 4], left), Some(xy));
        }
    }

    #[test]
    fn test_outside_the_board_has_no_image() {
        for t in Transform::ALL {
            assert_eq!(t.apply([0, 0], [0, 0]), None, "{t}");
            assert_eq!(t.apply([3, 0], [1, 0]), None, "{t}");
            assert_eq!(t.apply([3, 7], [3, 0]), None, "{t}");
            assert_eq!(t.apply([3, 7], [0, 7]), None, "{t}");
        }
        assert_eq!(apply(None, [3, 7], [3, 0]), None);
        assert_eq!(apply(None, [3, 7], [2, 6]), Some([2, 6]));
    }

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("flipBR".parse::<Transform>().ok(), Some(Transform::FlipD));
        assert_eq!("flipBL".parse::<Transform>().ok(), Some(Transform::Transpose));
        for t in Transform::ALL {
            assert_eq!(t.name().parse::<Transform>().ok(), Some(t));
        }
        assert!("spin".parse::<Transform>().is_err());
    }
}
