//! A board of labelled squares kept in sync with any number of views.
//!
//! The `Board` owns the canonical position. Every mutation updates the squares
//! first and then notifies each attached `View`, in the order they were
//! attached. A view draws the board as SVG under its own transform and theme,
//! and the returned future resolves once every view has finished animating.

pub mod board;
pub mod error;
pub mod fen;
pub mod labels;
pub mod mount;
pub mod piece;
pub mod placement;
pub mod square;
pub mod svg;
pub mod theme;
pub mod transform;
pub mod view;

pub use board::{Board, BoardOptions, PositionSpec, ViewLike};
pub use error::{BoardError, Result};
pub use fen::{fen_to_position, Position, FEN_START_POSITION};
pub use mount::{FileMount, MemoryMount, Mount, Target};
pub use piece::PieceSet;
pub use square::{PieceKey, Square, SquareId};
pub use theme::Theme;
pub use transform::Transform;
pub use view::{Border, LabelMode, View, ViewHandle, ViewOptions};
