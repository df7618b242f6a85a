//! The logical board and the protocol it uses to keep views in step.
//!
//! A `Board` owns the canonical squares. Every mutation updates the squares
//! first, then notifies each attached view in the order they were attached, and
//! finally waits until every view reports that its visual update has finished.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{join_all, BoxFuture};
use tracing::debug;
use validator::Validate;

use crate::error::{BoardError, Result};
use crate::fen::{self, Position};
use crate::labels::create_labels;
use crate::mount::Target;
use crate::square::{PieceKey, Square, SquareId};
use crate::view::{View, ViewHandle, ViewOptions};

/// Resolves when a view has finished showing a change.
pub type Completion = BoxFuture<'static, ()>;

/// A view as seen by the board it is attached to.
pub type SharedObserver = Arc<Mutex<dyn ViewLike>>;

/// Data provided to `ViewLike::on_move_piece`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePiecePayload {
    pub from: usize,
    pub to: usize,
}

/// Data provided to `ViewLike::on_set_piece`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPiecePayload {
    pub index: usize,
    pub piece: Option<PieceKey>,
    pub previous: Option<PieceKey>,
}

/// Data provided to `ViewLike::on_set_position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPositionPayload {
    /// Squares to change; `None` clears the square.
    pub entries: Vec<(usize, Option<PieceKey>)>,
    /// Stop at the first unknown piece instead of skipping it.
    pub strict: bool,
}

/// Something that renders a board and is told about every change to it.
///
/// Notifications run synchronously and return a `Completion` for the visual
/// transition they started; the board has already been updated when they run.
pub trait ViewLike: Send {
    fn on_move_piece(&mut self, payload: &MovePiecePayload) -> Completion;

    fn on_set_piece(&mut self, payload: &SetPiecePayload) -> Result<Completion>;

    fn on_set_position(&mut self, payload: &SetPositionPayload) -> Result<Completion>;
}

/// A position to set on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionSpec {
    /// `(index, piece)` pairs applied on top of the current position.
    Pairs(Position),
    /// A placement string describing the whole board.
    Fen(String),
    /// The standard chess starting position.
    Standard,
}

impl From<Position> for PositionSpec {
    fn from(pairs: Position) -> Self {
        PositionSpec::Pairs(pairs)
    }
}

impl From<&str> for PositionSpec {
    fn from(fen: &str) -> Self {
        PositionSpec::Fen(fen.to_string())
    }
}

impl From<String> for PositionSpec {
    fn from(fen: String) -> Self {
        PositionSpec::Fen(fen)
    }
}

/// `true` requests the standard starting position.
impl From<bool> for PositionSpec {
    fn from(standard: bool) -> Self {
        if standard {
            PositionSpec::Standard
        } else {
            PositionSpec::Pairs(Position::new())
        }
    }
}

/// Options for `Board::with_options`.
#[derive(Debug, Validate)]
pub struct BoardOptions {
    #[validate(range(min = 0))]
    pub columns: i64,
    #[validate(range(min = 0))]
    pub rows: i64,
    /// Attach a view rendered into this target.
    pub target: Option<Target>,
    /// Options for the view attached with `target`; a view is attached when
    /// either is given.
    pub view: Option<ViewOptions>,
    /// Initial position, applied before the view is attached.
    pub position: Option<PositionSpec>,
    /// Propagate unknown pieces from `set_position` instead of skipping them.
    pub strict: bool,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 8,
            target: None,
            view: None,
            position: None,
            strict: false,
        }
    }
}

/// An n x m board.
pub struct Board {
    columns: usize,
    rows: usize,
    /// Row major from the top left.
    squares: Vec<Square>,
    label_to_index: HashMap<String, usize>,
    col_labels: Vec<String>,
    row_labels: Vec<String>,
    views: Vec<SharedObserver>,
    primary_view: Option<ViewHandle>,
    strict: bool,
}

impl Default for Board {
    fn default() -> Self {
        Board::build(8, 8)
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("squares", &self.squares)
            .field("views", &self.views.len())
            .finish()
    }
}

/// Largest number of squares a board may have.
pub const MAX_SQUARES: usize = 1 << 16;

impl Board {
    /// Create an empty board with no views.
    pub fn new(columns: usize, rows: usize) -> Result<Self> {
        match columns.checked_mul(rows) {
            Some(squares) if squares <= MAX_SQUARES => {}
            _ => {
                return Err(BoardError::Configuration(format!(
                    "a {columns} x {rows} board is larger than {MAX_SQUARES} squares"
                )))
            }
        }
        Ok(Board::build(columns, rows))
    }

    /// Create a board, optionally with an initial position and an attached view.
    pub fn with_options(options: BoardOptions) -> Result<Self> {
        options.validate()?;
        let BoardOptions {
            columns,
            rows,
            target,
            view,
            position,
            strict,
        } = options;

        let columns = usize::try_from(columns)
            .map_err(|_| BoardError::Configuration(format!("invalid columns {columns}")))?;
        let rows = usize::try_from(rows)
            .map_err(|_| BoardError::Configuration(format!("invalid rows {rows}")))?;

        let mut board = Board::new(columns, rows)?;
        board.strict = strict;

        if let Some(position) = position {
            let entries = board.position_entries(position)?;
            board.apply_entries(&entries);
        }

        if target.is_some() || view.is_some() {
            let mut view_options = view.unwrap_or_default();
            if target.is_some() {
                view_options.target = target;
            }
            let handle = View::create(&mut board, view_options)?;
            board.primary_view = Some(handle);
        }

        Ok(board)
    }

    fn build(columns: usize, rows: usize) -> Self {
        let labels = create_labels(columns, rows);
        let squares: Vec<Square> = labels.squares.into_iter().map(Square::new).collect();
        let label_to_index = squares
            .iter()
            .enumerate()
            .map(|(i, square)| (square.label().to_string(), i))
            .collect();

        Board {
            columns,
            rows,
            squares,
            label_to_index,
            col_labels: labels.columns,
            row_labels: labels.rows,
            views: Vec::new(),
            primary_view: None,
            strict: false,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// `[columns, rows]`.
    pub fn dims(&self) -> [usize; 2] {
        [self.columns, self.rows]
    }

    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// The view created by `with_options`, if any.
    pub fn primary_view(&self) -> Option<&ViewHandle> {
        self.primary_view.as_ref()
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Occupied squares as `(index, piece)`.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &PieceKey)> {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(i, square)| square.piece.as_ref().map(|piece| (i, piece)))
    }

    /// Resolve a label, index or `[col, row]` pair to a flat index.
    pub fn get_index(&self, square: impl Into<SquareId>) -> Result<usize> {
        let id = square.into();
        let index = match &id {
            SquareId::Label(label) => self.label_to_index.get(label).copied(),
            SquareId::Index(index) => Some(*index).filter(|&i| i < self.squares.len()),
            SquareId::Coords(col, row) => {
                (*col < self.columns && *row < self.rows).then(|| row * self.columns + col)
            }
        };
        index.ok_or_else(|| BoardError::UnknownSquare(id.to_string()))
    }

    pub fn get_piece(&self, square: impl Into<SquareId>) -> Result<Option<&PieceKey>> {
        let index = self.get_index(square)?;
        Ok(self.squares[index].piece.as_ref())
    }

    /// Label of the square at `index`.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.squares.get(index).map(Square::label)
    }

    /// Attach an observer. Views created with `View::create` attach themselves.
    pub fn attach(&mut self, view: SharedObserver) {
        self.views.push(view);
    }

    /// Move whatever is on `from` to `to`, returning the piece it displaced.
    ///
    /// Moving a square to itself changes nothing but still waits for every
    /// view to spend one move duration, which callers use as a pause.
    pub async fn move_piece(
        &mut self,
        from: impl Into<SquareId>,
        to: impl Into<SquareId>,
    ) -> Result<Option<PieceKey>> {
        let from = self.get_index(from)?;
        let to = self.get_index(to)?;

        let displaced = match self.squares[from].piece.take() {
            Some(piece) => self.squares[to].piece.replace(piece),
            None => None,
        };
        // A move onto itself took the piece and put it straight back.
        let displaced = if from == to { None } else { displaced };

        debug!(from, to, views = self.views.len(), "move piece");
        let payload = MovePiecePayload { from, to };
        self.notify(|view| Ok(view.on_move_piece(&payload)))
            .settle()
            .await?;

        Ok(displaced)
    }

    /// Put `piece` on a square, or clear it with `None`, returning what was there.
    pub async fn set_piece(
        &mut self,
        square: impl Into<SquareId>,
        piece: Option<PieceKey>,
    ) -> Result<Option<PieceKey>> {
        let index = self.get_index(square)?;
        let previous = std::mem::replace(&mut self.squares[index].piece, piece.clone());

        debug!(index, piece = ?piece, views = self.views.len(), "set piece");
        let payload = SetPiecePayload {
            index,
            piece,
            previous: previous.clone(),
        };
        self.notify(|view| view.on_set_piece(&payload))
            .settle()
            .await?;

        Ok(previous)
    }

    /// Shorthand for `set_piece(square, Some(piece))`.
    pub async fn place(
        &mut self,
        square: impl Into<SquareId>,
        piece: impl Into<PieceKey>,
    ) -> Result<Option<PieceKey>> {
        self.set_piece(square, Some(piece.into())).await
    }

    /// Shorthand for `set_piece(square, None)`.
    pub async fn remove(&mut self, square: impl Into<SquareId>) -> Result<Option<PieceKey>> {
        self.set_piece(square, None).await
    }

    /// Apply a position.
    ///
    /// Placement strings describe the whole board so squares they leave empty
    /// are cleared; `(index, piece)` pairs only touch the squares they name.
    /// Unknown pieces are skipped by views unless the board is strict.
    pub async fn set_position(&mut self, position: impl Into<PositionSpec>) -> Result<()> {
        let entries = self.position_entries(position.into())?;
        self.apply_entries(&entries);

        debug!(entries = entries.len(), views = self.views.len(), "set position");
        let payload = SetPositionPayload {
            entries,
            strict: self.strict,
        };
        self.notify(|view| view.on_set_position(&payload))
            .settle()
            .await
    }

    /// Remove every piece.
    pub async fn clear(&mut self) -> Result<()> {
        let entries: Vec<(usize, Option<PieceKey>)> =
            self.occupied().map(|(index, _)| (index, None)).collect();
        self.apply_entries(&entries);

        debug!(cleared = entries.len(), views = self.views.len(), "clear");
        let payload = SetPositionPayload {
            entries,
            strict: self.strict,
        };
        self.notify(|view| view.on_set_position(&payload))
            .settle()
            .await
    }

    /// Placement string for the current occupancy.
    pub fn to_fen(&self) -> Option<String> {
        fen::encode_placement(self)
    }

    /// Turn a position into square changes, checking every index first so a
    /// position that does not fit changes nothing.
    fn position_entries(&self, position: PositionSpec) -> Result<Vec<(usize, Option<PieceKey>)>> {
        let (pairs, whole_board) = match position {
            PositionSpec::Pairs(pairs) => (pairs, false),
            PositionSpec::Fen(placement) => (fen::fen_to_position(&placement), true),
            PositionSpec::Standard => (fen::start_position(), true),
        };

        if let Some((index, _)) = pairs.iter().find(|(index, _)| *index >= self.squares.len()) {
            return Err(BoardError::UnknownSquare(SquareId::Index(*index).to_string()));
        }

        let mut entries: Vec<(usize, Option<PieceKey>)> = Vec::with_capacity(pairs.len());
        if whole_board {
            let placed: HashSet<usize> = pairs.iter().map(|(index, _)| *index).collect();
            entries.extend(
                self.occupied()
                    .filter(|(index, _)| !placed.contains(index))
                    .map(|(index, _)| (index, None)),
            );
        }
        entries.extend(pairs.into_iter().map(|(index, piece)| (index, Some(piece))));

        Ok(entries)
    }

    fn apply_entries(&mut self, entries: &[(usize, Option<PieceKey>)]) {
        for (index, piece) in entries {
            self.squares[*index].piece = piece.clone();
        }
    }

    /// Run a notification on every view in attachment order.
    fn notify<F>(&self, mut notify: F) -> Notification
    where
        F: FnMut(&mut dyn ViewLike) -> Result<Completion>,
    {
        let mut notification = Notification {
            completions: Vec::with_capacity(self.views.len()),
            error: None,
        };
        for view in &self.views {
            let mut view = view.lock().unwrap_or_else(PoisonError::into_inner);
            match notify(&mut *view) {
                Ok(completion) => notification.completions.push(completion),
                Err(e) => {
                    notification.error.get_or_insert(e);
                }
            }
        }
        notification
    }
}

/// The outstanding work of one notification round.
struct Notification {
    completions: Vec<Completion>,
    /// The first error reported by a view.
    error: Option<BoardError>,
}

impl Notification {
    /// Wait for every view, then report the first error if there was one.
    async fn settle(self) -> Result<()> {
        join_all(self.completions).await;
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_board() {
        let board = Board::default();
        assert_eq!(board.dims(), [8, 8]);
        assert_eq!(board.squares().len(), 64);
        assert_eq!(board.label(0), Some("a8"));
        assert_eq!(board.label(63), Some("h1"));
    }

    #[test]
    fn test_labels_map_to_indices() {
        let board = Board::new(3, 7).unwrap();
        for (i, square) in board.squares().iter().enumerate() {
            assert_eq!(board.get_index(square.label()).unwrap(), i);
        }
        assert_eq!(board.get_index("a1").unwrap(), 18);
        assert_eq!(board.get_index("c7").unwrap(), 2);
    }

    #[test]
    fn test_get_index_forms_agree() {
        let board = Board::default();
        let by_label = board.get_index("e4").unwrap();
        assert_eq!(by_label, 36);
        assert_eq!(board.get_index(36usize).unwrap(), by_label);
        assert_eq!(board.get_index([4usize, 4]).unwrap(), by_label);
    }

    #[test]
    fn test_unknown_squares() {
        let board = Board::default();
        assert!(matches!(board.get_index("z9"), Err(BoardError::UnknownSquare(_))));
        assert!(matches!(board.get_index(64usize), Err(BoardError::UnknownSquare(_))));
        assert!(matches!(board.get_index([8usize, 0]), Err(BoardError::UnknownSquare(_))));
    }

    #[test]
    fn test_empty_boards_are_allowed() {
        let board = Board::new(0, 5).unwrap();
        assert!(board.squares().is_empty());
        assert!(board.col_labels().is_empty());
        assert!(board.row_labels().is_empty());
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        let options = BoardOptions {
            columns: -1,
            ..Default::default()
        };
        assert!(matches!(
            Board::with_options(options),
            Err(BoardError::Configuration(_))
        ));
        assert!(matches!(
            Board::new(usize::MAX, 2),
            Err(BoardError::Configuration(_))
        ));
    }

    #[test]
    fn test_initial_position_option() {
        let board = Board::with_options(BoardOptions {
            columns: 3,
            rows: 3,
            position: Some("rnb/3/RNB".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(board.occupied().count(), 6);
        assert_eq!(board.get_piece("a3").unwrap(), Some(&PieceKey::from("br")));
        assert_eq!(board.get_piece("c1").unwrap(), Some(&PieceKey::from("wb")));
        assert!(board.primary_view().is_none());
        assert_eq!(board.to_fen().as_deref(), Some("rnb/3/RNB"));
    }

    #[test]
    fn test_position_that_does_not_fit_changes_nothing() {
        let result = Board::with_options(BoardOptions {
            columns: 2,
            rows: 2,
            position: Some("kk/kk/k".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(BoardError::UnknownSquare(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_without_views() {
        let mut board = Board::default();
        board.place("e2", "wp").await.unwrap();
        board.place("e4", "bp").await.unwrap();
        let displaced = board.move_piece("e2", "e4").await.unwrap();
        assert_eq!(displaced, Some(PieceKey::from("bp")));
        assert_eq!(board.get_piece("e2").unwrap(), None);
        assert_eq!(board.get_piece("e4").unwrap(), Some(&PieceKey::from("wp")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_from_empty_square_changes_nothing() {
        let mut board = Board::default();
        board.place("e4", "bp").await.unwrap();
        let displaced = board.move_piece("e2", "e4").await.unwrap();
        assert_eq!(displaced, None);
        assert_eq!(board.get_piece("e4").unwrap(), Some(&PieceKey::from("bp")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_piece_returns_previous() {
        let mut board = Board::default();
        assert_eq!(board.place("d1", "wq").await.unwrap(), None);
        assert_eq!(
            board.place("d1", "wk").await.unwrap(),
            Some(PieceKey::from("wq"))
        );
        assert_eq!(board.remove("d1").await.unwrap(), Some(PieceKey::from("wk")));
        assert_eq!(board.remove("d1").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_digit_runs_on_a_standard_board() {
        let mut board = Board::default();
        board.set_position("44Q").await.unwrap();
        assert_eq!(board.get_piece("a7").unwrap().map(PieceKey::as_str), Some("wq"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wide_board_placement_round_trips() {
        let mut board = Board::new(12, 2).unwrap();
        board.place("l2", "bk").await.unwrap();
        board.place("c1", "wn").await.unwrap();
        let fen = board.to_fen().unwrap();
        assert_eq!(fen, "92k/2N9");

        let mut copy = Board::new(12, 2).unwrap();
        copy.set_position(fen.as_str()).await.unwrap();
        assert_eq!(copy.to_fen().as_deref(), Some("92k/2N9"));
        assert_eq!(copy.occupied().count(), 2);
    }

    #[test]
    fn test_oversized_board_rejected() {
        assert!(matches!(
            Board::new(1 << 31, 1 << 31),
            Err(BoardError::Configuration(_))
        ));
        assert!(matches!(
            Board::new(usize::MAX, 2),
            Err(BoardError::Configuration(_))
        ));
        assert!(Board::new(256, 256).is_ok());
        assert!(matches!(
            Board::new(257, 256),
            Err(BoardError::Configuration(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fen_replaces_and_pairs_overlay() {
        let mut board = Board::default();
        board.place("e4", "wq").await.unwrap();
        board.set_position(true).await.unwrap();
        assert_eq!(board.occupied().count(), 32);
        assert_eq!(board.get_piece("e4").unwrap(), None);

        let e4 = board.get_index("e4").unwrap();
        board
            .set_position(vec![(e4, PieceKey::from("wq"))])
            .await
            .unwrap();
        assert_eq!(board.occupied().count(), 33);

        board.clear().await.unwrap();
        assert_eq!(board.occupied().count(), 0);
    }
}
