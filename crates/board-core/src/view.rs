//! A rendered projection of a board.
//!
//! Each view keeps its own transform, theme and piece set, and the SVG element
//! of every piece it shows. Views never touch the board's squares; they only
//! react to the notifications the board sends them.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{self, FutureExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

use crate::board::{
    Board, Completion, MovePiecePayload, SetPiecePayload, SetPositionPayload, SharedObserver,
    ViewLike,
};
use crate::error::{BoardError, Result};
use crate::mount::{Mount, Target};
use crate::piece::{PieceLookup, PieceSet};
use crate::placement::Placement;
use crate::square::{PieceKey, SquareId};
use crate::svg::{num, Element, SVG_NS};
use crate::theme::Theme;
use crate::transform::{self, Coordinates, Transform};

/// How long a piece takes to move between squares.
pub const DEFAULT_MOVE_DURATION: Duration = Duration::from_millis(300);

/// Font size of border labels as a fraction of the border width.
const BORDER_FONT_FACTOR: f64 = 0.625;
/// Font size of labels drawn inside squares as a fraction of the square size.
const INSIDE_FONT_FACTOR: f64 = 0.25;
/// Inset of labels drawn inside squares as a fraction of the square size.
const INSIDE_INSET_FACTOR: f64 = 0.06;

pub type ViewHandle = Arc<Mutex<View>>;

/// Border around the squares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Border {
    #[default]
    None,
    /// The theme's border width.
    Default,
    /// A multiple of the square size.
    Factor(f64),
}

/// Where the column and row labels are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelMode {
    /// In the border if there is one, otherwise inside the edge squares.
    #[default]
    Auto,
    /// In the border; inside the edge squares when there is no border.
    Border,
    Inside,
    Off,
}

#[derive(Debug)]
pub struct ViewOptions {
    pub theme: Theme,
    pub pieces: Arc<PieceSet>,
    pub transform: Option<Transform>,
    pub labels: LabelMode,
    pub border: Border,
    /// Scale pieces by their own height so pawns look like pawns.
    pub scale_pawns: bool,
    pub move_duration: Duration,
    /// Fail view creation on a piece missing from the set instead of skipping it.
    pub strict: bool,
    pub target: Option<Target>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            pieces: PieceSet::glyphs(),
            transform: None,
            labels: LabelMode::Auto,
            border: Border::None,
            scale_pawns: false,
            move_duration: DEFAULT_MOVE_DURATION,
            strict: false,
            target: None,
        }
    }
}

/// Sizes in viewBox units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewDimensions {
    /// ViewBox width.
    pub vbw: f64,
    /// ViewBox height.
    pub vbh: f64,
    /// Border width.
    pub bw: f64,
    /// Edge width.
    pub ew: f64,
    /// Square size.
    pub sq: f64,
}

/// The element drawn for one piece and where it sits in its square.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceVisual {
    pub element: Element,
    pub placement: Placement,
}

/// A label for one column or row of the view.
#[derive(Debug, Clone, PartialEq)]
enum AxisLabel {
    /// Drawn above and below view column `x`.
    Column { x: usize, text: String },
    /// Drawn left and right of view row `y`.
    Row { y: usize, text: String },
}

pub struct View {
    /// `[columns, rows]` of the board this view shows.
    board_dims: Coordinates,
    /// Columns in the view, swapped from the board by some transforms.
    columns: usize,
    rows: usize,
    theme: Theme,
    pieces: Arc<PieceSet>,
    lookup: PieceLookup,
    transform: Option<Transform>,
    scale_pawns: bool,
    move_duration: Duration,
    dimensions: ViewDimensions,
    /// Border, squares, edge and labels.
    layers: Vec<Element>,
    visuals: BTreeMap<usize, PieceVisual>,
    mount: Option<Box<dyn Mount>>,
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("transform", &self.transform)
            .field("dimensions", &self.dimensions)
            .field("visuals", &self.visuals.len())
            .field("headless", &self.mount.is_none())
            .finish()
    }
}

impl View {
    /// Create a view of `board`, draw the board's current pieces and attach
    /// the view so it follows every later change.
    pub fn create(board: &mut Board, options: ViewOptions) -> Result<ViewHandle> {
        let ViewOptions {
            theme,
            pieces,
            transform,
            labels,
            border,
            scale_pawns,
            move_duration,
            strict,
            target,
        } = options;

        theme.validate()?;

        let board_dims = board.dims();
        let [columns, rows] = transform.map_or(board_dims, |t| t.view_dims(board_dims));

        let sq = theme.size;
        let bw = match border {
            Border::None => 0.0,
            Border::Default => theme.default_border_width(),
            Border::Factor(factor) if factor >= 0.0 => sq * factor,
            Border::Factor(factor) => {
                return Err(BoardError::Configuration(format!(
                    "border factor must not be negative, got {factor}"
                )))
            }
        };
        let dimensions = ViewDimensions {
            vbw: columns as f64 * sq + 2.0 * bw,
            vbh: rows as f64 * sq + 2.0 * bw,
            bw,
            ew: theme.edge_width().max(0.0),
            sq,
        };

        let mount = target.and_then(|target| match target.resolve() {
            Ok(mount) => Some(mount),
            Err(e) => {
                warn!("{e}; running headless");
                None
            }
        });

        let mut view = View {
            board_dims,
            columns,
            rows,
            lookup: PieceLookup::for_set(&pieces),
            theme,
            pieces,
            transform,
            scale_pawns,
            move_duration,
            dimensions,
            layers: Vec::new(),
            visuals: BTreeMap::new(),
            mount,
        };

        let axis_labels = view.axis_labels(board.col_labels(), board.row_labels());
        view.draw_layers(labels, &axis_labels);

        for (index, piece) in board.occupied() {
            if let Err(e) = view.set_piece(index, Some(piece)) {
                if strict {
                    return Err(e);
                }
                warn!(index, "skipping piece while drawing board: {e}");
            }
        }
        view.refresh();

        debug!(
            columns,
            rows,
            transform = ?view.transform,
            pieces = view.visuals.len(),
            "view created"
        );

        let handle = Arc::new(Mutex::new(view));
        let observer: SharedObserver = handle.clone();
        board.attach(observer);
        Ok(handle)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dimensions(&self) -> ViewDimensions {
        self.dimensions
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn transform(&self) -> Option<Transform> {
        self.transform
    }

    pub fn move_duration(&self) -> Duration {
        self.move_duration
    }

    /// True when the view is not attached to a mount.
    pub fn is_headless(&self) -> bool {
        self.mount.is_none()
    }

    /// The piece drawn on board square `index`.
    pub fn visual(&self, index: usize) -> Option<&PieceVisual> {
        self.visuals.get(&index)
    }

    /// Every piece drawn, keyed by board square index.
    pub fn visuals(&self) -> &BTreeMap<usize, PieceVisual> {
        &self.visuals
    }

    /// ViewBox coordinates of the top left of board square `index`, or
    /// `None` if the board has no such square.
    pub fn square_origin(&self, index: usize) -> Option<[f64; 2]> {
        let [width, _] = self.board_dims;
        let xy = [index.checked_rem(width)?, index / width];
        let [col, row] = transform::apply(self.transform, self.board_dims, xy)?;
        let ViewDimensions { bw, sq, .. } = self.dimensions;
        Some([bw + sq * col as f64, bw + sq * row as f64])
    }

    /// Draw `piece` on board square `index`, replacing whatever was drawn
    /// there; `None` just removes it.
    pub fn set_piece(&mut self, index: usize, piece: Option<&PieceKey>) -> Result<()> {
        let Some(key) = piece else {
            self.visuals.remove(&index);
            return Ok(());
        };

        let origin = self
            .square_origin(index)
            .ok_or_else(|| BoardError::UnknownSquare(SquareId::Index(index).to_string()))?;

        let resolved = match self.lookup.resolve(&self.pieces, &self.theme, key) {
            Ok(resolved) => resolved,
            Err(e) => {
                // Do not leave a stale piece where the board has something else.
                self.visuals.remove(&index);
                return Err(e);
            }
        };

        let placement = Placement::resolve(
            &self.pieces,
            resolved.piece,
            self.dimensions.sq,
            self.scale_pawns,
        );
        let mut element = Element::new("g")
            .attr("transform", placement.transform(origin))
            .attr("data-piece", key);
        if !self.move_duration.is_zero() {
            element.set_attr(
                "style",
                format!("transition: transform {}ms", self.move_duration.as_millis()),
            );
        }
        if let Some(fill) = &resolved.fill {
            element.set_attr("fill", fill);
        }
        let element = element.raw(resolved.piece.svg.clone());

        self.visuals.insert(index, PieceVisual { element, placement });
        Ok(())
    }

    /// The whole view as an SVG document.
    pub fn to_svg(&self) -> String {
        let ViewDimensions { vbw, vbh, .. } = self.dimensions;
        let mut root = Element::new("svg")
            .attr("xmlns", SVG_NS)
            .attr("viewBox", format!("0 0 {} {}", num(vbw), num(vbh)));
        for layer in &self.layers {
            root.push(layer.clone());
        }
        let mut pieces = Element::new("g");
        for visual in self.visuals.values() {
            pieces.push(visual.element.clone());
        }
        root.push(pieces);
        root.render()
    }

    /// Push the current document to the mount. A failing mount is dropped and
    /// the view carries on headless.
    fn refresh(&mut self) {
        if self.mount.is_none() {
            return;
        }
        let svg = self.to_svg();
        if let Some(mount) = self.mount.as_mut() {
            if let Err(e) = mount.replace_children(&svg) {
                warn!("failed to render view, detaching mount: {e}");
                self.mount = None;
            }
        }
    }

    /// Resolves after one move duration.
    fn delay(&self) -> Completion {
        let duration = self.move_duration;
        if duration.is_zero() {
            return future::ready(()).boxed();
        }
        async move { tokio::time::sleep(duration).await }.boxed()
    }

    /// Column and row labels placed through the view's transform.
    fn axis_labels(&self, col_labels: &[String], row_labels: &[String]) -> Vec<AxisLabel> {
        let swaps = self.transform.is_some_and(Transform::swaps_axes);
        let mut labels = Vec::with_capacity(col_labels.len() + row_labels.len());

        for (c, text) in col_labels.iter().enumerate() {
            let Some([x, y]) = transform::apply(self.transform, self.board_dims, [c, 0]) else {
                continue;
            };
            let text = text.clone();
            labels.push(if swaps {
                AxisLabel::Row { y, text }
            } else {
                AxisLabel::Column { x, text }
            });
        }
        for (r, text) in row_labels.iter().enumerate() {
            let Some([x, y]) = transform::apply(self.transform, self.board_dims, [0, r]) else {
                continue;
            };
            let text = text.clone();
            labels.push(if swaps {
                AxisLabel::Column { x, text }
            } else {
                AxisLabel::Row { y, text }
            });
        }

        labels
    }

    fn draw_layers(&mut self, mode: LabelMode, axis_labels: &[AxisLabel]) {
        let ViewDimensions { vbw, vbh, bw, ew, .. } = self.dimensions;

        if bw > 0.0 {
            self.layers.push(Element::new("path").attr("fill", &self.theme.border).attr(
                "d",
                format!(
                    "M0,0H{w}V{h}H0ZM{b},{b}V{hb}H{wb}V{b}H{b}",
                    w = num(vbw),
                    h = num(vbh),
                    b = num(bw),
                    hb = num(vbh - bw),
                    wb = num(vbw - bw),
                ),
            ));
        }

        let [light, dark] = self.draw_check();
        self.layers.push(light);
        self.layers.push(dark);

        if ew > 0.0 {
            self.layers.push(
                Element::new("path")
                    .attr("stroke", &self.theme.edge)
                    .attr("stroke-width", num(ew))
                    .attr("fill", "none")
                    .attr(
                        "d",
                        format!(
                            "M{b},{b}V{hb}H{wb}V{b}Z",
                            b = num(bw),
                            hb = num(vbh - bw),
                            wb = num(vbw - bw),
                        ),
                    ),
            );
        }

        let labels = match mode {
            LabelMode::Off => None,
            LabelMode::Inside => Some(self.draw_inside_labels(axis_labels)),
            LabelMode::Auto | LabelMode::Border if bw > 0.0 => {
                Some(self.draw_border_labels(axis_labels))
            }
            LabelMode::Auto | LabelMode::Border => Some(self.draw_inside_labels(axis_labels)),
        };
        if let Some(labels) = labels {
            self.layers.push(labels);
        }
    }

    /// True when view square `[col, row]` is a light square. The bottom left
    /// square is always dark.
    fn is_light(&self, col: usize, row: usize) -> bool {
        (col + row + self.rows) % 2 == 0
    }

    /// Light and dark squares as two paths.
    fn draw_check(&self) -> [Element; 2] {
        let ViewDimensions { bw, sq, .. } = self.dimensions;
        let mut light = String::new();
        let mut dark = String::new();

        for row in 0..self.rows {
            for col in 0..self.columns {
                let part = if self.is_light(col, row) {
                    &mut light
                } else {
                    &mut dark
                };
                part.push_str(&format!(
                    "M{},{}h{s}v{s}h-{s}Z",
                    num(bw + sq * col as f64),
                    num(bw + sq * row as f64),
                    s = num(sq),
                ));
            }
        }

        [
            Element::new("path").attr("fill", &self.theme.board[0]).attr("d", light),
            Element::new("path").attr("fill", &self.theme.board[1]).attr("d", dark),
        ]
    }

    fn draw_border_labels(&self, axis_labels: &[AxisLabel]) -> Element {
        let ViewDimensions { vbw, vbh, bw, sq, .. } = self.dimensions;
        let group = || {
            Element::new("g")
                .attr("text-anchor", "middle")
                .attr("dominant-baseline", "middle")
                .attr("fill", &self.theme.border_text)
        };
        let (mut top, mut bottom, mut left, mut right) = (group(), group(), group(), group());

        let y_top = bw * 0.5;
        let y_bottom = vbh - bw * 0.5;
        let x_left = bw * 0.5;
        let x_right = vbw - bw * 0.5;

        let text = |x: f64, y: f64, label: &str| {
            Element::new("text")
                .attr("x", num(x))
                .attr("y", num(y))
                .text(label)
        };

        for label in axis_labels {
            match label {
                AxisLabel::Column { x, text: label } => {
                    let x = bw + sq * (*x as f64 + 0.5);
                    top.push(text(x, y_top, label));
                    bottom.push(text(x, y_bottom, label));
                }
                AxisLabel::Row { y, text: label } => {
                    let y = bw + sq * (*y as f64 + 0.5);
                    left.push(text(x_left, y, label));
                    right.push(text(x_right, y, label));
                }
            }
        }

        Element::new("g")
            .attr("font-family", &self.theme.font_family)
            .attr("font-size", num(bw * BORDER_FONT_FACTOR))
            .child(top)
            .child(right)
            .child(bottom)
            .child(left)
    }

    /// Column labels in the bottom right corner of the bottom row, row labels
    /// in the top left corner of the left column.
    fn draw_inside_labels(&self, axis_labels: &[AxisLabel]) -> Element {
        let ViewDimensions { bw, sq, .. } = self.dimensions;
        let inset = sq * INSIDE_INSET_FACTOR;
        let bottom_row = self.rows.saturating_sub(1);
        let mut group = Element::new("g")
            .attr("font-family", &self.theme.font_family)
            .attr("font-size", num(sq * INSIDE_FONT_FACTOR));

        for label in axis_labels {
            let (col, row, element) = match label {
                AxisLabel::Column { x, text } => (
                    *x,
                    bottom_row,
                    Element::new("text")
                        .attr("x", num(bw + sq * (*x as f64 + 1.0) - inset))
                        .attr("y", num(bw + sq * self.rows as f64 - inset))
                        .attr("text-anchor", "end")
                        .text(text.as_str()),
                ),
                AxisLabel::Row { y, text } => (
                    0,
                    *y,
                    Element::new("text")
                        .attr("x", num(bw + inset))
                        .attr("y", num(bw + sq * *y as f64 + inset))
                        .attr("dominant-baseline", "hanging")
                        .text(text.as_str()),
                ),
            };
            let fill = if self.is_light(col, row) {
                &self.theme.text[0]
            } else {
                &self.theme.text[1]
            };
            group.push(element.attr("fill", fill));
        }

        group
    }
}

impl ViewLike for View {
    fn on_move_piece(&mut self, payload: &MovePiecePayload) -> Completion {
        let MovePiecePayload { from, to } = *payload;

        // Nothing changes, but the caller still waits for one move.
        if from == to {
            return self.delay();
        }

        // Nothing drawn there, or nowhere to draw it: nothing to animate.
        let Some(origin) = self.square_origin(to) else {
            return future::ready(()).boxed();
        };
        let Some(mut visual) = self.visuals.remove(&from) else {
            return future::ready(()).boxed();
        };

        self.visuals.remove(&to);
        let transform = visual.placement.transform(origin);
        visual.element.set_attr("transform", transform);
        self.visuals.insert(to, visual);
        self.refresh();

        self.delay()
    }

    fn on_set_piece(&mut self, payload: &SetPiecePayload) -> Result<Completion> {
        let result = self.set_piece(payload.index, payload.piece.as_ref());
        self.refresh();
        result.map(|()| future::ready(()).boxed())
    }

    fn on_set_position(&mut self, payload: &SetPositionPayload) -> Result<Completion> {
        for (index, piece) in &payload.entries {
            if let Err(e) = self.set_piece(*index, piece.as_ref()) {
                if payload.strict {
                    self.refresh();
                    return Err(e);
                }
                warn!(index, "skipping piece in position: {e}");
            }
        }
        self.refresh();
        Ok(future::ready(()).boxed())
    }
}
