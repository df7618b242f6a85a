//! The demo boards.

use anyhow::Context;
use board_core::{
    Board, BoardOptions, Border, LabelMode, PieceSet, Target, Theme, Transform, View, ViewOptions,
};
use rand::seq::SliceRandom;
use tracing::info;

use crate::config::DemoConfig;

/// Knight's tour of a 3x7 board, starting on a1 and ending on b6.
const KNIGHTS_TOUR: [&str; 20] = [
    "c2", "b4", "c6", "a7", "b5", "c7", "a6", "c5", "b7", "a5", "b3", "c1", "a2", "c3", "b1",
    "a3", "c4", "b2", "a4", "b6",
];

const FOOLS_MATE: [(&str, &str); 4] = [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")];

fn view_options(config: &DemoConfig, name: &str) -> ViewOptions {
    ViewOptions {
        theme: Theme {
            size: config.square_size,
            ..Theme::default()
        },
        border: Border::Default,
        move_duration: config.move_duration,
        target: Some(Target::Path(config.out_path(name))),
        ..Default::default()
    }
}

pub async fn knights_tour(config: &DemoConfig) -> anyhow::Result<()> {
    let mut board = Board::with_options(BoardOptions {
        columns: 3,
        rows: 7,
        view: Some(ViewOptions {
            transform: Some(Transform::Transpose),
            ..view_options(config, "knights-tour")
        }),
        ..Default::default()
    })?;

    board.place("a1", "wn").await?;
    let mut from = "a1";
    for to in KNIGHTS_TOUR {
        board.move_piece(from, to).await?;
        from = to;
    }

    info!(square = from, fen = ?board.to_fen(), "knight's tour finished");
    Ok(())
}

/// The same position drawn once under every transform.
pub async fn transform_gallery(config: &DemoConfig) -> anyhow::Result<()> {
    let mut board = Board::new(3, 7)?;
    board.set_position("rnb/3/3/3/3/3/NBR").await?;

    for transform in Transform::ALL {
        View::create(
            &mut board,
            ViewOptions {
                transform: Some(transform),
                ..view_options(config, &format!("transform-{transform}"))
            },
        )?;
    }
    View::create(&mut board, view_options(config, "transform-none"))?;

    // Every view redraws the move.
    board.move_piece("a1", "b3").await?;
    info!(views = board.view_count(), "transform gallery written");
    Ok(())
}

pub async fn fools_mate(config: &DemoConfig) -> anyhow::Result<()> {
    let mut board = Board::with_options(BoardOptions {
        position: Some(true.into()),
        view: Some(ViewOptions {
            pieces: PieceSet::outline_glyphs(),
            ..view_options(config, "fools-mate")
        }),
        ..Default::default()
    })?;

    for (from, to) in FOOLS_MATE {
        board.move_piece(from, to).await?;
    }
    let fen = board.to_fen().context("board has no placement string")?;
    info!(%fen, "fool's mate played");

    // Hold the mate for a move before clearing.
    board.move_piece("h4", "h4").await?;
    board.clear().await?;

    let cleared = View::create(
        &mut board,
        ViewOptions {
            labels: LabelMode::Inside,
            ..view_options(config, "fools-mate-cleared")
        },
    )?;
    let drawn = cleared
        .lock()
        .map(|view| view.visuals().len())
        .unwrap_or_default();
    info!(pieces = drawn, "board cleared");
    Ok(())
}

/// Queens on an n x n board, none attacking another. Rows are tried in a
/// random order so each run finds a different solution.
pub async fn n_queens(config: &DemoConfig) -> anyhow::Result<()> {
    let n = config.queens;
    let rows = solve_queens(n).with_context(|| format!("no solution for {n} queens"))?;

    let mut board = Board::with_options(BoardOptions {
        columns: i64::try_from(n)?,
        rows: i64::try_from(n)?,
        view: Some(view_options(config, "n-queens")),
        ..Default::default()
    })?;

    for (col, row) in rows.into_iter().enumerate() {
        board.place((col, row), "wq").await?;
    }

    info!(n, fen = ?board.to_fen(), "queens placed");
    Ok(())
}

/// Row of the queen in each column.
fn solve_queens(n: usize) -> Option<Vec<usize>> {
    let mut rng = rand::thread_rng();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut rng);

    let mut rows = Vec::with_capacity(n);
    place_queen(n, &order, &mut rows).then_some(rows)
}

fn place_queen(n: usize, order: &[usize], rows: &mut Vec<usize>) -> bool {
    let col = rows.len();
    if col == n {
        return true;
    }
    for &row in order {
        let safe = rows
            .iter()
            .enumerate()
            .all(|(c, &r)| r != row && r.abs_diff(row) != col - c);
        if safe {
            rows.push(row);
            if place_queen(n, order, rows) {
                return true;
            }
            rows.pop();
        }
    }
    false
}
