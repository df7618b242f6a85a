//! Human readable labels for boards of any size.
//!
//! Columns use spreadsheet style bijective base-26 names (`a`..`z`, `aa`..`zz`,
//! `aaa`...), rows count down from the top so the bottom row is always `1`.

/// Labels for every square, every column and every row of a board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    /// One label per square, row major from the top left.
    pub squares: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<String>,
}

/// Label for a 0-based column index.
pub fn column_label(col: usize) -> String {
    let mut letters = vec![letter(col % 26)];
    let mut rest = col / 26;
    while rest > 0 {
        letters.push(letter((rest - 1) % 26));
        rest = (rest - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Label for a 0-based row index counted from the top of a board with `rows` rows.
pub fn row_label(row: usize, rows: usize) -> String {
    rows.saturating_sub(row).to_string()
}

/// Generate labels for a `columns` x `rows` board, e.g. `aa123`.
pub fn create_labels(columns: usize, rows: usize) -> Labels {
    if columns == 0 || rows == 0 {
        return Labels::default();
    }

    let column_labels: Vec<String> = (0..columns).map(column_label).collect();
    let row_labels: Vec<String> = (0..rows).map(|row| row_label(row, rows)).collect();

    let squares = (0..columns * rows)
        .map(|i| format!("{}{}", column_labels[i % columns], row_labels[i / columns]))
        .collect();

    Labels {
        squares,
        columns: column_labels,
        rows: row_labels,
    }
}

fn letter(n: usize) -> char {
    (b'a' + n as u8) as char
}
