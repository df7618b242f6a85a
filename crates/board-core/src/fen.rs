//! Forsyth-Edwards style placement strings.
//!
//! Only the placement field is used: rows from the top separated by `/`, digits
//! for runs of empty squares, letters for pieces (uppercase white, lowercase
//! black). Anything after the first space (side to move, castling...) is
//! accepted and ignored. Every digit is a run on its own, so `"93"` is twelve
//! empty squares on a board wider than nine columns.

use std::sync::LazyLock;

use regex::Regex;

use crate::board::Board;
use crate::square::PieceKey;

pub const FEN_START_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A list of `(index, piece)` pairs.
pub type Position = Vec<(usize, PieceKey)>;

/// Longest run of empty squares a single digit can describe.
const MAX_RUN: usize = 9;

static PLACEMENT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]|[^/0-9]").expect("placement token pattern is valid"));

/// Decode the placement field of a FEN string into `(index, piece)` pairs.
pub fn fen_to_position(fen: &str) -> Position {
    let placement = fen.split(' ').next().unwrap_or_default();
    let mut position = Position::new();
    let mut index = 0usize;

    for token in PLACEMENT_TOKEN.find_iter(placement) {
        let Some(c) = token.as_str().chars().next() else {
            continue;
        };
        match c.to_digit(10) {
            Some(empty) => index = index.saturating_add(empty as usize),
            None => {
                position.push((index, fen_to_key(c)));
                index = index.saturating_add(1);
            }
        }
    }

    position
}

/// The standard chess starting arrangement.
pub fn start_position() -> Position {
    fen_to_position(FEN_START_POSITION)
}

/// `'N'` -> `"wn"`, `'n'` -> `"bn"`.
pub fn fen_to_key(c: char) -> PieceKey {
    if c.is_uppercase() {
        PieceKey::new(format!("w{}", c.to_lowercase()))
    } else {
        PieceKey::new(format!("b{c}"))
    }
}

/// `"wn"` -> `'N'`, `"bn"` -> `'n'`. Keys that are not `{color}{type}` have no
/// FEN character.
pub fn key_to_fen(key: &PieceKey) -> Option<char> {
    match key.split()? {
        ('w', kind) => kind.to_uppercase().next(),
        ('b', kind) => Some(kind),
        _ => None,
    }
}

/// Encode the occupancy of a board as a placement string.
pub fn encode_placement(board: &Board) -> Option<String> {
    let columns = board.columns();
    let mut rows = Vec::with_capacity(board.rows());

    for row in board.squares().chunks(columns.max(1)) {
        let mut encoded = String::new();
        let mut empty = 0usize;
        for square in row {
            match &square.piece {
                Some(key) => {
                    push_empty_run(&mut encoded, empty);
                    empty = 0;
                    encoded.push(key_to_fen(key)?);
                }
                None => empty += 1,
            }
        }
        push_empty_run(&mut encoded, empty);
        rows.push(encoded);
    }

    Some(rows.join("/"))
}

/// Write `empty` squares as single digits, `12` as `"93"`.
fn push_empty_run(encoded: &mut String, mut empty: usize) {
    while empty > 0 {
        let run = empty.min(MAX_RUN);
        encoded.push_str(&run.to_string());
        empty -= run;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_has_32_pieces() {
        let position = start_position();
        assert_eq!(position.len(), 32);
        assert_eq!(position[0], (0, PieceKey::from("br")));
        assert_eq!(position[4], (4, PieceKey::from("bk")));
        assert_eq!(position[16], (48, PieceKey::from("wp")));
        assert_eq!(position[31], (63, PieceKey::from("wr")));
    }

    #[test]
    fn test_fields_after_placement_are_ignored() {
        assert_eq!(
            fen_to_position("4k3/8/8/8/8/8/8/4K3 w - - 0 1"),
            fen_to_position("4k3/8/8/8/8/8/8/4K3")
        );
    }

    #[test]
    fn test_each_digit_is_its_own_run() {
        assert_eq!(fen_to_position("44Q"), vec![(8, PieceKey::from("wq"))]);
        assert_eq!(fen_to_position("93Q"), vec![(12, PieceKey::from("wq"))]);
        assert_eq!(
            fen_to_position("q9/93"),
            vec![(0, PieceKey::from("bq"))]
        );
    }

    #[test]
    fn test_long_digit_strings_are_empty_squares() {
        let position = fen_to_position("99999999999999999999999Q");
        assert_eq!(position, vec![(207, PieceKey::from("wq"))]);
    }

    #[test]
    fn test_non_ascii_digits_are_not_counts() {
        // Arabic-Indic five is a piece character, not a run.
        let position = fen_to_position("\u{665}Q");
        assert_eq!(position.len(), 2);
        assert_eq!(position[1].0, 1);
    }

    #[test]
    fn test_wide_rows_encode_as_single_digits() {
        let mut encoded = String::new();
        push_empty_run(&mut encoded, 12);
        assert_eq!(encoded, "93");
        let mut encoded = String::new();
        push_empty_run(&mut encoded, 18);
        assert_eq!(encoded, "99");
    }

    #[test]
    fn test_key_conversions() {
        assert_eq!(fen_to_key('N'), PieceKey::from("wn"));
        assert_eq!(fen_to_key('n'), PieceKey::from("bn"));
        assert_eq!(key_to_fen(&PieceKey::from("wn")), Some('N'));
        assert_eq!(key_to_fen(&PieceKey::from("bq")), Some('q'));
        assert_eq!(key_to_fen(&PieceKey::from("x")), None);
    }
}
