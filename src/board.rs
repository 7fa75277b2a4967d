//! Validation of board codes against a fixed allow-list.
//!
//! Validation happens before any network I/O: an unknown code aborts the
//! run without a single request being dispatched.

use crate::{error::Error, result::Result};

/// Every public board, sorted so lookups can binary search.
///
/// Hand-maintained. The upstream `boards.json` endpoint is the source of
/// truth, but this tool deliberately avoids a network round-trip just to
/// validate user input.
pub const BOARDS: &[&str] = &[
    "3", "a", "aco", "adv", "an", "b", "bant", "biz", "c", "cgl", "ck", "cm", "co", "d", "diy",
    "e", "f", "fa", "fit", "g", "gd", "gif", "h", "hc", "his", "hm", "hr", "i", "ic", "int", "jp",
    "k", "lgbt", "lit", "m", "mlp", "mu", "n", "news", "o", "out", "p", "po", "pol", "pw", "qa",
    "qst", "r", "r9k", "s", "s4s", "sci", "soc", "sp", "t", "tg", "trash", "trv", "tv", "u", "v",
    "vg", "vip", "vm", "vmg", "vp", "vr", "vrpg", "vst", "vt", "w", "wg", "wsg", "wsr", "x", "xs",
    "y",
];

/// Checks a candidate board code against the allow-list.
///
/// Surrounding slashes are tolerated, so `/g/` and `g` both name the same
/// board. Returns the normalized code on success.
///
/// # Errors
///
/// Returns [`Error::InvalidBoard`] if the code is not a known board.
pub fn validate(board: &str) -> Result<&str> {
    let code = board.trim_matches('/');
    if BOARDS.binary_search(&code).is_ok() {
        Ok(code)
    } else {
        Err(Error::InvalidBoard(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{validate, BOARDS};
    use crate::error::Error;

    #[test]
    fn known_boards_are_accepted() {
        for code in ["g", "po", "wsg", "3"] {
            assert_eq!(validate(code).unwrap(), code);
        }
    }

    #[test]
    fn surrounding_slashes_are_stripped() {
        assert_eq!(validate("/g/").unwrap(), "g");
    }

    #[test]
    fn unknown_board_is_rejected() {
        let err = validate("notaboard").unwrap_err();
        assert!(matches!(err, Error::InvalidBoard(code) if code == "notaboard"));
    }

    #[test]
    fn empty_board_is_rejected() {
        assert!(validate("").is_err());
        assert!(validate("//").is_err());
    }

    // binary_search only works on a sorted slice.
    #[test]
    fn allow_list_is_sorted() {
        assert!(BOARDS.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
