use thiserror::Error;

use crate::error::IndexError;

/// Failure to turn query text into a predicate tree. Positions are byte
/// offsets into the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("parse error at {position}: unexpected end of input")]
    UnexpectedEof { position: usize },

    #[error("parse error at {position}: unexpected character '{ch}'")]
    UnexpectedChar { ch: char, position: usize },

    #[error("parse error at {position}: unterminated string literal")]
    UnterminatedString { position: usize },

    #[error("parse error at {position}: expected {expected}, found {found}")]
    Expected {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("parse error at {position}: no index on attribute '{attribute}'")]
    UnknownAttribute { attribute: String, position: usize },

    #[error("parse error at {position}: {source}")]
    InvalidLiteral { source: IndexError, position: usize },
}
