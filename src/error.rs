use std::io;

use thiserror::Error;

use crate::ast::Location;
use crate::tokenizer::Rule;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("No tokens before '{token}' at {location}")]
    MissingName { token: String, location: Location },

    #[error("Expected identifier but got '{found}' at {location}")]
    ExpectedIdent { found: String, location: Location },

    #[error("Missing token after argument separator ',' at {location}")]
    DanglingSeparator { location: Location },

    #[error("Unterminated argument list for '{name}' opened at {location}")]
    UnterminatedArguments { name: String, location: Location },

    #[error("Failed to tokenize input: {0}")]
    Grammar(#[from] Box<pest::error::Error<Rule>>),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Position of the offending token, if the error came from the parser
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::MissingName { location, .. }
            | Error::ExpectedIdent { location, .. }
            | Error::DanglingSeparator { location }
            | Error::UnterminatedArguments { location, .. } => Some(*location),
            Error::Grammar(_) | Error::Io(_) => None,
        }
    }
}
