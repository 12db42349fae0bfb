use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VizError>;

#[derive(Error, Debug)]
pub enum VizError {
    #[error("cannot access {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("render error {0}")]
    Render(String),
}

macro_rules! parse_error {
    ($line:expr, $fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::VizError::Parse { line: $line, message: format!( $fmt $(, $arg)* ) }
    };
}
pub(crate) use parse_error;

macro_rules! render_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::VizError::Render( format!( $fmt $(, $arg)* ))
    };
}
pub(crate) use render_error;
