#![allow(dead_code)]

//---------------------------------------------------------------------------
// RasterError - the only two places this crate fails loudly: decoding a
// sprite/texture container and parsing an OBJ mesh. The hot draw path
// never returns Result (spec 7); malformed input there is clamped or
// dropped, not reported.
//---------------------------------------------------------------------------

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("container data truncated: expected at least {expected} bytes, got {actual}")]
    TruncatedContainer { expected: usize, actual: usize },

    #[error("unknown container format tag: {0}")]
    UnknownFormatTag(u8),

    #[error("malformed OBJ data at line {line}: {reason}")]
    MalformedObj { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
