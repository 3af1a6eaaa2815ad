use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    UnexpectedEof,
    InvalidSignature(String),
    TrailingInput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedEof => write!(f, "unexpected end of input"),
            Error::InvalidSignature(sig) => write!(f, "invalid signature: {sig}"),
            Error::TrailingInput(rest) => write!(f, "trailing input after signature: {rest}"),
        }
    }
}

impl std::error::Error for Error {}
