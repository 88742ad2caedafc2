use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("no symbol in the requested universe produced any bars")]
    EmptyUniverse,

    #[error("failed to read bar source for {0}: {1}")]
    Source(String, String),

    #[error("malformed symbol '{0}': expected a 6-digit code, optionally suffixed with .SH/.SZ/.BJ")]
    MalformedSymbol(String),
}
