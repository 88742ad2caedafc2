use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid bar for {0}: {1}")]
    InvalidBar(String, String),
}
