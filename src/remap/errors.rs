use thiserror::Error;

pub type RemapResult<T> = anyhow::Result<T>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RemapError {
    #[error("invalid variable name: {name}")]
    InvalidVarName { name: String },
    #[error("invalid quote escape mode: {mode}")]
    InvalidQuoteMode { mode: String },
}
