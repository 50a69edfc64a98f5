//! Shared error types for the firm finder

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid firm id: {input}")]
    InvalidFirmId { input: String },

    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;
