pub mod types;
pub mod sanitize;
pub mod client;
pub mod prompt;
pub mod parser;
pub mod normalize;
pub mod fallback;
pub mod generator;

pub use types::*;
pub use sanitize::*;
pub use client::*;
pub use prompt::*;
pub use parser::*;
pub use normalize::*;
pub use fallback::*;
pub use generator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgramError {
    #[error("Model endpoint unreachable at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Model endpoint returned error (status {status}): {body}")]
    ModelError { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("No JSON object found in model response")]
    NoJsonObject,

    #[error("Malformed program JSON: {0}")]
    MalformedProgram(String),

    #[error("Model returned a program with no exercises")]
    EmptyProgram,
}
