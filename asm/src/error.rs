use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Expected number after `{0}`")]
    MissingOperand(&'static str),

    #[error("Invalid number: `{0}`")]
    InvalidNumber(String),

    #[error("Unknown instruction: `{0}`")]
    UnknownInstruction(String),

    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String),

    #[error("`DB` without a preceding variable name")]
    NoVariable,

    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}
