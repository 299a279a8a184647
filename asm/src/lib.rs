pub mod assembler;
pub mod error;
pub mod label;
pub mod lexer;

pub use assembler::{assemble, Assembler};
pub use error::Error;
pub use label::Labels;
pub use lexer::{tokenize, Token, TokenKind};
