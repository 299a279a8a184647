pub mod image;
pub mod isa;
