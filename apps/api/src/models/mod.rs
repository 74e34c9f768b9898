pub mod ast;
pub mod legacy;
