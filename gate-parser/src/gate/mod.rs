//! Main module for gate library functionality

pub mod ast;
pub mod ir;
pub mod lexing;
pub mod parsing;
pub mod testing;
pub mod token;
pub mod trace;
