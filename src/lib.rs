pub mod ast;
pub mod builtins;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod repl;
mod stack;
pub mod token;

pub use environment::{Env, Environment};
pub use evaluator::{eval, eval_program};
pub use object::Object;
pub use parser::parse;
