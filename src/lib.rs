//! Generate dynamic-loading boilerplate from C function prototypes.
//!
//! Source text flows through [`tokenizer`], [`parser`] and [`generator`]:
//! `int add(int a, int b)` becomes a `#define`/`typedef` pair, a function
//! pointer declaration and a load-macro call.

pub mod ast;
pub mod error;
pub mod generator;
pub mod parser;
pub mod preset;
pub mod tokenizer;

pub use error::{Error, Result};
pub use generator::{Config, GeneratingReader, generate, render};
pub use parser::{parse_prototypes, parse_source};
pub use preset::Preset;
pub use tokenizer::tokenize;
