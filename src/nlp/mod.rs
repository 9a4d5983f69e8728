//! Natural language processing utilities

pub mod tokenizer;

pub use tokenizer::Tokenizer;
