//! # Introduction
//!
//! The source-to-syntax-tree front end of the Zerg language: a multi-stage
//! lexer turning raw source text into a classified token stream, and a
//! recursive-descent parser turning that stream into an ordered,
//! parent-linked abstract syntax tree. Everything downstream of the tree —
//! code generation, linking, the command line, file I/O — lives outside
//! this crate and only ever sees [`parser::parse`] and the [`ast::Ast`] it
//! returns.
//!
//! ## Front-end pipeline
//!
//! ```text
//! Source → Lexer (stages 1-4) → Tokens → Parser → AST
//! ```
//!
//! 1. [`lexer`] — tokenizes the source through four refinement stages and
//!    hands the parser a lazy, noise-free token stream. The parser drives
//!    it on demand: no token is computed until pulled, so no intermediate
//!    token array is ever held for the whole source.
//! 2. [`parser`] — recursive descent with single-token lookahead and
//!    pushback; fails fast on the first grammar violation.
//! 3. [`ast`] — the arena-backed tree the parser produces and a code
//!    generator walks.
//!
//! ## Supported grammar
//!
//! The grammar currently covers the empty statement (`nop`) and the
//! zero-argument function declaration:
//!
//! ```text
//! fn main() {
//!     nop
//! }
//! ```
//!
//! Parameter lists and return-type hints are recognized but rejected until
//! the grammar grows into them.

pub mod ast;
pub mod lexer;
pub mod parser;
