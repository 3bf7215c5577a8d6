//! Language-specific tree-sitter configurations.
//!
//! Each language module provides:
//! - `CONFIG`: node-kind tables and decision/import/call queries
//! - `languages()`: the tree-sitter grammars to try, in order

#[cfg(feature = "tree-sitter")]
pub mod c;
#[cfg(feature = "tree-sitter")]
pub mod cpp;
#[cfg(feature = "tree-sitter")]
pub mod go;
#[cfg(feature = "tree-sitter")]
pub mod java;
#[cfg(feature = "tree-sitter")]
pub mod javascript;
#[cfg(feature = "tree-sitter")]
pub mod python;
#[cfg(feature = "tree-sitter")]
pub mod rust_lang;
#[cfg(feature = "tree-sitter")]
pub mod scala;
#[cfg(feature = "tree-sitter")]
pub mod swift;
#[cfg(feature = "tree-sitter")]
pub mod typescript;
