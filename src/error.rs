//! Error types for VDF parsing, tree editing and serialization.
//!
//! ## Error Categories
//!
//! - **Syntax Errors**: malformed text (unterminated quotes or comments, blocks
//!   without a key, unpaired keys, unclosed blocks) with byte offset, line and column
//! - **Structural Errors**: invalid tree edits (exiting past the root, attaching a
//!   node twice, building cycles)
//! - **Lookup Misses**: no child with the requested key
//! - **Type Mismatches**: a pair value cannot be coerced to the requested type
//! - **Unrepresentable Tokens**: the serializer cannot write a token under the
//!   chosen options
//!
//! Lookup misses and type mismatches are recoverable: every failing lookup or
//! accessor has an `Option`-returning or defaulted counterpart.
//!
//! ## Examples
//!
//! ```rust
//! use vdf_tree::{parse, Error};
//!
//! let err = parse("key \"value").unwrap_err();
//! assert!(matches!(err, Error::Syntax { offset: 4, .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed input text
    #[error("Syntax error at line {line}, column {col} (offset {offset}): {msg}")]
    Syntax {
        offset: usize,
        line: usize,
        col: usize,
        msg: String,
    },

    /// Invalid tree navigation or edit
    #[error("Structural error: {0}")]
    Structural(String),

    /// Lookup miss
    #[error("{kind} with key \"{key}\" does not exist in set")]
    NotFound { kind: &'static str, key: String },

    /// Typed accessor failure
    #[error("Type mismatch: expected {expected}, found \"{found}\"")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },

    /// Token the serializer cannot write with the active options
    #[error("Cannot serialize \"{text}\": {reason}")]
    Unrepresentable { text: String, reason: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error at a byte offset of `input`.
    ///
    /// Line and column are 1-based and computed from the offset; the column
    /// counts characters, not bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vdf_tree::Error;
    ///
    /// let err = Error::syntax("a b\nc", 4, "unpaired key");
    /// assert!(err.to_string().contains("line 2, column 1"));
    /// ```
    pub fn syntax(input: &str, offset: usize, msg: &str) -> Self {
        let offset = offset.min(input.len());
        let before = input.get(..offset).unwrap_or(input);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let col = before[line_start..].chars().count() + 1;
        Error::Syntax {
            offset,
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a structural error for an invalid tree operation.
    pub fn structural(msg: &str) -> Self {
        Error::Structural(msg.to_string())
    }

    /// Creates a lookup miss for `kind` (`"child"`, `"set"` or `"pair"`).
    pub fn not_found(kind: &'static str, key: &str) -> Self {
        Error::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// Creates a type mismatch error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vdf_tree::Error;
    ///
    /// let err = Error::type_mismatch("float", "nada");
    /// assert!(err.to_string().contains("expected float"));
    /// ```
    pub fn type_mismatch(expected: &'static str, found: &str) -> Self {
        Error::TypeMismatch {
            expected,
            found: found.to_string(),
        }
    }

    pub fn unrepresentable(text: &str, reason: &str) -> Self {
        Error::Unrepresentable {
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
