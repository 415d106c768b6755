//! Configuration options for parsing and serialization.
//!
//! - [`ParseOptions`]: scanner switches (escapes, multi-line comments, type inference)
//! - [`DumpOptions`]: serializer formatting (indent, quoting policy, escapes)
//! - [`Quote`]: when the serializer wraps tokens in quotes
//!
//! ## Examples
//!
//! ```rust
//! use vdf_tree::{parse_with_options, dump_with_options, DumpOptions, ParseOptions, Quote};
//!
//! let options = ParseOptions::new().with_types(true);
//! let doc = parse_with_options("count 3", &options).unwrap();
//!
//! let text = dump_with_options(&doc, &DumpOptions::new().with_quote(Quote::Always)).unwrap();
//! assert_eq!(text, "\"count\" 3\n");
//! ```

/// Quoting policy used by the serializer.
///
/// - **Always**: every key and string value is quoted
/// - **Auto**: quotes only tokens that would not survive a re-parse unquoted
/// - **AutoTyped**: like `Auto`, and also quotes string values that would
///   re-parse as a boolean or number with type inference enabled
///
/// Non-string values (numbers and booleans) are never quoted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Quote {
    Always,
    #[default]
    Auto,
    AutoTyped,
}

/// Scanner configuration.
///
/// Defaults: escapes on, multi-line comments off, type inference off.
///
/// # Examples
///
/// ```rust
/// use vdf_tree::ParseOptions;
///
/// let options = ParseOptions::new();
/// assert!(options.escapes);
/// assert!(!options.multilines);
/// assert!(!options.types);
///
/// let json = ParseOptions::json();
/// assert!(json.escapes && json.multilines && json.types);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Recognize `\` escapes in quoted and bare tokens.
    pub escapes: bool,
    /// Skip `/* ... */` comments.
    pub multilines: bool,
    /// Coerce bare values into booleans and numbers.
    pub types: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            escapes: true,
            multilines: false,
            types: false,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset used by the JSON projection: every switch enabled.
    #[must_use]
    pub fn json() -> Self {
        ParseOptions {
            escapes: true,
            multilines: true,
            types: true,
        }
    }

    #[must_use]
    pub fn with_escapes(mut self, escapes: bool) -> Self {
        self.escapes = escapes;
        self
    }

    #[must_use]
    pub fn with_multilines(mut self, multilines: bool) -> Self {
        self.multilines = multilines;
        self
    }

    #[must_use]
    pub fn with_types(mut self, types: bool) -> Self {
        self.types = types;
        self
    }
}

/// Serializer configuration.
///
/// Defaults: tab indentation, [`Quote::Auto`], escapes on.
///
/// # Examples
///
/// ```rust
/// use vdf_tree::{DumpOptions, Quote};
///
/// let options = DumpOptions::new().with_indent("  ").with_quote(Quote::AutoTyped);
/// assert_eq!(options.indent, "  ");
/// assert_eq!(options.quote, Quote::AutoTyped);
/// assert!(options.escapes);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpOptions {
    /// Prefix written once per nesting level.
    pub indent: String,
    pub quote: Quote,
    /// Escape `\`, `"` and control characters (plus braces in unquoted tokens).
    /// When disabled, tokens that need escaping are rejected.
    pub escapes: bool,
}

impl Default for DumpOptions {
    fn default() -> Self {
        DumpOptions {
            indent: "\t".to_string(),
            quote: Quote::default(),
            escapes: true,
        }
    }
}

impl DumpOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quote every key and string value. Output from these options always
    /// re-parses to an equal tree.
    #[must_use]
    pub fn strict() -> Self {
        DumpOptions {
            quote: Quote::Always,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: Quote) -> Self {
        self.quote = quote;
        self
    }

    #[must_use]
    pub fn with_escapes(mut self, escapes: bool) -> Self {
        self.escapes = escapes;
        self
    }
}
