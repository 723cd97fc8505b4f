use std::fmt;

/// 1-based position of a token in the prototype source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Any other single non-whitespace character
    Char,
    Ident,
    BraceBegin,
    BraceEnd,
    ArgSeparator,
    Pointer,
}

/// A lexical unit borrowed from the source text.
///
/// `lexeme` is the identifier text for [`TokenKind::Ident`] and the single
/// matched character for every other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub location: Location,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str, location: Location) -> Self {
        Self {
            kind,
            lexeme,
            location,
        }
    }

    /// Text this token contributes to generated code
    pub fn value(&self) -> &'a str {
        self.lexeme
    }

    pub fn is_ident(&self) -> bool {
        self.kind == TokenKind::Ident
    }
}

/// Name tokens of a single parameter slot, e.g. `["const", "char", "*", "s"]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentGroup {
    pub names: Vec<String>,
}

impl ArgumentGroup {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionPrototype {
    pub name: String,
    /// Tokens before the name: return type, qualifiers, pointer stars
    pub returns: Vec<String>,
    pub args: Vec<ArgumentGroup>,
}

impl FunctionPrototype {
    pub fn new(name: impl Into<String>, returns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            returns,
            args: Vec::new(),
        }
    }
}
