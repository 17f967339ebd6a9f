use std::fmt;
use std::str::FromStr;

/// Represents a location in a source file.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SourceLocation {
    /// The file name.
    pub file: String,
    /// The line number, starting at 1.
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Represents the C keywords recognized by the compiler.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeywordKind {
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Else,
    Enum,
    For,
    If,
    Int,
    Return,
    Sizeof,
    Struct,
    Switch,
    Typedef,
    Union,
    Void,
    While,
}

impl FromStr for KeywordKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "break" => Ok(KeywordKind::Break),
            "case" => Ok(KeywordKind::Case),
            "char" => Ok(KeywordKind::Char),
            "const" => Ok(KeywordKind::Const),
            "continue" => Ok(KeywordKind::Continue),
            "default" => Ok(KeywordKind::Default),
            "do" => Ok(KeywordKind::Do),
            "else" => Ok(KeywordKind::Else),
            "enum" => Ok(KeywordKind::Enum),
            "for" => Ok(KeywordKind::For),
            "if" => Ok(KeywordKind::If),
            "int" => Ok(KeywordKind::Int),
            "return" => Ok(KeywordKind::Return),
            "sizeof" => Ok(KeywordKind::Sizeof),
            "struct" => Ok(KeywordKind::Struct),
            "switch" => Ok(KeywordKind::Switch),
            "typedef" => Ok(KeywordKind::Typedef),
            "union" => Ok(KeywordKind::Union),
            "void" => Ok(KeywordKind::Void),
            "while" => Ok(KeywordKind::While),
            _ => Err(()),
        }
    }
}

impl fmt::Display for KeywordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeywordKind::Break => write!(f, "break"),
            KeywordKind::Case => write!(f, "case"),
            KeywordKind::Char => write!(f, "char"),
            KeywordKind::Const => write!(f, "const"),
            KeywordKind::Continue => write!(f, "continue"),
            KeywordKind::Default => write!(f, "default"),
            KeywordKind::Do => write!(f, "do"),
            KeywordKind::Else => write!(f, "else"),
            KeywordKind::Enum => write!(f, "enum"),
            KeywordKind::For => write!(f, "for"),
            KeywordKind::If => write!(f, "if"),
            KeywordKind::Int => write!(f, "int"),
            KeywordKind::Return => write!(f, "return"),
            KeywordKind::Sizeof => write!(f, "sizeof"),
            KeywordKind::Struct => write!(f, "struct"),
            KeywordKind::Switch => write!(f, "switch"),
            KeywordKind::Typedef => write!(f, "typedef"),
            KeywordKind::Union => write!(f, "union"),
            KeywordKind::Void => write!(f, "void"),
            KeywordKind::While => write!(f, "while"),
        }
    }
}
