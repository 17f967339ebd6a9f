//! Converts C source text into a flat token stream.

use crate::common::{KeywordKind, SourceLocation};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum LexerError {
    #[error("Unexpected character '{0}'")]
    UnexpectedChar(char, SourceLocation),
    #[error("Unterminated string literal")]
    UnterminatedString(SourceLocation),
    #[error("Unterminated character literal")]
    UnterminatedChar(SourceLocation),
    #[error("Unterminated block comment")]
    UnterminatedComment(SourceLocation),
    #[error("Unknown escape sequence '\\{0}'")]
    UnknownEscape(char, SourceLocation),
}

impl LexerError {
    pub fn location(&self) -> &SourceLocation {
        match self {
            LexerError::UnexpectedChar(_, loc)
            | LexerError::UnterminatedString(loc)
            | LexerError::UnterminatedChar(loc)
            | LexerError::UnterminatedComment(loc)
            | LexerError::UnknownEscape(_, loc) => loc,
        }
    }
}

/// Represents a token in the C language.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Where the token starts in the source.
    pub loc: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, loc: SourceLocation) -> Self {
        Token { kind, loc }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

/// The kind of a token.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    /// An identifier.
    Identifier(String),
    /// A keyword.
    Keyword(KeywordKind),
    /// A decimal integer literal, or a character literal decoded to its value.
    Number(i64),
    /// A string literal. Escape sequences are kept exactly as written.
    String(String),
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Colon,
    Comma,
    Dot,
    Arrow,
    Plus,
    PlusPlus,
    PlusEqual,
    Minus,
    MinusMinus,
    MinusEqual,
    Star,
    AsteriskEqual,
    Slash,
    SlashEqual,
    Percent,
    Equal,
    EqualEqual,
    Bang,
    BangEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    Ampersand,
    AmpersandAmpersand,
    PipePipe,
    Question,
    Hash,
    /// The end of the input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Identifier(s) => write!(f, "{}", s),
            TokenKind::Keyword(k) => write!(f, "{}", k),
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::LeftBracket => write!(f, "["),
            TokenKind::RightBracket => write!(f, "]"),
            TokenKind::Semicolon => write!(f, ";"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Arrow => write!(f, "->"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::PlusPlus => write!(f, "++"),
            TokenKind::PlusEqual => write!(f, "+="),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::MinusMinus => write!(f, "--"),
            TokenKind::MinusEqual => write!(f, "-="),
            TokenKind::Star => write!(f, "*"),
            TokenKind::AsteriskEqual => write!(f, "*="),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::SlashEqual => write!(f, "/="),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Equal => write!(f, "="),
            TokenKind::EqualEqual => write!(f, "=="),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::BangEqual => write!(f, "!="),
            TokenKind::LessThan => write!(f, "<"),
            TokenKind::LessThanEqual => write!(f, "<="),
            TokenKind::GreaterThan => write!(f, ">"),
            TokenKind::GreaterThanEqual => write!(f, ">="),
            TokenKind::Ampersand => write!(f, "&"),
            TokenKind::AmpersandAmpersand => write!(f, "&&"),
            TokenKind::PipePipe => write!(f, "||"),
            TokenKind::Question => write!(f, "?"),
            TokenKind::Hash => write!(f, "#"),
            TokenKind::Eof => write!(f, ""),
        }
    }
}

/// A lexer that scans source text left to right, producing tokens with
/// greedy longest-operator matching.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    file: String,
}

impl Lexer {
    pub fn new(source: &str, file: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            file: file.to_string(),
        }
    }

    fn loc(&self) -> SourceLocation {
        SourceLocation::new(self.file.clone(), self.line)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Consumes `expected` if it is the next character.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Tokenizes the whole input, ending with a single `Eof` token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace_and_comments()?;
        let loc = self.loc();
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::new(TokenKind::Eof, loc)),
        };

        if c.is_ascii_digit() {
            return Ok(Token::new(self.read_number(), loc));
        }
        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(Token::new(self.read_word(), loc));
        }
        if c == '"' {
            return Ok(Token::new(self.read_string()?, loc));
        }
        if c == '\'' {
            return Ok(Token::new(self.read_char()?, loc));
        }

        self.bump();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            '#' => TokenKind::Hash,
            '+' => {
                if self.eat('+') {
                    TokenKind::PlusPlus
                } else if self.eat('=') {
                    TokenKind::PlusEqual
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    TokenKind::MinusMinus
                } else if self.eat('=') {
                    TokenKind::MinusEqual
                } else if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.eat('=') {
                    TokenKind::AsteriskEqual
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.eat('=') {
                    TokenKind::SlashEqual
                } else {
                    TokenKind::Slash
                }
            }
            '%' => TokenKind::Percent,
            '=' => {
                if self.eat('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LessThanEqual
                } else {
                    TokenKind::LessThan
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GreaterThanEqual
                } else {
                    TokenKind::GreaterThan
                }
            }
            '&' => {
                if self.eat('&') {
                    TokenKind::AmpersandAmpersand
                } else {
                    TokenKind::Ampersand
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::PipePipe
                } else {
                    return Err(LexerError::UnexpectedChar('|', loc));
                }
            }
            other => return Err(LexerError::UnexpectedChar(other, loc)),
        };
        Ok(Token::new(kind, loc))
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexerError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') if self.peek_next() == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    let loc = self.loc();
                    self.bump();
                    self.bump();
                    loop {
                        match self.peek() {
                            Some('*') if self.peek_next() == Some('/') => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            Some(_) => {
                                self.bump();
                            }
                            None => return Err(LexerError::UnterminatedComment(loc)),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_number(&mut self) -> TokenKind {
        let mut value: i64 = 0;
        while let Some(c) = self.peek() {
            if let Some(d) = c.to_digit(10) {
                value = value * 10 + d as i64;
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::Number(value)
    }

    fn read_word(&mut self) -> TokenKind {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                word.push(c);
                self.bump();
            } else {
                break;
            }
        }
        match KeywordKind::from_str(&word) {
            Ok(keyword) => TokenKind::Keyword(keyword),
            Err(()) => TokenKind::Identifier(word),
        }
    }

    /// Reads a string literal. The content keeps escape sequences verbatim,
    /// so a `\"` pair does not terminate the literal.
    fn read_string(&mut self) -> Result<TokenKind, LexerError> {
        let loc = self.loc();
        self.bump(); // opening quote
        let mut content = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    return Ok(TokenKind::String(content));
                }
                Some('\\') => {
                    content.push('\\');
                    self.bump();
                    match self.bump() {
                        Some(escaped) => content.push(escaped),
                        None => return Err(LexerError::UnterminatedString(loc)),
                    }
                }
                Some(c) => {
                    content.push(c);
                    self.bump();
                }
                None => return Err(LexerError::UnterminatedString(loc)),
            }
        }
    }

    /// Reads a character literal and decodes it to its integer value.
    fn read_char(&mut self) -> Result<TokenKind, LexerError> {
        let loc = self.loc();
        self.bump(); // opening quote
        let c = match self.bump() {
            Some('\\') => {
                let escaped = self
                    .bump()
                    .ok_or_else(|| LexerError::UnterminatedChar(loc.clone()))?;
                match escaped {
                    '\\' => '\\',
                    '\'' => '\'',
                    '"' => '"',
                    'n' => '\n',
                    't' => '\t',
                    '0' => '\0',
                    other => return Err(LexerError::UnknownEscape(other, loc)),
                }
            }
            Some(c) => c,
            None => return Err(LexerError::UnterminatedChar(loc)),
        };
        if !self.eat('\'') {
            return Err(LexerError::UnterminatedChar(loc));
        }
        Ok(TokenKind::Number(c as i64))
    }
}

#[cfg(test)]
mod tests_lexer;
