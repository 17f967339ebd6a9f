//! A deliberately small preprocessor: one-token object macros, quoted
//! includes and `#ifdef`/`#ifndef` restricted to the `__STDC__` name.

pub mod error;

use crate::lexer::{Lexer, Token, TokenKind};
use error::PreprocessorError;
use hashbrown::HashMap;
use log::debug;
use std::fs;

/// The only conditional name the directive pass understands. This compiler
/// does not define it, so `#ifdef __STDC__` deletes its range and
/// `#ifndef __STDC__` keeps its body.
const STDC_NAME: &str = "__STDC__";

/// Expands directives and macros over a lexed token stream.
///
/// Macro definitions accumulate across `preprocess` calls, which is what
/// makes definitions inside an included file visible to the includer.
#[derive(Default)]
pub struct Preprocessor {
    macros: HashMap<String, Token>,
}

impl Preprocessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a command-line definition of the form `NAME` or `NAME=TOKEN`.
    /// A bare `NAME` maps to the token `1`.
    pub fn define(&mut self, text: &str) -> Result<(), PreprocessorError> {
        let (name, replacement) = match text.split_once('=') {
            Some((name, rest)) => {
                let tokens = Lexer::new(rest, "<command line>")
                    .tokenize()
                    .map_err(PreprocessorError::Lexer)?;
                // The lexer always appends Eof, so a single-token body
                // lexes to exactly two tokens.
                if tokens.len() != 2 {
                    return Err(PreprocessorError::MalformedCliDefine(text.to_string()));
                }
                (name.to_string(), tokens.into_iter().next().unwrap())
            }
            None => (
                text.to_string(),
                Token::new(
                    TokenKind::Number(1),
                    crate::common::SourceLocation::new("<command line>", 1),
                ),
            ),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PreprocessorError::MalformedCliDefine(text.to_string()));
        }
        debug!("cli define {} => {:?}", name, replacement.kind);
        self.macros.insert(name, replacement);
        Ok(())
    }

    /// Lexes `source` and runs the directive and substitution passes,
    /// returning a new token stream with no `Hash` tokens left in it.
    pub fn preprocess(
        &mut self,
        source: &str,
        file_name: &str,
    ) -> Result<Vec<Token>, PreprocessorError> {
        let tokens = Lexer::new(source, file_name).tokenize()?;
        let stripped = self.run_directives(tokens)?;
        Ok(self.substitute(stripped))
    }

    /// The directive pass. Builds a fresh token vector; the input tokens are
    /// never modified.
    fn run_directives(&mut self, tokens: Vec<Token>) -> Result<Vec<Token>, PreprocessorError> {
        let mut output = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            if tokens[i].kind != TokenKind::Hash {
                output.push(tokens[i].clone());
                i += 1;
                continue;
            }
            let hash_loc = tokens[i].loc.clone();
            let directive = match tokens.get(i + 1).map(|t| &t.kind) {
                Some(TokenKind::Identifier(name)) => name.clone(),
                _ => return Err(PreprocessorError::MissingDirective(hash_loc)),
            };
            match directive.as_str() {
                "define" => {
                    let name = match tokens.get(i + 2).map(|t| &t.kind) {
                        Some(TokenKind::Identifier(name)) => name.clone(),
                        _ => return Err(PreprocessorError::MalformedDefine(hash_loc)),
                    };
                    let replacement = match tokens.get(i + 3) {
                        Some(t) if t.kind != TokenKind::Eof && t.kind != TokenKind::Hash => {
                            t.clone()
                        }
                        _ => return Err(PreprocessorError::MalformedDefine(hash_loc)),
                    };
                    debug!("#define {} => {:?}", name, replacement.kind);
                    self.macros.insert(name, replacement);
                    i += 4;
                }
                "include" => {
                    let path = match tokens.get(i + 2).map(|t| &t.kind) {
                        Some(TokenKind::String(path)) => path.clone(),
                        _ => return Err(PreprocessorError::ExpectedFileName(hash_loc)),
                    };
                    let source = fs::read_to_string(&path).map_err(|err| {
                        PreprocessorError::Include(path.clone(), err.to_string())
                    })?;
                    debug!("#include \"{}\"", path);
                    let mut included = self.preprocess(&source, &path)?;
                    if let Some(last) = included.last() {
                        if last.kind == TokenKind::Eof {
                            included.pop();
                        }
                    }
                    output.extend(included);
                    i += 3;
                }
                "ifdef" => {
                    self.expect_stdc(&tokens, i + 2, &hash_loc)?;
                    // The name is never defined here, so delete everything
                    // through the matching #endif.
                    let mut j = i + 3;
                    loop {
                        match tokens.get(j).map(|t| &t.kind) {
                            Some(TokenKind::Hash) => {
                                if let Some(TokenKind::Identifier(name)) =
                                    tokens.get(j + 1).map(|t| &t.kind)
                                {
                                    if name == "endif" {
                                        break;
                                    }
                                }
                                j += 1;
                            }
                            Some(TokenKind::Eof) | None => {
                                return Err(PreprocessorError::MissingEndif(hash_loc));
                            }
                            Some(_) => j += 1,
                        }
                    }
                    i = j + 2;
                }
                "ifndef" => {
                    self.expect_stdc(&tokens, i + 2, &hash_loc)?;
                    // The guarded body survives; only the directive goes away.
                    i += 3;
                }
                "endif" => {
                    // Left over from an #ifndef whose body was kept.
                    i += 2;
                }
                other => {
                    return Err(PreprocessorError::UnknownDirective(
                        other.to_string(),
                        hash_loc,
                    ));
                }
            }
        }
        Ok(output)
    }

    fn expect_stdc(
        &self,
        tokens: &[Token],
        index: usize,
        hash_loc: &crate::common::SourceLocation,
    ) -> Result<(), PreprocessorError> {
        match tokens.get(index).map(|t| &t.kind) {
            Some(TokenKind::Identifier(name)) if name == STDC_NAME => Ok(()),
            Some(TokenKind::Identifier(name)) => Err(PreprocessorError::UnsupportedCondition(
                name.clone(),
                tokens[index].loc.clone(),
            )),
            _ => Err(PreprocessorError::MissingDirective(hash_loc.clone())),
        }
    }

    /// The substitution pass: every identifier matching a macro name is
    /// replaced by a copy of the recorded token, keeping the identifier's
    /// source location.
    fn substitute(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens
            .into_iter()
            .map(|token| match &token.kind {
                TokenKind::Identifier(name) => match self.macros.get(name) {
                    Some(replacement) => Token::new(replacement.kind.clone(), token.loc),
                    None => token,
                },
                _ => token,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests_preprocessor;
