//! Shell-style word splitting with quoting, tilde and parameter expansion.
//!
//! # Syntax
//!
//! - `'literal'` - no expansion inside single quotes
//! - `"text $VAR"` - parameter expansion only, no field splitting or globbing
//! - `\c` - escapes one character outside quotes
//! - `~` / `~/rest` - home directory at the start of a word
//! - `$NAME`, `${NAME}`, `${NAME:-default}` - parameter expansion
//!
//! Unquoted `| & ; < > ( ) { }` and newlines are rejected, as is command
//! substitution in either form.

use std::iter::Peekable;
use std::str::Chars;

use super::store::VariableStore;
use super::ExpansionError;

/// A run of characters that share one quoting state.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub text: String,
    pub quoted: bool,
}

/// One field produced by word splitting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Word {
    pieces: Vec<Piece>,
}

const GLOB_CHARS: [char; 3] = ['*', '?', '['];

impl Word {
    fn push(&mut self, c: char, quoted: bool) {
        match self.pieces.last_mut() {
            Some(last) if last.quoted == quoted => last.text.push(c),
            _ => self.pieces.push(Piece {
                text: c.to_string(),
                quoted,
            }),
        }
    }

    fn push_str(&mut self, s: &str, quoted: bool) {
        match self.pieces.last_mut() {
            Some(last) if last.quoted == quoted => last.text.push_str(s),
            _ => self.pieces.push(Piece {
                text: s.to_string(),
                quoted,
            }),
        }
    }

    /// The pieces making up this word.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// The word's text after quote removal.
    pub fn literal(&self) -> String {
        self.pieces.iter().map(|p| p.text.as_str()).collect()
    }

    /// Whether an unquoted glob metacharacter appears in the word.
    pub fn has_glob(&self) -> bool {
        self.pieces
            .iter()
            .any(|p| !p.quoted && p.text.contains(GLOB_CHARS))
    }

    /// The word as a glob pattern, with quoted metacharacters escaped.
    ///
    /// Braces are always escaped: the shell does no brace expansion, but
    /// the matcher would read `{a,b}` as alternatives.
    pub fn pattern(&self) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            for c in piece.text.chars() {
                let escape = if piece.quoted {
                    GLOB_CHARS.contains(&c) || matches!(c, '\\' | ']' | '{' | '}' | ',')
                } else {
                    matches!(c, '{' | '}')
                };
                if escape {
                    out.push('\\');
                }
                out.push(c);
            }
        }
        out
    }
}

/// Accumulates words while tracking whether one is in progress.
#[derive(Default)]
struct Fields {
    words: Vec<Word>,
    current: Word,
    in_word: bool,
}

impl Fields {
    fn push(&mut self, c: char, quoted: bool) {
        self.current.push(c, quoted);
        self.in_word = true;
    }

    fn push_str(&mut self, s: &str, quoted: bool) {
        self.current.push_str(s, quoted);
        self.in_word = true;
    }

    fn end_word(&mut self) {
        if self.in_word {
            self.words.push(std::mem::take(&mut self.current));
            self.in_word = false;
        }
    }

    /// Append an unquoted expansion result, splitting it on blanks.
    fn push_split(&mut self, value: &str) {
        for c in value.chars() {
            if is_blank(c) {
                self.end_word();
            } else {
                self.push(c, false);
            }
        }
    }

    fn finish(mut self) -> Vec<Word> {
        self.end_word();
        self.words
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_') && chars.all(is_name_char)
}

/// Split `input` into words, expanding tildes and parameters against `vars`.
pub fn split_words(input: &str, vars: &VariableStore) -> Result<Vec<Word>, ExpansionError> {
    let mut fields = Fields::default();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' => fields.end_word(),
            '|' | '&' | ';' | '<' | '>' | '(' | ')' | '{' | '}' | '\n' => {
                return Err(ExpansionError::BadCharacter(c));
            }
            '`' => return Err(ExpansionError::CommandSubstitution),
            '\'' => {
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => text.push(c),
                        None => return Err(ExpansionError::UnbalancedQuote('\'')),
                    }
                }
                fields.push_str(&text, true);
            }
            '"' => {
                fields.push_str("", true);
                double_quoted(&mut chars, &mut fields, vars)?;
            }
            '\\' => match chars.next() {
                Some(escaped) => fields.push(escaped, true),
                None => return Err(ExpansionError::TrailingBackslash),
            },
            '$' => {
                if let Some(value) = parameter(&mut chars, vars)? {
                    fields.push_split(&value);
                } else {
                    fields.push('$', false);
                }
            }
            '~' if !fields.in_word => tilde(&mut chars, &mut fields, vars),
            other => fields.push(other, false),
        }
    }

    Ok(fields.finish())
}

fn double_quoted(
    chars: &mut Peekable<Chars<'_>>,
    fields: &mut Fields,
    vars: &VariableStore,
) -> Result<(), ExpansionError> {
    loop {
        match chars.next() {
            Some('"') => return Ok(()),
            Some('\\') => match chars.peek() {
                Some(&next) if matches!(next, '$' | '`' | '"' | '\\') => {
                    chars.next();
                    fields.push(next, true);
                }
                Some('\n') => {
                    chars.next();
                }
                _ => fields.push('\\', true),
            },
            Some('`') => return Err(ExpansionError::CommandSubstitution),
            Some('$') => match parameter(chars, vars)? {
                Some(value) => fields.push_str(&value, true),
                None => fields.push('$', true),
            },
            Some(c) => fields.push(c, true),
            None => return Err(ExpansionError::UnbalancedQuote('"')),
        }
    }
}

/// Expand the parameter following a `$`.
///
/// Returns `None` when the `$` does not start an expansion and should be
/// kept literally.
fn parameter(
    chars: &mut Peekable<Chars<'_>>,
    vars: &VariableStore,
) -> Result<Option<String>, ExpansionError> {
    match chars.peek().copied() {
        Some('{') => {
            chars.next();
            let mut inner = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => inner.push(c),
                    None => return Err(ExpansionError::UnterminatedBrace),
                }
            }

            let (name, default) = match inner.split_once(":-") {
                Some((name, default)) => (name, Some(default)),
                None => (inner.as_str(), None),
            };

            if !is_valid_name(name) {
                return Err(ExpansionError::BadSubstitution(inner.clone()));
            }

            let value = vars.get(name).filter(|v| !v.is_empty() || default.is_none());
            Ok(Some(
                value.unwrap_or_else(|| default.unwrap_or_default().to_string()),
            ))
        }
        Some('(') => Err(ExpansionError::CommandSubstitution),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            let mut name = String::new();
            while let Some(&c) = chars.peek() {
                if !is_name_char(c) {
                    break;
                }
                name.push(c);
                chars.next();
            }
            Ok(Some(vars.get(&name).unwrap_or_default()))
        }
        Some(c) if c.is_ascii_digit() => {
            // Positional parameters are never set here.
            chars.next();
            Ok(Some(String::new()))
        }
        _ => Ok(None),
    }
}

fn tilde(chars: &mut Peekable<Chars<'_>>, fields: &mut Fields, vars: &VariableStore) {
    let mut user = String::new();
    while let Some(&c) = chars.peek() {
        if c == '/' || is_blank(c) || !(is_name_char(c) || c == '.' || c == '-') {
            break;
        }
        user.push(c);
        chars.next();
    }

    match vars.home() {
        Some(home) if user.is_empty() => fields.push_str(&home, true),
        _ => {
            // ~user is left as written
            fields.push('~', false);
            fields.push_str(&user, false);
        }
    }
}
