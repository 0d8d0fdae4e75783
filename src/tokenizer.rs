//! Splits operator input into shell-like tokens.
//!
//! Tokens are separated by whitespace. Single quotes keep their content
//! verbatim, double quotes allow `\"` and `\\` escapes, and a backslash outside
//! quotes escapes the next character. Quoted and unquoted parts next to each
//! other form a single token.

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    UnterminatedQuote(char),
    DanglingEscape,
}

impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenizeError::UnterminatedQuote(quote) => write!(f, "Unterminated {quote} quote"),
            TokenizeError::DanglingEscape => write!(f, "Line ends with an escape character"),
        }
    }
}

impl std::error::Error for TokenizeError {}

impl From<TokenizeError> for Error {
    fn from(err: TokenizeError) -> Self {
        Error::invalid_parameter(err)
    }
}

pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('"'), '\\') => match chars.next() {
                Some(escaped @ ('"' | '\\')) => current.push(escaped),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => return Err(TokenizeError::DanglingEscape),
            },
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_token = true;
            }
            (None, '\\') => {
                current.push(chars.next().ok_or(TokenizeError::DanglingEscape)?);
                in_token = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(quote) = quote {
        return Err(TokenizeError::UnterminatedQuote(quote));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
