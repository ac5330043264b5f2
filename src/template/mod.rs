// modpipe: Multi-platform Mod Build Pipeline
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Placeholder substitution for platform manifests.
//!
//! ```text
//! "version: ${version}\napi: $minecraft\nprice: \$5"
//!        |
//!   Template::parse
//!        v
//! [Lit "version: "] [Tok version] [Lit "\napi: "] [Tok minecraft] [Lit "\nprice: $5"]
//!        |
//!   render(&Tokens)
//!        v
//! "version: 1.4.0\napi: 1.21.4\nprice: $5"
//! ```
//!
//! Syntax:
//!   `${name}`  token, name may contain dots
//!   `$name`    token, letters digits underscore
//!   `\$`       literal dollar sign
//!   `$` followed by anything else stays literal.
//!
//! Every referenced token must be bound; rendering is a pure function of
//! the source text and the token values.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

use crate::build_info::Tokens;
use crate::error::TemplateError;

const PLACEHOLDER: &str = r"(?P<escape>\\\$)|\$\{(?P<braced>[^}]*)(?P<close>\})?|\$(?P<bare>[A-Za-z_][A-Za-z0-9_]*)";
const NAME: &str = r"^[A-Za-z_][A-Za-z0-9_.]*$";

fn compiled(
    cell: &'static OnceLock<Result<Regex, regex::Error>>,
    pattern: &'static str,
) -> Result<&'static Regex, TemplateError> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| TemplateError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

fn placeholder_regex() -> Result<&'static Regex, TemplateError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    compiled(&RE, PLACEHOLDER)
}

fn name_regex() -> Result<&'static Regex, TemplateError> {
    static RE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    compiled(&RE, NAME)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(Range<usize>),
    Dollar,
    Token(String),
}

/// A parsed template.
#[derive(Debug, Clone)]
pub struct Template<'a> {
    source: &'a str,
    origin: String,
    segments: Vec<Segment>,
}

impl<'a> Template<'a> {
    /// Parses `source`. `origin` names the file in error messages.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Unterminated` for `${` without a closing brace
    /// and `TemplateError::UnboundToken` for a braced name that is not a
    /// valid identifier.
    pub fn parse(source: &'a str, origin: impl Into<String>) -> Result<Self, TemplateError> {
        let origin = origin.into();
        let placeholder = placeholder_regex()?;
        let name = name_regex()?;

        let mut segments = Vec::new();
        let mut cursor = 0;
        for caps in placeholder.captures_iter(source) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > cursor {
                segments.push(Segment::Literal(cursor..whole.start()));
            }
            cursor = whole.end();

            if caps.name("escape").is_some() {
                segments.push(Segment::Dollar);
            } else if let Some(bare) = caps.name("bare") {
                segments.push(Segment::Token(bare.as_str().to_string()));
            } else if let Some(braced) = caps.name("braced") {
                if caps.name("close").is_none() {
                    return Err(TemplateError::Unterminated {
                        offset: whole.start(),
                        file: origin,
                    });
                }
                let token = braced.as_str().trim();
                if !name.is_match(token) {
                    return Err(TemplateError::UnboundToken {
                        token: token.to_string(),
                        file: origin,
                    });
                }
                segments.push(Segment::Token(token.to_string()));
            }
        }
        if cursor < source.len() {
            segments.push(Segment::Literal(cursor..source.len()));
        }

        Ok(Self {
            source,
            origin,
            segments,
        })
    }

    /// Names referenced by the template, in order of appearance.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Token(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Substitutes every token.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::UnboundToken` for the first token without a value.
    pub fn render(&self, tokens: &Tokens) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(range) => out.push_str(&self.source[range.clone()]),
                Segment::Dollar => out.push('$'),
                Segment::Token(name) => {
                    let value = tokens
                        .get(name)
                        .ok_or_else(|| TemplateError::UnboundToken {
                            token: name.clone(),
                            file: self.origin.clone(),
                        })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// Parses and renders in one step.
///
/// # Errors
///
/// See [`Template::parse`] and [`Template::render`].
pub fn expand(source: &str, origin: &str, tokens: &Tokens) -> Result<String, TemplateError> {
    Template::parse(source, origin)?.render(tokens)
}

/// Renders raw file content, which must be UTF-8.
///
/// # Errors
///
/// Returns `TemplateError::Encoding` for invalid UTF-8, otherwise see [`expand`].
pub fn expand_bytes(
    bytes: &[u8],
    origin: &str,
    tokens: &Tokens,
) -> Result<Vec<u8>, TemplateError> {
    let source = std::str::from_utf8(bytes).map_err(|e| TemplateError::Encoding {
        file: origin.to_string(),
        message: e.to_string(),
    })?;
    expand(source, origin, tokens).map(String::into_bytes)
}
