//! Path pattern compilation and matching.

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pattern::error::Error;

/// Parameters extracted from a matched path, keyed by parameter name.
pub type Params = HashMap<String, String>;

/// Default expression for a single path segment.
const SEGMENT: &str = "[^/]+?";

/// Options forwarded to the pattern compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Match literal text case-sensitively.
    pub sensitive: bool,
    /// Require the trailing slash of the request path to match the pattern exactly.
    pub strict: bool,
    /// Anchor the match at the end of the path. When `false` the pattern matches
    /// any path it is a segment-aligned prefix of.
    pub end: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            sensitive: false,
            strict: false,
            end: true,
        }
    }
}

/// A parameter declared by a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Parameter name. Unnamed groups are numbered from `"0"`.
    pub name: String,
    /// The `/` or `.` delimiter that belongs to the parameter, if any.
    pub prefix: String,
    /// Regular expression for one occurrence of the parameter.
    pub pattern: String,
    /// Declared with `?` or `*`.
    pub optional: bool,
    /// Declared with `+` or `*`.
    pub repeat: bool,
}

#[derive(Debug, Clone)]
enum Token {
    Literal(String),
    Param(Key),
}

/// A compiled path pattern.
///
/// Supports named segments (`:id`), custom segment expressions (`:id(\d+)`),
/// unnamed groups (`(\d+)`), the `?`, `*` and `+` modifiers, and a bare `*` wildcard.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    tokens: Vec<Token>,
    keys: Vec<Key>,
    regex: Regex,
    validators: Vec<Regex>,
}

impl PathPattern {
    /// Compile a pattern with the given options.
    pub fn compile(pattern: &str, options: &MatchOptions) -> Result<Self, Error> {
        let tokens = tokenize(pattern)?;
        let keys: Vec<Key> = tokens
            .iter()
            .filter_map(|token| match token {
                Token::Param(key) => Some(key.clone()),
                Token::Literal(_) => None,
            })
            .collect();

        let regex = build_regex(pattern, &to_regex_source(&tokens, options))?;
        let validators = keys
            .iter()
            .map(|key| build_regex(pattern, &format!("{}^(?:{})$", case_flag(options), key.pattern)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: pattern.to_string(),
            tokens,
            keys,
            regex,
            validators,
        })
    }

    /// The pattern this matcher was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The parameters declared by the pattern, in order of appearance.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Test a path against the pattern.
    ///
    /// On a match, returns `seed` extended with the captured parameters (captures
    /// win over seeded values). Optional parameters that did not participate are
    /// left out.
    pub fn match_path(&self, path: &str, seed: &Params) -> Option<Params> {
        let captures = self.regex.captures(path)?;
        let mut params = seed.clone();
        for (index, key) in self.keys.iter().enumerate() {
            if let Some(value) = captures.name(&capture_name(index)) {
                params.insert(key.name.clone(), decode(value.as_str()));
            }
        }
        Some(params)
    }

    /// Check whether a path matches without extracting parameters.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Build a concrete path from the pattern by substituting `params`.
    ///
    /// Values are percent-encoded segment by segment and must satisfy the
    /// expression of their parameter.
    pub fn url(&self, params: &Params) -> Result<String, Error> {
        let mut path = String::new();
        let mut index = 0;

        for token in &self.tokens {
            let key = match token {
                Token::Literal(text) => {
                    path.push_str(text);
                    continue;
                }
                Token::Param(key) => key,
            };
            let validator = &self.validators[index];
            index += 1;

            let value = match params.get(&key.name) {
                Some(value) => value,
                None if key.optional => continue,
                None => return Err(Error::MissingParam(key.name.clone())),
            };

            let occurrences: Vec<&str> = if key.repeat {
                value.split('/').collect()
            } else {
                vec![value.as_str()]
            };
            for occurrence in occurrences {
                let encoded = encode(occurrence);
                if !validator.is_match(&encoded) {
                    return Err(Error::ParamMismatch {
                        name: key.name.clone(),
                        value: value.clone(),
                    });
                }
                path.push_str(&key.prefix);
                path.push_str(&encoded);
            }
        }

        Ok(path)
    }
}

fn tokenize(pattern: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut unnamed = 0usize;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    literal.push(escaped);
                }
            }
            ':' if chars.peek().is_some_and(|c| is_name_char(*c)) => {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_name_char(c) {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                let custom = if chars.peek() == Some(&'(') {
                    chars.next();
                    Some(read_group(&mut chars, pattern)?)
                } else {
                    None
                };
                push_param(&mut tokens, &mut literal, name, custom, &mut chars);
            }
            '(' => {
                let group = read_group(&mut chars, pattern)?;
                push_param(&mut tokens, &mut literal, unnamed.to_string(), Some(group), &mut chars);
                unnamed += 1;
            }
            '*' => {
                let prefix = take_prefix(&mut literal);
                flush_literal(&mut tokens, &mut literal);
                tokens.push(Token::Param(Key {
                    name: unnamed.to_string(),
                    prefix,
                    pattern: ".*".to_string(),
                    optional: false,
                    repeat: false,
                }));
                unnamed += 1;
            }
            _ => literal.push(c),
        }
    }

    flush_literal(&mut tokens, &mut literal);
    Ok(tokens)
}

fn push_param(
    tokens: &mut Vec<Token>,
    literal: &mut String,
    name: String,
    custom: Option<String>,
    chars: &mut Peekable<Chars<'_>>,
) {
    let prefix = take_prefix(literal);
    flush_literal(tokens, literal);

    let modifier = match chars.peek() {
        Some(&m) if matches!(m, '?' | '*' | '+') => {
            chars.next();
            Some(m)
        }
        _ => None,
    };

    tokens.push(Token::Param(Key {
        name,
        prefix,
        pattern: custom.unwrap_or_else(|| SEGMENT.to_string()),
        optional: matches!(modifier, Some('?' | '*')),
        repeat: matches!(modifier, Some('+' | '*')),
    }));
}

/// Read a group body after its opening `(`, up to the matching `)`.
fn read_group(chars: &mut Peekable<Chars<'_>>, pattern: &str) -> Result<String, Error> {
    let mut depth = 1;
    let mut group = String::new();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                group.push(c);
                if let Some(escaped) = chars.next() {
                    group.push(escaped);
                }
                continue;
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    if group.is_empty() {
                        return Err(Error::EmptyGroup(pattern.to_string()));
                    }
                    return Ok(group);
                }
            }
            _ => {}
        }
        group.push(c);
    }

    Err(Error::UnbalancedGroup(pattern.to_string()))
}

fn take_prefix(literal: &mut String) -> String {
    match literal.chars().last() {
        Some(c @ ('/' | '.')) => {
            literal.pop();
            c.to_string()
        }
        _ => String::new(),
    }
}

fn flush_literal(tokens: &mut Vec<Token>, literal: &mut String) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

fn to_regex_source(tokens: &[Token], options: &MatchOptions) -> String {
    let mut source = format!("{}^", case_flag(options));
    let mut index = 0;

    for token in tokens {
        match token {
            Token::Literal(text) => source.push_str(&regex::escape(text)),
            Token::Param(key) => {
                let prefix = regex::escape(&key.prefix);
                let name = capture_name(index);
                index += 1;

                let capture = if key.repeat {
                    format!("(?P<{name}>(?:{p})(?:{prefix}(?:{p}))*)", p = key.pattern)
                } else {
                    format!("(?P<{name}>{})", key.pattern)
                };
                if key.optional {
                    source.push_str(&format!("(?:{prefix}{capture})?"));
                } else {
                    source.push_str(&prefix);
                    source.push_str(&capture);
                }
            }
        }
    }

    let ends_with_slash = matches!(tokens.last(), Some(Token::Literal(text)) if text.ends_with('/'));
    if !options.strict {
        if ends_with_slash {
            source.pop();
        }
        source.push_str("(?:/)?");
    }

    if options.end {
        source.push('$');
    } else if !(options.strict && ends_with_slash) {
        source.push_str("(?:/|$)");
    }

    source
}

fn build_regex(pattern: &str, source: &str) -> Result<Regex, Error> {
    Regex::new(source).map_err(|source| Error::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

fn case_flag(options: &MatchOptions) -> &'static str {
    if options.sensitive {
        ""
    } else {
        "(?i)"
    }
}

fn capture_name(index: usize) -> String {
    format!("__k{index}")
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|value| value.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Percent-encode each `/`-separated segment, keeping the separators.
fn encode(value: &str) -> String {
    value
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
