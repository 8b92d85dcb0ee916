//! Route pattern compilation.
//!
//! # Responsibilities
//! - Translate pattern sources in the token grammar into anchored regexes
//! - Track capture groups (Absolute routes only) and their source text
//! - Assign a specificity rank used to order pattern children in lazy tries
//!
//! # Token grammar
//! | Token | Class |
//! |---|---|
//! | `:a` | `[^/]+` |
//! | `:d` | `\d+` |
//! | `:D` | `\D+` |
//! | `:w` | `[A-Za-z]+` |
//! | `:W` | `[^A-Za-z]+` |
//! | `:[expr]` | `[expr]+` unless a quantifier follows |
//! | `{n}`, `{min,max}` | bounded quantifier replacing the preceding `+` |
//! | `(...)` | capture group, Absolute routes only |
//!
//! Everything else is a literal. Compilation failures are registration-time
//! errors; a compiled matcher can never fail at dispatch.

use regex::Regex;
use thiserror::Error;

use crate::module::descriptor::{RouteDecl, RouteKind};

/// Registration-time pattern compilation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Absolute and shadow patterns must be anchored at the distributor root.
    #[error("pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    /// Capture groups are only meaningful for absolute routes.
    #[error("pattern '{0}' uses a capture group, which lazy routes do not support")]
    UnsupportedCapture(String),

    /// `:[expr]` with no closing bracket.
    #[error("pattern '{0}' has an unterminated character class")]
    UnterminatedClass(String),

    /// `(` without `)` or a stray `)`.
    #[error("pattern '{0}' has unbalanced capture group parentheses")]
    UnbalancedGroup(String),

    /// `:x` where `x` is not a recognised token letter.
    #[error("pattern '{pattern}' uses unknown token ':{token}'")]
    UnknownToken { pattern: String, token: char },

    /// `{...}` not preceded by a token, or with non-numeric bounds.
    #[error("pattern '{pattern}' has a malformed quantifier '{{{quantifier}}}'")]
    BadQuantifier { pattern: String, quantifier: String },

    /// The assembled expression failed to compile. Indicates an escaping bug
    /// in a custom character class rather than a user error.
    #[error("pattern '{pattern}' produced an invalid expression: {reason}")]
    InvalidExpression { pattern: String, reason: String },
}

/// A compiled route: anchored matcher plus capture metadata and the original
/// declaration. Rebuilt deterministically on every table build.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub matcher: Regex,
    /// Source text of each capture group, left to right.
    pub capture_names: Vec<String>,
    /// Higher ranks match earlier among pattern children of a lazy node.
    pub specificity: u32,
    pub decl: RouteDecl,
}

/// Compile a route declaration's pattern.
pub fn compile(decl: &RouteDecl) -> Result<CompiledRoute, PatternError> {
    let pattern = decl.pattern.as_str();

    match decl.kind {
        RouteKind::Absolute | RouteKind::Shadow => {
            if !pattern.starts_with('/') {
                return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
            }
        }
        RouteKind::Lazy => {}
    }

    let allow_captures = decl.kind == RouteKind::Absolute;
    // Shadow patterns match a path prefix and forward the remainder, so
    // they are anchored at the start only.
    let anchor_end = decl.kind != RouteKind::Shadow;
    let compiled = translate(pattern, allow_captures, anchor_end)?;

    let matcher = Regex::new(&compiled.regex).map_err(|e| PatternError::InvalidExpression {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    Ok(CompiledRoute {
        matcher,
        capture_names: compiled.capture_names,
        specificity: compiled.specificity,
        decl: decl.clone(),
    })
}

/// Compile a bare pattern segment (no captures) for lazy-trie children.
pub fn compile_segment(segment: &str, pattern: &str) -> Result<Regex, PatternError> {
    let compiled = translate(segment, false, true).map_err(|e| match e {
        // Attribute segment-level failures to the full pattern.
        PatternError::UnsupportedCapture(_) => {
            PatternError::UnsupportedCapture(pattern.to_string())
        }
        PatternError::UnterminatedClass(_) => {
            PatternError::UnterminatedClass(pattern.to_string())
        }
        PatternError::UnknownToken { token, .. } => PatternError::UnknownToken {
            pattern: pattern.to_string(),
            token,
        },
        PatternError::BadQuantifier { quantifier, .. } => PatternError::BadQuantifier {
            pattern: pattern.to_string(),
            quantifier,
        },
        other => other,
    })?;
    Regex::new(&compiled.regex).map_err(|e| PatternError::InvalidExpression {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Specificity of a single segment: literal segments outrank token segments.
pub fn segment_specificity(segment: &str) -> u32 {
    if segment.contains(':') {
        0
    } else {
        1
    }
}

struct Translated {
    regex: String,
    capture_names: Vec<String>,
    specificity: u32,
}

/// Translate the token grammar into an anchored regex.
fn translate(
    pattern: &str,
    allow_captures: bool,
    anchor_end: bool,
) -> Result<Translated, PatternError> {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push('^');

    let mut capture_names = Vec::new();
    let mut group_starts: Vec<usize> = Vec::new();
    let mut specificity: u32 = 0;
    // Set after each token so a following `{..}` can replace the `+`.
    let mut last_was_token = false;

    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            ':' => {
                let next = *chars.get(i + 1).ok_or_else(|| PatternError::UnknownToken {
                    pattern: pattern.to_string(),
                    token: ' ',
                })?;
                match next {
                    'a' => out.push_str("[^/]+"),
                    'd' => out.push_str(r"\d+"),
                    'D' => out.push_str(r"\D+"),
                    'w' => out.push_str("[A-Za-z]+"),
                    'W' => out.push_str("[^A-Za-z]+"),
                    '[' => {
                        let close = find_class_end(&chars, i + 2).ok_or_else(|| {
                            PatternError::UnterminatedClass(pattern.to_string())
                        })?;
                        let expr: String = chars[i + 1..=close].iter().collect();
                        out.push_str(&expr);
                        out.push('+');
                        last_was_token = true;
                        i = close + 1;
                        continue;
                    }
                    other => {
                        return Err(PatternError::UnknownToken {
                            pattern: pattern.to_string(),
                            token: other,
                        })
                    }
                }
                last_was_token = true;
                i += 2;
                continue;
            }
            '{' => {
                let close = chars[i..]
                    .iter()
                    .position(|c| *c == '}')
                    .map(|offset| i + offset);
                let quantifier: String = match close {
                    Some(end) => chars[i + 1..end].iter().collect(),
                    None => {
                        return Err(PatternError::BadQuantifier {
                            pattern: pattern.to_string(),
                            quantifier: chars[i + 1..].iter().collect(),
                        })
                    }
                };
                if !last_was_token || !valid_quantifier(&quantifier) {
                    return Err(PatternError::BadQuantifier {
                        pattern: pattern.to_string(),
                        quantifier,
                    });
                }
                // Replace the token's `+` with the bounded quantifier.
                out.pop();
                out.push('{');
                out.push_str(&quantifier);
                out.push('}');
                last_was_token = false;
                // close is always Some here: the None case returned above.
                i = close.unwrap_or(chars.len()).saturating_add(1);
                continue;
            }
            '(' => {
                if !allow_captures {
                    return Err(PatternError::UnsupportedCapture(pattern.to_string()));
                }
                group_starts.push(i);
                out.push('(');
                last_was_token = false;
            }
            ')' => {
                let start = group_starts
                    .pop()
                    .ok_or_else(|| PatternError::UnbalancedGroup(pattern.to_string()))?;
                let source: String = chars[start + 1..i].iter().collect();
                capture_names.push(source);
                out.push(')');
                last_was_token = false;
            }
            c => {
                if c != '/' {
                    specificity = specificity.saturating_add(1);
                }
                push_literal(&mut out, c);
                last_was_token = false;
            }
        }
        i += 1;
    }

    if !group_starts.is_empty() {
        return Err(PatternError::UnbalancedGroup(pattern.to_string()));
    }

    if anchor_end {
        out.push('$');
    }
    Ok(Translated {
        regex: out,
        capture_names,
        specificity,
    })
}

/// Find the index of the `]` closing a custom class opened just before
/// `start`. Honours `\]` escapes.
fn find_class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            ']' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// `{n}` or `{min,max}` with numeric bounds.
fn valid_quantifier(q: &str) -> bool {
    let parts: Vec<&str> = q.split(',').collect();
    match parts.as_slice() {
        [n] => !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()),
        [min, max] => {
            !min.is_empty()
                && !max.is_empty()
                && min.bytes().all(|b| b.is_ascii_digit())
                && max.bytes().all(|b| b.is_ascii_digit())
        }
        _ => false,
    }
}

fn push_literal(out: &mut String, c: char) {
    if regex_metachar(c) {
        out.push('\\');
    }
    out.push(c);
}

fn regex_metachar(c: char) -> bool {
    matches!(
        c,
        '\\' | '.' | '+' | '*' | '?' | '^' | '$' | '[' | ']' | '{' | '}' | '|'
    )
}
