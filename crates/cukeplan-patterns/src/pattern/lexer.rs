//! Splits expression source into literal text and `{name}` placeholders.
//!
//! The lexer is registry-agnostic: every `{identifier}` becomes a
//! [`Token::Placeholder`] and the compiler decides later whether the name
//! refers to a known placeholder kind or should be kept as literal text.

use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(String),
    Placeholder { start: usize, name: String },
}

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Try to read `{name}` starting just after the opening brace. Returns the
/// name and leaves the iterator after the closing brace on success; on
/// failure the iterator is left untouched.
fn read_placeholder(chars: &mut Peekable<CharIndices<'_>>) -> Option<String> {
    let mut lookahead = chars.clone();
    let mut name = String::new();
    match lookahead.peek() {
        Some(&(_, ch)) if is_name_start(ch) => {}
        _ => return None,
    }
    while let Some(&(_, ch)) = lookahead.peek() {
        if !is_name_char(ch) {
            break;
        }
        name.push(ch);
        lookahead.next();
    }
    match lookahead.next() {
        Some((_, '}')) => {
            *chars = lookahead;
            Some(name)
        }
        _ => None,
    }
}

pub(crate) fn lex_pattern(pattern: &str) -> Vec<Token> {
    let mut chars = pattern.char_indices().peekable();
    let mut tokens = Vec::new();
    let mut literal = String::new();

    let flush_literal = |literal: &mut String, tokens: &mut Vec<Token>| {
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(literal)));
        }
    };

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, next)) => literal.push(next),
                None => literal.push('\\'),
            },
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    literal.push('{');
                    continue;
                }
                if let Some(name) = read_placeholder(&mut chars) {
                    flush_literal(&mut literal, &mut tokens);
                    tokens.push(Token::Placeholder { start: pos, name });
                } else {
                    literal.push('{');
                }
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                }
                literal.push('}');
            }
            other => literal.push(other),
        }
    }

    flush_literal(&mut literal, &mut tokens);
    tokens
}
