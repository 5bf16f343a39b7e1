//! Lexical primitives built on the [`Cursor`]
//!
//! These functions recognize the small amount of syntax the preprocessor cares about:
//!     macro names, whitespace between a directive and its operands,
//!     and balanced brace and bracket groups holding macro arguments.
//! Everything else in a TeX document is opaque to them.

use crate::cursor::Cursor;
use crate::error::{SyntaxError, SyntaxErrorKind};

/// The character that introduces a macro name.
pub const SIGIL: char = '\\';

/// The character that starts a line comment.
pub const COMMENT: char = '%';

/// Whether the character can appear in a macro name.
pub fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Skip whitespace and return what was skipped.
///
/// If `allow_newline` is false the skip stops at a `\n`, which is not consumed.
pub fn skip_whitespace<'a>(cursor: &mut Cursor<'a>, allow_newline: bool) -> &'a str {
    cursor.advance_while(|c| c.is_whitespace() && (allow_newline || c != '\n'))
}

/// Read the maximal run of name characters at the current position.
///
/// Returns the empty string if the next character is not a name character.
pub fn read_macro_name<'a>(cursor: &mut Cursor<'a>) -> &'a str {
    cursor.advance_while(is_name_char)
}

/// Read a sigil followed by a macro name, returning the name.
///
/// Returns [`None`] and consumes nothing if the next character is not a sigil
///     or the sigil is not followed by a name.
pub fn read_control_sequence<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    let start = cursor.position();
    cursor.advance_if(|c| c == SIGIL)?;
    let name = read_macro_name(cursor);
    if name.is_empty() {
        cursor.seek(start);
        return None;
    }
    Some(name)
}

/// Consume `keyword` if it appears at the current position as a complete word.
pub fn read_keyword(cursor: &mut Cursor, keyword: &str) -> bool {
    let n = keyword.chars().count();
    if cursor.peek_n(n) != keyword {
        return false;
    }
    let start = cursor.position();
    for _ in 0..n {
        cursor.advance();
    }
    if cursor.peek().map(is_name_char).unwrap_or(false) {
        cursor.seek(start);
        return false;
    }
    true
}

/// Return everything up to the first delimiter outside of a nested group.
///
/// Nesting is tracked separately for `{}` and `[]`;
///     a delimiter only terminates the content when both depths are zero.
/// The delimiter itself is not consumed.
/// A closing bracket that appears at depth zero and is not a delimiter
///     is treated as content.
///
/// Running out of input while a group is open is an error,
///     as is running out of input before any delimiter is found.
pub fn parse_until<'a>(cursor: &mut Cursor<'a>, delimiters: &[char]) -> Result<&'a str, SyntaxError> {
    let start = cursor.position();
    let mut braces: usize = 0;
    let mut brackets: usize = 0;
    loop {
        let Some(c) = cursor.peek() else {
            let open = if braces > 0 {
                '{'
            } else if brackets > 0 {
                '['
            } else {
                delimiters.first().copied().map(opener).unwrap_or('{')
            };
            return Err(SyntaxError::new(
                start.line,
                SyntaxErrorKind::MissingClosingBracket { open },
            ));
        };
        if braces == 0 && brackets == 0 && delimiters.contains(&c) {
            return Ok(cursor.consumed_since(start));
        }
        match c {
            '{' => braces += 1,
            '}' => braces = braces.saturating_sub(1),
            '[' => brackets += 1,
            ']' => brackets = brackets.saturating_sub(1),
            _ => {}
        }
        cursor.advance();
    }
}

fn opener(close: char) -> char {
    match close {
        ']' | ',' | '=' => '[',
        _ => '{',
    }
}

/// Raw, unexpanded arguments of a module operation.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RawArgs<'a> {
    pub positional: Vec<&'a str>,
    pub keyword: Vec<(&'a str, &'a str)>,
}

/// Parse the brace groups and the optional bracket group following an operation name.
///
/// Each `{...}` group becomes a positional argument.
/// The bracket group is a comma separated list of values and `key=value` pairs;
///     values are trimmed.
/// A blank entry holds its position as an empty positional argument,
///     except a blank last entry, so `[]` and a trailing comma add nothing.
pub fn parse_arguments<'a>(cursor: &mut Cursor<'a>) -> Result<RawArgs<'a>, SyntaxError> {
    let mut args = RawArgs::default();
    while cursor.advance_if(|c| c == '{').is_some() {
        let value = parse_until(cursor, &['}'])?;
        cursor.advance();
        args.positional.push(value);
    }
    if cursor.advance_if(|c| c == '[').is_none() {
        return Ok(args);
    }
    loop {
        let value = parse_until(cursor, &[']', ',', '='])?;
        match cursor.advance() {
            Some('=') => {
                let key = value.trim();
                let value = parse_until(cursor, &[']', ','])?;
                args.keyword.push((key, value.trim()));
                if cursor.advance() == Some(']') {
                    return Ok(args);
                }
            }
            terminator => {
                let value = value.trim();
                if !value.is_empty() || terminator == Some(',') {
                    args.positional.push(value);
                }
                if terminator != Some(',') {
                    return Ok(args);
                }
            }
        }
    }
}
