//! Statement splitter for Gradle build scripts
//!
//! Turns raw script text into a flat stream of block openings, statements and
//! block closings, each tagged with the line it starts on. Comments are dropped
//! here; braces, semicolons and newlines inside string literals or parentheses
//! never split a statement.

use crate::{ResolverError, Result};
use std::collections::HashMap;

/// One lexical event of a build script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `header {` where header is the text before the brace (may be empty)
    Open { header: String, line: usize },
    /// A complete statement
    Stmt { text: String, line: usize },
    /// `}`
    Close { line: usize },
}

struct Splitter {
    tokens: Vec<Token>,
    buf: String,
    start_line: usize,
}

impl Splitter {
    fn push_char(&mut self, c: char, line: usize) {
        if self.buf.trim().is_empty() && !c.is_whitespace() {
            self.buf.clear();
            self.start_line = line;
        }
        self.buf.push(c);
    }

    fn flush(&mut self) {
        let text = self.buf.trim();
        if !text.is_empty() {
            self.tokens.push(Token::Stmt {
                text: text.to_string(),
                line: self.start_line,
            });
        }
        self.buf.clear();
    }

    fn open(&mut self, line: usize) {
        let header = self.buf.trim().to_string();
        let line = if header.is_empty() { line } else { self.start_line };
        self.tokens.push(Token::Open { header, line });
        self.buf.clear();
    }
}

/// Split a build script into tokens
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut splitter = Splitter {
        tokens: Vec::new(),
        buf: String::new(),
        start_line: 1,
    };

    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;
    let mut line = 1;
    let mut paren_depth = 0usize;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match c {
            '/' if next == Some('/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '/' if next == Some('*') => {
                let opened_at = line;
                i += 2;
                loop {
                    match chars.get(i) {
                        None => {
                            return Err(ResolverError::parse(
                                opened_at,
                                "/*",
                                "unterminated block comment",
                            ))
                        }
                        Some('*') if chars.get(i + 1) == Some(&'/') => {
                            i += 2;
                            break;
                        }
                        Some('\n') => line += 1,
                        Some(_) => {}
                    }
                    i += 1;
                }
                // a comment separates tokens like whitespace does
                splitter.push_char(' ', line);
                continue;
            }
            '"' if next == Some('"') && chars.get(i + 2) == Some(&'"') => {
                // Kotlin raw string: no escapes, may span lines
                let opened_at = line;
                for _ in 0..3 {
                    splitter.push_char('"', line);
                }
                i += 3;
                loop {
                    match chars.get(i) {
                        None => {
                            let text = input.lines().nth(opened_at - 1).unwrap_or("");
                            return Err(ResolverError::parse(
                                opened_at,
                                text,
                                "unterminated raw string literal",
                            ));
                        }
                        Some('"') if chars.get(i + 1) == Some(&'"') && chars.get(i + 2) == Some(&'"') => {
                            splitter.buf.push_str("\"\"\"");
                            i += 3;
                            break;
                        }
                        Some(&ch) => {
                            if ch == '\n' {
                                line += 1;
                            }
                            splitter.buf.push(ch);
                            i += 1;
                        }
                    }
                }
                continue;
            }
            '"' | '\'' => {
                let quote = c;
                splitter.push_char(c, line);
                i += 1;
                let mut template_depth = 0usize;
                loop {
                    match chars.get(i) {
                        None | Some('\n') => {
                            let text = input.lines().nth(splitter.start_line - 1).unwrap_or("");
                            return Err(ResolverError::parse(
                                splitter.start_line,
                                text,
                                "unterminated string literal",
                            ));
                        }
                        Some('\\') => {
                            splitter.buf.push('\\');
                            if let Some(escaped) = chars.get(i + 1) {
                                if *escaped == '\n' {
                                    line += 1;
                                }
                                splitter.buf.push(*escaped);
                            }
                            i += 2;
                        }
                        // `${…}` may itself contain quoted strings
                        Some('$') if quote == '"' && chars.get(i + 1) == Some(&'{') => {
                            splitter.buf.push_str("${");
                            template_depth += 1;
                            i += 2;
                        }
                        Some('{') if template_depth > 0 => {
                            splitter.buf.push('{');
                            template_depth += 1;
                            i += 1;
                        }
                        Some('}') if template_depth > 0 => {
                            splitter.buf.push('}');
                            template_depth -= 1;
                            i += 1;
                        }
                        Some(&ch) => {
                            splitter.buf.push(ch);
                            i += 1;
                            if ch == quote && template_depth == 0 {
                                break;
                            }
                        }
                    }
                }
                continue;
            }
            '(' => {
                paren_depth += 1;
                splitter.push_char(c, line);
            }
            ')' => {
                paren_depth = paren_depth.saturating_sub(1);
                splitter.push_char(c, line);
            }
            '\n' => {
                // a trailing comma continues the argument list on the next line
                if paren_depth == 0 && !splitter.buf.trim_end().ends_with(',') {
                    splitter.flush();
                } else {
                    splitter.buf.push(' ');
                }
                line += 1;
            }
            ';' if paren_depth == 0 => splitter.flush(),
            '{' => {
                paren_depth = 0;
                splitter.open(line);
            }
            '}' => {
                paren_depth = 0;
                splitter.flush();
                splitter.tokens.push(Token::Close { line });
            }
            _ => splitter.push_char(c, line),
        }
        i += 1;
    }

    splitter.flush();
    Ok(splitter.tokens)
}

/// A decoded string literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub value: String,
    /// The quote character the literal was written with
    pub quote: char,
}

/// Read a string literal at the start of `s`, returning it and the remaining text.
///
/// Double-quoted literals interpolate `$name` and `${name}` from `vars`; unknown
/// names and other `${…}` templates are kept verbatim. Single-quoted (Groovy)
/// literals are never interpolated. Kotlin raw strings (`"""…"""`) interpolate
/// but take no escapes.
pub fn read_literal<'a>(s: &'a str, vars: &HashMap<String, String>) -> Option<(Literal, &'a str)> {
    let s = s.trim_start();
    let quote = s.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let raw = s.starts_with("\"\"\"");
    let delimiter = if raw { "\"\"\"" } else { &s[..1] };

    let mut value = String::new();
    let mut chars = s.char_indices().skip(delimiter.len()).peekable();

    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' if !raw => {
                if let Some((_, escaped)) = chars.next() {
                    value.push(match escaped {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        other => other,
                    });
                }
            }
            '$' if quote == '"' => {
                let rest = &s[idx + 1..];
                let (name, consumed) = if let Some(inner) = rest.strip_prefix('{') {
                    match template_end(inner) {
                        Some(end) => (&inner[..end], end + 2),
                        None => ("", 0),
                    }
                } else {
                    let len = rest
                        .char_indices()
                        .find(|(_, ch)| !(ch.is_ascii_alphanumeric() || *ch == '_'))
                        .map(|(i, _)| i)
                        .unwrap_or(rest.len());
                    (&rest[..len], len)
                };

                match vars.get(name.trim()) {
                    Some(v) if !name.is_empty() => value.push_str(v),
                    _ => {
                        value.push('$');
                        value.push_str(&rest[..consumed]);
                    }
                }
                for _ in 0..rest[..consumed].chars().count() {
                    chars.next();
                }
            }
            _ if s[idx..].starts_with(delimiter) => {
                return Some((Literal { value, quote }, &s[idx + delimiter.len()..]));
            }
            c => value.push(c),
        }
    }

    None
}

/// Byte offset of the `}` closing a `${` template whose body starts `inner`
fn template_end(inner: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Split the leading identifier off `s`
pub fn split_ident(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let first = s.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let end = s
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

/// Given text starting with `(`, return the contents up to the matching `)` and the rest.
pub fn split_parens(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if !s.starts_with('(') {
        return None;
    }

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&s[1..i], &s[i + 1..]));
                }
            }
            _ => {}
        }
    }

    None
}

/// Split an argument list on top-level commas
pub fn split_args(s: &str) -> Vec<&str> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    let last = s[start..].trim();
    if !last.is_empty() || !args.is_empty() {
        args.push(last);
    }
    args
}
