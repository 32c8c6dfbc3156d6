//! Literal sequence parsing
//!
//! Turns the textual form of a config value into a structured value so list
//! constraints can check raw strings like `"[1, 2, 3]"`.
//!
//! ```text
//! literal := list | quoted | atom
//! list    := '[' ( literal ( ',' literal )* ','? )? ']'
//! quoted  := '\'' ... '\'' | '"' ... '"'
//! atom    := any run of characters except [ ] , ' "
//! ```
//!
//! Atoms stay text; element validators do any numeric coercion.

use serde_json::Value;

use crate::error::LiteralError;

const ATOM_STOP: [char; 5] = ['[', ']', ',', '\'', '"'];

/// Deepest list nesting accepted in a literal
pub const MAX_DEPTH: usize = 128;

/// Parse any literal out of `text`
pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut parser = LiteralParser::new(text);
    parser.skip_ws();
    if parser.at_end() {
        return Err(LiteralError::Empty);
    }
    let value = parser.parse_value()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(LiteralError::TrailingInput { offset: parser.pos });
    }
    Ok(value)
}

/// Parse a literal that is expected to be a sequence.
///
/// Returns whatever literal the text holds; callers decide what to do with
/// a well-formed value that is not an array.
pub fn parse_sequence(text: &str) -> Result<Value, LiteralError> {
    parse_literal(text)
}

/// Render a value back into literal text
pub fn to_literal_text(value: &Value) -> String {
    match value {
        Value::Null => "none".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(to_literal_text).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Object(_) => value.to_string(),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn unexpected(&self, found: char) -> LiteralError {
        LiteralError::Unexpected { found, offset: self.pos }
    }

    fn parse_value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(LiteralError::Empty),
            Some('[') => self.parse_list(),
            Some(q @ ('\'' | '"')) => self.parse_quoted(q),
            Some(c @ (']' | ',')) => Err(self.unexpected(c)),
            Some(_) => Ok(self.parse_atom()),
        }
    }

    fn parse_list(&mut self) -> Result<Value, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let list = self.parse_list_items();
        self.depth -= 1;
        list
    }

    fn parse_list_items(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err(LiteralError::Unterminated { what: "list" }),
                Some(']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                Some(_) => {}
            }

            items.push(self.parse_value()?);

            self.skip_ws();
            match self.peek() {
                None => return Err(LiteralError::Unterminated { what: "list" }),
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                Some(c) => return Err(self.unexpected(c)),
            }
        }
    }

    fn parse_quoted(&mut self, quote: char) -> Result<Value, LiteralError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralError::Unterminated { what: "string" }),
                Some('\\') => match self.bump() {
                    None => return Err(LiteralError::Unterminated { what: "string" }),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c) => out.push(c),
                },
                Some(c) if c == quote => return Ok(Value::String(out)),
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_atom(&mut self) -> Value {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if !ATOM_STOP.contains(&c)) {
            self.bump();
        }
        Value::String(self.src[start..self.pos].trim_end().to_string())
    }
}
