//! Safe parser for stringified literal structures.
//!
//! Some upstream exports store structured cells as the source text of a
//! literal, e.g. a `top_3_cast` column holding
//! `[('nm0000001', 'Fred Astaire'), ('nm0000002', 'Lauren Bacall')]`.
//! [`parse`] reads that literal syntax and nothing else: strings, numbers,
//! `True`/`False`/`None`, lists, tuples, sets and dicts. Names, calls and
//! operators are rejected, so no input is ever evaluated.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::borrow::Cow;

/// Deepest container nesting accepted before parsing is abandoned.
pub const MAX_DEPTH: usize = 128;

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character {found:?} at byte {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unterminated string starting at byte {offset}")]
    UnterminatedString { offset: usize },
    #[error("invalid escape sequence at byte {offset}")]
    InvalidEscape { offset: usize },
    #[error("invalid number {text:?} at byte {offset}")]
    InvalidNumber { text: String, offset: usize },
    #[error("{name:?} at byte {offset} is not a literal")]
    NotALiteral { name: String, offset: usize },
    #[error("unhashable value used as a set element or dict key at byte {offset}")]
    Unhashable { offset: usize },
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
    #[error("trailing input at byte {offset}")]
    TrailingInput { offset: usize },
}

/// Parse `text` as a single literal. Surrounding whitespace is ignored.
pub fn parse(text: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser { src: text, pos: 0 };
    parser.skip_ws();
    let value = parser.value(0)?;
    parser.skip_ws();
    match parser.peek() {
        None => Ok(value),
        Some(_) => Err(LiteralError::TrailingInput { offset: parser.pos }),
    }
}

impl Literal {
    /// Whether the value may be a set element or dict key.
    pub fn is_hashable(&self) -> bool {
        match self {
            Literal::List(_) | Literal::Set(_) | Literal::Dict(_) => false,
            Literal::Tuple(items) => items.iter().all(Literal::is_hashable),
            _ => true,
        }
    }

    /// Text used when this value becomes a JSON object key.
    pub fn key_string(&self) -> String {
        match self {
            Literal::Str(s) => s.clone(),
            Literal::None => "null".to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Int(i) => i.to_string(),
            Literal::Float(f) => format!("{f:?}"),
            other => other.to_string(),
        }
    }

    /// Key equality for sets and dicts, where `1`, `1.0` and `True` are one key.
    pub fn same_key(&self, other: &Literal) -> bool {
        match (self, other) {
            (Literal::Tuple(a), Literal::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_key(y))
            }
            _ => match (self.integral(), other.integral()) {
                (Some(a), Some(b)) => a == b,
                _ => self == other,
            },
        }
    }

    fn integral(&self) -> Option<i64> {
        match *self {
            Literal::Bool(b) => Some(i64::from(b)),
            Literal::Int(i) => Some(i),
            Literal::Float(f) if f.fract() == 0.0 && f.abs() < 9.223_372_036_854_776e18 => {
                Some(f as i64)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn join(f: &mut std::fmt::Formatter<'_>, items: &[Literal]) -> std::fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self {
            Literal::None => write!(f, "None"),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::Str(s) => write!(f, "{s:?}"),
            Literal::List(items) => {
                write!(f, "[")?;
                join(f, items)?;
                write!(f, "]")
            }
            Literal::Tuple(items) => {
                write!(f, "(")?;
                join(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Literal::Set(items) => {
                write!(f, "{{")?;
                join(f, items)?;
                write!(f, "}}")
            }
            Literal::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Tuples, lists and sets become JSON arrays; dicts become objects keyed by
/// [`Literal::key_string`].
impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Literal::None => serializer.serialize_unit(),
            Literal::Bool(b) => serializer.serialize_bool(*b),
            Literal::Int(i) => serializer.serialize_i64(*i),
            Literal::Float(v) => serializer.serialize_f64(*v),
            Literal::Str(s) => serializer.serialize_str(s),
            Literal::List(items) | Literal::Tuple(items) | Literal::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Literal::Dict(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(&k.key_string(), v)?;
                }
                map.end()
            }
        }
    }
}

/// Remove `_` digit separators, accepting them only between two digits of
/// `radix` (`1_000` but not `_1`, `1__0` or `1_e5`).
///
/// Returns `None` when a separator is misplaced.
pub fn strip_digit_separators(text: &str, radix: u32) -> Option<Cow<'_, str>> {
    if !text.contains('_') {
        return Some(Cow::Borrowed(text));
    }
    let bytes = text.as_bytes();
    let is_digit = |b: Option<&u8>| b.is_some_and(|&b| char::from(b).is_digit(radix));
    for (i, _) in text.match_indices('_') {
        let before = i.checked_sub(1).and_then(|j| bytes.get(j));
        if !is_digit(before) || !is_digit(bytes.get(i + 1)) {
            return None;
        }
    }
    Some(Cow::Owned(text.replace('_', "")))
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(found) => LiteralError::Unexpected {
                found,
                offset: self.pos,
            },
            None => LiteralError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, want: char) -> Result<(), LiteralError> {
        if self.peek() == Some(want) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Skips whitespace, `#` comments and backslash line continuations.
    fn skip_ws(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.bump();
                    }
                }
                Some('\\') if self.peek_nth(1) == Some('\n') => {
                    self.pos += 2;
                }
                _ => return,
            }
        }
    }

    fn value(&mut self, depth: usize) -> Result<Literal, LiteralError> {
        if depth > MAX_DEPTH {
            return Err(LiteralError::TooDeep(MAX_DEPTH));
        }
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some('[') => {
                self.bump();
                let (items, _) = self.items(']', depth)?;
                Ok(Literal::List(items))
            }
            Some('(') => {
                self.bump();
                let (mut items, saw_comma) = self.items(')', depth)?;
                if items.len() == 1 && !saw_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Literal::Tuple(items))
                }
            }
            Some('{') => self.braced(depth),
            Some('\'' | '"') => self.strings(false),
            Some(c) if c.is_ascii_digit() || matches!(c, '.' | '+' | '-') => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some(_) => Err(self.unexpected()),
        }
    }

    /// Comma-separated values up to `close`. The flag reports whether any
    /// comma was seen, which is what separates `(x)` from `(x,)`.
    fn items(&mut self, close: char, depth: usize) -> Result<(Vec<Literal>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, saw_comma));
            }
            items.push(self.value(depth + 1)?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    saw_comma = true;
                }
                Some(c) if c == close => {
                    self.bump();
                    return Ok((items, saw_comma));
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn hashable(&mut self, depth: usize) -> Result<Literal, LiteralError> {
        let offset = self.pos;
        let value = self.value(depth + 1)?;
        if value.is_hashable() {
            Ok(value)
        } else {
            Err(LiteralError::Unhashable { offset })
        }
    }

    fn braced(&mut self, depth: usize) -> Result<Literal, LiteralError> {
        self.bump();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Literal::Dict(Vec::new()));
        }

        let mut key = self.hashable(depth)?;
        self.skip_ws();
        if self.peek() != Some(':') {
            let mut items = vec![key];
            loop {
                self.skip_ws();
                match self.peek() {
                    Some('}') => {
                        self.bump();
                        break;
                    }
                    Some(',') => {
                        self.bump();
                        self.skip_ws();
                        if self.peek() == Some('}') {
                            continue;
                        }
                        let item = self.hashable(depth)?;
                        if !items.iter().any(|seen| seen.same_key(&item)) {
                            items.push(item);
                        }
                    }
                    _ => return Err(self.unexpected()),
                }
            }
            return Ok(Literal::Set(items));
        }

        let mut entries: Vec<(Literal, Literal)> = Vec::new();
        loop {
            self.expect(':')?;
            self.skip_ws();
            let value = self.value(depth + 1)?;
            match entries.iter_mut().find(|(k, _)| k.same_key(&key)) {
                Some(slot) => slot.1 = value,
                None => entries.push((key, value)),
            }
            self.skip_ws();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Literal::Dict(entries));
                }
                Some(',') => {
                    self.bump();
                }
                _ => return Err(self.unexpected()),
            }
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Literal::Dict(entries));
            }
            key = self.hashable(depth)?;
            self.skip_ws();
        }
    }

    /// One string literal followed by any adjacent ones, concatenated.
    fn strings(&mut self, raw: bool) -> Result<Literal, LiteralError> {
        let mut out = String::new();
        self.string_body(raw, &mut out)?;
        loop {
            self.skip_ws();
            match (self.peek(), self.peek_nth(1)) {
                (Some('\'' | '"'), _) => self.string_body(false, &mut out)?,
                (Some(p @ ('r' | 'R' | 'u' | 'U')), Some('\'' | '"')) => {
                    self.bump();
                    self.string_body(matches!(p, 'r' | 'R'), &mut out)?;
                }
                _ => break,
            }
        }
        Ok(Literal::Str(out))
    }

    fn string_body(&mut self, raw: bool, out: &mut String) -> Result<(), LiteralError> {
        let offset = self.pos;
        let quote = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.pos += 2 * quote.len_utf8();
        }

        loop {
            let c = self
                .bump()
                .ok_or(LiteralError::UnterminatedString { offset })?;
            match c {
                c if c == quote => {
                    if !triple {
                        return Ok(());
                    }
                    if self.peek() == Some(quote) && self.peek_nth(1) == Some(quote) {
                        self.pos += 2 * quote.len_utf8();
                        return Ok(());
                    }
                    out.push(c);
                }
                '\n' if !triple => return Err(LiteralError::UnterminatedString { offset }),
                '\\' if raw => {
                    out.push('\\');
                    match self.bump() {
                        Some(next) => out.push(next),
                        None => return Err(LiteralError::UnterminatedString { offset }),
                    }
                }
                '\\' => self.escape(out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let offset = self.pos - 1;
        let c = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        match c {
            '\n' => {}
            '\\' | '\'' | '"' => out.push(c),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            'x' => out.push(self.hex_escape(2, offset)?),
            'u' => out.push(self.hex_escape(4, offset)?),
            'U' => out.push(self.hex_escape(8, offset)?),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            self.bump();
                            code = code * 8 + d;
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(code).ok_or(LiteralError::InvalidEscape { offset })?);
            }
            // Unknown escapes keep their backslash.
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, digits: usize, offset: usize) -> Result<char, LiteralError> {
        let mut code: u32 = 0;
        for _ in 0..digits {
            let d = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or(LiteralError::InvalidEscape { offset })?;
            code = code * 16 + d;
        }
        char::from_u32(code).ok_or(LiteralError::InvalidEscape { offset })
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let src = self.src;
        let offset = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.bump();
                true
            }
            Some('+') => {
                self.bump();
                false
            }
            _ => false,
        };
        self.skip_ws();

        let start = self.pos;
        let invalid = |parser: &Self| LiteralError::InvalidNumber {
            text: parser.src[offset..parser.pos].to_string(),
            offset,
        };

        if self.peek() == Some('0')
            && matches!(self.peek_nth(1), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'))
        {
            self.bump();
            let radix = match self.bump() {
                Some('x' | 'X') => 16,
                Some('o' | 'O') => 8,
                _ => 2,
            };
            let digits_start = self.pos;
            while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
                self.bump();
            }
            let digits = src[digits_start..self.pos].trim_start_matches('_');
            let digits = strip_digit_separators(digits, radix).ok_or_else(|| invalid(self))?;
            let value = i64::from_str_radix(&digits, radix).map_err(|_| invalid(self))?;
            return Ok(Literal::Int(if negative { -value } else { value }));
        }

        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_' || c == '.') {
            self.bump();
        }
        let mut is_float = src[start..self.pos].contains('.');
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
                self.bump();
            }
        }
        if matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            // Complex numbers (`1j`) and identifiers glued to digits.
            self.bump();
            return Err(invalid(self));
        }

        let text =
            strip_digit_separators(&src[start..self.pos], 10).ok_or_else(|| invalid(self))?;
        if text.is_empty() {
            return Err(invalid(self));
        }

        if is_float {
            let value: f64 = text.parse().map_err(|_| invalid(self))?;
            return Ok(Literal::Float(if negative { -value } else { value }));
        }

        if text.len() > 1 && text.starts_with('0') && text.bytes().any(|b| b != b'0') {
            return Err(invalid(self));
        }
        let signed = if negative {
            Cow::Owned(format!("-{text}"))
        } else {
            text
        };
        signed
            .parse::<i64>()
            .map(Literal::Int)
            .map_err(|_| invalid(self))
    }

    fn name(&mut self) -> Result<Literal, LiteralError> {
        let src = self.src;
        let offset = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let name = &src[offset..self.pos];
        let not_literal = || LiteralError::NotALiteral {
            name: name.to_string(),
            offset,
        };

        if matches!(self.peek(), Some('\'' | '"')) {
            return match name {
                "r" | "R" => self.strings(true),
                "u" | "U" => self.strings(false),
                _ => Err(not_literal()),
            };
        }
        match name {
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            "None" => Ok(Literal::None),
            _ => Err(not_literal()),
        }
    }
}
