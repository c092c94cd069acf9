//! Shared line/token helpers for the OBJ and MTL parsers.

use corelib::LoadError;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// A trimmed source line with its 1-based number.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Line<'a> {
    pub number: usize,
    /// The whole line, for diagnostics.
    pub content: &'a str,
    /// `content` with any `#` comment cut off. Tokens come from here.
    pub body: &'a str,
}

impl<'a> Line<'a> {
    pub fn new(number: usize, raw: &'a str) -> Self {
        let raw = if number == 1 {
            raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw)
        } else {
            raw
        };
        let content = raw.trim();
        let body = content
            .split_once('#')
            .map_or(content, |(before, _)| before.trim_end());
        Self {
            number,
            content,
            body,
        }
    }

    /// Everything after the leading directive, trimmed.
    pub fn rest_after(&self, tag: &str) -> &'a str {
        self.body
            .strip_prefix(tag)
            .map(str::trim)
            .unwrap_or_default()
    }

    pub fn malformed(&self, reason: impl Into<String>) -> LoadError {
        LoadError::MalformedDirective {
            line: self.number,
            content: self.content.to_owned(),
            reason: reason.into(),
        }
    }

    fn bad_literal(&self, token: &str, expected: &'static str) -> LoadError {
        LoadError::MalformedNumericLiteral {
            line: self.number,
            token: token.to_owned(),
            expected,
            content: self.content.to_owned(),
        }
    }
}

pub(crate) fn parse_f32(token: &str, line: &Line<'_>) -> Result<f32, LoadError> {
    token
        .parse::<f32>()
        .map_err(|_| line.bad_literal(token, "float"))
}

pub(crate) fn parse_i32(token: &str, line: &Line<'_>) -> Result<i32, LoadError> {
    token
        .parse::<i32>()
        .map_err(|_| line.bad_literal(token, "integer"))
}

/// Raw OBJ index as written (1-based, may be zero or negative).
pub(crate) fn parse_index(token: &str, line: &Line<'_>) -> Result<i64, LoadError> {
    token
        .parse::<i64>()
        .map_err(|_| line.bad_literal(token, "index"))
}

/// Pull `N` floats off `parts`; extra trailing values are left untouched.
pub(crate) fn parse_floats<'t, const N: usize>(
    parts: &mut impl Iterator<Item = &'t str>,
    line: &Line<'_>,
    what: &str,
) -> Result<[f32; N], LoadError> {
    let mut out = [0.0; N];
    for (i, slot) in out.iter_mut().enumerate() {
        let token = parts
            .next()
            .ok_or_else(|| line.malformed(format!("{} needs {} values, got {}", what, N, i)))?;
        *slot = parse_f32(token, line)?;
    }
    Ok(out)
}
