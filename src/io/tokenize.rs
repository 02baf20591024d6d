//! Field splitting and a line cursor shared by all text codecs.
//!
//! [`split_with`] breaks a line on a list of delimiters; [`LineCursor`] walks
//! a file's lines with 1-based numbering so parse errors can point at the
//! offending line.

use crate::mesh_error::MeshConvertError;
use std::str::FromStr;

/// Space and tab.
pub const DEFAULT_DELIMITERS: &[&str] = &[" ", "\t"];

/// Split `line` on `delimiters`, dropping empty tokens.
///
/// At each position the first delimiter in list order that matches is
/// consumed. An empty line yields an empty vector.
pub fn split_with<'a>(line: &'a str, delimiters: &[&str]) -> Vec<&'a str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    while pos < line.len() {
        let rest = &line[pos..];
        match delimiters
            .iter()
            .find(|d| !d.is_empty() && rest.starts_with(**d))
        {
            Some(delim) => {
                if pos > start {
                    tokens.push(&line[start..pos]);
                }
                pos += delim.len();
                start = pos;
            }
            None => pos += rest.chars().next().map_or(1, char::len_utf8),
        }
    }
    if start < line.len() {
        tokens.push(&line[start..]);
    }
    tokens
}

/// Split on [`DEFAULT_DELIMITERS`].
#[inline]
pub fn fields(line: &str) -> Vec<&str> {
    split_with(line, DEFAULT_DELIMITERS)
}

/// Drop everything from the first `/` (OBJ `v/vt/vn` references).
#[inline]
pub fn strip_slash_suffix(token: &str) -> &str {
    match token.find('/') {
        Some(i) => &token[..i],
        None => token,
    }
}

/// One numbered line of input.
#[derive(Clone, Copy, Debug)]
pub struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    pub text: &'a str,
}

impl<'a> Line<'a> {
    pub fn fields(&self) -> Vec<&'a str> {
        fields(self.text)
    }

    /// First field, if any.
    pub fn keyword(&self) -> Option<&'a str> {
        self.fields().into_iter().next()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn is_comment(&self) -> bool {
        self.text.trim_start().starts_with('#')
    }

    /// Build a [`MeshConvertError::MalformedHeader`] for this line.
    pub fn malformed(&self, reason: impl Into<String>) -> MeshConvertError {
        MeshConvertError::malformed(self.number, self.text, reason)
    }

    /// Parse `token`, blaming this line on failure.
    pub fn parse<T: FromStr>(&self, token: &str, what: &str) -> Result<T, MeshConvertError> {
        token
            .parse::<T>()
            .map_err(|_| self.malformed(format!("invalid {what} `{token}`")))
    }

    /// Parse field `idx` of `fields`; a missing field is an error.
    pub fn parse_field<T: FromStr>(
        &self,
        fields: &[&str],
        idx: usize,
        what: &str,
    ) -> Result<T, MeshConvertError> {
        let token = fields
            .get(idx)
            .ok_or_else(|| self.malformed(format!("missing {what}")))?;
        self.parse(token, what)
    }
}

/// Forward-only cursor over the lines of a text buffer.
#[derive(Debug)]
pub struct LineCursor<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    last: usize,
    len: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last: 0,
            len: text.len(),
        }
    }

    /// `count * stride`, rejected when the input is too short to hold that
    /// many values. Header counts pass through here before any allocation.
    pub fn bounded(
        &self,
        line: &Line<'_>,
        count: usize,
        stride: usize,
        what: &str,
    ) -> Result<usize, MeshConvertError> {
        count
            .checked_mul(stride)
            .filter(|&total| total <= self.len)
            .ok_or_else(|| line.malformed(format!("{what} {count} exceeds input size")))
    }

    /// Number of the most recently returned line (0 before the first).
    pub fn line_number(&self) -> usize {
        self.last
    }

    pub fn next_line(&mut self) -> Option<Line<'a>> {
        let (idx, text) = self.lines.next()?;
        self.last = idx + 1;
        Some(Line {
            number: idx + 1,
            text,
        })
    }

    /// Next line that is not blank.
    pub fn next_nonblank(&mut self) -> Option<Line<'a>> {
        while let Some(line) = self.next_line() {
            if !line.is_blank() {
                return Some(line);
            }
        }
        None
    }

    /// Next line that is neither blank nor a `#` comment.
    pub fn next_data(&mut self) -> Option<Line<'a>> {
        while let Some(line) = self.next_nonblank() {
            if !line.is_comment() {
                return Some(line);
            }
        }
        None
    }

    /// Like [`next_data`](Self::next_data) but end of input is an error.
    pub fn expect_data(&mut self, what: &str) -> Result<Line<'a>, MeshConvertError> {
        self.next_data().ok_or_else(|| {
            MeshConvertError::malformed(
                self.last + 1,
                "",
                format!("unexpected end of input, expected {what}"),
            )
        })
    }

    /// Collect `count` whitespace-separated tokens, spanning lines as needed.
    ///
    /// Each token is returned with the line it came from.
    pub fn take_tokens(
        &mut self,
        count: usize,
        what: &str,
    ) -> Result<Vec<(Line<'a>, &'a str)>, MeshConvertError> {
        let mut out = Vec::with_capacity(count.min(self.len));
        while out.len() < count {
            let line = self.expect_data(what)?;
            for token in line.fields() {
                out.push((line, token));
            }
        }
        if out.len() > count {
            let (line, _) = out[count];
            return Err(line.malformed(format!("too many values for {what}")));
        }
        Ok(out)
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line()
    }
}
