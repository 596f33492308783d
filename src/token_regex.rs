use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Lookaround-capable pattern matching one whole class token inside a raw
/// `class` attribute. Tokens are separated by ASCII whitespace only, so a
/// no-break space stays part of its token.
#[derive(Debug, Clone)]
pub(crate) struct TokenPattern {
    backend: fancy_regex::Regex,
}

impl TokenPattern {
    pub(crate) fn new(token: &str) -> Result<Self, PatternError> {
        let pattern = format!(r"(?:^|[\t\n\x0C\r ]){}(?![^\t\n\x0C\r ])", escape(token));
        let backend = fancy_regex::Regex::new(&pattern).map_err(PatternError::from)?;
        Ok(Self { backend })
    }

    pub(crate) fn is_match(&self, input: &str) -> Result<bool, PatternError> {
        self.backend.is_match(input).map_err(PatternError::from)
    }

    /// Byte ranges of every occurrence, including the leading whitespace.
    pub(crate) fn find_all(&self, input: &str) -> Result<Vec<Range<usize>>, PatternError> {
        let mut out = Vec::new();
        for matched in self.backend.find_iter(input) {
            let matched = matched.map_err(PatternError::from)?;
            out.push(matched.start()..matched.end());
        }
        Ok(out)
    }

    /// `input` with every occurrence cut out.
    pub(crate) fn remove_all(&self, input: &str) -> Result<String, PatternError> {
        let mut out = String::with_capacity(input.len());
        let mut last = 0usize;
        for range in self.find_all(input)? {
            out.push_str(&input[last..range.start]);
            out.push(' ');
            last = range.end;
        }
        out.push_str(&input[last..]);
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PatternError {
    message: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PatternError {}

impl From<fancy_regex::Error> for PatternError {
    fn from(value: fancy_regex::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

impl From<PatternError> for crate::Error {
    fn from(value: PatternError) -> Self {
        crate::Error::ClassPattern(value.message)
    }
}

pub(crate) fn escape(value: &str) -> Cow<'_, str> {
    if !value.chars().any(is_regex_meta) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 4);
    for ch in value.chars() {
        if is_regex_meta(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    Cow::Owned(out)
}

fn is_regex_meta(ch: char) -> bool {
    matches!(
        ch,
        '\\' | '.' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '^' | '$'
    )
}
