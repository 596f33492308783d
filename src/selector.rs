use super::*;

/// Comma separated selectors; a node matches when any of them does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorList(pub(crate) Vec<Complex>);

/// `subject` plus the compounds to its left, nearest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Complex {
    pub(crate) subject: Compound,
    pub(crate) ancestors: Vec<(Combinator, Compound)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Combinator {
    Descendant,
    Child,
}

/// `tag#id.class[attr=value]:not(...)`; every part is optional but at least
/// one must be present. `*` leaves `tag` empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrMatch>,
    pub(crate) negated: Vec<SelectorList>,
}

/// `[name]` when `value` is `None`, `[name=value]` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttrMatch {
    pub(crate) name: String,
    pub(crate) value: Option<String>,
}

impl SelectorList {
    /// The id of a selector that is nothing but `#id`.
    pub(crate) fn lone_id(&self) -> Option<&str> {
        let [complex] = self.0.as_slice() else {
            return None;
        };
        let subject = &complex.subject;
        let plain = complex.ancestors.is_empty()
            && subject.tag.is_none()
            && subject.classes.is_empty()
            && subject.attrs.is_empty()
            && subject.negated.is_empty();
        if plain { subject.id.as_deref() } else { None }
    }
}

pub(crate) fn parse(selector: &str) -> Result<SelectorList> {
    let mut parser = Parser {
        source: selector,
        rest: selector,
    };
    let list = parser.list()?;
    parser.skip_ws();
    if !parser.rest.is_empty() {
        return Err(parser.error());
    }
    Ok(list)
}

struct Parser<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn error(&self) -> Error {
        Error::SelectorSyntax(self.source.to_string())
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn eat(&mut self, ch: char) -> bool {
        match self.rest.strip_prefix(ch) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn expect(&mut self, ch: char) -> Result<()> {
        if self.eat(ch) { Ok(()) } else { Err(self.error()) }
    }

    /// Returns whether any whitespace was skipped.
    fn skip_ws(&mut self) -> bool {
        let trimmed = self.rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        let skipped = trimmed.len() != self.rest.len();
        self.rest = trimmed;
        skipped
    }

    fn ident(&mut self) -> Option<String> {
        let len = self
            .rest
            .find(|c: char| !is_ident_char(c))
            .unwrap_or(self.rest.len());
        if len == 0 {
            return None;
        }
        let (ident, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(ident.to_string())
    }

    fn list(&mut self) -> Result<SelectorList> {
        let mut complexes = Vec::new();
        loop {
            self.skip_ws();
            complexes.push(self.complex()?);
            self.skip_ws();
            if !self.eat(',') {
                return Ok(SelectorList(complexes));
            }
        }
    }

    fn complex(&mut self) -> Result<Complex> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let spaced = self.skip_ws();
            match self.peek() {
                Some('>') => {
                    self.rest = &self.rest[1..];
                    self.skip_ws();
                    combinators.push(Combinator::Child);
                }
                Some(ch) if spaced && starts_compound(ch) => {
                    combinators.push(Combinator::Descendant);
                }
                _ => break,
            }
            compounds.push(self.compound()?);
        }

        let subject = compounds.pop().ok_or_else(|| self.error())?;
        let ancestors = combinators.into_iter().zip(compounds).rev().collect();
        Ok(Complex { subject, ancestors })
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();
        let mut empty = true;

        if self.eat('*') {
            empty = false;
        } else if let Some(tag) = self.ident() {
            compound.tag = Some(tag.to_ascii_lowercase());
            empty = false;
        }

        loop {
            if self.eat('#') {
                let id = self.ident().ok_or_else(|| self.error())?;
                if compound.id.replace(id).is_some() {
                    return Err(self.error());
                }
            } else if self.eat('.') {
                let class = self.ident().ok_or_else(|| self.error())?;
                compound.classes.push(class);
            } else if self.eat('[') {
                compound.attrs.push(self.attr()?);
            } else if self.eat(':') {
                let Some(rest) = self.rest.strip_prefix("not(") else {
                    return Err(self.error());
                };
                self.rest = rest;
                let inner = self.list()?;
                self.expect(')')?;
                compound.negated.push(inner);
            } else {
                break;
            }
            empty = false;
        }

        if empty {
            return Err(self.error());
        }
        Ok(compound)
    }

    // Called after the opening bracket.
    fn attr(&mut self) -> Result<AttrMatch> {
        self.skip_ws();
        let name = self.ident().ok_or_else(|| self.error())?.to_ascii_lowercase();
        self.skip_ws();
        if self.eat(']') {
            return Ok(AttrMatch { name, value: None });
        }
        self.expect('=')?;
        self.skip_ws();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.rest = &self.rest[1..];
                self.quoted(quote)?
            }
            _ => self.ident().ok_or_else(|| self.error())?,
        };
        self.skip_ws();
        self.expect(']')?;
        Ok(AttrMatch {
            name,
            value: Some(value),
        })
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        let mut value = String::new();
        let mut chars = self.rest.char_indices();
        while let Some((at, ch)) = chars.next() {
            match ch {
                '\\' => {
                    let (_, escaped) = chars.next().ok_or_else(|| self.error())?;
                    value.push(escaped);
                }
                ch if ch == quote => {
                    self.rest = &self.rest[at + ch.len_utf8()..];
                    return Ok(value);
                }
                ch => value.push(ch),
            }
        }
        Err(self.error())
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii()
}

fn starts_compound(ch: char) -> bool {
    is_ident_char(ch) || matches!(ch, '*' | '#' | '.' | '[' | ':')
}
