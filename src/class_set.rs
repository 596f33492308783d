use super::*;
use crate::token_regex::TokenPattern;

/// How class tokens are read and written on a host.
///
/// Chosen once per [`Page`], from [`DomHost::supports_class_list`], and never
/// re-checked afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassStrategy {
    /// Delegate to the host's structured class list.
    TokenList,
    /// Edit the raw `class` attribute string.
    Attribute,
}

pub(crate) fn split_tokens(tokens: &str) -> Vec<&str> {
    tokens.split_ascii_whitespace().collect()
}

impl ClassStrategy {
    pub fn detect<H: DomHost>(host: &H) -> Self {
        if host.supports_class_list() {
            Self::TokenList
        } else {
            Self::Attribute
        }
    }

    /// True when every token of `tokens` is present on `node`. A string
    /// without tokens is never present.
    pub(crate) fn has<H: DomHost>(self, host: &H, node: H::Node, tokens: &str) -> Result<bool> {
        let tokens = split_tokens(tokens);
        if tokens.is_empty() || !host.is_element(node) {
            return Ok(false);
        }
        match self {
            Self::TokenList => {
                for token in tokens {
                    if !host.class_list_contains(node, token)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Attribute => {
                let Some(attr) = host.class_attr(node) else {
                    return Ok(false);
                };
                for token in tokens {
                    if !TokenPattern::new(token)?.is_match(&attr)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    pub(crate) fn add<H: DomHost>(self, host: &mut H, node: H::Node, tokens: &str) -> Result<()> {
        let tokens = split_tokens(tokens);
        if tokens.is_empty() || !host.is_element(node) {
            return Ok(());
        }
        match self {
            Self::TokenList => host.class_list_add(node, &tokens),
            Self::Attribute => {
                let attr = host.class_attr(node).unwrap_or_default();
                let mut updated = normalize_whitespace(&attr);
                for token in tokens {
                    if TokenPattern::new(token)?.is_match(&updated)? {
                        continue;
                    }
                    if !updated.is_empty() {
                        updated.push(' ');
                    }
                    updated.push_str(token);
                }
                if updated != attr {
                    host.set_class_attr(node, &updated)?;
                }
                Ok(())
            }
        }
    }

    pub(crate) fn remove<H: DomHost>(
        self,
        host: &mut H,
        node: H::Node,
        tokens: &str,
    ) -> Result<()> {
        let tokens = split_tokens(tokens);
        if tokens.is_empty() || !host.is_element(node) {
            return Ok(());
        }
        match self {
            Self::TokenList => host.class_list_remove(node, &tokens),
            Self::Attribute => {
                let Some(attr) = host.class_attr(node) else {
                    return Ok(());
                };
                let mut updated = attr.clone();
                for token in tokens {
                    updated = TokenPattern::new(token)?.remove_all(&updated)?;
                }
                let updated = normalize_whitespace(&updated);
                if updated != attr {
                    host.set_class_attr(node, &updated)?;
                }
                Ok(())
            }
        }
    }

    /// Removes all of `tokens` when all are present, adds them otherwise.
    pub(crate) fn toggle<H: DomHost>(
        self,
        host: &mut H,
        node: H::Node,
        tokens: &str,
    ) -> Result<()> {
        if self.has(host, node, tokens)? {
            self.remove(host, node, tokens)
        } else {
            self.add(host, node, tokens)
        }
    }
}

fn normalize_whitespace(value: &str) -> String {
    value.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}
