//! DOM convenience helpers over a pluggable DOM host.
//!
//! A [`Page`] owns a host implementing [`DomHost`] and is the single entry
//! point: [`Page::select`] wraps nodes into a [`Selection`] which offers class
//! token manipulation, ancestor traversal, readiness callbacks and delegated
//! event listeners. [`Dom`] is a deterministic in-memory host.
//!
//! ```
//! use domkit::{Page, Result};
//!
//! fn main() -> Result<()> {
//!     let page = Page::from_html(
//!         "<html><body><button class='btn'><span id='label'>go</span></button></body></html>",
//!     )?;
//!     page.select("document")?.on("click", ".btn", |page, button, _event| {
//!         page.select(button)?.toggle_class("pressed")?;
//!         Ok(())
//!     })?;
//!
//!     page.click("#label")?;
//!     assert!(page.select(".btn")?.has_class("pressed")?);
//!     Ok(())
//! }
//! ```

use std::collections::{HashMap, VecDeque};
use std::error::Error as StdError;
use std::fmt;

mod class_set;
mod delegate;
mod dom;
mod host;
mod html;
mod node_set;
mod page;
mod selection;
mod selector;
mod token_regex;
mod traversal;

pub use class_set::ClassStrategy;
pub use delegate::Delegation;
pub use dom::{Dom, NodeId};
pub use host::{DomHost, ListenerId, ReadyState};
pub use node_set::{NodeSet, Target};
pub use page::{Event, Page};
pub use selection::Selection;


pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    SelectorSyntax(String),
    SelectorNotFound(String),
    NotAnElement(String),
    Unsupported(String),
    ClassPattern(String),
    Callback(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::SelectorSyntax(selector) => write!(f, "selector syntax error: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::NotAnElement(what) => write!(f, "node is not an element: {what}"),
            Self::Unsupported(capability) => {
                write!(f, "host does not support {capability}")
            }
            Self::ClassPattern(msg) => write!(f, "class token pattern error: {msg}"),
            Self::Callback(msg) => write!(f, "callback error: {msg}"),
        }
    }
}

impl StdError for Error {}
