use super::*;
use std::hash::Hash;

/// Document loading state, ordered by progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// `true` once the document has been parsed (`interactive` or later).
    pub fn is_ready(self) -> bool {
        self >= ReadyState::Interactive
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        }
    }
}

/// Identifies one listener registered through a [`Page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// The DOM capabilities the library relies on.
///
/// Selector matching, the class attribute, parent links, listener tables and
/// the ready state all live in the host; everything else is built on top of
/// these calls. Hosts only store [`ListenerId`]s, the callbacks themselves
/// stay with the [`Page`].
pub trait DomHost {
    type Node: Copy + Eq + Hash + fmt::Debug + 'static;

    fn document(&self) -> Self::Node;

    fn window(&self) -> Self::Node;

    fn body(&self) -> Option<Self::Node>;

    /// All elements matching `selector`, in document order.
    fn query_selector_all(&self, selector: &str) -> Result<Vec<Self::Node>>;

    /// Whether `node` matches `selector`. Non-elements never match, but a
    /// malformed selector is still reported.
    fn matches_selector(&self, node: Self::Node, selector: &str) -> Result<bool>;

    /// Fails with [`Error::SelectorSyntax`] when `selector` cannot be parsed.
    fn validate_selector(&self, selector: &str) -> Result<()> {
        self.matches_selector(self.document(), selector).map(drop)
    }

    fn is_element(&self, node: Self::Node) -> bool;

    fn parent_node(&self, node: Self::Node) -> Option<Self::Node>;

    fn parent_element(&self, node: Self::Node) -> Option<Self::Node> {
        self.parent_node(node)
            .filter(|parent| self.is_element(*parent))
    }

    /// Raw `class` attribute, `None` when absent or when `node` is not an element.
    fn class_attr(&self, node: Self::Node) -> Option<String>;

    fn set_class_attr(&mut self, node: Self::Node, value: &str) -> Result<()>;

    /// Whether the host manages class tokens itself (a `classList`).
    fn supports_class_list(&self) -> bool {
        false
    }

    fn class_list_contains(&self, _node: Self::Node, _token: &str) -> Result<bool> {
        Err(Error::Unsupported("classList".into()))
    }

    fn class_list_add(&mut self, _node: Self::Node, _tokens: &[&str]) -> Result<()> {
        Err(Error::Unsupported("classList".into()))
    }

    fn class_list_remove(&mut self, _node: Self::Node, _tokens: &[&str]) -> Result<()> {
        Err(Error::Unsupported("classList".into()))
    }

    fn add_event_listener(&mut self, node: Self::Node, event_type: &str, listener: ListenerId);

    /// Returns `false` when the listener was not registered on `node`.
    fn remove_event_listener(
        &mut self,
        node: Self::Node,
        event_type: &str,
        listener: ListenerId,
    ) -> bool;

    /// Listeners on `node` for `event_type`, in registration order.
    fn event_listeners(&self, node: Self::Node, event_type: &str) -> Vec<ListenerId>;

    /// Nodes an event fired at `target` bubbles through, starting with `target`.
    fn propagation_path(&self, target: Self::Node) -> Vec<Self::Node>;

    fn ready_state(&self) -> ReadyState;
}
