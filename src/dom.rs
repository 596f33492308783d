use super::*;

mod class_tokens;
mod listeners;
mod selector_matching;
mod tree_traversal;

pub(crate) use class_tokens::has_class_token;

/// Handle to a node of a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Window,
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
}

/// Deterministic in-memory DOM.
///
/// Node 0 is the document and node 1 the window. The window has no tree
/// relation to the document; it only terminates event propagation paths.
#[derive(Debug, Clone)]
pub struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) window: NodeId,
    pub(crate) id_index: HashMap<String, Vec<NodeId>>,
    pub(crate) listeners: HashMap<(NodeId, String), Vec<ListenerId>>,
    pub(crate) ready_state: ReadyState,
    pub(crate) class_list_supported: bool,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let document = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        let window = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Window,
        };
        Self {
            nodes: vec![document, window],
            root: NodeId(0),
            window: NodeId(1),
            id_index: HashMap::new(),
            listeners: HashMap::new(),
            ready_state: ReadyState::Loading,
            class_list_supported: true,
        }
    }

    /// Parses `html` into a fresh document. The ready state stays `loading`
    /// until [`Dom::set_ready_state`] advances it.
    pub fn from_html(html: &str) -> Result<Self> {
        html::parse_html(html)
    }

    pub fn document(&self) -> NodeId {
        self.root
    }

    pub fn window(&self) -> NodeId {
        self.window
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    /// Toggles the structured class list. With it disabled, callers have to
    /// edit the raw `class` attribute.
    pub fn set_class_list_support(&mut self, enabled: bool) {
        self.class_list_supported = enabled;
    }

    /// Appends `node_type` under `parent`, which must be the document or an
    /// element of this tree.
    fn create_node(&mut self, parent: NodeId, node_type: NodeType) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        let parent_node = self
            .nodes
            .get_mut(parent.0)
            .filter(|node| matches!(node.node_type, NodeType::Document | NodeType::Element(_)))
            .ok_or_else(|| Error::NotAnElement(format!("cannot append to {parent:?}")))?;
        parent_node.children.push(id);
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            node_type,
        });
        Ok(id)
    }

    pub(crate) fn create_element_with_attrs(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> Result<NodeId> {
        let id_attr = attrs.get("id").cloned();
        let id = self.create_node(parent, NodeType::Element(Element { tag_name, attrs }))?;
        if let Some(id_attr) = id_attr {
            self.id_index.entry(id_attr).or_default().push(id);
        }
        Ok(id)
    }

    /// Appends a new `<tag_name>` element as the last child of `parent`.
    /// Fails with [`Error::NotAnElement`] when `parent` is not the document
    /// or an element of this tree.
    pub fn create_element(&mut self, parent: NodeId, tag_name: &str) -> Result<NodeId> {
        self.create_element_with_attrs(parent, tag_name.to_ascii_lowercase(), HashMap::new())
    }

    pub fn create_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        self.create_node(parent, NodeType::Text(text.to_string()))
    }

    pub(crate) fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(node_id.0)
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.node(node_id)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub fn attr(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.element(node_id)?.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement(format!("{node_id:?}")))?;
        let old = element.attrs.insert(name.clone(), value.to_string());
        if name == "id" {
            if let Some(old) = old {
                if let Some(ids) = self.id_index.get_mut(&old) {
                    ids.retain(|id| *id != node_id);
                }
            }
            self.id_index
                .entry(value.to_string())
                .or_default()
                .push(node_id);
        }
        Ok(())
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index
            .get(id)
            .and_then(|ids| ids.iter().copied().find(|node| self.is_connected(*node)))
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.node(node_id)?.parent
    }

    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.node(node_id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn text_content(&self, node_id: NodeId) -> String {
        match self.node(node_id).map(|node| &node.node_type) {
            Some(NodeType::Text(text)) => text.clone(),
            Some(NodeType::Element(_)) | Some(NodeType::Document) => {
                let mut out = String::new();
                for child in self.children(node_id) {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            Some(NodeType::Window) | None => String::new(),
        }
    }
}

impl DomHost for Dom {
    type Node = NodeId;

    fn document(&self) -> NodeId {
        self.root
    }

    fn window(&self) -> NodeId {
        self.window
    }

    fn body(&self) -> Option<NodeId> {
        self.body_element()
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        Dom::query_selector_all(self, selector)
    }

    fn matches_selector(&self, node: NodeId, selector: &str) -> Result<bool> {
        Dom::matches_selector(self, node, selector)
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    fn parent_node(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node)
    }

    fn class_attr(&self, node: NodeId) -> Option<String> {
        self.attr(node, "class").map(str::to_string)
    }

    fn set_class_attr(&mut self, node: NodeId, value: &str) -> Result<()> {
        self.set_attr(node, "class", value)
    }

    fn supports_class_list(&self) -> bool {
        self.class_list_supported
    }

    fn class_list_contains(&self, node: NodeId, token: &str) -> Result<bool> {
        self.ensure_class_list()?;
        self.class_contains(node, token)
    }

    fn class_list_add(&mut self, node: NodeId, tokens: &[&str]) -> Result<()> {
        self.ensure_class_list()?;
        for token in tokens {
            self.class_add(node, token)?;
        }
        Ok(())
    }

    fn class_list_remove(&mut self, node: NodeId, tokens: &[&str]) -> Result<()> {
        self.ensure_class_list()?;
        for token in tokens {
            self.class_remove(node, token)?;
        }
        Ok(())
    }

    fn add_event_listener(&mut self, node: NodeId, event_type: &str, listener: ListenerId) {
        self.insert_listener(node, event_type, listener);
    }

    fn remove_event_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: ListenerId,
    ) -> bool {
        self.take_listener(node, event_type, listener)
    }

    fn event_listeners(&self, node: NodeId, event_type: &str) -> Vec<ListenerId> {
        self.listeners_for(node, event_type)
    }

    fn propagation_path(&self, target: NodeId) -> Vec<NodeId> {
        self.bubble_path(target)
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }
}
