use super::*;
use crate::selector::{self, Combinator, Complex, Compound, SelectorList};

impl Dom {
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Matching elements in document order. A bare `#id` is answered from
    /// the id index unless several connected elements share the id.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let list = selector::parse(selector)?;

        if let Some(id) = list.lone_id() {
            let connected: Vec<NodeId> = self
                .id_index
                .get(id)
                .map(|nodes| {
                    nodes
                        .iter()
                        .copied()
                        .filter(|node| self.is_connected(*node))
                        .collect()
                })
                .unwrap_or_default();
            if connected.len() <= 1 {
                return Ok(connected);
            }
        }

        let mut elements = Vec::new();
        self.collect_elements_dfs(self.root, &mut elements);
        elements.retain(|node| self.matches_list(*node, &list));
        Ok(elements)
    }

    /// Parses `selector` before looking at `node_id`, so a malformed selector
    /// fails even against the document or a text node.
    pub fn matches_selector(&self, node_id: NodeId, selector: &str) -> Result<bool> {
        let list = selector::parse(selector)?;
        Ok(self.matches_list(node_id, &list))
    }

    fn matches_list(&self, node_id: NodeId, list: &SelectorList) -> bool {
        list.0
            .iter()
            .any(|complex| self.matches_complex(node_id, complex))
    }

    fn matches_complex(&self, node_id: NodeId, complex: &Complex) -> bool {
        self.matches_compound(node_id, &complex.subject)
            && self.matches_ancestors(node_id, &complex.ancestors)
    }

    // Backtracks over descendant combinators: `a b > c` may need a farther `b`.
    fn matches_ancestors(&self, node_id: NodeId, ancestors: &[(Combinator, Compound)]) -> bool {
        let Some(((combinator, compound), rest)) = ancestors.split_first() else {
            return true;
        };
        let mut cursor = self.parent_element_of(node_id);
        while let Some(parent) = cursor {
            if self.matches_compound(parent, compound) && self.matches_ancestors(parent, rest) {
                return true;
            }
            if *combinator == Combinator::Child {
                return false;
            }
            cursor = self.parent_element_of(parent);
        }
        false
    }

    fn matches_compound(&self, node_id: NodeId, compound: &Compound) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };
        if compound
            .tag
            .as_ref()
            .is_some_and(|tag| !element.tag_name.eq_ignore_ascii_case(tag))
        {
            return false;
        }
        if compound
            .id
            .as_ref()
            .is_some_and(|id| element.attrs.get("id") != Some(id))
        {
            return false;
        }
        if !compound
            .classes
            .iter()
            .all(|class| has_class_token(element, class))
        {
            return false;
        }
        let attrs_match = compound.attrs.iter().all(|attr| {
            match (element.attrs.get(&attr.name), &attr.value) {
                (Some(found), Some(wanted)) => found == wanted,
                (found, None) => found.is_some(),
                (None, Some(_)) => false,
            }
        });
        attrs_match
            && compound
                .negated
                .iter()
                .all(|list| !self.matches_list(node_id, list))
    }

    fn parent_element_of(&self, node_id: NodeId) -> Option<NodeId> {
        self.parent(node_id)
            .filter(|parent| self.element(*parent).is_some())
    }
}
