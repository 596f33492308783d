use super::*;

impl Dom {
    pub(crate) fn insert_listener(&mut self, node: NodeId, event_type: &str, listener: ListenerId) {
        let listeners = self
            .listeners
            .entry((node, event_type.to_string()))
            .or_default();
        if !listeners.contains(&listener) {
            listeners.push(listener);
        }
    }

    pub(crate) fn take_listener(
        &mut self,
        node: NodeId,
        event_type: &str,
        listener: ListenerId,
    ) -> bool {
        let key = (node, event_type.to_string());
        let Some(listeners) = self.listeners.get_mut(&key) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|id| *id != listener);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.listeners.remove(&key);
        }
        removed
    }

    pub(crate) fn listeners_for(&self, node: NodeId, event_type: &str) -> Vec<ListenerId> {
        self.listeners
            .get(&(node, event_type.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}
