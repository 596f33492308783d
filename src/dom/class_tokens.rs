use super::*;

pub(crate) fn has_class_token(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .map(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| value.split_ascii_whitespace().map(ToOwned::to_owned).collect())
        .unwrap_or_default()
}

// An element without a class attribute keeps it absent while the list stays empty.
fn write_class_tokens(element: &mut Element, classes: &[String]) {
    if classes.is_empty() && !element.attrs.contains_key("class") {
        return;
    }
    element.attrs.insert("class".to_string(), classes.join(" "));
}

impl Dom {
    pub(crate) fn ensure_class_list(&self) -> Result<()> {
        if self.class_list_supported {
            Ok(())
        } else {
            Err(Error::Unsupported("classList".into()))
        }
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> Result<bool> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::NotAnElement(format!("classList target {node_id:?}")))?;
        Ok(has_class_token(element, class_name))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement(format!("classList target {node_id:?}")))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        write_class_tokens(element, &classes);
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement(format!("classList target {node_id:?}")))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        write_class_tokens(element, &classes);
        Ok(())
    }
}
