use super::*;

/// Parent element of `node`, or with a selector the nearest ancestor element
/// matching it.
pub(crate) fn parent<H: DomHost>(
    host: &H,
    node: H::Node,
    selector: Option<&str>,
) -> Result<Option<H::Node>> {
    let Some(selector) = selector else {
        return Ok(host.parent_element(node));
    };
    host.validate_selector(selector)?;
    let mut cursor = host.parent_element(node);
    while let Some(current) = cursor {
        if host.matches_selector(current, selector)? {
            return Ok(Some(current));
        }
        cursor = host.parent_element(current);
    }
    Ok(None)
}

/// Ancestor elements of `node`, nearest first, optionally filtered.
pub(crate) fn parents<H: DomHost>(
    host: &H,
    node: H::Node,
    selector: Option<&str>,
) -> Result<Vec<H::Node>> {
    if let Some(selector) = selector {
        host.validate_selector(selector)?;
    }
    let mut out = Vec::new();
    let mut cursor = host.parent_element(node);
    while let Some(current) = cursor {
        let keep = match selector {
            Some(selector) => host.matches_selector(current, selector)?,
            None => true,
        };
        if keep {
            out.push(current);
        }
        cursor = host.parent_element(current);
    }
    Ok(out)
}
