use super::*;

struct StartTag {
    name: String,
    attrs: HashMap<String, String>,
    self_closing: bool,
}

/// Builds a [`Dom`] from markup made of elements, text and comments.
///
/// End tags close the nearest open element with that name; end tags with no
/// open counterpart are ignored. Whitespace-only text is dropped.
pub(crate) fn parse_html(html: &str) -> Result<Dom> {
    let mut dom = Dom::new();
    let mut open: Vec<NodeId> = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        let parent = open.last().copied().unwrap_or_else(|| dom.document());

        if let Some(after) = rest.strip_prefix("<!--") {
            let end = after
                .find("-->")
                .ok_or_else(|| Error::HtmlParse("unclosed comment".into()))?;
            rest = &after[end + 3..];
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after
                .find('>')
                .ok_or_else(|| Error::HtmlParse("unclosed end tag".into()))?;
            let name = after[..end].trim().to_ascii_lowercase();
            if let Some(depth) = open
                .iter()
                .rposition(|node| dom.tag_name(*node) == Some(name.as_str()))
            {
                open.truncate(depth);
            }
            rest = &after[end + 1..];
        } else if rest.starts_with('<') {
            let (tag, after) = parse_start_tag(rest)?;
            let void = is_void_tag(&tag.name);
            let node = dom.create_element_with_attrs(parent, tag.name, tag.attrs)?;
            if !tag.self_closing && !void {
                open.push(node);
            }
            rest = after;
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            let text = &rest[..end];
            if !text.trim().is_empty() {
                dom.create_text(parent, &decode_entities(text))?;
            }
            rest = &rest[end..];
        }
    }

    Ok(dom)
}

// `source` starts at the `<` of a start tag.
fn parse_start_tag(source: &str) -> Result<(StartTag, &str)> {
    let mut rest = &source[1..];
    let name_len = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
    if name_len == 0 {
        let shown: String = source.chars().take(12).collect();
        return Err(Error::HtmlParse(format!("expected a tag name in {shown:?}")));
    }
    let name = rest[..name_len].to_ascii_lowercase();
    rest = &rest[name_len..];

    let mut attrs = HashMap::new();
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if let Some(after) = rest.strip_prefix('>') {
            let tag = StartTag { name, attrs, self_closing: false };
            return Ok((tag, after));
        }
        if let Some(after) = rest.strip_prefix("/>") {
            let tag = StartTag { name, attrs, self_closing: true };
            return Ok((tag, after));
        }

        let attr_len = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
        if attr_len == 0 {
            return Err(Error::HtmlParse(format!("unclosed <{name}>")));
        }
        let attr = rest[..attr_len].to_ascii_lowercase();
        rest = rest[attr_len..].trim_start_matches(|c: char| c.is_ascii_whitespace());

        let value = match rest.strip_prefix('=') {
            Some(after) => {
                let (value, after) = attr_value(after.trim_start(), &name)?;
                rest = after;
                decode_entities(value)
            }
            None => String::new(),
        };
        attrs.entry(attr).or_insert(value);
    }
}

fn attr_value<'a>(source: &'a str, tag: &str) -> Result<(&'a str, &'a str)> {
    match source.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let body = &source[1..];
            let end = body
                .find(quote)
                .ok_or_else(|| Error::HtmlParse(format!("unclosed attribute value in <{tag}>")))?;
            Ok((&body[..end], &body[end + 1..]))
        }
        _ => {
            let end = source
                .find(|c: char| c.is_ascii_whitespace() || c == '>')
                .unwrap_or(source.len());
            Ok(source.split_at(end))
        }
    }
}

/// Replaces named (`amp`, `lt`, `gt`, `quot`, `apos`, `nbsp`) and numeric
/// character references. Anything else keeps its literal `&`.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp + 1..];
        let decoded = rest
            .split_once(';')
            .and_then(|(entity, after)| entity_char(entity).map(|ch| (ch, after)));
        match decoded {
            Some((ch, after)) => {
                out.push(ch);
                rest = after;
            }
            None => out.push('&'),
        }
    }
    out.push_str(rest);
    out
}

fn entity_char(entity: &str) -> Option<char> {
    let code = match entity {
        "amp" => return Some('&'),
        "lt" => return Some('<'),
        "gt" => return Some('>'),
        "quot" => return Some('"'),
        "apos" => return Some('\''),
        "nbsp" => return Some('\u{a0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            }
        }
    };
    char::from_u32(code)
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ':')
}

fn is_void_tag(tag: &str) -> bool {
    const VOID: [&str; 14] = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ];
    VOID.contains(&tag)
}
