use super::*;

const FORM_HTML: &str = r#"
    <html><head><title>T &amp; C</title></head>
    <BODY>
      <!-- nav <b>not parsed</b> -->
      <nav id='nav'>
        <a id='home' class='link main' href='/home' lang='en'>Home</a>
        <a id='docs' class='link' href='/docs/intro.html' lang='en'>Docs</a>
        <a id='ext' class='link' href='https://example.com' rel=external>Ext</a>
      </nav>
      <form id='f'>
        <input id='name' name='user' disabled>
        <br/>
        <span id='outer'><span id='inner'><em id='deep'>x</em></span></span>
      </form>
      <p id='text'>1 &lt; 2 &#38; &#x41;&nbsp;ok &unknown; &amp</p>
    </body></html>
    "#;

fn select_ids(page: &Page<Dom>, selector: &str) -> Result<Vec<String>> {
    let nodes = page.host().query_selector_all(selector)?;
    Ok(ids(page, nodes))
}

#[test]
fn html_parser_builds_expected_tree() -> Result<()> {
    let page = Page::from_html(FORM_HTML)?;
    let dom = page.host();

    let html = dom.document_element().expect("html element");
    assert_eq!(dom.tag_name(html), Some("html"));
    let body = dom.body().expect("body element");
    assert_eq!(dom.tag_name(body), Some("body"));
    assert_eq!(dom.parent(body), Some(html));

    let title = dom.query_selector("title")?.expect("title");
    assert_eq!(dom.text_content(title), "T & C");

    let nav = dom.by_id("nav").expect("nav");
    assert_eq!(dom.children(nav).len(), 3);
    assert_eq!(dom.query_selector_all("b")?, Vec::new());

    let input = dom.by_id("name").expect("input");
    assert_eq!(dom.attr(input, "disabled"), Some(""));
    assert!(dom.children(input).is_empty());
    assert_eq!(dom.parent(dom.by_id("outer").expect("span")), dom.by_id("f"));

    let ext = dom.by_id("ext").expect("ext");
    assert_eq!(dom.attr(ext, "rel"), Some("external"));
    Ok(())
}

#[test]
fn html_parser_decodes_character_references() -> Result<()> {
    let page = Page::from_html(FORM_HTML)?;
    let dom = page.host();
    let p = dom.by_id("text").expect("p");
    assert_eq!(dom.text_content(p), "1 < 2 & A\u{a0}ok &unknown; &amp");
    Ok(())
}

#[test]
fn html_parser_rejects_malformed_markup() {
    for html in ["<div", "<!-- open", "<p title='x>", "<!DOCTYPE html>", "<>", "<p></p"] {
        let err = Dom::from_html(html).expect_err(html);
        assert!(matches!(err, Error::HtmlParse(_)), "{html}: {err:?}");
    }
}

#[test]
fn stray_end_tags_are_ignored() -> Result<()> {
    let page = Page::from_html("<div id='outer'></span><p id='in'>x</p></div>")?;
    let dom = page.host();
    let p = dom.by_id("in").expect("p");
    assert_eq!(dom.parent(p), dom.by_id("outer"));
    Ok(())
}

#[test]
fn end_tag_closes_elements_left_open_inside_it() -> Result<()> {
    let page = Page::from_html("<ul id='l'><li id='a'>one<li id='b'>two</ul><p id='after'></p>")?;
    let dom = page.host();
    assert_eq!(dom.parent(node(&page, "b")), Some(node(&page, "a")));
    assert_eq!(dom.parent(node(&page, "after")), dom.parent(node(&page, "l")));
    Ok(())
}

#[test]
fn attribute_selectors_match_presence_and_value() -> Result<()> {
    let page = Page::from_html(FORM_HTML)?;
    assert_eq!(select_ids(&page, "[rel]")?, ["ext"]);
    assert_eq!(select_ids(&page, "a[href='/home']")?, ["home"]);
    assert_eq!(select_ids(&page, "[lang=en]")?, ["home", "docs"]);
    assert_eq!(select_ids(&page, "input[disabled][name=user]")?, ["name"]);
    assert_eq!(select_ids(&page, "[ NAME = \"user\" ]")?, ["name"]);
    Ok(())
}

#[test]
fn compound_selectors_combine_tag_id_and_classes() -> Result<()> {
    let page = Page::from_html(FORM_HTML)?;
    assert_eq!(select_ids(&page, "A.link.main")?, ["home"]);
    assert_eq!(select_ids(&page, "a#docs.link")?, ["docs"]);
    assert_eq!(select_ids(&page, "nav *")?, ["home", "docs", "ext"]);
    assert!(select_ids(&page, "span#docs")?.is_empty());
    Ok(())
}

#[test]
fn combinators_and_negation() -> Result<()> {
    let page = Page::from_html(FORM_HTML)?;
    assert_eq!(select_ids(&page, "nav > a")?, ["home", "docs", "ext"]);
    assert_eq!(select_ids(&page, "form > span")?, ["outer"]);
    assert_eq!(select_ids(&page, "form span")?, ["outer", "inner"]);
    assert_eq!(select_ids(&page, "nav a:not([rel], #docs)")?, ["home"]);
    assert_eq!(select_ids(&page, "#f em, #nav .main")?, ["home", "deep"]);
    assert!(select_ids(&page, "nav > em")?.is_empty());
    Ok(())
}

#[test]
fn descendant_match_backtracks_past_a_nearer_ancestor() -> Result<()> {
    let page = Page::from_html(FORM_HTML)?;
    // `#inner` is a span but not a child of `form`; the match comes from `#outer`.
    assert_eq!(select_ids(&page, "form > span em")?, ["deep"]);
    assert_eq!(select_ids(&page, "form > span > span > em")?, ["deep"]);
    assert!(select_ids(&page, "form > span > em")?.is_empty());
    Ok(())
}

#[test]
fn unsupported_selector_syntax_is_rejected() -> Result<()> {
    let page = Page::from_html(FORM_HTML)?;
    for selector in ["a:first-child", "#home + a", "a ~ a", "[href^='/']", "a:not(b", "a."] {
        let err = page.host().query_selector_all(selector).expect_err(selector);
        assert_eq!(err, Error::SelectorSyntax(selector.to_string()));
    }
    Ok(())
}

#[test]
fn id_lookup_follows_set_attr() -> Result<()> {
    let page = Page::from_html(FORM_HTML)?;
    let home = node(&page, "home");
    page.host_mut().set_attr(home, "id", "start")?;

    assert_eq!(page.select("#home")?.len(), 0);
    assert_eq!(page.select("#start")?.first(), Some(home));
    Ok(())
}

#[test]
fn duplicate_ids_select_every_element_in_document_order() -> Result<()> {
    let page = Page::from_html(
        "<body><div id='dup' class='first'><span id='dup' class='second'></span></div></body>",
    )?;
    let first = page.select(".first")?.first().expect("div");
    let second = page.select(".second")?.first().expect("span");

    let dups = page.select("#dup")?;
    assert_eq!(dups.iter().collect::<Vec<_>>(), [first, second]);

    page.host_mut().set_attr(second, "id", "other")?;
    assert_eq!(page.select("#dup")?.first(), Some(first));
    assert_eq!(page.select("#dup")?.len(), 1);
    Ok(())
}

#[test]
fn matches_selector_reports_errors_before_node_kind() -> Result<()> {
    let page = Page::from_html(FORM_HTML)?;
    let dom = page.host();
    let document = dom.document();
    assert!(!dom.matches_selector(document, "html")?);
    assert!(dom.matches_selector(document, "[").is_err());
    assert!(dom.validate_selector("nav > a").is_ok());
    Ok(())
}

#[test]
fn selector_escapes_are_unescaped() -> Result<()> {
    let mut dom = Dom::new();
    let root = dom.document();
    let div = dom.create_element(root, "DIV")?;
    dom.set_attr(div, "data-x", "quote'd")?;
    let page = Page::new(dom);

    assert_eq!(page.select(r"div[data-x='quote\'d']")?.first(), Some(div));
    assert_eq!(page.select(r#"[data-x="quote'd"]"#)?.first(), Some(div));
    assert!(page.select(r"[data-x=quote]")?.is_empty());
    Ok(())
}

#[test]
fn create_element_rejects_parents_outside_the_tree() -> Result<()> {
    let mut large = Dom::new();
    let mut parent = large.document();
    for _ in 0..4 {
        parent = large.create_element(parent, "div")?;
    }
    let text = large.create_text(parent, "leaf")?;

    let mut small = Dom::new();
    let foreign = small.create_element(parent, "p");
    assert!(matches!(foreign, Err(Error::NotAnElement(_))), "{foreign:?}");
    let under_text = large.create_element(text, "b");
    assert!(matches!(under_text, Err(Error::NotAnElement(_))), "{under_text:?}");
    let under_window = small.create_text(small.window(), "x");
    assert!(matches!(under_window, Err(Error::NotAnElement(_))), "{under_window:?}");

    assert!(small.children(small.document()).is_empty());
    assert_eq!(small.query_selector_all("p")?, Vec::new());
    Ok(())
}
