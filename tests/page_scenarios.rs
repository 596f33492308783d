use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use domkit::{ClassStrategy, Dom, Error, Page, ReadyState, Result};
use tracing::info;

static INIT_LOGGING: Once = Once::new();

fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        if std::env::var("TEST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
                .init();
        }
    });
}

const TABS_HTML: &str = r#"
<html>
  <head><title>tabs</title></head>
  <body>
    <nav id='tabs' class='tabs'>
      <button id='tab-a' class='tab active' data-panel='a'><i>A</i></button>
      <button id='tab-b' class='tab' data-panel='b'><i>B</i></button>
      <button id='tab-c' class='tab' data-panel='c' disabled>C</button>
    </nav>
    <section id='panel-a' class='panel'>first</section>
    <section id='panel-b' class='panel hidden'>second</section>
    <section id='panel-c' class='panel hidden'>third</section>
  </body>
</html>
"#;

fn page_for(strategy: ClassStrategy) -> Result<Page<Dom>> {
    let mut dom = Dom::from_html(TABS_HTML)?;
    dom.set_class_list_support(strategy == ClassStrategy::TokenList);
    Ok(Page::new(dom))
}

fn class_of(page: &Page<Dom>, id: &str) -> String {
    let dom = page.host();
    dom.by_id(id)
        .and_then(|node| dom.attr(node, "class"))
        .unwrap_or_default()
        .to_string()
}

fn install_tabs(page: &Page<Dom>) {
    page.ready(|page| {
        page.select("#tabs")?
            .on("click", ".tab:not([disabled])", |page, tab, _event| {
                let panel = page
                    .host()
                    .attr(tab, "data-panel")
                    .map(str::to_string)
                    .ok_or_else(|| Error::Callback("tab without data-panel".into()))?;
                info!(%panel, "switching tab");

                let tabs = page.select(".tab")?;
                tabs.not(&page.select(tab)?).remove_class("active")?;
                page.select(tab)?.add_class("active")?;

                page.select(".panel")?.add_class("hidden")?;
                page.select(format!("#panel-{panel}").as_str())?
                    .remove_class("hidden")?;
                Ok(())
            })?;
        Ok(())
    });
}

#[test]
fn tabs_switch_panels_once_ready() -> Result<()> {
    init_test_logging();
    for strategy in [ClassStrategy::TokenList, ClassStrategy::Attribute] {
        let page = page_for(strategy)?;
        install_tabs(&page);

        // Nothing is wired up before the document is ready.
        page.click("#tab-b")?;
        assert_eq!(class_of(&page, "panel-b"), "panel hidden");

        page.set_ready_state(ReadyState::Interactive);
        assert_eq!(page.run_pending()?, 1);

        page.click("#tab-b i")?;
        assert_eq!(class_of(&page, "tab-a"), "tab", "{strategy:?}");
        assert_eq!(class_of(&page, "tab-b"), "tab active", "{strategy:?}");
        assert_eq!(class_of(&page, "panel-a"), "panel hidden", "{strategy:?}");
        assert_eq!(class_of(&page, "panel-b"), "panel", "{strategy:?}");

        page.click("#tab-c")?;
        assert_eq!(class_of(&page, "panel-c"), "panel hidden", "{strategy:?}");
        assert!(page.select("#tab-b")?.has_class("active")?);
    }
    Ok(())
}

#[test]
fn accordion_toggles_and_tracks_open_sections() -> Result<()> {
    init_test_logging();
    let html = r#"
        <html><body>
          <dl id='faq'>
            <div class='entry'><dt class='q'><b>Q1</b></dt><dd class='a'>A1</dd></div>
            <div class='entry'><dt class='q'><b>Q2</b></dt><dd class='a'>A2</dd></div>
          </dl>
          <p id='status'></p>
        </body></html>
    "#;
    let page = Page::from_html(html)?;
    let opened = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&opened);

    page.select("document")?.on("click", ".q", move |page, question, _| {
        let entry = page.select(question)?.parent(Some(".entry"))?;
        entry.toggle_class("open")?;
        if entry.has_class("open")? {
            log.borrow_mut().push(question);
        }
        Ok(())
    })?;

    let questions = page.select(".q")?;
    let first = questions.first().expect("first question");
    let second = questions.get(1).expect("second question");

    page.dispatch(page.select("b")?.first().expect("label"), "click")?;
    page.dispatch(second, "click")?;
    page.dispatch(first, "click")?;

    assert_eq!(*opened.borrow(), [first, second]);
    let open = page.select(".entry.open")?;
    assert_eq!(open.len(), 1);
    assert_eq!(open.first(), page.select(second)?.parent(None)?.first());
    Ok(())
}

#[test]
fn removing_a_delegation_stops_callbacks() -> Result<()> {
    init_test_logging();
    let page = page_for(ClassStrategy::TokenList)?;
    let count = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&count);
    let delegation = page.select("body")?.on("click", "button", move |_, _, _| {
        *sink.borrow_mut() += 1;
        Ok(())
    })?;

    page.click("#tab-a")?;
    page.click("#tab-b i")?;
    assert_eq!(*count.borrow(), 2);

    assert_eq!(page.off(&delegation), 1);
    page.click("#tab-a")?;
    assert_eq!(*count.borrow(), 2);
    Ok(())
}

#[test]
fn events_bubble_to_the_window() -> Result<()> {
    init_test_logging();
    let page = page_for(ClassStrategy::TokenList)?;
    let window = page.host().window();
    let reached = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&reached);
    page.listen(window, "click", move |_, event| {
        *sink.borrow_mut() = Some(event.target());
        Ok(())
    });

    let event = page.click("#panel-a")?;
    assert_eq!(event.current_target(), window);
    assert_eq!(*reached.borrow(), page.select("#panel-a")?.first());
    Ok(())
}
