// file: src/page/text.rs
// description: approximates rendered innerText for parsed html elements
// reference: https://html.spec.whatwg.org/multipage/dom.html#the-innertext-idl-attribute

use scraper::{ElementRef, Node};

/// Elements that start a new line when rendered.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Elements whose text is never rendered.
const HIDDEN_TAGS: &[&str] = &["script", "style", "template", "noscript", "head"];

/// Text of `element` with block boundaries as line breaks and whitespace collapsed per line.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect(element, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN_TAGS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }

                let block = BLOCK_TAGS.contains(&name);
                if block {
                    out.push('\n');
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect(child_el, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}
