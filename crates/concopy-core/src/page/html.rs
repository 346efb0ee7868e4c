//! Page context provider over a static HTML document
//!
//! Mirrors what a content script reads from a live document: the `<title>`,
//! the body text, and every `<meta name|property content>` pair, with the
//! common alternate tag names folded into `description`, `keywords` and
//! `author`.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever::Attribute;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::cell::RefCell;
use std::collections::BTreeMap;

use super::{PageContext, PageMeta};
use crate::error::{ConcopyError, Result};

/// Build a `PageContext` from an HTML document
///
/// # Errors
///
/// Returns `PageParseError` if the document cannot be read
pub fn from_html(html: &str, url: &str, selection: &str) -> Result<PageContext> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| ConcopyError::PageParseError(e.to_string()))?;

    let mut collector = PageCollector::default();
    collector.walk_node(&dom.document);

    Ok(PageContext {
        title: collector.title.unwrap_or_default().trim().to_string(),
        url: url.to_string(),
        selection: selection.to_string(),
        content: collapse_whitespace(&collector.body_text),
        meta: normalize_meta(collector.meta_tags),
    })
}

/// Fold alternate tag names into the normalized keys
///
/// Raw tags are kept as-is; normalized keys absent from the document map
/// to `None`.
fn normalize_meta(tags: BTreeMap<String, String>) -> PageMeta {
    let first = |keys: &[&str]| keys.iter().find_map(|k| tags.get(*k).cloned());

    let mut meta: PageMeta = BTreeMap::new();
    meta.insert(
        "description".to_string(),
        first(&["description", "og:description"]),
    );
    meta.insert("keywords".to_string(), first(&["keywords"]));
    meta.insert("author".to_string(), first(&["author", "article:author"]));

    for (key, value) in tags {
        meta.insert(key, Some(value));
    }
    meta
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
struct PageCollector {
    title: Option<String>,
    body_text: String,
    meta_tags: BTreeMap<String, String>,
    in_body: bool,
}

impl PageCollector {
    fn walk_node(&mut self, handle: &Handle) {
        match &handle.data {
            NodeData::Document => self.walk_children(handle),
            NodeData::Element { name, attrs, .. } => {
                let tag = name.local.as_ref();
                match tag {
                    "script" | "style" | "noscript" | "template" => {}
                    "title" if self.title.is_none() => {
                        self.title = Some(collect_text(handle));
                    }
                    "meta" => self.handle_meta(attrs),
                    "body" => {
                        self.in_body = true;
                        self.walk_children(handle);
                        self.in_body = false;
                    }
                    _ => self.walk_children(handle),
                }
            }
            NodeData::Text { contents } if self.in_body => {
                self.body_text.push_str(&contents.borrow());
                self.body_text.push(' ');
            }
            _ => {}
        }
    }

    fn walk_children(&mut self, handle: &Handle) {
        for child in handle.children.borrow().iter() {
            self.walk_node(child);
        }
    }

    fn handle_meta(&mut self, attrs: &RefCell<Vec<Attribute>>) {
        let name = get_attr(attrs, "name").or_else(|| get_attr(attrs, "property"));
        let content = get_attr(attrs, "content");
        if let (Some(name), Some(content)) = (name, content) {
            if !name.is_empty() && !content.is_empty() {
                self.meta_tags.insert(name, content);
            }
        }
    }
}

fn get_attr(attrs: &RefCell<Vec<Attribute>>, name: &str) -> Option<String> {
    attrs
        .borrow()
        .iter()
        .find(|attr| attr.name.local.as_ref() == name)
        .map(|attr| attr.value.to_string())
}

fn collect_text(handle: &Handle) -> String {
    let mut text = String::new();
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => text.push_str(&contents.borrow()),
            NodeData::Element { .. } => text.push_str(&collect_text(child)),
            _ => {}
        }
    }
    text
}
