// src/rewrite/html.rs
// =============================================================================
// Rewrites one rendered HTML page so it works from any directory.
//
// Steps, always in this order:
// 1. Parse the bytes into a DOM (html5ever + markup5ever_rcdom) and move
//    <template> contents under their element so they are walked and written
// 2. Work out the page's relative prefix from its URL path depth
// 3. Walk every element depth-first:
//    - URL attributes (href, src, action, poster, data) holding an absolute
//      path become relative:  href="/about"  ->  href="../about"
//    - the first <head> gets the CSP <meta> as its very first child
//    - inline <script> bodies get their quoted bundle paths rewritten
// 4. Serialize the DOM back to bytes
//
// Working on the DOM instead of the raw text means comments and ordinary
// text never match, and the CSP tag lands inside <head> whatever attributes
// or formatting the head tag uses.
// =============================================================================

use super::literal::relativize_script_text;
use crate::config::{CSP_CONTENT, URL_ATTRS};
use crate::error::ExportError;
use crate::output::{depth, relative_prefix};
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{parse_document, Attribute, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::RefCell;
use std::rc::Rc;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

// True for the attribute names whose values are URLs
pub fn is_url_attr(name: &str) -> bool {
    URL_ATTRS.contains(&name)
}

// A value is rewritten only when it is an absolute path on this site.
// Protocol-relative ("//cdn...") and fragment ("#x") values never are.
pub fn is_rewrite_target(value: &str) -> bool {
    value.starts_with('/') && !value.starts_with("//")
}

// The relative form of an absolute path, or None when it must stay as is
//
// Examples (prefix "../"):
//   "/about"         -> Some("../about")
//   "/"              -> Some("../")
//   "//example.com"  -> None
//   "#section"       -> None
pub fn relativize_url(value: &str, prefix: &str) -> Option<String> {
    if !is_rewrite_target(value) {
        return None;
    }
    if value == "/" {
        return Some(prefix.to_string());
    }
    Some(format!("{}{}", prefix, &value[1..]))
}

// Parses, rewrites and re-serializes one page
pub fn transform_html(html: &[u8], url_path: &str) -> Result<Vec<u8>, ExportError> {
    let malformed = |source: std::io::Error| ExportError::MalformedHtml {
        path: url_path.to_string(),
        source,
    };

    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut &html[..])
        .map_err(malformed)?;

    // The serializer only writes `children`, so template contents have to
    // live there or they vanish from the output
    inline_template_contents(&dom.document);

    let prefix = relative_prefix(depth(url_path));
    let mut rewriter = PageRewriter {
        prefix: &prefix,
        csp_injected: false,
    };
    rewriter.walk(&dom.document);

    if !rewriter.csp_injected {
        tracing::warn!(path = url_path, "page has no <head>, CSP not injected");
    }

    let mut out = Vec::with_capacity(html.len() + CSP_CONTENT.len() + 64);
    let document: SerializableHandle = dom.document.clone().into();
    serialize(&mut out, &document, SerializeOpts::default()).map_err(malformed)?;

    Ok(out)
}

// State for one page's walk
struct PageRewriter<'a> {
    prefix: &'a str,
    csp_injected: bool,
}

impl PageRewriter<'_> {
    // Depth-first, pre-order walk with an explicit stack so very deep
    // documents can't overflow the call stack
    fn walk(&mut self, root: &Handle) {
        let mut stack = vec![root.clone()];

        while let Some(node) = stack.pop() {
            if let NodeData::Element { name, attrs, .. } = &node.data {
                self.rewrite_attrs(&mut attrs.borrow_mut());

                match &*name.local {
                    "head" if !self.csp_injected => {
                        insert_first_child(&node, csp_meta());
                        self.csp_injected = true;
                    }
                    "script" if !has_attr(&attrs.borrow(), "src") => {
                        self.rewrite_script(&node);
                    }
                    _ => {}
                }
            }

            // Push in reverse so the first child is visited first
            let children = node.children.borrow();
            for i in (0..children.len()).rev() {
                stack.push(children[i].clone());
            }
        }
    }

    fn rewrite_attrs(&self, attrs: &mut [Attribute]) {
        for attr in attrs.iter_mut() {
            if !is_url_attr(&attr.name.local) {
                continue;
            }
            if let Some(relative) = relativize_url(&attr.value, self.prefix) {
                attr.value = StrTendril::from(relative);
            }
        }
    }

    fn rewrite_script(&self, script: &Handle) {
        for child in script.children.borrow().iter() {
            if let NodeData::Text { contents } = &child.data {
                let rewritten = relativize_script_text(&contents.borrow(), self.prefix);
                *contents.borrow_mut() = StrTendril::from(rewritten);
            }
        }
    }
}

fn has_attr(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|a| &*a.name.local == name)
}

// <meta http-equiv="Content-Security-Policy" content="...">
fn csp_meta() -> Handle {
    let attr = |name: &str, value: &str| Attribute {
        name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
        value: StrTendril::from(value),
    };

    Node::new(NodeData::Element {
        name: QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("meta")),
        attrs: RefCell::new(vec![
            attr("http-equiv", "Content-Security-Policy"),
            attr("content", CSP_CONTENT),
        ]),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

// Moves each <template>'s content fragment into the template element itself,
// nested templates included
fn inline_template_contents(root: &Handle) {
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if let NodeData::Element {
            template_contents, ..
        } = &node.data
        {
            if let Some(fragment) = template_contents.borrow_mut().take() {
                let moved: Vec<Handle> = fragment.children.borrow_mut().drain(..).collect();
                for child in &moved {
                    child.parent.set(Some(Rc::downgrade(&node)));
                }
                node.children.borrow_mut().extend(moved);
            }
        }

        stack.extend(node.children.borrow().iter().cloned());
    }
}

fn insert_first_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().insert(0, child);
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn transform(html: &str, url_path: &str) -> String {
        String::from_utf8(transform_html(html.as_bytes(), url_path).unwrap()).unwrap()
    }

    #[test]
    fn test_is_url_attr() {
        for name in ["href", "src", "action", "poster", "data"] {
            assert!(is_url_attr(name), "{name} should be a URL attribute");
        }
        for name in ["class", "id", "style", "value", "srcset", "HREF", ""] {
            assert!(!is_url_attr(name), "{name} should not be a URL attribute");
        }
    }

    #[test]
    fn test_relativize_url() {
        assert_eq!(relativize_url("/about", "../"), Some("../about".to_string()));
        assert_eq!(relativize_url("/", "./"), Some("./".to_string()));
        assert_eq!(relativize_url("/", "../../"), Some("../../".to_string()));
        assert_eq!(relativize_url("//example.com", "../"), None);
        assert_eq!(relativize_url("#x", "../"), None);
        assert_eq!(relativize_url("https://go.dev", "../"), None);
        assert_eq!(relativize_url("relative/link", "../"), None);
    }

    #[test]
    fn test_rewrites_href_at_root() {
        let out = transform(
            r#"<html><head></head><body><a href="/about">About</a></body></html>"#,
            "/",
        );
        assert!(out.contains(r#"href="./about""#), "{out}");
    }

    #[test]
    fn test_rewrites_href_two_levels_deep() {
        let out = transform(
            r#"<html><head></head><body><a href="/about">About</a></body></html>"#,
            "/net/http",
        );
        assert!(out.contains(r#"href="../../about""#), "{out}");
    }

    #[test]
    fn test_rewrites_src_attributes() {
        let out = transform(
            r#"<html><head></head><body><img src="/static/img/logo.png"></body></html>"#,
            "/about",
        );
        assert!(out.contains(r#"src="../static/img/logo.png""#), "{out}");
    }

    #[test]
    fn test_rewrites_action_poster_and_data() {
        let out = transform(
            r#"<html><head></head><body>
                <form action="/search"></form>
                <video poster="/static/poster.png"></video>
                <object data="/static/doc.svg"></object>
            </body></html>"#,
            "/about",
        );
        assert!(out.contains(r#"action="../search""#), "{out}");
        assert!(out.contains(r#"poster="../static/poster.png""#), "{out}");
        assert!(out.contains(r#"data="../static/doc.svg""#), "{out}");
    }

    #[test]
    fn test_root_link_becomes_prefix() {
        let out = transform(
            r#"<html><head></head><body><a href="/">Home</a></body></html>"#,
            "/net/http",
        );
        assert!(out.contains(r#"href="../../""#), "{out}");

        let out = transform(
            r#"<html><head></head><body><a href="/">Home</a></body></html>"#,
            "/",
        );
        assert!(out.contains(r#"href="./""#), "{out}");
    }

    #[test]
    fn test_rewrites_link_href_in_head() {
        let out = transform(
            r#"<html><head><link rel="stylesheet" href="/static/frontend/frontend.css"></head><body></body></html>"#,
            "/net/http",
        );
        assert!(out.contains(r#"href="../../static/frontend/frontend.css""#), "{out}");
    }

    #[test]
    fn test_protocol_relative_and_fragments_are_untouched() {
        let out = transform(
            r##"<html><head></head><body><a href="//example.com">X</a><a href="#x">Y</a></body></html>"##,
            "/net/http",
        );
        assert!(out.contains(r#"href="//example.com""#), "{out}");
        assert!(out.contains(r##"href="#x""##), "{out}");
    }

    #[test]
    fn test_non_url_attributes_are_untouched() {
        let out = transform(
            r#"<html><head></head><body><div class="/static/x" title="/about"></div></body></html>"#,
            "/about",
        );
        assert!(out.contains(r#"class="/static/x""#), "{out}");
        assert!(out.contains(r#"title="/about""#), "{out}");
    }

    #[test]
    fn test_text_and_comments_are_untouched() {
        let out = transform(
            r#"<html><head></head><body><!-- href="/about" --><p>see "/static/a.js"</p></body></html>"#,
            "/about",
        );
        assert!(out.contains(r#"<!-- href="/about" -->"#), "{out}");
        assert!(out.contains(r#"see "/static/a.js""#), "{out}");
    }

    #[test]
    fn test_csp_is_injected_as_first_head_child() {
        let out = transform(
            r#"<html><head><title>Test</title><link href="/static/a.css"></head><body></body></html>"#,
            "/",
        );

        assert!(out.contains(r#"http-equiv="Content-Security-Policy""#), "{out}");
        assert!(out.contains(&format!(r#"content="{}""#, CSP_CONTENT)), "{out}");

        let doc = Html::parse_document(&out);
        let first = Selector::parse("head > :first-child").unwrap();
        let first = doc.select(&first).next().unwrap();
        assert_eq!(first.value().name(), "meta");
        assert_eq!(
            first.value().attr("http-equiv"),
            Some("Content-Security-Policy")
        );
    }

    #[test]
    fn test_csp_is_injected_exactly_once() {
        let out = transform(
            r#"<html><head lang="en" data-x="1"><meta charset="utf-8"></head><body></body></html>"#,
            "/about",
        );
        assert_eq!(out.matches("Content-Security-Policy").count(), 1, "{out}");
    }

    #[test]
    fn test_csp_is_injected_when_head_is_implied() {
        let out = transform("<p>no head here</p>", "/");

        let doc = Html::parse_document(&out);
        let meta = Selector::parse(r#"head > meta[http-equiv="Content-Security-Policy"]"#).unwrap();
        assert_eq!(doc.select(&meta).count(), 1, "{out}");
    }

    #[test]
    fn test_rewrites_inline_script_paths() {
        let out = transform(
            r#"<html><head></head><body><script>loadScript("/static/frontend/frontend.js")</script></body></html>"#,
            "/net/http",
        );
        assert!(
            out.contains(r#"loadScript("../../static/frontend/frontend.js")"#),
            "{out}"
        );
    }

    #[test]
    fn test_external_script_body_is_untouched() {
        let out = transform(
            r#"<html><head></head><body><script src="/static/a.js">load("/static/b.js")</script></body></html>"#,
            "/about",
        );
        assert!(out.contains(r#"src="../static/a.js""#), "{out}");
        assert!(out.contains(r#"load("/static/b.js")"#), "{out}");
    }

    #[test]
    fn test_deep_path_gets_correct_prefix() {
        let out = transform(
            r#"<html><head><link href="/static/style.css"></head><body><a href="/about">About</a></body></html>"#,
            "/github.com/user/repo/pkg",
        );
        assert!(out.contains(r#"href="../../../../static/style.css""#), "{out}");
        assert!(out.contains(r#"href="../../../../about""#), "{out}");
    }

    #[test]
    fn test_template_content_is_kept_and_rewritten() {
        let out = transform(
            r#"<html><head></head><body><template id="row"><a href="/t">t</a></template></body></html>"#,
            "/a/b",
        );
        assert!(
            out.contains(r#"<template id="row"><a href="../../t">t</a></template>"#),
            "{out}"
        );
    }

    #[test]
    fn test_nested_templates_are_kept() {
        let out = transform(
            r#"<html><head></head><body><template><div><template><img src="/static/i.png"></template></div></template></body></html>"#,
            "/about",
        );
        assert!(
            out.contains(r#"<template><div><template><img src="../static/i.png"></template></div></template>"#),
            "{out}"
        );
    }

    #[test]
    fn test_svg_content_is_kept_and_rewritten() {
        let out = transform(
            r##"<html><head></head><body><svg><use href="/static/sprite.svg#search"></use></svg></body></html>"##,
            "/about",
        );
        assert!(
            out.contains(r##"<svg><use href="../static/sprite.svg#search"></use></svg>"##),
            "{out}"
        );
    }

    #[test]
    fn test_script_body_with_markup_characters_is_kept() {
        let out = transform(
            r#"<html><head></head><body><script>if (a < b && c) { load("/static/x.js"); }</script></body></html>"#,
            "/about",
        );
        assert!(
            out.contains(r#"<script>if (a < b && c) { load("../static/x.js"); }</script>"#),
            "{out}"
        );
    }

    #[test]
    fn test_escaped_text_survives() {
        let out = transform(
            "<html><head></head><body><p>a &amp; b &lt; c</p></body></html>",
            "/",
        );
        assert!(out.contains("<p>a &amp; b &lt; c</p>"), "{out}");
    }

    #[test]
    fn test_doctype_survives() {
        let out = transform("<!DOCTYPE html><html><head></head><body></body></html>", "/");
        assert!(out.starts_with("<!DOCTYPE html>"), "{out}");
    }
}
