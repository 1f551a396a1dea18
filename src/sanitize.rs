//! Allowlist sanitization of pasted HTML fragments.
//!
//! The cleaning pass never mutates the parsed tree in place: it builds a
//! fresh output arena while walking the input, which sidesteps the
//! iterator-invalidation problems of splicing children during traversal.

use crate::dom::{self, Attribute, Dom, NodeData, NodeId};
use crate::policy::Policy;
use crate::style;

/// Tags whose entire subtree is removed, not unwrapped. These carry
/// executable or non-visible content that must never reach the editor.
/// Deliberately disjoint from the policy allowlist: an unknown container
/// loses only its wrapper, these lose their content outright.
const STRIP_CONTENT_TAGS: &[&str] = &["script", "style", "meta", "link", "head", "title"];

/// Sanitize an HTML fragment against an allowlist policy.
///
/// Elements from the strip set (`script`, `style`, `meta`, `link`, `head`,
/// `title`) are deleted with their descendants. Elements whose tag is not
/// allowed are unwrapped: their children are kept at the element's position.
/// Attributes not on the allowlist are dropped, and a surviving `style`
/// attribute is reduced to allowed properties (or removed when none remain).
/// Text is never dropped or altered.
///
/// Total over any input: malformed markup is recovered best-effort and then
/// filtered as usual, and the degenerate no-parse case yields `""`.
///
/// ```
/// use suds::{Policy, sanitize};
///
/// let dirty = r#"<div>keep<script>alert(1)</script></div>"#;
/// assert_eq!(sanitize(dirty, &Policy::default()), "<div>keep</div>");
/// ```
pub fn sanitize(raw_html: &str, policy: &Policy) -> String {
    let input = dom::parse_fragment(raw_html);
    let Some(body) = dom::fragment_root(&input) else {
        // Parser produced no usable tree; insert nothing rather than fail
        return String::new();
    };

    let mut output = Dom::new();
    let root = output.document();
    for child in input.children(body) {
        clean_into(&input, child, &mut output, root, policy);
    }

    dom::serialize_children(&output, root)
}

/// Copy `node` (filtered) into `parent` of the output arena.
fn clean_into(input: &Dom, node: NodeId, output: &mut Dom, parent: NodeId, policy: &Policy) {
    let Some(data) = input.get(node).map(|n| &n.data) else {
        return;
    };

    match data {
        NodeData::Text(text) => {
            output.append_text(parent, text);
        }
        NodeData::Element { name, attrs } => {
            let tag = name.local.as_ref().to_ascii_lowercase();

            if STRIP_CONTENT_TAGS.contains(&tag.as_str()) {
                // Delete with subtree; children are never visited
                return;
            }

            if !policy.allows_tag(&tag) {
                // Unwrap: splice children at this element's position
                for child in input.children(node) {
                    clean_into(input, child, output, parent, policy);
                }
                return;
            }

            let kept = filter_attributes(attrs, policy);
            let element = output.create_element(name.clone(), kept);
            output.append(parent, element);

            for child in input.children(node) {
                clean_into(input, child, output, element, policy);
            }
        }
        // Comments, doctypes and the like are discarded
        _ => {}
    }
}

fn filter_attributes(attrs: &[Attribute], policy: &Policy) -> Vec<Attribute> {
    let mut kept = Vec::new();

    for attr in attrs {
        let name = attr.name.local.as_ref().to_ascii_lowercase();
        if !policy.allows_attribute(&name) {
            continue;
        }

        if name == "style" {
            // Dropped entirely when no property survives
            if let Some(filtered) = style::filter_style(&attr.value, policy) {
                kept.push(Attribute {
                    name: attr.name.clone(),
                    value: filtered,
                });
            }
        } else {
            kept.push(attr.clone());
        }
    }

    kept
}

/// Convert plain text to markup in the default allowlist: escape HTML
/// metacharacters and turn line breaks into `<br>`.
///
/// This is the caller-side fallback for clipboards that only carry
/// `text/plain`; the result can be inserted directly or passed through
/// [`sanitize`] unchanged.
pub fn text_to_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    /// Walk every element of a parsed fragment, asserting policy closure.
    fn assert_allowlist_closure(html: &str, policy: &Policy) {
        let dom = dom::parse_fragment(html);
        let body = dom::fragment_root(&dom).expect("should find body");
        let mut stack: Vec<_> = dom.children(body).collect();

        while let Some(id) = stack.pop() {
            if let Some(NodeData::Element { name, attrs }) = dom.get(id).map(|n| &n.data) {
                let tag = name.local.as_ref();
                assert!(policy.allows_tag(tag), "tag {tag:?} escaped the allowlist");
                for attr in attrs {
                    let attr_name = attr.name.local.as_ref();
                    assert!(
                        policy.allows_attribute(attr_name),
                        "attribute {attr_name:?} escaped the allowlist"
                    );
                }
            }
            stack.extend(dom.children(id));
        }
    }

    #[test]
    fn test_unwrap_keeps_text() {
        let policy = Policy::default();
        assert_eq!(
            sanitize("<section>Hello <b>World</b></section>", &policy),
            "Hello <b>World</b>"
        );
    }

    #[test]
    fn test_script_deleted_with_content() {
        let policy = Policy::default();
        assert_eq!(
            sanitize("<div>keep<script>alert(1)</script></div>", &policy),
            "<div>keep</div>"
        );
    }

    #[test]
    fn test_nested_strip_tag() {
        let policy = Policy::default();
        let out = sanitize("<div><style>p { color: red }</style>text</div>", &policy);
        assert_eq!(out, "<div>text</div>");
    }

    #[test]
    fn test_disallowed_attributes_removed() {
        let policy = Policy::default();
        assert_eq!(
            sanitize(r##"<p onclick="alert(1)" class="x" href="#a">hi</p>"##, &policy),
            r##"<p href="#a">hi</p>"##
        );
    }

    #[test]
    fn test_style_attribute_filtered() {
        let policy = Policy::default();
        assert_eq!(
            sanitize(
                r#"<span style="color:red; position:absolute; font-weight:bold">x</span>"#,
                &policy
            ),
            r#"<span style="font-weight: bold; color: red">x</span>"#
        );
    }

    #[test]
    fn test_empty_style_attribute_dropped() {
        let policy = Policy::default();
        assert_eq!(
            sanitize(r#"<span style="position:absolute">x</span>"#, &policy),
            "<span>x</span>"
        );
    }

    #[test]
    fn test_plain_text_pass_through() {
        let policy = Policy::default();
        assert_eq!(sanitize("Just some plain text", &policy), "Just some plain text");
    }

    #[test]
    fn test_link_keeps_href_and_target() {
        let policy = Policy::default();
        assert_eq!(
            sanitize(
                r#"<a href="https://example.com" target="_blank" rel="noopener">here</a>"#,
                &policy
            ),
            r#"<a href="https://example.com" target="_blank">here</a>"#
        );
    }

    #[test]
    fn test_pasted_document_reduced_to_content() {
        let policy = Policy::default();
        let pasted = concat!(
            "<html><head><title>Doc</title><meta charset=\"utf-8\">",
            "<link rel=\"stylesheet\" href=\"x.css\"></head>",
            "<body><h1>Title</h1><p>Body</p></body></html>",
        );
        assert_eq!(sanitize(pasted, &policy), "<h1>Title</h1><p>Body</p>");
    }

    #[test]
    fn test_malformed_input_recovered() {
        let policy = Policy::default();
        // Unclosed tags are auto-closed, unknown tags are unwrapped
        let out = sanitize("<widget><p>text", &policy);
        assert_eq!(out, "<p>text</p>");
    }

    #[test]
    fn test_empty_input() {
        let policy = Policy::default();
        assert_eq!(sanitize("", &policy), "");
    }

    #[test]
    fn test_closure_on_hostile_input() {
        let policy = Policy::default();
        let hostile = concat!(
            "<table><tr><td onclick=\"x()\">cell</td></tr></table>",
            "<p style=\"color: red\" data-tracking=\"1\">para</p>",
            "<svg><circle r=\"1\"/></svg>",
        );
        let out = sanitize(hostile, &policy);
        assert_allowlist_closure(&out, &policy);
        assert!(out.contains("cell"));
        assert!(out.contains("para"));
    }

    #[test]
    fn test_empty_policy_strips_to_text() {
        let policy = Policy::new();
        assert_eq!(sanitize("<div><p>a</p><p>b</p></div>", &policy), "ab");
    }

    #[test]
    fn test_text_to_html() {
        assert_eq!(text_to_html("a < b & c\nnext"), "a &lt; b &amp; c<br>next");
        assert_eq!(text_to_html("windows\r\nline"), "windows<br>line");
    }

    #[test]
    fn test_text_to_html_survives_sanitize() {
        let policy = Policy::default();
        let html = text_to_html("one\ntwo");
        assert_eq!(sanitize(&html, &policy), html);
    }

    /// Small HTML-ish soup generator for the property tests.
    fn html_soup() -> impl Strategy<Value = String> {
        let piece = prop_oneof![
            "[a-z ]{0,8}",
            Just("<div>".to_string()),
            Just("</div>".to_string()),
            Just("<p>".to_string()),
            Just("<section>".to_string()),
            Just("</section>".to_string()),
            Just("<script>alert(1)</script>".to_string()),
            Just("<style>p{}</style>".to_string()),
            Just(r#"<span style="color:red;top:0">"#.to_string()),
            Just("</span>".to_string()),
            Just(r#"<a href="x" onclick="y()">"#.to_string()),
            Just("</a>".to_string()),
            Just("<br>".to_string()),
        ];
        prop::collection::vec(piece, 0..12).prop_map(|pieces| pieces.concat())
    }

    proptest! {
        #[test]
        fn prop_idempotent(input in html_soup()) {
            let policy = Policy::default();
            let once = sanitize(&input, &policy);
            let twice = sanitize(&once, &policy);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_allowlist_closure(input in html_soup()) {
            let policy = Policy::default();
            let out = sanitize(&input, &policy);
            assert_allowlist_closure(&out, &policy);
        }

        #[test]
        fn prop_no_executable_content(input in html_soup()) {
            let policy = Policy::default();
            let out = sanitize(&input, &policy);
            prop_assert!(!out.contains("<script"));
            prop_assert!(!out.contains("alert(1)"));
            prop_assert!(!out.contains("<style"));
        }
    }
}
