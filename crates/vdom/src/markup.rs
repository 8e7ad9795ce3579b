//! Node trees to HTML text.
//!
//! Serialization is deterministic: attributes print in stored order and
//! children in list order. Void elements print without a closing tag.

use crate::escape::{push_escaped_attr, push_escaped_text};
use crate::node::Node;

pub fn render_html(node: &Node) -> String {
    let mut out = String::new();
    push_node(&mut out, node);
    out
}

pub fn push_node(out: &mut String, node: &Node) {
    match node {
        Node::Text(text) => push_escaped_text(out, text),
        Node::Element {
            tag,
            attributes,
            children,
        } => {
            out.push('<');
            out.push_str(tag);
            for (key, value) in attributes {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                push_escaped_attr(out, value);
                out.push('"');
            }
            out.push('>');
            if is_void(tag) {
                debug_assert!(children.is_empty(), "void elements cannot have children");
                return;
            }
            for child in children {
                push_node(out, child);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "br" | "hr" | "img" | "input" | "link" | "meta" | "wbr")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::attrs;

    #[test]
    fn element_with_attributes_and_text() {
        let node = Node::element(
            "h1",
            attrs(&[("id", "banner"), ("class", "center")]),
            vec![Node::text("/g/ - Technology")],
        )
        .unwrap();
        assert_eq!(
            render_html(&node),
            r#"<h1 id="banner" class="center">/g/ - Technology</h1>"#
        );
    }

    #[test]
    fn nested_children_render_in_order() {
        let node = Node::element(
            "nav",
            attrs(&[("id", "nav")]),
            vec![
                Node::element("a", attrs(&[("href", "/a/")]), vec![Node::text("a")]).unwrap(),
                Node::element("a", attrs(&[("href", "/b/")]), vec![Node::text("b")]).unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(
            render_html(&node),
            r#"<nav id="nav"><a href="/a/">a</a><a href="/b/">b</a></nav>"#
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node = Node::element("hr", Vec::new(), Vec::new()).unwrap();
        assert_eq!(render_html(&node), "<hr>");
    }

    #[test]
    fn text_and_attr_values_are_escaped() {
        let node = Node::element(
            "a",
            attrs(&[("title", r#"say "hi""#)]),
            vec![Node::text("1 < 2")],
        )
        .unwrap();
        assert_eq!(
            render_html(&node),
            r#"<a title="say &quot;hi&quot;">1 &lt; 2</a>"#
        );
    }
}
