use super::{Document, NodeId, NodeKind};

const VOID_TAGS: &[&str] = &["input", "br", "hr", "img", "meta", "link"];

impl Document {
    /// Serializes `root` and its subtree as HTML markup.
    ///
    /// Attributes keep insertion order; `class` and `checked` come last.
    /// Stale ids serialize to an empty string.
    pub fn to_html(&self, root: NodeId) -> String {
        let mut out = String::new();
        self.write_html(root, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(kind) = self.kind(id) else { return };
        let el = match kind {
            NodeKind::Text(t) => {
                out.push_str(&html_escape::encode_text(t));
                return;
            }
            NodeKind::Element(el) => el,
        };

        out.push('<');
        out.push_str(&el.tag);
        for (name, value) in &el.attrs {
            push_attr(out, name, value);
        }
        if !el.classes.is_empty() {
            push_attr(out, "class", &el.classes.join(" "));
        }
        if el.checked {
            out.push_str(" checked");
        }
        out.push('>');

        if VOID_TAGS.contains(&el.tag.as_str()) {
            return;
        }
        for &child in self.children(id) {
            self.write_html(child, out);
        }
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}
