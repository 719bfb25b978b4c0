//! Minimal presentational node tree that serializes to HTML.

use std::fmt::Write;

use minijinja::HtmlEscape;

use crate::sheet::Style;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    classes: Vec<String>,
    attrs: Vec<(&'static str, String)>,
    style: Style,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            style: Style::new(),
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Set `name` only when a value is present.
    pub fn attr_opt(self, name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.attr(name, v),
            None => self,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

}

// Read access is only needed to assert on rendered trees.
#[cfg(test)]
impl Element {
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_style(&self) -> &Style {
        &self.style
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[cfg(test)]
impl Node {
    /// Depth-first search for the first element carrying `class`.
    pub fn find_class(&self, class: &str) -> Option<&Element> {
        match self {
            Node::Text(_) => None,
            Node::Element(el) => {
                if el.has_class(class) {
                    return Some(el);
                }
                el.children.iter().find_map(|c| c.find_class(class))
            }
        }
    }

    /// Concatenated text content.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }
}

impl Node {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out, 0);
        out
    }

    fn write_html(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match self {
            Node::Text(t) => {
                let _ = writeln!(out, "{}{}", indent, HtmlEscape(t));
            }
            Node::Element(el) => {
                let _ = write!(out, "{}<{}", indent, el.tag);
                if !el.classes.is_empty() {
                    let _ = write!(out, " class=\"{}\"", HtmlEscape(&el.classes.join(" ")));
                }
                if !el.style.is_empty() {
                    let _ = write!(out, " style=\"{}\"", HtmlEscape(&el.style.to_string()));
                }
                for (name, value) in &el.attrs {
                    let _ = write!(out, " {}=\"{}\"", name, HtmlEscape(value));
                }

                // Leaf elements and single-text elements stay on one line
                match el.children.as_slice() {
                    [] => {
                        let _ = writeln!(out, "></{}>", el.tag);
                    }
                    [Node::Text(t)] => {
                        let _ = writeln!(out, ">{}</{}>", HtmlEscape(t), el.tag);
                    }
                    children => {
                        out.push_str(">\n");
                        for child in children {
                            child.write_html(out, depth + 1);
                        }
                        let _ = writeln!(out, "{}</{}>", indent, el.tag);
                    }
                }
            }
        }
    }
}
