//! A minimal SVG element tree.

use std::fmt::{self, Display, Write};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Trusted markup inserted verbatim (piece artwork).
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of `set_attr`.
    pub fn attr(mut self, name: &str, value: impl Display) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, name: &str, value: impl Display) {
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn raw(mut self, markup: impl Into<String>) -> Self {
        self.children.push(Node::Raw(markup.into()));
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> fmt::Result {
        write!(out, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(out, " {}=\"{}\"", name, escape(value))?;
        }
        if self.children.is_empty() {
            return out.write_str("/>");
        }
        out.write_char('>')?;
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_to(out)?,
                Node::Text(text) => out.write_str(&escape(text))?,
                Node::Raw(markup) => out.write_str(markup)?,
            }
        }
        write!(out, "</{}>", self.tag)
    }
}

/// Format a number the way it should appear in an attribute: no trailing `.0`,
/// at most three decimal places.
pub fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    rounded.to_string()
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested_elements() {
        let svg = Element::new("svg")
            .attr("viewBox", "0 0 10 10")
            .child(Element::new("path").attr("d", "M0,0H10"))
            .child(Element::new("text").attr("x", 5).text("a<b"));
        assert_eq!(
            svg.render(),
            r#"<svg viewBox="0 0 10 10"><path d="M0,0H10"/><text x="5">a&lt;b</text></svg>"#
        );
    }

    #[test]
    fn test_set_attr_replaces() {
        let mut el = Element::new("g").attr("transform", "scale(1)");
        el.set_attr("transform", "scale(2)");
        assert_eq!(el.get_attr("transform"), Some("scale(2)"));
        assert_eq!(el.render(), r#"<g transform="scale(2)"/>"#);
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(20.0), "20");
        assert_eq!(num(2.5), "2.5");
        assert_eq!(num(1.0 / 3.0), "0.333");
        assert_eq!(num(-0.0), "0");
    }
}
