/// Minimal SVG element tree.
///
/// Attributes keep insertion order and an update to an existing attribute
/// keeps its position, so the serialized output mirrors what a DOM would
/// hold after the same sequence of `setAttribute` calls.

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    /// Builder form of `set_attr`.
    pub fn with_attr(mut self, name: &str, value: impl ToString) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Sets an attribute, replacing the value in place if already present.
    pub fn set_attr(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(n, _)| n != name);
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn set_text(&mut self, text: impl ToString) {
        self.text = Some(text.to_string());
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// True if the whitespace-separated `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Appends `child` and returns a handle to it.
    pub fn append(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Element] {
        &mut self.children
    }

    /// Keeps only the children for which `keep` returns true.
    pub fn retain_children<F>(&mut self, keep: F)
    where
        F: FnMut(&Element) -> bool,
    {
        self.children.retain(keep);
    }

    /// Direct children with the given tag.
    pub fn children_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Direct children carrying `class`.
    pub fn children_by_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.has_class(class))
    }

    /// Serializes the element and its subtree.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if self.children.is_empty() && self.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(ref text) = self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_markup(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Escapes text for use in attribute values and character data.
pub fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
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
    fn test_attribute_update_keeps_position() {
        let mut rect = Element::new("rect")
            .with_attr("width", 5)
            .with_attr("fill", "red")
            .with_attr("class", "cover");
        rect.set_attr("fill", "blue");
        assert_eq!(rect.to_markup(), r#"<rect width="5" fill="blue" class="cover"/>"#);
    }

    #[test]
    fn test_remove_attr() {
        let mut text = Element::new("text").with_attr("y", 9).with_attr("dy", "0.71em");
        text.remove_attr("dy");
        text.set_text("January");
        assert_eq!(text.to_markup(), r#"<text y="9">January</text>"#);
    }

    #[test]
    fn test_nested_markup_and_escaping() {
        let mut g = Element::new("g").with_attr("class", "axis axis--x");
        g.append(Element::new("text")).set_text("A & B");
        assert!(g.has_class("axis--x"));
        assert!(!g.has_class("axis--y"));
        assert_eq!(
            g.to_markup(),
            r#"<g class="axis axis--x"><text>A &amp; B</text></g>"#
        );
    }

    #[test]
    fn test_child_queries() {
        let mut g = Element::new("g");
        g.append(Element::new("rect").with_attr("class", "cover"));
        g.append(Element::new("path").with_attr("class", "sunriseline"));
        g.append(Element::new("rect").with_attr("class", "cover"));
        assert_eq!(g.children_by_tag("rect").count(), 2);
        assert_eq!(g.children_by_class("sunriseline").count(), 1);
        g.retain_children(|c| c.tag() != "rect");
        assert_eq!(g.children().len(), 1);
    }
}
