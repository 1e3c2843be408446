//! Generic iCalendar document tree.
//!
//! An exchange document is a tree of named containers delimited by
//! `BEGIN:<NAME>`/`END:<NAME>` marker lines, holding content lines of the
//! form `NAME;PARAM=VALUE;...:VALUE`. This module knows nothing about
//! scheduling semantics; it only builds and serializes the tree.

use std::fmt;

/// Version line emitted at the top of every document.
const VERSION: &str = "2.0";

/// Product identifier emitted after the version line.
const PRODID: &str = "-//textcal//tcal//EN";

/// A `NAME=VALUE` parameter attached to a content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    name: String,
    value: String,
}

impl Param {
    /// Creates a parameter; the name is uppercased.
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_uppercase(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A single `NAME;PARAMS:VALUE` entry.
///
/// Values are passed through verbatim; the exchange format's escaping rules
/// are out of scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    name: String,
    value: String,
    params: Vec<Param>,
}

impl ContentLine {
    /// Creates a content line; the name is uppercased.
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_uppercase(),
            value: value.into(),
            params: Vec::new(),
        }
    }

    /// Appends a parameter, preserving order.
    pub fn push_param(&mut self, param: Param) {
        self.params.push(param);
    }

    /// Builder-style variant of [`push_param`](Self::push_param).
    #[must_use]
    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ContentLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for param in &self.params {
            write!(f, ";{param}")?;
        }
        write!(f, ":{}", self.value)
    }
}

/// A child of a container: either a nested container or a content line.
#[derive(Debug, Clone)]
pub enum Node {
    Container(Container),
    Line(ContentLine),
}

/// An ordered, named sequence of nodes wrapped in begin/end markers.
#[derive(Debug, Clone)]
pub struct Container {
    name: String,
    children: Vec<Node>,
}

impl Container {
    /// Creates an empty container; the name is uppercased.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_uppercase(),
            children: Vec::new(),
        }
    }

    /// Appends a content line, preserving order.
    pub fn push_line(&mut self, line: ContentLine) {
        self.children.push(Node::Line(line));
    }

    /// Appends a nested container, preserving order.
    pub fn push_container(&mut self, container: Container) {
        self.children.push(Node::Container(container));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Writes the container's lines, CRLF-separated, with no trailing
    /// terminator.
    fn write_lines(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BEGIN:{}", self.name)?;
        for child in &self.children {
            write!(f, "\r\n")?;
            match child {
                Node::Container(container) => container.write_lines(f)?,
                Node::Line(line) => write!(f, "{line}")?,
            }
        }
        write!(f, "\r\nEND:{}", self.name)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_lines(f)
    }
}

/// The root `VCALENDAR` container.
///
/// Always begins with the fixed version and product-identifier lines;
/// event blocks follow in insertion order.
#[derive(Debug, Clone)]
pub struct Document {
    root: Container,
}

impl Document {
    pub fn new() -> Self {
        let mut root = Container::new("VCALENDAR");
        root.push_line(ContentLine::new("VERSION", VERSION));
        root.push_line(ContentLine::new("PRODID", PRODID));
        Self { root }
    }

    /// Appends an event block.
    pub fn push_event(&mut self, event: Container) {
        self.root.push_container(event);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_renders_name_equals_value() {
        let param = Param::new("tzid", "Europe/Paris");
        assert_eq!(param.to_string(), "TZID=Europe/Paris");
    }

    #[test]
    fn content_line_without_params() {
        let line = ContentLine::new("summary", "Maths");
        assert_eq!(line.to_string(), "SUMMARY:Maths");
    }

    #[test]
    fn content_line_params_between_name_and_value() {
        let line = ContentLine::new("dtstart", "20240909T080000")
            .with_param(Param::new("TZID", "Europe/Paris"))
            .with_param(Param::new("X-EXTRA", "1"));
        assert_eq!(
            line.to_string(),
            "DTSTART;TZID=Europe/Paris;X-EXTRA=1:20240909T080000"
        );
    }

    #[test]
    fn container_wraps_children_in_markers() {
        let mut container = Container::new("vevent");
        container.push_line(ContentLine::new("UID", "X"));
        assert_eq!(container.to_string(), "BEGIN:VEVENT\r\nUID:X\r\nEND:VEVENT");
    }

    #[test]
    fn empty_container_has_only_markers() {
        let container = Container::new("VEVENT");
        assert_eq!(container.to_string(), "BEGIN:VEVENT\r\nEND:VEVENT");
    }

    #[test]
    fn nested_container_flattens_into_parent_lines() {
        let mut inner = Container::new("VEVENT");
        inner.push_line(ContentLine::new("UID", "1"));
        let mut outer = Container::new("VCALENDAR");
        outer.push_line(ContentLine::new("VERSION", "2.0"));
        outer.push_container(inner);

        assert_eq!(
            outer.to_string(),
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:1\r\nEND:VEVENT\r\nEND:VCALENDAR"
        );
    }

    #[test]
    fn document_starts_with_version_and_prodid() {
        let doc = Document::new();
        let text = doc.to_string();
        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(lines[0], "BEGIN:VCALENDAR");
        assert_eq!(lines[1], "VERSION:2.0");
        assert!(lines[2].starts_with("PRODID:"));
        assert_eq!(lines[3], "END:VCALENDAR");
    }

    #[test]
    fn document_keeps_event_insertion_order() {
        let mut doc = Document::new();
        for uid in ["a", "b", "c"] {
            let mut event = Container::new("VEVENT");
            event.push_line(ContentLine::new("UID", uid));
            doc.push_event(event);
        }

        let text = doc.to_string();
        let a = text.find("UID:a").unwrap();
        let b = text.find("UID:b").unwrap();
        let c = text.find("UID:c").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn serialization_is_idempotent() {
        let mut doc = Document::new();
        let mut event = Container::new("VEVENT");
        event.push_line(ContentLine::new("UID", "1"));
        doc.push_event(event);

        assert_eq!(doc.to_string(), doc.to_string());
    }

    #[test]
    fn malformed_characters_pass_through_verbatim() {
        let line = ContentLine::new("SUMMARY", "a:b;c,d\nraw");
        assert_eq!(line.to_string(), "SUMMARY:a:b;c,d\nraw");
    }
}
