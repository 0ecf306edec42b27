//! In-memory document tree
//!
//! An `Element` has a name, ordered attributes, ordered child elements and a
//! text value. Leaves are elements without children; their text holds a
//! field's value. Mixed content is not modelled: text of an element that has
//! children is ignored when writing.

/// A named node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Creates an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a leaf holding `text`
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub(crate) fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// True when the element has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Attributes in document order
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Value of the first attribute named `key`
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Builder form of [`set_attribute`](Self::set_attribute)
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Children named `name`, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First child named `name`
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First child named `name`, mutably
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    pub fn child_at_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.children.get_mut(index)
    }

    /// Appends a child and returns its position
    pub fn push_child(&mut self, child: Element) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    /// Removes and returns the child at `index`, shifting later children.
    pub fn remove_child(&mut self, index: usize) -> Option<Element> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf() {
        let leaf = Element::leaf("name", "Alice");
        assert_eq!(leaf.name(), "name");
        assert_eq!(leaf.text(), "Alice");
        assert!(leaf.is_leaf());
    }

    #[test]
    fn test_attributes_replace_in_place() {
        let mut el = Element::new("Person")
            .with_attribute("ID", "a")
            .with_attribute("rev", "1");
        el.set_attribute("ID", "b");

        assert_eq!(el.attribute("ID"), Some("b"));
        assert_eq!(el.attributes()[0].0, "ID");
        assert_eq!(el.attributes().len(), 2);
        assert_eq!(el.attribute("missing"), None);
    }

    #[test]
    fn test_children() {
        let mut root = Element::new("Persons");
        root.push_child(Element::new("Person").with_attribute("ID", "1"));
        root.push_child(Element::new("Note"));
        let pos = root.push_child(Element::new("Person").with_attribute("ID", "2"));

        assert_eq!(pos, 2);
        assert!(!root.is_leaf());
        assert_eq!(root.children_named("Person").count(), 2);
        assert_eq!(root.child("Person").unwrap().attribute("ID"), Some("1"));

        let removed = root.remove_child(0).unwrap();
        assert_eq!(removed.attribute("ID"), Some("1"));
        assert_eq!(root.children()[0].name(), "Note");
        assert!(root.remove_child(5).is_none());
    }

    #[test]
    fn test_child_mut() {
        let mut el = Element::new("Person");
        el.push_child(Element::leaf("age", "3"));
        el.child_mut("age").unwrap().set_text("4");
        assert_eq!(el.child("age").unwrap().text(), "4");
        assert!(el.child_mut("name").is_none());
    }
}
