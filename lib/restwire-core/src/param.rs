//! Intermediate representation between encoding and wire rendering.
//!
//! The encoder flattens a value into [`ParameterItems`]: each item is a key
//! path (the object fields and array positions traversed to reach a leaf)
//! plus the string values found there.

use std::fmt;

/// One step of a key path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Object field.
    Field(String),
    /// Array position. Positions are anonymous so that the values of every
    /// element land in the same item.
    Element,
}

impl Key {
    /// Object field key.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// Returns `true` for the array placeholder.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self, Self::Element)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Element => Ok(()),
        }
    }
}

/// Strip the trailing array placeholders of a key path.
pub(crate) fn trim_trailing_elements(keys: &[Key]) -> &[Key] {
    let end = keys
        .iter()
        .rposition(|key| !key.is_element())
        .map_or(0, |index| index + 1);
    keys.get(..end).unwrap_or_default()
}

/// Key path and values of one flattened leaf.
///
/// `values` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterItem {
    keys: Vec<Key>,
    values: Vec<String>,
}

impl ParameterItem {
    /// Create an item.
    #[must_use]
    pub const fn new(keys: Vec<Key>, values: Vec<String>) -> Self {
        Self { keys, values }
    }

    /// Key path.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Key path without its trailing array placeholders.
    #[must_use]
    pub fn trimmed_keys(&self) -> &[Key] {
        trim_trailing_elements(&self.keys)
    }

    /// Values.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Consume into (keys, values).
    #[must_use]
    pub fn into_parts(self) -> (Vec<Key>, Vec<String>) {
        (self.keys, self.values)
    }
}

/// Ordered parameter items.
///
/// Adding values under a key path that is already present appends them to
/// the existing item, so array elements accumulate in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterItems(Vec<ParameterItem>);

impl ParameterItems {
    /// Create an empty set of items.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add values under a key path. Empty values are dropped.
    pub fn add(&mut self, keys: Vec<Key>, values: Vec<String>) {
        if values.is_empty() {
            return;
        }
        match self.0.iter_mut().find(|item| item.keys == keys) {
            Some(item) => item.values.extend(values),
            None => self.0.push(ParameterItem::new(keys, values)),
        }
    }

    /// The item whose key path is empty once trailing array placeholders are
    /// removed: the value of a scalar or an array of scalars.
    #[must_use]
    pub fn find_default(&self) -> Option<&ParameterItem> {
        self.0.iter().find(|item| item.trimmed_keys().is_empty())
    }

    /// Returns `true` if there is no item.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, ParameterItem> {
        self.0.iter()
    }
}

impl IntoIterator for ParameterItems {
    type Item = ParameterItem;
    type IntoIter = std::vec::IntoIter<ParameterItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParameterItems {
    type Item = &'a ParameterItem;
    type IntoIter = std::slice::Iter<'a, ParameterItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Field paths
// ============================================================================

/// Segment of a [`FieldPath`].
#[derive(Debug, Clone, Copy)]
pub enum Segment<'a> {
    /// Object field.
    Field(&'a str),
    /// Array index.
    Index(usize),
}

/// Location of a value inside the arguments, for error messages.
///
/// Each recursion level borrows its parent, so extending the path never
/// copies or mutates shared state.
#[derive(Debug, Clone, Copy)]
pub struct FieldPath<'a> {
    parent: Option<&'a FieldPath<'a>>,
    segment: Segment<'a>,
}

impl<'a> FieldPath<'a> {
    /// Path rooted at an argument name.
    #[must_use]
    pub const fn root(name: &'a str) -> Self {
        Self {
            parent: None,
            segment: Segment::Field(name),
        }
    }

    /// Child path for an object field.
    #[must_use]
    pub const fn field(&'a self, name: &'a str) -> Self {
        Self {
            parent: Some(self),
            segment: Segment::Field(name),
        }
    }

    /// Child path for an array index.
    #[must_use]
    pub const fn index(&'a self, index: usize) -> Self {
        Self {
            parent: Some(self),
            segment: Segment::Index(index),
        }
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent {
            write!(f, "{parent}.")?;
        }
        match self.segment {
            Segment::Field(name) => f.write_str(name),
            Segment::Index(index) => write!(f, "{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    fn values(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn add_merges_identical_key_paths() {
        let mut items = ParameterItems::new();
        items.add(vec![Key::Element], values(&["3"]));
        items.add(vec![Key::field("role")], values(&["admin"]));
        items.add(vec![Key::Element], values(&["4", "5"]));

        check!(items.len() == 2);
        let first = items.iter().next().expect("first item");
        check!(first.keys() == [Key::Element]);
        check!(first.values() == ["3", "4", "5"]);
    }

    #[test]
    fn add_drops_empty_values() {
        let mut items = ParameterItems::new();
        items.add(vec![Key::field("a")], Vec::new());
        check!(items.is_empty());
    }

    #[test]
    fn trimmed_keys_strip_trailing_elements() {
        let item = ParameterItem::new(
            vec![
                Key::field("role"),
                Key::Element,
                Key::field("user"),
                Key::Element,
                Key::Element,
            ],
            values(&["admin"]),
        );
        check!(item.trimmed_keys() == [Key::field("role"), Key::Element, Key::field("user")]);

        let item = ParameterItem::new(vec![Key::Element], values(&["1"]));
        check!(item.trimmed_keys().is_empty());
    }

    #[test]
    fn find_default_ignores_keyed_items() {
        let mut items = ParameterItems::new();
        items.add(vec![Key::field("role")], values(&["admin"]));
        check!(items.find_default().is_none());

        items.add(vec![Key::Element], values(&["1", "2"]));
        let item = items.find_default().expect("default item");
        check!(item.values() == ["1", "2"]);
    }

    #[test]
    fn field_path_renders_dotted() {
        let root = FieldPath::root("body");
        let tags = root.field("tags");
        let first = tags.index(0);
        let name = first.field("name");
        check!(name.to_string() == "body.tags.0.name");
        check!(root.to_string() == "body");
    }
}
