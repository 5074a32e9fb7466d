//! Item stack: the position of the value under validation
//!
//! Frames are linked to their parent by reference and never mutated, so each
//! recursive call receives its own immutable view of the path from the
//! document root down to the current item.

use std::fmt::Write;

use serde_json::Value;

/// How an item is addressed within its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemName<'a> {
    /// The document itself
    Root,
    /// Named property of an object
    Property(&'a str),
    /// Array element
    Index(usize),
    /// Hashtable entry
    Key(&'a str),
}

/// One frame of the item stack
#[derive(Debug, Clone, Copy)]
pub struct ItemFrame<'a> {
    name: ItemName<'a>,
    value: Option<&'a Value>,
    old_value: Option<&'a Value>,
    parent: Option<&'a ItemFrame<'a>>,
}

impl<'a> ItemFrame<'a> {
    /// Frame for the document root
    pub fn root(doc: &'a Value, old_doc: Option<&'a Value>) -> Self {
        Self {
            name: ItemName::Root,
            value: Some(doc),
            old_value: old_doc,
            parent: None,
        }
    }

    /// Push a child frame beneath this one
    pub fn child(
        &'a self,
        name: ItemName<'a>,
        value: Option<&'a Value>,
        old_value: Option<&'a Value>,
    ) -> ItemFrame<'a> {
        ItemFrame {
            name,
            value,
            old_value,
            parent: Some(self),
        }
    }

    pub fn name(&self) -> ItemName<'a> {
        self.name
    }

    /// Current value; `None` when the item is absent
    pub fn value(&self) -> Option<&'a Value> {
        self.value
    }

    /// Value at the same position in the old document
    pub fn old_value(&self) -> Option<&'a Value> {
        self.old_value
    }

    pub fn parent(&self) -> Option<&'a ItemFrame<'a>> {
        self.parent
    }

    /// Number of frames above this one
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Frames from the parent up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = &'a ItemFrame<'a>> {
        std::iter::successors(self.parent, |frame| frame.parent)
    }

    /// Whether the containing item existed in the old document.
    ///
    /// Immutability is only meaningful when it did.
    pub fn parent_existed_in_old(&self) -> bool {
        self.parent
            .map_or(false, |parent| is_present(parent.old_value))
    }

    /// Human-readable path: dotted for properties, bracketed for elements
    pub fn path(&self) -> String {
        let mut names: Vec<ItemName<'_>> = self.ancestors().map(|f| f.name).collect();
        names.reverse();
        names.push(self.name);
        build_item_path(&names)
    }
}

/// Join item names into a path string
pub fn build_item_path(names: &[ItemName<'_>]) -> String {
    let mut path = String::new();
    for name in names {
        match name {
            ItemName::Root => {}
            ItemName::Property(property) => {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(property);
            }
            ItemName::Index(index) => {
                let _ = write!(path, "[{}]", index);
            }
            ItemName::Key(key) => {
                path.push('[');
                path.push_str(key);
                path.push(']');
            }
        }
    }
    path
}

/// Path of a property that has no frame of its own (unsupported keys)
pub fn property_path(object_path: &str, property: &str) -> String {
    if object_path.is_empty() {
        property.to_string()
    } else {
        format!("{}.{}", object_path, property)
    }
}

/// Neither absent nor null
pub fn is_present(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}
