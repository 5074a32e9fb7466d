//! Static-or-dynamic schema values
//!
//! Most schema fields may either be fixed when the schema is built or be
//! computed from the write being evaluated. Dynamic values are resolved at
//! the point of use, once per validation pass, against the new document and
//! the effective old document.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Function computing a schema value from `(doc, old_doc)`
pub type DynamicFn<T> = Arc<dyn Fn(&Value, Option<&Value>) -> T + Send + Sync>;

/// A schema value that is either fixed or derived from the write
pub enum Constraint<T> {
    /// Value fixed at schema construction
    Static(T),
    /// Value computed per write
    Dynamic(DynamicFn<T>),
}

impl<T> Constraint<T> {
    /// Wrap a closure as a dynamic constraint
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&Value, Option<&Value>) -> T + Send + Sync + 'static,
    {
        Constraint::Dynamic(Arc::new(f))
    }

    /// Returns true if the value is computed per write
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Constraint::Dynamic(_))
    }
}

impl<T: Clone> Constraint<T> {
    /// Resolve against the write being evaluated.
    ///
    /// Static values are borrowed; dynamic values are computed and owned.
    pub fn resolve<'a>(&'a self, doc: &Value, old_doc: Option<&Value>) -> Cow<'a, T> {
        match self {
            Constraint::Static(value) => Cow::Borrowed(value),
            Constraint::Dynamic(f) => Cow::Owned(f(doc, old_doc)),
        }
    }
}

impl Constraint<bool> {
    /// Resolve a flag, treating it as a plain bool
    pub fn is_set(&self, doc: &Value, old_doc: Option<&Value>) -> bool {
        *self.resolve(doc, old_doc)
    }
}

impl<T> From<T> for Constraint<T> {
    fn from(value: T) -> Self {
        Constraint::Static(value)
    }
}

impl<T: Clone> Clone for Constraint<T> {
    fn clone(&self) -> Self {
        match self {
            Constraint::Static(value) => Constraint::Static(value.clone()),
            Constraint::Dynamic(f) => Constraint::Dynamic(Arc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Constraint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Constraint::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl<T: Default> Default for Constraint<T> {
    fn default() -> Self {
        Constraint::Static(T::default())
    }
}
