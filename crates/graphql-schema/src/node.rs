use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

/// A reference-counted handle to a definition in the schema graph.
///
/// Named types, field definitions and directives are shared between the
/// schema that declares them and everything that mentions them; cloning a
/// `Node` bumps a reference count, never copies a subtree. Equality and
/// hashing see through the handle to the definition itself, with pointer
/// identity as a shortcut, so the common case of comparing a definition
/// against the very node the schema handed out is free.
pub struct Node<T>(triomphe::Arc<T>);

impl<T> Node<T> {
    pub fn new(value: T) -> Self {
        Self(triomphe::Arc::new(value))
    }

    /// Whether two handles share one allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        triomphe::Arc::ptr_eq(&self.0, &other.0)
    }

    /// Copy-on-write access: a shared pointee is cloned first, an unshared
    /// one is handed out directly.
    pub fn make_mut(&mut self) -> &mut T
    where
        T: Clone,
    {
        triomphe::Arc::make_mut(&mut self.0)
    }

    /// Mutable access without cloning; `None` while the handle is shared.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        triomphe::Arc::get_mut(&mut self.0)
    }
}

impl<T> std::ops::Deref for Node<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> AsRef<T> for Node<T> {
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> From<T> for Node<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: PartialEq> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl<T: Eq> Eq for Node<T> {}

impl<T: Hash> Hash for Node<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (*self.0).hash(state)
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: Default> Default for Node<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
