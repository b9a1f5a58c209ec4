//! Arena handle for nodes of an [`ObjectTree`](super::ObjectTree).
//!
//! An `ObjectId` is a direct index into the tree's node storage, giving O(1)
//! lookup. It is unrelated to the dotted string identifier each node carries
//! (`"root.pages.3"`); that one is the persistent, human-meaningful id.

use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObjectId(pub u32);

impl ObjectId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
