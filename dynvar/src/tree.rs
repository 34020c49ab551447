//! The tree the codec reads from and writes to. Each node carries raw value
//! bytes and an ordered list of children.

pub trait TreeRead {
    fn value(&self) -> &[u8];
    fn child_count(&self) -> usize;
    fn child(&self, index: usize) -> Option<&Self>;
}

pub trait TreeWrite {
    fn set_value(&mut self, value: Vec<u8>);
    /// Resizes the child list; new children start out empty.
    fn set_child_count(&mut self, count: usize);
    fn child_mut(&mut self, index: usize) -> Option<&mut Self>;
}

/// An owned, in-memory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tree {
    value: Vec<u8>,
    children: Vec<Tree>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(value: impl Into<Vec<u8>>, children: Vec<Tree>) -> Self {
        Self {
            value: value.into(),
            children,
        }
    }

    pub fn children(&self) -> &[Tree] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Tree> {
        &mut self.children
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<Tree>) {
        (self.value, self.children)
    }
}

impl TreeRead for Tree {
    fn value(&self) -> &[u8] {
        &self.value
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }
}

impl TreeWrite for Tree {
    fn set_value(&mut self, value: Vec<u8>) {
        self.value = value;
    }

    fn set_child_count(&mut self, count: usize) {
        self.children.resize_with(count, Tree::default);
    }

    fn child_mut(&mut self, index: usize) -> Option<&mut Self> {
        self.children.get_mut(index)
    }
}
