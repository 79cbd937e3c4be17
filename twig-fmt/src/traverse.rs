//! Tree traversal.
//!
//! [`walk`] visits every node root-first with an explicit stack, so
//! arbitrarily deep input cannot exhaust the call stack. Extension nodes
//! are descended through their [`ChildSlots`](crate::types::ChildSlots).

use crate::types::Node;

/// Where a node sits in the tree.
#[derive(Debug, Clone, Copy)]
pub struct Ancestry<'a> {
    pub parent: Option<&'a Node>,
    /// Position among the parent's children.
    pub index: usize,
    /// Number of children the parent has.
    pub siblings: usize,
    /// 0 for the root.
    pub depth: usize,
}

impl<'a> Ancestry<'a> {
    pub fn root() -> Self {
        Self {
            parent: None,
            index: 0,
            siblings: 1,
            depth: 0,
        }
    }

    /// The ancestry of the `index`-th of `siblings` children of `parent`.
    pub fn child(&self, parent: &'a Node, index: usize, siblings: usize) -> Self {
        Self {
            parent: Some(parent),
            index,
            siblings,
            depth: self.depth + 1,
        }
    }
}

/// Visit `root` and all its descendants in document order.
///
/// The visitor may stop the walk by returning an error, which is passed
/// through.
pub fn walk<'a, E>(
    root: &'a Node,
    mut visit: impl FnMut(&'a Node, Ancestry<'a>) -> Result<(), E>,
) -> Result<(), E> {
    let mut stack = vec![(root, Ancestry::root())];
    while let Some((node, ancestry)) = stack.pop() {
        visit(node, ancestry)?;
        let children = node.children();
        let count = children.len();
        for (index, child) in children.into_iter().enumerate().rev() {
            stack.push((child, ancestry.child(node, index, count)));
        }
    }
    Ok(())
}

/// Deepest nesting level in the tree; the root is level 0.
pub fn max_depth(root: &Node) -> usize {
    let mut deepest = 0;
    let _ = walk::<()>(root, |_, ancestry| {
        deepest = deepest.max(ancestry.depth);
        Ok(())
    });
    deepest
}
