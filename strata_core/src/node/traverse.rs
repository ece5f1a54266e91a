// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, NodeId, NodeKind};
use super::options::NodeOptions;
use super::store::NodeStore;
use crate::shape::Shape;

/// An iterator over the direct children of a node.
///
/// Created by [`NodeStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a NodeStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(NodeId {
            idx,
            generation: self.store.generation[idx as usize],
        })
    }
}

/// An iterator from a node up to the root.
///
/// Created by [`NodeStore::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    store: &'a NodeStore,
    current: u32,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(store: &'a NodeStore, start: u32) -> Self {
        Self {
            store,
            current: start,
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.store.handle(self.current)?;
        self.current = self.store.parent[self.current as usize];
        Some(node)
    }
}

/// A depth-first pre-order iterator over a subtree.
///
/// Created by [`NodeStore::descendants`]. Walks the sibling links, so it
/// needs no stack.
#[derive(Debug)]
pub struct Descendants<'a> {
    store: &'a NodeStore,
    root: u32,
    current: u32,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(store: &'a NodeStore, root: u32, include_self: bool) -> Self {
        let current = if include_self {
            root
        } else {
            store.first_child[root as usize]
        };
        Self {
            store,
            root,
            current,
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let idx = self.current;
        let node = self.store.handle(idx)?;

        let first = self.store.first_child[idx as usize];
        self.current = if first != INVALID {
            first
        } else {
            // Climb until a node with a next sibling, stopping at the root.
            let mut cur = idx;
            loop {
                if cur == self.root {
                    break INVALID;
                }
                let next = self.store.next_sibling[cur as usize];
                if next != INVALID {
                    break next;
                }
                cur = self.store.parent[cur as usize];
                if cur == INVALID {
                    break INVALID;
                }
            }
        };
        Some(node)
    }
}

/// A read view of one node.
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'a> {
    store: &'a NodeStore,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(store: &'a NodeStore, id: NodeId) -> Self {
        Self { store, id }
    }

    /// The node's handle.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// What kind of node this is.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.store.kind[self.id.idx as usize]
    }

    /// The node's options.
    #[must_use]
    pub fn options(&self) -> &'a NodeOptions {
        &self.store.options[self.id.idx as usize]
    }

    /// The shape payload, for shape nodes.
    #[must_use]
    pub fn shape(&self) -> Option<&'a Shape> {
        self.store.shape[self.id.idx as usize].as_ref()
    }

    /// The shape's z-index, or `0` for containers.
    #[must_use]
    pub fn z_index(&self) -> i32 {
        self.shape().map_or(0, |s| s.style.z_index)
    }

    /// The parent's handle.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.store.handle(self.store.parent[self.id.idx as usize])
    }
}
