//! Hierarchical spatial index for actor boxes.
//!
//! A [`QuadTree`] stores each key in the deepest node whose region fully
//! contains the key's box, down to a fixed maximum depth. A reverse map from
//! key to owning node (the "book") makes removal and relocation O(1) without
//! descending the tree again.
//!
//! Nodes live in an arena (`Vec<Node>`) and are created lazily the first time
//! something is inserted into a quadrant. Node 0 is always the root. Nothing is
//! pruned on removal; the whole tree is dropped by [`QuadTree::clear`] or
//! [`QuadTree::set_region`] when the room changes.
//!
//! The ECS-facing resource is [`SpatialIndex`], a quadtree keyed by
//! [`Entity`].

use std::hash::Hash;
use std::ops::{Deref, DerefMut};

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::geometry::Rect;

/// Depth limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 8;

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
struct Node<K> {
    region: Rect,
    child_regions: [Rect; 4],
    children: [Option<NodeId>; 4],
    depth: usize,
    actors: SmallVec<[(K, Rect); 4]>,
}

impl<K> Node<K> {
    fn new(region: Rect, depth: usize) -> Self {
        Self {
            region,
            child_regions: region.quadrants(),
            children: [None; 4],
            depth,
            actors: SmallVec::new(),
        }
    }
}

/// Region quadtree keyed by actor identity.
#[derive(Debug, Clone)]
pub struct QuadTree<K> {
    nodes: Vec<Node<K>>,
    book: FxHashMap<K, NodeId>,
    max_depth: usize,
}

impl<K: Copy + Eq + Hash> QuadTree<K> {
    pub fn new(region: Rect) -> Self {
        Self::with_max_depth(region, DEFAULT_MAX_DEPTH)
    }

    /// A `max_depth` of 1 keeps everything in the root.
    pub fn with_max_depth(region: Rect, max_depth: usize) -> Self {
        Self {
            nodes: vec![Node::new(region, 0)],
            book: FxHashMap::default(),
            max_depth: max_depth.max(1),
        }
    }

    /// Bounds of the root node.
    pub fn region(&self) -> Rect {
        self.nodes[ROOT].region
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.book.len()
    }

    pub fn is_empty(&self) -> bool {
        self.book.is_empty()
    }

    /// Number of allocated nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains_key(&self, key: K) -> bool {
        self.book.contains_key(&key)
    }

    /// Box recorded for `key` at its last insert/relocate.
    pub fn rect_of(&self, key: K) -> Option<Rect> {
        let node = &self.nodes[*self.book.get(&key)?];
        node.actors.iter().find(|(k, _)| *k == key).map(|(_, r)| *r)
    }

    /// Depth of the node currently holding `key`.
    pub fn depth_of(&self, key: K) -> Option<usize> {
        self.book.get(&key).map(|id| self.nodes[*id].depth)
    }

    /// Insert `key` with box `rect`.
    ///
    /// Descends while the box fits entirely inside one child quadrant and the
    /// next depth is still below the limit, creating children on the way. A key
    /// that is already present is removed first so it never lives in two nodes.
    pub fn insert(&mut self, key: K, rect: Rect) {
        if self.book.contains_key(&key) {
            self.remove(key);
        }

        let mut id = ROOT;
        loop {
            let node = &self.nodes[id];
            if node.depth + 1 >= self.max_depth {
                break;
            }
            let Some(quadrant) = node.child_regions.iter().position(|r| r.contains(&rect)) else {
                break;
            };
            id = self.child_or_create(id, quadrant);
        }

        self.nodes[id].actors.push((key, rect));
        self.book.insert(key, id);
    }

    fn child_or_create(&mut self, parent: NodeId, quadrant: usize) -> NodeId {
        if let Some(child) = self.nodes[parent].children[quadrant] {
            return child;
        }
        let region = self.nodes[parent].child_regions[quadrant];
        let depth = self.nodes[parent].depth + 1;
        let child = self.nodes.len();
        self.nodes.push(Node::new(region, depth));
        self.nodes[parent].children[quadrant] = Some(child);
        child
    }

    /// Remove `key` using the reverse map. Returns `false` when the key was
    /// never inserted (or already removed).
    pub fn remove(&mut self, key: K) -> bool {
        let Some(id) = self.book.remove(&key) else {
            return false;
        };
        let actors = &mut self.nodes[id].actors;
        if let Some(pos) = actors.iter().position(|(k, _)| *k == key) {
            actors.remove(pos);
        }
        true
    }

    /// Move `key` to the node matching its new box. Returns `false` (and
    /// inserts nothing) when the key is unknown.
    pub fn relocate(&mut self, key: K, rect: Rect) -> bool {
        if !self.remove(key) {
            return false;
        }
        self.insert(key, rect);
        true
    }

    /// Keys whose box overlaps `area`, in deterministic tree order.
    pub fn search(&self, area: &Rect) -> Vec<K> {
        let mut found = Vec::new();
        self.search_node(ROOT, area, &mut found);
        found
    }

    fn search_node(&self, id: NodeId, area: &Rect, found: &mut Vec<K>) {
        let node = &self.nodes[id];
        found.extend(
            node.actors
                .iter()
                .filter(|(_, rect)| area.overlaps(rect))
                .map(|(key, _)| *key),
        );

        for (quadrant, child) in node.children.iter().enumerate() {
            let Some(child) = *child else {
                continue;
            };
            let region = &node.child_regions[quadrant];
            if area.contains(region) {
                // Everything below lies inside the query, no more box tests.
                self.collect_subtree(child, found);
            } else if region.overlaps(area) {
                self.search_node(child, area, found);
            }
        }
    }

    fn collect_subtree(&self, id: NodeId, found: &mut Vec<K>) {
        let node = &self.nodes[id];
        found.extend(node.actors.iter().map(|(key, _)| *key));
        for child in node.children.iter().flatten() {
            self.collect_subtree(*child, found);
        }
    }

    /// Every stored key, in tree order.
    pub fn keys(&self) -> Vec<K> {
        let mut all = Vec::with_capacity(self.len());
        self.collect_subtree(ROOT, &mut all);
        all
    }

    /// Drop every node but the root and forget every key.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[ROOT];
        root.actors.clear();
        root.children = [None; 4];
        self.book.clear();
    }

    /// Clear, then rebind the root to `region`.
    pub fn set_region(&mut self, region: Rect) {
        self.clear();
        self.nodes[ROOT] = Node::new(region, 0);
    }

    /// True when every key in the book is held by exactly the node the book
    /// names, and no node holds a key the book does not know.
    pub fn is_consistent(&self) -> bool {
        let stored: usize = self.nodes.iter().map(|n| n.actors.len()).sum();
        if stored != self.book.len() {
            return false;
        }
        self.book.iter().all(|(key, id)| {
            self.nodes[*id]
                .actors
                .iter()
                .filter(|(k, _)| k == key)
                .count()
                == 1
        })
    }
}

/// ECS resource: the quadtree of the active room, keyed by actor entity.
#[derive(Resource, Debug, Clone)]
pub struct SpatialIndex(QuadTree<Entity>);

impl SpatialIndex {
    pub fn new(region: Rect, max_depth: usize) -> Self {
        Self(QuadTree::with_max_depth(region, max_depth))
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self(QuadTree::new(Rect::default()))
    }
}

impl Deref for SpatialIndex {
    type Target = QuadTree<Entity>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for SpatialIndex {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
