//! Packed R-tree over [`FlatBoundingBox`]es
//!
//! The tree is bulk loaded with Sort-Tile-Recursive packing and never changes
//! afterwards; adding entries means building a new index. Nodes live in one
//! contiguous `Vec` with the children of each node stored next to each other,
//! so a query is a plain stack walk without any pointer chasing.

use crate::geometry::{FlatBoundingBox, FlatPoint};
use smallvec::SmallVec;
use std::ops::Range;

/// Default maximum number of children per node
pub const DEFAULT_NODE_CAPACITY: usize = 8;

#[derive(Debug, Clone)]
struct Node {
    bbox: FlatBoundingBox,
    /// Children are `items[children]` for leaves and `nodes[children]` otherwise
    children: Range<usize>,
    leaf: bool,
}

/// Immutable spatial index mapping bounding boxes to payloads
///
/// Queries are lazy iterators borrowing the index, so the index cannot be
/// replaced or dropped while a query is still being consumed.
///
/// # Example
///
/// ```
/// use airspaces::SpatialIndex;
/// use airspaces::geometry::FlatBoundingBox;
///
/// let index = SpatialIndex::build(vec![
///     (FlatBoundingBox::new(0, 0, 10, 10), "a"),
///     (FlatBoundingBox::new(20, 20, 30, 30), "b"),
/// ]);
///
/// let hits: Vec<_> = index.query_range(FlatBoundingBox::new(5, 5, 15, 15)).collect();
/// assert_eq!(hits, [&"a"]);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialIndex<P> {
    items: Vec<(FlatBoundingBox, P)>,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl<P> SpatialIndex<P> {
    /// Empty index
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Bulk load an index with [`DEFAULT_NODE_CAPACITY`]
    pub fn build(entries: Vec<(FlatBoundingBox, P)>) -> Self {
        Self::with_node_capacity(entries, DEFAULT_NODE_CAPACITY)
    }

    /// Bulk load an index with at most `capacity` children per node
    ///
    /// Capacities below 2 are raised to 2.
    pub fn with_node_capacity(entries: Vec<(FlatBoundingBox, P)>, capacity: usize) -> Self {
        let capacity = capacity.max(2);
        let mut items = entries;

        let groups = str_pack(&mut items, capacity, |(bbox, _)| *bbox);
        let mut level: Vec<Node> = groups
            .into_iter()
            .map(|children| Node {
                bbox: union(items[children.clone()].iter().map(|(bbox, _)| *bbox)),
                children,
                leaf: true,
            })
            .collect();

        let mut nodes = Vec::new();
        while level.len() > 1 {
            let groups = str_pack(&mut level, capacity, |node| node.bbox);
            let offset = nodes.len();
            let parents = groups
                .into_iter()
                .map(|children| Node {
                    bbox: union(level[children.clone()].iter().map(|node| node.bbox)),
                    children: offset + children.start..offset + children.end,
                    leaf: false,
                })
                .collect();
            nodes.append(&mut level);
            level = parents;
        }

        let root = level.pop().map(|root| {
            nodes.push(root);
            nodes.len() - 1
        });

        Self { items, nodes, root }
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Box enclosing every entry, `None` when empty
    pub fn bounds(&self) -> Option<FlatBoundingBox> {
        self.root.map(|root| self.nodes[root].bbox)
    }

    /// Number of node levels from the root down to the leaves
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.root;
        while let Some(index) = current {
            depth += 1;
            let node = &self.nodes[index];
            current = (!node.leaf).then_some(node.children.start);
        }
        depth
    }

    /// Entries whose box overlaps `bbox`
    pub fn query_range(
        &self,
        bbox: FlatBoundingBox,
    ) -> Query<'_, P, impl Fn(&FlatBoundingBox) -> bool> {
        Query::new(self, move |candidate: &FlatBoundingBox| candidate.overlaps(&bbox))
    }

    /// Entries whose box contains `point`
    pub fn query_containing(
        &self,
        point: FlatPoint,
    ) -> Query<'_, P, impl Fn(&FlatBoundingBox) -> bool> {
        Query::new(self, move |candidate: &FlatBoundingBox| candidate.contains_point(point))
    }

    /// Entries whose box is touched by the segment `a → b`
    pub fn query_intersecting(
        &self,
        a: FlatPoint,
        b: FlatPoint,
    ) -> Query<'_, P, impl Fn(&FlatBoundingBox) -> bool> {
        Query::new(self, move |candidate: &FlatBoundingBox| {
            candidate.intersects_segment(a, b)
        })
    }

    /// Every entry, in index order
    pub fn query_all(&self) -> Query<'_, P, impl Fn(&FlatBoundingBox) -> bool> {
        Query::new(self, |_: &FlatBoundingBox| true)
    }
}

impl<P> Default for SpatialIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy iterator over the payloads of entries accepted by a box filter
///
/// Subtrees whose box is rejected by the filter are skipped entirely.
pub struct Query<'a, P, F> {
    index: &'a SpatialIndex<P>,
    filter: F,
    stack: SmallVec<[usize; 32]>,
    leaf: std::slice::Iter<'a, (FlatBoundingBox, P)>,
}

impl<'a, P, F> Query<'a, P, F>
where
    F: Fn(&FlatBoundingBox) -> bool,
{
    fn new(index: &'a SpatialIndex<P>, filter: F) -> Self {
        let mut stack = SmallVec::new();
        if let Some(root) = index.root {
            if filter(&index.nodes[root].bbox) {
                stack.push(root);
            }
        }

        Self {
            index,
            filter,
            stack,
            leaf: index.items[..0].iter(),
        }
    }
}

impl<'a, P, F> Iterator for Query<'a, P, F>
where
    F: Fn(&FlatBoundingBox) -> bool,
{
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            for (bbox, payload) in self.leaf.by_ref() {
                if (self.filter)(bbox) {
                    return Some(payload);
                }
            }

            let node = &self.index.nodes[self.stack.pop()?];
            if node.leaf {
                self.leaf = self.index.items[node.children.clone()].iter();
            } else {
                // Reversed so children are visited in storage order
                for child in node.children.clone().rev() {
                    if (self.filter)(&self.index.nodes[child].bbox) {
                        self.stack.push(child);
                    }
                }
            }
        }
    }
}

/// Sort `entries` into Sort-Tile-Recursive order and split them into groups
///
/// Entries are sorted by box center along x, cut into vertical slices of
/// `slices · capacity` entries, and each slice is sorted along y and chunked
/// into groups of at most `capacity`.
fn str_pack<T>(
    entries: &mut [T],
    capacity: usize,
    bbox: impl Fn(&T) -> FlatBoundingBox,
) -> Vec<Range<usize>> {
    if entries.is_empty() {
        return Vec::new();
    }

    let groups = entries.len().div_ceil(capacity);
    let slice_len = isqrt_ceil(groups) * capacity;

    entries.sort_by_key(|entry| bbox(entry).center().0);

    let mut ranges = Vec::with_capacity(groups);
    for (slice_index, slice) in entries.chunks_mut(slice_len).enumerate() {
        slice.sort_by_key(|entry| bbox(entry).center().1);

        let offset = slice_index * slice_len;
        for start in (0..slice.len()).step_by(capacity) {
            let end = (start + capacity).min(slice.len());
            ranges.push(offset + start..offset + end);
        }
    }
    ranges
}

fn union(mut boxes: impl Iterator<Item = FlatBoundingBox>) -> FlatBoundingBox {
    let Some(mut bbox) = boxes.next() else {
        return FlatBoundingBox::new(0, 0, 0, 0);
    };
    for other in boxes {
        bbox.merge(other);
    }
    bbox
}

/// Smallest `r` with `r * r >= n`
fn isqrt_ceil(n: usize) -> usize {
    let mut r = n.isqrt();
    if r * r < n {
        r += 1;
    }
    r
}
