//! Strip-Connectivity Topology
//!
//! Turns an unordered face array into a drawable chain of nodes:
//! - **Adjacency database**: all-pairs comparison, two faces are adjacent
//!   when they share an edge (two distinct point indices).
//! - **Backtracking search**: an explicit stack-based search for an ordering
//!   of all faces in which consecutive faces are adjacent, yielding a
//!   triangle-strip chain.
//! - **List fallback**: when no full strip ordering exists, every face
//!   becomes its own node in insertion order and the chain renders as a
//!   plain triangle list.
//!
//! Connection never fails; a malformed face set is caught earlier, when the
//! owning mesh validates point ranges.

use smallvec::SmallVec;

use crate::face::Face;

/// Strip search is only attempted for face sets of at least this size;
/// smaller sets chain trivially as a triangle list.
pub const MIN_STRIP_FACES: usize = 3;

/// How a connected chain is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveKind {
    /// Three indices per node
    #[default]
    TriangleList,
    /// Consecutive nodes share an edge; one new index per interior node
    TriangleStrip,
}

/// The vertex indices a node contributes to the index cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelevantPoint {
    /// List-topology node: contributes its face's full index triple
    #[default]
    None,
    /// Interior strip node: the single vertex extending the strip
    Single(u32),
    /// First node of a strip chain: the ordered triple opening the strip
    Lead([u32; 3]),
}

/// Adjacency/topology record wrapping one face.
///
/// Nodes are created 1:1 with faces and live in the same arena order; only
/// their links and relevant points change when a chain is (re)connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Node {
    /// Index of the wrapped face in the owning face array
    face: usize,
    /// Next node in the chain
    next: Option<usize>,
    /// Previous node in the chain
    previous: Option<usize>,
    /// Contribution of this node to the index cache
    relevant: RelevantPoint,
}

impl Node {
    fn new(face: usize) -> Self {
        Self {
            face,
            next: None,
            previous: None,
            relevant: RelevantPoint::None,
        }
    }

    /// Index of the wrapped face
    pub fn face(&self) -> usize {
        self.face
    }

    /// Next node index in the chain
    pub fn next(&self) -> Option<usize> {
        self.next
    }

    /// Previous node index in the chain
    pub fn previous(&self) -> Option<usize> {
        self.previous
    }

    /// This node's index-cache contribution
    pub fn relevant_point(&self) -> RelevantPoint {
        self.relevant
    }
}

/// Per-face adjacency lists, indexed by face position
pub type AdjacencyList = Vec<SmallVec<[usize; 8]>>;

/// Build the adjacency database for a face array.
///
/// O(n²) all-pairs comparison; the result is symmetric: `b` appears in
/// `adjacency[a]` exactly when `a` appears in `adjacency[b]`.
pub fn build_adjacency(faces: &[Face]) -> AdjacencyList {
    let mut adjacency: AdjacencyList = vec![SmallVec::new(); faces.len()];
    for a in 0..faces.len() {
        for b in (a + 1)..faces.len() {
            if faces[a].is_adjacent_to(&faces[b]) {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }
    }
    adjacency
}

/// A connected chain of nodes over one face array
#[derive(Debug, Clone, Default)]
pub struct Topology {
    /// Node arena, index-aligned with the face array
    nodes: Vec<Node>,
    /// First node of the chain
    head: Option<usize>,
    /// How the chain is drawn
    kind: PrimitiveKind,
}

impl Topology {
    /// Connect a face array into a chain.
    ///
    /// Attempts a full triangle-strip ordering first; on failure (or for
    /// fewer than [`MIN_STRIP_FACES`] faces) falls back to a triangle-list
    /// chain in insertion order. Never fails.
    pub fn connect(faces: &[Face]) -> Self {
        if faces.is_empty() {
            return Self::default();
        }
        if faces.len() >= MIN_STRIP_FACES {
            let adjacency = build_adjacency(faces);
            if let Some(order) = find_strip_order(faces.len(), &adjacency) {
                return Self::strip(faces, &order);
            }
            log::debug!(
                "no strip ordering for {} faces, using triangle list",
                faces.len()
            );
        }
        Self::list(faces.len())
    }

    /// Build a triangle-list chain in insertion order
    fn list(face_count: usize) -> Self {
        let mut nodes: Vec<Node> = (0..face_count).map(Node::new).collect();
        for i in 0..face_count {
            nodes[i].previous = i.checked_sub(1);
            nodes[i].next = (i + 1 < face_count).then_some(i + 1);
        }
        Self {
            nodes,
            head: (face_count > 0).then_some(0),
            kind: PrimitiveKind::TriangleList,
        }
    }

    /// Build a strip chain from a face ordering in which consecutive faces
    /// are adjacent
    fn strip(faces: &[Face], order: &[usize]) -> Self {
        let mut nodes: Vec<Node> = (0..faces.len()).map(Node::new).collect();
        for (pos, &face) in order.iter().enumerate() {
            nodes[face].previous = pos.checked_sub(1).map(|p| order[p]);
            nodes[face].next = order.get(pos + 1).copied();
            nodes[face].relevant = if pos == 0 {
                RelevantPoint::Lead(lead_triple(&faces[face], &faces[order[1]]))
            } else {
                RelevantPoint::Single(extension_point(
                    &faces[face],
                    &faces[order[pos - 1]],
                ))
            };
        }
        Self {
            nodes,
            head: Some(order[0]),
            kind: PrimitiveKind::TriangleStrip,
        }
    }

    /// How the chain is drawn
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// First node of the chain
    pub fn head(&self) -> Option<usize> {
        self.head
    }

    /// Node arena, index-aligned with the face array
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// One node by arena index
    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    /// Number of nodes (equals the face count)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Shift every stored relevant point by a fixed offset.
    ///
    /// Mirrors a relocation of the underlying faces' point indices so the
    /// chain and its faces keep naming the same vertices.
    pub fn offset_relevant_points(&mut self, offset: u32) {
        for node in &mut self.nodes {
            node.relevant = match node.relevant {
                RelevantPoint::None => RelevantPoint::None,
                RelevantPoint::Single(p) => RelevantPoint::Single(p + offset),
                RelevantPoint::Lead([a, b, c]) => {
                    RelevantPoint::Lead([a + offset, b + offset, c + offset])
                }
            };
        }
    }

    /// Iterate nodes in chain order, following `next` links
    pub fn chain(&self) -> ChainIter<'_> {
        ChainIter {
            nodes: &self.nodes,
            cursor: self.head,
        }
    }
}

/// Iterator over a chain's nodes in link order
pub struct ChainIter<'a> {
    nodes: &'a [Node],
    cursor: Option<usize>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let node = &self.nodes[index];
        self.cursor = node.next();
        Some(node)
    }
}

/// Search for an ordering of all faces in which consecutive faces are
/// adjacent.
///
/// Explicit stack-based backtracking: each stack level holds a cursor into
/// its candidate list (every face at the root, the predecessor's adjacency
/// list below). Depth is bounded only by the face count.
fn find_strip_order(face_count: usize, adjacency: &AdjacencyList) -> Option<Vec<usize>> {
    let mut order: Vec<usize> = Vec::with_capacity(face_count);
    let mut used = vec![false; face_count];
    let mut cursors: Vec<usize> = vec![0];

    loop {
        if order.len() == face_count {
            return Some(order);
        }
        let depth = order.len();
        let Some(cursor) = cursors.last_mut() else {
            return None;
        };

        let candidate = if depth == 0 {
            next_unused(&used, cursor, face_count)
        } else {
            next_unused_in(&adjacency[order[depth - 1]], &used, cursor)
        };

        match candidate {
            Some(face) => {
                used[face] = true;
                order.push(face);
                cursors.push(0);
            }
            None => {
                cursors.pop();
                match order.pop() {
                    Some(face) => used[face] = false,
                    // All start faces exhausted
                    None => return None,
                }
            }
        }
    }
}

fn next_unused(used: &[bool], cursor: &mut usize, face_count: usize) -> Option<usize> {
    while *cursor < face_count {
        let face = *cursor;
        *cursor += 1;
        if !used[face] {
            return Some(face);
        }
    }
    None
}

fn next_unused_in(candidates: &[usize], used: &[bool], cursor: &mut usize) -> Option<usize> {
    while *cursor < candidates.len() {
        let face = candidates[*cursor];
        *cursor += 1;
        if !used[face] {
            return Some(face);
        }
    }
    None
}

/// The vertex of `face` that extends the strip past its predecessor.
///
/// Adjacent faces share exactly two points, leaving one fresh vertex; a face
/// sharing all three points (a duplicate) contributes its first corner.
fn extension_point(face: &Face, previous: &Face) -> u32 {
    face.points_not_in(previous)
        .next()
        .unwrap_or_else(|| face.point_index(0))
}

/// The ordered triple opening a strip: the head face's corners rotated so
/// the edge shared with the second face comes last
fn lead_triple(first: &Face, second: &Face) -> [u32; 3] {
    let corners = first.point_indices();
    let fresh = corners
        .iter()
        .position(|p| !second.contains_point(*p))
        .unwrap_or(0);
    [
        corners[fresh],
        corners[(fresh + 1) % 3],
        corners[(fresh + 2) % 3],
    ]
}
