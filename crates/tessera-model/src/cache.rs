//! Point/Index Cache Builder
//!
//! Flattens a connected node chain into one ordered array of point indices
//! suitable for indexed drawing. The cache is always rebuilt wholesale: after
//! a chain is reconnected, and after a mesh's points are relocated into the
//! model-wide shared array.

use crate::face::Face;
use crate::topology::{PrimitiveKind, RelevantPoint, Topology};

/// Build the index cache for a connected chain.
///
/// - Triangle strip: the first three indices are the head node's decoded
///   lead triple; each node from the fourth onward appends exactly one new
///   index, so a strip of `n >= 3` nodes caches `3 + (n - 3) == n` indices.
/// - Triangle list: every node contributes its face's full index triple,
///   `3 * n` indices in total.
pub fn build_index_cache(topology: &Topology, faces: &[Face]) -> Vec<u32> {
    match topology.kind() {
        PrimitiveKind::TriangleStrip => build_strip_cache(topology),
        PrimitiveKind::TriangleList => build_list_cache(topology, faces),
    }
}

fn build_strip_cache(topology: &Topology) -> Vec<u32> {
    let mut cache = Vec::with_capacity(topology.node_count());
    for (position, node) in topology.chain().enumerate() {
        match (position, node.relevant_point()) {
            (0, RelevantPoint::Lead(triple)) => cache.extend_from_slice(&triple),
            // The second and third nodes are already covered by the lead
            // triple.
            (1, _) | (2, _) => {}
            (_, RelevantPoint::Single(point)) => cache.push(point),
            (position, relevant) => {
                log::error!(
                    "strip node at position {position} carries {relevant:?}; \
                     dropping it from the cache"
                );
            }
        }
    }
    cache
}

fn build_list_cache(topology: &Topology, faces: &[Face]) -> Vec<u32> {
    let mut cache = Vec::with_capacity(topology.node_count() * 3);
    for node in topology.chain() {
        cache.extend_from_slice(&faces[node.face()].point_indices());
    }
    cache
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Vec<Face> {
        vec![
            Face::new(0, 1, 2),
            Face::new(0, 1, 3),
            Face::new(0, 2, 3),
            Face::new(1, 2, 3),
        ]
    }

    #[test]
    fn test_strip_cache_size_equals_node_count() {
        for face_count in 3..8 {
            let faces: Vec<Face> = (0..face_count as u32)
                .map(|i| Face::new(i, i + 1, i + 2))
                .collect();
            let topology = Topology::connect(&faces);
            assert_eq!(topology.kind(), PrimitiveKind::TriangleStrip);
            let cache = build_index_cache(&topology, &faces);
            assert_eq!(cache.len(), face_count);
        }
    }

    #[test]
    fn test_tetrahedron_caches_four_indices() {
        let faces = tetrahedron();
        let topology = Topology::connect(&faces);
        assert_eq!(topology.kind(), PrimitiveKind::TriangleStrip);
        let cache = build_index_cache(&topology, &faces);
        assert_eq!(cache.len(), 4, "strip cache must be 4 indices, not 12");
    }

    #[test]
    fn test_list_cache_size_is_three_per_node() {
        let faces = vec![Face::new(0, 1, 2), Face::new(3, 4, 5)];
        let topology = Topology::connect(&faces);
        assert_eq!(topology.kind(), PrimitiveKind::TriangleList);
        let cache = build_index_cache(&topology, &faces);
        assert_eq!(cache.len(), 6);
    }

    #[test]
    fn test_list_cache_preserves_index_multiset() {
        let faces = vec![
            Face::new(0, 1, 2),
            Face::new(5, 4, 3),
            Face::new(2, 2, 9),
        ];
        let topology = Topology::connect(&faces);
        let mut expected: Vec<u32> = faces
            .iter()
            .flat_map(|f| f.point_indices())
            .collect();
        let mut cache = build_index_cache(&topology, &faces);
        expected.sort_unstable();
        cache.sort_unstable();
        assert_eq!(cache, expected);
    }

    #[test]
    fn test_strip_cache_indices_come_from_faces() {
        let faces = tetrahedron();
        let topology = Topology::connect(&faces);
        let cache = build_index_cache(&topology, &faces);
        for index in cache {
            assert!(faces.iter().any(|f| f.contains_point(index)));
        }
    }

    #[test]
    fn test_strip_cache_opens_with_lead_triple() {
        let faces: Vec<Face> = (0..5u32).map(|i| Face::new(i, i + 1, i + 2)).collect();
        let topology = Topology::connect(&faces);
        let cache = build_index_cache(&topology, &faces);
        let head = topology.node(topology.head().unwrap());
        match head.relevant_point() {
            crate::topology::RelevantPoint::Lead(triple) => {
                assert_eq!(&cache[..3], &triple);
            }
            other => panic!("head node carries {other:?}"),
        }
    }

    #[test]
    fn test_empty_topology_builds_empty_cache() {
        let topology = Topology::connect(&[]);
        assert!(build_index_cache(&topology, &[]).is_empty());
    }
}
