//! Face Records
//!
//! A face is a triangle over the mesh's point array: three point indices,
//! three per-vertex normals and a smoothing group. Faces are plain values;
//! adjacency between faces is decided purely by shared point indices, never
//! by winding order (consistent winding is the loader's responsibility).

use glam::Vec3;

/// A triangle referencing three entries of a mesh's point range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Point indices into the owning model's shared point array
    points: [u32; 3],
    /// Per-vertex normals
    pub normals: [Vec3; 3],
    /// Smoothing group identifier
    pub smoothing_group: u32,
}

impl Face {
    /// Create a face from three point indices with zeroed normals
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self {
            points: [a, b, c],
            normals: [Vec3::ZERO; 3],
            smoothing_group: 0,
        }
    }

    /// The three point indices in loader order
    pub fn point_indices(&self) -> [u32; 3] {
        self.points
    }

    /// Point index of one corner (0..3)
    pub fn point_index(&self, corner: usize) -> u32 {
        self.points[corner]
    }

    /// Whether the face references the given point index
    pub fn contains_point(&self, point: u32) -> bool {
        self.points.contains(&point)
    }

    /// Assign the same normal to all three corners
    pub fn set_shared_normal(&mut self, normal: Vec3) {
        self.normals = [normal; 3];
    }

    /// Shift all three point indices by a fixed offset.
    ///
    /// Used when a mesh's points are relocated into the model-wide shared
    /// point array; the owning mesh must rebuild its index cache afterwards.
    pub fn offset_points(&mut self, offset: u32) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Number of distinct point indices this face shares with another.
    ///
    /// Counted over distinct values so the relation stays symmetric even for
    /// degenerate faces that repeat a corner.
    pub fn shared_point_count(&self, other: &Face) -> usize {
        let mut shared = 0;
        for (i, &p) in self.points.iter().enumerate() {
            // Skip duplicates within this face
            if self.points[..i].contains(&p) {
                continue;
            }
            if other.points.contains(&p) {
                shared += 1;
            }
        }
        shared
    }

    /// Whether two faces share an edge (at least two distinct point indices)
    pub fn is_adjacent_to(&self, other: &Face) -> bool {
        self.shared_point_count(other) >= 2
    }

    /// The corner values of `self` that do not appear in `other`
    pub fn points_not_in(&self, other: &Face) -> impl Iterator<Item = u32> {
        let theirs = other.points;
        self.points.into_iter().filter(move |p| !theirs.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_shared_edge() {
        let a = Face::new(0, 1, 2);
        let b = Face::new(1, 2, 3);
        assert!(a.is_adjacent_to(&b));
        assert!(b.is_adjacent_to(&a));
        assert_eq!(a.shared_point_count(&b), 2);
    }

    #[test]
    fn test_adjacency_single_point() {
        let a = Face::new(0, 1, 2);
        let b = Face::new(2, 3, 4);
        assert!(!a.is_adjacent_to(&b));
        assert_eq!(a.shared_point_count(&b), 1);
    }

    #[test]
    fn test_adjacency_symmetry_with_degenerate_face() {
        // (0, 0, 1) repeats a corner; distinct counting keeps the relation
        // symmetric with (0, 2, 3).
        let degenerate = Face::new(0, 0, 1);
        let other = Face::new(0, 2, 3);
        assert_eq!(
            degenerate.shared_point_count(&other),
            other.shared_point_count(&degenerate)
        );
        assert!(!degenerate.is_adjacent_to(&other));
    }

    #[test]
    fn test_offset_points() {
        let mut face = Face::new(0, 1, 2);
        face.offset_points(10);
        assert_eq!(face.point_indices(), [10, 11, 12]);
    }

    #[test]
    fn test_points_not_in() {
        let a = Face::new(0, 1, 2);
        let b = Face::new(1, 2, 3);
        let fresh: Vec<u32> = a.points_not_in(&b).collect();
        assert_eq!(fresh, vec![0]);
    }
}
