//! CPU-side mesh representation used by loaders.

use corelib::{Aabb, Vec3};

/// Vertex with position/normal/uv. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle mesh with tightly-packed vertices.
///
/// Invariants: `indices.len()` is a multiple of three and every index is
/// in range of `vertices`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both buffers are non-empty and the invariants hold.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.indices.is_empty()
            && self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounding box of all vertex positions.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from_array(v.position)))
    }

    /// Recompute per-vertex normals from face geometry.
    ///
    /// Face cross products are accumulated unnormalized, so larger faces
    /// weigh more. Vertices referenced by no face (or only degenerate
    /// faces) fall back to +Z.
    pub fn generate_smooth_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let pa = Vec3::from_array(self.vertices[a].position);
            let pb = Vec3::from_array(self.vertices[b].position);
            let pc = Vec3::from_array(self.vertices[c].position);
            let n = (pb - pa).cross(pc - pa);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        for (vertex, n) in self.vertices.iter_mut().zip(acc) {
            let n = n.normalize_or_zero();
            vertex.normal = if n == Vec3::ZERO {
                [0.0, 0.0, 1.0]
            } else {
                n.to_array()
            };
        }
    }

    /// Center the mesh at its vertex centroid and scale uniformly so the
    /// farthest vertex lies on the unit sphere.
    ///
    /// Empty meshes are untouched; a degenerate all-in-one-point mesh is
    /// only centered.
    pub fn normalize_positions(&mut self) {
        if self.vertices.is_empty() {
            return;
        }

        let mut centroid = Vec3::ZERO;
        for v in &self.vertices {
            centroid += Vec3::from_array(v.position);
        }
        centroid /= self.vertices.len() as f32;

        let mut max_dist = 0.0f32;
        for v in &self.vertices {
            max_dist = max_dist.max((Vec3::from_array(v.position) - centroid).length());
        }

        let scale = if max_dist > 0.0 { 1.0 / max_dist } else { 1.0 };
        for v in &mut self.vertices {
            let p = (Vec3::from_array(v.position) - centroid) * scale;
            v.position = p.to_array();
        }

        log::debug!(
            "normalized {} vertices (centroid {:?}, scale {})",
            self.vertices.len(),
            centroid.to_array(),
            scale
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::vec3;

    fn triangle() -> MeshData {
        MeshData::new(
            vec![
                MeshVertex::new([0.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
                MeshVertex::new([2.0, 0.0, 0.0], [0.0; 3], [0.0; 2]),
                MeshVertex::new([0.0, 2.0, 0.0], [0.0; 3], [0.0; 2]),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![MeshVertex::default()], vec![0]);
        assert!(!data.is_valid()); // one index is not a triangle

        assert!(triangle().is_valid());
        assert_eq!(triangle().triangle_count(), 1);

        let out_of_range = MeshData::new(vec![MeshVertex::default()], vec![0, 0, 7]);
        assert!(!out_of_range.is_valid());
    }

    #[test]
    fn aabb_spans_positions() {
        let aabb = triangle().aabb();
        assert_eq!(aabb.min, vec3(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, vec3(2.0, 2.0, 0.0));
    }

    #[test]
    fn generated_normals_face_out_of_the_winding() {
        let mut mesh = triangle();
        mesh.generate_smooth_normals();
        // Counter-clockwise in the XY plane, so +Z.
        for v in &mesh.vertices {
            assert!((v.normal[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn unreferenced_vertex_gets_fallback_normal() {
        let mut mesh = triangle();
        mesh.vertices
            .push(MeshVertex::new([9.0, 9.0, 9.0], [0.0; 3], [0.0; 2]));
        mesh.generate_smooth_normals();
        assert_eq!(mesh.vertices[3].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn normalize_centers_and_scales_into_unit_sphere() {
        let mut mesh = triangle();
        mesh.normalize_positions();

        let mut centroid = Vec3::ZERO;
        let mut max_dist = 0.0f32;
        for v in &mesh.vertices {
            centroid += Vec3::from_array(v.position);
            max_dist = max_dist.max(Vec3::from_array(v.position).length());
        }
        centroid /= mesh.vertices.len() as f32;

        assert!(centroid.length() < 1e-6);
        assert!((max_dist - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_degenerate_mesh_does_not_blow_up() {
        let mut mesh = MeshData::new(
            vec![MeshVertex::new([3.0, 3.0, 3.0], [0.0; 3], [0.0; 2]); 3],
            vec![0, 1, 2],
        );
        mesh.normalize_positions();
        for v in &mesh.vertices {
            assert_eq!(v.position, [0.0, 0.0, 0.0]);
        }
    }
}
