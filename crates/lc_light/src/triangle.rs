//! Triangle primitive with area-uniform sampling.

use std::fmt;

use lc_math::Vector3;

use crate::{LightingError, LightingResult};

/// A triangle given by three vertices.
///
/// Nothing is cached; normal and area are computed on demand. The normal
/// follows the winding order, so callers must wind consistently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vector3,
    pub b: Vector3,
    pub c: Vector3,
}

impl Triangle {
    pub fn new(a: Vector3, b: Vector3, c: Vector3) -> Self {
        Self { a, b, c }
    }

    fn edge_cross(&self) -> Vector3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    /// Unit normal, `normalize((b - a) x (c - a))`. NaN for degenerate triangles.
    pub fn normal(&self) -> Vector3 {
        self.edge_cross().normalized()
    }

    pub fn area(&self) -> f32 {
        0.5 * self.edge_cross().len()
    }

    pub fn centroid(&self) -> Vector3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Map two uniform numbers in `[0, 1]` to a point distributed uniformly
    /// by area over the triangle.
    ///
    /// Uses the square-root barycentric warp; plain `(r1, r2)` barycentrics
    /// would cluster samples towards `a`.
    pub fn uniform_sample(&self, r1: f32, r2: f32) -> Vector3 {
        let sr1 = r1.sqrt();
        self.a * (1.0 - sr1) + self.b * (sr1 * (1.0 - r2)) + self.c * (r2 * sr1)
    }

    /// Area-measure density of [`Triangle::uniform_sample`]: `1 / area`.
    ///
    /// Infinite for zero-area triangles.
    pub fn uniform_sample_pdf(&self) -> f32 {
        1.0 / self.area()
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ a: {}, b: {}, c: {}, area: {}, normal: {} }}",
            self.a,
            self.b,
            self.c,
            self.area(),
            self.normal()
        )
    }
}

/// Group a flat, non-indexed vertex list into triangles.
pub fn triangles_from_vertices(vertices: &[Vector3]) -> LightingResult<Vec<Triangle>> {
    if vertices.len() % 3 != 0 {
        return Err(LightingError::IncompleteTriangle {
            vertices: vertices.len(),
        });
    }

    Ok(vertices
        .chunks_exact(3)
        .map(|v| Triangle::new(v[0], v[1], v[2]))
        .collect())
}

/// Sum of the triangle areas.
pub fn total_area(triangles: &[Triangle]) -> f32 {
    triangles.iter().map(Triangle::area).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn unit_right_triangle() -> Triangle {
        Triangle::new(Vector3::ZERO, Vector3::X, Vector3::Y)
    }

    #[test]
    fn test_normal_follows_winding() {
        let tri = unit_right_triangle();
        assert_eq!(tri.normal(), Vector3::Z);

        let flipped = Triangle::new(tri.a, tri.c, tri.b);
        assert_eq!(flipped.normal(), -Vector3::Z);
    }

    #[test]
    fn test_area_and_pdf() {
        let tri = unit_right_triangle();
        assert_eq!(tri.area(), 0.5);
        assert_eq!(tri.uniform_sample_pdf(), 2.0);

        let big = Triangle::new(Vector3::ZERO, Vector3::new(4.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 3.0));
        assert_eq!(big.area(), 6.0);
    }

    #[test]
    fn test_degenerate_triangle() {
        let tri = Triangle::new(Vector3::ZERO, Vector3::X, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(tri.area(), 0.0);
        assert!(tri.uniform_sample_pdf().is_infinite());
        assert!(tri.normal().x.is_nan());
    }

    #[test]
    fn test_sample_corners() {
        let tri = unit_right_triangle();
        assert_eq!(tri.uniform_sample(0.0, 0.0), tri.a);
        assert_eq!(tri.uniform_sample(1.0, 0.0), tri.b);
        assert_eq!(tri.uniform_sample(1.0, 1.0), tri.c);
    }

    #[test]
    fn test_samples_stay_inside() {
        let tri = unit_right_triangle();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10_000 {
            let p = tri.uniform_sample(rng.gen(), rng.gen());
            assert!(p.x >= 0.0 && p.y >= 0.0 && p.x + p.y <= 1.0 + 1e-6);
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_sample_mean_is_centroid() {
        let tri = unit_right_triangle();
        let mut rng = StdRng::seed_from_u64(1234);
        let n = 100_000;
        let mut sum = Vector3::ZERO;
        for _ in 0..n {
            sum += tri.uniform_sample(rng.gen(), rng.gen());
        }
        let mean = sum / n as f32;
        assert!(mean.approx_eq(&tri.centroid(), 0.01), "mean {mean}");
        assert!(tri.centroid().approx_eq(&Vector3::new(1.0 / 3.0, 1.0 / 3.0, 0.0), 1e-7));
    }

    #[test]
    fn test_samples_uniform_by_area() {
        // Split the triangle at x + y = 0.5; the small corner triangle
        // holds a quarter of the area, so it should catch a quarter of the samples.
        let tri = unit_right_triangle();
        let mut rng = StdRng::seed_from_u64(99);
        let n = 100_000;
        let inside = (0..n)
            .map(|_| tri.uniform_sample(rng.gen(), rng.gen()))
            .filter(|p| p.x + p.y < 0.5)
            .count();
        let fraction = inside as f32 / n as f32;
        assert!((fraction - 0.25).abs() < 0.01, "fraction {fraction}");
    }

    #[test]
    fn test_triangles_from_vertices() {
        let vertices = [
            Vector3::ZERO,
            Vector3::X,
            Vector3::Y,
            Vector3::ZERO,
            Vector3::Y,
            Vector3::Z,
        ];
        let triangles = triangles_from_vertices(&vertices).unwrap();
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[1].c, Vector3::Z);
        assert_eq!(total_area(&triangles), 1.0);

        assert_eq!(
            triangles_from_vertices(&vertices[..4]),
            Err(LightingError::IncompleteTriangle { vertices: 4 })
        );
    }
}
