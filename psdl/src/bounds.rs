//! Scene bounding volume

use glam::Vec3;

use crate::vertex::Vertex;

/// Axis-aligned extent of the scene plus a rough bounding sphere
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min: Vertex,
    pub max: Vertex,
    /// Average of the contributing vertices, not the box midpoint
    pub center: Vertex,
    /// Half the largest axis extent
    pub radius: f32,
}

impl Bounds {
    /// Bounds of `vertices`, or `None` when there are none
    pub fn from_vertices(vertices: impl IntoIterator<Item = Vertex>) -> Option<Self> {
        let mut iter = vertices.into_iter().map(Vec3::from);
        let first = iter.next()?;

        let (mut min, mut max, mut sum, mut count) = (first, first, first, 1u32);
        for v in iter {
            min = min.min(v);
            max = max.max(v);
            sum += v;
            count += 1;
        }

        Some(Self {
            min: min.into(),
            max: max.into(),
            center: (sum / count as f32).into(),
            radius: (max - min).max_element() / 2.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let bounds = Bounds::from_vertices([
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(10.0, 2.0, -4.0),
            Vertex::new(2.0, 4.0, 4.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, Vertex::new(0.0, 0.0, -4.0));
        assert_eq!(bounds.max, Vertex::new(10.0, 4.0, 4.0));
        assert_eq!(bounds.center, Vertex::new(4.0, 2.0, 0.0));
        assert_eq!(bounds.radius, 5.0);
    }

    #[test]
    fn test_radius_uses_largest_axis() {
        let bounds =
            Bounds::from_vertices([Vertex::new(0.0, 0.0, 0.0), Vertex::new(1.0, 9.0, 3.0)])
                .unwrap();
        assert_eq!(bounds.radius, 4.5);
    }

    #[test]
    fn test_empty() {
        assert!(Bounds::from_vertices(std::iter::empty()).is_none());
    }
}
