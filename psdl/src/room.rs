//! Rooms: a perimeter plus the records drawn inside it

use hashbrown::HashSet;

use crate::element::{DividedRoad, Element, PsdlElement, Road, Walkway};
use crate::error::{PsdlError, Result};
use crate::types::{CrossroadEnd, PerimeterPoint, RoomFlags};
use crate::vertex::Vertex;

/// One cell of the scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Room {
    pub perimeter: Vec<PerimeterPoint>,
    pub elements: Vec<Element>,
    /// Stored in the post-room flags table, not in the room body
    pub flags: RoomFlags,
    /// Stored in the post-room prop rule table
    pub prop_rule: u8,
}

impl Room {
    pub fn new(elements: Vec<Element>, perimeter: Vec<PerimeterPoint>) -> Self {
        Self {
            perimeter,
            elements,
            ..Default::default()
        }
    }

    pub fn with_flags(mut self, flags: RoomFlags) -> Self {
        self.flags = flags;
        self
    }

    /// First record of kind `T`
    pub fn find_first<T: PsdlElement>(&self) -> Option<&T> {
        self.elements.iter().find_map(T::from_element)
    }

    pub fn find_first_mut<T: PsdlElement>(&mut self) -> Option<&mut T> {
        self.elements.iter_mut().find_map(T::from_element_mut)
    }

    /// Every record of kind `T`, in room order
    pub fn find_all<'a, T: PsdlElement + 'a>(&'a self) -> impl Iterator<Item = &'a T> {
        self.elements.iter().filter_map(T::from_element)
    }

    pub fn perimeter_vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        self.perimeter.iter().map(|p| p.vertex)
    }

    /// Distinct vertices referenced by this room's records, first-seen order.
    ///
    /// Perimeter vertices follow the record vertices when requested.
    pub fn gather_vertices(&self, include_perimeter: bool) -> Vec<Vertex> {
        let mut seen = HashSet::new();
        let records = self.elements.iter().flat_map(|e| e.vertices().iter().copied());
        let perimeter = self
            .perimeter_vertices()
            .filter(|_| include_perimeter);
        records
            .chain(perimeter)
            .filter(|v| seen.insert(*v))
            .collect()
    }

    /// Distinct float-pool values referenced by this room's records
    pub fn gather_floats(&self) -> Vec<f32> {
        let mut seen = HashSet::new();
        self.elements
            .iter()
            .flat_map(Element::floats)
            .filter(|f| seen.insert(f.to_bits()))
            .collect()
    }

    /// First road, divided road or walkway record
    pub fn road_like(&self) -> Option<&Element> {
        self.elements.iter().find(|e| e.is_road_like())
    }

    /// Whether AI traffic may use this room.
    ///
    /// Requires a road-like record and a fully named texture run on every
    /// record that takes textures.
    pub fn verify_for_population(&self) -> bool {
        self.road_like().is_some()
            && self.elements.iter().all(|e| {
                let slots = e.required_texture_slots() as usize;
                let textures = e.textures();
                textures.len() >= slots && textures[..slots].iter().all(|t| !t.is_empty())
            })
    }

    /// Even-odd test of `(x, z)` against the perimeter on the XZ plane.
    ///
    /// An edge counts when exactly one endpoint lies strictly above `z`, so
    /// points on a horizontal edge or vertex may land on either side.
    pub fn point_in_room(&self, x: f32, z: f32) -> bool {
        let points = &self.perimeter;
        let Some(last) = points.last() else {
            return false;
        };

        let mut inside = false;
        let mut prev = last.vertex;
        for point in points {
            let cur = point.vertex;
            if (cur.z > z) != (prev.z > z) {
                let cross_x = (prev.x - cur.x) * (z - cur.z) / (prev.z - cur.z) + cur.x;
                if x < cross_x {
                    inside = !inside;
                }
            }
            prev = cur;
        }
        inside
    }

    /// The four vertices where this room's road meets a crossroad at `end`
    pub fn crossroad_vertices(&self, end: CrossroadEnd) -> Result<[Vertex; 4]> {
        let road = self.road_like().ok_or(PsdlError::NoRoadRecord)?;
        let v = road.vertices();

        let picked = if let Some(road) = road.as_kind::<Road>() {
            let n = road.vertices.len();
            (n >= 4).then(|| match end {
                CrossroadEnd::First => [v[0], v[1], v[2], v[3]],
                CrossroadEnd::Last => [v[n - 4], v[n - 3], v[n - 2], v[n - 1]],
            })
        } else if let Some(road) = road.as_kind::<DividedRoad>() {
            let n = road.vertices.len();
            (n >= 6).then(|| match end {
                CrossroadEnd::First => [v[0], v[1], v[4], v[5]],
                CrossroadEnd::Last => [v[n - 6], v[n - 5], v[n - 2], v[n - 1]],
            })
        } else if let Some(walkway) = road.as_kind::<Walkway>() {
            let n = walkway.vertices.len();
            (n >= 2).then(|| match end {
                CrossroadEnd::First => [v[0], v[0], v[1], v[1]],
                CrossroadEnd::Last => [v[n - 2], v[n - 2], v[n - 1], v[n - 1]],
            })
        } else {
            None
        };

        picked.ok_or_else(|| PsdlError::malformed(road.element_type(), "no rows"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{FacadeBound, Sliver, TriangleFan};

    fn square_room() -> Room {
        let perimeter = [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]
            .into_iter()
            .map(|(x, z)| PerimeterPoint::new(Vertex::new(x, 0.0, z), None))
            .collect();
        Room::new(Vec::new(), perimeter)
    }

    fn road_row(x: f32) -> Vec<Vertex> {
        (0..4).map(|i| Vertex::new(x, 0.0, i as f32)).collect()
    }

    #[test]
    fn test_point_in_room() {
        let room = square_room();
        assert!(room.point_in_room(5.0, 5.0));
        assert!(room.point_in_room(0.5, 9.5));
        assert!(!room.point_in_room(15.0, 15.0));
        assert!(!room.point_in_room(-1.0, 5.0));
        assert!(!Room::default().point_in_room(0.0, 0.0));
    }

    #[test]
    fn test_point_in_concave_room() {
        // U shape opening towards +z
        let perimeter = [
            (0.0, 0.0),
            (0.0, 10.0),
            (3.0, 10.0),
            (3.0, 3.0),
            (7.0, 3.0),
            (7.0, 10.0),
            (10.0, 10.0),
            (10.0, 0.0),
        ]
        .into_iter()
        .map(|(x, z)| PerimeterPoint::new(Vertex::new(x, 0.0, z), None))
        .collect();
        let room = Room::new(Vec::new(), perimeter);
        assert!(room.point_in_room(1.0, 8.0));
        assert!(!room.point_in_room(5.0, 8.0));
        assert!(room.point_in_room(5.0, 1.0));
    }

    #[test]
    fn test_verify_for_population() {
        let road = Road::new("asphalt", "walk", "lod", road_row(0.0));
        let mut room = Room::new(vec![road.into()], Vec::new());
        assert!(room.verify_for_population());

        room.find_first_mut::<Road>().unwrap().textures[1].clear();
        assert!(!room.verify_for_population());

        let bound = FacadeBound::new(0.5, 3.0, Vertex::ZERO, Vertex::ZERO);
        let bound_only = Room::new(vec![bound.into()], Vec::new());
        assert!(!bound_only.verify_for_population());
    }

    #[test]
    fn test_gather_dedups_in_order() {
        let a = Vertex::new(1.0, 0.0, 0.0);
        let b = Vertex::new(2.0, 0.0, 0.0);
        let c = Vertex::new(3.0, 0.0, 0.0);
        let mut room = Room::new(
            vec![
                TriangleFan::new("t", vec![b, a, c]).into(),
                Sliver::new("s", 4.0, 1.0, a, c).into(),
                FacadeBound::new(0.0, 4.0, a, b).into(),
            ],
            vec![PerimeterPoint::new(c, None), PerimeterPoint::new(Vertex::ZERO, None)],
        );
        assert_eq!(room.gather_vertices(false), vec![b, a, c]);
        assert_eq!(room.gather_vertices(true), vec![b, a, c, Vertex::ZERO]);
        assert_eq!(room.gather_floats(), vec![4.0, 1.0]);

        room.elements.clear();
        assert_eq!(room.gather_vertices(true), vec![c, Vertex::ZERO]);
    }

    #[test]
    fn test_find() {
        let room = Room::new(
            vec![
                TriangleFan::new("a", road_row(0.0)).into(),
                Road::new("r", "s", "l", road_row(1.0)).into(),
                TriangleFan::new("b", road_row(2.0)).into(),
            ],
            Vec::new(),
        );
        assert_eq!(room.find_first::<TriangleFan>().unwrap().textures, vec!["a"]);
        assert_eq!(room.find_all::<TriangleFan>().count(), 2);
        assert!(room.find_first::<Walkway>().is_none());
        assert_eq!(
            room.road_like().map(Element::element_type),
            Some(crate::types::ElementType::Road)
        );
    }

    #[test]
    fn test_crossroad_vertices() {
        let mut vertices = road_row(0.0);
        vertices.extend(road_row(5.0));
        let road = Room::new(vec![Road::new("r", "s", "l", vertices.clone()).into()], Vec::new());
        assert_eq!(
            road.crossroad_vertices(CrossroadEnd::First).unwrap().to_vec(),
            road_row(0.0)
        );
        assert_eq!(
            road.crossroad_vertices(CrossroadEnd::Last).unwrap().to_vec(),
            road_row(5.0)
        );

        let six: Vec<Vertex> = (0..12).map(|i| Vertex::new(i as f32, 0.0, 0.0)).collect();
        let divided = Room::new(
            vec![DividedRoad::new(Vec::new(), Default::default(), six.clone()).into()],
            Vec::new(),
        );
        assert_eq!(
            divided.crossroad_vertices(CrossroadEnd::First).unwrap(),
            [six[0], six[1], six[4], six[5]]
        );
        assert_eq!(
            divided.crossroad_vertices(CrossroadEnd::Last).unwrap(),
            [six[6], six[7], six[10], six[11]]
        );

        let walk = Room::new(vec![Walkway::new("w", six[..4].to_vec()).into()], Vec::new());
        assert_eq!(
            walk.crossroad_vertices(CrossroadEnd::Last).unwrap(),
            [six[2], six[2], six[3], six[3]]
        );

        assert!(matches!(
            square_room().crossroad_vertices(CrossroadEnd::First),
            Err(PsdlError::NoRoadRecord)
        ));
    }
}
