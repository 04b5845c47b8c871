//! Facade (type 11) and facade bound (type 7)

use std::io::{Read, Write};

use super::{Geometric, PsdlElement, element_variant, read_vertex_array, write_vertices};
use crate::binary::{PsdlReader, PsdlWriter};
use crate::error::Result;
use crate::pool::{PoolIndex, Pools};
use crate::types::ElementType;
use crate::vertex::Vertex;

/// Textured building wall between two ground vertices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facade {
    pub vertices: [Vertex; 2],
    pub bottom_height: f32,
    pub top_height: f32,
    pub u_tiling: i16,
    pub v_tiling: i16,
    pub textures: Vec<String>,
}

impl Facade {
    pub fn new(
        texture: &str,
        bottom_height: f32,
        top_height: f32,
        u_tiling: i16,
        v_tiling: i16,
        left: Vertex,
        right: Vertex,
    ) -> Self {
        Self {
            vertices: [left, right],
            bottom_height,
            top_height,
            u_tiling,
            v_tiling,
            textures: vec![texture.to_owned()],
        }
    }

    /// Bound along the top edge of this facade
    pub fn create_bound(&self, sun_angle: f32) -> FacadeBound {
        FacadeBound::new(sun_angle, self.top_height, self.vertices[0], self.vertices[1])
    }
}

impl PsdlElement for Facade {
    const TYPE: ElementType = ElementType::Facade;

    fn subtype(&self) -> u8 {
        6
    }

    fn read<R: Read>(reader: &mut PsdlReader<R>, _subtype: u8, pools: &Pools) -> Result<Self> {
        let bottom_height = pools.float(reader.read_u16()?)?;
        let top_height = pools.float(reader.read_u16()?)?;
        let u_tiling = reader.read_i16()?;
        let v_tiling = reader.read_i16()?;
        Ok(Self {
            vertices: read_vertex_array(reader, pools)?,
            bottom_height,
            top_height,
            u_tiling,
            v_tiling,
            textures: Vec::new(),
        })
    }

    fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()> {
        writer.write_u16(index.float(self.bottom_height)?)?;
        writer.write_u16(index.float(self.top_height)?)?;
        writer.write_i16(self.u_tiling)?;
        writer.write_i16(self.v_tiling)?;
        write_vertices(writer, index, &self.vertices)
    }

    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn floats(&self) -> Vec<f32> {
        vec![self.bottom_height, self.top_height]
    }

    fn textures(&self) -> &[String] {
        &self.textures
    }

    fn set_textures(&mut self, textures: Vec<String>) {
        self.textures = textures;
    }

    element_variant!(Facade);
}

impl Geometric for Facade {
    fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }
}

/// Untextured shadow/visibility bound for a facade.
///
/// Carries no texture slots and never moves the texture cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacadeBound {
    pub vertices: [Vertex; 2],
    /// Sun angle scaled to `0..=255`
    pub sun_angle: u16,
    pub height: f32,
}

impl FacadeBound {
    /// `sun_angle` is clamped to `[0, 1]`
    pub fn new(sun_angle: f32, height: f32, left: Vertex, right: Vertex) -> Self {
        Self {
            vertices: [left, right],
            sun_angle: (sun_angle.clamp(0.0, 1.0) * 255.0) as u16,
            height,
        }
    }
}

impl PsdlElement for FacadeBound {
    const TYPE: ElementType = ElementType::FacadeBound;

    fn subtype(&self) -> u8 {
        4
    }

    fn read<R: Read>(reader: &mut PsdlReader<R>, _subtype: u8, pools: &Pools) -> Result<Self> {
        let sun_angle = reader.read_u16()?;
        let height = pools.float(reader.read_u16()?)?;
        Ok(Self {
            vertices: read_vertex_array(reader, pools)?,
            sun_angle,
            height,
        })
    }

    fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()> {
        writer.write_u16(self.sun_angle)?;
        writer.write_u16(index.float(self.height)?)?;
        write_vertices(writer, index, &self.vertices)
    }

    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn floats(&self) -> Vec<f32> {
        vec![self.height]
    }

    fn textures(&self) -> &[String] {
        &[]
    }

    fn set_textures(&mut self, _textures: Vec<String>) {}

    element_variant!(FacadeBound);
}

impl Geometric for FacadeBound {
    fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sun_angle_clamped() {
        assert_eq!(FacadeBound::new(2.0, 1.0, Vertex::ZERO, Vertex::ZERO).sun_angle, 255);
        assert_eq!(FacadeBound::new(-1.0, 1.0, Vertex::ZERO, Vertex::ZERO).sun_angle, 0);
        assert_eq!(FacadeBound::new(0.5, 1.0, Vertex::ZERO, Vertex::ZERO).sun_angle, 127);
    }

    #[test]
    fn test_create_bound_uses_top_edge() {
        let left = Vertex::new(0.0, 0.0, 0.0);
        let right = Vertex::new(4.0, 0.0, 0.0);
        let facade = Facade::new("brick", 0.0, 12.5, 2, 3, left, right);
        let bound = facade.create_bound(1.0);
        assert_eq!(bound.height, 12.5);
        assert_eq!(bound.vertices, [left, right]);
        assert_eq!(bound.sun_angle, 255);
        assert!(bound.textures().is_empty());
    }

    #[test]
    fn test_fixed_arity() {
        let mut facade = Facade::default();
        assert!(facade.insert_vertex(0, Vertex::ZERO).is_err());
        assert!(facade.push_vertex(Vertex::ZERO).is_err());
        assert_eq!(facade.vertex_count(), 2);
    }
}
