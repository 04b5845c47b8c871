//! Sliver (type 3)

use std::io::{Read, Write};

use super::{
    Geometric, PsdlElement, element_variant, read_vertex_array, write_vertices,
};
use crate::binary::{PsdlReader, PsdlWriter};
use crate::error::Result;
use crate::pool::{PoolIndex, Pools};
use crate::types::ElementType;
use crate::vertex::Vertex;

/// Thin vertical strip between two vertices, e.g. a curb face
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sliver {
    pub vertices: [Vertex; 2],
    pub height: f32,
    pub texture_scale: f32,
    pub textures: Vec<String>,
}

impl Sliver {
    pub fn new(texture: &str, height: f32, texture_scale: f32, left: Vertex, right: Vertex) -> Self {
        Self {
            vertices: [left, right],
            height,
            texture_scale,
            textures: vec![texture.to_owned()],
        }
    }
}

impl PsdlElement for Sliver {
    const TYPE: ElementType = ElementType::Sliver;

    fn subtype(&self) -> u8 {
        4
    }

    fn read<R: Read>(reader: &mut PsdlReader<R>, _subtype: u8, pools: &Pools) -> Result<Self> {
        let height = pools.float(reader.read_u16()?)?;
        let texture_scale = pools.float(reader.read_u16()?)?;
        Ok(Self {
            vertices: read_vertex_array(reader, pools)?,
            height,
            texture_scale,
            textures: Vec::new(),
        })
    }

    fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()> {
        writer.write_u16(index.float(self.height)?)?;
        writer.write_u16(index.float(self.texture_scale)?)?;
        write_vertices(writer, index, &self.vertices)
    }

    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn floats(&self) -> Vec<f32> {
        vec![self.height, self.texture_scale]
    }

    fn textures(&self) -> &[String] {
        &self.textures
    }

    fn set_textures(&mut self, textures: Vec<String>) {
        self.textures = textures;
    }

    element_variant!(Sliver);
}

impl Geometric for Sliver {
    fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }
}
