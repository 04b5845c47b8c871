//! Crosswalk (type 4)

use std::io::{Read, Write};

use super::{Geometric, PsdlElement, element_variant, read_vertex_array, write_vertices};
use crate::binary::{PsdlReader, PsdlWriter};
use crate::error::Result;
use crate::pool::{PoolIndex, Pools};
use crate::types::ElementType;
use crate::vertex::Vertex;

/// Painted quad across a road.
///
/// Reads its texture two slots past the active cursor, the road run's LOD slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Crosswalk {
    pub vertices: [Vertex; 4],
    pub textures: Vec<String>,
}

impl Crosswalk {
    pub fn new(texture: &str, vertices: [Vertex; 4]) -> Self {
        Self {
            vertices,
            textures: vec![texture.to_owned()],
        }
    }
}

impl PsdlElement for Crosswalk {
    const TYPE: ElementType = ElementType::Crosswalk;

    fn subtype(&self) -> u8 {
        4
    }

    fn read<R: Read>(reader: &mut PsdlReader<R>, _subtype: u8, pools: &Pools) -> Result<Self> {
        Ok(Self {
            vertices: read_vertex_array(reader, pools)?,
            textures: Vec::new(),
        })
    }

    fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()> {
        write_vertices(writer, index, &self.vertices)
    }

    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn textures(&self) -> &[String] {
        &self.textures
    }

    fn set_textures(&mut self, textures: Vec<String>) {
        self.textures = textures;
    }

    element_variant!(Crosswalk);
}

impl Geometric for Crosswalk {
    fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }
}
