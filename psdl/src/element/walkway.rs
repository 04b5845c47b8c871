//! Walkway (type 2)

use std::io::{Read, Write};

use super::{
    Geometric, PsdlElement, Rows, check_rows, element_variant, inline_count, read_count,
    read_vertices, write_count, write_vertices,
};
use crate::binary::{PsdlReader, PsdlWriter};
use crate::error::Result;
use crate::pool::{PoolIndex, Pools};
use crate::types::ElementType;
use crate::vertex::Vertex;

/// Pedestrian surface, one `[left, right]` pair per row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Walkway {
    pub vertices: Vec<Vertex>,
    pub textures: Vec<String>,
}

impl Walkway {
    pub fn new(texture: &str, vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            textures: vec![texture.to_owned()],
        }
    }
}

impl PsdlElement for Walkway {
    const TYPE: ElementType = ElementType::Walkway;

    fn subtype(&self) -> u8 {
        inline_count(self.row_count())
    }

    fn read<R: Read>(reader: &mut PsdlReader<R>, subtype: u8, pools: &Pools) -> Result<Self> {
        let rows = read_count(reader, subtype)?;
        Ok(Self {
            vertices: read_vertices(reader, pools, rows * 2)?,
            textures: Vec::new(),
        })
    }

    fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()> {
        check_rows(self)?;
        write_count(writer, self.subtype(), "walkway rows", self.row_count())?;
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

    element_variant!(Walkway);
}

impl Geometric for Walkway {
    fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }
}

impl Rows for Walkway {
    const ROW_BREADTH: usize = 2;

    fn row_storage(&mut self) -> &mut Vec<Vertex> {
        &mut self.vertices
    }
}
