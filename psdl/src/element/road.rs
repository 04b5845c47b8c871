//! Road (type 0)

use std::io::{Read, Write};

use super::{
    Geometric, PsdlElement, Rows, check_rows, element_variant, inline_count, read_count,
    read_vertices, write_count, write_vertices,
};
use crate::binary::{PsdlReader, PsdlWriter};
use crate::error::Result;
use crate::pool::{PoolIndex, Pools};
use crate::types::{ElementType, RoadTextureType, SidewalkRemovalMode};
use crate::vertex::Vertex;

/// A road with sidewalks on both sides.
///
/// Each row is `[outer left, inner left, inner right, outer right]`: the
/// outer vertices bound the sidewalks and the inner ones the driving surface.
/// A row whose outer and inner vertices coincide has no sidewalk on that side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Road {
    pub vertices: Vec<Vertex>,
    /// Surface, sidewalk and LOD textures, in that order
    pub textures: Vec<String>,
}

impl Road {
    pub fn new(surface: &str, sidewalk: &str, lod: &str, vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            textures: vec![surface.to_owned(), sidewalk.to_owned(), lod.to_owned()],
        }
    }

    pub fn texture(&self, ty: RoadTextureType) -> &str {
        self.textures.get(ty as usize).map_or("", String::as_str)
    }

    pub fn set_texture(&mut self, ty: RoadTextureType, name: &str) {
        let slots = ElementType::Road.required_texture_slots() as usize;
        if self.textures.len() < slots {
            self.textures.resize(slots, String::new());
        }
        self.textures[ty as usize] = name.to_owned();
    }

    /// Inner edge of both sidewalks on `row`, left then right
    pub fn sidewalk_boundary(&self, row: usize) -> Option<[Vertex; 2]> {
        self.row(row).map(|r| [r[1], r[2]])
    }

    /// Remove the sidewalks from every row
    pub fn delete_sidewalk(&mut self, mode: SidewalkRemovalMode) {
        for row in self.vertices.chunks_exact_mut(4) {
            match mode {
                SidewalkRemovalMode::MoveSidewalkInwards => {
                    row[0] = row[1];
                    row[3] = row[2];
                }
                SidewalkRemovalMode::MoveRoadOutwards => {
                    row[1] = row[0];
                    row[2] = row[3];
                }
            }
        }
    }
}

impl PsdlElement for Road {
    const TYPE: ElementType = ElementType::Road;

    fn subtype(&self) -> u8 {
        inline_count(self.row_count())
    }

    fn read<R: Read>(reader: &mut PsdlReader<R>, subtype: u8, pools: &Pools) -> Result<Self> {
        let rows = read_count(reader, subtype)?;
        Ok(Self {
            vertices: read_vertices(reader, pools, rows * 4)?,
            textures: Vec::new(),
        })
    }

    fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()> {
        check_rows(self)?;
        write_count(writer, self.subtype(), "road rows", self.row_count())?;
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

    element_variant!(Road);
}

impl Geometric for Road {
    fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }
}

impl Rows for Road {
    const ROW_BREADTH: usize = 4;

    fn row_storage(&mut self) -> &mut Vec<Vertex> {
        &mut self.vertices
    }
}
