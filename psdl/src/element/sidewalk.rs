//! Sidewalk strip (type 1)

use std::io::{Read, Write};

use super::{
    Geometric, PsdlElement, Rows, check_rows, element_variant, inline_count, read_count,
    write_count, write_vertices,
};
use crate::binary::{PsdlReader, PsdlWriter};
use crate::error::Result;
use crate::pool::{PoolIndex, Pools};
use crate::types::ElementType;
use crate::vertex::Vertex;

/// Closes one end of a sidewalk strip.
///
/// Stored as a leading index pair of `(0, 0)` or `(1, 1)` that counts toward
/// the pair count but references no vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidewalkCap {
    Start,
    End,
}

impl SidewalkCap {
    fn marker(self) -> u16 {
        match self {
            SidewalkCap::Start => 0,
            SidewalkCap::End => 1,
        }
    }
}

/// Free-standing sidewalk, one `[inner, outer]` pair per row.
///
/// Reads its texture from the slot after the active cursor, which is where a
/// road's sidewalk texture lives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SidewalkStrip {
    pub vertices: Vec<Vertex>,
    pub cap: Option<SidewalkCap>,
    pub textures: Vec<String>,
}

impl SidewalkStrip {
    pub fn new(texture: &str, vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            cap: None,
            textures: vec![texture.to_owned()],
        }
    }

    pub fn with_cap(mut self, cap: SidewalkCap) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Index pairs on disk, cap pair included
    fn pair_count(&self) -> usize {
        self.row_count() + usize::from(self.cap.is_some())
    }
}

impl PsdlElement for SidewalkStrip {
    const TYPE: ElementType = ElementType::SidewalkStrip;

    fn subtype(&self) -> u8 {
        inline_count(self.pair_count())
    }

    fn read<R: Read>(reader: &mut PsdlReader<R>, subtype: u8, pools: &Pools) -> Result<Self> {
        let pairs = read_count(reader, subtype)?;
        let mut raw = Vec::with_capacity(pairs * 2);
        for _ in 0..pairs * 2 {
            raw.push(reader.read_u16()?);
        }

        let cap = match raw.as_slice() {
            [0, 0, ..] => Some(SidewalkCap::Start),
            [1, 1, ..] => Some(SidewalkCap::End),
            _ => None,
        };
        let skip = if cap.is_some() { 2 } else { 0 };
        let vertices = raw[skip..]
            .iter()
            .map(|&i| pools.vertex(i))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            vertices,
            cap,
            textures: Vec::new(),
        })
    }

    fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()> {
        check_rows(self)?;
        write_count(writer, self.subtype(), "sidewalk pairs", self.pair_count())?;
        if let Some(cap) = self.cap {
            writer.write_u16(cap.marker())?;
            writer.write_u16(cap.marker())?;
        }
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

    element_variant!(SidewalkStrip);
}

impl Geometric for SidewalkStrip {
    fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }
}

impl Rows for SidewalkStrip {
    const ROW_BREADTH: usize = 2;

    fn row_storage(&mut self) -> &mut Vec<Vertex> {
        &mut self.vertices
    }
}
