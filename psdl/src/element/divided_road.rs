//! Divided road (type 8)

use std::io::{Read, Write};

use super::{
    Geometric, PsdlElement, Rows, check_rows, element_variant, inline_count, read_count,
    read_vertices, write_count, write_vertices,
};
use crate::binary::{PsdlReader, PsdlWriter};
use crate::error::{PsdlError, Result};
use crate::pool::{PoolIndex, Pools, is_null_run};
use crate::types::{DividerFlags, DividerTextureType, DividerType, ElementType, RoadTextureType};
use crate::vertex::Vertex;

/// Slots in a divider texture run
pub const DIVIDER_TEXTURE_SLOTS: usize = 4;

/// Road split by a median.
///
/// Each row is six vertices: outer left, inner left, left divider edge,
/// right divider edge, inner right, outer right.
///
/// Body layout: divider byte (type in bits 0-1, [`DividerFlags`] above),
/// divider texture base (1-based pool index, 0 for none), `u16` value, then
/// the vertex indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DividedRoad {
    pub vertices: Vec<Vertex>,
    pub divider_type: DividerType,
    pub divider_flags: DividerFlags,
    /// Top, side, cap and side strip textures of the median. Empty for none.
    pub divider_textures: Vec<String>,
    pub value: u16,
    /// Surface, sidewalk, LOD and divider-adjacent textures
    pub textures: Vec<String>,
}

impl DividedRoad {
    pub fn new(textures: Vec<String>, divider_type: DividerType, vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            divider_type,
            textures,
            ..Default::default()
        }
    }

    pub fn texture(&self, ty: RoadTextureType) -> &str {
        self.textures.get(ty as usize).map_or("", String::as_str)
    }

    pub fn set_texture(&mut self, ty: RoadTextureType, name: &str) {
        let slots = ElementType::DividedRoad.required_texture_slots() as usize;
        if self.textures.len() < slots {
            self.textures.resize(slots, String::new());
        }
        self.textures[ty as usize] = name.to_owned();
    }

    pub fn divider_texture(&self, ty: DividerTextureType) -> &str {
        self.divider_textures
            .get(ty as usize)
            .map_or("", String::as_str)
    }

    pub fn set_divider_texture(&mut self, ty: DividerTextureType, name: &str) {
        if self.divider_textures.len() < DIVIDER_TEXTURE_SLOTS {
            self.divider_textures
                .resize(DIVIDER_TEXTURE_SLOTS, String::new());
        }
        self.divider_textures[ty as usize] = name.to_owned();
    }

    fn divider_byte(&self) -> u8 {
        (self.divider_flags.bits() << 2) | self.divider_type as u8
    }
}

impl PsdlElement for DividedRoad {
    const TYPE: ElementType = ElementType::DividedRoad;

    fn subtype(&self) -> u8 {
        inline_count(self.row_count())
    }

    fn read<R: Read>(reader: &mut PsdlReader<R>, subtype: u8, pools: &Pools) -> Result<Self> {
        let rows = read_count(reader, subtype)?;
        let divider = reader.read_u8()?;
        let base = reader.read_u8()? as usize;
        let value = reader.read_u16()?;

        // A run cut short by the end of the pool keeps its empty tail
        let divider_textures = if base == 0 {
            Vec::new()
        } else {
            let mut run: Vec<String> = pools
                .textures
                .iter()
                .skip(base - 1)
                .take(DIVIDER_TEXTURE_SLOTS)
                .cloned()
                .collect();
            run.resize(DIVIDER_TEXTURE_SLOTS, String::new());
            run
        };

        Ok(Self {
            vertices: read_vertices(reader, pools, rows * 6)?,
            divider_type: DividerType::from_bits(divider),
            divider_flags: DividerFlags::from_bits_retain(divider >> 2),
            divider_textures,
            value,
            textures: Vec::new(),
        })
    }

    fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()> {
        check_rows(self)?;
        write_count(writer, self.subtype(), "divided road rows", self.row_count())?;

        let base = if is_null_run(&self.divider_textures) {
            0
        } else {
            let start = index.texture_run_start(&self.divider_textures)? + 1;
            u8::try_from(start).map_err(|_| PsdlError::FieldOverflow {
                what: "divider texture base",
                value: start,
                max: u8::MAX as usize,
            })?
        };

        writer.write_u8(self.divider_byte())?;
        writer.write_u8(base)?;
        writer.write_u16(self.value)?;
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

    element_variant!(DividedRoad);
}

impl Geometric for DividedRoad {
    fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }
}

impl Rows for DividedRoad {
    const ROW_BREADTH: usize = 6;

    fn row_storage(&mut self) -> &mut Vec<Vertex> {
        &mut self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolBuilder;

    fn row(x: f32) -> Vec<Vertex> {
        (0..6).map(|i| Vertex::new(x, 0.0, i as f32)).collect()
    }

    #[test]
    fn test_divider_byte() {
        let mut road = DividedRoad::new(Vec::new(), DividerType::Elevated, row(0.0));
        road.divider_flags = DividerFlags::CLOSED_END;
        assert_eq!(road.divider_byte(), 0b0000_1010);
    }

    #[test]
    fn test_read_resolves_divider_run() {
        let pools = Pools {
            vertices: row(0.0),
            floats: Vec::new(),
            textures: ["top", "side", "cap", "strip"].map(String::from).to_vec(),
        };
        let mut bytes = vec![0b0000_0111, 1, 0x34, 0x12];
        for i in 0..6u16 {
            bytes.extend_from_slice(&i.to_le_bytes());
        }

        let mut reader = PsdlReader::new(bytes.as_slice());
        let road = DividedRoad::read(&mut reader, 1, &pools).unwrap();
        assert_eq!(road.divider_type, DividerType::Wedged);
        assert_eq!(road.divider_flags, DividerFlags::CLOSED_START);
        assert_eq!(road.value, 0x1234);
        assert_eq!(road.divider_texture(DividerTextureType::Cap), "cap");
        assert_eq!(road.vertices, row(0.0));
    }

    #[test]
    fn test_write_divider_base() {
        let mut road = DividedRoad::new(Vec::new(), DividerType::Flat, row(0.0));
        road.set_divider_texture(DividerTextureType::Top, "median");

        let mut builder = PoolBuilder::new();
        builder.add_vertices(road.vertices.iter().copied()).unwrap();
        builder.add_texture_run(&["pad".to_owned()], 0);
        builder.add_texture_run(&road.divider_textures, 0);
        let (_, index) = builder.finish();

        let mut writer = PsdlWriter::new(Vec::new());
        road.write(&mut writer, &index).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(&bytes[..4], &[0b0000_0001, 2, 0, 0]);
        assert_eq!(bytes.len(), 4 + 12);
    }
}
