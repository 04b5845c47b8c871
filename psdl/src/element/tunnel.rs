//! Tunnel and wall (type 9)

use std::io::{Read, Write};

use super::{PsdlElement, element_variant};
use crate::binary::{PsdlReader, PsdlWriter};
use crate::error::{PsdlError, Result};
use crate::pool::{PoolIndex, Pools};
use crate::types::{ElementType, TunnelFlags};
use crate::vertex::Vertex;

/// Junction words that precede the wall bitset: flags, height, trailing word, ceiling bits
const JUNCTION_FIXED_WORDS: usize = 4;

/// Extra state carried by a tunnel through an intersection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Junction {
    pub ceiling_bits: u16,
    /// One flag per perimeter edge, least significant bit first.
    ///
    /// The file stores whole 16-bit words, not the edge count, so a reloaded
    /// list is padded with `false` up to a multiple of 16.
    pub walls: Vec<bool>,
}

impl Junction {
    fn wall_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.walls.len().div_ceil(8)];
        for (i, _) in self.walls.iter().enumerate().filter(|(_, w)| **w) {
            bytes[i / 8] |= 1 << (i % 8);
        }
        if bytes.len() % 2 == 1 {
            bytes.push(0);
        }
        bytes
    }
}

/// Tunnel walls and ceiling applied to the road in the same room.
///
/// Subtype 0 marks a junction tunnel (an explicit word count and a wall
/// bitset follow). Subtype 2 is an early layout without the trailing word.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tunnel {
    pub flags: TunnelFlags,
    /// Wall height, stored as 8.8 fixed point
    pub height: f32,
    pub unknown: u16,
    /// Written in the early layout that omits `unknown`
    pub legacy: bool,
    pub junction: Option<Junction>,
    /// Left wall, right wall, ceiling, outer right, outer left and underside
    pub textures: Vec<String>,
}

impl Tunnel {
    pub fn new(textures: Vec<String>, flags: TunnelFlags, height: f32) -> Self {
        Self {
            flags,
            height,
            textures,
            ..Default::default()
        }
    }

    pub fn with_junction(mut self, walls: Vec<bool>) -> Self {
        self.junction = Some(Junction {
            ceiling_bits: 0,
            walls,
        });
        self
    }

    pub fn is_junction(&self) -> bool {
        self.junction.is_some()
    }

    pub fn wall_width(&self) -> f32 {
        self.height / 3.0
    }

    pub fn wall_underside_depth(&self) -> f32 {
        self.height / 4.0
    }
}

impl PsdlElement for Tunnel {
    const TYPE: ElementType = ElementType::Tunnel;

    fn subtype(&self) -> u8 {
        match (&self.junction, self.legacy) {
            (Some(_), _) => 0,
            (None, true) => 2,
            (None, false) => 3,
        }
    }

    fn read<R: Read>(reader: &mut PsdlReader<R>, subtype: u8, _pools: &Pools) -> Result<Self> {
        let junction_words = if subtype == 0 {
            Some(reader.read_u16()? as usize)
        } else {
            None
        };

        let flags = TunnelFlags::from_bits_retain(reader.read_u16()?);
        let height = f32::from(reader.read_u16()?) / 256.0;
        let legacy = subtype == 2;
        let unknown = if legacy { 0 } else { reader.read_u16()? };

        let junction = match junction_words {
            Some(words) => {
                let ceiling_bits = reader.read_u16()?;
                let bytes = reader.read_bytes(words.saturating_sub(JUNCTION_FIXED_WORDS) * 2)?;
                let walls = bytes
                    .iter()
                    .flat_map(|&byte| (0..8u8).map(move |bit| (byte >> bit) & 1 == 1))
                    .collect();
                Some(Junction {
                    ceiling_bits,
                    walls,
                })
            }
            None => None,
        };

        Ok(Self {
            flags,
            height,
            unknown,
            legacy,
            junction,
            textures: Vec::new(),
        })
    }

    fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, _index: &PoolIndex) -> Result<()> {
        let wall_bytes = self.junction.as_ref().map(Junction::wall_bytes);
        if let Some(bytes) = &wall_bytes {
            writer.write_count_u16("junction words", bytes.len() / 2 + JUNCTION_FIXED_WORDS)?;
        }

        let fixed = self.height * 256.0;
        if !(0.0..=f32::from(u16::MAX)).contains(&fixed) {
            return Err(PsdlError::malformed(
                Self::TYPE,
                "height outside the 8.8 fixed point range",
            ));
        }

        writer.write_u16(self.flags.bits())?;
        writer.write_u16(fixed as u16)?;
        if self.subtype() != 2 {
            writer.write_u16(self.unknown)?;
        }

        if let (Some(junction), Some(bytes)) = (&self.junction, &wall_bytes) {
            writer.write_u16(junction.ceiling_bits)?;
            writer.write_bytes(bytes)?;
        }
        Ok(())
    }

    fn vertices(&self) -> &[Vertex] {
        &[]
    }

    fn textures(&self) -> &[String] {
        &self.textures
    }

    fn set_textures(&mut self, textures: Vec<String>) {
        self.textures = textures;
    }

    element_variant!(Tunnel);
}
