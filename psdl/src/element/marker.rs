//! Texture cursor marker (type 10)

use std::io::{Read, Write};

use crate::binary::{AttributeHeader, PsdlReader, PsdlWriter};
use crate::error::{PsdlError, Result};
use crate::types::ElementType;
use crate::NULL_TEXTURE_CURSOR;

/// Moves the texture cursor for the records that follow it.
///
/// On disk the cursor is stored plus one, split between the header subtype
/// (high byte) and a `u16` body (low byte). A stored value of zero decodes to
/// [`NULL_TEXTURE_CURSOR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureMarker {
    pub cursor: u16,
}

impl TextureMarker {
    pub const NULL: Self = Self {
        cursor: NULL_TEXTURE_CURSOR,
    };

    pub fn new(cursor: u16) -> Self {
        Self { cursor }
    }

    pub fn is_null(&self) -> bool {
        self.cursor == NULL_TEXTURE_CURSOR
    }

    pub fn read<R: Read>(reader: &mut PsdlReader<R>, subtype: u8) -> Result<Self> {
        let value = u32::from(reader.read_u16()?);
        let cursor = (value + 256 * u32::from(subtype)).wrapping_sub(1) as u16;
        Ok(Self { cursor })
    }

    /// Write header and body
    pub fn write<W: Write>(&self, writer: &mut PsdlWriter<W>) -> Result<()> {
        let stored = if self.is_null() {
            0
        } else {
            u32::from(self.cursor) + 1
        };
        let header = AttributeHeader::new(false, ElementType::Texture as u8, (stored / 256) as u16)
            .map_err(|_| PsdlError::FieldOverflow {
                what: "texture cursor",
                value: self.cursor as usize,
                max: 8 * 256 - 2,
            })?;
        writer.write_attribute_header(header)?;
        writer.write_u16((stored % 256) as u16)?;
        Ok(())
    }
}
