//! PSDL stream writer

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Seek, SeekFrom, Write};

use super::AttributeHeader;
use crate::error::{PsdlError, Result};
use crate::vertex::Vertex;

/// Writer for the PSDL binary layout
pub struct PsdlWriter<W: Write> {
    writer: W,
}

impl<W: Write> PsdlWriter<W> {
    /// Create a new writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_u8(&mut self, v: u8) -> io::Result<()> {
        self.writer.write_u8(v)
    }

    pub fn write_u16(&mut self, v: u16) -> io::Result<()> {
        self.writer.write_u16::<LittleEndian>(v)
    }

    pub fn write_i16(&mut self, v: i16) -> io::Result<()> {
        self.writer.write_i16::<LittleEndian>(v)
    }

    pub fn write_u32(&mut self, v: u32) -> io::Result<()> {
        self.writer.write_u32::<LittleEndian>(v)
    }

    pub fn write_f32(&mut self, v: f32) -> io::Result<()> {
        self.writer.write_f32::<LittleEndian>(v)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)
    }

    pub fn write_vertex(&mut self, v: Vertex) -> io::Result<()> {
        self.write_f32(v.x)?;
        self.write_f32(v.y)?;
        self.write_f32(v.z)
    }

    /// Write a count into a `u16` field, failing if it does not fit
    pub fn write_count_u16(&mut self, what: &'static str, count: usize) -> Result<()> {
        let count = u16::try_from(count).map_err(|_| PsdlError::FieldOverflow {
            what,
            value: count,
            max: u16::MAX as usize,
        })?;
        Ok(self.write_u16(count)?)
    }

    /// Length-prefixed, NUL-terminated Latin-1 texture name. Empty names are a single zero byte.
    pub fn write_texture_name(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Ok(self.write_u8(0)?);
        }
        let bytes = name
            .chars()
            .map(u8::try_from)
            .collect::<std::result::Result<Vec<u8>, _>>()
            .map_err(|_| PsdlError::UnencodableTextureName(name.to_owned()))?;
        let len = u8::try_from(bytes.len() + 1).map_err(|_| PsdlError::FieldOverflow {
            what: "texture name length",
            value: bytes.len(),
            max: u8::MAX as usize - 1,
        })?;
        self.write_u8(len)?;
        self.write_bytes(&bytes)?;
        Ok(self.write_u8(0)?)
    }

    pub fn write_attribute_header(&mut self, header: AttributeHeader) -> io::Result<()> {
        self.write_u16(header.to_u16())
    }

    /// Consume the writer and return the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Seek> PsdlWriter<W> {
    pub fn position(&mut self) -> io::Result<u64> {
        self.writer.stream_position()
    }

    /// Overwrite a `u32` placeholder at `at`, then return to the current position
    pub fn backpatch_u32(&mut self, at: u64, value: u32) -> io::Result<()> {
        let resume = self.writer.stream_position()?;
        self.writer.seek(SeekFrom::Start(at))?;
        self.write_u32(value)?;
        self.writer.seek(SeekFrom::Start(resume))?;
        Ok(())
    }
}
