//! PSDL stream reader
//!
//! Thin wrapper over any `Read` that tracks how many bytes were consumed, so
//! room attribute runs can be bounded without seeking.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read};

use super::AttributeHeader;
use crate::error::Result;
use crate::vertex::Vertex;

/// Reader for the PSDL binary layout
pub struct PsdlReader<R: Read> {
    reader: R,
    position: u64,
}

impl<R: Read> PsdlReader<R> {
    /// Create a new reader positioned at the start of the stream
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            position: 0,
        }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let v = self.reader.read_u8()?;
        self.position += 1;
        Ok(v)
    }

    pub fn read_u16(&mut self) -> io::Result<u16> {
        let v = self.reader.read_u16::<LittleEndian>()?;
        self.position += 2;
        Ok(v)
    }

    pub fn read_i16(&mut self) -> io::Result<i16> {
        let v = self.reader.read_i16::<LittleEndian>()?;
        self.position += 2;
        Ok(v)
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        let v = self.reader.read_u32::<LittleEndian>()?;
        self.position += 4;
        Ok(v)
    }

    pub fn read_f32(&mut self) -> io::Result<f32> {
        let v = self.reader.read_f32::<LittleEndian>()?;
        self.position += 4;
        Ok(v)
    }

    pub fn read_bytes(&mut self, len: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.reader.read_exact(&mut buf)?;
        self.position += len as u64;
        Ok(buf)
    }

    /// Skip bytes whose value is not kept (padding)
    pub fn skip(&mut self, len: usize) -> io::Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn read_magic(&mut self) -> io::Result<[u8; 4]> {
        let mut magic = [0u8; 4];
        self.reader.read_exact(&mut magic)?;
        self.position += 4;
        Ok(magic)
    }

    /// Three consecutive floats
    pub fn read_vertex(&mut self) -> io::Result<Vertex> {
        Ok(Vertex::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    /// Length-prefixed, NUL-terminated texture name.
    ///
    /// A zero length byte is an empty name with no terminator.
    pub fn read_texture_name(&mut self) -> io::Result<String> {
        let len = self.read_u8()? as usize;
        if len == 0 {
            return Ok(String::new());
        }
        let mut bytes = self.read_bytes(len)?;
        bytes.pop();
        // Latin-1: one byte per char, so any name survives a resave
        Ok(bytes.into_iter().map(char::from).collect())
    }

    pub fn read_attribute_header(&mut self) -> io::Result<AttributeHeader> {
        Ok(AttributeHeader::from_u16(self.read_u16()?))
    }

    /// Drain the rest of the stream, returning how many bytes were left
    pub fn remaining(&mut self) -> Result<u64> {
        Ok(io::copy(&mut self.reader, &mut io::sink())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [
            0x01, // u8
            0x34, 0x12, // u16
            0xFE, 0xFF, // i16
            0x78, 0x56, 0x34, 0x12, // u32
            0x00, 0x00, 0x80, 0x3F, // f32 1.0
        ];
        let mut r = PsdlReader::new(data.as_slice());
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u16().unwrap(), 0x1234);
        assert_eq!(r.read_i16().unwrap(), -2);
        assert_eq!(r.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(r.read_f32().unwrap(), 1.0);
        assert_eq!(r.position(), 13);
        assert_eq!(r.remaining().unwrap(), 0);
    }

    #[test]
    fn test_read_texture_names() {
        let data = [4, b'a', b'b', b'c', 0, 0, 2, b'z', 0];
        let mut r = PsdlReader::new(data.as_slice());
        assert_eq!(r.read_texture_name().unwrap(), "abc");
        assert_eq!(r.read_texture_name().unwrap(), "");
        assert_eq!(r.read_texture_name().unwrap(), "z");
        assert_eq!(r.position(), data.len() as u64);
    }

    #[test]
    fn test_read_texture_name_high_bytes() {
        let data = [4, b'r', 0xE9, 0xFF, 0];
        let mut r = PsdlReader::new(data.as_slice());
        assert_eq!(r.read_texture_name().unwrap(), "r\u{e9}\u{ff}");
    }

    #[test]
    fn test_read_past_end() {
        let data = [0x01];
        let mut r = PsdlReader::new(data.as_slice());
        let err = r.read_u16().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_remaining_counts_trailing_bytes() {
        let data = [0u8; 10];
        let mut r = PsdlReader::new(data.as_slice());
        r.skip(4).unwrap();
        assert_eq!(r.remaining().unwrap(), 6);
    }
}
