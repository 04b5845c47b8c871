//! AI road (prop path) table
//!
//! Only partly understood. Fields are carried through unchanged except the
//! room list and the crossroad vertices, which are rebuilt on save from the
//! rooms the entry still covers.

use std::io::{Read, Write};

use crate::binary::{PsdlReader, PsdlWriter};
use crate::element::read_vertex_array;
use crate::error::{Pool, PsdlError, Result};
use crate::pool::{PoolIndex, Pools};
use crate::room::Room;
use crate::types::{CrossroadEnd, RoomIndex};
use crate::vertex::Vertex;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiRoad {
    /// Two `u16` words of unknown meaning, kept as one
    pub flags: u32,
    pub first_floats: Vec<f32>,
    pub second_floats: Vec<f32>,
    pub value: u16,
    pub start_crossroad: [Vertex; 4],
    pub end_crossroad: [Vertex; 4],
    /// Rooms the path runs through, in order
    pub rooms: Vec<RoomIndex>,
}

impl AiRoad {
    pub fn read<R: Read>(reader: &mut PsdlReader<R>, pools: &Pools, room_count: usize) -> Result<Self> {
        let flags = reader.read_u32()?;
        let first = reader.read_u8()? as usize;
        let second = reader.read_u8()? as usize;
        let first_floats = (0..first)
            .map(|_| reader.read_f32())
            .collect::<std::io::Result<Vec<_>>>()?;
        let second_floats = (0..second)
            .map(|_| reader.read_f32())
            .collect::<std::io::Result<Vec<_>>>()?;
        let value = reader.read_u16()?;
        let start_crossroad = read_vertex_array(reader, pools)?;
        let end_crossroad = read_vertex_array(reader, pools)?;

        let count = reader.read_u8()?;
        let mut rooms = Vec::with_capacity(count as usize);
        for _ in 0..count {
            // Stored signed and 1-based; the sign carries nothing we use
            let number = reader.read_i16()?.unsigned_abs() as usize;
            if number == 0 || number > room_count {
                return Err(PsdlError::IndexOutOfRange {
                    pool: Pool::Rooms,
                    index: number,
                    len: room_count,
                });
            }
            rooms.push(number - 1);
        }

        Ok(Self {
            flags,
            first_floats,
            second_floats,
            value,
            start_crossroad,
            end_crossroad,
            rooms,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()> {
        writer.write_u32(self.flags)?;
        writer.write_u8(small_count("AI road floats", self.first_floats.len())?)?;
        writer.write_u8(small_count("AI road floats", self.second_floats.len())?)?;
        for &f in self.first_floats.iter().chain(&self.second_floats) {
            writer.write_f32(f)?;
        }
        writer.write_u16(self.value)?;
        for &v in self.start_crossroad.iter().chain(&self.end_crossroad) {
            writer.write_u16(index.vertex(v)?)?;
        }

        writer.write_u8(small_count("AI road rooms", self.rooms.len())?)?;
        for &room in &self.rooms {
            let number = i16::try_from(room + 1).map_err(|_| PsdlError::FieldOverflow {
                what: "AI road room number",
                value: room + 1,
                max: i16::MAX as usize,
            })?;
            writer.write_i16(number)?;
        }
        Ok(())
    }

    /// Copy of this entry restricted to rooms that pass
    /// [`Room::verify_for_population`], with crossroads taken from the first
    /// and last remaining room. `None` when no room remains.
    pub fn populated(&self, rooms: &[Room]) -> Result<Option<AiRoad>> {
        let mut kept = Vec::with_capacity(self.rooms.len());
        for &index in &self.rooms {
            let room = rooms.get(index).ok_or(PsdlError::DanglingRoom {
                index,
                len: rooms.len(),
            })?;
            if room.verify_for_population() {
                kept.push(index);
            }
        }

        let (Some(&first), Some(&last)) = (kept.first(), kept.last()) else {
            return Ok(None);
        };
        Ok(Some(AiRoad {
            start_crossroad: rooms[first].crossroad_vertices(CrossroadEnd::First)?,
            end_crossroad: rooms[last].crossroad_vertices(CrossroadEnd::Last)?,
            rooms: kept,
            ..self.clone()
        }))
    }
}

fn small_count(what: &'static str, len: usize) -> Result<u8> {
    u8::try_from(len).map_err(|_| PsdlError::FieldOverflow {
        what,
        value: len,
        max: u8::MAX as usize,
    })
}
