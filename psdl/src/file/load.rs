//! Scene decoding

use std::io::Read;

use super::PsdlFile;
use crate::ai_road::AiRoad;
use crate::binary::PsdlReader;
use crate::bounds::Bounds;
use crate::element::{Element, TextureMarker};
use crate::error::{Pool, PsdlError, Result};
use crate::pool::Pools;
use crate::room::Room;
use crate::types::{ElementType, Magic, PerimeterPoint, RoomFlags};
use crate::TARGET_SIZE;

/// Perimeter link waiting for every room to exist
struct PendingLink {
    room: usize,
    point: usize,
    stored: u16,
}

impl PsdlFile {
    /// Parse a whole scene from `reader`.
    ///
    /// The stream must end exactly where the AI road table does.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        let mut reader = PsdlReader::new(reader);

        let magic_bytes = reader.read_magic()?;
        let magic = Magic::from_bytes(magic_bytes).ok_or(PsdlError::InvalidMagic(magic_bytes))?;
        let target_size = reader.read_u32()?;
        if target_size != TARGET_SIZE {
            return Err(PsdlError::InvalidTargetSize(target_size));
        }

        let pools = read_pools(&mut reader)?;
        tracing::debug!(
            vertices = pools.vertices.len(),
            floats = pools.floats.len(),
            textures = pools.textures.len(),
            "read PSDL pools"
        );

        let room_count = reader.read_u32()?.saturating_sub(1) as usize;
        let _reserved = reader.read_u32()?;

        // Counts are untrusted: grow as records arrive
        let mut rooms = Vec::new();
        let mut links = Vec::new();
        let mut cursor = 0u16;
        for index in 0..room_count {
            let room = read_room(&mut reader, &pools, index, &mut cursor, &mut links)?;
            tracing::trace!(room = index, records = room.elements.len(), "read room");
            rooms.push(room);
        }

        for link in links {
            if link.stored == 0 {
                continue;
            }
            let target = link.stored as usize - 1;
            if target >= room_count {
                return Err(PsdlError::IndexOutOfRange {
                    pool: Pool::Rooms,
                    index: target,
                    len: room_count,
                });
            }
            rooms[link.room].perimeter[link.point].connected_room = Some(target);
        }

        reader.skip(1)?;
        for room in &mut rooms {
            room.flags = RoomFlags::from_bits_retain(reader.read_u8()?);
        }
        reader.skip(1)?;
        for room in &mut rooms {
            room.prop_rule = reader.read_u8()?;
        }

        let bounds = Bounds {
            min: reader.read_vertex()?,
            max: reader.read_vertex()?,
            center: reader.read_vertex()?,
            radius: reader.read_f32()?,
        };

        let ai_road_count = reader.read_u32()?;
        let mut ai_roads = Vec::new();
        for _ in 0..ai_road_count {
            ai_roads.push(AiRoad::read(&mut reader, &pools, room_count)?);
        }

        let trailing = reader.remaining()?;
        if trailing != 0 {
            return Err(PsdlError::TrailingBytes(trailing));
        }

        tracing::debug!(
            rooms = rooms.len(),
            ai_roads = ai_roads.len(),
            "loaded PSDL scene"
        );

        Ok(Self {
            magic,
            rooms,
            ai_roads,
            bounds,
            pools,
            source_path: None,
        })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::load(bytes)
    }
}

fn read_pools<R: Read>(reader: &mut PsdlReader<R>) -> Result<Pools> {
    let mut pools = Pools::default();

    let vertex_count = reader.read_u32()?;
    for _ in 0..vertex_count {
        pools.vertices.push(reader.read_vertex()?);
    }

    let float_count = reader.read_u32()?;
    for _ in 0..float_count {
        pools.floats.push(reader.read_f32()?);
    }

    let texture_count = reader.read_u32()?.saturating_sub(1);
    for _ in 0..texture_count {
        pools.textures.push(reader.read_texture_name()?);
    }

    Ok(pools)
}

fn read_room<R: Read>(
    reader: &mut PsdlReader<R>,
    pools: &Pools,
    index: usize,
    cursor: &mut u16,
    links: &mut Vec<PendingLink>,
) -> Result<Room> {
    let perimeter_count = reader.read_u32()? as usize;
    let declared = reader.read_u32()?;

    let mut perimeter = Vec::new();
    for point in 0..perimeter_count {
        let vertex = pools.vertex(reader.read_u16()?)?;
        links.push(PendingLink {
            room: index,
            point,
            stored: reader.read_u16()?,
        });
        perimeter.push(PerimeterPoint::new(vertex, None));
    }

    let end = reader.position() + u64::from(declared) * 2;
    let mut elements = Vec::new();
    while reader.position() < end {
        let header = reader.read_attribute_header()?;
        let Some(ty) = ElementType::from_u8(header.ty) else {
            return Err(PsdlError::UnknownAttributeType {
                ty: header.ty,
                subtype: header.subtype,
                room: index,
            });
        };

        if ty == ElementType::Texture {
            *cursor = TextureMarker::read(reader, header.subtype)?.cursor;
        } else {
            let mut element = Element::read(ty, header.subtype, reader, pools)?;
            assign_textures(&mut element, pools, *cursor)?;
            elements.push(element);
        }

        if reader.position() > end {
            return Err(PsdlError::AttributeOverrun {
                room: index,
                declared,
            });
        }
    }

    Ok(Room::new(elements, perimeter))
}

fn assign_textures(element: &mut Element, pools: &Pools, cursor: u16) -> Result<()> {
    let slots = element.required_texture_slots() as usize;
    if slots == 0 {
        return Ok(());
    }
    let textures = if cursor == TextureMarker::NULL.cursor {
        vec![String::new(); slots]
    } else {
        let start = cursor as usize + element.texture_index_offset() as usize;
        pools.texture_run(start, slots)?
    };
    element.set_textures(textures);
    Ok(())
}
