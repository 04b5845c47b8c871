//! Scene encoding
//!
//! Pools are rebuilt from the rooms on every save, so records that were
//! edited, added or removed since the load are written consistently.

use std::io::{Cursor, Seek, Write};

use super::PsdlFile;
use crate::ai_road::AiRoad;
use crate::binary::{AttributeHeader, PsdlWriter};
use crate::config::SaveOptions;
use crate::element::{DIVIDER_TEXTURE_SLOTS, DividedRoad, Element, TextureMarker};
use crate::error::{PsdlError, Result};
use crate::pool::{PoolBuilder, PoolIndex, Pools, is_null_run};
use crate::room::Room;
use crate::types::ElementType;
use crate::{NULL_TEXTURE_CURSOR, TARGET_SIZE};

impl PsdlFile {
    /// Save with [`SaveOptions::default`]
    pub fn save<W: Write + Seek>(&mut self, writer: W) -> Result<()> {
        self.save_with(writer, &SaveOptions::default())
    }

    /// Rebuild the pools and write the scene to `writer`.
    ///
    /// The writer must be seekable: each room's attribute length is patched
    /// in after its records are written.
    pub fn save_with<W: Write + Seek>(&mut self, writer: W, options: &SaveOptions) -> Result<()> {
        let ai_roads = self.prepare_ai_roads(options)?;
        let (pools, index) = build_pools(&self.rooms, &ai_roads, options)?;
        tracing::debug!(
            vertices = pools.vertices.len(),
            floats = pools.floats.len(),
            textures = pools.textures.len(),
            "rebuilt PSDL pools"
        );

        if options.recalculate_bounds {
            self.recalculate_bounds(options.bounds);
        }

        let mut out = PsdlWriter::new(writer);
        out.write_bytes(&self.magic.bytes())?;
        out.write_u32(TARGET_SIZE)?;
        write_pools(&mut out, &pools)?;

        out.write_u32(count_u32("room count", self.rooms.len() + 1)?)?;
        out.write_u32(0)?;
        for room in &self.rooms {
            write_room(&mut out, room, self.rooms.len(), &index)?;
        }

        out.write_u8(options.flags_padding)?;
        for room in &self.rooms {
            out.write_u8(room.flags.bits())?;
        }
        out.write_u8(options.prop_rule_padding)?;
        for room in &self.rooms {
            out.write_u8(room.prop_rule)?;
        }

        out.write_vertex(self.bounds.min)?;
        out.write_vertex(self.bounds.max)?;
        out.write_vertex(self.bounds.center)?;
        out.write_f32(self.bounds.radius)?;

        out.write_u32(count_u32("AI road count", ai_roads.len())?)?;
        for road in &ai_roads {
            road.write(&mut out, &index)?;
        }
        out.into_inner().flush()?;

        tracing::debug!(rooms = self.rooms.len(), ai_roads = ai_roads.len(), "saved PSDL scene");
        self.pools = pools;
        Ok(())
    }

    /// Encode the scene into a fresh buffer
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.save(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    fn prepare_ai_roads(&self, options: &SaveOptions) -> Result<Vec<AiRoad>> {
        if !options.filter_ai_roads {
            return Ok(self.ai_roads.clone());
        }

        let mut kept = Vec::with_capacity(self.ai_roads.len());
        for (i, stored) in self.ai_roads.iter().enumerate() {
            match stored.populated(&self.rooms)? {
                Some(road) => {
                    if road.rooms.len() != stored.rooms.len() {
                        tracing::debug!(
                            entry = i,
                            kept = road.rooms.len(),
                            stored = stored.rooms.len(),
                            "filtered AI road rooms"
                        );
                    }
                    kept.push(road);
                }
                None => tracing::warn!(entry = i, "dropping AI road with no populated rooms"),
            }
        }
        Ok(kept)
    }
}

fn build_pools(
    rooms: &[Room],
    ai_roads: &[AiRoad],
    options: &SaveOptions,
) -> Result<(Pools, PoolIndex)> {
    let mut builder = PoolBuilder::new();

    for room in rooms {
        builder.add_vertices(room.gather_vertices(true))?;
        builder.add_floats(room.gather_floats())?;
    }
    if !options.filter_ai_roads {
        for road in ai_roads {
            builder.add_vertices(road.start_crossroad.iter().chain(&road.end_crossroad).copied())?;
        }
    }

    let elements = || rooms.iter().flat_map(|room| &room.elements);
    for element in elements() {
        check_texture_run(element)?;
    }

    // Divider runs first: their base is a single byte
    for road in elements().filter_map(|e| e.as_kind::<DividedRoad>()) {
        builder.add_texture_run(&road.divider_textures, 0);
    }
    // Runs read from the cursor itself, then the kinds that read past it
    for element in elements().filter(|e| e.texture_index_offset() == 0) {
        builder.add_texture_run(element.textures(), 0);
    }
    for element in elements().filter(|e| e.texture_index_offset() > 0) {
        builder.add_texture_run(element.textures(), element.texture_index_offset());
    }

    Ok(builder.finish())
}

fn check_texture_run(element: &Element) -> Result<()> {
    let slots = element.required_texture_slots() as usize;
    let textures = element.textures();
    if slots > 0 && !is_null_run(textures) && textures.len() != slots {
        return Err(PsdlError::malformed(
            element.element_type(),
            "texture count does not match the record kind",
        ));
    }
    if let Some(road) = element.as_kind::<DividedRoad>()
        && !is_null_run(&road.divider_textures)
        && road.divider_textures.len() != DIVIDER_TEXTURE_SLOTS
    {
        return Err(PsdlError::malformed(
            ElementType::DividedRoad,
            "divider texture count must be 4",
        ));
    }
    Ok(())
}

fn write_pools<W: Write>(out: &mut PsdlWriter<W>, pools: &Pools) -> Result<()> {
    out.write_u32(count_u32("vertex count", pools.vertices.len())?)?;
    for &v in &pools.vertices {
        out.write_vertex(v)?;
    }

    out.write_u32(count_u32("float count", pools.floats.len())?)?;
    for &f in &pools.floats {
        out.write_f32(f)?;
    }

    out.write_u32(count_u32("texture count", pools.textures.len() + 1)?)?;
    for name in &pools.textures {
        out.write_texture_name(name)?;
    }
    Ok(())
}

fn write_room<W: Write + Seek>(
    out: &mut PsdlWriter<W>,
    room: &Room,
    room_count: usize,
    index: &PoolIndex,
) -> Result<()> {
    out.write_u32(count_u32("perimeter count", room.perimeter.len())?)?;
    let length_at = out.position()?;
    out.write_u32(0)?;

    for point in &room.perimeter {
        out.write_u16(index.vertex(point.vertex)?)?;
        let link = match point.connected_room {
            None => 0,
            Some(target) if target < room_count => {
                u16::try_from(target + 1).map_err(|_| PsdlError::FieldOverflow {
                    what: "perimeter room link",
                    value: target + 1,
                    max: u16::MAX as usize,
                })?
            }
            Some(target) => {
                return Err(PsdlError::DanglingRoom {
                    index: target,
                    len: room_count,
                });
            }
        };
        out.write_u16(link)?;
    }

    let start = out.position()?;
    let mut active: Option<u16> = None;
    let last = room.elements.len().saturating_sub(1);
    for (i, element) in room.elements.iter().enumerate() {
        if element.required_texture_slots() > 0 {
            let needed = texture_cursor(element, index)?;
            if active != Some(needed) {
                TextureMarker::new(needed).write(out)?;
                active = Some(needed);
            }
        }

        let header = AttributeHeader::new(
            i == last,
            element.element_type() as u8,
            u16::from(element.subtype()),
        )?;
        out.write_attribute_header(header)?;
        element.write(out, index)?;
    }
    let end = out.position()?;

    let words = u32::try_from((end - start) / 2).map_err(|_| PsdlError::FieldOverflow {
        what: "room attribute length",
        value: ((end - start) / 2) as usize,
        max: u32::MAX as usize,
    })?;
    out.backpatch_u32(length_at, words)?;
    Ok(())
}

/// Cursor a record needs, or the null cursor for a record without textures
fn texture_cursor(element: &Element, index: &PoolIndex) -> Result<u16> {
    let Some(cursor) = index.texture_cursor(element.textures(), element.texture_index_offset())?
    else {
        return Ok(NULL_TEXTURE_CURSOR);
    };
    match u16::try_from(cursor) {
        Ok(cursor) if cursor != NULL_TEXTURE_CURSOR => Ok(cursor),
        _ => Err(PsdlError::FieldOverflow {
            what: "texture cursor",
            value: cursor,
            max: 8 * 256 - 2,
        }),
    }
}

fn count_u32(what: &'static str, count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| PsdlError::FieldOverflow {
        what,
        value: count,
        max: u32::MAX as usize,
    })
}
