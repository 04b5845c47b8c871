//! Room records
//!
//! Every record kind is its own struct implementing [`PsdlElement`]. A room
//! stores them as [`Element`], a closed enum dispatched with `match` on the
//! attribute header's type tag.
//!
//! Records hold resolved values (vertices, floats, texture names), never pool
//! indices. Texture names are assigned by the loader from the active texture
//! cursor, so `read` implementations leave them empty.

mod crosswalk;
mod divided_road;
mod facade;
mod fan;
mod marker;
mod road;
mod sidewalk;
mod sliver;
mod tunnel;
mod walkway;


pub use crosswalk::Crosswalk;
pub use divided_road::{DIVIDER_TEXTURE_SLOTS, DividedRoad};
pub use facade::{Facade, FacadeBound};
pub use fan::{CulledTriangleFan, RoofTriangleFan, TriangleFan};
pub use marker::TextureMarker;
pub use road::Road;
pub use sidewalk::{SidewalkCap, SidewalkStrip};
pub use sliver::Sliver;
pub use tunnel::{Junction, Tunnel};
pub use walkway::Walkway;

use std::io::{self, Read, Write};

use crate::MAX_SUBTYPE;
use crate::binary::{PsdlReader, PsdlWriter};
use crate::error::{Pool, PsdlError, Result};
use crate::pool::{PoolIndex, Pools};
use crate::types::ElementType;
use crate::vertex::Vertex;

/// Binary contract shared by every record kind
pub trait PsdlElement: Sized {
    const TYPE: ElementType;

    /// Header subtype. 0 means an explicit `u16` count precedes the body.
    fn subtype(&self) -> u8;

    /// Read the record body that follows an attribute header
    fn read<R: Read>(reader: &mut PsdlReader<R>, subtype: u8, pools: &Pools) -> Result<Self>;

    /// Write the record body. Pool indices come from `index`.
    fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()>;

    /// Every vertex the record references, in on-disk order
    fn vertices(&self) -> &[Vertex];

    /// Every float-pool value the record references
    fn floats(&self) -> Vec<f32> {
        Vec::new()
    }

    fn textures(&self) -> &[String];

    fn set_textures(&mut self, textures: Vec<String>);

    fn from_element(element: &Element) -> Option<&Self>;

    fn from_element_mut(element: &mut Element) -> Option<&mut Self>;

    fn into_element(self) -> Element;
}

/// Per-vertex access for records that carry geometry.
///
/// Replacing a vertex is always allowed. Inserting or removing one is only
/// allowed where the layout has no fixed arity or row structure; every other
/// kind reports [`PsdlError::Unsupported`].
pub trait Geometric: PsdlElement {
    fn vertices_mut(&mut self) -> &mut [Vertex];

    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    fn vertex(&self, index: usize) -> Option<Vertex> {
        self.vertices().get(index).copied()
    }

    fn set_vertex(&mut self, index: usize, vertex: Vertex) -> Result<()> {
        let len = self.vertex_count();
        let slot = self
            .vertices_mut()
            .get_mut(index)
            .ok_or(PsdlError::IndexOutOfRange {
                pool: Pool::Vertices,
                index,
                len,
            })?;
        *slot = vertex;
        Ok(())
    }

    fn insert_vertex(&mut self, _index: usize, _vertex: Vertex) -> Result<()> {
        Err(PsdlError::unsupported(Self::TYPE, "insert_vertex"))
    }

    fn remove_vertex(&mut self, _index: usize) -> Result<Vertex> {
        Err(PsdlError::unsupported(Self::TYPE, "remove_vertex"))
    }

    fn push_vertex(&mut self, _vertex: Vertex) -> Result<()> {
        Err(PsdlError::unsupported(Self::TYPE, "push_vertex"))
    }
}

/// Records laid out as consecutive rows of a fixed number of vertices
pub trait Rows: Geometric {
    /// Vertices per row
    const ROW_BREADTH: usize;

    fn row_storage(&mut self) -> &mut Vec<Vertex>;

    fn row_count(&self) -> usize {
        self.vertices().len() / Self::ROW_BREADTH
    }

    fn row(&self, row: usize) -> Option<&[Vertex]> {
        self.vertices().chunks_exact(Self::ROW_BREADTH).nth(row)
    }

    fn set_row(&mut self, row: usize, vertices: &[Vertex]) -> Result<()> {
        check_row::<Self>(vertices)?;
        let start = row * Self::ROW_BREADTH;
        let len = self.vertices().len();
        let slots = self
            .row_storage()
            .get_mut(start..start + Self::ROW_BREADTH)
            .ok_or(PsdlError::IndexOutOfRange {
                pool: Pool::Vertices,
                index: start,
                len,
            })?;
        slots.copy_from_slice(vertices);
        Ok(())
    }

    fn push_row(&mut self, vertices: &[Vertex]) -> Result<()> {
        check_row::<Self>(vertices)?;
        self.row_storage().extend_from_slice(vertices);
        Ok(())
    }

    /// Average of the row's vertices
    fn row_center(&self, row: usize) -> Option<Vertex> {
        let row = self.row(row)?;
        let sum = row.iter().fold(Vertex::ZERO, |acc, &v| acc + v);
        Some(sum / row.len() as f32)
    }
}

fn check_row<T: Rows>(vertices: &[Vertex]) -> Result<()> {
    if vertices.len() != T::ROW_BREADTH {
        return Err(PsdlError::malformed(
            T::TYPE,
            "row length does not match the record's row breadth",
        ));
    }
    Ok(())
}

/// Rows must tile the vertex list exactly before a row record can be written
pub(crate) fn check_rows<T: Rows>(element: &T) -> Result<()> {
    if element.vertices().len() % T::ROW_BREADTH != 0 {
        return Err(PsdlError::malformed(
            T::TYPE,
            "vertex count is not a whole number of rows",
        ));
    }
    Ok(())
}

/// Header subtype for a natural count, falling back to 0 when it overflows 3 bits
pub(crate) fn inline_count(count: usize) -> u8 {
    if count > MAX_SUBTYPE as usize {
        0
    } else {
        count as u8
    }
}

/// Count carried by the header subtype, or the explicit `u16` when it is 0
pub(crate) fn read_count<R: Read>(reader: &mut PsdlReader<R>, subtype: u8) -> io::Result<usize> {
    if subtype == 0 {
        Ok(reader.read_u16()? as usize)
    } else {
        Ok(subtype as usize)
    }
}

/// Inverse of [`read_count`]
pub(crate) fn write_count<W: Write>(
    writer: &mut PsdlWriter<W>,
    subtype: u8,
    what: &'static str,
    count: usize,
) -> Result<()> {
    if subtype == 0 {
        writer.write_count_u16(what, count)?;
    }
    Ok(())
}

pub(crate) fn read_vertices<R: Read>(
    reader: &mut PsdlReader<R>,
    pools: &Pools,
    count: usize,
) -> Result<Vec<Vertex>> {
    (0..count)
        .map(|_| pools.vertex(reader.read_u16()?))
        .collect()
}

pub(crate) fn read_vertex_array<R: Read, const N: usize>(
    reader: &mut PsdlReader<R>,
    pools: &Pools,
) -> Result<[Vertex; N]> {
    let mut out = [Vertex::ZERO; N];
    for slot in &mut out {
        *slot = pools.vertex(reader.read_u16()?)?;
    }
    Ok(out)
}

pub(crate) fn write_vertices<W: Write>(
    writer: &mut PsdlWriter<W>,
    index: &PoolIndex,
    vertices: &[Vertex],
) -> Result<()> {
    for &v in vertices {
        writer.write_u16(index.vertex(v)?)?;
    }
    Ok(())
}

macro_rules! dispatch {
    ($element:expr, $inner:ident => $body:expr) => {
        match $element {
            Element::Road($inner) => $body,
            Element::SidewalkStrip($inner) => $body,
            Element::Walkway($inner) => $body,
            Element::Sliver($inner) => $body,
            Element::Crosswalk($inner) => $body,
            Element::CulledTriangleFan($inner) => $body,
            Element::TriangleFan($inner) => $body,
            Element::FacadeBound($inner) => $body,
            Element::DividedRoad($inner) => $body,
            Element::Tunnel($inner) => $body,
            Element::Facade($inner) => $body,
            Element::RoofTriangleFan($inner) => $body,
        }
    };
}

/// Any record that can be stored in a room
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Road(Road),
    SidewalkStrip(SidewalkStrip),
    Walkway(Walkway),
    Sliver(Sliver),
    Crosswalk(Crosswalk),
    CulledTriangleFan(CulledTriangleFan),
    TriangleFan(TriangleFan),
    FacadeBound(FacadeBound),
    DividedRoad(DividedRoad),
    Tunnel(Tunnel),
    Facade(Facade),
    RoofTriangleFan(RoofTriangleFan),
}

impl Element {
    /// Read the body of a record of kind `ty`
    pub fn read<R: Read>(
        ty: ElementType,
        subtype: u8,
        reader: &mut PsdlReader<R>,
        pools: &Pools,
    ) -> Result<Self> {
        Ok(match ty {
            ElementType::Road => Road::read(reader, subtype, pools)?.into_element(),
            ElementType::SidewalkStrip => {
                SidewalkStrip::read(reader, subtype, pools)?.into_element()
            }
            ElementType::Walkway => Walkway::read(reader, subtype, pools)?.into_element(),
            ElementType::Sliver => Sliver::read(reader, subtype, pools)?.into_element(),
            ElementType::Crosswalk => Crosswalk::read(reader, subtype, pools)?.into_element(),
            ElementType::CulledTriangleFan => {
                CulledTriangleFan::read(reader, subtype, pools)?.into_element()
            }
            ElementType::TriangleFan => TriangleFan::read(reader, subtype, pools)?.into_element(),
            ElementType::FacadeBound => FacadeBound::read(reader, subtype, pools)?.into_element(),
            ElementType::DividedRoad => DividedRoad::read(reader, subtype, pools)?.into_element(),
            ElementType::Tunnel => Tunnel::read(reader, subtype, pools)?.into_element(),
            ElementType::Facade => Facade::read(reader, subtype, pools)?.into_element(),
            ElementType::RoofTriangleFan => {
                RoofTriangleFan::read(reader, subtype, pools)?.into_element()
            }
            ElementType::Texture => {
                return Err(PsdlError::malformed(
                    ElementType::Texture,
                    "texture markers are not room records",
                ));
            }
        })
    }

    pub fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()> {
        dispatch!(self, e => e.write(writer, index))
    }

    pub fn element_type(&self) -> ElementType {
        fn ty<T: PsdlElement>(_: &T) -> ElementType {
            T::TYPE
        }
        dispatch!(self, e => ty(e))
    }

    pub fn subtype(&self) -> u8 {
        dispatch!(self, e => e.subtype())
    }

    pub fn vertices(&self) -> &[Vertex] {
        dispatch!(self, e => e.vertices())
    }

    pub fn floats(&self) -> Vec<f32> {
        dispatch!(self, e => e.floats())
    }

    pub fn textures(&self) -> &[String] {
        dispatch!(self, e => e.textures())
    }

    pub fn set_textures(&mut self, textures: Vec<String>) {
        dispatch!(self, e => e.set_textures(textures))
    }

    pub fn required_texture_slots(&self) -> u8 {
        self.element_type().required_texture_slots()
    }

    pub fn texture_index_offset(&self) -> u16 {
        self.element_type().texture_index_offset()
    }

    pub fn is_road_like(&self) -> bool {
        self.element_type().is_road_like()
    }

    /// Downcast to a concrete record kind
    pub fn as_kind<T: PsdlElement>(&self) -> Option<&T> {
        T::from_element(self)
    }

    pub fn as_kind_mut<T: PsdlElement>(&mut self) -> Option<&mut T> {
        T::from_element_mut(self)
    }
}

/// Implements the enum plumbing of [`PsdlElement`] for a record struct
macro_rules! element_variant {
    ($variant:ident) => {
        fn from_element(element: &$crate::element::Element) -> Option<&Self> {
            match element {
                $crate::element::Element::$variant(e) => Some(e),
                _ => None,
            }
        }

        fn from_element_mut(element: &mut $crate::element::Element) -> Option<&mut Self> {
            match element {
                $crate::element::Element::$variant(e) => Some(e),
                _ => None,
            }
        }

        fn into_element(self) -> $crate::element::Element {
            $crate::element::Element::$variant(self)
        }
    };
}

pub(crate) use element_variant;

macro_rules! impl_from_kind {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Element {
                fn from(e: $variant) -> Self {
                    Element::$variant(e)
                }
            }
        )*
    };
}

impl_from_kind!(
    Road,
    SidewalkStrip,
    Walkway,
    Sliver,
    Crosswalk,
    CulledTriangleFan,
    TriangleFan,
    FacadeBound,
    DividedRoad,
    Tunnel,
    Facade,
    RoofTriangleFan,
);
