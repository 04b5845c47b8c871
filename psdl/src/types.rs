//! Enums, flags and small value types shared across the format

use serde::{Deserialize, Serialize};

use crate::vertex::Vertex;

/// Index of a room in [`PsdlFile::rooms`](crate::PsdlFile::rooms)
pub type RoomIndex = usize;

/// Recognised file magic tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Magic {
    #[default]
    Psd0,
    Psd1,
}

impl Magic {
    pub const fn bytes(self) -> [u8; 4] {
        match self {
            Magic::Psd0 => *b"PSD0",
            Magic::Psd1 => *b"PSD1",
        }
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Option<Self> {
        match &bytes {
            b"PSD0" => Some(Magic::Psd0),
            b"PSD1" => Some(Magic::Psd1),
            _ => None,
        }
    }
}

/// Record kind, as stored in bits 3-6 of an attribute header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ElementType {
    Road = 0,
    SidewalkStrip = 1,
    Walkway = 2,
    Sliver = 3,
    Crosswalk = 4,
    CulledTriangleFan = 5,
    TriangleFan = 6,
    FacadeBound = 7,
    DividedRoad = 8,
    Tunnel = 9,
    /// Texture cursor marker. Never stored in a room.
    Texture = 10,
    Facade = 11,
    RoofTriangleFan = 12,
}

impl ElementType {
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => ElementType::Road,
            1 => ElementType::SidewalkStrip,
            2 => ElementType::Walkway,
            3 => ElementType::Sliver,
            4 => ElementType::Crosswalk,
            5 => ElementType::CulledTriangleFan,
            6 => ElementType::TriangleFan,
            7 => ElementType::FacadeBound,
            8 => ElementType::DividedRoad,
            9 => ElementType::Tunnel,
            10 => ElementType::Texture,
            11 => ElementType::Facade,
            12 => ElementType::RoofTriangleFan,
            _ => return None,
        })
    }

    /// Number of consecutive texture pool entries the record consumes
    pub const fn required_texture_slots(self) -> u8 {
        match self {
            ElementType::Road => 3,
            ElementType::DividedRoad => 4,
            ElementType::Tunnel => 6,
            ElementType::FacadeBound | ElementType::Texture => 0,
            ElementType::SidewalkStrip
            | ElementType::Walkway
            | ElementType::Sliver
            | ElementType::Crosswalk
            | ElementType::CulledTriangleFan
            | ElementType::TriangleFan
            | ElementType::Facade
            | ElementType::RoofTriangleFan => 1,
        }
    }

    /// Added to the texture cursor before the record's run is looked up.
    ///
    /// Sidewalk strips read the sidewalk slot of the preceding road's run and
    /// crosswalks read its third slot, so both share the road's window.
    pub const fn texture_index_offset(self) -> u16 {
        match self {
            ElementType::SidewalkStrip => 1,
            ElementType::Crosswalk => 2,
            _ => 0,
        }
    }

    /// Road, divided road and walkway records
    pub const fn is_road_like(self) -> bool {
        matches!(
            self,
            ElementType::Road | ElementType::DividedRoad | ElementType::Walkway
        )
    }
}

bitflags::bitflags! {
    /// Per-room flags, stored in the post-room flags table
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RoomFlags: u8 {
        const UNKNOWN = 0b0000_0001;
        const SUBTERRANEAN = 0b0000_0010;
        const STANDARD = 0b0000_0100;
        const ROAD = 0b0000_1000;
        const INTERSECTION = 0b0001_0000;
        const SPECIAL_BOUND = 0b0010_0000;
        const WARP = 0b0100_0000;
        const INSTANCE = 0b1000_0000;
    }
}

bitflags::bitflags! {
    /// Divided road flags, stored above the 2-bit divider type
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DividerFlags: u8 {
        const CLOSED_START = 0b0000_0001;
        const CLOSED_END = 0b0000_0010;
    }
}

bitflags::bitflags! {
    /// Tunnel and wall flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TunnelFlags: u16 {
        const LEFT_SIDE = 1;
        const RIGHT_SIDE = 1 << 1;
        const IS_WALL = 1 << 2;
        const FLAT_CEILING = 1 << 3;
        const CLOSED_START_LEFT = 1 << 4;
        const CLOSED_END_LEFT = 1 << 5;
        const CLOSED_START_RIGHT = 1 << 6;
        const CLOSED_END_RIGHT = 1 << 7;
        const CURVED_CEILING = 1 << 8;
        const OFFSET_START_LEFT = 1 << 9;
        const OFFSET_END_LEFT = 1 << 10;
        const OFFSET_START_RIGHT = 1 << 11;
        const OFFSET_END_RIGHT = 1 << 12;
        const CURVED_SIDES = 1 << 13;
        const CULLED = 1 << 14;
    }
}

/// Shape of a divided road's median
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DividerType {
    #[default]
    Invisible = 0,
    Flat = 1,
    Elevated = 2,
    Wedged = 3,
}

impl DividerType {
    /// Decode the low two bits of the divider byte
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => DividerType::Invisible,
            1 => DividerType::Flat,
            2 => DividerType::Elevated,
            _ => DividerType::Wedged,
        }
    }
}

/// Slots of a road's texture run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadTextureType {
    Surface = 0,
    Sidewalk = 1,
    Lod = 2,
}

/// Slots of a divided road's divider texture run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividerTextureType {
    Top = 0,
    Side = 1,
    Cap = 2,
    SideStrips = 3,
}

/// Which end of a road a crossroad lies at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossroadEnd {
    First,
    Last,
}

/// How [`Road::delete_sidewalk`](crate::element::Road::delete_sidewalk) removes the sidewalk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidewalkRemovalMode {
    /// Collapse the outer sidewalk vertex onto the road edge
    MoveSidewalkInwards,
    /// Push the road edge out to the sidewalk's outer vertex
    MoveRoadOutwards,
}

/// Which vertices feed the bounding volume on save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsMode {
    /// Every vertex in the rebuilt pool
    #[default]
    AllVertices,
    /// Room perimeter vertices only. Faster, and usually close enough.
    PerimeterOnly,
}

/// Boundary vertex of a room, optionally shared with a neighbouring room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerimeterPoint {
    pub vertex: Vertex,
    /// Back-reference to the neighbour across this edge. Not ownership.
    pub connected_room: Option<RoomIndex>,
}

impl PerimeterPoint {
    pub fn new(vertex: Vertex, connected_room: Option<RoomIndex>) -> Self {
        Self {
            vertex,
            connected_room,
        }
    }
}
