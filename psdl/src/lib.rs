//! PSDL: binary scene format for city road networks
//!
//! This crate reads and writes PSDL files, a room-based street geometry
//! format for racing game cities. A file holds three shared
//! pools (vertices, floats, texture names), a list of rooms made of typed
//! records, per-room flags, a bounding volume and an AI road table.
//!
//! # Key Features
//!
//! - **Resolved records**: records hold vertices and texture names, never
//!   pool indices, so rooms can be edited freely
//! - **Pool rebuild on save**: pools are regenerated and deduplicated from
//!   the rooms every time the scene is written
//! - **Strict parsing**: trailing bytes, bad indices and unknown record
//!   types are format errors, never silently skipped
//!
//! # Usage
//!
//! ```ignore
//! use psdl::{PsdlFile, Road};
//!
//! let mut scene = PsdlFile::open("city.psdl")?;
//! for room in &scene.rooms {
//!     if let Some(road) = room.find_first::<Road>() {
//!         println!("road with {} rows", road.row_count());
//!     }
//! }
//! scene.resave()?;
//! ```

pub mod ai_road;
pub mod binary;
mod bounds;
pub mod config;
pub mod element;
pub mod error;
mod file;
pub mod pool;
pub mod room;
pub mod types;
pub mod vertex;

pub use ai_road::AiRoad;
pub use bounds::Bounds;
pub use config::SaveOptions;
pub use element::{
    Crosswalk, CulledTriangleFan, DividedRoad, Element, Facade, FacadeBound, Geometric, Junction,
    PsdlElement, Road, RoofTriangleFan, Rows, SidewalkCap, SidewalkStrip, Sliver, TextureMarker,
    TriangleFan, Tunnel, Walkway,
};
pub use error::{ErrorKind, PsdlError, Result};
pub use file::PsdlFile;
pub use room::Room;
pub use types::{
    BoundsMode, CrossroadEnd, DividerFlags, DividerTextureType, DividerType, ElementType, Magic,
    PerimeterPoint, RoadTextureType, RoomFlags, RoomIndex, SidewalkRemovalMode, TunnelFlags,
};
pub use vertex::Vertex;

// =============================================================================
// Constants
// =============================================================================

/// Value of the header field following the magic
pub const TARGET_SIZE: u32 = 2;

/// Largest record type tag
pub const MAX_TYPE: u8 = 12;

/// Largest value that fits the 3-bit header subtype
pub const MAX_SUBTYPE: u8 = 7;

/// Texture cursor meaning "records that follow have no textures"
pub const NULL_TEXTURE_CURSOR: u16 = 0xFFFF;
