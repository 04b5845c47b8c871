//! Low-level PSDL stream access
//!
//! All multi-byte values are little-endian.
//!
//! # File Structure
//!
//! ```text
//! magic            [u8; 4]    "PSD0" or "PSD1"
//! target_size      u32        always 2
//! vertex_count     u32        then vertex_count x (f32 x, f32 y, f32 z)
//! float_count      u32        then float_count x f32
//! texture_count+1  u32        then per texture: u8 len (0 = empty), len-1 chars, NUL
//! room_count+1     u32
//! reserved         u32
//! rooms            per room:
//!                    perimeter_count u32
//!                    attribute_words u32
//!                    perimeter_count x (u16 vertex, u16 room+1 or 0)
//!                    attribute_words x 2 bytes of attribute headers and bodies
//! padding          u8         then room_count x u8 room flags
//! padding          u8         then room_count x u8 prop rule
//! bounds           min xyz, max xyz, center xyz, radius (10 x f32)
//! ai_road_count    u32        then AI road entries
//! ```

mod header;
mod reader;
mod writer;

pub use header::AttributeHeader;
pub use reader::PsdlReader;
pub use writer::PsdlWriter;
