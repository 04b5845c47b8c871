//! 16-bit attribute header packing

use crate::error::{PsdlError, Result};
use crate::{MAX_SUBTYPE, MAX_TYPE};

/// Header preceding every record in a room's attribute run.
///
/// Bit layout: `[unused:8][last:1][type:4][subtype:3]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeHeader {
    /// Set on the final record of a room
    pub last: bool,
    pub ty: u8,
    /// Inline count; 0 means an explicit `u16` count follows
    pub subtype: u8,
}

impl AttributeHeader {
    /// Build a header, rejecting values that would not survive packing
    pub fn new(last: bool, ty: u8, subtype: u16) -> Result<Self> {
        if ty > MAX_TYPE || subtype > MAX_SUBTYPE as u16 {
            return Err(PsdlError::HeaderOutOfRange { ty, subtype });
        }
        Ok(Self {
            last,
            ty,
            subtype: subtype as u8,
        })
    }

    pub fn from_u16(raw: u16) -> Self {
        Self {
            last: raw & 0x80 != 0,
            ty: ((raw >> 3) & 0x0F) as u8,
            subtype: (raw & 0x07) as u8,
        }
    }

    pub fn to_u16(self) -> u16 {
        (u16::from(self.last) << 7) | (u16::from(self.ty) << 3) | u16::from(self.subtype)
    }
}
