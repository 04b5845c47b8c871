//! PSDL error types

use core::fmt;

use crate::types::ElementType;

/// Which pool an index or value refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Vertices,
    Floats,
    Textures,
    Rooms,
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pool::Vertices => "vertex",
            Pool::Floats => "float",
            Pool::Textures => "texture",
            Pool::Rooms => "room",
        };
        f.write_str(name)
    }
}

/// Coarse classification of a [`PsdlError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The byte stream does not follow the PSDL layout. Parsing aborted.
    Format,
    /// The in-memory scene is not self-consistent. Saving aborted.
    Integrity,
    /// A structural edit the record kind does not allow.
    Unsupported,
    /// The underlying stream failed.
    Io,
}

/// PSDL read/write error
#[derive(Debug, thiserror::Error)]
pub enum PsdlError {
    /// IO error from the underlying stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid magic {0:?}, this may not be a PSDL file")]
    InvalidMagic([u8; 4]),

    #[error("incorrect target size: expected 2, got {0}")]
    InvalidTargetSize(u32),

    #[error("reader didn't consume the whole stream: {0} trailing bytes")]
    TrailingBytes(u64),

    #[error("{pool} index {index} out of range (pool size {len})")]
    IndexOutOfRange { pool: Pool, index: usize, len: usize },

    #[error("unknown attribute type {ty} (subtype {subtype}) in room {room}")]
    UnknownAttributeType { ty: u8, subtype: u8, room: usize },

    #[error("room {room} attributes overran their declared length of {declared} words")]
    AttributeOverrun { room: usize, declared: u32 },

    #[error("{pool} value {value} missing from the rebuilt pool")]
    MissingFromPool { pool: Pool, value: String },

    #[error("attribute header out of range: type {ty} (max 12), subtype {subtype} (max 7)")]
    HeaderOutOfRange { ty: u8, subtype: u16 },

    #[error("{what} value {value} does not fit its on-disk field (max {max})")]
    FieldOverflow {
        what: &'static str,
        value: usize,
        max: usize,
    },

    #[error("texture name {0:?} has characters outside Latin-1")]
    UnencodableTextureName(String),

    #[error("room has no road, divided road or walkway record")]
    NoRoadRecord,

    #[error("perimeter or AI road references room {index}, but the scene has {len} rooms")]
    DanglingRoom { index: usize, len: usize },

    #[error("malformed {kind:?} record: {reason}")]
    MalformedRecord {
        kind: ElementType,
        reason: &'static str,
    },

    #[error("scene was not opened from a path, use save_as instead")]
    NoSourcePath,

    #[error("{kind:?} records do not support {operation}")]
    Unsupported {
        kind: ElementType,
        operation: &'static str,
    },
}

impl PsdlError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            // A stream that ends mid-record is a truncated file, not a device failure.
            PsdlError::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => ErrorKind::Format,
            PsdlError::Io(_) => ErrorKind::Io,
            PsdlError::InvalidMagic(_)
            | PsdlError::InvalidTargetSize(_)
            | PsdlError::TrailingBytes(_)
            | PsdlError::IndexOutOfRange { .. }
            | PsdlError::UnknownAttributeType { .. }
            | PsdlError::AttributeOverrun { .. } => ErrorKind::Format,
            PsdlError::MissingFromPool { .. }
            | PsdlError::HeaderOutOfRange { .. }
            | PsdlError::FieldOverflow { .. }
            | PsdlError::UnencodableTextureName(_)
            | PsdlError::NoRoadRecord
            | PsdlError::DanglingRoom { .. }
            | PsdlError::MalformedRecord { .. }
            | PsdlError::NoSourcePath => ErrorKind::Integrity,
            PsdlError::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }

    pub(crate) fn unsupported(kind: ElementType, operation: &'static str) -> Self {
        PsdlError::Unsupported { kind, operation }
    }

    pub(crate) fn malformed(kind: ElementType, reason: &'static str) -> Self {
        PsdlError::MalformedRecord { kind, reason }
    }
}

pub type Result<T> = std::result::Result<T, PsdlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            PsdlError::InvalidTargetSize(4).to_string(),
            "incorrect target size: expected 2, got 4"
        );
        assert_eq!(
            PsdlError::IndexOutOfRange {
                pool: Pool::Vertices,
                index: 12,
                len: 4
            }
            .to_string(),
            "vertex index 12 out of range (pool size 4)"
        );
        assert_eq!(
            PsdlError::unsupported(ElementType::Crosswalk, "insert_vertex").to_string(),
            "Crosswalk records do not support insert_vertex"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(PsdlError::InvalidMagic(*b"XXXX").kind(), ErrorKind::Format);
        assert_eq!(PsdlError::TrailingBytes(3).kind(), ErrorKind::Format);
        assert_eq!(PsdlError::NoRoadRecord.kind(), ErrorKind::Integrity);
        assert_eq!(
            PsdlError::DanglingRoom { index: 4, len: 2 }.kind(),
            ErrorKind::Integrity
        );
        assert_eq!(
            PsdlError::HeaderOutOfRange { ty: 13, subtype: 0 }.kind(),
            ErrorKind::Integrity
        );
        assert_eq!(
            PsdlError::unsupported(ElementType::Sliver, "push_vertex").kind(),
            ErrorKind::Unsupported
        );
        let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(PsdlError::from(eof).kind(), ErrorKind::Format);
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(PsdlError::from(denied).kind(), ErrorKind::Io);
    }
}
