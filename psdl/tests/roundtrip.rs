//! End-to-end tests against hand-assembled PSDL files

use byteorder::{LittleEndian, WriteBytesExt};
use psdl::{
    ElementType, ErrorKind, PsdlError, PsdlFile, Road, RoomFlags, SaveOptions, Vertex,
    error::Pool,
};

const MARKER_AT_ZERO: [u16; 2] = [0x0050, 1];
const NULL_MARKER: [u16; 2] = [0x0050, 0];
/// Last record, type 0 (road), one row inline, then four vertex indices
const ROAD: [u16; 5] = [0x0081, 0, 1, 2, 3];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct RoomSpec {
    links: [u16; 4],
    attributes: Vec<u16>,
    /// Attribute length in words, when it should not match `attributes`
    declared: Option<u32>,
}

impl RoomSpec {
    fn road(marker: [u16; 2]) -> Self {
        Self {
            links: [0; 4],
            attributes: marker.iter().chain(&ROAD).copied().collect(),
            declared: None,
        }
    }
}

struct Synthetic {
    magic: [u8; 4],
    target_size: u32,
    textures: Vec<&'static str>,
    rooms: Vec<RoomSpec>,
}

impl Default for Synthetic {
    fn default() -> Self {
        Self {
            magic: *b"PSD0",
            target_size: 2,
            textures: vec!["road1", "road1_walk", "road1_lod"],
            rooms: vec![RoomSpec::road(MARKER_AT_ZERO)],
        }
    }
}

impl Synthetic {
    fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.magic);
        out.write_u32::<LittleEndian>(self.target_size).unwrap();

        // Unit square on the ground plane
        let square = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 1.0]];
        out.write_u32::<LittleEndian>(square.len() as u32).unwrap();
        for v in square.iter().flatten() {
            out.write_f32::<LittleEndian>(*v).unwrap();
        }
        out.write_u32::<LittleEndian>(0).unwrap();

        out.write_u32::<LittleEndian>(self.textures.len() as u32 + 1).unwrap();
        for name in &self.textures {
            out.push(name.len() as u8 + 1);
            out.extend_from_slice(name.as_bytes());
            out.push(0);
        }

        out.write_u32::<LittleEndian>(self.rooms.len() as u32 + 1).unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();
        for room in &self.rooms {
            out.write_u32::<LittleEndian>(4).unwrap();
            let words = room.declared.unwrap_or(room.attributes.len() as u32);
            out.write_u32::<LittleEndian>(words).unwrap();
            for (vertex, link) in room.links.iter().enumerate() {
                out.write_u16::<LittleEndian>(vertex as u16).unwrap();
                out.write_u16::<LittleEndian>(*link).unwrap();
            }
            for word in &room.attributes {
                out.write_u16::<LittleEndian>(*word).unwrap();
            }
        }

        out.push(0);
        out.extend(std::iter::repeat_n(RoomFlags::STANDARD.bits(), self.rooms.len()));
        out.push(0xCD);
        out.extend(std::iter::repeat_n(0, self.rooms.len()));

        // Degenerate bounds, then an empty AI road table
        out.extend_from_slice(&[0; 40]);
        out.write_u32::<LittleEndian>(0).unwrap();
        out
    }
}

#[test]
fn test_minimal_scene() {
    init_tracing();
    let scene = PsdlFile::from_bytes(&Synthetic::default().bytes()).unwrap();

    assert_eq!(scene.rooms.len(), 1);
    let room = &scene.rooms[0];
    assert_eq!(room.elements.len(), 1);
    assert_eq!(room.flags, RoomFlags::STANDARD);
    assert_eq!(room.prop_rule, 0);

    let record = &room.elements[0];
    assert_eq!(record.element_type(), ElementType::Road);
    assert_eq!(record.subtype(), 1);
    assert!(room.verify_for_population());

    let road = room.find_first::<Road>().unwrap();
    assert_eq!(road.vertices[3], Vertex::new(1.0, 0.0, 1.0));
    assert_eq!(road.textures, ["road1", "road1_walk", "road1_lod"]);
    assert_eq!(room.perimeter.len(), 4);
    assert!(room.perimeter.iter().all(|p| p.connected_room.is_none()));
}

#[test]
fn test_road_needs_three_textures() {
    let file = Synthetic {
        textures: vec!["road1"],
        ..Default::default()
    };
    let err = PsdlFile::from_bytes(&file.bytes()).unwrap_err();
    assert!(matches!(
        err,
        PsdlError::IndexOutOfRange {
            pool: Pool::Textures,
            index: 2,
            len: 1
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_null_cursor_yields_empty_textures() {
    let file = Synthetic {
        textures: Vec::new(),
        rooms: vec![RoomSpec::road(NULL_MARKER)],
        ..Default::default()
    };
    let scene = PsdlFile::from_bytes(&file.bytes()).unwrap();
    let room = &scene.rooms[0];
    assert_eq!(room.elements[0].textures(), ["", "", ""]);
    assert!(!room.verify_for_population());
}

#[test]
fn test_cursor_carries_into_next_room() {
    let second = RoomSpec {
        links: [0; 4],
        attributes: ROAD.to_vec(),
        declared: None,
    };
    let file = Synthetic {
        rooms: vec![RoomSpec::road(MARKER_AT_ZERO), second],
        ..Default::default()
    };
    let scene = PsdlFile::from_bytes(&file.bytes()).unwrap();
    assert_eq!(scene.rooms[1].elements[0].textures(), scene.rooms[0].elements[0].textures());
}

#[test]
fn test_forward_room_links() {
    let mut first = RoomSpec::road(MARKER_AT_ZERO);
    first.links = [2, 0, 0, 0];
    let mut second = RoomSpec::road(MARKER_AT_ZERO);
    second.links = [0, 0, 1, 0];
    let file = Synthetic {
        rooms: vec![first, second],
        ..Default::default()
    };

    let scene = PsdlFile::from_bytes(&file.bytes()).unwrap();
    assert_eq!(scene.rooms[0].perimeter[0].connected_room, Some(1));
    assert_eq!(scene.rooms[1].perimeter[2].connected_room, Some(0));
    assert_eq!(scene.connected_rooms(1), vec![1, 0]);
}

#[test]
fn test_header_errors() {
    let bad_magic = Synthetic {
        magic: *b"PSDX",
        ..Default::default()
    };
    let err = PsdlFile::from_bytes(&bad_magic.bytes()).unwrap_err();
    assert!(matches!(err, PsdlError::InvalidMagic(m) if &m == b"PSDX"));
    assert_eq!(err.kind(), ErrorKind::Format);

    let bad_size = Synthetic {
        target_size: 4,
        ..Default::default()
    };
    assert!(matches!(
        PsdlFile::from_bytes(&bad_size.bytes()),
        Err(PsdlError::InvalidTargetSize(4))
    ));

    let psd1 = Synthetic {
        magic: *b"PSD1",
        ..Default::default()
    };
    assert_eq!(
        PsdlFile::from_bytes(&psd1.bytes()).unwrap().magic,
        psdl::Magic::Psd1
    );
}

#[test]
fn test_trailing_bytes() {
    let mut bytes = Synthetic::default().bytes();
    bytes.extend_from_slice(&[1, 2, 3]);
    let err = PsdlFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, PsdlError::TrailingBytes(3)));
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_truncated_file() {
    let bytes = Synthetic::default().bytes();
    let err = PsdlFile::from_bytes(&bytes[..bytes.len() - 2]).unwrap_err();
    assert!(matches!(err, PsdlError::Io(_)));
    assert_eq!(err.kind(), ErrorKind::Format);
}

/// Header and empty pools, then `tail` in place of the room section
fn declared_counts(vertex_count: u32, tail: &[u32]) -> Vec<u8> {
    let mut out = b"PSD0".to_vec();
    out.write_u32::<LittleEndian>(2).unwrap();
    out.write_u32::<LittleEndian>(vertex_count).unwrap();
    if vertex_count == 0 {
        // float count, then a texture count of n + 1 with no names
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(1).unwrap();
    }
    for word in tail {
        out.write_u32::<LittleEndian>(*word).unwrap();
    }
    out
}

#[test]
fn test_huge_declared_counts_fail_cleanly() {
    let cases = [
        ("rooms", declared_counts(0, &[u32::MAX, 0])),
        ("perimeter", declared_counts(0, &[2, 0, u32::MAX, 0])),
        ("vertices", declared_counts(u32::MAX, &[])),
    ];
    for (what, bytes) in cases {
        let err = PsdlFile::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, PsdlError::Io(_)), "{what}: {err}");
        assert_eq!(err.kind(), ErrorKind::Format, "{what}");
    }
}

#[test]
fn test_unknown_attribute_type() {
    let mut room = RoomSpec::road(MARKER_AT_ZERO);
    // Type 13, subtype 2
    room.attributes.insert(2, (13 << 3) | 2);
    let file = Synthetic {
        rooms: vec![room],
        ..Default::default()
    };
    assert!(matches!(
        PsdlFile::from_bytes(&file.bytes()),
        Err(PsdlError::UnknownAttributeType {
            ty: 13,
            subtype: 2,
            room: 0
        })
    ));
}

#[test]
fn test_attribute_overrun() {
    let mut room = RoomSpec::road(MARKER_AT_ZERO);
    room.declared = Some(3);
    let file = Synthetic {
        rooms: vec![room],
        ..Default::default()
    };
    assert!(matches!(
        PsdlFile::from_bytes(&file.bytes()),
        Err(PsdlError::AttributeOverrun {
            room: 0,
            declared: 3
        })
    ));
}

#[test]
fn test_resave_without_bounds_is_byte_identical() {
    init_tracing();
    let original = Synthetic::default().bytes();
    let mut scene = PsdlFile::from_bytes(&original).unwrap();

    let options = SaveOptions {
        recalculate_bounds: false,
        ..Default::default()
    };
    let mut buffer = std::io::Cursor::new(Vec::new());
    scene.save_with(&mut buffer, &options).unwrap();
    assert_eq!(buffer.into_inner(), original);
}

#[test]
fn test_save_recomputes_bounds() {
    let mut scene = PsdlFile::from_bytes(&Synthetic::default().bytes()).unwrap();
    let reloaded = PsdlFile::from_bytes(&scene.to_bytes().unwrap()).unwrap();

    assert_eq!(reloaded.rooms, scene.rooms);
    assert_eq!(reloaded.bounds.min, Vertex::new(0.0, 0.0, 0.0));
    assert_eq!(reloaded.bounds.max, Vertex::new(1.0, 0.0, 1.0));
    assert_eq!(reloaded.bounds.center, Vertex::new(0.5, 0.0, 0.5));
    assert_eq!(reloaded.bounds.radius, 0.5);
}

#[test]
fn test_edits_survive_a_save() {
    let mut scene = PsdlFile::from_bytes(&Synthetic::default().bytes()).unwrap();
    {
        let road = scene.rooms[0].find_first_mut::<Road>().unwrap();
        road.vertices[0] = Vertex::new(-5.0, 1.0, 0.0);
        road.textures[0] = "asphalt".to_owned();
    }
    scene.rooms[0].prop_rule = 7;

    let reloaded = PsdlFile::from_bytes(&scene.to_bytes().unwrap()).unwrap();
    let road = reloaded.rooms[0].find_first::<Road>().unwrap();
    assert_eq!(road.vertices[0], Vertex::new(-5.0, 1.0, 0.0));
    assert_eq!(road.textures, ["asphalt", "road1_walk", "road1_lod"]);
    assert_eq!(reloaded.rooms[0].prop_rule, 7);
    assert!(!reloaded.texture_pool().contains(&"road1".to_owned()));
}

#[test]
fn test_open_and_resave() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("city.psdl");
    std::fs::write(&path, Synthetic::default().bytes()).unwrap();

    let mut scene = PsdlFile::open(&path).unwrap();
    assert_eq!(scene.source_path(), Some(path.as_path()));
    scene.rooms[0].flags |= RoomFlags::ROAD;
    scene.resave().unwrap();

    let reopened = PsdlFile::open(&path).unwrap();
    assert_eq!(reopened.rooms[0].flags, RoomFlags::STANDARD | RoomFlags::ROAD);

    let copy = dir.path().join("copy.psdl");
    let mut fresh = PsdlFile::from_bytes(&std::fs::read(&path).unwrap()).unwrap();
    assert!(matches!(fresh.resave(), Err(PsdlError::NoSourcePath)));
    fresh.save_as(&copy).unwrap();
    assert_eq!(std::fs::read(&copy).unwrap(), std::fs::read(&path).unwrap());
}
