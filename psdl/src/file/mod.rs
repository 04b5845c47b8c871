//! Scene container
//!
//! [`PsdlFile`] owns the rooms, the AI road table, the bounds and the value
//! pools. Loading resolves every pool index into a value; saving rebuilds the
//! pools from the rooms and writes indices back out.

mod load;
mod save;


use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use hashbrown::HashSet;

use crate::ai_road::AiRoad;
use crate::bounds::Bounds;
use crate::error::{PsdlError, Result};
use crate::pool::Pools;
use crate::room::Room;
use crate::types::{BoundsMode, Magic, RoomIndex};
use crate::vertex::Vertex;

/// A parsed PSDL scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PsdlFile {
    /// Tag read on load, written back on save
    pub magic: Magic,
    pub rooms: Vec<Room>,
    pub ai_roads: Vec<AiRoad>,
    pub bounds: Bounds,
    /// Pools as last loaded or saved. Rebuilt on every save.
    pools: Pools,
    source_path: Option<PathBuf>,
}

impl PsdlFile {
    /// Empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a scene from `path`, remembering it for [`resave`](Self::resave)
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut scene = Self::load(BufReader::new(File::open(path)?))?;
        scene.source_path = Some(path.to_path_buf());
        Ok(scene)
    }

    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Save back to the path the scene was opened from
    pub fn resave(&mut self) -> Result<()> {
        let path = self.source_path.clone().ok_or(PsdlError::NoSourcePath)?;
        self.save_as(path)
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Append a room and return its index
    pub fn add_room(&mut self, room: Room) -> RoomIndex {
        self.rooms.push(room);
        self.rooms.len() - 1
    }

    pub fn vertex_pool(&self) -> &[Vertex] {
        &self.pools.vertices
    }

    pub fn float_pool(&self) -> &[f32] {
        &self.pools.floats
    }

    pub fn texture_pool(&self) -> &[String] {
        &self.pools.textures
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Recompute [`bounds`](Self::bounds) from the rooms.
    ///
    /// A scene with no contributing vertices keeps its current bounds.
    pub fn recalculate_bounds(&mut self, mode: BoundsMode) {
        let gathered: Vec<Vertex> = match mode {
            BoundsMode::AllVertices => self
                .rooms
                .iter()
                .flat_map(|room| room.gather_vertices(true))
                .collect(),
            BoundsMode::PerimeterOnly => self
                .rooms
                .iter()
                .flat_map(|room| room.perimeter_vertices())
                .collect(),
        };
        let mut seen = HashSet::new();
        let vertices = gathered.into_iter().filter(|v| seen.insert(*v));

        if let Some(bounds) = Bounds::from_vertices(vertices) {
            self.bounds = bounds;
        }
    }

    /// Rooms reachable from `start` through perimeter links, breadth first.
    ///
    /// `start` comes first. Each room is visited once, so link cycles
    /// terminate.
    pub fn connected_rooms(&self, start: RoomIndex) -> Vec<RoomIndex> {
        if start >= self.rooms.len() {
            return Vec::new();
        }

        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(index) = queue.pop_front() {
            order.push(index);
            let links = self.rooms[index]
                .perimeter
                .iter()
                .filter_map(|p| p.connected_room)
                .filter(|&n| n < self.rooms.len());
            for next in links {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        order
    }
}
