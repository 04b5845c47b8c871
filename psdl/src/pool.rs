//! Shared value pools
//!
//! Records never store pool indices. On load they resolve indices against
//! [`Pools`]; on save the pools are rebuilt from the scene and a
//! [`PoolIndex`] maps values back to their on-disk indices.

use hashbrown::HashMap;

use crate::error::{Pool, PsdlError, Result};
use crate::vertex::Vertex;

/// Vertex, float and texture pools as stored in the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pools {
    pub vertices: Vec<Vertex>,
    pub floats: Vec<f32>,
    pub textures: Vec<String>,
}

impl Pools {
    pub fn vertex(&self, index: u16) -> Result<Vertex> {
        self.vertices
            .get(index as usize)
            .copied()
            .ok_or(PsdlError::IndexOutOfRange {
                pool: Pool::Vertices,
                index: index as usize,
                len: self.vertices.len(),
            })
    }

    pub fn float(&self, index: u16) -> Result<f32> {
        self.floats
            .get(index as usize)
            .copied()
            .ok_or(PsdlError::IndexOutOfRange {
                pool: Pool::Floats,
                index: index as usize,
                len: self.floats.len(),
            })
    }

    /// `count` consecutive texture names starting at `start`
    pub fn texture_run(&self, start: usize, count: usize) -> Result<Vec<String>> {
        self.textures
            .get(start..start + count)
            .map(<[String]>::to_vec)
            .ok_or(PsdlError::IndexOutOfRange {
                pool: Pool::Textures,
                index: start + count.saturating_sub(1),
                len: self.textures.len(),
            })
    }
}

/// Value → index maps for a freshly rebuilt [`Pools`]
#[derive(Debug, Clone, Default)]
pub struct PoolIndex {
    vertices: HashMap<Vertex, u16>,
    floats: HashMap<u32, u16>,
    texture_runs: HashMap<Vec<String>, usize>,
    textures: Vec<String>,
}

impl PoolIndex {
    pub fn vertex(&self, v: Vertex) -> Result<u16> {
        self.vertices
            .get(&v)
            .copied()
            .ok_or_else(|| PsdlError::MissingFromPool {
                pool: Pool::Vertices,
                value: v.to_string(),
            })
    }

    pub fn float(&self, f: f32) -> Result<u16> {
        self.floats
            .get(&f.to_bits())
            .copied()
            .ok_or_else(|| PsdlError::MissingFromPool {
                pool: Pool::Floats,
                value: f.to_string(),
            })
    }

    /// Texture cursor that makes a record with `offset` read `run`.
    ///
    /// Returns `None` when the run starts with an empty name (no texture).
    pub fn texture_cursor(&self, run: &[String], offset: u16) -> Result<Option<usize>> {
        if is_null_run(run) {
            return Ok(None);
        }
        let offset = offset as usize;
        if let Some(&pos) = self.texture_runs.get(run)
            && pos >= offset
        {
            return Ok(Some(pos - offset));
        }
        find_window(&self.textures, run, offset)
            .map(|pos| Some(pos - offset))
            .ok_or_else(|| PsdlError::MissingFromPool {
                pool: Pool::Textures,
                value: run.join("|"),
            })
    }

    /// Pool position of a run registered as a whole, e.g. divider textures
    pub fn texture_run_start(&self, run: &[String]) -> Result<usize> {
        self.texture_runs
            .get(run)
            .copied()
            .ok_or_else(|| PsdlError::MissingFromPool {
                pool: Pool::Textures,
                value: run.join("|"),
            })
    }
}

/// A run whose first slot is empty means "no texture"
pub(crate) fn is_null_run(run: &[String]) -> bool {
    run.first().is_none_or(String::is_empty)
}

fn find_window(textures: &[String], run: &[String], min_start: usize) -> Option<usize> {
    if run.is_empty() || textures.len() < run.len() {
        return None;
    }
    (min_start..=textures.len() - run.len()).find(|&p| textures[p..p + run.len()] == *run)
}

/// Longest head of `run` that ends the pool and starts at or above `min_start`
fn suffix_overlap(textures: &[String], run: &[String], min_start: usize) -> usize {
    (1..run.len())
        .rev()
        .find(|&k| {
            k <= textures.len()
                && textures.len() - k >= min_start
                && textures[textures.len() - k..] == run[..k]
        })
        .unwrap_or(0)
}

fn index_overflow(what: &'static str, len: usize) -> PsdlError {
    PsdlError::FieldOverflow {
        what,
        value: len - 1,
        max: u16::MAX as usize,
    }
}

/// Rebuilds the three pools from scratch, first-seen order, no duplicates
#[derive(Debug, Default)]
pub struct PoolBuilder {
    pools: Pools,
    index: PoolIndex,
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertices(&mut self, vertices: impl IntoIterator<Item = Vertex>) -> Result<()> {
        for v in vertices {
            if self.index.vertices.contains_key(&v) {
                continue;
            }
            let next = self.pools.vertices.len();
            let index = u16::try_from(next).map_err(|_| index_overflow("vertex index", next + 1))?;
            self.index.vertices.insert(v, index);
            self.pools.vertices.push(v);
        }
        Ok(())
    }

    pub fn add_floats(&mut self, floats: impl IntoIterator<Item = f32>) -> Result<()> {
        for f in floats {
            if self.index.floats.contains_key(&f.to_bits()) {
                continue;
            }
            let next = self.pools.floats.len();
            let index = u16::try_from(next).map_err(|_| index_overflow("float index", next + 1))?;
            self.index.floats.insert(f.to_bits(), index);
            self.pools.floats.push(f);
        }
        Ok(())
    }

    /// Register a texture run so a record with `offset` can address it.
    ///
    /// Runs starting with an empty name are skipped. An existing window at or
    /// above `offset` is reused. Otherwise the run is appended, overlapping
    /// the longest pool suffix that matches its head, and left-padded with
    /// empty names if it would start below `offset`. A name can still repeat
    /// when two runs share it at positions no overlap can line up.
    pub fn add_texture_run(&mut self, run: &[String], offset: u16) {
        if is_null_run(run) {
            return;
        }
        let offset = offset as usize;
        if let Some(&pos) = self.index.texture_runs.get(run)
            && pos >= offset
        {
            return;
        }
        if let Some(pos) = find_window(&self.pools.textures, run, offset) {
            self.index.texture_runs.insert(run.to_vec(), pos);
            return;
        }
        let shared = suffix_overlap(&self.pools.textures, run, offset);
        while self.pools.textures.len() < offset {
            self.pools.textures.push(String::new());
        }
        let pos = self.pools.textures.len() - shared;
        self.pools.textures.extend_from_slice(&run[shared..]);
        self.index.texture_runs.insert(run.to_vec(), pos);
    }

    pub fn finish(mut self) -> (Pools, PoolIndex) {
        self.index.textures = self.pools.textures.clone();
        (self.pools, self.index)
    }
}
