//! Triangle fans (types 5, 6 and 12)

use std::io::{Read, Write};

use super::{
    Geometric, PsdlElement, element_variant, inline_count, read_count, read_vertices,
    write_count, write_vertices,
};
use crate::binary::{PsdlReader, PsdlWriter};
use crate::error::{Pool, PsdlError, Result};
use crate::pool::{PoolIndex, Pools};
use crate::types::ElementType;
use crate::vertex::Vertex;

fn insert_into(vertices: &mut Vec<Vertex>, index: usize, vertex: Vertex) -> Result<()> {
    if index > vertices.len() {
        return Err(PsdlError::IndexOutOfRange {
            pool: Pool::Vertices,
            index,
            len: vertices.len(),
        });
    }
    vertices.insert(index, vertex);
    Ok(())
}

fn remove_from(vertices: &mut Vec<Vertex>, index: usize) -> Result<Vertex> {
    if index >= vertices.len() {
        return Err(PsdlError::IndexOutOfRange {
            pool: Pool::Vertices,
            index,
            len: vertices.len(),
        });
    }
    Ok(vertices.remove(index))
}

/// Fans store `n - 2` (the triangle count) as their count
macro_rules! triangle_fan {
    ($(#[$doc:meta])* $name:ident, $ty:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            pub vertices: Vec<Vertex>,
            pub textures: Vec<String>,
        }

        impl $name {
            pub fn new(texture: &str, vertices: Vec<Vertex>) -> Self {
                Self {
                    vertices,
                    textures: vec![texture.to_owned()],
                }
            }

            fn triangle_count(&self) -> usize {
                self.vertices.len().saturating_sub(2)
            }
        }

        impl PsdlElement for $name {
            const TYPE: ElementType = $ty;

            fn subtype(&self) -> u8 {
                inline_count(self.triangle_count())
            }

            fn read<R: Read>(
                reader: &mut PsdlReader<R>,
                subtype: u8,
                pools: &Pools,
            ) -> Result<Self> {
                let triangles = read_count(reader, subtype)?;
                Ok(Self {
                    vertices: read_vertices(reader, pools, triangles + 2)?,
                    textures: Vec::new(),
                })
            }

            fn write<W: Write>(
                &self,
                writer: &mut PsdlWriter<W>,
                index: &PoolIndex,
            ) -> Result<()> {
                if self.vertices.len() < 2 {
                    return Err(PsdlError::malformed(Self::TYPE, "fewer than two vertices"));
                }
                write_count(writer, self.subtype(), "fan triangles", self.triangle_count())?;
                write_vertices(writer, index, &self.vertices)
            }

            fn vertices(&self) -> &[Vertex] {
                &self.vertices
            }

            fn textures(&self) -> &[String] {
                &self.textures
            }

            fn set_textures(&mut self, textures: Vec<String>) {
                self.textures = textures;
            }

            element_variant!($name);
        }

        impl Geometric for $name {
            fn vertices_mut(&mut self) -> &mut [Vertex] {
                &mut self.vertices
            }

            fn insert_vertex(&mut self, index: usize, vertex: Vertex) -> Result<()> {
                insert_into(&mut self.vertices, index, vertex)
            }

            fn remove_vertex(&mut self, index: usize) -> Result<Vertex> {
                remove_from(&mut self.vertices, index)
            }

            fn push_vertex(&mut self, vertex: Vertex) -> Result<()> {
                self.vertices.push(vertex);
                Ok(())
            }
        }
    };
}

triangle_fan!(
    /// Generic triangle fan around its first vertex
    TriangleFan,
    ElementType::TriangleFan
);

triangle_fan!(
    /// Triangle fan drawn with back-face culling
    CulledTriangleFan,
    ElementType::CulledTriangleFan
);

/// Flat roof at a fixed height over a vertex outline.
///
/// Stores `n - 1` as its count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoofTriangleFan {
    pub vertices: Vec<Vertex>,
    pub height: f32,
    pub textures: Vec<String>,
}

impl RoofTriangleFan {
    pub fn new(texture: &str, height: f32, vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            height,
            textures: vec![texture.to_owned()],
        }
    }

    fn stored_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

impl PsdlElement for RoofTriangleFan {
    const TYPE: ElementType = ElementType::RoofTriangleFan;

    fn subtype(&self) -> u8 {
        inline_count(self.stored_count())
    }

    fn read<R: Read>(reader: &mut PsdlReader<R>, subtype: u8, pools: &Pools) -> Result<Self> {
        let count = read_count(reader, subtype)?;
        let height = pools.float(reader.read_u16()?)?;
        Ok(Self {
            vertices: read_vertices(reader, pools, count + 1)?,
            height,
            textures: Vec::new(),
        })
    }

    fn write<W: Write>(&self, writer: &mut PsdlWriter<W>, index: &PoolIndex) -> Result<()> {
        if self.vertices.is_empty() {
            return Err(PsdlError::malformed(Self::TYPE, "no vertices"));
        }
        write_count(writer, self.subtype(), "roof vertices", self.stored_count())?;
        writer.write_u16(index.float(self.height)?)?;
        write_vertices(writer, index, &self.vertices)
    }

    fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn floats(&self) -> Vec<f32> {
        vec![self.height]
    }

    fn textures(&self) -> &[String] {
        &self.textures
    }

    fn set_textures(&mut self, textures: Vec<String>) {
        self.textures = textures;
    }

    element_variant!(RoofTriangleFan);
}

impl Geometric for RoofTriangleFan {
    fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    fn insert_vertex(&mut self, index: usize, vertex: Vertex) -> Result<()> {
        insert_into(&mut self.vertices, index, vertex)
    }

    fn remove_vertex(&mut self, index: usize) -> Result<Vertex> {
        remove_from(&mut self.vertices, index)
    }

    fn push_vertex(&mut self, vertex: Vertex) -> Result<()> {
        self.vertices.push(vertex);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vertex> {
        vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(0.0, 0.0, 1.0),
            Vertex::new(1.0, 0.0, 1.0),
            Vertex::new(1.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_fan_subtype() {
        let mut fan = TriangleFan::new("grass", square());
        assert_eq!(fan.subtype(), 2);
        for i in 0..6 {
            fan.push_vertex(Vertex::new(i as f32, 1.0, 0.0)).unwrap();
        }
        // 10 vertices, 8 triangles: too many for the header
        assert_eq!(fan.subtype(), 0);
    }

    #[test]
    fn test_fan_editing() {
        let mut fan = CulledTriangleFan::new("grass", square());
        fan.insert_vertex(1, Vertex::new(9.0, 9.0, 9.0)).unwrap();
        assert_eq!(fan.vertex(1), Some(Vertex::new(9.0, 9.0, 9.0)));
        assert_eq!(fan.remove_vertex(1).unwrap(), Vertex::new(9.0, 9.0, 9.0));
        assert!(fan.insert_vertex(10, Vertex::ZERO).is_err());
        assert!(fan.remove_vertex(4).is_err());
        assert_eq!(fan.vertex_count(), 4);
    }

    #[test]
    fn test_roof_subtype() {
        let roof = RoofTriangleFan::new("roof", 20.0, square());
        assert_eq!(roof.subtype(), 3);
        assert_eq!(roof.floats(), vec![20.0]);
    }
}
