//! Generated scene content: colored splats or a vertex-colored mesh.

use std::io::Write;

use flythrough_core::Result;
use glam::{UVec3, Vec3};
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;

/// Number of farthest points averaged into the background color.
const BACKGROUND_SAMPLE_COUNT: usize = 5;

/// A set of colored points (splat centers).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    /// Point positions.
    pub positions: Vec<Vec3>,
    /// Per-point RGB colors in `[0, 1]`.
    pub colors: Vec<Vec3>,
}

impl PointCloud {
    /// Creates a point cloud. Missing colors default to mid gray.
    pub fn new(positions: Vec<Vec3>, mut colors: Vec<Vec3>) -> Self {
        colors.resize(positions.len(), Vec3::splat(0.5));
        Self { positions, colors }
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if there are no points.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A triangle mesh with per-vertex colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Triangles as vertex index triples.
    pub faces: Vec<UVec3>,
    /// Per-vertex RGB colors in `[0, 1]`.
    pub colors: Vec<Vec3>,
}

/// A generated world, as handed over by a scene producer.
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    /// Gaussian splat centers with colors.
    Splats(PointCloud),
    /// Mesh with vertex colors.
    Mesh(TriangleMesh),
}

impl Scene {
    /// Positions of all points/vertices.
    pub fn positions(&self) -> &[Vec3] {
        match self {
            Scene::Splats(cloud) => &cloud.positions,
            Scene::Mesh(mesh) => &mesh.vertices,
        }
    }

    /// Colors of all points/vertices.
    pub fn colors(&self) -> &[Vec3] {
        match self {
            Scene::Splats(cloud) => &cloud.colors,
            Scene::Mesh(mesh) => &mesh.colors,
        }
    }

    /// Background color for splat scenes: the mean color of the points
    /// farthest from the origin. Meshes cover the whole view and get `None`.
    pub fn background_color(&self) -> Option<Vec3> {
        let Scene::Splats(cloud) = self else {
            return None;
        };
        if cloud.is_empty() {
            return None;
        }

        let mut order: Vec<usize> = (0..cloud.len()).collect();
        order.sort_by(|&a, &b| {
            cloud.positions[b]
                .length_squared()
                .total_cmp(&cloud.positions[a].length_squared())
        });
        let farthest = &order[..BACKGROUND_SAMPLE_COUNT.min(order.len())];
        let sum: Vec3 = farthest.iter().map(|&i| cloud.colors[i]).sum();
        Some(sum / farthest.len() as f32)
    }

    /// Writes the scene as a binary little-endian PLY file.
    pub fn write_ply<W: Write>(&self, out: &mut W) -> Result<usize> {
        let mut ply = Ply::<DefaultElement>::new();
        ply.header.encoding = Encoding::BinaryLittleEndian;

        let mut vertex_element = ElementDef::new("vertex".to_string());
        for axis in ["x", "y", "z"] {
            vertex_element.properties.add(PropertyDef::new(
                axis.to_string(),
                PropertyType::Scalar(ScalarType::Float),
            ));
        }
        for channel in ["red", "green", "blue"] {
            vertex_element.properties.add(PropertyDef::new(
                channel.to_string(),
                PropertyType::Scalar(ScalarType::UChar),
            ));
        }
        ply.header.elements.add(vertex_element);

        let vertices = self
            .positions()
            .iter()
            .zip(self.colors())
            .map(|(p, c)| {
                let mut vertex = DefaultElement::new();
                vertex.insert("x".to_string(), Property::Float(p.x));
                vertex.insert("y".to_string(), Property::Float(p.y));
                vertex.insert("z".to_string(), Property::Float(p.z));
                let [r, g, b] = color_to_u8(*c);
                vertex.insert("red".to_string(), Property::UChar(r));
                vertex.insert("green".to_string(), Property::UChar(g));
                vertex.insert("blue".to_string(), Property::UChar(b));
                vertex
            })
            .collect();
        ply.payload.insert("vertex".to_string(), vertices);

        if let Scene::Mesh(mesh) = self {
            let mut face_element = ElementDef::new("face".to_string());
            face_element.properties.add(PropertyDef::new(
                "vertex_indices".to_string(),
                PropertyType::List(ScalarType::UChar, ScalarType::Int),
            ));
            ply.header.elements.add(face_element);

            let faces = mesh
                .faces
                .iter()
                .map(|f| {
                    let mut face = DefaultElement::new();
                    face.insert(
                        "vertex_indices".to_string(),
                        Property::ListInt(f.to_array().iter().map(|&i| i as i32).collect()),
                    );
                    face
                })
                .collect();
            ply.payload.insert("face".to_string(), faces);
        }

        ply.make_consistent().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, format!("{e:?}"))
        })?;
        let writer = Writer::new();
        Ok(writer.write_ply(out, &mut ply)?)
    }
}

/// Converts a `[0, 1]` RGB color to bytes.
pub fn color_to_u8(color: Vec3) -> [u8; 3] {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8]
}
