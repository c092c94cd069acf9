//! Vertex flattening: one output entry per face corner, no index buffer.
//!
//! Buffers have independent lengths. A corner without a normal or texcoord adds
//! nothing to that buffer, and a corner whose face material is not in the
//! registry adds nothing to the color buffers. Consumers that need parallel
//! arrays should check [`FlattenedVertexBuffers::is_uniform`].

use corelib::{AttributeKind, LoadError, LoadResult};

use crate::{material::MaterialRegistry, mesh::ObjGeometry};

pub const POSITION_COMPONENTS: usize = 3;
pub const NORMAL_COMPONENTS: usize = 3;
pub const UV_COMPONENTS: usize = 2;
pub const COLOR_COMPONENTS: usize = 3;

/// Flat, non-indexed vertex streams in face-then-corner order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlattenedVertexBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    /// `None` when no materials were loaded.
    pub diffuse: Option<Vec<f32>>,
    /// `None` when no materials were loaded.
    pub ambient: Option<Vec<f32>>,
}

impl FlattenedVertexBuffers {
    pub fn position_count(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    pub fn normal_count(&self) -> usize {
        self.normals.len() / NORMAL_COMPONENTS
    }

    pub fn uv_count(&self) -> usize {
        self.uvs.len() / UV_COMPONENTS
    }

    pub fn diffuse_count(&self) -> Option<usize> {
        self.diffuse.as_ref().map(|d| d.len() / COLOR_COMPONENTS)
    }

    pub fn ambient_count(&self) -> Option<usize> {
        self.ambient.as_ref().map(|a| a.len() / COLOR_COMPONENTS)
    }

    /// Vertex count for a non-indexed draw, or `None` if it does not fit a `u32`.
    pub fn draw_count(&self) -> Option<u32> {
        draw_count_for(self.position_count())
    }

    /// `true` if every non-empty buffer has one entry per position.
    pub fn is_uniform(&self) -> bool {
        let n = self.position_count();
        let attr_ok = |count: usize| count == 0 || count == n;
        attr_ok(self.normal_count())
            && attr_ok(self.uv_count())
            && self.diffuse_count().is_none_or(attr_ok)
            && self.ambient_count().is_none_or(attr_ok)
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    pub fn diffuse_bytes(&self) -> Option<&[u8]> {
        self.diffuse.as_deref().map(bytemuck::cast_slice)
    }

    pub fn ambient_bytes(&self) -> Option<&[u8]> {
        self.ambient.as_deref().map(bytemuck::cast_slice)
    }
}

/// Expand every face corner into the output streams.
///
/// Any index outside the parsed lists fails the whole call.
pub fn flatten(
    geometry: &ObjGeometry,
    materials: &MaterialRegistry,
) -> LoadResult<FlattenedVertexBuffers> {
    let corners = geometry.corner_count();
    let with_colors = !materials.is_empty();
    let color_buf = || with_colors.then(|| Vec::with_capacity(corners * COLOR_COMPONENTS));

    let mut out = FlattenedVertexBuffers {
        positions: Vec::with_capacity(corners * POSITION_COMPONENTS),
        normals: Vec::with_capacity(corners * NORMAL_COMPONENTS),
        uvs: Vec::with_capacity(corners * UV_COMPONENTS),
        diffuse: color_buf(),
        ambient: color_buf(),
    };

    for face in &geometry.faces {
        let material = face.material.as_deref().and_then(|name| materials.get(name));

        for corner in &face.corners {
            let position = lookup(
                &geometry.positions,
                corner.position,
                AttributeKind::Position,
                face.line,
            )?;
            out.positions.extend_from_slice(position);

            if let Some(idx) = corner.normal {
                let normal = lookup(&geometry.normals, idx, AttributeKind::Normal, face.line)?;
                out.normals.extend_from_slice(normal);
            }
            if let Some(idx) = corner.texcoord {
                let uv = lookup(&geometry.texcoords, idx, AttributeKind::TexCoord, face.line)?;
                out.uvs.extend_from_slice(uv);
            }

            if let (Some(material), Some(diffuse), Some(ambient)) =
                (material, out.diffuse.as_mut(), out.ambient.as_mut())
            {
                diffuse.extend_from_slice(&material.diffuse);
                ambient.extend_from_slice(&material.ambient);
            }
        }
    }

    debug_assert_eq!(out.position_count(), corners);
    Ok(out)
}

fn draw_count_for(vertices: usize) -> Option<u32> {
    u32::try_from(vertices).ok()
}

fn lookup<T>(list: &[T], idx: usize, attribute: AttributeKind, line: usize) -> LoadResult<&T> {
    list.get(idx).ok_or(LoadError::UnresolvedAttributeIndex {
        line,
        attribute,
        index: i64::try_from(idx).map_or(i64::MAX, |i| i + 1),
        available: list.len(),
    })
}
