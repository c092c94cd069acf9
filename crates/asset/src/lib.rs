//! Asset loading/parsers for Wavefront OBJ models and their MTL libraries.
//!
//! Pipeline: [`AssetSource`] -> [`obj`] (pulling in [`mtl`] on `mtllib`) ->
//! [`MaterialRegistry`] -> [`flatten`] -> [`FlattenedVertexBuffers`].

pub mod flatten;
pub mod material;
pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod source;
mod text;

pub use corelib::{AttributeKind, LoadError, LoadResult};
pub use flatten::FlattenedVertexBuffers;
pub use material::{Material, MaterialRegistry, TextureMaps};
pub use mesh::{CornerForm, CornerRef, Face, ObjGeometry};
pub use mtl::{parse_mtl, parse_mtl_str};
pub use obj::{ParsedObj, parse_obj, parse_obj_str};
pub use source::{AssetSource, DirectorySource, MemorySource};

/// Knobs for [`load_model`].
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Open `mtllib` targets. When off the model loads without colors.
    pub load_materials: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            load_materials: true,
        }
    }
}

/// A fully loaded model. Everything is released together on drop.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub name: String,
    pub geometry: ObjGeometry,
    pub materials: MaterialRegistry,
    pub buffers: FlattenedVertexBuffers,
}

/// Load the OBJ asset `name` from `source`, its material libraries, and flatten it.
///
/// Either the whole model comes back or an error does; nothing partial.
pub fn load_model<S: AssetSource + ?Sized>(
    source: &S,
    name: &str,
    options: &LoadOptions,
) -> LoadResult<Model> {
    let libraries: Option<&dyn AssetSource> = if options.load_materials {
        Some(&source)
    } else {
        None
    };

    let ParsedObj {
        geometry,
        materials,
    } = {
        let reader = source.open(name)?;
        parse_obj(reader, name, libraries)?
    };
    let buffers = flatten::flatten(&geometry, &materials)?;

    log::info!(
        "Loaded '{}': {} faces, {} vertices, {} materials{}",
        name,
        geometry.faces.len(),
        buffers.position_count(),
        materials.len(),
        if buffers.diffuse.is_some() {
            ""
        } else {
            " (no vertex colors)"
        }
    );

    Ok(Model {
        name: name.to_owned(),
        geometry,
        materials,
        buffers,
    })
}
