//! OBJ parser: positions, normals, texture coordinates, faces, and material references.
//!
//! Single pass, forward only. Face indices are validated against what has been
//! read so far and stored 0-based.

use std::io::{self, BufRead};

use corelib::{AttributeKind, LoadError, LoadResult};

use crate::{
    material::MaterialRegistry,
    mesh::{CornerRef, Face, ObjGeometry},
    mtl::parse_mtl,
    source::{AssetSource, sibling_asset},
    text::{Line, parse_floats, parse_index},
};

/// Result of parsing one OBJ file and the libraries it pulled in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedObj {
    pub geometry: ObjGeometry,
    pub materials: MaterialRegistry,
}

/// Parse an OBJ stream named `name`.
///
/// `libraries` is where `mtllib` targets are opened from, resolved next to `name`.
/// With `None`, library names are recorded but nothing is opened.
pub fn parse_obj<R: BufRead>(
    reader: R,
    name: &str,
    libraries: Option<&dyn AssetSource>,
) -> LoadResult<ParsedObj> {
    let acc = reader.lines().enumerate().try_fold(
        ObjAccumulator::default(),
        |acc, (line_no, line)| {
            let raw = line.map_err(|source| LoadError::Io {
                name: name.to_owned(),
                source,
            })?;
            acc.step(&Line::new(line_no + 1, &raw), name, libraries)
        },
    )?;

    let ObjAccumulator {
        geometry,
        materials,
        ..
    } = acc;
    log::debug!(
        "Parsed '{}': {} positions, {} normals, {} texcoords, {} faces, {} materials",
        name,
        geometry.positions.len(),
        geometry.normals.len(),
        geometry.texcoords.len(),
        geometry.faces.len(),
        materials.len()
    );
    Ok(ParsedObj {
        geometry,
        materials,
    })
}

/// Convenience helper to parse an OBJ string literal. `mtllib` targets are not opened.
pub fn parse_obj_str(contents: &str) -> LoadResult<ParsedObj> {
    parse_obj(io::Cursor::new(contents), "<memory>", None)
}

/// Parser state threaded through the line fold. `active_material` is the
/// sticky `usemtl` value.
#[derive(Default)]
struct ObjAccumulator {
    geometry: ObjGeometry,
    materials: MaterialRegistry,
    active_material: Option<String>,
}

impl ObjAccumulator {
    fn step(
        mut self,
        line: &Line<'_>,
        obj_name: &str,
        libraries: Option<&dyn AssetSource>,
    ) -> LoadResult<Self> {
        if line.body.is_empty() {
            return Ok(self);
        }

        let mut parts = line.body.split_whitespace();
        let Some(tag) = parts.next() else {
            return Ok(self);
        };

        match tag {
            "v" => {
                // Optional w / vertex colors after xyz are dropped.
                let position: [f32; 3] = parse_floats(&mut parts, line, "position")?;
                self.geometry.positions.push(position);
            }
            "vn" => {
                let normal: [f32; 3] = parse_floats(&mut parts, line, "normal")?;
                self.geometry.normals.push(normal);
            }
            "vt" => {
                let uv: [f32; 2] = parse_floats(&mut parts, line, "texcoord")?;
                self.geometry.texcoords.push(uv);
            }
            "f" => {
                let face = parse_face(parts, line, &self.geometry, self.active_material.clone())?;
                self.geometry.faces.push(face);
            }
            "usemtl" => {
                let material = line.rest_after(tag);
                if material.is_empty() {
                    return Err(line.malformed("usemtl without a name"));
                }
                if !self.materials.is_empty() && !self.materials.contains(material) {
                    log::warn!(
                        "'{}' line {}: usemtl '{}' names no loaded material",
                        obj_name,
                        line.number,
                        material
                    );
                }
                self.active_material = Some(material.to_owned());
            }
            "mtllib" => {
                let mut any = false;
                for lib in parts {
                    any = true;
                    self.load_library(obj_name, lib, libraries)?;
                }
                if !any {
                    return Err(line.malformed("mtllib without a library name"));
                }
            }
            other => {
                log::trace!("Ignoring OBJ directive '{}' on line {}", other, line.number);
            }
        }
        Ok(self)
    }

    fn load_library(
        &mut self,
        obj_name: &str,
        lib: &str,
        libraries: Option<&dyn AssetSource>,
    ) -> LoadResult<()> {
        self.geometry.material_libraries.push(lib.to_owned());
        let Some(source) = libraries else {
            log::debug!("Skipping material library '{}'", lib);
            return Ok(());
        };

        let asset = sibling_asset(obj_name, lib);
        match source.open(&asset) {
            Ok(reader) => {
                let registry =
                    parse_mtl(reader, &asset).map_err(|err| LoadError::InMaterialLibrary {
                        name: asset.clone(),
                        source: Box::new(err),
                    })?;
                self.materials.extend(registry);
            }
            Err(err) => {
                let err = LoadError::MaterialLibraryUnavailable {
                    name: asset,
                    source: Box::new(err),
                };
                log::warn!("{}; continuing without its materials", err);
                self.geometry.missing_libraries.push(lib.to_owned());
            }
        }
        Ok(())
    }
}

fn parse_face<'t>(
    tokens: impl Iterator<Item = &'t str>,
    line: &Line<'_>,
    geometry: &ObjGeometry,
    material: Option<String>,
) -> LoadResult<Face> {
    let corners = tokens
        .map(|token| parse_corner(token, line, geometry))
        .collect::<LoadResult<Vec<_>>>()?;
    if corners.len() < 3 {
        return Err(line.malformed(format!(
            "face needs at least 3 corners, got {}",
            corners.len()
        )));
    }
    Ok(Face {
        corners,
        material,
        line: line.number,
    })
}

/// Split `v`, `v/vt`, `v//vn` or `v/vt/vn` by where the slashes fall.
fn parse_corner(token: &str, line: &Line<'_>, geometry: &ObjGeometry) -> LoadResult<CornerRef> {
    let (v, vt, vn) = match token.split_once('/') {
        None => (token, None, None),
        Some((v, rest)) => match rest.split_once('/') {
            None => (v, Some(rest), None),
            Some(("", vn)) => (v, None, Some(vn)),
            Some((vt, vn)) => (v, Some(vt), Some(vn)),
        },
    };

    let malformed = [Some(v), vt, vn]
        .into_iter()
        .flatten()
        .any(|field| field.is_empty() || field.contains('/'));
    if malformed {
        return Err(line.malformed(format!(
            "corner '{token}' is not one of v, v/vt, v//vn, v/vt/vn"
        )));
    }

    let position = resolve_index(
        v,
        geometry.positions.len(),
        AttributeKind::Position,
        line,
    )?;
    let texcoord = vt
        .map(|t| resolve_index(t, geometry.texcoords.len(), AttributeKind::TexCoord, line))
        .transpose()?;
    let normal = vn
        .map(|n| resolve_index(n, geometry.normals.len(), AttributeKind::Normal, line))
        .transpose()?;

    Ok(CornerRef::new(position, texcoord, normal))
}

/// 1-based text index -> 0-based, bounded by what has been parsed so far.
/// Zero, negative and forward references are rejected.
fn resolve_index(
    token: &str,
    len: usize,
    attribute: AttributeKind,
    line: &Line<'_>,
) -> LoadResult<usize> {
    let raw = parse_index(token, line)?;
    usize::try_from(raw)
        .ok()
        .filter(|idx| (1..=len).contains(idx))
        .map(|idx| idx - 1)
        .ok_or(LoadError::UnresolvedAttributeIndex {
            line: line.number,
            attribute,
            index: raw,
            available: len,
        })
}
