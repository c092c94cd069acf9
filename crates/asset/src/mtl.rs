//! MTL parser: `newmtl` blocks into a [`MaterialRegistry`].
//!
//! A block ends at the next blank line, the next `newmtl`, or end of input.

use std::io::{self, BufRead};

use corelib::{LoadError, LoadResult};

use crate::material::{Material, MaterialRegistry};
use crate::text::{Line, parse_f32, parse_i32};

/// Parse an MTL library from a [`BufRead`] implementation.
pub fn parse_mtl<R: BufRead>(reader: R, name: &str) -> LoadResult<MaterialRegistry> {
    let mut registry = MaterialRegistry::new();
    let mut pending: Option<Material> = None;

    for (line_no, line) in reader.lines().enumerate() {
        let raw = line.map_err(|source| LoadError::Io {
            name: name.to_owned(),
            source,
        })?;
        let line = Line::new(line_no + 1, &raw);

        if line.content.is_empty() {
            if let Some(material) = pending.take() {
                commit(&mut registry, material);
            }
            continue;
        }
        // Comment-only lines do not close a block.
        let mut parts = line.body.split_whitespace();
        let Some(tag) = parts.next() else { continue };

        if tag == "newmtl" {
            if let Some(material) = pending.take() {
                commit(&mut registry, material);
            }
            let mat_name = line.rest_after(tag);
            if mat_name.is_empty() {
                return Err(line.malformed("newmtl without a name"));
            }
            log::debug!("Creating material '{}'", mat_name);
            pending = Some(Material::new(mat_name));
            continue;
        }

        if !is_property(tag) {
            log::trace!("Ignoring MTL directive '{}' on line {}", tag, line.number);
            continue;
        }

        let args: Vec<&str> = parts.collect();
        if args
            .iter()
            .any(|a| a.eq_ignore_ascii_case("spectral") || a.eq_ignore_ascii_case("xyz"))
        {
            log::warn!(
                "Unsupported MTL color space in '{}' line {}: '{}'",
                name,
                line.number,
                line.content
            );
            continue;
        }

        let material = pending
            .as_mut()
            .ok_or_else(|| LoadError::MissingActiveMaterial {
                line: line.number,
                content: line.content.to_owned(),
            })?;

        apply_property(material, tag, &args, &line)?;
    }

    if let Some(material) = pending.take() {
        commit(&mut registry, material);
    }

    log::debug!("Parsed {} material(s) from '{}'", registry.len(), name);
    Ok(registry)
}

/// Convenience helper to parse an MTL string literal.
pub fn parse_mtl_str(contents: &str) -> LoadResult<MaterialRegistry> {
    parse_mtl(io::Cursor::new(contents), "<memory>")
}

fn commit(registry: &mut MaterialRegistry, material: Material) {
    log::debug!("Saving material '{}'", material.name);
    registry.insert(material);
}

fn is_property(tag: &str) -> bool {
    matches!(
        tag,
        "Ns" | "Ka"
            | "Kd"
            | "Ks"
            | "Ke"
            | "Tf"
            | "Ni"
            | "d"
            | "Tr"
            | "illum"
            | "sharpness"
            | "map_Ka"
            | "map_Kd"
            | "map_Ks"
            | "map_Ns"
            | "map_d"
            | "map_bump"
            | "map_Bump"
            | "bump"
    )
}

fn apply_property(
    material: &mut Material,
    tag: &str,
    args: &[&str],
    line: &Line<'_>,
) -> LoadResult<()> {
    match tag {
        "Ka" => material.ambient = read_color(args, line)?,
        "Kd" => material.diffuse = read_color(args, line)?,
        "Ks" => material.specular = read_color(args, line)?,
        "Ke" => material.emissive = read_color(args, line)?,
        "Tf" => material.transmission_filter = read_color(args, line)?,
        "Ns" => material.specular_exponent = parse_f32(first(args, line)?, line)?,
        "Ni" => material.optical_density = parse_f32(first(args, line)?, line)?,
        // `d -halo 0.5`: the value is always last.
        "d" => {
            let last = args.last().ok_or_else(|| line.malformed("missing value"))?;
            material.dissolve = parse_f32(last, line)?;
        }
        "Tr" => material.dissolve = 1.0 - parse_f32(first(args, line)?, line)?,
        "illum" => material.illumination_model = parse_i32(first(args, line)?, line)?,
        "sharpness" => material.sharpness = parse_i32(first(args, line)?, line)?,
        map => {
            let file = map_file(args).ok_or_else(|| line.malformed("missing texture file"))?;
            let slot = match map {
                "map_Ka" => &mut material.maps.ambient,
                "map_Kd" => &mut material.maps.diffuse,
                "map_Ks" => &mut material.maps.specular,
                "map_Ns" => &mut material.maps.specular_exponent,
                "map_d" => &mut material.maps.dissolve,
                _ => &mut material.maps.bump,
            };
            *slot = Some(file);
        }
    }
    Ok(())
}

fn first<'a>(args: &[&'a str], line: &Line<'_>) -> LoadResult<&'a str> {
    args.first()
        .copied()
        .ok_or_else(|| line.malformed("missing value"))
}

/// `Ka r [g b]`: missing channels repeat the first value.
fn read_color(args: &[&str], line: &Line<'_>) -> LoadResult<[f32; 3]> {
    let r = parse_f32(first(args, line)?, line)?;
    let mut rgb = [r; 3];
    for (slot, token) in rgb.iter_mut().zip(args.iter()).skip(1) {
        *slot = parse_f32(token, line)?;
    }
    Ok(rgb)
}

/// Texture file name: the last token, skipping `-opt value` pairs before it.
fn map_file(args: &[&str]) -> Option<String> {
    args.last()
        .filter(|file| !file.starts_with('-'))
        .map(|file| (*file).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_blank_line_terminated_block() {
        let registry = parse_mtl_str("newmtl Red\nKd 1 0 0\n\n").expect("parse");
        let red = registry.get("Red").expect("Red");
        assert_eq!(red.diffuse, [1.0, 0.0, 0.0]);
        assert_eq!(red.ambient, [0.0; 3]);
    }

    #[test]
    fn commits_last_block_without_trailing_blank() {
        let src = "newmtl A\nKd 0.1 0.2 0.3\nnewmtl B\nKd 0.4 0.5 0.6";
        let registry = parse_mtl_str(src).expect("parse");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("A").map(|m| m.diffuse), Some([0.1, 0.2, 0.3]));
        assert_eq!(registry.get("B").map(|m| m.diffuse), Some([0.4, 0.5, 0.6]));
    }

    #[test]
    fn grayscale_shorthand_expands() {
        let registry = parse_mtl_str("newmtl Gray\nKa 0.5\n").expect("parse");
        assert_eq!(registry.get("Gray").map(|m| m.ambient), Some([0.5; 3]));
    }

    #[test]
    fn full_block() {
        let src = r#"
# Blender MTL File
newmtl mat10.001
Ns 96.078431
Ka 0.433333 0.433333 0.433333
Kd 0.300000 0.690000 0.310000
Ks 0.500000 0.500000 0.500000
Ke 0.000000 0.000000 0.000000
Tf 1 1 1
Ni 1.000000
d -halo 0.75
illum 2
sharpness 60
map_Kd -s 1 1 1 textures/body.png
"#;
        let registry = parse_mtl_str(src).expect("parse");
        let m = registry.get("mat10.001").expect("material");
        assert_eq!(m.specular_exponent, 96.078431);
        assert_eq!(m.ambient, [0.433333; 3]);
        assert_eq!(m.diffuse, [0.3, 0.69, 0.31]);
        assert_eq!(m.transmission_filter, [1.0; 3]);
        assert_eq!(m.optical_density, 1.0);
        assert_eq!(m.dissolve, 0.75);
        assert_eq!(m.illumination_model, 2);
        assert_eq!(m.sharpness, 60);
        assert_eq!(m.maps.diffuse.as_deref(), Some("textures/body.png"));
    }

    #[test]
    fn transparency_inverts_dissolve() {
        let registry = parse_mtl_str("newmtl Glass\nTr 0.25\n").expect("parse");
        assert_eq!(registry.get("Glass").map(|m| m.dissolve), Some(0.75));
    }

    #[test]
    fn spectral_and_xyz_lines_are_skipped() {
        let src = "newmtl S\nKd 0.2 0.2 0.2\nKa spectral ident.rfl 1.0\nKs xyz 0.1 0.1 0.1\n";
        let registry = parse_mtl_str(src).expect("parse");
        let s = registry.get("S").expect("S");
        assert_eq!(s.diffuse, [0.2; 3]);
        assert_eq!(s.ambient, [0.0; 3]);
        assert_eq!(s.specular, [0.0; 3]);
    }

    #[test]
    fn spectral_line_before_newmtl_is_skipped() {
        let src = "Ka spectral ident.rfl 1.0\nnewmtl A\nKd 1 0 0\n";
        let registry = parse_mtl_str(src).expect("parse");
        assert_eq!(registry.get("A").map(|m| m.diffuse), Some([1.0, 0.0, 0.0]));
        assert_eq!(registry.get("A").map(|m| m.ambient), Some([0.0; 3]));
    }

    #[test]
    fn byte_order_mark_before_newmtl() {
        let registry = parse_mtl_str("\u{feff}newmtl A\nKd 1 0 0\n").expect("parse");
        assert_eq!(registry.get("A").map(|m| m.diffuse), Some([1.0, 0.0, 0.0]));
    }

    #[test]
    fn comments_inside_a_block() {
        let src = "newmtl A # hull\n# shading\nKd 0.5 0.5 0.5 # gray\nillum 2\n";
        let registry = parse_mtl_str(src).expect("parse");
        let a = registry.get("A").expect("A");
        assert_eq!(a.diffuse, [0.5; 3]);
        assert_eq!(a.illumination_model, 2);
    }

    #[test]
    fn property_before_newmtl_fails() {
        let err = parse_mtl_str("Kd 1 0 0\nnewmtl Late\n").expect_err("no material");
        assert!(matches!(err, LoadError::MissingActiveMaterial { line: 1, .. }));
    }

    #[test]
    fn property_after_block_closed_fails() {
        let err = parse_mtl_str("newmtl A\n\nKd 1 0 0\n").expect_err("closed block");
        assert!(matches!(err, LoadError::MissingActiveMaterial { line: 3, .. }));
    }

    #[test]
    fn non_numeric_value_fails_with_line() {
        let err = parse_mtl_str("newmtl A\nNs shiny\n").expect_err("bad literal");
        match err {
            LoadError::MalformedNumericLiteral { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, "shiny");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_directives_are_ignored() {
        let registry = parse_mtl_str("newmtl A\nPr 0.5\nillum 1\n").expect("parse");
        assert_eq!(registry.get("A").map(|m| m.illumination_model), Some(1));
    }

    #[test]
    fn redeclared_name_last_wins() {
        let src = "newmtl A\nKd 1 1 1\n\nnewmtl A\nKd 0 0 1\n";
        let registry = parse_mtl_str(src).expect("parse");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("A").map(|m| m.diffuse), Some([0.0, 0.0, 1.0]));
    }
}
