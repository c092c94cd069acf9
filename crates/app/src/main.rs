//! Command-line front end: load one OBJ model from a directory and report the
//! flattened buffers it produced.

use std::path::PathBuf;

use anyhow::{Context, Result};
use asset::{DirectorySource, LoadOptions, Model};

#[derive(Debug)]
struct Args {
    assets: PathBuf,
    model: String,
    load_materials: bool,
    show_bytes: bool,
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Args> {
    // Accept: --assets=DIR --model=NAME --no-materials --show-bytes
    let mut assets = PathBuf::from(".");
    let mut model: Option<String> = None;
    let mut load_materials = true;
    let mut show_bytes = false;

    for arg in args {
        if let Some(val) = arg.strip_prefix("--assets=") {
            assets = PathBuf::from(val);
        } else if let Some(val) = arg.strip_prefix("--model=") {
            model = Some(val.to_owned());
        } else if arg == "--no-materials" {
            load_materials = false;
        } else if arg == "--show-bytes" {
            show_bytes = true;
        } else {
            log::warn!("Unknown argument '{}', ignoring.", arg);
        }
    }

    let model = model.context("missing --model=NAME")?;
    Ok(Args {
        assets,
        model: with_obj_extension(model),
        load_materials,
        show_bytes,
    })
}

/// `bowser` -> `bowser.obj`; names with an extension are kept.
fn with_obj_extension(name: String) -> String {
    if std::path::Path::new(&name).extension().is_some() {
        name
    } else {
        format!("{name}.obj")
    }
}

fn report(model: &Model, show_bytes: bool) {
    let b = &model.buffers;
    println!("model      {}", model.name);
    println!("faces      {}", model.geometry.faces.len());
    println!("positions  {}", b.position_count());
    println!("normals    {}", b.normal_count());
    println!("uvs        {}", b.uv_count());
    match (b.diffuse_count(), b.ambient_count()) {
        (Some(d), Some(a)) => println!("colors     diffuse={d} ambient={a}"),
        _ => println!("colors     none"),
    }
    println!("materials  {}", model.materials.len());
    if !model.geometry.missing_libraries.is_empty() {
        println!(
            "missing    {}",
            model.geometry.missing_libraries.join(", ")
        );
    }
    if !b.is_uniform() {
        println!("note       attribute buffers have independent lengths");
    }
    if show_bytes {
        println!(
            "bytes      position={} normal={} uv={} diffuse={} ambient={}",
            b.position_bytes().len(),
            b.normal_bytes().len(),
            b.uv_bytes().len(),
            b.diffuse_bytes().map_or(0, <[u8]>::len),
            b.ambient_bytes().map_or(0, <[u8]>::len),
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;
    log::info!(
        "Loading '{}' from {} (materials={})",
        args.model,
        args.assets.display(),
        args.load_materials
    );

    let source = DirectorySource::new(&args.assets);
    let options = LoadOptions {
        load_materials: args.load_materials,
    };
    let model = asset::load_model(&source, &args.model, &options)
        .with_context(|| format!("Failed to load model '{}'", args.model))?;

    report(&model, args.show_bytes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_and_extension() {
        let parsed = args(&["--model=bowser"]).expect("args");
        assert_eq!(parsed.model, "bowser.obj");
        assert_eq!(parsed.assets, PathBuf::from("."));
        assert!(parsed.load_materials);
        assert!(!parsed.show_bytes);
    }

    #[test]
    fn flags() {
        let parsed = args(&[
            "--assets=models",
            "--model=ship.obj",
            "--no-materials",
            "--show-bytes",
            "--bogus",
        ])
        .expect("args");
        assert_eq!(parsed.model, "ship.obj");
        assert_eq!(parsed.assets, PathBuf::from("models"));
        assert!(!parsed.load_materials);
        assert!(parsed.show_bytes);
    }

    #[test]
    fn model_is_required() {
        assert!(args(&["--assets=x"]).is_err());
    }
}
