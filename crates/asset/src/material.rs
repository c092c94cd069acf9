//! Materials parsed from MTL libraries and the name-keyed registry that holds them.

use std::collections::HashMap;

/// One `newmtl` block. Vector fields are zero until set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    pub name: String,
    /// `Ka`
    pub ambient: [f32; 3],
    /// `Kd`
    pub diffuse: [f32; 3],
    /// `Ks`
    pub specular: [f32; 3],
    /// `Ke`
    pub emissive: [f32; 3],
    /// `Tf`
    pub transmission_filter: [f32; 3],
    /// `Ns`
    pub specular_exponent: f32,
    /// `Ni`
    pub optical_density: f32,
    /// `d`, or `1 - Tr`
    pub dissolve: f32,
    /// `illum`
    pub illumination_model: i32,
    pub sharpness: i32,
    /// Texture file names as written in the library. Never loaded here.
    pub maps: TextureMaps,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextureMaps {
    pub ambient: Option<String>,
    pub diffuse: Option<String>,
    pub specular: Option<String>,
    pub specular_exponent: Option<String>,
    pub dissolve: Option<String>,
    pub bump: Option<String>,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Material name -> material. Last insert of a name wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialRegistry {
    materials: HashMap<String, Material>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Insert or overwrite by name, returning the replaced entry.
    pub fn insert(&mut self, material: Material) -> Option<Material> {
        let previous = self.materials.insert(material.name.clone(), material);
        if let Some(prev) = &previous {
            log::debug!("Material '{}' redeclared; keeping the later one", prev.name);
        }
        previous
    }

    /// Merge another registry into this one; entries from `other` win.
    pub fn extend(&mut self, other: MaterialRegistry) {
        for (_, material) in other.materials {
            self.insert(material);
        }
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_is_none() {
        let registry = MaterialRegistry::new();
        assert!(registry.get("Red").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn insert_overwrites_by_name() {
        let mut registry = MaterialRegistry::new();
        let mut red = Material::new("Red");
        red.diffuse = [1.0, 0.0, 0.0];
        assert!(registry.insert(red).is_none());

        let mut red2 = Material::new("Red");
        red2.diffuse = [0.5, 0.0, 0.0];
        let replaced = registry.insert(red2).expect("replaced");
        assert_eq!(replaced.diffuse, [1.0, 0.0, 0.0]);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("Red").map(|m| m.diffuse), Some([0.5, 0.0, 0.0]));
    }

    #[test]
    fn extend_merges() {
        let mut a = MaterialRegistry::new();
        a.insert(Material::new("A"));
        let mut b = MaterialRegistry::new();
        b.insert(Material::new("B"));
        a.extend(b);

        let mut names: Vec<_> = a.names().collect();
        names.sort_unstable();
        assert_eq!(names, ["A", "B"]);
        assert!(a.contains("B"));
    }

    #[test]
    fn new_material_is_zero_filled() {
        let m = Material::new("Blank");
        assert_eq!(m.ambient, [0.0; 3]);
        assert_eq!(m.transmission_filter, [0.0; 3]);
        assert_eq!(m.dissolve, 0.0);
        assert_eq!(m.maps, TextureMaps::default());
    }
}
