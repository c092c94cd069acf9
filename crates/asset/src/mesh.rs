//! CPU-side geometry as parsed from an OBJ file, before flattening.
//!
//! All indices stored here are 0-based and were checked against the attribute
//! lists as they stood when the face line was read.

/// Which of the four OBJ corner spellings a [`CornerRef`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CornerForm {
    /// `v`
    Position,
    /// `v/vt`
    PositionTexCoord,
    /// `v//vn`
    PositionNormal,
    /// `v/vt/vn`
    Full,
}

/// One face corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CornerRef {
    pub position: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

impl CornerRef {
    pub fn new(position: usize, texcoord: Option<usize>, normal: Option<usize>) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }

    pub fn form(&self) -> CornerForm {
        match (self.texcoord, self.normal) {
            (None, None) => CornerForm::Position,
            (Some(_), None) => CornerForm::PositionTexCoord,
            (None, Some(_)) => CornerForm::PositionNormal,
            (Some(_), Some(_)) => CornerForm::Full,
        }
    }
}

/// A polygon with its corners in file order and the material active when it was read.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub corners: Vec<CornerRef>,
    pub material: Option<String>,
    /// 1-based source line.
    pub line: usize,
}

/// Everything an OBJ file declared, in file order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub faces: Vec<Face>,
    /// Library names as referenced by `mtllib`, in order.
    pub material_libraries: Vec<String>,
    /// Libraries that could not be opened; the load continued without them.
    pub missing_libraries: Vec<String>,
}

impl ObjGeometry {
    /// Total corners across all faces; the flattened position count.
    pub fn corner_count(&self) -> usize {
        self.faces.iter().map(|f| f.corners.len()).sum()
    }
}
