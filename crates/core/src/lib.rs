//! Core shared types and errors (renderer-agnostic).
//!
//! Every fallible load step returns [`LoadResult`]. Line numbers are 1-based and
//! `content` is the trimmed source line the error was raised on.

use std::{fmt, io};

use thiserror::Error;

/// Attribute namespace an OBJ index points into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Position => "position",
            AttributeKind::TexCoord => "texcoord",
            AttributeKind::Normal => "normal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Asset '{name}' not found or unreadable: {source}")]
    AssetNotFound {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read asset '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Malformed {expected} '{token}' on line {line}: '{content}'")]
    MalformedNumericLiteral {
        line: usize,
        token: String,
        expected: &'static str,
        content: String,
    },

    #[error("Malformed directive on line {line} ({reason}): '{content}'")]
    MalformedDirective {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("Unresolved {attribute} index {index} on line {line} ({available} available)")]
    UnresolvedAttributeIndex {
        line: usize,
        attribute: AttributeKind,
        index: i64,
        available: usize,
    },

    #[error("Material property before any 'newmtl' on line {line}: '{content}'")]
    MissingActiveMaterial { line: usize, content: String },

    #[error("In material library '{name}': {source}")]
    InMaterialLibrary {
        name: String,
        #[source]
        source: Box<LoadError>,
    },

    #[error("Material library '{name}' unavailable: {source}")]
    MaterialLibraryUnavailable {
        name: String,
        #[source]
        source: Box<LoadError>,
    },
}

impl LoadError {
    /// Only a missing material library lets a load continue (without colors).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LoadError::MaterialLibraryUnavailable { .. })
    }

    /// Source line the error points at, if it came from a parser.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::MalformedNumericLiteral { line, .. }
            | LoadError::MalformedDirective { line, .. }
            | LoadError::UnresolvedAttributeIndex { line, .. }
            | LoadError::MissingActiveMaterial { line, .. } => Some(*line),
            LoadError::InMaterialLibrary { source, .. } => source.line(),
            _ => None,
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;
