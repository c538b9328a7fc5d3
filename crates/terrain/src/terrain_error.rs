// ---------------------------------------------------------------------------
// TerrainError: typed failures for terrain generation and configuration
// ---------------------------------------------------------------------------

use std::fmt;

/// Boxed error produced by a pluggable collaborator (noise source, obstruction check).
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while configuring or generating terrain.
#[derive(Debug)]
pub enum TerrainError {
    /// Map width or depth outside `MIN_MAP_SIZE..=MAX_MAP_SIZE`.
    /// Raised before any buffer is allocated.
    InvalidDimension { width: usize, depth: usize },
    /// Any other configuration value outside its documented range.
    InvalidParameter { name: &'static str, value: f32 },
    /// The noise source returned a map that does not match the requested size.
    NoiseShape {
        expected: (usize, usize),
        found: (usize, usize),
    },
    /// The noise source itself failed; the original error is kept as the source.
    NoiseSource(CollaboratorError),
    /// A map preset could not be read.
    PresetIo(std::io::Error),
    /// A map preset could not be parsed.
    PresetParse(serde_json::Error),
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainError::InvalidDimension { width, depth } => write!(
                f,
                "Invalid map dimension: {width}x{depth} (each side must be between {} and {})",
                crate::config::MIN_MAP_SIZE,
                crate::config::MAX_MAP_SIZE
            ),
            TerrainError::InvalidParameter { name, value } => {
                write!(f, "Invalid terrain parameter {name}: {value}")
            }
            TerrainError::NoiseShape { expected, found } => write!(
                f,
                "Noise map shape mismatch: expected {}x{}, got {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
            TerrainError::NoiseSource(e) => write!(f, "Noise source failed: {e}"),
            TerrainError::PresetIo(e) => write!(f, "Preset I/O error: {e}"),
            TerrainError::PresetParse(e) => write!(f, "Preset parse error: {e}"),
        }
    }
}

impl std::error::Error for TerrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TerrainError::NoiseSource(e) => Some(e.as_ref()),
            TerrainError::PresetIo(e) => Some(e),
            TerrainError::PresetParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TerrainError {
    fn from(e: std::io::Error) -> Self {
        TerrainError::PresetIo(e)
    }
}

impl From<serde_json::Error> for TerrainError {
    fn from(e: serde_json::Error) -> Self {
        TerrainError::PresetParse(e)
    }
}
