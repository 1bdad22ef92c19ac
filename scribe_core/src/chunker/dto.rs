use serde::{Deserialize, Serialize};

/// Boundaries tried when cutting a chunk, strongest first.
pub const BOUNDARIES: [&str; 4] = ["\n\n", "\n", ". ", " "];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub index: usize,
    pub content: String,
}

/// Sizes are counted in characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    pub target_size: usize,
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            target_size: 4000,
            overlap: 200,
        }
    }
}

impl From<(usize, usize)> for ChunkerConfig {
    fn from((target_size, overlap): (usize, usize)) -> Self {
        Self {
            target_size,
            overlap,
        }
    }
}
