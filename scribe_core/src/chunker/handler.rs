use crate::{
    chunker::dto::{Chunk, ChunkerConfig, BOUNDARIES},
    error::{ScribeError, ScribeResult},
};

/// Splits text into overlapping chunks, cutting at the strongest boundary
/// that still fits the target size.
#[derive(Debug, Clone)]
pub struct TextChunker {
    config: ChunkerConfig,
}

impl TextChunker {
    pub fn new(config: ChunkerConfig) -> ScribeResult<Self> {
        if config.target_size == 0 {
            return Err(ScribeError::Configuration(
                "chunk size must be greater than zero".to_string(),
            ));
        }

        if config.overlap >= config.target_size {
            return Err(ScribeError::Configuration(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                config.overlap, config.target_size
            )));
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> ChunkerConfig {
        self.config
    }

    pub fn split(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        // Byte offset of every char, plus the end of the text.
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = offsets.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            if total - start <= self.config.target_size {
                chunks.push(Chunk {
                    index: chunks.len(),
                    content: text[offsets[start]..].to_string(),
                });
                break;
            }

            let window_end = start + self.config.target_size;
            let end = self
                .find_cut(text, &offsets, start, window_end)
                .unwrap_or(window_end);

            chunks.push(Chunk {
                index: chunks.len(),
                content: text[offsets[start]..offsets[end]].to_string(),
            });

            start = end - self.config.overlap;
        }

        chunks
    }

    /// Returns the char position right after the last boundary of the first
    /// kind that leaves a chunk longer than the overlap.
    fn find_cut(
        &self,
        text: &str,
        offsets: &[usize],
        start: usize,
        window_end: usize,
    ) -> Option<usize> {
        let window = &text[offsets[start]..offsets[window_end]];

        for boundary in BOUNDARIES {
            let Some(pos) = window.rfind(boundary) else {
                continue;
            };

            let cut_byte = offsets[start] + pos + boundary.len();
            let cut = offsets.partition_point(|&offset| offset < cut_byte);

            if cut - start > self.config.overlap {
                return Some(cut);
            }
        }

        None
    }
}
