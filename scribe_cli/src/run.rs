use std::{fs, path::Path, sync::Arc};

use anyhow::{Context, Result};
use scribe_core::{
    config::Settings,
    llm::handler::{LanguageModel, OllamaClient},
    summarizer::{
        dto::{SummarizationResult, SummaryStyle},
        handler::Summarizer,
    },
    transcript::handler::extract_vtt,
};

/// Reads a transcript from disk. `.vtt` files are reduced to their spoken text.
pub fn read_transcript(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    let is_vtt = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("vtt"));

    if is_vtt {
        let text = extract_vtt(&content)?;
        log::info!(
            "Extracted {} characters from {}",
            text.chars().count(),
            path.display()
        );
        Ok(text)
    } else {
        Ok(content)
    }
}

pub fn ollama(settings: &Settings) -> Arc<dyn LanguageModel> {
    Arc::new(OllamaClient::new(
        &settings.ollama_base_url,
        &settings.ollama_model,
    ))
}

pub async fn summarize_file(
    llm: Arc<dyn LanguageModel>,
    settings: &Settings,
    input: &Path,
    style: SummaryStyle,
) -> Result<SummarizationResult> {
    let text = read_transcript(input)?;
    let summarizer = Summarizer::new(llm, settings.engine_config())?;

    Ok(summarizer.summarize(&text, style).await?)
}

pub fn write_summary(result: &SummarizationResult, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, &result.summary)
                .with_context(|| format!("Could not write {}", path.display()))?;
            eprintln!("Summary saved to {}", path.display());
        }
        None => {
            println!("{}", "=".repeat(50));
            println!("SUMMARY");
            println!("{}", "=".repeat(50));
            println!("{}", result.summary);
        }
    }

    Ok(())
}

pub fn format_stats(result: &SummarizationResult) -> String {
    format!(
        "Original length: {} characters\nSummary length: {} characters\nCompression ratio: {:.2}x\nChunks processed: {}",
        result.original_length, result.summary_length, result.compression_ratio, result.chunk_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_plain_transcript() {
        let file = temp_file(".txt", "Alice: hello\nBob: hi");
        assert_eq!(read_transcript(file.path()).unwrap(), "Alice: hello\nBob: hi");
    }

    #[test]
    fn test_read_vtt_transcript() {
        let file = temp_file(
            ".VTT",
            "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\n<v Alice>Hello everyone</v>\n",
        );
        assert_eq!(read_transcript(file.path()).unwrap(), "Hello everyone");

        let broken = temp_file(".vtt", "not a subtitle file");
        assert!(read_transcript(broken.path()).is_err());
    }

    #[test]
    fn test_missing_file_mentions_path() {
        let err = read_transcript(Path::new("/nonexistent/meeting.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/meeting.txt"));
    }

    #[test]
    fn test_format_stats() {
        let result = SummarizationResult::new(
            &"a".repeat(300),
            "b".repeat(100),
            2,
            SummaryStyle::Brief,
        );
        let stats = format_stats(&result);
        assert!(stats.contains("Original length: 300 characters"));
        assert!(stats.contains("Compression ratio: 3.00x"));
        assert!(stats.contains("Chunks processed: 2"));
    }

    #[test]
    fn test_write_summary_to_file() {
        let output = NamedTempFile::new().unwrap();
        let result = SummarizationResult::new("original text", "short".to_string(), 1, SummaryStyle::Brief);
        write_summary(&result, Some(output.path())).unwrap();
        assert_eq!(fs::read_to_string(output.path()).unwrap(), "short");
    }
}
