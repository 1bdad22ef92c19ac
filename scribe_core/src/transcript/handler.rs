use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ScribeError, ScribeResult};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const MIN_TRANSCRIPT_CHARS: usize = 50;
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["vtt", "txt", "text"];

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static BRACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("valid regex"));
static BRACKET_SPEAKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[.*?:\]\s*").expect("valid regex"));
static PAREN_SPEAKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(.*?\):\s*").expect("valid regex"));
static MUSIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"♪.*?♪").expect("valid regex"));
static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.!?;:])").expect("valid regex"));
static SENTENCE_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])\s*([a-z])").expect("valid regex"));

/// Turns a WebVTT document into plain running text.
pub fn extract_vtt(content: &str) -> ScribeResult<String> {
    let content = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");

    if !content.trim_start().starts_with("WEBVTT") {
        return Err(ScribeError::Validation(
            "Invalid VTT file: missing WEBVTT header".to_string(),
        ));
    }

    let mut cues = Vec::new();

    // Blocks are separated by blank lines; the first one is the header.
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    for block in blocks.iter().skip(1) {
        let first = block[0].trim_start();
        if first.starts_with("NOTE") || first.starts_with("STYLE") || first.starts_with("REGION")
        {
            continue;
        }

        let Some(timing) = block.iter().position(|line| line.contains("-->")) else {
            continue;
        };

        let raw = block[timing + 1..].join("\n");
        let cleaned = clean_cue(&raw);
        if !cleaned.is_empty() {
            cues.push(cleaned);
        }
    }

    Ok(final_cleanup(&cues.join(" ")))
}

pub fn is_valid_vtt(content: &str) -> bool {
    let Some(first) = content.trim().lines().next() else {
        return false;
    };

    first.trim().trim_start_matches('\u{feff}').starts_with("WEBVTT") && extract_vtt(content).is_ok()
}

/// Decodes an uploaded transcript. `.vtt` files are extracted, `.txt` and
/// `.text` are taken as they are.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> ScribeResult<String> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ScribeError::Validation(
            "Unsupported file type. Please upload .vtt, .txt, or .text files".to_string(),
        ));
    }

    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ScribeError::FileTooLarge {
            size: bytes.len(),
            max: MAX_UPLOAD_BYTES,
        });
    }

    let content = std::str::from_utf8(bytes)
        .map_err(|_| ScribeError::Validation("File must be UTF-8 encoded".to_string()))?;

    let transcript = if extension == "vtt" {
        let extracted = extract_vtt(content)?;
        log::info!(
            "Extracted {} characters from VTT file {} ({} bytes)",
            extracted.chars().count(),
            file_name,
            bytes.len()
        );
        extracted
    } else {
        content.trim().to_string()
    };

    if transcript.is_empty() {
        return Err(ScribeError::Validation(
            "File appears to be empty or contains no text".to_string(),
        ));
    }

    if transcript.chars().count() < MIN_TRANSCRIPT_CHARS {
        return Err(ScribeError::Validation(format!(
            "Transcript too short (minimum {} characters)",
            MIN_TRANSCRIPT_CHARS
        )));
    }

    Ok(transcript)
}

fn clean_cue(text: &str) -> String {
    let text = TAGS.replace_all(text, "");
    let text = BRACES.replace_all(&text, "");
    let text = BRACKET_SPEAKER.replace(&text, "");
    let text = PAREN_SPEAKER.replace(&text, "");
    let text = MUSIC.replace_all(&text, "");
    let text = ANNOTATION.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

fn final_cleanup(transcript: &str) -> String {
    let mut words: Vec<&str> = Vec::new();
    let mut previous: Option<&str> = None;

    // Auto-generated captions often repeat a word across cue seams.
    for word in transcript.split_whitespace() {
        if previous.map_or(true, |p| p.to_lowercase() != word.to_lowercase()) {
            words.push(word);
        }
        previous = Some(word);
    }

    let joined = words.join(" ");
    let joined = SPACE_BEFORE_PUNCT.replace_all(&joined, "$1");
    let joined = SENTENCE_JOIN.replace_all(&joined, "$1 $2");
    joined.trim().to_string()
}
