//! Text/binary classification and wire encoding of file content.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// How a file's bytes are read, written and decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Binary,
}

const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "ico", "tif", "tiff", "avif", "heic", "pdf",
    "mp3", "wav", "ogg", "flac", "m4a", "webm", "mp4", "mov", "mkv", "avi", "3gp", "zip", "gz",
    "tar", "7z", "rar", "epub", "woff", "woff2", "ttf", "otf", "exe", "bin",
];

const TEXT_EXTENSIONS: &[&str] = &[
    "md", "markdown", "txt", "canvas", "json", "css", "js", "ts", "html", "htm", "xml", "svg",
    "csv", "tsv", "yaml", "yml", "toml", "ini", "base", "excalidraw", "tex", "bib", "org",
];

/// Classify a path by its extension. Unknown extensions are text.
pub fn classify(path: &str) -> ContentKind {
    let Some(ext) = extension(path) else {
        return ContentKind::Text;
    };
    if TEXT_EXTENSIONS.contains(&ext.as_str()) {
        ContentKind::Text
    } else if BINARY_EXTENSIONS.contains(&ext.as_str()) {
        ContentKind::Binary
    } else {
        ContentKind::Text
    }
}

fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Base64 encoding used on the wire
pub fn encode(content: &[u8]) -> String {
    STANDARD.encode(content)
}

/// Decode base64 from the wire; line breaks inserted by the remote are ignored.
pub fn decode(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact)
}
