//! Conversion outcomes to history drafts
//!
//! The conversion pipeline reports which files an action touched; this turns
//! that report into one draft per input file. The action label is opaque to
//! the rest of the crate and only inspected here to derive the file type and
//! the output extension.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{EntryDraft, EntryStatus, FileType};

/// Action that merges several images into one PDF
pub const MERGE_IMAGES_TO_PDF: &str = "MergeImagesToPDF";

/// Action that extracts an MP3 track from a video
pub const EXTRACT_MP3: &str = "ExtractMP3";

/// Prefix of actions that rasterize each PDF page
pub const PDF_PAGES_PREFIX: &str = "PDFPages";

const IMAGE_FORMATS: [&str; 7] = ["PNG", "JPG", "WEBP", "ICO", "BMP", "GIF", "TIFF"];
const VIDEO_FORMATS: [&str; 2] = ["MP4", "MOV"];
const AUDIO_FORMATS: [&str; 3] = ["MP3", "WAV", "M4A"];

/// Ordered lookup from format token to output extension
const OUTPUT_EXTENSIONS: [(&str, &str); 12] = [
    ("PNG", "png"),
    ("JPG", "jpg"),
    ("WEBP", "webp"),
    ("ICO", "ico"),
    ("BMP", "bmp"),
    ("GIF", "gif"),
    ("TIFF", "tiff"),
    ("MP4", "mp4"),
    ("MOV", "mov"),
    ("MP3", "mp3"),
    ("WAV", "wav"),
    ("M4A", "m4a"),
];

/// One input file of a conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedFile {
    pub source: String,
    pub status: EntryStatus,
}

impl ConvertedFile {
    pub fn new(source: impl Into<String>, status: EntryStatus) -> Self {
        Self {
            source: source.into(),
            status,
        }
    }
}

/// A finished conversion action as reported by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub action: String,
    #[serde(rename = "outputDir", default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub files: Vec<ConvertedFile>,
}

impl ConversionOutcome {
    /// One draft per input file; empty when no files were given
    pub fn drafts(&self) -> Vec<EntryDraft> {
        let Some(first) = self.files.first() else {
            return Vec::new();
        };

        let file_type = file_type_for_action(&self.action);
        let extension = output_extension_for_action(&self.action);
        let output_dir = match &self.output_dir {
            Some(dir) => Path::new(dir).to_path_buf(),
            None => Path::new(&first.source)
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };

        self.files
            .iter()
            .map(|file| {
                let stem = Path::new(&file.source)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let output = output_dir.join(format!("{}.{}", stem, extension));
                EntryDraft::new(
                    file.source.clone(),
                    output.to_string_lossy().into_owned(),
                    self.action.clone(),
                    file_type,
                    file.status,
                )
            })
            .collect()
    }
}

/// File type recorded for an action
///
/// Image tokens win over everything else, so a PDF-pages-to-PNG action is
/// logged as an image conversion. Unknown actions default to image.
pub fn file_type_for_action(action: &str) -> FileType {
    if contains_any(action, &IMAGE_FORMATS) || action == MERGE_IMAGES_TO_PDF {
        FileType::Image
    } else if contains_any(action, &VIDEO_FORMATS) || action == EXTRACT_MP3 {
        FileType::Video
    } else if contains_any(action, &AUDIO_FORMATS) {
        FileType::Audio
    } else if action.starts_with(PDF_PAGES_PREFIX) {
        FileType::Document
    } else if action.contains("Markdown") {
        FileType::Markdown
    } else {
        FileType::Image
    }
}

fn contains_any(action: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| action.contains(token))
}

/// Extension of files produced by an action
pub fn output_extension_for_action(action: &str) -> &'static str {
    if let Some(&(_, ext)) = OUTPUT_EXTENSIONS
        .iter()
        .find(|(token, _)| action.contains(*token))
    {
        return ext;
    }
    if action == MERGE_IMAGES_TO_PDF || action.contains("Markdown") {
        "pdf"
    } else {
        "out"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_for_action() {
        assert_eq!(file_type_for_action("BatchToPNG"), FileType::Image);
        assert_eq!(file_type_for_action("PDFPagesToJPG"), FileType::Image);
        assert_eq!(file_type_for_action(MERGE_IMAGES_TO_PDF), FileType::Image);
        assert_eq!(file_type_for_action("BatchToMP4"), FileType::Video);
        assert_eq!(file_type_for_action(EXTRACT_MP3), FileType::Video);
        assert_eq!(file_type_for_action("BatchToWAV"), FileType::Audio);
        assert_eq!(file_type_for_action("PDFPagesToText"), FileType::Document);
        assert_eq!(file_type_for_action("MarkdownToPDF"), FileType::Markdown);
        assert_eq!(file_type_for_action("Mystery"), FileType::Image);
    }

    #[test]
    fn test_output_extension_for_action() {
        assert_eq!(output_extension_for_action("BatchToWEBP"), "webp");
        assert_eq!(output_extension_for_action(EXTRACT_MP3), "mp3");
        assert_eq!(output_extension_for_action(MERGE_IMAGES_TO_PDF), "pdf");
        assert_eq!(output_extension_for_action("MarkdownToPDF"), "pdf");
        assert_eq!(output_extension_for_action("Mystery"), "out");
    }

    #[test]
    fn test_drafts_use_source_dir_by_default() {
        let outcome = ConversionOutcome {
            action: "BatchToJPG".to_string(),
            output_dir: None,
            files: vec![
                ConvertedFile::new("/photos/a.png", EntryStatus::Success),
                ConvertedFile::new("/photos/b.webp", EntryStatus::Failed),
            ],
        };

        let drafts = outcome.drafts();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].source_file, "/photos/a.png");
        assert_eq!(drafts[0].output_file, "/photos/a.jpg");
        assert_eq!(drafts[0].file_type, FileType::Image);
        assert_eq!(drafts[0].conversion_type, "BatchToJPG");
        assert_eq!(drafts[1].output_file, "/photos/b.jpg");
        assert_eq!(drafts[1].status, EntryStatus::Failed);
    }

    #[test]
    fn test_drafts_use_output_dir() {
        let outcome = ConversionOutcome {
            action: "BatchToMP3".to_string(),
            output_dir: Some("/music".to_string()),
            files: vec![ConvertedFile::new("/in/song.wav", EntryStatus::Success)],
        };

        let drafts = outcome.drafts();
        assert_eq!(drafts[0].output_file, "/music/song.mp3");
        assert_eq!(drafts[0].file_type, FileType::Audio);
    }

    #[test]
    fn test_no_files_no_drafts() {
        let outcome = ConversionOutcome {
            action: "BatchToPNG".to_string(),
            output_dir: None,
            files: vec![],
        };
        assert!(outcome.drafts().is_empty());
    }
}
