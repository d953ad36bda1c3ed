//! History entry types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of file a conversion operated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
    Audio,
    Document,
    Markdown,
}

impl FileType {
    /// Every file type, in display order
    pub const ALL: [FileType; 5] = [
        FileType::Image,
        FileType::Video,
        FileType::Audio,
        FileType::Document,
        FileType::Markdown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Video => "video",
            FileType::Audio => "audio",
            FileType::Document => "document",
            FileType::Markdown => "markdown",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown file type '{}'", s))
    }
}

/// Outcome of a single conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Success,
    Failed,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::Success => write!(f, "success"),
            EntryStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One logged conversion outcome
///
/// Entries are immutable once written. `id` and `timestamp` are assigned by
/// the history manager; everything else comes from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(rename = "sourceFile")]
    pub source_file: String,
    #[serde(rename = "outputFile")]
    pub output_file: String,
    #[serde(rename = "conversionType")]
    pub conversion_type: String,
    #[serde(rename = "fileType")]
    pub file_type: FileType,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub status: EntryStatus,
}

impl HistoryEntry {
    /// Build an entry from a draft with the given identity
    pub fn from_draft(draft: EntryDraft, id: String, timestamp: i64) -> Self {
        Self {
            id,
            source_file: draft.source_file,
            output_file: draft.output_file,
            conversion_type: draft.conversion_type,
            file_type: draft.file_type,
            timestamp,
            status: draft.status,
        }
    }
}

/// Caller-supplied fields of a new entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    #[serde(rename = "sourceFile")]
    pub source_file: String,
    #[serde(rename = "outputFile")]
    pub output_file: String,
    #[serde(rename = "conversionType")]
    pub conversion_type: String,
    #[serde(rename = "fileType")]
    pub file_type: FileType,
    pub status: EntryStatus,
}

impl EntryDraft {
    pub fn new(
        source_file: impl Into<String>,
        output_file: impl Into<String>,
        conversion_type: impl Into<String>,
        file_type: FileType,
        status: EntryStatus,
    ) -> Self {
        Self {
            source_file: source_file.into(),
            output_file: output_file.into(),
            conversion_type: conversion_type.into(),
            file_type,
            status,
        }
    }
}

/// Number of entries per file type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryCounts {
    pub all: usize,
    pub image: usize,
    pub video: usize,
    pub audio: usize,
    pub document: usize,
    pub markdown: usize,
}

impl EntryCounts {
    /// Tally a slice of entries
    pub fn tally(entries: &[HistoryEntry]) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            counts.record(entry.file_type);
        }
        counts
    }

    fn record(&mut self, file_type: FileType) {
        self.all += 1;
        match file_type {
            FileType::Image => self.image += 1,
            FileType::Video => self.video += 1,
            FileType::Audio => self.audio += 1,
            FileType::Document => self.document += 1,
            FileType::Markdown => self.markdown += 1,
        }
    }

    /// Count for a single file type
    pub fn get(&self, file_type: FileType) -> usize {
        match file_type {
            FileType::Image => self.image,
            FileType::Video => self.video,
            FileType::Audio => self.audio,
            FileType::Document => self.document,
            FileType::Markdown => self.markdown,
        }
    }
}
