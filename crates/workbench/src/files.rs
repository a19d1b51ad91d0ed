use std::collections::HashMap;

use snafu::{OptionExt, ensure};

use super::error::{FileNotFoundSnafu, NotAFileSnafu, WorkbenchResult};

/// How long the "Saved" banner stays up after an editor save.
pub const SAVED_BANNER_MILLIS: u64 = 2_000;
/// Simulated latency before a download is handed to the save dialog.
pub const DOWNLOAD_DELAY_MILLIS: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub kind: EntryKind,
    pub modified_label: String,
}

impl FileEntry {
    fn new(name: &str, kind: EntryKind, modified_label: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            modified_label: modified_label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedFile {
    pub name: String,
    pub content: String,
}

/// Bytes handed to the shell's save dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPayload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// In-memory stand-in for a project workspace listing.
#[derive(Debug, Clone)]
pub struct FileBrowser {
    entries: Vec<FileEntry>,
    contents: HashMap<String, String>,
}

impl FileBrowser {
    pub fn new(entries: Vec<FileEntry>, contents: HashMap<String, String>) -> Self {
        Self { entries, contents }
    }

    /// The demo workspace shown next to the chat.
    pub fn sample() -> Self {
        let entries = vec![
            FileEntry::new(".claude", EntryKind::Folder, "2 hours ago"),
            FileEntry::new("marketing-output", EntryKind::Folder, "2 hours ago"),
            FileEntry::new("campaigns", EntryKind::Folder, "1 day ago"),
            FileEntry::new("analytics-report.md", EntryKind::File, "3 hours ago"),
            FileEntry::new("seo-audit-results.json", EntryKind::File, "5 hours ago"),
            FileEntry::new("ad-copy-drafts.txt", EntryKind::File, "1 day ago"),
        ];

        let contents = [
            ("analytics-report.md", SAMPLE_ANALYTICS_REPORT),
            ("seo-audit-results.json", SAMPLE_SEO_AUDIT),
            ("ad-copy-drafts.txt", SAMPLE_AD_COPY),
        ]
        .into_iter()
        .map(|(name, content)| (name.to_string(), content.to_string()))
        .collect();

        Self::new(entries, contents)
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Case-insensitive substring match on entry names, listing order preserved.
    pub fn filter(&self, query: &str) -> Vec<&FileEntry> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn open(&self, name: &str) -> WorkbenchResult<OpenedFile> {
        self.require_file(name, "open-workspace-file")?;

        let content = self
            .contents
            .get(name)
            .cloned()
            .unwrap_or_else(|| empty_file_placeholder(name));
        Ok(OpenedFile {
            name: name.to_string(),
            content,
        })
    }

    /// Replaces the in-memory content for the rest of the process.
    pub fn save(&mut self, name: &str, content: impl Into<String>) -> WorkbenchResult<()> {
        self.require_file(name, "save-workspace-file")?;
        self.contents.insert(name.to_string(), content.into());
        tracing::info!("saved workspace file {name} in memory");
        Ok(())
    }

    pub fn download(&self, name: &str) -> WorkbenchResult<DownloadPayload> {
        self.require_file(name, "download-workspace-file")?;

        let bytes = self
            .contents
            .get(name)
            .map(|content| content.as_bytes().to_vec())
            .unwrap_or_default();
        Ok(DownloadPayload {
            file_name: name.to_string(),
            bytes,
        })
    }

    fn require_file(&self, name: &str, stage: &'static str) -> WorkbenchResult<&FileEntry> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.name == name)
            .context(FileNotFoundSnafu { stage, name })?;
        ensure!(entry.kind == EntryKind::File, NotAFileSnafu { stage, name });
        Ok(entry)
    }
}

pub fn empty_file_placeholder(name: &str) -> String {
    format!("// {name}\n// (empty file)")
}

/// View/edit state for one opened file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEditor {
    name: String,
    buffer: String,
    editing: bool,
    saved_banner: bool,
}

impl FileEditor {
    pub fn open(file: OpenedFile) -> Self {
        Self {
            name: file.name,
            buffer: file.content,
            editing: false,
            saved_banner: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn shows_saved_banner(&self) -> bool {
        self.saved_banner
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
    }

    /// Ignored outside edit mode.
    pub fn set_buffer(&mut self, content: impl Into<String>) {
        if self.editing {
            self.buffer = content.into();
        }
    }

    /// Leaves edit mode, raises the banner and returns the content to persist.
    pub fn save(&mut self) -> String {
        self.editing = false;
        self.saved_banner = true;
        self.buffer.clone()
    }

    /// Timer callback; a no-op if nothing was saved.
    pub fn dismiss_saved_banner(&mut self) {
        self.saved_banner = false;
    }
}

const SAMPLE_ANALYTICS_REPORT: &str = "# Analytics Report\n\n## Overview\nMonthly traffic: 45,000 sessions\nConversion rate: 3.2%\n\n## Key Findings\n- Organic search grew 15% MoM\n- Bounce rate decreased to 42%\n- Top landing page: /pricing\n\n## Recommendations\n1. Optimize mobile experience\n2. Add more CTAs to blog posts\n3. Improve page load speed";

const SAMPLE_SEO_AUDIT: &str = r#"{
  "score": 78,
  "issues": [
    { "type": "warning", "message": "Missing meta descriptions on 12 pages" },
    { "type": "error", "message": "Broken internal links: 3 found" },
    { "type": "info", "message": "Core Web Vitals: LCP 2.4s, FID 80ms, CLS 0.1" }
  ],
  "recommendations": [
    "Add structured data to product pages",
    "Fix canonical URL issues",
    "Improve image alt text coverage"
  ]
}"#;

const SAMPLE_AD_COPY: &str = "Draft 1 - Google Search Ad\nHeadline: Boost Your Marketing ROI | AI-Powered Analytics\nDescription: Get actionable insights in minutes. Start your free trial today.\n\nDraft 2 - Facebook Ad\nHeadline: Stop Guessing, Start Growing\nDescription: Our platform helps 10,000+ marketers make data-driven decisions.\n\nDraft 3 - LinkedIn Ad\nHeadline: Marketing Intelligence for B2B Teams\nDescription: Enterprise-grade analytics without the enterprise price tag.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkbenchError;

    #[test]
    fn filter_is_case_insensitive_and_ordered() {
        let browser = FileBrowser::sample();

        let names = browser
            .filter("SEO")
            .into_iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["seo-audit-results.json"]);

        assert_eq!(browser.filter("").len(), browser.entries().len());
        assert!(browser.filter("nothing-matches").is_empty());
    }

    #[test]
    fn open_returns_canned_content_or_placeholder() {
        let mut browser = FileBrowser::sample();
        let report = browser.open("analytics-report.md").expect("known file");
        assert!(report.content.starts_with("# Analytics Report"));

        browser = FileBrowser::new(
            vec![FileEntry::new("notes.txt", EntryKind::File, "now")],
            HashMap::new(),
        );
        let notes = browser.open("notes.txt").expect("listed file");
        assert_eq!(notes.content, "// notes.txt\n// (empty file)");
    }

    #[test]
    fn folders_and_unknown_names_cannot_be_opened() {
        let browser = FileBrowser::sample();

        assert!(matches!(
            browser.open("campaigns"),
            Err(WorkbenchError::NotAFile { .. })
        ));
        assert!(matches!(
            browser.download("missing.md"),
            Err(WorkbenchError::FileNotFound { .. })
        ));
    }

    #[test]
    fn saved_content_is_served_by_later_opens_and_downloads() {
        let mut browser = FileBrowser::sample();
        browser
            .save("ad-copy-drafts.txt", "rewritten")
            .expect("save listed file");

        assert_eq!(
            browser.open("ad-copy-drafts.txt").map(|file| file.content).ok(),
            Some("rewritten".to_string())
        );
        let payload = browser.download("ad-copy-drafts.txt").expect("download");
        assert_eq!(payload.bytes, b"rewritten".to_vec());
    }

    #[test]
    fn download_of_file_without_content_is_empty() {
        let browser = FileBrowser::new(
            vec![FileEntry::new("blank.md", EntryKind::File, "now")],
            HashMap::new(),
        );
        let payload = browser.download("blank.md").expect("listed file");
        assert_eq!(payload.file_name, "blank.md");
        assert!(payload.bytes.is_empty());
    }

    #[test]
    fn editor_only_accepts_edits_in_edit_mode() {
        let mut editor = FileEditor::open(OpenedFile {
            name: "a.md".to_string(),
            content: "original".to_string(),
        });

        editor.set_buffer("ignored");
        assert_eq!(editor.buffer(), "original");

        editor.start_editing();
        editor.set_buffer("changed");
        let saved = editor.save();

        assert_eq!(saved, "changed");
        assert!(!editor.is_editing());
        assert!(editor.shows_saved_banner());

        editor.dismiss_saved_banner();
        assert!(!editor.shows_saved_banner());
    }
}
