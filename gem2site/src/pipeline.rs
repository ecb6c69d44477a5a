//! Tree conversion pipeline
//!
//! This module orchestrates the conversion of a source tree:
//! 1. **Discovery**: Walk the source root and collect regular files
//! 2. **Decision**: Compare modification times to convert, copy or skip
//! 3. **Output**: Render documents (parse, render, assemble) or copy other
//!    files, writing through a temporary file that is renamed into place
//!
//! Every file is an independent unit of work. Failures are recorded in the
//! [`ConversionReport`] and never stop the walk.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::cancel::CancellationToken;
use crate::document_renderer::{render_document, RenderedDocument};
use crate::gemtext;
use crate::highlight::Highlighter;
use crate::line_renderer::CodeHighlight;
use crate::page_assembler::{PageAssembler, PageError};
use crate::site_config::RenderConfig;
use crate::walker::{self, ConversionDecision, WalkerError};

/// Errors affecting a single file
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unable to read directory entry {path}: {source}", path = .0.display(), source = .1)]
    Walk(PathBuf, #[source] walkdir::Error),

    #[error("Source file {path} is outside the source root", path = .0.display())]
    OutsideSource(PathBuf),

    #[error("Unable to check stat of {path}: {source}", path = .0.display(), source = .1)]
    Stat(PathBuf, #[source] io::Error),

    #[error("IO error reading {path}: {source}", path = .0.display(), source = .1)]
    Read(PathBuf, #[source] io::Error),

    #[error("Failed to create dir {path}: {source}", path = .0.display(), source = .1)]
    CreateDir(PathBuf, #[source] io::Error),

    #[error("Failed to write {path}: {source}", path = .0.display(), source = .1)]
    Write(PathBuf, #[source] io::Error),

    #[error("Failed to render {path}: {source}", path = .0.display(), source = .1)]
    Page(PathBuf, #[source] PageError),
}

/// Result of processing one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Converted,
    Copied,
    Skipped,
}

/// A file that could not be processed
#[derive(Debug)]
pub struct FileFailure {
    /// Source path of the file
    pub source: PathBuf,
    /// What went wrong
    pub error: ConvertError,
}

/// Aggregate result of a tree conversion
#[derive(Debug, Default)]
pub struct ConversionReport {
    /// Documents rendered to HTML
    pub converted: Vec<PathBuf>,
    /// Other files copied verbatim
    pub copied: Vec<PathBuf>,
    /// Files whose destination was already up to date
    pub skipped: Vec<PathBuf>,
    /// Files that failed, in walk order
    pub failed: Vec<FileFailure>,
    /// Whether cancellation stopped the walk before every file was started
    pub cancelled: bool,
}

impl ConversionReport {
    fn record(&mut self, source: PathBuf, result: Result<FileOutcome, ConvertError>) {
        match result {
            Ok(FileOutcome::Converted) => self.converted.push(source),
            Ok(FileOutcome::Copied) => self.copied.push(source),
            Ok(FileOutcome::Skipped) => self.skipped.push(source),
            Err(error) => {
                log::warn!("{}", error);
                self.failed.push(FileFailure { source, error });
            }
        }
    }

    /// True when no file failed and the walk ran to completion
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }

    /// One-line summary of the walk
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} converted, {} copied, {} skipped (up to date), {} failed",
            self.converted.len(),
            self.copied.len(),
            self.skipped.len(),
            self.failed.len()
        );
        if self.cancelled {
            summary.push_str(" (cancelled)");
        }
        summary
    }
}

/// Converts gemtext source trees into HTML sites
///
/// Holds everything shared between files for one run: the compiled page
/// template, the loaded highlighter and the immutable configuration.
pub struct SiteBuilder {
    config: RenderConfig,
    assembler: PageAssembler,
    highlighter: Option<Highlighter>,
}

impl SiteBuilder {
    /// Prepare a builder for one run
    ///
    /// Syntax definitions are only loaded when highlighting is enabled.
    ///
    /// # Returns
    /// * `Ok(SiteBuilder)` - Ready to convert
    /// * `Err(PageError)` - The page template does not compile
    pub fn new(config: RenderConfig) -> Result<Self, PageError> {
        let assembler = PageAssembler::new(&config)?;
        let highlighter = config.highlight_style.as_ref().map(|_| Highlighter::new());

        Ok(Self {
            config,
            assembler,
            highlighter,
        })
    }

    /// The configuration this builder was created with
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The loaded highlighter, if highlighting is enabled
    pub fn highlighter(&self) -> Option<&Highlighter> {
        self.highlighter.as_ref()
    }

    fn code_highlight(&self) -> Option<CodeHighlight<'_>> {
        let highlighter = self.highlighter.as_ref()?;
        let style = self.config.highlight_style.as_deref()?;
        Some(CodeHighlight { highlighter, style })
    }

    /// Render raw gemtext bytes to a document title and content fragment
    pub fn render_document(&self, bytes: &[u8]) -> RenderedDocument {
        let lines = gemtext::parse(bytes);
        render_document(&lines, self.code_highlight())
    }

    /// Render raw gemtext bytes to a complete HTML page
    pub fn render_page(&self, bytes: &[u8]) -> Result<String, PageError> {
        let document = self.render_document(bytes);
        self.assembler.assemble_document(&document)
    }

    /// Convert every file under `source_root` into `dest_root`
    ///
    /// # Parameters
    /// * `source_root` - Directory containing the gemtext site
    /// * `dest_root` - Directory receiving the HTML site
    /// * `cancel` - Checked before each file is started
    ///
    /// # Returns
    /// * `Ok(ConversionReport)` - Outcome for every file, including failures
    /// * `Err(WalkerError)` - The source root could not be read
    pub fn convert_tree(
        &self,
        source_root: &Path,
        dest_root: &Path,
        cancel: &CancellationToken,
    ) -> Result<ConversionReport, WalkerError> {
        let discovery = walker::discover_files(source_root)?;
        log::info!(
            "Found {} files under {}",
            discovery.files.len(),
            source_root.display()
        );

        let mut report = ConversionReport::default();
        for (path, error) in discovery.unreadable {
            report.record(path.clone(), Err(ConvertError::Walk(path, error)));
        }

        let process = |source: &PathBuf| {
            if cancel.is_cancelled() {
                return None;
            }
            Some(self.process_file(source_root, dest_root, source))
        };

        #[cfg(feature = "parallel")]
        let results: Vec<_> = discovery.files.par_iter().map(process).collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = discovery.files.iter().map(process).collect();

        for (source, result) in discovery.files.into_iter().zip(results) {
            match result {
                Some(result) => report.record(source, result),
                None => report.cancelled = true,
            }
        }

        Ok(report)
    }

    /// Decide and carry out the conversion of one file
    fn process_file(
        &self,
        source_root: &Path,
        dest_root: &Path,
        source: &Path,
    ) -> Result<FileOutcome, ConvertError> {
        let destination = walker::destination_for(source_root, dest_root, source)
            .ok_or_else(|| ConvertError::OutsideSource(source.to_path_buf()))?;

        let metadata =
            fs::metadata(source).map_err(|e| ConvertError::Stat(source.to_path_buf(), e))?;
        let decision = walker::decide(source, &metadata, &destination)
            .map_err(|e| ConvertError::Stat(destination.clone(), e))?;
        log::debug!("{} -> {:?}", source.display(), decision);

        match decision {
            ConversionDecision::Skip => {
                log::debug!(
                    "Skip target {} as already up to date.",
                    destination.display()
                );
                Ok(FileOutcome::Skipped)
            }
            ConversionDecision::Convert => {
                let bytes =
                    fs::read(source).map_err(|e| ConvertError::Read(source.to_path_buf(), e))?;
                let page = self
                    .render_page(&bytes)
                    .map_err(|e| ConvertError::Page(source.to_path_buf(), e))?;
                write_atomic(&destination, &metadata, |file| file.write_all(page.as_bytes()))?;
                log::info!("Converted {} -> {}", source.display(), destination.display());
                Ok(FileOutcome::Converted)
            }
            ConversionDecision::Copy => {
                let mut input =
                    File::open(source).map_err(|e| ConvertError::Read(source.to_path_buf(), e))?;
                write_atomic(&destination, &metadata, |file| {
                    io::copy(&mut input, file).map(|_| ())
                })?;
                log::info!("Copied {} -> {}", source.display(), destination.display());
                Ok(FileOutcome::Copied)
            }
        }
    }
}

/// Write a destination file through a temporary file in the same directory
///
/// Parent directories are created as needed. The temporary file receives
/// the source file's permissions and is renamed over the destination once
/// fully written, so readers never observe a partial file.
fn write_atomic<F>(
    destination: &Path,
    source_metadata: &fs::Metadata,
    fill: F,
) -> Result<(), ConvertError>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let parent = destination
        .parent()
        .ok_or_else(|| ConvertError::OutsideSource(destination.to_path_buf()))?;
    fs::create_dir_all(parent).map_err(|e| ConvertError::CreateDir(parent.to_path_buf(), e))?;

    let write_err = |e: io::Error| ConvertError::Write(destination.to_path_buf(), e);

    let mut temp = NamedTempFile::new_in(parent).map_err(write_err)?;
    fill(temp.as_file_mut()).map_err(write_err)?;
    temp.as_file()
        .set_permissions(source_metadata.permissions())
        .map_err(write_err)?;
    temp.persist(destination).map_err(|e| write_err(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn builder() -> SiteBuilder {
        let config = RenderConfig {
            highlight_style: None,
            ..RenderConfig::default()
        };
        SiteBuilder::new(config).unwrap()
    }

    #[test]
    fn test_render_page_end_to_end() {
        let page = builder()
            .render_page(b"# Title\n\n=> /x.gmi Link\n* item1\n* item2\n")
            .unwrap();

        assert!(page.contains("<title>Title</title>"));
        assert_eq!(page.matches(r#"<div class="empty-line"></div>"#).count(), 1);
        assert!(page.contains(r#"<p><a href="/x.html">Link</a></p>"#));
        assert_eq!(page.matches("<ul>").count(), 1);
        assert!(page.contains("<ul>\n    <li>item1</li>\n    <li>item2</li>\n</ul>"));
    }

    #[test]
    fn test_highlighter_only_loaded_when_enabled() {
        assert!(builder().highlighter().is_none());
        let enabled = SiteBuilder::new(RenderConfig::default()).unwrap();
        assert!(enabled.highlighter().is_some());
    }

    #[test]
    fn test_write_atomic_creates_parents() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "x").unwrap();
        let metadata = fs::metadata(&source).unwrap();

        let destination = dir.path().join("a/b/c/out.txt");
        write_atomic(&destination, &metadata, |file| file.write_all(b"hello")).unwrap();

        assert_eq!(fs::read_to_string(&destination).unwrap(), "hello");
        let leftovers: Vec<_> = fs::read_dir(dir.path().join("a/b/c")).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_write_atomic_failed_fill_leaves_destination_untouched() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.txt");
        fs::write(&source, "x").unwrap();
        let metadata = fs::metadata(&source).unwrap();

        let destination = dir.path().join("out.txt");
        fs::write(&destination, "previous").unwrap();

        let result = write_atomic(&destination, &metadata, |_| {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        });

        assert!(matches!(result, Err(ConvertError::Write(..))));
        assert_eq!(fs::read_to_string(&destination).unwrap(), "previous");
    }

    #[test]
    fn test_report_summary() {
        let mut report = ConversionReport::default();
        report.record(PathBuf::from("a.gmi"), Ok(FileOutcome::Converted));
        report.record(PathBuf::from("b.png"), Ok(FileOutcome::Copied));
        report.record(PathBuf::from("c.gmi"), Ok(FileOutcome::Skipped));
        report.record(
            PathBuf::from("d.gmi"),
            Err(ConvertError::OutsideSource(PathBuf::from("d.gmi"))),
        );

        assert_eq!(
            report.summary(),
            "1 converted, 1 copied, 1 skipped (up to date), 1 failed"
        );
        assert!(!report.is_success());
    }
}
