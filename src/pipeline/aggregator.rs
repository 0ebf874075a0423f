use crate::error::{ListingError, Result};
use crate::job::CancelFlag;
use crate::scanner::FileRecord;
use serde::Serialize;
use std::fs;
use std::time::{Duration, Instant};

/// Ordered non-blank lines from every qualifying file, in file order then
/// line order. Both output artifacts are rendered from this one sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_content(&mut self, content: &str) -> usize {
        let before = self.lines.len();
        self.lines.extend(
            content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );
        self.lines.len() - before
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

impl<S: Into<String>> FromIterator<S> for LineBuffer {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter
                .into_iter()
                .map(Into::into)
                .filter(|line: &String| !line.trim().is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AggregationProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub lines_collected: usize,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl AggregationProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            lines_collected: 0,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn update_file(&mut self, filename: String, lines: usize) {
        self.files_processed += 1;
        self.lines_collected += lines;
        self.current_file = Some(filename);
    }

    /// `floor(processed * 100 / total)`; an empty run counts as complete.
    pub fn percent(&self) -> u8 {
        if self.total_files == 0 {
            return 100;
        }
        ((self.files_processed * 100) / self.total_files).min(100) as u8
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

pub struct Aggregator {
    cancel_flag: Option<CancelFlag>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self { cancel_flag: None }
    }

    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Read every qualifying file and collect its non-blank lines.
    ///
    /// `on_progress` receives the percent complete after each file, and a
    /// single 100 when there is nothing to read. The first unreadable file
    /// aborts the whole aggregation.
    pub fn aggregate<F>(&self, qualifying: &[FileRecord], mut on_progress: F) -> Result<LineBuffer>
    where
        F: FnMut(&AggregationProgress),
    {
        let mut buffer = LineBuffer::new();
        let mut progress = AggregationProgress::new(qualifying.len());

        if qualifying.is_empty() {
            on_progress(&progress);
            return Ok(buffer);
        }

        for record in qualifying {
            if let Some(ref flag) = self.cancel_flag {
                flag.check()?;
            }

            let content = read_text(record)?;
            let added = buffer.push_content(&content);
            tracing::debug!(file = %record.display_path(), lines = added, "Aggregated file");

            progress.update_file(record.name.clone(), added);
            on_progress(&progress);
        }

        Ok(buffer)
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect the non-blank lines of `qualifying`, reporting integer percents.
pub fn aggregate<F>(qualifying: &[FileRecord], mut on_progress: F) -> Result<LineBuffer>
where
    F: FnMut(u8),
{
    Aggregator::new().aggregate(qualifying, |progress| on_progress(progress.percent()))
}

fn read_text(record: &FileRecord) -> Result<String> {
    let content = fs::read_to_string(&record.full_path).map_err(|source| ListingError::FileRead {
        path: record.full_path.clone(),
        source,
    })?;

    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}
