use chrono::{Local, NaiveDateTime};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{FILENAME_URL_PREFIX_CHARS, TIMESTAMP_FORMAT};
use crate::types::OutputFormat;

/// Writes extracted content to `{dir}/{url-prefix}_{timestamp}.{format}`.
#[derive(Debug, Clone)]
pub struct ResultSink {
    dir: PathBuf,
}

impl ResultSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `content` under a name derived from `url` and the current time.
    pub async fn save(&self, url: &str, content: &str, format: OutputFormat) -> io::Result<PathBuf> {
        self.save_at(url, content, format, Local::now().naive_local())
            .await
    }

    /// Save with an explicit timestamp. A file saved in the same second for
    /// the same URL prefix is overwritten.
    pub async fn save_at(
        &self,
        url: &str,
        content: &str,
        format: OutputFormat,
        timestamp: NaiveDateTime,
    ) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(derive_filename(url, format, timestamp));
        fs::write(&path, content).await?;
        Ok(path)
    }
}

/// First 30 characters of the URL with every non-alphanumeric character
/// replaced by `_`.
pub fn sanitize_url_prefix(url: &str) -> String {
    url.chars()
        .take(FILENAME_URL_PREFIX_CHARS)
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

pub fn derive_filename(url: &str, format: OutputFormat, timestamp: NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        sanitize_url_prefix(url),
        timestamp.format(TIMESTAMP_FORMAT),
        format.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use regex::Regex;
    use tempfile::TempDir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_sanitize_url_prefix() {
        assert_eq!(
            sanitize_url_prefix("https://example.com/a?x=1"),
            "https___example_com_a_x_1"
        );
        assert_eq!(
            sanitize_url_prefix("https://example.com/articles/2024/10/long-title"),
            "https___example_com_articles_2"
        );
        assert_eq!(sanitize_url_prefix("https://例え.jp"), "https___例え_jp");
    }

    #[test]
    fn test_derive_filename() {
        assert_eq!(
            derive_filename("https://example.com/a?x=1", OutputFormat::Markdown, at(9, 5, 7)),
            "https___example_com_a_x_1_20261018090507.markdown"
        );
        assert_eq!(
            derive_filename("http://a.b", OutputFormat::Txt, at(23, 59, 59)),
            "http___a_b_20261018235959.txt"
        );
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_writes_body() {
        let tmp = TempDir::new().unwrap();
        let sink = ResultSink::new(tmp.path().join("saved_results"));
        let body = "# Title\n\nSome content with ünïcödé";

        let path = sink
            .save("https://example.com/a?x=1", body, OutputFormat::Markdown)
            .await
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        let pattern = Regex::new(r"^https___example_com_a_x_1_\d{14}\.markdown$").unwrap();
        assert!(pattern.is_match(name), "unexpected file name {}", name);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), body);
    }

    #[tokio::test]
    async fn test_save_is_idempotent_on_directory() {
        let tmp = TempDir::new().unwrap();
        let sink = ResultSink::new(tmp.path().join("out"));
        std::fs::create_dir_all(sink.dir()).unwrap();

        let first = sink
            .save_at("https://example.com", "same", OutputFormat::Text, at(10, 0, 0))
            .await
            .unwrap();
        let second = sink
            .save_at("https://example.com", "same", OutputFormat::Text, at(10, 0, 1))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "same");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "same");
        assert_eq!(std::fs::read_dir(sink.dir()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_same_second_overwrites() {
        let tmp = TempDir::new().unwrap();
        let sink = ResultSink::new(tmp.path());

        sink.save_at("https://example.com", "old", OutputFormat::Json, at(8, 0, 0))
            .await
            .unwrap();
        let path = sink
            .save_at("https://example.com", "new", OutputFormat::Json, at(8, 0, 0))
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "new");
        assert_eq!(std::fs::read_dir(sink.dir()).unwrap().count(), 1);
    }
}
