use std::{
    fs::OpenOptions,
    io::BufWriter,
    path::PathBuf,
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::{
    extractor,
    metadata::{BlogIndex, BlogRecord},
    tags::TagRules,
};

/// Name of the emitted index file, inside the scanned directory.
pub const INDEX_FILE: &str = "blog-index.json";

/// The listing page lives next to the posts and must never be indexed.
pub const LISTING_PAGE: &str = "blogs.html";

const HTML_EXTENSION: &str = ".html";

/// One-shot builder: scans a directory of posts and rewrites its JSON
/// index. Per-document failures are logged and skipped; only a failure of
/// the scan or the final write aborts the run.
pub struct IndexGenerator {
    blog_dir: PathBuf,
    rules: TagRules,
}

impl IndexGenerator {
    pub fn new(blog_dir: impl Into<PathBuf>, rules: TagRules) -> Self {
        IndexGenerator {
            blog_dir: blog_dir.into(),
            rules,
        }
    }

    /// Path the index is written to.
    pub fn index_path(&self) -> PathBuf {
        self.blog_dir.join(INDEX_FILE)
    }

    pub fn generate(&self) -> anyhow::Result<BlogIndex> {
        info!("Scanning {} for blog files...", self.blog_dir.display());
        fs_extra::dir::create_all(&self.blog_dir, false)
            .with_context(|| format!("while creating {}", self.blog_dir.display()))?;

        let files = self.discover()?;
        info!("Found {} blog files", files.len());

        let mut blogs: Vec<BlogRecord> = Vec::with_capacity(files.len());
        for filename in &files {
            match self.process(filename) {
                Ok(record) => {
                    debug!("Processed: {filename}");
                    blogs.push(record);
                }
                Err(e) => warn!("Error processing {filename}: {e:#}"),
            }
        }

        let index = BlogIndex {
            generated: Utc::now(),
            count: blogs.len(),
            files: blogs.iter().map(|b| b.filename.clone()).collect(),
            blogs,
        };
        self.write(&index)?;

        info!("Generated blog index with {} entries", index.count);
        info!("Index saved to: {}", self.index_path().display());
        Ok(index)
    }

    /// Names of regular files directly inside the blog directory ending in
    /// `.html`, minus the reserved listing page. Sorted so the index is
    /// deterministic.
    fn discover(&self) -> anyhow::Result<Vec<String>> {
        let mut files = Vec::new();
        let entries = std::fs::read_dir(&self.blog_dir)
            .with_context(|| format!("while reading {}", self.blog_dir.display()))?;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(HTML_EXTENSION) && name != LISTING_PAGE {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }

    fn process(&self, filename: &str) -> anyhow::Result<BlogRecord> {
        let path = self.blog_dir.join(filename);
        let content = std::fs::read_to_string(&path)?;
        let modified: DateTime<Utc> = std::fs::metadata(&path)?.modified()?.into();
        extractor::extract(filename, &content, modified, &self.rules)
    }

    fn write(&self, index: &BlogIndex) -> anyhow::Result<()> {
        let fd = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(self.index_path())
            .with_context(|| format!("while opening {}", self.index_path().display()))?;
        let writer = BufWriter::new(fd);
        serde_json::to_writer_pretty(writer, index)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use std::path::Path;

    const POST: &str = concat!(
        "<html><head><title>A Post</title></head><body>",
        "<p>A paragraph of prose that is comfortably longer than fifty characters.</p>",
        "</body></html>"
    );

    fn write_post(dir: &Path, name: &str) {
        fs::write(dir.join(name), POST).unwrap();
    }

    fn generate_in(dir: &Path) -> BlogIndex {
        IndexGenerator::new(dir, TagRules::default())
            .generate()
            .unwrap()
    }

    #[test]
    fn excludes_listing_page_and_sorts_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "zeta-post.html");
        write_post(dir.path(), "alpha-post.html");
        write_post(dir.path(), "blogs.html");
        fs::write(dir.path().join("notes.txt"), "not a post").unwrap();

        let index = generate_in(dir.path());
        assert_eq!(index.count, 2);
        assert_eq!(index.files, vec!["alpha-post.html", "zeta-post.html"]);
        assert_eq!(index.blogs.len(), index.files.len());
    }

    #[test]
    fn creates_a_missing_blog_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blog_dir = dir.path().join("Blogs");

        let index = generate_in(&blog_dir);
        assert_eq!(index.count, 0);
        assert!(blog_dir.join(INDEX_FILE).exists());
    }

    #[test]
    fn skips_unreadable_documents_without_aborting() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "good-post.html");
        fs::write(dir.path().join("broken-post.html"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let index = generate_in(dir.path());
        assert_eq!(index.count, 1);
        assert_eq!(index.files, vec!["good-post.html"]);
    }

    #[test]
    fn regenerating_unchanged_input_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "first-post.html");
        write_post(dir.path(), "second-post.html");

        let first = generate_in(dir.path());
        // second run also proves the emitted index file is not picked up
        // as a post
        let second = generate_in(dir.path());

        assert_eq!(first.count, second.count);
        assert_eq!(first.files, second.files);
        assert_eq!(first.blogs, second.blogs);
    }

    #[test]
    fn records_derive_date_from_mtime_when_unspecified() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "undated-post.html");

        let index = generate_in(dir.path());
        let modified: DateTime<Utc> = fs::metadata(dir.path().join("undated-post.html"))
            .unwrap()
            .modified()
            .unwrap()
            .into();
        assert_eq!(index.blogs[0].date, modified.date_naive());
    }

    #[test]
    fn written_index_has_the_canonical_shape() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "shape-post.html");

        generate_in(dir.path());
        let raw = fs::read_to_string(dir.path().join(INDEX_FILE)).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["count"], 1);
        assert!(value["generated"].is_string());
        assert_eq!(value["files"][0], "shape-post.html");

        let blog = &value["blogs"][0];
        assert_eq!(blog["filename"], "shape-post.html");
        assert_eq!(blog["title"], "A Post");
        assert!(blog["wordCount"].as_u64().unwrap() > 0);
        assert!(blog["lastModified"].is_string());
        let date = blog["date"].as_str().unwrap();
        assert!(chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok());

        let description = blog["description"].as_str().unwrap();
        assert!(!description.is_empty());
        assert!(description.chars().count() <= extractor::DESCRIPTION_LIMIT);
        assert!(!blog["tags"].as_array().unwrap().is_empty());
    }
}
