use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Metadata derived from a single blog document. Built fresh on every run
/// and never mutated afterwards. Field names serialize in camelCase, which
/// is what the listing page expects.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlogRecord {
    pub filename: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub word_count: usize,
    pub last_modified: DateTime<Utc>,
}

/// The aggregate written to the index file. `count`, `files` and `blogs`
/// always agree: `files` holds exactly the filenames of the records that
/// made it into `blogs`.
#[derive(Serialize, Debug)]
pub struct BlogIndex {
    pub generated: DateTime<Utc>,
    pub count: usize,
    pub files: Vec<String>,
    pub blogs: Vec<BlogRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_serializes_with_camel_case_fields() {
        let record = BlogRecord {
            filename: "sample-post.html".to_string(),
            title: "Sample Post".to_string(),
            description: "A post.".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            tags: vec!["statistics".to_string()],
            word_count: 42,
            last_modified: Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["filename"], "sample-post.html");
        assert_eq!(value["date"], "2024-01-15");
        assert_eq!(value["wordCount"], 42);
        assert_eq!(value["lastModified"], "2024-01-15T08:30:00Z");
    }
}
