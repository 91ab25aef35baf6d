use std::{fs::File, io::BufReader, path::Path};

use serde::Deserialize;

/// One inference rule: a document that mentions any of `keywords` acquires
/// `tag`.
#[derive(Deserialize, Debug, Clone)]
pub struct TagRule {
    pub tag: String,
    pub keywords: Vec<String>,
}

/// The keyword-to-tag dictionary, plus the tags applied when nothing
/// matches. Kept as data rather than logic so the dictionary can be swapped
/// out with `--tag-rules` without touching code. Rule order is discovery
/// order of the inferred tags.
#[derive(Deserialize, Debug, Clone)]
pub struct TagRules {
    pub rules: Vec<TagRule>,
    pub fallback: Vec<String>,
}

impl Default for TagRules {
    fn default() -> Self {
        let table: &[(&str, &[&str])] = &[
            (
                "machine-learning",
                &["machine", "learning", "ml", "algorithm", "model", "prediction", "neural", "deep"],
            ),
            (
                "statistics",
                &["statistics", "statistical", "probability", "distribution", "regression", "hypothesis"],
            ),
            (
                "visualization",
                &["visualization", "chart", "graph", "plot", "visual", "dashboard"],
            ),
            (
                "interactive",
                &["interactive", "simulation", "demo", "explorer", "widget"],
            ),
            (
                "bias-variance",
                &["bias", "variance", "tradeoff", "dartboard", "overfitting"],
            ),
            (
                "data-science",
                &["data", "science", "analysis", "analytics", "insights"],
            ),
            (
                "python",
                &["python", "pandas", "numpy", "matplotlib", "seaborn"],
            ),
            (
                "r-programming",
                &["r programming", "ggplot", "dplyr", "tidyverse"],
            ),
            (
                "biostatistics",
                &["biostatistics", "medical", "clinical", "epidemiology", "health"],
            ),
        ];

        TagRules {
            rules: table
                .iter()
                .map(|(tag, keywords)| TagRule {
                    tag: tag.to_string(),
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
            fallback: vec!["visualization".to_string(), "interactive".to_string()],
        }
    }
}

impl TagRules {
    /// Loads a rule set from a JSON file of the same shape as the built-in
    /// dictionary: `{"rules": [{"tag": ..., "keywords": [...]}], "fallback": [...]}`.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let fd = File::open(path)?;
        let reader = BufReader::new(fd);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Scans `text` case-insensitively against every rule, in rule order. A
    /// document may match several rules; when none match, the fallback tags
    /// are returned, so the result is never empty.
    pub fn infer(&self, text: &str) -> Vec<String> {
        let haystack = text.to_lowercase();
        let tags: Vec<String> = self
            .rules
            .iter()
            .filter(|rule| rule.keywords.iter().any(|k| haystack.contains(k.as_str())))
            .map(|rule| rule.tag.clone())
            .collect();

        if tags.is_empty() {
            self.fallback.clone()
        } else {
            tags
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_multiple_tags_in_rule_order() {
        let rules = TagRules::default();
        let tags = rules.infer("Neural networks meet logistic regression");
        assert_eq!(tags, vec!["machine-learning", "statistics"]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rules = TagRules::default();
        assert_eq!(rules.infer("PANDAS in anger"), vec!["python"]);
    }

    #[test]
    fn falls_back_when_nothing_matches() {
        let rules = TagRules::default();
        assert_eq!(rules.infer("hello world"), vec!["visualization", "interactive"]);
    }

    #[test]
    fn loads_rules_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"{"rules": [{"tag": "rust", "keywords": ["borrow", "cargo"]}], "fallback": ["misc"]}"#,
        )
        .unwrap();

        let rules = TagRules::from_path(&path).unwrap();
        assert_eq!(rules.infer("cargo build"), vec!["rust"]);
        assert_eq!(rules.infer("nothing relevant"), vec!["misc"]);
    }
}
