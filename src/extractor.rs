use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use webpage::HTML;

use crate::metadata::BlogRecord;
use crate::tags::TagRules;

/// Longest description emitted, in characters. Anything longer is cut to
/// `DESCRIPTION_LIMIT - 3` characters and given an ellipsis.
pub const DESCRIPTION_LIMIT: usize = 150;

/// Description of last resort, for documents with no usable metadata,
/// paragraphs or headers.
pub const FALLBACK_DESCRIPTION: &str = "An interactive exploration of data science concepts.";

/// A paragraph shorter than this (trimmed) is ignored as a description
/// candidate.
const PARAGRAPH_MIN_CHARS: usize = 50;

/// Derives a [`BlogRecord`] from one document's raw text.
///
/// Each field tries its sources in priority order and takes the first
/// non-empty one; `<meta name="...">` and `<meta property="...">` are
/// looked up interchangeably. The document gets two permissive parses:
/// `webpage` supplies the `<title>` text, the Open Graph properties and
/// the visible text content, `tl` supplies the meta-tag lookup and the
/// structural fallbacks (first `h1`, first long-enough `p`, first
/// `h2`-`h4`). Neither parse is strict; a failed `tl` parse only costs
/// those lookups.
pub fn extract(
    filename: &str,
    html: &str,
    modified: DateTime<Utc>,
    rules: &TagRules,
) -> anyhow::Result<BlogRecord> {
    let page = HTML::from_string(html.to_string(), None)
        .with_context(|| format!("while parsing {filename}"))?;
    let dom = tl::parse(html, tl::ParserOptions::default()).ok();
    let dom = dom.as_ref();

    let title = resolve_title(&page, dom, filename);
    let description = resolve_description(&page, dom);
    let tags = resolve_tags(dom, rules, filename, &title, &description);
    let date = resolve_date(dom, modified);

    Ok(BlogRecord {
        filename: filename.to_string(),
        title,
        description,
        date,
        tags,
        word_count: count_words(&page.text_content),
        last_modified: modified,
    })
}

fn attr_value(tag: &tl::HTMLTag<'_>, name: &str) -> Option<String> {
    for (key, value) in tag.attributes().iter() {
        let key: &str = key.as_ref();
        if key == name {
            return value.map(|v| v.to_string());
        }
    }
    None
}

/// Content of the first `<meta>` whose `name` or `property` attribute is
/// `name`. A value that is empty after trimming does not count as present.
fn meta_content(dom: Option<&tl::VDom<'_>>, name: &str) -> Option<String> {
    for node in dom?.nodes() {
        let Some(tag) = node.as_tag() else { continue };
        if !tag.name().as_utf8_str().eq_ignore_ascii_case("meta") {
            continue;
        }
        let matches = attr_value(tag, "name").is_some_and(|v| v == name)
            || attr_value(tag, "property").is_some_and(|v| v == name);
        if !matches {
            continue;
        }
        if let Some(content) = attr_value(tag, "content") {
            let content = content.trim();
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }
    None
}

fn og_property<'a>(page: &'a HTML, name: &str) -> Option<&'a str> {
    page.opengraph
        .properties
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn resolve_title(page: &HTML, dom: Option<&tl::VDom<'_>>, filename: &str) -> String {
    if let Some(title) = meta_content(dom, "title") {
        return collapse_whitespace(&title);
    }
    if let Some(title) = page.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        return collapse_whitespace(title);
    }
    if let Some(title) = dom.and_then(|d| first_element_text(d, &["h1"])) {
        return title;
    }
    title_from_filename(filename)
}

fn resolve_description(page: &HTML, dom: Option<&tl::VDom<'_>>) -> String {
    let text = match meta_content(dom, "description")
        .or_else(|| meta_content(dom, "og:description"))
        .or_else(|| og_property(page, "description").map(str::to_string))
    {
        Some(explicit) => collapse_whitespace(&explicit),
        None => dom
            .and_then(first_paragraph)
            .or_else(|| dom.and_then(|d| first_element_text(d, &["h2", "h3", "h4"])))
            .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()),
    };
    truncate_description(&text)
}

fn resolve_tags(
    dom: Option<&tl::VDom<'_>>,
    rules: &TagRules,
    filename: &str,
    title: &str,
    description: &str,
) -> Vec<String> {
    if let Some(list) = meta_content(dom, "keywords").or_else(|| meta_content(dom, "tags")) {
        let mut tags: Vec<String> = Vec::new();
        for tag in list.split(',') {
            let tag = tag.trim().to_lowercase();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        // explicit metadata that boils down to nothing falls through to
        // inference, keeping the non-empty invariant
        if !tags.is_empty() {
            return tags;
        }
    }

    rules.infer(&format!("{filename} {title} {description}"))
}

fn resolve_date(dom: Option<&tl::VDom<'_>>, modified: DateTime<Utc>) -> NaiveDate {
    for name in ["date", "article:published_time"] {
        if let Some(date) = meta_content(dom, name).as_deref().and_then(parse_calendar_date) {
            return date;
        }
    }
    modified.date_naive()
}

/// Accepts `YYYY-MM-DD`, with or without a trailing `T...` time component.
/// An unparseable value resolves to `None` so the caller can try the next
/// source.
fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let day = match value.find('T') {
        Some(i) => &value[..i],
        None => value,
    };
    NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d").ok()
}

/// First element among `names` in document order whose text is non-empty.
fn first_element_text(dom: &tl::VDom<'_>, names: &[&str]) -> Option<String> {
    let parser = dom.parser();
    for node in dom.nodes() {
        let Some(tag) = node.as_tag() else { continue };
        let name = tag.name().as_utf8_str();
        if names.iter().any(|n| name.eq_ignore_ascii_case(n)) {
            let text = collapse_whitespace(&tag.inner_text(parser));
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// First paragraph that reads like prose: longer than
/// [`PARAGRAPH_MIN_CHARS`] and not carrying a comment fragment.
fn first_paragraph(dom: &tl::VDom<'_>) -> Option<String> {
    let parser = dom.parser();
    for handle in dom.query_selector("p")? {
        let Some(node) = handle.get(parser) else { continue };
        let text = collapse_whitespace(&node.inner_text(parser));
        if text.chars().count() > PARAGRAPH_MIN_CHARS && !text.contains("<!") {
            return Some(text);
        }
    }
    None
}

fn truncate_description(text: &str) -> String {
    if text.chars().count() > DESCRIPTION_LIMIT {
        let mut cut: String = text.chars().take(DESCRIPTION_LIMIT - 3).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_string()
    }
}

/// `some-blog-post.html` -> `Some Blog Post`.
fn title_from_filename(filename: &str) -> String {
    filename
        .trim_end_matches(".html")
        .split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    let ws = Regex::new(r"\s+").unwrap();
    ws.replace_all(text.trim(), " ").into_owned()
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
