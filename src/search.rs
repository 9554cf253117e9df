use crate::model::SearchDoc;
use crate::util::{escape_html, snap_to_char_boundary};

pub const MAX_RESULTS: usize = 50;
const SNIPPET_BEFORE: usize = 50;
const SNIPPET_AFTER: usize = 100;
const ELLIPSIS: &str = "\u{2026}";

#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query: nothing was scanned.
    Prompt,
    NoMatches { query: String },
    Hits(Vec<SearchHit>),
}

#[derive(Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub file: String,
    pub kind: Option<String>,
    /// Escaped snippet with `<mark>` around every query occurrence.
    pub snippet_html: String,
}

/// Case-insensitive substring search over the flattened document index.
/// Matching is ascii case folding, which keeps byte offsets aligned with
/// the original text.
pub fn run_search(docs: &[SearchDoc], query: &str) -> SearchOutcome {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return SearchOutcome::Prompt;
    }
    let needle = trimmed.to_ascii_lowercase();
    let mut hits = Vec::new();
    for doc in docs {
        if hits.len() >= MAX_RESULTS {
            break;
        }
        let haystack = doc.content.to_ascii_lowercase();
        let Some(pos) = haystack.find(&needle) else {
            continue;
        };
        hits.push(SearchHit {
            file: doc.file.clone(),
            kind: doc.kind.clone(),
            snippet_html: snippet_html(&doc.content, &haystack, pos, &needle),
        });
    }
    if hits.is_empty() {
        SearchOutcome::NoMatches {
            query: trimmed.to_string(),
        }
    } else {
        SearchOutcome::Hits(hits)
    }
}

/// Context window around the first occurrence: 50 bytes before, query
/// length + 100 bytes after, clamped to the content and snapped to char
/// boundaries. Ellipses mark clamped edges.
fn snippet_html(content: &str, haystack: &str, match_pos: usize, needle: &str) -> String {
    let start = snap_to_char_boundary(content, match_pos.saturating_sub(SNIPPET_BEFORE));
    let end = snap_to_char_boundary(
        content,
        (match_pos + needle.len() + SNIPPET_AFTER).min(content.len()),
    );
    let mut out = String::new();
    if start > 0 {
        out.push_str(ELLIPSIS);
    }
    out.push_str(&highlight(&content[start..end], &haystack[start..end], needle));
    if end < content.len() {
        out.push_str(ELLIPSIS);
    }
    out
}

/// Escape the snippet and wrap every case-insensitive occurrence of the
/// query in a highlight marker.
fn highlight(snippet: &str, snippet_folded: &str, needle: &str) -> String {
    let mut out = String::with_capacity(snippet.len() + 32);
    let mut cursor = 0;
    while let Some(found) = snippet_folded[cursor..].find(needle) {
        let begin = cursor + found;
        let stop = begin + needle.len();
        out.push_str(&escape_html(&snippet[cursor..begin]));
        out.push_str("<mark>");
        out.push_str(&escape_html(&snippet[begin..stop]));
        out.push_str("</mark>");
        cursor = stop;
    }
    out.push_str(&escape_html(&snippet[cursor..]));
    out
}
