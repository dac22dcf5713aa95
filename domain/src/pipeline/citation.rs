//! Source citations collected by the researcher and analyst.

use serde::{Deserialize, Serialize};

/// A cited source URL.
///
/// Two citations are the same source when their normalised forms match:
/// surrounding whitespace and punctuation, a trailing `/`, and the case of
/// the scheme and host are ignored. Paths stay case-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Citation(String);

impl Citation {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let start = url
            .trim()
            .trim_start_matches(['<', '(', '[', '"', '\'']);
        Self(trim_url_end(start).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Comparison key
    pub fn normalized(&self) -> String {
        let url = self.0.trim_end_matches('/');
        let Some(scheme_end) = url.find("://") else {
            return url.to_string();
        };
        let authority = scheme_end + 3;
        let host_end = url[authority..]
            .find(['/', '?', '#'])
            .map_or(url.len(), |i| authority + i);
        format!("{}{}", url[..host_end].to_lowercase(), &url[host_end..])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Citation {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for Citation {}

impl std::fmt::Display for Citation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Citation {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Citation {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Strip trailing punctuation; a `)` goes only when it has no opening match
/// inside the URL, so `.../Apple_(fruit)` survives.
fn trim_url_end(url: &str) -> &str {
    let mut url = url;
    loop {
        url = url.trim_end_matches(['>', ']', '"', '\'', '.', ',', ';', ':']);
        let unbalanced = url.matches(')').count() > url.matches('(').count();
        match url.strip_suffix(')') {
            Some(rest) if unbalanced => url = rest,
            _ => return url,
        }
    }
}

/// Scan text for `http://` and `https://` tokens, in order of appearance.
///
/// Markdown links (`[title](https://...)`) are handled by the punctuation
/// trimming in [`Citation::new`].
pub fn extract_citations(text: &str) -> Vec<Citation> {
    let mut found = Vec::new();
    for token in text.split(|c: char| c.is_whitespace()) {
        let Some(start) = token.find("http://").or_else(|| token.find("https://")) else {
            continue;
        };
        push_unique(&mut found, Citation::new(&token[start..]));
    }
    found
}

/// Ordered union of two citation lists: `first` keeps its order, then the
/// entries of `second` not already present.
pub fn merge_citations(first: &[Citation], second: &[Citation]) -> Vec<Citation> {
    let mut merged = Vec::with_capacity(first.len() + second.len());
    for c in first.iter().chain(second) {
        push_unique(&mut merged, c.clone());
    }
    merged
}

fn push_unique(list: &mut Vec<Citation>, citation: Citation) {
    if citation.is_empty() || !citation.as_str().contains("://") {
        return;
    }
    if !list.contains(&citation) {
        list.push(citation);
    }
}
