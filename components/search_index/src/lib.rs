//! Incremental full-text index over captured frames
//!
//! Implements "full" tokenization: a query term matches a document when it is a
//! substring of one of the document's tokens. Text is lowercased and split on
//! anything that is not alphanumeric.
//!
//! Every substring of up to [`IndexConfig::gram_length`] characters is posted,
//! deduplicated per document. The number of distinct keys is bounded by the
//! alphabet, not by the document size, so a large binary payload (one giant
//! base64 token) costs time linear in its length and adds at most a few
//! thousand keys. Longer query terms intersect the postings of their grams and
//! verify the surviving candidates against the stored tokens.

use capture_types::FrameId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, trace};

/// Default gram length, in characters
pub const DEFAULT_GRAM_LENGTH: usize = 3;

/// Configuration for a [`SearchIndex`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexConfig {
    /// Longest substring stored in the postings table
    pub gram_length: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            gram_length: DEFAULT_GRAM_LENGTH,
        }
    }
}

/// Per-connection full-text index
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    config: IndexConfig,
    /// gram -> frame ids in ascending order
    postings: HashMap<String, Vec<FrameId>>,
    /// frame id -> distinct tokens of the indexed text
    documents: BTreeMap<FrameId, Vec<String>>,
}

/// Lowercase `text` and split it into alphanumeric tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Every substring of `token` with 1 to `max_len` characters
fn grams(token: &str, max_len: usize) -> impl Iterator<Item = &str> {
    let bounds: Vec<usize> = token
        .char_indices()
        .map(|(pos, _)| pos)
        .chain(std::iter::once(token.len()))
        .collect();
    (0..bounds.len().saturating_sub(1)).flat_map(move |start| {
        let end_limit = (start + max_len).min(bounds.len() - 1);
        let from = bounds[start];
        (start + 1..=end_limit)
            .map(|end| bounds[end])
            .collect::<Vec<_>>()
            .into_iter()
            .map(move |to| &token[from..to])
    })
}

impl SearchIndex {
    /// Create an empty index with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty index with the given settings
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Index settings
    pub fn config(&self) -> IndexConfig {
        self.config
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of distinct keys in the postings table
    pub fn gram_count(&self) -> usize {
        self.postings.len()
    }

    /// Whether a frame has been indexed
    pub fn contains(&self, id: FrameId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Index `text` under `id`
    ///
    /// Ids are expected to arrive in increasing order; re-adding an id that is
    /// already indexed is ignored.
    pub fn add(&mut self, id: FrameId, text: &str) {
        if self.documents.contains_key(&id) {
            debug!("Frame {} is already indexed", id);
            return;
        }

        let mut tokens = tokenize(text);
        tokens.sort();
        tokens.dedup();

        let max_len = self.gram_length();
        let distinct: HashSet<&str> = tokens
            .iter()
            .flat_map(|token| grams(token, max_len))
            .collect();
        trace!("Frame {}: {} distinct grams", id, distinct.len());

        for gram in distinct {
            if !self.postings.contains_key(gram) {
                self.postings.insert(gram.to_string(), Vec::new());
            }
            if let Some(ids) = self.postings.get_mut(gram) {
                if let Err(pos) = ids.binary_search(&id) {
                    ids.insert(pos, id);
                }
            }
        }

        self.documents.insert(id, tokens);
    }

    /// Frames matching every term of `query`, in ascending id order
    ///
    /// An empty query (or one with no alphanumeric characters) matches nothing.
    pub fn search(&self, query: &str) -> Vec<FrameId> {
        let terms = tokenize(query);
        if terms.is_empty() {
            return Vec::new();
        }

        let mut result: Option<Vec<FrameId>> = None;
        for term in &terms {
            let matches = self.lookup(term);
            result = Some(match result {
                None => matches,
                Some(previous) => intersect(&previous, &matches),
            });
            if result.as_ref().is_some_and(Vec::is_empty) {
                break;
            }
        }
        result.unwrap_or_default()
    }

    /// Drop every indexed entry
    pub fn reset(&mut self) {
        self.postings.clear();
        self.documents.clear();
    }

    fn gram_length(&self) -> usize {
        self.config.gram_length.max(1)
    }

    fn lookup(&self, term: &str) -> Vec<FrameId> {
        let max_len = self.gram_length();
        let chars: Vec<(usize, char)> = term.char_indices().collect();
        if chars.len() <= max_len {
            return self.postings.get(term).cloned().unwrap_or_default();
        }

        // every full-length gram of the term must be present
        let mut candidates: Option<Vec<FrameId>> = None;
        for start in 0..=chars.len() - max_len {
            let from = chars[start].0;
            let to = chars.get(start + max_len).map_or(term.len(), |(pos, _)| *pos);
            let Some(ids) = self.postings.get(&term[from..to]) else {
                return Vec::new();
            };
            candidates = Some(match candidates {
                None => ids.clone(),
                Some(previous) => intersect(&previous, ids),
            });
            if candidates.as_ref().is_some_and(Vec::is_empty) {
                return Vec::new();
            }
        }

        candidates
            .unwrap_or_default()
            .into_iter()
            .filter(|id| {
                self.documents
                    .get(id)
                    .is_some_and(|tokens| tokens.iter().any(|t| t.contains(term)))
            })
            .collect()
    }
}

/// Intersection of two ascending id lists
fn intersect(a: &[FrameId], b: &[FrameId]) -> Vec<FrameId> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::new();
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
