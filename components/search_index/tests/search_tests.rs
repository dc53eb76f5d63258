// Search behaviour over realistic frame texts

use capture_types::FrameId;
use pretty_assertions::assert_eq;
use search_index::{tokenize, IndexConfig, SearchIndex};

const DOCUMENTS: [&str; 6] = [
    r#"{"route":"market.prices","symbol":"EURUSD"}"#,
    "subscribe prices for EURGBP",
    "AAAAAQAAAAEoYHsiZXJyb3IiOiJub3BlIn0=",
    "Ünïcode straße grüße",
    "keepalive 0000000000000000000000000000000000000000000001",
    "",
];

const QUERIES: [&str; 10] = [
    "prices",
    "eur",
    "EURUSD market",
    "straße",
    "GRÜ",
    "aaaaaqaaaaeoyhsizxjyb3iioijub3blin0",
    "0000000000000000000000000000000000000000000001",
    "rice scrib",
    "nothing",
    "keepalive 01",
];

/// Substring match of every query term against the document tokens
fn naive(query: &str) -> Vec<FrameId> {
    let terms = tokenize(query);
    if terms.is_empty() {
        return Vec::new();
    }
    DOCUMENTS
        .iter()
        .enumerate()
        .filter(|(_, text)| {
            let tokens = tokenize(text);
            terms
                .iter()
                .all(|term| tokens.iter().any(|token| token.contains(term.as_str())))
        })
        .map(|(i, _)| i as FrameId + 1)
        .collect()
}

fn build(config: IndexConfig) -> SearchIndex {
    let mut index = SearchIndex::with_config(config);
    for (i, text) in DOCUMENTS.iter().enumerate() {
        index.add(i as FrameId + 1, text);
    }
    index
}

#[test]
fn test_matches_naive_substring_search() {
    for gram_length in [1, 2, 3, 5, 64] {
        let index = build(IndexConfig { gram_length });
        for query in QUERIES {
            assert_eq!(
                index.search(query),
                naive(query),
                "query {:?} with gram_length {}",
                query,
                gram_length
            );
        }
    }
}

#[test]
fn test_expected_hits() {
    let index = build(IndexConfig::default());
    assert_eq!(index.search("prices"), vec![1, 2]);
    assert_eq!(index.search("eur"), vec![1, 2]);
    assert_eq!(index.search("GRÜ"), vec![4]);
    assert_eq!(index.search("rice scrib"), vec![2]);
    assert!(index.search("nothing").is_empty());
}

#[test]
fn test_empty_document_is_indexed_but_never_matches() {
    let index = build(IndexConfig::default());
    assert!(index.contains(6));
    assert_eq!(index.len(), 6);
    assert!(index.search("").is_empty());
}

/// Base64 alphabet text from a linear congruential generator
fn pseudo_random_base64(len: usize) -> String {
    const ALPHABET: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            ALPHABET[(state >> 58) as usize] as char
        })
        .collect()
}

#[test]
fn test_large_binary_payload_has_bounded_postings() {
    // 256 KiB of binary data, base64 encoded
    let payload = pseudo_random_base64(349_524);
    let mut index = SearchIndex::new();
    index.add(1, &payload);
    index.add(2, "hello world");

    // lowercase alphanumerics only: 36 + 36^2 + 36^3 keys at most
    assert!(
        index.gram_count() <= 36 + 36 * 36 + 36 * 36 * 36,
        "{} keys",
        index.gram_count()
    );

    let tokens = tokenize(&payload);
    let longest = tokens
        .iter()
        .max_by_key(|token| token.len())
        .map(String::as_str)
        .unwrap_or_default();
    let head = &longest[..longest.len().min(12)];
    assert_eq!(index.search(head), vec![1]);
    assert_eq!(index.search("world"), vec![2]);
}

#[test]
fn test_long_query_on_long_token_matches_naive() {
    let token = pseudo_random_base64(4_096).replace(['+', '/'], "x").to_lowercase();
    let mut altered = token.clone();
    altered.replace_range(2_000..2_001, "_");

    let mut index = SearchIndex::new();
    index.add(1, &token);
    index.add(2, &altered);

    let present = &token[1_990..2_010];
    assert_eq!(index.search(present), vec![1]);

    let shared = &token[100..140];
    assert_eq!(index.search(shared), vec![1, 2]);

    // two pieces of the token glued together; only the joint can fail
    let glued = format!("{}{}", &token[500..510], &token[3_000..3_010]);
    let expected: Vec<FrameId> = [(1, &token), (2, &altered)]
        .into_iter()
        .filter(|(_, text)| tokenize(text).iter().any(|t| t.contains(&glued)))
        .map(|(id, _)| id)
        .collect();
    assert_eq!(index.search(&glued), expected);
}
