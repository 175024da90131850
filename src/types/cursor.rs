//! Cursor pagination types.
//!
//! A cursor page token is base64-encoded JSON carrying the identifier and
//! store-assigned sequence number of the last row the client has seen.
//! Clients must treat it as opaque; decoding is the only way to resume
//! iteration, and a malformed token is an explicit validation failure
//! rather than a silent restart from the first page.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ApiResult, Failure};

/// Decoded continuation point of a cursor iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorToken {
    /// Identifier of the last returned row
    pub id: Uuid,
    /// Sequence number of the last returned row
    pub seq: i64,
}

impl CursorToken {
    pub fn new(id: Uuid, seq: i64) -> Self {
        Self { id, seq }
    }

    /// Encode into the opaque wire form.
    pub fn encode(&self) -> String {
        // Serializing a two-field struct of plain types cannot fail
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a client-supplied token.
    ///
    /// Both the base64 layer and the JSON layer are validated; corrupt
    /// input yields a `ValidationError` failure.
    pub fn decode(token: &str) -> ApiResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| Failure::validation("Invalid page token").with_source(e))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| Failure::validation("Invalid page token").with_source(e))
    }
}

/// One cursor-paginated page of results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    /// Opaque continuation token; `None` once the stream is exhausted
    pub next_page_token: Option<String>,
    pub has_next_page: bool,
}

impl<T> CursorPage<T> {
    /// Build a page from rows fetched with a `page_size + 1` limit.
    ///
    /// The extra row, when present, only signals that a further page
    /// exists; it is dropped and the token points at the last *kept* row.
    pub fn from_rows(
        mut rows: Vec<T>,
        page_size: u64,
        token_of: impl Fn(&T) -> CursorToken,
    ) -> Self {
        let has_next = rows.len() as u64 > page_size;
        if has_next {
            rows.truncate(page_size as usize);
        }
        let next_page_token = if has_next {
            rows.last().map(|row| token_of(row).encode())
        } else {
            None
        };

        Self {
            items: rows,
            next_page_token,
            has_next_page: has_next,
        }
    }

    /// Map the items while keeping the continuation token intact.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> CursorPage<U> {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            next_page_token: self.next_page_token,
            has_next_page: self.has_next_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: Uuid,
        seq: i64,
    }

    fn rows(seqs: &[i64]) -> Vec<Row> {
        seqs.iter()
            .map(|&seq| Row {
                id: Uuid::new_v4(),
                seq,
            })
            .collect()
    }

    fn token_of(row: &Row) -> CursorToken {
        CursorToken::new(row.id, row.seq)
    }

    #[test]
    fn token_round_trip() {
        let token = CursorToken::new(Uuid::new_v4(), 12345);
        let decoded = CursorToken::decode(&token.encode()).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn malformed_token_is_a_validation_failure() {
        for bad in ["not base64 at all!!", "AAAA", ""] {
            let err = CursorToken::decode(bad).unwrap_err();
            assert_eq!(err.code, crate::errors::FailureCode::ValidationError);
        }

        // Valid base64 but not the expected JSON shape
        let bad_json = URL_SAFE_NO_PAD.encode(b"{\"foo\": 1}");
        let err = CursorToken::decode(&bad_json).unwrap_err();
        assert_eq!(err.code, crate::errors::FailureCode::ValidationError);
    }

    #[test]
    fn extra_row_signals_next_page_and_is_dropped() {
        let fetched = rows(&[1, 2, 3]);
        let last_kept = fetched[1].clone();

        let page = CursorPage::from_rows(fetched, 2, token_of);
        assert_eq!(page.items.len(), 2);
        assert!(page.has_next_page);

        let token = CursorToken::decode(page.next_page_token.as_deref().unwrap()).unwrap();
        assert_eq!(token.seq, last_kept.seq);
        assert_eq!(token.id, last_kept.id);
    }

    #[test]
    fn short_fetch_ends_the_stream() {
        let page = CursorPage::from_rows(rows(&[7]), 2, token_of);
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_next_page);
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn chain_of_pages_covers_the_stream_without_overlap() {
        // 5 monotonically-inserted rows walked with page size 2: 2 + 2 + 1
        let store = rows(&[1, 2, 3, 4, 5]);
        let page_size = 2u64;
        let mut last_seq: Option<i64> = None;
        let mut seen = Vec::new();
        let mut pages = 0;

        loop {
            let fetched: Vec<Row> = store
                .iter()
                .filter(|r| last_seq.map_or(true, |s| r.seq > s))
                .take(page_size as usize + 1)
                .cloned()
                .collect();
            let page = CursorPage::from_rows(fetched, page_size, token_of);
            pages += 1;

            for row in &page.items {
                // Strictly ascending across the whole walk: no overlap, no gap
                assert!(seen.last().map_or(true, |&s| row.seq > s));
                seen.push(row.seq);
            }

            match page.next_page_token {
                Some(token) => last_seq = Some(CursorToken::decode(&token).unwrap().seq),
                None => break,
            }
        }

        assert_eq!(pages, 3);
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }
}
