//! Stored Record Codec
//!
//! The state store only keeps a flat TTL, so the expiration metadata needed
//! by the read path travels inside the value itself.
//!
//! # Layout
//! ```text
//! {"v":1,"len":<n>,"cache_ttl":<s>,"sliding_ttl":<s>,"deadline":<rfc3339|null>}\n<n payload bytes>
//! ```
//! The header is compact JSON and never contains a raw newline, so the first
//! `\n` always terminates it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::{TtlDecision, NO_EXPIRATION};
use crate::error::{CacheError, Result};

/// Current encoding version.
pub const RECORD_VERSION: u8 = 1;

const HEADER_TERMINATOR: u8 = b'\n';

// == Stored Record ==
/// Payload plus the expiration decision it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Caller bytes, returned verbatim on read
    pub payload: Vec<u8>,
    /// Expiration the record was written with
    pub decision: TtlDecision,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordHeader {
    v: u8,
    len: usize,
    cache_ttl: i64,
    sliding_ttl: i64,
    deadline: Option<DateTime<Utc>>,
}

impl StoredRecord {
    /// Creates a record.
    pub fn new(payload: Vec<u8>, decision: TtlDecision) -> Self {
        Self { payload, decision }
    }

    // == Encode ==
    /// Serializes the header followed by the raw payload.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let header = RecordHeader {
            v: RECORD_VERSION,
            len: self.payload.len(),
            cache_ttl: self.decision.cache_ttl_seconds,
            sliding_ttl: self.decision.sliding_ttl_seconds,
            deadline: self.decision.absolute_deadline,
        };

        let mut bytes = serde_json::to_vec(&header)
            .map_err(|e| CacheError::Internal(format!("failed to encode record header: {}", e)))?;
        bytes.reserve(self.payload.len() + 1);
        bytes.push(HEADER_TERMINATOR);
        bytes.extend_from_slice(&self.payload);
        Ok(bytes)
    }

    // == Decode ==
    /// Parses bytes produced by [`StoredRecord::encode`].
    ///
    /// # Errors
    /// `CorruptRecord` when the header is missing, unparsable, of an unknown
    /// version, carries out-of-range TTLs, or disagrees with the payload length.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let split = bytes
            .iter()
            .position(|b| *b == HEADER_TERMINATOR)
            .ok_or_else(|| CacheError::CorruptRecord("missing record header".to_string()))?;

        let header: RecordHeader = serde_json::from_slice(&bytes[..split])
            .map_err(|e| CacheError::CorruptRecord(format!("unreadable record header: {}", e)))?;

        if header.v != RECORD_VERSION {
            return Err(CacheError::CorruptRecord(format!(
                "unsupported record version {}",
                header.v
            )));
        }

        for (field, seconds) in [("cache_ttl", header.cache_ttl), ("sliding_ttl", header.sliding_ttl)] {
            if seconds < NO_EXPIRATION || Duration::try_seconds(seconds).is_none() {
                return Err(CacheError::CorruptRecord(format!(
                    "{} of {} is out of range",
                    field, seconds
                )));
            }
        }

        let payload = &bytes[split + 1..];
        if payload.len() != header.len {
            return Err(CacheError::CorruptRecord(format!(
                "payload length {} does not match header length {}",
                payload.len(),
                header.len
            )));
        }

        Ok(Self {
            payload: payload.to_vec(),
            decision: TtlDecision {
                cache_ttl_seconds: header.cache_ttl,
                sliding_ttl_seconds: header.sliding_ttl,
                absolute_deadline: header.deadline,
            },
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn capped() -> TtlDecision {
        TtlDecision {
            cache_ttl_seconds: 30,
            sliding_ttl_seconds: 30,
            absolute_deadline: Some(Utc::now() + Duration::seconds(300)),
        }
    }

    #[test]
    fn test_roundtrip_capped_sliding() {
        let record = StoredRecord::new(b"hello".to_vec(), capped());
        let decoded = StoredRecord::decode(&record.encode().unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_empty_payload_survives() {
        let record = StoredRecord::new(Vec::new(), TtlDecision::never_expires());
        let bytes = record.encode().unwrap();

        assert!(!bytes.is_empty());
        let decoded = StoredRecord::decode(&bytes).unwrap();
        assert!(decoded.payload.is_empty());
        assert_eq!(decoded.decision, TtlDecision::never_expires());
    }

    #[test]
    fn test_payload_with_newlines_and_binary() {
        let payload = vec![b'\n', 0, 255, b'{', b'\n'];
        let record = StoredRecord::new(payload.clone(), capped());
        let decoded = StoredRecord::decode(&record.encode().unwrap()).unwrap();
        assert_eq!(decoded.payload, payload);
    }

    #[test]
    fn test_missing_header_is_corrupt() {
        let err = StoredRecord::decode(b"just some bytes").unwrap_err();
        assert!(matches!(err, CacheError::CorruptRecord(_)));
    }

    #[test]
    fn test_garbage_header_is_corrupt() {
        let err = StoredRecord::decode(b"{not json\npayload").unwrap_err();
        assert!(matches!(err, CacheError::CorruptRecord(_)));
    }

    #[test]
    fn test_truncated_payload_is_corrupt() {
        let bytes = StoredRecord::new(b"abcdef".to_vec(), capped()).encode().unwrap();
        let err = StoredRecord::decode(&bytes[..bytes.len() - 2]).unwrap_err();
        assert!(matches!(err, CacheError::CorruptRecord(_)));
    }

    #[test]
    fn test_out_of_range_ttl_is_corrupt() {
        let bytes = b"{\"v\":1,\"len\":0,\"cache_ttl\":-7,\"sliding_ttl\":-1,\"deadline\":null}\n";
        let err = StoredRecord::decode(bytes).unwrap_err();
        assert!(err.to_string().contains("cache_ttl"));
    }

    #[test]
    fn test_unknown_version_is_corrupt() {
        let bytes = br#"{"v":9,"len":0,"cache_ttl":-1,"sliding_ttl":-1,"deadline":null}"#
            .iter()
            .copied()
            .chain(std::iter::once(b'\n'))
            .collect::<Vec<u8>>();
        let err = StoredRecord::decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("version 9"));
    }
}
