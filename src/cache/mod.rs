//! Artifact cache keyed by content digest
//!
//! Every generated artifact (and the source it was generated from) is recorded
//! in `_metadata.json` at the cache root together with its SHA256 digest. An
//! artifact is reused only while its bytes still match the recorded digest.
//!
//! # Lifecycle
//!
//! | Situation | `is_valid` | Effect |
//! |-----------|------------|--------|
//! | File missing | false | regenerate |
//! | Unreadable or truncated | false | regenerate (fails open) |
//! | No record | false | regenerate |
//! | Digest differs | false | regenerate |
//! | Digest matches | true | reuse |
//!
//! Entries are never pruned. Modules dropped from the request list keep their
//! artifacts and rows, so the cache directory grows monotonically.

pub mod digest;
pub mod store;

pub use digest::{digest_bytes, digest_file};
pub use store::{CacheEntry, CacheRecord, CacheStore, METADATA_FILE};
