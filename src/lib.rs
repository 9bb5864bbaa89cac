//! Public library API for converting binary `.res` resources to and from JSON documents.

/// Resource codec: byte cursor, header, tables, variants, and document orchestration.
pub mod res;
