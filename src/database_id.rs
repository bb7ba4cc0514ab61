//! Database ID type definition.

/// Alias for the integer type used for transaction IDs.
///
/// Both backends hand these out from a counter that starts at 1 and never
/// reuses a value, even after the transaction holding it is deleted.
pub type TransactionId = i64;
