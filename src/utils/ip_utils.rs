//! IP utility functions for address plan validation

use regex::Regex;
use std::sync::LazyLock;

/// Colon-separated run of hextets without any `::` compression
static HEXTET_PREFIX: LazyLock<Regex> = LazyLock::new(||
    Regex::new(r"^[0-9a-fA-F]{1,4}(:[0-9a-fA-F]{1,4})*$").expect("hextet prefix pattern compiles")
);

/// Count the hextets of an uncompressed IPv6 prefix such as `2001:192:168`.
///
/// Returns `None` when the value is not a plain run of 1-4 digit hex groups.
pub fn hextet_count(prefix: &str) -> Option<usize> {
    if HEXTET_PREFIX.is_match(prefix) {
        Some(prefix.split(':').count())
    } else {
        None
    }
}

/// Check that `prefix` is an uncompressed IPv6 prefix of exactly `hextets` groups
pub fn is_hextet_prefix(prefix: &str, hextets: usize) -> bool {
    hextet_count(prefix) == Some(hextets)
}
