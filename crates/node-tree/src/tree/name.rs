//! Node naming and name hashing
//!
//! Names are the lookup key for every indexed query. The path separator is
//! reserved, so it never survives into a stored name, and the hash is always
//! taken over the sanitized form so that stored names and query strings agree.

use std::borrow::Cow;

/// Separator used by path queries
pub const SEPARATOR: char = '/';

/// Character substituted for the separator in node names
pub const REPLACEMENT: char = '_';

/// Replace every path separator in `name` with an underscore
///
/// Borrows the input when there is nothing to replace.
pub fn sanitize(name: &str) -> Cow<'_, str> {
    if name.contains(SEPARATOR) {
        Cow::Owned(name.replace(SEPARATOR, &REPLACEMENT.to_string()))
    } else {
        Cow::Borrowed(name)
    }
}

/// FNV-1a 64-bit hash for strings (const fn)
pub const fn fnv1a_64(s: &str) -> u64 {
    let bytes = s.as_bytes();
    let mut hash: u64 = 0xcbf29ce484222325;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(0x100000001b3);
        i += 1;
    }
    hash
}

/// Hash of a node name, computed over its sanitized form
pub fn name_hash(name: &str) -> u64 {
    fnv1a_64(&sanitize(name))
}
