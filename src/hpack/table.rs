//! HPACK static and dynamic tables.

use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};

use tracing::debug;

use super::error::HpackError;
use super::name::HeaderName;

/// Per-entry overhead counted towards table size (RFC 7541 Section 4.1).
pub const ENTRY_OVERHEAD: usize = 32;

/// A header field (name-value pair).
///
/// Equality and hashing cover the name and value only. The sensitive flag
/// travels with the field so the encoder emits it as never-indexed and the
/// decoder reports never-indexed fields back as sensitive.
#[derive(Clone, Eq)]
pub struct HeaderField {
    name: Vec<u8>,
    value: Vec<u8>,
    sensitive: bool,
}

impl HeaderField {
    /// Create a new header field.
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            sensitive: false,
        }
    }

    /// Create a header field that must never be added to a compression table,
    /// such as an authorization token.
    pub fn sensitive(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            sensitive: true,
            ..Self::new(name, value)
        }
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Parse the name into a canonical [`HeaderName`].
    pub fn header_name(&self) -> Result<HeaderName, HpackError> {
        HeaderName::from_bytes(&self.name)
    }

    /// Size of the entry in the table (name length + value length + 32).
    pub fn size(&self) -> usize {
        self.name.len() + self.value.len() + ENTRY_OVERHEAD
    }

    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.name, self.value)
    }
}

impl PartialEq for HeaderField {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl Hash for HeaderField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.value.hash(state);
    }
}

impl fmt::Debug for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("HeaderField");
        s.field("name", &String::from_utf8_lossy(&self.name));
        if self.sensitive {
            s.field("value", &"<sensitive>");
        } else {
            s.field("value", &String::from_utf8_lossy(&self.value));
        }
        s.finish()
    }
}

/// The HPACK static table (RFC 7541 Appendix B).
///
/// Indices are 1-based; index 0 is not a valid entry.
pub struct StaticTable;

impl StaticTable {
    const ENTRIES: [(&'static str, &'static str); 61] = [
        (":authority", ""),
        (":method", "GET"),
        (":method", "POST"),
        (":path", "/"),
        (":path", "/index.html"),
        (":scheme", "http"),
        (":scheme", "https"),
        (":status", "200"),
        (":status", "204"),
        (":status", "206"),
        (":status", "304"),
        (":status", "400"),
        (":status", "404"),
        (":status", "500"),
        ("accept-charset", ""),
        ("accept-encoding", "gzip, deflate"),
        ("accept-language", ""),
        ("accept-ranges", ""),
        ("accept", ""),
        ("access-control-allow-origin", ""),
        ("age", ""),
        ("allow", ""),
        ("authorization", ""),
        ("cache-control", ""),
        ("content-disposition", ""),
        ("content-encoding", ""),
        ("content-language", ""),
        ("content-length", ""),
        ("content-location", ""),
        ("content-range", ""),
        ("content-type", ""),
        ("cookie", ""),
        ("date", ""),
        ("etag", ""),
        ("expect", ""),
        ("expires", ""),
        ("from", ""),
        ("host", ""),
        ("if-match", ""),
        ("if-modified-since", ""),
        ("if-none-match", ""),
        ("if-range", ""),
        ("if-unmodified-since", ""),
        ("last-modified", ""),
        ("link", ""),
        ("location", ""),
        ("max-forwards", ""),
        ("proxy-authenticate", ""),
        ("proxy-authorization", ""),
        ("range", ""),
        ("referer", ""),
        ("refresh", ""),
        ("retry-after", ""),
        ("server", ""),
        ("set-cookie", ""),
        ("strict-transport-security", ""),
        ("transfer-encoding", ""),
        ("user-agent", ""),
        ("vary", ""),
        ("via", ""),
        ("www-authenticate", ""),
    ];

    /// Raw entry at `index` (1-61).
    pub fn get(index: usize) -> Option<(&'static [u8], &'static [u8])> {
        let (name, value) = Self::ENTRIES.get(index.checked_sub(1)?)?;
        Some((name.as_bytes(), value.as_bytes()))
    }

    /// Header field at `index` (1-61).
    pub fn get_header_field(index: usize) -> Result<HeaderField, HpackError> {
        let (name, value) = Self::get(index).ok_or(HpackError::InvalidIndex(index))?;
        Ok(HeaderField::new(name, value))
    }

    /// Header name at `index` (1-61).
    pub fn get_header(index: usize) -> Result<HeaderName, HpackError> {
        let (name, _) = Self::get(index).ok_or(HpackError::InvalidIndex(index))?;
        HeaderName::from_bytes(name)
    }

    /// Find an entry in the static table.
    /// Returns (index, exact_match) where exact_match is true if both name and value match.
    pub fn find(name: &[u8], value: &[u8]) -> Option<(usize, bool)> {
        let mut name_match = None;

        for (i, (n, v)) in Self::ENTRIES.iter().enumerate() {
            if n.as_bytes() == name {
                if v.as_bytes() == value {
                    return Some((i + 1, true));
                }
                name_match.get_or_insert(i + 1);
            }
        }

        name_match.map(|i| (i, false))
    }

    /// Index of the entry matching `field` exactly.
    pub fn index_of(field: &HeaderField) -> Option<usize> {
        match Self::find(field.name(), field.value()) {
            Some((index, true)) => Some(index),
            _ => None,
        }
    }

    /// Index of the first entry with this name.
    pub fn index_of_name(name: &HeaderName) -> Option<usize> {
        Self::ENTRIES
            .iter()
            .position(|(n, _)| *n == name.as_str())
            .map(|i| i + 1)
    }

    /// Get the number of entries in the static table.
    pub const fn len() -> usize {
        Self::ENTRIES.len()
    }
}

/// The HPACK dynamic table.
///
/// A FIFO of header fields, newest first. Dynamic index 0 is the most
/// recently inserted entry, which the header block addresses as
/// `StaticTable::len() + 1`. Entries are evicted from the back whenever the
/// table would exceed its maximum size.
#[derive(Debug, Clone)]
pub struct DynamicTable {
    entries: VecDeque<HeaderField>,
    size: usize,
    max_size: usize,
}

impl DynamicTable {
    /// Create a new dynamic table with the given maximum size.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            size: 0,
            max_size,
        }
    }

    /// Set the maximum size of the table, evicting entries as needed.
    pub fn set_max_size(&mut self, max_size: usize) {
        debug!(from = self.max_size, to = max_size, "resizing HPACK dynamic table");
        self.max_size = max_size;
        self.evict_to(max_size);
    }

    /// Get an entry by dynamic index (0 = newest entry).
    pub fn get(&self, index: usize) -> Option<&HeaderField> {
        self.entries.get(index)
    }

    /// Insert a new entry at the front of the table.
    ///
    /// An entry larger than the whole table empties it and is not stored.
    pub fn insert(&mut self, field: HeaderField) {
        let entry_size = field.size();

        if entry_size > self.max_size {
            debug!(
                entry_size,
                max_size = self.max_size,
                evicted = self.entries.len(),
                "HPACK entry larger than table, clearing"
            );
            self.clear();
            return;
        }

        self.evict_to(self.max_size - entry_size);
        self.entries.push_front(field);
        self.size += entry_size;
    }

    /// Find an entry in the dynamic table.
    /// Returns (index, exact_match) where index is 0-based within the dynamic table.
    pub fn find(&self, name: &[u8], value: &[u8]) -> Option<(usize, bool)> {
        let mut name_match = None;

        for (i, entry) in self.entries.iter().enumerate() {
            if entry.name == name {
                if entry.value == value {
                    return Some((i, true));
                }
                name_match.get_or_insert(i);
            }
        }

        name_match.map(|i| (i, false))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.size = 0;
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current size in bytes, as defined by RFC 7541 Section 4.1.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Iterate entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HeaderField> {
        self.entries.iter()
    }

    fn evict_to(&mut self, target: usize) {
        while self.size > target {
            let Some(evicted) = self.entries.pop_back() else {
                break;
            };
            self.size -= evicted.size();
            debug!(
                name = %String::from_utf8_lossy(&evicted.name),
                size = evicted.size(),
                "evicted HPACK entry"
            );
        }
    }
}
