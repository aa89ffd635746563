//! HPACK header encoding.

use tracing::trace;

use super::integer::{encode_integer, encode_string};
use super::table::{DynamicTable, HeaderField, StaticTable};

/// Header field representations (RFC 7541 Section 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// `1xxxxxxx`: indexed header field.
    Indexed,
    /// `01xxxxxx`: literal with incremental indexing.
    LiteralWithIndexing,
    /// `0000xxxx`: literal without indexing.
    LiteralWithoutIndexing,
    /// `0001xxxx`: literal never indexed.
    LiteralNeverIndexed,
    /// `001xxxxx`: dynamic table size update.
    SizeUpdate,
}

impl Representation {
    /// Classify a representation by its first octet.
    pub fn from_first_byte(byte: u8) -> Self {
        if byte & 0x80 != 0 {
            Representation::Indexed
        } else if byte & 0x40 != 0 {
            Representation::LiteralWithIndexing
        } else if byte & 0x20 != 0 {
            Representation::SizeUpdate
        } else if byte & 0x10 != 0 {
            Representation::LiteralNeverIndexed
        } else {
            Representation::LiteralWithoutIndexing
        }
    }

    /// Pattern bits of the first octet.
    pub fn pattern(self) -> u8 {
        match self {
            Representation::Indexed => 0x80,
            Representation::LiteralWithIndexing => 0x40,
            Representation::LiteralWithoutIndexing => 0x00,
            Representation::LiteralNeverIndexed => 0x10,
            Representation::SizeUpdate => 0x20,
        }
    }

    /// Width of the integer prefix that follows the pattern bits.
    pub fn prefix_bits(self) -> u8 {
        match self {
            Representation::Indexed => 7,
            Representation::LiteralWithIndexing => 6,
            Representation::SizeUpdate => 5,
            Representation::LiteralWithoutIndexing | Representation::LiteralNeverIndexed => 4,
        }
    }
}

/// Per-field encoding decisions.
pub trait Policy {
    /// Whether to add the field to the dynamic table.
    fn indexize(&self, field: &HeaderField) -> bool;

    /// Whether to Huffman-code the field's literals. The encoder still sends
    /// a literal raw when its Huffman form would be longer.
    fn huffmanize(&self, field: &HeaderField) -> bool;
}

/// Index every field that is not sensitive and Huffman-code every literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl Policy for DefaultPolicy {
    fn indexize(&self, field: &HeaderField) -> bool {
        !field.is_sensitive()
    }

    fn huffmanize(&self, _field: &HeaderField) -> bool {
        true
    }
}

/// Never touch the dynamic table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverIndex;

impl Policy for NeverIndex {
    fn indexize(&self, _field: &HeaderField) -> bool {
        false
    }

    fn huffmanize(&self, _field: &HeaderField) -> bool {
        true
    }
}

/// Index like [`DefaultPolicy`] but always send literals raw.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHuffman;

impl Policy for NoHuffman {
    fn indexize(&self, field: &HeaderField) -> bool {
        !field.is_sensitive()
    }

    fn huffmanize(&self, _field: &HeaderField) -> bool {
        false
    }
}

/// Table size changes not yet signalled to the peer.
#[derive(Debug, Clone, Copy)]
struct PendingSizeUpdate {
    smallest: usize,
    last: usize,
}

/// HPACK encoder.
///
/// Holds the encoder-side dynamic table of one connection direction; header
/// blocks must be encoded in the order they are sent.
#[derive(Debug)]
pub struct HpackEncoder<P = DefaultPolicy> {
    table: DynamicTable,
    policy: P,
    use_huffman: bool,
    pending: Option<PendingSizeUpdate>,
}

impl Default for HpackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HpackEncoder {
    /// Create a new HPACK encoder with default settings.
    pub fn new() -> Self {
        Self::with_policy(DefaultPolicy)
    }

    /// Create a new HPACK encoder with a specific table size.
    pub fn with_table_size(size: usize) -> Self {
        let mut encoder = Self::new();
        encoder.table = DynamicTable::new(size);
        encoder
    }
}

impl<P: Policy> HpackEncoder<P> {
    pub fn with_policy(policy: P) -> Self {
        Self {
            table: DynamicTable::new(super::DEFAULT_TABLE_SIZE),
            policy,
            use_huffman: true,
            pending: None,
        }
    }

    /// Set whether to use Huffman encoding at all.
    pub fn set_huffman(&mut self, use_huffman: bool) {
        self.use_huffman = use_huffman;
    }

    /// Change the dynamic table size, e.g. after the peer acknowledges a new
    /// SETTINGS_HEADER_TABLE_SIZE. The change is signalled at the start of
    /// the next header block.
    pub fn set_max_table_size(&mut self, size: usize) {
        let smallest = match self.pending {
            Some(pending) => pending.smallest.min(size),
            None => self.table.max_size().min(size),
        };
        self.pending = Some(PendingSizeUpdate {
            smallest,
            last: size,
        });
    }

    pub fn table(&self) -> &DynamicTable {
        &self.table
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Encode a list of headers into an HPACK header block.
    pub fn encode(&mut self, headers: &[HeaderField], buf: &mut Vec<u8>) {
        let start = buf.len();
        self.encode_size_updates(buf);

        for header in headers {
            self.encode_header(header, buf);
        }

        trace!(
            fields = headers.len(),
            len = buf.len() - start,
            table_size = self.table.size(),
            "encoded header block"
        );
    }

    /// Emit pending size updates: the smallest size reached, then the final
    /// size when they differ (RFC 7541 Section 4.2).
    fn encode_size_updates(&mut self, buf: &mut Vec<u8>) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        if pending.smallest < pending.last {
            self.encode_table_size_update(pending.smallest, buf);
        }
        self.encode_table_size_update(pending.last, buf);
    }

    fn encode_table_size_update(&mut self, size: usize, buf: &mut Vec<u8>) {
        let rep = Representation::SizeUpdate;
        encode_integer(size, rep.prefix_bits(), rep.pattern(), buf);
        self.table.set_max_size(size);
    }

    /// Encode a single header field.
    fn encode_header(&mut self, header: &HeaderField, buf: &mut Vec<u8>) {
        let huffman = self.use_huffman && self.policy.huffmanize(header);
        let static_match = StaticTable::find(header.name(), header.value());
        let dynamic_match = self.table.find(header.name(), header.value());

        // Sensitive values are never sent as a table reference.
        if header.is_sensitive() {
            let name_index = self.name_index(static_match, dynamic_match);
            let rep = Representation::LiteralNeverIndexed;
            self.encode_literal(rep, name_index, header, huffman, buf);
            return;
        }

        match (static_match, dynamic_match) {
            (Some((idx, true)), _) => {
                self.encode_indexed(idx, buf);
            }
            (_, Some((dyn_idx, true))) => {
                self.encode_indexed(StaticTable::len() + 1 + dyn_idx, buf);
            }
            _ => {
                let name_index = self.name_index(static_match, dynamic_match);
                if self.policy.indexize(header) {
                    let rep = Representation::LiteralWithIndexing;
                    self.encode_literal(rep, name_index, header, huffman, buf);
                    self.table.insert(header.clone());
                } else {
                    let rep = Representation::LiteralWithoutIndexing;
                    self.encode_literal(rep, name_index, header, huffman, buf);
                }
            }
        }
    }

    /// Header block index of the best name match, or 0 for a literal name.
    fn name_index(
        &self,
        static_match: Option<(usize, bool)>,
        dynamic_match: Option<(usize, bool)>,
    ) -> usize {
        match (static_match, dynamic_match) {
            (Some((idx, _)), _) => idx,
            (None, Some((dyn_idx, _))) => StaticTable::len() + 1 + dyn_idx,
            (None, None) => 0,
        }
    }

    /// Encode an indexed header field (Section 6.1).
    fn encode_indexed(&self, index: usize, buf: &mut Vec<u8>) {
        let rep = Representation::Indexed;
        encode_integer(index, rep.prefix_bits(), rep.pattern(), buf);
    }

    /// Encode a literal header field (Section 6.2), with an indexed name when
    /// `name_index` is non-zero.
    fn encode_literal(
        &self,
        rep: Representation,
        name_index: usize,
        header: &HeaderField,
        huffman: bool,
        buf: &mut Vec<u8>,
    ) {
        encode_integer(name_index, rep.prefix_bits(), rep.pattern(), buf);
        if name_index == 0 {
            encode_string(header.name(), huffman, buf);
        }
        encode_string(header.value(), huffman, buf);
    }
}
