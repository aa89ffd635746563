//! HPACK header decoding.

use std::iter::FusedIterator;

use tracing::trace;

use super::encode::Representation;
use super::error::HpackError;
use super::integer::{decode_integer, decode_string};
use super::table::{DynamicTable, HeaderField, StaticTable};

/// HPACK decoder.
///
/// Holds the decoder-side dynamic table of one connection direction. Header
/// blocks must be decoded in the order they arrive, and every block must be
/// decoded completely, or the table falls out of step with the peer.
#[derive(Debug)]
pub struct HpackDecoder {
    /// Dynamic table for decoding.
    dynamic_table: DynamicTable,
    /// Largest table size the peer may select (our SETTINGS_HEADER_TABLE_SIZE).
    max_table_size: usize,
    /// Our SETTINGS_MAX_HEADER_LIST_SIZE.
    max_header_list_size: usize,
}

impl Default for HpackDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HpackDecoder {
    /// Create a new HPACK decoder with default settings.
    pub fn new() -> Self {
        Self::with_table_size(super::DEFAULT_TABLE_SIZE)
    }

    /// Create a new HPACK decoder with a specific table size.
    pub fn with_table_size(size: usize) -> Self {
        Self {
            dynamic_table: DynamicTable::new(size),
            max_table_size: size,
            max_header_list_size: usize::MAX,
        }
    }

    /// Set the maximum allowed table size. A table currently larger than the
    /// new limit is shrunk immediately.
    pub fn set_max_table_size(&mut self, size: usize) {
        self.max_table_size = size;
        if self.dynamic_table.max_size() > size {
            self.dynamic_table.set_max_size(size);
        }
    }

    pub fn max_table_size(&self) -> usize {
        self.max_table_size
    }

    /// Limit the decoded size of one header list (RFC 7540 Section 6.5.2).
    pub fn set_max_header_list_size(&mut self, size: usize) {
        self.max_header_list_size = size;
    }

    pub fn max_header_list_size(&self) -> usize {
        self.max_header_list_size
    }

    pub fn table(&self) -> &DynamicTable {
        &self.dynamic_table
    }

    /// Decode an HPACK header block into a list of headers.
    pub fn decode(&mut self, data: &[u8]) -> Result<Vec<HeaderField>, HpackError> {
        self.decode_block(data).collect()
    }

    /// Decode a header block lazily, one field per iteration.
    ///
    /// The first error ends the iteration. A list over the size limit is
    /// still decoded to its end so the dynamic table stays in step, and the
    /// error carries the size of the whole list. Dropping the iterator early
    /// leaves the rest of the block unapplied to the dynamic table; call
    /// [`HeaderBlock::finish`] to drain it.
    pub fn decode_block<'a>(&'a mut self, data: &'a [u8]) -> HeaderBlock<'a> {
        HeaderBlock {
            decoder: self,
            data,
            pos: 0,
            fields: 0,
            list_size: 0,
            failed: false,
        }
    }

    /// Decode a single header representation.
    /// Returns (Option<HeaderField>, bytes_consumed).
    fn decode_header(
        &mut self,
        data: &[u8],
        at_block_start: bool,
    ) -> Result<(Option<HeaderField>, usize), HpackError> {
        let Some(&first) = data.first() else {
            return Err(HpackError::Incomplete);
        };

        match Representation::from_first_byte(first) {
            Representation::Indexed => self.decode_indexed(data),
            Representation::SizeUpdate => {
                if !at_block_start {
                    return Err(HpackError::SizeUpdateNotAtStart);
                }
                self.decode_table_size_update(data)
            }
            rep => self.decode_literal(rep, data),
        }
    }

    /// Decode an indexed header field.
    fn decode_indexed(&mut self, data: &[u8]) -> Result<(Option<HeaderField>, usize), HpackError> {
        let (index, consumed) = decode_integer(data, Representation::Indexed.prefix_bits())?;
        let header = self.get_header(index)?;
        Ok((Some(header), consumed))
    }

    /// Decode any of the three literal representations.
    fn decode_literal(
        &mut self,
        rep: Representation,
        data: &[u8],
    ) -> Result<(Option<HeaderField>, usize), HpackError> {
        let (name_index, mut consumed) = decode_integer(data, rep.prefix_bits())?;

        let name = if name_index > 0 {
            self.get_header(name_index)?.into_parts().0
        } else {
            let (n, c) = decode_string(&data[consumed..])?;
            consumed += c;
            n
        };

        let (value, c) = decode_string(&data[consumed..])?;
        consumed += c;

        let header = match rep {
            Representation::LiteralNeverIndexed => HeaderField::sensitive(name, value),
            _ => HeaderField::new(name, value),
        };
        if rep == Representation::LiteralWithIndexing {
            self.dynamic_table.insert(header.clone());
        }

        Ok((Some(header), consumed))
    }

    /// Decode a dynamic table size update.
    fn decode_table_size_update(
        &mut self,
        data: &[u8],
    ) -> Result<(Option<HeaderField>, usize), HpackError> {
        let (new_size, consumed) = decode_integer(data, Representation::SizeUpdate.prefix_bits())?;

        if new_size > self.max_table_size {
            return Err(HpackError::InvalidTableSize {
                size: new_size,
                max: self.max_table_size,
            });
        }

        self.dynamic_table.set_max_size(new_size);

        Ok((None, consumed))
    }

    /// Get a header from the static or dynamic table by index.
    fn get_header(&self, index: usize) -> Result<HeaderField, HpackError> {
        let static_len = StaticTable::len();

        if index <= static_len {
            StaticTable::get_header_field(index)
        } else {
            self.dynamic_table
                .get(index - static_len - 1)
                .cloned()
                .ok_or(HpackError::InvalidIndex(index))
        }
    }
}

/// Lazily decoded header block, see [`HpackDecoder::decode_block`].
#[derive(Debug)]
pub struct HeaderBlock<'a> {
    decoder: &'a mut HpackDecoder,
    data: &'a [u8],
    pos: usize,
    fields: usize,
    list_size: usize,
    failed: bool,
}

impl HeaderBlock<'_> {
    /// Whether undecoded bytes remain. Trailing size updates count as bytes
    /// but yield no field.
    pub fn has_next(&self) -> bool {
        !self.failed && self.pos < self.data.len()
    }

    /// Decode the rest of the block, discarding the fields.
    pub fn finish(mut self) -> Result<(), HpackError> {
        for field in self.by_ref() {
            field?;
        }
        trace!(
            fields = self.fields,
            list_size = self.list_size,
            "decoded header block"
        );
        Ok(())
    }
}

impl Iterator for HeaderBlock<'_> {
    type Item = Result<HeaderField, HpackError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.has_next() {
            let at_block_start = self.fields == 0;
            let result = self
                .decoder
                .decode_header(&self.data[self.pos..], at_block_start);

            let (field, consumed) = match result {
                Ok(decoded) => decoded,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };
            self.pos += consumed;

            let Some(field) = field else {
                continue;
            };

            self.fields += 1;
            self.list_size = self.list_size.saturating_add(field.size());
            if self.list_size > self.decoder.max_header_list_size {
                return Some(Err(self.discard_rest()));
            }

            return Some(Ok(field));
        }

        None
    }
}

impl HeaderBlock<'_> {
    /// Apply the remaining representations to the dynamic table without
    /// yielding them, then report the oversized list.
    fn discard_rest(&mut self) -> HpackError {
        self.failed = true;
        while self.pos < self.data.len() {
            match self.decoder.decode_header(&self.data[self.pos..], false) {
                Ok((field, consumed)) => {
                    self.pos += consumed;
                    if let Some(field) = field {
                        self.fields += 1;
                        self.list_size = self.list_size.saturating_add(field.size());
                    }
                }
                Err(e) => return e,
            }
        }
        trace!(
            fields = self.fields,
            list_size = self.list_size,
            "discarded oversized header list"
        );
        HpackError::HeaderListTooLarge {
            size: self.list_size,
            max: self.decoder.max_header_list_size,
        }
    }
}

impl FusedIterator for HeaderBlock<'_> {}
