//! HPACK header compression (RFC 7541).
//!
//! HPACK is the header compression algorithm used by HTTP/2. It uses:
//! - A static table of 61 common header fields
//! - A dynamic table of recently used headers
//! - Huffman coding for string literals
//! - Variable-length integer encoding
//!
//! Each direction of a connection owns one table: the [`HpackEncoder`] for
//! header blocks we send, the [`HpackDecoder`] for header blocks we receive.
//!
//! ```
//! use h2codec::hpack::{HeaderField, HpackDecoder, HpackEncoder};
//!
//! let headers = vec![
//!     HeaderField::new(":method", "GET"),
//!     HeaderField::new(":path", "/"),
//!     HeaderField::sensitive("authorization", "Bearer abc"),
//! ];
//!
//! let mut block = Vec::new();
//! HpackEncoder::new().encode(&headers, &mut block);
//!
//! let decoded = HpackDecoder::new().decode(&block).unwrap();
//! assert_eq!(decoded, headers);
//! assert!(decoded[2].is_sensitive());
//! ```

mod decode;
mod encode;
mod error;
pub mod huffman;
mod integer;
mod name;
mod table;

pub use decode::{HeaderBlock, HpackDecoder};
pub use encode::{DefaultPolicy, HpackEncoder, NeverIndex, NoHuffman, Policy, Representation};
pub use error::HpackError;
pub use huffman::HuffmanError;
pub use integer::{decode_integer, decode_string, encode_integer, encode_string};
pub use name::HeaderName;
pub use table::{DynamicTable, ENTRY_OVERHEAD, HeaderField, StaticTable};

/// Default dynamic table size (4096 bytes).
pub const DEFAULT_TABLE_SIZE: usize = 4096;
