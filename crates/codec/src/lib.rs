//! Binary tick codec for compressed TAQ files.
//!
//! This crate handles:
//! - Decoding the fixed-layout big-endian record format (trades, quotes)
//! - Encoding, including the adjustment-aware variant
//! - Gzip file framing
//!
//! The wire format is an 8-byte header `(day_epoch_secs: i32, n: i32)`
//! followed by N-length big-endian arrays in fixed field order, the whole
//! payload gzip-compressed. Byte order is network/big-endian regardless of
//! host architecture.

pub mod decode;
pub mod encode;
pub mod file;

pub use decode::{decode, decode_quotes, decode_trades};
pub use encode::{encode, encode_adjusted};
pub use file::{
    read_quotes_file, read_series, read_trades_file, write_series, write_series_adjusted,
};
