//! Gzip file framing around the payload codec.
//!
//! Reads decompress the whole file into memory before decoding; writes
//! compress the encoded payload. I/O errors carry the offending path.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use taq_core::{AdjustmentFactors, Error, QuoteSeries, Result, TickKind, TickSeries, TradeSeries};

use crate::decode;
use crate::encode;

/// Read and decode a tick file, inferring the kind from its name.
pub fn read_series(path: &Path) -> Result<TickSeries> {
    let kind = TickKind::from_path(path)?;
    let payload = read_gzip(path)?;
    decode::decode(&payload, kind)
}

/// Read and decode a trades file.
pub fn read_trades_file(path: &Path) -> Result<TradeSeries> {
    let payload = read_gzip(path)?;
    decode::decode_trades(&payload)
}

/// Read and decode a quotes file.
pub fn read_quotes_file(path: &Path) -> Result<QuoteSeries> {
    let payload = read_gzip(path)?;
    decode::decode_quotes(&payload)
}

/// Encode and write a series, creating the parent directory if absent.
pub fn write_series(path: &Path, series: &TickSeries) -> Result<()> {
    write_gzip(path, &encode::encode(series))
}

/// Encode and write a series with adjustment factors applied.
pub fn write_series_adjusted(
    path: &Path,
    series: &TickSeries,
    factors: AdjustmentFactors,
) -> Result<()> {
    write_gzip(path, &encode::encode_adjusted(series, factors))
}

fn read_gzip(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut payload = Vec::new();
    GzDecoder::new(file)
        .read_to_end(&mut payload)
        .map_err(|e| Error::io(path, e))?;
    Ok(payload)
}

fn write_gzip(path: &Path, payload: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(payload).map_err(|e| Error::io(path, e))?;
    encoder.finish().map_err(|e| Error::io(path, e))?;
    Ok(())
}
