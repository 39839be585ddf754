//! Decoding of the binary tick payload.
//!
//! Operates on the already-decompressed byte buffer. Truncation is detected
//! up front from the header's declared record count, before any array access;
//! a short buffer is never zero-filled.

use taq_core::{Error, QuoteSeries, Result, TickKind, TickSeries, TradeSeries};

/// Header size: two big-endian i32 (day epoch seconds, record count).
const HEADER_LEN: usize = 8;

/// Bytes per record: 3 fields for trades, 5 for quotes, 4 bytes each.
const TRADE_RECORD_LEN: usize = 12;
const QUOTE_RECORD_LEN: usize = 20;

/// Decode a payload of the given kind.
pub fn decode(buf: &[u8], kind: TickKind) -> Result<TickSeries> {
    match kind {
        TickKind::Trade => decode_trades(buf).map(TickSeries::Trade),
        TickKind::Quote => decode_quotes(buf).map(TickSeries::Quote),
    }
}

/// Decode a trades payload: header, then millis, sizes, prices.
pub fn decode_trades(buf: &[u8]) -> Result<TradeSeries> {
    let (day_epoch_secs, n) = read_header(buf, TRADE_RECORD_LEN)?;
    let mut off = HEADER_LEN;
    let millis = read_u32_array(buf, &mut off, n);
    let sizes = read_i32_array(buf, &mut off, n);
    let prices = read_f32_array(buf, &mut off, n);
    TradeSeries::new(day_epoch_secs, millis, sizes, prices)
}

/// Decode a quotes payload: header, then millis, bid sizes, bid prices,
/// ask sizes, ask prices.
pub fn decode_quotes(buf: &[u8]) -> Result<QuoteSeries> {
    let (day_epoch_secs, n) = read_header(buf, QUOTE_RECORD_LEN)?;
    let mut off = HEADER_LEN;
    let millis = read_u32_array(buf, &mut off, n);
    let bid_sizes = read_i32_array(buf, &mut off, n);
    let bid_prices = read_f32_array(buf, &mut off, n);
    let ask_sizes = read_i32_array(buf, &mut off, n);
    let ask_prices = read_f32_array(buf, &mut off, n);
    QuoteSeries::new(
        day_epoch_secs,
        millis,
        bid_sizes,
        bid_prices,
        ask_sizes,
        ask_prices,
    )
}

/// Parse the header and verify the buffer holds the declared record count.
fn read_header(buf: &[u8], record_len: usize) -> Result<(i32, usize)> {
    if buf.len() < HEADER_LEN {
        return Err(Error::format(format!(
            "buffer too short for header: {} bytes",
            buf.len()
        )));
    }
    let day_epoch_secs = i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let n = i32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
    if n < 0 {
        return Err(Error::format(format!("negative record count: {}", n)));
    }
    let n = n as usize;
    let expected = HEADER_LEN + n * record_len;
    if buf.len() < expected {
        return Err(Error::format(format!(
            "truncated payload: header declares {} records ({} bytes), buffer has {}",
            n,
            expected,
            buf.len()
        )));
    }
    Ok((day_epoch_secs, n))
}

fn read_u32_array(buf: &[u8], off: &mut usize, n: usize) -> Vec<u32> {
    let out = buf[*off..*off + 4 * n]
        .chunks_exact(4)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    *off += 4 * n;
    out
}

fn read_i32_array(buf: &[u8], off: &mut usize, n: usize) -> Vec<i32> {
    let out = buf[*off..*off + 4 * n]
        .chunks_exact(4)
        .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    *off += 4 * n;
    out
}

fn read_f32_array(buf: &[u8], off: &mut usize, n: usize) -> Vec<f32> {
    let out = buf[*off..*off + 4 * n]
        .chunks_exact(4)
        .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    *off += 4 * n;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade_payload(day: i32, records: &[(u32, i32, f32)]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&day.to_be_bytes());
        buf.extend_from_slice(&(records.len() as i32).to_be_bytes());
        for (ms, _, _) in records {
            buf.extend_from_slice(&ms.to_be_bytes());
        }
        for (_, sz, _) in records {
            buf.extend_from_slice(&sz.to_be_bytes());
        }
        for (_, _, px) in records {
            buf.extend_from_slice(&px.to_be_bytes());
        }
        buf
    }

    #[test]
    fn test_decode_trades_header_consistency() {
        let payload = trade_payload(
            1_182_312_000,
            &[(34_200_000, 100, 25.5), (34_200_500, 200, 25.6)],
        );
        let series = decode_trades(&payload).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.day_epoch_secs(), 1_182_312_000);
        assert_eq!(series.millis(0), 34_200_000);
        assert_eq!(series.size(1), 200);
        assert!((series.price(0) - 25.5).abs() < 1e-6);
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let mut payload = trade_payload(0, &[(1, 1, 1.0), (2, 2, 2.0)]);
        payload.truncate(payload.len() - 5);
        assert!(matches!(
            decode_trades(&payload),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_short_header_rejected() {
        assert!(matches!(decode_trades(&[0u8; 5]), Err(Error::Format(_))));
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&0i32.to_be_bytes());
        payload.extend_from_slice(&(-1i32).to_be_bytes());
        assert!(matches!(decode_trades(&payload), Err(Error::Format(_))));
    }

    #[test]
    fn test_decode_quotes_field_order() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&100i32.to_be_bytes());
        buf.extend_from_slice(&1i32.to_be_bytes());
        buf.extend_from_slice(&7u32.to_be_bytes()); // millis
        buf.extend_from_slice(&10i32.to_be_bytes()); // bid size
        buf.extend_from_slice(&9.9f32.to_be_bytes()); // bid price
        buf.extend_from_slice(&20i32.to_be_bytes()); // ask size
        buf.extend_from_slice(&10.1f32.to_be_bytes()); // ask price
        let series = decode_quotes(&buf).unwrap();
        assert_eq!(series.millis(0), 7);
        assert_eq!(series.bid_size(0), 10);
        assert_eq!(series.ask_size(0), 20);
        assert!((series.bid_price(0) - 9.9).abs() < 1e-6);
        assert!((series.ask_price(0) - 10.1).abs() < 1e-6);
        assert!((series.mid(0) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_series() {
        let payload = trade_payload(42, &[]);
        let series = decode_trades(&payload).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.day_epoch_secs(), 42);
    }
}
