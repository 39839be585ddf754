//! Encoding of tick series back into the binary payload.
//!
//! Mirror of the decoder: header then arrays in the same fixed field order.
//! `decode(encode(x)) == x` holds exactly; prices never leave f32.

use taq_core::{AdjustmentFactors, QuoteSeries, TickSeries, TradeSeries};

/// Serialize a series into an uncompressed payload.
pub fn encode(series: &TickSeries) -> Vec<u8> {
    match series {
        TickSeries::Trade(s) => encode_trades(s),
        TickSeries::Quote(s) => encode_quotes(s),
    }
}

/// Serialize a series with adjustment factors applied during the encode step.
///
/// Each size becomes `trunc(size * size_factor)` and each price
/// `price / price_factor`, always computed from the original decoded values.
/// The input series is not mutated, so re-encoding with the same factors
/// yields identical bytes (no compounding).
pub fn encode_adjusted(series: &TickSeries, factors: AdjustmentFactors) -> Vec<u8> {
    match series {
        TickSeries::Trade(s) => encode_trades_adjusted(s, factors),
        TickSeries::Quote(s) => encode_quotes_adjusted(s, factors),
    }
}

fn encode_trades(s: &TradeSeries) -> Vec<u8> {
    let mut buf = payload_buf(s.len(), 3);
    write_header(&mut buf, s.day_epoch_secs(), s.len());
    write_u32_array(&mut buf, s.millis_slice());
    write_i32_array(&mut buf, s.sizes_slice());
    write_f32_array(&mut buf, s.prices_slice());
    buf
}

fn encode_quotes(s: &QuoteSeries) -> Vec<u8> {
    let mut buf = payload_buf(s.len(), 5);
    write_header(&mut buf, s.day_epoch_secs(), s.len());
    write_u32_array(&mut buf, s.millis_slice());
    write_i32_array(&mut buf, s.bid_sizes_slice());
    write_f32_array(&mut buf, s.bid_prices_slice());
    write_i32_array(&mut buf, s.ask_sizes_slice());
    write_f32_array(&mut buf, s.ask_prices_slice());
    buf
}

fn encode_trades_adjusted(s: &TradeSeries, f: AdjustmentFactors) -> Vec<u8> {
    let mut buf = payload_buf(s.len(), 3);
    write_header(&mut buf, s.day_epoch_secs(), s.len());
    write_u32_array(&mut buf, s.millis_slice());
    for &sz in s.sizes_slice() {
        buf.extend_from_slice(&adjust_size(sz, f.size_factor).to_be_bytes());
    }
    for &px in s.prices_slice() {
        buf.extend_from_slice(&adjust_price(px, f.price_factor).to_be_bytes());
    }
    buf
}

fn encode_quotes_adjusted(s: &QuoteSeries, f: AdjustmentFactors) -> Vec<u8> {
    let mut buf = payload_buf(s.len(), 5);
    write_header(&mut buf, s.day_epoch_secs(), s.len());
    write_u32_array(&mut buf, s.millis_slice());
    for &sz in s.bid_sizes_slice() {
        buf.extend_from_slice(&adjust_size(sz, f.size_factor).to_be_bytes());
    }
    for &px in s.bid_prices_slice() {
        buf.extend_from_slice(&adjust_price(px, f.price_factor).to_be_bytes());
    }
    for &sz in s.ask_sizes_slice() {
        buf.extend_from_slice(&adjust_size(sz, f.size_factor).to_be_bytes());
    }
    for &px in s.ask_prices_slice() {
        buf.extend_from_slice(&adjust_price(px, f.price_factor).to_be_bytes());
    }
    buf
}

/// Integer truncation toward zero, not rounding.
#[inline]
fn adjust_size(size: i32, size_factor: f64) -> i32 {
    (size as f64 * size_factor).trunc() as i32
}

/// Division in f64, result passed back through f32.
#[inline]
fn adjust_price(price: f32, price_factor: f64) -> f32 {
    (price as f64 / price_factor) as f32
}

fn payload_buf(n: usize, fields: usize) -> Vec<u8> {
    Vec::with_capacity(8 + n * 4 * fields)
}

fn write_header(buf: &mut Vec<u8>, day_epoch_secs: i32, n: usize) {
    buf.extend_from_slice(&day_epoch_secs.to_be_bytes());
    buf.extend_from_slice(&(n as i32).to_be_bytes());
}

fn write_u32_array(buf: &mut Vec<u8>, values: &[u32]) {
    for v in values {
        buf.extend_from_slice(&v.to_be_bytes());
    }
}

fn write_i32_array(buf: &mut Vec<u8>, values: &[i32]) {
    for v in values {
        buf.extend_from_slice(&v.to_be_bytes());
    }
}

fn write_f32_array(buf: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        buf.extend_from_slice(&v.to_be_bytes());
    }
}
