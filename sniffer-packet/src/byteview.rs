//! Formatting helpers for byte spans
//!
//! Stateless functions used by the frame descriptions and header tables to
//! render raw bytes as hex, MAC addresses, IP addresses and padded integers.

use std::fmt::Write;

/// Format bytes as uppercase, space separated hex octets
///
/// When `max_len` is given and the span is longer, only the first `max_len`
/// octets are shown, followed by `...`.
pub fn to_hex_bytes(bytes: &[u8], max_len: Option<usize>) -> String {
    let shown = match max_len {
        Some(max) if bytes.len() > max => &bytes[..max],
        _ => bytes,
    };

    let mut out = String::with_capacity(shown.len() * 3);
    for (i, byte) in shown.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02X}", byte);
    }

    if shown.len() < bytes.len() {
        out.push_str("...");
    }
    out
}

/// Format exactly 6 bytes as a MAC address (`AA:BB:CC:DD:EE:FF`)
pub fn to_mac_address(bytes: &[u8]) -> Option<String> {
    if bytes.len() != 6 {
        return None;
    }

    Some(
        bytes
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(":"),
    )
}

/// Format exactly 4 bytes as a dotted-decimal IPv4 address
pub fn to_ipv4_address(bytes: &[u8]) -> Option<String> {
    if bytes.len() != 4 {
        return None;
    }

    Some(
        bytes
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join("."),
    )
}

/// Format exactly 16 bytes as eight colon separated 16-bit hex groups
///
/// Groups are not compressed, only leading zeros inside a group are dropped
/// (e.g. `fe80:0:0:0:0:0:0:1`).
pub fn to_ipv6_address(bytes: &[u8]) -> Option<String> {
    if bytes.len() != 16 {
        return None;
    }

    Some(
        bytes
            .chunks_exact(2)
            .map(|pair| format!("{:x}", u16::from_be_bytes([pair[0], pair[1]])))
            .collect::<Vec<_>>()
            .join(":"),
    )
}

/// Format an integer as `0x` followed by uppercase hex
///
/// With `width`, the digits are zero padded to at least that many.
pub fn to_hexed_int(value: u64, width: Option<usize>) -> String {
    match width {
        Some(width) => format!("0x{:0width$X}", value, width = width),
        None => format!("0x{:X}", value),
    }
}

/// Render bytes as a hex dump of `row` octets per line
///
/// Every line starts with `indent` and ends with a newline. An empty span
/// renders as an empty string.
pub fn to_hex_dump(bytes: &[u8], row: usize, indent: &str) -> String {
    let row = row.max(1);
    let mut dump = String::new();
    for chunk in bytes.chunks(row) {
        dump.push_str(indent);
        dump.push_str(&to_hex_bytes(chunk, None));
        dump.push('\n');
    }
    dump
}
