//! Synthetic buffers for decoder tests

/// 20-byte TCP header with the given data-offset/flags word
pub(crate) fn tcp_header(source: u16, destination: u16, offset_flags: u16) -> Vec<u8> {
    let mut data = Vec::with_capacity(20);
    data.extend_from_slice(&source.to_be_bytes());
    data.extend_from_slice(&destination.to_be_bytes());
    data.extend_from_slice(&0x0102_0304u32.to_be_bytes()); // sequence
    data.extend_from_slice(&0x0506_0708u32.to_be_bytes()); // acknowledgment
    data.extend_from_slice(&offset_flags.to_be_bytes());
    data.extend_from_slice(&0xFFFFu16.to_be_bytes()); // window
    data.extend_from_slice(&0xABCDu16.to_be_bytes()); // checksum
    data.extend_from_slice(&0u16.to_be_bytes()); // urgent pointer
    data
}

/// UDP datagram with a correct length field
pub(crate) fn udp_datagram(source: u16, destination: u16, payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + payload.len());
    data.extend_from_slice(&source.to_be_bytes());
    data.extend_from_slice(&destination.to_be_bytes());
    data.extend_from_slice(&((8 + payload.len()) as u16).to_be_bytes());
    data.extend_from_slice(&0u16.to_be_bytes());
    data.extend_from_slice(payload);
    data
}

/// 20-byte IPv4 header (192.168.1.1 -> 192.168.1.2) followed by `payload`
pub(crate) fn ipv4_packet(version_ihl: u8, protocol: u8, payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(20 + payload.len());
    data.push(version_ihl);
    data.push(0x00); // type of service
    data.extend_from_slice(&((20 + payload.len()) as u16).to_be_bytes());
    data.extend_from_slice(&0x1C46u16.to_be_bytes()); // identification
    data.extend_from_slice(&0x4000u16.to_be_bytes()); // don't fragment
    data.push(64); // ttl
    data.push(protocol);
    data.extend_from_slice(&0xB1E6u16.to_be_bytes()); // checksum
    data.extend_from_slice(&[192, 168, 1, 1]);
    data.extend_from_slice(&[192, 168, 1, 2]);
    data.extend_from_slice(payload);
    data
}

/// 40-byte IPv6 header (fe80::1 -> ff02::1:2) followed by `payload`
pub(crate) fn ipv6_packet(first_word: u32, next_header: u8, payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(40 + payload.len());
    data.extend_from_slice(&first_word.to_be_bytes());
    data.extend_from_slice(&(payload.len() as u16).to_be_bytes());
    data.push(next_header);
    data.push(255); // hop limit
    data.extend_from_slice(&[0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    data.extend_from_slice(&[0xff, 0x02, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 2]);
    data.extend_from_slice(payload);
    data
}

/// Ethernet II header (00:11:22:33:44:55 -> AA:BB:CC:DD:EE:FF) followed by `payload`
pub(crate) fn ethernet_frame(ethertype: u16, payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(14 + payload.len());
    data.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
    data.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    data.extend_from_slice(&ethertype.to_be_bytes());
    data.extend_from_slice(payload);
    data
}
