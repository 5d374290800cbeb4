// SPDX-License-Identifier: Apache-2.0

// RFC 1071 Internet checksum. Only used when checksums are explicitly
// requested, frames carry zero checksums otherwise.

use std::net::Ipv4Addr;

use crate::ip_msg::IP_PROTO_UDP;

fn ones_complement_sum(mut sum: u32, data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(2);
    for word in chunks.by_ref() {
        sum += u32::from(u16::from_be_bytes([word[0], word[1]]));
    }
    // Odd trailing byte is padded with zero on the right
    if let [last] = chunks.remainder() {
        sum += u32::from(*last) << 8;
    }
    while (sum >> 16) > 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    sum
}

pub(crate) fn internet_checksum(data: &[u8]) -> u16 {
    !(ones_complement_sum(0, data) as u16)
}

/// The checksum field inside `header` must be zero.
pub(crate) fn ipv4_header_checksum(header: &[u8]) -> u16 {
    internet_checksum(header)
}

/// UDP checksum over the IPv4 pseudo-header and `udp_segment` (UDP header
/// with zero checksum field followed by the payload).
pub(crate) fn udp_ipv4_checksum(
    src: Ipv4Addr,
    dst: Ipv4Addr,
    udp_segment: &[u8],
) -> u16 {
    let mut pseudo = [0u8; 12];
    pseudo[0..4].copy_from_slice(&src.octets());
    pseudo[4..8].copy_from_slice(&dst.octets());
    pseudo[9] = IP_PROTO_UDP;
    // Callers bound the segment length by the IPv4 total length
    pseudo[10..12].copy_from_slice(&(udp_segment.len() as u16).to_be_bytes());

    let sum = ones_complement_sum(ones_complement_sum(0, &pseudo), udp_segment);
    match !(sum as u16) {
        // RFC 768: a computed zero is transmitted as all ones
        0 => 0xffff,
        c => c,
    }
}
