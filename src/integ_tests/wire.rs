// SPDX-License-Identifier: Apache-2.0

// Encoded frames checked against an independent decoder.

use std::net::Ipv4Addr;

use crate::{
    ChecksumMode, FrameEncoder, FrameFields, FrameSummary, FRAME_HEADERS_LEN,
    FRAME_IPV4_OFFSET, FRAME_UDP_OFFSET,
};

fn test_fields(checksum: ChecksumMode) -> FrameFields {
    FrameFields {
        src_mac: [0x02, 0x00, 0x00, 0x00, 0x00, 0x01],
        dst_mac: [0xff; 6],
        src_ip: Ipv4Addr::new(10, 0, 0, 10),
        dst_ip: Ipv4Addr::new(10, 0, 0, 11),
        src_port: 40000,
        dst_port: 53,
        ttl: 32,
        identification: 0x1234,
        dont_fragment: true,
        checksum,
    }
}

fn test_payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

#[test]
fn decode_zero_checksum_frames() {
    let encoder = FrameEncoder::new(test_fields(ChecksumMode::Zero));
    for payload_len in (0..=1472).step_by(7) {
        let payload = test_payload(payload_len);
        let frame = encoder.encode(&payload).unwrap();
        let summary = FrameSummary::parse(&frame).unwrap();

        assert_eq!(summary.src_mac, [0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
        assert_eq!(summary.dst_mac, [0xff; 6]);
        assert_eq!(summary.src_ip, Ipv4Addr::new(10, 0, 0, 10));
        assert_eq!(summary.dst_ip, Ipv4Addr::new(10, 0, 0, 11));
        assert_eq!(summary.src_port, 40000);
        assert_eq!(summary.dst_port, 53);
        assert_eq!(summary.ttl, 32);
        assert_eq!(usize::from(summary.ip_total_len), 28 + payload_len);
        assert_eq!(usize::from(summary.udp_len), 8 + payload_len);
        assert_eq!(summary.payload_len, payload_len);
        assert_eq!(summary.ip_checksum, 0);
        assert_eq!(summary.udp_checksum, 0);
        assert_eq!(&frame[FRAME_HEADERS_LEN..], payload.as_slice());
    }
}

#[test]
fn verify_computed_checksums() {
    let encoder = FrameEncoder::new(test_fields(ChecksumMode::Compute));
    for payload_len in (0..=1472).step_by(13) {
        let payload = test_payload(payload_len);
        let frame = encoder.encode(&payload).unwrap();

        let ip_header = etherparse::Ipv4HeaderSlice::from_slice(
            &frame[FRAME_IPV4_OFFSET..FRAME_UDP_OFFSET],
        )
        .unwrap()
        .to_header();
        assert_eq!(ip_header.header_checksum, ip_header.calc_header_checksum());

        let udp_header = etherparse::UdpHeaderSlice::from_slice(
            &frame[FRAME_UDP_OFFSET..FRAME_HEADERS_LEN],
        )
        .unwrap()
        .to_header();
        assert_eq!(
            udp_header.checksum,
            udp_header.calc_checksum_ipv4(&ip_header, &payload).unwrap()
        );
    }
}
