// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv4Addr;

use crate::{
    mac::{mac_to_string, ETH_ALEN},
    ErrorKind, PingError,
};

/// Decoded view of an Ethernet/IPv4/UDP frame, parsed independently of the
/// encoder.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FrameSummary {
    pub src_mac: [u8; ETH_ALEN],
    pub dst_mac: [u8; ETH_ALEN],
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    pub ttl: u8,
    pub ip_total_len: u16,
    pub ip_checksum: u16,
    pub src_port: u16,
    pub dst_port: u16,
    pub udp_len: u16,
    pub udp_checksum: u16,
    pub payload_len: usize,
}

impl FrameSummary {
    pub fn parse(frame: &[u8]) -> Result<Self, PingError> {
        let packet = etherparse::SlicedPacket::from_ethernet(frame)
            .map_err(|e| invalid_frame(format!("{e}")))?;

        let eth_header = packet
            .link
            .and_then(|l| l.to_header())
            .and_then(|h| h.ethernet2())
            .ok_or_else(|| invalid_frame("Not an Ethernet II frame".into()))?;

        let ip_header = match &packet.net {
            Some(etherparse::NetSlice::Ipv4(ipv4)) => ipv4.header(),
            _ => return Err(invalid_frame("Not IPv4 payload".into())),
        };

        let udp = match &packet.transport {
            Some(etherparse::TransportSlice::Udp(udp)) => udp,
            _ => return Err(invalid_frame("Not UDP payload".into())),
        };

        Ok(Self {
            src_mac: eth_header.source,
            dst_mac: eth_header.destination,
            src_ip: ip_header.source_addr(),
            dst_ip: ip_header.destination_addr(),
            ttl: ip_header.ttl(),
            ip_total_len: ip_header.total_len(),
            ip_checksum: ip_header.header_checksum(),
            src_port: udp.source_port(),
            dst_port: udp.destination_port(),
            udp_len: udp.length(),
            udp_checksum: udp.checksum(),
            payload_len: udp.payload().len(),
        })
    }
}

fn invalid_frame(reason: String) -> PingError {
    PingError::new(
        ErrorKind::InvalidArgument,
        format!("Failed to parse Ethernet/IPv4/UDP frame: {reason}"),
    )
}

impl std::fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {}, {}:{} -> {}:{}, ttl {}, ip len {}, udp len {}, \
             payload {} bytes, checksums ip 0x{:04x} udp 0x{:04x}",
            mac_to_string(&self.src_mac),
            mac_to_string(&self.dst_mac),
            self.src_ip,
            self.src_port,
            self.dst_ip,
            self.dst_port,
            self.ttl,
            self.ip_total_len,
            self.udp_len,
            self.payload_len,
            self.ip_checksum,
            self.udp_checksum,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FrameEncoder, FrameFields};

    #[test]
    fn summarize_reference_frame() -> Result<(), PingError> {
        let mut payload = b"PING".to_vec();
        payload.resize(132, 0);
        let frame = FrameEncoder::new(FrameFields::default()).encode(&payload)?;
        let summary = FrameSummary::parse(&frame)?;

        assert_eq!(
            summary,
            FrameSummary {
                src_mac: [0xc0, 0x47, 0x0e, 0x6b, 0x84, 0x79],
                dst_mac: [0x52, 0x54, 0x00, 0x12, 0x34, 0x56],
                src_ip: Ipv4Addr::new(192, 168, 1, 1),
                dst_ip: Ipv4Addr::new(192, 168, 179, 1),
                ttl: 64,
                ip_total_len: 160,
                ip_checksum: 0,
                src_port: 12345,
                dst_port: 80,
                udp_len: 140,
                udp_checksum: 0,
                payload_len: 132,
            }
        );
        assert_eq!(
            summary.to_string(),
            "c0:47:0e:6b:84:79 -> 52:54:00:12:34:56, \
             192.168.1.1:12345 -> 192.168.179.1:80, ttl 64, ip len 160, \
             udp len 140, payload 132 bytes, checksums ip 0x0000 udp 0x0000"
        );
        Ok(())
    }

    #[test]
    fn reject_truncated_frame() -> Result<(), PingError> {
        let frame = FrameEncoder::default().encode(b"PING")?;
        let e = FrameSummary::parse(&frame[..20]).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        Ok(())
    }
}
