// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv4Addr;

use crate::{
    buffer::BufferMut,
    eth_msg::{EthernetHeader, ETH_HEADER_LEN},
    ip_msg::{
        Ipv4Header, IPV4_CHECKSUM_OFFSET, IPV4_FLAG_DONT_FRAGMENT,
        IPV4_HEADER_LEN, IPV4_TOTAL_LEN_OFFSET,
    },
    mac::{mac_from_slice, ETH_ALEN},
    traits::Emitable,
    udp_msg::{UdpHeader, UDP_CHECKSUM_OFFSET, UDP_HEADER_LEN, UDP_LEN_OFFSET},
    ErrorContext, ErrorKind, PingError,
};

/// Bytes in front of the payload: Ethernet, IPv4 and UDP headers.
pub const FRAME_HEADERS_LEN: usize =
    ETH_HEADER_LEN + IPV4_HEADER_LEN + UDP_HEADER_LEN;

pub const FRAME_IPV4_OFFSET: usize = ETH_HEADER_LEN;
pub const FRAME_UDP_OFFSET: usize = ETH_HEADER_LEN + IPV4_HEADER_LEN;
pub const FRAME_IPV4_TOTAL_LEN_OFFSET: usize =
    FRAME_IPV4_OFFSET + IPV4_TOTAL_LEN_OFFSET;
pub const FRAME_IPV4_CHECKSUM_OFFSET: usize =
    FRAME_IPV4_OFFSET + IPV4_CHECKSUM_OFFSET;
pub const FRAME_UDP_LEN_OFFSET: usize = FRAME_UDP_OFFSET + UDP_LEN_OFFSET;
pub const FRAME_UDP_CHECKSUM_OFFSET: usize =
    FRAME_UDP_OFFSET + UDP_CHECKSUM_OFFSET;

const DEFAULT_SRC_MAC: [u8; ETH_ALEN] = [0xc0, 0x47, 0x0e, 0x6b, 0x84, 0x79];
const DEFAULT_DST_MAC: [u8; ETH_ALEN] = [0x52, 0x54, 0x00, 0x12, 0x34, 0x56];
const DEFAULT_SRC_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 1);
const DEFAULT_DST_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 179, 1);
const DEFAULT_SRC_PORT: u16 = 12345;
const DEFAULT_DST_PORT: u16 = 80;
const DEFAULT_TTL: u8 = 64;
const DEFAULT_IDENTIFICATION: u16 = 1;

const IPV4_ADDR_LEN: usize = 4;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
#[non_exhaustive]
pub enum ChecksumMode {
    /// IPv4 header and UDP checksums are sent as `0x0000`. Receivers that
    /// validate the IPv4 header checksum will drop such frames.
    #[default]
    Zero,
    /// Compute both checksums (RFC 1071, UDP over the IPv4 pseudo-header).
    Compute,
}

/// Header field values of one frame.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FrameFields {
    pub src_mac: [u8; ETH_ALEN],
    pub dst_mac: [u8; ETH_ALEN],
    pub src_ip: Ipv4Addr,
    pub dst_ip: Ipv4Addr,
    pub src_port: u16,
    pub dst_port: u16,
    pub ttl: u8,
    pub identification: u16,
    pub dont_fragment: bool,
    pub checksum: ChecksumMode,
}

impl Default for FrameFields {
    fn default() -> Self {
        Self {
            src_mac: DEFAULT_SRC_MAC,
            dst_mac: DEFAULT_DST_MAC,
            src_ip: DEFAULT_SRC_IP,
            dst_ip: DEFAULT_DST_IP,
            src_port: DEFAULT_SRC_PORT,
            dst_port: DEFAULT_DST_PORT,
            ttl: DEFAULT_TTL,
            identification: DEFAULT_IDENTIFICATION,
            dont_fragment: true,
            checksum: ChecksumMode::Zero,
        }
    }
}

impl FrameFields {
    /// Build from untyped address bytes. Fails with
    /// [`ErrorKind::InvalidFieldWidth`] unless both MAC addresses are 6 bytes
    /// and both IPv4 addresses are 4 bytes.
    pub fn from_raw(
        src_mac: &[u8],
        dst_mac: &[u8],
        src_ip: &[u8],
        dst_ip: &[u8],
        src_port: u16,
        dst_port: u16,
    ) -> Result<Self, PingError> {
        Ok(Self {
            src_mac: mac_from_slice(src_mac)
                .context("Invalid source MAC address")?,
            dst_mac: mac_from_slice(dst_mac)
                .context("Invalid destination MAC address")?,
            src_ip: ipv4_from_slice(src_ip)
                .context("Invalid source IPv4 address")?,
            dst_ip: ipv4_from_slice(dst_ip)
                .context("Invalid destination IPv4 address")?,
            src_port,
            dst_port,
            ..Default::default()
        })
    }
}

fn ipv4_from_slice(raw: &[u8]) -> Result<Ipv4Addr, PingError> {
    <[u8; IPV4_ADDR_LEN]>::try_from(raw)
        .map(Ipv4Addr::from)
        .map_err(|_| {
            PingError::new(
                ErrorKind::InvalidFieldWidth,
                format!(
                    "IPv4 address {raw:?} is {} bytes, expecting \
                     {IPV4_ADDR_LEN}",
                    raw.len()
                ),
            )
        })
}

/// Serializes [`FrameFields`] and a payload into one Ethernet/IPv4/UDP frame.
///
/// Stateless: encoding the same payload twice yields identical bytes.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FrameEncoder {
    fields: FrameFields,
}

impl FrameEncoder {
    pub fn new(fields: FrameFields) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &FrameFields {
        &self.fields
    }

    pub fn frame_len(payload_len: usize) -> usize {
        FRAME_HEADERS_LEN + payload_len
    }

    /// Return exactly `42 + payload.len()` bytes: Ethernet header, IPv4
    /// header, UDP header and payload with no padding in between.
    ///
    /// Fails with [`ErrorKind::InvalidArgument`] when the payload does not
    /// fit in the 16 bits IPv4 total length. The link MTU is not checked.
    pub fn encode(&self, payload: &[u8]) -> Result<Vec<u8>, PingError> {
        let fields = &self.fields;
        let eth = EthernetHeader::new_ipv4(fields.src_mac, fields.dst_mac);
        let mut udp =
            UdpHeader::new(fields.src_port, fields.dst_port, payload.len())?;
        let mut ip = Ipv4Header::new_udp(
            fields.src_ip,
            fields.dst_ip,
            usize::from(udp.len),
            fields.ttl,
        )?;
        ip.identification = fields.identification;
        if fields.dont_fragment {
            ip.flags_fragment = IPV4_FLAG_DONT_FRAGMENT;
        }

        if fields.checksum == ChecksumMode::Compute {
            ip.fill_checksum()?;
            udp.fill_checksum(fields.src_ip, fields.dst_ip, payload)?;
        }

        let mut buf = BufferMut::new(
            eth.buffer_len()
                + ip.buffer_len()
                + udp.buffer_len()
                + payload.len(),
        );
        eth.emit(&mut buf)?;
        ip.emit(&mut buf)?;
        udp.emit(&mut buf)?;
        buf.write_bytes(payload);

        if buf.len() != Self::frame_len(payload.len()) {
            let e = PingError::new(
                ErrorKind::Bug,
                format!(
                    "Encoded frame is {} bytes, expecting {}",
                    buf.len(),
                    Self::frame_len(payload.len())
                ),
            );
            log::error!("{e}");
            return Err(e);
        }
        log::trace!("Encoded frame {:?}", buf.data);
        Ok(buf.data)
    }
}
