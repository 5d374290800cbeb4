// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv4Addr;

use crate::{
    buffer::BufferMut,
    checksum::ipv4_header_checksum,
    field::{emit_fields, field_offset, layout_len, FieldSpec, FieldValue},
    traits::Emitable,
    ErrorKind, PingError,
};

pub const IPV4_HEADER_LEN: usize = 20;
/// Version 4, IHL 5 (20 bytes, no options).
pub const IPV4_VERSION_IHL: u8 = 0x45;
pub const IP_PROTO_UDP: u8 = libc::IPPROTO_UDP as u8;
pub const IPV4_FLAG_DONT_FRAGMENT: u16 = 0x4000;

const IPV4_FIELDS: [FieldSpec; 11] = [
    FieldSpec::new("version_ihl", 1),
    FieldSpec::new("dscp_ecn", 1),
    FieldSpec::new("total_length", 2),
    FieldSpec::new("identification", 2),
    FieldSpec::new("flags_fragment_offset", 2),
    FieldSpec::new("time_to_live", 1),
    FieldSpec::new("protocol", 1),
    FieldSpec::new("header_checksum", 2),
    FieldSpec::new("source", 4),
    FieldSpec::new("destination", 4),
    // No IPv4 options
    FieldSpec::new("options", 0),
];

const _: () = assert!(layout_len(&IPV4_FIELDS) == IPV4_HEADER_LEN);
pub(crate) const IPV4_TOTAL_LEN_OFFSET: usize = field_offset(&IPV4_FIELDS, 2);
pub(crate) const IPV4_CHECKSUM_OFFSET: usize = field_offset(&IPV4_FIELDS, 7);

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Ipv4Header {
    pub dscp_ecn: u8,
    /// IPv4 header plus everything it carries.
    pub total_len: u16,
    pub identification: u16,
    /// 3 bits of flags followed by the 13 bits fragment offset.
    pub flags_fragment: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub checksum: u16,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
}

impl Ipv4Header {
    /// Header for a UDP datagram of `udp_len` bytes (UDP header included).
    /// The checksum is left zero.
    pub fn new_udp(
        src: Ipv4Addr,
        dst: Ipv4Addr,
        udp_len: usize,
        ttl: u8,
    ) -> Result<Self, PingError> {
        let total_len = u16::try_from(IPV4_HEADER_LEN + udp_len).map_err(|_| {
            let e = PingError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "IPv4 total length {} exceeds the maximum {}",
                    IPV4_HEADER_LEN + udp_len,
                    u16::MAX
                ),
            );
            log::error!("{e}");
            e
        })?;
        Ok(Self {
            dscp_ecn: 0,
            total_len,
            identification: 0,
            flags_fragment: 0,
            ttl,
            protocol: IP_PROTO_UDP,
            checksum: 0,
            src,
            dst,
        })
    }

    /// Recompute the header checksum over the current field values.
    pub fn fill_checksum(&mut self) -> Result<(), PingError> {
        self.checksum = 0;
        let mut buf = BufferMut::new(IPV4_HEADER_LEN);
        self.emit(&mut buf)?;
        self.checksum = ipv4_header_checksum(&buf.data);
        Ok(())
    }
}

impl Emitable for Ipv4Header {
    fn buffer_len(&self) -> usize {
        IPV4_HEADER_LEN
    }

    fn emit(&self, buffer: &mut BufferMut) -> Result<(), PingError> {
        emit_fields(
            buffer,
            "IPv4",
            &IPV4_FIELDS,
            &[
                FieldValue::U8(IPV4_VERSION_IHL),
                FieldValue::U8(self.dscp_ecn),
                FieldValue::U16(self.total_len),
                FieldValue::U16(self.identification),
                FieldValue::U16(self.flags_fragment),
                FieldValue::U8(self.ttl),
                FieldValue::U8(self.protocol),
                FieldValue::U16(self.checksum),
                FieldValue::Ipv4(self.src),
                FieldValue::Ipv4(self.dst),
                FieldValue::Bytes(&[]),
            ],
        )
    }
}
