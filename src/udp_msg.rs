// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv4Addr;

use crate::{
    buffer::BufferMut,
    checksum::udp_ipv4_checksum,
    field::{emit_fields, field_offset, layout_len, FieldSpec, FieldValue},
    traits::Emitable,
    ErrorKind, PingError,
};

pub const UDP_HEADER_LEN: usize = 8;

const UDP_FIELDS: [FieldSpec; 4] = [
    FieldSpec::new("source_port", 2),
    FieldSpec::new("destination_port", 2),
    FieldSpec::new("length", 2),
    FieldSpec::new("checksum", 2),
];

const _: () = assert!(layout_len(&UDP_FIELDS) == UDP_HEADER_LEN);
pub(crate) const UDP_LEN_OFFSET: usize = field_offset(&UDP_FIELDS, 2);
pub(crate) const UDP_CHECKSUM_OFFSET: usize = field_offset(&UDP_FIELDS, 3);

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct UdpHeader {
    pub src: u16,
    pub dst: u16,
    /// UDP header plus payload.
    pub len: u16,
    pub sum: u16,
}

impl UdpHeader {
    /// The checksum is left zero.
    pub fn new(
        src: u16,
        dst: u16,
        payload_len: usize,
    ) -> Result<Self, PingError> {
        let len = u16::try_from(UDP_HEADER_LEN + payload_len).map_err(|_| {
            let e = PingError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "UDP length {} exceeds the maximum {}",
                    UDP_HEADER_LEN + payload_len,
                    u16::MAX
                ),
            );
            log::error!("{e}");
            e
        })?;
        Ok(Self {
            src,
            dst,
            len,
            sum: 0,
        })
    }

    /// Compute the checksum over the IPv4 pseudo-header, this header and
    /// `payload`.
    pub fn fill_checksum(
        &mut self,
        src_ip: Ipv4Addr,
        dst_ip: Ipv4Addr,
        payload: &[u8],
    ) -> Result<(), PingError> {
        self.sum = 0;
        let mut buf = BufferMut::new(UDP_HEADER_LEN + payload.len());
        self.emit(&mut buf)?;
        buf.write_bytes(payload);
        self.sum = udp_ipv4_checksum(src_ip, dst_ip, &buf.data);
        Ok(())
    }
}

impl Emitable for UdpHeader {
    fn buffer_len(&self) -> usize {
        UDP_HEADER_LEN
    }

    fn emit(&self, buffer: &mut BufferMut) -> Result<(), PingError> {
        emit_fields(
            buffer,
            "UDP",
            &UDP_FIELDS,
            &[
                FieldValue::U16(self.src),
                FieldValue::U16(self.dst),
                FieldValue::U16(self.len),
                FieldValue::U16(self.sum),
            ],
        )
    }
}
