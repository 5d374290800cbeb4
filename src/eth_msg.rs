// SPDX-License-Identifier: Apache-2.0

use crate::{
    buffer::BufferMut,
    field::{emit_fields, layout_len, FieldSpec, FieldValue},
    mac::ETH_ALEN,
    traits::Emitable,
    PingError,
};

pub const ETH_HEADER_LEN: usize = 14;
pub const ETHER_TYPE_IPV4: u16 = libc::ETH_P_IP as u16;

const ETH_FIELDS: [FieldSpec; 3] = [
    FieldSpec::new("destination", ETH_ALEN),
    FieldSpec::new("source", ETH_ALEN),
    FieldSpec::new("ether_type", 2),
];

const _: () = assert!(layout_len(&ETH_FIELDS) == ETH_HEADER_LEN);

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct EthernetHeader {
    pub dst: [u8; ETH_ALEN],
    pub src: [u8; ETH_ALEN],
    pub ether_type: u16,
}

impl EthernetHeader {
    pub fn new_ipv4(src: [u8; ETH_ALEN], dst: [u8; ETH_ALEN]) -> Self {
        Self {
            dst,
            src,
            ether_type: ETHER_TYPE_IPV4,
        }
    }
}

impl Emitable for EthernetHeader {
    fn buffer_len(&self) -> usize {
        ETH_HEADER_LEN
    }

    fn emit(&self, buffer: &mut BufferMut) -> Result<(), PingError> {
        emit_fields(
            buffer,
            "Ethernet",
            &ETH_FIELDS,
            &[
                FieldValue::Bytes(&self.dst),
                FieldValue::Bytes(&self.src),
                FieldValue::U16(self.ether_type),
            ],
        )
    }
}
