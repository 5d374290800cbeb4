// SPDX-License-Identifier: Apache-2.0

mod buffer;
mod checksum;
mod config;
mod error;
mod eth_msg;
mod field;
mod frame;
mod inspect;
mod ip_msg;
mod mac;
mod sender;
mod socket;
mod traits;
mod udp_msg;

#[cfg(test)]
mod integ_tests;

pub use crate::config::{PingConfig, MAX_FRAME_LEN};
pub use crate::error::{ErrorKind, PingError};
pub use crate::eth_msg::{EthernetHeader, ETHER_TYPE_IPV4, ETH_HEADER_LEN};
pub use crate::frame::{
    ChecksumMode, FrameEncoder, FrameFields, FRAME_HEADERS_LEN,
    FRAME_IPV4_CHECKSUM_OFFSET, FRAME_IPV4_OFFSET, FRAME_IPV4_TOTAL_LEN_OFFSET,
    FRAME_UDP_CHECKSUM_OFFSET, FRAME_UDP_LEN_OFFSET, FRAME_UDP_OFFSET,
};
pub use crate::inspect::FrameSummary;
pub use crate::ip_msg::{
    Ipv4Header, IPV4_FLAG_DONT_FRAGMENT, IPV4_HEADER_LEN, IPV4_VERSION_IHL,
    IP_PROTO_UDP,
};
pub use crate::mac::ETH_ALEN;
pub use crate::sender::{PingSender, PingStats, PingTask};
pub use crate::socket::{FrameSink, RawEthSocket};
pub use crate::udp_msg::{UdpHeader, UDP_HEADER_LEN};

pub(crate) use crate::error::ErrorContext;
