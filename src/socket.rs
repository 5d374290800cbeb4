// SPDX-License-Identifier: Apache-2.0

use std::{
    future::Future,
    os::fd::{AsRawFd, OwnedFd, RawFd},
};

use nix::sys::socket::{
    AddressFamily, MsgFlags, SockFlag, SockProtocol, SockType,
};
use tokio::io::unix::AsyncFd;

use crate::{ErrorKind, PingError};

const PACKET_HOST: u8 = 0; // a packet addressed to the local host
// Protocol 0: transmit only, nothing is queued for receiving
const ETH_PROTO_NONE: libc::c_int = 0;

/// Destination of encoded frames.
pub trait FrameSink {
    fn send(
        &self,
        frame: &[u8],
    ) -> impl Future<Output = Result<(), PingError>> + Send;
}

/// `AF_PACKET` raw socket bound to one network interface. Frames are handed
/// to the driver as is, including the Ethernet header.
#[derive(Debug)]
pub struct RawEthSocket {
    iface_name: String,
    iface_index: u32,
    fd: AsyncFd<OwnedFd>,
}

impl RawEthSocket {
    /// Must be called from within a tokio runtime.
    pub fn new(iface_name: &str) -> Result<Self, PingError> {
        let iface_index = get_iface_index(iface_name)?;
        let fd = create_raw_eth_socket()?;
        bind_raw_socket(fd.as_raw_fd(), iface_index)?;

        log::debug!(
            "Raw socket {} bound to interface {iface_name} index {iface_index}",
            fd.as_raw_fd()
        );
        Ok(Self {
            iface_name: iface_name.to_string(),
            iface_index,
            fd: AsyncFd::new(fd)?,
        })
    }

    pub fn iface_name(&self) -> &str {
        self.iface_name.as_str()
    }

    pub fn iface_index(&self) -> u32 {
        self.iface_index
    }
}

impl FrameSink for RawEthSocket {
    async fn send(&self, frame: &[u8]) -> Result<(), PingError> {
        log::trace!("Sending ethernet frame: {frame:?}");
        let sent = loop {
            let mut guard = self.fd.writable().await?;

            if let Ok(s) = guard.try_io(|inner| {
                Ok(nix::sys::socket::send(
                    inner.get_ref().as_raw_fd(),
                    frame,
                    MsgFlags::empty(),
                )?)
            }) {
                break s.map_err(|e| {
                    let e = PingError::new(
                        ErrorKind::IoError,
                        format!(
                            "Failed to send frame to interface {}: {e}",
                            self.iface_name
                        ),
                    );
                    log::error!("{e}");
                    e
                })?;
            }
        };
        if sent != frame.len() {
            let e = PingError::new(
                ErrorKind::IoError,
                format!(
                    "Short write on interface {}: sent {sent} of {} bytes",
                    self.iface_name,
                    frame.len()
                ),
            );
            log::error!("{e}");
            return Err(e);
        }
        log::trace!("Raw socket sent {sent} bytes");
        Ok(())
    }
}

fn get_iface_index(iface_name: &str) -> Result<u32, PingError> {
    if iface_name.is_empty() {
        let e = PingError::new(
            ErrorKind::InvalidArgument,
            "Interface name not defined".to_string(),
        );
        log::error!("{e}");
        return Err(e);
    }
    nix::net::if_::if_nametoindex(iface_name).map_err(|e| {
        let e = PingError::new(
            ErrorKind::InvalidArgument,
            format!("Interface {iface_name} not found: {e}"),
        );
        log::error!("{e}");
        e
    })
}

fn create_raw_eth_socket() -> Result<OwnedFd, PingError> {
    nix::sys::socket::socket(
        AddressFamily::Packet,
        SockType::Raw,
        SockFlag::SOCK_NONBLOCK | SockFlag::SOCK_CLOEXEC,
        None::<SockProtocol>,
    )
    .map_err(|e| {
        let e = PingError::new(
            ErrorKind::IoError,
            format!("Failed to create raw ethernet socket: {e}"),
        );
        log::error!("{e}");
        e
    })
}

fn bind_raw_socket(fd: RawFd, iface_index: u32) -> Result<(), PingError> {
    let iface_index = libc::c_int::try_from(iface_index).map_err(|_| {
        PingError::new(
            ErrorKind::Bug,
            format!("Interface index {iface_index} out of range"),
        )
    })?;
    let socket_addr = libc::sockaddr_ll {
        sll_family: libc::AF_PACKET as libc::c_ushort,
        sll_protocol: (ETH_PROTO_NONE as libc::c_ushort).to_be(),
        sll_ifindex: iface_index,
        sll_hatype: libc::ARPHRD_ETHER as libc::c_ushort,
        sll_pkttype: PACKET_HOST as libc::c_uchar,
        sll_halen: libc::ETH_ALEN as libc::c_uchar,
        sll_addr: [0; 8],
    };

    let rc = unsafe {
        libc::bind(
            fd,
            (&socket_addr as *const libc::sockaddr_ll).cast::<libc::sockaddr>(),
            std::mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
        )
    };
    if rc != 0 {
        let e = PingError::new(
            ErrorKind::IoError,
            format!(
                "Failed to bind raw socket to interface index {iface_index}: \
                 {}",
                nix::errno::Errno::last()
            ),
        );
        log::error!("{e}");
        return Err(e);
    }
    Ok(())
}
