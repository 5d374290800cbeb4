// SPDX-License-Identifier: Apache-2.0

use std::{net::Ipv4Addr, time::Duration};

use crate::{
    eth_msg::ETH_HEADER_LEN,
    frame::{ChecksumMode, FrameEncoder, FrameFields},
    mac::{parse_mac, ETH_ALEN},
    ErrorKind, PingError,
};

const DEFAULT_IFACE_NAME: &str = "tap0";
const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_MARKER: &[u8] = b"PING";
const DEFAULT_PADDING: usize = 128;

/// Largest frame the link accepts: Ethernet header plus the 1500 bytes MTU.
pub const MAX_FRAME_LEN: usize = ETH_HEADER_LEN + 1500;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct PingConfig {
    pub(crate) iface_name: String,
    pub(crate) fields: FrameFields,
    pub(crate) payload: Vec<u8>,
    pub(crate) interval: Duration,
    /// `None` for sending until stopped.
    pub(crate) count: Option<u64>,
}

impl Default for PingConfig {
    fn default() -> Self {
        let mut payload = DEFAULT_MARKER.to_vec();
        payload.resize(DEFAULT_MARKER.len() + DEFAULT_PADDING, 0);
        Self {
            iface_name: DEFAULT_IFACE_NAME.to_string(),
            fields: FrameFields::default(),
            payload,
            interval: DEFAULT_INTERVAL,
            count: None,
        }
    }
}

impl PingConfig {
    pub fn new(iface_name: &str) -> Self {
        Self {
            iface_name: iface_name.to_string(),
            ..Default::default()
        }
    }

    pub fn iface_name(&self) -> &str {
        self.iface_name.as_str()
    }

    pub fn fields(&self) -> &FrameFields {
        &self.fields
    }

    pub fn payload(&self) -> &[u8] {
        self.payload.as_slice()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn count(&self) -> Option<u64> {
        self.count
    }

    pub fn set_fields(&mut self, fields: FrameFields) -> &mut Self {
        self.fields = fields;
        self
    }

    pub fn set_src_mac(&mut self, mac: [u8; ETH_ALEN]) -> &mut Self {
        self.fields.src_mac = mac;
        self
    }

    pub fn set_dst_mac(&mut self, mac: [u8; ETH_ALEN]) -> &mut Self {
        self.fields.dst_mac = mac;
        self
    }

    /// Set source MAC from `01:02:2a:2c:f7:04` format.
    pub fn set_src_mac_str(
        &mut self,
        mac: &str,
    ) -> Result<&mut Self, PingError> {
        self.fields.src_mac = parse_mac(mac)?;
        Ok(self)
    }

    /// Set destination MAC from `01:02:2a:2c:f7:04` format.
    pub fn set_dst_mac_str(
        &mut self,
        mac: &str,
    ) -> Result<&mut Self, PingError> {
        self.fields.dst_mac = parse_mac(mac)?;
        Ok(self)
    }

    pub fn set_src_ip(&mut self, ip: Ipv4Addr) -> &mut Self {
        self.fields.src_ip = ip;
        self
    }

    pub fn set_dst_ip(&mut self, ip: Ipv4Addr) -> &mut Self {
        self.fields.dst_ip = ip;
        self
    }

    pub fn set_src_port(&mut self, port: u16) -> &mut Self {
        self.fields.src_port = port;
        self
    }

    pub fn set_dst_port(&mut self, port: u16) -> &mut Self {
        self.fields.dst_port = port;
        self
    }

    pub fn set_ttl(&mut self, ttl: u8) -> &mut Self {
        self.fields.ttl = ttl;
        self
    }

    pub fn set_checksum_mode(&mut self, mode: ChecksumMode) -> &mut Self {
        self.fields.checksum = mode;
        self
    }

    pub fn set_payload(&mut self, payload: &[u8]) -> &mut Self {
        self.payload = payload.to_vec();
        self
    }

    /// Payload of `marker` followed by `padding` zero bytes.
    pub fn set_marker_payload(
        &mut self,
        marker: &[u8],
        padding: usize,
    ) -> &mut Self {
        self.payload = marker.to_vec();
        self.payload.resize(marker.len() + padding, 0);
        self
    }

    pub fn set_interval(&mut self, interval: Duration) -> &mut Self {
        self.interval = interval;
        self
    }

    pub fn set_count(&mut self, count: Option<u64>) -> &mut Self {
        self.count = count;
        self
    }

    pub fn validate(&self) -> Result<(), PingError> {
        if self.iface_name.is_empty() {
            return Err(invalid_config("Interface name not defined".into()));
        }
        if self.interval.is_zero() {
            return Err(invalid_config(
                "Transmission interval should be greater than zero".into(),
            ));
        }
        if self.count == Some(0) {
            return Err(invalid_config(
                "Frame count should be greater than zero".into(),
            ));
        }
        let frame_len = FrameEncoder::frame_len(self.payload.len());
        if frame_len > MAX_FRAME_LEN {
            return Err(invalid_config(format!(
                "Frame of {frame_len} bytes exceeds the link maximum \
                 {MAX_FRAME_LEN}, payload should be at most {} bytes",
                MAX_FRAME_LEN - FrameEncoder::frame_len(0)
            )));
        }
        Ok(())
    }
}

fn invalid_config(msg: String) -> PingError {
    let e = PingError::new(ErrorKind::InvalidArgument, msg);
    log::error!("{e}");
    e
}
