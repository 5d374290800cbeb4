// SPDX-License-Identifier: Apache-2.0

use crate::{ErrorKind, PingError};

pub const ETH_ALEN: usize = libc::ETH_ALEN as usize;

pub(crate) fn parse_mac(mac: &str) -> Result<[u8; ETH_ALEN], PingError> {
    let mut mac_bytes = Vec::with_capacity(ETH_ALEN);
    for item in mac.split(':') {
        match u8::from_str_radix(item, 16) {
            Ok(i) if item.len() <= 2 => mac_bytes.push(i),
            _ => {
                return Err(PingError::new(
                    ErrorKind::InvalidArgument,
                    format!(
                        "Invalid MAC address {mac}, expecting format \
                         01:02:2a:2c:f7:04"
                    ),
                ));
            }
        }
    }
    mac_from_slice(&mac_bytes)
}

/// Copy a raw MAC address, refusing anything that is not exactly
/// [`ETH_ALEN`] bytes long.
pub(crate) fn mac_from_slice(raw: &[u8]) -> Result<[u8; ETH_ALEN], PingError> {
    <[u8; ETH_ALEN]>::try_from(raw).map_err(|_| {
        PingError::new(
            ErrorKind::InvalidFieldWidth,
            format!(
                "MAC address {raw:02x?} is {} bytes, expecting {ETH_ALEN}",
                raw.len()
            ),
        )
    })
}

pub(crate) fn mac_to_string(mac: &[u8; ETH_ALEN]) -> String {
    mac.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<String>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mac_address() -> Result<(), PingError> {
        assert_eq!(
            parse_mac("c0:47:0e:6b:84:79")?,
            [0xc0, 0x47, 0x0e, 0x6b, 0x84, 0x79]
        );
        assert_eq!(
            parse_mac("52:54:0:12:34:56")?,
            [0x52, 0x54, 0x00, 0x12, 0x34, 0x56]
        );
        Ok(())
    }

    #[test]
    fn parse_mac_wrong_width() {
        let e = parse_mac("52:54:00:12:34").unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidFieldWidth);

        let e = parse_mac("52:54:00:12:34:56:78").unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidFieldWidth);
    }

    #[test]
    fn parse_mac_not_hex() {
        let e = parse_mac("52:54:zz:12:34:56").unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);

        let e = parse_mac("525:4:00:12:34:56").unwrap_err();
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn format_mac_address() {
        assert_eq!(
            mac_to_string(&[0x52, 0x54, 0x00, 0x12, 0x34, 0x56]),
            "52:54:00:12:34:56"
        );
    }
}
