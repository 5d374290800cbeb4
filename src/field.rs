// SPDX-License-Identifier: Apache-2.0

//! Ordered header field descriptors.
//!
//! Each header declares its layout once as a `[FieldSpec; N]` table and hands
//! its values to [`emit_fields()`] as a `[FieldValue; N]` array of the same
//! length. Header lengths are checked against the tables at compile time with
//! [`layout_len()`].

use std::net::Ipv4Addr;

use crate::{buffer::BufferMut, ErrorKind, PingError};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct FieldSpec {
    pub(crate) name: &'static str,
    pub(crate) width: usize,
}

impl FieldSpec {
    pub(crate) const fn new(name: &'static str, width: usize) -> Self {
        Self { name, width }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum FieldValue<'a> {
    U8(u8),
    U16(u16),
    Ipv4(Ipv4Addr),
    /// Copied verbatim, in transmission order.
    Bytes(&'a [u8]),
}

impl FieldValue<'_> {
    pub(crate) fn width(&self) -> usize {
        match self {
            Self::U8(_) => 1,
            Self::U16(_) => 2,
            Self::Ipv4(_) => 4,
            Self::Bytes(b) => b.len(),
        }
    }
}

pub(crate) const fn layout_len(specs: &[FieldSpec]) -> usize {
    let mut len = 0;
    let mut i = 0;
    while i < specs.len() {
        len += specs[i].width;
        i += 1;
    }
    len
}

/// Byte offset of the field at `index`, relative to the header start.
pub(crate) const fn field_offset(specs: &[FieldSpec], index: usize) -> usize {
    let mut offset = 0;
    let mut i = 0;
    while i < index {
        offset += specs[i].width;
        i += 1;
    }
    offset
}

/// Serialize `values` following `specs`.
///
/// All widths are checked before the first byte is written, so on error the
/// buffer is left untouched.
pub(crate) fn emit_fields<const N: usize>(
    buf: &mut BufferMut,
    header: &str,
    specs: &[FieldSpec; N],
    values: &[FieldValue<'_>; N],
) -> Result<(), PingError> {
    for (spec, value) in specs.iter().zip(values.iter()) {
        if spec.width != value.width() {
            let e = PingError::new(
                ErrorKind::InvalidFieldWidth,
                format!(
                    "{header} field '{}' expects {} bytes, got {}",
                    spec.name,
                    spec.width,
                    value.width()
                ),
            );
            log::error!("{e}");
            return Err(e);
        }
    }
    for value in values {
        match value {
            FieldValue::U8(v) => buf.write_u8(*v),
            FieldValue::U16(v) => buf.write_u16_be(*v),
            FieldValue::Ipv4(v) => buf.write_ipv4(*v),
            FieldValue::Bytes(b) => buf.write_bytes(b),
        }
    }
    Ok(())
}
