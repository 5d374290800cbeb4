// SPDX-License-Identifier: Apache-2.0

use crate::{buffer::BufferMut, PingError};

pub(crate) trait Emitable {
    /// Return the length of the serialized data.
    fn buffer_len(&self) -> usize;

    /// Serialize this type and append the serialized data to the buffer.
    ///
    /// Fails with [`crate::ErrorKind::InvalidFieldWidth`] before writing
    /// anything when a field does not match its declared width.
    fn emit(&self, buffer: &mut BufferMut) -> Result<(), PingError>;
}
