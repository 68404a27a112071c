use super::error::DecodeError;
use super::layout;

/// Byte order used for multi-byte integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

/// Sequential, bounds-checked reader over one message.
///
/// Every read advances the cursor; a read that needs more bytes than remain
/// fails with `DecodeError::Truncated` and leaves the cursor where it was.
///
/// # Examples
/// ```
/// use dmdview_core::protocol::ByteCursor;
///
/// let bytes = [b'c', b'o', b'l', b'o', b'r', 0x00, 0x00, 0x45, 0xFF, 0x00];
/// let mut cursor = ByteCursor::new(&bytes);
/// assert_eq!(cursor.read_null_terminated_string(true).unwrap(), "color");
/// assert_eq!(cursor.read_i32().unwrap(), 0x00FF_4500);
/// assert_eq!(cursor.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    payload: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> ByteCursor<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self::with_endian(payload, Endian::Little)
    }

    pub fn with_endian(payload: &'a [u8], endian: Endian) -> Self {
        Self {
            payload,
            position: 0,
            endian,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.payload.len().saturating_sub(self.position)
    }

    pub fn require(&self, needed: usize) -> Result<(), DecodeError> {
        if self.remaining() < needed {
            return Err(DecodeError::Truncated {
                needed,
                actual: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let [value] = self.read_array::<1>()?;
        Ok(value)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        let bytes = self.read_array::<{ layout::INT_LEN }>()?;
        Ok(match self.endian {
            Endian::Little => i32::from_le_bytes(bytes),
            Endian::Big => i32::from_be_bytes(bytes),
        })
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.require(len)?;
        let end = self.position + len;
        let bytes = self
            .payload
            .get(self.position..end)
            .ok_or(DecodeError::Truncated {
                needed: len,
                actual: self.remaining(),
            })?;
        self.position = end;
        Ok(bytes)
    }

    /// Consume everything left in the message.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let rest = self.payload.get(self.position..).unwrap_or_default();
        self.position = self.payload.len();
        rest
    }

    /// Read bytes up to a `0x00` terminator or the end of the message.
    ///
    /// The terminator is consumed but not returned. With `skip_leading_nulls`
    /// any `0x00` padding in front of the string is skipped first. Fails with
    /// `Truncated` when there is nothing left to read.
    pub fn read_null_terminated_string(
        &mut self,
        skip_leading_nulls: bool,
    ) -> Result<String, DecodeError> {
        if skip_leading_nulls {
            while self.peek() == Some(layout::STRING_TERMINATOR) {
                self.position += 1;
            }
        }

        let rest = self.payload.get(self.position..).unwrap_or_default();
        if rest.is_empty() {
            return Err(DecodeError::Truncated {
                needed: 1,
                actual: 0,
            });
        }

        let (raw, consumed) = match rest
            .iter()
            .position(|&b| b == layout::STRING_TERMINATOR)
        {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        self.position += consumed;
        Ok(String::from_utf8_lossy(raw).into_owned())
    }

    fn peek(&self) -> Option<u8> {
        self.payload.get(self.position).copied()
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}
