use super::{Error, Result};

#[derive(Clone, Copy, Debug)]
pub struct ForwardByteParser<'a>(&'a [u8]);

impl<'a> ForwardByteParser<'a> {
    /// Create a new ForwardByteParser instance from a byte slice
    pub fn new(data: &'a [u8]) -> Self {
        Self(data)
    }

    /// Consume and return u8 from the byte slice
    /// or `NotEnoughBytes` error when the byte slice is empty.
    /// # Example
    /// ```
    /// # use zlib_lib::parsing::{ForwardByteParser, ParsingError};
    /// let mut parser = ForwardByteParser::new(&[0x78, 0x9c]);
    /// assert_eq!(parser.u8()?, 0x78);
    /// assert_eq!(parser.u8()?, 0x9c);
    /// assert!(parser.u8().is_err());
    /// # Ok::<(), ParsingError>(())
    /// ```
    pub fn u8(&mut self) -> Result<u8> {
        let (first, rest) = self.0.split_first().ok_or(Error::NotEnoughBytes {
            requested: 1,
            available: 0,
        })?;
        self.0 = rest;
        Ok(*first)
    }

    /// Return the number of bytes still unparsed
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if the byte slice is exhausted
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look at the next `len` bytes without consuming them.
    pub fn peek(&self, len: usize) -> Result<&'a [u8]> {
        self.0.get(..len).ok_or(Error::NotEnoughBytes {
            requested: len,
            available: self.len(),
        })
    }

    /// Return `len` bytes as a sub slice or NotEnoughBytes when len > parser.len()
    /// # Example
    /// ```
    /// # use zlib_lib::parsing::{ForwardByteParser, ParsingError::{self, *}};
    /// let mut parser = ForwardByteParser::new(&[0x01, 0x02, 0x03, 0x04]);
    /// assert_eq!(parser.slice(2)?, &[0x01, 0x02]);
    /// assert!(matches!(
    ///     parser.slice(3),
    ///     Err(NotEnoughBytes {
    ///         requested: 3,
    ///         available: 2,
    /// })));
    /// # Ok::<(), ParsingError>(())
    /// ```
    pub fn slice(&mut self, len: usize) -> Result<&'a [u8]> {
        let slice = self.peek(len)?;
        self.0 = &self.0[len..];
        Ok(slice)
    }

    /// Split `len` bytes off the end of the input, as needed for
    /// trailers whose position is only known from the end.
    /// # Example
    /// ```
    /// # use zlib_lib::parsing::{ForwardByteParser, ParsingError};
    /// let mut parser = ForwardByteParser::new(&[0x01, 0x02, 0x03, 0x04]);
    /// assert_eq!(parser.slice_last(1)?, &[0x04]);
    /// assert_eq!(parser.u8()?, 0x01);
    /// assert_eq!(parser.len(), 2);
    /// # Ok::<(), ParsingError>(())
    /// ```
    pub fn slice_last(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.len() {
            return Err(Error::NotEnoughBytes {
                requested: len,
                available: self.len(),
            });
        }

        let (rest, last) = self.0.split_at(self.len() - len);
        self.0 = rest;
        Ok(last)
    }

    /// Consume and return a u32 in little-endian format or NotEnoughBytes error.
    /// # Example
    /// ```
    /// # use zlib_lib::parsing::{ForwardByteParser, ParsingError};
    /// let mut parser = ForwardByteParser::new(&[0x01, 0x02, 0x03, 0x04, 0x05]);
    /// assert_eq!(parser.le_u32()?, 0x0403_0201);
    /// # Ok::<(), ParsingError>(())
    /// ```
    pub fn le_u32(&mut self) -> Result<u32> {
        let bytes = self.slice(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Consume and return a u32 in big-endian (network) order, the byte
    /// order zlib uses for its Adler-32 trailer.
    /// # Example
    /// ```
    /// # use zlib_lib::parsing::{ForwardByteParser, ParsingError};
    /// let mut parser = ForwardByteParser::new(&[0x01, 0x02, 0x03, 0x04]);
    /// assert_eq!(parser.be_u32()?, 0x0102_0304);
    /// # Ok::<(), ParsingError>(())
    /// ```
    pub fn be_u32(&mut self) -> Result<u32> {
        let bytes = self.slice(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl<'a> From<ForwardByteParser<'a>> for &'a [u8] {
    fn from(parser: ForwardByteParser<'a>) -> Self {
        parser.0
    }
}
