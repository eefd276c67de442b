use std::fmt;
use std::str::FromStr;

pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
pub const DEFLATE_METHOD: u8 = 8;
pub const MAX_WINDOW_LOG: u8 = 15;

/// Envelope expected around the DEFLATE payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// RFC 1950: 2-byte header, payload, Adler-32 trailer.
    #[default]
    Zlib,
    /// RFC 1952 single member.
    Gzip,
    /// Headerless DEFLATE, no checksum.
    Raw,
    /// Either zlib or gzip, chosen from the first two bytes.
    Auto,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown framing `{0}`, expected one of: zlib, gzip, raw, auto")]
pub struct UnknownFraming(String);

impl Framing {
    /// Pick zlib or gzip from the leading bytes of `data`. Raw DEFLATE has
    /// no signature and is never detected.
    /// # Example
    /// ```
    /// # use zlib_lib::Framing;
    /// assert_eq!(Framing::detect(&[0x78, 0x9c, 0x03, 0x00]), Some(Framing::Zlib));
    /// assert_eq!(Framing::detect(&[0x1f, 0x8b, 0x08]), Some(Framing::Gzip));
    /// assert_eq!(Framing::detect(b"hello"), None);
    /// ```
    pub fn detect(data: &[u8]) -> Option<Framing> {
        match data {
            [a, b, ..] if [*a, *b] == GZIP_MAGIC => Some(Framing::Gzip),
            [cmf, flg, ..] if is_zlib_header(*cmf, *flg) => Some(Framing::Zlib),
            _ => None,
        }
    }
}

/// Same acceptance rule zlib applies to the CMF/FLG pair, minus the
/// preset dictionary check which is reported separately.
pub(crate) fn is_zlib_header(cmf: u8, flg: u8) -> bool {
    cmf & 0x0F == DEFLATE_METHOD
        && (cmf >> 4) + 8 <= MAX_WINDOW_LOG
        && (u16::from(cmf) << 8 | u16::from(flg)) % 31 == 0
}

impl FromStr for Framing {
    type Err = UnknownFraming;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zlib" => Ok(Framing::Zlib),
            "gzip" | "gz" => Ok(Framing::Gzip),
            "raw" | "deflate" => Ok(Framing::Raw),
            "auto" => Ok(Framing::Auto),
            _ => Err(UnknownFraming(s.to_owned())),
        }
    }
}

impl fmt::Display for Framing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Framing::Zlib => "zlib",
            Framing::Gzip => "gzip",
            Framing::Raw => "raw",
            Framing::Auto => "auto",
        };
        f.write_str(name)
    }
}
