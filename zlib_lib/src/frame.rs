#![allow(dead_code)]

use crate::framing::{self, Framing, DEFLATE_METHOD, GZIP_MAGIC, MAX_WINDOW_LOG};
use crate::inflate;
use crate::parsing;
use log::debug;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Frame parsing error: {0}")]
    ParsingError(#[from] parsing::ParsingError),

    #[error(transparent)]
    InflateError(#[from] inflate::Error),

    #[error("Unsupported compression method {0}, only deflate (8) is supported")]
    UnsupportedMethod(u8),

    #[error("Window size 2^{window_log} exceeds the deflate maximum of 2^{max}")]
    WindowTooLarge { window_log: u8, max: u8 },

    #[error("Corrupted zlib header, check bits failed: {cmf:#04x} {flg:#04x}")]
    HeaderChecksum { cmf: u8, flg: u8 },

    #[error("Stream requires preset dictionary {id:#010x}, which is not supported")]
    PresetDictionary { id: u32 },

    #[error("Bad gzip magic {found:#06x}")]
    BadGzipMagic { found: u16 },

    #[error("Unrecognized framing, leading bytes {0:02x?} are neither zlib nor gzip")]
    UnrecognizedFraming(Vec<u8>),
}
use Error::*;
pub type Result<T, E = Error> = std::result::Result<T, E>;

const FDICT: u8 = 0x20;
const ZLIB_TRAILER_SIZE: usize = 4;

#[derive(Debug)]
pub enum Frame<'a> {
    ZlibFrame(ZlibFrame<'a>),
    GzipFrame(GzipFrame<'a>),
    RawFrame(RawFrame<'a>),
}

#[derive(Debug)]
pub struct ZlibFrame<'a> {
    header: ZlibHeader,
    stream: &'a [u8],
    payload_size: usize,
    /// Last four bytes of the input; the Adler-32 unless data trails the stream.
    trailer: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZlibHeader {
    method: u8,
    window_log: u8,
    level: u8,
}

#[derive(Debug)]
pub struct GzipFrame<'a> {
    header: GzipHeader,
    member: &'a [u8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GzipHeader {
    method: u8,
    flags: u8,
    mtime: u32,
    extra_flags: u8,
    os: u8,
}

#[derive(Debug)]
pub struct RawFrame<'a> {
    payload: &'a [u8],
}

impl<'a> Frame<'a> {
    pub fn parse(data: &'a [u8], framing: Framing) -> Result<Self> {
        let framing = match framing {
            Framing::Auto => Framing::detect(data).ok_or_else(|| {
                UnrecognizedFraming(data.iter().take(2).copied().collect())
            })?,
            framing => framing,
        };
        debug!("parsing {} bytes as {framing}", data.len());

        match framing {
            Framing::Zlib => Ok(Self::ZlibFrame(ZlibFrame::parse(data)?)),
            Framing::Gzip => Ok(Self::GzipFrame(GzipFrame::parse(data)?)),
            Framing::Raw | Framing::Auto => Ok(Self::RawFrame(RawFrame { payload: data })),
        }
    }

    pub fn framing(&self) -> Framing {
        match self {
            Frame::ZlibFrame(_) => Framing::Zlib,
            Frame::GzipFrame(_) => Framing::Gzip,
            Frame::RawFrame(_) => Framing::Raw,
        }
    }

    pub fn decode(self) -> Result<Vec<u8>> {
        let decoded = match self {
            Frame::ZlibFrame(frame) => inflate::inflate(frame.stream, true)?,
            Frame::GzipFrame(frame) => inflate::gunzip(frame.member)?,
            Frame::RawFrame(frame) => inflate::inflate(frame.payload, false)?,
        };
        Ok(decoded)
    }
}

impl<'a> ZlibFrame<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut input = parsing::ForwardByteParser::new(data);
        let header = ZlibHeader::parse(&mut input)?;
        let trailer = input.slice_last(ZLIB_TRAILER_SIZE)?;
        let trailer = parsing::ForwardByteParser::new(trailer).be_u32()?;

        Ok(ZlibFrame {
            header,
            stream: data,
            payload_size: input.len(),
            trailer,
        })
    }

    pub fn header(&self) -> ZlibHeader {
        self.header
    }
}

impl ZlibHeader {
    pub fn parse(input: &mut parsing::ForwardByteParser) -> Result<Self> {
        // CMF  1 byte: CM (bits 0-3) | CINFO (bits 4-7)
        // FLG  1 byte: FCHECK (bits 0-4) | FDICT (bit 5) | FLEVEL (bits 6-7)
        // [DICTID 4 bytes, when FDICT is set]
        let cmf = input.u8()?;
        let flg = input.u8()?;

        if (u16::from(cmf) << 8 | u16::from(flg)) % 31 != 0 {
            return Err(HeaderChecksum { cmf, flg });
        }

        let method = cmf & 0x0F;
        if method != DEFLATE_METHOD {
            return Err(UnsupportedMethod(method));
        }

        let window_log = (cmf >> 4) + 8;
        if window_log > MAX_WINDOW_LOG {
            return Err(WindowTooLarge {
                window_log,
                max: MAX_WINDOW_LOG,
            });
        }

        if flg & FDICT != 0 {
            let id = input.be_u32()?;
            return Err(PresetDictionary { id });
        }

        debug_assert!(framing::is_zlib_header(cmf, flg));
        Ok(ZlibHeader {
            method,
            window_log,
            level: flg >> 6,
        })
    }

    /// Base-2 log of the LZ77 window size.
    pub fn window_log(&self) -> u8 {
        self.window_log
    }

    /// FLEVEL hint: 0 fastest, 1 fast, 2 default, 3 maximum compression.
    pub fn level(&self) -> u8 {
        self.level
    }
}

impl<'a> GzipFrame<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut input = parsing::ForwardByteParser::new(data);
        let header = GzipHeader::parse(&mut input)?;
        Ok(GzipFrame {
            header,
            member: data,
        })
    }

    pub fn header(&self) -> GzipHeader {
        self.header
    }
}

impl GzipHeader {
    pub fn parse(input: &mut parsing::ForwardByteParser) -> Result<Self> {
        // ID1 ID2 CM FLG MTIME(4) XFL OS; optional fields are left to the decoder
        let magic = input.slice(2)?;
        if magic != GZIP_MAGIC {
            return Err(BadGzipMagic {
                found: u16::from_be_bytes([magic[0], magic[1]]),
            });
        }

        let method = input.u8()?;
        if method != DEFLATE_METHOD {
            return Err(UnsupportedMethod(method));
        }

        Ok(GzipHeader {
            method,
            flags: input.u8()?,
            mtime: input.le_u32()?,
            extra_flags: input.u8()?,
            os: input.u8()?,
        })
    }

    pub fn mtime(&self) -> u32 {
        self.mtime
    }

    pub fn os(&self) -> u8 {
        self.os
    }
}
