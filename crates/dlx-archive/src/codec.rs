use std::io::{self, BufRead, BufReader, Read};

use crate::error::{Error, Result};
use crate::format::Compression;

const STREAM_BUFFER: usize = 64 * 1024;

impl Compression {
    /// Wrap `reader` in the decoder for this compression.
    ///
    /// Concatenated members (as produced by `pigz`, `pbzip2` or `xz -T`) are
    /// decoded as one stream.
    pub fn decoder<R: Read>(self, reader: R) -> Result<Decoder<R>> {
        match self {
            Self::Gzip => Ok(Decoder::Gzip(Box::new(flate2::read::MultiGzDecoder::new(reader)))),
            #[cfg(feature = "bzip2")]
            Self::Bzip2 => Ok(Decoder::Bzip2(Box::new(bzip2::read::MultiBzDecoder::new(reader)))),
            #[cfg(not(feature = "bzip2"))]
            Self::Bzip2 => Err(Error::UnsupportedFormat(self.into())),
            #[cfg(feature = "xz")]
            Self::Xz => Ok(Decoder::Xz(Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)))),
            #[cfg(not(feature = "xz"))]
            Self::Xz => Err(Error::UnsupportedFormat(self.into())),
            #[cfg(feature = "zstd")]
            Self::Zstd => {
                let decoder = zstd::stream::read::Decoder::new(reader)
                    .map_err(|source| Error::Decompress { codec: self, source })?;
                Ok(Decoder::Zstd(Box::new(decoder)))
            }
            #[cfg(not(feature = "zstd"))]
            Self::Zstd => Err(Error::UnsupportedFormat(self.into())),
        }
    }

    /// Build the decoder and pull the first block through it.
    ///
    /// A damaged compression header fails here with [`Error::Decompress`]
    /// before any entry is written.
    pub fn open<R: Read>(self, reader: R) -> Result<BufReader<Decoder<R>>> {
        let mut stream = BufReader::with_capacity(STREAM_BUFFER, self.decoder(reader)?);
        stream
            .fill_buf()
            .map_err(|source| Error::Decompress { codec: self, source })?;
        Ok(stream)
    }
}

/// Decompressing reader over a tar stream.
pub enum Decoder<R: Read> {
    Gzip(Box<flate2::read::MultiGzDecoder<R>>),
    #[cfg(feature = "bzip2")]
    Bzip2(Box<bzip2::read::MultiBzDecoder<R>>),
    #[cfg(feature = "xz")]
    Xz(Box<xz2::read::XzDecoder<R>>),
    #[cfg(feature = "zstd")]
    Zstd(Box<zstd::stream::read::Decoder<'static, BufReader<R>>>),
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Gzip(d) => d.read(buf),
            #[cfg(feature = "bzip2")]
            Self::Bzip2(d) => d.read(buf),
            #[cfg(feature = "xz")]
            Self::Xz(d) => d.read(buf),
            #[cfg(feature = "zstd")]
            Self::Zstd(d) => d.read(buf),
        }
    }
}
