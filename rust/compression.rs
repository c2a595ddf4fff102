use crate::error::{Error, Result};

/// Compression algorithm used for tile payloads and the metadata blob.
///
/// Numeric values match the S2Tiles header encoding: 0 unknown, 1 none,
/// 2 gzip, 3 brotli, 4 zstd.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Compression {
    /// Unrecognized or unsupported compression kind.
    Unknown = 0,
    /// No compression; bytes are stored as-is.
    #[default]
    None = 1,
    /// DEFLATE via gzip framing.
    Gzip = 2,
    /// Brotli.
    Brotli = 3,
    /// Zstandard.
    Zstd = 4,
}

impl From<u8> for Compression {
    fn from(value: u8) -> Self {
        match value {
            1 => Compression::None,
            2 => Compression::Gzip,
            3 => Compression::Brotli,
            4 => Compression::Zstd,
            _ => Compression::Unknown,
        }
    }
}

impl From<Compression> for u8 {
    fn from(compression: Compression) -> Self {
        compression as u8
    }
}

/// Compress `data` with the given codec. `None` returns the input unchanged.
pub fn compress(data: &[u8], kind: Compression) -> Result<Vec<u8>> {
    match kind {
        Compression::None => Ok(data.to_vec()),
        #[cfg(feature = "gzip")]
        Compression::Gzip => {
            use flate2::write::GzEncoder;
            use std::io::Write;
            let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder
                .write_all(data)
                .map_err(|e| Error::Codec(e.to_string()))?;
            encoder.finish().map_err(|e| Error::Codec(e.to_string()))
        }
        #[cfg(feature = "brotli")]
        Compression::Brotli => {
            use std::io::Write;
            let mut out = Vec::new();
            {
                let mut writer = brotli::CompressorWriter::new(&mut out, 4096, 9, 22);
                writer
                    .write_all(data)
                    .map_err(|e| Error::Codec(e.to_string()))?;
            }
            Ok(out)
        }
        #[cfg(feature = "zstd")]
        Compression::Zstd => {
            zstd::encode_all(data, 0).map_err(|e| Error::Codec(e.to_string()))
        }
        Compression::Unknown => Err(Error::UnsupportedCompression(0)),
        #[allow(unreachable_patterns)]
        other => Err(Error::UnsupportedCompression(other.into())),
    }
}

/// Decompress `data` previously produced by [`compress`] with the same `kind`.
pub fn decompress(data: &[u8], kind: Compression) -> Result<Vec<u8>> {
    match kind {
        Compression::None => Ok(data.to_vec()),
        #[cfg(feature = "gzip")]
        Compression::Gzip => {
            use flate2::read::GzDecoder;
            use std::io::Read;
            let mut decoder = GzDecoder::new(data);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| Error::Codec(e.to_string()))?;
            Ok(out)
        }
        #[cfg(feature = "brotli")]
        Compression::Brotli => {
            use std::io::Read;
            let mut decoder = brotli::Decompressor::new(data, 4096);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| Error::Codec(e.to_string()))?;
            Ok(out)
        }
        #[cfg(feature = "zstd")]
        Compression::Zstd => {
            zstd::decode_all(data).map_err(|e| Error::Codec(e.to_string()))
        }
        Compression::Unknown => Err(Error::UnsupportedCompression(0)),
        #[allow(unreachable_patterns)]
        other => Err(Error::UnsupportedCompression(other.into())),
    }
}
