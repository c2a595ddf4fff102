use std::fmt;

/// Every way an archive operation can fail.
///
/// A missing tile is never represented here — `has_tile`/`get_tile` return
/// a plain `bool`/`Option`, not an error, when a coordinate was simply never
/// written.
#[derive(Debug)]
pub enum Error {
    /// The archive's first two bytes are not `"S2"`.
    BadMagic,
    /// The header's metadata length field is zero on read.
    MissingMetadata,
    /// Compressed metadata exceeds the 131 062 bytes available in the header.
    MetadataTooLarge {
        /// the size the caller tried to commit
        len: usize,
    },
    /// The requested compression kind is `Unknown`, or the codec needed for
    /// it was not compiled into this build.
    UnsupportedCompression(u8),
    /// A compress/decompress call failed.
    Codec(String),
    /// The underlying random-access byte store failed.
    Io(std::io::Error),
    /// A computed offset exceeded `2^48 - 1`; the archive is full.
    OffsetOverflow,
    /// An S2 face index outside `0..6` was passed to a `_s2` entry point.
    InvalidFace(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadMagic => write!(f, "bad magic: not an S2Tiles archive"),
            Error::MissingMetadata => write!(f, "missing metadata: length field is zero"),
            Error::MetadataTooLarge { len } => {
                write!(f, "metadata too large: {len} bytes exceeds 131062 byte limit")
            }
            Error::UnsupportedCompression(kind) => {
                write!(f, "unsupported compression kind: {kind}")
            }
            Error::Codec(msg) => write!(f, "codec error: {msg}"),
            Error::Io(err) => write!(f, "io error: {err}"),
            Error::OffsetOverflow => write!(f, "offset overflow: archive exceeds 2^48 bytes"),
            Error::InvalidFace(face) => write!(f, "invalid s2 face {face}: must be in 0..6"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// Shorthand for `Result<T, Error>`, used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
