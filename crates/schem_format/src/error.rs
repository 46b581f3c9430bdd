//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Input shorter than any format's minimum prefix
    #[error("input too short to identify a schematic format")]
    InsufficientData,

    /// The leading bytes match no known format
    #[error("unknown schematic format")]
    UnknownFormat,

    /// Gzip + NBT input whose root compound matches no known layout
    #[error("unrecognized gzip NBT layout")]
    UnknownGzipNbtFormat,

    /// A litematica file with a `Version` outside the supported range
    #[error("unsupported litematica version {0} (expected 6 or 7)")]
    UnsupportedLitematicaVersion(i32),

    /// A sponge schematic with a `Version` outside the supported range
    #[error("unknown sponge schematic version {0}")]
    UnknownSpongeVersion(i32),

    /// Dispatch over a format identifier that is not registered
    #[error("unsupported format {0:?}")]
    UnsupportedFormat(String),

    /// A schematic passed to [`crate::write`] without a format identifier
    #[error("schematic does not declare a format")]
    MissingFormat,

    /// The gzip layer rejected the input
    #[error("gzip decompression failed")]
    Decompression(#[source] std::io::Error),

    /// The NBT layer rejected the input
    #[error("nbt decode failed")]
    NbtDecode(#[source] fastnbt::error::Error),

    /// The NBT layer could not encode the output tree
    #[error("nbt encode failed")]
    NbtEncode(#[source] fastnbt::error::Error),

    /// A non-positive dimension on read
    #[error("invalid dimensions {0}x{1}x{2}")]
    InvalidDimensions(i32, i32, i32),

    /// A truncated or overlong VarInt
    #[error("malformed varint")]
    MalformedVarInt,

    /// MCEdit byte arrays whose length does not match the dimensions
    #[error("block data size mismatch: expected {expected} bytes, got {blocks} block bytes and {data} data bytes")]
    BlockDataSizeMismatch {
        expected: usize,
        blocks: usize,
        data: usize,
    },

    /// An Axiom blueprint that does not start with the expected magic
    #[error("invalid magic: expected {expected:#010x}, found {found:#010x}")]
    InvalidMagic { expected: u32, found: u32 },

    /// An Axiom blueprint section too large for its 32-bit length field
    #[error("frame section of {0} bytes exceeds the 32-bit length limit")]
    FrameTooLarge(usize),

    /// An Axiom blueprint that ends before its declared section lengths
    #[error("truncated blueprint frame")]
    TruncatedFrame,

    /// A format-specific version field with an unexpected value
    #[error("expected format version {expected}, found {found}")]
    WrongFormatVersion { expected: i32, found: i32 },

    /// A litematica file with an empty `Regions` compound
    #[error("no regions present in litematica file")]
    NoRegion,
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
