//! Gzip and gzip+NBT helpers shared by the compound-based codecs.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::error::{Error, Result};

/// Decompress a complete gzip stream into memory.
#[instrument(skip(data), err)]
pub(crate) fn gunzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(Error::Decompression)?;
    Ok(out)
}

/// Gzip-compress a buffer, always closing the encoder.
#[instrument(skip(data), err)]
pub(crate) fn gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress and decode one big-endian NBT document.
pub(crate) fn read_gzip_nbt<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    let nbt = gunzip(data)?;
    fastnbt::from_bytes(&nbt).map_err(Error::NbtDecode)
}

/// Encode one big-endian NBT document under `root_name` and gzip it.
pub(crate) fn write_gzip_nbt<T: Serialize>(value: &T, root_name: &str) -> Result<Vec<u8>> {
    let nbt = fastnbt::to_bytes_with_opts(value, fastnbt::SerOpts::new().root_name(root_name))
        .map_err(Error::NbtEncode)?;
    gzip(&nbt)
}
