//! Reading schematics with or without format autodetection.

use std::io::Read;

use tracing::instrument;

use crate::detect::detect;
use crate::error::{Error, Result};
use crate::schematic::Schematic;
use crate::{axiom, litematica, mcedit, sponge};

/// Read a schematic from `reader`, detecting its format from the leading
/// bytes.
#[instrument(skip(reader), err)]
pub fn read<R: Read>(mut reader: R) -> Result<Schematic> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let format_id = detect(&data)?;
    read_format(&data, format_id)
}

/// Read a schematic in a specific format, skipping detection.
#[instrument(skip(data), err)]
pub fn read_format(data: &[u8], format_id: &str) -> Result<Schematic> {
    match format_id {
        "axiom" => axiom::read(data),
        "litematica" => litematica::read(data),
        "litematica_v6" => litematica::read_v6(data),
        "litematica_v7" => litematica::read_v7(data),
        "mcedit" => mcedit::read(data),
        "sponge_v1" => sponge::read_v1(data),
        "sponge_v2" => sponge::read_v2(data),
        "sponge_v3" => sponge::read_v3(data),
        other => Err(Error::UnsupportedFormat(other.to_owned())),
    }
}
