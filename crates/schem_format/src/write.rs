//! Writing schematics and enumerating the registered formats.

use std::io::Write;

use tracing::instrument;

use crate::error::{Error, Result};
use crate::schematic::Schematic;
use crate::{axiom, litematica, mcedit, sponge};

/// Write a schematic using its own format identifier, which must be
/// non-empty.
#[instrument(skip_all, err)]
pub fn write<W: Write>(writer: &mut W, schem: &Schematic) -> Result<()> {
    let format_id = schem.format();
    if format_id.is_empty() {
        return Err(Error::MissingFormat);
    }
    write_format(writer, format_id, schem)
}

/// Write a schematic in the given format.
///
/// The `litematica` alias and both versioned litematica identifiers emit a
/// version 6 file; multi-region writing is not supported.
#[instrument(skip(writer, schem), err)]
pub fn write_format<W: Write>(writer: &mut W, format_id: &str, schem: &Schematic) -> Result<()> {
    match format_id {
        "axiom" => axiom::write(writer, schem),
        "litematica" | "litematica_v6" | "litematica_v7" => litematica::write_v6(writer, schem),
        "mcedit" => mcedit::write(writer, schem),
        "sponge_v1" => sponge::write_v1(writer, schem),
        "sponge_v2" => sponge::write_v2(writer, schem),
        "sponge_v3" => sponge::write_v3(writer, schem),
        other => Err(Error::UnsupportedFormat(other.to_owned())),
    }
}

/// The sorted list of registered format identifiers.
pub fn formats() -> Vec<&'static str> {
    vec![
        "axiom",
        "litematica",
        "litematica_v6",
        "litematica_v7",
        "mcedit",
        "sponge_v1",
        "sponge_v2",
        "sponge_v3",
    ]
}
