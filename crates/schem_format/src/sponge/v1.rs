//! Sponge Schematic Version 1.
//!
//! Flat root compound named `Schematic`: `Width`, `Height`, `Length`
//! (int16), optional `Offset` (int32[3]), `PaletteMax`, `Palette`
//! (map of canonical state string to int32), `BlockData` (VarInt byte
//! stream), and a `TileEntities` list. No biomes, no entities.

use std::collections::HashMap;
use std::io::Write;

use fastnbt::{ByteArray, IntArray, Value};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::compression::{read_gzip_nbt, write_gzip_nbt};
use crate::error::{Error, Result};
use crate::nbt;
use crate::palette::Palette;
use crate::schematic::Schematic;
use crate::varint::{decode_varint_array, encode_varint_array};

const VERSION: i32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct V1Nbt {
    version: i32,
    #[serde(default)]
    data_version: i32,
    width: i16,
    height: i16,
    length: i16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<IntArray>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    metadata: HashMap<String, Value>,
    palette_max: i32,
    palette: HashMap<String, i32>,
    block_data: ByteArray,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tile_entities: Vec<HashMap<String, Value>>,
}

/// Read a sponge v1 schematic.
#[instrument(skip(data), err)]
pub fn read_v1(data: &[u8]) -> Result<Schematic> {
    let root: V1Nbt = read_gzip_nbt(data)?;
    if root.version != VERSION {
        return Err(Error::WrongFormatVersion {
            expected: VERSION,
            found: root.version,
        });
    }

    let (width, height, length) = super::check_dimensions(root.width, root.height, root.length)?;
    let mut schem = Schematic::new(width, height, length, "sponge_v1");
    schem.set_data_version(root.data_version);

    if let Some(offset) = &root.offset {
        if offset.len() >= 3 {
            schem.set_offset(offset[0], offset[1], offset[2]);
        }
    }
    for (key, value) in &root.metadata {
        schem.set_metadata(key.clone(), value.clone());
    }

    let palette = super::invert_palette(&root.palette);
    let bytes: Vec<u8> = root.block_data.iter().map(|&b| b as u8).collect();
    let indices = decode_varint_array(&bytes, schem.volume())?;
    super::apply_block_indices(&mut schem, &palette, &indices);

    for compound in &root.tile_entities {
        let be = nbt::block_entity_from_sponge(compound);
        schem.set_block_entity(be.x, be.y, be.z, Some(be));
    }

    Ok(schem)
}

/// Write a schematic as sponge v1.
#[instrument(skip_all, err)]
pub fn write_v1<W: Write>(writer: &mut W, schem: &Schematic) -> Result<()> {
    let (width, height, length) = schem.dimensions();
    let (offset_x, offset_y, offset_z) = schem.offset();

    let mut palette = Palette::with_air();
    let indices = super::collect_block_indices(schem, &mut palette);

    let mut tile_entities = Vec::new();
    for y in 0..height {
        for z in 0..length {
            for x in 0..width {
                if let Some(be) = schem.block_entity(x, y, z) {
                    tile_entities.push(nbt::block_entity_to_sponge(be, x, y, z));
                }
            }
        }
    }

    let root = V1Nbt {
        version: VERSION,
        data_version: schem.data_version(),
        width: width as i16,
        height: height as i16,
        length: length as i16,
        offset: Some(IntArray::new(vec![offset_x, offset_y, offset_z])),
        metadata: schem.metadata().clone(),
        palette_max: palette.len() as i32 - 1,
        palette: super::palette_to_map(&palette),
        block_data: ByteArray::new(
            encode_varint_array(&indices)
                .into_iter()
                .map(|b| b as i8)
                .collect(),
        ),
        tile_entities,
    };

    let bytes = write_gzip_nbt(&root, "Schematic")?;
    writer.write_all(&bytes)?;
    Ok(())
}
