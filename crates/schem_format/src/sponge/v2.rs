//! Sponge Schematic Version 2.
//!
//! Same flat root as v1 with the block entity list renamed to
//! `BlockEntities`, plus an optional `Entities` list and an optional 2D
//! biome layer (`BiomePaletteMax`, `BiomePalette`, `BiomeData`) indexed by
//! `x + z * width`.

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

const VERSION: i32 = 2;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct V2Nbt {
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
    block_entities: Vec<HashMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    entities: Vec<HashMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    biome_palette_max: Option<i32>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    biome_palette: HashMap<String, i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    biome_data: Option<ByteArray>,
}

/// Read a sponge v2 schematic.
#[instrument(skip(data), err)]
pub fn read_v2(data: &[u8]) -> Result<Schematic> {
    let root: V2Nbt = read_gzip_nbt(data)?;
    if root.version != VERSION {
        return Err(Error::WrongFormatVersion {
            expected: VERSION,
            found: root.version,
        });
    }

    let (width, height, length) = super::check_dimensions(root.width, root.height, root.length)?;
    let mut schem = Schematic::new(width, height, length, "sponge_v2");
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

    for compound in &root.block_entities {
        let be = nbt::block_entity_from_sponge(compound);
        schem.set_block_entity(be.x, be.y, be.z, Some(be));
    }

    // 2D biome layer, one entry per column.
    if let Some(biome_data) = &root.biome_data {
        let biome_palette = super::invert_biome_palette(&root.biome_palette);
        let bytes: Vec<u8> = biome_data.iter().map(|&b| b as u8).collect();
        let biome_indices = decode_varint_array(&bytes, (width * length) as usize)?;
        for z in 0..length {
            for x in 0..width {
                let idx = (x + z * width) as usize;
                let Some(&biome_idx) = biome_indices.get(idx) else {
                    continue;
                };
                if let Some(Some(name)) = biome_palette.get(biome_idx as usize) {
                    schem.set_biome(x, 0, z, Some(name.clone()));
                }
            }
        }
    }

    for compound in &root.entities {
        schem.add_entity(nbt::entity_from_compound(compound));
    }

    Ok(schem)
}

/// Write a schematic as sponge v2.
#[instrument(skip_all, err)]
pub fn write_v2<W: Write>(writer: &mut W, schem: &Schematic) -> Result<()> {
    let (width, height, length) = schem.dimensions();
    let (offset_x, offset_y, offset_z) = schem.offset();

    let mut palette = Palette::with_air();
    let indices = super::collect_block_indices(schem, &mut palette);

    let mut block_entities = Vec::new();
    for y in 0..height {
        for z in 0..length {
            for x in 0..width {
                if let Some(be) = schem.block_entity(x, y, z) {
                    block_entities.push(nbt::block_entity_to_sponge(be, x, y, z));
                }
            }
        }
    }

    let mut biome_palette = Palette::new();
    let mut biome_indices = vec![0u32; (width * length) as usize];
    let mut has_biomes = false;
    for z in 0..length {
        for x in 0..width {
            if let Some(name) = schem.biome(x, 0, z) {
                has_biomes = true;
                biome_indices[(x + z * width) as usize] =
                    biome_palette.add(crate::types::BlockState::new(name));
            }
        }
    }

    let entities = schem
        .entities()
        .iter()
        .map(|entity| nbt::entity_to_compound(entity, "Id", entity.pos))
        .collect();

    let mut root = V2Nbt {
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
        block_entities,
        entities,
        biome_palette_max: None,
        biome_palette: HashMap::new(),
        biome_data: None,
    };

    if has_biomes {
        root.biome_palette_max = Some(biome_palette.len() as i32 - 1);
        root.biome_palette = biome_palette
            .iter()
            .enumerate()
            .map(|(idx, state)| (state.name.clone(), idx as i32))
            .collect();
        root.biome_data = Some(ByteArray::new(
            encode_varint_array(&biome_indices)
                .into_iter()
                .map(|b| b as i8)
                .collect(),
        ));
    }

    let bytes = write_gzip_nbt(&root, "Schematic")?;
    writer.write_all(&bytes)?;
    Ok(())
}
