//! Sponge Schematic Version 3.
//!
//! The payload nests under a single `Schematic` child compound. Blocks move
//! into a `Blocks { Palette, Data, BlockEntities }` compound, biomes into a
//! `Biomes { Palette, Data }` compound indexed 3D by the block linear index,
//! and entities stay at the `Schematic` level.

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

const VERSION: i32 = 3;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct V3Root {
    schematic: V3Nbt,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct V3Nbt {
    version: i32,
    #[serde(default)]
    data_version: i32,
    #[serde(default)]
    metadata: V3Metadata,
    width: i16,
    height: i16,
    length: i16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<IntArray>,
    blocks: V3Blocks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    biomes: Option<V3Biomes>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    entities: Vec<HashMap<String, Value>>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct V3Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct V3Blocks {
    palette: HashMap<String, i32>,
    data: ByteArray,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    block_entities: Vec<HashMap<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct V3Biomes {
    palette: Vec<String>,
    data: ByteArray,
}

/// Read a sponge v3 schematic.
#[instrument(skip(data), err)]
pub fn read_v3(data: &[u8]) -> Result<Schematic> {
    let root: V3Root = read_gzip_nbt(data)?;
    let doc = root.schematic;
    if doc.version != VERSION {
        return Err(Error::WrongFormatVersion {
            expected: VERSION,
            found: doc.version,
        });
    }

    let (width, height, length) = super::check_dimensions(doc.width, doc.height, doc.length)?;
    let mut schem = Schematic::new(width, height, length, "sponge_v3");
    schem.set_data_version(doc.data_version);

    if let Some(offset) = &doc.offset {
        if offset.len() >= 3 {
            schem.set_offset(offset[0], offset[1], offset[2]);
        }
    }
    if let Some(name) = &doc.metadata.name {
        schem.set_metadata("Name", Value::String(name.clone()));
    }
    if let Some(author) = &doc.metadata.author {
        schem.set_metadata("Author", Value::String(author.clone()));
    }
    if let Some(date) = doc.metadata.date {
        schem.set_metadata("Date", Value::Long(date));
    }
    if let Some(description) = &doc.metadata.description {
        schem.set_metadata("Description", Value::String(description.clone()));
    }

    let palette = super::invert_palette(&doc.blocks.palette);
    let bytes: Vec<u8> = doc.blocks.data.iter().map(|&b| b as u8).collect();
    let indices = decode_varint_array(&bytes, schem.volume())?;
    super::apply_block_indices(&mut schem, &palette, &indices);

    for compound in &doc.blocks.block_entities {
        let be = nbt::block_entity_from_sponge(compound);
        schem.set_block_entity(be.x, be.y, be.z, Some(be));
    }

    // 3D biome grid over the block linear index.
    if let Some(biomes) = &doc.biomes {
        let bytes: Vec<u8> = biomes.data.iter().map(|&b| b as u8).collect();
        let biome_indices = decode_varint_array(&bytes, schem.volume())?;
        for y in 0..height {
            for z in 0..length {
                for x in 0..width {
                    let idx = (x + z * width + y * width * length) as usize;
                    let Some(&biome_idx) = biome_indices.get(idx) else {
                        continue;
                    };
                    if let Some(name) = biomes.palette.get(biome_idx as usize) {
                        schem.set_biome(x, y, z, Some(name.clone()));
                    }
                }
            }
        }
    }

    for compound in &doc.entities {
        schem.add_entity(nbt::entity_from_compound(compound));
    }

    Ok(schem)
}

/// Write a schematic as sponge v3.
#[instrument(skip_all, err)]
pub fn write_v3<W: Write>(writer: &mut W, schem: &Schematic) -> Result<()> {
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
    let mut biome_indices = vec![0u32; schem.volume()];
    let mut has_biomes = false;
    for y in 0..height {
        for z in 0..length {
            for x in 0..width {
                if let Some(name) = schem.biome(x, y, z) {
                    has_biomes = true;
                    let idx = (x + z * width + y * width * length) as usize;
                    biome_indices[idx] = biome_palette.add(crate::types::BlockState::new(name));
                }
            }
        }
    }

    let biomes = has_biomes.then(|| V3Biomes {
        palette: biome_palette.iter().map(|state| state.name.clone()).collect(),
        data: ByteArray::new(
            encode_varint_array(&biome_indices)
                .into_iter()
                .map(|b| b as i8)
                .collect(),
        ),
    });

    let entities = schem
        .entities()
        .iter()
        .map(|entity| nbt::entity_to_compound(entity, "Id", entity.pos))
        .collect();

    let metadata = V3Metadata {
        name: schem.metadata_str("Name").map(str::to_owned),
        author: schem.metadata_str("Author").map(str::to_owned),
        date: schem.metadata_i64("Date"),
        description: schem.metadata_str("Description").map(str::to_owned),
    };

    let root = V3Root {
        schematic: V3Nbt {
            version: VERSION,
            data_version: schem.data_version(),
            metadata,
            width: width as i16,
            height: height as i16,
            length: length as i16,
            offset: Some(IntArray::new(vec![offset_x, offset_y, offset_z])),
            blocks: V3Blocks {
                palette: super::palette_to_map(&palette),
                data: ByteArray::new(
                    encode_varint_array(&indices)
                        .into_iter()
                        .map(|b| b as i8)
                        .collect(),
                ),
                block_entities,
            },
            biomes,
            entities,
        },
    };

    let bytes = write_gzip_nbt(&root, "")?;
    writer.write_all(&bytes)?;
    Ok(())
}
