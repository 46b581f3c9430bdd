use std::collections::HashMap;

use fastnbt::Value;
use pretty_assertions::assert_eq;
use schem_format::{
    read, read_format, write_format, BlockEntity, BlockState, Entity, Schematic,
};

fn stone() -> BlockState {
    BlockState::new("minecraft:stone")
}

fn dirt() -> BlockState {
    BlockState::new("minecraft:dirt")
}

fn encode(format_id: &str, schem: &Schematic) -> Vec<u8> {
    let mut out = Vec::new();
    write_format(&mut out, format_id, schem).expect("encode");
    out
}

/// Every codec must reproduce dimensions, offset, and the canonical block
/// set of a schematic whose content spans its full bounding box.
#[test]
fn single_codec_round_trips() {
    for format_id in [
        "sponge_v1",
        "sponge_v2",
        "sponge_v3",
        "litematica",
        "axiom",
        "mcedit",
    ] {
        let mut schem = Schematic::new(3, 2, 3, format_id);
        schem.set_offset(4, -2, 7);
        schem.set_data_version(3465);
        schem.set_block(0, 0, 0, Some(stone()));
        schem.set_block(1, 0, 2, Some(dirt()));
        schem.set_block(2, 1, 2, Some(stone()));

        let decoded = read_format(&encode(format_id, &schem), format_id)
            .unwrap_or_else(|err| panic!("decode {format_id}: {err}"));

        assert_eq!(decoded.dimensions(), (3, 2, 3), "dimensions for {format_id}");
        assert_eq!(decoded.offset(), (4, -2, 7), "offset for {format_id}");
        assert_eq!(decoded.format(), format_id);
        if format_id != "mcedit" {
            assert_eq!(decoded.data_version(), 3465, "data version for {format_id}");
        }
        for y in 0..2 {
            for z in 0..3 {
                for x in 0..3 {
                    let expected = schem.block(x, y, z).map(BlockState::canonical);
                    let actual = decoded.block(x, y, z).map(BlockState::canonical);
                    assert_eq!(actual, expected, "block at ({x},{y},{z}) for {format_id}");
                }
            }
        }
    }
}

/// Writing with one codec and re-reading through autodetection agrees with
/// the directly decoded schematic.
#[test]
fn detected_reads_match_direct_reads() {
    let mut schem = Schematic::new(2, 2, 2, "sponge_v2");
    schem.set_block(0, 0, 0, Some(stone()));
    schem.set_block(1, 1, 1, Some(dirt()));

    for format_id in ["sponge_v1", "sponge_v2", "sponge_v3", "axiom", "mcedit"] {
        let data = encode(format_id, &schem);
        let direct = read_format(&data, format_id).unwrap();
        let detected = read(data.as_slice()).unwrap();
        assert_eq!(detected.dimensions(), direct.dimensions());
        assert_eq!(detected.block_count(), direct.block_count());
    }
}

#[test]
fn sponge_v3_small_volume() {
    let mut schem = Schematic::new(2, 1, 2, "sponge_v3");
    schem.set_block(0, 0, 0, Some(stone()));

    let decoded = read_format(&encode("sponge_v3", &schem), "sponge_v3").unwrap();
    assert_eq!(decoded.dimensions(), (2, 1, 2));
    assert_eq!(
        decoded.block(0, 0, 0).map(BlockState::canonical),
        Some("minecraft:stone".to_owned())
    );
    assert_eq!(decoded.block(1, 0, 0), None);
    assert_eq!(decoded.block(0, 0, 1), None);
    assert_eq!(decoded.block(1, 0, 1), None);
    assert_eq!(decoded.block_count(), 1);
}

#[test]
fn sponge_v2_block_entity_data_survives() {
    let mut schem = Schematic::new(1, 1, 1, "sponge_v2");
    schem.set_block(0, 0, 0, Some(BlockState::new("minecraft:chest")));
    let mut chest = BlockEntity::new("minecraft:chest", 0, 0, 0);
    chest
        .data
        .insert("Lock".to_owned(), Value::String("abc".to_owned()));
    schem.set_block_entity(0, 0, 0, Some(chest));

    let decoded = read_format(&encode("sponge_v2", &schem), "sponge_v2").unwrap();
    let be = decoded.block_entity(0, 0, 0).expect("block entity");
    assert_eq!(be.id, "minecraft:chest");
    assert_eq!((be.x, be.y, be.z), (0, 0, 0));
    assert_eq!(be.data.get("Lock"), Some(&Value::String("abc".to_owned())));
}

#[test]
fn sponge_v2_biomes_round_trip() {
    let mut schem = Schematic::new(2, 1, 2, "sponge_v2");
    schem.set_block(0, 0, 0, Some(stone()));
    schem.set_biome(0, 0, 0, Some("minecraft:plains".to_owned()));
    schem.set_biome(1, 0, 1, Some("minecraft:desert".to_owned()));

    let decoded = read_format(&encode("sponge_v2", &schem), "sponge_v2").unwrap();
    assert_eq!(decoded.biome(0, 0, 0), Some("minecraft:plains"));
    assert_eq!(decoded.biome(1, 0, 1), Some("minecraft:desert"));
}

#[test]
fn sponge_v3_biomes_are_three_dimensional() {
    let mut schem = Schematic::new(1, 2, 1, "sponge_v3");
    schem.set_block(0, 0, 0, Some(stone()));
    schem.set_biome(0, 0, 0, Some("minecraft:plains".to_owned()));
    schem.set_biome(0, 1, 0, Some("minecraft:desert".to_owned()));

    let decoded = read_format(&encode("sponge_v3", &schem), "sponge_v3").unwrap();
    assert_eq!(decoded.biome(0, 0, 0), Some("minecraft:plains"));
    assert_eq!(decoded.biome(0, 1, 0), Some("minecraft:desert"));
}

#[test]
fn entities_round_trip_through_sponge_v3() {
    let mut schem = Schematic::new(2, 2, 2, "sponge_v3");
    schem.set_block(0, 0, 0, Some(stone()));
    let mut entity = Entity::new("minecraft:armor_stand");
    entity.pos = [0.5, 0.0, 1.5];
    entity.rotation = [90.0, -12.5];
    entity.motion = [0.0, -0.08, 0.0];
    entity.uuid = Some([-1, 2, -3, 4]);
    entity
        .data
        .insert("Invisible".to_owned(), Value::Byte(1));
    schem.add_entity(entity.clone());

    let decoded = read_format(&encode("sponge_v3", &schem), "sponge_v3").unwrap();
    assert_eq!(decoded.entities().len(), 1);
    assert_eq!(decoded.entities()[0], entity);
}

#[test]
fn litematica_crops_to_content() {
    let mut schem = Schematic::new(3, 3, 3, "litematica");
    schem.set_offset(10, 20, 30);
    schem.set_block(2, 2, 2, Some(stone()));

    let decoded = read_format(&encode("litematica", &schem), "litematica").unwrap();
    assert_eq!(decoded.dimensions(), (1, 1, 1));
    assert_eq!(decoded.offset(), (12, 22, 32));
    assert_eq!(
        decoded.block(0, 0, 0).map(BlockState::canonical),
        Some("minecraft:stone".to_owned())
    );
    assert_eq!(decoded.block_count(), 1);
}

#[test]
fn litematica_block_entities_translate_with_the_crop() {
    let mut schem = Schematic::new(4, 4, 4, "litematica_v6");
    schem.set_block(2, 2, 2, Some(BlockState::new("minecraft:chest")));
    schem.set_block(3, 3, 3, Some(stone()));
    let mut chest = BlockEntity::new("minecraft:chest", 2, 2, 2);
    chest
        .data
        .insert("CustomName".to_owned(), Value::String("loot".to_owned()));
    schem.set_block_entity(2, 2, 2, Some(chest));

    let decoded = read_format(&encode("litematica_v6", &schem), "litematica_v6").unwrap();
    assert_eq!(decoded.dimensions(), (2, 2, 2));
    let be = decoded.block_entity(0, 0, 0).expect("translated block entity");
    assert_eq!(be.id, "minecraft:chest");
    assert_eq!(
        be.data.get("CustomName"),
        Some(&Value::String("loot".to_owned()))
    );
}

#[test]
fn litematica_never_stores_air_after_read() {
    let mut schem = Schematic::new(2, 2, 2, "litematica");
    schem.set_block(0, 0, 0, Some(stone()));
    schem.set_block(1, 1, 1, Some(dirt()));

    let decoded = read_format(&encode("litematica", &schem), "litematica").unwrap();
    for y in 0..2 {
        for z in 0..2 {
            for x in 0..2 {
                if let Some(block) = decoded.block(x, y, z) {
                    assert!(!block.is_air(), "air stored at ({x},{y},{z})");
                }
            }
        }
    }
    assert_eq!(decoded.block_count(), 2);
}

/// The two-bit floor shows up in the word count of the packed region data.
#[test]
fn litematica_packs_at_two_bits_minimum() {
    let mut schem = Schematic::new(4, 4, 4, "litematica");
    for y in 0..4 {
        for z in 0..4 {
            for x in 0..4 {
                schem.set_block(x, y, z, Some(stone()));
            }
        }
    }

    let data = encode("litematica", &schem);
    let nbt = gunzip(&data);
    let root: HashMap<String, Value> = fastnbt::from_bytes(&nbt).unwrap();
    let Some(Value::Compound(regions)) = root.get("Regions") else {
        panic!("missing Regions");
    };
    let Some(Value::Compound(region)) = regions.get("Region") else {
        panic!("missing Region");
    };
    let Some(Value::LongArray(words)) = region.get("BlockStates") else {
        panic!("missing BlockStates");
    };
    // 64 cells at 2 bits each, tightly packed.
    assert_eq!(words.len(), 2);
}

#[test]
fn axiom_negative_offsets_split_chunks() {
    let mut schem = Schematic::new(2, 1, 2, "axiom");
    schem.set_offset(-1, 0, -1);
    for z in 0..2 {
        for x in 0..2 {
            schem.set_block(x, 0, z, Some(stone()));
        }
    }

    let data = encode("axiom", &schem);
    let chunks = axiom_chunk_coords(&data);
    assert_eq!(chunks.len(), 4);
    assert!(chunks.contains(&(-1, 0, -1)));
    assert!(chunks.contains(&(0, 0, 0)));

    let decoded = read_format(&data, "axiom").unwrap();
    assert_eq!(decoded.dimensions(), (2, 1, 2));
    assert_eq!(decoded.offset(), (-1, 0, -1));
    assert_eq!(decoded.block_count(), 4);
}

/// Chunk palettes pack block-aligned with a four-bit floor: a two-entry
/// palette still packs 4096 cells into 4096 * 4 / 64 words.
#[test]
fn axiom_packs_at_four_bits_minimum() {
    let mut schem = Schematic::new(1, 1, 1, "axiom");
    schem.set_block(0, 0, 0, Some(stone()));

    let data = encode("axiom", &schem);
    let block_data = axiom_block_data(&data);
    let Some(Value::List(chunks)) = block_data.get("BlockRegion") else {
        panic!("missing BlockRegion");
    };
    let Value::Compound(chunk) = &chunks[0] else {
        panic!("chunk is not a compound");
    };
    let Some(Value::Compound(states)) = chunk.get("BlockStates") else {
        panic!("missing BlockStates");
    };
    let Some(Value::List(palette)) = states.get("palette") else {
        panic!("missing palette");
    };
    assert_eq!(palette.len(), 2);
    let Some(Value::LongArray(words)) = states.get("data") else {
        panic!("missing data");
    };
    assert_eq!(words.len(), 4096 * 4 / 64);
}

#[test]
fn axiom_block_entities_stay_in_bounds() {
    let mut schem = Schematic::new(2, 1, 1, "axiom");
    schem.set_offset(100, 64, -20);
    schem.set_block(0, 0, 0, Some(BlockState::new("minecraft:barrel")));
    schem.set_block(1, 0, 0, Some(stone()));
    schem.set_block_entity(0, 0, 0, Some(BlockEntity::new("minecraft:barrel", 0, 0, 0)));

    let decoded = read_format(&encode("axiom", &schem), "axiom").unwrap();
    let (width, height, length) = decoded.dimensions();
    let be = decoded.block_entity(0, 0, 0).expect("block entity");
    assert!(be.x >= 0 && be.x < width);
    assert!(be.y >= 0 && be.y < height);
    assert!(be.z >= 0 && be.z < length);
}

/// Entity positions deliberately widen the decoded bounding box beyond the
/// block envelope.
#[test]
fn axiom_entities_extend_the_bounding_box() {
    let mut schem = Schematic::new(1, 1, 1, "axiom");
    schem.set_block(0, 0, 0, Some(stone()));
    let mut entity = Entity::new("minecraft:cow");
    entity.pos = [2.5, 0.5, 2.5];
    schem.add_entity(entity);

    let decoded = read_format(&encode("axiom", &schem), "axiom").unwrap();
    assert_eq!(decoded.dimensions(), (4, 2, 4));
    assert_eq!(decoded.block_count(), 1);
}

#[test]
fn axiom_empty_schematic_reads_back_empty() {
    let mut schem = Schematic::new(2, 2, 2, "axiom");
    schem.set_metadata("Name", Value::String("empty".to_owned()));

    let decoded = read_format(&encode("axiom", &schem), "axiom").unwrap();
    assert_eq!(decoded.dimensions(), (0, 0, 0));
    assert_eq!(decoded.block_count(), 0);
    assert_eq!(
        decoded.metadata().get("Name"),
        Some(&Value::String("empty".to_owned()))
    );
}

#[test]
fn mcedit_legacy_ids_decode_to_namespaced_states() {
    let root: HashMap<String, Value> = [
        ("Width".to_owned(), Value::Short(1)),
        ("Height".to_owned(), Value::Short(1)),
        ("Length".to_owned(), Value::Short(1)),
        ("Materials".to_owned(), Value::String("Alpha".to_owned())),
        (
            "Blocks".to_owned(),
            Value::ByteArray(fastnbt::ByteArray::new(vec![1])),
        ),
        (
            "Data".to_owned(),
            Value::ByteArray(fastnbt::ByteArray::new(vec![0])),
        ),
    ]
    .into_iter()
    .collect();
    let data = gzip_bytes(&fastnbt::to_bytes(&root).unwrap());

    let decoded = read_format(&data, "mcedit").unwrap();
    assert_eq!(
        decoded.block(0, 0, 0).map(BlockState::canonical),
        Some("minecraft:stone".to_owned())
    );
    assert_eq!(decoded.data_version(), 1519);
    assert_eq!(decoded.version(), "1.13");
}

#[test]
fn mcedit_unmappable_blocks_write_as_air() {
    let mut schem = Schematic::new(2, 1, 1, "mcedit");
    schem.set_block(0, 0, 0, Some(stone()));
    schem.set_block(1, 0, 0, Some(BlockState::new("minecraft:sculk_sensor")));

    let decoded = read_format(&encode("mcedit", &schem), "mcedit").unwrap();
    assert_eq!(
        decoded.block(0, 0, 0).map(BlockState::canonical),
        Some("minecraft:stone".to_owned())
    );
    assert_eq!(decoded.block(1, 0, 0), None);
}

#[test]
fn cross_codec_equivalence() {
    let mut schem = Schematic::new(2, 2, 2, "sponge_v3");
    schem.set_data_version(2730);
    schem.set_block(0, 0, 0, Some(stone()));
    schem.set_block(1, 1, 1, Some(dirt()));

    let via_sponge = read_format(&encode("sponge_v3", &schem), "sponge_v3").unwrap();
    for format_id in ["sponge_v1", "sponge_v2", "litematica", "axiom", "mcedit"] {
        let again = read_format(&encode(format_id, &via_sponge), format_id).unwrap();
        assert_eq!(again.dimensions(), via_sponge.dimensions(), "{format_id}");
        for y in 0..2 {
            for z in 0..2 {
                for x in 0..2 {
                    assert_eq!(
                        again.block(x, y, z).map(BlockState::canonical),
                        via_sponge.block(x, y, z).map(BlockState::canonical),
                        "block at ({x},{y},{z}) via {format_id}"
                    );
                }
            }
        }
    }
}

// Small helpers for poking at written files.

fn gunzip(data: &[u8]) -> Vec<u8> {
    use std::io::Read;
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(data)
        .read_to_end(&mut out)
        .expect("gunzip");
    out
}

fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    use std::io::Write;
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn axiom_block_data(data: &[u8]) -> HashMap<String, Value> {
    let header_len = u32::from_be_bytes(data[4..8].try_into().unwrap()) as usize;
    let thumb_start = 8 + header_len;
    let thumb_len =
        u32::from_be_bytes(data[thumb_start..thumb_start + 4].try_into().unwrap()) as usize;
    let data_start = thumb_start + 4 + thumb_len + 4;
    fastnbt::from_bytes(&gunzip(&data[data_start..])).expect("block data nbt")
}

fn axiom_chunk_coords(data: &[u8]) -> Vec<(i32, i32, i32)> {
    let block_data = axiom_block_data(data);
    let Some(Value::List(chunks)) = block_data.get("BlockRegion") else {
        panic!("missing BlockRegion");
    };
    chunks
        .iter()
        .map(|chunk| {
            let Value::Compound(chunk) = chunk else {
                panic!("chunk is not a compound");
            };
            let coord = |key: &str| match chunk.get(key) {
                Some(Value::Int(n)) => *n,
                other => panic!("chunk {key} is {other:?}"),
            };
            (coord("X"), coord("Y"), coord("Z"))
        })
        .collect()
}
