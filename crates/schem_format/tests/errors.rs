use std::collections::HashMap;
use std::io::Write;

use fastnbt::Value;
use schem_format::{read_format, write, write_format, Error, Schematic};

fn gzipped_nbt(entries: Vec<(&str, Value)>) -> Vec<u8> {
    let root: HashMap<String, Value> = entries
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect();
    let nbt = fastnbt::to_bytes(&root).unwrap();
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&nbt).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn unknown_format_id_is_rejected() {
    assert!(matches!(
        read_format(&[0x1F, 0x8B], "worldedit"),
        Err(Error::UnsupportedFormat(id)) if id == "worldedit"
    ));

    let schem = Schematic::new(1, 1, 1, "sponge_v3");
    let mut out = Vec::new();
    assert!(matches!(
        write_format(&mut out, "worldedit", &schem),
        Err(Error::UnsupportedFormat(_))
    ));
}

#[test]
fn writing_without_a_format_fails() {
    let schem = Schematic::new(1, 1, 1, "");
    let mut out = Vec::new();
    assert!(matches!(write(&mut out, &schem), Err(Error::MissingFormat)));
}

#[test]
fn version_mismatch_is_rejected() {
    let mut schem = Schematic::new(1, 1, 1, "sponge_v2");
    let mut data = Vec::new();
    write_format(&mut data, "sponge_v2", &schem).unwrap();
    assert!(matches!(
        read_format(&data, "sponge_v1"),
        Err(Error::WrongFormatVersion {
            expected: 1,
            found: 2
        })
    ));

    schem.set_format("litematica_v7");
    let mut data = Vec::new();
    // All litematica identifiers write version 6 files.
    write_format(&mut data, "litematica_v7", &schem).unwrap();
    assert!(matches!(
        read_format(&data, "litematica_v7"),
        Err(Error::WrongFormatVersion {
            expected: 7,
            found: 6
        })
    ));
}

#[test]
fn non_positive_dimensions_are_rejected() {
    let data = gzipped_nbt(vec![
        ("Version", Value::Int(2)),
        ("Width", Value::Short(0)),
        ("Height", Value::Short(1)),
        ("Length", Value::Short(1)),
        ("PaletteMax", Value::Int(0)),
        ("Palette", Value::Compound(HashMap::new())),
        ("BlockData", Value::ByteArray(fastnbt::ByteArray::new(vec![]))),
    ]);
    assert!(matches!(
        read_format(&data, "sponge_v2"),
        Err(Error::InvalidDimensions(0, 1, 1))
    ));
}

#[test]
fn litematica_without_regions_is_rejected() {
    let data = gzipped_nbt(vec![
        ("Version", Value::Int(6)),
        ("Regions", Value::Compound(HashMap::new())),
    ]);
    assert!(matches!(
        read_format(&data, "litematica"),
        Err(Error::NoRegion)
    ));
}

#[test]
fn mcedit_array_length_mismatch_is_rejected() {
    let data = gzipped_nbt(vec![
        ("Width", Value::Short(2)),
        ("Height", Value::Short(2)),
        ("Length", Value::Short(2)),
        ("Materials", Value::String("Alpha".to_owned())),
        (
            "Blocks",
            Value::ByteArray(fastnbt::ByteArray::new(vec![1, 1, 1])),
        ),
        (
            "Data",
            Value::ByteArray(fastnbt::ByteArray::new(vec![0, 0, 0])),
        ),
    ]);
    assert!(matches!(
        read_format(&data, "mcedit"),
        Err(Error::BlockDataSizeMismatch {
            expected: 8,
            blocks: 3,
            data: 3
        })
    ));
}

#[test]
fn axiom_bad_magic_and_truncation() {
    assert!(matches!(
        read_format(&[0xDE, 0xAD, 0xBE, 0xEF], "axiom"),
        Err(Error::InvalidMagic {
            expected: 0x0AE5_BB36,
            found: 0xDEAD_BEEF
        })
    ));

    // Valid magic, but the declared header length runs past the input.
    let mut data = 0x0AE5_BB36_u32.to_be_bytes().to_vec();
    data.extend_from_slice(&100u32.to_be_bytes());
    data.extend_from_slice(&[0x0A, 0x00]);
    assert!(matches!(
        read_format(&data, "axiom"),
        Err(Error::TruncatedFrame)
    ));
}

#[test]
fn corrupt_gzip_is_a_decompression_error() {
    let data = [0x1F, 0x8B, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];
    assert!(matches!(
        read_format(&data, "sponge_v3"),
        Err(Error::Decompression(_))
    ));
}
