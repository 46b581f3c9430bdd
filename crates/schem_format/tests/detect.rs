use std::collections::HashMap;
use std::io::Write;

use fastnbt::Value;
use pretty_assertions::assert_eq;
use schem_format::{detect, Error};

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
fn bare_axiom_magic() {
    assert_eq!(detect(&[0x0A, 0xE5, 0xBB, 0x36]).unwrap(), "axiom");
}

#[test]
fn sponge_v2_shape() {
    let data = gzipped_nbt(vec![
        ("Version", Value::Int(2)),
        ("Palette", Value::Compound(HashMap::new())),
        ("BlockData", Value::ByteArray(fastnbt::ByteArray::new(vec![]))),
    ]);
    assert_eq!(detect(&data).unwrap(), "sponge_v2");
}

#[test]
fn litematica_v6_shape() {
    let data = gzipped_nbt(vec![
        ("Version", Value::Int(6)),
        ("Regions", Value::Compound(HashMap::new())),
    ]);
    assert_eq!(detect(&data).unwrap(), "litematica_v6");
}

#[test]
fn litematica_v7_shape() {
    let data = gzipped_nbt(vec![
        ("Version", Value::Int(7)),
        ("Regions", Value::Compound(HashMap::new())),
    ]);
    assert_eq!(detect(&data).unwrap(), "litematica_v7");
}

#[test]
fn mcedit_shape() {
    let data = gzipped_nbt(vec![
        ("Materials", Value::String("Alpha".to_owned())),
        ("Blocks", Value::ByteArray(fastnbt::ByteArray::new(vec![]))),
        ("Data", Value::ByteArray(fastnbt::ByteArray::new(vec![]))),
    ]);
    assert_eq!(detect(&data).unwrap(), "mcedit");
}

#[test]
fn truncated_and_unknown_inputs() {
    assert!(matches!(detect(&[0x1F]), Err(Error::InsufficientData)));
    assert!(matches!(
        detect(b"PK\x03\x04not a schematic"),
        Err(Error::UnknownFormat)
    ));
}

#[test]
fn gzip_of_unrelated_nbt() {
    let data = gzipped_nbt(vec![("Level", Value::Compound(HashMap::new()))]);
    assert!(matches!(detect(&data), Err(Error::UnknownGzipNbtFormat)));
}
