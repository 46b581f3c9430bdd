//! Schematic format autodetection.

use std::collections::HashMap;

use byteorder::{BigEndian, ByteOrder};
use fastnbt::Value;
use tracing::debug;

use crate::compression::gunzip;
use crate::error::{Error, Result};

/// Leading magic of an Axiom blueprint frame.
pub const AXIOM_MAGIC: u32 = 0x0AE5_BB36;

/// Identify the schematic format of a raw byte buffer.
///
/// Inspection order: the Axiom magic first, then the gzip magic followed by
/// a probe of the decompressed NBT root compound. The returned identifier
/// can be handed to [`crate::read_format`].
pub fn detect(data: &[u8]) -> Result<&'static str> {
    if data.len() < 2 {
        return Err(Error::InsufficientData);
    }

    if data.len() >= 4 && BigEndian::read_u32(&data[..4]) == AXIOM_MAGIC {
        debug!("detected axiom blueprint magic");
        return Ok("axiom");
    }

    if data[0] == 0x1F && data[1] == 0x8B {
        return detect_gzip_nbt(data);
    }

    Err(Error::UnknownFormat)
}

fn detect_gzip_nbt(data: &[u8]) -> Result<&'static str> {
    let nbt = gunzip(data)?;
    let root: HashMap<String, Value> = fastnbt::from_bytes(&nbt).map_err(Error::NbtDecode)?;
    classify_root(&root)
}

fn classify_root(root: &HashMap<String, Value>) -> Result<&'static str> {
    if let Some(Value::Int(version)) = root.get("Version") {
        if root.contains_key("Regions") {
            return match version {
                6 => Ok("litematica_v6"),
                7 => Ok("litematica_v7"),
                _ => Err(Error::UnsupportedLitematicaVersion(*version)),
            };
        }
        return match version {
            1 => Ok("sponge_v1"),
            2 => Ok("sponge_v2"),
            3 => Ok("sponge_v3"),
            _ => Err(Error::UnknownSpongeVersion(*version)),
        };
    }

    if root.contains_key("Materials") && root.contains_key("Blocks") && root.contains_key("Data") {
        return Ok("mcedit");
    }

    // Sponge v3 nests its payload under a single `Schematic` compound; look
    // one level down before giving up.
    if let Some(Value::Compound(inner)) = root.get("Schematic") {
        return classify_root(inner);
    }

    Err(Error::UnknownGzipNbtFormat)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::gzip;

    fn gzipped_root(entries: Vec<(&str, Value)>) -> Vec<u8> {
        let root: HashMap<String, Value> = entries
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
        gzip(&fastnbt::to_bytes(&root).unwrap()).unwrap()
    }

    #[test]
    fn axiom_magic_alone_is_enough() {
        assert_eq!(detect(&[0x0A, 0xE5, 0xBB, 0x36]).unwrap(), "axiom");
    }

    #[test]
    fn short_input() {
        assert!(matches!(detect(&[0x0A]), Err(Error::InsufficientData)));
        assert!(matches!(detect(&[]), Err(Error::InsufficientData)));
    }

    #[test]
    fn arbitrary_bytes_are_unknown() {
        assert!(matches!(
            detect(&[0x00, 0x01, 0x02, 0x03]),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn sponge_versions() {
        for (version, expected) in [(1, "sponge_v1"), (2, "sponge_v2"), (3, "sponge_v3")] {
            let data = gzipped_root(vec![
                ("Version", Value::Int(version)),
                ("Palette", Value::Compound(HashMap::new())),
            ]);
            assert_eq!(detect(&data).unwrap(), expected);
        }
    }

    #[test]
    fn unknown_sponge_version() {
        let data = gzipped_root(vec![("Version", Value::Int(9))]);
        assert!(matches!(
            detect(&data),
            Err(Error::UnknownSpongeVersion(9))
        ));
    }

    #[test]
    fn litematica_versions() {
        for (version, expected) in [(6, "litematica_v6"), (7, "litematica_v7")] {
            let data = gzipped_root(vec![
                ("Version", Value::Int(version)),
                ("Regions", Value::Compound(HashMap::new())),
            ]);
            assert_eq!(detect(&data).unwrap(), expected);
        }
    }

    #[test]
    fn unsupported_litematica_version() {
        let data = gzipped_root(vec![
            ("Version", Value::Int(5)),
            ("Regions", Value::Compound(HashMap::new())),
        ]);
        assert!(matches!(
            detect(&data),
            Err(Error::UnsupportedLitematicaVersion(5))
        ));
    }

    #[test]
    fn mcedit_root_keys() {
        let data = gzipped_root(vec![
            ("Materials", Value::String("Alpha".to_owned())),
            ("Blocks", Value::ByteArray(fastnbt::ByteArray::new(vec![]))),
            ("Data", Value::ByteArray(fastnbt::ByteArray::new(vec![]))),
        ]);
        assert_eq!(detect(&data).unwrap(), "mcedit");
    }

    #[test]
    fn nested_schematic_compound_is_probed() {
        let inner: HashMap<String, Value> =
            [("Version".to_owned(), Value::Int(3))].into_iter().collect();
        let data = gzipped_root(vec![("Schematic", Value::Compound(inner))]);
        assert_eq!(detect(&data).unwrap(), "sponge_v3");
    }

    #[test]
    fn unrecognized_gzip_nbt() {
        let data = gzipped_root(vec![("Something", Value::Int(1))]);
        assert!(matches!(detect(&data), Err(Error::UnknownGzipNbtFormat)));
    }
}
