//! Bit packing of palette indices into signed 64-bit word arrays.
//!
//! Two layouts exist in the wild and must not be mixed up:
//!
//! - **Block-aligned** (Axiom, vanilla chunk sections): each word holds
//!   `64 / bits` whole values; a value never crosses a word boundary and the
//!   top bits of each word go unused.
//! - **Tight** (Litematica): one continuous bit cursor over the word array;
//!   a value may straddle two words.

/// Minimum number of bits needed to index a palette of `palette_size` entries.
///
/// A single-entry palette still takes one bit; everything else is
/// `ceil(log2(n))` with a floor of 2, which is what the litematica formats
/// store. Axiom raises the floor to 4 at its call sites.
pub fn bits_per_entry(palette_size: usize) -> u32 {
    if palette_size <= 1 {
        return 1;
    }
    (usize::BITS - (palette_size - 1).leading_zeros()).max(2)
}

/// Pack `values` at `bits` per entry without crossing word boundaries.
pub fn pack_aligned(values: &[u32], bits: u32) -> Vec<i64> {
    if bits == 0 {
        return Vec::new();
    }
    let per_word = (64 / bits) as usize;
    let mut words = vec![0i64; values.len().div_ceil(per_word)];
    for (i, &value) in values.iter().enumerate() {
        let shift = (i % per_word) as u32 * bits;
        words[i / per_word] |= (value as i64) << shift;
    }
    words
}

/// Unpack `count` values of `bits` each from a block-aligned word array.
///
/// Missing trailing words decode as zero.
pub fn unpack_aligned(words: &[i64], bits: u32, count: usize) -> Vec<u32> {
    if bits == 0 || words.is_empty() {
        return vec![0; count];
    }
    let per_word = (64 / bits) as usize;
    let mask = (1u64 << bits) - 1;
    (0..count)
        .map(|i| match words.get(i / per_word) {
            Some(&word) => {
                let shift = (i % per_word) as u32 * bits;
                ((word as u64 >> shift) & mask) as u32
            }
            None => 0,
        })
        .collect()
}

/// Pack `values` at `bits` per entry with a continuous bit cursor.
pub fn pack_tight(values: &[u32], bits: u32) -> Vec<i64> {
    if bits == 0 {
        return Vec::new();
    }
    let total_bits = values.len() * bits as usize;
    let mut words = vec![0i64; total_bits.div_ceil(64)];
    let mut bit_pos = 0usize;
    for &value in values {
        let word = bit_pos / 64;
        let offset = (bit_pos % 64) as u32;
        let room = 64 - offset;
        if room >= bits {
            words[word] |= (value as i64) << offset;
        } else {
            // Low bits finish off the current word, high bits start the next.
            let low_mask = (1u64 << room) - 1;
            words[word] |= ((value as u64 & low_mask) as i64) << offset;
            if word + 1 < words.len() {
                let high_mask = (1u64 << (bits - room)) - 1;
                words[word + 1] |= ((value as u64 >> room) & high_mask) as i64;
            }
        }
        bit_pos += bits as usize;
    }
    words
}

/// Unpack `count` values of `bits` each from a tightly packed word array.
pub fn unpack_tight(words: &[i64], bits: u32, count: usize) -> Vec<u32> {
    if bits == 0 || words.is_empty() {
        return vec![0; count];
    }
    let mask = (1u64 << bits) - 1;
    let mut values = vec![0u32; count];
    let mut bit_pos = 0usize;
    for slot in values.iter_mut() {
        let word = bit_pos / 64;
        let offset = (bit_pos % 64) as u32;
        if word >= words.len() {
            break;
        }
        let room = 64 - offset;
        *slot = if room >= bits {
            ((words[word] as u64 >> offset) & mask) as u32
        } else {
            let low_mask = (1u64 << room) - 1;
            let mut value = (words[word] as u64 >> offset) & low_mask;
            if word + 1 < words.len() {
                let high_mask = (1u64 << (bits - room)) - 1;
                value |= (words[word + 1] as u64 & high_mask) << room;
            }
            value as u32
        };
        bit_pos += bits as usize;
    }
    values
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bits_for_small_palettes() {
        assert_eq!(bits_per_entry(0), 1);
        assert_eq!(bits_per_entry(1), 1);
        assert_eq!(bits_per_entry(2), 2);
        assert_eq!(bits_per_entry(4), 2);
        assert_eq!(bits_per_entry(5), 3);
        assert_eq!(bits_per_entry(16), 4);
        assert_eq!(bits_per_entry(17), 5);
        assert_eq!(bits_per_entry(255), 8);
        assert_eq!(bits_per_entry(257), 9);
    }

    #[test]
    fn aligned_values_stay_within_words() {
        // 5 bits -> 12 values per word; value 13 must land in the second word.
        let values: Vec<u32> = (0..14).collect();
        let words = pack_aligned(&values, 5);
        assert_eq!(words.len(), 2);
        assert_eq!(unpack_aligned(&words, 5, values.len()), values);
    }

    #[test]
    fn tight_values_straddle_words() {
        // 5 bits * 13 values = 65 bits, forcing a split at the word boundary.
        let values: Vec<u32> = (0..13).map(|i| (i * 7) % 32).collect();
        let words = pack_tight(&values, 5);
        assert_eq!(words.len(), 2);
        assert_eq!(unpack_tight(&words, 5, values.len()), values);
    }

    #[test]
    fn round_trip_both_layouts() {
        for bits in [2u32, 3, 4, 5, 7, 9, 13] {
            let max = (1u64 << bits) as u32;
            let values: Vec<u32> = (0..200).map(|i| (i * 31 + 7) % max).collect();
            assert_eq!(
                unpack_aligned(&pack_aligned(&values, bits), bits, values.len()),
                values,
                "aligned at {bits} bits"
            );
            assert_eq!(
                unpack_tight(&pack_tight(&values, bits), bits, values.len()),
                values,
                "tight at {bits} bits"
            );
        }
    }

    #[test]
    fn max_value_round_trips() {
        for bits in [2u32, 3, 4, 5, 7, 9, 13] {
            let values = vec![(1u32 << bits) - 1];
            assert_eq!(
                unpack_aligned(&pack_aligned(&values, bits), bits, 1),
                values
            );
            assert_eq!(unpack_tight(&pack_tight(&values, bits), bits, 1), values);
        }
    }

    #[test]
    fn zero_bits_decode_to_zeros() {
        assert_eq!(pack_aligned(&[], 0), Vec::<i64>::new());
        assert_eq!(pack_tight(&[0, 0], 0), Vec::<i64>::new());
        assert_eq!(unpack_aligned(&[], 0, 3), vec![0, 0, 0]);
        assert_eq!(unpack_tight(&[], 4, 2), vec![0, 0]);
    }

    #[test]
    fn missing_trailing_words_decode_to_zero() {
        let values: Vec<u32> = (0..20).map(|i| i % 16).collect();
        let mut words = pack_aligned(&values, 4);
        words.truncate(1);
        let decoded = unpack_aligned(&words, 4, values.len());
        assert_eq!(&decoded[..16], &values[..16]);
        assert_eq!(&decoded[16..], &[0, 0, 0, 0]);
    }
}
