//! Property-based tests for the Huffman pipeline

use huffpack::bits::{pack, Bits};
use huffpack::codec;
use huffpack::frequency::FrequencyTable;
use huffpack::tree::{self, HuffNode};
use huffpack::walker;
use huffpack::Compressor;
use proptest::prelude::*;

fn frequency_sums_hold(node: &HuffNode) -> bool {
    match node {
        HuffNode::Leaf { .. } => true,
        HuffNode::Internal { freq, left, right, .. } => {
            *freq == left.freq() + right.freq()
                && frequency_sums_hold(left)
                && frequency_sums_hold(right)
        }
    }
}

proptest! {
    #[test]
    fn prop_roundtrip(data in prop::collection::vec(any::<u8>(), 1..2048)) {
        let compressor = Compressor::default();
        let compressed = compressor.compress(&data).unwrap();
        prop_assert_eq!(compressor.decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn prop_archive_roundtrip(data in prop::collection::vec(0u8..8, 1..512)) {
        let compressor = Compressor::default();
        let archive = compressor.compress_to_archive(&data).unwrap();
        prop_assert_eq!(compressor.decompress_archive(&archive).unwrap(), data);
    }

    #[test]
    fn prop_prefix_free(data in prop::collection::vec(any::<u8>(), 1..1024)) {
        let built = tree::build(&FrequencyTable::from_bytes(&data)).unwrap();
        for a in built.leaves() {
            for b in built.leaves() {
                if a.symbol != b.symbol {
                    prop_assert!(!a.path.is_prefix_of(&b.path));
                }
            }
        }
    }

    #[test]
    fn prop_frequency_sums(data in prop::collection::vec(any::<u8>(), 1..1024)) {
        let built = tree::build(&FrequencyTable::from_bytes(&data)).unwrap();
        prop_assert!(frequency_sums_hold(built.root()));
    }

    #[test]
    fn prop_deterministic_codes(counts in prop::collection::btree_map(any::<u8>(), 1u64..4, 1..64)) {
        let table = FrequencyTable::from_counts(counts).unwrap();
        let first = tree::build(&table).unwrap();
        let second = tree::build(&table).unwrap();
        prop_assert_eq!(first.leaves(), second.leaves());
    }

    #[test]
    fn prop_rebuild_preserves_codes(data in prop::collection::vec(any::<u8>(), 1..1024)) {
        let built = tree::build(&FrequencyTable::from_bytes(&data)).unwrap();
        let text = codec::to_text(&codec::serialize(&built));
        let rebuilt = codec::rebuild(&codec::parse_text(&text).unwrap()).unwrap();
        prop_assert_eq!(rebuilt.leaves(), built.leaves());
        let bits = walker::encode(&built, &data).unwrap();
        prop_assert_eq!(walker::decode(&rebuilt, &bits).unwrap(), data);
    }

    #[test]
    fn prop_pack_unpack(raw in prop::collection::vec(any::<bool>(), 0..200)) {
        let bits = Bits::from(raw);
        let payload = pack(&bits).unwrap();
        prop_assert_eq!(payload.total_bytes, bits.len().div_ceil(8).max(1));
        prop_assert_eq!(payload.unpack().unwrap(), bits);
    }
}
