//! Symbol encoding and root-to-leaf decoding walks

use crate::bits::Bits;
use crate::error::CompressError;
use crate::tree::{HuffNode, HuffTree};

/// Concatenate the code of every symbol in `data`
///
/// A single-symbol tree yields an empty bit string; the occurrence count
/// travels in that symbol's code table record instead.
pub fn encode(tree: &HuffTree, data: &[u8]) -> Result<Bits, CompressError> {
    let mut bits = Bits::with_capacity(data.len() * tree.max_code_len());
    for &b in data {
        let code = tree.code(b).ok_or(CompressError::UnknownSymbol(b))?;
        bits.extend_from(code);
    }
    Ok(bits)
}

/// Replay `bits` through the tree, emitting a symbol at every leaf
pub fn decode(tree: &HuffTree, bits: &Bits) -> Result<Vec<u8>, CompressError> {
    let root = tree.root();
    if let HuffNode::Leaf { symbol, freq } = root {
        if !bits.is_empty() {
            return Err(CompressError::CorruptHeader(format!(
                "single-symbol table carries {} unexpected payload bits",
                bits.len()
            )));
        }
        return Ok(vec![*symbol; *freq as usize]);
    }

    let mut output = Vec::new();
    let mut current = root;
    for (i, bit) in bits.iter().enumerate() {
        current = current
            .child(bit)
            .ok_or(CompressError::TruncatedStream { consumed: i })?;
        if let Some(symbol) = current.symbol() {
            output.push(symbol);
            current = root;
        }
    }

    if !std::ptr::eq(current, root) {
        return Err(CompressError::TruncatedStream {
            consumed: bits.len(),
        });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{pack, unpack};
    use crate::codec::{parse_text, rebuild};
    use crate::frequency::FrequencyTable;
    use crate::tree::build;

    #[test]
    fn test_roundtrip() {
        let data = b"hello world hello world hello";
        let tree = build(&FrequencyTable::from_bytes(data)).unwrap();
        let bits = encode(&tree, data).unwrap();
        assert_eq!(decode(&tree, &bits).unwrap(), data);
    }

    #[test]
    fn test_unknown_symbol() {
        let tree = build(&FrequencyTable::from_bytes(b"abc")).unwrap();
        let result = encode(&tree, b"abd");
        assert!(matches!(result, Err(CompressError::UnknownSymbol(b'd'))));
    }

    #[test]
    fn test_decode_from_header() {
        let tree = rebuild(&parse_text("a:0:2;b:1:1;").unwrap()).unwrap();
        let bits = unpack(&[0b0100_0000], 1, 2).unwrap();
        assert_eq!(decode(&tree, &bits).unwrap(), b"ab");
    }

    #[test]
    fn test_truncated_stream() {
        let tree = build(&FrequencyTable::from_bytes(b"aaabbc")).unwrap();
        // trailing "0" stops inside the subtree holding 'b' and 'c'
        let bits: Bits = "10".parse().unwrap();
        let result = decode(&tree, &bits);
        assert!(matches!(result, Err(CompressError::TruncatedStream { consumed: 2 })));
    }

    #[test]
    fn test_single_symbol_uses_count() {
        let data = b"zzzz";
        let tree = build(&FrequencyTable::from_bytes(data)).unwrap();
        let bits = encode(&tree, data).unwrap();
        assert!(bits.is_empty());
        let payload = pack(&bits).unwrap();
        let decoded = decode(&tree, &payload.unpack().unwrap()).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_single_symbol_rejects_bits() {
        let tree = build(&FrequencyTable::from_bytes(b"zz")).unwrap();
        let bits: Bits = "0".parse().unwrap();
        assert!(matches!(decode(&tree, &bits), Err(CompressError::CorruptHeader(_))));
    }

    #[test]
    fn test_empty_bits_decode_to_nothing() {
        let tree = build(&FrequencyTable::from_bytes(b"ab")).unwrap();
        assert!(decode(&tree, &Bits::new()).unwrap().is_empty());
    }
}
