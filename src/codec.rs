//! Code table records and canonical tree reconstruction
//!
//! Text form is one record per symbol, `symbol:path:frequency;`. Symbols
//! outside printable ASCII, and the separators themselves, are written as
//! `\xHH`.

use crate::bits::Bits;
use crate::error::CompressError;
use crate::tree::{HuffNode, HuffTree};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

const RECORD_SEPARATOR: char = ';';
const FIELD_SEPARATOR: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeTableRecord {
    pub symbol: u8,
    pub path: Bits,
    pub frequency: u64,
}

impl CodeTableRecord {
    pub fn new(symbol: u8, path: Bits, frequency: u64) -> Self {
        Self {
            symbol,
            path,
            frequency,
        }
    }
}

/// Project every leaf of `tree` into a record, in tree order
pub fn serialize(tree: &HuffTree) -> Vec<CodeTableRecord> {
    tree.leaves()
        .iter()
        .map(|leaf| CodeTableRecord::new(leaf.symbol, leaf.path.clone(), leaf.freq))
        .collect()
}

/// Render records as a single `;`-terminated line (without the newline)
pub fn to_text(records: &[CodeTableRecord]) -> String {
    let mut out = String::with_capacity(records.len() * 8);
    for record in records {
        write_symbol(&mut out, record.symbol);
        out.push(FIELD_SEPARATOR);
        out.push_str(&record.path.to_string());
        out.push(FIELD_SEPARATOR);
        out.push_str(&record.frequency.to_string());
        out.push(RECORD_SEPARATOR);
    }
    out
}

/// Parse a record line produced by [`to_text`]
pub fn parse_text(line: &str) -> Result<Vec<CodeTableRecord>, CompressError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let body = line.strip_suffix(RECORD_SEPARATOR).unwrap_or(line);
    if body.is_empty() {
        return Err(CompressError::HeaderParse("no code table records".into()));
    }
    body.split(RECORD_SEPARATOR).map(parse_record).collect()
}

fn parse_record(record: &str) -> Result<CodeTableRecord, CompressError> {
    let mut fields = record.split(FIELD_SEPARATOR);
    let (Some(symbol), Some(path), Some(frequency), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(CompressError::HeaderParse(format!(
            "record {record:?} is not symbol:path:frequency"
        )));
    };

    let symbol = parse_symbol(symbol)?;
    let path: Bits = path.parse()?;
    let frequency: u64 = frequency.parse().map_err(|_| {
        CompressError::HeaderParse(format!("invalid frequency in record {record:?}"))
    })?;
    if frequency == 0 {
        return Err(CompressError::HeaderParse(format!(
            "zero frequency in record {record:?}"
        )));
    }
    Ok(CodeTableRecord::new(symbol, path, frequency))
}

fn write_symbol(out: &mut String, symbol: u8) {
    let c = symbol as char;
    if (symbol.is_ascii_graphic() && !matches!(c, ':' | ';' | '\\')) || symbol == b' ' {
        out.push(c);
    } else {
        // writing into a String cannot fail
        let _ = write!(out, "\\x{symbol:02x}");
    }
}

fn parse_symbol(field: &str) -> Result<u8, CompressError> {
    match field.as_bytes() {
        [b] if b.is_ascii() && *b != b'\\' => Ok(*b),
        [b'\\', b'x', _, _] => u8::from_str_radix(&field[2..], 16)
            .map_err(|_| CompressError::HeaderParse(format!("invalid symbol escape {field:?}"))),
        _ => Err(CompressError::HeaderParse(format!("invalid symbol field {field:?}"))),
    }
}

/// Rebuild the tree from records alone
///
/// Nodes are merged bottom-up: the deepest pending path is joined with its
/// sibling (same path, last bit flipped) under a parent carrying the path
/// minus that bit, the `0` side on the left. Frequencies are carried along
/// but never influence shape.
pub fn rebuild(records: &[CodeTableRecord]) -> Result<HuffTree, CompressError> {
    if records.is_empty() {
        return Err(CompressError::HeaderParse("empty code table".into()));
    }

    let mut seen = BTreeSet::new();
    for record in records {
        if !seen.insert(record.symbol) {
            return Err(CompressError::HeaderParse(format!(
                "symbol {:#04x} appears twice",
                record.symbol
            )));
        }
    }

    if let [only] = records {
        if !only.path.is_empty() {
            return Err(CompressError::HeaderParse(format!(
                "single-symbol table must have an empty path, found {:?}",
                only.path.to_string()
            )));
        }
        return Ok(HuffTree::from_root(HuffNode::leaf(only.symbol, only.frequency)));
    }

    // keyed by (depth, path) so the last entry is always the deepest node
    let mut pending: BTreeMap<(usize, Bits), HuffNode> = BTreeMap::new();
    for record in records {
        if record.path.is_empty() {
            return Err(CompressError::HeaderParse(format!(
                "symbol {:#04x} has an empty path in a multi-symbol table",
                record.symbol
            )));
        }
        let key = (record.path.len(), record.path.clone());
        if pending.contains_key(&key) {
            return Err(CompressError::HeaderParse(format!(
                "path {} assigned to more than one symbol",
                record.path
            )));
        }
        pending.insert(key, HuffNode::leaf(record.symbol, record.frequency));
    }

    loop {
        let Some(((depth, path), node)) = pending.pop_last() else {
            return Err(CompressError::HeaderParse("code table has no root".into()));
        };
        let (Some(parent), Some(sibling), Some(bit)) = (path.parent(), path.sibling(), path.last())
        else {
            if pending.is_empty() {
                let tree = HuffTree::from_root(node);
                tracing::trace!(symbols = tree.symbol_count(), "rebuilt tree from code table");
                return Ok(tree);
            }
            return Err(CompressError::HeaderParse(
                "code table paths do not meet at a single root".into(),
            ));
        };

        let other = pending.remove(&(depth, sibling)).ok_or_else(|| {
            CompressError::HeaderParse(format!("path {path} has no sibling"))
        })?;
        let parent_key = (depth - 1, parent);
        if pending.contains_key(&parent_key) {
            return Err(CompressError::HeaderParse(format!(
                "path {} is a prefix of other paths",
                parent_key.1
            )));
        }
        let joined = if bit {
            HuffNode::join(other, node)
        } else {
            HuffNode::join(node, other)
        };
        pending.insert(parent_key, joined);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::tree::build;

    fn record(symbol: u8, path: &str, frequency: u64) -> CodeTableRecord {
        CodeTableRecord::new(symbol, path.parse().unwrap(), frequency)
    }

    #[test]
    fn test_text_format() {
        let records = vec![record(b'a', "00", 5), record(b'b', "01", 3), record(b'c', "1", 2)];
        let text = to_text(&records);
        assert_eq!(text, "a:00:5;b:01:3;c:1:2;");
        assert_eq!(parse_text(&text).unwrap(), records);
    }

    #[test]
    fn test_escaped_symbols() {
        let records = vec![
            record(b':', "00", 1),
            record(b';', "01", 1),
            record(b'\n', "10", 1),
            record(0xFF, "110", 1),
            record(b' ', "111", 1),
        ];
        let text = to_text(&records);
        assert_eq!(text, "\\x3a:00:1;\\x3b:01:1;\\x0a:10:1;\\xff:110:1; :111:1;");
        assert_eq!(parse_text(&text).unwrap(), records);
    }

    #[test]
    fn test_parse_missing_field() {
        let result = parse_text("a:00;b:01:3;");
        assert!(matches!(result, Err(CompressError::HeaderParse(_))));
    }

    #[test]
    fn test_parse_bad_frequency() {
        assert!(parse_text("a:0:x;b:1:1;").is_err());
        assert!(parse_text("a:0:0;b:1:1;").is_err());
    }

    #[test]
    fn test_parse_empty_line() {
        assert!(matches!(parse_text(""), Err(CompressError::HeaderParse(_))));
        assert!(matches!(parse_text("\n"), Err(CompressError::HeaderParse(_))));
    }

    #[test]
    fn test_serialize_tree_order() {
        let tree = build(&FrequencyTable::from_bytes(b"aaabbc")).unwrap();
        let records = serialize(&tree);
        assert_eq!(to_text(&records), "b:00:2;c:01:1;a:1:3;");
    }

    #[test]
    fn test_rebuild_matches_original_codes() {
        let data = b"she sells sea shells by the sea shore";
        let tree = build(&FrequencyTable::from_bytes(data)).unwrap();
        let rebuilt = rebuild(&serialize(&tree)).unwrap();
        for leaf in tree.leaves() {
            assert_eq!(rebuilt.code(leaf.symbol), Some(&leaf.path));
        }
        assert_eq!(rebuilt.symbol_count(), tree.symbol_count());
    }

    #[test]
    fn test_rebuild_ignores_frequencies() {
        let records = vec![record(b'a', "0", 1), record(b'b', "1", 100)];
        let tree = rebuild(&records).unwrap();
        assert_eq!(tree.code(b'a').unwrap().to_string(), "0");
        assert_eq!(tree.code(b'b').unwrap().to_string(), "1");
    }

    #[test]
    fn test_rebuild_single_symbol() {
        let tree = rebuild(&[record(b'z', "", 4)]).unwrap();
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().freq(), 4);
    }

    #[test]
    fn test_rebuild_duplicate_path() {
        let result = rebuild(&parse_text("a:0:2;b:0:1;").unwrap());
        assert!(matches!(result, Err(CompressError::HeaderParse(_))));
    }

    #[test]
    fn test_rebuild_duplicate_symbol() {
        let result = rebuild(&[record(b'a', "0", 1), record(b'a', "1", 1)]);
        assert!(matches!(result, Err(CompressError::HeaderParse(_))));
    }

    #[test]
    fn test_rebuild_prefix_overlap() {
        let records = vec![
            record(b'a', "0", 1),
            record(b'b', "00", 1),
            record(b'c', "01", 1),
            record(b'd', "1", 1),
        ];
        assert!(matches!(rebuild(&records), Err(CompressError::HeaderParse(_))));
    }

    #[test]
    fn test_rebuild_incomplete_tree() {
        let records = vec![record(b'a', "0", 1), record(b'b', "10", 1)];
        assert!(matches!(rebuild(&records), Err(CompressError::HeaderParse(_))));
    }

    #[test]
    fn test_rebuild_empty_path_among_many() {
        let records = vec![record(b'a', "", 1), record(b'b', "1", 1)];
        assert!(matches!(rebuild(&records), Err(CompressError::HeaderParse(_))));
    }

    #[test]
    fn test_rebuild_single_symbol_with_path() {
        assert!(rebuild(&[record(b'a', "0", 3)]).is_err());
    }

    #[test]
    fn test_rebuild_empty() {
        assert!(matches!(rebuild(&[]), Err(CompressError::HeaderParse(_))));
    }
}
