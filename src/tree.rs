//! Huffman tree construction
//!
//! Candidates are ordered by ascending frequency, ties broken by the smallest
//! symbol each candidate covers. The tie-break decides the exact codes and is
//! therefore part of the header format: two builds from the same table always
//! produce the same tree.

use crate::bits::Bits;
use crate::error::CompressError;
use crate::frequency::FrequencyTable;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: u8,
        freq: u64,
    },
    Internal {
        freq: u64,
        min_symbol: u8,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(symbol: u8, freq: u64) -> Self {
        HuffNode::Leaf { symbol, freq }
    }

    /// Join two subtrees; frequency and minimum symbol are derived from them
    pub fn join(left: HuffNode, right: HuffNode) -> Self {
        HuffNode::Internal {
            freq: left.freq() + right.freq(),
            min_symbol: left.min_symbol().min(right.min_symbol()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn freq(&self) -> u64 {
        match self {
            HuffNode::Leaf { freq, .. } | HuffNode::Internal { freq, .. } => *freq,
        }
    }

    /// Smallest symbol at or below this node
    pub fn min_symbol(&self) -> u8 {
        match self {
            HuffNode::Leaf { symbol, .. } => *symbol,
            HuffNode::Internal { min_symbol, .. } => *min_symbol,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<u8> {
        match self {
            HuffNode::Leaf { symbol, .. } => Some(*symbol),
            HuffNode::Internal { .. } => None,
        }
    }

    /// `false` descends left, `true` right. Leaves have no children.
    pub fn child(&self, bit: bool) -> Option<&HuffNode> {
        match self {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }
}

/// Leaf reached by a tree walk, with its root-to-leaf path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafCode {
    pub symbol: u8,
    pub freq: u64,
    pub path: Bits,
}

/// A fixed tree together with the code path of every symbol
#[derive(Debug, Clone)]
pub struct HuffTree {
    root: HuffNode,
    leaves: Vec<LeafCode>,
    codes: BTreeMap<u8, usize>,
}

impl HuffTree {
    /// Wrap a finished tree and assign code paths in one walk
    pub fn from_root(root: HuffNode) -> Self {
        let mut leaves = Vec::new();
        assign_paths(&root, Bits::new(), &mut leaves);
        let codes = leaves
            .iter()
            .enumerate()
            .map(|(i, leaf)| (leaf.symbol, i))
            .collect();
        Self {
            root,
            leaves,
            codes,
        }
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Leaves in left-first tree order
    pub fn leaves(&self) -> &[LeafCode] {
        &self.leaves
    }

    pub fn code(&self, symbol: u8) -> Option<&Bits> {
        self.codes.get(&symbol).map(|&i| &self.leaves[i].path)
    }

    pub fn symbol_count(&self) -> usize {
        self.leaves.len()
    }

    pub fn max_code_len(&self) -> usize {
        self.leaves.iter().map(|l| l.path.len()).max().unwrap_or(0)
    }
}

fn assign_paths(node: &HuffNode, path: Bits, leaves: &mut Vec<LeafCode>) {
    match node {
        HuffNode::Leaf { symbol, freq } => leaves.push(LeafCode {
            symbol: *symbol,
            freq: *freq,
            path,
        }),
        HuffNode::Internal { left, right, .. } => {
            assign_paths(left, path.child(false), leaves);
            assign_paths(right, path.child(true), leaves);
        }
    }
}

/// Heap entry giving `BinaryHeap` min-first order on (freq, min_symbol)
struct Candidate(HuffNode);

impl Candidate {
    fn key(&self) -> (u64, u8) {
        (self.0.freq(), self.0.min_symbol())
    }
}

impl Eq for Candidate {}
impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key()) // min-heap
    }
}

/// Build the Huffman tree for a frequency table
pub fn build(table: &FrequencyTable) -> Result<HuffTree, CompressError> {
    let mut heap: BinaryHeap<Candidate> = table
        .iter()
        .map(|(symbol, freq)| Candidate(HuffNode::leaf(symbol, freq)))
        .collect();

    // Pop-and-merge until a single root remains; a one-symbol table skips the
    // loop and its leaf becomes the root with an empty code.
    let root = loop {
        let lowest = heap.pop().ok_or(CompressError::EmptyInput)?.0;
        let Some(Candidate(next)) = heap.pop() else {
            break lowest;
        };
        // higher frequency goes left; `lowest` is never the higher one
        let merged = if lowest.freq() > next.freq() {
            HuffNode::join(lowest, next)
        } else {
            HuffNode::join(next, lowest)
        };
        heap.push(Candidate(merged));
    };

    let tree = HuffTree::from_root(root);
    tracing::debug!(
        symbols = tree.symbol_count(),
        max_code_len = tree.max_code_len(),
        total = tree.root().freq(),
        "built huffman tree"
    );
    Ok(tree)
}
