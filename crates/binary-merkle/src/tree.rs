use std::{
    collections::VecDeque,
    sync::Arc,
};

use tracing::{
    debug,
    trace,
};

use crate::{
    audit::Position,
    hash_leaf,
    Error,
    Node,
    Proof,
};

/// The root of a [`Tree`]: either absent for a tree without blocks, or a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Root {
    Empty,
    Present(Arc<Node>),
}

impl Root {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the root node, or `None` if the tree is empty.
    #[must_use]
    pub fn node(&self) -> Option<&Node> {
        match self {
            Self::Empty => None,
            Self::Present(node) => Some(node),
        }
    }

    /// Returns the digest of the root node.
    ///
    /// # Errors
    /// Returns an error if the tree is empty.
    pub fn digest(&self) -> Result<[u8; 32], Error> {
        self.node()
            .map(|node| *node.digest())
            .ok_or_else(Error::no_root)
    }

    /// Returns the blocks covered by the root node, i.e. all blocks of the tree.
    ///
    /// # Errors
    /// Returns an error if the tree is empty.
    pub fn values(&self) -> Result<&[Vec<u8>], Error> {
        self.node().map(Node::values).ok_or_else(Error::no_root)
    }

    /// Returns the left child of the root node, which is `None` if the root is a leaf.
    ///
    /// # Errors
    /// Returns an error if the tree is empty.
    pub fn left(&self) -> Result<Option<&Node>, Error> {
        self.node().map(Node::left).ok_or_else(Error::no_children)
    }

    /// Returns the right child of the root node, which is `None` if the root is a leaf.
    ///
    /// # Errors
    /// Returns an error if the tree is empty.
    pub fn right(&self) -> Result<Option<&Node>, Error> {
        self.node().map(Node::right).ok_or_else(Error::no_children)
    }
}

impl PartialEq<Node> for Root {
    fn eq(&self, other: &Node) -> bool {
        self.node().is_some_and(|node| node == other)
    }
}

impl std::fmt::Display for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("<empty tree: no root>"),
            Self::Present(node) => std::fmt::Display::fmt(node, f),
        }
    }
}

/// A binary hash tree built once from an ordered list of blocks.
///
/// Leaves are `SHA256(block)` and every parent is `SHA256(left || right)`. Each
/// level is built by pairing consecutive nodes of the level below; if a level has
/// an odd number of nodes, its last node is paired with itself.
///
/// The tree is immutable after construction. Changing the blocks requires building
/// a new tree.
#[derive(Clone, Debug)]
pub struct Tree {
    blocks: Vec<[u8; 32]>,
    root: Root,
    depth: usize,
}

impl Tree {
    /// Constructs a tree from an iterator yielding byte slices.
    ///
    /// # Examples
    /// ```
    /// use binary_merkle::{
    ///     combine,
    ///     hash_leaf,
    ///     Tree,
    /// };
    /// let tree = Tree::from_blocks(["a", "b"]);
    /// assert_eq!(
    ///     combine(&hash_leaf(b"a"), &hash_leaf(b"b")),
    ///     tree.root().digest().unwrap(),
    /// );
    /// assert_eq!(1, tree.depth());
    /// ```
    pub fn from_blocks<I, B>(iter: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut blocks = Vec::new();
        let mut level = Vec::new();
        for block in iter {
            let block = block.as_ref();
            blocks.push(hash_leaf(block));
            level.push(Arc::new(Node::leaf(block)));
        }

        let mut depth = 0;
        while level.len() > 1 {
            level = pair_up(level);
            depth += 1;
        }
        let root = level.pop().map_or(Root::Empty, Root::Present);

        debug!(
            blocks = blocks.len(),
            depth,
            root = %root.node().map(|node| hex::encode(node.digest())).unwrap_or_default(),
            "built hash tree",
        );
        Self {
            blocks,
            root,
            depth,
        }
    }

    /// Returns the root of the tree, which is [`Root::Empty`] if it has no blocks.
    #[must_use]
    pub fn root(&self) -> &Root {
        &self.root
    }

    /// Returns the number of levels above the leaves.
    ///
    /// Both the empty tree and a tree of a single block have depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the number of blocks the tree was built from.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the digest of the i-th block, or `None` if `i` falls outside the tree.
    #[must_use]
    pub fn leaf(&self, i: usize) -> Option<[u8; 32]> {
        self.blocks.get(i).copied()
    }

    /// Returns the index of the first block equal to `value`.
    #[must_use]
    pub fn index_of<T: AsRef<[u8]>>(&self, value: T) -> Option<usize> {
        let digest = hash_leaf(value.as_ref());
        self.blocks.iter().position(|block| *block == digest)
    }

    /// Returns `true` if `value` is one of the blocks of the tree.
    ///
    /// # Examples
    /// ```
    /// use binary_merkle::Tree;
    /// let tree = Tree::from_blocks(["a", "b", "c"]);
    /// assert!(tree.contains("c"));
    /// assert!(!tree.contains("c_"));
    /// ```
    #[must_use]
    pub fn contains<T: AsRef<[u8]>>(&self, value: T) -> bool {
        self.index_of(value).is_some()
    }

    /// Returns the nodes of the tree level by level, starting with the root.
    ///
    /// A node that was paired with itself contributes its child twice to the next
    /// level, so level `k` always holds `2^k` entries. Returns `None` for the
    /// empty tree.
    ///
    /// # Examples
    /// ```
    /// use binary_merkle::Tree;
    /// let tree = Tree::from_blocks(["a", "b", "c"]);
    /// let levels = tree.levels().unwrap();
    /// let leaves: Vec<_> = levels[2].iter().map(|node| node.values()[0].clone()).collect();
    /// assert_eq!(vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec(), b"c".to_vec()], leaves);
    /// ```
    #[must_use]
    pub fn levels(&self) -> Option<Vec<Vec<&Node>>> {
        let root = self.root.node()?;
        let mut levels = Vec::with_capacity(self.depth + 1);
        let mut queue = VecDeque::from([root]);
        let mut level_size = 1usize;
        let mut level = Vec::with_capacity(level_size);
        while let Some(node) = queue.pop_front() {
            level.push(node);
            if let Some((left, right)) = node.children() {
                queue.push_back(left);
                queue.push_back(right);
            }
            if level.len() == level_size {
                levels.push(std::mem::take(&mut level));
                level_size = level_size.saturating_mul(2);
                level.reserve(level_size);
            }
        }
        Some(levels)
    }

    /// Constructs the inclusion proof for `value`.
    ///
    /// Returns an empty proof if `value` is not a block of the tree. If `value`
    /// occurs several times, the proof is for its first occurrence.
    ///
    /// # Examples
    /// ```
    /// use binary_merkle::{
    ///     Position,
    ///     Tree,
    /// };
    /// let tree = Tree::from_blocks(["a", "b", "c", "d", "e"]);
    /// let proof = tree.proof("b");
    /// assert_eq!(3, proof.len());
    /// assert_eq!(
    ///     &[Position::Left, Position::Right, Position::Right],
    ///     proof.positions(),
    /// );
    /// assert!(tree.proof("f").is_empty());
    /// ```
    #[must_use]
    pub fn proof<T: AsRef<[u8]>>(&self, value: T) -> Proof {
        let value = value.as_ref();
        let Some(index) = self.index_of(value) else {
            trace!(
                value = %String::from_utf8_lossy(value),
                "value is not a block of the tree; returning empty proof",
            );
            return Proof::default();
        };
        let Some(mut node) = self.root.node() else {
            return Proof::default();
        };

        let mut audit_path = Vec::with_capacity(self.depth);
        let mut positions = Vec::with_capacity(self.depth);
        for bit in (0..self.depth).rev().map(|shift| (index >> shift) & 1) {
            let Some((left, right)) = node.children() else {
                break;
            };
            if bit == 1 {
                audit_path.push(*left.digest());
                positions.push(Position::Left);
                node = right;
            } else {
                audit_path.push(*right.digest());
                positions.push(Position::Right);
                node = left;
            }
        }
        audit_path.reverse();
        positions.reverse();
        Proof {
            audit_path,
            positions,
        }
    }
}

impl<B: AsRef<[u8]>> FromIterator<B> for Tree {
    fn from_iter<I: IntoIterator<Item = B>>(iter: I) -> Self {
        Self::from_blocks(iter)
    }
}

/// Builds the parent level of `level`, pairing consecutive nodes and pairing a
/// trailing unmatched node with itself.
fn pair_up(level: Vec<Arc<Node>>) -> Vec<Arc<Node>> {
    let mut parents = Vec::with_capacity(level.len().div_ceil(2));
    let mut nodes = level.into_iter();
    while let Some(left) = nodes.next() {
        parents.push(Arc::new(Node::internal(left, nodes.next())));
    }
    parents
}
