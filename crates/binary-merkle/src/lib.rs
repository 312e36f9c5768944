//! A binary SHA256 hash tree (Merkle tree) with inclusion proofs.
//!
//! The tree is built once from an ordered list of blocks. Every block becomes a
//! leaf holding `SHA256(block)`, and levels are reduced pairwise until a single
//! root remains. Each parent holds `SHA256(left || right)` over the raw 32 byte
//! digests of its children. A level with an odd number of nodes pairs its last
//! node with itself, so every internal node has two children.
//!
//! Unlike the RFC 6962 trees used elsewhere, leaves and parents are not domain
//! separated by a prefix byte: a leaf is the plain SHA256 of its block.
//!
//! # Usage and examples
//! ```
//! use binary_merkle::Tree;
//! // Construct a tree from an iterable yielding byte slices
//! let tree = Tree::from_blocks(["a", "b", "c"]);
//! assert!(tree.contains("b"));
//!
//! let root = tree.root().digest().expect("the tree has blocks");
//! let proof = tree.proof("c");
//!
//! assert!(proof.audit().with_root(root).with_value("c").perform());
//! ```
//!
//! # Structure
//! For the three blocks `a, b, c` the tree looks as follows, where `C` is paired
//! with itself at the first level:
//! ```text
//!          ABCC
//!        /      \
//!      AB        CC
//!     /  \      /  \
//!    A    B    C    C
//! ```
//! [`Tree::levels`] lists the nodes in this shape: `[[ABCC], [AB, CC], [A, B, C, C]]`.
//!
//! # Proofs
//! A [`Proof`] for a block lists the sibling digests from the leaf up to the root,
//! and for each sibling the [`Position`] it is combined on. Starting from
//! `SHA256(block)`, each step computes `SHA256(sibling || running)` for a left
//! sibling and `SHA256(running || sibling)` for a right one.
//!
//! # Empty trees
//! A tree without blocks has no root. Reading the digest, values or children of
//! its [`Root`] returns an [`Error`], while membership checks and proofs simply
//! report that the value is not in the tree.

use sha2::{
    Digest as _,
    Sha256,
};

pub mod audit;
mod error;
mod node;
mod tree;

pub use audit::{
    verify,
    Audit,
    Position,
    Proof,
};
pub use error::Error;
pub use node::{
    Builder as NodeBuilder,
    Node,
};
pub use tree::{
    Root,
    Tree,
};

/// Calculates `SHA256(leaf)`.
#[must_use]
pub fn hash_leaf(leaf: &[u8]) -> [u8; 32] {
    Sha256::digest(leaf).into()
}

/// Calculates `SHA256(left || right)`.
#[must_use]
pub fn combine(left: &[u8], right: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}
