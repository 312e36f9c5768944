//! Inclusion proofs and their verification.
//!
//! A [`Proof`] is the list of sibling digests on the path from a leaf up to the
//! root, together with the side each sibling sits on. Verifying a proof means
//! hashing the leaf value and folding the siblings into it, one level at a time,
//! and comparing the result against a known root.
use sha2::{
    Digest as _,
    Sha256,
};

use crate::{
    hash_leaf,
    Error,
};

/// The side a sibling digest is combined on when recomputing the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Position {
    /// The sibling is the left operand: `SHA256(sibling || running)`.
    Left,
    /// The sibling is the right operand: `SHA256(running || sibling)`.
    Right,
}

impl Position {
    /// Returns the position encoded as a bit: `1` for left, `0` for right.
    #[must_use]
    pub fn as_bit(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 0,
        }
    }

    /// Returns the position for a bit, with any non-zero bit meaning left.
    #[must_use]
    pub fn from_bit(bit: u8) -> Self {
        if bit == 0 {
            Self::Right
        } else {
            Self::Left
        }
    }

    fn fold(self, running: &[u8; 32], sibling: &[u8; 32]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        match self {
            Self::Left => {
                hasher.update(sibling);
                hasher.update(running);
            }
            Self::Right => {
                hasher.update(running);
                hasher.update(sibling);
            }
        }
        hasher.finalize().into()
    }
}

/// An inclusion proof for one block of a [`crate::Tree`].
///
/// The audit path is ordered from leaf to root: the first entry is the sibling of
/// the leaf itself. An empty proof is returned for blocks that are not in the tree,
/// and for the single block of a one-leaf tree (whose digest is the root).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawProof")
)]
pub struct Proof {
    #[cfg_attr(feature = "serde", serde(with = "hex_digests"))]
    pub(crate) audit_path: Vec<[u8; 32]>,
    pub(crate) positions: Vec<Position>,
}

impl Proof {
    /// Assembles a proof from a leaf-to-root audit path and the side of each sibling.
    ///
    /// # Errors
    /// Returns an error if `audit_path` and `positions` differ in length.
    pub fn try_from_parts(
        audit_path: Vec<[u8; 32]>,
        positions: Vec<Position>,
    ) -> Result<Self, Error> {
        if audit_path.len() != positions.len() {
            return Err(Error::mismatched_proof_lengths(
                audit_path.len(),
                positions.len(),
            ));
        }
        Ok(Self {
            audit_path,
            positions,
        })
    }

    /// Returns the sibling digests, ordered from leaf to root.
    #[must_use]
    pub fn audit_path(&self) -> &[[u8; 32]] {
        &self.audit_path
    }

    /// Returns the side of each sibling in [`Proof::audit_path`].
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Returns the positions as bits, `1` for a left sibling and `0` for a right one.
    #[must_use]
    pub fn position_bits(&self) -> Vec<u8> {
        self.positions.iter().copied().map(Position::as_bit).collect()
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<[u8; 32]>, Vec<Position>) {
        (self.audit_path, self.positions)
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.audit_path.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.audit_path.is_empty()
    }

    /// Folds the audit path into the digest of `value`, returning the root this
    /// proof commits `value` to.
    ///
    /// Only as many levels are folded as there are both siblings and positions.
    /// Use [`Proof::audit`] or [`verify`] to check a proof.
    #[must_use]
    pub fn reconstruct_root(&self, value: &[u8]) -> [u8; 32] {
        reduce(value, &self.audit_path, &self.positions)
    }

    /// Returns an [`Audit`] to check this proof against a root and value.
    ///
    /// # Examples
    /// ```
    /// use binary_merkle::Tree;
    /// let tree = Tree::from_blocks(["a", "b", "c"]);
    /// let root = tree.root().digest().unwrap();
    /// assert!(tree
    ///     .proof("b")
    ///     .audit()
    ///     .with_root(root)
    ///     .with_value("b")
    ///     .perform());
    /// assert!(!tree
    ///     .proof("b")
    ///     .audit()
    ///     .with_root(root)
    ///     .with_value("c")
    ///     .perform());
    /// ```
    #[must_use = "an audit must be performed to be useful"]
    pub fn audit(&self) -> Audit<'_, NoRoot, NoValue> {
        Audit {
            proof: self,
            root: NoRoot,
            value: NoValue,
        }
    }
}

pub struct NoRoot;
pub struct WithRoot([u8; 32]);
pub struct NoValue;
pub struct WithValue<'a>(&'a [u8]);

/// A builder to verify a [`Proof`], created through [`Proof::audit`].
///
/// The audit can only be performed once both a root and a value were provided.
pub struct Audit<'a, TRoot, TValue> {
    proof: &'a Proof,
    root: TRoot,
    value: TValue,
}

impl<'a, TRoot, TValue> Audit<'a, TRoot, TValue> {
    #[must_use = "an audit must be performed to be useful"]
    pub fn with_root(self, root: [u8; 32]) -> Audit<'a, WithRoot, TValue> {
        Audit {
            proof: self.proof,
            root: WithRoot(root),
            value: self.value,
        }
    }

    #[must_use = "an audit must be performed to be useful"]
    pub fn with_value<T: AsRef<[u8]> + ?Sized>(
        self,
        value: &'a T,
    ) -> Audit<'a, TRoot, WithValue<'a>> {
        Audit {
            proof: self.proof,
            root: self.root,
            value: WithValue(value.as_ref()),
        }
    }
}

impl Audit<'_, WithRoot, WithValue<'_>> {
    /// Returns `true` if the proof reconstructs the configured root from the
    /// configured value.
    ///
    /// A proof whose audit path and positions differ in length never passes.
    #[must_use]
    pub fn perform(&self) -> bool {
        let Self {
            proof,
            root: WithRoot(root),
            value: WithValue(value),
        } = self;
        verify(value, &proof.audit_path, &proof.positions, root)
    }
}

/// Checks that `path` and `positions` recompute `root` starting from `value`.
///
/// Returns `false` if `path` and `positions` differ in length.
///
/// # Examples
/// ```
/// use binary_merkle::{
///     verify,
///     Tree,
/// };
/// let tree = Tree::from_blocks(["a", "b", "c", "d"]);
/// let (path, positions) = tree.proof("d").into_parts();
/// let root = tree.root().digest().unwrap();
/// assert!(verify(b"d", &path, &positions, &root));
/// ```
#[must_use]
pub fn verify(value: &[u8], path: &[[u8; 32]], positions: &[Position], root: &[u8; 32]) -> bool {
    path.len() == positions.len() && reduce(value, path, positions) == *root
}

fn reduce(value: &[u8], path: &[[u8; 32]], positions: &[Position]) -> [u8; 32] {
    path.iter()
        .zip(positions)
        .fold(hash_leaf(value), |running, (sibling, position)| {
            position.fold(&running, sibling)
        })
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawProof {
    #[serde(with = "hex_digests")]
    audit_path: Vec<[u8; 32]>,
    positions: Vec<Position>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawProof> for Proof {
    type Error = Error;

    fn try_from(raw: RawProof) -> Result<Self, Self::Error> {
        Self::try_from_parts(raw.audit_path, raw.positions)
    }
}

#[cfg(feature = "serde")]
mod hex_digests {
    use serde::{
        de::Error as _,
        Deserialize as _,
        Deserializer,
        Serialize as _,
        Serializer,
    };

    pub(super) fn serialize<S: Serializer>(
        digests: &[[u8; 32]],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        digests
            .iter()
            .map(hex::encode)
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<[u8; 32]>, D::Error> {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|digest| {
                let mut bytes = [0u8; 32];
                hex::decode_to_slice(digest, &mut bytes).map_err(D::Error::custom)?;
                Ok(bytes)
            })
            .collect()
    }
}
