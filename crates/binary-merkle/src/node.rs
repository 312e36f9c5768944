use std::{
    fmt,
    sync::Arc,
};

use crate::{
    combine,
    hash_leaf,
    Error,
};

/// A vertex of the hash tree.
///
/// A leaf wraps exactly one block and its digest `SHA256(block)`. An internal
/// node holds two children and the digest `SHA256(left.digest || right.digest)`.
/// Every node also records the blocks covered by its subtree, from left to right.
///
/// Nodes are immutable once constructed.
#[derive(Clone, PartialEq, Eq)]
pub struct Node {
    values: Vec<Vec<u8>>,
    children: Option<Children>,
    digest: [u8; 32],
}

#[derive(Clone, PartialEq, Eq)]
struct Children {
    left: Arc<Node>,
    right: Arc<Node>,
}

impl Node {
    /// Creates a leaf node wrapping `value`.
    ///
    /// # Examples
    /// ```
    /// use binary_merkle::{
    ///     hash_leaf,
    ///     Node,
    /// };
    /// let leaf = Node::leaf("hello");
    /// assert_eq!(hash_leaf(b"hello"), *leaf.digest());
    /// assert!(leaf.is_leaf());
    /// ```
    #[must_use]
    pub fn leaf<T: AsRef<[u8]>>(value: T) -> Self {
        let value = value.as_ref();
        Self {
            values: vec![value.to_vec()],
            children: None,
            digest: hash_leaf(value),
        }
    }

    /// Creates an internal node over `left` and `right`.
    ///
    /// If `right` is `None` the left child is paired with itself: both child
    /// slots then point at the same node.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use binary_merkle::{
    ///     combine,
    ///     Node,
    /// };
    /// let leaf = Arc::new(Node::leaf("c"));
    /// let parent = Node::internal(leaf.clone(), None);
    /// assert_eq!(combine(leaf.digest(), leaf.digest()), *parent.digest());
    /// assert_eq!(parent.left(), parent.right());
    /// ```
    #[must_use]
    pub fn internal(left: Arc<Node>, right: Option<Arc<Node>>) -> Self {
        let right = right.unwrap_or_else(|| left.clone());
        let digest = combine(&left.digest, &right.digest);
        let mut values = Vec::with_capacity(left.values.len() + right.values.len());
        values.extend_from_slice(&left.values);
        values.extend_from_slice(&right.values);
        Self {
            values,
            children: Some(Children {
                left,
                right,
            }),
            digest,
        }
    }

    /// Returns a builder to construct a node from an arbitrary combination of
    /// value and children, checking that the combination is valid.
    #[must_use = "the builder must be used to construct a node to be useful"]
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the SHA256 digest of this node.
    #[must_use]
    pub fn digest(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Returns the blocks covered by this node, ordered left to right.
    #[must_use]
    pub fn values(&self) -> &[Vec<u8>] {
        &self.values
    }

    /// Returns the left child, or `None` for a leaf.
    #[must_use]
    pub fn left(&self) -> Option<&Node> {
        self.children.as_ref().map(|children| &*children.left)
    }

    /// Returns the right child, or `None` for a leaf.
    #[must_use]
    pub fn right(&self) -> Option<&Node> {
        self.children.as_ref().map(|children| &*children.right)
    }

    /// Returns `true` if this node wraps a single block and has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Returns `true` if both child slots refer to the same node, i.e. if this
    /// node was created by pairing its left child with itself.
    #[must_use]
    pub fn is_duplicated(&self) -> bool {
        self.children
            .as_ref()
            .is_some_and(|children| Arc::ptr_eq(&children.left, &children.right))
    }

    pub(crate) fn children(&self) -> Option<(&Node, &Node)> {
        self.children
            .as_ref()
            .map(|children| (&*children.left, &*children.right))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("digest", &hex::encode(self.digest))
            .field("values", &DisplayValues(&self.values))
            .field("is_leaf", &self.is_leaf())
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            DisplayValues(&self.values),
            hex::encode(self.digest)
        )
    }
}

struct DisplayValues<'a>(&'a [Vec<u8>]);

impl fmt::Display for DisplayValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", String::from_utf8_lossy(value))?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for DisplayValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A builder for [`Node`] that accepts a value, children, or both, and
/// rejects the combinations that do not describe a node.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use binary_merkle::Node;
/// let leaf = Node::builder().value("a").try_build().unwrap();
/// assert_eq!(Node::leaf("a"), leaf);
///
/// let err = Node::builder()
///     .value("a")
///     .left(Arc::new(leaf))
///     .try_build()
///     .expect_err("a node cannot have both a value and a child");
/// assert!(err.is_invalid_construction());
/// ```
#[derive(Default)]
pub struct Builder {
    value: Option<Vec<u8>>,
    left: Option<Arc<Node>>,
    right: Option<Arc<Node>>,
}

impl Builder {
    #[must_use = "the builder must be built to construct a node to be useful"]
    pub fn value<T: AsRef<[u8]>>(self, value: T) -> Self {
        Self {
            value: Some(value.as_ref().to_vec()),
            ..self
        }
    }

    #[must_use = "the builder must be built to construct a node to be useful"]
    pub fn left(self, left: Arc<Node>) -> Self {
        Self {
            left: Some(left),
            ..self
        }
    }

    #[must_use = "the builder must be built to construct a node to be useful"]
    pub fn right(self, right: Arc<Node>) -> Self {
        Self {
            right: Some(right),
            ..self
        }
    }

    /// Attempts to build a node from the configured value and children.
    ///
    /// # Errors
    /// Returns an error if one of the following conditions is violated:
    /// + a value was given together with a left or right child.
    /// + neither a value nor a left child was given.
    /// + a right child was given without a left child.
    pub fn try_build(self) -> Result<Node, Error> {
        let Self {
            value,
            left,
            right,
        } = self;
        match (value, left, right) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(Error::value_and_child()),
            (Some(value), None, None) => Ok(Node::leaf(value)),
            (None, Some(left), right) => Ok(Node::internal(left, right)),
            (None, None, Some(_)) => Err(Error::right_without_left()),
            (None, None, None) => Err(Error::no_content()),
        }
    }
}
