#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    pub(crate) fn value_and_child() -> Self {
        Self(ErrorKind::ValueAndChild)
    }

    pub(crate) fn no_content() -> Self {
        Self(ErrorKind::NoContent)
    }

    pub(crate) fn right_without_left() -> Self {
        Self(ErrorKind::RightWithoutLeft)
    }

    pub(crate) fn mismatched_proof_lengths(path: usize, positions: usize) -> Self {
        Self(ErrorKind::MismatchedProofLengths {
            path,
            positions,
        })
    }

    pub(crate) fn no_root() -> Self {
        Self(ErrorKind::NoRoot)
    }

    pub(crate) fn no_children() -> Self {
        Self(ErrorKind::NoChildren)
    }

    /// Returns `true` if the error was caused by a node builder receiving a
    /// combination of value and children that does not describe a valid node.
    #[must_use]
    pub fn is_invalid_construction(&self) -> bool {
        matches!(
            self.0,
            ErrorKind::ValueAndChild | ErrorKind::NoContent | ErrorKind::RightWithoutLeft
        )
    }

    /// Returns `true` if the error was caused by reading the root of an empty tree.
    #[must_use]
    pub fn is_empty_tree_access(&self) -> bool {
        matches!(self.0, ErrorKind::NoRoot | ErrorKind::NoChildren)
    }

    #[cfg(test)]
    pub(crate) fn kind(&self) -> &ErrorKind {
        &self.0
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    #[error("cannot construct a node from both a value and a child")]
    ValueAndChild,
    #[error("cannot construct a node without a value or a left child")]
    NoContent,
    #[error("cannot construct a node with a right child but no left child")]
    RightWithoutLeft,
    #[error("proof has `{path}` sibling digests but `{positions}` positions")]
    MismatchedProofLengths { path: usize, positions: usize },
    #[error("empty tree: root does not exist")]
    NoRoot,
    #[error("empty tree: root has no children")]
    NoChildren,
}
