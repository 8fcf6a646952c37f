//! Parser seam
//!
//! Ruby parsing happens outside this crate. A host plugs its parser in
//! through [`MemberParser`] and, for diagnostics, a [`LineOffsets`]
//! implementation such as [`TextLines`].

mod lines;

pub use lines::TextLines;

use crate::member::MemberTree;
use std::path::Path;

/// Produces the member tree of one Ruby source file.
///
/// Implementations must be deterministic: the same text and path always
/// yield the same tree. A file that cannot be parsed is reported as
/// [`MemberTree::failed`] carrying its diagnostics.
pub trait MemberParser: Send + Sync {
    fn parse(&self, text: &str, path: &Path) -> MemberTree;
}

impl<F> MemberParser for F
where
    F: Fn(&str, &Path) -> MemberTree + Send + Sync,
{
    fn parse(&self, text: &str, path: &Path) -> MemberTree {
        self(text, path)
    }
}
