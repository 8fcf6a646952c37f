use crate::error::{IndexError, IndexResult};

/// Arena handle for a member inside one [`MemberTree`](crate::MemberTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub u32);

/// Handle for a class or module registered in the symbol cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParentId(pub u32);

/// Handle for a method registered in the symbol cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId(pub u32);

macro_rules! arena_id {
    ($name:ident) => {
        impl $name {
            pub fn new(value: u32) -> Option<Self> {
                if value == 0 { None } else { Some(Self(value)) }
            }

            pub fn value(&self) -> u32 {
                self.0
            }

            /// Position of the entry in its backing vector
            pub(crate) fn index(self) -> usize {
                (self.0 - 1) as usize
            }

            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32 + 1)
            }
        }
    };
}

arena_id!(MemberId);
arena_id!(ParentId);
arena_id!(MethodId);

/// Offsets of a member in its source text.
///
/// `start_outer` points at the leading keyword (`def`, `class`), `start` at the
/// member name and `end` at the closing `end`. Offsets are byte offsets into
/// the UTF-8 source, as handed over by the parser. A `Span` always satisfies
/// `start_outer <= start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start_outer: usize,
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(start_outer: usize, start: usize, end: usize) -> IndexResult<Self> {
        if start > end || start_outer > start {
            return Err(IndexError::InvalidSpan {
                start_outer,
                start,
                end,
            });
        }
        Ok(Self {
            start_outer,
            start,
            end,
        })
    }

    /// Span starting and ending at the given offsets, `end` clamped to `start`
    pub(crate) fn at_least(start: usize, end: usize) -> Self {
        Self {
            start_outer: start,
            start,
            end: end.max(start),
        }
    }

    pub fn start_outer(&self) -> usize {
        self.start_outer
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Span covering `[0, len]`, used for the synthetic root.
    pub fn whole(len: usize) -> Self {
        Self {
            start_outer: 0,
            start: 0,
            end: len,
        }
    }

    /// True when `offset` lies in `[start_outer, end]`.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start_outer && offset <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        assert!(MemberId::new(0).is_none());
        assert!(ParentId::new(0).is_none());

        let id = MethodId::new(42).unwrap();
        assert_eq!(id.value(), 42);
        assert_eq!(id.index(), 41);
        assert_eq!(MethodId::from_index(41), id);
    }

    #[test]
    fn test_span_rejects_inverted_offsets() {
        assert!(Span::new(0, 5, 10).is_ok());
        assert!(Span::new(5, 5, 5).is_ok());

        assert!(matches!(
            Span::new(0, 11, 10),
            Err(IndexError::InvalidSpan { .. })
        ));
        assert!(matches!(
            Span::new(6, 5, 10),
            Err(IndexError::InvalidSpan { .. })
        ));
    }

    #[test]
    fn test_span_contains() {
        let span = Span::new(10, 14, 20).unwrap();

        assert!(span.contains(10)); // Outer start
        assert!(span.contains(15));
        assert!(span.contains(20)); // End is inclusive

        assert!(!span.contains(9));
        assert!(!span.contains(21));
    }

    #[test]
    fn test_clamped_span_keeps_ordering() {
        let span = Span::at_least(12, 4);
        assert_eq!((span.start_outer(), span.start(), span.end()), (12, 12, 12));
        assert_eq!(Span::at_least(3, 9).end(), 9);
    }

    #[test]
    fn test_whole_span() {
        let span = Span::whole(100);
        assert!(span.contains(0));
        assert!(span.contains(100));
        assert_eq!(span.start_outer(), 0);
        assert_eq!(span.end(), 100);
    }
}
