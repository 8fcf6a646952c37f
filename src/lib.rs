/// The main library module for ruby-index
// Debug macro for consistent debug output
#[macro_export]
macro_rules! debug_print {
    ($self:expr, $($arg:tt)*) => {
        if $crate::config::is_global_debug_enabled() {
            eprintln!("DEBUG: {}", format!($($arg)*));
        }
    };
}

pub mod cache;
pub mod config;
pub mod error;
pub mod indexing;
pub mod inference;
pub mod logging;
pub mod member;
pub mod parsing;
pub mod types;

// Explicit exports for better API clarity
pub use cache::{
    AddSummary, CacheMember, CacheStats, FrameworkConvention, Method, ParentMember,
    PropagationStats, SymbolCache,
};
pub use config::Settings;
pub use error::{IndexError, IndexResult};
pub use indexing::{FileTrees, IndexStats, IndexingOutcome, ProjectIndexer};
pub use inference::{ReturnType, infer_return_types};
pub use member::{
    LineOffsets, Member, MemberKey, MemberKind, MemberTree, MemberVisitor, MethodData, Problem,
    ProblemKind,
};
pub use parsing::{MemberParser, TextLines};
pub use types::{MemberId, MethodId, ParentId, Span};
