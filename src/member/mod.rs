//! Member model for indexed Ruby entities
//!
//! A [`Member`] is one entry produced by the parser for a source file: a
//! module, class or method, or one of the structural placeholders (root,
//! keyword, diagnostic, implicit `self` call). Members live in the arena of a
//! [`MemberTree`]; parent/child links are [`MemberId`](crate::MemberId)s.

mod tree;
mod visitor;

pub use tree::{MemberKey, MemberTree};
pub use visitor::MemberVisitor;

use crate::types::Span;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const INSTANCE_METHOD_DELIMITER: &str = "#";
const CLASS_METHOD_DELIMITER: &str = "::";

/// Severity of a parser diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    Warning,
    Error,
}

/// Parser diagnostic attached to a file.
///
/// Problems do not store offsets: the span is looked up from the line number
/// through the host editor when it is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub kind: ProblemKind,
    pub message: String,
    /// Zero-based line number
    pub line: usize,
}

impl Problem {
    pub fn warning(message: impl Into<String>, line: usize) -> Self {
        Self {
            kind: ProblemKind::Warning,
            message: message.into(),
            line,
        }
    }

    pub fn error(message: impl Into<String>, line: usize) -> Self {
        Self {
            kind: ProblemKind::Error,
            message: message.into(),
            line,
        }
    }

    /// Name shown in structure views, e.g. `" 3: unexpected end"`
    pub fn display_name(&self) -> String {
        format!(" {}: {}", self.line + 1, self.message)
    }

    pub fn span(&self, lines: &dyn LineOffsets) -> Span {
        let start = lines.non_space_start_offset(self.line);
        Span::at_least(start, lines.end_offset(self.line))
    }
}

/// Line to byte offset mapping supplied by the host editor.
pub trait LineOffsets {
    /// Offset of the first non-whitespace character on `line`
    fn non_space_start_offset(&self, line: usize) -> usize;

    /// Offset of the end of `line`
    fn end_offset(&self, line: usize) -> usize;
}

/// Method-specific attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodData {
    pub file_path: PathBuf,
    pub file_name: String,
    pub is_class_method: bool,
    /// Explicit receiver, e.g. `Foo` in `def Foo.bar`
    pub receiver_name: Option<String>,
    /// Raw parameter / call-seq text
    pub parameters: Option<String>,
    pub block_parameters: Option<String>,
    pub has_parameters: bool,
}

impl MethodData {
    pub fn new(file_path: impl AsRef<Path>, is_class_method: bool) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.to_string_lossy().into_owned());

        Self {
            file_path,
            file_name,
            is_class_method,
            receiver_name: None,
            parameters: None,
            block_parameters: None,
            has_parameters: true,
        }
    }

    pub fn delimiter(&self) -> &'static str {
        if self.is_class_method {
            CLASS_METHOD_DELIMITER
        } else {
            INSTANCE_METHOD_DELIMITER
        }
    }
}

/// Closed set of member variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    Module,
    Class {
        /// Superclass as written in source; resolved by name when needed
        super_class_name: Option<String>,
    },
    Method(MethodData),
    /// Whole-file sentinel
    Root,
    /// Language keyword offered by completion
    Keyword,
    Problem(Problem),
    /// Call to a method with `self` as the implicit receiver
    ImplicitSelfCall,
}

/// One indexed entity or structural placeholder
#[derive(Debug, Clone)]
pub struct Member {
    name: String,
    short_name: String,
    namespace: Option<String>,
    composite_namespace: Option<String>,
    documentation: Option<String>,
    span: Span,
    kind: MemberKind,
    /// Reset by every setter that feeds [`Member::rendered_documentation`]
    rendered_documentation: OnceLock<String>,
}

impl Member {
    fn with_kind(name: impl Into<String>, span: Span, kind: MemberKind) -> Self {
        let name = name.into();
        let short_name = short_name_of(&name);
        Self {
            name,
            short_name,
            namespace: None,
            composite_namespace: None,
            documentation: None,
            span,
            kind,
            rendered_documentation: OnceLock::new(),
        }
    }

    pub fn module(name: impl Into<String>, span: Span) -> Self {
        Self::with_kind(name, span, MemberKind::Module)
    }

    pub fn class(name: impl Into<String>, span: Span) -> Self {
        Self::with_kind(
            name,
            span,
            MemberKind::Class {
                super_class_name: None,
            },
        )
    }

    pub fn method(name: impl Into<String>, data: MethodData, span: Span) -> Self {
        Self::with_kind(name, span, MemberKind::Method(data))
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        Self::with_kind(name, Span::default(), MemberKind::Keyword)
    }

    pub fn implicit_self_call(name: impl Into<String>, span: Span) -> Self {
        Self::with_kind(name, span, MemberKind::ImplicitSelfCall)
    }

    /// Problem members carry an empty span; use [`Problem::span`] for display.
    pub fn problem(problem: Problem) -> Self {
        let name = problem.message.clone();
        Self::with_kind(name, Span::default(), MemberKind::Problem(problem))
    }

    pub(crate) fn root(text_len: usize) -> Self {
        Self::with_kind("root", Span::whole(text_len), MemberKind::Root)
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_composite_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.composite_namespace = Some(namespace.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.set_documentation(documentation);
        self
    }

    /// Sets the superclass name. Ignored for anything but classes.
    pub fn with_super_class(mut self, super_class: impl Into<String>) -> Self {
        if let MemberKind::Class { super_class_name } = &mut self.kind {
            let super_class = super_class.into();
            let super_class = super_class.trim();
            *super_class_name = (!super_class.is_empty()).then(|| super_class.to_string());
        }
        self
    }

    /// Sets an explicit receiver on a method and drops a `receiver.` prefix
    /// from its name.
    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        if let MemberKind::Method(data) = &mut self.kind {
            let receiver = receiver.into();
            let prefix = format!("{receiver}.");
            if let Some(stripped) = self.name.strip_prefix(&prefix) {
                self.name = stripped.to_string();
                self.short_name = short_name_of(&self.name);
            }
            data.receiver_name = Some(receiver);
        }
        self
    }

    pub fn with_parameters(mut self, parameters: impl Into<String>) -> Self {
        self.set_parameters(parameters);
        self
    }

    pub fn with_block_parameters(mut self, block_parameters: impl Into<String>) -> Self {
        let formatted = format_parameters(&self.name, &block_parameters.into());
        if let MemberKind::Method(data) = &mut self.kind {
            data.block_parameters = Some(formatted);
            self.rendered_documentation = OnceLock::new();
        }
        self
    }

    /// Stores raw documentation, rewriting the `|lt;` escape used by the
    /// documentation scraper.
    pub fn set_documentation(&mut self, documentation: impl Into<String>) {
        let documentation = documentation.into().replace("|lt;", "&lt;");
        self.documentation = Some(documentation);
        self.rendered_documentation = OnceLock::new();
    }

    /// Stores the parameter text and derives `has_parameters` from it.
    pub fn set_parameters(&mut self, parameters: impl Into<String>) {
        let parameters = parameters.into();
        let parameters = parameters.trim();
        let name = self.name.clone();
        if let MemberKind::Method(data) = &mut self.kind {
            if !parameters.contains('(') {
                data.has_parameters = false;
            } else if parameters.starts_with('(') && parameters.ends_with(')') {
                let inner = parameters[1..parameters.len() - 1].trim();
                data.has_parameters = !inner.is_empty();
            }
            data.parameters = Some(format_parameters(&name, parameters));
            self.rendered_documentation = OnceLock::new();
        }
    }

    /// Sets the superclass of a class that does not have one yet.
    pub(crate) fn fill_super_class(&mut self, super_class: &str) {
        if let MemberKind::Class { super_class_name } = &mut self.kind {
            if super_class_name.is_none() {
                *super_class_name = Some(super_class.to_string());
                self.rendered_documentation = OnceLock::new();
            }
        }
    }

    /// Copy of an instance method as the class method it becomes when its
    /// module is used to extend a class.
    pub(crate) fn promoted_to_class_method(&self) -> Member {
        let mut promoted = self.clone();
        if let MemberKind::Method(data) = &mut promoted.kind {
            data.is_class_method = true;
        }
        promoted.rendered_documentation = OnceLock::new();
        promoted
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            MemberKind::Problem(_) => &self.short_name,
            _ => &self.name,
        }
    }

    /// Name without namespace, parameter list or superclass suffix
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn lower_case_name(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Name including the namespace or receiver prefix
    pub fn full_name(&self) -> String {
        match &self.kind {
            MemberKind::Method(data) => {
                let delimiter = data.delimiter();
                match (&self.namespace, &data.receiver_name) {
                    (Some(namespace), _) => format!("{namespace}{delimiter}{}", self.short_name),
                    (None, Some(receiver)) => format!("{receiver}{delimiter}{}", self.short_name),
                    (None, None) => self.name.clone(),
                }
            }
            MemberKind::Problem(problem) => problem.display_name(),
            _ => match &self.namespace {
                Some(namespace) => format!("{namespace}{}", self.name),
                None => self.name.clone(),
            },
        }
    }

    /// Name as spelled in `module Www::Xxx` or `class Yyy::Zzz`
    pub fn composite_name(&self) -> String {
        match &self.composite_namespace {
            Some(namespace) => format!("{namespace}{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Documentation prefixed with a header for the member kind. Memoized until
    /// documentation or parameters change.
    pub fn rendered_documentation(&self) -> &str {
        self.rendered_documentation
            .get_or_init(|| self.render_documentation())
    }

    fn render_documentation(&self) -> String {
        let body = self.documentation.as_deref().unwrap_or_default();
        let header = match &self.kind {
            MemberKind::Method(data) => data
                .parameters
                .as_deref()
                .filter(|p| !p.is_empty())
                .or(data.block_parameters.as_deref())
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            MemberKind::Class { super_class_name } => Some(match super_class_name {
                Some(super_class) => format!("Class: {} < {super_class}", self.full_name()),
                None => format!("Class: {}", self.full_name()),
            }),
            MemberKind::Module => Some(format!("Module: {}", self.full_name())),
            _ => None,
        };

        match header {
            Some(header) if body.is_empty() => header,
            Some(header) => format!("{header}\n\n{body}"),
            None => body.to_string(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    pub fn method_data(&self) -> Option<&MethodData> {
        match &self.kind {
            MemberKind::Method(data) => Some(data),
            _ => None,
        }
    }

    pub fn super_class_name(&self) -> Option<&str> {
        match &self.kind {
            MemberKind::Class { super_class_name } => super_class_name.as_deref(),
            _ => None,
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self.kind, MemberKind::Method(_))
    }

    /// Classes and modules
    pub fn is_parent(&self) -> bool {
        matches!(self.kind, MemberKind::Module | MemberKind::Class { .. })
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind, MemberKind::Root)
    }

    pub fn is_class_method(&self) -> Option<bool> {
        self.method_data().map(|data| data.is_class_method)
    }
}

fn short_name_of(name: &str) -> String {
    name.split([' ', '(', '<'])
        .next()
        .filter(|part| !part.is_empty())
        .unwrap_or(name)
        .to_string()
}

fn format_parameters(name: &str, parameters: &str) -> String {
    let parameters = parameters.trim();
    if parameters.starts_with('(') && parameters.ends_with(')') {
        format!("{name}{parameters}")
    } else {
        parameters.to_string()
    }
}
