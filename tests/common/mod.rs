#![allow(dead_code)]

use ruby_index::{Member, MemberId, MemberTree, MethodData, Span};
use std::path::{Path, PathBuf};

/// Builds member trees the way a parser would, one nested member at a time.
///
/// Every member gets its own ten character slot; containment of spans is not
/// modelled since the cache never looks at offsets.
pub struct TreeBuilder {
    tree: MemberTree,
    path: PathBuf,
    offset: usize,
    stack: Vec<MemberId>,
}

impl TreeBuilder {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            tree: MemberTree::new(&path, 10_000),
            path,
            offset: 0,
            stack: Vec::new(),
        }
    }

    fn next_span(&mut self) -> Span {
        let start = self.offset;
        self.offset += 10;
        Span::new(start, start + 1, start + 9).expect("valid span")
    }

    fn owner_name(&self) -> Option<String> {
        self.stack
            .last()
            .map(|id| self.tree.member(*id).expect("known member").full_name())
    }

    fn attach(&mut self, member: Member) -> MemberId {
        let id = self.tree.add_member(member);
        if let Some(parent) = self.stack.last() {
            self.tree.add_child(*parent, id).expect("attach child");
        }
        id
    }

    fn open(mut self, member: Member) -> Self {
        let member = match self.owner_name() {
            Some(owner) => member.with_namespace(format!("{owner}::")),
            None => member,
        };
        let id = self.attach(member);
        self.stack.push(id);
        self
    }

    /// Opens a class; close it with [`TreeBuilder::end`]
    pub fn class(mut self, name: &str) -> Self {
        let span = self.next_span();
        self.open(Member::class(name, span))
    }

    pub fn class_with_super(mut self, name: &str, super_class: &str) -> Self {
        let span = self.next_span();
        self.open(Member::class(name, span).with_super_class(super_class))
    }

    pub fn documented_class(mut self, name: &str, documentation: &str) -> Self {
        let span = self.next_span();
        self.open(Member::class(name, span).with_documentation(documentation))
    }

    /// Opens a module; close it with [`TreeBuilder::end`]
    pub fn module(mut self, name: &str) -> Self {
        let span = self.next_span();
        self.open(Member::module(name, span))
    }

    fn add_method(mut self, name: &str, class_method: bool, parameters: Option<&str>) -> Self {
        let span = self.next_span();
        let data = MethodData::new(&self.path, class_method);
        let mut member = Member::method(name, data, span);
        if let Some(owner) = self.owner_name() {
            member = member.with_namespace(owner);
        }
        if let Some(parameters) = parameters {
            member = member.with_parameters(parameters);
        }
        self.attach(member);
        self
    }

    pub fn method(self, name: &str) -> Self {
        self.add_method(name, false, None)
    }

    pub fn class_method(self, name: &str) -> Self {
        self.add_method(name, true, None)
    }

    /// Method with call-seq text, e.g. `str.length => integer`
    pub fn annotated_method(self, name: &str, parameters: &str) -> Self {
        self.add_method(name, false, Some(parameters))
    }

    /// Top-level method named through its namespace only
    pub fn detached_method(mut self, namespace: &str, name: &str) -> Self {
        let span = self.next_span();
        let data = MethodData::new(&self.path, false);
        let member = Member::method(name, data, span).with_namespace(namespace);
        self.tree.add_member(member);
        self
    }

    pub fn end(mut self) -> Self {
        self.stack.pop();
        self
    }

    pub fn build(self) -> MemberTree {
        self.tree
    }
}

/// `class Green; def red; end; end`
pub fn green_class() -> MemberTree {
    TreeBuilder::new("CLASS").class("Green").method("red").end().build()
}

/// `class Green; def [](index); end; end`
pub fn green_array_class() -> MemberTree {
    TreeBuilder::new("ARR_CLASS").class("Green").method("[]").end().build()
}

/// `module Blue; def red; end; end`
pub fn blue_module() -> MemberTree {
    TreeBuilder::new("DEF_IN_MODULE").module("Blue").method("red").end().build()
}
