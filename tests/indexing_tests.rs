//! End-to-end indexing through a stand-in parser

use ruby_index::{
    IndexingOutcome, Member, MemberTree, MethodData, Problem, ProjectIndexer, Settings, Span,
};
use std::path::Path;
use std::sync::Arc;

/// Understands a tiny line format:
///
/// ```text
/// class Name [< Super]
/// def method
/// end
/// ```
///
/// Anything else is a syntax error on that line.
fn toy_parser(text: &str, path: &Path) -> MemberTree {
    let mut tree = MemberTree::new(path, text.len());
    let mut current = None;
    let mut offset = 0;

    for (line_number, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        let start = offset + (line.len() - line.trim_start().len());
        let span = Span::new(start, start, offset + line.len()).expect("valid span");
        offset += line.len() + 1;

        if let Some(rest) = trimmed.strip_prefix("class ") {
            let mut parts = rest.split(" < ");
            let mut class = Member::class(parts.next().unwrap_or_default(), span);
            if let Some(super_class) = parts.next() {
                class = class.with_super_class(super_class);
            }
            current = Some((tree.add_member(class), rest.split(' ').next().unwrap_or_default().to_string()));
        } else if let Some(name) = trimmed.strip_prefix("def ") {
            let data = MethodData::new(path, false);
            let mut method = Member::method(name, data, span);
            if let Some((_, owner)) = &current {
                method = method.with_namespace(owner.clone());
            }
            let id = tree.add_member(method);
            if let Some((parent, _)) = &current {
                tree.add_child(*parent, id).expect("attach method");
            }
        } else if trimmed == "end" {
            current = None;
        } else if !trimmed.is_empty() {
            return MemberTree::failed(path, [Problem::error("syntax error", line_number)]);
        }
    }
    tree
}

#[test]
fn test_batch_indexes_and_propagates() {
    let mut indexer = ProjectIndexer::new(toy_parser);
    indexer.index_source("colour.rb", "class Colour\ndef shade\nend\n");
    indexer.index_source("green.rb", "class Green < Colour\ndef red\nend\n");

    let stats = indexer.finish_batch().unwrap();
    assert_eq!(stats.files_indexed, 2);
    assert_eq!(stats.members_found, 4);
    assert_eq!(stats.propagation.unwrap().inherited_methods, 1);

    let methods: Vec<String> = indexer
        .cache()
        .get_methods_of_member("Green")
        .iter()
        .map(|method| method.full_name())
        .collect();
    assert_eq!(methods, vec!["Colour#shade", "Green#red"]);
}

#[test]
fn test_broken_edit_keeps_last_good_tree() {
    let mut indexer = ProjectIndexer::new(toy_parser);
    let path = Path::new("green.rb");
    assert_eq!(
        indexer.index_source(path, "class Green\ndef red\nend\n"),
        IndexingOutcome::Indexed
    );
    assert_eq!(
        indexer.index_source(path, "class Green\ndef red\n  oops(\n"),
        IndexingOutcome::KeptPrevious
    );

    let tree = indexer.trees().usable_tree(path).unwrap();
    assert!(!tree.contains_errors());
    let red = tree.member_at(15).unwrap();
    assert_eq!(tree.member(red).unwrap().short_name(), "red");

    let problems = indexer.trees().problems(path);
    assert_eq!(problems[0].line, 2);
    assert_eq!(indexer.cache().get_methods("red").len(), 1);

    let stats = indexer.finish_batch().unwrap();
    assert_eq!(stats.files_failed, 1);
    assert_eq!(stats.errors[0].1, " 3: syntax error");
}

#[test]
fn test_reparse_adds_new_methods() {
    let mut indexer = ProjectIndexer::new(toy_parser);
    indexer.index_source("green.rb", "class Green\ndef red\nend\n");
    indexer.index_source("green.rb", "class Green\ndef red\ndef blue\nend\n");

    assert_eq!(indexer.cache().get_methods_of_member("Green").len(), 2);
    assert_eq!(indexer.cache().get_methods("red").len(), 1);
}

#[test]
fn test_reset_forgets_project() {
    let mut indexer = ProjectIndexer::new(toy_parser);
    indexer.index_source("green.rb", "class Green\ndef red\nend\n");
    indexer.finish_batch().unwrap();

    indexer.reset();
    assert!(indexer.trees().usable_tree("green.rb").is_none());
    assert!(indexer.cache().get_class("Green").is_none());
    assert!(indexer.finish_batch().unwrap().propagation.is_none());
}

#[test]
fn test_settings_reach_the_cache() {
    let mut settings = Settings::default();
    settings.inference.enabled = false;
    let mut indexer = ProjectIndexer::with_settings(toy_parser, Arc::new(settings));
    indexer.index_source("green.rb", "class Green\ndef red\nend\n");

    assert!(!indexer.cache().settings().inference.enabled);
    let stats = indexer.finish_batch().unwrap();
    assert_eq!(stats.propagation.unwrap().methods_with_return_types, 0);
}
