use weft_primitives::{Interval, RopeText, Selection};

use super::*;
use crate::Document;

fn insert(tree: &mut UndoTree, doc: &mut Document, pos: usize, text: &str) {
	tree.edit(doc, Selection::point(pos), vec![text.into()]).unwrap();
}

fn append(tree: &mut UndoTree, doc: &mut Document, text: &str) {
	let end = doc.len_chars();
	insert(tree, doc, end, text);
}

#[test]
fn undo_redo_walks_linear_history() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::new();
	append(&mut tree, &mut doc, "d");
	append(&mut tree, &mut doc, "e");
	assert_eq!(doc.content(), "abcde");
	assert_eq!(tree.depth(), 2);

	assert!(tree.undo(&mut doc).unwrap());
	assert_eq!(doc.content(), "abcd");
	assert!(tree.undo(&mut doc).unwrap());
	assert_eq!(doc.content(), "abc");
	assert!(!tree.undo(&mut doc).unwrap());
	assert_eq!(doc.content(), "abc");
	assert_eq!(tree.current(), tree.root());

	assert!(tree.redo(&mut doc, None).unwrap());
	assert_eq!(doc.content(), "abcd");
	assert!(tree.redo(&mut doc, None).unwrap());
	assert_eq!(doc.content(), "abcde");
	assert!(!tree.redo(&mut doc, None).unwrap());
}

#[test]
fn undo_restores_selection() {
	let mut doc = Document::new("import sys");
	let mut tree = UndoTree::new();
	let word: Selection = Interval::new(0, 6).unwrap().into();
	tree.edit(&mut doc, word.clone(), vec!["export".into()]).unwrap();
	assert_eq!(doc.content(), "export sys");
	assert_eq!(doc.selection(), &word);

	tree.undo(&mut doc).unwrap();
	assert_eq!(doc.content(), "import sys");
	assert_eq!(doc.selection(), &word);
}

#[test]
fn multi_interval_edit_undoes_at_once() {
	let mut doc = Document::new("one two three");
	let mut tree = UndoTree::new();
	let sel = Selection::from_intervals([Interval::new(0, 3).unwrap(), Interval::new(8, 13).unwrap()]);
	tree.edit(&mut doc, sel.clone(), vec!["1".into(), "3".into()]).unwrap();
	assert_eq!(doc.content(), "1 two 3");
	assert_eq!(
		doc.selection(),
		&Selection::from_intervals([Interval::new(0, 1).unwrap(), Interval::new(6, 7).unwrap()])
	);

	tree.undo(&mut doc).unwrap();
	assert_eq!(doc.content(), "one two three");
	assert_eq!(doc.selection(), &sel);
}

#[test]
fn sequence_undoes_as_one_step() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::new();
	tree.start_sequence();
	insert(&mut tree, &mut doc, 0, "x");
	insert(&mut tree, &mut doc, 1, "y");
	assert_eq!(doc.content(), "xyabc");
	assert_eq!(tree.node_count(), 1);
	assert!(tree.end_sequence());
	assert_eq!(tree.node_count(), 2);
	assert_eq!(tree.commands_len(tree.current()), Some(2));

	assert!(tree.undo(&mut doc).unwrap());
	assert_eq!(doc.content(), "abc");
	assert!(tree.redo(&mut doc, None).unwrap());
	assert_eq!(doc.content(), "xyabc");
}

#[test]
fn nested_sequences_commit_at_outermost_end() {
	let mut doc = Document::new("");
	let mut tree = UndoTree::new();
	tree.start_sequence();
	tree.start_sequence();
	append(&mut tree, &mut doc, "a");
	assert!(!tree.end_sequence());
	assert!(tree.in_sequence());
	append(&mut tree, &mut doc, "b");
	assert!(tree.end_sequence());
	assert!(!tree.in_sequence());

	assert_eq!(tree.depth(), 1);
	tree.undo(&mut doc).unwrap();
	assert_eq!(doc.content(), "");
}

#[test]
fn empty_or_unmatched_sequence_records_nothing() {
	let mut tree = UndoTree::new();
	assert!(!tree.end_sequence());
	tree.start_sequence();
	assert!(!tree.end_sequence());
	assert_eq!(tree.node_count(), 1);
	assert!(!tree.can_undo());
}

#[test]
fn navigation_is_rejected_inside_sequence() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::new();
	append(&mut tree, &mut doc, "d");
	tree.start_sequence();
	assert!(matches!(tree.undo(&mut doc), Err(HistoryError::SequenceOpen("undo"))));
	assert!(matches!(tree.redo(&mut doc, None), Err(HistoryError::SequenceOpen("redo"))));
	assert!(matches!(tree.hard_undo(&mut doc), Err(HistoryError::SequenceOpen(_))));
	assert_eq!(doc.content(), "abcd");
}

#[test]
fn new_edit_after_undo_creates_branch() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::new();
	append(&mut tree, &mut doc, "1");
	tree.undo(&mut doc).unwrap();
	append(&mut tree, &mut doc, "2");
	assert_eq!(doc.content(), "abc2");

	tree.undo(&mut doc).unwrap();
	assert_eq!(tree.children_len(), 2);

	tree.redo(&mut doc, None).unwrap();
	assert_eq!(doc.content(), "abc2");
	tree.undo(&mut doc).unwrap();

	tree.redo(&mut doc, Some(0)).unwrap();
	assert_eq!(doc.content(), "abc1");
	tree.undo(&mut doc).unwrap();

	assert!(matches!(
		tree.redo(&mut doc, Some(5)),
		Err(HistoryError::NoSuchBranch { index: 5, children: 2 })
	));
	assert_eq!(doc.content(), "abc");
}

#[test]
fn hard_undo_discards_branch() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::new();
	assert!(!tree.hard_undo(&mut doc).unwrap());

	append(&mut tree, &mut doc, "1");
	assert!(tree.hard_undo(&mut doc).unwrap());
	assert_eq!(doc.content(), "abc");
	assert!(!tree.can_redo());
	assert_eq!(tree.node_count(), 1);
	assert!(!tree.redo(&mut doc, None).unwrap());
}

#[test]
fn hard_undo_discards_descendants() {
	let mut doc = Document::new("");
	let mut tree = UndoTree::new();
	append(&mut tree, &mut doc, "a");
	append(&mut tree, &mut doc, "b");
	tree.undo(&mut doc).unwrap();
	assert_eq!(tree.node_count(), 3);

	tree.hard_undo(&mut doc).unwrap();
	assert_eq!(doc.content(), "");
	assert_eq!(tree.node_count(), 1);
}

#[test]
fn hard_undo_keeps_sibling_branches() {
	let mut doc = Document::new("");
	let mut tree = UndoTree::new();
	append(&mut tree, &mut doc, "a");
	tree.undo(&mut doc).unwrap();
	append(&mut tree, &mut doc, "b");
	tree.hard_undo(&mut doc).unwrap();

	assert_eq!(tree.children_len(), 1);
	tree.redo(&mut doc, None).unwrap();
	assert_eq!(doc.content(), "a");
}

#[test]
fn failed_add_records_nothing() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::new();
	let other = RopeText::new("xyz");
	let op = Operation::replace(&other, Interval::new(0, 1).unwrap().into(), vec!["q".into()]).unwrap();
	assert!(tree.add(&mut doc, op).is_err());
	assert_eq!(doc.content(), "abc");
	assert_eq!(tree.node_count(), 1);
}

#[test]
fn undo_against_modified_host_fails() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::new();
	append(&mut tree, &mut doc, "d");
	doc.commit(RopeText::new("zzz"), Selection::point(0));
	assert!(matches!(tree.undo(&mut doc), Err(HistoryError::StaleOperation(_))));
}

#[test]
fn max_branches_prunes_oldest() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::with_config(HistoryConfig {
		max_branches: Some(2),
		..HistoryConfig::default()
	});
	for branch in ["1", "2", "3"] {
		append(&mut tree, &mut doc, branch);
		tree.undo(&mut doc).unwrap();
	}
	assert_eq!(tree.children_len(), 2);
	assert_eq!(tree.node_count(), 3);

	tree.redo(&mut doc, Some(0)).unwrap();
	assert_eq!(doc.content(), "abc2");
}

#[test]
fn max_depth_folds_oldest_steps_into_root() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::with_config(HistoryConfig {
		max_depth: Some(2),
		..HistoryConfig::default()
	});
	for step in ["1", "2", "3"] {
		append(&mut tree, &mut doc, step);
	}
	assert_eq!(tree.depth(), 2);
	assert_eq!(tree.node_count(), 3);

	assert!(tree.undo(&mut doc).unwrap());
	assert!(tree.undo(&mut doc).unwrap());
	assert!(!tree.undo(&mut doc).unwrap());
	assert_eq!(doc.content(), "abc1");
}

#[test]
fn undo_rejects_same_length_edit_of_result() {
	let mut doc = Document::new("import sys");
	let mut tree = UndoTree::new();
	tree.edit(&mut doc, Interval::new(0, 6).unwrap().into(), vec!["export".into()]).unwrap();
	doc.commit(RopeText::new("EXPORT sys"), Selection::point(0));

	assert!(matches!(tree.undo(&mut doc), Err(HistoryError::StaleOperation(_))));
	assert_eq!(doc.content(), "EXPORT sys");
	assert!(tree.can_undo());
}

#[test]
fn failed_group_undo_changes_nothing() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::new();
	tree.start_sequence();
	insert(&mut tree, &mut doc, 3, "xyz");
	insert(&mut tree, &mut doc, 0, "q");
	tree.end_sequence();
	assert_eq!(doc.content(), "qabcxyz");

	// The last command still matches, the first one does not.
	doc.commit(RopeText::new("qabc"), Selection::point(0));
	assert!(matches!(tree.undo(&mut doc), Err(HistoryError::StaleOperation(_))));
	assert_eq!(doc.content(), "qabc");
	assert_eq!(tree.depth(), 1);

	doc.commit(RopeText::new("qabcxyz"), Selection::point(0));
	assert!(tree.undo(&mut doc).unwrap());
	assert_eq!(doc.content(), "abc");
	assert!(tree.redo(&mut doc, None).unwrap());
	assert_eq!(doc.content(), "qabcxyz");
}

#[test]
fn failed_group_redo_changes_nothing() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::new();
	tree.start_sequence();
	insert(&mut tree, &mut doc, 0, "q");
	insert(&mut tree, &mut doc, 4, "xyz");
	tree.end_sequence();
	tree.undo(&mut doc).unwrap();

	doc.commit(RopeText::new("ab"), Selection::point(0));
	assert!(matches!(tree.redo(&mut doc, None), Err(HistoryError::StaleOperation(_))));
	assert_eq!(doc.content(), "ab");
	assert_eq!(tree.current(), tree.root());

	doc.commit(RopeText::new("abc"), Selection::point(0));
	assert!(tree.redo(&mut doc, None).unwrap());
	assert_eq!(doc.content(), "qabcxyz");
}

#[test]
fn discarded_node_id_does_not_resolve() {
	let mut doc = Document::new("abc");
	let mut tree = UndoTree::new();
	append(&mut tree, &mut doc, "1");
	let discarded = tree.current();
	tree.hard_undo(&mut doc).unwrap();

	append(&mut tree, &mut doc, "2");
	assert_ne!(tree.current(), discarded);
	assert!(!tree.contains(discarded));
	assert_eq!(tree.commands_len(discarded), None);
	assert!(tree.contains(tree.current()));
	assert_eq!(tree.commands_len(tree.current()), Some(1));
}
