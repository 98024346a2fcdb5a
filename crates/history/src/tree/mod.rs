//! Branching undo history.
//!
//! Every edit becomes a child of the current node; undoing moves the cursor
//! to the parent, and redoing moves it into a child. Undoing and then making
//! a new edit starts a new branch instead of discarding the old future.
//!
//! ```text
//! root ── a ── b ── c          redo(Some(0)) from `a` re-enters `b`
//!              └─── d  <- current
//! ```
//!
//! Nodes live in a slab arena and refer to each other by [`NodeId`], so the
//! tree can be pruned and re-rooted without shared ownership.

use slab::Slab;
use tracing::{debug, trace};
use weft_primitives::Selection;

use crate::config::HistoryConfig;
use crate::document::EditHost;
use crate::error::{HistoryError, Result};
use crate::operation::Operation;

#[cfg(test)]
mod tests;

/// Identifier of a node in an [`UndoTree`].
///
/// Arena slots are reused once a node is discarded, so every id also
/// carries the stamp of the node it was issued for. An id whose node was
/// pruned or hard-undone never resolves to a later node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
	slot: usize,
	stamp: u64,
}

#[derive(Debug)]
struct Node {
	stamp: u64,
	/// Operations undone and redone together, in execution order.
	commands: Vec<Operation>,
	parent: Option<NodeId>,
	/// Children in creation order; the last one is the default redo branch.
	children: Vec<NodeId>,
}

impl Node {
	fn new(stamp: u64, commands: Vec<Operation>, parent: Option<NodeId>) -> Self {
		Self {
			stamp,
			commands,
			parent,
			children: Vec::new(),
		}
	}
}

/// Operations collected between `start_sequence` and `end_sequence`.
#[derive(Debug, Default)]
struct OpenSequence {
	depth: usize,
	commands: Vec<Operation>,
}

/// A branching history of grouped, invertible edits.
///
/// The tree is the sole driver of the operations it records: they must only
/// be executed and undone through it, against the same host.
#[derive(Debug)]
pub struct UndoTree {
	nodes: Slab<Node>,
	root: NodeId,
	current: NodeId,
	sequence: Option<OpenSequence>,
	config: HistoryConfig,
	/// Stamp handed to the next inserted node.
	next_stamp: u64,
}

impl Default for UndoTree {
	fn default() -> Self {
		Self::new()
	}
}

impl UndoTree {
	/// Creates an unbounded tree holding only the root.
	pub fn new() -> Self {
		Self::with_config(HistoryConfig::unbounded())
	}

	/// Creates a tree bounded by `config`.
	pub fn with_config(config: HistoryConfig) -> Self {
		let mut nodes = Slab::new();
		let root = NodeId {
			slot: nodes.insert(Node::new(0, Vec::new(), None)),
			stamp: 0,
		};
		Self {
			nodes,
			root,
			current: root,
			sequence: None,
			config,
			next_stamp: 1,
		}
	}

	pub fn config(&self) -> &HistoryConfig {
		&self.config
	}

	pub fn root(&self) -> NodeId {
		self.root
	}

	/// Returns the node whose edits are the most recent ones applied.
	pub fn current(&self) -> NodeId {
		self.current
	}

	/// Returns the number of nodes, root included.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Returns the number of undo steps between the root and the cursor.
	pub fn depth(&self) -> usize {
		self.depth_of(self.current)
	}

	/// Returns the number of redo branches at the cursor.
	pub fn children_len(&self) -> usize {
		self.node(self.current).children.len()
	}

	/// Returns `true` if `id` still names a node of this tree.
	pub fn contains(&self, id: NodeId) -> bool {
		self.get(id).is_some()
	}

	/// Returns the number of operations grouped in `id`, if it still exists.
	pub fn commands_len(&self, id: NodeId) -> Option<usize> {
		self.get(id).map(|node| node.commands.len())
	}

	pub fn can_undo(&self) -> bool {
		self.current != self.root
	}

	pub fn can_redo(&self) -> bool {
		self.children_len() > 0
	}

	/// Returns `true` while a sequence is open.
	pub fn in_sequence(&self) -> bool {
		self.sequence.is_some()
	}

	/// Executes `operation` on `host` and records it.
	///
	/// Inside a sequence the operation joins the pending group and the cursor
	/// stays put. Otherwise it becomes a new child of the current node and
	/// the cursor moves to it.
	///
	/// # Errors
	///
	/// Fails if the operation cannot be executed; nothing is recorded then.
	pub fn add<H: EditHost>(&mut self, host: &mut H, mut operation: Operation) -> Result<()> {
		operation.execute(host)?;

		match &mut self.sequence {
			Some(sequence) => {
				sequence.commands.push(operation);
				trace!(
					depth = sequence.depth,
					pending = sequence.commands.len(),
					"operation added to sequence"
				);
			}
			None => self.push_node(vec![operation]),
		}
		Ok(())
	}

	/// Builds an operation replacing each interval of `selection` in the
	/// host text, then [`add`](Self::add)s it.
	pub fn edit<H: EditHost>(
		&mut self,
		host: &mut H,
		selection: Selection,
		replacements: Vec<String>,
	) -> Result<()> {
		let operation = Operation::replace(host.text(), selection, replacements)?;
		self.add(host, operation)
	}

	/// Opens a sequence, or nests one level deeper in an open one.
	pub fn start_sequence(&mut self) {
		let sequence = self.sequence.get_or_insert_with(OpenSequence::default);
		sequence.depth += 1;
		trace!(depth = sequence.depth, "sequence started");
	}

	/// Closes one level of the open sequence.
	///
	/// Closing the outermost level records everything added since the
	/// sequence opened as a single node. Returns `true` if a node was
	/// recorded; an empty group or an unmatched call records nothing.
	pub fn end_sequence(&mut self) -> bool {
		let Some(sequence) = &mut self.sequence else {
			trace!("end_sequence: no open sequence");
			return false;
		};

		sequence.depth -= 1;
		if sequence.depth > 0 {
			trace!(depth = sequence.depth, "sequence level closed");
			return false;
		}

		let commands = self.sequence.take().map(|seq| seq.commands).unwrap_or_default();
		if commands.is_empty() {
			trace!("sequence ended empty");
			return false;
		}
		self.push_node(commands);
		true
	}

	/// Undoes the current node's operations in reverse order and moves the
	/// cursor to its parent.
	///
	/// Returns `false` at the root.
	///
	/// # Errors
	///
	/// Fails if a sequence is open or an operation no longer matches the
	/// host. The whole group is checked before the host is touched, so a
	/// failed undo leaves the host, the node and the cursor as they were.
	pub fn undo<H: EditHost>(&mut self, host: &mut H) -> Result<bool> {
		self.ensure_closed("undo")?;

		let node = &mut self.nodes[self.current.slot];
		let Some(parent) = node.parent else {
			trace!("undo: nothing to undo");
			return Ok(false);
		};

		node.commands
			.iter()
			.rev()
			.try_fold(host.text().clone(), |text, operation| operation.undone_text(&text))?;
		for operation in node.commands.iter_mut().rev() {
			operation.undo(host)?;
		}
		trace!(
			node = self.current.slot,
			commands = node.commands.len(),
			"undo: moved to parent"
		);
		self.current = parent;
		Ok(true)
	}

	/// Moves the cursor into a child and replays its operations in order.
	///
	/// `branch` picks the child by creation index; `None` picks the most
	/// recently created one. Returns `false` if there is nothing to redo.
	///
	/// # Errors
	///
	/// Fails if a sequence is open, `branch` is out of range, or an
	/// operation no longer matches the host. Like [`undo`](Self::undo), the
	/// group is checked as a whole before anything changes.
	pub fn redo<H: EditHost>(&mut self, host: &mut H, branch: Option<usize>) -> Result<bool> {
		self.ensure_closed("redo")?;

		let children = &self.node(self.current).children;
		let child = match branch {
			_ if children.is_empty() => {
				trace!("redo: nothing to redo");
				return Ok(false);
			}
			None => children[children.len() - 1],
			Some(index) => *children.get(index).ok_or(HistoryError::NoSuchBranch {
				index,
				children: children.len(),
			})?,
		};

		let node = &mut self.nodes[child.slot];
		node.commands
			.iter()
			.try_fold(host.text().clone(), |text, operation| operation.executed_text(&text))?;
		for operation in node.commands.iter_mut() {
			operation.execute(host)?;
		}
		trace!(node = child.slot, commands = node.commands.len(), "redo: entered child");
		self.current = child;
		Ok(true)
	}

	/// Undoes the current node and discards it together with every branch
	/// below it.
	///
	/// Returns `false` at the root.
	pub fn hard_undo<H: EditHost>(&mut self, host: &mut H) -> Result<bool> {
		self.ensure_closed("hard undo")?;

		let left = self.current;
		if !self.undo(host)? {
			return Ok(false);
		}

		let siblings = &mut self.nodes[self.current.slot].children;
		siblings.retain(|&id| id != left);
		let removed = self.remove_subtree(left);
		trace!(node = left.slot, removed, "hard undo: branch discarded");
		Ok(true)
	}

	fn ensure_closed(&self, action: &'static str) -> Result<()> {
		match self.sequence {
			Some(_) => Err(HistoryError::SequenceOpen(action)),
			None => Ok(()),
		}
	}

	fn get(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(id.slot).filter(|node| node.stamp == id.stamp)
	}

	fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.slot]
	}

	fn depth_of(&self, id: NodeId) -> usize {
		std::iter::successors(self.node(id).parent, |&p| self.node(p).parent).count()
	}

	/// Appends a node under the cursor, moves the cursor to it, and applies
	/// the configured limits.
	fn push_node(&mut self, commands: Vec<Operation>) {
		let commands_len = commands.len();
		let stamp = self.next_stamp;
		self.next_stamp += 1;
		let id = NodeId {
			slot: self.nodes.insert(Node::new(stamp, commands, Some(self.current))),
			stamp,
		};
		self.nodes[self.current.slot].children.push(id);
		self.current = id;
		trace!(
			node = id.slot,
			commands = commands_len,
			nodes = self.nodes.len(),
			"history node pushed"
		);
		self.enforce_limits();
	}

	fn enforce_limits(&mut self) {
		if let Some(max) = self.config.max_branches
			&& let Some(parent) = self.node(self.current).parent
		{
			let max = max.max(1);
			while self.node(parent).children.len() > max {
				// The cursor is the newest child, so the oldest is never on its path.
				let oldest = self.nodes[parent.slot].children.remove(0);
				let removed = self.remove_subtree(oldest);
				debug!(node = oldest.slot, removed, "oldest redo branch pruned");
			}
		}

		if let Some(max) = self.config.max_depth {
			while self.depth() > max.max(1) {
				self.reroot();
			}
		}
	}

	/// Makes the root's child on the cursor path the new root, dropping the
	/// old root and every other branch hanging off it.
	fn reroot(&mut self) {
		let mut heir = self.current;
		while let Some(parent) = self.node(heir).parent
			&& parent != self.root
		{
			heir = parent;
		}
		if heir == self.root {
			return;
		}

		let old_root = self.root;
		let siblings = std::mem::take(&mut self.nodes[old_root.slot].children);
		let mut removed = 1;
		for sibling in siblings.into_iter().filter(|&id| id != heir) {
			removed += self.remove_subtree(sibling);
		}
		self.nodes.remove(old_root.slot);

		// The heir's edits are now part of the base state.
		let node = &mut self.nodes[heir.slot];
		node.parent = None;
		node.commands.clear();
		self.root = heir;
		debug!(root = heir.slot, removed, "history re-rooted");
	}

	/// Removes `id` and all its descendants, returning how many nodes went.
	fn remove_subtree(&mut self, id: NodeId) -> usize {
		let mut stack = vec![id];
		let mut removed = 0;
		while let Some(next) = stack.pop() {
			if let Some(node) = self.nodes.try_remove(next.slot) {
				stack.extend(node.children);
				removed += 1;
			}
		}
		removed
	}
}

