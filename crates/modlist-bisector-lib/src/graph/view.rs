//! Read-only views over a [`DependencyGraph`] restricted to a subset of packages.
//!
//! Edges are only followed when both ends are inside the view, identifiers without a package are never inside.

use std::collections::{BTreeSet, HashMap, VecDeque};

use super::{DependencyGraph, PackageEntry};

#[derive(Clone, Copy)]
pub struct GraphView<'g> {
	graph: &'g DependencyGraph,
	filter: fn(&PackageEntry) -> bool,
}

impl std::fmt::Debug for GraphView<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.identifiers()).finish()
	}
}

impl<'g> GraphView<'g> {
	pub(super) fn new(graph: &'g DependencyGraph, filter: fn(&PackageEntry) -> bool) -> Self {
		Self { graph, filter }
	}

	pub fn graph(&self) -> &'g DependencyGraph {
		self.graph
	}

	pub fn contains(&self, identifier: &str) -> bool {
		self.graph.get(identifier).map_or(false, self.filter)
	}

	pub fn get(&self, identifier: &str) -> Option<&'g PackageEntry> {
		self.graph.get(identifier).filter(|e| (self.filter)(e))
	}

	/// Packages inside the view, ordered by identifier.
	pub fn nodes(&self) -> impl Iterator<Item = &'g PackageEntry> {
		let filter = self.filter;
		self.graph.nodes().filter(move |e| filter(e))
	}

	pub fn identifiers(&self) -> impl Iterator<Item = &'g str> {
		self.nodes().map(|e| e.identifier.as_str())
	}

	pub fn len(&self) -> usize {
		self.nodes().count()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes().next().is_none()
	}

	pub fn dependencies_of(&self, identifier: &str) -> impl Iterator<Item = &'g str> {
		let view = *self;
		self.graph.dependencies_of(identifier).filter(move |id| view.contains(id))
	}

	pub fn dependents_of(&self, identifier: &str) -> impl Iterator<Item = &'g str> {
		let view = *self;
		self.graph.dependents_of(identifier).filter(move |id| view.contains(id))
	}

	/// Every package that transitively depends on `identifier`.
	pub fn ancestors(&self, identifier: &str) -> BTreeSet<&'g str> {
		self.walk(identifier, |view, id| view.dependents_of(id).collect())
	}

	/// Every package `identifier` transitively depends on.
	pub fn descendants(&self, identifier: &str) -> BTreeSet<&'g str> {
		self.walk(identifier, |view, id| view.dependencies_of(id).collect())
	}

	/// Breadth first search from `start`, not including `start` unless it is part of a cycle.
	fn walk(&self, start: &str, next: impl Fn(&Self, &str) -> Vec<&'g str>) -> BTreeSet<&'g str> {
		let mut found = BTreeSet::<&'g str>::new();
		let mut queue: VecDeque<&'g str> = next(self, start).into();

		while let Some(id) = queue.pop_front() {
			if found.insert(id) {
				queue.extend(next(self, id));
			}
		}

		found
	}

	/// Finds a cycle using depth first search.
	///
	/// Returns the identifiers along the cycle, starting and ending with the same identifier.
	pub fn find_cycle(&self) -> Option<Vec<String>> {
		#[derive(Clone, Copy, PartialEq, Eq)]
		enum Mark { Visiting, Done }

		/* Reversed so popping visits dependencies in ascending order */
		let children = |id: &str| -> Vec<&'g str> {
			let mut v: Vec<_> = self.dependencies_of(id).collect();
			v.reverse();
			v
		};

		let mut marks = HashMap::<&'g str, Mark>::new();

		for start in self.identifiers() {
			if marks.contains_key(start) { continue; }

			marks.insert(start, Mark::Visiting);
			let mut stack: Vec<(&'g str, Vec<&'g str>)> = vec![(start, children(start))];

			while let Some(top) = stack.last_mut() {
				let node = top.0;
				match top.1.pop() {
					Some(next) => match marks.get(next) {
						Some(Mark::Visiting) => {
							if let Some(begin) = stack.iter().position(|(id, _)| *id == next) {
								let mut cycle: Vec<String> = stack[begin..].iter().map(|(id, _)| id.to_string()).collect();
								cycle.push(next.to_string());
								return Some(cycle);
							}
						},
						Some(Mark::Done) => {},
						None => {
							marks.insert(next, Mark::Visiting);
							stack.push((next, children(next)));
						},
					},
					None => {
						marks.insert(node, Mark::Done);
						stack.pop();
					},
				}
			}
		}

		None
	}

	/// Orders the view so every package comes before its dependencies.
	///
	/// Packages with no ordering between them are ordered by identifier.
	///
	/// # Errors
	/// - [`Cycle`](crate::Error::Cycle) when the view is not acyclic.
	pub fn topological_order(&self) -> crate::Result<Vec<&'g str>> {
		let mut remaining: HashMap<&'g str, usize> = self.identifiers()
			.map(|id| (id, self.dependents_of(id).count()))
			.collect();

		let mut ready: BTreeSet<&'g str> = remaining.iter()
			.filter(|(_, count)| **count == 0)
			.map(|(id, _)| *id)
			.collect();

		let mut order = Vec::<&'g str>::with_capacity(remaining.len());

		while let Some(id) = ready.pop_first() {
			order.push(id);
			for dependency in self.dependencies_of(id) {
				if let Some(count) = remaining.get_mut(dependency) {
					*count -= 1;
					if *count == 0 {
						ready.insert(dependency);
					}
				}
			}
		}

		if order.len() < remaining.len() {
			return Err(crate::Error::Cycle(self.find_cycle().unwrap_or_default()));
		}

		Ok(order)
	}
}
