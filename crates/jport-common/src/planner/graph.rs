//! Inheritance graph over one unit's classes
//!
//! Classes live in an arena indexed by declaration order; edges are indices,
//! so a cycle is found by traversal and never followed forever.

use jport_core::{CyclicDependencyError, MappedClass};
use std::collections::{BTreeSet, HashMap};

/// Last segment of a possibly qualified name.
pub(crate) fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

pub(crate) struct ClassGraph<'a> {
    pub(crate) nodes: Vec<&'a MappedClass>,
    index: HashMap<&'a str, usize>,
    /// In-unit supertypes of each node, superclass first, without repeats.
    supers: Vec<Vec<usize>>,
}

impl<'a> ClassGraph<'a> {
    pub(crate) fn new(classes: &'a [MappedClass]) -> Self {
        let mut index = HashMap::new();
        for (i, class) in classes.iter().enumerate() {
            index.entry(class.name.as_str()).or_insert(i);
        }

        let supers = classes
            .iter()
            .map(|class| {
                let mut edges = Vec::new();
                for name in class.supertypes() {
                    if let Some(&target) = index.get(simple_name(name)) {
                        if !edges.contains(&target) {
                            edges.push(target);
                        }
                    }
                }
                edges
            })
            .collect();

        Self {
            nodes: classes.iter().collect(),
            index,
            supers,
        }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.index.contains_key(simple_name(name))
    }

    pub(crate) fn supers(&self, node: usize) -> &[usize] {
        &self.supers[node]
    }

    /// Supertypes first; ties go to the earlier declaration.
    pub(crate) fn topo_order(&self) -> Result<Vec<usize>, CyclicDependencyError> {
        let n = self.nodes.len();
        let mut pending: Vec<usize> = self.supers.iter().map(Vec::len).collect();
        let mut dependents = vec![Vec::new(); n];
        for (node, supers) in self.supers.iter().enumerate() {
            for &sup in supers {
                dependents[sup].push(node);
            }
        }

        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(node) = ready.pop_first() {
            order.push(node);
            for &dependent in &dependents[node] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() == n {
            Ok(order)
        } else {
            Err(self.find_cycle())
        }
    }

    /// First cycle reached by a depth-first walk in declaration order.
    fn find_cycle(&self) -> CyclicDependencyError {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            OnPath,
            Done,
        }

        let mut marks = vec![Mark::New; self.nodes.len()];
        for start in 0..self.nodes.len() {
            if marks[start] != Mark::New {
                continue;
            }
            // (node, next edge to follow)
            let mut path: Vec<(usize, usize)> = vec![(start, 0)];
            marks[start] = Mark::OnPath;

            while let Some(&(node, next)) = path.last() {
                match self.supers[node].get(next).copied() {
                    Some(target) => {
                        let top = path.len() - 1;
                        path[top].1 += 1;
                        match marks[target] {
                            Mark::New => {
                                marks[target] = Mark::OnPath;
                                path.push((target, 0));
                            }
                            Mark::OnPath => {
                                let from = path
                                    .iter()
                                    .position(|&(n, _)| n == target)
                                    .unwrap_or(0);
                                let mut cycle: Vec<String> = path[from..]
                                    .iter()
                                    .map(|&(n, _)| self.nodes[n].name.clone())
                                    .collect();
                                cycle.push(self.nodes[target].name.clone());
                                return CyclicDependencyError { cycle };
                            }
                            Mark::Done => {}
                        }
                    }
                    None => {
                        marks[node] = Mark::Done;
                        path.pop();
                    }
                }
            }
        }
        // Only called when the sort left nodes behind, so a cycle exists.
        CyclicDependencyError { cycle: Vec::new() }
    }

    /// Longest supertype chain above each node; a supertype outside the unit
    /// counts as one level.
    pub(crate) fn depths(&self, order: &[usize]) -> Vec<u32> {
        let mut depths = vec![0; self.nodes.len()];
        for &node in order {
            let external = self.nodes[node]
                .supertypes()
                .any(|name| !self.contains(name));
            let inner = self.supers[node]
                .iter()
                .map(|&sup| depths[sup] + 1)
                .max()
                .unwrap_or(0);
            depths[node] = inner.max(u32::from(external));
        }
        depths
    }
}
