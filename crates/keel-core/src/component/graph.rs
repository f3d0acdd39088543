use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

/// Dependency graph over descriptor indices (registration order).
///
/// An edge runs from a dependent to the provider that must be built first.
/// Working on indices keeps ordering decisions free of string comparisons:
/// the registration index is the tie-break everywhere.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: BTreeSet<usize>,
    // dependent -> providers it needs
    edges: HashMap<usize, Vec<usize>>,
    // provider -> dependents waiting on it
    dependents: HashMap<usize, Vec<usize>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, index: usize) {
        self.nodes.insert(index);
    }

    /// Record that `dependent` needs `provider` built first; both become
    /// nodes if they were not already
    pub fn add_edge(&mut self, dependent: usize, provider: usize) {
        self.nodes.insert(dependent);
        self.nodes.insert(provider);
        self.edges.entry(dependent).or_default().push(provider);
        self.dependents.entry(provider).or_default().push(dependent);
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Kahn's algorithm with a min-heap ready set: among nodes whose
    /// providers are all placed, the lowest index goes first, so the order
    /// is total and deterministic. `Err` carries exactly the nodes that sit
    /// on a cycle, ascending.
    pub fn topological_sort(&self) -> Result<Vec<usize>, Vec<usize>> {
        let mut in_degree: HashMap<usize, usize> = self.nodes.iter().map(|&n| (n, 0)).collect();
        for (dependent, providers) in &self.edges {
            if let Some(degree) = in_degree.get_mut(dependent) {
                *degree += providers.len();
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(&node, _)| Reverse(node))
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            if let Some(dependents) = self.dependents.get(&node) {
                for &dependent in dependents {
                    if let Some(degree) = in_degree.get_mut(&dependent) {
                        *degree -= 1;
                        if *degree == 0 {
                            ready.push(Reverse(dependent));
                        }
                    }
                }
            }
        }

        if order.len() == self.nodes.len() {
            Ok(order)
        } else {
            let placed: HashSet<usize> = order.into_iter().collect();
            let leftover: BTreeSet<usize> = self
                .nodes
                .iter()
                .copied()
                .filter(|node| !placed.contains(node))
                .collect();
            Err(self.cycle_members(&leftover))
        }
    }

    // The leftover set also contains nodes merely downstream of a cycle;
    // keep only nodes that can reach themselves through leftover edges.
    fn cycle_members(&self, leftover: &BTreeSet<usize>) -> Vec<usize> {
        let mut members = Vec::new();
        for &start in leftover {
            let mut stack: Vec<usize> = Vec::new();
            let mut visited: HashSet<usize> = HashSet::new();
            if let Some(providers) = self.edges.get(&start) {
                stack.extend(providers.iter().copied().filter(|p| leftover.contains(p)));
            }
            let mut on_cycle = false;
            while let Some(node) = stack.pop() {
                if node == start {
                    on_cycle = true;
                    break;
                }
                if !visited.insert(node) {
                    continue;
                }
                if let Some(providers) = self.edges.get(&node) {
                    stack.extend(providers.iter().copied().filter(|p| leftover.contains(p)));
                }
            }
            if on_cycle {
                members.push(start);
            }
        }
        members
    }
}
