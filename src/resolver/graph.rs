use std::collections::{BTreeMap, BTreeSet};

use crate::resolver::{
    error::{ResolveError, cyclic_dependency},
    references::references,
    types::{DeclarationBatch, PackedObject},
};

/// "Depends on" relation between the parameters of one batch.
///
/// Nodes are indexed in declaration order, which doubles as the tie-break
/// when several parameters are ready at once.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<String>,
    dependencies: Vec<BTreeSet<usize>>,
}

impl DependencyGraph {
    /// References to names outside the batch add no edge.
    pub fn from_batch(batch: &DeclarationBatch) -> Result<Self, ResolveError> {
        let nodes: Vec<String> = batch.names().map(str::to_string).collect();
        let index: BTreeMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(position, name)| (name.as_str(), position))
            .collect();

        let mut dependencies = vec![BTreeSet::new(); nodes.len()];
        for (position, (name, value)) in batch.iter().enumerate() {
            let Some(packed) = PackedObject::parse(name, value)? else {
                continue;
            };
            dependencies[position].extend(
                references(&packed)
                    .into_iter()
                    .filter_map(|target| index.get(target).copied()),
            );
        }

        Ok(Self {
            nodes,
            dependencies,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        self.nodes
            .iter()
            .position(|node| node == name)
            .map(|position| {
                self.dependencies[position]
                    .iter()
                    .map(|&dependency| self.nodes[dependency].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn topological_order(&self) -> Result<Vec<String>, ResolveError> {
        let mut in_degree: Vec<usize> = self.dependencies.iter().map(BTreeSet::len).collect();
        let mut dependents = vec![Vec::new(); self.nodes.len()];
        for (node, dependencies) in self.dependencies.iter().enumerate() {
            for &dependency in dependencies {
                dependents[dependency].push(node);
            }
        }

        let mut ready: BTreeSet<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(node, _)| node)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(node) = ready.pop_first() {
            order.push(self.nodes[node].clone());
            for &dependent in &dependents[node] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() < self.nodes.len() {
            let cycle = self.find_cycle(&in_degree);
            return Err(cyclic_dependency(format!(
                "parameters reference each other in a cycle: {}",
                cycle.join(" -> ")
            ))
            .with_parameters(cycle));
        }

        Ok(order)
    }

    // Every node left with a positive in-degree still waits on another such
    // node, so following those edges must revisit a node.
    fn find_cycle(&self, in_degree: &[usize]) -> Vec<String> {
        let Some(start) = in_degree.iter().position(|degree| *degree > 0) else {
            return Vec::new();
        };

        let mut path = vec![start];
        let mut current = start;
        loop {
            let Some(next) = self.dependencies[current]
                .iter()
                .copied()
                .find(|dependency| in_degree[*dependency] > 0)
            else {
                return Vec::new();
            };
            if let Some(position) = path.iter().position(|node| *node == next) {
                return path[position..]
                    .iter()
                    .map(|node| self.nodes[*node].clone())
                    .collect();
            }
            path.push(next);
            current = next;
        }
    }
}

/// Processing order in which every packed object comes after the parameters
/// it references.
pub fn build_order(batch: &DeclarationBatch) -> Result<Vec<String>, ResolveError> {
    DependencyGraph::from_batch(batch)?.topological_order()
}
