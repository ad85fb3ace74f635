use std::collections::{BTreeMap, BTreeSet};

use crate::error::TaskdeskError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Directed graph of step numbers. An edge `step → dep` means `step` waits on `dep`.
#[derive(Debug, Default, Clone)]
pub struct StepGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl StepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, step: &str) {
        self.edges.entry(step.to_string()).or_default();
    }

    pub fn add_edge(&mut self, step: &str, dep: &str) {
        self.add_node(dep);
        self.edges
            .entry(step.to_string())
            .or_default()
            .insert(dep.to_string());
    }

    pub fn contains(&self, step: &str) -> bool {
        self.edges.contains_key(step)
    }

    /// Three-colour DFS over every component.
    pub fn check_acyclic(&self) -> Result<(), TaskdeskError> {
        let mut marks: BTreeMap<&str, Mark> =
            self.edges.keys().map(|k| (k.as_str(), Mark::Unvisited)).collect();

        for start in self.edges.keys() {
            if marks[start.as_str()] == Mark::Unvisited && self.visit(start, &mut marks) {
                return Err(TaskdeskError::cycle_detected());
            }
        }
        Ok(())
    }

    fn visit<'a>(&'a self, node: &'a str, marks: &mut BTreeMap<&'a str, Mark>) -> bool {
        marks.insert(node, Mark::OnPath);
        if let Some(deps) = self.edges.get(node) {
            for dep in deps {
                match marks.get(dep.as_str()).copied().unwrap_or(Mark::Unvisited) {
                    Mark::OnPath => return true,
                    Mark::Unvisited => {
                        if self.visit(dep, marks) {
                            return true;
                        }
                    }
                    Mark::Done => {}
                }
            }
        }
        marks.insert(node, Mark::Done);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_is_acyclic() {
        let mut g = StepGraph::new();
        g.add_edge("2", "1");
        g.add_edge("3", "2");
        g.add_edge("4", "2");
        assert!(g.check_acyclic().is_ok());
    }

    #[test]
    fn test_three_step_cycle() {
        let mut g = StepGraph::new();
        g.add_edge("2", "1");
        g.add_edge("3", "2");
        g.add_edge("1", "3");
        assert!(g.check_acyclic().is_err());
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let mut g = StepGraph::new();
        g.add_edge("1", "1");
        assert!(g.check_acyclic().is_err());
    }

    #[test]
    fn test_diamond_is_acyclic() {
        let mut g = StepGraph::new();
        g.add_edge("2", "1");
        g.add_edge("3", "1");
        g.add_edge("4", "2");
        g.add_edge("4", "3");
        assert!(g.check_acyclic().is_ok());
    }
}
