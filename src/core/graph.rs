/// Merged lineage graph for one or more taxa, rendered as a text tree
use crate::bio::taxonomy::TaxonRecord;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;

/// Nodes are scientific names; edges point from parent to child
#[derive(Debug, Default)]
pub struct LineageGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl LineageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(idx) = self.index.get(name) {
            return *idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Add one lineage, ordered from the taxon itself up to the root
    pub fn add_lineage(&mut self, lineage: &[TaxonRecord]) {
        let mut names = lineage.iter().rev().map(|r| r.name.as_str());
        let Some(first) = names.next() else {
            return;
        };

        let mut parent = self.node(first);
        for name in names {
            let child = self.node(name);
            if child != parent && self.graph.find_edge(parent, child).is_none() {
                self.graph.add_edge(parent, child, ());
            }
            parent = child;
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn has_edge(&self, parent: &str, child: &str) -> bool {
        match (self.index.get(parent), self.index.get(child)) {
            (Some(p), Some(c)) => self.graph.find_edge(*p, *c).is_some(),
            _ => false,
        }
    }

    fn sorted_children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        children.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
        children
    }

    /// Indented tree starting from every node without a parent
    pub fn render(&self) -> String {
        let mut roots: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| {
                self.graph
                    .neighbors_directed(*idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .collect();
        roots.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));

        let mut out = String::new();
        let mut seen = HashSet::new();
        for root in roots {
            let _ = writeln!(out, "╙── {}", self.graph[root]);
            seen.insert(root);
            self.render_children(root, "    ", &mut seen, &mut out);
        }
        out
    }

    fn render_children(
        &self,
        idx: NodeIndex,
        prefix: &str,
        seen: &mut HashSet<NodeIndex>,
        out: &mut String,
    ) {
        let children = self.sorted_children(idx);
        let last = children.len().saturating_sub(1);

        for (i, child) in children.into_iter().enumerate() {
            let (branch, extension) = if i == last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            let _ = writeln!(out, "{}{}{}", prefix, branch, self.graph[child]);
            if seen.insert(child) {
                self.render_children(child, &format!("{}{}", prefix, extension), seen, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(taxid: u32, name: &str, parent: u32) -> TaxonRecord {
        TaxonRecord::new(taxid, name, Some("no rank"), parent)
    }

    #[test]
    fn test_merged_lineages() {
        let mut graph = LineageGraph::new();
        graph.add_lineage(&[
            rec(562, "Escherichia coli", 561),
            rec(561, "Escherichia", 543),
            rec(543, "Enterobacteriaceae", 1),
            rec(1, "root", 1),
        ]);
        graph.add_lineage(&[
            rec(623, "Shigella flexneri", 620),
            rec(620, "Shigella", 543),
            rec(543, "Enterobacteriaceae", 1),
            rec(1, "root", 1),
        ]);

        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 5);
        assert!(graph.has_edge("Enterobacteriaceae", "Shigella"));
        assert!(!graph.has_edge("Shigella", "Enterobacteriaceae"));

        let rendered = graph.render();
        assert_eq!(
            rendered,
            "╙── root\n\
             \x20   └── Enterobacteriaceae\n\
             \x20       ├── Escherichia\n\
             \x20       │   └── Escherichia coli\n\
             \x20       └── Shigella\n\
             \x20           └── Shigella flexneri\n"
        );
    }

    #[test]
    fn test_root_only_and_empty() {
        let mut graph = LineageGraph::new();
        graph.add_lineage(&[]);
        assert_eq!(graph.render(), "");

        graph.add_lineage(&[rec(1, "root", 1)]);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.render(), "╙── root\n");
    }
}
