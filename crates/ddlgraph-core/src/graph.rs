use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::constraints::{FkRule, ForeignKeyDependency};
use crate::error::{Error, Result};
use crate::snapshot::{MetadataSnapshot, TableName};

/// A `from → to` edge: `from` references `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: TableName,
    pub to: TableName,
    /// Constraint name of the first dependency discovered for this pair.
    pub constraint_name: Option<String>,
    pub on_delete: FkRule,
    pub on_update: FkRule,
}

impl Edge {
    pub fn is_self_reference(&self) -> bool {
        self.from == self.to
    }
}

/// Directed graph of tables linked by foreign keys.
///
/// Vertices keep insertion order; edges keep discovery order and are unique
/// per ordered table pair.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    vertices: Vec<TableName>,
    index: BTreeMap<TableName, usize>,
    edges: Vec<Edge>,
    links: Vec<(usize, usize)>,
    link_set: BTreeSet<(usize, usize)>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from snapshot tables and dependencies.
    pub fn from_snapshot(snapshot: &MetadataSnapshot) -> Result<Self> {
        let mut graph = Self::new();
        for table in &snapshot.tables {
            graph.add_vertex(table.name.clone());
        }
        for dependency in &snapshot.dependencies {
            graph.add_edge(dependency)?;
        }

        tracing::debug!(
            event = "graph_built",
            schema = %snapshot.schema,
            nodes = graph.vertex_count(),
            edges = graph.edge_count()
        );
        Ok(graph)
    }

    /// Add a vertex. Returns `false` when the table is already present.
    pub fn add_vertex(&mut self, name: TableName) -> bool {
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name.clone(), self.vertices.len());
        self.vertices.push(name);
        true
    }

    /// Add the edge for a dependency. Returns `false` when the pair already has an edge.
    pub fn add_edge(&mut self, dependency: &ForeignKeyDependency) -> Result<bool> {
        let from = self.vertex_index(&dependency.from_table, dependency)?;
        let to = self.vertex_index(&dependency.to_table, dependency)?;

        if !self.link_set.insert((from, to)) {
            return Ok(false);
        }

        self.links.push((from, to));
        self.edges.push(Edge {
            from: dependency.from_table.clone(),
            to: dependency.to_table.clone(),
            constraint_name: dependency.constraint_name.clone(),
            on_delete: dependency.on_delete(),
            on_update: dependency.on_update(),
        });
        Ok(true)
    }

    fn vertex_index(&self, name: &TableName, dependency: &ForeignKeyDependency) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::DanglingEdge {
                from: dependency.from_table.to_string(),
                to: name.to_string(),
            })
    }

    pub fn contains(&self, name: &TableName) -> bool {
        self.index.contains_key(name)
    }

    pub fn vertices(&self) -> &[TableName] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Tables referenced by `name`, in edge discovery order.
    pub fn references(&self, name: &TableName) -> Vec<&TableName> {
        self.edges
            .iter()
            .filter(|edge| &edge.from == name)
            .map(|edge| &edge.to)
            .collect()
    }

    /// Tables referencing `name`, in edge discovery order.
    pub fn referenced_by(&self, name: &TableName) -> Vec<&TableName> {
        self.edges
            .iter()
            .filter(|edge| &edge.to == name)
            .map(|edge| &edge.from)
            .collect()
    }

    /// Creation order: every referenced table precedes the tables referencing it.
    ///
    /// Ties go to the table fetched first. Self-references do not constrain the
    /// order.
    pub fn topological_order(&self) -> Result<Vec<TableName>> {
        match toposort(self.vertices.len(), &self.links) {
            Ok(order) => {
                tracing::debug!(event = "order_computed", tables = order.len());
                Ok(order
                    .into_iter()
                    .map(|idx| self.vertices[idx].clone())
                    .collect())
            }
            Err(unplaced) => Err(Error::CyclicDependency {
                tables: unplaced
                    .into_iter()
                    .map(|idx| self.vertices[idx].to_string())
                    .collect(),
            }),
        }
    }

    /// Non-failing view of the graph for display.
    pub fn report(&self) -> GraphReport {
        let summary = GraphSummary {
            nodes: self.vertex_count(),
            edges: self.edge_count(),
        };

        let tables = self
            .vertices
            .iter()
            .map(|name| VertexReport {
                name: name.to_string(),
                references: self.references(name).iter().map(|t| t.to_string()).collect(),
                referenced_by: self
                    .referenced_by(name)
                    .iter()
                    .map(|t| t.to_string())
                    .collect(),
            })
            .collect();

        let (topo_order, cycle) = match toposort(self.vertices.len(), &self.links) {
            Ok(order) => (
                Some(order.into_iter().map(|i| self.vertices[i].to_string()).collect()),
                None,
            ),
            Err(unplaced) => (
                None,
                Some(unplaced.into_iter().map(|i| self.vertices[i].to_string()).collect()),
            ),
        };

        GraphReport {
            summary,
            topo_order,
            cycle,
            tables,
        }
    }
}

/// Summary of graph structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Adjacency of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexReport {
    pub name: String,
    pub references: Vec<String>,
    pub referenced_by: Vec<String>,
}

/// Report for dependency ordering, exactly one of `topo_order` and `cycle` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphReport {
    pub summary: GraphSummary,
    pub topo_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
    pub tables: Vec<VertexReport>,
}

/// Kahn's algorithm over vertex indices. `links` holds `(from, to)` pairs.
///
/// On failure returns the unplaced vertices in index order.
fn toposort(vertex_count: usize, links: &[(usize, usize)]) -> std::result::Result<Vec<usize>, Vec<usize>> {
    let mut pending = vec![0usize; vertex_count];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];

    for &(from, to) in links {
        if from == to {
            continue;
        }
        pending[from] += 1;
        dependents[to].push(from);
    }

    let mut ready: BTreeSet<usize> = pending
        .iter()
        .enumerate()
        .filter_map(|(idx, count)| if *count == 0 { Some(idx) } else { None })
        .collect();

    let mut order = Vec::with_capacity(vertex_count);

    while let Some(node) = ready.pop_first() {
        order.push(node);
        for &dependent in &dependents[node] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() == vertex_count {
        Ok(order)
    } else {
        Err(pending
            .into_iter()
            .enumerate()
            .filter_map(|(idx, count)| if count > 0 { Some(idx) } else { None })
            .collect())
    }
}
