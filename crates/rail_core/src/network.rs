//! One player's accumulated track graph and the pure operations over it.
//!
//! The network is an arena of point identities plus an index-based adjacency
//! list, so the "every successful operation returns a new network value"
//! contract stays a cheap clone. All edges are undirected and recorded
//! symmetrically; ferry pairings are queried from the catalog as a second
//! adjacency relation rather than merged into the built edge set.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::types::{MapCatalog, PointId, Terrain};

/// Most mileposts have at most eight grid neighbors.
type NeighborList = SmallVec<[u32; 8]>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(into = "SerializedNetwork", from = "SerializedNetwork")]
pub struct TrackNetwork {
    nodes: Vec<PointId>,
    index: AHashMap<PointId, u32>,
    adjacency: Vec<NeighborList>,
}

/// Flat storage form: node list plus one entry per unordered edge, each pair
/// canonically ordered by identity. Persistence stores this verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedNetwork {
    pub nodes: Vec<PointId>,
    pub edges: Vec<(PointId, PointId)>,
}

impl TrackNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly once per player, before the first segment is built.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(SmallVec::len).sum::<usize>() / 2
    }

    pub fn contains(&self, point: &PointId) -> bool {
        self.index.contains_key(point)
    }

    pub fn neighbors<'a>(&'a self, point: &PointId) -> impl Iterator<Item = &'a PointId> + 'a {
        self.index
            .get(point)
            .into_iter()
            .flat_map(|&i| self.adjacency[i as usize].iter())
            .map(|&j| &self.nodes[j as usize])
    }

    /// New network value with both endpoints present and the edge recorded in
    /// both directions. Idempotent: re-adding an existing pair changes nothing.
    pub fn with_segment(&self, from: &PointId, to: &PointId) -> Self {
        let mut next = self.clone();
        next.add_edge(from, to);
        next
    }

    /// Union of several players' networks, used for movement queries where a
    /// train may travel over any player's built track.
    pub fn union<'a>(networks: impl IntoIterator<Item = &'a TrackNetwork>) -> Self {
        let mut combined = Self::new();
        for network in networks {
            for (a, b) in network.edge_pairs() {
                combined.add_edge(a, b);
            }
            // Isolated nodes cannot exist via `with_segment`, but a
            // deserialized network may carry them; keep them reachable.
            for node in &network.nodes {
                combined.ensure_node(node);
            }
        }
        combined
    }

    /// Breadth-first connectivity over built edges and ferry virtual edges.
    /// Returns false if either endpoint is absent from the network.
    pub fn is_connected(&self, from: &PointId, to: &PointId, catalog: &MapCatalog) -> bool {
        let (Some(&start), Some(&goal)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        if start == goal {
            return true;
        }
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::new();
        visited[start as usize] = true;
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            for next in self.reachable_neighbors(current, catalog) {
                if next == goal {
                    return true;
                }
                if !visited[next as usize] {
                    visited[next as usize] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Best-first path search from `from` to `to`: cost is accumulated planar
    /// distance, heuristic is the straight-line distance to the goal. Ferry
    /// virtual edges are traversed at zero length. `None` if unreachable or
    /// either endpoint is absent.
    pub fn find_path(
        &self,
        from: &PointId,
        to: &PointId,
        catalog: &MapCatalog,
    ) -> Option<Vec<PointId>> {
        let (&start, &goal) = (self.index.get(from)?, self.index.get(to)?);
        if start == goal {
            return Some(vec![from.clone()]);
        }

        let mut open = BinaryHeap::new();
        let mut came_from: AHashMap<u32, u32> = AHashMap::new();
        let mut cost_so_far: AHashMap<u32, f32> = AHashMap::new();

        open.push(Reverse(PathNode {
            index: start,
            cost: 0.0,
            heuristic: self.heuristic(start, goal, catalog),
        }));
        cost_so_far.insert(start, 0.0);

        while let Some(Reverse(current)) = open.pop() {
            if current.index == goal {
                return Some(self.reconstruct_path(&came_from, goal));
            }
            // Stale heap entry for an index already reached more cheaply.
            if current.cost > cost_so_far[&current.index] {
                continue;
            }
            for next in self.reachable_neighbors(current.index, catalog) {
                let step = self.step_length(current.index, next, catalog);
                let tentative = current.cost + step;
                if cost_so_far
                    .get(&next)
                    .is_some_and(|&existing| tentative >= existing)
                {
                    continue;
                }
                cost_so_far.insert(next, tentative);
                came_from.insert(next, current.index);
                open.push(Reverse(PathNode {
                    index: next,
                    cost: tentative,
                    heuristic: self.heuristic(next, goal, catalog),
                }));
            }
        }
        None
    }

    /// Build-rule primitive: an empty network may only be started from a
    /// major city; otherwise a new segment must touch the existing network.
    pub fn can_add_segment(&self, from: &PointId, to: &PointId, catalog: &MapCatalog) -> bool {
        if self.is_empty() {
            let major = |p| catalog.terrain(p) == Some(Terrain::MajorCity);
            return major(from) || major(to);
        }
        self.is_adjacent_to_network(from) || self.is_adjacent_to_network(to)
    }

    /// True iff the point is a network node or a recorded neighbor of one.
    /// Symmetric storage makes every recorded neighbor a node, so membership
    /// alone answers both halves.
    pub fn is_adjacent_to_network(&self, point: &PointId) -> bool {
        self.contains(point)
    }

    pub fn to_serialized(&self) -> SerializedNetwork {
        let mut nodes = self.nodes.clone();
        nodes.sort();
        let mut edges: Vec<(PointId, PointId)> = self
            .edge_pairs()
            .map(|(a, b)| {
                if a <= b {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                }
            })
            .collect();
        edges.sort();
        SerializedNetwork { nodes, edges }
    }

    pub fn from_serialized(serialized: &SerializedNetwork) -> Self {
        let mut network = Self::new();
        for node in &serialized.nodes {
            network.ensure_node(node);
        }
        for (a, b) in &serialized.edges {
            network.add_edge(a, b);
        }
        network
    }

    // -- internals ----------------------------------------------------------

    fn ensure_node(&mut self, point: &PointId) -> u32 {
        if let Some(&i) = self.index.get(point) {
            return i;
        }
        let i = u32::try_from(self.nodes.len()).expect("network node count exceeds u32");
        self.nodes.push(point.clone());
        self.index.insert(point.clone(), i);
        self.adjacency.push(NeighborList::new());
        i
    }

    fn add_edge(&mut self, from: &PointId, to: &PointId) {
        if from == to {
            self.ensure_node(from);
            return;
        }
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        if !self.adjacency[a as usize].contains(&b) {
            self.adjacency[a as usize].push(b);
            self.adjacency[b as usize].push(a);
        }
    }

    /// Each unordered built edge exactly once.
    fn edge_pairs(&self) -> impl Iterator<Item = (&PointId, &PointId)> {
        self.adjacency.iter().enumerate().flat_map(move |(i, nbrs)| {
            nbrs.iter()
                .filter(move |&&j| (j as usize) > i)
                .map(move |&j| (&self.nodes[i], &self.nodes[j as usize]))
        })
    }

    /// Built neighbors plus the ferry virtual edge, restricted to network
    /// members (a virtual hop cannot land outside the node arena).
    fn reachable_neighbors<'a>(
        &'a self,
        index: u32,
        catalog: &'a MapCatalog,
    ) -> impl Iterator<Item = u32> + 'a {
        let ferry = catalog
            .ferry_pair(&self.nodes[index as usize])
            .and_then(|pair| self.index.get(pair).copied());
        self.adjacency[index as usize]
            .iter()
            .copied()
            .chain(ferry)
    }

    fn step_length(&self, from: u32, to: u32, catalog: &MapCatalog) -> f32 {
        let from_point = &self.nodes[from as usize];
        let to_point = &self.nodes[to as usize];
        if catalog.ferry_pair(from_point) == Some(to_point) {
            return 0.0;
        }
        catalog.planar_distance(from_point, to_point).unwrap_or(1.0)
    }

    fn heuristic(&self, index: u32, goal: u32, catalog: &MapCatalog) -> f32 {
        catalog
            .planar_distance(&self.nodes[index as usize], &self.nodes[goal as usize])
            .unwrap_or(0.0)
    }

    fn reconstruct_path(&self, came_from: &AHashMap<u32, u32>, goal: u32) -> Vec<PointId> {
        let mut path = vec![self.nodes[goal as usize].clone()];
        let mut current = goal;
        while let Some(&parent) = came_from.get(&current) {
            current = parent;
            path.push(self.nodes[current as usize].clone());
        }
        path.reverse();
        path
    }
}

impl PartialEq for TrackNetwork {
    fn eq(&self, other: &Self) -> bool {
        self.to_serialized() == other.to_serialized()
    }
}

impl Eq for TrackNetwork {}

impl From<TrackNetwork> for SerializedNetwork {
    fn from(network: TrackNetwork) -> Self {
        network.to_serialized()
    }
}

impl From<SerializedNetwork> for TrackNetwork {
    fn from(serialized: SerializedNetwork) -> Self {
        TrackNetwork::from_serialized(&serialized)
    }
}

#[derive(Debug, Clone)]
struct PathNode {
    index: u32,
    cost: f32,
    heuristic: f32,
}

impl PathNode {
    fn total(&self) -> f32 {
        self.cost + self.heuristic
    }
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for PathNode {}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.total()
            .partial_cmp(&other.total())
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}
