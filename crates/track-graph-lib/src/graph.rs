//! Directed loop graph over track points
//!
//! Every track contributes one edge per point: from each point to the next,
//! and from the last point back to the first. Tracks sharing a point share the
//! vertex, so their adjacency lists merge. The graph is built once by
//! [`build_graph`] and read-only afterwards.
//!
//! Inserting the same directed pair twice (two tracks running along the same
//! stretch in the same direction) stores two destinations. Consumers such as
//! [`Graph::connected_waves`] tolerate the duplicates.

use crate::{Coordinate, Metric, Track};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Target of a directed edge, with the edge length in meters
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Destination {
    pub coordinate: Coordinate,
    pub distance: f64,
}

/// Edges discovered at one breadth-first depth, as (source, destination) pairs
pub type Wave = Vec<(Coordinate, Coordinate)>;

/// Directed, distance-weighted adjacency over coordinate vertices
///
/// Parallel edges are allowed, so repeated insertions stay distinct.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    graph: StableDiGraph<Coordinate, f64>,
    node_indices: HashMap<Coordinate, NodeIndex>,
}

/// Build one graph from all tracks, closing each track into a loop
pub fn build_graph(tracks: &[Track]) -> Graph {
    #[cfg(feature = "profiling")]
    profiling::scope!("graph::build_graph");

    let mut graph = Graph::default();
    for track in tracks {
        for (from, to) in track.loop_pairs() {
            graph.add_edge(from, to);
        }
    }

    tracing::debug!(
        tracks = tracks.len(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Built track graph"
    );
    graph
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Graph {
    /// Index of `vertex`, inserting it on first sight
    fn node_index(&mut self, vertex: Coordinate) -> NodeIndex {
        let graph = &mut self.graph;
        *self
            .node_indices
            .entry(vertex)
            .or_insert_with(|| graph.add_node(vertex))
    }

    /// Append `to` to the destinations of `from`, weighted by the projected distance
    pub(crate) fn add_edge(&mut self, from: Coordinate, to: Coordinate) {
        let distance = from.distance(&to);
        let from_index = self.node_index(from);
        let to_index = self.node_index(to);
        self.graph.add_edge(from_index, to_index, distance);
    }

    /// Every vertex with its destinations, in no particular vertex order
    pub fn edges(&self) -> impl Iterator<Item = (Coordinate, Vec<Destination>)> + '_ {
        self.node_indices
            .iter()
            .map(|(vertex, &index)| (*vertex, self.outgoing(index)))
    }

    /// Outgoing edges of `vertex` in insertion order, empty if it has none
    pub fn destinations(&self, vertex: &Coordinate) -> Vec<Destination> {
        match self.node_indices.get(vertex) {
            Some(&index) => self.outgoing(index),
            None => Vec::new(),
        }
    }

    fn outgoing(&self, index: NodeIndex) -> Vec<Destination> {
        let mut destinations: Vec<Destination> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .map(|edge| Destination {
                coordinate: self.graph[edge.target()],
                distance: *edge.weight(),
            })
            .collect();
        // petgraph walks the newest edge first
        destinations.reverse();
        destinations
    }

    #[inline]
    pub fn vertices(&self) -> impl Iterator<Item = &Coordinate> {
        self.node_indices.keys()
    }

    #[inline]
    pub fn contains_vertex(&self, vertex: &Coordinate) -> bool {
        self.node_indices.contains_key(vertex)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of inserted directed edges, duplicates included
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// A deterministic starting vertex: the smallest one in coordinate order
    pub fn start_vertex(&self) -> Option<Coordinate> {
        self.node_indices.keys().min().copied()
    }

    /// Split the edges reachable from `start` into breadth-first waves
    ///
    /// Wave `i` holds every outgoing edge of the vertices first reached at
    /// depth `i`. Each reachable vertex is expanded exactly once, though it can
    /// show up as a destination in several waves. The last wave is always
    /// empty; consumers draining waves one at a time use it as the end marker.
    /// A start vertex with no outgoing edges yields `[[], []]`.
    ///
    /// Edge distances are ignored: this is a level decomposition, not a
    /// shortest-path search.
    pub fn connected_waves(&self, start: Coordinate) -> Vec<Wave> {
        let mut waves: Vec<Wave> = Vec::new();
        let mut current: Wave = Vec::new();
        let mut visited: HashSet<Coordinate> = HashSet::new();
        let mut frontier = vec![start];

        while !frontier.is_empty() {
            let mut next_frontier = Vec::new();
            for source in frontier {
                visited.insert(source);
                for destination in self.destinations(&source) {
                    current.push((source, destination.coordinate));
                    next_frontier.push(destination.coordinate);
                }
            }
            waves.push(std::mem::take(&mut current));

            // The frontier is a set: drop visited vertices and repeats, keep first-seen order
            let mut queued = HashSet::new();
            frontier = next_frontier
                .into_iter()
                .filter(|v| !visited.contains(v) && queued.insert(*v))
                .collect();
        }
        // The step that found nothing new leaves its empty wave behind
        waves.push(current);

        tracing::debug!(
            waves = waves.len(),
            vertices = visited.len(),
            "Traversed graph"
        );
        waves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackColor;

    fn track(points: &[(f64, f64)]) -> Track {
        Track::from_coordinates(
            points.iter().map(|&(lat, lon)| Coordinate::new(lat, lon)),
            TrackColor::Pink,
            1,
            "test",
        )
        .unwrap()
    }

    fn square(offset: f64) -> Track {
        track(&[
            (53.0 + offset, 13.0),
            (53.0 + offset, 13.01),
            (53.01 + offset, 13.01),
            (53.01 + offset, 13.0),
        ])
    }

    #[test]
    fn test_loop_closure_adds_one_edge_per_point() {
        let t = square(0.0);
        let graph = build_graph(std::slice::from_ref(&t));

        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.vertex_count(), 4);

        let coords: Vec<_> = t.coordinates().collect();
        let closing = graph.destinations(&coords[3]);
        assert_eq!(closing.len(), 1);
        assert_eq!(closing[0].coordinate, coords[0]);

        for (from, destinations) in graph.edges() {
            for d in destinations {
                assert_eq!(d.distance, from.distance(&d.coordinate));
            }
        }
    }

    #[test]
    fn test_edges_are_directed() {
        let t = track(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let graph = build_graph(&[t]);
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 1.0);

        assert_eq!(graph.destinations(&a)[0].coordinate, b);
        assert!(graph.destinations(&b).iter().all(|d| d.coordinate != a));
    }

    #[test]
    fn test_disjoint_tracks_add_up() {
        let first = square(0.0);
        let second = square(1.0);
        let graph = build_graph(&[first.clone(), second.clone()]);

        let alone_first = build_graph(&[first]).edge_count();
        let alone_second = build_graph(&[second]).edge_count();
        assert_eq!(graph.edge_count(), alone_first + alone_second);
        assert_eq!(graph.vertex_count(), 8);
    }

    #[test]
    fn test_shared_vertex_merges_destinations() {
        let shared = (53.0, 13.0);
        let first = track(&[shared, (53.0, 13.01), (53.01, 13.01)]);
        let second = track(&[shared, (52.99, 12.99)]);
        let graph = build_graph(&[first, second]);

        let vertex = Coordinate::new(shared.0, shared.1);
        assert_eq!(graph.destinations(&vertex).len(), 2);
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.vertex_count(), 4);
    }

    #[test]
    fn test_duplicate_edges_are_kept() {
        let t = track(&[(0.0, 0.0), (0.0, 1.0)]);
        let graph = build_graph(&[t.clone(), t]);

        let a = Coordinate::new(0.0, 0.0);
        assert_eq!(graph.destinations(&a).len(), 2);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_destinations_keep_insertion_order() {
        let hub = (0.0, 0.0);
        let spokes = [(0.0, 1.0), (1.0, 0.0), (-1.0, 0.0)];
        let tracks: Vec<Track> = spokes.iter().map(|&s| track(&[hub, s])).collect();
        let graph = build_graph(&tracks);

        let order: Vec<_> = graph
            .destinations(&Coordinate::new(0.0, 0.0))
            .iter()
            .map(|d| d.coordinate)
            .collect();
        let expected: Vec<_> = spokes
            .iter()
            .map(|&(lat, lon)| Coordinate::new(lat, lon))
            .collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_empty_graph() {
        let graph = build_graph(&[]);
        assert!(graph.is_empty());
        assert_eq!(graph.start_vertex(), None);
        assert!(graph.destinations(&Coordinate::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_start_vertex_is_smallest() {
        let graph = build_graph(&[square(0.0)]);
        assert_eq!(graph.start_vertex(), Some(Coordinate::new(53.0, 13.0)));
    }

    #[test]
    fn test_waves_cover_every_vertex_once() {
        let graph = build_graph(&[square(0.0), square(1.0)]);
        let start = Coordinate::new(53.0, 13.0);
        let waves = graph.connected_waves(start);

        assert!(waves.last().unwrap().is_empty());

        let mut sources: Vec<Coordinate> = Vec::new();
        for wave in &waves[..waves.len() - 1] {
            let mut wave_sources: Vec<_> = wave.iter().map(|(s, _)| *s).collect();
            wave_sources.dedup();
            sources.extend(wave_sources);
        }
        let unique: HashSet<_> = sources.iter().copied().collect();
        assert_eq!(unique.len(), sources.len());

        // Only the first square is reachable from its corner
        let reachable: HashSet<_> = square(0.0).coordinates().collect();
        assert_eq!(unique, reachable);
    }

    #[test]
    fn test_ring_waves() {
        let t = square(0.0);
        let coords: Vec<_> = t.coordinates().collect();
        let graph = build_graph(&[t]);
        let waves = graph.connected_waves(coords[0]);

        // One edge per depth around the ring, then the empty end marker
        assert_eq!(waves.len(), 5);
        assert_eq!(waves[0], vec![(coords[0], coords[1])]);
        assert_eq!(waves[1], vec![(coords[1], coords[2])]);
        assert_eq!(waves[2], vec![(coords[2], coords[3])]);
        assert_eq!(waves[3], vec![(coords[3], coords[0])]);
        assert!(waves[4].is_empty());
    }

    #[test]
    fn test_branching_waves() {
        // Two loops through a hub: hub -> a -> hub, hub -> b -> hub
        let hub = (0.0, 0.0);
        let graph = build_graph(&[track(&[hub, (0.0, 1.0)]), track(&[hub, (1.0, 0.0)])]);
        let hub = Coordinate::new(0.0, 0.0);
        let waves = graph.connected_waves(hub);

        assert_eq!(waves.len(), 3);
        let first: HashSet<_> = waves[0].iter().copied().collect();
        assert_eq!(
            first,
            HashSet::from([
                (hub, Coordinate::new(0.0, 1.0)),
                (hub, Coordinate::new(1.0, 0.0)),
            ])
        );
        // Both spokes point back at the already visited hub
        assert_eq!(waves[1].len(), 2);
        assert!(waves[1].iter().all(|(_, d)| *d == hub));
        assert!(waves[2].is_empty());
    }

    #[test]
    fn test_vertex_reached_twice_is_expanded_once() {
        // a -> b, a -> c, b -> d, c -> d, d -> a
        let a = (0.0, 0.0);
        let b = (0.0, 1.0);
        let c = (1.0, 0.0);
        let d = (1.0, 1.0);
        let graph = build_graph(&[track(&[a, b, d]), track(&[a, c, d])]);
        let d = Coordinate::new(1.0, 1.0);
        let waves = graph.connected_waves(Coordinate::new(0.0, 0.0));

        // d is discovered from both b and c but expanded only once
        let from_d: Vec<_> = waves.iter().flatten().filter(|(s, _)| *s == d).collect();
        assert_eq!(from_d.len(), 2);
        assert!(waves.last().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_start_vertex() {
        let graph = build_graph(&[square(0.0)]);
        let waves = graph.connected_waves(Coordinate::new(-1.0, -1.0));
        assert_eq!(waves, vec![Vec::new(), Vec::new()]);
    }
}
