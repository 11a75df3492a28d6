use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;

use crate::maze::{Maze, MazeError, NodeId, PlayerId};

#[derive(Debug, Default)]
struct Occupancy {
    /// Position of each player, indexed by `PlayerId`.
    positions: Vec<NodeId>,
    occupants: HashMap<NodeId, PlayerId>,
}

impl Occupancy {
    fn check_free(&self, node: NodeId, player: Option<PlayerId>) -> Result<(), MazeError> {
        match self.occupants.get(&node) {
            Some(&occupant) if Some(occupant) != player => Err(MazeError::Occupied {
                node,
                occupant: occupant.0,
            }),
            _ => Ok(()),
        }
    }
}

/// An in-memory maze backed by adjacency lists.
///
/// Nodes are `0..num_nodes`. Edges are undirected and neighbors are reported in insertion order.
/// At most one player may stand on a node at a time.
#[derive(Debug)]
pub struct AdjacencyMaze {
    start: NodeId,
    adjacency: Vec<Vec<NodeId>>,
    goals: HashSet<NodeId>,
    occupancy: Mutex<Occupancy>,
}

impl AdjacencyMaze {
    #[must_use]
    pub fn new(num_nodes: usize, start: NodeId) -> Self {
        assert!(
            (start as usize) < num_nodes,
            "start node {start} out of range for {num_nodes} nodes",
        );

        Self {
            start,
            adjacency: vec![Vec::new(); num_nodes],
            goals: HashSet::new(),
            occupancy: Mutex::new(Occupancy::default()),
        }
    }

    /// Adds an undirected edge between `a` and `b`. Duplicate edges are ignored.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        assert!(self.contains(a) && self.contains(b), "edge {a}-{b} out of range");

        if !self.adjacency[a as usize].contains(&b) {
            self.adjacency[a as usize].push(b);
        }
        if a != b && !self.adjacency[b as usize].contains(&a) {
            self.adjacency[b as usize].push(a);
        }
    }

    pub fn add_goal(&mut self, node: NodeId) {
        assert!(self.contains(node), "goal {node} out of range");
        self.goals.insert(node);
    }

    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.occupancy.lock().positions.len()
    }

    #[must_use]
    pub fn player_position(&self, player: PlayerId) -> Option<NodeId> {
        self.occupancy.lock().positions.get(player.0).copied()
    }

    fn contains(&self, node: NodeId) -> bool {
        (node as usize) < self.adjacency.len()
    }

    fn check_node(&self, node: NodeId) -> Result<(), MazeError> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(MazeError::UnknownNode { node })
        }
    }
}

impl Maze for AdjacencyMaze {
    fn start(&self) -> NodeId {
        self.start
    }

    fn new_player(&self, node: NodeId) -> Result<PlayerId, MazeError> {
        self.check_node(node)?;

        let mut occupancy = self.occupancy.lock();
        occupancy.check_free(node, None)?;

        let player = PlayerId(occupancy.positions.len());
        occupancy.positions.push(node);
        occupancy.occupants.insert(node, player);

        Ok(player)
    }

    fn move_player(&self, player: PlayerId, node: NodeId) -> Result<(), MazeError> {
        self.check_node(node)?;

        let mut occupancy = self.occupancy.lock();
        let Some(&old) = occupancy.positions.get(player.0) else {
            return Err(MazeError::UnknownPlayer { player: player.0 });
        };
        occupancy.check_free(node, Some(player))?;

        occupancy.occupants.remove(&old);
        occupancy.occupants.insert(node, player);
        occupancy.positions[player.0] = node;

        Ok(())
    }

    fn has_goal(&self, node: NodeId) -> bool {
        self.goals.contains(&node)
    }

    fn neighbors(&self, node: NodeId, neighbors: &mut Vec<NodeId>) {
        neighbors.clear();
        if let Some(adjacent) = self.adjacency.get(node as usize) {
            neighbors.extend_from_slice(adjacent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> AdjacencyMaze {
        let mut maze = AdjacencyMaze::new(3, 0);
        maze.add_edge(0, 1);
        maze.add_edge(1, 2);
        maze.add_edge(2, 0);
        maze
    }

    #[test]
    fn edges_are_undirected_and_ordered() {
        let maze = triangle();
        let mut neighbors = Vec::new();

        maze.neighbors(0, &mut neighbors);
        assert_eq!(neighbors, vec![1, 2]);

        maze.neighbors(2, &mut neighbors);
        assert_eq!(neighbors, vec![1, 0]);
    }

    #[test]
    fn duplicate_edges_are_ignored() {
        let mut maze = triangle();
        maze.add_edge(1, 0);

        let mut neighbors = Vec::new();
        maze.neighbors(0, &mut neighbors);
        assert_eq!(neighbors, vec![1, 2]);
    }

    #[test]
    fn unknown_node_has_no_neighbors() {
        let maze = triangle();
        let mut neighbors = vec![7];
        maze.neighbors(10, &mut neighbors);
        assert!(neighbors.is_empty());
    }

    #[test]
    fn players_cannot_share_a_node() {
        let maze = triangle();
        let first = maze.new_player(0).unwrap();

        assert_eq!(
            maze.new_player(0),
            Err(MazeError::Occupied {
                node: 0,
                occupant: first.0,
            }),
        );

        let second = maze.new_player(1).unwrap();
        assert_eq!(
            maze.move_player(second, 0),
            Err(MazeError::Occupied {
                node: 0,
                occupant: first.0,
            }),
        );
        assert_eq!(maze.num_players(), 2);
    }

    #[test]
    fn moving_frees_the_old_node() {
        let maze = triangle();
        let player = maze.new_player(0).unwrap();

        maze.move_player(player, 1).unwrap();
        assert_eq!(maze.player_position(player), Some(1));

        let other = maze.new_player(0).unwrap();
        assert_eq!(maze.player_position(other), Some(0));
    }

    #[test]
    fn moving_onto_own_node_is_allowed() {
        let maze = triangle();
        let player = maze.new_player(2).unwrap();
        assert_eq!(maze.move_player(player, 2), Ok(()));
    }

    #[test]
    fn rejects_unknown_nodes_and_players() {
        let maze = triangle();
        assert_eq!(maze.new_player(3), Err(MazeError::UnknownNode { node: 3 }));
        assert_eq!(
            maze.move_player(PlayerId(5), 1),
            Err(MazeError::UnknownPlayer { player: 5 }),
        );
    }

    #[test]
    fn goals() {
        let mut maze = triangle();
        maze.add_goal(2);
        assert!(maze.has_goal(2));
        assert!(!maze.has_goal(1));
    }
}
