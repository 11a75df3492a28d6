//! Defines the `Maze` trait, the graph that the solvers explore.

pub mod adjacency;

use itertools::Itertools as _;
use thiserror::Error;

/// Identifies a node of the maze.
pub type NodeId = u64;

/// Identifies an occupant ("player") registered on a maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(pub usize);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("node {node} does not exist")]
    UnknownNode { node: NodeId },

    #[error("player {player} does not exist")]
    UnknownPlayer { player: usize },

    #[error("node {node} is already occupied by player {occupant}")]
    Occupied { node: NodeId, occupant: usize },
}

/// Defines the graph that a search will traverse.
///
/// All methods take `&self` because many walkers query the same maze concurrently. Implementations
/// own their occupancy policy and report conflicts through `MazeError`.
pub trait Maze {
    /// The node every search starts from.
    fn start(&self) -> NodeId;

    /// Registers a new player standing on `node`.
    fn new_player(&self, node: NodeId) -> Result<PlayerId, MazeError>;

    /// Moves `player` onto `node`.
    fn move_player(&self, player: PlayerId, node: NodeId) -> Result<(), MazeError>;

    /// Whether `node` is a goal.
    fn has_goal(&self, node: NodeId) -> bool;

    /// Clears `neighbors` and fills it with the nodes adjacent to `node`.
    fn neighbors(&self, node: NodeId, neighbors: &mut Vec<NodeId>);
}

impl<M: Maze + ?Sized> Maze for &M {
    fn start(&self) -> NodeId {
        (**self).start()
    }

    fn new_player(&self, node: NodeId) -> Result<PlayerId, MazeError> {
        (**self).new_player(node)
    }

    fn move_player(&self, player: PlayerId, node: NodeId) -> Result<(), MazeError> {
        (**self).move_player(player, node)
    }

    fn has_goal(&self, node: NodeId) -> bool {
        (**self).has_goal(node)
    }

    fn neighbors(&self, node: NodeId, neighbors: &mut Vec<NodeId>) {
        (**self).neighbors(node, neighbors);
    }
}

/// Checks that `path` starts at the maze's start node, ends on a goal, and only follows edges of
/// the maze.
pub fn is_valid_path<M: Maze + ?Sized>(maze: &M, path: &[NodeId]) -> bool {
    let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
        return false;
    };

    if first != maze.start() || !maze.has_goal(last) {
        return false;
    }

    let mut neighbors = Vec::new();
    path.iter().tuple_windows().all(|(&from, &to)| {
        maze.neighbors(from, &mut neighbors);
        neighbors.contains(&to)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::adjacency::AdjacencyMaze;

    fn line() -> AdjacencyMaze {
        let mut maze = AdjacencyMaze::new(4, 0);
        maze.add_edge(0, 1);
        maze.add_edge(1, 2);
        maze.add_edge(2, 3);
        maze.add_goal(3);
        maze
    }

    #[test]
    fn accepts_path_along_edges() {
        assert!(is_valid_path(&line(), &[0, 1, 2, 3]));
    }

    #[test]
    fn rejects_empty_path() {
        assert!(!is_valid_path(&line(), &[]));
    }

    #[test]
    fn rejects_path_not_starting_at_start() {
        assert!(!is_valid_path(&line(), &[1, 2, 3]));
    }

    #[test]
    fn rejects_path_not_ending_on_goal() {
        assert!(!is_valid_path(&line(), &[0, 1, 2]));
    }

    #[test]
    fn rejects_path_skipping_an_edge() {
        assert!(!is_valid_path(&line(), &[0, 2, 3]));
    }

    #[test]
    fn reference_impl_forwards_to_maze() {
        let maze = line();
        let by_ref = &maze;
        assert_eq!(Maze::start(&by_ref), 0);
        assert!(Maze::has_goal(&by_ref, 3));

        let mut neighbors = vec![99];
        Maze::neighbors(&by_ref, 1, &mut neighbors);
        assert_eq!(neighbors, vec![0, 2]);
    }
}
