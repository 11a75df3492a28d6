//! Single-walker depth-first search.

use std::collections::{HashMap, HashSet};

use crate::{
    maze::{Maze, MazeError, NodeId},
    path::path_from_to,
};

/// Depth-first search with one player and no forking.
///
/// Neighbors are pushed in the order the maze reports them, so the last reported unvisited
/// neighbor is explored first.
pub struct SequentialSolver<M> {
    maze: M,
    start: NodeId,
    frontier: Vec<NodeId>,
    visited: HashSet<NodeId>,
    predecessors: HashMap<NodeId, NodeId>,
}

impl<M: Maze> SequentialSolver<M> {
    pub fn new(maze: M) -> Self {
        let start = maze.start();
        Self {
            maze,
            start,
            frontier: Vec::new(),
            visited: HashSet::new(),
            predecessors: HashMap::new(),
        }
    }

    /// Returns the path from the maze's start node to the first goal found, or `None` if no goal
    /// is reachable.
    pub fn search(mut self) -> Result<Option<Vec<NodeId>>, MazeError> {
        let player = self.maze.new_player(self.start)?;
        self.frontier.push(self.start);

        let mut neighbors = Vec::new();

        while let Some(current) = self.frontier.pop() {
            if !self.visited.insert(current) {
                continue;
            }

            self.maze.move_player(player, current)?;
            tracing::trace!("visiting node {current}");

            if self.maze.has_goal(current) {
                let predecessors = &self.predecessors;
                let path = path_from_to(self.start, current, |n| predecessors.get(&n).copied());
                return Ok(Some(path));
            }

            self.maze.neighbors(current, &mut neighbors);
            for &nb in &neighbors {
                if !self.visited.contains(&nb) {
                    self.predecessors.insert(nb, current);
                    self.frontier.push(nb);
                }
            }
        }

        Ok(None)
    }
}
