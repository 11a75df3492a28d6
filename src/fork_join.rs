use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use rayon::{Scope, ThreadPoolBuilder};

use crate::{
    builder::SolveError,
    callback::SearchCallback,
    maze::{Maze, MazeError, NodeId},
    path::path_from_to,
    settings::SolverSettings,
};

type WalkerResult = Result<Option<Vec<NodeId>>, MazeError>;

/// State shared by every walker of one search.
pub(crate) struct SharedState {
    visited: DashSet<NodeId>,
    predecessors: DashMap<NodeId, NodeId>,
    stop: AtomicBool,
    next_walker_id: AtomicUsize,
}

impl SharedState {
    pub(crate) fn new() -> Self {
        Self {
            visited: DashSet::new(),
            predecessors: DashMap::new(),
            stop: AtomicBool::new(false),
            next_walker_id: AtomicUsize::new(0),
        }
    }

    fn is_visited(&self, node: NodeId) -> bool {
        self.visited.contains(&node)
    }

    /// Marks `node` as visited and records `from` as its predecessor. Returns `true` only for the
    /// one caller that inserted `node`, which is then the only walker allowed to act on it.
    fn claim(&self, node: NodeId, from: NodeId) -> bool {
        if !self.visited.insert(node) {
            return false;
        }

        self.predecessors.entry(node).or_insert(from);
        true
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Sets the stop flag. Returns `true` if this call is the one that set it.
    fn signal_stop(&self) -> bool {
        !self.stop.swap(true, Ordering::SeqCst)
    }

    fn path_from_to(&self, from: NodeId, to: NodeId) -> Vec<NodeId> {
        path_from_to(from, to, |node| {
            self.predecessors.get(&node).map(|pred| *pred.value())
        })
    }
}

/// A walker spawned by another walker, and the slot it reports its result into.
struct ForkedWalker {
    id: usize,
    start: NodeId,
    result: Arc<Mutex<Option<WalkerResult>>>,
}

/// One depth-first search task. Owns its frontier, step counter and children; shares the visited
/// set, predecessor map and stop flag with every other walker of the same search.
pub(crate) struct Walker<'a, M, C> {
    id: usize,
    maze: &'a M,
    shared: &'a SharedState,
    callback: C,
    start: NodeId,
    fork_after: usize,
    steps: usize,
    /// Nodes waiting to be visited, with the node they were discovered from. Only the start has
    /// no discoverer.
    frontier: Vec<(NodeId, Option<NodeId>)>,
}

impl<'a, M, C> Walker<'a, M, C>
where
    M: Maze + Sync,
    C: SearchCallback + Clone + Send,
{
    pub(crate) fn root(
        maze: &'a M,
        shared: &'a SharedState,
        fork_after: usize,
        callback: C,
    ) -> Self {
        Self::new(maze, shared, maze.start(), fork_after, callback)
    }

    fn new(
        maze: &'a M,
        shared: &'a SharedState,
        start: NodeId,
        fork_after: usize,
        callback: C,
    ) -> Self {
        Self {
            id: shared.next_walker_id.fetch_add(1, Ordering::Relaxed),
            maze,
            shared,
            callback,
            start,
            fork_after,
            steps: 0,
            frontier: Vec::new(),
        }
    }

    /// Runs this walker and every walker it forks. Returns the path from this walker's start to
    /// the goal if the winning walker is this one or one of its descendants.
    pub(crate) fn search(mut self) -> WalkerResult {
        let mut children = Vec::new();

        let outcome = rayon::scope(|scope| {
            let outcome = self.explore(scope, &mut children);
            if outcome.is_err() {
                self.shared.signal_stop();
            }
            outcome
        });

        match outcome? {
            Some(path) => Ok(Some(path)),
            None => self.join(children),
        }
    }

    fn fork_due(&self) -> bool {
        self.fork_after > 0 && self.steps >= self.fork_after
    }

    fn explore<'scope>(
        &mut self,
        scope: &Scope<'scope>,
        children: &mut Vec<ForkedWalker>,
    ) -> WalkerResult
    where
        'a: 'scope,
        M: 'scope,
        C: 'scope,
    {
        let player = self.maze.new_player(self.start)?;
        self.frontier.push((self.start, None));

        let mut neighbors = Vec::new();

        while !self.shared.should_stop() {
            let Some((current, from)) = self.frontier.pop() else {
                break;
            };

            let claimed = match from {
                Some(from) => self.shared.claim(current, from),
                // The start of a forked walker was already claimed by its parent
                None => {
                    self.shared.visited.insert(current);
                    true
                }
            };
            if !claimed {
                continue;
            }

            self.maze.move_player(player, current)?;
            self.steps += 1;
            self.callback.visit(self.id, current);
            tracing::trace!("walker {} visiting node {current}", self.id);

            if self.maze.has_goal(current) {
                if self.shared.signal_stop() {
                    tracing::debug!("walker {} found goal {current}", self.id);
                    return Ok(Some(self.shared.path_from_to(self.start, current)));
                }

                // Another walker won first
                break;
            }

            self.maze.neighbors(current, &mut neighbors);

            let mut first = true;
            for &nb in &neighbors {
                if self.shared.is_visited(nb) {
                    continue;
                }

                if first || !self.fork_due() {
                    self.frontier.push((nb, Some(current)));
                    first = false;
                } else if self.shared.claim(nb, current) {
                    // At most one fork per visited node: the reset lets the remaining neighbors
                    // be queued here
                    self.steps = 0;
                    self.fork(scope, nb, children);
                }
            }
        }

        Ok(None)
    }

    fn fork<'scope>(
        &mut self,
        scope: &Scope<'scope>,
        start: NodeId,
        children: &mut Vec<ForkedWalker>,
    ) where
        'a: 'scope,
        M: 'scope,
        C: 'scope,
    {
        let child = Self::new(
            self.maze,
            self.shared,
            start,
            self.fork_after,
            self.callback.clone(),
        );

        tracing::debug!("walker {} forking walker {} at node {start}", self.id, child.id);
        self.callback.fork(self.id, child.id, start);

        let result = Arc::new(Mutex::new(None));
        children.push(ForkedWalker {
            id: child.id,
            start,
            result: Arc::clone(&result),
        });

        scope.spawn(move |_| {
            let outcome = child.search();
            *result.lock() = Some(outcome);
        });
    }

    /// Looks through the results of this walker's children in the order they were forked, and
    /// extends the first path found with the path from this walker's start to the child's start.
    fn join(&self, children: Vec<ForkedWalker>) -> WalkerResult {
        for child in children {
            let outcome = child
                .result
                .lock()
                .take()
                .unwrap_or_else(|| panic!("walker {} finished without a result", child.id));

            if let Some(child_path) = outcome? {
                assert_eq!(child_path.first(), Some(&child.start));
                tracing::debug!("walker {} joined winning walker {}", self.id, child.id);

                let mut path = self.shared.path_from_to(self.start, child.start);
                path.extend_from_slice(&child_path[1..]);
                return Ok(Some(path));
            }
        }

        Ok(None)
    }
}

/// Runs a fork/join search on a dedicated thread pool.
pub(crate) struct ForkJoinSolver<'a, M, C> {
    settings: &'a SolverSettings<M, C>,
}

impl<'a, M, C> ForkJoinSolver<'a, M, C>
where
    M: Maze + Sync,
    C: SearchCallback + Clone + Send,
{
    pub(crate) fn new(settings: &'a SolverSettings<M, C>) -> Self {
        Self { settings }
    }

    pub(crate) fn run(&self) -> Result<Option<Vec<NodeId>>, SolveError> {
        let settings = self.settings;

        let pool = ThreadPoolBuilder::new()
            .num_threads(settings.threads)
            .stack_size(settings.stack_size)
            .thread_name(|idx| format!("walker-pool-{idx}"))
            .build()?;

        if settings.forking_enabled() {
            tracing::info!(
                "starting search from node {} on {} threads, forking after {} steps",
                settings.maze.start(),
                settings.threads,
                settings.fork_after,
            );
        } else {
            tracing::info!(
                "starting search from node {} without forking",
                settings.maze.start(),
            );
        }

        let shared = SharedState::new();
        let root = Walker::root(
            &settings.maze,
            &shared,
            settings.fork_after,
            settings.callback.clone(),
        );
        let path = pool.install(|| root.search())?;

        match &path {
            Some(path) => tracing::info!(
                "found path of length {} after visiting {} nodes with {} walkers",
                path.len(),
                shared.visited.len(),
                shared.next_walker_id.load(Ordering::Relaxed),
            ),
            None => tracing::info!(
                "no path found after visiting {} nodes with {} walkers",
                shared.visited.len(),
                shared.next_walker_id.load(Ordering::Relaxed),
            ),
        }

        Ok(path)
    }
}
