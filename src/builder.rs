use rayon::ThreadPoolBuildError;
use thiserror::Error;

use crate::{
    callback::SearchCallback,
    fork_join::ForkJoinSolver,
    maze::{Maze, MazeError, NodeId},
    settings::SolverSettings,
};

#[derive(Debug, Error)]
pub enum SolverBuilderError {
    #[error("`threads` not set")]
    ThreadsNotSet,

    #[error("`fork_after` not set")]
    ForkAfterNotSet,

    #[error("`stack_size` not set")]
    StackSizeNotSet,

    #[error("`maze` not set")]
    MazeNotSet,

    #[error("`callback` not set")]
    CallbackNotSet,

    #[error("Number of threads must be at least 1")]
    ZeroThreads,
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    Builder(#[from] SolverBuilderError),

    #[error(transparent)]
    Maze(#[from] MazeError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

#[derive(Debug)]
pub struct SolverBuilder<M, C> {
    threads: Option<usize>,
    fork_after: Option<usize>,
    stack_size: Option<usize>,
    maze: Option<M>,
    callback: Option<C>,
}

impl<M, C> Default for SolverBuilder<M, C>
where
    M: Maze + Sync,
    C: SearchCallback + Clone + Send,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<M, C> SolverBuilder<M, C>
where
    M: Maze + Sync,
    C: SearchCallback + Clone + Send,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            threads: None,
            fork_after: None,
            stack_size: None,
            maze: None,
            callback: None,
        }
    }

    #[must_use]
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Number of nodes a walker visits before it forks a new walker onto an unvisited neighbor.
    /// Zero disables forking.
    #[must_use]
    pub fn fork_after(mut self, fork_after: usize) -> Self {
        self.fork_after = Some(fork_after);
        self
    }

    /// Stack size of each pool thread. Walkers nest on the stack while their children run.
    #[must_use]
    pub fn stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = Some(stack_size);
        self
    }

    #[must_use]
    pub fn maze(mut self, maze: M) -> Self {
        self.maze = Some(maze);
        self
    }

    #[must_use]
    pub fn callback(mut self, callback: C) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn run_no_defaults(self) -> Result<Option<Vec<NodeId>>, SolveError> {
        let threads = self.threads.ok_or(SolverBuilderError::ThreadsNotSet)?;
        if threads == 0 {
            return Err(SolverBuilderError::ZeroThreads.into());
        }

        let settings = SolverSettings {
            threads,
            fork_after: self
                .fork_after
                .ok_or(SolverBuilderError::ForkAfterNotSet)?,
            stack_size: self
                .stack_size
                .ok_or(SolverBuilderError::StackSizeNotSet)?,
            maze: self.maze.ok_or(SolverBuilderError::MazeNotSet)?,
            callback: self.callback.ok_or(SolverBuilderError::CallbackNotSet)?,
        };

        ForkJoinSolver::new(&settings).run()
    }

    pub fn run(mut self) -> Result<Option<Vec<NodeId>>, SolveError> {
        self.threads.get_or_insert_with(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        });
        self.stack_size.get_or_insert(1 << 23);

        self.run_no_defaults()
    }
}
