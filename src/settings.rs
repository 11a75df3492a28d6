#[derive(Debug)]
pub struct SolverSettings<M, C> {
    pub(crate) threads: usize,
    pub(crate) fork_after: usize,
    pub(crate) stack_size: usize,
    pub(crate) maze: M,
    pub(crate) callback: C,
}

impl<M, C> SolverSettings<M, C> {
    pub(crate) fn forking_enabled(&self) -> bool {
        self.fork_after > 0
    }
}
