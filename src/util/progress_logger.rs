pub trait ProgressLogger {
    type Session: ProgressSession;
    fn start_session(self, node_count: usize) -> Self::Session;
}

pub trait ProgressSession {
    fn round(&mut self, reductions: usize);
    fn finish(self, rounds: usize);
}

#[derive(Clone, Copy, Debug)]
pub struct Hidden;

#[derive(Clone, Copy, Debug)]
pub struct HiddenSession;

impl ProgressLogger for Hidden {
    type Session = HiddenSession;
    fn start_session(self, _node_count: usize) -> Self::Session {
        HiddenSession
    }
}

impl ProgressSession for HiddenSession {
    fn round(&mut self, _reductions: usize) {}
    fn finish(self, _rounds: usize) {}
}
