/// Status sink for long-running steps. The CLI renders it as a spinner.
pub trait Progress {
    fn start(&self, message: &str);
    fn message(&self, message: &str);
    fn stop(&self, message: &str);
}

/// Discards all progress updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn start(&self, _message: &str) {}
    fn message(&self, _message: &str) {}
    fn stop(&self, _message: &str) {}
}
