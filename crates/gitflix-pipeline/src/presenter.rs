use std::time::Instant;

use tracing::info;

use gitflix_types::RawFrame;

use crate::error::PresenterError;

/// The external display sink.
///
/// The pipeline makes no capability demands beyond these four calls;
/// windowed, GPU, and headless sinks all fit behind it. The presenter is
/// selected at session construction.
pub trait Presenter {
    /// Prepare the sink for frames of the given dimensions.
    fn init(&mut self, width: u32, height: u32) -> Result<(), PresenterError>;

    /// Show one frame. The frame is released after this call returns.
    fn present(&mut self, frame: &RawFrame) -> Result<(), PresenterError>;

    /// Has the sink asked the session to stop (window closed, ESC, …)?
    fn should_close(&self) -> bool;

    /// Release sink resources. Called exactly once at pipeline teardown.
    fn cleanup(&mut self);
}

/// A sink that consumes frames and reports throughput.
///
/// Used for repository verification runs and benchmarking where no display
/// is attached.
pub struct HeadlessPresenter {
    frames: u64,
    log_every: u64,
    started: Option<Instant>,
}

impl HeadlessPresenter {
    /// Log progress every `log_every` frames (0 disables logging).
    pub fn new(log_every: u64) -> Self {
        Self {
            frames: 0,
            log_every,
            started: None,
        }
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for HeadlessPresenter {
    fn default() -> Self {
        Self::new(60)
    }
}

impl Presenter for HeadlessPresenter {
    fn init(&mut self, _width: u32, _height: u32) -> Result<(), PresenterError> {
        self.started = Some(Instant::now());
        Ok(())
    }

    fn present(&mut self, _frame: &RawFrame) -> Result<(), PresenterError> {
        self.frames += 1;
        if self.log_every > 0 && self.frames % self.log_every == 0 {
            let elapsed = self
                .started
                .map(|s| s.elapsed().as_secs_f64())
                .unwrap_or_default();
            let fps = if elapsed > 0.0 {
                self.frames as f64 / elapsed
            } else {
                0.0
            };
            info!(frames = self.frames, fps = format!("{fps:.1}"), "playback progress");
        }
        Ok(())
    }

    fn should_close(&self) -> bool {
        false
    }

    fn cleanup(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitflix_types::FrameGeometry;

    #[test]
    fn headless_counts_frames() {
        let mut presenter = HeadlessPresenter::new(0);
        presenter.init(8, 8).unwrap();
        let frame = RawFrame::filled(FrameGeometry::new(8, 8, 3).unwrap(), 0);
        for _ in 0..5 {
            presenter.present(&frame).unwrap();
        }
        assert_eq!(presenter.frames(), 5);
        assert!(!presenter.should_close());
        presenter.cleanup();
    }
}
