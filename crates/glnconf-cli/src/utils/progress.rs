use glnconf::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Drives an indicatif bar from engine progress events. While frames are
/// evaluated the bar message carries the running count of bonded observations
/// (one per copy whose hydrogen bond held in a frame).
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
    bonded: Arc<AtomicU64>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
            bonded: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Progress bar that never draws, for `--quiet` runs.
    pub fn hidden() -> Self {
        let handler = Self::new();
        if let Ok(pb) = handler.pb.lock() {
            pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
        }
        handler
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();
        let bonded = self.bonded.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_length(0);
                    pb_guard.set_style(Self::spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name.to_string());
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::FramesStart {
                    total_frames,
                    copies,
                } => {
                    bonded.store(0, Ordering::Relaxed);
                    pb_guard.disable_steady_tick();
                    pb_guard.reset();
                    pb_guard.set_length(total_frames);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::bar_style());
                    pb_guard.set_message(format!("{} copies", copies));
                }
                Progress::FrameEvaluated { bonded_copies } => {
                    let total =
                        bonded.fetch_add(bonded_copies as u64, Ordering::Relaxed) + bonded_copies as u64;
                    pb_guard.set_message(format!("{} bonded", total));
                    pb_guard.inc(1);
                }
                Progress::FramesFinish => {
                    let length = pb_guard.length().unwrap_or(0);
                    if pb_guard.position() < length {
                        pb_guard.set_position(length);
                    }
                    pb_guard.finish();
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn callback_tracks_frame_evaluation() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::PhaseStart {
            name: "Frame Evaluation",
        });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Frame Evaluation");
            assert!(!pb.is_finished());
        }

        callback(Progress::FramesStart {
            total_frames: 10,
            copies: 2,
        });
        assert_eq!(handler.pb.lock().unwrap().message(), "2 copies");

        callback(Progress::FrameEvaluated { bonded_copies: 2 });
        callback(Progress::FrameEvaluated { bonded_copies: 0 });
        callback(Progress::FrameEvaluated { bonded_copies: 1 });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(10));
            assert_eq!(pb.position(), 3);
            assert_eq!(pb.message(), "3 bonded");
        }

        callback(Progress::FramesFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.position(), 10);
            assert!(pb.is_finished());
        }

        callback(Progress::PhaseFinish);
        assert_eq!(handler.pb.lock().unwrap().message(), "✓ Done");
    }

    #[test]
    fn bonded_count_restarts_with_each_evaluation() {
        let handler = CliProgressHandler::hidden();
        let callback = handler.get_callback();

        callback(Progress::FramesStart {
            total_frames: 1,
            copies: 1,
        });
        callback(Progress::FrameEvaluated { bonded_copies: 1 });
        callback(Progress::FramesStart {
            total_frames: 1,
            copies: 1,
        });
        callback(Progress::FrameEvaluated { bonded_copies: 0 });

        assert_eq!(handler.pb.lock().unwrap().message(), "0 bonded");
    }
}
