/// Events emitted while inputs are loaded and frames are evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    FramesStart { total_frames: u64, copies: usize },
    /// One frame evaluated; `bonded_copies` of the tracked copies held their hydrogen bond.
    FrameEvaluated { bonded_copies: usize },
    FramesFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback. Shared by reference
/// across rayon workers, hence the `Send + Sync` bound on the callback.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn events_reach_the_callback_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            seen.lock().unwrap().push(format!("{:?}", event));
        }));

        reporter.report(Progress::FramesStart {
            total_frames: 2,
            copies: 1,
        });
        reporter.report(Progress::FrameEvaluated { bonded_copies: 1 });
        reporter.report(Progress::Message("done".to_string()));
        drop(reporter);

        assert_eq!(
            seen.into_inner().unwrap(),
            vec![
                "FramesStart { total_frames: 2, copies: 1 }",
                "FrameEvaluated { bonded_copies: 1 }",
                "Message(\"done\")"
            ]
        );
    }

    #[test]
    fn reporter_without_callback_is_silent() {
        ProgressReporter::new().report(Progress::PhaseFinish);
    }
}
