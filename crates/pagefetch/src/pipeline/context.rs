use std::fmt;
use std::path::PathBuf;

use crate::render::RenderedContent;
use crate::storage::Placement;
use crate::worker::FetchJob;

/// Where a job currently is in its pass through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Selected,
    Rendering,
    RenderFailed,
    Rendered,
    Writing,
    WriteFailed,
    Written,
    Recording,
    Done,
}

impl JobState {
    pub fn can_advance_to(self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (Selected, Rendering)
                | (Rendering, Rendered)
                | (Rendering, RenderFailed)
                | (Rendered, Writing)
                | (Writing, Written)
                | (Writing, WriteFailed)
                | (Written, Recording)
                | (Recording, Done)
                | (RenderFailed, Done)
                | (WriteFailed, Done)
        )
    }

    pub fn is_failure(self) -> bool {
        matches!(self, JobState::RenderFailed | JobState::WriteFailed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Selected => "selected",
            JobState::Rendering => "rendering",
            JobState::RenderFailed => "render_failed",
            JobState::Rendered => "rendered",
            JobState::Writing => "writing",
            JobState::WriteFailed => "write_failed",
            JobState::Written => "written",
            JobState::Recording => "recording",
            JobState::Done => "done",
        };
        f.write_str(name)
    }
}

pub struct JobContext {
    // Input
    pub job: FetchJob,

    pub state: JobState,
    pub trail: Vec<JobState>,

    // Render step result
    pub rendered: Option<RenderedContent>,

    // Write step results
    pub placement: Option<Placement>,
    pub content_path: Option<PathBuf>,
}

impl JobContext {
    pub fn new(job: FetchJob) -> Self {
        Self {
            job,
            state: JobState::Selected,
            trail: vec![JobState::Selected],
            rendered: None,
            placement: None,
            content_path: None,
        }
    }

    pub fn advance(&mut self, next: JobState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        self.state = next;
        self.trail.push(next);
    }
}
