use std::path::PathBuf;
use std::time::Duration;

use crate::config::{BrowserSettings, RunSettings};

pub struct PipelineConfig {
    pub content_root: PathBuf,
    pub pause: Duration,
    pub browser: BrowserSettings,
}

impl PipelineConfig {
    pub fn from_settings(settings: &RunSettings) -> Self {
        Self {
            content_root: settings.content_root.clone(),
            pause: settings.pause(),
            browser: settings.browser.clone(),
        }
    }
}
