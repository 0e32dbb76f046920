//! Progress counter for the writer stage

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Callback the writer invokes with the number of images just written.
pub type ProgressCallback = Box<dyn Fn(usize) + Send>;

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " images"
    )))
}

/// Force a refresh of the bar (e.g. so counter shows "0 images" immediately).
pub fn refresh_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Update progress bar if available
/// Uses try_lock to avoid blocking the writer if the mutex is contended
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Create a progress callback function that updates the progress bar.
pub fn progress_callback(bar: &Option<ProgressBar>) -> Option<ProgressCallback> {
    bar.as_ref().map(|bar| {
        let bar = Arc::clone(bar);
        Box::new(move |n: usize| update_progress_bar(&bar, n)) as ProgressCallback
    })
}

/// Counter bar when `enabled`, with a first refresh so it shows before any image is written.
pub fn setup_progress(enabled: bool) -> (Option<ProgressBar>, Option<ProgressCallback>) {
    let bar = enabled.then(|| create_counter("Writing"));
    if let Some(ref b) = bar {
        refresh_bar(b);
    }
    let cb = progress_callback(&bar);
    (bar, cb)
}
