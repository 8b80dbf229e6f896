use log::{debug, warn};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Local build outputs that are removed when the guard is dropped, whether the
/// task finished or bailed out half way.
#[derive(Debug, Default)]
pub struct Artifacts {
    paths: Vec<PathBuf>,
}

impl Artifacts {
    pub fn new() -> Self {
        Artifacts::default()
    }

    pub fn track(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }
}

impl Drop for Artifacts {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("removed {}", path.display()),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => warn!("could not remove {}: {err}", path.display()),
            }
        }
    }
}
