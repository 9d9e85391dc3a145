use std::{cell::RefCell, path::PathBuf};

use model_stage::{
    diagnostics::{Diagnostic, Diagnostics, LogDiagnostics},
    resources::{AssetFormat, AssetLocation, Bundle},
};

pub fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn fixture(file_name: &str, format: AssetFormat) -> AssetLocation {
    AssetLocation::new(fixtures().join(file_name), format)
}

pub fn fixture_bundle() -> Bundle {
    Bundle::new(fixtures())
}

/// Several tests share one process; only the first install wins.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Keeps a one-line summary of every diagnostic and forwards it to the log.
#[derive(Default)]
pub struct RecordingDiagnostics {
    lines: RefCell<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.lines.borrow().iter().any(|line| line.starts_with(prefix))
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&self, diagnostic: Diagnostic<'_>) {
        let line = match &diagnostic {
            Diagnostic::Searching { request, .. } => format!("searching {}", request),
            Diagnostic::Available { format, assets } => format!("available {} {}", assets.len(), format),
            Diagnostic::Found(location) => format!("found {}", location.path.display()),
            Diagnostic::Hierarchy(lines) => format!("hierarchy {}", lines.len()),
            Diagnostic::SelectedRoot { name } => format!("selected {}", name),
            Diagnostic::LoadFailed(e) => format!("failed {}", e),
            Diagnostic::Fallback => "fallback".to_string(),
        };
        self.lines.borrow_mut().push(line);
        LogDiagnostics.report(diagnostic);
    }
}
