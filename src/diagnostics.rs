//! Observational reporting for the model pipeline.
//!
//! The resolve, import and compose steps never write to the log themselves.
//! They hand a [`Diagnostic`] to whatever [`Diagnostics`] implementation the
//! caller injected; [`LogDiagnostics`] forwards them to the `log` facade.

use crate::resources::{AssetFormat, AssetLocation, LoadError, ModelRequest};

#[derive(Debug)]
pub enum Diagnostic<'a> {
    Searching {
        request: &'a ModelRequest,
        bundle: String,
    },
    Available {
        format: AssetFormat,
        assets: &'a [AssetLocation],
    },
    Found(&'a AssetLocation),
    Hierarchy(&'a [String]),
    SelectedRoot {
        name: &'a str,
    },
    LoadFailed(&'a LoadError),
    Fallback,
}

pub trait Diagnostics {
    fn report(&self, diagnostic: Diagnostic<'_>);
}

/// Writes every diagnostic to the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&self, diagnostic: Diagnostic<'_>) {
        match diagnostic {
            Diagnostic::Searching { request, bundle } => {
                log::info!("searching for model {} in {}", request, bundle)
            }
            Diagnostic::Available { format, assets } => {
                let paths: Vec<_> = assets.iter().map(|asset| asset.path.display()).collect();
                log::debug!("{} {} files in bundle: {:?}", assets.len(), format, paths);
            }
            Diagnostic::Found(location) => log::info!("found model at {}", location.path.display()),
            Diagnostic::Hierarchy(lines) => {
                log::debug!("model scene node hierarchy:");
                for line in lines {
                    log::debug!("{}", line);
                }
            }
            Diagnostic::SelectedRoot { name } => log::info!("using model node {}", name),
            Diagnostic::LoadFailed(LoadError::NotFound { name, extension }) => {
                log::warn!("failed to find model {}.{}", name, extension)
            }
            Diagnostic::LoadFailed(e) => log::error!("error loading model: {}", e),
            Diagnostic::Fallback => log::warn!("creating fallback cube model"),
        }
    }
}

/// Installs `env_logger` unless a logger is already set.
pub fn init_logging() {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::warn!("Could not initialize logger: {}", e);
        }
    }
}
