use metrics_exporter_prometheus::PrometheusHandle;
use profile_matching::config::AppConfig;
use profile_matching::dataset;
use profile_matching::error::AppError;
use profile_matching::matching::{
    InMemoryCatalog, InMemoryLedger, MatchingConfig, ProfileMatchingService,
};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type MatchingService = ProfileMatchingService<InMemoryCatalog, InMemoryLedger>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Load the catalog from `directory`, or the bundled sample when none is given.
pub(crate) fn load_catalog(directory: Option<PathBuf>) -> Result<InMemoryCatalog, AppError> {
    let catalog = match directory {
        Some(directory) => {
            let catalog = dataset::load_dir(&directory)?;
            info!(directory = %directory.display(), "dataset loaded");
            catalog
        }
        None => {
            let catalog = dataset::load_sample()?;
            info!("sample dataset loaded");
            catalog
        }
    };
    Ok(catalog)
}

/// An explicit directory wins over `APP_DATASET_DIR`.
pub(crate) fn resolve_dataset_dir(
    explicit: Option<PathBuf>,
) -> Result<Option<PathBuf>, AppError> {
    match explicit {
        Some(directory) => Ok(Some(directory)),
        None => Ok(AppConfig::load()?.dataset.directory),
    }
}

pub(crate) fn matching_service(catalog: InMemoryCatalog) -> Arc<MatchingService> {
    Arc::new(ProfileMatchingService::new(
        Arc::new(catalog),
        Arc::new(InMemoryLedger::default()),
        MatchingConfig::default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_is_used_without_a_directory() {
        let catalog = load_catalog(None).expect("sample loads");
        assert_eq!(catalog.positions().len(), 3);
        assert_eq!(catalog.candidates().len(), 3);
    }

    #[test]
    fn missing_directory_is_a_dataset_error() {
        let error = match load_catalog(Some(PathBuf::from("/nonexistent/dataset"))) {
            Ok(_) => panic!("directory does not exist"),
            Err(error) => error,
        };
        assert!(matches!(error, AppError::Dataset(_)));
    }

    #[test]
    fn explicit_dataset_dir_skips_environment() {
        let resolved = resolve_dataset_dir(Some(PathBuf::from("/srv/hr")))
            .expect("explicit directory resolves");
        assert_eq!(resolved, Some(PathBuf::from("/srv/hr")));
    }
}
