use crate::{
    abstract_trait::{
        product::{
            repository::{DynProductCommandRepository, DynProductQueryRepository},
            service::{DynProductCommandService, DynProductQueryService},
        },
        storage::DynImageStorage,
    },
    config::UploadConfig,
    repository::{command::ProductCommandRepository, query::ProductQueryRepository},
    service::{command::ProductCommandService, query::ProductQueryService},
    storage::LocalImageStorage,
};
use prometheus_client::registry::Registry;
use shared::{config::ConnectionPool, utils::Metrics};
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub product_query: DynProductQueryService,
    pub product_command: DynProductCommandService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("product_query", &"ProductQueryService")
            .field("product_command", &"ProductCommandService")
            .finish()
    }
}

/// Collaborators the services are built over.
#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub query_repo: DynProductQueryRepository,
    pub command_repo: DynProductCommandRepository,
    pub image_storage: DynImageStorage,
}

impl DependenciesInjectDeps {
    pub fn postgres(pool: ConnectionPool, upload: UploadConfig) -> Self {
        Self {
            query_repo: Arc::new(ProductQueryRepository::new(pool.clone())),
            command_repo: Arc::new(ProductCommandRepository::new(pool)),
            image_storage: Arc::new(LocalImageStorage::new(upload)),
        }
    }
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps {
            query_repo,
            command_repo,
            image_storage,
        } = deps;

        let metrics = Metrics::new();
        metrics.register("product", registry);

        let product_query = Arc::new(ProductQueryService::new(
            query_repo.clone(),
            metrics.clone(),
        )) as DynProductQueryService;

        let product_command = Arc::new(ProductCommandService::new(
            query_repo,
            command_repo,
            image_storage,
            metrics,
        )) as DynProductCommandService;

        Self {
            product_query,
            product_command,
        }
    }
}
