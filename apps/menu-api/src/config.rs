use core_config::{
    AppInfo, FromEnv, app_info, assets::AssetsConfig, server::ServerConfig, store::StoreBackend,
};
use database::mongodb::MongoConfig;

pub use core_config::Environment;

/// Everything the service reads from the environment
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: StoreBackend,
    /// Only read, and only required, for the MongoDB backend
    pub mongodb: Option<MongoConfig>,
    pub assets: AssetsConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let backend = StoreBackend::from_env()?;
        let mongodb = match backend {
            StoreBackend::MongoDb => Some(MongoConfig::from_env()?),
            StoreBackend::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            backend,
            mongodb,
            assets: AssetsConfig::from_env()?,
        })
    }
}
