//! Crate entrypoint wiring together configuration, storage and the zone
//! template engine.

pub mod access;
pub mod config;
pub mod db;
pub mod error;
pub mod repository;
pub mod service;
pub mod validation;
pub mod zone;

use config::AppConfig;
use db::Db;
use db::zone_repo::SqliteZoneRepository;
use service::ZoneService;

/// Complete application dependencies shared by the command handlers.
pub struct AppState {
    pub config: AppConfig,
    pub db: Db,
    pub zones: ZoneService<SqliteZoneRepository>,
}

impl AppState {
    pub fn new(config: AppConfig, db: Db) -> Self {
        let repo = SqliteZoneRepository::new(db.clone());
        let zones = ZoneService::new(repo, config.allow_incomplete);
        Self { config, db, zones }
    }
}
