use std::{fmt::Debug, time::Duration};

use cucumber::World;
use log::*;
use loyalty_engine::{
    test_utils::{
        fakes::ScriptedAccrualClient,
        prepare_env::{create_database, random_db_path, run_migrations},
    },
    AccrualSyncConfig,
    AccrualSyncEngine,
    AccrualSyncHandle,
    SqliteDatabase,
};

/// Time between discovery cycles in the scenarios. Short enough to keep the suite quick, long enough for a cycle to
/// finish against SQLite.
pub const DISCOVERY_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Default, Debug, World)]
pub struct LoyaltyWorld {
    pub system: Option<LoyaltySystem>,
}

pub struct LoyaltySystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub client: ScriptedAccrualClient,
    pub engine: Option<AccrualSyncHandle>,
}

impl Debug for LoyaltySystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LoyaltySystem ({})", self.db_path)
    }
}

impl LoyaltyWorld {
    pub fn system(&mut self) -> &mut LoyaltySystem {
        self.system.as_mut().expect("System not initialised")
    }
}

impl LoyaltySystem {
    pub async fn new() -> Self {
        let url = prepare_test_env().await;
        let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        Self { db_path: url, db, client: ScriptedAccrualClient::new(), engine: None }
    }

    pub fn start_engine(&mut self, workers: usize) {
        let config = AccrualSyncConfig::default().with_worker_count(workers).with_discovery_interval(DISCOVERY_INTERVAL);
        let engine = AccrualSyncEngine::new(config, self.client.clone(), self.db.clone());
        self.engine = Some(engine.start());
    }

    pub async fn stop_engine(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.shutdown().await;
        }
    }
}

pub async fn prepare_test_env() -> String {
    let path = random_db_path();
    create_database(&path).await;
    run_migrations(&path).await;
    path
}
