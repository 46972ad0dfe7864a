use axum::extract::FromRef;
use domain::LiveEvent;
use service::Coordinator;
use storage::Db;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub coordinator: Coordinator,
    pub tx_live: broadcast::Sender<LiveEvent>,
}

impl FromRef<AppState> for Db {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
