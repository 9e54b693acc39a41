use datecard_config::Settings;
use datecard_services::dao::InvitationDao;
use mongodb::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub invitations: Arc<InvitationDao>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let invitations = Arc::new(InvitationDao::new(&db, settings.invitation.clone()));

        Self {
            db,
            settings,
            invitations,
        }
    }
}
