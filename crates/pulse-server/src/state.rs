use pulse_core::admin::AdminService;
use pulse_core::auth::AuthService;
use pulse_core::config::AuthPolicy;
use pulse_core::notify::Notifier;
use pulse_core::session::MemorySessions;
use pulse_core::storage::store::Store;
use pulse_core::survey::SurveyService;
use std::sync::Arc;

pub struct AppState {
    pub sessions: MemorySessions,
    pub auth: AuthService,
    pub survey: SurveyService,
    pub admin: AdminService,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn shared(store: Store, policy: AuthPolicy, notifier: Arc<dyn Notifier>) -> SharedState {
        let survey = SurveyService::new(store.clone(), notifier, policy.admin_email.clone());
        Arc::new(Self {
            sessions: MemorySessions::new(),
            auth: AuthService::new(store.clone(), policy),
            survey,
            admin: AdminService::new(store),
        })
    }
}
