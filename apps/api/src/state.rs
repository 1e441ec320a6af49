use groundwork_application::BootstrapService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub bootstrap_service: BootstrapService,
    pub bootstrap_token: String,
}
