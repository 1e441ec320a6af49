use std::sync::Arc;

use groundwork_domain::{Mode, ModeProfile};

use crate::bootstrap_ports::DataLoader;

/// Inputs resolved once per run and handed to every provisioner.
#[derive(Clone)]
pub struct BootstrapContext {
    profile: ModeProfile,
    loader: Arc<dyn DataLoader>,
}

impl BootstrapContext {
    /// Creates a context pinned to one mode.
    #[must_use]
    pub fn new(mode: Mode, loader: Arc<dyn DataLoader>) -> Self {
        Self {
            profile: mode.profile(),
            loader,
        }
    }

    /// Returns the mode of the run.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.profile.mode()
    }

    /// Returns the mode profile.
    #[must_use]
    pub fn profile(&self) -> ModeProfile {
        self.profile
    }

    /// Returns the slug of the tenant options, users and policies default to.
    #[must_use]
    pub fn default_tenant_slug(&self) -> &'static str {
        self.profile.default_tenant_slug()
    }

    /// Returns the seed catalog.
    #[must_use]
    pub fn loader(&self) -> &dyn DataLoader {
        self.loader.as_ref()
    }
}
