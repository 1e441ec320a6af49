use std::str::FromStr;

use groundwork_core::AppError;
use serde::{Deserialize, Serialize};

/// Seed-data variant selecting which catalog a bootstrap run provisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Minimal single-tenant site.
    #[default]
    Website,
    /// Single-company deployment.
    Company,
    /// Multi-company enterprise hierarchy.
    Enterprise,
}

impl Mode {
    /// Returns a stable storage value for this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Company => "company",
            Self::Enterprise => "enterprise",
        }
    }

    /// Returns all known modes.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Mode] = &[Mode::Website, Mode::Company, Mode::Enterprise];

        ALL
    }

    /// Parses a transport value, falling back to [`Mode::Website`] for
    /// unrecognized input.
    #[must_use]
    pub fn from_transport(value: &str) -> Self {
        Self::from_str(value).unwrap_or_default()
    }

    /// Returns the profile resolved for this mode.
    #[must_use]
    pub fn profile(&self) -> ModeProfile {
        match self {
            Self::Website => ModeProfile {
                mode: *self,
                default_tenant_slug: "main-site",
                admin_candidate_usernames: &["admin", "webmaster"],
            },
            Self::Company => ModeProfile {
                mode: *self,
                default_tenant_slug: "acme-corp",
                admin_candidate_usernames: &["admin", "company.admin"],
            },
            Self::Enterprise => ModeProfile {
                mode: *self,
                default_tenant_slug: "group-hq",
                admin_candidate_usernames: &["admin", "group.admin"],
            },
        }
    }
}

impl FromStr for Mode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "website" => Ok(Self::Website),
            "company" => Ok(Self::Company),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(AppError::Validation(format!("unknown mode '{value}'"))),
        }
    }
}

/// Mode-dependent settings resolved once per run and threaded through every
/// provisioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeProfile {
    mode: Mode,
    default_tenant_slug: &'static str,
    admin_candidate_usernames: &'static [&'static str],
}

impl ModeProfile {
    /// Returns the mode this profile was resolved from.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the slug of the tenant that scopes users, options and policies.
    #[must_use]
    pub fn default_tenant_slug(&self) -> &'static str {
        self.default_tenant_slug
    }

    /// Returns usernames tried, in order, when an administrator is required.
    #[must_use]
    pub fn admin_candidate_usernames(&self) -> &'static [&'static str] {
        self.admin_candidate_usernames
    }
}
