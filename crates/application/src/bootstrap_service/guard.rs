use groundwork_domain::BootstrapStep;

/// What a provisioner does given the rows already present in its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GuardDecision {
    /// Nothing exists yet; create from templates.
    Provision,
    /// Rows exist; leave the store untouched.
    Skip,
    /// Rows exist; repair links and references without creating base rows.
    Verify,
}

impl GuardDecision {
    /// Decides from the count of existing rows in the provisioner's scope.
    pub(crate) fn for_count(step: BootstrapStep, existing: u64) -> Self {
        if existing == 0 {
            return Self::Provision;
        }

        match step {
            BootstrapStep::Roles | BootstrapStep::Permissions | BootstrapStep::Users => {
                Self::Verify
            }
            _ => Self::Skip,
        }
    }
}
