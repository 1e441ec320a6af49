//! Domain types for bootstrap provisioning and policy compilation.

#![forbid(unsafe_code)]

mod mode;
mod policy;
mod run_state;
mod seed;
mod user;

pub use mode::{Mode, ModeProfile};
pub use policy::{
    MalformedSeedRow, PolicyTuple, PolicyType, ResourceActionMap, RouteGrant, WILDCARD,
};
pub use run_state::{
    BootstrapStep, ORCHESTRATOR_COMPONENT, RunPhase, RunState, StepOutcome, StepStatus,
};
pub use seed::{
    DictionaryItemTemplate, DictionaryTemplate, EmployeeTemplate, MenuTemplate, MenuTier,
    OptionTemplate, OrganizationKind, OrganizationTemplate, PermissionTemplate,
    RolePermissionMapping, RoleTemplate, TenantTemplate, UserTemplate,
};
pub use user::{EmailAddress, USERNAME_MAX_LENGTH, UserId, Username};
