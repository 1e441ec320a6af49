//! Authorization policy tuples and the subject/action route mapping.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Wildcard used for domains, objects and actions.
pub const WILDCARD: &str = "*";

/// Tuple type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PolicyType {
    /// Grant tuple `(subject, domain, object, action, v4, v5)`.
    #[serde(rename = "p")]
    Policy,
    /// Inheritance tuple `(child, parent, domain)`.
    #[serde(rename = "g")]
    Grouping,
}

impl PolicyType {
    /// Returns the storage value, `p` or `g`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Policy => "p",
            Self::Grouping => "g",
        }
    }

    /// Parses a storage value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "p" => Some(Self::Policy),
            "g" => Some(Self::Grouping),
            _ => None,
        }
    }
}

/// One row of the policy store.
///
/// Field equality over `(ptype, v0..v5)` is the uniqueness key; absent
/// trailing values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PolicyTuple {
    /// Tuple type.
    pub ptype: PolicyType,
    /// Subject (p) or child role (g).
    pub v0: String,
    /// Domain (p) or parent role (g).
    pub v1: String,
    /// Object (p) or domain (g).
    pub v2: String,
    /// Action (p).
    pub v3: String,
    /// Optional fifth value.
    pub v4: String,
    /// Optional sixth value.
    pub v5: String,
}

impl PolicyTuple {
    /// Creates a `p` tuple.
    #[must_use]
    pub fn policy(
        subject: impl Into<String>,
        domain: impl Into<String>,
        object: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            ptype: PolicyType::Policy,
            v0: subject.into(),
            v1: domain.into(),
            v2: object.into(),
            v3: action.into(),
            v4: String::new(),
            v5: String::new(),
        }
    }

    /// Creates a `g` tuple stating that `child` inherits `parent` in `domain`.
    #[must_use]
    pub fn grouping(
        child: impl Into<String>,
        parent: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            ptype: PolicyType::Grouping,
            v0: child.into(),
            v1: parent.into(),
            v2: domain.into(),
            v3: String::new(),
            v4: String::new(),
            v5: String::new(),
        }
    }

    /// Builds a `p` tuple from a literal seed row of 4 to 6 fields:
    /// `subject, domain, object, action[, v4[, v5]]`.
    pub fn from_policy_row(row: &[String]) -> Result<Self, MalformedSeedRow> {
        if !(4..=6).contains(&row.len()) {
            return Err(MalformedSeedRow::new(PolicyType::Policy, "4 to 6", row));
        }

        let mut tuple = Self::policy(&row[0], &row[1], &row[2], &row[3]);
        tuple.v4 = row.get(4).cloned().unwrap_or_default();
        tuple.v5 = row.get(5).cloned().unwrap_or_default();
        Ok(tuple)
    }

    /// Builds a `g` tuple from a literal seed row of exactly 3 fields:
    /// `child, parent, domain`.
    pub fn from_inheritance_row(row: &[String]) -> Result<Self, MalformedSeedRow> {
        if row.len() != 3 {
            return Err(MalformedSeedRow::new(PolicyType::Grouping, "exactly 3", row));
        }

        Ok(Self::grouping(&row[0], &row[1], &row[2]))
    }

    /// Returns the subject of a `p` tuple or the child of a `g` tuple.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.v0.as_str()
    }

    /// Returns the policy domain: `v1` for `p` tuples, `v2` for `g` tuples.
    #[must_use]
    pub fn domain(&self) -> &str {
        match self.ptype {
            PolicyType::Policy => self.v1.as_str(),
            PolicyType::Grouping => self.v2.as_str(),
        }
    }

    /// Returns the non-empty values in order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        [&self.v0, &self.v1, &self.v2, &self.v3, &self.v4, &self.v5]
            .into_iter()
            .map(String::as_str)
            .filter(|value| !value.is_empty())
            .collect()
    }
}

impl Display for PolicyTuple {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}, {}", self.ptype.as_str(), self.values().join(", "))
    }
}

/// A literal policy or inheritance row with the wrong number of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSeedRow {
    /// Tuple type the row was meant to produce.
    pub ptype: PolicyType,
    /// Accepted field count, for messages.
    pub expected: &'static str,
    /// The rejected row.
    pub row: Vec<String>,
}

impl MalformedSeedRow {
    fn new(ptype: PolicyType, expected: &'static str, row: &[String]) -> Self {
        Self {
            ptype,
            expected,
            row: row.to_vec(),
        }
    }
}

impl Display for MalformedSeedRow {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{} rule {:?} has {} fields, expected {}",
            self.ptype.as_str(),
            self.row,
            self.row.len(),
            self.expected
        )
    }
}

/// Concrete route pair a permission compiles into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteGrant {
    /// Resource path used as the policy object.
    pub resource_path: String,
    /// HTTP method used as the policy action.
    pub http_method: String,
}

/// Lookup tables translating abstract `(subject, action)` permission pairs
/// into route-shaped policy objects and actions.
///
/// Unmapped subjects fall back to `/{subject}/*` and unmapped actions to `*`.
/// A subject explicitly mapped to an empty path has no route and produces
/// no tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceActionMap {
    resources: BTreeMap<String, String>,
    methods: BTreeMap<String, String>,
}

const STANDARD_RESOURCES: &[(&str, &str)] = &[
    ("*", "*"),
    ("user", "/user/users"),
    ("employee", "/user/employees"),
    ("profile", "/user/profile"),
    ("role", "/system/roles"),
    ("permission", "/system/permissions"),
    ("policy", "/system/policies"),
    ("menu", "/system/menus"),
    ("option", "/system/options"),
    ("dictionary", "/system/dictionaries"),
    ("tenant", "/system/tenants"),
    ("space", "/system/tenants"),
    ("organization", "/org/organizations"),
    ("department", "/org/organizations"),
    ("post", "/content/posts"),
    ("page", "/content/pages"),
    ("media", "/content/media"),
    ("comment", "/content/comments"),
    ("project", "/work/projects"),
    ("task", "/work/tasks"),
    ("report", "/report/reports"),
    ("audit", "/system/audit-logs"),
    ("dashboard", ""),
];

const STANDARD_METHODS: &[(&str, &str)] = &[
    ("*", "*"),
    ("manage", "*"),
    ("read", "GET"),
    ("list", "GET"),
    ("export", "GET"),
    ("create", "POST"),
    ("update", "PUT"),
    ("delete", "DELETE"),
];

impl ResourceActionMap {
    /// Creates a map from explicit tables.
    #[must_use]
    pub fn new(resources: BTreeMap<String, String>, methods: BTreeMap<String, String>) -> Self {
        Self { resources, methods }
    }

    /// Returns the built-in tables.
    #[must_use]
    pub fn standard() -> Self {
        let to_map = |entries: &[(&str, &str)]| {
            entries
                .iter()
                .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
                .collect()
        };

        Self::new(to_map(STANDARD_RESOURCES), to_map(STANDARD_METHODS))
    }

    /// Returns the resource path for a permission subject.
    #[must_use]
    pub fn resource_path(&self, subject: &str) -> String {
        self.resources
            .get(subject)
            .cloned()
            .unwrap_or_else(|| format!("/{subject}/*"))
    }

    /// Returns the HTTP method for a permission action.
    #[must_use]
    pub fn http_method(&self, action: &str) -> String {
        self.methods
            .get(action)
            .cloned()
            .unwrap_or_else(|| WILDCARD.to_owned())
    }

    /// Maps a permission pair to its route, or `None` when either side is
    /// blank or maps to an empty value.
    #[must_use]
    pub fn route_for(&self, subject: &str, action: &str) -> Option<RouteGrant> {
        let subject = subject.trim();
        let action = action.trim();
        if subject.is_empty() || action.is_empty() {
            return None;
        }

        let resource_path = self.resource_path(subject);
        let http_method = self.http_method(action);
        if resource_path.is_empty() || http_method.is_empty() {
            return None;
        }

        Some(RouteGrant {
            resource_path,
            http_method,
        })
    }
}

impl Default for ResourceActionMap {
    fn default() -> Self {
        Self::standard()
    }
}
