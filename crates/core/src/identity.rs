use serde::{Deserialize, Serialize};

use crate::OrgId;

/// Administrator identity attached to every service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    display_name: String,
    org_id: OrgId,
}

impl UserIdentity {
    /// Creates a user identity from authentication and organization data.
    #[must_use]
    pub fn new(subject: impl Into<String>, display_name: impl Into<String>, org_id: OrgId) -> Self {
        Self {
            subject: subject.into(),
            display_name: display_name.into(),
            org_id,
        }
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the organization linked to the identity.
    #[must_use]
    pub fn org_id(&self) -> OrgId {
        self.org_id
    }
}
