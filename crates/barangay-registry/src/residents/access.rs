use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{Resident, UserId};
use super::query::Visibility;

/// Authenticated identity and role names, supplied by the auth gateway for each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
    pub roles: BTreeSet<String>,
}

impl Caller {
    pub fn new<I, S>(user_id: UserId, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.contains(name)
    }
}

/// Decides row visibility and which row actions a caller is offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    elevated_roles: BTreeSet<String>,
}

impl AccessPolicy {
    pub const DEFAULT_ELEVATED_ROLES: [&'static str; 2] = ["super_admin", "brgySecretary"];

    pub fn new<I, S>(elevated_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            elevated_roles: elevated_roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_elevated(&self, caller: &Caller) -> bool {
        self.elevated_roles.iter().any(|role| caller.has_role(role))
    }

    pub fn visibility_for(&self, caller: &Caller) -> Visibility {
        if self.is_elevated(caller) {
            Visibility::Everything
        } else {
            Visibility::OwnedBy(caller.user_id)
        }
    }

    pub fn can_approve(&self, caller: &Caller, resident: &Resident) -> bool {
        self.is_elevated(caller) && !resident.is_approved
    }

    pub fn row_actions(&self, caller: &Caller, resident: &Resident) -> RowActions {
        RowActions {
            edit: self.visibility_for(caller).permits(resident),
            approve: self.can_approve(caller, resident),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ELEVATED_ROLES)
    }
}

/// Actions offered next to a listed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowActions {
    pub edit: bool,
    pub approve: bool,
}
