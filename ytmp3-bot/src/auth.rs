//! Authorization for privileged commands

/// Identity of the user behind an incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub id: u64,
    pub username: Option<String>,
}

impl Requester {
    pub fn new(id: u64, username: Option<String>) -> Self {
        Self { id, username }
    }
}

/// Decides who may run privileged commands
pub trait AuthorizationPolicy: Send + Sync {
    fn is_privileged(&self, requester: &Requester) -> bool;
}

/// Grants privilege to a single configured username
///
/// Exact, case-sensitive comparison. With no username configured nobody is
/// privileged.
#[derive(Debug, Clone, Default)]
pub struct UsernamePolicy {
    admin_username: Option<String>,
}

impl UsernamePolicy {
    pub fn new(admin_username: Option<String>) -> Self {
        let admin_username = admin_username
            .map(|u| u.trim().trim_start_matches('@').to_string())
            .filter(|u| !u.is_empty());
        Self { admin_username }
    }
}

impl AuthorizationPolicy for UsernamePolicy {
    fn is_privileged(&self, requester: &Requester) -> bool {
        match (&self.admin_username, &requester.username) {
            (Some(admin), Some(username)) => admin == username,
            _ => false,
        }
    }
}

/// Nobody is privileged
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl AuthorizationPolicy for DenyAll {
    fn is_privileged(&self, _requester: &Requester) -> bool {
        false
    }
}
