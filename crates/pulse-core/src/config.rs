use std::env;

/// Credential policy: one shared password gates registration and login,
/// and one email address designates the administrator. Both are deployment
/// configuration, not user data.
#[derive(Clone, Debug)]
pub struct AuthPolicy {
    pub fixed_password: String,
    pub admin_email: String,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            fixed_password: "changeme".to_string(),
            admin_email: "admin@example.com".to_string(),
        }
    }
}

impl AuthPolicy {
    pub fn from_env() -> Self {
        let mut policy = Self::default();
        if let Ok(v) = env::var("PULSE_FIXED_PASSWORD") {
            if !v.is_empty() {
                policy.fixed_password = v;
            }
        }
        if let Ok(v) = env::var("PULSE_ADMIN_EMAIL") {
            if !v.is_empty() {
                policy.admin_email = v;
            }
        }
        policy.admin_email = policy.admin_email.trim().to_lowercase();
        policy
    }
}
