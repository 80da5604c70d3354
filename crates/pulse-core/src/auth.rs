use crate::config::AuthPolicy;
use crate::errors::ServiceError;
use crate::model::Session;
use crate::storage::store::{is_unique_violation, Store};

/// Credential checks and session identity. One shared password gates both
/// registration and login; the configured admin email gets the admin flag
/// at registration, or is promoted on first login after the fact.
#[derive(Clone)]
pub struct AuthService {
    store: Store,
    policy: AuthPolicy,
}

impl AuthService {
    pub fn new(store: Store, policy: AuthPolicy) -> Self {
        Self { store, policy }
    }

    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ServiceError> {
        let name = name.trim();
        let email = email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(ServiceError::InvalidInput);
        }
        if password != self.policy.fixed_password {
            return Err(ServiceError::InvalidCredentials);
        }
        if self.store.find_user_by_email(&email)?.is_some() {
            return Err(ServiceError::EmailTaken);
        }

        // The stored hash is always of the fixed password, salted per user.
        let hash = bcrypt::hash(&self.policy.fixed_password, bcrypt::DEFAULT_COST)
            .map_err(|e| ServiceError::Storage(e.into()))?;
        let is_admin = email == self.policy.admin_email;

        let user = match self.store.create_user(name, &email, &hash, is_admin) {
            Ok(user) => user,
            // Lost the race between the pre-check and the insert.
            Err(e) if is_unique_violation(&e) => return Err(ServiceError::EmailTaken),
            Err(e) => return Err(ServiceError::Storage(e)),
        };

        Ok(Session {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
        })
    }

    /// Unknown email and wrong password return the same error on purpose:
    /// the caller must not be able to enumerate registered addresses.
    pub fn login(&self, email: &str, password: &str) -> Result<Session, ServiceError> {
        let email = email.trim().to_lowercase();
        let Some(user) = self.store.find_user_by_email(&email)? else {
            return Err(ServiceError::InvalidCredentials);
        };
        if password != self.policy.fixed_password {
            return Err(ServiceError::InvalidCredentials);
        }

        let mut session = Session::from(&user);
        if !session.is_admin && email == self.policy.admin_email {
            self.store.set_admin(user.id, true)?;
            session.is_admin = true;
        }
        Ok(session)
    }
}
