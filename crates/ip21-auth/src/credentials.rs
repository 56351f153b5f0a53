//! Credential types for historian authentication.

use std::borrow::Cow;

/// Windows-domain credentials for connecting to the SQLplus web server.
///
/// Credentials are designed to minimize copying of sensitive data and never
/// expose the password through `Debug`.
#[derive(Clone)]
pub struct Credentials {
    account: Cow<'static, str>,
    domain: Cow<'static, str>,
    password: Cow<'static, str>,
}

impl Credentials {
    /// Create Windows-domain credentials.
    pub fn new(
        account: impl Into<Cow<'static, str>>,
        domain: impl Into<Cow<'static, str>>,
        password: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            account: account.into(),
            domain: domain.into(),
            password: password.into(),
        }
    }

    /// The account name, without the domain part.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// The Windows domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// The `DOMAIN\account` form used in NTLM identities.
    #[must_use]
    pub fn qualified_account(&self) -> String {
        if self.domain.is_empty() {
            self.account.to_string()
        } else {
            format!("{}\\{}", self.domain, self.account)
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose sensitive data in debug output
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("domain", &self.domain)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_account_includes_domain() {
        let creds = Credentials::new("john.doe", "CONTOSO", "hunter2");
        assert_eq!(creds.qualified_account(), "CONTOSO\\john.doe");
    }

    #[test]
    fn qualified_account_without_domain() {
        let creds = Credentials::new("john.doe", "", "hunter2");
        assert_eq!(creds.qualified_account(), "john.doe");
    }

    #[test]
    fn debug_redacts_password() {
        let creds = Credentials::new("john.doe", "CONTOSO", "hunter2");
        let output = format!("{creds:?}");
        assert!(output.contains("john.doe"));
        assert!(!output.contains("hunter2"));
        assert!(output.contains("[REDACTED]"));
    }
}
