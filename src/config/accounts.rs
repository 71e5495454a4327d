use crate::domain::model::{Account, Credentials};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// TOML roster of accounts to process. Accounts run strictly one after the
/// other with no shared state.
///
/// ```toml
/// [[accounts]]
/// email = "player@example.com"
/// password = "secret"
///
/// [accounts.cookies]
/// EPIC_SSO = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsFile {
    pub accounts: Vec<AccountEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountEntry {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub cookies: HashMap<String, String>,
}

impl AccountsFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let file: AccountsFile = toml::from_str(&raw)?;
        file.validate()?;
        Ok(file)
    }

    pub fn into_accounts(self) -> Vec<Account> {
        self.accounts
            .into_iter()
            .map(|entry| Account {
                credentials: Credentials {
                    email: entry.email,
                    password: entry.password,
                },
                cookies: entry.cookies,
            })
            .collect()
    }
}

impl Validate for AccountsFile {
    fn validate(&self) -> Result<()> {
        for (index, entry) in self.accounts.iter().enumerate() {
            validate_non_empty(&format!("accounts[{index}].email"), &entry.email)?;
            validate_non_empty(&format!("accounts[{index}].password"), &entry.password)?;
        }
        Ok(())
    }
}
