//! Ledger accounts

use candid::{CandidType, Deserialize, Principal};
use std::fmt;

/// Subaccount discriminator bytes (32 bytes on conforming ledgers).
pub type Subaccount = Vec<u8>;

/// An owner principal plus an optional subaccount
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Account {
    /// Owning principal
    pub owner: Principal,

    /// Optional subaccount; `None` is the default subaccount
    pub subaccount: Option<Subaccount>,
}

impl Account {
    /// Default-subaccount account for `owner`
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            subaccount: None,
        }
    }

    pub fn with_subaccount(owner: Principal, subaccount: Subaccount) -> Self {
        Self {
            owner,
            subaccount: Some(subaccount),
        }
    }

    /// Collapse an all-zero subaccount to `None`.
    ///
    /// Ledgers treat the zero subaccount and the absent subaccount as the same
    /// account, so comparisons across calls go through this form.
    pub fn normalized(&self) -> Self {
        match &self.subaccount {
            Some(bytes) if bytes.iter().all(|b| *b == 0) => Self::new(self.owner),
            _ => self.clone(),
        }
    }

    /// Whether two accounts address the same ledger account
    pub fn same_as(&self, other: &Account) -> bool {
        self.normalized() == other.normalized()
    }
}

impl From<Principal> for Account {
    fn from(owner: Principal) -> Self {
        Self::new(owner)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.normalized().subaccount {
            None => write!(f, "{}", self.owner),
            Some(bytes) => {
                write!(f, "{}.", self.owner)?;
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}
