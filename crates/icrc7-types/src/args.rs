//! Arguments for the mutating ledger calls

use crate::{Account, Subaccount, TokenId};
use candid::{CandidType, Deserialize};

/// Arguments to `icrc7_transfer`
///
/// When `from` is `None` the ledger transfers out of the caller's own account.
/// An explicit `from` that is not the caller requires an approval.
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransferArgs {
    pub spender_subaccount: Option<Subaccount>,
    pub from: Option<Account>,
    pub to: Account,
    pub token_ids: Vec<TokenId>,
    pub memo: Option<Vec<u8>>,
    /// Nanoseconds since the Unix epoch
    pub created_at_time: Option<u64>,
    /// All-or-nothing across `token_ids`; ledgers default to atomic
    pub is_atomic: Option<bool>,
}

impl TransferArgs {
    /// Transfer `token_ids` to `to` out of the caller's own account
    pub fn new(to: Account, token_ids: Vec<TokenId>) -> Self {
        Self {
            spender_subaccount: None,
            from: None,
            to,
            token_ids,
            memo: None,
            created_at_time: None,
            is_atomic: None,
        }
    }

    pub fn from_account(mut self, from: Account) -> Self {
        self.from = Some(from);
        self
    }

    pub fn created_at(mut self, nanos: u64) -> Self {
        self.created_at_time = Some(nanos);
        self
    }
}

/// Arguments to `icrc7_approve`
///
/// `token_ids: None` approves the spender for every token the caller holds.
#[derive(CandidType, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApprovalArgs {
    pub from_subaccount: Option<Subaccount>,
    pub spender: Account,
    pub token_ids: Option<Vec<TokenId>>,
    /// Nanoseconds since the Unix epoch
    pub expires_at: Option<u64>,
    pub memo: Option<Vec<u8>>,
    pub created_at_time: Option<u64>,
}

impl ApprovalArgs {
    /// Approve `spender` for the listed tokens
    pub fn new(spender: Account, token_ids: Vec<TokenId>) -> Self {
        Self {
            from_subaccount: None,
            spender,
            token_ids: Some(token_ids),
            expires_at: None,
            memo: None,
            created_at_time: None,
        }
    }

    pub fn expires_at(mut self, nanos: u64) -> Self {
        self.expires_at = Some(nanos);
        self
    }

    pub fn created_at(mut self, nanos: u64) -> Self {
        self.created_at_time = Some(nanos);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candid::{Nat, Principal};

    fn account(n: u8) -> Account {
        Account::new(Principal::from_slice(&[n]))
    }

    #[test]
    fn test_transfer_defaults_to_self() {
        let args = TransferArgs::new(account(2), vec![Nat::from(1u64)]);
        assert!(args.from.is_none());
        assert!(args.is_atomic.is_none());
        assert!(args.created_at_time.is_none());

        let args = args.from_account(account(1)).created_at(42);
        assert_eq!(args.from, Some(account(1)));
        assert_eq!(args.created_at_time, Some(42));
    }

    #[test]
    fn test_approval_builder() {
        let args = ApprovalArgs::new(account(3), vec![Nat::from(1u64)])
            .expires_at(100)
            .created_at(50);
        assert_eq!(args.token_ids, Some(vec![Nat::from(1u64)]));
        assert_eq!(args.expires_at, Some(100));
        assert_eq!(args.created_at_time, Some(50));
    }
}
