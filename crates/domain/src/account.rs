//! Accounts and the ordered account set.

use std::collections::BTreeMap;

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};

/// A single account: balance, nonce, and optional code/storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    /// Native-currency balance.
    pub balance: U256,
    /// Number of transactions sent from this account.
    pub nonce: u64,
    /// Contract code, empty for externally owned accounts.
    pub code: Bytes,
    /// Contract storage slots.
    pub storage: BTreeMap<U256, U256>,
}

impl Account {
    /// Create an account holding `balance` with nonce 0 and no code.
    pub fn with_balance(balance: U256) -> Self {
        Self { balance, ..Self::default() }
    }

    /// Returns true if the account is indistinguishable from an untouched one.
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.nonce == 0 && self.code.is_empty() && self.storage.is_empty()
    }
}

/// Ordered mapping from address to account state.
///
/// Ordering is load-bearing: the state digest iterates entries in address
/// order, so two sets holding the same accounts always digest identically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountSet {
    accounts: BTreeMap<Address, Account>,
}

impl AccountSet {
    /// Create an empty account set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from initial (address, balance) allocations.
    pub fn from_alloc<I: IntoIterator<Item = (Address, U256)>>(alloc: I) -> Self {
        let accounts = alloc
            .into_iter()
            .map(|(address, balance)| (address, Account::with_balance(balance)))
            .collect();
        Self { accounts }
    }

    /// Look up an account. Unknown addresses return `None`.
    pub fn get(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Balance of an address, zero when unknown.
    pub fn balance(&self, address: &Address) -> U256 {
        self.accounts.get(address).map_or(U256::ZERO, |a| a.balance)
    }

    /// Nonce of an address, zero when unknown.
    pub fn nonce(&self, address: &Address) -> u64 {
        self.accounts.get(address).map_or(0, |a| a.nonce)
    }

    /// Code of an address, empty when unknown.
    pub fn code(&self, address: &Address) -> Bytes {
        self.accounts.get(address).map_or_else(Bytes::new, |a| a.code.clone())
    }

    /// Storage slot value for an address, zero when unset.
    pub fn storage(&self, address: &Address, slot: &U256) -> U256 {
        self.accounts
            .get(address)
            .and_then(|a| a.storage.get(slot).copied())
            .unwrap_or(U256::ZERO)
    }

    /// Credit `value` to an address, materializing the account on demand.
    pub fn credit(&mut self, address: Address, value: U256) {
        let account = self.accounts.entry(address).or_default();
        account.balance = account.balance.saturating_add(value);
    }

    /// Debit `value` from an address.
    ///
    /// Returns false and leaves the account untouched when the balance is
    /// insufficient. Callers are expected to have checked the balance first.
    pub fn debit(&mut self, address: &Address, value: U256) -> bool {
        match self.accounts.get_mut(address) {
            Some(account) if account.balance >= value => {
                account.balance -= value;
                true
            }
            _ => false,
        }
    }

    /// Increment the nonce of an address by exactly one.
    pub fn bump_nonce(&mut self, address: Address) {
        let account = self.accounts.entry(address).or_default();
        account.nonce += 1;
    }

    /// Install code at an address, materializing the account on demand.
    pub fn set_code(&mut self, address: Address, code: Bytes) {
        let account = self.accounts.entry(address).or_default();
        account.code = code;
    }

    /// Number of materialized accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if no account has been materialized.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterate accounts in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }

    /// Logical commitment over the full account state.
    ///
    /// Not a Merkle root: a keccak over the ordered entries, stable across
    /// identical states, which is all the simulated chain needs.
    pub fn state_digest(&self) -> B256 {
        let mut buf = Vec::with_capacity(self.accounts.len() * 64);
        for (address, account) in &self.accounts {
            buf.extend_from_slice(address.as_slice());
            buf.extend_from_slice(&account.balance.to_be_bytes::<32>());
            buf.extend_from_slice(&account.nonce.to_be_bytes());
            buf.extend_from_slice(account.code.as_ref());
            for (slot, value) in &account.storage {
                buf.extend_from_slice(&slot.to_be_bytes::<32>());
                buf.extend_from_slice(&value.to_be_bytes::<32>());
            }
        }
        keccak256(&buf)
    }
}

impl FromIterator<(Address, Account)> for AccountSet {
    fn from_iter<I: IntoIterator<Item = (Address, Account)>>(iter: I) -> Self {
        Self { accounts: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn unknown_address_reads_as_zero_account() {
        let set = AccountSet::new();
        let unknown = addr(0xaa);
        assert_eq!(set.balance(&unknown), U256::ZERO);
        assert_eq!(set.nonce(&unknown), 0);
        assert!(set.code(&unknown).is_empty());
        assert_eq!(set.storage(&unknown, &U256::from(1)), U256::ZERO);
        assert!(set.get(&unknown).is_none());
    }

    #[test]
    fn credit_materializes_account() {
        let mut set = AccountSet::new();
        set.credit(addr(0x01), U256::from(30));
        assert_eq!(set.balance(&addr(0x01)), U256::from(30));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn debit_checks_balance() {
        let mut set = AccountSet::from_alloc([(addr(0x01), U256::from(100))]);
        assert!(set.debit(&addr(0x01), U256::from(60)));
        assert_eq!(set.balance(&addr(0x01)), U256::from(40));
        assert!(!set.debit(&addr(0x01), U256::from(41)));
        assert_eq!(set.balance(&addr(0x01)), U256::from(40));
    }

    #[test]
    fn debit_unknown_address_fails() {
        let mut set = AccountSet::new();
        assert!(!set.debit(&addr(0x01), U256::from(1)));
    }

    #[test]
    fn bump_nonce_increments_by_one() {
        let mut set = AccountSet::from_alloc([(addr(0x01), U256::from(100))]);
        set.bump_nonce(addr(0x01));
        set.bump_nonce(addr(0x01));
        assert_eq!(set.nonce(&addr(0x01)), 2);
    }

    #[test]
    fn state_digest_is_deterministic() {
        let alloc = [(addr(0x01), U256::from(100)), (addr(0x02), U256::from(50))];
        let a = AccountSet::from_alloc(alloc);
        let b = AccountSet::from_alloc(alloc);
        assert_eq!(a.state_digest(), b.state_digest());
    }

    #[test]
    fn state_digest_ignores_insertion_order() {
        let a = AccountSet::from_alloc([(addr(0x01), U256::from(1)), (addr(0x02), U256::from(2))]);
        let b = AccountSet::from_alloc([(addr(0x02), U256::from(2)), (addr(0x01), U256::from(1))]);
        assert_eq!(a.state_digest(), b.state_digest());
    }

    #[test]
    fn state_digest_differs_by_balance() {
        let a = AccountSet::from_alloc([(addr(0x01), U256::from(1))]);
        let b = AccountSet::from_alloc([(addr(0x01), U256::from(2))]);
        assert_ne!(a.state_digest(), b.state_digest());
    }

    #[test]
    fn set_code_materializes_account() {
        let mut set = AccountSet::new();
        set.set_code(addr(0x01), Bytes::from_static(&[0x60, 0x00]));
        assert_eq!(set.code(&addr(0x01)), Bytes::from_static(&[0x60, 0x00]));
    }
}
