//! In-memory store, for tests and local development without a Kazoo
//! installation behind the server.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{AccountRecord, DeviceRecord};
use crate::traits::{AccountStore, DeviceStore};

/// A fixed set of accounts and devices. Built once, read-only afterwards.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: Vec<AccountRecord>,
    devices: Vec<(String, DeviceRecord)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: AccountRecord) -> Self {
        self.accounts.push(account);
        self
    }

    /// Register a device under the given account id. The device's
    /// `mac_address` is the lookup key.
    pub fn with_device(mut self, account_id: impl Into<String>, device: DeviceRecord) -> Self {
        self.devices.push((account_id.into(), device));
        self
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get_account_by_name(&self, name: &str) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.accounts.iter().find(|a| a.name == name).cloned())
    }
}

#[async_trait]
impl DeviceStore for MemoryStore {
    async fn get_device_by_mac_address(
        &self,
        account_id: &str,
        mac_address: &str,
    ) -> Result<Option<DeviceRecord>, StoreError> {
        Ok(self
            .devices
            .iter()
            .find(|(owner, device)| owner == account_id && device.mac_address == mac_address)
            .map(|(_, device)| device.clone()))
    }
}
