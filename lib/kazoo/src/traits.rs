use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{AccountRecord, DeviceRecord};

/// Tenant account lookup.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up an account by its name. `Ok(None)` means no such account.
    async fn get_account_by_name(&self, name: &str) -> Result<Option<AccountRecord>, StoreError>;
}

/// Provisioned device lookup.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Look up a device by owning account id and colon-delimited MAC
    /// address. `Ok(None)` means the account has no such device.
    async fn get_device_by_mac_address(
        &self,
        account_id: &str,
        mac_address: &str,
    ) -> Result<Option<DeviceRecord>, StoreError>;
}
