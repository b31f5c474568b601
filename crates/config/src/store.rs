use crate::error::{ConfigError, Result};
use crate::types::{BrowseConfig, FeatureFlag, TenantSettings};
use async_trait::async_trait;
use browse_protocol::BrowseOptionId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Per-tenant browse configuration.
///
/// Reads are never cached: a `get` observes every `set` that completed before it.
#[async_trait]
pub trait BrowseConfigStore: Send + Sync {
    async fn get(&self, tenant: &str, id: &BrowseOptionId) -> Result<BrowseConfig>;

    async fn set(&self, tenant: &str, config: BrowseConfig) -> Result<()>;

    async fn list(&self, tenant: &str) -> Result<Vec<BrowseConfig>>;

    async fn feature(&self, tenant: &str, flag: FeatureFlag) -> Result<bool>;

    async fn set_feature(&self, tenant: &str, flag: FeatureFlag, enabled: bool) -> Result<()>;
}

fn validate_tenant(tenant: &str) -> Result<()> {
    let valid = !tenant.is_empty()
        && tenant
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidTenant(tenant.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    tenants: RwLock<HashMap<String, TenantSettings>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn snapshot(&self, tenant: &str) -> Result<TenantSettings> {
        validate_tenant(tenant)?;
        Ok(self
            .tenants
            .read()
            .await
            .get(tenant)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl BrowseConfigStore for MemoryConfigStore {
    async fn get(&self, tenant: &str, id: &BrowseOptionId) -> Result<BrowseConfig> {
        self.snapshot(tenant).await?.resolve(id)
    }

    async fn set(&self, tenant: &str, config: BrowseConfig) -> Result<()> {
        validate_tenant(tenant)?;
        log::info!("Updating browse option {} for tenant {}", config.id, tenant);
        let mut tenants = self.tenants.write().await;
        tenants.entry(tenant.to_string()).or_default().upsert(config)
    }

    async fn list(&self, tenant: &str) -> Result<Vec<BrowseConfig>> {
        Ok(self.snapshot(tenant).await?.effective())
    }

    async fn feature(&self, tenant: &str, flag: FeatureFlag) -> Result<bool> {
        Ok(self.snapshot(tenant).await?.feature(flag))
    }

    async fn set_feature(&self, tenant: &str, flag: FeatureFlag, enabled: bool) -> Result<()> {
        validate_tenant(tenant)?;
        log::info!("Setting feature {flag}={enabled} for tenant {tenant}");
        let mut tenants = self.tenants.write().await;
        tenants
            .entry(tenant.to_string())
            .or_default()
            .set_feature(flag, enabled);
        Ok(())
    }
}

/// One JSON document per tenant under `dir`, re-read on every call.
///
/// Writers serialize on an in-process lock; the document is replaced through a
/// temp file and rename so readers never observe a partial write.
#[derive(Debug)]
pub struct FileConfigStore {
    dir: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileConfigStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn tenant_path(&self, tenant: &str) -> Result<PathBuf> {
        validate_tenant(tenant)?;
        Ok(self.dir.join(format!("{tenant}.json")))
    }

    async fn load(&self, tenant: &str) -> Result<TenantSettings> {
        let path = self.tenant_path(tenant)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(TenantSettings::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, tenant: &str, settings: &TenantSettings) -> Result<()> {
        let path = self.tenant_path(tenant)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let bytes = serde_json::to_vec_pretty(settings)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        log::debug!("Saved browse settings to {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl BrowseConfigStore for FileConfigStore {
    async fn get(&self, tenant: &str, id: &BrowseOptionId) -> Result<BrowseConfig> {
        self.load(tenant).await?.resolve(id)
    }

    async fn set(&self, tenant: &str, config: BrowseConfig) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load(tenant).await?;
        log::info!("Updating browse option {} for tenant {}", config.id, tenant);
        settings.upsert(config)?;
        self.save(tenant, &settings).await
    }

    async fn list(&self, tenant: &str) -> Result<Vec<BrowseConfig>> {
        Ok(self.load(tenant).await?.effective())
    }

    async fn feature(&self, tenant: &str, flag: FeatureFlag) -> Result<bool> {
        Ok(self.load(tenant).await?.feature(flag))
    }

    async fn set_feature(&self, tenant: &str, flag: FeatureFlag, enabled: bool) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut settings = self.load(tenant).await?;
        log::info!("Setting feature {flag}={enabled} for tenant {tenant}");
        settings.set_feature(flag, enabled);
        self.save(tenant, &settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use browse_shelf_key::ShelvingAlgorithm;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn dewey_only() -> BrowseConfig {
        BrowseConfig::new(BrowseOptionId::new("DEWEY"), ShelvingAlgorithm::Dewey)
            .with_type_ids(["dewey-type"])
    }

    #[tokio::test]
    async fn memory_store_reflects_latest_write() {
        let store = MemoryConfigStore::new();
        let id = BrowseOptionId::new("dewey");
        assert!(store.get("college", &id).await.unwrap().type_ids.is_empty());

        store.set("college", dewey_only()).await.unwrap();
        let cfg = store.get("college", &id).await.unwrap();
        assert_eq!(cfg, dewey_only());

        // Other tenants keep the defaults.
        assert!(store.get("university", &id).await.unwrap().type_ids.is_empty());
    }

    #[tokio::test]
    async fn memory_store_features() {
        let store = MemoryConfigStore::new();
        assert!(!store
            .feature("college", FeatureFlag::IntermediateValues)
            .await
            .unwrap());
        store
            .set_feature("college", FeatureFlag::IntermediateValues, true)
            .await
            .unwrap();
        assert!(store
            .feature("college", FeatureFlag::IntermediateValues)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn rejects_path_like_tenants() {
        let store = MemoryConfigStore::new();
        let err = store.list("../etc").await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTenant(_)));
    }

    #[tokio::test]
    async fn file_store_round_trips_through_disk() {
        let temp = TempDir::new().unwrap();
        let store = FileConfigStore::new(temp.path().join("settings"));
        let id = BrowseOptionId::new("DEWEY");

        assert_eq!(
            store.get("college", &id).await.unwrap().shelving_algorithm,
            ShelvingAlgorithm::Dewey
        );
        store.set("college", dewey_only()).await.unwrap();
        store
            .set_feature("college", FeatureFlag::RemoveDuplicates, false)
            .await
            .unwrap();

        // A second handle on the same directory sees the write immediately.
        let reopened = FileConfigStore::new(store.dir());
        assert_eq!(reopened.get("college", &id).await.unwrap(), dewey_only());
        assert!(!reopened
            .feature("college", FeatureFlag::RemoveDuplicates)
            .await
            .unwrap());
        assert!(temp.path().join("settings/college.json").exists());
        assert!(!temp.path().join("settings/college.json.tmp").exists());
    }

    #[tokio::test]
    async fn file_store_rejects_corrupt_documents() {
        let temp = TempDir::new().unwrap();
        tokio::fs::write(temp.path().join("college.json"), b"{not json")
            .await
            .unwrap();
        let store = FileConfigStore::new(temp.path());
        let err = store.list("college").await.unwrap_err();
        assert!(matches!(err, ConfigError::SerializationError(_)));
    }
}
