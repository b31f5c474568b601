use crate::domain::BrowseDomain;
use crate::error::{BrowseError, Result};
use crate::filter::IrrelevantResultFilter;
use crate::highlight::Highlighter;
use crate::port::DirectionalQueryPort;
use crate::query::BrowseQuery;
use crate::settings::EngineSettings;
use crate::window::BrowseWindowMerger;
use browse_config::{BrowseConfig, BrowseConfigStore, FeatureFlag};
use browse_protocol::{BrowseField, BrowseOptionId, BrowseResult};
use browse_shelf_key::ShelvingAlgorithm;
use std::sync::Arc;
use std::time::Instant;

/// Entry point for browse requests: config resolution, windowing and
/// post-processing.
///
/// ```text
/// BrowseQuery ─> validate ─> BrowseConfigStore ─> BrowseWindowMerger
///                                                     │
///   BrowseResult <─ Highlighter <─ IrrelevantResultFilter
/// ```
pub struct BrowseService {
    store: Arc<dyn BrowseConfigStore>,
    settings: EngineSettings,
}

impl BrowseService {
    pub fn new(store: Arc<dyn BrowseConfigStore>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Browse config governing `field` for `tenant`.
    ///
    /// Heading fields have no shelving schemes and only accept the `ALL` option.
    pub async fn resolve_config(
        &self,
        field: BrowseField,
        tenant: &str,
        option: &BrowseOptionId,
    ) -> Result<BrowseConfig> {
        if field.is_typed() {
            return Ok(self.store.get(tenant, option).await?);
        }
        if !option.is_all() {
            return Err(BrowseError::validation(
                "browseOptionId",
                option,
                format!("{field} browsing does not support browse options"),
            ));
        }
        Ok(BrowseConfig::new(BrowseOptionId::all(), ShelvingAlgorithm::Generic))
    }

    /// Defaults the intermediate-value and collapse flags from tenant features.
    pub async fn resolve_query_flags(&self, query: &mut BrowseQuery) -> Result<()> {
        let tenant = query.scope.tenant_id.clone();
        query.intermediate_values_enabled =
            self.store.feature(&tenant, FeatureFlag::IntermediateValues).await?;
        query.collapse_duplicates = self.store.feature(&tenant, FeatureFlag::RemoveDuplicates).await?;
        Ok(())
    }

    /// Normalizes a raw anchor with the algorithm of the resolved option.
    pub async fn anchor_key<D: BrowseDomain>(
        &self,
        domain: &D,
        tenant: &str,
        option: &BrowseOptionId,
        raw: &str,
    ) -> Result<String> {
        let config = self.resolve_config(domain.field(), tenant, option).await?;
        Ok(domain.anchor_key(raw, config.shelving_algorithm))
    }

    pub async fn browse<D, P>(
        &self,
        domain: &D,
        port: &P,
        query: &BrowseQuery,
    ) -> Result<BrowseResult<D::Record>>
    where
        D: BrowseDomain,
        P: DirectionalQueryPort<D::Record> + ?Sized,
    {
        query.validate(&self.settings)?;
        let started = Instant::now();
        let config = self
            .resolve_config(domain.field(), &query.scope.tenant_id, &query.browse_option)
            .await?;

        let merger = BrowseWindowMerger::new(domain, port, &self.settings);
        let mut result = match merger.merge(query, &config).await {
            Ok(result) => result,
            Err(err) => {
                log::warn!("Browse {} '{}' failed: {err}", domain.field(), query.anchor);
                return Err(err);
            }
        };
        result.items =
            IrrelevantResultFilter::apply(result.items, &config, query.intermediate_values_enabled);
        Highlighter::new(&self.settings.highlight).apply(
            &mut result.items,
            query.highlight_match,
            query.expand_all,
        );

        log::info!(
            "Browsed {} {} option {} for tenant {} in {:?}: {} items of {}",
            domain.field(),
            query.mode,
            config.id,
            query.scope.tenant_id,
            started.elapsed(),
            result.items.len(),
            result.total_records
        );
        Ok(result)
    }
}
