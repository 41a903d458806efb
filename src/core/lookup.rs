use crate::adapters::HttpTransport;
use crate::config::toml_config::validate_lookup_settings;
use crate::core::codes::{bic, isin, lei};
use crate::core::mapping::{parse_page, Page};
use crate::domain::model::{BatchReport, EntityRecord};
use crate::domain::ports::{ConfigProvider, Transport};
use crate::utils::error::{LeiError, Result};
use futures::stream::{self, StreamExt};
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

const ERROR_BODY_LIMIT: usize = 200;

/// Registry query dimensions, rendered as `filter[...]` query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFilter {
    LeiCode,
    Bic,
    Isin,
    LegalName,
    FullText,
    /// Any other GLEIF filter path, e.g. `entity.legalAddress.country`.
    Custom(String),
}

impl LookupFilter {
    pub fn param(&self) -> Cow<'static, str> {
        match self {
            LookupFilter::LeiCode => Cow::Borrowed("filter[lei]"),
            LookupFilter::Bic => Cow::Borrowed("filter[bic]"),
            LookupFilter::Isin => Cow::Borrowed("filter[isin]"),
            LookupFilter::LegalName => Cow::Borrowed("filter[entity.legalName]"),
            LookupFilter::FullText => Cow::Borrowed("filter[fulltext]"),
            LookupFilter::Custom(path) => Cow::Owned(format!("filter[{}]", path)),
        }
    }
}

/// Client for the GLEIF `lei-records` endpoint.
///
/// Inputs that fail the relevant code validator are answered locally as
/// absent and never sent. Nothing is cached and nothing is retried.
pub struct LeiLookup<T: Transport = HttpTransport> {
    transport: T,
    base_url: Url,
    batch_size: usize,
    concurrent_requests: usize,
    page_size: usize,
    max_pages: usize,
}

impl LeiLookup<HttpTransport> {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Self::with_transport(transport, config)
    }
}

impl<T: Transport> LeiLookup<T> {
    /// Fails with a configuration error when the settings are out of range,
    /// e.g. a `batch_size` above the registry's page limit.
    pub fn with_transport<C: ConfigProvider>(transport: T, config: &C) -> Result<Self> {
        validate_lookup_settings(config)?;

        let base_url =
            Url::parse(config.base_url()).map_err(|e| LeiError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: config.base_url().to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            transport,
            base_url,
            batch_size: config.batch_size(),
            concurrent_requests: config.concurrent_requests(),
            page_size: config.page_size(),
            max_pages: config.max_pages(),
        })
    }

    pub async fn get_lei_by_lei_code(&self, code: &str) -> Result<Option<EntityRecord>> {
        if !lei::is_valid(code) {
            tracing::debug!("Skipping lookup of invalid LEI '{}'", code);
            return Ok(None);
        }
        self.first_match(&LookupFilter::LeiCode, code).await
    }

    /// Like [`get_lei_by_lei_code`](Self::get_lei_by_lei_code) but absence is an error.
    pub async fn require_lei(&self, code: &str) -> Result<EntityRecord> {
        self.get_lei_by_lei_code(code)
            .await?
            .ok_or_else(|| LeiError::NotFound {
                code: code.to_string(),
            })
    }

    /// Resolves many LEI codes, deduplicated, in batches issued concurrently.
    pub async fn get_lei_by_lei_codes<I, S>(&self, codes: I) -> BatchReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BatchReport::default();
        let mut seen = HashSet::new();
        let mut pending = Vec::new();

        for code in codes {
            let code = code.as_ref();
            if !seen.insert(code.to_string()) {
                continue;
            }
            if lei::is_valid(code) {
                pending.push(code.to_string());
            } else {
                report.invalid.push(code.to_string());
            }
        }

        let batches: Vec<Vec<String>> = pending
            .chunks(self.batch_size)
            .map(<[String]>::to_vec)
            .collect();

        tracing::debug!(
            "Resolving {} LEI codes in {} batches ({} invalid skipped)",
            pending.len(),
            batches.len(),
            report.invalid.len()
        );

        let partials: Vec<BatchReport> = stream::iter(batches)
            .map(|batch| self.resolve_batch(batch))
            .buffer_unordered(self.concurrent_requests)
            .collect()
            .await;

        for partial in partials {
            report.merge(partial);
        }

        tracing::info!(
            "LEI batch lookup: {} found, {} not found, {} invalid, {} failed",
            report.found.len(),
            report.not_found.len(),
            report.invalid.len(),
            report.failed.len()
        );

        report
    }

    pub async fn get_lei_by_bic(&self, code: &str) -> Result<Option<EntityRecord>> {
        if !bic::is_valid(code) {
            tracing::debug!("Skipping lookup of invalid BIC '{}'", code);
            return Ok(None);
        }
        self.first_match(&LookupFilter::Bic, code).await
    }

    pub async fn get_lei_by_isin(&self, code: &str) -> Result<Option<EntityRecord>> {
        if !isin::is_valid(code) {
            tracing::debug!("Skipping lookup of invalid ISIN '{}'", code);
            return Ok(None);
        }
        self.first_match(&LookupFilter::Isin, code).await
    }

    /// All entities whose legal name matches, across result pages.
    pub async fn get_lei_by_legal_name(&self, name: &str) -> Result<Vec<EntityRecord>> {
        if name.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.find(&LookupFilter::LegalName, name).await
    }

    /// Runs an arbitrary registry filter, following pagination up to `max_pages`.
    pub async fn find(&self, filter: &LookupFilter, value: &str) -> Result<Vec<EntityRecord>> {
        let mut records = Vec::new();

        for page_number in 1..=self.max_pages {
            let Some(page) = self
                .fetch_page(filter, value, page_number, self.page_size)
                .await?
            else {
                return Ok(records);
            };

            let has_next = page.has_next();
            let count = page.records.len();
            for record in page.records {
                records.push(record?);
            }

            if !has_next || count == 0 {
                return Ok(records);
            }
        }

        if !records.is_empty() {
            tracing::warn!(
                "Stopped after {} pages for {}={}; results are truncated",
                self.max_pages,
                filter.param(),
                value
            );
        }

        Ok(records)
    }

    /// [`find`](Self::find) narrowed by a predicate over the mapped records.
    pub async fn find_where<P>(
        &self,
        filter: &LookupFilter,
        value: &str,
        predicate: P,
    ) -> Result<Vec<EntityRecord>>
    where
        P: Fn(&EntityRecord) -> bool,
    {
        let records = self.find(filter, value).await?;
        Ok(records.into_iter().filter(|r| predicate(r)).collect())
    }

    async fn first_match(&self, filter: &LookupFilter, value: &str) -> Result<Option<EntityRecord>> {
        match self.fetch_page(filter, value, 1, 1).await? {
            Some(page) => page.records.into_iter().next().transpose(),
            None => Ok(None),
        }
    }

    async fn resolve_batch(&self, codes: Vec<String>) -> BatchReport {
        let mut report = BatchReport::default();
        let joined = codes.join(",");

        let page = match self
            .fetch_page(&LookupFilter::LeiCode, &joined, 1, codes.len())
            .await
        {
            Ok(Some(page)) => page,
            Ok(None) => {
                report.not_found = codes;
                return report;
            }
            Err(e) => {
                tracing::warn!("Batch of {} LEI codes failed: {}", codes.len(), e);
                let shared = Arc::new(e);
                report.failed = codes
                    .into_iter()
                    .map(|code| (code, Arc::clone(&shared)))
                    .collect();
                return report;
            }
        };

        let mut outstanding: HashSet<String> = codes.iter().cloned().collect();

        for record in page.records {
            match record {
                Ok(record) => {
                    if outstanding.remove(record.code()) {
                        report.found.push(record);
                    } else {
                        tracing::debug!("Ignoring unrequested or repeated record {}", record.code());
                    }
                }
                Err(LeiError::Mapping { code, field, reason }) if outstanding.contains(&code) => {
                    outstanding.remove(&code);
                    tracing::warn!("Record {} could not be mapped: {} {}", code, field, reason);
                    let error = LeiError::Mapping {
                        code: code.clone(),
                        field,
                        reason,
                    };
                    report.failed.push((code, Arc::new(error)));
                }
                Err(e) => tracing::warn!("Dropping unattributable record: {}", e),
            }
        }

        // keep input order for identifiers the registry did not return
        report.not_found = codes
            .into_iter()
            .filter(|code| outstanding.contains(code))
            .collect();

        report
    }

    async fn fetch_page(
        &self,
        filter: &LookupFilter,
        value: &str,
        page_number: usize,
        page_size: usize,
    ) -> Result<Option<Page>> {
        let url = self.records_url(filter, value, page_number, page_size)?;
        let response = self.transport.get(&url).await?;

        if response.status == 404 {
            return Ok(None);
        }

        if !response.is_success() {
            return Err(LeiError::HttpStatus {
                status: response.status,
                body: response.body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        parse_page(&response.body).map(Some)
    }

    fn records_url(
        &self,
        filter: &LookupFilter,
        value: &str,
        page_number: usize,
        page_size: usize,
    ) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LeiError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push("lei-records");

        url.query_pairs_mut()
            .append_pair(&filter.param(), value)
            .append_pair("page[size]", &page_size.to_string())
            .append_pair("page[number]", &page_number.to_string());

        Ok(url)
    }
}
