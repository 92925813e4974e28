// src/resolve.rs
//! Version resolution against a package registry.

#![deny(missing_docs)]

use crate::error::LookupError;
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Constraint used when the latest version cannot be looked up.
pub const FALLBACK_CONSTRAINT: &str = "latest";

/// Source of "latest published version" answers.
#[async_trait]
pub trait VersionLookup: Send + Sync {
    /// Latest version of `package`, e.g. `8.57.0`.
    async fn latest_version(&self, package: &str) -> Result<String, LookupError>;
}

/// Looks versions up in an npm-compatible registry.
pub struct NpmRegistry {
    client: Client,
    base_url: String,
}

impl NpmRegistry {
    /// Client for the registry at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Like [`NpmRegistry::new`], sending requests through `client`.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Document URL for `package`; the scope separator is escaped.
    pub fn package_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, package.replace('/', "%2F"))
    }
}

#[async_trait]
impl VersionLookup for NpmRegistry {
    async fn latest_version(&self, package: &str) -> Result<String, LookupError> {
        let fail = |message: String| LookupError {
            package: package.to_string(),
            message,
        };

        let url = self.package_url(package);
        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| fail(e.to_string()))?;
        let body: Value = response.json().await.map_err(|e| fail(e.to_string()))?;
        latest_from_document(package, &body)
    }
}

/// Read `dist-tags.latest` out of a registry package document.
pub fn latest_from_document(package: &str, doc: &Value) -> Result<String, LookupError> {
    let fail = |message: &str| LookupError {
        package: package.to_string(),
        message: message.to_string(),
    };

    let tags = doc
        .get("dist-tags")
        .and_then(Value::as_object)
        .ok_or_else(|| fail("registry document has no dist-tags"))?;
    match tags.get("latest") {
        Some(Value::String(version)) if !version.is_empty() => Ok(version.clone()),
        Some(_) => Err(fail("dist-tags.latest is not a version string")),
        None => Err(fail("registry document has no dist-tags.latest")),
    }
}

/// Resolve every distinct name to `^<latest>`, or to [`FALLBACK_CONSTRAINT`]
/// when its lookup fails. All lookups run concurrently and this never fails.
pub async fn resolve<I>(lookup: &dyn VersionLookup, names: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = String>,
{
    let names: BTreeSet<String> = names.into_iter().collect();

    let lookups = names.iter().map(|name| async move {
        let constraint = match lookup.latest_version(name).await {
            Ok(version) => format!("^{version}"),
            Err(e) => {
                tracing::debug!(error = %e, "falling back to {FALLBACK_CONSTRAINT}");
                FALLBACK_CONSTRAINT.to_string()
            }
        };
        (name.clone(), constraint)
    });

    join_all(lookups).await.into_iter().collect()
}
