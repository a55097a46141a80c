//! Azure Blob service SAS tokens, signed locally with the account key.
//!
//! Tokens are read-only, HTTPS-only and scoped to a single blob.
//!
//! See: <https://learn.microsoft.com/en-us/rest/api/storageservices/create-service-sas>

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use crate::core::error::StorageError;

type HmacSha256 = Hmac<Sha256>;

pub const SAS_VERSION: &str = "2021-08-06";
const READ_PERMISSION: &str = "r";
const BLOB_RESOURCE: &str = "b";
const HTTPS_ONLY: &str = "https";

/// Signs read URLs for blobs in one container
#[derive(Clone)]
pub struct SasSigner {
    account: String,
    container: String,
    key: Vec<u8>,
    blob_endpoint: String,
}

impl std::fmt::Debug for SasSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SasSigner")
            .field("account", &self.account)
            .field("container", &self.container)
            .field("blob_endpoint", &self.blob_endpoint)
            .finish_non_exhaustive()
    }
}

impl SasSigner {
    /// `account_key` is the base64 key from the storage account's access keys
    pub fn new(
        account: impl Into<String>,
        account_key: &str,
        container: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let account = account.into();
        let key = BASE64.decode(account_key.trim()).map_err(|e| {
            StorageError::Configuration(format!("Storage account key is not valid base64: {e}"))
        })?;
        Ok(Self {
            blob_endpoint: format!("https://{account}.blob.core.windows.net"),
            account,
            container: container.into(),
            key,
        })
    }

    /// Replace the public blob endpoint (emulators, private links)
    pub fn with_blob_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.blob_endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Unsigned URL of `blob`
    pub fn blob_url(&self, blob: &str) -> String {
        format!("{}/{}/{}", self.blob_endpoint, self.container, blob)
    }

    fn canonical_resource(&self, blob: &str) -> String {
        format!("/blob/{}/{}/{}", self.account, self.container, blob)
    }

    /// Canonical string-to-sign for a read-only blob SAS
    pub fn string_to_sign(&self, blob: &str, expiry: &str) -> String {
        [
            READ_PERMISSION,
            "", // start
            expiry,
            &self.canonical_resource(blob),
            "", // stored access policy
            "", // ip range
            HTTPS_ONLY,
            SAS_VERSION,
            BLOB_RESOURCE,
            "", // snapshot
            "", // encryption scope
            "", // rscc
            "", // rscd
            "", // rsce
            "", // rscl
            "", // rsct
        ]
        .join("\n")
    }

    fn sign(&self, string_to_sign: &str) -> Result<String, StorageError> {
        let mut mac = HmacSha256::new_from_slice(&self.key).map_err(|e| {
            StorageError::Configuration(format!("Invalid storage account key: {e}"))
        })?;
        mac.update(string_to_sign.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    /// Read-only URL for `blob` valid until `expires_at`
    pub fn signed_url(&self, blob: &str, expires_at: DateTime<Utc>) -> Result<String, StorageError> {
        let expiry = expires_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        let signature = self.sign(&self.string_to_sign(blob, &expiry))?;

        let mut url = Url::parse(&self.blob_url(blob)).map_err(|e| StorageError::Signing {
            key: blob.to_string(),
            message: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("sv", SAS_VERSION)
            .append_pair("sr", BLOB_RESOURCE)
            .append_pair("sp", READ_PERMISSION)
            .append_pair("se", &expiry)
            .append_pair("spr", HTTPS_ONLY)
            .append_pair("sig", &signature);

        Ok(url.into())
    }
}
