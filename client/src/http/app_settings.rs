//! App settings of the remote site

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::errors::{ensure_not_blank, KuduError};
use crate::http::client::KuduClient;

/// Settings endpoint
pub const SETTINGS_PATH: &str = "/api/settings";

/// Everything but RFC 3986 unreserved characters
const KEY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

impl KuduClient {
    /// Get all app settings
    pub async fn settings_get(&self) -> Result<HashMap<String, String>, KuduError> {
        self.get_json(SETTINGS_PATH).await
    }

    /// Create or update app settings
    pub async fn settings_set(&self, settings: &HashMap<String, String>) -> Result<(), KuduError> {
        self.post_json_unit(SETTINGS_PATH, settings).await
    }

    /// Delete one app setting
    pub async fn settings_delete(&self, key: &str) -> Result<(), KuduError> {
        ensure_not_blank(key, "key")?;
        self.delete(&setting_path(key)).await
    }
}

fn setting_path(key: &str) -> String {
    format!("{}/{}", SETTINGS_PATH, utf8_percent_encode(key, KEY_ESCAPE))
}
