//! Google Sheets row source.
//!
//! Authentication uses a service-account key file (the JSON downloaded from the
//! cloud console). A signed JWT is exchanged for a short-lived access token, which
//! is then used to read the tab with the Sheets v4 `values` endpoint. Both calls are
//! blocking and made once per fetch; there is no retry.

use super::RowSource;
use crate::error::{Result, SlipError};
use crate::model::Table;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const SHEETS_API: &str = "https://sheets.googleapis.com/";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];
const TOKEN_LIFETIME_SECS: i64 = 3600;
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// The fields of a service-account key file that the token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SlipError::Fetch(format!("cannot read credentials {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SlipError::Fetch(format!("invalid credentials {}: {}", path.display(), e))
        })
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct Claims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

impl Claims {
    fn for_key(key: &ServiceAccountKey, now: i64) -> Self {
        Self {
            iss: key.client_email.clone(),
            scope: SCOPES.join(" "),
            aud: key.token_uri.clone(),
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Reads one tab of one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetsSource {
    sheet_id: String,
    sheet_name: String,
    credentials_path: PathBuf,
}

impl SheetsSource {
    pub fn new(
        sheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        credentials_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sheet_id: sheet_id.into(),
            sheet_name: sheet_name.into(),
            credentials_path: credentials_path.into(),
        }
    }

    fn client() -> Result<Client> {
        Ok(Client::builder().timeout(HTTP_TIMEOUT).build()?)
    }

    fn access_token(&self, client: &Client, key: &ServiceAccountKey) -> Result<String> {
        let claims = Claims::for_key(key, Utc::now().timestamp());
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)?;

        let response: TokenResponse = client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()?
            .error_for_status()?
            .json()?;
        Ok(response.access_token)
    }
}

impl RowSource for SheetsSource {
    fn describe(&self) -> String {
        format!("sheet '{}' of spreadsheet {}", self.sheet_name, self.sheet_id)
    }

    fn fetch(&self) -> Result<Table> {
        let key = ServiceAccountKey::load(&self.credentials_path)?;
        let client = Self::client()?;
        let token = self.access_token(&client, &key)?;
        debug!(account = %key.client_email, "obtained access token");

        let url = values_url(&self.sheet_id, &self.sheet_name)?;
        let range: ValueRange = client
            .get(url)
            .bearer_auth(token)
            .send()?
            .error_for_status()?
            .json()?;

        let table = table_from_values(range.values);
        info!(rows = table.data_rows().len(), source = %self.describe(), "fetched rows");
        Ok(table)
    }
}

/// `https://sheets.googleapis.com/v4/spreadsheets/{id}/values/{range}` with both
/// path segments percent-encoded.
pub fn values_url(sheet_id: &str, sheet_name: &str) -> Result<Url> {
    let mut url =
        Url::parse(SHEETS_API).map_err(|e| SlipError::Fetch(format!("bad API URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| SlipError::Fetch("API URL cannot take a path".into()))?
        .clear()
        .extend(["v4", "spreadsheets", sheet_id, "values", sheet_name]);
    Ok(url)
}

/// Every cell becomes a string. The API leaves out trailing blank cells, so data
/// rows are padded with `""` up to the header width; a blank cell in the sheet
/// then fills its placeholder with nothing. Longer rows are kept as they are.
fn table_from_values(values: Vec<Vec<Value>>) -> Table {
    let width = values.first().map_or(0, Vec::len);
    Table::new(
        values
            .into_iter()
            .map(|row| {
                let mut cells: Vec<String> = row.into_iter().map(cell_text).collect();
                if cells.len() < width {
                    cells.resize(width, String::new());
                }
                cells
            })
            .collect(),
    )
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::fill_text;
    use serde_json::json;

    #[test]
    fn test_values_url_encodes_segments() {
        let url = values_url("abc123", "Pay Roll/2024").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Pay%20Roll%2F2024"
        );
    }

    #[test]
    fn test_table_from_values_stringifies_cells() {
        let values: ValueRange = serde_json::from_value(json!({
            "range": "Sheet1!A1:C3",
            "values": [["Name", "Basic", "Active"], ["Alice", 1000, true], ["Bob"]]
        }))
        .unwrap();
        let table = table_from_values(values.values);
        assert_eq!(
            table,
            Table::from_strs(&[
                &["Name", "Basic", "Active"],
                &["Alice", "1000", "true"],
                &["Bob", "", ""]
            ])
        );
    }

    #[test]
    fn test_blank_trailing_cells_fill_placeholders_with_nothing() {
        let values: ValueRange = serde_json::from_value(json!({
            "values": [["Name", "Basic", "Remarks"], ["Bob", "2000"], ["Cy", "1", "ok", "extra"]]
        }))
        .unwrap();
        let table = table_from_values(values.values);

        let records: Vec<_> = table.records().collect();
        assert_eq!(fill_text("{Name} {Basic} {Remarks}", &records[0]), "Bob 2000 ");
        assert_eq!(table.data_rows()[1].len(), 4);
    }

    #[test]
    fn test_missing_values_is_empty_table() {
        let values: ValueRange = serde_json::from_value(json!({"range": "Sheet1!A1:Z1000"})).unwrap();
        assert!(table_from_values(values.values).has_no_data());
    }

    #[test]
    fn test_claims_cover_both_scopes_for_one_hour() {
        let key = ServiceAccountKey {
            client_email: "bot@project.iam.gserviceaccount.com".into(),
            private_key: String::new(),
            token_uri: DEFAULT_TOKEN_URI.into(),
        };
        let claims = Claims::for_key(&key, 1_000);
        assert_eq!(claims.iss, key.client_email);
        assert_eq!(claims.aud, DEFAULT_TOKEN_URI);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(claims.scope.contains("auth/spreadsheets"));
        assert!(claims.scope.contains("auth/drive"));
    }

    #[test]
    fn test_key_file_defaults_token_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(
            &path,
            r#"{"type": "service_account", "client_email": "a@b.c", "private_key": "pem"}"#,
        )
        .unwrap();

        let key = ServiceAccountKey::load(&path).unwrap();
        assert_eq!(key.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_bad_key_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "{}").unwrap();
        assert!(matches!(ServiceAccountKey::load(&path), Err(SlipError::Fetch(_))));
    }

    #[test]
    fn test_invalid_private_key_fails_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(
            &path,
            r#"{"client_email": "a@b.c", "private_key": "not a pem", "token_uri": "http://127.0.0.1:9/token"}"#,
        )
        .unwrap();

        let source = SheetsSource::new("id", "Sheet1", &path);
        assert!(matches!(source.fetch(), Err(SlipError::Fetch(_))));
    }
}
