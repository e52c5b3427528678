use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::RemoteConfig;
use crate::errors::RemoteError;

pub(crate) const ROW_STORE: &str = "row-store";

/// Query parameters for one table request, rendered in the row-store's
/// filter dialect (`select=…`, `{col}=eq.{value}`, `or=(…)`, `order=…`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".into(), columns.into()));
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.params.push((column.into(), format!("eq.{}", value.to_string())));
        self
    }

    /// `or=(col1.eq."v",col2.eq."v")`: the same quoted value matched
    /// against each column.
    pub fn or_eq(mut self, columns: &[&str], value: &str) -> Self {
        let quoted = format!("\"{}\"", value.replace('"', ""));
        let parts: Vec<String> = columns
            .iter()
            .map(|column| format!("{column}.eq.{quoted}"))
            .collect();
        self.params.push(("or".into(), format!("({})", parts.join(","))));
        self
    }

    pub fn order(mut self, column: &str, descending: bool) -> Self {
        let direction = if descending { "desc" } else { "asc" };
        self.params.push(("order".into(), format!("{column}.{direction}")));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.params.push(("limit".into(), limit.to_string()));
        self
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Thin request layer over the row-store REST endpoint. Table semantics
/// live in [`crate::store`].
pub(crate) struct RestClient {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl RestClient {
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        if config.api_key.trim().is_empty() {
            return Err(RemoteError::Config(
                "row-store client api_key must not be empty".into(),
            ));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Config(format!("failed to build row-store client: {e}")))?;
        Ok(Self { http, config })
    }

    fn request(&self, method: reqwest::Method, table: &str, query: &Query) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.config.rest_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .query(query.params())
    }

    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
    ) -> Result<Vec<T>, RemoteError> {
        let response = self
            .request(reqwest::Method::GET, table, &query)
            .send()
            .await
            .map_err(|e| RemoteError::transport(ROW_STORE, format!("select {table} failed: {e}")))?;
        let response = check_status(table, response).await?;
        let rows: Vec<T> = response.json().await.map_err(|e| {
            RemoteError::protocol(ROW_STORE, format!("select {table} returned invalid rows: {e}"))
        })?;
        debug!(event = "store.select", domain = "store", table = table, rows = rows.len());
        Ok(rows)
    }

    /// Like [`Self::select`] with `limit 1`, returning the first row if any.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
    ) -> Result<Option<T>, RemoteError> {
        let rows = self.select(table, query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert one row and return the stored representation.
    pub async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        row: &B,
    ) -> Result<T, RemoteError> {
        let response = self
            .request(reqwest::Method::POST, table, &Query::new())
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| RemoteError::transport(ROW_STORE, format!("insert {table} failed: {e}")))?;
        let response = check_status(table, response).await?;
        let mut rows: Vec<T> = response.json().await.map_err(|e| {
            RemoteError::protocol(ROW_STORE, format!("insert {table} returned invalid rows: {e}"))
        })?;
        debug!(event = "store.insert", domain = "store", table = table);
        rows.pop().ok_or_else(|| {
            RemoteError::protocol(ROW_STORE, format!("insert {table} returned no row"))
        })
    }

    pub async fn update<B: Serialize>(
        &self,
        table: &str,
        patch: &B,
        query: Query,
    ) -> Result<(), RemoteError> {
        let response = self
            .request(reqwest::Method::PATCH, table, &query)
            .json(patch)
            .send()
            .await
            .map_err(|e| RemoteError::transport(ROW_STORE, format!("update {table} failed: {e}")))?;
        check_status(table, response).await?;
        debug!(event = "store.update", domain = "store", table = table);
        Ok(())
    }

    pub async fn delete(&self, table: &str, query: Query) -> Result<(), RemoteError> {
        let response = self
            .request(reqwest::Method::DELETE, table, &query)
            .send()
            .await
            .map_err(|e| RemoteError::transport(ROW_STORE, format!("delete {table} failed: {e}")))?;
        check_status(table, response).await?;
        debug!(event = "store.delete", domain = "store", table = table);
        Ok(())
    }
}

async fn check_status(
    table: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(RemoteError::service(
        ROW_STORE,
        format!("{table} request failed with status {status}: {body}"),
        Some(status.as_u16()),
    ))
}
