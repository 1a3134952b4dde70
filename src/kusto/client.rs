//! HTTP implementation of the Kusto client over the REST API.

use crate::config::ClientCredentials;
use crate::error::KustoError;
use crate::kusto::token::ClientSecretCredential;
use crate::kusto::{ClientFactory, KustoClient, KustoResultSet, is_control_command, response};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;
use url::Url;
use uuid::Uuid;

const APP_NAME: &str = "adx-mcp-server";

#[derive(Serialize)]
struct QueryRequest<'a> {
    db: &'a str,
    csl: &'a str,
}

/// A Kusto client bound to one cluster and one service principal.
pub struct HttpKustoClient {
    cluster_url: String,
    credential: ClientSecretCredential,
    client: Client,
}

impl HttpKustoClient {
    pub fn new(cluster_url: &Url, credential: ClientSecretCredential) -> Result<Self, KustoError> {
        let client = Client::builder()
            .user_agent(concat!("adx-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KustoError::connection(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            cluster_url: cluster_url.as_str().trim_end_matches('/').to_string(),
            credential,
            client,
        })
    }

    /// Endpoint for `query`: v1 management for control commands, v2 otherwise.
    pub fn endpoint_for(&self, query: &str) -> String {
        if is_control_command(query) {
            format!("{}/v1/rest/mgmt", self.cluster_url)
        } else {
            format!("{}/v2/rest/query", self.cluster_url)
        }
    }

    fn map_http_error(status: StatusCode, body: &str) -> KustoError {
        let message = response::error_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        });
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => KustoError::auth(message),
            _ => KustoError::http(status.as_u16(), message),
        }
    }
}

#[async_trait]
impl KustoClient for HttpKustoClient {
    async fn execute(&self, database: &str, query: &str) -> Result<KustoResultSet, KustoError> {
        let token = self
            .credential
            .get_token(
                &self.client,
                &ClientSecretCredential::scope_for(&self.cluster_url),
            )
            .await?;

        let url = self.endpoint_for(query);
        let request_id = format!("{};{}", APP_NAME, Uuid::new_v4());
        debug!(%url, %request_id, "Sending Kusto request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(token.expose_secret())
            .header("x-ms-client-request-id", request_id.as_str())
            .header("x-ms-app", APP_NAME)
            .json(&QueryRequest {
                db: database,
                csl: query,
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Self::map_http_error(status, &body));
        }

        if is_control_command(query) {
            response::parse_v1(&body)
        } else {
            response::parse_v2(&body)
        }
    }
}

/// Creates a new [`HttpKustoClient`] for every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpClientFactory;

impl ClientFactory for HttpClientFactory {
    fn create(
        &self,
        cluster_url: &str,
        credentials: ClientCredentials<'_>,
    ) -> Result<Box<dyn KustoClient>, KustoError> {
        let url = parse_cluster_url(cluster_url)?;
        let credential = ClientSecretCredential::new(
            credentials.authority_host,
            credentials.tenant_id,
            credentials.client_id,
            SecretString::from(credentials.client_secret.expose_secret().to_string()),
        );
        Ok(Box::new(HttpKustoClient::new(&url, credential)?))
    }
}

/// Validate a cluster URL. Only http(s) URLs with a host are accepted.
pub fn parse_cluster_url(cluster_url: &str) -> Result<Url, KustoError> {
    let url = Url::parse(cluster_url.trim())
        .map_err(|e| KustoError::invalid_url(cluster_url, e.to_string()))?;
    if !matches!(url.scheme(), "https" | "http") {
        return Err(KustoError::invalid_url(cluster_url, "scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(KustoError::invalid_url(cluster_url, "missing host"));
    }
    Ok(url)
}
