//! DHIS2 HTTP client
//!
//! Thin reqwest wrapper over the two tracker endpoints the submitter
//! uses, with basic-auth credentials kept behind `secrecy` until the
//! header is built.

use super::models::ImportResponse;
use crate::config::schema::Dhis2Config;
use crate::domain::tracked::{TrackedEntityPayload, TransformedEvent};
use crate::domain::{Dhis2Error, Result, TransitError};
use base64::Engine;
use secrecy::ExposeSecret;
use std::time::Duration;

/// Client for the DHIS2 web API
pub struct Dhis2Client {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: crate::config::SecretString,
}

impl Dhis2Client {
    /// Creates a new DHIS2 client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base url is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &Dhis2Config) -> Result<Self> {
        let parsed = url::Url::parse(&config.base_url).map_err(|e| {
            TransitError::Configuration(format!("Invalid DHIS2 base url: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransitError::Configuration(format!(
                "DHIS2 base url must be http(s), got {}",
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                TransitError::Dhis2(Dhis2Error::ConnectionFailed(format!(
                    "Failed to build HTTP client: {e}"
                )))
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Builds the basic authorization header value
    fn auth_header(&self) -> String {
        let credentials = format!(
            "{}:{}",
            self.username,
            self.password.expose_secret().as_ref()
        );
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
        format!("Basic {encoded}")
    }

    /// Pings the server's system info endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or rejects the
    /// credentials.
    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/api/system/info", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(connection_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            Err(Dhis2Error::AuthenticationFailed(format!("Server returned {status}")).into())
        } else {
            Err(Dhis2Error::ConnectionFailed(format!("Health check returned {status}")).into())
        }
    }

    /// Creates (or upserts) a tracked entity and returns its reference
    ///
    /// # Errors
    ///
    /// Returns [`Dhis2Error::ConnectionFailed`] on transport failures
    /// (run-fatal) and [`Dhis2Error::ImportRejected`] /
    /// [`Dhis2Error::InvalidResponse`] on import failures (scoped to the
    /// unit being submitted).
    pub async fn post_tracked_entity(&self, payload: &TrackedEntityPayload) -> Result<String> {
        let url = format!("{}/api/trackedEntityInstances", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(payload)
            .send()
            .await
            .map_err(connection_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Dhis2Error::AuthenticationFailed(format!(
                "Server returned {status}"
            ))
            .into());
        }

        let body: ImportResponse = response.json().await.map_err(|e| {
            Dhis2Error::InvalidResponse(format!("Unparseable import response: {e}"))
        })?;

        let summary = body.first_summary().ok_or_else(|| {
            Dhis2Error::InvalidResponse("Import response carried no summary".to_string())
        })?;

        if summary.status.as_deref() == Some("ERROR") || !status.is_success() {
            return Err(Dhis2Error::ImportRejected {
                status: status.as_u16(),
                message: summary
                    .description
                    .clone()
                    .unwrap_or_else(|| "no description".to_string()),
            }
            .into());
        }

        summary.reference.clone().ok_or_else(|| {
            Dhis2Error::InvalidResponse("Import summary carried no reference".to_string()).into()
        })
    }

    /// Submits one event, already carrying its entity reference
    ///
    /// # Errors
    ///
    /// Same split as [`Self::post_tracked_entity`]: transport failures
    /// are run-fatal, rejections are unit-scoped.
    pub async fn post_event(&self, event: &TransformedEvent) -> Result<()> {
        let url = format!("{}/api/events", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(event)
            .send()
            .await
            .map_err(connection_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        Err(Dhis2Error::ImportRejected {
            status: status.as_u16(),
            message,
        }
        .into())
    }

    /// The configured base url
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn connection_error(e: reqwest::Error) -> TransitError {
    Dhis2Error::ConnectionFailed(e.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn config(base_url: &str) -> Dhis2Config {
        Dhis2Config {
            base_url: base_url.to_string(),
            username: "admin".to_string(),
            password: Secret::new(crate::config::SecretValue::from("district".to_string())),
            timeout_seconds: 30,
        }
    }

    #[test]
    fn test_client_creation_and_url_normalization() {
        let client = Dhis2Client::new(&config("https://play.dhis2.org/demo/")).unwrap();
        assert_eq!(client.base_url(), "https://play.dhis2.org/demo");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(Dhis2Client::new(&config("not a url")).is_err());
        assert!(Dhis2Client::new(&config("ftp://host")).is_err());
    }

    #[test]
    fn test_auth_header_is_basic_base64() {
        let client = Dhis2Client::new(&config("https://play.dhis2.org/demo")).unwrap();
        let header = client.auth_header();
        assert!(header.starts_with("Basic "));
        // "admin:district" base64-encoded, matching the wire format
        assert_eq!(header, "Basic YWRtaW46ZGlzdHJpY3Q=");
    }
}
