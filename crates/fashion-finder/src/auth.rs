//! Google service account authentication
//!
//! Exchanges a service account JSON key for a short-lived bearer token with
//! the generative-language and cloud-platform scopes. The token is forwarded
//! to the Weaviate cluster so its vectorizer modules can call the Google
//! APIs on our behalf.

use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{Error, Result};

/// OAuth scopes requested for the vectorizer token
const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/generative-language",
    "https://www.googleapis.com/auth/cloud-platform",
];

/// Service account authentication manager
pub struct GcpAuth {
    /// Service account key path
    key_path: String,
    /// Cached access token
    token: Arc<RwLock<Option<CachedToken>>>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: std::time::Instant,
}

#[derive(serde::Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    token_uri: String,
}

impl GcpAuth {
    /// Create from a service account JSON key file
    ///
    /// Fails immediately if the key file does not exist, so a misconfigured
    /// deployment dies at startup rather than on the first query.
    pub fn from_service_account(key_path: impl AsRef<Path>) -> Result<Self> {
        let key_path = key_path.as_ref().to_string_lossy().to_string();
        if !Path::new(&key_path).exists() {
            return Err(Error::Config(format!(
                "Service account key not found: {}",
                key_path
            )));
        }

        Ok(Self {
            key_path,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Get a valid access token (refreshing if needed)
    pub async fn token(&self) -> Result<String> {
        {
            let token = self.token.read().await;
            if let Some(ref cached) = *token {
                // Token valid for at least 60 more seconds
                if cached.expires_at
                    > std::time::Instant::now() + std::time::Duration::from_secs(60)
                {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let new_token = self.refresh_token().await?;

        {
            let mut token = self.token.write().await;
            *token = Some(CachedToken {
                access_token: new_token.clone(),
                // Tokens are valid for 1 hour, assume 55 minutes to be safe
                expires_at: std::time::Instant::now() + std::time::Duration::from_secs(55 * 60),
            });
        }

        Ok(new_token)
    }

    /// Refresh the access token using the JWT-bearer grant
    async fn refresh_token(&self) -> Result<String> {
        let key_content = tokio::fs::read_to_string(&self.key_path).await.map_err(|e| {
            Error::Config(format!(
                "Failed to read service account key {}: {}",
                self.key_path, e
            ))
        })?;

        let key: ServiceAccountKey = serde_json::from_str(&key_content)
            .map_err(|e| Error::Config(format!("Invalid service account key format: {}", e)))?;

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| Error::Auth(format!("System clock before epoch: {}", e)))?
            .as_secs() as i64;

        let jwt = sign_jwt(&key, now)?;

        // Exchange the signed assertion for an access token
        let client = reqwest::Client::new();
        let response = client
            .post(&key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &jwt),
            ])
            .send()
            .await
            .map_err(|e| Error::Auth(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "Token exchange failed ({}): {}",
                status, body
            )));
        }

        #[derive(serde::Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Auth(format!("Failed to parse token response: {}", e)))?;

        Ok(token_response.access_token)
    }
}

/// Build the JWT claim set for the service account assertion
fn jwt_claims(client_email: &str, token_uri: &str, now: i64) -> serde_json::Value {
    serde_json::json!({
        "iss": client_email,
        "scope": SCOPES.join(" "),
        "aud": token_uri,
        "iat": now,
        "exp": now + 3600,
    })
}

/// Sign an RS256 JWT assertion with the service account's private key
fn sign_jwt(key: &ServiceAccountKey, now: i64) -> Result<String> {
    use base64::Engine;

    let header = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .encode(r#"{"alg":"RS256","typ":"JWT"}"#.as_bytes());
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .encode(jwt_claims(&key.client_email, &key.token_uri, now).to_string());

    let signing_input = format!("{}.{}", header, payload);

    let private_key = key.private_key.replace("\\n", "\n");
    let key_pair = ring::signature::RsaKeyPair::from_pkcs8(
        pem::parse(&private_key)
            .map_err(|e| Error::Config(format!("Failed to parse private key PEM: {}", e)))?
            .contents(),
    )
    .map_err(|e| Error::Config(format!("Failed to parse private key: {:?}", e)))?;

    let mut signature = vec![0u8; key_pair.public().modulus_len()];
    key_pair
        .sign(
            &ring::signature::RSA_PKCS1_SHA256,
            &ring::rand::SystemRandom::new(),
            signing_input.as_bytes(),
            &mut signature,
        )
        .map_err(|e| Error::Auth(format!("Failed to sign JWT: {:?}", e)))?;

    let signature_b64 = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&signature);
    Ok(format!("{}.{}", signing_input, signature_b64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_file_fails_at_construction() {
        let result = GcpAuth::from_service_account("/nonexistent/key.json");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_claims_request_both_scopes() {
        let claims = jwt_claims(
            "svc@project.iam.gserviceaccount.com",
            "https://oauth2.googleapis.com/token",
            1_700_000_000,
        );

        let scope = claims["scope"].as_str().unwrap();
        assert!(scope.contains("auth/generative-language"));
        assert!(scope.contains("auth/cloud-platform"));
        assert_eq!(claims["iss"], "svc@project.iam.gserviceaccount.com");
        assert_eq!(claims["aud"], "https://oauth2.googleapis.com/token");
        assert_eq!(claims["exp"], 1_700_000_000 + 3600);
    }
}
