use serde::{Deserialize, Serialize};
use url::Url;

const MASK: &str = "***";

/// Connection metadata with secrets redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedConnection {
    pub scheme: Option<String>,
    pub user: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub redacted: String,
}

/// Redact the password and secret query parameters of a connection URL.
///
/// Strings that do not parse as URLs are replaced entirely by the mask.
pub fn redact_connection_string(conn: &str) -> RedactedConnection {
    let Ok(mut url) = Url::parse(conn) else {
        return RedactedConnection {
            scheme: None,
            user: None,
            host: None,
            port: None,
            database: None,
            redacted: MASK.to_string(),
        };
    };

    if url.password().is_some() {
        let _ = url.set_password(Some(MASK));
    }

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if is_sensitive_key(&key) {
                MASK.to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    if !pairs.is_empty() {
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }

    let user = Some(url.username())
        .filter(|user| !user.is_empty())
        .map(str::to_string);
    let database = url
        .path()
        .trim_start_matches('/')
        .split('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    RedactedConnection {
        scheme: Some(url.scheme().to_string()),
        user,
        host: url.host_str().map(str::to_string),
        port: url.port(),
        database,
        redacted: url.to_string(),
    }
}

fn is_sensitive_key(key: &str) -> bool {
    matches!(
        key.to_ascii_lowercase().as_str(),
        "password" | "pass" | "pwd" | "token" | "api_key" | "apikey" | "sslpassword"
    )
}
