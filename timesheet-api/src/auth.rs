use serde::Serialize;
use thiserror::Error;

pub const SESSION_COOKIE: &str = "sessionid";
pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Cookie based credentials issued by the backend on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub session_id: String,
    pub csrf_token: Option<String>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntoCredentialsError {
    #[error("Missing session id")]
    MissingSessionId,
}

impl TryFrom<&[(String, String)]> for Credentials {
    type Error = IntoCredentialsError;

    fn try_from(cookies: &[(String, String)]) -> Result<Credentials, Self::Error> {
        let find = |name: &str| {
            cookies
                .iter()
                .find(|(cookie_name, value)| cookie_name == name && !value.is_empty())
                .map(|(_, value)| value.clone())
        };

        Ok(Credentials {
            session_id: find(SESSION_COOKIE).ok_or(IntoCredentialsError::MissingSessionId)?,
            csrf_token: find(CSRF_COOKIE),
        })
    }
}

impl Credentials {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            csrf_token: None,
        }
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Name/value pairs, suitable for persisting between runs.
    pub fn cookie_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![(SESSION_COOKIE.to_string(), self.session_id.clone())];
        if let Some(token) = &self.csrf_token {
            pairs.push((CSRF_COOKIE.to_string(), token.clone()));
        }
        pairs
    }

    pub fn as_cookie_header(&self) -> String {
        self.cookie_pairs()
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn credentials_from_cookie_pairs() {
        let cookies = pairs(&[("csrftoken", "tok"), ("sessionid", "abc")]);
        let credentials = Credentials::try_from(cookies.as_slice()).unwrap();
        assert_eq!(credentials.session_id, "abc");
        assert_eq!(credentials.csrf_token.as_deref(), Some("tok"));
    }

    #[test]
    fn missing_session_is_rejected() {
        let cookies = pairs(&[("csrftoken", "tok"), ("sessionid", "")]);
        assert_eq!(
            Credentials::try_from(cookies.as_slice()),
            Err(IntoCredentialsError::MissingSessionId)
        );
    }

    #[test]
    fn cookie_header_joins_pairs() {
        let credentials = Credentials::new("abc").with_csrf_token("tok");
        assert_eq!(credentials.as_cookie_header(), "sessionid=abc; csrftoken=tok");
    }

    #[test]
    fn cookie_pairs_round_trip_through_try_from() {
        let credentials = Credentials::new("abc").with_csrf_token("tok");
        let restored = Credentials::try_from(credentials.cookie_pairs().as_slice()).unwrap();
        assert_eq!(restored, credentials);
    }
}
