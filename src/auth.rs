use rocket::http::Status;
use rocket::request::{self, FromRequest, Outcome};
use rocket::Request;

use crate::error::ApiError;
use crate::util::Config;

/// Credential pair carried by an `Authorization: Basic` header.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parses `Basic base64(username:password)`. Anything malformed is
    /// treated the same as absent credentials.
    pub fn from_header(header: &str) -> Option<Self> {
        let encoded = header.strip_prefix("Basic ")?;
        let decoded = base64::decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// The credential policy guarding the task routes. Any boolean check over
/// a username/password pair fits behind it.
pub struct Gate {
    policy: Box<dyn Fn(&str, &str) -> bool + Send + Sync>,
}

impl Gate {
    pub fn new<F>(policy: F) -> Self
    where
        F: Fn(&str, &str) -> bool + Send + Sync + 'static,
    {
        Gate {
            policy: Box::new(policy),
        }
    }

    /// Single accepted pair, taken from the app config.
    pub fn from_config(config: &Config) -> Self {
        let user = config.api_username.clone();
        let pass = config.api_password.clone();
        Self::new(move |u, p| u == user && p == pass)
    }

    pub fn allows(&self, credentials: &Credentials) -> bool {
        (self.policy)(&credentials.username, &credentials.password)
    }
}

/// Request guard required by every task route; a request only reaches a
/// handler once its credentials clear the managed [`Gate`].
#[derive(Debug)]
pub struct AuthUser {
    pub user: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthUser {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let allowed = req
            .headers()
            .get_one("Authorization")
            .and_then(Credentials::from_header)
            .and_then(|credentials| {
                let gate = req.rocket().state::<Gate>()?;
                gate.allows(&credentials).then(|| credentials)
            });

        match allowed {
            Some(credentials) => Outcome::Success(AuthUser {
                user: credentials.username,
            }),
            None => Outcome::Error((Status::Unauthorized, ApiError::Unauthorized)),
        }
    }
}

#[catch(401)]
pub fn unauthorized() -> ApiError {
    ApiError::Unauthorized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            store_location: "tasks.json".into(),
            api_username: "miguel".into(),
            api_password: "python".into(),
        }
    }

    #[test]
    fn parses_basic_header() {
        let header = format!("Basic {}", base64::encode("miguel:python"));
        let credentials = Credentials::from_header(&header).unwrap();
        assert_eq!(credentials.username, "miguel");
        assert_eq!(credentials.password, "python");
    }

    #[test]
    fn keeps_colons_in_password() {
        let header = format!("Basic {}", base64::encode("miguel:py:thon"));
        let credentials = Credentials::from_header(&header).unwrap();
        assert_eq!(credentials.password, "py:thon");
    }

    #[test]
    fn rejects_garbage_headers() {
        assert_eq!(Credentials::from_header("Bearer abc"), None);
        assert_eq!(Credentials::from_header("Basic !!!"), None);
        let no_colon = format!("Basic {}", base64::encode("miguel"));
        assert_eq!(Credentials::from_header(&no_colon), None);
    }

    #[test]
    fn gate_checks_the_configured_pair() {
        let gate = Gate::from_config(&config());
        let good = Credentials {
            username: "miguel".into(),
            password: "python".into(),
        };
        let bad = Credentials {
            username: "miguel".into(),
            password: "ruby".into(),
        };
        assert!(gate.allows(&good));
        assert!(!gate.allows(&bad));
    }

    #[test]
    fn gate_takes_any_policy() {
        let gate = Gate::new(|user, _| user.starts_with("m"));
        let odd = Credentials {
            username: "maria".into(),
            password: "anything".into(),
        };
        assert!(gate.allows(&odd));
    }
}
