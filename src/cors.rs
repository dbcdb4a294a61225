use std::collections::HashSet;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Method, Status};
use rocket::request::{FromRequest, Outcome};
use rocket::{catch, Request, Response};

/// Origin allow-list. Managed as state for the [`CheckedOrigin`] guard and
/// attached as a fairing that adds CORS headers for accepted origins.
/// Credentials are allowed, as is any method or header.
#[derive(Clone, Debug)]
pub struct Cors {
    allowed_origins: HashSet<String>,
}

impl Cors {
    pub fn new<I, S>(allowed_origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_origins: allowed_origins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.allowed_origins.contains(origin)
    }

    /// Listed origins, plus the server's own origin as named by `Host`.
    fn accepts(&self, request: &Request<'_>, origin: &str) -> bool {
        self.allows(origin) || is_same_origin(request, origin)
    }
}

fn is_same_origin(request: &Request<'_>, origin: &str) -> bool {
    let host = match request.headers().get_one("Host") {
        Some(host) => host,
        None => return false,
    };
    let authority = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"));
    authority == Some(host)
}

#[derive(Debug)]
pub enum CorsError {
    OriginNotAllowed,
    MissingPolicy,
}

impl std::fmt::Display for CorsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorsError::OriginNotAllowed => write!(f, "origin is not allowed"),
            CorsError::MissingPolicy => write!(f, "no CORS policy is managed"),
        }
    }
}

/// Guard for every route: a request whose `Origin` is not accepted fails
/// with 403 before the handler or its data guard runs.
pub struct CheckedOrigin;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CheckedOrigin {
    type Error = CorsError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let origin = match request.headers().get_one("Origin") {
            Some(origin) => origin,
            None => return Outcome::Success(CheckedOrigin),
        };

        match request.rocket().state::<Cors>() {
            Some(cors) if cors.accepts(request, origin) => Outcome::Success(CheckedOrigin),
            Some(_) => {
                tracing::debug!(
                    origin,
                    method = %request.method(),
                    "rejected cross-origin request"
                );
                Outcome::Error((Status::Forbidden, CorsError::OriginNotAllowed))
            }
            None => Outcome::Error((Status::InternalServerError, CorsError::MissingPolicy)),
        }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS origin allow-list",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        let origin = match request.headers().get_one("Origin") {
            Some(origin) => origin,
            None => return,
        };
        if !self.allows(origin) {
            return;
        }

        response.set_header(Header::new("Access-Control-Allow-Origin", origin.to_owned()));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
        response.adjoin_header(Header::new("Vary", "Origin"));

        let requested_method = request.headers().get_one("Access-Control-Request-Method");
        if request.method() != Method::Options {
            return;
        }
        if let Some(method) = requested_method {
            response.set_header(Header::new("Access-Control-Allow-Methods", method.to_owned()));
        }
        if let Some(headers) = request.headers().get_one("Access-Control-Request-Headers") {
            response.set_header(Header::new("Access-Control-Allow-Headers", headers.to_owned()));
        }
    }
}

/// Answers every preflight; the fairing decides what it carries.
#[rocket::options("/<_..>")]
pub fn preflight(_origin: CheckedOrigin) {}

#[catch(403)]
pub fn forbidden() -> &'static str {
    "Invalid CORS request"
}
