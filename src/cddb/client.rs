use std::{fmt, str::FromStr};

use reqwest::blocking::{Client, ClientBuilder};

use super::{error::CddbError, response};
use crate::domain::{
    disc::DiscFingerprint,
    metadata::{CandidateRecord, TrackListing},
};

/// Protocol level 6 returns UTF-8 text.
const PROTO_LEVEL: &str = "6";

/// HTTP client identification, `name/version` as in RFC 1945 §3.7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub name: String,
    pub version: String,
}

impl FromStr for ClientIdentity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        match token.split_once('/') {
            Some((name, version))
                if !name.is_empty()
                    && !version.is_empty()
                    && !token.contains(char::is_whitespace)
                    && !version.contains('/') =>
            {
                Ok(Self {
                    name: name.to_string(),
                    version: version.to_string(),
                })
            }
            _ => Err(format!("expected `name/version`, got {token:?}")),
        }
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Blocking client for the CDDB-over-HTTP protocol spoken by freedb mirrors.
pub struct CddbClient {
    http: Client,
    mirror: String,
    hello: String,
}

impl CddbClient {
    pub fn new(mirror: &str, identity: &ClientIdentity) -> Result<Self, CddbError> {
        Self::with_builder(Client::builder(), mirror, identity)
    }

    pub(crate) fn with_builder(
        builder: ClientBuilder,
        mirror: &str,
        identity: &ClientIdentity,
    ) -> Result<Self, CddbError> {
        let http = builder.user_agent(identity.to_string()).build()?;
        Ok(Self {
            http,
            mirror: mirror.to_string(),
            hello: hello_string(identity),
        })
    }

    /// Looks up the candidates matching a disc fingerprint.
    pub fn query_disc(
        &self,
        fingerprint: &DiscFingerprint,
    ) -> Result<Vec<CandidateRecord>, CddbError> {
        let offsets = fingerprint
            .offsets
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let cmd = format!(
            "cddb query {} {} {} {}",
            fingerprint.id, fingerprint.track_count, offsets, fingerprint.length_seconds
        );

        let candidates = response::parse_query(&self.command(&cmd)?)?;
        log::info!(
            "{} CDDB match(es) for disc {}",
            candidates.len(),
            fingerprint.id
        );
        Ok(candidates)
    }

    /// Fetches the track titles of one candidate.
    ///
    /// Callers must space consecutive calls with a
    /// [`Throttle`](super::throttle::Throttle).
    pub fn query_tracks(
        &self,
        candidate: &CandidateRecord,
        track_count: usize,
    ) -> Result<TrackListing, CddbError> {
        let cmd = format!("cddb read {} {}", candidate.category, candidate.disc_id);
        response::parse_read(&self.command(&cmd)?, track_count)
    }

    fn command(&self, cmd: &str) -> Result<String, CddbError> {
        log::debug!("CDDB {} <- {cmd}", self.mirror);

        let response = self
            .http
            .get(&self.mirror)
            .query(&[("cmd", cmd), ("hello", self.hello.as_str()), ("proto", PROTO_LEVEL)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CddbError::Service {
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }
}

/// `hello=<user> <host> <client> <version>` handshake value.
fn hello_string(identity: &ClientIdentity) -> String {
    let from_env = |keys: &[&str], fallback: &str| {
        keys.iter()
            .find_map(|key| std::env::var(key).ok())
            .map(|value| value.split_whitespace().collect::<Vec<_>>().join("_"))
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    };
    let user = from_env(&["USER", "USERNAME"], "anonymous");
    let host = from_env(&["HOSTNAME", "COMPUTERNAME"], "localhost");

    format!("{user} {host} {} {}", identity.name, identity.version)
}
