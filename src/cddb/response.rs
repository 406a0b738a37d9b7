//! Parsing of CDDB protocol responses.
//!
//! A response starts with a status line `<code> <text>`. Multi-line bodies
//! follow and end with a line holding a single `.`.

use std::collections::BTreeMap;

use super::error::CddbError;
use crate::domain::metadata::{CandidateRecord, TrackListing};

/// CDDB response codes the client reacts to
pub mod codes {
    pub const EXACT_MATCH: u16 = 200;
    pub const NO_MATCH: u16 = 202;
    /// Multiple exact matches, or the read entry that follows
    pub const ENTRY_FOLLOWS: u16 = 210;
    pub const INEXACT_MATCHES: u16 = 211;
}

struct Response<'a> {
    code: u16,
    text: &'a str,
    body: Vec<&'a str>,
}

fn split_response(raw: &str) -> Result<Response<'_>, CddbError> {
    let mut lines = raw.lines().map(|line| line.trim_end_matches('\r'));

    let status = lines
        .next()
        .ok_or_else(|| CddbError::Malformed("empty response".to_string()))?;
    let (code, text) = status.split_once(' ').unwrap_or((status, ""));
    let code = code
        .parse::<u16>()
        .map_err(|_| CddbError::Malformed(format!("bad status line {status:?}")))?;

    if !(200..300).contains(&code) {
        return Err(CddbError::Service { status: code });
    }

    let body = lines.take_while(|line| *line != ".").collect();
    Ok(Response { code, text, body })
}

fn parse_candidate(line: &str) -> Result<CandidateRecord, CddbError> {
    let mut parts = line.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(category), Some(disc_id), Some(title)) if !category.is_empty() => {
            Ok(CandidateRecord {
                category: category.to_string(),
                disc_id: disc_id.to_string(),
                title: title.trim().to_string(),
            })
        }
        _ => Err(CddbError::Malformed(format!("bad match line {line:?}"))),
    }
}

/// Parses the answer to `cddb query`.
///
/// A single exact match is returned as a one element list, so callers see
/// the same shape whatever the number of hits.
pub fn parse_query(raw: &str) -> Result<Vec<CandidateRecord>, CddbError> {
    let response = split_response(raw)?;
    match response.code {
        codes::EXACT_MATCH => Ok(vec![parse_candidate(response.text)?]),
        codes::NO_MATCH => Ok(Vec::new()),
        codes::ENTRY_FOLLOWS | codes::INEXACT_MATCHES => response
            .body
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| parse_candidate(line))
            .collect(),
        other => Err(CddbError::Malformed(format!(
            "unexpected query response code {other}"
        ))),
    }
}

/// Parses the xmcd entry returned by `cddb read`.
///
/// Keys may repeat when a value is too long for one line, in which case
/// the pieces are concatenated.
pub fn parse_read(raw: &str, track_count: usize) -> Result<TrackListing, CddbError> {
    let response = split_response(raw)?;
    if response.code != codes::ENTRY_FOLLOWS {
        return Err(CddbError::Malformed(format!(
            "unexpected read response code {}",
            response.code
        )));
    }

    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    for line in response.body {
        if line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            fields
                .entry(key.trim().to_string())
                .or_default()
                .push_str(value);
        }
    }

    let titles = (0..track_count)
        .map(|n| {
            fields
                .remove(&format!("TTITLE{n}"))
                .ok_or(CddbError::MissingTrackTitle(n))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TrackListing {
        titles,
        extended: fields,
    })
}
