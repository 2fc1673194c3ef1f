// src/accounts/passwd.rs

//! Parser for the passwd record layout
//!
//! ```text
//! root:x:0:0:root:/root:/bin/bash
//! <login>:<password>:<uid>:<gid>:<comment>:<home>:<shell>
//! ```
//!
//! Only the login (field 0) and the GID (field 3) are kept.

use super::{AccountRecord, GidPolicy, Resolution, SourceKind};
use crate::error::Result;
use tracing::debug;

const LOGIN_FIELD: usize = 0;
const GID_FIELD: usize = 3;

/// Parse one line. Returns `None` for lines with fewer than four fields.
pub fn parse_line(line: &str) -> Option<AccountRecord> {
    let fields: Vec<&str> = line.trim().split(':').collect();
    if fields.len() <= GID_FIELD {
        return None;
    }

    Some(AccountRecord {
        login: fields[LOGIN_FIELD].to_string(),
        gid_field: fields[GID_FIELD].to_string(),
    })
}

/// Build a resolution from a whole account database dump
pub fn collect(text: &str, source: SourceKind, policy: GidPolicy) -> Result<Resolution> {
    let mut resolution = Resolution::new(source);

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line) {
            Some(record) => resolution.record(&record.login, &record.gid_field, policy)?,
            None => resolution.skip(line_no, line.trim(), policy)?,
        }
    }

    debug!(
        "Parsed {} accounts ({} defaulted, {} skipped)",
        resolution.gids.len(),
        resolution.defaulted.len(),
        resolution.skipped.len()
    );

    Ok(resolution)
}
