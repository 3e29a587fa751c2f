//! Latest-release metadata from the GitHub releases API.

use chrono::{DateTime, Utc};
use semver::Version;
use serde::Deserialize;
use tracing::{debug, info};

use crate::transport::Transport;
use crate::updater::{UpdateError, UpdateResult};

/// Shown when a release field is missing.
pub const UNKNOWN: &str = "Unknown";

/// Shown when the publication date is missing.
pub const UNKNOWN_DATE: &str = "Unknown date";

/// Subset of a GitHub release object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl ReleaseInfo {
    /// Tag parsed as a semantic version, ignoring a leading `v`.
    pub fn version(&self) -> Option<Version> {
        let tag = self.tag_name.trim();
        let tag = tag.strip_prefix(['v', 'V']).unwrap_or(tag);
        Version::parse(tag).ok()
    }

    /// Release title, falling back to the tag.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ if !self.tag_name.is_empty() => &self.tag_name,
            _ => UNKNOWN,
        }
    }

    pub fn published_display(&self) -> String {
        self.published_at
            .map(format_published)
            .unwrap_or_else(|| UNKNOWN_DATE.to_string())
    }

    pub fn age_display(&self, now: DateTime<Utc>) -> String {
        self.published_at
            .map(|published| format_age(published, now))
            .unwrap_or_else(|| UNKNOWN.to_string())
    }
}

/// Fetches release metadata over a [`Transport`].
pub struct ReleaseClient<T> {
    transport: T,
}

impl<T: Transport> ReleaseClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch and parse the release document at `api_url`.
    ///
    /// # Errors
    ///
    /// * [`UpdateError::ReleaseFetchFailed`] if the request fails
    /// * [`UpdateError::ReleaseParseFailed`] if the body is not a release object
    pub fn latest(&self, api_url: &str) -> UpdateResult<ReleaseInfo> {
        debug!(url = api_url, "Fetching release info");

        let mut body = Vec::new();
        self.transport
            .get(api_url, &mut body)
            .map_err(|source| UpdateError::ReleaseFetchFailed {
                url: api_url.to_string(),
                source,
            })?;

        let release = parse_release(&body).map_err(|reason| UpdateError::ReleaseParseFailed {
            url: api_url.to_string(),
            reason,
        })?;

        info!(tag = %release.tag_name, "Latest release");
        Ok(release)
    }
}

/// Parse a GitHub release JSON document.
pub fn parse_release(body: &[u8]) -> Result<ReleaseInfo, String> {
    serde_json::from_slice(body).map_err(|e| e.to_string())
}

/// Long-form local rendering, e.g. `March 5, 2025 at 3:07 PM`.
pub fn format_published(published: DateTime<Utc>) -> String {
    published.format("%B %-d, %Y at %-I:%M %p").to_string()
}

/// Relative age, e.g. `just now`, `1 minute ago`, `3 days ago`.
///
/// Dates in the future read as `just now`.
pub fn format_age(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(published);
    let minutes = elapsed.num_minutes();

    if minutes < 1 {
        return "just now".to_string();
    }

    let (count, unit) = if minutes < 60 {
        (minutes, "minute")
    } else if elapsed.num_hours() < 24 {
        (elapsed.num_hours(), "hour")
    } else {
        (elapsed.num_days(), "day")
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
