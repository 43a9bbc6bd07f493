//! Release and asset model with latest-version selection.
//!
//! Release records arrive from the release host as loosely typed JSON. This
//! module parses their tags as semantic versions, picks the newest release and
//! locates the packaged `.jar` artifact among its assets.

use crate::error::{PackagerError, Result};
use crate::github::ReleaseSource;
use log::{debug, trace};
use semver::Version;
use serde::Deserialize;
use std::cmp::Ordering;

/// File name suffix identifying the packaged artifact.
pub const ARTIFACT_SUFFIX: &str = ".jar";

/// A release entry as listed by the release host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseRecord {
    /// Host-assigned release identifier.
    pub id: u64,
    /// The tag the release was published under.
    pub tag_name: String,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    /// File name of the asset.
    pub name: String,
    /// Direct download URL.
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

/// A release whose tag parsed as a semantic version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Host-assigned release identifier.
    pub id: u64,
    /// The parsed version.
    pub tag: Version,
    /// The tag exactly as published.
    pub raw_tag: String,
}

impl TryFrom<&ReleaseRecord> for Release {
    type Error = PackagerError;

    fn try_from(record: &ReleaseRecord) -> Result<Self> {
        let tag = Version::parse(&record.tag_name).map_err(|source| PackagerError::InvalidTag {
            tag: record.tag_name.clone(),
            source,
        })?;
        Ok(Self {
            id: record.id,
            tag,
            raw_tag: record.tag_name.clone(),
        })
    }
}

/// Select the release with the highest semantic version.
///
/// Every tag must parse, even those that would not win. Versions compare by
/// precedence, so build metadata is ignored; on equal precedence the release
/// listed first is kept.
///
/// # Errors
///
/// Returns [`PackagerError::InvalidTag`] for the first tag that is not a
/// semantic version and [`PackagerError::NoReleases`] for an empty list.
///
/// # Examples
///
/// ```
/// use vineflower_packager::release::{ReleaseRecord, select_latest};
///
/// let records = vec![
///     ReleaseRecord { id: 1, tag_name: "1.2.3".to_owned() },
///     ReleaseRecord { id: 2, tag_name: "1.10.0".to_owned() },
///     ReleaseRecord { id: 3, tag_name: "1.2.10".to_owned() },
/// ];
/// let latest = select_latest(&records)?;
/// assert_eq!(latest.raw_tag, "1.10.0");
/// # Ok::<(), vineflower_packager::error::PackagerError>(())
/// ```
pub fn select_latest(records: &[ReleaseRecord]) -> Result<Release> {
    let releases = records
        .iter()
        .map(Release::try_from)
        .collect::<Result<Vec<_>>>()?;

    releases
        .into_iter()
        .reduce(|best, candidate| {
            if candidate.tag.cmp_precedence(&best.tag) == Ordering::Greater {
                candidate
            } else {
                best
            }
        })
        .ok_or(PackagerError::NoReleases)
}

/// Return the first asset whose name ends with [`ARTIFACT_SUFFIX`].
///
/// Assets are scanned in listed order; source and javadoc jars published
/// after the main artifact are therefore ignored.
///
/// # Examples
///
/// ```
/// use vineflower_packager::release::{Asset, select_jar_asset};
///
/// let asset = |name: &str| Asset {
///     name: name.to_owned(),
///     download_url: format!("https://example.test/{name}"),
/// };
/// let assets = vec![asset("readme.txt"), asset("tool-1.0.jar"), asset("tool-1.0-sources.jar")];
/// assert_eq!(select_jar_asset(&assets).map(|a| a.name.as_str()), Some("tool-1.0.jar"));
/// assert!(select_jar_asset(&assets[..1]).is_none());
/// ```
#[must_use]
pub fn select_jar_asset(assets: &[Asset]) -> Option<&Asset> {
    assets
        .iter()
        .inspect(|asset| trace!("considering asset {}", asset.name))
        .find(|asset| asset.name.ends_with(ARTIFACT_SUFFIX))
}

/// Fetch the release list and return the newest release.
///
/// # Errors
///
/// Returns an error if the listing cannot be fetched or decoded, or if
/// [`select_latest`] rejects it.
pub fn resolve_latest(source: &dyn ReleaseSource) -> Result<Release> {
    let records = source.list_releases()?;
    debug!("received {} release(s)", records.len());
    select_latest(&records)
}

/// Fetch the asset list of a release and return its `.jar` asset, if any.
///
/// # Errors
///
/// Returns an error if the asset listing cannot be fetched or decoded. A
/// release without a matching asset is `Ok(None)`.
pub fn find_jar_asset(source: &dyn ReleaseSource, release_id: u64) -> Result<Option<Asset>> {
    let assets = source.list_assets(release_id)?;
    debug!("release {release_id} lists {} asset(s)", assets.len());
    Ok(select_jar_asset(&assets).cloned())
}
