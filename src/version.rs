use crate::conventional::BumpType;
use crate::error::{ReleaseError, Result};
use semver::Version;

/// Compute the next version for a bump decision.
///
/// Standard semver increments: major zeroes minor and patch, minor zeroes
/// patch, patch increments patch. Pre-release and build metadata on the
/// current version are cleared by the bump.
///
/// # Arguments
/// * `current` - Current version string, already stripped of any tag prefix
/// * `bump` - Bump to apply; must not be [BumpType::None]
///
/// # Returns
/// * `Ok(Version)` - The next version, strictly greater than `current`
/// * `Err` - If `current` is not valid semver; the caller must abort the
///   whole run rather than tag anything
pub fn next_version(current: &str, bump: BumpType) -> Result<Version> {
    let parsed = Version::parse(current).map_err(|e| {
        ReleaseError::version(format!(
            "'{}' is not a valid semantic version ({}). \
             Fix the latest tag or the initial-version input.",
            current, e
        ))
    })?;

    let next = match bump {
        BumpType::Major => Version::new(parsed.major + 1, 0, 0),
        BumpType::Minor => Version::new(parsed.major, parsed.minor + 1, 0),
        BumpType::Patch => Version::new(parsed.major, parsed.minor, parsed.patch + 1),
        BumpType::None => {
            return Err(ReleaseError::version(
                "cannot resolve a next version for bump type 'none'".to_string(),
            ))
        }
    };

    Ok(next)
}
