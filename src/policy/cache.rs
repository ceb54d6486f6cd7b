//! Named cache profiles.

use serde::Serialize;

use crate::routing::RouteCategory;

/// A named response caching profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheProfile {
    pub name: &'static str,
    pub duration_secs: u32,
}

pub const SITEMAP_PROFILE: CacheProfile = CacheProfile {
    name: "SiteMapCacheProfile",
    duration_secs: 30,
};

pub const SYNDICATION_PROFILE: CacheProfile = CacheProfile {
    name: "RssCacheProfile",
    duration_secs: 100,
};

/// Caching directive attached to a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheDirective {
    pub profile: String,
    pub duration_secs: u32,
}

impl CacheDirective {
    /// Value for the `Cache-Control` response header.
    pub fn header_value(&self) -> String {
        format!("public,max-age={}", self.duration_secs)
    }
}

impl From<CacheProfile> for CacheDirective {
    fn from(profile: CacheProfile) -> Self {
        Self {
            profile: profile.name.to_string(),
            duration_secs: profile.duration_secs,
        }
    }
}

/// Cache directive for a route category, if it caches at all.
pub fn cache_directive(category: RouteCategory) -> Option<CacheDirective> {
    match category {
        RouteCategory::Sitemap => Some(SITEMAP_PROFILE.into()),
        RouteCategory::Syndication => Some(SYNDICATION_PROFILE.into()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        let sitemap = cache_directive(RouteCategory::Sitemap).unwrap();
        assert_eq!(sitemap.duration_secs, 30);
        assert_eq!(sitemap.profile, "SiteMapCacheProfile");
        assert_eq!(sitemap.header_value(), "public,max-age=30");

        assert_eq!(cache_directive(RouteCategory::Syndication).unwrap().duration_secs, 100);
        assert!(cache_directive(RouteCategory::ContentViewing).is_none());
        assert!(cache_directive(RouteCategory::ErrorPage).is_none());
    }
}
