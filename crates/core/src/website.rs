//! Website type and platform catalog.
//!
//! Defines the fixed website type enumeration, the per-type platform
//! choice tables offered on wizard step 3, and the slug derivation used
//! when a `website_details` dimension row is created.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Website type
// ---------------------------------------------------------------------------

/// The website type chosen on wizard step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteType {
    Ecommerce,
    Blog,
    Corporate,
    Portfolio,
    Other,
}

/// All website types, in the order they are offered on step 2.
pub const ALL_WEBSITE_TYPES: [WebsiteType; 5] = [
    WebsiteType::Ecommerce,
    WebsiteType::Blog,
    WebsiteType::Corporate,
    WebsiteType::Portfolio,
    WebsiteType::Other,
];

impl WebsiteType {
    /// Parse a website type string from the database or a form submission.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "ecommerce" => Ok(Self::Ecommerce),
            "blog" => Ok(Self::Blog),
            "corporate" => Ok(Self::Corporate),
            "portfolio" => Ok(Self::Portfolio),
            "other" => Ok(Self::Other),
            _ => Err(CoreError::Validation(format!(
                "Invalid website type '{s}'. Must be one of: ecommerce, blog, corporate, portfolio, other"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ecommerce => "ecommerce",
            Self::Blog => "blog",
            Self::Corporate => "corporate",
            Self::Portfolio => "portfolio",
            Self::Other => "other",
        }
    }

    /// Human-readable label for the type.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ecommerce => "E-commerce",
            Self::Blog => "Blog/Content Site",
            Self::Corporate => "Corporate/Business Site",
            Self::Portfolio => "Portfolio",
            Self::Other => "Other",
        }
    }
}

// ---------------------------------------------------------------------------
// Platform choices
// ---------------------------------------------------------------------------

/// Platform choices offered for e-commerce sites: `(value, label)`.
const ECOMMERCE_PLATFORMS: [(&str, &str); 6] = [
    ("shopify", "Shopify"),
    ("woocommerce", "WooCommerce"),
    ("bigcommerce", "BigCommerce"),
    ("magento", "Magento"),
    ("custom_solution", "Custom Solution"),
    ("other", "Other"),
];

/// Platform choices offered for every non-e-commerce site: `(value, label)`.
const GENERAL_PLATFORMS: [(&str, &str); 5] = [
    ("wordpress", "WordPress"),
    ("squarespace", "Squarespace"),
    ("webflow", "Webflow"),
    ("custom_developed", "Custom Developed"),
    ("other", "Other"),
];

/// The `(value, label)` platform choices valid for a website type.
///
/// E-commerce sites get a storefront-specific set; all other types share
/// the general CMS set. Step 3 validation accepts exactly these values.
pub fn platform_choices(website_type: WebsiteType) -> &'static [(&'static str, &'static str)] {
    match website_type {
        WebsiteType::Ecommerce => &ECOMMERCE_PLATFORMS,
        _ => &GENERAL_PLATFORMS,
    }
}

/// Whether `platform` is a valid choice for `website_type`.
///
/// A platform from the other type's set is invalid, never silently
/// remapped (e.g. `wordpress` under `ecommerce` is rejected).
pub fn is_valid_platform(website_type: WebsiteType, platform: &str) -> bool {
    platform_choices(website_type)
        .iter()
        .any(|(value, _)| *value == platform)
}

/// Human-readable label for a platform value, if it exists for the type.
pub fn platform_label(website_type: WebsiteType, platform: &str) -> Option<&'static str> {
    platform_choices(website_type)
        .iter()
        .find(|(value, _)| *value == platform)
        .map(|(_, label)| *label)
}

// ---------------------------------------------------------------------------
// Slug derivation
// ---------------------------------------------------------------------------

/// Derive a URL-safe slug from a platform name.
///
/// Lowercases the input, keeps `[a-z0-9_]`, and maps every other run of
/// characters to a single `-`. Leading and trailing separators are
/// trimmed.
///
/// # Examples
///
/// ```
/// use leadflow_core::website::slugify;
///
/// assert_eq!(slugify("Shopify"), "shopify");
/// assert_eq!(slugify("custom_solution"), "custom_solution");
/// assert_eq!(slugify("Custom Solution"), "custom-solution");
/// assert_eq!(slugify("  WooCommerce! "), "woocommerce");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.chars() {
        let c = c.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }

    slug
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
