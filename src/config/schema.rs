//! Configuration schema definitions.
//!
//! All types derive Serde traits so a tracker can be configured from a file
//! as easily as from code.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{ALL_METHODS, HTTP_METHODS};

/// Root configuration for the Matomo tracker.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MatomoConfig {
    /// URL of the Matomo installation, with or without `matomo.php`.
    pub matomo_url: String,

    /// Id of the tracked site. Only needed once requests are tracked.
    pub id_site: Option<SiteId>,

    /// API token. Without it the client IP is not reported.
    pub token_auth: Option<String>,

    /// Public base URL of the tracked site, prefixed to request paths.
    pub base_url: Option<String>,

    /// Route patterns that are never tracked.
    pub ignored_routes: Vec<String>,

    /// Per-route fields overriding the computed tracking data.
    pub routes_details: HashMap<String, Map<String, Value>>,

    /// Regexes of route patterns to ignore (matched at the start).
    pub ignored_patterns: Vec<String>,

    /// Regexes of User-Agent values to ignore (matched at the start).
    pub ignored_ua_patterns: Vec<String>,

    /// Methods to track.
    pub allowed_methods: AllowedMethods,

    /// Methods to ignore; wins over `allowed_methods`.
    pub ignored_methods: Vec<String>,
}

/// Site id as accepted by Matomo: either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SiteId {
    Number(u64),
    Text(String),
}

impl SiteId {
    /// Empty strings and zero count as "not configured".
    pub fn is_set(&self) -> bool {
        match self {
            SiteId::Number(n) => *n != 0,
            SiteId::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteId::Number(n) => write!(f, "{}", n),
            SiteId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for SiteId {
    fn from(id: u64) -> Self {
        SiteId::Number(id)
    }
}

impl From<&str> for SiteId {
    fn from(id: &str) -> Self {
        SiteId::Text(id.to_string())
    }
}

/// Which HTTP methods are eligible for tracking.
///
/// Written as the keyword `"all-methods"` or as a list of method names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "AllowedMethodsRepr", into = "AllowedMethodsRepr")]
pub enum AllowedMethods {
    #[default]
    All,
    Only(Vec<String>),
}

impl AllowedMethods {
    /// Effective uppercase method names.
    pub fn to_method_set(&self) -> Vec<String> {
        match self {
            AllowedMethods::All => HTTP_METHODS.iter().map(|m| m.to_string()).collect(),
            AllowedMethods::Only(methods) => methods.iter().map(|m| m.to_uppercase()).collect(),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum AllowedMethodsRepr {
    Keyword(String),
    List(Vec<String>),
}

impl TryFrom<AllowedMethodsRepr> for AllowedMethods {
    type Error = String;

    fn try_from(repr: AllowedMethodsRepr) -> Result<Self, Self::Error> {
        match repr {
            AllowedMethodsRepr::Keyword(k) if k == ALL_METHODS => Ok(AllowedMethods::All),
            AllowedMethodsRepr::Keyword(k) => Err(format!(
                "allowed_methods must be \"{}\" or a list of methods, got \"{}\"",
                ALL_METHODS, k
            )),
            AllowedMethodsRepr::List(methods) => Ok(AllowedMethods::Only(methods)),
        }
    }
}

impl From<AllowedMethods> for AllowedMethodsRepr {
    fn from(methods: AllowedMethods) -> Self {
        match methods {
            AllowedMethods::All => AllowedMethodsRepr::Keyword(ALL_METHODS.to_string()),
            AllowedMethods::Only(list) => AllowedMethodsRepr::List(list),
        }
    }
}
