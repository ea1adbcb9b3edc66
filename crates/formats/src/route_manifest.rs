use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::slot_paths::SlotPaths;

pub const ROUTE_MANIFEST_VERSION: &str = "1.0";
pub const ROUTE_MANIFEST_FILE_NAME: &str = "routes.manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteManifest {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
    pub routes: Vec<RouteEntry>,
}

/// Declarative configuration for one route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub id: String,
    pub title: String,
    pub render: RenderSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<serde_json::Map<String, serde_json::Value>>,
}

/// The `render` field as it appears in JSON.
///
/// Values that are neither a path nor an object of paths are kept verbatim in
/// `Other` so the mismatch surfaces when the scene is initialized, not when the
/// manifest is read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RenderSpec {
    Path(String),
    Slots(SlotPaths),
    Other(serde_json::Value),
}

impl RouteEntry {
    /// Every string of the route that may reference route params, labelled by
    /// field (`title`, `backTo`, `render`, `render.<slot>`).
    pub fn templates(&self) -> Vec<(String, &str)> {
        let mut out = vec![("title".to_string(), self.title.as_str())];
        if let Some(back_to) = &self.back_to {
            out.push(("backTo".to_string(), back_to.as_str()));
        }
        match &self.render {
            RenderSpec::Path(path) => out.push(("render".to_string(), path.as_str())),
            RenderSpec::Slots(slots) => {
                for (slot, path) in slots.iter() {
                    out.push((format!("render.{slot}"), path));
                }
            }
            RenderSpec::Other(_) => {}
        }
        out
    }
}

#[derive(Debug)]
pub enum RouteManifestError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    UnsupportedVersion { found: String },
    DuplicateRoute { id: String },
}

impl fmt::Display for RouteManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteManifestError::Io(err) => write!(f, "I/O error: {err}"),
            RouteManifestError::Parse(err) => write!(f, "Route manifest parse error: {err}"),
            RouteManifestError::UnsupportedVersion { found } => {
                write!(f, "Unsupported route manifest version: {found}")
            }
            RouteManifestError::DuplicateRoute { id } => write!(f, "Duplicate route id: {id}"),
        }
    }
}

impl std::error::Error for RouteManifestError {}

impl RouteManifest {
    pub fn new() -> Self {
        Self {
            version: ROUTE_MANIFEST_VERSION.to_string(),
            name: None,
            content_hash: None,
            routes: Vec::new(),
        }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, RouteManifestError> {
        let manifest: RouteManifest =
            serde_json::from_str(payload).map_err(RouteManifestError::Parse)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RouteManifestError> {
        let payload = fs::read_to_string(path.as_ref()).map_err(RouteManifestError::Io)?;
        Self::from_json_str(&payload)
    }

    pub fn validate(&self) -> Result<(), RouteManifestError> {
        if self.version != ROUTE_MANIFEST_VERSION {
            return Err(RouteManifestError::UnsupportedVersion {
                found: self.version.clone(),
            });
        }

        let mut seen = BTreeSet::new();
        for route in &self.routes {
            if !seen.insert(route.id.as_str()) {
                return Err(RouteManifestError::DuplicateRoute {
                    id: route.id.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn route(&self, id: &str) -> Option<&RouteEntry> {
        self.routes.iter().find(|r| r.id == id)
    }

    /// blake3 over the compact JSON of the manifest with `contentHash` cleared.
    pub fn compute_content_hash(&self) -> Result<String, RouteManifestError> {
        let mut canonical = self.clone();
        canonical.content_hash = None;
        let payload = serde_json::to_vec(&canonical).map_err(RouteManifestError::Parse)?;
        Ok(blake3::hash(&payload).to_hex().to_string())
    }

    pub fn compute_and_set_identity(&mut self) -> Result<(), RouteManifestError> {
        self.content_hash = Some(self.compute_content_hash()?);
        Ok(())
    }
}

impl Default for RouteManifest {
    fn default() -> Self {
        Self::new()
    }
}
