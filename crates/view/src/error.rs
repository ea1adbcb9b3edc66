use std::fmt;

use foundation::TemplateError;

use crate::controller::{Operation, Phase};
use crate::host::HostError;
use crate::world::WorldError;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewError {
    Template(TemplateError),
    Host(HostError),
    World {
        /// Render slot whose load failed, for path-map routes.
        slot: Option<String>,
        source: WorldError,
    },
    UnsupportedRender { value: serde_json::Value },
    InvalidTransition { phase: Phase, op: Operation },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::Template(e) => write!(f, "template error: {e}"),
            ViewError::Host(e) => write!(f, "host error: {e}"),
            ViewError::World {
                slot: Some(slot),
                source,
            } => write!(f, "scene slot `{slot}`: {source}"),
            ViewError::World { slot: None, source } => write!(f, "scene error: {source}"),
            ViewError::UnsupportedRender { value } => {
                write!(f, "render value not compatible: {value}")
            }
            ViewError::InvalidTransition { phase, op } => {
                write!(f, "cannot {op} a view controller that is {phase}")
            }
        }
    }
}

impl std::error::Error for ViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewError::Template(e) => Some(e),
            ViewError::Host(e) => Some(e),
            ViewError::World { source, .. } => Some(source),
            ViewError::UnsupportedRender { .. } | ViewError::InvalidTransition { .. } => None,
        }
    }
}

impl From<TemplateError> for ViewError {
    fn from(e: TemplateError) -> Self {
        ViewError::Template(e)
    }
}

impl From<HostError> for ViewError {
    fn from(e: HostError) -> Self {
        ViewError::Host(e)
    }
}

impl From<WorldError> for ViewError {
    fn from(source: WorldError) -> Self {
        ViewError::World { slot: None, source }
    }
}
