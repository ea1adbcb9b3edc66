use std::fmt;

use futures_util::future::LocalBoxFuture;

/// Ids of the page anchors a DOM host resolves once, when it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    /// Element whose text is the page title.
    pub title: String,
    /// Back-navigation button; carries the back target as data.
    pub back_button: String,
    /// Shared container that route view fragments are mounted into.
    pub view_container: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            title: "atlas-title".to_string(),
            back_button: "atlas-back".to_string(),
            view_container: "atlas-view".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    MissingElement { id: String },
    MissingTemplate { id: String },
    Transition(String),
    Dom(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::MissingElement { id } => write!(f, "missing page element #{id}"),
            HostError::MissingTemplate { id } => write!(f, "missing view template #{id}"),
            HostError::Transition(msg) => write!(f, "view transition failed: {msg}"),
            HostError::Dom(msg) => write!(f, "DOM error: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

/// Page chrome and the shared view container.
///
/// Anchors are resolved when the host is constructed, so the chrome setters
/// cannot fail. Only template lookup and the animated transitions can.
pub trait DomHost {
    fn set_title(&self, title: &str);

    fn set_back_target(&self, target: &str);

    fn set_back_visible(&self, visible: bool);

    /// Replaces the container content with a clone of template `template_id`.
    fn mount_template(&self, template_id: &str) -> Result<(), HostError>;

    /// Removes every child of the container.
    fn clear_view(&self);

    /// Resolves once the container's hide transition has finished.
    fn hide_view(&self) -> LocalBoxFuture<'_, Result<(), HostError>>;

    /// Resolves once the container's show transition has finished.
    fn show_view(&self) -> LocalBoxFuture<'_, Result<(), HostError>>;
}
