use std::fmt;

use futures_util::future::LocalBoxFuture;

/// Constructor arguments handed to scene objects.
pub type PropsObject = serde_json::Map<String, serde_json::Value>;

/// Handle to one piece of file-backed scene content owned by the world.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneNodeId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldError {
    pub path: String,
    pub message: String,
}

impl WorldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to add {} to the world: {}", self.path, self.message)
    }
}

impl std::error::Error for WorldError {}

/// The 3D scene owner.
///
/// Calls take `&self` so several loads can be in flight at once; implementations
/// use interior mutability for whatever they record.
pub trait SceneWorld {
    fn add_from_file<'a>(
        &'a self,
        path: &'a str,
        props: Option<&'a PropsObject>,
    ) -> LocalBoxFuture<'a, Result<SceneNodeId, WorldError>>;
}

/// Result of populating the world for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneContent {
    Single(SceneNodeId),
    /// One node per render slot, in slot order.
    Slots(Vec<(String, SceneNodeId)>),
    Custom(Vec<SceneNodeId>),
}

impl SceneContent {
    pub fn nodes(&self) -> Vec<SceneNodeId> {
        match self {
            SceneContent::Single(node) => vec![*node],
            SceneContent::Slots(slots) => slots.iter().map(|(_, node)| *node).collect(),
            SceneContent::Custom(nodes) => nodes.clone(),
        }
    }
}
