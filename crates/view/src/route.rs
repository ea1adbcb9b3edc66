use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use formats::{RenderSpec, RouteEntry, SlotPaths};
use foundation::RouteParams;
use futures_util::future::LocalBoxFuture;

use crate::world::{PropsObject, SceneNodeId, SceneWorld, WorldError};

pub type SceneFuture<'w> = LocalBoxFuture<'w, Result<Vec<SceneNodeId>, WorldError>>;

/// Async scene-population function for routes that build their scene in code.
#[derive(Clone)]
pub struct SceneFn(Rc<dyn for<'w> Fn(&'w dyn SceneWorld) -> SceneFuture<'w>>);

impl SceneFn {
    pub fn new<F>(f: F) -> Self
    where
        F: for<'w> Fn(&'w dyn SceneWorld) -> SceneFuture<'w> + 'static,
    {
        Self(Rc::new(f))
    }

    pub fn call<'w>(&self, world: &'w dyn SceneWorld) -> SceneFuture<'w> {
        (self.0)(world)
    }
}

impl fmt::Debug for SceneFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SceneFn(..)")
    }
}

/// What a route puts into the world.
#[derive(Debug, Clone)]
pub enum Render {
    /// Named slot to path template; one load per slot, in declaration order.
    PathMap(SlotPaths),
    SinglePath(String),
    SceneFn(SceneFn),
    /// A declarative value of any other shape. Rejected at scene init.
    Unsupported(serde_json::Value),
}

impl Render {
    pub fn scene_fn<F>(f: F) -> Self
    where
        F: for<'w> Fn(&'w dyn SceneWorld) -> SceneFuture<'w> + 'static,
    {
        Render::SceneFn(SceneFn::new(f))
    }

    pub fn path_map<K, V>(slots: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Render::PathMap(slots.into_iter().collect())
    }
}

#[derive(Clone)]
pub struct PropsFn(Rc<dyn Fn(&RouteParams) -> PropsObject>);

impl fmt::Debug for PropsFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PropsFn(..)")
    }
}

/// Constructor arguments for the scene objects of a route.
#[derive(Debug, Clone)]
pub enum Props {
    Static(PropsObject),
    FromParams(PropsFn),
}

impl Props {
    pub fn from_params<F>(f: F) -> Self
    where
        F: Fn(&RouteParams) -> PropsObject + 'static,
    {
        Props::FromParams(PropsFn(Rc::new(f)))
    }

    pub fn resolve(&self, params: &RouteParams) -> Cow<'_, PropsObject> {
        match self {
            Props::Static(props) => Cow::Borrowed(props),
            Props::FromParams(PropsFn(f)) => Cow::Owned(f(params)),
        }
    }
}

/// Immutable per-route descriptor.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Page title; may reference route params as `{name}`.
    pub title: String,
    pub render: Render,
    /// Back-navigation target; may reference route params.
    pub back_to: Option<String>,
    /// Template fragment mounted into the view container.
    pub view_id: Option<String>,
    pub props: Option<Props>,
}

impl RouteConfig {
    pub fn new(title: impl Into<String>, render: Render) -> Self {
        Self {
            title: title.into(),
            render,
            back_to: None,
            view_id: None,
            props: None,
        }
    }

    pub fn with_back_to(mut self, back_to: impl Into<String>) -> Self {
        self.back_to = Some(back_to.into());
        self
    }

    pub fn with_view_id(mut self, view_id: impl Into<String>) -> Self {
        self.view_id = Some(view_id.into());
        self
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = Some(props);
        self
    }
}

impl From<RouteEntry> for RouteConfig {
    fn from(entry: RouteEntry) -> Self {
        let render = match entry.render {
            RenderSpec::Path(path) => Render::SinglePath(path),
            RenderSpec::Slots(slots) => Render::PathMap(slots),
            RenderSpec::Other(value) => Render::Unsupported(value),
        };
        Self {
            title: entry.title,
            render,
            back_to: entry.back_to,
            view_id: entry.view_id,
            props: entry.props.map(Props::Static),
        }
    }
}

/// A resolved route: its config plus the params extracted by the router.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
    pub config: RouteConfig,
    pub params: RouteParams,
}

impl MatchedRoute {
    pub fn new(config: RouteConfig, params: RouteParams) -> Self {
        Self { config, params }
    }
}
