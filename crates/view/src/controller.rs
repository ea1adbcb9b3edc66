use std::fmt;
use std::rc::Rc;

use foundation::{RouteParams, template};
use futures_util::FutureExt;
use futures_util::future::try_join_all;
use tracing::{debug, error};

use crate::error::ViewError;
use crate::host::DomHost;
use crate::route::{MatchedRoute, Render, RouteConfig};
use crate::world::{SceneContent, SceneWorld};

/// Where a controller is in its route activation.
///
/// `Constructed -> Shown -> SceneReady`, and `hiding` from any phase but
/// `Hidden`. Anything else is rejected with [`ViewError::InvalidTransition`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Constructed,
    Shown,
    SceneReady,
    Hidden,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Constructed => "constructed",
            Phase::Shown => "shown",
            Phase::SceneReady => "scene-ready",
            Phase::Hidden => "hidden",
        })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    Show,
    InitScene,
    Hide,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Show => "show",
            Operation::InitScene => "init the scene of",
            Operation::Hide => "hide",
        })
    }
}

/// Controller for one route activation.
///
/// Owns the route's config and params for its lifetime and drives the page
/// chrome, the shared view container and scene population through its
/// collaborators. The host must await `hiding` on the outgoing controller
/// before calling `showing` on the next one; [`crate::Navigator`] does this.
pub struct ViewController<H: DomHost> {
    config: RouteConfig,
    params: RouteParams,
    host: Rc<H>,
    phase: Phase,
}

impl<H: DomHost> ViewController<H> {
    /// Sets the page title and, when the route has a back target, arms the
    /// back button. Nothing is written to the page if formatting fails.
    pub fn new(matched: MatchedRoute, host: Rc<H>) -> Result<Self, ViewError> {
        let MatchedRoute { config, params } = matched;

        let title = template::format(&config.title, &params)?;
        let back_to = config
            .back_to
            .as_deref()
            .map(|t| template::format(t, &params))
            .transpose()?;

        debug!(%title, back_to = ?back_to, view_id = ?config.view_id, "view controller constructed");
        host.set_title(&title);
        if let Some(target) = &back_to {
            host.set_back_target(target);
            host.set_back_visible(true);
        }

        Ok(Self {
            config,
            params,
            host,
            phase: Phase::Constructed,
        })
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn check(&self, op: Operation) -> Result<(), ViewError> {
        let allowed = match op {
            Operation::Show => self.phase == Phase::Constructed,
            Operation::InitScene => self.phase == Phase::Shown,
            Operation::Hide => self.phase != Phase::Hidden,
        };
        if allowed {
            Ok(())
        } else {
            Err(ViewError::InvalidTransition {
                phase: self.phase,
                op,
            })
        }
    }

    /// Hides the back button and, for routes with a view fragment, hides then
    /// empties the view container.
    pub async fn hiding(&mut self) -> Result<(), ViewError> {
        self.check(Operation::Hide)?;
        self.host.set_back_visible(false);

        if self.config.view_id.is_some() {
            self.host.hide_view().await?;
            self.host.clear_view();
        }

        debug!(title = %self.config.title, "view hidden");
        self.phase = Phase::Hidden;
        Ok(())
    }

    /// Mounts the route's view fragment and waits for the show transition.
    /// Render-only routes resolve immediately.
    pub async fn showing(&mut self) -> Result<(), ViewError> {
        self.check(Operation::Show)?;

        if let Some(view_id) = &self.config.view_id {
            self.host.mount_template(view_id)?;
            self.host.show_view().await?;
        }

        debug!(title = %self.config.title, "view shown");
        self.phase = Phase::Shown;
        Ok(())
    }

    /// Populates `world` with the content described by the route's `render`.
    ///
    /// Props are resolved once against the route params and handed to every
    /// load. For path maps all loads are driven together and the first load to
    /// fail fails the whole call; loads still in flight are dropped, not waited on.
    pub async fn init_scene(&mut self, world: &dyn SceneWorld) -> Result<SceneContent, ViewError> {
        self.check(Operation::InitScene)?;

        let content = {
            let props = self.config.props.as_ref().map(|p| p.resolve(&self.params));
            let props = props.as_deref();

            match &self.config.render {
                Render::PathMap(slots) => {
                    let mut targets = Vec::with_capacity(slots.len());
                    for (slot, path) in slots.iter() {
                        targets.push((slot, template::format(path, &self.params)?));
                    }

                    let loads = targets.iter().map(|(slot, path)| {
                        world.add_from_file(path, props).map(move |result| match result {
                            Ok(node) => Ok((slot.to_string(), node)),
                            Err(source) => Err(ViewError::World {
                                slot: Some(slot.to_string()),
                                source,
                            }),
                        })
                    });
                    SceneContent::Slots(try_join_all(loads).await?)
                }
                Render::SinglePath(path) => {
                    let path = template::format(path, &self.params)?;
                    SceneContent::Single(world.add_from_file(&path, props).await?)
                }
                Render::SceneFn(scene_fn) => SceneContent::Custom(scene_fn.call(world).await?),
                Render::Unsupported(value) => {
                    error!(render = %value, "render value not compatible");
                    return Err(ViewError::UnsupportedRender {
                        value: value.clone(),
                    });
                }
            }
        };

        debug!(title = %self.config.title, nodes = content.nodes().len(), "scene ready");
        self.phase = Phase::SceneReady;
        Ok(content)
    }
}

impl<H: DomHost> fmt::Debug for ViewController<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewController")
            .field("config", &self.config)
            .field("params", &self.params)
            .field("phase", &self.phase)
            .finish()
    }
}
