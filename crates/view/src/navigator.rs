use std::rc::Rc;

use tracing::debug;

use crate::controller::ViewController;
use crate::error::ViewError;
use crate::host::DomHost;
use crate::route::MatchedRoute;
use crate::world::{SceneContent, SceneWorld};

/// Drives route transitions against one page.
///
/// Each navigation awaits the outgoing controller's `hiding` to completion
/// before the incoming controller is built, so two views never share the
/// container. Taking `&mut self` rules out overlapping navigations.
pub struct Navigator<H: DomHost> {
    host: Rc<H>,
    current: Option<ViewController<H>>,
}

impl<H: DomHost> Navigator<H> {
    pub fn new(host: Rc<H>) -> Self {
        Self {
            host,
            current: None,
        }
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    pub fn current(&self) -> Option<&ViewController<H>> {
        self.current.as_ref()
    }

    /// Hide the current view, then show `matched` and populate `world` for it.
    ///
    /// A failed hide keeps the outgoing controller current. Once the incoming
    /// controller exists it becomes current even if showing or scene init
    /// fails, so the next navigation tears down whatever it mounted.
    pub async fn navigate(
        &mut self,
        matched: MatchedRoute,
        world: &dyn SceneWorld,
    ) -> Result<SceneContent, ViewError> {
        self.leave().await?;

        let mut incoming = ViewController::new(matched, Rc::clone(&self.host))?;
        let shown = incoming.showing().await;
        let controller = self.current.insert(incoming);
        shown?;

        let content = controller.init_scene(world).await?;
        debug!(title = %controller.config().title, "navigation complete");
        Ok(content)
    }

    /// Hide and drop the current controller, if any.
    pub async fn leave(&mut self) -> Result<(), ViewError> {
        if let Some(outgoing) = self.current.as_mut() {
            outgoing.hiding().await?;
        }
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Navigator;
    use crate::controller::Phase;
    use crate::error::ViewError;
    use crate::host::HostError;
    use crate::route::{MatchedRoute, Render, RouteConfig};
    use crate::testing::{FakeHost, FakeWorld, HostCall};
    use crate::world::{SceneContent, SceneNodeId};
    use foundation::RouteParams;
    use pollster::block_on;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn city(id: &str) -> MatchedRoute {
        MatchedRoute::new(
            RouteConfig::new("City {id}", Render::SinglePath("/cities/{id}.glb".into()))
                .with_view_id("city-panel")
                .with_back_to("/"),
            RouteParams::new().with("id", id),
        )
    }

    fn globe() -> MatchedRoute {
        MatchedRoute::new(
            RouteConfig::new("Atlas", Render::SinglePath("/globe.glb".into())),
            RouteParams::new(),
        )
    }

    #[test]
    fn outgoing_view_is_torn_down_before_incoming_mounts() {
        let host = Rc::new(FakeHost::with_templates(&["city-panel"]));
        let mut nav = Navigator::new(Rc::clone(&host));
        let world = FakeWorld::new();

        block_on(nav.navigate(city("paris"), &world)).expect("first navigation");
        host.take_calls();

        let content = block_on(nav.navigate(city("rome"), &world)).expect("second navigation");

        assert_eq!(content, SceneContent::Single(SceneNodeId(1)));
        assert_eq!(
            host.calls(),
            vec![
                HostCall::SetBackVisible(false),
                HostCall::HideView,
                HostCall::ClearView,
                HostCall::SetTitle("City rome".to_string()),
                HostCall::SetBackTarget("/".to_string()),
                HostCall::SetBackVisible(true),
                HostCall::MountTemplate("city-panel".to_string()),
                HostCall::ShowView,
            ]
        );
        assert_eq!(
            world.paths(),
            vec!["/cities/paris.glb".to_string(), "/cities/rome.glb".to_string()]
        );
        let current = nav.current().expect("current controller");
        assert_eq!(current.params().get("id"), Some("rome"));
        assert_eq!(current.phase(), Phase::SceneReady);
    }

    #[test]
    fn leaving_a_view_route_for_a_render_only_route_hides_back_button() {
        let host = Rc::new(FakeHost::with_templates(&["city-panel"]));
        let mut nav = Navigator::new(Rc::clone(&host));
        let world = FakeWorld::new();

        block_on(nav.navigate(city("oslo"), &world)).expect("city");
        assert!(host.back_visible());

        block_on(nav.navigate(globe(), &world)).expect("globe");
        assert!(!host.back_visible());
        assert_eq!(
            host.calls().last(),
            Some(&HostCall::SetTitle("Atlas".to_string()))
        );
    }

    #[test]
    fn failed_hide_keeps_outgoing_controller_current() {
        let host = Rc::new(FakeHost::with_templates(&["city-panel"]));
        let mut nav = Navigator::new(Rc::clone(&host));
        let world = FakeWorld::new();

        block_on(nav.navigate(city("lima"), &world)).expect("first navigation");
        host.fail_hide(true);

        let err = block_on(nav.navigate(globe(), &world)).expect_err("hide rejected");

        assert!(matches!(err, ViewError::Host(HostError::Transition(_))));
        let current = nav.current().expect("outgoing kept");
        assert_eq!(current.params().get("id"), Some("lima"));
        assert_eq!(world.paths(), vec!["/cities/lima.glb".to_string()]);
    }

    #[test]
    fn failed_show_still_leaves_incoming_controller_to_tear_down() {
        let host = Rc::new(FakeHost::with_templates(&["city-panel"]));
        let mut nav = Navigator::new(Rc::clone(&host));
        let world = FakeWorld::new();
        host.fail_show(true);

        let err = block_on(nav.navigate(city("cairo"), &world)).expect_err("show rejected");

        assert!(matches!(err, ViewError::Host(HostError::Transition(_))));
        assert!(world.calls().is_empty());
        assert_eq!(nav.current().map(|c| c.phase()), Some(Phase::Constructed));

        host.fail_show(false);
        host.take_calls();
        block_on(nav.leave()).expect("leave");
        assert_eq!(
            host.calls(),
            vec![
                HostCall::SetBackVisible(false),
                HostCall::HideView,
                HostCall::ClearView,
            ]
        );
        assert!(nav.current().is_none());
    }

    #[test]
    fn failed_scene_init_keeps_shown_controller() {
        let host = Rc::new(FakeHost::default());
        let mut nav = Navigator::new(Rc::clone(&host));
        let world = FakeWorld::new().failing("/globe.glb");

        let err = block_on(nav.navigate(globe(), &world)).expect_err("load fails");

        assert!(matches!(err, ViewError::World { .. }));
        assert_eq!(nav.current().map(|c| c.phase()), Some(Phase::Shown));
    }
}
