use console_error_panic_hook::set_once;
use formats::RouteManifest;
use foundation::RouteParams;
use futures_util::lock::Mutex;
use gloo_net::http::Request;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use view::{ElementIds, MatchedRoute, Navigator};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

mod dom;
mod logging;
mod world;

pub use dom::{TransitionConfig, WebDomHost};
pub use world::{JsSceneWorld, JsWorld};

struct App {
    routes: RouteManifest,
    // Navigations queue here so a hide always settles before the next show.
    navigator: Mutex<Navigator<WebDomHost>>,
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn current_app() -> Result<Rc<App>, JsValue> {
    APP.with(|app| app.borrow().clone())
        .ok_or_else(|| JsValue::from_str("routes not initialized; call init_routes first"))
}

fn parse_params(params_json: &str) -> Result<RouteParams, String> {
    if params_json.trim().is_empty() {
        return Ok(RouteParams::new());
    }
    serde_json::from_str::<BTreeMap<String, String>>(params_json)
        .map(RouteParams::from)
        .map_err(|e| format!("invalid route params: {e}"))
}

fn matched_route(
    routes: &RouteManifest,
    route_id: &str,
    params_json: &str,
) -> Result<MatchedRoute, String> {
    let entry = routes
        .route(route_id)
        .cloned()
        .ok_or_else(|| format!("unknown route: {route_id}"))?;
    Ok(MatchedRoute::new(entry.into(), parse_params(params_json)?))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    logging::init();
    Ok(())
}

/// Fetches the route manifest and binds the page anchors.
///
/// Element ids default to `atlas-title`, `atlas-back` and `atlas-view`.
/// Resolves to the number of routes.
#[wasm_bindgen]
pub fn init_routes(
    manifest_url: String,
    title_id: Option<String>,
    back_button_id: Option<String>,
    view_container_id: Option<String>,
) -> js_sys::Promise {
    future_to_promise(async move {
        let defaults = ElementIds::default();
        let ids = ElementIds {
            title: title_id.unwrap_or(defaults.title),
            back_button: back_button_id.unwrap_or(defaults.back_button),
            view_container: view_container_id.unwrap_or(defaults.view_container),
        };

        let routes = match fetch_routes(&manifest_url).await {
            Ok(routes) => routes,
            Err(err) => {
                let msg = format!("Failed to fetch route manifest: {}", describe(&err));
                web_sys::console::log_1(&JsValue::from_str(&msg));
                return Err(err);
            }
        };
        let host = WebDomHost::from_window(&ids, TransitionConfig::default())?;
        let count = routes.routes.len();

        APP.with(|app| {
            *app.borrow_mut() = Some(Rc::new(App {
                routes,
                navigator: Mutex::new(Navigator::new(Rc::new(host))),
            }));
        });
        Ok(JsValue::from_f64(count as f64))
    })
}

/// Moves the page to route `route_id`.
///
/// `params_json` is a JSON object of string params extracted by the router.
/// Resolves to an array of the objects `world.addFromFile` produced.
#[wasm_bindgen]
pub fn navigate(route_id: String, params_json: String, world: JsWorld) -> js_sys::Promise {
    future_to_promise(async move {
        let app = current_app()?;
        let matched = matched_route(&app.routes, &route_id, &params_json)
            .map_err(|e| JsValue::from_str(&e))?;
        let world = JsSceneWorld::new(world);

        let mut navigator = app.navigator.lock().await;
        match navigator.navigate(matched, &world).await {
            Ok(content) => Ok(world.objects(&content).into()),
            Err(err) => {
                let msg = format!("navigation to {route_id} failed: {err}");
                web_sys::console::error_1(&JsValue::from_str(&msg));
                Err(JsValue::from_str(&msg))
            }
        }
    })
}

/// Hides the current view without showing another one.
#[wasm_bindgen]
pub fn leave() -> js_sys::Promise {
    future_to_promise(async move {
        let app = current_app()?;
        let mut navigator = app.navigator.lock().await;
        navigator
            .leave()
            .await
            .map(|_| JsValue::UNDEFINED)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    })
}

async fn fetch_routes(url: &str) -> Result<RouteManifest, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let text = resp
        .text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    RouteManifest::from_json_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{matched_route, parse_params};
    use formats::RouteManifest;
    use pretty_assertions::assert_eq;
    use view::Render;

    fn routes() -> RouteManifest {
        RouteManifest::from_json_str(
            r#"{
                "version": "1.0",
                "routes": [
                    { "id": "city", "title": "City {id}", "render": "/cities/{id}.glb", "backTo": "/" }
                ]
            }"#,
        )
        .expect("parse routes")
    }

    #[test]
    fn empty_params_are_allowed() {
        assert!(parse_params("").expect("empty").is_empty());
        assert!(parse_params("{}").expect("object").is_empty());
    }

    #[test]
    fn non_string_params_are_rejected() {
        let err = parse_params(r#"{"id": 4}"#).expect_err("number param");
        assert!(err.starts_with("invalid route params"));
    }

    #[test]
    fn matched_route_combines_entry_and_params() {
        let matched = matched_route(&routes(), "city", r#"{"id": "oslo"}"#).expect("match");
        assert_eq!(matched.params.get("id"), Some("oslo"));
        assert_eq!(matched.config.back_to.as_deref(), Some("/"));
        assert!(matches!(matched.config.render, Render::SinglePath(ref p) if p == "/cities/{id}.glb"));
    }

    #[test]
    fn unknown_route_is_reported() {
        let err = matched_route(&routes(), "nowhere", "{}").expect_err("unknown");
        assert_eq!(err, "unknown route: nowhere");
    }
}
