use std::cell::RefCell;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use view::{PropsObject, SceneContent, SceneNodeId, SceneWorld, WorldError};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::describe;

#[wasm_bindgen]
extern "C" {
    /// The page's 3D world: any object with `addFromFile(path, props) -> Promise`.
    pub type JsWorld;

    #[wasm_bindgen(method, catch, js_name = addFromFile)]
    fn add_from_file(this: &JsWorld, path: &str, props: &JsValue)
    -> Result<js_sys::Promise, JsValue>;
}

/// Adapts a JS world to `SceneWorld`, keeping every loaded object so callers
/// can hand them back to JS by node id.
pub struct JsSceneWorld {
    world: JsWorld,
    objects: RefCell<Vec<JsValue>>,
}

impl JsSceneWorld {
    pub fn new(world: JsWorld) -> Self {
        Self {
            world,
            objects: RefCell::new(Vec::new()),
        }
    }

    pub fn object(&self, node: SceneNodeId) -> Option<JsValue> {
        self.objects.borrow().get(node.0 as usize).cloned()
    }

    /// Loaded objects for `content`, in content order.
    pub fn objects(&self, content: &SceneContent) -> js_sys::Array {
        content
            .nodes()
            .into_iter()
            .filter_map(|node| self.object(node))
            .collect()
    }
}

fn props_to_js(props: &PropsObject) -> Result<JsValue, String> {
    let payload = serde_json::to_string(props).map_err(|e| e.to_string())?;
    js_sys::JSON::parse(&payload).map_err(|e| describe(&e))
}

impl SceneWorld for JsSceneWorld {
    fn add_from_file<'a>(
        &'a self,
        path: &'a str,
        props: Option<&'a PropsObject>,
    ) -> LocalBoxFuture<'a, Result<SceneNodeId, WorldError>> {
        async move {
            let props = match props {
                Some(props) => props_to_js(props).map_err(|e| WorldError::new(path, e))?,
                None => JsValue::UNDEFINED,
            };
            let promise = self
                .world
                .add_from_file(path, &props)
                .map_err(|e| WorldError::new(path, describe(&e)))?;
            let object = JsFuture::from(promise)
                .await
                .map_err(|e| WorldError::new(path, describe(&e)))?;

            let mut objects = self.objects.borrow_mut();
            objects.push(object);
            Ok(SceneNodeId(objects.len() as u64 - 1))
        }
        .boxed_local()
    }
}
