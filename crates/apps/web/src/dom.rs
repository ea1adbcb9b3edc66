use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use view::{DomHost, ElementIds, HostError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, HtmlElement, HtmlTemplateElement};

use crate::describe;

// Toggles the visibility class and waits for `transitionend`. The timer makes
// sure a container without a CSS transition (or a transition that never fires)
// still settles. Transitions bubbling up from children are ignored.
#[wasm_bindgen(inline_js = "
export function atlas_view_transition(el, visibleClass, visible, fallbackMs) {
    return new Promise((resolve) => {
        let done = false;
        const finish = (e) => {
            if (e && e.target !== el) return;
            if (done) return;
            done = true;
            el.removeEventListener('transitionend', finish);
            if (!visible) el.hidden = true;
            resolve();
        };
        if (visible) el.hidden = false;
        el.addEventListener('transitionend', finish);
        requestAnimationFrame(() => el.classList.toggle(visibleClass, visible));
        setTimeout(() => finish(), fallbackMs);
    });
}
")]
extern "C" {
    fn atlas_view_transition(
        el: &HtmlElement,
        visible_class: &str,
        visible: bool,
        fallback_ms: u32,
    ) -> js_sys::Promise;
}

/// How the view container animates between hidden and visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionConfig {
    /// Class present while the container is shown. CSS transitions on it.
    pub visible_class: String,
    /// Upper bound on a hide/show transition before it is treated as done.
    pub fallback_ms: u32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            visible_class: "is-visible".to_string(),
            fallback_ms: 600,
        }
    }
}

/// `DomHost` backed by the page document.
#[derive(Debug)]
pub struct WebDomHost {
    document: Document,
    title: HtmlElement,
    back_button: HtmlElement,
    view_container: HtmlElement,
    transition: TransitionConfig,
}

fn element(document: &Document, id: &str) -> Result<HtmlElement, HostError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| HostError::MissingElement { id: id.to_string() })
}

impl WebDomHost {
    /// Resolves every anchor up front; a page missing one cannot host views.
    pub fn new(
        document: Document,
        ids: &ElementIds,
        transition: TransitionConfig,
    ) -> Result<Self, HostError> {
        let title = element(&document, &ids.title)?;
        let back_button = element(&document, &ids.back_button)?;
        let view_container = element(&document, &ids.view_container)?;
        Ok(Self {
            document,
            title,
            back_button,
            view_container,
            transition,
        })
    }

    pub fn from_window(ids: &ElementIds, transition: TransitionConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Self::new(document, ids, transition).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn transition(&self, visible: bool) -> LocalBoxFuture<'_, Result<(), HostError>> {
        let promise = atlas_view_transition(
            &self.view_container,
            &self.transition.visible_class,
            visible,
            self.transition.fallback_ms,
        );
        async move {
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| HostError::Transition(describe(&e)))
        }
        .boxed_local()
    }
}

impl DomHost for WebDomHost {
    fn set_title(&self, title: &str) {
        // Text, not markup: titles carry route params straight from the URL.
        self.title.set_text_content(Some(title));
    }

    fn set_back_target(&self, target: &str) {
        if let Err(err) = self.back_button.dataset().set("backTo", target) {
            web_sys::console::error_1(&err);
        }
    }

    fn set_back_visible(&self, visible: bool) {
        self.back_button.set_hidden(!visible);
    }

    fn mount_template(&self, template_id: &str) -> Result<(), HostError> {
        let template = self
            .document
            .get_element_by_id(template_id)
            .and_then(|el| el.dyn_into::<HtmlTemplateElement>().ok())
            .ok_or_else(|| HostError::MissingTemplate {
                id: template_id.to_string(),
            })?;
        let fragment = template
            .content()
            .clone_node_with_deep(true)
            .map_err(|e| HostError::Dom(describe(&e)))?;
        self.view_container.replace_children_with_node_1(&fragment);
        Ok(())
    }

    fn clear_view(&self) {
        while let Some(child) = self.view_container.first_child() {
            if let Err(err) = self.view_container.remove_child(&child) {
                web_sys::console::error_1(&err);
                break;
            }
        }
    }

    fn hide_view(&self) -> LocalBoxFuture<'_, Result<(), HostError>> {
        self.transition(false)
    }

    fn show_view(&self) -> LocalBoxFuture<'_, Result<(), HostError>> {
        self.transition(true)
    }
}
