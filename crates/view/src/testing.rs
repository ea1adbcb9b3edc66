//! Recording fakes for the controller's collaborators.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;

use crate::host::{DomHost, HostError};
use crate::world::{PropsObject, SceneNodeId, SceneWorld, WorldError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    SetTitle(String),
    SetBackTarget(String),
    SetBackVisible(bool),
    MountTemplate(String),
    ClearView,
    HideView,
    ShowView,
}

#[derive(Debug, Default)]
pub struct FakeHost {
    templates: Vec<String>,
    calls: RefCell<Vec<HostCall>>,
    back_visible: Cell<bool>,
    back_target: RefCell<Option<String>>,
    fail_hide: Cell<bool>,
    fail_show: Cell<bool>,
}

impl FakeHost {
    pub fn with_templates(ids: &[&str]) -> Self {
        Self {
            templates: ids.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<HostCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn back_visible(&self) -> bool {
        self.back_visible.get()
    }

    pub fn back_target(&self) -> Option<String> {
        self.back_target.borrow().clone()
    }

    pub fn fail_hide(&self, fail: bool) {
        self.fail_hide.set(fail);
    }

    pub fn fail_show(&self, fail: bool) {
        self.fail_show.set(fail);
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl DomHost for FakeHost {
    fn set_title(&self, title: &str) {
        self.record(HostCall::SetTitle(title.to_string()));
    }

    fn set_back_target(&self, target: &str) {
        *self.back_target.borrow_mut() = Some(target.to_string());
        self.record(HostCall::SetBackTarget(target.to_string()));
    }

    fn set_back_visible(&self, visible: bool) {
        self.back_visible.set(visible);
        self.record(HostCall::SetBackVisible(visible));
    }

    fn mount_template(&self, template_id: &str) -> Result<(), HostError> {
        if !self.templates.iter().any(|t| t == template_id) {
            return Err(HostError::MissingTemplate {
                id: template_id.to_string(),
            });
        }
        self.record(HostCall::MountTemplate(template_id.to_string()));
        Ok(())
    }

    fn clear_view(&self) {
        self.record(HostCall::ClearView);
    }

    fn hide_view(&self) -> LocalBoxFuture<'_, Result<(), HostError>> {
        self.record(HostCall::HideView);
        let fail = self.fail_hide.get();
        async move {
            YieldNow::times(1).await;
            if fail {
                Err(HostError::Transition("hide rejected".to_string()))
            } else {
                Ok(())
            }
        }
        .boxed_local()
    }

    fn show_view(&self) -> LocalBoxFuture<'_, Result<(), HostError>> {
        self.record(HostCall::ShowView);
        let fail = self.fail_show.get();
        async move {
            YieldNow::times(1).await;
            if fail {
                Err(HostError::Transition("show rejected".to_string()))
            } else {
                Ok(())
            }
        }
        .boxed_local()
    }
}

/// Returns `Pending` a fixed number of times before completing.
pub struct YieldNow {
    remaining: usize,
}

impl YieldNow {
    pub fn times(remaining: usize) -> Self {
        Self { remaining }
    }
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.remaining == 0 {
            return Poll::Ready(());
        }
        self.remaining -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldCall {
    pub path: String,
    pub props: Option<PropsObject>,
}

#[derive(Debug, Default)]
pub struct FakeWorld {
    failing: Vec<String>,
    hung: Vec<String>,
    delays: BTreeMap<String, usize>,
    next_id: Cell<u64>,
    calls: RefCell<Vec<WorldCall>>,
    settled: RefCell<Vec<String>>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, path: &str) -> Self {
        self.failing.push(path.to_string());
        self
    }

    /// Make loads of `path` never complete.
    pub fn hung(mut self, path: &str) -> Self {
        self.hung.push(path.to_string());
        self
    }

    /// Make loads of `path` stay pending for `polls` polls.
    pub fn delayed(mut self, path: &str, polls: usize) -> Self {
        self.delays.insert(path.to_string(), polls);
        self
    }

    pub fn calls(&self) -> Vec<WorldCall> {
        self.calls.borrow().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.path.clone()).collect()
    }

    /// Paths whose loads have completed, in completion order.
    pub fn settled(&self) -> Vec<String> {
        self.settled.borrow().clone()
    }
}

impl SceneWorld for FakeWorld {
    fn add_from_file<'a>(
        &'a self,
        path: &'a str,
        props: Option<&'a PropsObject>,
    ) -> LocalBoxFuture<'a, Result<SceneNodeId, WorldError>> {
        self.calls.borrow_mut().push(WorldCall {
            path: path.to_string(),
            props: props.cloned(),
        });
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let delay = self.delays.get(path).copied().unwrap_or(0);
        let hung = self.hung.iter().any(|p| p == path);

        async move {
            if hung {
                std::future::pending::<()>().await;
            }
            YieldNow::times(delay).await;
            self.settled.borrow_mut().push(path.to_string());
            if self.failing.iter().any(|p| p == path) {
                Err(WorldError::new(path, "file not found"))
            } else {
                Ok(SceneNodeId(id))
            }
        }
        .boxed_local()
    }
}

/// Log output captured from a `tracing_subscriber::fmt` subscriber.
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Runs `f` with a subscriber writing into the returned buffer.
    pub fn capture<R>(f: impl FnOnce() -> R) -> (R, CapturedLogs) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, logs)
    }

    pub fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
