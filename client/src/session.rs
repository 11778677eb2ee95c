//! Session driver. Sequences stroke capture, submission and replay.
//!
//! DESIGN
//! ======
//! `Session` owns the controller ([`EngineCore`]), a [`Gateway`], a drawing
//! [`Surface`] and a [`Host`] for the few things that surface above the
//! canvas (alerts, the loading indicator, the author list). Every network
//! step is awaited in order: a submit fully completes before its trailing
//! refresh starts, and nothing is cancelled once started.
//!
//! Every method takes `&self`. Controller, surface and host live in
//! `RefCell`s and no borrow is held across an `.await`, so a host can keep
//! dispatching pointer and control events while a submit or refresh is in
//! flight. Those events meet the controller's refresh gate: a pointer-down
//! mid-refresh is rejected with an alert instead of waiting for the refresh.
//!
//! Failures never escape. A failed submit leaves that stroke unsent; a failed
//! fetch leaves the registry as it was. Both are logged and the refresh gate
//! still reopens.

use std::cell::{Ref, RefCell};
use std::fmt::Debug;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use canvas::doc::{Stroke, UserRegistry};
use canvas::engine::{Action, EngineCore, paint_actions};
use canvas::input::RefreshKind;
use canvas::surface::Surface;
use canvas::viewport::{CanvasRect, Point};
use tracing::{debug, error, info, warn};

use crate::config::ClientConfig;
use crate::gateway::Gateway;

/// Callbacks into whatever hosts the canvas.
pub trait Host {
    /// Show a blocking message to the user.
    fn alert(&mut self, message: &str);

    /// Show or hide the loading indicator.
    fn set_loading(&mut self, loading: bool);

    /// The distinct authors seen so far, for the author selector.
    fn authors_changed(&mut self, authors: &[String]);
}

pub struct Session<G, S, H> {
    core: RefCell<EngineCore>,
    gateway: G,
    surface: RefCell<S>,
    host: RefCell<H>,
    author: String,
    refresh_hold: Duration,
}

impl<G, S, H> Session<G, S, H>
where
    G: Gateway,
    S: Surface,
    S::Error: Debug,
    H: Host,
{
    #[must_use]
    pub fn new(config: &ClientConfig, gateway: G, surface: S, host: H) -> Self {
        let registry = UserRegistry::generate(now_ms(), config.username.clone());
        Self {
            core: RefCell::new(EngineCore::new(registry)),
            gateway,
            surface: RefCell::new(surface),
            host: RefCell::new(host),
            author: config.username.clone(),
            refresh_hold: config.refresh_hold,
        }
    }

    /// Borrow the controller. Do not hold the guard across an `.await` on this session.
    #[must_use]
    pub fn core(&self) -> Ref<'_, EngineCore> {
        self.core.borrow()
    }

    #[must_use]
    pub fn surface(&self) -> Ref<'_, S> {
        self.surface.borrow()
    }

    #[must_use]
    pub fn host(&self) -> Ref<'_, H> {
        self.host.borrow()
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Initial load: clear, fetch everything, replay.
    pub async fn mount(&self) {
        self.refresh(RefreshKind::Full).await;
    }

    // --- Pointer input ---

    pub fn pointer_down(&self, client: Point, rect: &CanvasRect) {
        let actions = self.core.borrow_mut().begin_stroke(client, rect);
        self.run_local(actions);
    }

    pub fn pointer_move(&self, client: Point, rect: &CanvasRect) {
        let actions = self.core.borrow_mut().extend_stroke(client, rect);
        self.run_local(actions);
    }

    /// Finish the stroke, submit it, then catch up with the store and redraw.
    pub async fn pointer_up(&self) {
        let actions = self.core.borrow_mut().end_stroke(now_ms());
        for stroke in self.run_local(actions) {
            self.submit_and_refresh(stroke).await;
        }
    }

    /// Leaving the canvas mid-drag finishes the stroke like a pointer-up.
    pub async fn pointer_leave(&self) {
        self.pointer_up().await;
    }

    // --- Controls ---

    pub fn set_color(&self, color: &str) {
        self.core.borrow_mut().set_color(color);
    }

    pub fn set_line_width(&self, width: f64) {
        self.core.borrow_mut().set_line_width(width);
    }

    /// Change the highlighted author; `""` highlights everyone. Triggers a full refresh on change.
    pub async fn set_filter(&self, author: &str) {
        let changed = self.core.borrow_mut().set_filter(author);
        if changed {
            info!(author, "author filter changed");
            self.refresh(RefreshKind::Full).await;
        }
    }

    /// Refresh-button handler. Returns `false` if a submit or refresh was already running.
    pub async fn manual_refresh(&self) -> bool {
        self.refresh(RefreshKind::Full).await
    }

    /// Clear-button handler: forget local strokes and wipe the surface.
    pub fn clear(&self) {
        let actions = self.core.borrow_mut().clear();
        self.run_local(actions);
    }

    // --- Internals ---

    /// Paint and alert locally; return any strokes that need submitting.
    fn run_local(&self, actions: Vec<Action>) -> Vec<Stroke> {
        if let Err(e) = paint_actions(&mut *self.surface.borrow_mut(), &actions) {
            warn!(error = ?e, "surface paint failed");
        }
        let mut to_submit = Vec::new();
        for action in actions {
            match action {
                Action::Notify(message) => self.host.borrow_mut().alert(&message),
                Action::Submit(stroke) => to_submit.push(stroke),
                Action::PaintSegment { .. } | Action::ClearSurface => {}
            }
        }
        to_submit
    }

    /// One loading cycle: the indicator goes up before the submit and down after the catch-up.
    async fn submit_and_refresh(&self, stroke: Stroke) {
        self.host.borrow_mut().set_loading(true);
        match self.gateway.submit(&stroke, &self.author).await {
            Ok(()) => info!(stroke_id = %stroke.id, points = stroke.points.len(), "stroke submitted"),
            Err(e) => error!(stroke_id = %stroke.id, error = %e, "stroke submit failed"),
        }
        if !self.run_refresh(RefreshKind::CatchUp, false).await {
            self.host.borrow_mut().set_loading(false);
        }
    }

    async fn refresh(&self, kind: RefreshKind) -> bool {
        self.run_refresh(kind, true).await
    }

    async fn run_refresh(&self, kind: RefreshKind, show_loading: bool) -> bool {
        let offset = {
            let mut core = self.core.borrow_mut();
            if !core.begin_refresh(kind) {
                debug!(?kind, "refresh already in progress");
                return false;
            }
            core.fetch_offset(kind)
        };
        if show_loading {
            self.host.borrow_mut().set_loading(true);
        }
        if kind == RefreshKind::Full {
            self.run_local(vec![Action::ClearSurface]);
        }

        let fetched = self.gateway.fetch_from(offset).await;

        let authors = {
            let mut core = self.core.borrow_mut();
            match fetched {
                Ok(batch) => {
                    if batch.skipped > 0 {
                        warn!(skipped = batch.skipped, offset, "dropped unusable records");
                    }
                    debug!(strokes = batch.strokes.len(), offset, "canvas refreshed");
                    core.apply_batch(batch);
                }
                Err(e) => error!(offset, error = %e, "canvas refresh failed"),
            }
            if let Err(e) = core.redraw(&mut *self.surface.borrow_mut()) {
                warn!(error = ?e, "replay failed");
            }
            (!core.filter.is_active()).then(|| core.authors())
        };
        if let Some(authors) = authors {
            self.host.borrow_mut().authors_changed(&authors);
        }

        if !self.refresh_hold.is_zero() {
            tokio::time::sleep(self.refresh_hold).await;
        }
        self.core.borrow_mut().finish_refresh();
        self.host.borrow_mut().set_loading(false);
        true
    }
}

fn now_ms() -> i64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(duration.as_millis()).unwrap_or(0)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
