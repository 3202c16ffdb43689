// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Generation orchestrator.
//!
//! A [`Session`] drives `Idle → Generating → Rendering → Ready | Failed` for one caller and
//! owns the retained source/artifact pair used by export.
//!
//! All mutable state lives in one [`SessionState`] behind a `std::sync::Mutex`. The lock is only
//! taken for short, synchronous sections and is never held across an `.await`; in-flight flags
//! are released by drop guards, so they are cleared on success, failure and cancellation alike.


use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::{ExportError, FlowError, Stage, ValidationError};
use crate::export::{export_artifact, export_filename, now_millis, ExportedFile};
use crate::generate::Generator;
use crate::model::{
    GeneratedSource, GenerationRequest, NotationKind, OutputFormat, RenderedArtifact, SessionId,
};
use crate::render::Renderer;
use crate::route::CategoryRouter;

pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowState {
    #[default]
    Idle,
    Generating,
    Rendering,
    Ready,
    Failed,
}

impl FlowState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Rendering => "rendering",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }

    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Generating | Self::Rendering)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub generation: Duration,
    pub rendering: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            generation: DEFAULT_STAGE_TIMEOUT,
            rendering: DEFAULT_STAGE_TIMEOUT,
        }
    }
}

/// What happened to a `generate` call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Ready {
        source: GeneratedSource,
        artifact: RenderedArtifact,
    },
    /// Another flow was already in flight; nothing was done.
    Ignored,
    /// The session was reset while this flow ran; its result was dropped.
    Discarded,
}

#[derive(Debug, Default)]
struct SessionState {
    request: Option<GenerationRequest>,
    source: Option<GeneratedSource>,
    artifact: Option<RenderedArtifact>,
    flow: FlowState,
    error: Option<FlowError>,
    title: Option<String>,
    epoch: u64,
    flight: Option<u64>,
    next_flight: u64,
    exporting: bool,
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: FlowState,
    pub description: Option<String>,
    pub category: Option<String>,
    pub notation: Option<NotationKind>,
    pub code: Option<String>,
    pub svg: Option<String>,
    pub error: Option<String>,
    pub title: Option<String>,
    pub epoch: u64,
    pub exporting: bool,
}

fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the in-flight marker when the flow that set it ends, however it ends.
struct FlightGuard<'a> {
    state: &'a Mutex<SessionState>,
    token: u64,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        if state.flight != Some(self.token) {
            return;
        }
        state.flight = None;
        if state.flow.is_in_flight() {
            // Dropped mid-flow; nothing else will commit a terminal state.
            warn!(state = state.flow.as_str(); "flow cancelled");
            state.flow = FlowState::Failed;
            state.error = Some(FlowError::Cancelled);
        }
    }
}

struct BusyGuard<'a> {
    state: &'a Mutex<SessionState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        lock_state(self.state).exporting = false;
    }
}

pub struct Session<G, R> {
    generator: Arc<G>,
    renderer: Arc<R>,
    router: CategoryRouter,
    timeouts: Timeouts,
    state: Mutex<SessionState>,
}

impl<G, R> std::fmt::Debug for Session<G, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("router", &self.router)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl<G: Generator, R: Renderer> Session<G, R> {
    pub fn new(generator: Arc<G>, renderer: Arc<R>) -> Self {
        Self::with_options(
            generator,
            renderer,
            CategoryRouter::default(),
            Timeouts::default(),
        )
    }

    pub fn with_options(
        generator: Arc<G>,
        renderer: Arc<R>,
        router: CategoryRouter,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            generator,
            renderer,
            router,
            timeouts,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = lock_state(&self.state);
        let svg = state.artifact.as_ref().and_then(RenderedArtifact::as_svg);
        SessionSnapshot {
            state: state.flow,
            description: state.request.as_ref().map(|r| r.description().to_owned()),
            category: state.request.as_ref().map(|r| r.category().to_owned()),
            notation: state.source.as_ref().map(GeneratedSource::notation),
            code: state.source.as_ref().map(|s| s.code().to_owned()),
            svg: svg.map(str::to_owned),
            error: state.error.as_ref().map(ToString::to_string),
            title: state.title.clone(),
            epoch: state.epoch,
            exporting: state.exporting,
        }
    }

    pub fn set_title(&self, title: Option<String>) {
        let title = title
            .map(|title| title.trim().to_owned())
            .filter(|title| !title.is_empty());
        lock_state(&self.state).title = title;
    }

    /// Clears the session and invalidates any flow still in flight.
    pub fn reset(&self) {
        let mut state = lock_state(&self.state);
        state.epoch = state.epoch.wrapping_add(1);
        state.request = None;
        state.source = None;
        state.artifact = None;
        state.error = None;
        state.title = None;
        state.flow = FlowState::Idle;
        state.flight = None;
        debug!(epoch = state.epoch; "session reset");
    }

    /// Runs one generate → render flow.
    ///
    /// A blank description fails validation before any dependency is called and leaves the
    /// session untouched. A call made while another flow is in flight returns
    /// [`GenerateOutcome::Ignored`].
    pub async fn generate(
        &self,
        description: &str,
        category: &str,
    ) -> Result<GenerateOutcome, FlowError> {
        let request = GenerationRequest::new(description, category)?;

        let (epoch, token) = {
            let mut state = lock_state(&self.state);
            if state.flight.is_some() {
                debug!(state = state.flow.as_str(); "flow already in flight, ignoring request");
                return Ok(GenerateOutcome::Ignored);
            }
            let token = state.next_flight;
            state.next_flight = state.next_flight.wrapping_add(1);
            state.flight = Some(token);
            state.flow = FlowState::Generating;
            state.request = Some(request.clone());
            state.source = None;
            state.artifact = None;
            state.error = None;
            (state.epoch, token)
        };
        let _flight = FlightGuard {
            state: &self.state,
            token,
        };

        let route = self.router.resolve(request.category());
        debug!(
            notation = route.notation.as_str(),
            category = route.category.as_str();
            "generating"
        );

        let generated = tokio::time::timeout(
            self.timeouts.generation,
            self.generator.generate(&request, &route),
        )
        .await;
        let source = match generated {
            Ok(Ok(source)) => source,
            Ok(Err(err)) => return self.fail(epoch, FlowError::Generation(err)),
            Err(_) => {
                let err = FlowError::Timeout {
                    stage: Stage::Generation,
                    after: self.timeouts.generation,
                };
                return self.fail(epoch, err);
            }
        };

        {
            let mut state = lock_state(&self.state);
            if state.epoch != epoch {
                return Ok(GenerateOutcome::Discarded);
            }
            state.source = Some(source.clone());
            state.flow = FlowState::Rendering;
        }
        debug!(notation = source.notation().as_str(); "rendering");

        let rendered = tokio::time::timeout(
            self.timeouts.rendering,
            self.renderer.render(&source, OutputFormat::Svg),
        )
        .await;
        let artifact = match rendered {
            Ok(Ok(artifact)) => artifact,
            Ok(Err(err)) => return self.fail(epoch, FlowError::Render(err)),
            Err(_) => {
                let err = FlowError::Timeout {
                    stage: Stage::Rendering,
                    after: self.timeouts.rendering,
                };
                return self.fail(epoch, err);
            }
        };

        let mut state = lock_state(&self.state);
        if state.epoch != epoch {
            return Ok(GenerateOutcome::Discarded);
        }
        state.artifact = Some(artifact.clone());
        state.flow = FlowState::Ready;
        info!(
            notation = source.notation().as_str(),
            bytes = artifact.as_bytes().len();
            "diagram ready"
        );
        Ok(GenerateOutcome::Ready { source, artifact })
    }

    fn fail(&self, epoch: u64, err: FlowError) -> Result<GenerateOutcome, FlowError> {
        let mut state = lock_state(&self.state);
        if state.epoch != epoch {
            return Ok(GenerateOutcome::Discarded);
        }
        warn!(state = state.flow.as_str(), error = err.to_string(); "flow failed");
        state.flow = FlowState::Failed;
        state.error = Some(err.clone());
        Err(err)
    }

    /// Exports the retained diagram. Only one export runs at a time per session.
    pub async fn export(&self, format: OutputFormat) -> Result<ExportedFile, ExportError> {
        let (source, artifact, title) = {
            let mut state = lock_state(&self.state);
            if state.exporting {
                return Err(ExportError::Busy);
            }
            let (Some(source), Some(artifact)) = (state.source.clone(), state.artifact.clone())
            else {
                return Err(ValidationError::NothingToExport.into());
            };
            state.exporting = true;
            (source, artifact, state.title.clone())
        };
        let _busy = BusyGuard { state: &self.state };

        let filename = export_filename(title.as_deref(), format, now_millis());
        let limit = self.timeouts.rendering;
        let renderer = self.renderer.as_ref();
        let exported = tokio::time::timeout(
            limit,
            export_artifact(renderer, &source, &artifact, format, filename),
        )
        .await
        .map_err(|_| ExportError::Timeout { after: limit })
        .and_then(|result| result);

        match &exported {
            Ok(file) => {
                info!(filename = file.filename.as_str(), mime = file.mime_type; "exported diagram")
            }
            Err(err) => warn!(format = format.as_str(), error = err.to_string(); "export failed"),
        }
        exported
    }
}

/// Sessions keyed by id, all sharing one generator and renderer.
pub struct SessionRegistry<G, R> {
    generator: Arc<G>,
    renderer: Arc<R>,
    router: CategoryRouter,
    timeouts: Timeouts,
    sessions: Mutex<BTreeMap<SessionId, Arc<Session<G, R>>>>,
}

impl<G: Generator, R: Renderer> SessionRegistry<G, R> {
    pub fn new(
        generator: Arc<G>,
        renderer: Arc<R>,
        router: CategoryRouter,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            generator,
            renderer,
            router,
            timeouts,
            sessions: Mutex::new(BTreeMap::new()),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, BTreeMap<SessionId, Arc<Session<G, R>>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn router(&self) -> CategoryRouter {
        self.router
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn generator(&self) -> &Arc<G> {
        &self.generator
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<Session<G, R>>> {
        self.sessions().get(id).cloned()
    }

    pub fn get_or_create(&self, id: &SessionId) -> Arc<Session<G, R>> {
        let mut sessions = self.sessions();
        let open = sessions.len();
        sessions
            .entry(id.clone())
            .or_insert_with(|| {
                debug!(session = id.as_str(), open = open; "creating session");
                Arc::new(Session::with_options(
                    self.generator.clone(),
                    self.renderer.clone(),
                    self.router,
                    self.timeouts,
                ))
            })
            .clone()
    }
}
