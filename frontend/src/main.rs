use std::collections::HashMap;
use std::rc::Rc;

use engine::{
    AlertView, BatchOutcome, BatchProgress, DetectionEngine, EngineDeps, LiveAlert, ProgressUpdate,
};
use gloo_file::{File as GlooFile, ObjectUrl};
use shared::{DetectionResponse, DetectionStats, ModelInfo};
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, MediaStream};
use yew::prelude::*;

mod api;
mod components;
mod platform;
mod push;

use api::HttpTransport;
use engine::{HistoryRecord, UiUpdate};
use platform::{BrowserScheduler, BrowserSpawner, CameraFeed, EngineLink};
use push::PushChannel;

// Models
#[derive(Clone)]
struct FileData {
    id: u64,
    file: GlooFile,
    preview_url: Option<ObjectUrl>,
}

// Yew msg components
enum Msg {
    // File operations
    FilesAdded(Vec<GlooFile>),
    AddPreview(u64, ObjectUrl),
    RemoveFile(u64),
    SelectFile(u64),
    ClearAllFiles,

    // Engine output
    Engine(UiUpdate),

    // Analysis operations
    AnalyzeSelected,
    AnalyzeAll,
    SingleResult(u64, DetectionResponse),
    SingleFailed(u64),
    BatchFinished(BatchOutcome),

    // Detection settings
    SetModel(String),
    SetConfidence(f64),
    TogglePersist,

    // Live feed
    StartFeed,
    FeedStarted(MediaStream),
    FeedFailed(String),
    StopFeed,
    ToggleRealtime,

    // UI states
    DismissAlert,
    SetDragging(bool),
    RefreshHistory,
    RefreshStats,

    // Input events
    HandleDrop(DragEvent),
}

// Main component
struct Model {
    engine: Rc<DetectionEngine>,
    files: HashMap<u64, FileData>,
    selected_file_id: Option<u64>,
    results: HashMap<u64, DetectionResponse>,
    batch_results: Option<BatchOutcome>,
    loading: bool,
    is_dragging: bool,
    progress: Option<ProgressUpdate>,
    batch_progress: Option<BatchProgress>,
    alert: Option<AlertView>,
    live_alert: Option<LiveAlert>,
    history: Vec<HistoryRecord>,
    models: Vec<ModelInfo>,
    stats: DetectionStats,
    video_ref: NodeRef,
    stream: Option<MediaStream>,
    realtime_enabled: bool,
    feed_error: Option<String>,
}

// Yew component implementation
impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let video_ref = NodeRef::default();
        let engine = DetectionEngine::new(EngineDeps {
            transport: Rc::new(HttpTransport::new("")),
            scheduler: Rc::new(BrowserScheduler),
            spawner: Rc::new(BrowserSpawner),
            presenter: Rc::new(EngineLink::new(ctx.link().clone())),
            frames: Rc::new(CameraFeed::new(video_ref.clone())),
            events: Some(Rc::new(PushChannel::new(""))),
        });

        let boot = engine.clone();
        spawn_local(async move {
            boot.bootstrap().await;
        });

        Self {
            engine,
            files: HashMap::new(),
            selected_file_id: None,
            results: HashMap::new(),
            batch_results: None,
            loading: false,
            is_dragging: false,
            progress: None,
            batch_progress: None,
            alert: None,
            live_alert: None,
            history: Vec::new(),
            models: Vec::new(),
            stats: DetectionStats::default(),
            video_ref,
            stream: None,
            realtime_enabled: false,
            feed_error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // File operations
            Msg::FilesAdded(files) => components::handlers::handle_files_added(self, ctx, files),
            Msg::AddPreview(id, url) => components::handlers::handle_add_preview(self, id, url),
            Msg::RemoveFile(id) => components::handlers::handle_remove_file(self, id),
            Msg::SelectFile(id) => components::handlers::handle_select_file(self, id),
            Msg::ClearAllFiles => components::handlers::handle_clear_all_files(self),

            // Engine output
            Msg::Engine(update) => components::handlers::handle_engine_update(self, update),

            // Analysis operations
            Msg::AnalyzeSelected => components::handlers::handle_analyze_selected(self, ctx),
            Msg::AnalyzeAll => components::handlers::handle_analyze_all(self, ctx),
            Msg::SingleResult(file_id, response) => {
                self.results.insert(file_id, response);
                self.loading = false;
                true
            }
            Msg::SingleFailed(_file_id) => {
                self.loading = false;
                true
            }
            Msg::BatchFinished(outcome) => {
                self.batch_results = Some(outcome);
                self.loading = false;
                true
            }

            // Detection settings
            Msg::SetModel(model_id) => {
                self.engine.set_model(model_id);
                true
            }
            Msg::SetConfidence(value) => {
                self.engine.set_confidence(value);
                true
            }
            Msg::TogglePersist => {
                let persist = !self.engine.settings().persist;
                self.engine.set_persist(persist);
                true
            }

            // Live feed
            Msg::StartFeed => components::handlers::handle_start_feed(self, ctx),
            Msg::FeedStarted(stream) => components::handlers::handle_feed_started(self, stream),
            Msg::FeedFailed(reason) => {
                self.feed_error = Some(reason);
                true
            }
            Msg::StopFeed => components::handlers::handle_stop_feed(self),
            Msg::ToggleRealtime => {
                self.realtime_enabled = !self.realtime_enabled;
                self.engine.set_realtime(self.realtime_enabled);
                true
            }

            // UI states
            Msg::DismissAlert => {
                self.engine.dismiss_alert();
                false
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::RefreshHistory => {
                let engine = self.engine.clone();
                spawn_local(async move {
                    engine.refresh_history().await;
                });
                false
            }
            Msg::RefreshStats => {
                let engine = self.engine.clone();
                spawn_local(async move {
                    engine.refresh_stats().await;
                });
                false
            }

            // Input events
            Msg::HandleDrop(event) => components::handlers::handle_drop(self, ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { components::header::render_header() }
                { components::overlays::render_alert(self, ctx) }

                <main class="main-content">
                    { components::settings_panel::render_settings(self, ctx) }
                    { components::upload_section::render_upload_section(self, ctx) }
                    { components::overlays::render_progress(self) }
                    { components::results::render_results(self) }
                    { components::live_feed::render_live_feed(self, ctx) }
                    { components::history_panel::render_history(self, ctx) }
                    { components::stats_panel::render_stats(self, ctx) }
                </main>

                <footer class="app-footer">
                    <p>{"Fire & Smoke Detection | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        if let Some(stream) = &self.stream {
            platform::stop_camera(stream);
        }
        self.engine.shutdown();
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
