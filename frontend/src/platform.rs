//! Browser-side implementations of the engine's ports: gloo timers, the
//! wasm-bindgen spawner, camera frame capture and the Yew presenter bridge.

use engine::{
    CapturedFrame, EngineError, FrameSource, Presenter, Scheduler, Spawner, TimerHandle, UiUpdate,
};
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlAudioElement, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints,
};
use yew::NodeRef;
use yew::html::Scope;

use crate::{Model, Msg};

pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn repeating(&self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> TimerHandle {
        let interval = Interval::new(period_ms, move || tick());
        TimerHandle::new(move || {
            interval.cancel();
        })
    }

    fn once(&self, delay_ms: u32, action: Box<dyn FnOnce()>) -> TimerHandle {
        let timeout = Timeout::new(delay_ms, action);
        TimerHandle::new(move || {
            timeout.cancel();
        })
    }
}

pub struct BrowserSpawner;

impl Spawner for BrowserSpawner {
    fn spawn(&self, fut: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(fut);
    }
}

/// Forwards engine output into the Yew update loop.
pub struct EngineLink {
    link: Scope<Model>,
}

impl EngineLink {
    pub fn new(link: Scope<Model>) -> Self {
        Self { link }
    }
}

impl Presenter for EngineLink {
    fn emit(&self, update: UiUpdate) {
        self.link.send_message(Msg::Engine(update));
    }
}

fn capture_error(context: &str) -> EngineError {
    EngineError::RequestFailed(context.to_string())
}

fn js_error(err: JsValue) -> EngineError {
    EngineError::RequestFailed(format!("{err:?}"))
}

/// Grabs still frames from the mounted `<video>` element by drawing the
/// current frame onto an offscreen canvas and encoding it as JPEG.
pub struct CameraFeed {
    video: NodeRef,
}

impl CameraFeed {
    pub fn new(video: NodeRef) -> Self {
        Self { video }
    }
}

impl FrameSource for CameraFeed {
    fn capture(&self) -> LocalBoxFuture<'static, Result<CapturedFrame, EngineError>> {
        let video_ref = self.video.clone();
        Box::pin(async move {
            let video: HtmlVideoElement = video_ref
                .cast()
                .ok_or_else(|| capture_error("live feed element not mounted"))?;
            if video.video_width() == 0 {
                return Err(capture_error("live feed has produced no frames yet"));
            }

            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| capture_error("document unavailable"))?;
            let canvas: HtmlCanvasElement = document
                .create_element("canvas")
                .map_err(js_error)?
                .dyn_into()
                .map_err(|_| capture_error("canvas creation failed"))?;
            canvas.set_width(video.video_width());
            canvas.set_height(video.video_height());

            let context: CanvasRenderingContext2d = canvas
                .get_context("2d")
                .map_err(js_error)?
                .ok_or_else(|| capture_error("2d context unavailable"))?
                .dyn_into()
                .map_err(|_| capture_error("2d context unavailable"))?;
            context
                .draw_image_with_html_video_element(&video, 0.0, 0.0)
                .map_err(js_error)?;

            let (tx, rx) = oneshot::channel();
            let callback = Closure::once(move |blob: JsValue| {
                let _ = tx.send(blob);
            });
            canvas
                .to_blob_with_type(callback.as_ref().unchecked_ref(), "image/jpeg")
                .map_err(js_error)?;
            callback.forget();

            let blob = rx
                .await
                .map_err(|_| capture_error("frame capture aborted"))?;
            let blob: web_sys::Blob = blob
                .dyn_into()
                .map_err(|_| capture_error("camera produced no frame"))?;
            let bytes = gloo_file::futures::read_as_bytes(&blob.into())
                .await
                .map_err(|err| EngineError::RequestFailed(err.to_string()))?;

            Ok(CapturedFrame {
                bytes,
                filename: "live_frame.jpg".to_string(),
            })
        })
    }
}

pub async fn open_camera() -> Result<MediaStream, String> {
    let window = web_sys::window().ok_or("no window")?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|err| format!("{err:?}"))?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);
    constraints.set_audio(&JsValue::FALSE);

    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|err| format!("{err:?}"))?;
    let stream = JsFuture::from(promise)
        .await
        .map_err(|err| format!("camera access denied: {err:?}"))?;
    stream
        .dyn_into::<MediaStream>()
        .map_err(|_| "unexpected stream type".to_string())
}

pub fn stop_camera(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<web_sys::MediaStreamTrack>() {
            track.stop();
        }
    }
}

pub fn play_alert_cue() {
    if let Ok(audio) = HtmlAudioElement::new_with_src("/static/alert.mp3") {
        let _ = audio.play();
    }
}
