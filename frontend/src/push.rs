//! Push channel to the detection service. Prefers a websocket; when the
//! socket cannot be opened the channel degrades to polling the history
//! endpoint and synthesizing update events from new entries.

use std::cell::RefCell;
use std::rc::Rc;

use engine::{EngineError, EventSource};
use futures::StreamExt;
use gloo_net::http::Request;
use gloo_net::websocket::{Message, futures::WebSocket};
use gloo_timers::callback::Interval;
use shared::{HistoryResponse, PushEvent};

const POLL_PERIOD_MS: u32 = 10_000;

pub struct PushChannel {
    base: String,
    poll_timer: RefCell<Option<Interval>>,
}

impl PushChannel {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            poll_timer: RefCell::new(None),
        }
    }

    fn socket_url(&self) -> Option<String> {
        let location = web_sys::window()?.location();
        let scheme = match location.protocol().ok()?.as_str() {
            "https:" => "wss",
            _ => "ws",
        };
        let host = location.host().ok()?;
        Some(format!("{scheme}://{host}{}/ws", self.base))
    }

    fn start_polling(&self, sink: Rc<dyn Fn(PushEvent)>) {
        let url = format!("{}/api/history?limit=1", self.base);
        let last_seen: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));
        let timer = Interval::new(POLL_PERIOD_MS, move || {
            let url = url.clone();
            let last_seen = last_seen.clone();
            let sink = sink.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let body = match Request::get(&url).send().await {
                    Ok(response) => response.json::<HistoryResponse>().await,
                    Err(err) => Err(err),
                };
                let latest = match body {
                    Ok(body) => body.history.into_iter().next_back(),
                    Err(err) => {
                        log::debug!("history poll failed: {err}");
                        return;
                    }
                };
                let Some(entry) = latest else { return };
                let mut seen = last_seen.borrow_mut();
                match seen.as_deref() {
                    // first poll only establishes the baseline
                    None => *seen = Some(entry.timestamp),
                    Some(previous) if previous != entry.timestamp => {
                        *seen = Some(entry.timestamp);
                        drop(seen);
                        sink(PushEvent {
                            kind: PushEvent::DETECTION_UPDATE.to_string(),
                            message: "New detection recorded".to_string(),
                        });
                    }
                    Some(_) => {}
                }
            });
        });
        *self.poll_timer.borrow_mut() = Some(timer);
    }
}

impl EventSource for PushChannel {
    fn connect(&self, sink: Box<dyn Fn(PushEvent)>) -> Result<(), EngineError> {
        let sink: Rc<dyn Fn(PushEvent)> = Rc::from(sink);
        let url = self
            .socket_url()
            .ok_or_else(|| EngineError::ChannelUnavailable("no window location".to_string()))?;

        match WebSocket::open(&url) {
            Ok(socket) => {
                let sink = sink.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let (_, mut read) = socket.split();
                    while let Some(message) = read.next().await {
                        match message {
                            Ok(Message::Text(text)) => match serde_json::from_str(&text) {
                                Ok(event) => sink(event),
                                Err(err) => log::debug!("unparseable push frame: {err}"),
                            },
                            Ok(Message::Bytes(_)) => {}
                            Err(err) => {
                                log::warn!("push socket closed: {err}");
                                break;
                            }
                        }
                    }
                });
                Ok(())
            }
            Err(err) => {
                log::warn!("push socket unavailable, falling back to polling: {err}");
                self.start_polling(sink);
                Ok(())
            }
        }
    }

    fn disconnect(&self) {
        // an open socket lives for the page lifetime; only polling is stopped
        self.poll_timer.borrow_mut().take();
    }
}
