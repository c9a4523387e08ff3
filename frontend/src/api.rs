//! HTTP adapter for the remote detection service, built on gloo-net.

use engine::{DetectionTransport, EngineError, Submission, TransportFuture};
use gloo_net::http::Request;
use shared::{
    DetectionResponse, DetectionStats, HistoryEntry, HistoryResponse, ModelInfo, ModelsResponse,
    StatsResponse,
};
use wasm_bindgen::JsValue;
use web_sys::FormData;

pub struct HttpTransport {
    base: String,
}

impl HttpTransport {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

fn js_error(err: JsValue) -> EngineError {
    EngineError::RequestFailed(format!("{err:?}"))
}

fn net_error(err: gloo_net::Error) -> EngineError {
    EngineError::RequestFailed(err.to_string())
}

fn multipart(submission: &Submission) -> Result<FormData, EngineError> {
    let form = FormData::new().map_err(js_error)?;
    let blob = gloo_file::Blob::new(submission.payload.as_slice());
    form.append_with_blob_and_filename("file", blob.as_ref(), &submission.filename)
        .map_err(js_error)?;
    form.append_with_str("model_type", &submission.settings.model_id)
        .map_err(js_error)?;
    form.append_with_str(
        "confidence",
        &submission.settings.confidence_threshold.to_string(),
    )
    .map_err(js_error)?;
    form.append_with_str(
        "save_results",
        if submission.settings.persist {
            "true"
        } else {
            "false"
        },
    )
    .map_err(js_error)?;
    Ok(form)
}

impl DetectionTransport for HttpTransport {
    fn detect(&self, submission: Submission) -> TransportFuture<DetectionResponse> {
        let url = self.url("/detect");
        Box::pin(async move {
            let form = multipart(&submission)?;
            let response = Request::post(&url)
                .header("Accept", "application/json")
                .body(form)
                .map_err(net_error)?
                .send()
                .await
                .map_err(net_error)?;

            if response.ok() {
                response
                    .json::<DetectionResponse>()
                    .await
                    .map_err(|err| EngineError::RequestFailed(format!("bad response body: {err}")))
            } else {
                // failure statuses still carry a JSON body when the service
                // produced them; the processor turns success=false into an error
                let status = response.status();
                match response.json::<DetectionResponse>().await {
                    Ok(body) => Ok(body),
                    Err(_) => Err(EngineError::RequestFailed(format!("server error {status}"))),
                }
            }
        })
    }

    fn models(&self) -> TransportFuture<Vec<ModelInfo>> {
        let url = self.url("/api/models");
        Box::pin(async move {
            let response = Request::get(&url).send().await.map_err(net_error)?;
            let body = response
                .json::<ModelsResponse>()
                .await
                .map_err(net_error)?;
            Ok(body.models)
        })
    }

    fn history(&self, limit: usize) -> TransportFuture<Vec<HistoryEntry>> {
        let url = self.url(&format!("/api/history?limit={limit}"));
        Box::pin(async move {
            let response = Request::get(&url).send().await.map_err(net_error)?;
            let body = response
                .json::<HistoryResponse>()
                .await
                .map_err(net_error)?;
            // the service returns oldest-first; the ledger wants newest-first
            let mut entries = body.history;
            entries.reverse();
            Ok(entries)
        })
    }

    fn stats(&self) -> TransportFuture<DetectionStats> {
        let url = self.url("/api/stats");
        Box::pin(async move {
            let response = Request::get(&url).send().await.map_err(net_error)?;
            let body = response.json::<StatsResponse>().await.map_err(net_error)?;
            Ok(body.stats)
        })
    }
}
