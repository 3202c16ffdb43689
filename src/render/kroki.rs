// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-DiagramMaker-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Diagram Maker and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Kroki-compatible HTTP rendering client.
//!
//! The client is blocking (`ureq`); calls are moved onto tokio's blocking pool so the caller's
//! task only suspends.

use std::fmt;
use std::io::Write as _;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::Renderer;
use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::model::{GeneratedSource, NotationKind, OutputFormat, RenderedArtifact};

/// How source is shipped to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Plain-text body to `<base>/<notation>/<format>`.
    #[default]
    Post,
    /// JSON body `{diagram_source, diagram_type, output_format}` to `<base>/`.
    Json,
    /// Deflated, URL-safe base64 source appended to `<base>/<notation>/<format>/`.
    Get,
}

impl Transport {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Json => "json",
            Self::Get => "get",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
struct JsonRenderRequest<'a> {
    diagram_source: &'a str,
    diagram_type: &'a str,
    output_format: &'a str,
}

/// Encodes source the way the GET endpoint expects it.
pub fn encode_source(code: &str) -> std::io::Result<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(code.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(URL_SAFE.encode(compressed))
}

#[derive(Clone)]
pub struct KrokiRenderer {
    agent: ureq::Agent,
    base_url: String,
    transport: Transport,
}

impl fmt::Debug for KrokiRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KrokiRenderer")
            .field("base_url", &self.base_url)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

struct Call {
    notation: NotationKind,
    format: OutputFormat,
    code: String,
}

fn map_transport(err: ureq::Error) -> RenderError {
    match err {
        ureq::Error::Timeout(_) => RenderError::TimedOut,
        other => RenderError::Transport(other.to_string()),
    }
}

impl KrokiRenderer {
    pub fn new(base_url: impl Into<String>, transport: Transport, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            agent,
            base_url,
            transport,
        }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(config.base_url.clone(), config.transport, config.timeout())
    }

    /// The URL a request for `notation`/`format` is sent to (without the GET payload).
    pub fn endpoint(&self, notation: NotationKind, format: OutputFormat) -> String {
        match self.transport {
            Transport::Json => format!("{}/", self.base_url),
            Transport::Post | Transport::Get => {
                let segment = notation.render_path_segment();
                format!("{}/{segment}/{}", self.base_url, format.as_str())
            }
        }
    }

    fn call_blocking(
        agent: &ureq::Agent,
        transport: Transport,
        endpoint: &str,
        call: &Call,
    ) -> Result<RenderedArtifact, RenderError> {
        let result = match transport {
            Transport::Post => agent
                .post(endpoint)
                .header("Content-Type", "text/plain")
                .send(call.code.as_bytes()),
            Transport::Json => {
                let payload = JsonRenderRequest {
                    diagram_source: &call.code,
                    diagram_type: call.notation.render_path_segment(),
                    output_format: call.format.as_str(),
                };
                let body = serde_json::to_vec(&payload)
                    .map_err(|err| RenderError::Transport(err.to_string()))?;
                agent
                    .post(endpoint)
                    .header("Content-Type", "application/json")
                    .send(&body[..])
            }
            Transport::Get => {
                let encoded = encode_source(&call.code)
                    .map_err(|err| RenderError::Transport(err.to_string()))?;
                agent.get(format!("{endpoint}/{encoded}")).call()
            }
        };
        let mut response = result.map_err(map_transport)?;
        let status = response.status().as_u16();
        let bytes = response.body_mut().read_to_vec().map_err(map_transport)?;

        if !(200..300).contains(&status) {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            warn!(notation = call.notation.as_str(), status = status; "renderer rejected source");
            return Err(RenderError::Rejected {
                notation: call.notation,
                status,
                body,
            });
        }

        match call.format {
            OutputFormat::Svg => {
                let svg = String::from_utf8(bytes).map_err(|err| {
                    RenderError::Transport(format!("renderer returned invalid SVG: {err}"))
                })?;
                Ok(RenderedArtifact::Svg(svg))
            }
            OutputFormat::Png => Ok(RenderedArtifact::Raster(bytes)),
        }
    }
}

impl Renderer for KrokiRenderer {
    async fn render(
        &self,
        source: &GeneratedSource,
        format: OutputFormat,
    ) -> Result<RenderedArtifact, RenderError> {
        let notation = source.notation();
        if !notation.supports(format) {
            return Err(RenderError::Unsupported { notation, format });
        }

        let agent = self.agent.clone();
        let transport = self.transport;
        let endpoint = self.endpoint(notation, format);
        let call = Call {
            notation,
            format,
            code: source.code().to_owned(),
        };
        debug!(endpoint = endpoint.as_str(), transport = transport.as_str(); "rendering");

        tokio::task::spawn_blocking(move || {
            Self::call_blocking(&agent, transport, &endpoint, &call)
        })
        .await
        .map_err(|err| RenderError::Transport(err.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read as _;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::body::Bytes;
    use axum::extract::State;
    use axum::http::{Method, StatusCode, Uri};
    use axum::response::{IntoResponse, Response};
    use axum::Router;
    use base64::engine::general_purpose::URL_SAFE;
    use base64::Engine as _;
    use flate2::read::ZlibDecoder;

    use super::{encode_source, KrokiRenderer, Transport};
    use crate::error::RenderError;
    use crate::model::{GeneratedSource, NotationKind, OutputFormat, RenderedArtifact};
    use crate::render::Renderer;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Seen {
        method: String,
        path: String,
        content_type: Option<String>,
        body: Vec<u8>,
    }

    #[derive(Clone)]
    struct Stub {
        status: u16,
        body: &'static [u8],
        delay: Duration,
        seen: Arc<Mutex<Vec<Seen>>>,
    }

    async fn record(
        State(stub): State<Stub>,
        method: Method,
        uri: Uri,
        headers: axum::http::HeaderMap,
        body: Bytes,
    ) -> Response {
        stub.seen.lock().expect("seen lock").push(Seen {
            method: method.to_string(),
            path: uri.path().to_owned(),
            content_type: headers
                .get("content-type")
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
            body: body.to_vec(),
        });
        if !stub.delay.is_zero() {
            tokio::time::sleep(stub.delay).await;
        }
        let status = StatusCode::from_u16(stub.status).expect("status");
        (status, stub.body).into_response()
    }

    async fn spawn_stub(status: u16, body: &'static [u8], delay: Duration) -> (String, Stub) {
        let stub = Stub {
            status,
            body,
            delay,
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new().fallback(record).with_state(stub.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (format!("http://{addr}"), stub)
    }

    fn graphviz() -> GeneratedSource {
        GeneratedSource::new(NotationKind::Graphviz, "digraph G { a -> b }")
    }

    #[test]
    fn encoded_source_inflates_back() {
        let encoded = encode_source("graph TD\n  A --> B").expect("encode");
        assert!(!encoded.contains('+') && !encoded.contains('/'));
        let compressed = URL_SAFE.decode(encoded).expect("base64");
        let mut decoded = String::new();
        ZlibDecoder::new(&compressed[..])
            .read_to_string(&mut decoded)
            .expect("inflate");
        assert_eq!(decoded, "graph TD\n  A --> B");
    }

    #[test]
    fn endpoint_follows_transport() {
        let post = KrokiRenderer::new("https://kroki.io/", Transport::Post, Duration::from_secs(1));
        assert_eq!(
            post.endpoint(NotationKind::PlantUml, OutputFormat::Png),
            "https://kroki.io/plantuml/png"
        );
        let json = KrokiRenderer::new("https://kroki.io", Transport::Json, Duration::from_secs(1));
        assert_eq!(
            json.endpoint(NotationKind::Mermaid, OutputFormat::Svg),
            "https://kroki.io/"
        );
    }

    #[tokio::test]
    async fn post_transport_sends_plain_text_to_notation_path() {
        let (base, stub) = spawn_stub(200, b"<svg>ok</svg>", Duration::ZERO).await;
        let renderer = KrokiRenderer::new(base, Transport::Post, Duration::from_secs(5));

        let artifact = renderer
            .render(&graphviz(), OutputFormat::Svg)
            .await
            .expect("render");
        assert_eq!(artifact, RenderedArtifact::Svg("<svg>ok</svg>".to_owned()));

        let seen = stub.seen.lock().expect("seen").clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, "POST");
        assert_eq!(seen[0].path, "/graphviz/svg");
        assert_eq!(seen[0].content_type.as_deref(), Some("text/plain"));
        assert_eq!(seen[0].body, b"digraph G { a -> b }");
    }

    #[tokio::test]
    async fn json_transport_posts_structured_body_to_root() {
        let (base, stub) = spawn_stub(200, &[0x89, b'P', b'N', b'G'], Duration::ZERO).await;
        let renderer = KrokiRenderer::new(base, Transport::Json, Duration::from_secs(5));

        let artifact = renderer
            .render(&graphviz(), OutputFormat::Png)
            .await
            .expect("render");
        assert_eq!(
            artifact,
            RenderedArtifact::Raster(vec![0x89, b'P', b'N', b'G'])
        );

        let seen = stub.seen.lock().expect("seen").clone();
        assert_eq!(seen[0].path, "/");
        let body: serde_json::Value = serde_json::from_slice(&seen[0].body).expect("json body");
        assert_eq!(body["diagram_source"], "digraph G { a -> b }");
        assert_eq!(body["diagram_type"], "graphviz");
        assert_eq!(body["output_format"], "png");
    }

    #[tokio::test]
    async fn get_transport_appends_encoded_source() {
        let (base, stub) = spawn_stub(200, b"<svg/>", Duration::ZERO).await;
        let renderer = KrokiRenderer::new(base, Transport::Get, Duration::from_secs(5));

        renderer
            .render(&graphviz(), OutputFormat::Svg)
            .await
            .expect("render");

        let seen = stub.seen.lock().expect("seen").clone();
        assert_eq!(seen[0].method, "GET");
        let encoded = encode_source("digraph G { a -> b }").expect("encode");
        assert_eq!(seen[0].path, format!("/graphviz/svg/{encoded}"));
    }

    #[tokio::test]
    async fn rejection_body_is_surfaced_verbatim() {
        let (base, _stub) = spawn_stub(400, b"syntax error line 3", Duration::ZERO).await;
        let renderer = KrokiRenderer::new(base, Transport::Post, Duration::from_secs(5));

        let err = renderer
            .render(&graphviz(), OutputFormat::Svg)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::Rejected {
                notation: NotationKind::Graphviz,
                status: 400,
                body: "syntax error line 3".to_owned(),
            }
        );
    }

    #[tokio::test]
    async fn slow_renderer_times_out() {
        let (base, _stub) = spawn_stub(200, b"<svg/>", Duration::from_secs(3)).await;
        let renderer = KrokiRenderer::new(base, Transport::Post, Duration::from_millis(200));

        let err = renderer
            .render(&graphviz(), OutputFormat::Svg)
            .await
            .unwrap_err();
        assert_eq!(err, RenderError::TimedOut);
    }

    #[tokio::test]
    async fn excalidraw_png_is_refused_without_a_request() {
        let (base, stub) = spawn_stub(200, b"", Duration::ZERO).await;
        let renderer = KrokiRenderer::new(base, Transport::Post, Duration::from_secs(5));
        let source = GeneratedSource::new(NotationKind::Excalidraw, "{}");

        let err = renderer
            .render(&source, OutputFormat::Png)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::Unsupported {
                notation: NotationKind::Excalidraw,
                format: OutputFormat::Png,
            }
        );
        assert!(stub.seen.lock().expect("seen").is_empty());
    }
}
