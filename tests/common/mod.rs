//! Shared fixtures: mock loader/model and an in-memory PDF builder.

#![allow(dead_code)]

use async_trait::async_trait;
use content_summary::{
    PageLoader, Pipeline, PipelineProgressCallback, StepError, SummaryConfig, SummaryModel,
    SummaryRequest,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

/// Page loader returning a canned result and recording every URL it sees.
pub struct MockLoader {
    result: Result<String, StepError>,
    pub urls: Mutex<Vec<String>>,
}

impl MockLoader {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(text.to_string()),
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: StepError) -> Arc<Self> {
        Arc::new(Self {
            result: Err(err),
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.urls.lock().unwrap().len()
    }
}

#[async_trait]
impl PageLoader for MockLoader {
    async fn load_text(&self, url: &Url) -> Result<String, StepError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.result.clone()
    }
}

/// Loader that panics, standing in for a bug inside the pipeline.
pub struct PanickingLoader;

#[async_trait]
impl PageLoader for PanickingLoader {
    async fn load_text(&self, _url: &Url) -> Result<String, StepError> {
        panic!("loader exploded");
    }
}

/// Model returning a canned summary and recording each request.
pub struct MockModel {
    reply: Result<String, StepError>,
    calls: AtomicUsize,
    pub requests: Mutex<Vec<SummaryRequest>>,
}

impl MockModel {
    pub fn replying(summary: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(summary.to_string()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(StepError::LlmFailed {
                detail: detail.to_string(),
            }),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> String {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|r| r.prompt.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SummaryModel for MockModel {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, StepError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

/// Records the input of every pipeline run, e.g. an upload's temp path.
#[derive(Default)]
pub struct InputRecorder {
    pub inputs: Mutex<Vec<String>>,
}

impl PipelineProgressCallback for InputRecorder {
    fn on_pipeline_start(&self, input: &str) {
        self.inputs.lock().unwrap().push(input.to_string());
    }
}

/// Route library logs to the test writer. Run with `RUST_LOG=debug` and
/// `--nocapture` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn pipeline(
    loader: Arc<dyn PageLoader>,
    model: Arc<dyn SummaryModel>,
    config: SummaryConfig,
) -> Arc<Pipeline> {
    init_tracing();
    Arc::new(Pipeline::new(loader, model, config))
}

/// Build a PDF with one page per entry, each holding a single line of text.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialise PDF fixture");
    bytes
}

/// Serve `body` with the given status line to every connection on a local
/// port. Returns the server's base URL, e.g. `http://127.0.0.1:PORT`.
pub async fn serve_bytes(status: &'static str, body: Vec<u8>) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let body = body.clone();
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/pdf\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}
