//! Browser-driven page loading.
//!
//! [`PageLoader`] is the seam between the fetch step and whatever renders
//! the page. [`ChromiumLoader`] is the production implementation: it
//! launches a fresh Chromium per call over the DevTools protocol, waits for
//! the load event plus a settle delay, reads `document.body.innerText`, and
//! tears the browser down again. There is no pooling; each request owns its
//! browser process and a throwaway profile directory for the duration of
//! the call, so no cookies, cache or storage survive between requests.
//!
//! ## Cleanup
//!
//! Async teardown cannot run in `Drop`, so [`BrowserSession::close`] is
//! awaited explicitly after the page work finishes, whatever its result.
//! Navigation timeouts are applied to the page work only, so a timed-out
//! navigation still reaches `close`. chromiumoxide's own `Drop` on
//! `Browser` kills the child process if a panic unwinds past us.

use crate::config::SummaryConfig;
use crate::error::StepError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// Script evaluated in the page once it has settled.
const INNER_TEXT_SCRIPT: &str = "document.body ? document.body.innerText : ''";

/// Loads a URL and returns its rendered, visible text.
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load_text(&self, url: &Url) -> Result<String, StepError>;
}

/// Launch options for [`ChromiumLoader`], taken from [`SummaryConfig`].
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub page_load_timeout: Duration,
    pub settle: Duration,
}

impl From<&SummaryConfig> for BrowserOptions {
    fn from(config: &SummaryConfig) -> Self {
        Self {
            headless: config.headless,
            chrome_executable: config.chrome_executable.clone(),
            page_load_timeout: Duration::from_secs(config.page_load_timeout_secs),
            settle: Duration::from_millis(config.settle_ms),
        }
    }
}

/// [`PageLoader`] backed by a per-call Chromium instance.
#[derive(Debug, Clone)]
pub struct ChromiumLoader {
    options: BrowserOptions,
}

impl ChromiumLoader {
    pub fn new(options: BrowserOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &SummaryConfig) -> Self {
        Self::new(BrowserOptions::from(config))
    }
}

#[async_trait]
impl PageLoader for ChromiumLoader {
    async fn load_text(&self, url: &Url) -> Result<String, StepError> {
        let session = BrowserSession::launch(&self.options).await?;

        let secs = self.options.page_load_timeout.as_secs();
        let result = match tokio::time::timeout(
            self.options.page_load_timeout,
            read_page(&session.browser, url, self.options.settle),
        )
        .await
        {
            Ok(inner) => inner,
            Err(_) => Err(StepError::NavigationTimeout { secs }),
        };

        session.close().await;
        result
    }
}

/// A launched browser plus the task pumping its CDP event handler.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    // Removed on drop, after the browser process has exited.
    profile: TempDir,
}

impl BrowserSession {
    async fn launch(options: &BrowserOptions) -> Result<Self, StepError> {
        let profile = new_profile_dir()?;
        let config =
            build_browser_config(options, profile.path()).map_err(|detail| StepError::Navigation {
                detail: format!("invalid browser config: {detail}"),
            })?;

        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| StepError::Navigation {
                    detail: format!("failed to launch browser: {e}"),
                })?;

        // The handler stream must be polled for any CDP command to complete.
        let handler = tokio::spawn(async move {
            pump_events(&mut handler).await;
        });

        debug!(
            "Browser launched (headless={}, profile={})",
            options.headless,
            profile.path().display()
        );
        Ok(Self {
            browser,
            handler,
            profile,
        })
    }

    /// Close the browser and reap the process. Failures are logged only.
    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Waiting for browser exit failed: {}", e);
        }
        self.handler.abort();
        debug!("Browser closed, removing {}", self.profile.path().display());
    }
}

/// Drive the CDP handler until the connection ends. Returns the number of
/// events seen.
///
/// Messages the protocol bindings cannot decode surface as `Err` while the
/// connection stays usable, so errors are logged and polling continues.
async fn pump_events<S, T, E>(events: &mut S) -> usize
where
    S: Stream<Item = Result<T, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut seen = 0;
    while let Some(event) = events.next().await {
        seen += 1;
        if let Err(e) = event {
            debug!("CDP handler error: {}", e);
        }
    }
    seen
}

/// Fresh, empty Chromium profile directory for one session.
fn new_profile_dir() -> Result<TempDir, StepError> {
    tempfile::Builder::new()
        .prefix("chromium-profile-")
        .tempdir()
        .map_err(|e| StepError::Navigation {
            detail: format!("failed to create browser profile dir: {e}"),
        })
}

fn build_browser_config(
    options: &BrowserOptions,
    profile_dir: &Path,
) -> Result<BrowserConfig, String> {
    let mut builder = BrowserConfig::builder()
        .request_timeout(options.page_load_timeout)
        .user_data_dir(profile_dir);
    if !options.headless {
        builder = builder.with_head();
    }
    if let Some(ref path) = options.chrome_executable {
        builder = builder.chrome_executable(path);
    }
    builder.build()
}

async fn read_page(browser: &Browser, url: &Url, settle: Duration) -> Result<String, StepError> {
    let nav_err = |e: chromiumoxide::error::CdpError| StepError::Navigation {
        detail: e.to_string(),
    };

    let page: Page = browser.new_page(url.as_str()).await.map_err(nav_err)?;
    page.wait_for_navigation().await.map_err(nav_err)?;
    info!("Navigated to {}", url);

    if !settle.is_zero() {
        tokio::time::sleep(settle).await;
    }

    let text = page
        .evaluate(INNER_TEXT_SCRIPT)
        .await
        .map_err(nav_err)?
        .into_value::<String>()
        .map_err(|e| StepError::Navigation {
            detail: format!("page text was not a string: {e}"),
        })?;
    debug!("Extracted text length: {}", text.len());

    if let Err(e) = page.close().await {
        warn!("Page close failed: {}", e);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_config() {
        let config = SummaryConfig::builder()
            .headless(false)
            .page_load_timeout_secs(12)
            .settle_ms(250)
            .build()
            .unwrap();
        let opts = BrowserOptions::from(&config);
        assert!(!opts.headless);
        assert_eq!(opts.page_load_timeout, Duration::from_secs(12));
        assert_eq!(opts.settle, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn handler_errors_do_not_stop_the_pump() {
        let mut events = futures::stream::iter(vec![
            Ok(()),
            Err("unknown event Page.frameSubtreeWillBeDetached"),
            Ok(()),
            Err("unknown event"),
            Ok(()),
        ]);
        assert_eq!(pump_events(&mut events).await, 5);
    }

    #[test]
    fn each_session_gets_its_own_profile() {
        let opts = BrowserOptions::from(&SummaryConfig::default());
        let first = new_profile_dir().unwrap();
        let second = new_profile_dir().unwrap();
        assert_ne!(first.path(), second.path());

        for dir in [&first, &second] {
            let config = build_browser_config(&opts, dir.path()).unwrap();
            let rendered = format!("{config:?}");
            assert!(rendered.contains(dir.path().to_str().unwrap()));
            assert!(!rendered.contains("chromiumoxide-runner"));
        }

        let path = first.path().to_path_buf();
        drop(first);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn chromium_reads_example_dot_com() {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to launch a real browser");
            return;
        }
        let loader = ChromiumLoader::from_config(&SummaryConfig::default());
        let url = Url::parse("https://example.com").unwrap();
        let text = loader.load_text(&url).await.unwrap();
        assert!(text.contains("Example Domain"));
    }
}
