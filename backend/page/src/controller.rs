//! Page Controller
//!
//! Orchestrates acquisition, inference and display state. Inference is split
//! into begin/complete halves so a host can await the provider without
//! holding the controller; every analysis carries a token and only the
//! latest token may change the state.

use std::path::Path;

use anyhow::anyhow;
use logging::{PageEvent, PageEventLogger};
use media::{SelectedFile, acquire_file, fetch_default_image};
use snakelens_core::{AnalysisText, EncodedImage, InferenceProvider, Result, SnakeLensError};
use snakelens_understanding::SNAKE_ANALYSIS_PROMPT;
use tracing::{debug, info};
use uuid::Uuid;

use crate::default_content::DEFAULT_ANALYSIS;
use crate::state::{PagePhase, UiState};

/// One started analysis: the request token and the image it was started for.
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    token: u64,
    image: EncodedImage,
}

impl AnalysisTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    pub fn image(&self) -> &EncodedImage {
        &self.image
    }
}

/// What completing an analysis did to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Succeeded,
    Failed { message: String },
    /// A newer analysis was started; this result was dropped.
    Stale { token: u64, latest: u64 },
}

pub struct PageController {
    session_id: String,
    phase: PagePhase,
    state: UiState,
    last_token: u64,
    pending: Option<u64>,
}

impl PageController {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            phase: PagePhase::Idle,
            state: UiState::default(),
            last_token: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Replace the state wholesale. `build` receives the previous state by value.
    fn transition(&mut self, phase: PagePhase, build: impl FnOnce(UiState) -> UiState) {
        let previous = std::mem::take(&mut self.state);
        self.state = build(previous);
        debug!(from = %self.phase, to = %phase, loading = self.state.loading, "Page transition");
        self.phase = phase;
    }

    /// Load the bundled default image with its canned analysis.
    ///
    /// Only the first call fetches. On failure the page shows the error and
    /// no fallback analysis; the error is also returned.
    pub async fn mount(&mut self, default_source: &str) -> Result<()> {
        if self.phase != PagePhase::Idle {
            debug!(phase = %self.phase, "Page already mounted");
            return Ok(());
        }

        self.transition(PagePhase::LoadingDefault, |prev| UiState { loading: true, ..prev });

        match fetch_default_image(default_source).await {
            Ok(image) => {
                PageEventLogger::log_event(
                    &self.session_id,
                    PageEvent::DefaultLoaded {
                        source: default_source.to_string(),
                        mime_type: image.mime_type().to_string(),
                        bytes: image.decoded_len(),
                    },
                );
                self.transition(PagePhase::Ready, |_| UiState {
                    image: Some(image),
                    analysis: AnalysisText::from(DEFAULT_ANALYSIS),
                    loading: false,
                    error: None,
                });
                Ok(())
            }
            Err(err) => {
                PageEventLogger::log_event(
                    &self.session_id,
                    PageEvent::DefaultLoadFailed { error_msg: err.to_string() },
                );
                let message = err.user_message();
                self.transition(PagePhase::Error, |prev| UiState {
                    loading: false,
                    error: Some(message),
                    ..prev
                });
                Err(err)
            }
        }
    }

    /// Acquire a picked file and start analysing it.
    ///
    /// A rejected or unreadable file leaves image and analysis as they were.
    /// A good file replaces the image, clears the error and supersedes any
    /// analysis still in flight.
    pub async fn select_file(&mut self, file: &SelectedFile) -> Result<AnalysisTicket> {
        match acquire_file(file).await {
            Ok(image) => {
                PageEventLogger::log_event(
                    &self.session_id,
                    PageEvent::ImageAcquired {
                        file_name: file.name.clone(),
                        mime_type: image.mime_type().to_string(),
                        bytes: image.decoded_len(),
                    },
                );
                self.transition(PagePhase::Ready, |prev| UiState {
                    image: Some(image),
                    error: None,
                    ..prev
                });
                self.begin_analysis()
            }
            Err(err) => Err(self.reject(&file.name, err)),
        }
    }

    /// Describe a file on disk, then [`select_file`](Self::select_file) it.
    pub async fn select_path(&mut self, path: &Path) -> Result<AnalysisTicket> {
        match SelectedFile::from_path(path).await {
            Ok(file) => self.select_file(&file).await,
            Err(err) => Err(self.reject(&path.display().to_string(), err)),
        }
    }

    /// Record a failed acquisition. Image and analysis stay as they were.
    fn reject(&mut self, file_name: &str, err: SnakeLensError) -> SnakeLensError {
        PageEventLogger::log_event(
            &self.session_id,
            PageEvent::UploadRejected {
                file_name: file_name.to_string(),
                error_msg: err.to_string(),
            },
        );
        let message = err.user_message();
        // An earlier analysis still in flight keeps its loading flag.
        let phase = if self.pending.is_some() {
            PagePhase::Analyzing
        } else {
            PagePhase::Error
        };
        self.transition(phase, |prev| UiState { error: Some(message), ..prev });
        err
    }

    /// Start analysing the current image (also the "re-analyze" action).
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket> {
        let image = self
            .state
            .image
            .clone()
            .ok_or_else(|| SnakeLensError::Other(anyhow!("no image selected")))?;

        self.last_token += 1;
        let token = self.last_token;
        if let Some(previous) = self.pending.replace(token) {
            debug!(previous, token, "Superseding analysis in flight");
        }

        self.transition(PagePhase::Analyzing, |prev| UiState {
            loading: true,
            error: None,
            ..prev
        });
        PageEventLogger::log_event(&self.session_id, PageEvent::AnalysisStarted { token });
        Ok(AnalysisTicket { token, image })
    }

    /// Apply the provider's result for `ticket`.
    ///
    /// Results for anything but the latest ticket are dropped untouched. A
    /// failure keeps the image and the last good analysis.
    pub fn complete_analysis(
        &mut self,
        ticket: &AnalysisTicket,
        provider: &str,
        result: anyhow::Result<AnalysisText>,
    ) -> Completion {
        if self.pending != Some(ticket.token) {
            PageEventLogger::log_event(
                &self.session_id,
                PageEvent::StaleResultDiscarded { token: ticket.token, latest: self.last_token },
            );
            return Completion::Stale { token: ticket.token, latest: self.last_token };
        }
        self.pending = None;

        match result {
            Ok(analysis) => {
                PageEventLogger::log_event(
                    &self.session_id,
                    PageEvent::AnalysisCompleted {
                        token: ticket.token,
                        provider: provider.to_string(),
                        chars: analysis.as_str().chars().count(),
                    },
                );
                self.transition(PagePhase::Ready, |prev| UiState {
                    analysis,
                    loading: false,
                    error: None,
                    ..prev
                });
                Completion::Succeeded
            }
            Err(err) => {
                let err = SnakeLensError::inference(format!("{err:#}"));
                PageEventLogger::log_event(
                    &self.session_id,
                    PageEvent::AnalysisFailed { token: ticket.token, error_msg: err.to_string() },
                );
                let message = err.user_message();
                self.transition(PagePhase::Ready, |prev| UiState {
                    loading: false,
                    error: Some(message.clone()),
                    ..prev
                });
                Completion::Failed { message }
            }
        }
    }

    /// Re-analyze the current image and wait for the result.
    pub async fn analyze(&mut self, provider: &dyn InferenceProvider) -> Result<Completion> {
        let ticket = self.begin_analysis()?;
        Ok(self.run(provider, ticket).await)
    }

    /// Pick a file, analyse it, and wait for the result.
    pub async fn upload(
        &mut self,
        provider: &dyn InferenceProvider,
        file: &SelectedFile,
    ) -> Result<Completion> {
        let ticket = self.select_file(file).await?;
        Ok(self.run(provider, ticket).await)
    }

    /// Like [`upload`](Self::upload), for a file on disk.
    pub async fn upload_path(
        &mut self,
        provider: &dyn InferenceProvider,
        path: &Path,
    ) -> Result<Completion> {
        let ticket = self.select_path(path).await?;
        Ok(self.run(provider, ticket).await)
    }

    async fn run(&mut self, provider: &dyn InferenceProvider, ticket: AnalysisTicket) -> Completion {
        info!(token = ticket.token, provider = provider.name(), "Analyzing image");
        let result = provider.analyze(ticket.image(), SNAKE_ANALYSIS_PROMPT).await;
        self.complete_analysis(&ticket, provider.name(), result)
    }
}

impl Default for PageController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown::FormattedBlock;
    use media::MAX_UPLOAD_BYTES;
    use snakelens_understanding::MockVision;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn default_asset() -> NamedTempFile {
        let mut tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        tmp.write_all(&[0x89, 0x50, 0x4E, 0x47]).unwrap();
        tmp
    }

    async fn mounted() -> (PageController, NamedTempFile) {
        let asset = default_asset();
        let mut page = PageController::new();
        page.mount(&asset.path().to_string_lossy()).await.unwrap();
        (page, asset)
    }

    fn png(name: &str, bytes: &[u8]) -> SelectedFile {
        SelectedFile::from_bytes(name, "image/png", bytes.to_vec())
    }

    #[tokio::test]
    async fn mount_shows_default_content_without_inference() {
        let (page, _asset) = mounted().await;
        assert_eq!(page.phase(), PagePhase::Ready);
        let state = page.state();
        assert_eq!(state.analysis.as_str(), DEFAULT_ANALYSIS);
        assert_eq!(state.image.as_ref().unwrap().mime_type(), "image/png");
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn bundled_default_mounts_from_any_directory() {
        let elsewhere = tempfile::tempdir().unwrap();
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(elsewhere.path()).unwrap();

        let mut page = PageController::new();
        let mounted = page.mount(media::BUNDLED_DEFAULT_SOURCE).await;
        std::env::set_current_dir(previous).unwrap();

        mounted.unwrap();
        assert_eq!(page.phase(), PagePhase::Ready);
        assert_eq!(page.state().analysis.as_str(), DEFAULT_ANALYSIS);
        assert_eq!(page.state().image.as_ref().unwrap().mime_type(), "image/png");
    }

    #[tokio::test]
    async fn mount_failure_sets_error_without_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = PageController::new();
        let err = page
            .mount(&dir.path().join("missing.jpg").to_string_lossy())
            .await
            .unwrap_err();
        assert!(matches!(err, SnakeLensError::DefaultAssetFetchFailure(_)));
        assert_eq!(page.phase(), PagePhase::Error);
        let state = page.state();
        assert_eq!(state.error.as_deref(), Some("Failed to load default image"));
        assert!(state.analysis.is_empty());
        assert!(state.image.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn default_analysis_formats_to_header_then_field() {
        let (page, _asset) = mounted().await;
        let blocks: Vec<_> = page.state().blocks().take(2).collect();
        assert_eq!(
            blocks,
            vec![
                FormattedBlock::SectionHeader { title: "Species Identification:".into() },
                FormattedBlock::LabeledField {
                    label: "Scientific name".into(),
                    value: "Pantherophis guttatus".into()
                },
            ]
        );
    }

    #[tokio::test]
    async fn rejected_upload_keeps_previous_image() {
        let (mut page, _asset) = mounted().await;
        let before = page.state().image.clone();

        let file = SelectedFile::from_bytes("notes.txt", "text/plain", b"hi".to_vec());
        let err = page.select_file(&file).await.unwrap_err();
        assert!(matches!(err, SnakeLensError::InvalidFileType { .. }));

        let state = page.state();
        assert_eq!(state.image, before);
        assert_eq!(state.analysis.as_str(), DEFAULT_ANALYSIS);
        assert_eq!(state.error.as_deref(), Some("Please upload a valid image file"));
        assert!(!state.loading);
        assert_eq!(page.phase(), PagePhase::Error);
    }

    #[tokio::test]
    async fn size_boundary_is_exact() {
        let (mut page, _asset) = mounted().await;
        let before = page.state().image.clone();

        let over = png("over.png", &vec![0u8; MAX_UPLOAD_BYTES as usize + 1]);
        let err = page.select_file(&over).await.unwrap_err();
        assert!(matches!(err, SnakeLensError::FileTooLarge { .. }));
        assert_eq!(page.state().image, before);

        let exact = png("exact.png", &vec![0u8; MAX_UPLOAD_BYTES as usize]);
        let ticket = page.select_file(&exact).await.unwrap();
        assert_eq!(ticket.image().decoded_len() as u64, MAX_UPLOAD_BYTES);
        assert!(page.state().error.is_none());
    }

    #[tokio::test]
    async fn successful_upload_replaces_analysis() {
        let (mut page, _asset) = mounted().await;
        let provider = MockVision::new("mock").with_response("1. Species Identification:\n- Family: Viperidae");

        let outcome = page.upload(&provider, &png("viper.png", b"viper")).await.unwrap();
        assert_eq!(outcome, Completion::Succeeded);
        assert_eq!(page.phase(), PagePhase::Ready);
        assert_eq!(page.state().analysis.as_str(), "1. Species Identification:\n- Family: Viperidae");
        assert_eq!(page.state().image.as_ref().unwrap().decode().unwrap(), b"viper");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn inference_failure_keeps_last_good_analysis() {
        let (mut page, _asset) = mounted().await;
        let provider = MockVision::new("mock").failing("Gemini vision error (503): overloaded");

        let outcome = page.analyze(&provider).await.unwrap();
        assert_eq!(
            outcome,
            Completion::Failed { message: "Gemini vision error (503): overloaded".into() }
        );
        let state = page.state();
        assert_eq!(state.error.as_deref(), Some("Gemini vision error (503): overloaded"));
        assert!(!state.loading);
        assert_eq!(state.analysis.as_str(), DEFAULT_ANALYSIS);
        assert!(state.image.is_some());
        assert_eq!(page.phase(), PagePhase::Ready);
    }

    #[tokio::test]
    async fn unreachable_service_reaches_the_error_banner() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (mut page, _asset) = mounted().await;
        let provider = snakelens_understanding::VisionProvider::gemini("test-key")
            .with_base_url(format!("http://{addr}"));

        let outcome = page.upload(&provider, &png("far.png", b"far")).await.unwrap();
        assert!(matches!(outcome, Completion::Failed { .. }));
        let state = page.state();
        let error = state.error.as_deref().unwrap();
        assert!(error.contains("Gemini vision request failed"), "{error}");
        assert!(!state.loading);
        assert_eq!(state.analysis.as_str(), DEFAULT_ANALYSIS);
        assert_eq!(page.phase(), PagePhase::Ready);
    }

    #[tokio::test]
    async fn empty_failure_message_falls_back() {
        let (mut page, _asset) = mounted().await;
        let provider = MockVision::new("mock").failing("");
        page.analyze(&provider).await.unwrap();
        assert_eq!(
            page.state().error.as_deref(),
            Some(snakelens_core::ANALYZE_FALLBACK_MESSAGE)
        );
    }

    #[tokio::test]
    async fn stale_result_is_ignored() {
        let (mut page, _asset) = mounted().await;

        let first = page.select_file(&png("a.png", b"a")).await.unwrap();
        let second = page.select_file(&png("b.png", b"b")).await.unwrap();
        assert!(second.token() > first.token());

        // The older request resolves first: dropped, still loading.
        let outcome = page.complete_analysis(&first, "mock", Ok("analysis of a".into()));
        assert_eq!(outcome, Completion::Stale { token: first.token(), latest: second.token() });
        assert!(page.state().loading);
        assert_eq!(page.state().analysis.as_str(), DEFAULT_ANALYSIS);

        assert_eq!(
            page.complete_analysis(&second, "mock", Ok("analysis of b".into())),
            Completion::Succeeded
        );
        assert_eq!(page.state().analysis.as_str(), "analysis of b");
        assert!(!page.state().loading);
    }

    #[tokio::test]
    async fn late_result_after_newer_one_is_ignored() {
        let (mut page, _asset) = mounted().await;

        let first = page.begin_analysis().unwrap();
        let second = page.begin_analysis().unwrap();
        page.complete_analysis(&second, "mock", Ok("newest".into()));
        let outcome = page.complete_analysis(&first, "mock", Err(anyhow!("timed out")));

        assert!(matches!(outcome, Completion::Stale { .. }));
        assert_eq!(page.state().analysis.as_str(), "newest");
        assert!(page.state().error.is_none());
    }

    #[tokio::test]
    async fn rejected_upload_during_analysis_keeps_loading() {
        let (mut page, _asset) = mounted().await;
        let ticket = page.begin_analysis().unwrap();

        let bad = SelectedFile::from_bytes("x.pdf", "application/pdf", b"%PDF".to_vec());
        page.select_file(&bad).await.unwrap_err();
        assert_eq!(page.phase(), PagePhase::Analyzing);
        assert!(page.state().loading);

        assert_eq!(
            page.complete_analysis(&ticket, "mock", Ok("done".into())),
            Completion::Succeeded
        );
        assert!(page.state().error.is_none());
    }

    #[tokio::test]
    async fn new_upload_recovers_from_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut page = PageController::new();
        let _ = page.mount(&dir.path().join("missing.jpg").to_string_lossy()).await;
        assert_eq!(page.phase(), PagePhase::Error);

        let provider = MockVision::new("mock").with_response("Looks like a garter snake.");
        page.upload(&provider, &png("garter.png", b"garter")).await.unwrap();
        assert_eq!(page.phase(), PagePhase::Ready);
        assert!(page.state().error.is_none());
        assert_eq!(page.state().analysis.as_str(), "Looks like a garter snake.");
    }

    #[tokio::test]
    async fn unreadable_path_is_reported_on_the_page() {
        let (mut page, _asset) = mounted().await;
        let dir = tempfile::tempdir().unwrap();
        let provider = MockVision::new("mock");

        let err = page
            .upload_path(&provider, &dir.path().join("nope.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, SnakeLensError::FileReadFailure(_)));
        assert_eq!(
            page.state().error.as_deref(),
            Some("Failed to read the image file. Please try again.")
        );
        assert_eq!(page.state().analysis.as_str(), DEFAULT_ANALYSIS);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn upload_path_reads_and_analyzes() {
        let (mut page, asset) = mounted().await;
        let provider = MockVision::new("mock").with_response("from disk");
        let outcome = page.upload_path(&provider, asset.path()).await.unwrap();
        assert_eq!(outcome, Completion::Succeeded);
        assert_eq!(page.state().analysis.as_str(), "from disk");
    }

    #[test]
    fn analyze_without_image_is_refused() {
        let mut page = PageController::new();
        assert!(page.begin_analysis().is_err());
        assert_eq!(page.phase(), PagePhase::Idle);
        assert_eq!(page.state(), &UiState::default());
    }

    #[tokio::test]
    async fn same_file_twice_runs_two_analyses() {
        let (mut page, _asset) = mounted().await;
        let provider = MockVision::new("mock").with_response("same");
        let file = png("same.png", b"same");
        page.upload(&provider, &file).await.unwrap();
        page.upload(&provider, &file).await.unwrap();
        assert_eq!(provider.calls(), 2);
    }
}
