//! Main language server implementation

use std::collections::HashMap;
use std::sync::Arc;

use crate::features::commands::{DocumentParams, GateBreakPreviewParams, NO_DOCUMENT, NO_TRACE};
use crate::features::diagnostics::{from_lsp_position, to_lsp_diagnostic, to_lsp_range};
use crate::features::document_symbols::{collect_document_symbols, GateDocumentSymbol};
use crate::features::hover::{hover as compute_hover, HoverResult};
use crate::features::semantic_tokens::{
    collect_semantic_tokens, GateSemanticToken, SEMANTIC_TOKEN_KINDS,
};
use gate_analysis::{Diagnostic as GateDiagnostic, LatticeSettings, RuleRegistry, ScoringTable};
use gate_config::GateConfig;
use gate_parser::gate::ast::{Position as AstPosition, SourceLocation, SyntaxNode};
use gate_parser::{build_ir, parse, render_trace};
use tokio::sync::RwLock;
use tower_lsp::async_trait;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    Diagnostic, DidChangeTextDocumentParams, DidCloseTextDocumentParams,
    DidOpenTextDocumentParams, DocumentSymbol, DocumentSymbolParams, DocumentSymbolResponse,
    Hover, HoverContents, HoverParams, HoverProviderCapability, InitializeParams,
    InitializeResult, InitializedParams, MarkupContent, MarkupKind, MessageType, OneOf,
    SemanticToken, SemanticTokenType, SemanticTokens, SemanticTokensFullOptions,
    SemanticTokensLegend, SemanticTokensOptions, SemanticTokensParams, SemanticTokensResult,
    SemanticTokensServerCapabilities, ServerCapabilities, ServerInfo, TextDocumentItem,
    TextDocumentSyncCapability, TextDocumentSyncKind, Url, WorkDoneProgressOptions,
};
use tower_lsp::Client;

/// The slice of the LSP client the server talks to.
#[async_trait]
pub trait LspClient: Send + Sync + Clone + 'static {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>);
    async fn log_message(&self, typ: MessageType, message: String);
}

#[async_trait]
impl LspClient for Client {
    async fn publish_diagnostics(&self, uri: Url, diagnostics: Vec<Diagnostic>, version: Option<i32>) {
        Client::publish_diagnostics(self, uri, diagnostics, version).await;
    }

    async fn log_message(&self, typ: MessageType, message: String) {
        Client::log_message(self, typ, message).await;
    }
}

pub trait FeatureProvider: Send + Sync + 'static {
    fn diagnostics(&self, text: &str, tree: &SyntaxNode) -> Vec<GateDiagnostic>;
    fn semantic_tokens(&self, text: &str, tree: &SyntaxNode) -> Vec<GateSemanticToken>;
    fn document_symbols(&self, text: &str, tree: &SyntaxNode) -> Vec<GateDocumentSymbol>;
    fn hover(&self, text: &str, position: AstPosition) -> Option<HoverResult>;
    fn compile_to_trace(&self, tree: &SyntaxNode) -> String;
    fn evaluate_evolution(&self, text: &str) -> String;
    fn gate_break_preview(&self, text: &str) -> String;
}

/// Features backed by the analysis crate, tuned by the loaded configuration.
pub struct DefaultFeatureProvider {
    rules: RuleRegistry,
    scoring: ScoringTable,
    lattice: LatticeSettings,
}

impl DefaultFeatureProvider {
    pub fn new() -> Self {
        Self::from_config(&GateConfig::default())
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            rules: config.rule_registry(),
            scoring: config.scoring_table(),
            lattice: config.lattice_settings(),
        }
    }
}

impl Default for DefaultFeatureProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureProvider for DefaultFeatureProvider {
    fn diagnostics(&self, text: &str, tree: &SyntaxNode) -> Vec<GateDiagnostic> {
        self.rules.analyze(text, tree)
    }

    fn semantic_tokens(&self, text: &str, tree: &SyntaxNode) -> Vec<GateSemanticToken> {
        collect_semantic_tokens(text, tree)
    }

    fn document_symbols(&self, text: &str, tree: &SyntaxNode) -> Vec<GateDocumentSymbol> {
        collect_document_symbols(text, tree)
    }

    fn hover(&self, text: &str, position: AstPosition) -> Option<HoverResult> {
        compute_hover(text, position)
    }

    fn compile_to_trace(&self, tree: &SyntaxNode) -> String {
        render_trace(&build_ir(tree))
    }

    fn evaluate_evolution(&self, text: &str) -> String {
        self.scoring.estimate(text).to_string()
    }

    fn gate_break_preview(&self, text: &str) -> String {
        self.lattice.preview_break(text).to_string()
    }
}

#[derive(Clone)]
struct DocumentEntry {
    text: Arc<String>,
    tree: Arc<SyntaxNode>,
    version: i32,
}

/// Latest text and tree per open document. A newer version fully replaces the older one.
#[derive(Default)]
struct DocumentStore {
    entries: RwLock<HashMap<Url, DocumentEntry>>,
}

impl DocumentStore {
    /// Store `text` unless the document already holds this version or a later one.
    ///
    /// Notifications are handled concurrently, so an older change can arrive after a newer
    /// one. Returns `None` when the incoming text is stale and was dropped.
    async fn upsert(&self, uri: Url, text: String, version: i32) -> Option<DocumentEntry> {
        let entry = DocumentEntry {
            tree: Arc::new(parse(&text)),
            text: Arc::new(text),
            version,
        };
        let mut entries = self.entries.write().await;
        if let Some(current) = entries.get(&uri) {
            if current.version >= version {
                return None;
            }
        }
        entries.insert(uri, entry.clone());
        Some(entry)
    }

    async fn get(&self, uri: &Url) -> Option<DocumentEntry> {
        self.entries.read().await.get(uri).cloned()
    }

    async fn remove(&self, uri: &Url) {
        self.entries.write().await.remove(uri);
    }
}

fn semantic_tokens_legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: SEMANTIC_TOKEN_KINDS
            .iter()
            .map(|kind| SemanticTokenType::new(kind.as_str()))
            .collect(),
        token_modifiers: Vec::new(),
    }
}

pub struct GateLanguageServer<C = Client, P = DefaultFeatureProvider> {
    client: C,
    documents: DocumentStore,
    features: Arc<P>,
}

impl GateLanguageServer<Client, DefaultFeatureProvider> {
    pub fn new(client: Client) -> Self {
        Self::with_features(client, Arc::new(DefaultFeatureProvider::new()))
    }

    pub fn with_config(client: Client, config: &GateConfig) -> Self {
        Self::with_features(client, Arc::new(DefaultFeatureProvider::from_config(config)))
    }
}

impl<C, P> GateLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    pub fn with_features(client: C, features: Arc<P>) -> Self {
        Self {
            client,
            documents: DocumentStore::default(),
            features,
        }
    }

    /// Store the new text and publish the diagnostics computed from it. Stale versions are
    /// ignored so the published set always reflects the newest text.
    async fn parse_and_publish(&self, uri: Url, text: String, version: i32) {
        let Some(entry) = self.documents.upsert(uri.clone(), text, version).await else {
            tracing::debug!(%uri, version, "ignoring stale document version");
            return;
        };
        let diagnostics: Vec<Diagnostic> = self
            .features
            .diagnostics(&entry.text, &entry.tree)
            .iter()
            .map(to_lsp_diagnostic)
            .collect();
        tracing::debug!(%uri, version, count = diagnostics.len(), "publishing diagnostics");
        self.client
            .publish_diagnostics(uri, diagnostics, Some(entry.version))
            .await;
    }

    async fn document_entry(&self, uri: &Url) -> Option<DocumentEntry> {
        self.documents.get(uri).await
    }

    /// `gate/compileToTrace`
    pub async fn compile_to_trace(&self, params: DocumentParams) -> Result<String> {
        tracing::info!(uri = %params.uri, "compileToTrace");
        Ok(match self.document_entry(&params.uri).await {
            Some(entry) => self.features.compile_to_trace(&entry.tree),
            None => NO_TRACE.to_string(),
        })
    }

    /// `gate/evaluateEvolution`
    pub async fn evaluate_evolution(&self, params: DocumentParams) -> Result<String> {
        tracing::info!(uri = %params.uri, "evaluateEvolution");
        Ok(match self.document_entry(&params.uri).await {
            Some(entry) => self.features.evaluate_evolution(&entry.text),
            None => NO_DOCUMENT.to_string(),
        })
    }

    /// `gate/showGateBreakPreview`
    pub async fn show_gate_break_preview(&self, params: GateBreakPreviewParams) -> Result<String> {
        tracing::info!(uri = %params.uri, "showGateBreakPreview");
        Ok(match self.document_entry(&params.uri).await {
            Some(entry) => self.features.gate_break_preview(&entry.text),
            None => NO_DOCUMENT.to_string(),
        })
    }
}

/// Encode tokens in the LSP relative format, splitting any token that spans lines.
fn encode_semantic_tokens(tokens: &[GateSemanticToken], text: &str) -> Vec<SemanticToken> {
    let location = SourceLocation::new(text);
    let mut data = Vec::new();
    let mut prev_line = 0u32;
    let mut prev_start = 0u32;

    for token in tokens {
        let token_type_index = SEMANTIC_TOKEN_KINDS
            .iter()
            .position(|kind| *kind == token.kind)
            .unwrap_or(0) as u32;
        for (line, start, length) in split_token_on_lines(token, text, &location) {
            if length == 0 {
                continue;
            }
            let delta_line = line.saturating_sub(prev_line);
            let delta_start = if delta_line == 0 {
                start.saturating_sub(prev_start)
            } else {
                start
            };
            data.push(SemanticToken {
                delta_line,
                delta_start,
                length,
                token_type: token_type_index,
                token_modifiers_bitset: 0,
            });
            prev_line = line;
            prev_start = start;
        }
    }

    data
}

fn utf16_len(text: &str) -> u32 {
    text.chars().map(char::len_utf16).sum::<usize>() as u32
}

/// Expand a semantic token range into single-line `(line, column, length)` segments.
///
/// The LSP wire format disallows tokens spanning multiple lines. Columns and lengths are
/// in UTF-16 code units.
fn split_token_on_lines(
    token: &GateSemanticToken,
    text: &str,
    location: &SourceLocation,
) -> Vec<(u32, u32, u32)> {
    let slice = &text[token.range.span.clone()];
    let mut segments = Vec::new();
    let mut line = token.range.start.line;
    let mut segment_start = token.range.span.start;

    for piece in slice.split('\n') {
        if !piece.is_empty() {
            let line_start = location.line_start(line).unwrap_or(0);
            let column = utf16_len(&text[line_start..segment_start]);
            segments.push((line as u32, column, utf16_len(piece)));
        }
        line += 1;
        segment_start += piece.len() + 1;
    }

    segments
}

#[allow(deprecated)]
fn to_document_symbol(symbol: &GateDocumentSymbol) -> DocumentSymbol {
    DocumentSymbol {
        name: symbol.name.clone(),
        detail: symbol.detail.clone(),
        kind: symbol.kind,
        deprecated: None,
        range: to_lsp_range(&symbol.range),
        selection_range: to_lsp_range(&symbol.selection_range),
        children: if symbol.children.is_empty() {
            None
        } else {
            Some(symbol.children.iter().map(to_document_symbol).collect())
        },
        tags: None,
    }
}

#[async_trait]
impl<C, P> tower_lsp::LanguageServer for GateLanguageServer<C, P>
where
    C: LspClient,
    P: FeatureProvider,
{
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        tracing::info!("initializing gate language server");
        let capabilities = ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            document_symbol_provider: Some(OneOf::Left(true)),
            semantic_tokens_provider: Some(
                SemanticTokensServerCapabilities::SemanticTokensOptions(SemanticTokensOptions {
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                    legend: semantic_tokens_legend(),
                    range: None,
                    full: Some(SemanticTokensFullOptions::Bool(true)),
                }),
            ),
            ..ServerCapabilities::default()
        };

        Ok(InitializeResult {
            capabilities,
            server_info: Some(ServerInfo {
                name: "gate-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        tracing::info!("gate language server initialized");
        self.client
            .log_message(MessageType::INFO, "Gate language server ready".to_string())
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutting down gate language server");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let TextDocumentItem {
            uri, text, version, ..
        } = params.text_document;
        tracing::debug!(%uri, "document opened");
        self.parse_and_publish(uri, text, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!(%uri, "document changed");
        if let Some(change) = params.content_changes.into_iter().last() {
            self.parse_and_publish(uri, change.text, params.text_document.version)
                .await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        tracing::debug!(%uri, "document closed");
        self.documents.remove(&uri).await;
        self.client.publish_diagnostics(uri, Vec::new(), None).await;
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        if let Some(entry) = self.document_entry(&params.text_document.uri).await {
            let tokens = self.features.semantic_tokens(&entry.text, &entry.tree);
            let data = encode_semantic_tokens(&tokens, entry.text.as_str());
            Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
                result_id: None,
                data,
            })))
        } else {
            Ok(None)
        }
    }

    async fn document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> Result<Option<DocumentSymbolResponse>> {
        if let Some(entry) = self.document_entry(&params.text_document.uri).await {
            let symbols = self.features.document_symbols(&entry.text, &entry.tree);
            let converted: Vec<DocumentSymbol> = symbols.iter().map(to_document_symbol).collect();
            Ok(Some(DocumentSymbolResponse::Nested(converted)))
        } else {
            Ok(None)
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        if let Some(entry) = self
            .document_entry(&params.text_document_position_params.text_document.uri)
            .await
        {
            let position = from_lsp_position(params.text_document_position_params.position);
            if let Some(result) = self.features.hover(&entry.text, position) {
                return Ok(Some(Hover {
                    contents: HoverContents::Markup(MarkupContent {
                        kind: MarkupKind::Markdown,
                        value: result.contents,
                    }),
                    range: Some(to_lsp_range(&result.range)),
                }));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::semantic_tokens::GateSemanticTokenKind;
    use crate::features::test_support::sample_source;
    use gate_parser::gate::ast::Range as AstRange;
    use gate_parser::gate::testing::SAMPLE_UNCONFIRMED_BREAK;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tower_lsp::lsp_types::{
        DiagnosticSeverity, Position, SymbolKind, TextDocumentContentChangeEvent,
        TextDocumentIdentifier, TextDocumentPositionParams, VersionedTextDocumentIdentifier,
    };
    use tower_lsp::LanguageServer;

    type Published = Vec<(Url, Vec<Diagnostic>, Option<i32>)>;

    #[derive(Clone, Default)]
    struct RecordingClient {
        published: Arc<Mutex<Published>>,
        messages: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingClient {
        fn published(&self) -> Published {
            self.published.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LspClient for RecordingClient {
        async fn publish_diagnostics(
            &self,
            uri: Url,
            diagnostics: Vec<Diagnostic>,
            version: Option<i32>,
        ) {
            self.published
                .lock()
                .unwrap()
                .push((uri, diagnostics, version));
        }

        async fn log_message(&self, _: MessageType, message: String) {
            self.messages.lock().unwrap().push(message);
        }
    }

    #[derive(Default)]
    struct MockFeatureProvider {
        semantic_tokens_called: AtomicUsize,
        document_symbols_called: AtomicUsize,
        hover_called: AtomicUsize,
        last_hover_position: Mutex<Option<AstPosition>>,
    }

    fn first_five() -> AstRange {
        AstRange::new(0..5, AstPosition::new(0, 0), AstPosition::new(0, 5))
    }

    impl FeatureProvider for MockFeatureProvider {
        fn diagnostics(&self, _: &str, _: &SyntaxNode) -> Vec<GateDiagnostic> {
            Vec::new()
        }

        fn semantic_tokens(&self, _: &str, _: &SyntaxNode) -> Vec<GateSemanticToken> {
            self.semantic_tokens_called.fetch_add(1, Ordering::SeqCst);
            vec![GateSemanticToken {
                kind: GateSemanticTokenKind::ControlKeyword,
                range: first_five(),
            }]
        }

        fn document_symbols(&self, _: &str, _: &SyntaxNode) -> Vec<GateDocumentSymbol> {
            self.document_symbols_called.fetch_add(1, Ordering::SeqCst);
            vec![GateDocumentSymbol {
                name: "symbol".into(),
                detail: None,
                kind: SymbolKind::FUNCTION,
                range: first_five(),
                selection_range: first_five(),
                children: Vec::new(),
            }]
        }

        fn hover(&self, _: &str, position: AstPosition) -> Option<HoverResult> {
            self.hover_called.fetch_add(1, Ordering::SeqCst);
            *self.last_hover_position.lock().unwrap() = Some(position);
            Some(HoverResult {
                range: first_five(),
                contents: "hover".into(),
            })
        }

        fn compile_to_trace(&self, _: &SyntaxNode) -> String {
            "trace".into()
        }

        fn evaluate_evolution(&self, _: &str) -> String {
            "evolution".into()
        }

        fn gate_break_preview(&self, _: &str) -> String {
            "preview".into()
        }
    }

    fn sample_uri() -> Url {
        Url::parse("file:///ritual.gate").unwrap()
    }

    async fn open<P: FeatureProvider>(server: &GateLanguageServer<RecordingClient, P>, text: &str) {
        server
            .did_open(DidOpenTextDocumentParams {
                text_document: TextDocumentItem {
                    uri: sample_uri(),
                    language_id: "gate".into(),
                    version: 1,
                    text: text.to_string(),
                },
            })
            .await;
    }

    async fn change<P: FeatureProvider>(
        server: &GateLanguageServer<RecordingClient, P>,
        text: &str,
        version: i32,
    ) {
        server
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: sample_uri(),
                    version,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: text.to_string(),
                }],
            })
            .await;
    }

    fn real_server() -> (
        GateLanguageServer<RecordingClient, DefaultFeatureProvider>,
        RecordingClient,
    ) {
        let client = RecordingClient::default();
        let server =
            GateLanguageServer::with_features(client.clone(), Arc::new(DefaultFeatureProvider::new()));
        (server, client)
    }

    fn mock_server() -> (
        GateLanguageServer<RecordingClient, MockFeatureProvider>,
        Arc<MockFeatureProvider>,
    ) {
        let provider = Arc::new(MockFeatureProvider::default());
        let server = GateLanguageServer::with_features(RecordingClient::default(), provider.clone());
        (server, provider)
    }

    fn absolute_positions(encoded: &[SemanticToken]) -> Vec<(u32, u32, u32)> {
        let mut line = 0u32;
        let mut column = 0u32;
        encoded
            .iter()
            .map(|token| {
                line += token.delta_line;
                column = if token.delta_line == 0 {
                    column + token.delta_start
                } else {
                    token.delta_start
                };
                (line, column, token.length)
            })
            .collect()
    }

    #[test]
    fn encode_semantic_tokens_splits_multi_line_ranges() {
        let text = "x \"\"\"ab\ncd\n\"\"\"";
        let tokens = collect_semantic_tokens(text, &parse(text));
        let encoded = encode_semantic_tokens(&tokens, text);
        assert_eq!(
            absolute_positions(&encoded),
            vec![(0, 2, 5), (1, 0, 2), (2, 0, 3)]
        );
    }

    #[test]
    fn encode_semantic_tokens_counts_utf16_units() {
        let text = "Δ ϟ %MODEL%";
        let tokens = collect_semantic_tokens(text, &parse(text));
        let encoded = encode_semantic_tokens(&tokens, text);
        assert_eq!(
            absolute_positions(&encoded),
            vec![(0, 0, 1), (0, 2, 1), (0, 4, 7)]
        );
    }

    #[tokio::test]
    async fn open_publishes_diagnostics_with_version() {
        let (server, client) = real_server();
        open(&server, SAMPLE_UNCONFIRMED_BREAK).await;

        let published = client.published();
        assert_eq!(published.len(), 1);
        let (uri, diagnostics, version) = &published[0];
        assert_eq!(uri, &sample_uri());
        assert_eq!(*version, Some(1));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(diagnostics[0].source.as_deref(), Some("gate-lsp"));
    }

    #[tokio::test]
    async fn diagnostics_supersede_on_change() {
        let (server, client) = real_server();
        open(&server, SAMPLE_UNCONFIRMED_BREAK).await;
        change(&server, "> FUNCTION_CALL: break_gate() ? confirm:\"YES\"", 2).await;

        let published = client.published();
        assert_eq!(published.len(), 2);
        let (_, latest, version) = published.last().unwrap();
        assert!(latest.is_empty());
        assert_eq!(*version, Some(2));
    }

    #[tokio::test]
    async fn stale_change_does_not_replace_newer_text() {
        let (server, client) = real_server();
        open(&server, SAMPLE_UNCONFIRMED_BREAK).await;
        change(&server, "break_gate() ?confirm:\"YES\"", 3).await;
        change(&server, "break_gate()", 2).await;

        let published = client.published();
        assert_eq!(published.len(), 2);
        let (_, latest, version) = published.last().unwrap();
        assert!(latest.is_empty());
        assert_eq!(*version, Some(3));

        let stored = server.document_entry(&sample_uri()).await.unwrap();
        assert_eq!(stored.version, 3);
        assert_eq!(stored.text.as_str(), "break_gate() ?confirm:\"YES\"");
    }

    #[tokio::test]
    async fn reopen_after_close_accepts_any_version() {
        let (server, client) = real_server();
        open(&server, "Δ").await;
        change(&server, "Δ Δ", 5).await;
        server
            .did_close(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
            })
            .await;
        open(&server, SAMPLE_UNCONFIRMED_BREAK).await;

        let (_, latest, version) = client.published().last().cloned().unwrap();
        assert_eq!(version, Some(1));
        assert_eq!(latest.len(), 1);
    }

    #[tokio::test]
    async fn close_clears_diagnostics_and_forgets_document() {
        let (server, client) = real_server();
        open(&server, SAMPLE_UNCONFIRMED_BREAK).await;
        server
            .did_close(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
            })
            .await;

        let (_, latest, _) = client.published().last().cloned().unwrap();
        assert!(latest.is_empty());
        let trace = server
            .compile_to_trace(DocumentParams { uri: sample_uri() })
            .await
            .unwrap();
        assert_eq!(trace, NO_TRACE);
    }

    #[tokio::test]
    async fn initialized_logs_to_client() {
        let (server, client) = real_server();
        server.initialized(InitializedParams {}).await;
        assert_eq!(client.messages.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn custom_requests_render_text() {
        let (server, _) = real_server();
        open(&server, sample_source()).await;
        let uri = sample_uri();

        let trace = server
            .compile_to_trace(DocumentParams { uri: uri.clone() })
            .await
            .unwrap();
        assert!(trace.starts_with("#==TRACE:COMPILED\n>trace::FUNCTION:"));

        let evolution = server
            .evaluate_evolution(DocumentParams { uri: uri.clone() })
            .await
            .unwrap();
        assert!(evolution.contains("potential:\"0.80\""));

        let preview = server
            .show_gate_break_preview(GateBreakPreviewParams {
                uri,
                position: None,
            })
            .await
            .unwrap();
        assert!(preview.contains("Gate: 13 → 12"));
    }

    #[tokio::test]
    async fn custom_requests_on_unknown_document_use_sentinels() {
        let (server, _) = real_server();
        let uri = Url::parse("file:///missing.gate").unwrap();

        assert_eq!(
            server
                .compile_to_trace(DocumentParams { uri: uri.clone() })
                .await
                .unwrap(),
            ""
        );
        assert_eq!(
            server
                .evaluate_evolution(DocumentParams { uri: uri.clone() })
                .await
                .unwrap(),
            "No document."
        );
        assert_eq!(
            server
                .show_gate_break_preview(GateBreakPreviewParams {
                    uri,
                    position: Some(Position::new(0, 0)),
                })
                .await
                .unwrap(),
            "No document."
        );
    }

    #[tokio::test]
    async fn custom_requests_call_feature_layer() {
        let (server, _) = mock_server();
        open(&server, "anything").await;
        let trace = server
            .compile_to_trace(DocumentParams { uri: sample_uri() })
            .await
            .unwrap();
        assert_eq!(trace, "trace");
    }

    #[tokio::test]
    async fn semantic_tokens_call_feature_layer() {
        let (server, provider) = mock_server();
        open(&server, sample_source()).await;

        let result = server
            .semantic_tokens_full(SemanticTokensParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(provider.semantic_tokens_called.load(Ordering::SeqCst), 1);
        let data_len = match result {
            SemanticTokensResult::Tokens(tokens) => tokens.data.len(),
            SemanticTokensResult::Partial(partial) => partial.data.len(),
        };
        assert!(data_len > 0);
    }

    #[tokio::test]
    async fn document_symbols_call_feature_layer() {
        let (server, provider) = mock_server();
        open(&server, sample_source()).await;

        let response = server
            .document_symbol(DocumentSymbolParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();

        match response {
            DocumentSymbolResponse::Nested(symbols) => assert!(!symbols.is_empty()),
            _ => panic!("unexpected symbol response"),
        }
        assert_eq!(provider.document_symbols_called.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn hover_uses_feature_provider_position() {
        let (server, provider) = mock_server();
        open(&server, sample_source()).await;

        let hover = server
            .hover(HoverParams {
                text_document_position_params: TextDocumentPositionParams {
                    text_document: TextDocumentIdentifier { uri: sample_uri() },
                    position: Position::new(2, 3),
                },
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(hover.contents, HoverContents::Markup(_)));
        assert_eq!(provider.hover_called.load(Ordering::SeqCst), 1);
        let stored = provider.last_hover_position.lock().unwrap().unwrap();
        assert_eq!(stored, AstPosition::new(2, 3));
    }

    #[tokio::test]
    async fn hover_on_glyph_returns_markdown() {
        let (server, _) = real_server();
        open(&server, "gate:13 Δ gate:12").await;

        let hover = server
            .hover(HoverParams {
                text_document_position_params: TextDocumentPositionParams {
                    text_document: TextDocumentIdentifier { uri: sample_uri() },
                    position: Position::new(0, 8),
                },
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap()
            .unwrap();

        match hover.contents {
            HoverContents::Markup(markup) => assert!(markup.value.contains("Delta Shift")),
            other => panic!("unexpected hover contents: {:?}", other),
        }
        assert_eq!(
            hover.range.map(|range| (range.start.character, range.end.character)),
            Some((8, 9))
        );
    }

    #[tokio::test]
    async fn requests_return_none_without_document_entry() {
        let (server, _) = mock_server();

        let tokens = server
            .semantic_tokens_full(SemanticTokensParams {
                text_document: TextDocumentIdentifier { uri: sample_uri() },
                work_done_progress_params: Default::default(),
                partial_result_params: Default::default(),
            })
            .await
            .unwrap();
        assert!(tokens.is_none());

        let hover = server
            .hover(HoverParams {
                text_document_position_params: TextDocumentPositionParams {
                    text_document: TextDocumentIdentifier { uri: sample_uri() },
                    position: Position::new(0, 0),
                },
                work_done_progress_params: Default::default(),
            })
            .await
            .unwrap();
        assert!(hover.is_none());
    }

    #[tokio::test]
    async fn disabled_rule_is_not_published() {
        let config = gate_config::Loader::new()
            .set_override("diagnostics.rules.unconfirmed_break", false)
            .unwrap()
            .build()
            .unwrap();
        let client = RecordingClient::default();
        let server = GateLanguageServer::with_features(
            client.clone(),
            Arc::new(DefaultFeatureProvider::from_config(&config)),
        );
        open(&server, SAMPLE_UNCONFIRMED_BREAK).await;

        let (_, diagnostics, _) = client.published().pop().unwrap();
        assert!(diagnostics.is_empty());
    }
}
