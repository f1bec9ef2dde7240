//! End-to-end session scenarios against scripted backends.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use cic_config::{CicConfig, GeminiConfig};
use cic_core::CatechismEntry;
use cic_gateway::{GenerationBackend, GenerationRequest, SearchError, SearchGateway};
use cic_session::{SearchOutcome, SearchSession, SessionPhase};
use pretty_assertions::assert_eq;
use tokio::sync::oneshot;

/// Backend that replays queued responses in order.
#[derive(Default)]
struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<Option<String>, SearchError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn replying(responses: Vec<Result<Option<String>, SearchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::default(),
        }
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(
        &self,
        _api_key: &str,
        request: &GenerationRequest,
    ) -> Result<Option<String>, SearchError> {
        self.prompts.lock().unwrap().push(request.user_prompt.clone());
        self.responses.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

/// Backend whose answer for each query is released by the test.
#[derive(Default)]
struct GatedBackend {
    gates: Mutex<Vec<(String, oneshot::Receiver<String>)>>,
}

impl GatedBackend {
    fn gate(&self, query: &str) -> oneshot::Sender<String> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push((format!("\"{query}\""), rx));
        tx
    }
}

#[async_trait]
impl GenerationBackend for GatedBackend {
    async fn generate(
        &self,
        _api_key: &str,
        request: &GenerationRequest,
    ) -> Result<Option<String>, SearchError> {
        let gate = {
            let mut gates = self.gates.lock().unwrap();
            let position = gates
                .iter()
                .position(|(quoted, _)| request.user_prompt.contains(quoted.as_str()))
                .expect("gate registered for query");
            gates.remove(position).1
        };
        Ok(gate.await.ok())
    }
}

fn config_with_key(key: &str) -> CicConfig {
    CicConfig {
        gemini: GeminiConfig {
            api_key: key.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn session<B: GenerationBackend>(backend: B) -> SearchSession<B> {
    SearchSession::new(SearchGateway::new(&config_with_key("AIza-test"), backend).unwrap())
}

fn eucharist_entries() -> Vec<CatechismEntry> {
    vec![
        CatechismEntry::new(
            1322,
            "A sagrada Eucaristia completa a iniciação cristã.",
            "O sacramento da Eucaristia",
        ),
        CatechismEntry::new(
            1324,
            "A Eucaristia é fonte e ápice de toda a vida cristã.",
            "O sacramento da Eucaristia",
        )
        .with_reference("LG 11"),
        CatechismEntry::new(
            1333,
            "No coração da celebração da Eucaristia estão o pão e o vinho.",
            "Os sinais do pão e do vinho",
        ),
        CatechismEntry::new(
            1374,
            "O modo de presença de Cristo sob as espécies eucarísticas é singular.",
            "A presença de Cristo",
        ),
    ]
}

fn baptism_entries() -> Vec<CatechismEntry> {
    vec![
        CatechismEntry::new(
            1213,
            "O santo Batismo é o fundamento de toda a vida cristã.",
            "O sacramento do Batismo",
        ),
        CatechismEntry::new(
            1257,
            "O Senhor mesmo afirma que o Batismo é necessário para a salvação.",
            "A necessidade do Batismo",
        ),
        CatechismEntry::new(
            1263,
            "Pelo Batismo, todos os pecados são perdoados.",
            "A graça do Batismo",
        ),
    ]
}

fn body(entries: &[CatechismEntry]) -> String {
    serde_json::to_string(entries).unwrap()
}

#[tokio::test]
async fn eucharist_search_succeeds_in_order() {
    let mut session = session(ScriptedBackend::replying(vec![Ok(Some(body(
        &eucharist_entries(),
    )))]));
    assert_eq!(session.state().phase, SessionPhase::Idle);

    let pending = session.begin("Eucaristia").unwrap();
    assert_eq!(pending.query(), "Eucaristia");
    assert_eq!(pending.generation(), 1);
    assert_eq!(session.state().phase, SessionPhase::Searching);
    assert!(session.view().loading);

    let outcome = pending.resolve().await;
    assert_eq!(outcome, SearchOutcome::Completed(4));

    let state = session.state();
    assert_eq!(state.phase, SessionPhase::Success);
    assert_eq!(
        state.entries.iter().map(|e| e.number).collect::<Vec<_>>(),
        vec![1322, 1324, 1333, 1374]
    );

    let view = session.view();
    assert_eq!(
        view.status_text.as_deref(),
        Some("Resultados para: \"Eucaristia\"")
    );
    assert_eq!(view.result_count_label, "4 resultados");
    assert!(view.empty_state.is_none());
    assert!(view.error.is_none());
}

#[tokio::test]
async fn nonsense_query_shows_empty_state_with_fallback() {
    let mut session = session(ScriptedBackend::replying(vec![Ok(Some("[]".into()))]));

    let outcome = session.search("xyzzy-nonsense").await;
    assert_eq!(outcome, SearchOutcome::Completed(0));
    assert_eq!(session.state().phase, SessionPhase::Success);

    let view = session.view();
    let empty = view.empty_state.expect("empty state shown");
    assert_eq!(empty.suggestion.query, "Credo");
    assert_eq!(view.result_count, 0);
}

#[tokio::test]
async fn credential_failure_clears_previous_results() {
    let mut session = session(ScriptedBackend::replying(vec![
        Ok(Some(body(&eucharist_entries()))),
        Err(SearchError::Credential("API key not valid.".into())),
    ]));

    session.search("Eucaristia").await;
    assert_eq!(session.state().entries.len(), 4);

    let outcome = session.search("Batismo").await;
    assert_eq!(
        outcome,
        SearchOutcome::Failed("Chave de API inválida ou ausente.".into())
    );

    let state = session.state();
    assert_eq!(state.phase, SessionPhase::Failed);
    assert!(state.entries.is_empty());

    let view = session.view();
    let error = view.error.expect("error shown");
    assert_eq!(error.message, "Chave de API inválida ou ausente.");
    assert!(view.empty_state.is_none());
}

#[tokio::test]
async fn malformed_response_fails_with_plain_message() {
    let mut session = session(ScriptedBackend::replying(vec![Ok(Some(
        "Desculpe, não posso ajudar com isso.".into(),
    ))]));

    let outcome = session.search("Eucaristia").await;
    let SearchOutcome::Failed(message) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(message, "Falha ao processar dados retornados pela IA.");
    assert!(!message.contains("JSON"));
}

#[tokio::test]
async fn missing_key_fails_the_session() {
    let gateway = SearchGateway::new(&config_with_key(""), ScriptedBackend::default()).unwrap();
    let mut session = SearchSession::new(gateway);

    let outcome = session.search("Eucaristia").await;
    assert!(matches!(outcome, SearchOutcome::Failed(ref m) if m.contains("API_KEY")));
    assert_eq!(session.state().phase, SessionPhase::Failed);
}

#[tokio::test]
async fn new_submission_supersedes_in_flight_search() {
    let backend = GatedBackend::default();
    let release_eucharist = backend.gate("Eucaristia");
    let release_baptism = backend.gate("Batismo");
    let mut session = session(backend);

    let first = tokio::spawn(session.begin("Eucaristia").unwrap().resolve());
    tokio::task::yield_now().await;

    let second = session.begin("Batismo").unwrap();
    assert_eq!(second.generation(), 2);

    // The stale answer arrives after the newer submission.
    let _ = release_eucharist.send(body(&eucharist_entries()));
    release_baptism.send(body(&baptism_entries())).unwrap();

    let second = second.resolve().await;
    let first = first.await.unwrap();

    assert_eq!(first, SearchOutcome::Superseded);
    assert_eq!(second, SearchOutcome::Completed(3));

    let state = session.state();
    assert_eq!(state.phase, SessionPhase::Success);
    assert_eq!(state.query.as_deref(), Some("Batismo"));
    assert_eq!(state.entries, baptism_entries());
}

#[tokio::test]
async fn superseded_search_resolved_late_leaves_state_alone() {
    let backend = GatedBackend::default();
    let release_eucharist = backend.gate("Eucaristia");
    let release_baptism = backend.gate("Batismo");
    let mut session = session(backend);

    let first = session.begin("Eucaristia").unwrap();
    let second = session.begin("Batismo").unwrap();
    release_baptism.send(body(&baptism_entries())).unwrap();
    assert_eq!(second.resolve().await, SearchOutcome::Completed(3));

    let _ = release_eucharist.send(body(&eucharist_entries()));
    assert_eq!(first.resolve().await, SearchOutcome::Superseded);
    assert_eq!(session.state().entries, baptism_entries());
}

#[tokio::test]
async fn blank_queries_are_ignored() {
    let mut session = session(ScriptedBackend::default());

    for query in ["", "   ", "\n\t"] {
        assert!(session.begin(query).is_none());
        assert_eq!(session.search(query).await, SearchOutcome::Ignored);
    }
    assert_eq!(session.state().phase, SessionPhase::Idle);
    assert!(session.view().status_text.is_none());
}

#[tokio::test]
async fn retry_with_fallback_searches_credo() {
    let credo = vec![CatechismEntry::new(
        185,
        "Quem diz «eu creio» diz «dou a minha adesão àquilo que nós cremos».",
        "O Credo",
    )];
    let mut session = session(ScriptedBackend::replying(vec![
        Ok(Some("[]".into())),
        Ok(Some(body(&credo))),
    ]));

    session.search("xyzzy-nonsense").await;
    let outcome = session.retry_with_fallback().await;

    assert_eq!(outcome, SearchOutcome::Completed(1));
    assert_eq!(session.state().query.as_deref(), Some("Credo"));
    assert_eq!(session.state().entries, credo);
}

#[tokio::test]
async fn subscribers_observe_each_transition() {
    let mut session = session(ScriptedBackend::replying(vec![Ok(Some(body(
        &eucharist_entries(),
    )))]));
    let mut rx = session.subscribe();

    let pending = session.begin("Eucaristia").unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().phase, SessionPhase::Searching);

    pending.resolve().await;
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().phase, SessionPhase::Success);
}
