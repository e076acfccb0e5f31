use qwen_voice_core::settings::ClientConfig;
use qwen_voice_core::tts::dashscope::DashScope;
use qwen_voice_core::{SpeechSynthesizer, SynthesisRequest, VoiceReplyError, VoiceTag};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATION_PATH: &str = "/api/v1/services/aigc/multimodal-generation/generation";

fn client(server: &MockServer) -> DashScope {
    DashScope::new(
        ClientConfig::new("sk-test").with_base_url(&format!("{}/api/v1", server.uri())),
    )
    .unwrap()
}

async fn respond_with(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(GENERATION_PATH))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_synthesize_returns_audio_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATION_PATH))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({
            "model": "qwen3-tts-vc-2026-01-22",
            "input": {
                "text": "こんにちは",
                "voice": "yachiyo",
                "language_type": "Japanese"
            },
            "parameters": { "stream": false }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": "req-1",
            "output": { "audio": { "url": "https://oss.example.com/audio.wav" } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let request = SynthesisRequest::new(
        "こんにちは",
        "qwen3-tts-vc-2026-01-22",
        "yachiyo",
        VoiceTag::Jp,
    );

    let url = client(&server).synthesize(&request).await.unwrap();

    assert_eq!(url, "https://oss.example.com/audio.wav");
}

#[tokio::test]
async fn test_instruct_model_sends_instruction() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({ "output": { "audio_url": "https://oss.example.com/audio.wav" } })),
    )
    .await;
    let request = SynthesisRequest::new("你好", "qwen3-tts-instruct-flash", "Cherry", VoiceTag::Zh);

    let url = client(&server).synthesize(&request).await.unwrap();

    assert_eq!(url, "https://oss.example.com/audio.wav");
    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(
        body["input"]["instructions"],
        VoiceTag::Zh.default_instruction()
    );
    assert_eq!(body["input"]["optimize_instructions"], true);
}

#[tokio::test]
async fn test_missing_url_is_synthesis_error_with_response() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(json!({ "request_id": "req-2", "output": { "finish_reason": "stop" } })),
    )
    .await;
    let request = SynthesisRequest::new("hello", "qwen3-tts-flash", "Cherry", VoiceTag::En);

    let err = client(&server).synthesize(&request).await.unwrap_err();

    match err {
        VoiceReplyError::Synthesis { message, response } => {
            assert!(message.contains("no audio URL"));
            assert!(response.contains("req-2"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_is_synthesis_error_with_body() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(401).set_body_json(
            json!({ "code": "InvalidApiKey", "message": "Invalid API-key provided." }),
        ),
    )
    .await;
    let request = SynthesisRequest::new("hello", "qwen3-tts-flash", "Cherry", VoiceTag::En);

    let err = client(&server).synthesize(&request).await.unwrap_err();

    assert!(matches!(err, VoiceReplyError::Synthesis { .. }));
    let message = err.to_string();
    assert!(message.contains("401"));
    assert!(message.contains("InvalidApiKey"));
}

#[tokio::test]
async fn test_non_json_body_is_synthesis_error() {
    let server = MockServer::start().await;
    respond_with(
        &server,
        ResponseTemplate::new(200).set_body_string("<html>gateway</html>"),
    )
    .await;
    let request = SynthesisRequest::new("hello", "qwen3-tts-flash", "Cherry", VoiceTag::En);

    let err = client(&server).synthesize(&request).await.unwrap_err();

    assert!(matches!(err, VoiceReplyError::Synthesis { .. }));
    assert!(err.to_string().contains("<html>gateway</html>"));
}
