/*!
 * Tests for the OpenAI-compatible provider against a local HTTP server
 */

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use transeval::app_config::EvaluationConfig;
use transeval::providers::openai::OpenAICompatible;
use transeval::{Evaluator, ProviderError, TerminologyMode, TextCompletion};

use crate::common;

fn provider(base_url: &str) -> Result<OpenAICompatible> {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()?;
    Ok(
        OpenAICompatible::new(base_url, "v1", "test-key", "test-model", 0.3, Duration::from_secs(5))
            .with_http_client(client),
    )
}

#[tokio::test]
async fn test_complete_withSuccessResponse_shouldReturnContent() -> Result<()> {
    common::init_logging();
    let (base_url, server) =
        common::serve_once("200 OK", common::chat_completion_body(r#"{"合金": "alloy"}"#)).await?;

    let reply = provider(&base_url)?.complete("Extract terms").await?;
    assert_eq!(reply, r#"{"合金": "alloy"}"#);

    let request = server.await?;
    let lowered = request.to_lowercase();
    assert!(lowered.starts_with("post /v1/chat/completions"));
    assert!(lowered.contains("authorization: bearer test-key"));
    assert!(request.contains("\"model\":\"test-model\""));
    assert!(request.contains("Extract terms"));
    Ok(())
}

#[tokio::test]
async fn test_complete_withUnauthorized_shouldReturnAuthenticationError() -> Result<()> {
    let (base_url, _server) =
        common::serve_once("401 Unauthorized", r#"{"error": "bad key"}"#.to_string()).await?;

    let result = provider(&base_url)?.complete("Extract terms").await;
    assert!(matches!(result, Err(ProviderError::AuthenticationError(_))));
    Ok(())
}

#[tokio::test]
async fn test_complete_withTooManyRequests_shouldReturnRateLimit() -> Result<()> {
    let (base_url, _server) =
        common::serve_once("429 Too Many Requests", r#"{"error": "slow down"}"#.to_string()).await?;

    let result = provider(&base_url)?.complete("Extract terms").await;
    assert!(matches!(result, Err(ProviderError::RateLimitExceeded(_))));
    Ok(())
}

#[tokio::test]
async fn test_complete_withServerError_shouldKeepStatusCode() -> Result<()> {
    let (base_url, _server) =
        common::serve_once("500 Internal Server Error", "oops".to_string()).await?;

    match provider(&base_url)?.complete("Extract terms").await {
        Err(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 500);
            assert_eq!(message, "oops");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_complete_withMalformedBody_shouldReturnParseError() -> Result<()> {
    let (base_url, _server) = common::serve_once("200 OK", "not json".to_string()).await?;

    let result = provider(&base_url)?.complete("Extract terms").await;
    assert!(matches!(result, Err(ProviderError::ParseError(_))));
    Ok(())
}

#[tokio::test]
async fn test_complete_withClosedPort_shouldReturnConnectionError() -> Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    drop(listener);

    let result = provider(&format!("http://{}", address))?.complete("Extract terms").await;
    assert!(matches!(result, Err(ProviderError::ConnectionError(_))));
    Ok(())
}

#[tokio::test]
async fn test_evaluate_withExternalProvider_shouldUseServerTerms() -> Result<()> {
    let content = "Here are the terms:\n{\"纳米材料\": \"nanomaterials\", \"合金\": \"alloy\"}";
    let (base_url, _server) = common::serve_once("200 OK", common::chat_completion_body(content)).await?;

    let config = EvaluationConfig {
        terminology_mode: TerminologyMode::ExternalModel,
        extraction_timeout_secs: 5,
        ..EvaluationConfig::default()
    };
    let evaluator = Evaluator::new(config).with_completion(Arc::new(provider(&base_url)?));

    let result = evaluator
        .evaluate(&common::sample_input(common::GOOD_TRANSLATION, &[common::REFERENCE_TEXT]))
        .await;

    let terms = result.extracted_terms.unwrap_or_default();
    assert_eq!(terms.len(), 2);
    assert_eq!(terms.get("合金").map(String::as_str), Some("alloy"));
    assert!((result.terminology.score - 0.2).abs() < 1e-6);
    Ok(())
}
