//! Integration tests for LLM provider implementations.
//!
//! Uses mockito HTTP mocking to test the OpenRouter and Ollama providers
//! without requiring actual servers or API keys.

#[cfg(feature = "openrouter")]
mod openrouter_tests {
    use lintsmith::llm::client::{LLMClient, RetryConfig};
    use lintsmith::llm::provider::{CompletionOptions, LLMProvider, Message};
    use lintsmith::llm::providers::openrouter::OpenRouterProvider;
    use lintsmith::utils::error::LintsmithError;
    use std::time::Duration;

    fn provider(server: &mockito::Server) -> OpenRouterProvider {
        OpenRouterProvider::new("test-key".to_string(), "openai/gpt-4o".to_string())
            .expect("should create provider")
            .with_base_url(server.url())
    }

    /// Test a successful completion is parsed with token usage.
    #[tokio::test]
    async fn test_openrouter_completion_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{"message": {"role": "assistant", "content": "module.exports = {};"}}],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 7}
                }"#,
            )
            .create_async()
            .await;

        let response = provider(&server)
            .complete(&[Message::user("Write a rule")], &CompletionOptions::default())
            .await
            .expect("completion should succeed");

        assert_eq!(response.content, "module.exports = {};");
        assert_eq!(response.prompt_tokens, 12);
        assert_eq!(response.completion_tokens, 7);
        mock.assert_async().await;
    }

    /// Test HTTP 429 maps to a rate limit error with the retry-after hint.
    #[tokio::test]
    async fn test_openrouter_rate_limit() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_header("retry-after", "7")
            .with_body("{}")
            .create_async()
            .await;

        let err = provider(&server)
            .complete(&[Message::user("Hi")], &CompletionOptions::default())
            .await
            .expect_err("should be rate limited");

        match err {
            LintsmithError::RateLimited {
                provider,
                retry_after,
            } => {
                assert_eq!(provider, "openrouter");
                assert_eq!(retry_after, Some(Duration::from_secs(7)));
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    /// Test structured API errors keep their type and message.
    #[tokio::test]
    async fn test_openrouter_structured_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "No such model", "code": 400}}"#)
            .create_async()
            .await;

        let err = provider(&server)
            .complete(&[Message::user("Hi")], &CompletionOptions::default())
            .await
            .expect_err("should fail");

        let message = err.to_string();
        assert!(message.contains("openrouter"));
        assert!(message.contains("No such model"));
        assert!(!err.is_transient());
    }

    /// Test the client retries rate limited requests and gives up after the budget.
    #[tokio::test]
    async fn test_client_retries_rate_limits_then_gives_up() {
        let mut server = mockito::Server::new_async().await;
        let limited = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_header("retry-after", "0")
            .expect(3)
            .create_async()
            .await;

        let client = LLMClient::with_retry_config(
            Box::new(provider(&server)),
            RetryConfig {
                max_retries: 2,
                initial_delay_ms: 1,
                max_delay_ms: 5,
            },
        );

        let err = client
            .complete(&[Message::user("Hi")], &CompletionOptions::default())
            .await
            .expect_err("retries should run out");
        assert!(matches!(err, LintsmithError::RateLimited { .. }));
        limited.assert_async().await;
    }
}

#[cfg(feature = "ollama")]
mod ollama_tests {
    use lintsmith::llm::provider::{CompletionOptions, LLMProvider, Message};
    use lintsmith::llm::providers::ollama::OllamaProvider;

    /// Test Ollama pricing is always zero (free local inference).
    #[test]
    fn test_ollama_pricing_is_free() {
        let provider = OllamaProvider::new(
            "http://localhost:11434".to_string(),
            "qwen2.5-coder".to_string(),
        )
        .expect("should create provider");
        let pricing = provider.pricing();
        assert_eq!(pricing.input_per_1k, 0.0);
        assert_eq!(pricing.output_per_1k, 0.0);
        assert_eq!(provider.model(), "qwen2.5-coder");
    }

    /// Test Ollama successful completion via mock server.
    #[tokio::test]
    async fn test_ollama_completion_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{"message": {"content": "Hello from Ollama!"}}],
                    "usage": {"prompt_tokens": 10, "completion_tokens": 5}
                }"#,
            )
            .create_async()
            .await;

        let provider = OllamaProvider::new(server.url(), "qwen2.5-coder".to_string())
            .expect("should create provider");
        let response = provider
            .complete(&[Message::user("Hello")], &CompletionOptions::default())
            .await
            .expect("completion should succeed");

        assert_eq!(response.content, "Hello from Ollama!");
        assert_eq!(response.total_tokens(), 15);
        mock.assert_async().await;
    }

    /// Test a missing model produces an actionable error.
    #[tokio::test]
    async fn test_ollama_model_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(404)
            .with_body(r#"{"error": "model not found"}"#)
            .create_async()
            .await;

        let provider = OllamaProvider::new(server.url(), "missing-model".to_string())
            .expect("should create provider");
        let err = provider
            .complete(&[Message::user("Hello")], &CompletionOptions::default())
            .await
            .expect_err("should fail");

        assert!(err.to_string().contains("ollama pull missing-model"));
    }
}
