//! End-to-end confirmation and failover tests against a running server

mod mocks;

use grocer_router::mocks::{mock_provider, FaultInjection, MockPantryAdapter};
use grocer_router::types::storage::{DecisionStorage, OutcomeStorage};
use grocer_router::{
	ConfirmationResponse, EngineBuilder, OptimizationPreference, RoutingResponse,
};
use mocks::fixtures::{single_item_request, test_settings};
use mocks::test_server::TestServer;
use std::sync::Arc;

/// Primary ("alpha-p", cheapest) with the given confirm fault; alternative
/// ("beta-p") always confirms.
fn failover_builder(primary_fault: FaultInjection) -> EngineBuilder {
	let primary = Arc::new(
		MockPantryAdapter::new("alpha-adapter")
			.with_unit_price(300)
			.with_fault(primary_fault),
	);
	let alternative = Arc::new(MockPantryAdapter::new("beta-adapter").with_unit_price(400));

	EngineBuilder::new()
		.with_settings(test_settings())
		.with_adapter(primary)
		.with_adapter(alternative)
		.with_provider(mock_provider("alpha-p", "alpha-adapter"))
		.with_provider(mock_provider("beta-p", "beta-adapter"))
}

async fn route(server: &TestServer, client: &reqwest::Client) -> RoutingResponse {
	client
		.post(server.url("/api/v1/routes"))
		.json(&single_item_request(OptimizationPreference::Price))
		.send()
		.await
		.unwrap()
		.json()
		.await
		.unwrap()
}

async fn confirm(
	server: &TestServer,
	client: &reqwest::Client,
	token: &str,
) -> reqwest::Response {
	client
		.post(server.url("/api/v1/confirmations"))
		.json(&serde_json::json!({
			"confirmationToken": token,
			"userId": "user-1",
			"paymentHandle": "pay_123",
		}))
		.send()
		.await
		.unwrap()
}

#[tokio::test]
async fn test_confirm_happy_path() {
	let server = TestServer::spawn(failover_builder(FaultInjection::None))
		.await
		.unwrap();
	let client = reqwest::Client::new();

	let routed = route(&server, &client).await;
	assert_eq!(routed.provider_id, "alpha-p");

	let response = confirm(&server, &client, &routed.confirmation_token).await;
	assert_eq!(response.status(), 200);
	let body: ConfirmationResponse = response.json().await.unwrap();

	assert!(body.success);
	assert_eq!(body.provider_id.as_deref(), Some("alpha-p"));
	assert!(body.order_id.as_deref().unwrap().starts_with("pantry_"));
	assert!(!body.failover_attempted);
	assert!(body.failover_from.is_none());
	assert!(body.estimated_delivery.is_some());
}

#[tokio::test]
async fn test_retryable_failure_fails_over_to_alternative() {
	let server = TestServer::spawn(failover_builder(FaultInjection::ConfirmUnavailable))
		.await
		.unwrap();
	let client = reqwest::Client::new();

	let routed = route(&server, &client).await;
	assert_eq!(routed.provider_id, "alpha-p");
	assert_eq!(routed.alternatives[0].provider_id, "beta-p");

	let response = confirm(&server, &client, &routed.confirmation_token).await;
	assert_eq!(response.status(), 200);
	let body: ConfirmationResponse = response.json().await.unwrap();

	assert!(body.success);
	assert!(body.failover_attempted);
	assert_eq!(body.failover_from.as_deref(), Some("alpha-p"));
	assert_eq!(body.provider_id.as_deref(), Some("beta-p"));

	// Exactly two attempts recorded, in order: failed primary, successful
	// alternative
	let decision = server
		.state
		.storage
		.get_decision(&routed.confirmation_token)
		.await
		.unwrap()
		.unwrap();
	let attempts = server
		.state
		.storage
		.attempts_for_decision(&decision.decision_id)
		.await
		.unwrap();
	assert_eq!(attempts.len(), 2);
	assert_eq!(attempts[0].provider_id, "alpha-p");
	assert!(!attempts[0].succeeded());
	assert_eq!(attempts[1].provider_id, "beta-p");
	assert!(attempts[1].succeeded());
}

#[tokio::test]
async fn test_payment_declined_never_fails_over() {
	let server = TestServer::spawn(failover_builder(FaultInjection::ConfirmPaymentDeclined))
		.await
		.unwrap();
	let client = reqwest::Client::new();

	let routed = route(&server, &client).await;
	assert_eq!(routed.alternatives.len(), 1);

	let response = confirm(&server, &client, &routed.confirmation_token).await;
	assert_eq!(response.status(), 200);
	let body: ConfirmationResponse = response.json().await.unwrap();

	assert!(!body.success);
	assert!(!body.failover_attempted);
	assert!(body.provider_id.is_none());
	assert!(body.message.contains("check your payment method"));

	// A single attempt despite the available alternative
	let decision = server
		.state
		.storage
		.get_decision(&routed.confirmation_token)
		.await
		.unwrap()
		.unwrap();
	let attempts = server
		.state
		.storage
		.attempts_for_decision(&decision.decision_id)
		.await
		.unwrap();
	assert_eq!(attempts.len(), 1);
	assert_eq!(attempts[0].provider_id, "alpha-p");
}

#[tokio::test]
async fn test_terminal_failure_names_both_providers() {
	let primary = Arc::new(
		MockPantryAdapter::new("alpha-adapter")
			.with_unit_price(300)
			.with_fault(FaultInjection::ConfirmUnavailable),
	);
	let alternative = Arc::new(
		MockPantryAdapter::new("beta-adapter")
			.with_unit_price(400)
			.with_fault(FaultInjection::ConfirmUnavailable),
	);

	let builder = EngineBuilder::new()
		.with_settings(test_settings())
		.with_adapter(primary)
		.with_adapter(alternative)
		.with_provider(mock_provider("alpha-p", "alpha-adapter"))
		.with_provider(mock_provider("beta-p", "beta-adapter"));

	let server = TestServer::spawn(builder).await.unwrap();
	let client = reqwest::Client::new();

	let routed = route(&server, &client).await;
	let body: ConfirmationResponse = confirm(&server, &client, &routed.confirmation_token)
		.await
		.json()
		.await
		.unwrap();

	assert!(!body.success);
	assert!(body.failover_attempted);
	assert!(body.message.contains("Mock alpha-p"));
	assert!(body.message.contains("Mock beta-p"));
}

#[tokio::test]
async fn test_token_is_single_use_over_http() {
	let server = TestServer::spawn(failover_builder(FaultInjection::None))
		.await
		.unwrap();
	let client = reqwest::Client::new();

	let routed = route(&server, &client).await;

	let first = confirm(&server, &client, &routed.confirmation_token).await;
	assert_eq!(first.status(), 200);

	let replay = confirm(&server, &client, &routed.confirmation_token).await;
	assert_eq!(replay.status(), 409);
	let body: serde_json::Value = replay.json().await.unwrap();
	assert_eq!(body["error"], "TOKEN_ALREADY_USED");
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
	let server = TestServer::spawn(failover_builder(FaultInjection::None))
		.await
		.unwrap();
	let client = reqwest::Client::new();

	let response = confirm(&server, &client, "tok_does_not_exist").await;
	assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_successful_confirmation_feeds_reliability() {
	let server = TestServer::spawn(failover_builder(FaultInjection::None))
		.await
		.unwrap();
	let client = reqwest::Client::new();

	let routed = route(&server, &client).await;
	confirm(&server, &client, &routed.confirmation_token).await;

	let reliability = server
		.state
		.storage
		.provider_reliability("alpha-p", 50)
		.await
		.unwrap();
	assert_eq!(reliability.attempts, 1);
	assert_eq!(reliability.successes, 1);

	let outcomes = server
		.state
		.storage
		.outcomes_for_provider("alpha-p")
		.await
		.unwrap();
	assert_eq!(outcomes.len(), 1);
	assert!(outcomes[0].success);
}
