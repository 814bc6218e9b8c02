//! FedEx REST API gateway
//!
//! Implements `CarrierGateway` against the FedEx Rate, Ship and Track APIs.
//! The OAuth token is obtained outside this crate and handed in through
//! `CarrierCredentials`.
//!
//! API Docs: https://developer.fedex.com/api/en-us/catalog.html

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::carriers::http_client::RateLimitedClient;
use crate::carriers::traits::{
    CarrierCredentials, CarrierError, CarrierGateway, CarrierResult, LabelRequest, RateRequest,
};
use crate::domain::{Label, RateQuote, ServiceLevel, TrackingEvent};
use super::mapper::{FedexMapper, FedexOperation};
use super::models::*;
use super::services::{self, CARRIER_CODE};

pub const DEFAULT_BASE_URL: &str = "https://apis.fedex.com";

const RATE_PATH: &str = "/rate/v1/rates/quotes";
const SHIP_PATH: &str = "/ship/v1/shipments";
const TRACK_PATH: &str = "/track/v1/trackingnumbers";

/// FedEx API client
pub struct FedexGateway {
    /// Rate-limited HTTP client
    client: RateLimitedClient,

    /// OAuth access token
    access_token: Option<String>,

    /// Shipper account number
    account_number: Option<String>,

    /// API base URL
    base_url: String,
}

impl FedexGateway {
    /// Create a new FedEx gateway
    ///
    /// # Arguments
    /// * `credentials` - Access token and account number
    /// * `base_url` - API root (production or sandbox)
    /// * `rate_limit_per_minute` - Client-side request quota
    /// * `timeout` - Per-request timeout
    pub fn new(
        credentials: CarrierCredentials,
        base_url: impl Into<String>,
        rate_limit_per_minute: u32,
        timeout: Duration,
    ) -> CarrierResult<Self> {
        Ok(FedexGateway {
            client: RateLimitedClient::new(rate_limit_per_minute, timeout)?,
            access_token: credentials.access_token,
            account_number: credentials.account_number,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn account_number(&self) -> CarrierResult<&str> {
        self.account_number
            .as_deref()
            .ok_or_else(|| CarrierError::NotConfigured("No FedEx account number configured".to_string()))
    }

    /// Make an authenticated POST request and unwrap the `output` envelope
    async fn post<B, T>(&self, path: &str, body: &B, operation: FedexOperation) -> CarrierResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self
            .access_token
            .as_ref()
            .ok_or_else(|| CarrierError::NotConfigured("No FedEx access token configured".to_string()))?;

        let url = format!("{}{}", self.base_url, path);
        let transaction_id = Uuid::new_v4().to_string();
        debug!(url = %url, transaction_id = %transaction_id, "FedEx API request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("X-locale", "en_US")
            .header("x-customer-transaction-id", &transaction_id)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let err = FedexMapper::classify_error(status.as_u16(), &text, operation);
            warn!(status = status.as_u16(), transaction_id = %transaction_id, error = %err, "FedEx request failed");
            return Err(err);
        }

        serde_json::from_str::<FedexResponse<T>>(&text)
            .map(|r| r.output)
            .map_err(|e| {
                CarrierError::Parse(format!(
                    "JSON parse error: {} - Body: {}",
                    e,
                    text.chars().take(500).collect::<String>()
                ))
            })
    }

    fn check_service(code: &str) -> CarrierResult<()> {
        services::find(code)
            .map(|_| ())
            .ok_or_else(|| CarrierError::UnsupportedService(code.to_string()))
    }
}

#[async_trait]
impl CarrierGateway for FedexGateway {
    fn code(&self) -> &str {
        CARRIER_CODE
    }

    fn name(&self) -> &str {
        "FedEx"
    }

    fn service_levels(&self) -> Vec<ServiceLevel> {
        services::service_levels()
    }

    async fn get_rates(&self, request: &RateRequest) -> CarrierResult<Vec<RateQuote>> {
        if let Some(code) = request.service_code.as_deref() {
            Self::check_service(code)?;
        }

        let body = FedexMapper::build_rate_request(self.account_number()?, request);
        let output: FedexRateOutput = self.post(RATE_PATH, &body, FedexOperation::Rate).await?;

        let mut quotes = FedexMapper::map_rate_output(output, request.hub_id.as_deref());
        if let Some(code) = request.service_code.as_deref() {
            quotes.retain(|q| q.service_code.eq_ignore_ascii_case(code));
        }

        debug!(count = quotes.len(), service = ?request.service_code, "FedEx rates received");
        Ok(quotes)
    }

    async fn create_label(&self, request: &LabelRequest) -> CarrierResult<Label> {
        Self::check_service(&request.service_code)?;
        if request.packages.is_empty() {
            return Err(CarrierError::LabelRejected("Shipment has no packages".to_string()));
        }

        let body = FedexMapper::build_ship_request(self.account_number()?, request);
        let output: FedexShipOutput = self.post(SHIP_PATH, &body, FedexOperation::Ship).await?;
        let label = FedexMapper::map_ship_output(output, &request.service_code)?;

        info!(
            tracking_number = %label.tracking_number,
            service = %label.service_code,
            "FedEx label created"
        );
        Ok(label)
    }

    async fn track(&self, tracking_number: &str) -> CarrierResult<Vec<TrackingEvent>> {
        let body = FedexMapper::build_track_request(tracking_number);
        let output: FedexTrackOutput = self.post(TRACK_PATH, &body, FedexOperation::Track).await?;
        FedexMapper::map_track_output(output, tracking_number)
    }

    fn rate_limit_remaining(&self) -> Option<u32> {
        self.client.remaining_requests()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, LabelArtifact, Package, TrackingStatus};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> CarrierCredentials {
        CarrierCredentials {
            access_token: Some("test-token".to_string()),
            account_number: Some("740561073".to_string()),
        }
    }

    fn gateway(server: &MockServer) -> FedexGateway {
        FedexGateway::new(credentials(), server.uri(), 600, Duration::from_secs(5)).unwrap()
    }

    fn address(region: &str, postal: &str) -> Address {
        Address {
            street_lines: vec!["10 FedEx Pkwy".to_string()],
            city: "Somewhere".to_string(),
            region_code: region.to_string(),
            postal_code: postal.to_string(),
            country_code: "US".to_string(),
            residential: false,
        }
    }

    fn rate_request() -> RateRequest {
        let package = Package::new(3.0, None, 0).unwrap();
        RateRequest::new(address("TN", "38118"), address("TX", "75063"), vec![package])
    }

    #[tokio::test]
    async fn test_get_rates_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(RATE_PATH))
            .and(header("authorization", "Bearer test-token"))
            .and(header_exists("x-customer-transaction-id"))
            .and(body_partial_json(json!({
                "accountNumber": { "value": "740561073" },
                "requestedShipment": { "serviceType": "SMART_POST", "smartPostInfoDetail": { "hubId": "5751" } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transactionId": "abc",
                "output": {
                    "rateReplyDetails": [{
                        "serviceType": "SMART_POST",
                        "ratedShipmentDetails": [{ "rateType": "ACCOUNT", "totalNetCharge": 9.15, "currency": "USD" }]
                    }]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = rate_request().for_service("SMART_POST", Some("5751".to_string()));
        let quotes = gateway(&server).get_rates(&request).await.unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].amount_cents, 915);
        assert_eq!(quotes[0].hub_id.as_deref(), Some("5751"));
        assert_eq!(quotes[0].estimated_days, 7);
    }

    #[tokio::test]
    async fn test_get_rates_auth_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(RATE_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errors": [{ "code": "NOT.AUTHORIZED.ERROR", "message": "Access token expired" }]
            })))
            .mount(&server)
            .await;

        let err = gateway(&server).get_rates(&rate_request()).await.unwrap_err();
        assert!(matches!(err, CarrierError::AuthFailed(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_get_rates_invalid_address() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(RATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errors": [{ "code": "RECIPIENT.POSTALCODE.INVALID", "message": "Invalid postal code" }]
            })))
            .mount(&server)
            .await;

        let err = gateway(&server).get_rates(&rate_request()).await.unwrap_err();
        assert!(matches!(err, CarrierError::InvalidAddress(_)));
    }

    #[tokio::test]
    async fn test_get_rates_server_error_is_transient() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(RATE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&server)
            .await;

        let err = gateway(&server).get_rates(&rate_request()).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(RATE_PATH))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let err = gateway(&server).get_rates(&rate_request()).await.unwrap_err();
        assert_eq!(err, CarrierError::RateLimited { retry_after_secs: 7 });
    }

    #[tokio::test]
    async fn test_unknown_service_rejected_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = rate_request().for_service("TELEPORT", None);
        let err = gateway(&server).get_rates(&request).await.unwrap_err();
        assert!(matches!(err, CarrierError::UnsupportedService(code) if code == "TELEPORT"));
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let server = MockServer::start().await;
        let gateway = FedexGateway::new(CarrierCredentials::default(), server.uri(), 60, Duration::from_secs(5)).unwrap();

        let err = gateway.get_rates(&rate_request()).await.unwrap_err();
        assert!(matches!(err, CarrierError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn test_create_label_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(SHIP_PATH))
            .and(body_partial_json(json!({
                "requestedShipment": {
                    "serviceType": "FEDEX_GROUND",
                    "labelSpecification": { "imageType": "PDF", "labelStockType": "PAPER_4X6" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "output": {
                    "transactionShipments": [{
                        "masterTrackingNumber": "794644790138",
                        "pieceResponses": [{
                            "trackingNumber": "794644790138",
                            "packageDocuments": [{ "docType": "PDF", "encodedLabel": "JVBERi0xLjQK" }]
                        }]
                    }]
                }
            })))
            .mount(&server)
            .await;

        let request = LabelRequest {
            origin: address("TN", "38118"),
            destination: address("TX", "75063"),
            packages: vec![Package::new(3.0, None, 0).unwrap()],
            service_code: "FEDEX_GROUND".to_string(),
            hub_id: None,
        };

        let label = gateway(&server).create_label(&request).await.unwrap();
        assert_eq!(label.tracking_number, "794644790138");
        assert_eq!(label.service_code, "FEDEX_GROUND");
        assert!(matches!(label.artifact, LabelArtifact::Inline { ref format, .. } if format == "PDF"));
    }

    #[tokio::test]
    async fn test_ground_economy_label_carries_hub() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(SHIP_PATH))
            .and(body_partial_json(json!({
                "requestedShipment": {
                    "serviceType": "SMART_POST",
                    "smartPostInfoDetail": { "hubId": "5751", "indicia": "PARCEL_SELECT" }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "output": {
                    "transactionShipments": [{
                        "masterTrackingNumber": "61299998820821171811",
                        "pieceResponses": [{
                            "trackingNumber": "61299998820821171811",
                            "packageDocuments": [{ "docType": "PDF", "url": "https://labels.example/611.pdf" }]
                        }]
                    }]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = LabelRequest {
            origin: address("TN", "38118"),
            destination: address("TX", "75063"),
            packages: vec![Package::new(1.5, None, 0).unwrap()],
            service_code: "SMART_POST".to_string(),
            hub_id: Some("5751".to_string()),
        };

        let label = gateway(&server).create_label(&request).await.unwrap();
        assert_eq!(label.tracking_number, "61299998820821171811");
        assert_eq!(label.service_code, "SMART_POST");
    }

    #[tokio::test]
    async fn test_create_label_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(SHIP_PATH))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "errors": [{ "code": "SHIPMENT.PACKAGE.WEIGHT.EXCEEDED", "message": "Package too heavy" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = LabelRequest {
            origin: address("TN", "38118"),
            destination: address("TX", "75063"),
            packages: vec![Package::new(200.0, None, 0).unwrap()],
            service_code: "FEDEX_GROUND".to_string(),
            hub_id: None,
        };

        let err = gateway(&server).create_label(&request).await.unwrap_err();
        assert!(matches!(err, CarrierError::LabelRejected(_)));
    }

    #[tokio::test]
    async fn test_track() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TRACK_PATH))
            .and(body_partial_json(json!({ "includeDetailedScans": true })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "output": {
                    "completeTrackResults": [{
                        "trackingNumber": "794644790138",
                        "trackResults": [{
                            "scanEvents": [
                                { "date": "2024-03-02T08:00:00Z", "eventType": "OD", "eventDescription": "On FedEx vehicle for delivery" },
                                { "date": "2024-03-01T08:00:00Z", "eventType": "AR", "eventDescription": "Arrived at FedEx location" }
                            ]
                        }]
                    }]
                }
            })))
            .mount(&server)
            .await;

        let events = gateway(&server).track("794644790138").await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].status, TrackingStatus::InTransit);
        assert_eq!(events[1].status, TrackingStatus::OutForDelivery);
    }

    #[tokio::test]
    async fn test_track_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(TRACK_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "output": {
                    "completeTrackResults": [{
                        "trackingNumber": "123",
                        "trackResults": [{
                            "error": { "code": "TRACKING.TRACKINGNUMBER.NOTFOUND", "message": "Not found" }
                        }]
                    }]
                }
            })))
            .mount(&server)
            .await;

        let err = gateway(&server).track("123").await.unwrap_err();
        assert!(matches!(err, CarrierError::NotFound(_)));
    }
}
