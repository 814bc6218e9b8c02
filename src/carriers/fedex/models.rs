//! FedEx REST API wire models
//!
//! Request bodies are serialized from these types and responses are
//! deserialized into them. They are mapped to and from the normalized
//! domain types in the mapper module.

use serde::{Deserialize, Serialize};

// ============================================================================
// Shared
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexAccountNumber {
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexAddress {
    pub street_lines: Vec<String>,
    pub city: String,
    pub state_or_province_code: String,
    pub postal_code: String,
    pub country_code: String,
    pub residential: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FedexParty {
    pub address: FedexAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FedexWeight {
    pub units: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FedexDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub units: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FedexMoney {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexPackageLineItem {
    pub weight: FedexWeight,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<FedexDimensions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_value: Option<FedexMoney>,
}

/// Ground Economy hub routing detail
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexSmartPostInfoDetail {
    pub hub_id: String,
    pub indicia: String,
}

/// Error envelope returned on non-2xx responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexErrorResponse {
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub errors: Vec<FedexApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FedexApiError {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

/// Success envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexResponse<T> {
    pub transaction_id: Option<String>,
    pub output: T,
}

// ============================================================================
// Rates
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexRateRequest {
    pub account_number: FedexAccountNumber,
    pub rate_request_control_parameters: FedexRateControl,
    pub requested_shipment: FedexRequestedShipment,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexRateControl {
    pub return_transit_times: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexRequestedShipment {
    pub shipper: FedexParty,
    pub recipient: FedexParty,
    pub pickup_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    pub packaging_type: String,
    pub rate_request_type: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smart_post_info_detail: Option<FedexSmartPostInfoDetail>,
    pub requested_package_line_items: Vec<FedexPackageLineItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexRateOutput {
    #[serde(default)]
    pub rate_reply_details: Vec<FedexRateReplyDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexRateReplyDetail {
    pub service_type: String,
    pub service_name: Option<String>,
    #[serde(default)]
    pub rated_shipment_details: Vec<FedexRatedShipmentDetail>,
    pub commit: Option<FedexCommit>,
    pub operational_detail: Option<FedexOperationalDetail>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexRatedShipmentDetail {
    pub rate_type: Option<String>,
    pub total_net_charge: f64,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexCommit {
    pub transit_days: Option<FedexTransitDays>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTransitDays {
    pub minimum_transit_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexOperationalDetail {
    pub transit_time: Option<String>,
}

// ============================================================================
// Shipments (labels)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexShipRequest {
    pub label_response_options: String,
    pub account_number: FedexAccountNumber,
    pub requested_shipment: FedexShipmentDetail,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexShipmentDetail {
    pub shipper: FedexParty,
    pub recipients: Vec<FedexParty>,
    pub service_type: String,
    pub packaging_type: String,
    pub pickup_type: String,
    pub shipping_charges_payment: FedexPayment,
    pub label_specification: FedexLabelSpecification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smart_post_info_detail: Option<FedexSmartPostInfoDetail>,
    pub requested_package_line_items: Vec<FedexPackageLineItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexPayment {
    pub payment_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexLabelSpecification {
    pub image_type: String,
    pub label_stock_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexShipOutput {
    #[serde(default)]
    pub transaction_shipments: Vec<FedexTransactionShipment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTransactionShipment {
    pub master_tracking_number: Option<String>,
    pub service_type: Option<String>,
    #[serde(default)]
    pub piece_responses: Vec<FedexPieceResponse>,
    pub completed_shipment_detail: Option<FedexCompletedShipmentDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexPieceResponse {
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub package_documents: Vec<FedexPackageDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexPackageDocument {
    pub url: Option<String>,
    pub doc_type: Option<String>,
    pub encoded_label: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexCompletedShipmentDetail {
    pub shipment_rating: Option<FedexShipmentRating>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexShipmentRating {
    #[serde(default)]
    pub shipment_rate_details: Vec<FedexRatedShipmentDetail>,
}

// ============================================================================
// Tracking
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTrackRequest {
    pub include_detailed_scans: bool,
    pub tracking_info: Vec<FedexTrackingInfo>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTrackingInfo {
    pub tracking_number_info: FedexTrackingNumberInfo,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTrackingNumberInfo {
    pub tracking_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTrackOutput {
    #[serde(default)]
    pub complete_track_results: Vec<FedexCompleteTrackResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexCompleteTrackResult {
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub track_results: Vec<FedexTrackResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexTrackResult {
    pub error: Option<FedexApiError>,
    #[serde(default)]
    pub scan_events: Vec<FedexScanEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexScanEvent {
    pub date: String,
    pub event_type: Option<String>,
    pub event_description: Option<String>,
    pub scan_location: Option<FedexScanLocation>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FedexScanLocation {
    pub city: Option<String>,
    pub state_or_province_code: Option<String>,
    pub country_code: Option<String>,
}
