//! FedEx to normalized model mapper
//!
//! Builds FedEx request bodies from normalized requests and maps FedEx
//! responses (including error envelopes) back into domain types.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::carriers::traits::{CarrierError, CarrierResult, LabelRequest, RateRequest};
use crate::domain::{
    Address, Label, LabelArtifact, Package, RateQuote, TrackingEvent, TrackingStatus, CUSTOM_PACKAGING,
};
use super::models::*;
use super::services::{self, CARRIER_CODE};

/// Which FedEx endpoint produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FedexOperation {
    Rate,
    Ship,
    Track,
}

/// Mapper for FedEx requests and responses
pub struct FedexMapper;

impl FedexMapper {
    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    pub fn map_address(address: &Address) -> FedexAddress {
        FedexAddress {
            street_lines: address.street_lines.clone(),
            city: address.city.clone(),
            state_or_province_code: address.normalized_region(),
            postal_code: address.postal_code.clone(),
            country_code: address.country_code.to_uppercase(),
            residential: address.residential,
        }
    }

    pub fn map_package(package: &Package) -> FedexPackageLineItem {
        FedexPackageLineItem {
            weight: FedexWeight {
                units: "LB".to_string(),
                value: ceil_to(package.weight(), 1),
            },
            dimensions: package.dimensions().map(|d| FedexDimensions {
                length: d.length.ceil(),
                width: d.width.ceil(),
                height: d.height.ceil(),
                units: "IN".to_string(),
            }),
            declared_value: (package.declared_value_cents() > 0).then(|| FedexMoney {
                amount: package.declared_value_cents() as f64 / 100.0,
                currency: "USD".to_string(),
            }),
        }
    }

    /// One packaging type per shipment; mixed parcels ship as customer packaging
    pub fn shipment_packaging_type(packages: &[Package]) -> String {
        match packages.split_first() {
            Some((first, rest)) if rest.iter().all(|p| p.packaging_type() == first.packaging_type()) => {
                first.packaging_type().to_string()
            }
            _ => CUSTOM_PACKAGING.to_string(),
        }
    }

    fn smart_post_detail(service_code: Option<&str>, hub_id: Option<&String>) -> Option<FedexSmartPostInfoDetail> {
        let hub_based = service_code.and_then(services::find).map(|s| s.hub_based).unwrap_or(false);
        match (hub_based, hub_id) {
            (true, Some(hub)) => Some(FedexSmartPostInfoDetail {
                hub_id: hub.clone(),
                indicia: "PARCEL_SELECT".to_string(),
            }),
            _ => None,
        }
    }

    pub fn build_rate_request(account_number: &str, request: &RateRequest) -> FedexRateRequest {
        FedexRateRequest {
            account_number: FedexAccountNumber {
                value: account_number.to_string(),
            },
            rate_request_control_parameters: FedexRateControl {
                return_transit_times: true,
            },
            requested_shipment: FedexRequestedShipment {
                shipper: FedexParty {
                    address: Self::map_address(&request.origin),
                },
                recipient: FedexParty {
                    address: Self::map_address(&request.destination),
                },
                pickup_type: "DROPOFF_AT_FEDEX_LOCATION".to_string(),
                service_type: request.service_code.clone(),
                packaging_type: Self::shipment_packaging_type(&request.packages),
                rate_request_type: vec!["ACCOUNT".to_string(), "LIST".to_string()],
                smart_post_info_detail: Self::smart_post_detail(
                    request.service_code.as_deref(),
                    request.hub_id.as_ref(),
                ),
                requested_package_line_items: request.packages.iter().map(Self::map_package).collect(),
            },
        }
    }

    pub fn build_ship_request(account_number: &str, request: &LabelRequest) -> FedexShipRequest {
        FedexShipRequest {
            label_response_options: "URL_ONLY".to_string(),
            account_number: FedexAccountNumber {
                value: account_number.to_string(),
            },
            requested_shipment: FedexShipmentDetail {
                shipper: FedexParty {
                    address: Self::map_address(&request.origin),
                },
                recipients: vec![FedexParty {
                    address: Self::map_address(&request.destination),
                }],
                service_type: request.service_code.clone(),
                packaging_type: Self::shipment_packaging_type(&request.packages),
                pickup_type: "DROPOFF_AT_FEDEX_LOCATION".to_string(),
                shipping_charges_payment: FedexPayment {
                    payment_type: "SENDER".to_string(),
                },
                label_specification: FedexLabelSpecification {
                    image_type: "PDF".to_string(),
                    label_stock_type: "PAPER_4X6".to_string(),
                },
                smart_post_info_detail: Self::smart_post_detail(
                    Some(request.service_code.as_str()),
                    request.hub_id.as_ref(),
                ),
                requested_package_line_items: request.packages.iter().map(Self::map_package).collect(),
            },
        }
    }

    pub fn build_track_request(tracking_number: &str) -> FedexTrackRequest {
        FedexTrackRequest {
            include_detailed_scans: true,
            tracking_info: vec![FedexTrackingInfo {
                tracking_number_info: FedexTrackingNumberInfo {
                    tracking_number: tracking_number.to_string(),
                },
            }],
        }
    }

    // ------------------------------------------------------------------
    // Responses
    // ------------------------------------------------------------------

    /// Map one rate reply; `None` when it carries no usable charge
    pub fn map_rate_reply(detail: FedexRateReplyDetail, hub_id: Option<&str>) -> Option<RateQuote> {
        let rated = detail
            .rated_shipment_details
            .iter()
            .find(|r| r.rate_type.as_deref() == Some("ACCOUNT"))
            .or_else(|| detail.rated_shipment_details.first())?;

        let known = services::find(&detail.service_type);

        let transit = detail
            .commit
            .as_ref()
            .and_then(|c| c.transit_days.as_ref())
            .and_then(|t| t.minimum_transit_time.as_deref())
            .or_else(|| {
                detail
                    .operational_detail
                    .as_ref()
                    .and_then(|o| o.transit_time.as_deref())
            })
            .and_then(parse_transit_days);

        let estimated_days = transit
            .or_else(|| known.map(|s| s.default_transit_days))
            .unwrap_or(0);

        let hub_based = known.map(|s| s.hub_based).unwrap_or(false);

        Some(RateQuote {
            carrier: CARRIER_CODE.to_string(),
            service_code: detail.service_type.clone(),
            service_name: detail
                .service_name
                .clone()
                .or_else(|| known.map(|s| s.name.to_string()))
                .unwrap_or_else(|| detail.service_type.clone()),
            amount_cents: dollars_to_cents(rated.total_net_charge),
            currency: rated.currency.clone().unwrap_or_else(|| "USD".to_string()),
            estimated_days,
            guaranteed: known.map(|s| s.guaranteed).unwrap_or(false),
            hub_id: if hub_based { hub_id.map(str::to_string) } else { None },
        })
    }

    pub fn map_rate_output(output: FedexRateOutput, hub_id: Option<&str>) -> Vec<RateQuote> {
        output
            .rate_reply_details
            .into_iter()
            .filter_map(|d| Self::map_rate_reply(d, hub_id))
            .collect()
    }

    pub fn map_ship_output(output: FedexShipOutput, service_code: &str) -> CarrierResult<Label> {
        let shipment = output
            .transaction_shipments
            .into_iter()
            .next()
            .ok_or_else(|| CarrierError::Parse("Ship response contained no shipments".to_string()))?;

        let piece = shipment.piece_responses.first();

        let tracking_number = shipment
            .master_tracking_number
            .clone()
            .or_else(|| piece.and_then(|p| p.tracking_number.clone()))
            .ok_or_else(|| CarrierError::Parse("Ship response contained no tracking number".to_string()))?;

        let document = piece.and_then(|p| p.package_documents.first());
        let artifact = match document {
            Some(FedexPackageDocument { url: Some(url), .. }) => LabelArtifact::Url { url: url.clone() },
            Some(FedexPackageDocument {
                encoded_label: Some(data),
                doc_type,
                ..
            }) => LabelArtifact::Inline {
                format: doc_type.clone().unwrap_or_else(|| "PDF".to_string()),
                data: data.clone(),
            },
            _ => return Err(CarrierError::Parse("Ship response contained no label document".to_string())),
        };

        let rate = shipment
            .completed_shipment_detail
            .as_ref()
            .and_then(|d| d.shipment_rating.as_ref())
            .and_then(|r| r.shipment_rate_details.first());

        Ok(Label {
            tracking_number,
            carrier: CARRIER_CODE.to_string(),
            service_code: shipment.service_type.clone().unwrap_or_else(|| service_code.to_string()),
            artifact,
            cost_cents: rate.map(|r| dollars_to_cents(r.total_net_charge)).unwrap_or(0),
            currency: rate
                .and_then(|r| r.currency.clone())
                .unwrap_or_else(|| "USD".to_string()),
        })
    }

    /// Map scan events, oldest first
    pub fn map_track_output(output: FedexTrackOutput, tracking_number: &str) -> CarrierResult<Vec<TrackingEvent>> {
        let result = output
            .complete_track_results
            .into_iter()
            .flat_map(|r| r.track_results)
            .next()
            .ok_or_else(|| CarrierError::NotFound(tracking_number.to_string()))?;

        if let Some(error) = result.error {
            return Err(if error.code.to_uppercase().contains("NOTFOUND") {
                CarrierError::NotFound(tracking_number.to_string())
            } else {
                CarrierError::Rejected(format!("{}: {}", error.code, error.message))
            });
        }

        let mut events: Vec<TrackingEvent> = result
            .scan_events
            .into_iter()
            .filter_map(|scan| {
                let timestamp = match DateTime::parse_from_rfc3339(&scan.date) {
                    Ok(ts) => ts.with_timezone(&Utc),
                    Err(e) => {
                        warn!(date = %scan.date, error = %e, "Skipping scan event with unparsable date");
                        return None;
                    }
                };
                let description = scan.event_description.clone().unwrap_or_default();
                let status = scan
                    .event_type
                    .as_deref()
                    .map(TrackingStatus::from_carrier)
                    .filter(|s| !s.is_other())
                    .unwrap_or_else(|| TrackingStatus::from_carrier(&description));

                Some(TrackingEvent {
                    timestamp,
                    location: scan.scan_location.as_ref().map(format_location).unwrap_or_default(),
                    status,
                    description,
                })
            })
            .collect();

        events.sort_by_key(|e| e.timestamp);
        Ok(events)
    }

    /// Classify a non-success response into the carrier error taxonomy
    pub fn classify_error(status: u16, body: &str, operation: FedexOperation) -> CarrierError {
        let errors = serde_json::from_str::<FedexErrorResponse>(body)
            .map(|r| r.errors)
            .unwrap_or_default();
        let message = if errors.is_empty() {
            format!("HTTP {}: {}", status, body.chars().take(300).collect::<String>())
        } else {
            errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect::<Vec<_>>()
                .join("; ")
        };

        let has_code = |needles: &[&str]| {
            errors.iter().any(|e| {
                let code = e.code.to_uppercase();
                needles.iter().any(|n| code.contains(n))
            })
        };

        // Only a tracking lookup can miss; a 404 elsewhere is a rejected request
        let tracking_miss = matches!(operation, FedexOperation::Track)
            && (status == 404 || has_code(&["NOTFOUND"]));

        match status {
            401 | 403 => CarrierError::AuthFailed(message),
            500..=599 => CarrierError::Transient(message),
            _ if tracking_miss => CarrierError::NotFound(message),
            _ if has_code(&["ADDRESS", "POSTAL", "STATEORPROVINCE", "COUNTRY"]) => {
                CarrierError::InvalidAddress(message)
            }
            _ if has_code(&["SERVICE.UNAVAILABLE", "SYSTEM.UNAVAILABLE"]) => CarrierError::Transient(message),
            _ => match operation {
                FedexOperation::Ship => CarrierError::LabelRejected(message),
                FedexOperation::Rate | FedexOperation::Track => CarrierError::Rejected(message),
            },
        }
    }
}

/// Parse FedEx transit words ("TWO_DAYS") into a day count
pub fn parse_transit_days(value: &str) -> Option<u32> {
    const WORDS: &[&str] = &[
        "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN",
        "ELEVEN", "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN", "SIXTEEN", "SEVENTEEN",
        "EIGHTEEN", "NINETEEN", "TWENTY",
    ];
    let upper = value.trim().to_uppercase();
    let head = upper.split('_').next()?;

    if let Ok(n) = head.parse::<u32>() {
        return Some(n);
    }
    WORDS.iter().position(|w| *w == head).map(|i| i as u32 + 1)
}

fn dollars_to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn ceil_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).ceil() / factor
}

fn format_location(location: &FedexScanLocation) -> String {
    [
        location.city.as_deref(),
        location.state_or_province_code.as_deref(),
        location.country_code.as_deref(),
    ]
    .iter()
    .flatten()
    .filter(|s| !s.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dimensions;
    use serde_json::json;

    fn address(region: &str) -> Address {
        Address {
            street_lines: vec!["1 Main St".to_string()],
            city: "Austin".to_string(),
            region_code: region.to_string(),
            postal_code: "78701".to_string(),
            country_code: "us".to_string(),
            residential: true,
        }
    }

    #[test]
    fn test_parse_transit_days() {
        assert_eq!(parse_transit_days("ONE_DAY"), Some(1));
        assert_eq!(parse_transit_days("THREE_DAYS"), Some(3));
        assert_eq!(parse_transit_days("twenty_days"), Some(20));
        assert_eq!(parse_transit_days("UNKNOWN"), None);
    }

    #[test]
    fn test_build_rate_request_with_hub() {
        let package = Package::new(3.42, Some(Dimensions::new(11.25, 8.75, 2.625)), 2500)
            .unwrap()
            .with_packaging_type("FEDEX_SMALL_BOX");
        let request = RateRequest::new(address("tx"), address("CA"), vec![package])
            .for_service("SMART_POST", Some("5902".to_string()));

        let body = serde_json::to_value(FedexMapper::build_rate_request("123456789", &request)).unwrap();

        assert_eq!(body["accountNumber"]["value"], "123456789");
        let shipment = &body["requestedShipment"];
        assert_eq!(shipment["serviceType"], "SMART_POST");
        assert_eq!(shipment["packagingType"], "FEDEX_SMALL_BOX");
        assert_eq!(shipment["shipper"]["address"]["stateOrProvinceCode"], "TX");
        assert_eq!(shipment["recipient"]["address"]["countryCode"], "US");
        assert_eq!(shipment["smartPostInfoDetail"]["hubId"], "5902");
        assert_eq!(shipment["requestedPackageLineItems"][0]["weight"]["value"], 3.5);
        assert_eq!(shipment["requestedPackageLineItems"][0]["dimensions"]["length"], 12.0);
        assert_eq!(shipment["requestedPackageLineItems"][0]["declaredValue"]["amount"], 25.0);
    }

    #[test]
    fn test_hub_omitted_for_non_hub_service() {
        let package = Package::new(1.0, None, 0).unwrap();
        let request = RateRequest::new(address("TX"), address("CA"), vec![package])
            .for_service("FEDEX_GROUND", Some("5902".to_string()));

        let body = serde_json::to_value(FedexMapper::build_rate_request("1", &request)).unwrap();
        assert!(body["requestedShipment"].get("smartPostInfoDetail").is_none());
        assert!(body["requestedShipment"]["requestedPackageLineItems"][0].get("dimensions").is_none());
    }

    #[test]
    fn test_mixed_packaging_falls_back_to_custom() {
        let a = Package::new(1.0, None, 0).unwrap().with_packaging_type("FEDEX_PAK");
        let b = Package::new(1.0, None, 0).unwrap().with_packaging_type("FEDEX_TUBE");
        assert_eq!(FedexMapper::shipment_packaging_type(&[a.clone()]), "FEDEX_PAK");
        assert_eq!(FedexMapper::shipment_packaging_type(&[a, b]), CUSTOM_PACKAGING);
        assert_eq!(FedexMapper::shipment_packaging_type(&[]), CUSTOM_PACKAGING);
    }

    #[test]
    fn test_map_rate_output() {
        let output: FedexRateOutput = serde_json::from_value(json!({
            "rateReplyDetails": [
                {
                    "serviceType": "FEDEX_2_DAY",
                    "serviceName": "FedEx 2Day®",
                    "ratedShipmentDetails": [
                        { "rateType": "LIST", "totalNetCharge": 31.10, "currency": "USD" },
                        { "rateType": "ACCOUNT", "totalNetCharge": 24.57, "currency": "USD" }
                    ],
                    "commit": { "transitDays": { "minimumTransitTime": "TWO_DAYS" } }
                },
                {
                    "serviceType": "SMART_POST",
                    "ratedShipmentDetails": [ { "totalNetCharge": 8.05 } ],
                    "operationalDetail": { "transitTime": "SIX_DAYS" }
                },
                {
                    "serviceType": "FEDEX_GROUND",
                    "ratedShipmentDetails": []
                }
            ]
        }))
        .unwrap();

        let quotes = FedexMapper::map_rate_output(output, Some("5902"));
        assert_eq!(quotes.len(), 2);

        let two_day = &quotes[0];
        assert_eq!(two_day.amount_cents, 2457);
        assert_eq!(two_day.estimated_days, 2);
        assert!(two_day.guaranteed);
        assert_eq!(two_day.hub_id, None);

        let economy = &quotes[1];
        assert_eq!(economy.service_name, "FedEx Ground Economy");
        assert_eq!(economy.amount_cents, 805);
        assert_eq!(economy.currency, "USD");
        assert_eq!(economy.estimated_days, 6);
        assert!(!economy.guaranteed);
        assert_eq!(economy.hub_id.as_deref(), Some("5902"));
    }

    #[test]
    fn test_map_ship_output() {
        let output: FedexShipOutput = serde_json::from_value(json!({
            "transactionShipments": [{
                "masterTrackingNumber": "794644790138",
                "serviceType": "FEDEX_GROUND",
                "pieceResponses": [{
                    "trackingNumber": "794644790138",
                    "packageDocuments": [{ "url": "https://wwwtest.fedex.com/document/label.pdf", "docType": "PDF" }]
                }],
                "completedShipmentDetail": {
                    "shipmentRating": { "shipmentRateDetails": [{ "totalNetCharge": 12.4, "currency": "USD" }] }
                }
            }]
        }))
        .unwrap();

        let label = FedexMapper::map_ship_output(output, "FEDEX_GROUND").unwrap();
        assert_eq!(label.tracking_number, "794644790138");
        assert_eq!(label.cost_cents, 1240);
        assert!(matches!(label.artifact, LabelArtifact::Url { .. }));
    }

    #[test]
    fn test_map_ship_output_without_documents() {
        let output: FedexShipOutput = serde_json::from_value(json!({
            "transactionShipments": [{ "masterTrackingNumber": "1" }]
        }))
        .unwrap();
        assert!(matches!(
            FedexMapper::map_ship_output(output, "FEDEX_GROUND"),
            Err(CarrierError::Parse(_))
        ));
    }

    #[test]
    fn test_map_track_output_orders_events() {
        let output: FedexTrackOutput = serde_json::from_value(json!({
            "completeTrackResults": [{
                "trackingNumber": "794644790138",
                "trackResults": [{
                    "scanEvents": [
                        {
                            "date": "2024-03-02T09:15:00-06:00",
                            "eventType": "DL",
                            "eventDescription": "Delivered",
                            "scanLocation": { "city": "AUSTIN", "stateOrProvinceCode": "TX", "countryCode": "US" }
                        },
                        {
                            "date": "2024-03-01T18:00:00-06:00",
                            "eventType": "PU",
                            "eventDescription": "Picked up",
                            "scanLocation": { "city": "MEMPHIS", "stateOrProvinceCode": "TN" }
                        },
                        { "date": "not a date", "eventType": "IT" }
                    ]
                }]
            }]
        }))
        .unwrap();

        let events = FedexMapper::map_track_output(output, "794644790138").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].status, TrackingStatus::PickedUp);
        assert_eq!(events[0].location, "MEMPHIS, TN");
        assert_eq!(events[1].status, TrackingStatus::Delivered);
        assert_eq!(events[1].location, "AUSTIN, TX, US");
    }

    #[test]
    fn test_map_track_output_not_found() {
        let output: FedexTrackOutput = serde_json::from_value(json!({
            "completeTrackResults": [{
                "trackResults": [{
                    "error": { "code": "TRACKING.TRACKINGNUMBER.NOTFOUND", "message": "Tracking number cannot be found." }
                }]
            }]
        }))
        .unwrap();

        assert!(matches!(
            FedexMapper::map_track_output(output, "000"),
            Err(CarrierError::NotFound(tn)) if tn == "000"
        ));
    }

    #[test]
    fn test_classify_errors() {
        let address_body = json!({
            "transactionId": "t-1",
            "errors": [{ "code": "RECIPIENT.POSTALCODE.INVALID", "message": "Invalid postal code" }]
        })
        .to_string();
        let generic_body = json!({
            "errors": [{ "code": "PACKAGE.WEIGHT.EXCEEDED", "message": "Too heavy" }]
        })
        .to_string();

        assert!(matches!(
            FedexMapper::classify_error(401, "", FedexOperation::Rate),
            CarrierError::AuthFailed(_)
        ));
        assert!(matches!(
            FedexMapper::classify_error(503, "upstream down", FedexOperation::Rate),
            CarrierError::Transient(_)
        ));
        assert!(matches!(
            FedexMapper::classify_error(400, &address_body, FedexOperation::Ship),
            CarrierError::InvalidAddress(_)
        ));
        assert!(matches!(
            FedexMapper::classify_error(422, &generic_body, FedexOperation::Ship),
            CarrierError::LabelRejected(msg) if msg.contains("PACKAGE.WEIGHT.EXCEEDED")
        ));
        assert!(matches!(
            FedexMapper::classify_error(400, &generic_body, FedexOperation::Rate),
            CarrierError::Rejected(_)
        ));
    }

    #[test]
    fn test_ceil_to_never_rounds_down() {
        assert_eq!(ceil_to(2.01, 1), 2.1);
        assert_eq!(ceil_to(2.04, 1), 2.1);
        assert_eq!(ceil_to(3.0, 1), 3.0);
        assert_eq!(ceil_to(7.2, 0), 8.0);
    }

    #[test]
    fn test_not_found_only_for_tracking() {
        let missing = json!({
            "errors": [{ "code": "TRACKING.TRACKINGNUMBER.NOTFOUND", "message": "No record" }]
        })
        .to_string();

        assert!(matches!(
            FedexMapper::classify_error(404, "", FedexOperation::Track),
            CarrierError::NotFound(_)
        ));
        assert!(matches!(
            FedexMapper::classify_error(400, &missing, FedexOperation::Track),
            CarrierError::NotFound(_)
        ));
        assert!(matches!(
            FedexMapper::classify_error(404, "", FedexOperation::Ship),
            CarrierError::LabelRejected(_)
        ));
        assert!(matches!(
            FedexMapper::classify_error(404, "", FedexOperation::Rate),
            CarrierError::Rejected(_)
        ));
    }
}
