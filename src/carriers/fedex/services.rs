//! FedEx service levels offered for shopping

use crate::domain::ServiceLevel;

pub const CARRIER_CODE: &str = "fedex";

/// Ground Economy: delivered to a regional hub, last mile by the postal service
pub const GROUND_ECONOMY: &str = "SMART_POST";

pub struct FedexService {
    pub code: &'static str,
    pub name: &'static str,
    pub default_transit_days: u32,
    pub guaranteed: bool,
    pub hub_based: bool,
}

pub const SERVICES: &[FedexService] = &[
    FedexService { code: "PRIORITY_OVERNIGHT", name: "FedEx Priority Overnight", default_transit_days: 1, guaranteed: true, hub_based: false },
    FedexService { code: "STANDARD_OVERNIGHT", name: "FedEx Standard Overnight", default_transit_days: 1, guaranteed: true, hub_based: false },
    FedexService { code: "FEDEX_2_DAY", name: "FedEx 2Day", default_transit_days: 2, guaranteed: true, hub_based: false },
    FedexService { code: "FEDEX_EXPRESS_SAVER", name: "FedEx Express Saver", default_transit_days: 3, guaranteed: true, hub_based: false },
    FedexService { code: "FEDEX_GROUND", name: "FedEx Ground", default_transit_days: 5, guaranteed: false, hub_based: false },
    FedexService { code: GROUND_ECONOMY, name: "FedEx Ground Economy", default_transit_days: 7, guaranteed: false, hub_based: true },
];

pub fn find(code: &str) -> Option<&'static FedexService> {
    SERVICES.iter().find(|s| s.code.eq_ignore_ascii_case(code))
}

pub fn service_levels() -> Vec<ServiceLevel> {
    SERVICES
        .iter()
        .map(|s| {
            let level = ServiceLevel::new(CARRIER_CODE, s.code, s.name);
            if s.hub_based {
                level.hub_based()
            } else {
                level
            }
        })
        .collect()
}
