//! Built-in hub coverage table
//!
//! Ground Economy hubs and the destination states each one serves. The
//! coverage lists are a static approximation; states missing from every
//! list route through the fallback hub.

use super::Hub;

/// Fallback hub id (Memphis, TN)
pub const CENTRAL_HUB_ID: &str = "5379";

const STANDARD_HUBS: &[(&str, &str, &str, &str, &[&str])] = &[
    ("5015", "Northborough Hub", "Northborough", "MA", &["MA", "NH", "ME", "VT", "RI"]),
    ("5110", "Newburgh Hub", "Newburgh", "NY", &["NY", "CT"]),
    ("5087", "Edison Hub", "Edison", "NJ", &["NJ"]),
    ("5185", "Allentown Hub", "Allentown", "PA", &["PA", "DE"]),
    ("5254", "Martinsburg Hub", "Martinsburg", "WV", &["WV", "MD", "DC", "VA"]),
    ("5281", "Charlotte Hub", "Charlotte", "NC", &["NC", "SC"]),
    ("5303", "Atlanta Hub", "Atlanta", "GA", &["GA", "AL"]),
    ("5327", "Orlando Hub", "Orlando", "FL", &["FL"]),
    ("5379", "Memphis Hub", "Memphis", "TN", &["TN", "MS", "AR", "KY"]),
    ("5431", "Grove City Hub", "Grove City", "OH", &["OH"]),
    ("5465", "Indianapolis Hub", "Indianapolis", "IN", &["IN"]),
    ("5481", "Detroit Hub", "Detroit", "MI", &["MI"]),
    ("5531", "New Berlin Hub", "New Berlin", "WI", &["WI"]),
    ("5552", "Minneapolis Hub", "Minneapolis", "MN", &["MN", "ND", "SD"]),
    ("5602", "Chicago Hub", "Chicago", "IL", &["IL", "IA"]),
    ("5631", "St. Louis Hub", "St. Louis", "MO", &["MO"]),
    ("5648", "Kansas City Hub", "Kansas City", "KS", &["KS", "NE"]),
    ("5751", "Dallas Hub", "Dallas", "TX", &["TX", "OK", "LA"]),
    ("5802", "Denver Hub", "Denver", "CO", &["CO", "WY", "NM"]),
    ("5843", "Salt Lake City Hub", "Salt Lake City", "UT", &["UT", "ID", "MT"]),
    ("5854", "Phoenix Hub", "Phoenix", "AZ", &["AZ", "NV"]),
    ("5902", "Los Angeles Hub", "Los Angeles", "CA", &["CA"]),
    ("5983", "Seattle Hub", "Seattle", "WA", &["WA", "OR"]),
];

pub fn standard_hubs() -> Vec<Hub> {
    STANDARD_HUBS
        .iter()
        .map(|(id, name, city, region, served)| Hub {
            id: id.to_string(),
            name: name.to_string(),
            city: city.to_string(),
            region: region.to_string(),
            served_regions: served.iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}
