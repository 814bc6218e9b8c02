//! Built-in container table
//!
//! Interior dimensions in inches, weights in pounds. Product tags are
//! keyword heuristics used for the "recommend by product type" shortcut.

use crate::domain::{BoxCategory, ShippingBox};

struct BoxRow {
    id: &'static str,
    name: &'static str,
    category: BoxCategory,
    dims: (f64, f64, f64),
    max_weight: f64,
    tare_weight: f64,
    flat_rate: bool,
    packaging_type: &'static str,
    tags: &'static [&'static str],
}

const STANDARD_BOXES: &[BoxRow] = &[
    BoxRow {
        id: "fedex_envelope",
        name: "FedEx Envelope",
        category: BoxCategory::Envelope,
        dims: (12.5, 9.5, 0.5),
        max_weight: 10.0,
        tare_weight: 0.1,
        flat_rate: true,
        packaging_type: "FEDEX_ENVELOPE",
        tags: &["documents", "business-cards", "flyers", "postcards"],
    },
    BoxRow {
        id: "fedex_reusable_envelope",
        name: "FedEx Reusable Envelope",
        category: BoxCategory::Envelope,
        dims: (15.5, 9.5, 0.75),
        max_weight: 10.0,
        tare_weight: 0.15,
        flat_rate: true,
        packaging_type: "FEDEX_ENVELOPE",
        tags: &["documents", "brochures", "flyers"],
    },
    BoxRow {
        id: "fedex_small_pak",
        name: "FedEx Small Pak",
        category: BoxCategory::Pak,
        dims: (12.75, 10.25, 1.5),
        max_weight: 20.0,
        tare_weight: 0.1,
        flat_rate: true,
        packaging_type: "FEDEX_PAK",
        tags: &["flyers", "brochures", "stickers", "apparel"],
    },
    BoxRow {
        id: "fedex_large_pak",
        name: "FedEx Large Pak",
        category: BoxCategory::Pak,
        dims: (15.5, 12.0, 2.0),
        max_weight: 20.0,
        tare_weight: 0.15,
        flat_rate: true,
        packaging_type: "FEDEX_PAK",
        tags: &["apparel", "booklets", "brochures"],
    },
    BoxRow {
        id: "fedex_small_box_s1",
        name: "FedEx Small Box (S1)",
        category: BoxCategory::Small,
        dims: (12.375, 10.875, 1.5),
        max_weight: 50.0,
        tare_weight: 0.4,
        flat_rate: true,
        packaging_type: "FEDEX_SMALL_BOX",
        tags: &["stickers", "postcards", "flyers"],
    },
    BoxRow {
        id: "fedex_small_box_s2",
        name: "FedEx Small Box (S2)",
        category: BoxCategory::Small,
        dims: (11.25, 8.75, 2.625),
        max_weight: 50.0,
        tare_weight: 0.4,
        flat_rate: true,
        packaging_type: "FEDEX_SMALL_BOX",
        tags: &["business-cards", "stickers", "booklets"],
    },
    BoxRow {
        id: "fedex_medium_box_m1",
        name: "FedEx Medium Box (M1)",
        category: BoxCategory::Medium,
        dims: (13.25, 11.5, 2.375),
        max_weight: 50.0,
        tare_weight: 0.6,
        flat_rate: true,
        packaging_type: "FEDEX_MEDIUM_BOX",
        tags: &["booklets", "brochures", "flyers"],
    },
    BoxRow {
        id: "fedex_medium_box_m2",
        name: "FedEx Medium Box (M2)",
        category: BoxCategory::Medium,
        dims: (11.25, 8.75, 4.375),
        max_weight: 50.0,
        tare_weight: 0.6,
        flat_rate: true,
        packaging_type: "FEDEX_MEDIUM_BOX",
        tags: &["business-cards", "stickers"],
    },
    BoxRow {
        id: "fedex_large_box_l1",
        name: "FedEx Large Box (L1)",
        category: BoxCategory::Large,
        dims: (17.5, 12.375, 3.0),
        max_weight: 50.0,
        tare_weight: 0.9,
        flat_rate: true,
        packaging_type: "FEDEX_LARGE_BOX",
        tags: &["booklets", "flyers", "catalogs"],
    },
    BoxRow {
        id: "fedex_large_box_l2",
        name: "FedEx Large Box (L2)",
        category: BoxCategory::Large,
        dims: (11.25, 8.75, 7.75),
        max_weight: 50.0,
        tare_weight: 0.9,
        flat_rate: true,
        packaging_type: "FEDEX_LARGE_BOX",
        tags: &["business-cards", "catalogs"],
    },
    BoxRow {
        id: "fedex_xl_box_x1",
        name: "FedEx Extra Large Box (X1)",
        category: BoxCategory::Xlarge,
        dims: (11.875, 11.0, 10.75),
        max_weight: 50.0,
        tare_weight: 1.2,
        flat_rate: true,
        packaging_type: "FEDEX_EXTRA_LARGE_BOX",
        tags: &["apparel", "banners", "catalogs"],
    },
    BoxRow {
        id: "fedex_xl_box_x2",
        name: "FedEx Extra Large Box (X2)",
        category: BoxCategory::Xlarge,
        dims: (15.75, 14.125, 6.0),
        max_weight: 50.0,
        tare_weight: 1.2,
        flat_rate: true,
        packaging_type: "FEDEX_EXTRA_LARGE_BOX",
        tags: &["apparel", "booklets", "signage"],
    },
    BoxRow {
        id: "fedex_tube",
        name: "FedEx Tube",
        category: BoxCategory::Tube,
        dims: (38.0, 6.0, 6.0),
        max_weight: 50.0,
        tare_weight: 1.0,
        flat_rate: true,
        packaging_type: "FEDEX_TUBE",
        tags: &["posters", "banners", "blueprints"],
    },
    BoxRow {
        id: "fedex_10kg_box",
        name: "FedEx 10kg Box",
        category: BoxCategory::International,
        dims: (15.81, 12.94, 10.19),
        max_weight: 22.0,
        tare_weight: 1.9,
        flat_rate: false,
        packaging_type: "FEDEX_10KG_BOX",
        tags: &["international", "catalogs"],
    },
    BoxRow {
        id: "fedex_25kg_box",
        name: "FedEx 25kg Box",
        category: BoxCategory::International,
        dims: (21.56, 16.56, 13.19),
        max_weight: 55.0,
        tare_weight: 3.5,
        flat_rate: false,
        packaging_type: "FEDEX_25KG_BOX",
        tags: &["international", "signage"],
    },
    BoxRow {
        id: "custom_carton_18",
        name: "18in Corrugated Carton",
        category: BoxCategory::Custom,
        dims: (18.0, 18.0, 18.0),
        max_weight: 150.0,
        tare_weight: 2.0,
        flat_rate: false,
        packaging_type: "YOUR_PACKAGING",
        tags: &["banners", "signage", "apparel"],
    },
    BoxRow {
        id: "custom_poster_tube_48",
        name: "48in Poster Tube",
        category: BoxCategory::Tube,
        dims: (48.0, 4.0, 4.0),
        max_weight: 20.0,
        tare_weight: 0.8,
        flat_rate: false,
        packaging_type: "YOUR_PACKAGING",
        tags: &["posters", "banners"],
    },
];

/// Materialize the built-in table
pub fn standard_boxes() -> Vec<ShippingBox> {
    STANDARD_BOXES
        .iter()
        .map(|row| ShippingBox {
            id: row.id.to_string(),
            name: row.name.to_string(),
            category: row.category,
            length: row.dims.0,
            width: row.dims.1,
            height: row.dims.2,
            max_weight: row.max_weight,
            tare_weight: row.tare_weight,
            flat_rate_eligible: row.flat_rate,
            packaging_type: row.packaging_type.to_string(),
            product_tags: row.tags.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}
