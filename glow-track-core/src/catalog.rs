//! Product catalog for autocomplete.
//!
//! The manager and render surface treat the catalog as an opaque
//! collaborator: a query goes in, a finite capped list of product names
//! comes out. The built-in catalog is a static list.

/// A searchable source of product names.
pub trait ProductCatalog {
    /// Case-insensitive substring search, capped at `limit` results.
    /// A blank query matches nothing.
    fn search(&self, query: &str, limit: usize) -> Vec<String>;
}

/// The built-in catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog;

impl ProductCatalog for StaticCatalog {
    fn search(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        PRODUCT_DATABASE
            .iter()
            .filter(|name| name.to_lowercase().contains(&query))
            .take(limit)
            .map(|name| name.to_string())
            .collect()
    }
}

const PRODUCT_DATABASE: &[&str] = &[
    "Tretinoin",
    "ZIIP Golden Gel",
    "Medicube 10 Azelaic Acid Niacinamide Foam Cleanser",
    "Medicube PDRN Jelly to Foam Cleanser",
    "Snow Aqua 0 Ginseng Deep Cleansing Oil",
    "Medicube PDRN Overnight Wrapping Mask with Jelly Brush",
    "Medicube Zero Pore Blackhead Mud Facial Mask",
    "Embryolisse 3-in-1 Secret Paste",
    "Cica Daily Soothing Beauty Mask",
    "Medicube - Zero Pore Pad 2.0",
    "Medicube Exosome Cica Calming Pad",
    "Thayers Face Care Hydrating Milky Cleanser with Snow Mushroom",
    "Celimax The Vita A Retinal Shot Tightening Booster",
    "The Ordinary Volufiline 92% + Pal-Isoleucine 1% Plumping Serum",
    "Mylan Tretinoin 0.1% Cream",
    "Numbuzin No.9 NAD+ Retinol Volumetox Eye Cream",
    "Numbuzin No. 9 NAD+ Bio Super Defense Glow Sunscreen",
    "Dr. Althea 147 Barrier Cream",
    "Dr. Althea 345 Relief Cream",
    "Dr. Althea Pure Grinding Cleansing Balm",
    "Medicube PDRN Pink Niacinamide Milky Toner",
    "SVA Organics Rose Water",
    "Medicube Deep Vita C 70 Pads",
    "belif The True Cream Moisturizing Bomb",
    "Peter Thomas Roth Water Drench Hyaluronic Cloud Cream Hydrating Moisturizer",
    "Medicube Collagen Jelly Cream",
    "Shiseido Firming Massage Mask",
    "Medicube One Day Exosome Shot Pore Ampoule 7500",
    "REJURAN Intensive Eye Cream",
    "Medicube Deep Vita C Capsule Cream",
    "Medicube TXA Niacinamide Capsule Cream",
    "Whip It Hydrating Whipped Cream",
    "Point of View Drench It Soothing Priming Milk",
    "Point of View Drip It Nourishing Glow Serum",
    "Rejuran Turnover Ampoule with c-PDRN 0.5%",
    "Good Molecules Super Peptide Serum",
    "VT Cosmetics Cica Reedle Shot 700",
    "Medicube Exosome Cica Ampoule",
    "Qure Micro-Infusion System",
    "ISDIN Photo Eryfotona Ageless Ultralight Emulsion",
    "Embryolisse Lait-Creme Concentre",
    "Celimax Pore + Dark Spot Brightening Cream",
    "Medicube Deep Vita C Pad",
    "Red Light Mask",
    "Red Light Neck",
    "Guacha tool",
    "Red light therapy",
    "Microneedle",
    "Microneedle infusion",
    "Medicube Age R Booster Pro",
    "AngelLift",
    "INIA Flare",
    "Face cupping",
    "INIA Lumin",
    "Nuderma Clinical",
];
