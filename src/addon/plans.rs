//! Plan catalog
//!
//! Marketplace plan names map onto instance tiers. The mapping is
//! static and case-sensitive; an unknown plan is a caller error, never
//! a default tier.

/// Resolve a marketplace plan to its instance tier
pub fn resolve_tier(plan: &str) -> Option<&'static str> {
    match plan {
        "trickle" => Some("D0"),
        "stream" => Some("D1"),
        "river" => Some("D4"),
        "deluge" => Some("D16"),
        "torrent" => Some("D32"),

        // For exercising the full pipeline against real infrastructure
        "test" => Some("D0"),

        _ => None,
    }
}
