//! Static care-tip lookup for identified plants.
//!
//! Keyed by case-insensitive substring match against a fixed category table.
//! Pure and synchronous; a database-backed lookup would slot in behind the
//! same function signature.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantCareData {
    pub plant_type: String,
    pub sunlight: String,
    pub water: String,
    pub soil: String,
    pub problems: Vec<String>,
    pub tips: Vec<String>,
}

fn entry(
    plant_type: &str,
    sunlight: &str,
    water: &str,
    soil: &str,
    problems: &[&str],
    tips: &[&str],
) -> PlantCareData {
    PlantCareData {
        plant_type: plant_type.to_string(),
        sunlight: sunlight.to_string(),
        water: water.to_string(),
        soil: soil.to_string(),
        problems: problems.iter().map(|p| p.to_string()).collect(),
        tips: tips.iter().map(|t| t.to_string()).collect(),
    }
}

fn matches_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Look up care data for a plant by its common and scientific names.
pub fn care_for(name: &str, scientific_name: &str) -> PlantCareData {
    let name = name.to_lowercase();
    let scientific = scientific_name.to_lowercase();

    if matches_any(&name, &["rose", "tulip", "lily"]) {
        return entry(
            "Ornamental",
            "Full Sun",
            "Moderate",
            "Well-drained",
            &[
                "Aphid infestations",
                "Black spot disease",
                "Powdery mildew",
            ],
            &[
                "Water at the base to avoid wet leaves",
                "Prune dead blooms regularly",
                "Apply mulch to retain moisture",
            ],
        );
    }

    if matches_any(&name, &["mint", "basil", "oregano"]) {
        return entry(
            "Edible",
            "Partial Sun",
            "Regular",
            "Moist, well-drained",
            &["Root rot", "Leaf spot", "Aphids"],
            &[
                "Pinch back flowers to encourage leaf growth",
                "Harvest leaves regularly",
                "Keep soil consistently moist",
            ],
        );
    }

    if matches_any(&name, &["aloe", "snake plant", "cactus"]) {
        return entry(
            "Medicinal",
            "Bright Indirect",
            "Low",
            "Sandy, well-drained",
            &[
                "Root rot from overwatering",
                "Leaf burn",
                "Pests in humid conditions",
            ],
            &[
                "Water only when soil is completely dry",
                "Use well-draining pots",
                "Avoid direct afternoon sun",
            ],
        );
    }

    if matches_any(&name, &["ivy", "pothos", "philodendron"]) {
        return entry(
            "Ornamental",
            "Low to Bright Indirect",
            "Moderate",
            "Well-drained potting mix",
            &["Yellowing leaves", "Brown tips", "Root rot"],
            &[
                "Allow top inch of soil to dry between waterings",
                "Wipe leaves to remove dust",
                "Provide support for climbing varieties",
            ],
        );
    }

    if name.contains("fern") || scientific.contains("pteridophyta") {
        return entry(
            "Ornamental",
            "Low Light",
            "High",
            "Moist, acidic",
            &["Brown fronds", "Fungal diseases", "Pests"],
            &[
                "Keep soil consistently moist",
                "Mist regularly for humidity",
                "Avoid direct sunlight",
            ],
        );
    }

    // Fallback for anything outside the category table.
    entry(
        "Ornamental",
        "Partial Sun",
        "Moderate",
        "Well-drained",
        &["Yellowing leaves", "Brown spots"],
        &["Water twice a week", "Avoid direct afternoon sun"],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flower_category_matched_by_name() {
        let care = care_for("Desert Rose", "Adenium obesum");
        assert_eq!(care.plant_type, "Ornamental");
        assert_eq!(care.sunlight, "Full Sun");
        assert_eq!(care.problems.len(), 3);
    }

    #[test]
    fn test_herb_category_is_edible() {
        let care = care_for("Sweet Basil", "Ocimum basilicum");
        assert_eq!(care.plant_type, "Edible");
        assert_eq!(care.water, "Regular");
    }

    #[test]
    fn test_succulent_category_matched_case_insensitive() {
        let care = care_for("ALOE VERA", "");
        assert_eq!(care.plant_type, "Medicinal");
        assert_eq!(care.water, "Low");
    }

    #[test]
    fn test_fern_matched_by_scientific_name() {
        let care = care_for("Maidenhair", "Adiantum (Pteridophyta)");
        assert_eq!(care.sunlight, "Low Light");
        assert_eq!(care.water, "High");
    }

    #[test]
    fn test_unknown_plant_falls_back_to_default() {
        let care = care_for("Mystery Plant", "Plantae incognita");
        assert_eq!(care.plant_type, "Ornamental");
        assert_eq!(care.tips, vec![
            "Water twice a week".to_string(),
            "Avoid direct afternoon sun".to_string(),
        ]);
    }
}
