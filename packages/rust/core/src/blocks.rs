//! Reusable content blocks: small pure functions that turn product fields
//! into the structured sections the pages display.

use std::sync::LazyLock;

use regex::Regex;

use pagecraft_shared::{BenefitDetail, Product, SafetyInfo, UsageInstructions};

/// Fallback when no drop count can be read from the instructions.
pub const DEFAULT_APPLICATION_METHOD: &str = "Topical application";

/// One benefit entry per raw benefit phrase, in input order.
pub fn benefits_block(product: &Product) -> Vec<BenefitDetail> {
    product
        .benefits
        .iter()
        .map(|benefit| BenefitDetail {
            benefit: benefit.clone(),
            description: format!(
                "Helps with {} for healthier-looking skin",
                benefit.to_lowercase()
            ),
        })
        .collect()
}

/// Structure the free-text usage instruction.
pub fn usage_block(product: &Product) -> UsageInstructions {
    let instruction = &product.how_to_use;
    let lower = instruction.to_lowercase();

    let frequency = if lower.contains("morning") {
        "Daily (AM)"
    } else {
        "As directed"
    };

    let timing = if lower.contains("before sunscreen") {
        "Before sunscreen"
    } else {
        "As needed"
    };

    let application_method = match drop_dose(instruction) {
        Some(dose) => format!("Apply {dose} drops"),
        None => DEFAULT_APPLICATION_METHOD.to_string(),
    };

    UsageInstructions {
        instruction: instruction.clone(),
        frequency: frequency.to_string(),
        timing: timing.to_string(),
        application_method,
    }
}

/// The numeric or ranged token right before the word "drops", e.g. `2-3`.
///
/// En and em dashes are normalized to `-`.
pub fn drop_dose(instruction: &str) -> Option<String> {
    static DROPS_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)(?:^|\s)(\d+(?:\s*[-–—]\s*\d+)?)\s+drops\b").expect("valid regex")
    });

    DROPS_RE.captures(instruction).map(|caps| {
        caps[1]
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == '–' || c == '—' { '-' } else { c })
            .collect()
    })
}

/// Safety section built by keyword scan of the side-effects text.
pub fn safety_block(product: &Product) -> SafetyInfo {
    let lower = product.side_effects.to_lowercase();
    let mut precautions = Vec::new();

    if lower.contains("sensitive") {
        precautions.push("Patch test recommended for sensitive skin".to_string());
        precautions.push("Start with lower frequency if irritation occurs".to_string());
    }

    if lower.contains("tingling") {
        precautions.push("Mild tingling is normal and should subside".to_string());
    }

    if precautions.is_empty() {
        precautions.push("Follow usage instructions as directed".to_string());
    }

    SafetyInfo {
        side_effects: product.side_effects.clone(),
        suitable_skin_types: product.skin_type.clone(),
        precautions,
    }
}

/// How two ingredient lists overlap. Each list keeps first-seen order and
/// holds no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientOverlap {
    pub common: Vec<String>,
    pub unique_to_a: Vec<String>,
    pub unique_to_b: Vec<String>,
}

/// Compare the key-ingredient sets of two products.
pub fn ingredient_overlap(a: &Product, b: &Product) -> IngredientOverlap {
    let mut overlap = IngredientOverlap::default();

    for ingredient in &a.key_ingredients {
        let bucket = if b.key_ingredients.contains(ingredient) {
            &mut overlap.common
        } else {
            &mut overlap.unique_to_a
        };
        if !bucket.contains(ingredient) {
            bucket.push(ingredient.clone());
        }
    }

    for ingredient in &b.key_ingredients {
        if !a.key_ingredients.contains(ingredient) && !overlap.unique_to_b.contains(ingredient) {
            overlap.unique_to_b.push(ingredient.clone());
        }
    }

    overlap
}

/// Join with `" and "` and lowercase, as used in prose answers.
pub(crate) fn and_list_lower(items: &[String]) -> String {
    items.join(" and ").to_lowercase()
}
