//! Comparison against a fixed fictional counterpart product.
//!
//! Product B is a constant record, never derived from the input, so two runs
//! over the same Product A produce identical rows and summary.

use std::cmp::Ordering;

use tracing::{debug, instrument};

use pagecraft_shared::{ComparisonRow, PagecraftError, Product, Result, Winner};

use crate::blocks::{IngredientOverlap, and_list_lower, ingredient_overlap};
use crate::events::{PipelineEvent, SharedSink};
use crate::stage::Stage;

/// Placeholder used on both sides of the common-ingredients row when the
/// sets do not intersect.
pub const NO_COMMON_INGREDIENTS: &str = "None";

/// Output of the comparator stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// The synthesized counterpart.
    pub counterpart: Product,
    pub rows: Vec<ComparisonRow>,
    pub summary: String,
}

/// Stage that compares a product against the fixed counterpart.
pub struct Comparator {
    sink: SharedSink,
}

impl Comparator {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl Stage<Product, Comparison> for Comparator {
    fn name(&self) -> &'static str {
        "comparator"
    }

    #[instrument(skip_all, fields(stage = "comparator", product = %product.name))]
    fn run(&self, product: &Product) -> Result<Comparison> {
        self.sink.emit(&PipelineEvent::StageStarted { stage: self.name() });

        let comparison = compare(product)?;

        self.sink.emit(&PipelineEvent::StageCompleted {
            stage: self.name(),
            detail: format!(
                "generated comparison with {} attributes",
                comparison.rows.len()
            ),
        });
        Ok(comparison)
    }
}

/// The fictional Product B. Same schema as any normalized product.
pub fn counterpart_product() -> Product {
    Product {
        name: "RadiantGlow Niacinamide Serum".into(),
        concentration: "5% Niacinamide".into(),
        skin_type: vec!["Dry".into(), "Sensitive".into()],
        key_ingredients: vec![
            "Niacinamide".into(),
            "Hyaluronic Acid".into(),
            "Zinc".into(),
        ],
        benefits: vec!["Pore minimizing".into(), "Reduces redness".into()],
        how_to_use: "Apply 3-4 drops in the evening after cleansing".into(),
        side_effects: "Generally well-tolerated".into(),
        price: "₹899".into(),
    }
}

/// Build rows and summary for `a` against the fixed counterpart.
pub fn compare(a: &Product) -> Result<Comparison> {
    let b = counterpart_product();
    let price_a = parse_price(&a.price)?;
    let price_b = parse_price(&b.price)?;
    let overlap = ingredient_overlap(a, &b);

    let common = if overlap.common.is_empty() {
        NO_COMMON_INGREDIENTS.to_string()
    } else {
        overlap.common.join(", ")
    };

    let rows = vec![
        row("Product Name", &a.name, &b.name, None),
        row("Active Ingredient", &a.concentration, &b.concentration, None),
        row(
            "Suitable Skin Types",
            &a.skin_type.join(", "),
            &b.skin_type.join(", "),
            None,
        ),
        row(
            "Key Ingredients",
            &a.key_ingredients.join(", "),
            &b.key_ingredients.join(", "),
            None,
        ),
        row("Common Ingredients", &common, &common, None),
        row(
            "Primary Benefits",
            &a.benefits.join(", "),
            &b.benefits.join(", "),
            None,
        ),
        row("How to Use", &a.how_to_use, &b.how_to_use, None),
        // B carries the gentler side-effect profile by editorial convention.
        row(
            "Side Effects",
            &a.side_effects,
            &b.side_effects,
            Some(Winner::ProductB),
        ),
        row(
            "Price",
            &a.price,
            &b.price,
            Some(price_winner(&price_a, &price_b)),
        ),
    ];

    let summary = summarize(a, &b, &overlap, &price_a, &price_b);

    debug!(
        rows = rows.len(),
        common = overlap.common.len(),
        price_a = price_a.numeric,
        price_b = price_b.numeric,
        "comparison built"
    );

    Ok(Comparison {
        counterpart: b,
        rows,
        summary,
    })
}

/// Lower price wins; equal prices go to Product B.
pub fn price_winner(a: &ParsedPrice, b: &ParsedPrice) -> Winner {
    if a.cmp_amount(b) == Ordering::Less {
        Winner::ProductA
    } else {
        Winner::ProductB
    }
}

fn row(attribute: &str, a: &str, b: &str, winner: Option<Winner>) -> ComparisonRow {
    ComparisonRow {
        attribute: attribute.to_string(),
        product_a_value: a.to_string(),
        product_b_value: b.to_string(),
        winner,
    }
}

fn summarize(
    a: &Product,
    b: &Product,
    overlap: &IngredientOverlap,
    price_a: &ParsedPrice,
    price_b: &ParsedPrice,
) -> String {
    let ingredients = if overlap.common.is_empty() {
        format!(
            "Both products contain different ingredients ({} vs {}).",
            overlap.unique_to_a.join(", "),
            overlap.unique_to_b.join(", ")
        )
    } else {
        format!("Both products contain {}.", overlap.common.join(", "))
    };

    let affordability = if price_a.cmp_amount(price_b) == Ordering::Equal {
        format!(
            "{} and {} are equally priced at {} and {}.",
            a.name, b.name, a.price, b.price
        )
    } else {
        let (cheaper, pricier) = match price_winner(price_a, price_b) {
            Winner::ProductA => (a, b),
            Winner::ProductB => (b, a),
        };
        format!(
            "{} is more affordable at {} compared to {}.",
            cheaper.name, cheaper.price, pricier.price
        )
    };

    format!(
        "{} focuses on {} with {}, while {} targets {} using {}. {ingredients} {affordability}",
        a.name,
        and_list_lower(&a.benefits),
        a.concentration,
        b.name,
        and_list_lower(&b.benefits),
        b.concentration,
    )
}

// ---------------------------------------------------------------------------
// Price block
// ---------------------------------------------------------------------------

/// Coarse price bracket derived from the numeric price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTier {
    Budget,
    MidRange,
    Premium,
}

impl PriceTier {
    /// `< 500` Budget, `< 1000` Mid-range, otherwise Premium.
    pub fn classify(numeric: u64) -> Self {
        match numeric {
            0..500 => Self::Budget,
            500..1000 => Self::MidRange,
            _ => Self::Premium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::MidRange => "Mid-range",
            Self::Premium => "Premium",
        }
    }
}

impl std::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A display price split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPrice {
    pub display: String,
    /// All digits of the display string with leading zeros removed. Never
    /// empty; the exact amount, whatever its length.
    pub digits: String,
    /// `digits` as an integer, saturating at `u64::MAX` for longer amounts.
    pub numeric: u64,
    /// The non-digit characters in order, trimmed.
    pub currency: String,
    pub tier: PriceTier,
}

impl ParsedPrice {
    /// Compare amounts exactly: more digits is larger, equal lengths compare
    /// digit by digit.
    pub fn cmp_amount(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

/// Parse a display price such as `₹699` or `$1,000`.
///
/// Every non-digit character is dropped before reading the number, so
/// separators vanish (`$1,000` → 1000) and the currency keeps them (`$,`).
/// Only a price with no digits at all is rejected.
pub fn parse_price(price: &str) -> Result<ParsedPrice> {
    let all_digits: String = price.chars().filter(char::is_ascii_digit).collect();
    if all_digits.is_empty() {
        return Err(PagecraftError::price_parse(price));
    }

    let digits = match all_digits.trim_start_matches('0') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    };
    let numeric: u64 = digits.parse().unwrap_or(u64::MAX);

    let currency: String = price.chars().filter(|c| !c.is_ascii_digit()).collect();

    Ok(ParsedPrice {
        display: price.to_string(),
        digits,
        numeric,
        currency: currency.trim().to_string(),
        tier: PriceTier::classify(numeric),
    })
}
