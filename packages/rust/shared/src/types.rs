//! Core domain types for Pagecraft pages.
//!
//! Everything here is plain data: the normalized [`Product`], the question
//! catalog entries, comparison rows, and the three page artifacts that are
//! serialized at the boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// A single loosely-typed value in a raw input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    /// A plain string, possibly comma-delimited for multi-value fields.
    Text(String),
    /// An already-split list of strings.
    List(Vec<String>),
    /// Anything else (numbers, booleans, mixed arrays); coerced permissively.
    Other(serde_json::Value),
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawField {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for RawField {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// The unstructured record accepted at the boundary: field name → raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProduct(pub BTreeMap<String, RawField>);

impl RawProduct {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawField>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a raw field by key.
    pub fn get(&self, key: &str) -> Option<&RawField> {
        self.0.get(key)
    }

    /// Builder-style removal of a field.
    pub fn without(mut self, key: &str) -> Self {
        self.0.remove(key);
        self
    }
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// The normalized product record every stage reads.
///
/// List fields keep input order for display and are never empty once the
/// normalizer has produced the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub concentration: String,
    pub skin_type: Vec<String>,
    pub key_ingredients: Vec<String>,
    pub benefits: Vec<String>,
    pub how_to_use: String,
    pub side_effects: String,
    /// Currency-prefixed display price, e.g. `₹699`.
    pub price: String,
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// Closed set of FAQ question categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuestionCategory {
    Informational,
    Safety,
    Usage,
    Purchase,
    Comparison,
    Ingredients,
}

impl QuestionCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Informational,
        Self::Safety,
        Self::Usage,
        Self::Purchase,
        Self::Comparison,
        Self::Ingredients,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Informational => "Informational",
            Self::Safety => "Safety",
            Self::Usage => "Usage",
            Self::Purchase => "Purchase",
            Self::Comparison => "Comparison",
            Self::Ingredients => "Ingredients",
        }
    }
}

impl std::fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single categorized question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
    pub category: QuestionCategory,
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Which side of a comparison row is the better value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    #[serde(rename = "Product A")]
    ProductA,
    #[serde(rename = "Product B")]
    ProductB,
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProductA => "Product A",
            Self::ProductB => "Product B",
        }
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One attribute compared across the two products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub attribute: String,
    pub product_a_value: String,
    pub product_b_value: String,
    /// `None` for rows without an ordinal judgment; serialized as `null`.
    pub winner: Option<Winner>,
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// Discriminator carried by every page artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Faq,
    ProductPage,
    Comparison,
}

impl PageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Faq => "faq",
            Self::ProductPage => "product_page",
            Self::Comparison => "comparison",
        }
    }
}

/// The FAQ page artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqPage {
    pub page_type: PageType,
    pub product_name: String,
    pub questions: Vec<Question>,
    /// Always equal to `questions.len()`.
    pub total_questions: usize,
}

impl FaqPage {
    pub fn new(product_name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            page_type: PageType::Faq,
            product_name: product_name.into(),
            total_questions: questions.len(),
            questions,
        }
    }
}

/// A benefit phrase paired with its editorial description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitDetail {
    pub benefit: String,
    pub description: String,
}

/// Usage text broken into the fields the product page displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageInstructions {
    pub instruction: String,
    pub frequency: String,
    pub timing: String,
    pub application_method: String,
}

/// Safety section of the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyInfo {
    pub side_effects: String,
    pub suitable_skin_types: Vec<String>,
    /// Never empty.
    pub precautions: Vec<String>,
}

/// The product description page artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    pub page_type: PageType,
    pub product_name: String,
    pub concentration: String,
    pub price: String,
    pub benefits: Vec<BenefitDetail>,
    pub usage_instructions: UsageInstructions,
    pub safety_info: SafetyInfo,
    pub key_ingredients: Vec<String>,
}

/// The comparison page artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonPage {
    pub page_type: PageType,
    pub product_a: Product,
    pub product_b: Product,
    pub comparison_table: Vec<ComparisonRow>,
    pub summary: String,
}

/// The boundary output: one entry per page type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPages {
    pub faq: FaqPage,
    pub product_page: ProductPage,
    pub comparison: ComparisonPage,
}
