//! Template-driven FAQ question catalog.
//!
//! Every answer is built from the product's own fields plus fixed editorial
//! phrasing. The only input-independent claims are the daily-use and
//! morning-before-sunscreen recommendations.

use std::collections::BTreeSet;

use tracing::instrument;

use pagecraft_shared::{Product, Question, QuestionCategory, Result};

use crate::blocks::{and_list_lower, drop_dose};
use crate::comparator::parse_price;
use crate::events::{PipelineEvent, SharedSink};
use crate::stage::Stage;

/// Lower bound on catalog size.
pub const MIN_QUESTIONS: usize = 15;

/// Stage that derives the question catalog from a product.
pub struct QuestionSynthesizer {
    sink: SharedSink,
}

impl QuestionSynthesizer {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl Stage<Product, Vec<Question>> for QuestionSynthesizer {
    fn name(&self) -> &'static str {
        "question_synthesizer"
    }

    #[instrument(skip_all, fields(stage = "question_synthesizer", product = %product.name))]
    fn run(&self, product: &Product) -> Result<Vec<Question>> {
        self.sink.emit(&PipelineEvent::StageStarted { stage: self.name() });

        let questions = synthesize(product);
        let categories: BTreeSet<_> = questions.iter().map(|q| q.category).collect();

        self.sink.emit(&PipelineEvent::StageCompleted {
            stage: self.name(),
            detail: format!(
                "generated {} questions across {} categories",
                questions.len(),
                categories.len()
            ),
        });
        Ok(questions)
    }
}

/// Build the full catalog in generation order.
pub fn synthesize(product: &Product) -> Vec<Question> {
    use QuestionCategory::*;

    let name = &product.name;
    let skin = and_list_lower(&product.skin_type);
    let side_effects = product.side_effects.trim_end_matches('.');

    // The last listed ingredient is usually the supporting one.
    let supporting_question = match product.key_ingredients.last() {
        Some(ingredient) => q(
            Ingredients,
            format!("Does {name} contain {ingredient}?"),
            format!("Yes, {name} contains {ingredient} as one of its key ingredients."),
        ),
        None => q(
            Ingredients,
            format!("Which ingredient supports the main active in {name}?"),
            "See the key ingredients list on the product page.".into(),
        ),
    };

    let dose_answer = match drop_dose(&product.how_to_use) {
        Some(dose) => format!("Use {dose} drops for each application."),
        None => format!("Follow the directions: {}", product.how_to_use),
    };

    let affordability_answer = match parse_price(&product.price) {
        Ok(parsed) => format!(
            "At {}, this product sits in the {} price range.",
            product.price,
            parsed.tier.as_str().to_lowercase()
        ),
        Err(_) => format!("This product is listed at {}.", product.price),
    };

    let first_benefit = product
        .benefits
        .first()
        .map_or_else(String::new, |b| b.to_lowercase());

    vec![
        q(
            Informational,
            format!("What is {name}?"),
            format!(
                "{name} is a skincare serum with {}, designed for {skin} skin types.",
                product.concentration
            ),
        ),
        q(
            Informational,
            format!("What is the concentration of active ingredient in {name}?"),
            format!("The concentration is {}.", product.concentration),
        ),
        q(
            Informational,
            "What skin types is this product suitable for?".into(),
            format!("This product is suitable for {skin} skin types."),
        ),
        q(
            Ingredients,
            "What are the key ingredients?".into(),
            format!("The key ingredients are {}.", product.key_ingredients.join(", ")),
        ),
        supporting_question,
        q(
            Usage,
            "How do I use this product?".into(),
            product.how_to_use.clone(),
        ),
        q(
            Usage,
            "When should I apply this serum?".into(),
            "Apply in the morning before sunscreen for best results.".into(),
        ),
        q(Usage, "How much should I apply?".into(), dose_answer),
        q(
            Safety,
            "Are there any side effects?".into(),
            product.side_effects.clone(),
        ),
        q(
            Safety,
            "Is this safe for sensitive skin?".into(),
            format!("{side_effects}. A patch test is recommended."),
        ),
        q(
            Safety,
            "Can I use this product daily?".into(),
            "Yes, this product can be used daily in your morning routine.".into(),
        ),
        q(
            Purchase,
            "What is the price?".into(),
            format!("The price is {}.", product.price),
        ),
        q(
            Purchase,
            "Is this product affordable?".into(),
            affordability_answer,
        ),
        q(
            Comparison,
            format!("What makes {name} different from other serums?"),
            format!(
                "It combines {} with {}, specifically formulated for {skin} skin types.",
                product.concentration,
                product.key_ingredients.join(" and ")
            ),
        ),
        q(
            Comparison,
            format!("Who should choose {name} over similar serums?"),
            format!(
                "It suits people with {skin} skin who want {}.",
                and_list_lower(&product.benefits)
            ),
        ),
        q(
            Informational,
            format!("What benefits does {name} provide?"),
            format!("The main benefits are {}.", and_list_lower(&product.benefits)),
        ),
        q(
            Informational,
            format!("Can this help with {first_benefit}?"),
            format!("Yes, {first_benefit} is one of its primary benefits."),
        ),
    ]
}

fn q(category: QuestionCategory, question: String, answer: String) -> Question {
    Question {
        question,
        answer,
        category,
    }
}
