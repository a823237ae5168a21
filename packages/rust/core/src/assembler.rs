//! Page assembler.
//!
//! Takes the normalized product, the question catalog, and the comparison,
//! then builds the three page artifacts and checks each against its template.

use std::collections::HashSet;

use tracing::{debug, instrument};

use pagecraft_shared::{
    ComparisonPage, FaqPage, PageType, PagecraftError, Product, ProductPage, Question, Result,
};

use crate::blocks::{benefits_block, safety_block, usage_block};
use crate::comparator::Comparison;
use crate::events::{PipelineEvent, SharedSink};
use crate::pipeline::RunContext;
use crate::stage::Stage;
use crate::template::{self, FAQ_RULES, FaqRules};

// ---------------------------------------------------------------------------
// FAQ selection
// ---------------------------------------------------------------------------

/// Pick the FAQ subset from the catalog, in generation order.
///
/// The first `diverse_prefix` picks take only the first question of each
/// not-yet-selected category; after that any question is accepted until
/// `cap`. If the single pass falls short, unselected questions are
/// backfilled in catalog order.
pub fn select_faq(catalog: &[Question], rules: FaqRules) -> Vec<Question> {
    let mut picked: Vec<usize> = Vec::with_capacity(rules.cap);
    let mut categories = HashSet::new();

    for (idx, question) in catalog.iter().enumerate() {
        if picked.len() >= rules.cap {
            break;
        }
        if picked.len() < rules.diverse_prefix {
            if categories.insert(question.category) {
                picked.push(idx);
            }
        } else {
            picked.push(idx);
        }
    }

    for idx in 0..catalog.len() {
        if picked.len() >= rules.cap {
            break;
        }
        if !picked.contains(&idx) {
            picked.push(idx);
        }
    }

    picked.into_iter().map(|idx| catalog[idx].clone()).collect()
}

// ---------------------------------------------------------------------------
// Page builders
// ---------------------------------------------------------------------------

/// Build the FAQ page from the full catalog.
pub fn build_faq_page(product: &Product, catalog: &[Question]) -> Result<FaqPage> {
    let page = FaqPage::new(product.name.clone(), select_faq(catalog, FAQ_RULES));
    template::check_faq(&page, catalog.len(), FAQ_RULES)?;
    Ok(page)
}

/// Build the product description page.
pub fn build_product_page(product: &Product) -> Result<ProductPage> {
    let page = ProductPage {
        page_type: PageType::ProductPage,
        product_name: product.name.clone(),
        concentration: product.concentration.clone(),
        price: product.price.clone(),
        benefits: benefits_block(product),
        usage_instructions: usage_block(product),
        safety_info: safety_block(product),
        key_ingredients: product.key_ingredients.clone(),
    };
    template::check_product_page(&page)?;
    Ok(page)
}

/// Combine both products, the rows, and the summary.
pub fn build_comparison_page(product: &Product, comparison: &Comparison) -> Result<ComparisonPage> {
    let page = ComparisonPage {
        page_type: PageType::Comparison,
        product_a: product.clone(),
        product_b: comparison.counterpart.clone(),
        comparison_table: comparison.rows.clone(),
        summary: comparison.summary.clone(),
    };
    template::check_comparison(&page)?;
    Ok(page)
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

fn require<'a, T>(value: Option<&'a T>, what: &str) -> Result<&'a T>
where
    T: ?Sized,
{
    value.ok_or_else(|| PagecraftError::precondition(format!("{what} not available at assembly")))
}

/// Assembles the FAQ page from the run context.
pub struct FaqAssembler {
    sink: SharedSink,
}

impl FaqAssembler {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl Stage<RunContext, FaqPage> for FaqAssembler {
    fn name(&self) -> &'static str {
        "faq_assembler"
    }

    #[instrument(skip_all, fields(stage = "faq_assembler"))]
    fn run(&self, ctx: &RunContext) -> Result<FaqPage> {
        self.sink.emit(&PipelineEvent::StageStarted { stage: self.name() });

        let product = require(ctx.product(), "product")?;
        let catalog = require(ctx.questions(), "questions")?;
        let page = build_faq_page(product, catalog)?;

        debug!(selected = page.total_questions, catalog = catalog.len(), "faq selection done");
        self.sink.emit(&PipelineEvent::StageCompleted {
            stage: self.name(),
            detail: format!("FAQ page assembled with {} questions", page.total_questions),
        });
        Ok(page)
    }
}

/// Assembles the product description page from the run context.
pub struct ProductPageAssembler {
    sink: SharedSink,
}

impl ProductPageAssembler {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl Stage<RunContext, ProductPage> for ProductPageAssembler {
    fn name(&self) -> &'static str {
        "product_page_assembler"
    }

    #[instrument(skip_all, fields(stage = "product_page_assembler"))]
    fn run(&self, ctx: &RunContext) -> Result<ProductPage> {
        self.sink.emit(&PipelineEvent::StageStarted { stage: self.name() });

        let product = require(ctx.product(), "product")?;
        let page = build_product_page(product)?;

        self.sink.emit(&PipelineEvent::StageCompleted {
            stage: self.name(),
            detail: format!(
                "product page assembled with {} benefits",
                page.benefits.len()
            ),
        });
        Ok(page)
    }
}

/// Assembles the comparison page from the run context.
pub struct ComparisonPageAssembler {
    sink: SharedSink,
}

impl ComparisonPageAssembler {
    pub fn new(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl Stage<RunContext, ComparisonPage> for ComparisonPageAssembler {
    fn name(&self) -> &'static str {
        "comparison_page_assembler"
    }

    #[instrument(skip_all, fields(stage = "comparison_page_assembler"))]
    fn run(&self, ctx: &RunContext) -> Result<ComparisonPage> {
        self.sink.emit(&PipelineEvent::StageStarted { stage: self.name() });

        let product = require(ctx.product(), "product")?;
        let comparison = require(ctx.comparison(), "comparison")?;
        let page = build_comparison_page(product, comparison)?;

        self.sink.emit(&PipelineEvent::StageCompleted {
            stage: self.name(),
            detail: format!(
                "comparison page assembled with {} rows",
                page.comparison_table.len()
            ),
        });
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use pagecraft_shared::QuestionCategory as C;

    use super::*;
    use crate::comparator::compare;
    use crate::events::silent;
    use crate::questions::synthesize;

    fn make_product() -> Product {
        Product {
            name: "GlowBoost Vitamin C Serum".into(),
            concentration: "10% Vitamin C".into(),
            skin_type: vec!["Oily".into(), "Combination".into()],
            key_ingredients: vec!["Vitamin C".into(), "Hyaluronic Acid".into()],
            benefits: vec!["Brightening".into(), "Fades dark spots".into()],
            how_to_use: "Apply 2-3 drops in the morning before sunscreen".into(),
            side_effects: "Mild tingling for sensitive skin".into(),
            price: "₹699".into(),
        }
    }

    fn make_catalog(categories: &[C]) -> Vec<Question> {
        categories
            .iter()
            .enumerate()
            .map(|(i, category)| Question {
                question: format!("Question {i}?"),
                answer: format!("Answer {i}."),
                category: *category,
            })
            .collect()
    }

    fn distinct(questions: &[Question]) -> usize {
        questions
            .iter()
            .map(|q| q.category)
            .collect::<HashSet<_>>()
            .len()
    }

    #[test]
    fn selects_five_with_diverse_prefix() {
        let catalog = make_catalog(&[
            C::Informational,
            C::Informational,
            C::Informational,
            C::Ingredients,
            C::Ingredients,
            C::Usage,
            C::Usage,
            C::Usage,
            C::Safety,
            C::Safety,
            C::Safety,
            C::Purchase,
            C::Purchase,
            C::Comparison,
            C::Informational,
        ]);
        assert_eq!(catalog.len(), 15);

        let selected = select_faq(&catalog, FAQ_RULES);
        assert_eq!(selected.len(), 5);
        assert_eq!(distinct(&selected[..3]), 3);

        let names: Vec<&str> = selected.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(
            names,
            vec!["Question 0?", "Question 3?", "Question 5?", "Question 6?", "Question 7?"]
        );
    }

    #[test]
    fn backfills_when_few_categories() {
        let catalog = make_catalog(&[C::Usage, C::Usage, C::Usage, C::Safety, C::Usage, C::Usage]);
        let selected = select_faq(&catalog, FAQ_RULES);
        assert_eq!(selected.len(), 5);

        let names: Vec<&str> = selected.iter().map(|q| q.question.as_str()).collect();
        // Single pass only finds two categories; the rest are backfilled in order.
        assert_eq!(
            names,
            vec!["Question 0?", "Question 3?", "Question 1?", "Question 2?", "Question 4?"]
        );
    }

    #[test]
    fn small_catalog_is_taken_whole_without_duplicates() {
        let catalog = make_catalog(&[C::Usage, C::Usage, C::Safety]);
        let selected = select_faq(&catalog, FAQ_RULES);
        assert_eq!(selected.len(), 3);

        let unique: HashSet<_> = selected.iter().map(|q| q.question.clone()).collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn empty_catalog_selects_nothing() {
        assert!(select_faq(&[], FAQ_RULES).is_empty());
    }

    #[test]
    fn faq_page_from_synthesized_catalog() {
        let product = make_product();
        let catalog = synthesize(&product);
        let page = build_faq_page(&product, &catalog).unwrap();
        assert_eq!(page.total_questions, 5);
        assert_eq!(page.questions.len(), 5);
        assert_eq!(page.product_name, product.name);
        assert_eq!(distinct(&page.questions[..3]), 3);
    }

    #[test]
    fn product_page_sections() {
        let page = build_product_page(&make_product()).unwrap();
        assert_eq!(page.page_type, PageType::ProductPage);
        assert_eq!(page.usage_instructions.frequency, "Daily (AM)");
        assert_eq!(page.usage_instructions.timing, "Before sunscreen");
        assert_eq!(page.usage_instructions.application_method, "Apply 2-3 drops");
        assert_eq!(page.benefits.len(), 2);
        assert_eq!(page.key_ingredients, vec!["Vitamin C", "Hyaluronic Acid"]);
    }

    #[test]
    fn comparison_page_passes_through() {
        let product = make_product();
        let comparison = compare(&product).unwrap();
        let page = build_comparison_page(&product, &comparison).unwrap();
        assert_eq!(page.product_a, product);
        assert_eq!(page.product_b, comparison.counterpart);
        assert_eq!(page.comparison_table, comparison.rows);
        assert_eq!(page.summary, comparison.summary);
    }

    #[test]
    fn missing_upstream_is_precondition_error() {
        let ctx = RunContext::default();

        let err = FaqAssembler::new(silent()).run(&ctx).unwrap_err();
        assert!(matches!(err, PagecraftError::AssemblyPrecondition { .. }));

        let err = ProductPageAssembler::new(silent()).run(&ctx).unwrap_err();
        assert!(err.to_string().contains("product not available"));

        let ctx = ctx.with_product(make_product());
        let err = ComparisonPageAssembler::new(silent()).run(&ctx).unwrap_err();
        assert!(err.to_string().contains("comparison not available"));
    }
}
