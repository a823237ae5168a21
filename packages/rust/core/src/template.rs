//! Structural rules each page type must satisfy.
//!
//! The assembler checks every finished page against these before handing
//! it back; a violation means an upstream stage broke its contract.

use pagecraft_shared::{ComparisonPage, FaqPage, PageType, PagecraftError, ProductPage, Result};

/// FAQ selection limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqRules {
    /// Maximum (and, given a large enough catalog, exact) question count.
    pub cap: usize,
    /// Number of leading selections that must come from distinct categories.
    pub diverse_prefix: usize,
}

pub const FAQ_RULES: FaqRules = FaqRules {
    cap: 5,
    diverse_prefix: 3,
};

/// Minimum rows in the comparison table.
pub const MIN_COMPARISON_ROWS: usize = 5;

/// FAQ page: right discriminator, count matches, and the page is full
/// whenever the catalog could fill it.
pub fn check_faq(page: &FaqPage, catalog_len: usize, rules: FaqRules) -> Result<()> {
    check_page_type(page.page_type, PageType::Faq)?;

    if page.total_questions != page.questions.len() {
        return Err(PagecraftError::precondition(format!(
            "faq total_questions {} does not match {} questions",
            page.total_questions,
            page.questions.len()
        )));
    }

    let expected = rules.cap.min(catalog_len);
    if page.questions.len() < expected {
        return Err(PagecraftError::precondition(format!(
            "faq page has {} questions, expected {expected}",
            page.questions.len()
        )));
    }
    Ok(())
}

/// Product page: every structured section is populated.
pub fn check_product_page(page: &ProductPage) -> Result<()> {
    check_page_type(page.page_type, PageType::ProductPage)?;

    if page.benefits.is_empty() {
        return Err(PagecraftError::precondition("product page has no benefits"));
    }
    if page.safety_info.precautions.is_empty() {
        return Err(PagecraftError::precondition(
            "product page has no precautions",
        ));
    }
    Ok(())
}

/// Comparison page: enough rows.
///
/// Product B is a fixed record, so an input equal to it is still a valid
/// comparison and is not rejected.
pub fn check_comparison(page: &ComparisonPage) -> Result<()> {
    check_page_type(page.page_type, PageType::Comparison)?;

    if page.comparison_table.len() < MIN_COMPARISON_ROWS {
        return Err(PagecraftError::precondition(format!(
            "comparison table has {} rows, need at least {MIN_COMPARISON_ROWS}",
            page.comparison_table.len()
        )));
    }
    Ok(())
}

fn check_page_type(actual: PageType, expected: PageType) -> Result<()> {
    if actual != expected {
        return Err(PagecraftError::precondition(format!(
            "page_type {} where {} was expected",
            actual.as_str(),
            expected.as_str()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pagecraft_shared::{ComparisonRow, Product, Question, QuestionCategory};

    use super::*;

    fn make_questions(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question {
                question: format!("Q{i}?"),
                answer: format!("A{i}."),
                category: QuestionCategory::Usage,
            })
            .collect()
    }

    #[test]
    fn faq_short_page_rejected_when_catalog_is_large() {
        let page = FaqPage::new("X", make_questions(4));
        let err = check_faq(&page, 15, FAQ_RULES).unwrap_err();
        assert!(err.to_string().contains("expected 5"));
    }

    #[test]
    fn faq_short_page_accepted_for_small_catalog() {
        let page = FaqPage::new("X", make_questions(3));
        assert!(check_faq(&page, 3, FAQ_RULES).is_ok());
    }

    fn make_product() -> Product {
        Product {
            name: "X".into(),
            concentration: "1% Y".into(),
            skin_type: vec!["Dry".into()],
            key_ingredients: vec!["Y".into()],
            benefits: vec!["Calming".into()],
            how_to_use: "Apply 2 drops".into(),
            side_effects: "None".into(),
            price: "₹100".into(),
        }
    }

    fn make_rows(n: usize) -> Vec<ComparisonRow> {
        (0..n)
            .map(|i| ComparisonRow {
                attribute: format!("Attr {i}"),
                product_a_value: "a".into(),
                product_b_value: "b".into(),
                winner: None,
            })
            .collect()
    }

    #[test]
    fn comparison_row_minimum() {
        let page = ComparisonPage {
            page_type: PageType::Comparison,
            product_a: make_product(),
            product_b: make_product(),
            comparison_table: make_rows(4),
            summary: "s".into(),
        };
        let err = check_comparison(&page).unwrap_err();
        assert!(err.to_string().contains("need at least 5"));

        // Identical products are still a valid comparison.
        let page = ComparisonPage {
            comparison_table: make_rows(MIN_COMPARISON_ROWS),
            ..page
        };
        assert!(check_comparison(&page).is_ok());
    }

    #[test]
    fn faq_count_mismatch_rejected() {
        let mut page = FaqPage::new("X", make_questions(5));
        page.total_questions = 7;
        assert!(check_faq(&page, 15, FAQ_RULES).is_err());
    }
}
