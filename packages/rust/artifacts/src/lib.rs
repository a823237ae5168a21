//! Writes generated pages to disk.
//!
//! Each page becomes one pretty-printed JSON file (two-space indent,
//! non-ASCII text kept verbatim). Files are written to a temp name and then
//! renamed into place. An optional `manifest.json` records the run id,
//! timestamp, and a SHA-256 checksum per file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use pagecraft_shared::{GeneratedPages, OutputConfig, PageType, PagecraftError, Result};

/// Manifest file name, written next to the pages.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Metadata for a single written page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub page_type: PageType,
    pub filename: String,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Contents of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub product_name: String,
    pub tool_version: String,
    pub artifacts: Vec<ArtifactMeta>,
}

/// Output of [`write_pages`].
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// Directory the pages were written to.
    pub dir: PathBuf,
    /// One entry per page, in faq / product page / comparison order.
    pub artifacts: Vec<ArtifactMeta>,
    /// The manifest, when one was written.
    pub manifest: Option<RunManifest>,
}

/// Write the three pages (and optionally the manifest) into `dir`.
///
/// File names come from `output`; `output.dir` is ignored here since the
/// caller has already resolved the target directory.
#[instrument(skip_all, fields(dir = %dir.display(), product = %pages.faq.product_name))]
pub fn write_pages(
    dir: &Path,
    pages: &GeneratedPages,
    output: &OutputConfig,
    tool_version: &str,
) -> Result<WriteResult> {
    std::fs::create_dir_all(dir).map_err(|e| PagecraftError::io(dir, e))?;

    let artifacts = vec![
        write_artifact(dir, &output.faq_file, PageType::Faq, &pages.faq)?,
        write_artifact(
            dir,
            &output.product_page_file,
            PageType::ProductPage,
            &pages.product_page,
        )?,
        write_artifact(
            dir,
            &output.comparison_file,
            PageType::Comparison,
            &pages.comparison,
        )?,
    ];

    let manifest = if output.write_manifest {
        let manifest = RunManifest {
            run_id: Uuid::now_v7(),
            generated_at: Utc::now(),
            product_name: pages.faq.product_name.clone(),
            tool_version: tool_version.to_string(),
            artifacts: artifacts.clone(),
        };
        write_atomic(dir, MANIFEST_FILE, &to_pretty_json(&manifest)?)?;
        debug!(run_id = %manifest.run_id, "manifest written");
        Some(manifest)
    } else {
        None
    };

    info!(count = artifacts.len(), "pages written");

    Ok(WriteResult {
        dir: dir.to_path_buf(),
        artifacts,
        manifest,
    })
}

/// Read a previously written manifest back from `dir`.
pub fn read_manifest(dir: &Path) -> Result<RunManifest> {
    let path = dir.join(MANIFEST_FILE);
    let content = std::fs::read_to_string(&path).map_err(|e| PagecraftError::io(&path, e))?;
    Ok(serde_json::from_str(&content)?)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_artifact<T: Serialize>(
    dir: &Path,
    filename: &str,
    page_type: PageType,
    page: &T,
) -> Result<ArtifactMeta> {
    let content = to_pretty_json(page)?;
    write_atomic(dir, filename, &content)?;

    debug!(file = %filename, size = content.len(), "wrote page");

    Ok(ArtifactMeta {
        page_type,
        filename: filename.to_string(),
        sha256: compute_hash(&content),
        size_bytes: content.len(),
    })
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Write to a dot-prefixed temp file, then rename over the target.
fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<()> {
    let target = dir.join(filename);
    let temp = dir.join(format!(".{filename}.tmp"));

    std::fs::write(&temp, content).map_err(|e| PagecraftError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| PagecraftError::io(&target, e))?;
    Ok(())
}

/// Compute SHA-256 hash of content.
fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use pagecraft_shared::{
        BenefitDetail, ComparisonPage, ComparisonRow, FaqPage, Product, ProductPage, Question,
        QuestionCategory, SafetyInfo, UsageInstructions, Winner,
    };

    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pc-artifacts-test-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn make_product(name: &str, price: &str) -> Product {
        Product {
            name: name.into(),
            concentration: "10% Vitamin C".into(),
            skin_type: vec!["Oily".into()],
            key_ingredients: vec!["Vitamin C".into()],
            benefits: vec!["Brightening".into()],
            how_to_use: "Apply 2-3 drops".into(),
            side_effects: "None known".into(),
            price: price.into(),
        }
    }

    fn make_pages() -> GeneratedPages {
        let a = make_product("GlowBoost Vitamin C Serum", "₹699");
        let b = make_product("RadiantGlow Niacinamide Serum", "₹899");
        GeneratedPages {
            faq: FaqPage::new(
                a.name.clone(),
                vec![Question {
                    question: "What is the price?".into(),
                    answer: "The price is ₹699.".into(),
                    category: QuestionCategory::Purchase,
                }],
            ),
            product_page: ProductPage {
                page_type: PageType::ProductPage,
                product_name: a.name.clone(),
                concentration: a.concentration.clone(),
                price: a.price.clone(),
                benefits: vec![BenefitDetail {
                    benefit: "Brightening".into(),
                    description: "Helps with brightening for healthier-looking skin".into(),
                }],
                usage_instructions: UsageInstructions {
                    instruction: a.how_to_use.clone(),
                    frequency: "Daily (AM)".into(),
                    timing: "Before sunscreen".into(),
                    application_method: "Apply 2-3 drops".into(),
                },
                safety_info: SafetyInfo {
                    side_effects: a.side_effects.clone(),
                    suitable_skin_types: a.skin_type.clone(),
                    precautions: vec!["Follow usage instructions as directed".into()],
                },
                key_ingredients: a.key_ingredients.clone(),
            },
            comparison: ComparisonPage {
                page_type: PageType::Comparison,
                product_a: a,
                product_b: b,
                comparison_table: vec![ComparisonRow {
                    attribute: "Price".into(),
                    product_a_value: "₹699".into(),
                    product_b_value: "₹899".into(),
                    winner: Some(Winner::ProductA),
                }],
                summary: "GlowBoost is more affordable.".into(),
            },
        }
    }

    #[test]
    fn writes_pages_and_manifest() {
        let dir = temp_dir();
        let result = write_pages(&dir, &make_pages(), &OutputConfig::default(), "0.1.0-test")
            .unwrap();

        assert_eq!(result.artifacts.len(), 3);
        for name in ["faq.json", "product_page.json", "comparison_page.json", MANIFEST_FILE] {
            assert!(dir.join(name).exists(), "{name} missing");
        }
        // No temp files left behind.
        let leftovers = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);

        let manifest = read_manifest(&dir).unwrap();
        assert_eq!(manifest.product_name, "GlowBoost Vitamin C Serum");
        assert_eq!(manifest.tool_version, "0.1.0-test");
        assert_eq!(manifest.artifacts, result.artifacts);
        assert_eq!(Some(manifest), result.manifest);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn output_is_indented_and_keeps_non_ascii() {
        let dir = temp_dir();
        write_pages(&dir, &make_pages(), &OutputConfig::default(), "0.1.0").unwrap();

        let content = std::fs::read_to_string(dir.join("comparison_page.json")).unwrap();
        assert!(content.contains("₹699"));
        assert!(!content.contains("\\u20b9"));
        assert!(content.contains("\n  \"page_type\": \"comparison\""));

        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["comparison_table"][0]["winner"], "Product A");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn checksums_match_file_contents() {
        let dir = temp_dir();
        let result =
            write_pages(&dir, &make_pages(), &OutputConfig::default(), "0.1.0").unwrap();

        for meta in &result.artifacts {
            let content = std::fs::read_to_string(dir.join(&meta.filename)).unwrap();
            assert_eq!(meta.sha256, compute_hash(&content));
            assert_eq!(meta.size_bytes, content.len());
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn manifest_can_be_disabled() {
        let dir = temp_dir();
        let output = OutputConfig {
            write_manifest: false,
            faq_file: "questions.json".into(),
            ..OutputConfig::default()
        };
        let result = write_pages(&dir, &make_pages(), &output, "0.1.0").unwrap();

        assert!(result.manifest.is_none());
        assert!(!dir.join(MANIFEST_FILE).exists());
        assert!(dir.join("questions.json").exists());
        assert_eq!(result.artifacts[0].page_type, PageType::Faq);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn compute_hash_is_hex_sha256() {
        let hash = compute_hash("");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
