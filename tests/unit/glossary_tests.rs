/*!
 * Tests for glossary loading and lookup
 */

use anyhow::Result;
use transeval::evaluation::terminology::glossary::find_terms_in_source;
use transeval::{GlossaryProvider, InMemoryGlossary};

use crate::common;

#[test]
fn test_fromJsonFile_withSimplifiedForm_shouldApplyDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "glossary.json", common::GLOSSARY_JSON)?;

    let glossary = InMemoryGlossary::from_json_file(&path, "materials_science", "zh", "en")?;
    assert_eq!(glossary.len(), 4);

    let pairs = glossary.lookup("Materials_Science", "zh-CN", "eng");
    assert_eq!(pairs.len(), 4);
    assert!(glossary.lookup("biology", "zh", "en").is_empty());
    assert!(glossary.lookup("materials_science", "en", "zh").is_empty());
    Ok(())
}

#[test]
fn test_fromJsonStr_withEntryList_shouldKeepPerEntryDomains() -> Result<()> {
    let json = r#"[
        {"source_term": "晶格", "target_term": "lattice", "definition": "periodic arrangement"},
        {"source_term": "蛋白质", "target_term": "protein", "domain": "biology"},
        {"source_term": "", "target_term": "ignored"}
    ]"#;
    let glossary = InMemoryGlossary::from_json_str(json, "materials_science", "zh", "en")?;

    assert_eq!(glossary.lookup("materials_science", "zh", "en").len(), 1);
    assert_eq!(glossary.lookup("biology", "zh", "en").len(), 1);
    assert_eq!(
        glossary.entries()[0].definition.as_deref(),
        Some("periodic arrangement")
    );
    Ok(())
}

#[test]
fn test_fromJsonStr_withScalar_shouldFail() {
    assert!(InMemoryGlossary::from_json_str("42", "materials_science", "zh", "en").is_err());
}

#[test]
fn test_findTermsInSource_shouldKeepOnlyOccurringTerms() -> Result<()> {
    let glossary = InMemoryGlossary::from_json_str(common::GLOSSARY_JSON, "materials_science", "zh", "en")?;
    let pairs = glossary.lookup("materials_science", "zh", "en");

    let found = find_terms_in_source(common::SOURCE_TEXT, &pairs, "zh");
    assert_eq!(found.len(), 3);
    assert_eq!(found.get("合金").map(String::as_str), Some("alloy"));
    assert!(!found.contains_key("陶瓷"));
    Ok(())
}
