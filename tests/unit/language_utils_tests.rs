/*!
 * Tests for language code utilities
 */

use transeval::language_utils::{
    ScriptKind, canonical_code, display_name, get_language_name, language_codes_match,
    normalize_to_part1_or_part3, script_kind,
};

#[test]
fn test_normalize_withRegionSubtag_shouldReturnPrimaryLanguage() {
    assert_eq!(normalize_to_part1_or_part3("zh-CN").unwrap(), "zh");
    assert_eq!(normalize_to_part1_or_part3("en_US").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part3("chi").unwrap(), "zh");
    assert_eq!(normalize_to_part1_or_part3("eng").unwrap(), "en");
}

#[test]
fn test_normalize_withInvalidCode_shouldFail() {
    assert!(normalize_to_part1_or_part3("xx").is_err());
    assert!(normalize_to_part1_or_part3("").is_err());
}

#[test]
fn test_languageCodesMatch_acrossFormats_shouldMatch() {
    assert!(language_codes_match("zh", "zho"));
    assert!(language_codes_match("zh-TW", "chi"));
    assert!(!language_codes_match("zh", "ja"));
    assert!(!language_codes_match("zz", "zz"));
}

#[test]
fn test_scriptKind_shouldClassifyChineseAndJapaneseAsLogographic() {
    assert_eq!(script_kind("zh-Hans"), ScriptKind::Logographic);
    assert_eq!(script_kind("jpn"), ScriptKind::Logographic);
    assert_eq!(script_kind("en"), ScriptKind::SpaceDelimited);
    assert_eq!(script_kind("unknown"), ScriptKind::SpaceDelimited);
}

#[test]
fn test_names_shouldFallBackToCode() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(display_name("fr"), "French");
    assert_eq!(display_name("  xx "), "xx");
    assert_eq!(canonical_code("XX-yy"), "xx");
}
