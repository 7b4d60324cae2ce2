//! Merge decisions
//!
//! For every sheet key the policy compares the target string with what the
//! catalog already says and picks one of add, update or skip.

use super::matcher::find_token;
use super::types::{Decision, EditPlan, MergeOptions, MergeSummary, PlannedEdit, SkipReason};
use crate::formats::catalog::{Element, TokenNode};
use crate::formats::tabular::TargetStrings;
use crate::settings::CatalogSettings;

/// Name shown for a token in one language.
///
/// Entries are scanned across all versions in document order. The first
/// value ending in `(` wins (function-style names such as `sin(`); otherwise
/// the last non-empty value. Empty when the language has no entry.
#[must_use]
pub fn preferred_display(node: &TokenNode, language: &str) -> String {
    let mut last = "";
    let mut call_form: Option<&str> = None;

    for entry in node.entries_for(language) {
        let value = entry.value();
        if value.is_empty() {
            continue;
        }
        if call_form.is_none() && value.ends_with('(') {
            call_form = Some(value);
        }
        last = value;
    }

    call_form.unwrap_or(last).to_string()
}

/// Decide what to do with one target string for a located token
#[must_use]
pub fn decide(
    node: &TokenNode,
    target: &str,
    options: &MergeOptions,
    settings: &CatalogSettings,
) -> Decision {
    let canonical = &settings.canonical_language;

    let display = preferred_display(node, canonical);
    if !display.is_empty() && target == display {
        return Decision::Skip(SkipReason::MatchesCanonical);
    }
    let matches_alternative = node.entries_for(canonical).any(|entry| {
        entry
            .variants
            .iter()
            .chain(&entry.accessibles)
            .any(|text| !text.is_empty() && text == target)
    });
    if matches_alternative {
        return Decision::Skip(SkipReason::MatchesCanonical);
    }

    match node.entries_for(&settings.target_language).next() {
        Some(_) if options.only_missing => Decision::Skip(SkipReason::KeepExisting),
        Some(existing) if existing.value() != target => Decision::Update {
            current: existing.value().to_string(),
        },
        Some(_) => Decision::Skip(SkipReason::Unchanged),
        None => Decision::Add,
    }
}

/// Run the policy over every sheet key, in sheet order
#[must_use]
pub fn plan_merge(
    root: &Element,
    strings: &TargetStrings,
    options: &MergeOptions,
    settings: &CatalogSettings,
) -> (EditPlan, MergeSummary) {
    let mut plan = EditPlan::default();
    let mut summary = MergeSummary {
        loaded: strings.len(),
        ..MergeSummary::default()
    };

    for (&key, target) in strings {
        let Some(token) = find_token(root, key) else {
            tracing::warn!("No token found for {} ({})", key, target);
            summary.missing += 1;
            summary.missing_keys.push((key, target.clone()));
            continue;
        };
        summary.processed += 1;

        let node = TokenNode::from_element(token);
        let edit = PlannedEdit { key, text: target.clone() };
        match decide(&node, target, options, settings) {
            Decision::Add => {
                tracing::debug!("{}: add {:?}", key, target);
                summary.added += 1;
                plan.additions.push(edit);
            }
            Decision::Update { current } => {
                tracing::debug!("{}: update {:?} -> {:?}", key, current, target);
                summary.updated += 1;
                plan.updates.push(edit);
            }
            Decision::Skip(reason) => {
                tracing::debug!("{}: skip ({})", key, reason);
            }
        }
    }

    (plan, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::catalog::parse_catalog;
    use crate::types::TokenKey;
    use pretty_assertions::assert_eq;

    const XML: &str = r#"<tokens>
    <token value="$2A">
        <version>
            <lang code="en" display="Voir"><accessible>Voir</accessible></lang>
        </version>
    </token>
    <token value="$C2">
        <version>
            <lang code="en" display="sin"><accessible>sine</accessible><variant>SIN</variant></lang>
        </version>
        <version>
            <lang code="en" display="sin("><accessible>sine(</accessible></lang>
            <lang code="en" display="sinus"/>
        </version>
    </token>
    <token value="$3E">
        <version>
            <lang code="en" display="Store"/>
            <lang code="fr" display="Ancien"><accessible>Ancien</accessible></lang>
        </version>
    </token>
    <two-byte value="$2B">
        <token value="$05">
            <version>
                <lang code="en" display="Store"><accessible>Store</accessible></lang>
            </version>
        </token>
    </two-byte>
</tokens>"#;

    fn node(key: TokenKey) -> TokenNode {
        let doc = parse_catalog(XML).unwrap();
        TokenNode::from_element(find_token(&doc.root, key).unwrap())
    }

    #[test]
    fn test_preferred_display() {
        assert_eq!(preferred_display(&node(TokenKey::single(0x2A)), "en"), "Voir");
        assert_eq!(preferred_display(&node(TokenKey::single(0xC2)), "EN"), "sin(");
        assert_eq!(preferred_display(&node(TokenKey::single(0x3E)), "fr"), "Ancien");
        assert_eq!(preferred_display(&node(TokenKey::single(0x2A)), "fr"), "");
    }

    #[test]
    fn test_preferred_display_last_value() {
        let doc = parse_catalog(
            "<tokens><token value=\"$01\"><version><lang code=\"en\" display=\"a\"/></version>\
             <version><lang code=\"en\"><accessible>b</accessible></lang><lang code=\"en\" display=\"\"/></version>\
             </token></tokens>",
        )
        .unwrap();
        let node = TokenNode::from_element(doc.root.find("token").unwrap());
        assert_eq!(preferred_display(&node, "en"), "b");
    }

    #[test]
    fn test_skip_same_as_canonical() {
        let settings = CatalogSettings::default();
        let decision = decide(&node(TokenKey::single(0x2A)), "Voir", &MergeOptions::default(), &settings);
        assert_eq!(decision, Decision::Skip(SkipReason::MatchesCanonical));
    }

    #[test]
    fn test_skip_canonical_alternatives() {
        let settings = CatalogSettings::default();
        let options = MergeOptions::default();
        let sin = node(TokenKey::single(0xC2));
        assert_eq!(decide(&sin, "SIN", &options, &settings), Decision::Skip(SkipReason::MatchesCanonical));
        assert_eq!(decide(&sin, "sine(", &options, &settings), Decision::Skip(SkipReason::MatchesCanonical));
        assert_eq!(decide(&sin, "sin", &options, &settings), Decision::Add);
    }

    #[test]
    fn test_add_for_nested_token() {
        let settings = CatalogSettings::default();
        let decision = decide(
            &node(TokenKey::double(0x2B, 0x05)),
            "Stocker ",
            &MergeOptions::default(),
            &settings,
        );
        assert_eq!(decision, Decision::Add);
    }

    #[test]
    fn test_update_existing() {
        let settings = CatalogSettings::default();
        let stored = node(TokenKey::single(0x3E));

        let decision = decide(&stored, "Nouveau", &MergeOptions::default(), &settings);
        assert_eq!(decision, Decision::Update { current: "Ancien".to_string() });

        let only_missing = MergeOptions { only_missing: true };
        let decision = decide(&stored, "Nouveau", &only_missing, &settings);
        assert_eq!(decision, Decision::Skip(SkipReason::KeepExisting));

        let decision = decide(&stored, "Ancien", &MergeOptions::default(), &settings);
        assert_eq!(decision, Decision::Skip(SkipReason::Unchanged));
    }

    #[test]
    fn test_plan_merge() {
        let doc = parse_catalog(XML).unwrap();
        let settings = CatalogSettings::default();
        let mut strings = TargetStrings::new();
        strings.insert(TokenKey::single(0x2A), "Voir".to_string());
        strings.insert(TokenKey::double(0x2B, 0x05), "Stocker ".to_string());
        strings.insert(TokenKey::single(0x3E), "Nouveau".to_string());
        strings.insert(TokenKey::single(0x05), "Perdu".to_string());

        let (plan, summary) = plan_merge(&doc.root, &strings, &MergeOptions::default(), &settings);

        assert_eq!(summary.loaded, 4);
        assert_eq!(summary.processed, 3);
        assert_eq!(summary.added, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.missing_keys, vec![(TokenKey::single(0x05), "Perdu".to_string())]);
        assert_eq!(
            plan.additions,
            vec![PlannedEdit { key: TokenKey::double(0x2B, 0x05), text: "Stocker ".to_string() }]
        );
        assert_eq!(
            plan.updates,
            vec![PlannedEdit { key: TokenKey::single(0x3E), text: "Nouveau".to_string() }]
        );
    }
}
