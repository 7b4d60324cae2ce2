//! Plan application on the element tree
//!
//! Used by the reserializing write path. The tree loses the original entity
//! spelling and formatting once written, so this is only reached when safe
//! writing is turned off.

use super::matcher::find_token_mut;
use super::types::EditPlan;
use crate::formats::catalog::{ACCESSIBLE, CODE_ATTR, DISPLAY_ATTR, Element, LANG, VERSION};
use crate::settings::CatalogSettings;

/// Apply additions and updates to the tree, returning how many were applied
pub fn apply_plan_to_tree(root: &mut Element, plan: &EditPlan, settings: &CatalogSettings) -> usize {
    let language = settings.target_language.as_str();
    let mut applied = 0;

    for addition in &plan.additions {
        let Some(token) = find_token_mut(root, addition.key) else {
            tracing::warn!("No token found for {} while applying", addition.key);
            continue;
        };
        if token.find(VERSION).is_none() {
            token.push(Element::new(VERSION));
        }
        let Some(version) = token.elements_named_mut(VERSION).last() else {
            continue;
        };
        version.push(
            Element::new(LANG)
                .with_attr(CODE_ATTR, language)
                .with_attr(DISPLAY_ATTR, &addition.text)
                .with_child(Element::new(ACCESSIBLE).with_text(&addition.text)),
        );
        applied += 1;
    }

    for update in &plan.updates {
        let lang = find_token_mut(root, update.key).and_then(|token| first_lang_mut(token, language));
        let Some(lang) = lang else {
            tracing::warn!("No {} entry for {} while applying", language, update.key);
            continue;
        };
        lang.set_attr(DISPLAY_ATTR, &update.text);
        if lang.find(ACCESSIBLE).is_none() {
            lang.push(Element::new(ACCESSIBLE));
        }
        if let Some(accessible) = lang.elements_named_mut(ACCESSIBLE).next() {
            accessible.set_text(&update.text);
        }
        applied += 1;
    }

    applied
}

fn first_lang_mut<'a>(token: &'a mut Element, language: &str) -> Option<&'a mut Element> {
    token
        .elements_named_mut(VERSION)
        .flat_map(|version| version.elements_named_mut(LANG))
        .find(|lang| {
            lang.attr(CODE_ATTR)
                .is_some_and(|code| code.eq_ignore_ascii_case(language))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::catalog::{TokenNode, parse_catalog};
    use crate::merge::{PlannedEdit, find_token};
    use crate::types::TokenKey;

    #[test]
    fn test_apply_plan_to_tree() {
        let mut doc = parse_catalog(
            "<tokens>\
             <token value=\"$2A\"><version/><version><lang code=\"en\" display=\"View\"/></version></token>\
             <token value=\"$3E\"/>\
             <token value=\"$40\"><version><lang code=\"fr\" display=\"Ancien\"/></version></token>\
             </tokens>",
        )
        .unwrap();
        let plan = EditPlan {
            additions: vec![
                PlannedEdit { key: TokenKey::single(0x2A), text: "Voir ".to_string() },
                PlannedEdit { key: TokenKey::single(0x3E), text: "Stocker".to_string() },
                PlannedEdit { key: TokenKey::single(0x7F), text: "Perdu".to_string() },
            ],
            updates: vec![PlannedEdit { key: TokenKey::single(0x40), text: "Nouveau".to_string() }],
        };

        let applied = apply_plan_to_tree(&mut doc.root, &plan, &CatalogSettings::default());
        assert_eq!(applied, 3);

        let view = TokenNode::from_element(find_token(&doc.root, TokenKey::single(0x2A)).unwrap());
        assert!(view.versions[0].entries.is_empty());
        let fr = &view.versions[1].entries[1];
        assert_eq!((fr.language.as_str(), fr.display.as_str()), ("fr", "Voir "));
        assert_eq!(fr.fallback, "Voir ");

        let created = TokenNode::from_element(find_token(&doc.root, TokenKey::single(0x3E)).unwrap());
        assert_eq!(created.versions.len(), 1);
        assert_eq!(created.versions[0].entries[0].display, "Stocker");

        let updated = TokenNode::from_element(find_token(&doc.root, TokenKey::single(0x40)).unwrap());
        let fr = &updated.versions[0].entries[0];
        assert_eq!(fr.display, "Nouveau");
        assert_eq!(fr.accessibles, vec!["Nouveau"]);
    }

    #[test]
    fn test_update_keeps_other_accessibles() {
        let mut doc = parse_catalog(
            "<tokens><token value=\"$40\"><version>\
             <lang code=\"FR\" display=\"Ancien\"><accessible>Ancien</accessible><accessible>autre</accessible></lang>\
             </version></token></tokens>",
        )
        .unwrap();
        let plan = EditPlan {
            additions: Vec::new(),
            updates: vec![PlannedEdit { key: TokenKey::single(0x40), text: "Nouveau".to_string() }],
        };

        assert_eq!(apply_plan_to_tree(&mut doc.root, &plan, &CatalogSettings::default()), 1);

        let node = TokenNode::from_element(find_token(&doc.root, TokenKey::single(0x40)).unwrap());
        let fr = &node.versions[0].entries[0];
        assert_eq!(fr.display, "Nouveau");
        assert_eq!(fr.accessibles, vec!["Nouveau", "autre"]);
    }
}
