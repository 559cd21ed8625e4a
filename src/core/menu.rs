//! Menu Ranker
//!
//! match = min(100, round(50 + Σ factor × weight)), sorted descending.
//! Equal scores keep table order.

use std::sync::Arc;

use crate::{clamp_score, MENU_BASE_SCORE};
use crate::core::Lexicon;
use crate::types::{CompositeIndex, MenuDef, RankedMenu};

#[derive(Debug, Clone)]
pub struct MenuRanker {
    lexicon: Arc<Lexicon>,
}

impl Default for MenuRanker {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl MenuRanker {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Score one menu against the composite index
    pub fn match_score(menu: &MenuDef, composite: &CompositeIndex) -> u32 {
        let raw = MENU_BASE_SCORE
            + menu
                .rule
                .iter()
                .map(|term| composite.get(term.factor) * term.weight)
                .sum::<f64>();
        clamp_score(raw.round(), 0.0, 100.0) as u32
    }

    /// All menus, best match first
    pub fn rank(&self, composite: &CompositeIndex) -> Vec<RankedMenu> {
        let mut ranked: Vec<RankedMenu> = self
            .lexicon
            .config()
            .menus
            .iter()
            .map(|menu| RankedMenu {
                id: menu.id.clone(),
                title: menu.title.clone(),
                description: menu.description.clone(),
                match_score: Self::match_score(menu, composite),
            })
            .collect();
        // stable: ties keep table order
        ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        ranked
    }

    /// Best `n` menus
    pub fn top(&self, composite: &CompositeIndex, n: usize) -> Vec<RankedMenu> {
        let mut ranked = self.rank(composite);
        ranked.truncate(n);
        ranked
    }

    /// Find a menu by id, or by title as the remote backend sometimes sends
    pub fn resolve(&self, id_or_title: &str) -> Option<&MenuDef> {
        let key = id_or_title.trim();
        if key.is_empty() {
            return None;
        }
        let menus = &self.lexicon.config().menus;
        menus
            .iter()
            .find(|m| m.id == key)
            .or_else(|| menus.iter().find(|m| m.title == key || m.title.starts_with(key)))
    }

    /// Ranked entry for one menu
    pub fn ranked_entry(&self, menu: &MenuDef, composite: &CompositeIndex) -> RankedMenu {
        RankedMenu {
            id: menu.id.clone(),
            title: menu.title.clone(),
            description: menu.description.clone(),
            match_score: Self::match_score(menu, composite),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompositeFactor, RuleTerm};

    #[test]
    fn test_fresh_state_ties_keep_table_order() {
        let ranked = MenuRanker::default().rank(&CompositeIndex::default());
        let ids: Vec<&str> = ranked.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["honesty_reading", "love_compatibility", "love_timing"]);
        assert!(ranked.iter().all(|m| m.match_score == 50));
    }

    #[test]
    fn test_time_heavy_state_ranks_love_timing_first() {
        let mut idx = CompositeIndex::default();
        idx.set(CompositeFactor::Time, 100.0);
        idx.set(CompositeFactor::Romance, 20.0);
        let ranked = MenuRanker::default().rank(&idx);
        // love_timing: 50 + 40 + 6 = 96
        assert_eq!(ranked[0].id, "love_timing");
        assert_eq!(ranked[0].match_score, 96);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let menu = MenuDef {
            id: "x".into(),
            title: "X".into(),
            description: String::new(),
            rule: vec![RuleTerm { factor: CompositeFactor::Romance, weight: 0.9 }],
        };
        let mut idx = CompositeIndex::default();
        idx.set(CompositeFactor::Romance, 100.0);
        assert_eq!(MenuRanker::match_score(&menu, &idx), 100);
    }

    #[test]
    fn test_top_n() {
        let top = MenuRanker::default().top(&CompositeIndex::default(), 2);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_resolve_by_id_and_title() {
        let ranker = MenuRanker::default();
        assert_eq!(ranker.resolve("love_timing").map(|m| m.id.as_str()), Some("love_timing"));
        assert_eq!(ranker.resolve("恋愛相性診断").map(|m| m.id.as_str()), Some("love_compatibility"));
        // titles shortened by the backend
        assert_eq!(ranker.resolve("恋愛進展タイミング").map(|m| m.id.as_str()), Some("love_timing"));
        assert!(ranker.resolve("unknown").is_none());
    }
}
