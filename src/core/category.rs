//! Category Selector: canned-reply bucket when the backend is unavailable
//!
//! score = need[trigger] × weight; strict maximum wins, so the first category
//! in configuration order wins ties and the first category is the default.

use std::sync::Arc;

use crate::core::Lexicon;
use crate::types::{CategoryDef, NeedScores, SelectedCategory};

/// Display score given to a category picked by the remote backend
pub const REMOTE_CATEGORY_SCORE: f64 = 90.0;

/// Shown when no template exists at all
pub const GENERIC_REPLY: &str = "お話を聞かせてくれてありがとうございます。もう少し詳しく教えてもらえますか？";

#[derive(Debug, Clone)]
pub struct CategorySelector {
    lexicon: Arc<Lexicon>,
}

impl Default for CategorySelector {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl CategorySelector {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    fn categories(&self) -> &[CategoryDef] {
        &self.lexicon.config().categories
    }

    fn selected(def: &CategoryDef, score: f64) -> SelectedCategory {
        SelectedCategory {
            id: def.id,
            label: def.label.clone(),
            score,
        }
    }

    fn first(&self) -> SelectedCategory {
        // Lexicon::compile rejects empty category tables
        self.categories()
            .first()
            .map(|def| Self::selected(def, 0.0))
            .unwrap_or(SelectedCategory { id: 1, label: String::new(), score: 0.0 })
    }

    /// Pick the best category for the current needs
    pub fn select(&self, needs: &NeedScores) -> SelectedCategory {
        let mut best = self.first();
        for def in self.categories() {
            let Some(trigger) = def.trigger else {
                continue;
            };
            let score = needs.get(trigger) * def.weight;
            if score > best.score {
                best = Self::selected(def, score);
            }
        }
        best
    }

    /// Category named by the backend; unknown labels fall back to the first
    pub fn by_label(&self, label: &str) -> SelectedCategory {
        self.categories()
            .iter()
            .find(|def| def.label == label.trim())
            .map(|def| Self::selected(def, REMOTE_CATEGORY_SCORE))
            .unwrap_or_else(|| SelectedCategory {
                score: REMOTE_CATEGORY_SCORE,
                ..self.first()
            })
    }

    /// Canned reply for a category. Deterministic: `turn mod templates`.
    pub fn canned_reply(&self, category_id: u32, turn: u32) -> String {
        let config = self.lexicon.config();
        let templates = config
            .replies_for(category_id)
            .or_else(|| {
                config
                    .categories
                    .first()
                    .and_then(|def| config.replies_for(def.id))
            })
            .filter(|t| !t.lines.is_empty());

        match templates {
            Some(t) => t.lines[turn as usize % t.lines.len()].clone(),
            None => GENERIC_REPLY.to_string(),
        }
    }
}
