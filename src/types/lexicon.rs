//! Lexicon configuration: keyword tables, categories, menus, static content
//!
//! Pure data. Loaded once (built-in tables or a TOML file) and compiled into a
//! [`crate::core::Lexicon`] that every pipeline stage shares read-only.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LexiconError;
use crate::types::{CompositeFactor, DataCategory, NeedKind};

/// Keywords for one need plus the need's weight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeedLexicon {
    pub need: NeedKind,
    pub weight: f64,
    pub keywords: Vec<String>,
}

/// Topical keyword group gating a completeness increment.
/// An empty keyword list fires on every turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicRule {
    pub category: DataCategory,
    pub increment: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Reply category for the canned-response path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDef {
    pub id: u32,
    pub label: String,
    /// `None` for categories only the remote backend can pick
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<NeedKind>,
    pub weight: f64,
}

/// One `factor × weight` term of a menu scoring rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RuleTerm {
    pub factor: CompositeFactor,
    pub weight: f64,
}

/// Fortune menu with its scoring rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuDef {
    pub id: String,
    pub title: String,
    pub description: String,
    pub rule: Vec<RuleTerm>,
}

/// Canned replies for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyTemplates {
    pub category_id: u32,
    pub lines: Vec<String>,
}

/// Static fortune result shown when the backend is unavailable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FortuneContent {
    pub menu_id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub advice: String,
}

/// The full lexicon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    pub needs: Vec<NeedLexicon>,
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    pub topics: Vec<TopicRule>,
    pub categories: Vec<CategoryDef>,
    pub menus: Vec<MenuDef>,
    #[serde(default)]
    pub replies: Vec<ReplyTemplates>,
    #[serde(default)]
    pub fortunes: Vec<FortuneContent>,
}

impl LexiconConfig {
    /// Parse a TOML lexicon
    pub fn from_toml_str(text: &str) -> Result<Self, LexiconError> {
        let config: LexiconConfig = toml::from_str(text)?;
        if config.categories.is_empty() {
            return Err(LexiconError::NoCategories);
        }
        Ok(config)
    }

    /// Load a TOML lexicon from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn menu(&self, id: &str) -> Option<&MenuDef> {
        self.menus.iter().find(|m| m.id == id)
    }

    pub fn fortune(&self, menu_id: &str) -> Option<&FortuneContent> {
        self.fortunes.iter().find(|f| f.menu_id == menu_id)
    }

    pub fn replies_for(&self, category_id: u32) -> Option<&ReplyTemplates> {
        self.replies.iter().find(|r| r.category_id == category_id)
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            needs: vec![
                NeedLexicon {
                    need: NeedKind::ComplainingListening,
                    weight: 0.8,
                    keywords: words(&["疲れた", "うんざり", "愚痴", "聞いて", "つらい", "ストレス"]),
                },
                NeedLexicon {
                    need: NeedKind::EmotionOrganizing,
                    weight: 0.7,
                    keywords: words(&["混乱", "わからない", "整理", "考えがまとまらない", "どうしたらいい"]),
                },
                NeedLexicon {
                    need: NeedKind::RecognitionDesire,
                    weight: 0.6,
                    keywords: words(&["認めて", "頑張った", "評価", "誉めて", "見て", "すごい"]),
                },
                NeedLexicon {
                    need: NeedKind::Encouragement,
                    weight: 0.9,
                    keywords: words(&["落ち込む", "自信ない", "不安", "心配", "怖い", "だめ"]),
                },
                NeedLexicon {
                    need: NeedKind::Loneliness,
                    weight: 0.8,
                    keywords: words(&["一人", "寂しい", "孤独", "理解者がいない", "話し相手", "味方がいない"]),
                },
            ],
            positive_words: words(&["嬉しい", "楽しい", "幸せ", "良い", "素晴らしい", "最高"]),
            negative_words: words(&["悲しい", "つらい", "苦しい", "嫌", "最悪", "ダメ"]),
            topics: vec![
                // age / year
                TopicRule {
                    category: DataCategory::BasicInfo,
                    increment: 15.0,
                    keywords: words(&["歳", "年"]),
                },
                // work / company
                TopicRule {
                    category: DataCategory::WorkCareer,
                    increment: 20.0,
                    keywords: words(&["仕事", "会社"]),
                },
                // partner / crush
                TopicRule {
                    category: DataCategory::LoveRelationships,
                    increment: 25.0,
                    keywords: words(&["恋人", "好きな人", "彼"]),
                },
                // fortune / destiny / spiritual
                TopicRule {
                    category: DataCategory::SpiritualValues,
                    increment: 20.0,
                    keywords: words(&["占い", "運命", "スピリチュアル"]),
                },
                TopicRule {
                    category: DataCategory::PsychologyEmotion,
                    increment: 10.0,
                    keywords: Vec::new(),
                },
            ],
            categories: vec![
                CategoryDef { id: 1, label: "深い共感".into(), trigger: Some(NeedKind::ComplainingListening), weight: 0.9 },
                CategoryDef { id: 2, label: "優しい励まし".into(), trigger: Some(NeedKind::Encouragement), weight: 0.8 },
                CategoryDef { id: 3, label: "認めと賞賛".into(), trigger: Some(NeedKind::RecognitionDesire), weight: 0.7 },
                CategoryDef { id: 4, label: "寄り添い".into(), trigger: Some(NeedKind::Loneliness), weight: 0.8 },
                CategoryDef { id: 5, label: "整理支援".into(), trigger: Some(NeedKind::EmotionOrganizing), weight: 0.6 },
                CategoryDef { id: 12, label: "占い誘導".into(), trigger: None, weight: 1.0 },
            ],
            menus: vec![
                MenuDef {
                    id: "honesty_reading".into(),
                    title: "相手の本音占い".into(),
                    description: "気になるあの人の本当の気持ちを占います".into(),
                    rule: vec![
                        RuleTerm { factor: CompositeFactor::Romance, weight: 0.3 },
                        RuleTerm { factor: CompositeFactor::Relationship, weight: 0.3 },
                    ],
                },
                MenuDef {
                    id: "love_compatibility".into(),
                    title: "恋愛相性診断".into(),
                    description: "お二人の恋愛相性を詳しく分析します".into(),
                    rule: vec![
                        RuleTerm { factor: CompositeFactor::Romance, weight: 0.4 },
                        RuleTerm { factor: CompositeFactor::Spirit, weight: 0.2 },
                    ],
                },
                MenuDef {
                    id: "love_timing".into(),
                    title: "恋愛進展タイミング占い".into(),
                    description: "関係を進展させる最適なタイミングを占います".into(),
                    rule: vec![
                        RuleTerm { factor: CompositeFactor::Time, weight: 0.4 },
                        RuleTerm { factor: CompositeFactor::Romance, weight: 0.3 },
                    ],
                },
            ],
            replies: default_replies(),
            fortunes: default_fortunes(),
        }
    }
}

fn default_replies() -> Vec<ReplyTemplates> {
    vec![
        ReplyTemplates {
            category_id: 1,
            lines: words(&[
                "その気持ち、本当によくわかります。とてもつらい状況ですね...",
                "心の奥の痛みが私にも伝わってきます。一人で抱え込まれていたんですね。",
                "その重さを感じています。よく今まで頑張ってこられましたね。",
            ]),
        },
        ReplyTemplates {
            category_id: 2,
            lines: words(&[
                "大丈夫です。あなたには必ず道が開けます。その優しい心を信じてください。",
                "きっと素晴らしい未来が待っています。今の困難は成長のための試練なのです。",
                "あなたの中にある光が見えます。その強さを信じて前に進んでください。",
            ]),
        },
        ReplyTemplates {
            category_id: 3,
            lines: words(&[
                "よく頑張られましたね。その努力は必ず報われます。",
                "素晴らしい行動力ですね。あなたの価値をしっかりと感じています。",
                "その積極性、とても素敵です。自分を誇りに思ってください。",
            ]),
        },
        ReplyTemplates {
            category_id: 4,
            lines: words(&[
                "一人じゃありませんよ。私がいつでもあなたのお話を聞いています。",
                "あなたの味方です。どんな時でもあなたを見守っています。",
                "心の支えになりたいと思っています。安心してお話しください。",
            ]),
        },
        ReplyTemplates {
            category_id: 5,
            lines: words(&[
                "一緒に整理してみましょうか。どの部分が一番気になりますか？",
                "順番に考えてみましょう。まず、何が最も大切でしょうか？",
                "心の中を整理するお手伝いをさせてください。",
            ]),
        },
    ]
}

fn default_fortunes() -> Vec<FortuneContent> {
    vec![
        FortuneContent {
            menu_id: "honesty_reading".into(),
            title: "相手の本音占い結果".into(),
            content: "霊視の結果をお伝えします。あの人はあなたに対して、表面的には見せていない深い関心を抱いています。普段はクールに振る舞っていますが、心の奥では特別な存在として感じています。".into(),
            key_points: words(&[
                "相手はあなたを特別視している",
                "照れ隠しで素っ気ない態度を取っている",
                "今後アプローチのチャンスがある",
            ]),
            advice: "相手からの小さなサインを見逃さないでください。直感を信じて行動することで、良い変化が訪れるでしょう。".into(),
        },
        FortuneContent {
            menu_id: "love_compatibility".into(),
            title: "恋愛相性診断結果".into(),
            content: "お二人の相性を詳しく占わせていただきました。総合的な相性は89%と非常に高い数値を示しています。特に精神的な繋がりが深く、お互いを成長させる関係性です。".into(),
            key_points: words(&[
                "価値観の高い一致度",
                "お互いを高め合える関係",
                "深い精神的な結びつき",
            ]),
            advice: "この相性の良さを大切にして、お互いの個性を尊重しながら関係を深めていってください。".into(),
        },
        FortuneContent {
            menu_id: "love_timing".into(),
            title: "恋愛進展タイミング占い結果".into(),
            content: "星の配置から見ると、今月下旬から来月上旬にかけて、恋愛運が最高潮に達します。特に自然な流れでの関係進展に絶好のタイミングです。".into(),
            key_points: words(&[
                "今月23日頃がベストタイミング",
                "自然な流れでのアプローチが効果的",
                "成功確率85%の高い数値",
            ]),
            advice: "焦らず、でも確実にチャンスを掴んでください。あなたの直感を信じることが成功の鍵です。".into(),
        },
    ]
}

// =============================================================================
// TESTS
// =============================================================================
