//! Core types for RESORT-TI

mod kinds;
mod session;
mod state;
mod lexicon;
mod output;
mod reason;
mod turn;
mod remote;
mod log;

pub use kinds::{NeedKind, DataCategory, CompositeFactor};
pub use session::{
    SessionState, NeedScores, Sentiment, SentimentLabel, Completeness, CompositeIndex,
    SelectedCategory,
};
pub use state::TimingStatus;
pub use lexicon::{
    LexiconConfig, NeedLexicon, TopicRule, CategoryDef, RuleTerm, MenuDef, ReplyTemplates,
    FortuneContent,
};
pub use output::{RankedMenu, TurnAnalysis, ChatReply, FortuneResult};
pub use reason::ReplySource;
pub use turn::{ChatTurn, HistoryWindow};
pub use remote::{ChatTurnRequest, ChatTurnResponse, RemoteSentiment, FortuneRequest, FortuneResponse};
pub use log::{LogEntry, LogEventType};
