//! Core modules for RESORT-TI

pub mod lexicon;
pub mod needs;
pub mod sentiment;
pub mod completeness;
pub mod composite;
pub mod timing;
pub mod menu;
pub mod category;
pub mod engine;
pub mod backend;
pub mod event_log;
pub mod session;
pub mod api;

pub use lexicon::{KeywordSet, Lexicon};
pub use needs::NeedDetector;
pub use sentiment::SentimentEstimator;
pub use completeness::CompletenessTracker;
pub use composite::CompositeCalculator;
pub use timing::TimingGate;
pub use menu::MenuRanker;
pub use category::CategorySelector;
pub use engine::AnalysisEngine;
pub use backend::{ChatBackend, HttpBackend, OfflineBackend};
pub use event_log::EventLog;
pub use session::{generate_session_id, ChatSession};
pub use api::{create_router, router_with_state, run_server, AppState, SessionUpdate};
