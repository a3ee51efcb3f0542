//! External tools used by the research agents.

/// Web search (DuckDuckGo via daedra).
pub mod search;

pub use search::{DuckDuckGoSearch, SearchHit, WebSearch};
