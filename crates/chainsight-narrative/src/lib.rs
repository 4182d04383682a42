pub mod service;
pub mod cortex;
pub mod analyst;
pub mod rag;
pub mod error;

// Re-exports
pub use service::{NarrativeOutcome, NarrativeService};
pub use cortex::CortexClient;
pub use analyst::{ask_analyst, explain_causal_link};
pub use rag::{generate_rag_response, search_qbr_documents};
pub use error::{Error, Result};
