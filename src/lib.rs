//! # Reconciliation Core
//!
//! Reconciliation of a bank statement export against a bookkeeping ledger export.
//!
//! ## Features
//!
//! - **Export parsing**: Header-driven CSV/TSV parsing with Polish decimal and date notations
//! - **Automatic matching**: One-to-one pairing by amount with a pluggable tie-break
//! - **Manual matching**: N:M groups with discrepancy flagging and confirmation
//! - **Unmatching**: Idempotent dissolution of any group
//! - **Views**: Income/expense filters, text search, totals and the unmatched list
//! - **Integrity checks**: Entry and registry consistency reports
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{FilterMode, Reconciler};
//!
//! let bank = "Zaksięgowano,Tytuł,Kwota\n10.01.2024,Składki,\"100,00\"\n";
//! let other = "Data\tOpis\tNumer dokumentu\tWpływy razem\tWydatki razem\n2024-01-11\tSkładki\tKP/1\t100.00\t0\n";
//!
//! let mut session = Reconciler::new();
//! let summary = session.load_from_text(bank, other).unwrap();
//! assert_eq!(summary.auto_matched, 1);
//!
//! session.set_filter_mode(FilterMode::Income);
//! assert!(session.totals().is_balanced());
//! assert!(session.all_matched());
//! ```

pub mod config;
pub mod matching;
pub mod parser;
pub mod registry;
pub mod session;
pub mod traits;
pub mod types;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use config::{load_config, ReconcileConfig, TieBreak};
pub use parser::{parse, parse_with_report, ParseReport, SkipReason, SkippedRow};
pub use registry::MatchRegistry;
pub use session::*;
pub use traits::*;
pub use types::*;
pub use view::{FilterMode, Totals};
