//! # featgraph Features
//!
//! Turns dirty tables into dense feature matrices.
//!
//! ## Overview
//!
//! 1. The **classifier** ([`kind`]) assigns each column a [`ColumnKind`]
//!    from cheap probes (cell types, parseability, distinct counts, words
//!    per cell).
//! 2. The **text router** ([`router`]) decides whether prose columns go to
//!    the sentence encoder or fall back to categorical handling.
//! 3. The **vectorizer** ([`vectorizer`]) fits one encoder per column and
//!    concatenates their outputs; the fitted [`DirtyVectorizer`] re-applies
//!    the same encoding to new rows.
//!
//! ## Example
//!
//! ```rust
//! use featgraph_core::{Table, Column};
//! use featgraph_features::{process_dirty_tables, EncodeConfig, ScalerKind};
//! use serde_json::json;
//!
//! let table = Table::from_columns(vec![
//!     Column::new("price", vec![json!(1.99), json!(2.49), json!(null)]),
//!     Column::new("category", vec![json!("salumi"), json!("salumi"), json!("formaggi")]),
//! ]).unwrap();
//!
//! let config = EncodeConfig::default().with_scaler(ScalerKind::MinMax);
//! let encoded = process_dirty_tables(&table, None, &config).unwrap();
//! assert_eq!(encoded.features.shape(), (3, 3));
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Table     │────>│ Classifier  │────>│ Text Router │
//! │ (dirty)     │     │ (kinds)     │     │ (optional)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                     ┌─────────────┐     ┌──────┴──────┐
//!                     │   Matrix    │<────│ Vectorizer  │
//!                     │ + encoder   │     │ (per kind)  │
//!                     └─────────────┘     └─────────────┘
//! ```

pub mod categorical;
pub mod config;
pub mod datetime;
pub mod kind;
pub mod multilabel;
pub mod pipeline;
pub mod router;
pub mod scaler;
pub mod text;
pub mod vectorizer;

// Re-export main types
pub use categorical::{MinHashEncoder, OneHotEncoder};
pub use config::EncodeConfig;
pub use kind::{classify_column, classify_table, ColumnKind, ColumnProfile};
pub use multilabel::MultiLabelBinarizer;
pub use pipeline::{
    check_target_rows, encode_target, process_dirty_tables, process_textual_or_other_tables,
    transform_target, Encoded,
};
pub use router::{route_text, TextRouting};
pub use scaler::{FittedScaler, NumericScaler, ScalerKind};
pub use text::{SentenceEncoder, DEFAULT_MODEL_NAME};
pub use vectorizer::{ColumnEncoder, DirtyVectorizer, FittedColumn, VectorizerConfig};
