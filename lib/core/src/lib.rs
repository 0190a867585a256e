//! # featgraph Core
//!
//! Core library for featgraph.
//!
//! This crate provides the data structures every other featgraph crate
//! builds on:
//!
//! - [`Table`] - Ordered columns of JSON cells (the "dirty table")
//! - [`Matrix`] - Dense row-major feature matrix with named columns
//! - [`cell`] - Probes for missing, numeric, boolean and list-valued cells
//! - [`distance`] - Euclidean kernels over matrix rows
//! - [`Error`] - The shared error taxonomy
//!
//! ## Example
//!
//! ```rust
//! use featgraph_core::{Table, Column, Matrix};
//! use serde_json::json;
//!
//! let table = Table::from_columns(vec![
//!     Column::new("price", vec![json!(1.5), json!("2.0"), json!(null)]),
//!     Column::new("tags", vec![json!(["a"]), json!(["a", "b"]), json!([])]),
//! ]).unwrap();
//! assert_eq!(table.n_rows(), 3);
//!
//! let m = Matrix::new(3, vec!["price".to_string()], vec![1.5, 2.0, 0.0]).unwrap();
//! assert_eq!(m.shape(), (3, 1));
//! ```

pub mod cell;
pub mod distance;
pub mod error;
pub mod matrix;
pub mod table;

pub use error::{Error, Result};
pub use matrix::Matrix;
pub use table::{Column, Table};
