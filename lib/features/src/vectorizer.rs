//! Dirty-table vectorizer
//!
//! Fits one encoder per column according to its [`ColumnKind`] and turns the
//! table into a single dense [`Matrix`]. The fitted [`DirtyVectorizer`] is the
//! reusable encoder state: `transform` applies it to new rows without
//! refitting anything.
//!
//! | kind             | encoder                              | width          |
//! |------------------|--------------------------------------|----------------|
//! | Numeric          | median impute + scaler               | 1              |
//! | Boolean          | 0/1                                  | 1              |
//! | CategoricalLow   | one-hot over fitted categories       | #categories    |
//! | CategoricalHigh  | min-hash of character trigrams       | `n_topics`     |
//! | Text             | sentence encoder                     | model width    |
//! | DateTime         | calendar parts, each imputed + scaled| 6              |
//! | List             | multi-label binarizer                | #labels        |

use crate::categorical::{MinHashEncoder, OneHotEncoder};
use crate::datetime::{date_parts, parse_datetime, DATE_PARTS};
use crate::kind::{classify_table, ColumnKind, ColumnProfile};
use crate::multilabel::MultiLabelBinarizer;
use crate::scaler::{NumericScaler, ScalerKind};
use crate::text::{SentenceEncoder, DEFAULT_MODEL_NAME};
use featgraph_core::cell::{as_bool, as_f64, as_label, as_labels};
use featgraph_core::{Column, Error, Matrix, Result, Table};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Knobs for a single vectorizer fit
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerConfig {
    pub cardinality_threshold: usize,
    pub n_topics: usize,
    pub scaler: ScalerKind,
    pub model_name: String,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            cardinality_threshold: 40,
            n_topics: 42,
            scaler: ScalerKind::None,
            model_name: DEFAULT_MODEL_NAME.to_string(),
        }
    }
}

/// Fitted encoder for one column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "encoder", content = "state", rename_all = "snake_case")]
pub enum ColumnEncoder {
    Numeric(NumericScaler),
    Boolean,
    OneHot(OneHotEncoder),
    MinHash(MinHashEncoder),
    Text(SentenceEncoder),
    DateTime(Vec<NumericScaler>),
    MultiLabel(MultiLabelBinarizer),
}

/// A column's kind, fitted encoder and output feature names
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittedColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub encoder: ColumnEncoder,
    pub feature_names: Vec<String>,
}

impl FittedColumn {
    fn fit(column: &Column, kind: ColumnKind, config: &VectorizerConfig) -> Result<Self> {
        let name = column.name.as_str();
        let encoder = match kind {
            ColumnKind::Numeric => {
                ColumnEncoder::Numeric(NumericScaler::fit(config.scaler, &numeric_cells(column)))
            }
            ColumnKind::Boolean => ColumnEncoder::Boolean,
            ColumnKind::CategoricalLow => ColumnEncoder::OneHot(OneHotEncoder::fit(&label_cells(column))),
            ColumnKind::CategoricalHigh => ColumnEncoder::MinHash(MinHashEncoder::new(config.n_topics)),
            ColumnKind::Text => ColumnEncoder::Text(SentenceEncoder::from_model_name(&config.model_name)?),
            ColumnKind::DateTime => {
                let parts = date_cells(column);
                let scalers = (0..DATE_PARTS.len())
                    .map(|k| {
                        let values: Vec<Option<f64>> = parts.iter().map(|p| p.map(|p| p[k])).collect();
                        NumericScaler::fit(config.scaler, &values)
                    })
                    .collect();
                ColumnEncoder::DateTime(scalers)
            }
            ColumnKind::List => ColumnEncoder::MultiLabel(MultiLabelBinarizer::fit(&list_cells(column))),
        };

        let feature_names = match &encoder {
            ColumnEncoder::Numeric(_) | ColumnEncoder::Boolean => vec![name.to_string()],
            ColumnEncoder::OneHot(enc) => enc.feature_names(name),
            ColumnEncoder::MinHash(enc) => enc.feature_names(name),
            ColumnEncoder::Text(enc) => enc.feature_names(name),
            ColumnEncoder::DateTime(_) => DATE_PARTS.iter().map(|p| format!("{}_{}", name, p)).collect(),
            ColumnEncoder::MultiLabel(enc) => enc.feature_names(name),
        };

        debug!(column = name, ?kind, width = feature_names.len(), "fitted column encoder");

        Ok(Self {
            name: column.name.clone(),
            kind,
            encoder,
            feature_names,
        })
    }

    pub fn width(&self) -> usize {
        self.feature_names.len()
    }

    /// Encode a column into a row-major block of `width()` values per row
    fn encode(&self, column: &Column) -> Vec<f32> {
        let n_rows = column.len();
        let mut block = Vec::with_capacity(n_rows * self.width());
        match &self.encoder {
            ColumnEncoder::Numeric(scaler) => {
                block.extend(numeric_cells(column).into_iter().map(|v| scaler.transform(v)));
            }
            ColumnEncoder::Boolean => {
                block.extend(column.values.iter().map(|v| match as_bool(v) {
                    Some(true) => 1.0,
                    _ => 0.0,
                }));
            }
            ColumnEncoder::OneHot(enc) => {
                for label in label_cells(column) {
                    enc.encode_into(label.as_deref(), &mut block);
                }
            }
            ColumnEncoder::MinHash(enc) => {
                for label in label_cells(column) {
                    enc.encode_into(label.as_deref(), &mut block);
                }
            }
            ColumnEncoder::Text(enc) => {
                for label in label_cells(column) {
                    block.extend(enc.encode(label.as_deref()));
                }
            }
            ColumnEncoder::DateTime(scalers) => {
                for parts in date_cells(column) {
                    for (k, scaler) in scalers.iter().enumerate() {
                        block.push(scaler.transform(parts.map(|p| p[k])));
                    }
                }
            }
            ColumnEncoder::MultiLabel(enc) => {
                block = enc.transform(&list_cells(column));
            }
        }
        block
    }
}

/// Fitted dirty-table vectorizer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirtyVectorizer {
    columns: Vec<FittedColumn>,
}

impl DirtyVectorizer {
    /// Classify, fit and encode `table` in one pass
    ///
    /// No text routing happens here: prose-looking columns are treated as
    /// categorical. Use [`DirtyVectorizer::fit_transform_profiled`] with
    /// routed profiles to enable the sentence encoder.
    pub fn fit_transform(table: &Table, config: &VectorizerConfig) -> Result<(Matrix, Self)> {
        let profiles: Vec<ColumnProfile> = classify_table(table, config.cardinality_threshold)
            .into_iter()
            .map(|p| {
                if p.kind == ColumnKind::Text {
                    p.demoted(config.cardinality_threshold)
                } else {
                    p
                }
            })
            .collect();
        Self::fit_transform_profiled(table, &profiles, config)
    }

    /// Fit and encode `table` using already decided column kinds
    pub fn fit_transform_profiled(
        table: &Table,
        profiles: &[ColumnProfile],
        config: &VectorizerConfig,
    ) -> Result<(Matrix, Self)> {
        if table.n_rows() == 0 {
            return Err(Error::featurization("cannot featurize a table with no rows"));
        }
        if table.n_cols() == 0 {
            return Err(Error::featurization("cannot featurize a table with no columns"));
        }

        let mut columns = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let column = table.column(&profile.name).ok_or_else(|| {
                Error::config(format!("profiled column '{}' is not in the table", profile.name))
            })?;
            columns.push(FittedColumn::fit(column, profile.kind, config)?);
        }

        let vectorizer = Self { columns };
        if vectorizer.n_features() == 0 {
            return Err(Error::featurization(format!(
                "no usable columns left after encoding {:?}; every column was empty",
                table.column_names()
            )));
        }

        let matrix = vectorizer.transform(table)?;
        info!(
            rows = matrix.n_rows(),
            columns = table.n_cols(),
            features = matrix.n_cols(),
            "fitted dirty-table vectorizer"
        );
        Ok((matrix, vectorizer))
    }

    /// Encode new rows with the fitted encoders
    ///
    /// `table` must contain every fitted column; extra columns are ignored.
    pub fn transform(&self, table: &Table) -> Result<Matrix> {
        let mut blocks = Vec::with_capacity(self.columns.len());
        for fitted in &self.columns {
            let column = table.column(&fitted.name).ok_or_else(|| {
                Error::config(format!(
                    "column '{}' was present at fit time but is missing from the table",
                    fitted.name
                ))
            })?;
            let block = fitted.encode(column);
            blocks.push(Matrix::new(table.n_rows(), fitted.feature_names.clone(), block)?);
        }
        if blocks.is_empty() {
            return Ok(Matrix::empty(table.n_rows()));
        }
        Matrix::hstack(&blocks)
    }

    pub fn columns(&self) -> &[FittedColumn] {
        &self.columns
    }

    pub fn column_kinds(&self) -> Vec<(&str, ColumnKind)> {
        self.columns.iter().map(|c| (c.name.as_str(), c.kind)).collect()
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .flat_map(|c| c.feature_names.iter().map(String::as_str))
            .collect()
    }

    pub fn n_features(&self) -> usize {
        self.columns.iter().map(FittedColumn::width).sum()
    }
}

fn numeric_cells(column: &Column) -> Vec<Option<f64>> {
    column.values.iter().map(as_f64).collect()
}

fn label_cells(column: &Column) -> Vec<Option<String>> {
    column.values.iter().map(as_label).collect()
}

fn list_cells(column: &Column) -> Vec<Vec<String>> {
    column.values.iter().map(as_labels).collect()
}

fn date_cells(column: &Column) -> Vec<Option<[f64; 6]>> {
    column
        .values
        .iter()
        .map(|v| v.as_str().and_then(parse_datetime).map(|dt| date_parts(&dt)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dirty_table() -> Table {
        Table::from_columns(vec![
            Column::new("num", vec![json!(0.5), json!(1.5), json!(null), json!(3.5)]),
            Column::new("flag", vec![json!(true), json!("False"), json!(true), json!(null)]),
            Column::new("char", vec![json!("a"), json!("b"), json!("c"), json!("a")]),
            Column::new("tags", vec![json!(["x"]), json!(["1", "2"]), json!(["y"]), json!([])]),
            Column::new(
                "when",
                vec![
                    json!("2018-01-01 00:00:00"),
                    json!("2018-01-02 00:00:00"),
                    json!("2018-01-03 00:00:00"),
                    json!("2018-01-05 00:00:00"),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_fit_transform_widths() {
        let (m, enc) = DirtyVectorizer::fit_transform(&dirty_table(), &VectorizerConfig::default()).unwrap();
        // num 1 + flag 1 + char 3 + tags 4 + date parts 6
        assert_eq!(m.shape(), (4, 15));
        assert_eq!(enc.n_features(), 15);
        assert!(m.is_finite());
        assert_eq!(
            enc.column_kinds(),
            vec![
                ("num", ColumnKind::Numeric),
                ("flag", ColumnKind::Boolean),
                ("char", ColumnKind::CategoricalLow),
                ("tags", ColumnKind::List),
                ("when", ColumnKind::DateTime),
            ]
        );
        // null imputed with the median
        assert_eq!(m.get(2, 0), 1.5);
        assert_eq!(m.column(1), vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_high_cardinality_routed_to_minhash() {
        let config = VectorizerConfig {
            cardinality_threshold: 2,
            n_topics: 5,
            ..VectorizerConfig::default()
        };
        let (m, enc) = DirtyVectorizer::fit_transform(&dirty_table(), &config).unwrap();
        assert_eq!(enc.column_kinds()[2], ("char", ColumnKind::CategoricalHigh));
        assert_eq!(m.n_cols(), 1 + 1 + 5 + 4 + 6);
    }

    #[test]
    fn test_transform_reuses_state() {
        let (fitted, enc) = DirtyVectorizer::fit_transform(&dirty_table(), &VectorizerConfig::default()).unwrap();
        let again = enc.transform(&dirty_table()).unwrap();
        assert_eq!(fitted, again);

        let new_rows = Table::from_columns(vec![
            Column::new("num", vec![json!(100)]),
            Column::new("flag", vec![json!(false)]),
            Column::new("char", vec![json!("zzz")]),
            Column::new("tags", vec![json!(["x", "never-seen"])]),
            Column::new("when", vec![json!("2019-06-01")]),
        ])
        .unwrap();
        let m = enc.transform(&new_rows).unwrap();
        assert_eq!(m.shape(), (1, 15));
        // unseen category and unseen label are silently zero
        assert_eq!(&m.row(0)[2..5], &[0.0, 0.0, 0.0]);
        assert_eq!(m.row(0)[5..9].iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_transform_missing_column() {
        let (_, enc) = DirtyVectorizer::fit_transform(&dirty_table(), &VectorizerConfig::default()).unwrap();
        let err = enc.transform(&dirty_table().without(&["char"])).unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("char")));
    }

    #[test]
    fn test_scalers_keep_shape() {
        for scaler in ScalerKind::ALL {
            let config = VectorizerConfig {
                scaler,
                ..VectorizerConfig::default()
            };
            let (m, _) = DirtyVectorizer::fit_transform(&dirty_table(), &config).unwrap();
            assert_eq!(m.shape(), (4, 15), "scaler {scaler}");
            assert!(m.is_finite(), "scaler {scaler}");
        }
    }

    #[test]
    fn test_empty_inputs_fail() {
        let empty = Table::from_columns(vec![Column::new("a", vec![])]).unwrap();
        assert!(matches!(
            DirtyVectorizer::fit_transform(&empty, &VectorizerConfig::default()),
            Err(Error::Featurization(_))
        ));

        let all_missing = Table::from_columns(vec![Column::new("a", vec![json!(null), json!("")])]).unwrap();
        assert!(matches!(
            DirtyVectorizer::fit_transform(&all_missing, &VectorizerConfig::default()),
            Err(Error::Featurization(_))
        ));
    }

    #[test]
    fn test_state_serializes() {
        let (_, enc) = DirtyVectorizer::fit_transform(&dirty_table(), &VectorizerConfig::default()).unwrap();
        let json = serde_json::to_string(&enc).unwrap();
        let parsed: DirtyVectorizer = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, enc);
    }
}
