//! Featurization pipelines
//!
//! Two entry points, differing only in how prose is treated:
//!
//! - [`process_dirty_tables`]: classifier + vectorizer, prose handled as
//!   categorical;
//! - [`process_textual_or_other_tables`]: classifier + text router +
//!   vectorizer, prose routed to the sentence encoder when the router agrees.
//!
//! Both encode an optional target table with an independently fitted
//! vectorizer using `cardinality_threshold_target` and no scaling.

use crate::config::EncodeConfig;
use crate::kind::classify_table;
use crate::router::{route_text, TextRouting};
use crate::scaler::ScalerKind;
use crate::vectorizer::{DirtyVectorizer, VectorizerConfig};
use featgraph_core::{Error, Matrix, Result, Table};

/// Feature and target matrices with their fitted encoders
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub features: Matrix,
    pub target: Option<Matrix>,
    pub encoder: DirtyVectorizer,
    pub target_encoder: Option<DirtyVectorizer>,
}

impl Encoded {
    /// Re-apply the fitted encoders to new rows
    pub fn transform(&self, table: &Table, y: Option<&Table>) -> Result<(Matrix, Option<Matrix>)> {
        let features = self.encoder.transform(table)?;
        let target = transform_target(self.target_encoder.as_ref(), y, table.n_rows())?;
        Ok((features, target))
    }
}

/// Encode with the generic vectorizer only
pub fn process_dirty_tables(table: &Table, y: Option<&Table>, config: &EncodeConfig) -> Result<Encoded> {
    config.validate()?;
    check_target_rows(table, y)?;

    let (features, encoder) = DirtyVectorizer::fit_transform(table, &feature_config(config))?;
    let (target, target_encoder) = encode_target(y, config)?;

    Ok(Encoded {
        features,
        target,
        encoder,
        target_encoder,
    })
}

/// Encode with text routing enabled
pub fn process_textual_or_other_tables(
    table: &Table,
    y: Option<&Table>,
    config: &EncodeConfig,
) -> Result<Encoded> {
    config.validate()?;
    check_target_rows(table, y)?;

    let routing = TextRouting {
        confidence: config.confidence,
        min_words: config.min_words,
    };
    let profiles = classify_table(table, config.cardinality_threshold);
    let profiles = route_text(table, profiles, &routing, config.cardinality_threshold)?;

    let (features, encoder) =
        DirtyVectorizer::fit_transform_profiled(table, &profiles, &feature_config(config))?;
    let (target, target_encoder) = encode_target(y, config)?;

    Ok(Encoded {
        features,
        target,
        encoder,
        target_encoder,
    })
}

fn feature_config(config: &EncodeConfig) -> VectorizerConfig {
    VectorizerConfig {
        cardinality_threshold: config.cardinality_threshold,
        n_topics: config.n_topics,
        scaler: config.use_scaler,
        model_name: config.model_name.clone(),
    }
}

fn target_config(config: &EncodeConfig) -> VectorizerConfig {
    VectorizerConfig {
        cardinality_threshold: config.cardinality_threshold_target,
        n_topics: config.n_topics,
        scaler: ScalerKind::None,
        model_name: config.model_name.clone(),
    }
}

/// Target rows must line up with feature rows
pub fn check_target_rows(table: &Table, y: Option<&Table>) -> Result<()> {
    match y {
        Some(y) if y.n_rows() != table.n_rows() => Err(Error::shape(
            "target table must have one row per feature row",
            table.n_rows(),
            y.n_rows(),
        )),
        _ => Ok(()),
    }
}

/// Fit an independent vectorizer on the target table, if any
pub fn encode_target(y: Option<&Table>, config: &EncodeConfig) -> Result<(Option<Matrix>, Option<DirtyVectorizer>)> {
    match y {
        Some(y) => {
            let (matrix, encoder) = DirtyVectorizer::fit_transform(y, &target_config(config))?;
            Ok((Some(matrix), Some(encoder)))
        }
        None => Ok((None, None)),
    }
}

/// Re-apply a fitted target vectorizer
pub fn transform_target(
    encoder: Option<&DirtyVectorizer>,
    y: Option<&Table>,
    n_rows: usize,
) -> Result<Option<Matrix>> {
    match (encoder, y) {
        (Some(encoder), Some(y)) => {
            if y.n_rows() != n_rows {
                return Err(Error::shape("target table must have one row per feature row", n_rows, y.n_rows()));
            }
            encoder.transform(y).map(Some)
        }
        (None, Some(_)) => Err(Error::featurization(
            "a target table was given but no target encoder was fitted",
        )),
        (_, None) => Ok(None),
    }
}
