//! Node and edge featurization
//!
//! Nodes go through the text-routing pipeline directly. Edges additionally
//! get an endpoint block: a multi-label indicator over the source and
//! destination labels of each row, stacked in front of the vectorized
//! remaining columns.

use featgraph_core::cell::as_label;
use featgraph_core::{Error, Matrix, Result, Table};
use featgraph_features::{
    check_target_rows, encode_target, process_textual_or_other_tables, transform_target, DirtyVectorizer,
    EncodeConfig, MultiLabelBinarizer,
};
use serde::{Deserialize, Serialize};

/// Features, optional target and the fitted state that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Featurization<E> {
    pub features: Matrix,
    pub target: Option<Matrix>,
    pub encoder: E,
    pub target_encoder: Option<DirtyVectorizer>,
}

pub type NodeFeaturization = Featurization<DirtyVectorizer>;
pub type EdgeFeaturization = Featurization<EdgeEncoders>;

/// Fitted edge state: the endpoint binarizer and the vectorizer for the
/// non-endpoint columns, if any were left
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeEncoders {
    pub source: String,
    pub destination: String,
    pub endpoints: MultiLabelBinarizer,
    pub vectorizer: Option<DirtyVectorizer>,
}

impl EdgeEncoders {
    fn encode_endpoints(&self, table: &Table) -> Result<Matrix> {
        let labels = endpoint_labels(table, &self.source, &self.destination)?;
        let data = self.endpoints.transform(&labels);
        Matrix::new(table.n_rows(), self.endpoints.feature_names("endpoint"), data)
    }
}

impl NodeFeaturization {
    /// Encode new node rows with the fitted state
    pub fn transform(&self, table: &Table, y: Option<&Table>) -> Result<(Matrix, Option<Matrix>)> {
        check_target_rows(table, y)?;
        let features = self.encoder.transform(table)?;
        let target = transform_target(self.target_encoder.as_ref(), y, table.n_rows())?;
        Ok((features, target))
    }
}

impl EdgeFeaturization {
    /// Encode new edge rows with the fitted state
    pub fn transform(&self, table: &Table, y: Option<&Table>) -> Result<(Matrix, Option<Matrix>)> {
        check_target_rows(table, y)?;
        let mut blocks = vec![self.encoder.encode_endpoints(table)?];
        if let Some(vectorizer) = &self.encoder.vectorizer {
            blocks.push(vectorizer.transform(table)?);
        }
        let features = Matrix::hstack(&blocks)?;
        let target = transform_target(self.target_encoder.as_ref(), y, table.n_rows())?;
        Ok((features, target))
    }
}

fn restrict(table: &Table, use_columns: Option<&[&str]>) -> Result<Table> {
    match use_columns {
        Some(names) => table.select(names),
        None => Ok(table.clone()),
    }
}

/// Fit node features on `table`, restricted to `use_columns` when given
pub fn featurize_nodes(
    table: &Table,
    y: Option<&Table>,
    use_columns: Option<&[&str]>,
    config: &EncodeConfig,
) -> Result<NodeFeaturization> {
    let selected = restrict(table, use_columns)?;
    let encoded = process_textual_or_other_tables(&selected, y, config)?;

    tracing::info!(
        rows = encoded.features.n_rows(),
        features = encoded.features.n_cols(),
        target = encoded.target.is_some(),
        "featurized nodes"
    );

    Ok(Featurization {
        features: encoded.features,
        target: encoded.target,
        encoder: encoded.encoder,
        target_encoder: encoded.target_encoder,
    })
}

/// Fit edge features: endpoint labels plus the selected non-endpoint columns
pub fn featurize_edges(
    table: &Table,
    source: &str,
    destination: &str,
    y: Option<&Table>,
    use_columns: Option<&[&str]>,
    config: &EncodeConfig,
) -> Result<EdgeFeaturization> {
    config.validate()?;
    check_target_rows(table, y)?;

    let labels = endpoint_labels(table, source, destination)?;
    let endpoints = MultiLabelBinarizer::fit(&labels);
    let endpoint_block = Matrix::new(
        table.n_rows(),
        endpoints.feature_names("endpoint"),
        endpoints.transform(&labels),
    )?;

    let rest = restrict(table, use_columns)?.without(&[source, destination]);
    let blank: Vec<&str> = rest
        .columns()
        .iter()
        .filter(|c| c.is_blank())
        .map(|c| c.name.as_str())
        .collect();
    if !blank.is_empty() {
        tracing::debug!(columns = ?blank, "dropping edge columns with no values");
    }
    let rest = rest.without(&blank);
    let (features, vectorizer, target, target_encoder) = if rest.n_cols() == 0 {
        tracing::debug!("no edge columns besides the endpoints, using endpoint features only");
        let (target, target_encoder) = encode_target(y, config)?;
        (endpoint_block, None, target, target_encoder)
    } else {
        let encoded = process_textual_or_other_tables(&rest, y, config)?;
        let features = Matrix::hstack(&[endpoint_block, encoded.features])?;
        (features, Some(encoded.encoder), encoded.target, encoded.target_encoder)
    };

    tracing::info!(
        rows = features.n_rows(),
        features = features.n_cols(),
        endpoints = endpoints.width(),
        target = target.is_some(),
        "featurized edges"
    );

    Ok(Featurization {
        features,
        target,
        encoder: EdgeEncoders {
            source: source.to_string(),
            destination: destination.to_string(),
            endpoints,
            vectorizer,
        },
        target_encoder,
    })
}

fn endpoint_labels(table: &Table, source: &str, destination: &str) -> Result<Vec<Vec<String>>> {
    let column = |name: &str| {
        table
            .column(name)
            .ok_or_else(|| Error::config(format!("edge table has no endpoint column '{name}'")))
    };
    let (src, dst) = (column(source)?, column(destination)?);
    Ok(src
        .values
        .iter()
        .zip(&dst.values)
        .map(|(s, d)| as_label(s).into_iter().chain(as_label(d)).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use featgraph_core::Column;
    use serde_json::json;

    fn edges() -> Table {
        Table::from_columns(vec![
            Column::new("src", vec![json!("a"), json!("b"), json!("c"), json!("a")]),
            Column::new("dst", vec![json!("b"), json!("c"), json!("a"), json!("c")]),
            Column::new("color", vec![json!("red"), json!("blue"), json!("red"), json!("green")]),
            Column::new("weight", vec![json!(1.0), json!(2.0), json!(0.5), json!(4.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_edge_features_stack_endpoints_first() {
        let f = featurize_edges(&edges(), "src", "dst", None, None, &EncodeConfig::default()).unwrap();
        assert_eq!(f.encoder.endpoints.classes(), &["a", "b", "c"]);
        // 3 endpoint labels, 3 colors, 1 weight
        assert_eq!(f.features.shape(), (4, 7));
        assert_eq!(&f.features.row(0)[..3], &[1.0, 1.0, 0.0]);
        assert!(f.encoder.vectorizer.is_some());
    }

    #[test]
    fn test_endpoint_only_edges() {
        let f = featurize_edges(&edges(), "src", "dst", None, Some(&["src", "dst"]), &EncodeConfig::default())
            .unwrap();
        assert!(f.encoder.vectorizer.is_none());
        assert_eq!(f.features.n_cols(), 3);
    }

    #[test]
    fn test_blank_edge_columns_fall_back_to_endpoints() {
        let table = Table::from_columns(vec![
            Column::new("src", vec![json!("a"), json!("b"), json!("c")]),
            Column::new("dst", vec![json!("b"), json!("c"), json!("a")]),
            Column::new("note", vec![json!(null), json!(""), json!(null)]),
        ])
        .unwrap();
        let y = Table::from_columns(vec![Column::new("label", vec![json!("x"), json!("y"), json!("x")])]).unwrap();

        let f = featurize_edges(&table, "src", "dst", Some(&y), None, &EncodeConfig::default()).unwrap();
        assert!(f.encoder.vectorizer.is_none());
        assert_eq!(f.features.shape(), (3, 3));
        assert_eq!(f.target.as_ref().map(Matrix::shape), Some((3, 2)));

        let (again, target) = f.transform(&table, Some(&y)).unwrap();
        assert_eq!(again, f.features);
        assert_eq!(target, f.target);

        // a blank column next to a usable one is dropped, the usable one stays
        let f = featurize_edges(&edges(), "src", "dst", None, None, &EncodeConfig::default()).unwrap();
        let mut wider = edges().columns().to_vec();
        wider.push(Column::new("note", vec![json!(null); 4]));
        let wider = Table::from_columns(wider).unwrap();
        let g = featurize_edges(&wider, "src", "dst", None, None, &EncodeConfig::default()).unwrap();
        assert_eq!(g.features, f.features);
    }

    #[test]
    fn test_edge_transform_drops_unseen_endpoints() {
        let f = featurize_edges(&edges(), "src", "dst", None, None, &EncodeConfig::default()).unwrap();
        let (same, _) = f.transform(&edges(), None).unwrap();
        assert_eq!(same, f.features);

        let unseen = Table::from_columns(vec![
            Column::new("src", vec![json!("a")]),
            Column::new("dst", vec![json!("zz")]),
            Column::new("color", vec![json!("red")]),
            Column::new("weight", vec![json!(1.0)]),
        ])
        .unwrap();
        let (m, _) = f.transform(&unseen, None).unwrap();
        assert_eq!(&m.row(0)[..3], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_endpoint_column() {
        let err = featurize_edges(&edges(), "from", "dst", None, None, &EncodeConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_node_subset() {
        let f = featurize_nodes(&edges(), None, Some(&["color"]), &EncodeConfig::default()).unwrap();
        assert_eq!(f.encoder.column_kinds().len(), 1);
        assert!(featurize_nodes(&edges(), None, Some(&["nope"]), &EncodeConfig::default()).is_err());
    }
}
