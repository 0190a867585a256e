use featgraph_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which table of a graph an operation applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Nodes,
    Edges,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Nodes => "nodes",
            Kind::Edges => "edges",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nodes" => Ok(Kind::Nodes),
            "edges" => Ok(Kind::Edges),
            other => Err(Error::config(format!(
                "kind must be 'nodes' or 'edges', got '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("nodes".parse::<Kind>().unwrap(), Kind::Nodes);
        assert_eq!("Edges".parse::<Kind>().unwrap(), Kind::Edges);
        assert!(matches!("vertices".parse::<Kind>(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&Kind::Edges).unwrap(), "\"edges\"");
        let kind: Kind = serde_json::from_str("\"nodes\"").unwrap();
        assert_eq!(kind.to_string(), "nodes");
    }
}
