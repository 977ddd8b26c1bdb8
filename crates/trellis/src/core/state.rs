use std::fmt;

use convert_case::{Case, Casing};

/// Name shown for nodes whose widget name converts to nothing.
const FALLBACK_NAME: &str = "node";

/// A display name for a node: lowercase ASCII letters, digits and
/// underscores. Names appear in tree dumps and log lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName {
    /// Normalized name.
    name: String,
}

impl NodeName {
    /// Convert an arbitrary string, usually a Rust type name, into a node
    /// name. The string is snake-cased and stripped of anything else.
    pub fn convert(name: &str) -> Self {
        let name: String = name
            .to_case(Case::Snake)
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
            .collect();
        if name.is_empty() {
            return Self {
                name: FALLBACK_NAME.into(),
            };
        }
        Self { name }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_type_names() {
        assert_eq!(NodeName::convert("ListRow"), "list_row");
        assert_eq!(NodeName::convert("ScrollContainer Demo"), "scroll_container_demo");
        assert_eq!(NodeName::convert(""), "node");
        assert_eq!(NodeName::convert("<>!"), "node");
    }
}
