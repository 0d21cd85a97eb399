use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE (e.g., 'search.restarts=4').")]
    InvalidAssignment(String),

    #[error("Component {index} of key '{key}' is empty.")]
    EmptyKeyComponent { key: String, index: usize },
}

/// A `--set` override split into its dotted key path and raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub path: Vec<&'a str>,
    pub value: &'a str,
}

pub fn parse_assignment(input: &str) -> Result<Assignment<'_>, ParseError> {
    let Some((key, value)) = input.split_once('=') else {
        return Err(ParseError::InvalidAssignment(input.to_string()));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::InvalidAssignment(input.to_string()));
    }
    let path: Vec<&str> = key.split('.').map(str::trim).collect();
    if let Some(index) = path.iter().position(|part| part.is_empty()) {
        return Err(ParseError::EmptyKeyComponent {
            key: key.to_string(),
            index,
        });
    }
    Ok(Assignment {
        path,
        value: value.trim(),
    })
}

/// Reads a raw override value as a TOML literal, falling back to a plain
/// string for bare words such as `depth-first`.
pub fn parse_value(raw: &str) -> toml::Value {
    toml::from_str::<toml::Table>(&format!("value = {}", raw))
        .ok()
        .and_then(|mut table| table.remove("value"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_first_equals() {
        let a = parse_assignment("depth-first.pruning.alpha = 0.7").unwrap();
        assert_eq!(a.path, vec!["depth-first", "pruning", "alpha"]);
        assert_eq!(a.value, "0.7");

        let a = parse_assignment("search.algorithm=a=b").unwrap();
        assert_eq!(a.value, "a=b");
    }

    #[test]
    fn malformed_assignments_are_rejected() {
        assert_eq!(
            parse_assignment("search.seed"),
            Err(ParseError::InvalidAssignment("search.seed".to_string()))
        );
        assert!(matches!(
            parse_assignment("=3"),
            Err(ParseError::InvalidAssignment(_))
        ));
        assert_eq!(
            parse_assignment("search..seed=1"),
            Err(ParseError::EmptyKeyComponent {
                key: "search..seed".to_string(),
                index: 1
            })
        );
    }

    #[test]
    fn values_parse_as_toml_literals() {
        assert_eq!(parse_value("4"), toml::Value::Integer(4));
        assert_eq!(parse_value("0.5"), toml::Value::Float(0.5));
        assert_eq!(parse_value("true"), toml::Value::Boolean(true));
        assert_eq!(parse_value("\"potential\""), toml::Value::String("potential".into()));
        assert_eq!(parse_value("beam-search"), toml::Value::String("beam-search".into()));
        assert!(matches!(parse_value("[\"potential\", \"fold-amount\"]"), toml::Value::Array(a) if a.len() == 2));
    }
}
