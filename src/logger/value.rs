//! Values accepted by [`Logger::debug`](super::Logger::debug).

use std::fmt::Debug;

use crate::table::Table;

/// A loggable value, formatted according to its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugValue {
    /// Printed as-is.
    Text(String),
    /// Structural dump: type name, an optional shape, and the pretty body.
    Dump {
        type_name: String,
        shape: Option<String>,
        body: String,
    },
}

impl DebugValue {
    /// Dump any `Debug` value with its type name.
    pub fn dump<T: Debug + ?Sized>(value: &T) -> Self {
        Self::Dump {
            type_name: std::any::type_name::<T>().to_string(),
            shape: None,
            body: format!("{value:#?}"),
        }
    }

    /// Dump a slice, recording its length as the shape.
    pub fn dump_len<T: Debug>(items: &[T]) -> Self {
        Self::dump(items).with_shape(format!("{} items", items.len()))
    }

    /// Attach a shape to a dump. Text values are returned unchanged.
    #[must_use]
    pub fn with_shape(self, shape: impl Into<String>) -> Self {
        match self {
            Self::Dump {
                type_name, body, ..
            } => Self::Dump {
                type_name,
                shape: Some(shape.into()),
                body,
            },
            text @ Self::Text(_) => text,
        }
    }

    /// Render to the text that ends up in the log line.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Dump {
                type_name,
                shape: Some(shape),
                body,
            } => format!("{type_name} [{shape}] {body}"),
            Self::Dump {
                type_name,
                shape: None,
                body,
            } => format!("{type_name} {body}"),
        }
    }
}

impl From<&str> for DebugValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DebugValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&Table> for DebugValue {
    fn from(table: &Table) -> Self {
        Self::Dump {
            type_name: "Table".to_string(),
            shape: Some(format!(
                "{} rows x {} cols",
                table.row_count(),
                table.column_count()
            )),
            body: format!("{:?}", table.headers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_renders_verbatim() {
        assert_eq!(DebugValue::from("plain").render(), "plain");
        assert_eq!(DebugValue::from(String::from("owned")).render(), "owned");
    }

    #[test]
    fn test_dump_includes_type_name_and_body() {
        let rendered = DebugValue::dump(&Some(3u8)).render();
        assert!(rendered.starts_with("core::option::Option<u8>"));
        assert!(rendered.contains("Some("));
        assert!(rendered.contains('3'));
    }

    #[test]
    fn test_dump_len_records_item_count() {
        let value = DebugValue::dump_len(&["red", "blue", "green"]);

        let DebugValue::Dump { shape, .. } = &value else {
            panic!("expected a dump, got {value:?}");
        };
        assert_eq!(shape.as_deref(), Some("3 items"));
        assert!(value.render().starts_with("[&str] [3 items]"));
    }

    #[test]
    fn test_with_shape_only_changes_dumps() {
        let shaped = DebugValue::dump(&(8.0f32, 9.5f32)).with_shape("8 x 9.5 in");
        assert!(shaped.render().starts_with("(f32, f32) [8 x 9.5 in]"));

        let text = DebugValue::from("note").with_shape("ignored");
        assert_eq!(text, DebugValue::Text("note".to_string()));
    }

    #[test]
    fn test_table_renders_shape_and_headers() {
        let table = Table::from_columns(
            vec!["a".to_string(), "b".to_string()],
            vec![
                vec![Some("1".to_string()), None],
                vec![Some("2".to_string()), Some("3".to_string())],
            ],
        )
        .unwrap();

        let rendered = DebugValue::from(&table).render();
        assert_eq!(rendered, r#"Table [2 rows x 2 cols] ["a", "b"]"#);
    }
}
