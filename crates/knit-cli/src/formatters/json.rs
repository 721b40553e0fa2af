//! JSON formatter for analysis results.

use serde::Serialize;

pub struct JsonFormatter;

/// Prints `value` as pretty JSON on stdout, the same shape the HTTP API
/// returns.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing results: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use knit_core::{Canvas, ExtractedComponent, GraphBuilder};
    use serde_json::Value;

    #[test]
    fn test_result_wire_shape() {
        let result = GraphBuilder::seeded(Canvas::default(), 3)
            .build([ExtractedComponent::new("Foo").with_dependencies(["bar"])]);

        let value: Value = serde_json::to_value(&result).unwrap();

        let node = &value["nodes"][0];
        assert_eq!(node["id"], "Foo");
        assert_eq!(node["label"], "Foo");
        assert_eq!(node["severity"], "normal");
        assert!(node["x"].is_f64());
        assert!(node["issues"].as_array().unwrap().is_empty());

        let edge = &value["edges"][0];
        assert_eq!(edge["id"], "Foo_bar");
        assert_eq!(edge["source"], "Foo");
        assert_eq!(edge["target"], "bar");
        assert_eq!(edge["label"], "Foo → bar");
        assert_eq!(edge["thickness"], 1);

        assert!(value["errors"].as_array().unwrap().is_empty());
        assert!(value["suggestions"].as_array().unwrap().is_empty());
    }
}
