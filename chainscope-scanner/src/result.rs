use crate::error::{Result, ScanError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One node of a call-graph tree: an endpoint plus the calls it reported.
///
/// Field names follow the producer's PascalCase shape. The camelCase aliases
/// cover producers that serialize with default ASP.NET Core naming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyResult {
    #[serde(rename = "URL", alias = "url", alias = "Url")]
    pub url: String,
    #[serde(
        rename = "ExternalDependencies",
        alias = "externalDependencies",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub external_dependencies: Vec<CallOutcome>,
    #[serde(
        rename = "SelfCalled",
        alias = "selfCalled",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub self_called: Vec<CallOutcome>,
}

/// Outcome of a single outbound call.
///
/// `status_code == 0` means the call never connected. Entries in
/// `SelfCalled` own the nested result of the recursive call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome {
    #[serde(rename = "URI", alias = "uri", alias = "Uri")]
    pub uri: String,
    #[serde(rename = "Success", alias = "success")]
    pub success: bool,
    #[serde(rename = "StatusCode", alias = "statusCode")]
    pub status_code: u16,
    #[serde(
        rename = "DependencyResult",
        alias = "dependencyResult",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dependency_result: Option<DependencyResult>,
}

/// Aggregate counts over a whole tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSummary {
    pub nodes: usize,
    pub external_calls: usize,
    pub recursive_calls: usize,
    pub failed_calls: usize,
    pub max_depth: usize,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<CallOutcome>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<CallOutcome>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a payload produced by a chain endpoint.
///
/// Absent or `null` dependency lists become empty lists. Anything else that
/// does not match the schema fails as a whole with `MalformedPayload`.
///
/// Nesting is bounded by serde_json's 128-level recursion limit. Each tree
/// level costs three JSON levels, so payloads deeper than about 42 levels
/// fail with `MalformedPayload`.
pub fn parse(text: &str) -> Result<DependencyResult> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(ScanError::MalformedPayload(format!(
            "expected a JSON object at the top level, found {}",
            json_kind(&value)
        )));
    }
    Ok(serde_json::from_value(value)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl DependencyResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            external_dependencies: Vec::new(),
            self_called: Vec::new(),
        }
    }

    /// A node with no calls of either kind renders nothing.
    pub fn is_empty(&self) -> bool {
        self.external_dependencies.is_empty() && self.self_called.is_empty()
    }

    /// Number of node levels, counting this one.
    pub fn depth(&self) -> usize {
        1 + self
            .self_called
            .iter()
            .filter_map(|call| call.dependency_result.as_ref())
            .map(DependencyResult::depth)
            .max()
            .unwrap_or(0)
    }

    pub fn summary(&self) -> TreeSummary {
        let mut summary = TreeSummary::default();
        self.accumulate(&mut summary, 1);
        summary
    }

    fn accumulate(&self, summary: &mut TreeSummary, level: usize) {
        summary.nodes += 1;
        summary.max_depth = summary.max_depth.max(level);
        summary.external_calls += self.external_dependencies.len();
        summary.recursive_calls += self.self_called.len();

        let failures = self
            .external_dependencies
            .iter()
            .chain(self.self_called.iter())
            .filter(|call| !call.success)
            .count();
        summary.failed_calls += failures;

        for nested in self
            .self_called
            .iter()
            .filter_map(|call| call.dependency_result.as_ref())
        {
            nested.accumulate(summary, level + 1);
        }
    }
}

impl CallOutcome {
    /// Leaf call, as listed under `ExternalDependencies`.
    pub fn external(uri: impl Into<String>, success: bool, status_code: u16) -> Self {
        Self {
            uri: uri.into(),
            success,
            status_code,
            dependency_result: None,
        }
    }

    /// Recursive call owning the result of the endpoint it reached.
    pub fn recursive(
        uri: impl Into<String>,
        success: bool,
        status_code: u16,
        nested: DependencyResult,
    ) -> Self {
        Self {
            uri: uri.into(),
            success,
            status_code,
            dependency_result: Some(nested),
        }
    }

    pub fn failed_to_connect(&self) -> bool {
        self.status_code == 0
    }

    pub fn nested(&self) -> Result<&DependencyResult> {
        self.dependency_result
            .as_ref()
            .ok_or_else(|| ScanError::MissingNestedResult(self.uri.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "URL": "http://a",
        "ExternalDependencies": [
            {"URI": "http://x", "Success": true, "StatusCode": 200}
        ],
        "SelfCalled": [
            {
                "URI": "http://y",
                "Success": false,
                "StatusCode": 0,
                "DependencyResult": {"URL": "http://y", "ExternalDependencies": [], "SelfCalled": []}
            }
        ]
    }"#;

    #[test]
    fn test_parse_full_payload() {
        let tree = parse(SAMPLE).unwrap();

        assert_eq!(tree.url, "http://a");
        assert_eq!(tree.external_dependencies.len(), 1);
        assert_eq!(tree.external_dependencies[0].uri, "http://x");
        assert!(tree.external_dependencies[0].dependency_result.is_none());

        let recursive = &tree.self_called[0];
        assert!(!recursive.success);
        assert!(recursive.failed_to_connect());
        assert_eq!(recursive.nested().unwrap().url, "http://y");
    }

    #[test]
    fn test_parse_camel_case_payload() {
        let text = r#"{
            "url": "http://a",
            "externalDependencies": [{"uri": "http://x", "success": true, "statusCode": 204}],
            "selfCalled": [{
                "uri": "http://b",
                "success": true,
                "statusCode": 200,
                "dependencyResult": {"url": "http://b", "externalDependencies": [], "selfCalled": []}
            }]
        }"#;
        let tree = parse(text).unwrap();

        assert_eq!(tree.external_dependencies[0].status_code, 204);
        assert_eq!(tree.self_called[0].nested().unwrap().url, "http://b");
    }

    #[test]
    fn test_parse_missing_and_null_lists_are_empty() {
        let tree = parse(r#"{"URL": "http://a"}"#).unwrap();
        assert!(tree.is_empty());

        let tree = parse(r#"{"URL": "http://a", "ExternalDependencies": null, "SelfCalled": null}"#)
            .unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_parse_self_called_without_nested_result() {
        let text = r#"{"URL": "a", "SelfCalled": [{"URI": "b", "Success": true, "StatusCode": 200}]}"#;
        let tree = parse(text).unwrap();

        let err = tree.self_called[0].nested().unwrap_err();
        assert!(matches!(err, ScanError::MissingNestedResult(ref uri) if uri == "b"));
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, ScanError::MalformedPayload(_)));
    }

    #[test]
    fn test_parse_rejects_empty_array_fallback() {
        let err = parse("[]").unwrap_err();
        assert!(matches!(err, ScanError::MalformedPayload(ref msg) if msg.contains("an array")));
    }

    #[test]
    fn test_parse_rejects_missing_required_fields() {
        assert!(matches!(
            parse(r#"{"ExternalDependencies": []}"#),
            Err(ScanError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse(r#"{"URL": "a", "ExternalDependencies": [{"URI": "x", "Success": true}]}"#),
            Err(ScanError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_rejects_out_of_range_status_code() {
        let text =
            r#"{"URL": "a", "ExternalDependencies": [{"URI": "x", "Success": true, "StatusCode": -1}]}"#;
        assert!(matches!(parse(text), Err(ScanError::MalformedPayload(_))));
    }

    #[test]
    fn test_parse_rejects_payload_nested_past_json_limit() {
        let mut text = r#"{"URL": "leaf"}"#.to_string();
        for level in 0..100 {
            text = format!(
                r#"{{"URL": "n{level}", "SelfCalled": [{{"URI": "n{level}", "Success": true, "StatusCode": 200, "DependencyResult": {text}}}]}}"#
            );
        }

        assert!(matches!(parse(&text), Err(ScanError::MalformedPayload(_))));
    }

    #[test]
    fn test_serialize_keeps_producer_shape() {
        let tree = parse(SAMPLE).unwrap();
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(json["URL"], "http://a");
        assert_eq!(json["ExternalDependencies"][0]["StatusCode"], 200);
        assert!(json["ExternalDependencies"][0].get("DependencyResult").is_none());
        assert_eq!(json["SelfCalled"][0]["DependencyResult"]["URL"], "http://y");

        let reparsed = parse(&json.to_string()).unwrap();
        assert_eq!(reparsed, tree);
    }

    #[test]
    fn test_depth_and_summary() {
        let leaf = DependencyResult {
            url: "c".to_string(),
            external_dependencies: vec![CallOutcome::external("z", false, 500)],
            self_called: Vec::new(),
        };
        let middle = DependencyResult {
            url: "b".to_string(),
            external_dependencies: Vec::new(),
            self_called: vec![CallOutcome::recursive("c", true, 200, leaf)],
        };
        let root = DependencyResult {
            url: "a".to_string(),
            external_dependencies: vec![CallOutcome::external("x", true, 200)],
            self_called: vec![
                CallOutcome::recursive("b", true, 200, middle),
                CallOutcome::recursive("d", false, 0, DependencyResult::new("d")),
            ],
        };

        assert_eq!(root.depth(), 3);
        assert_eq!(DependencyResult::new("solo").depth(), 1);

        let summary = root.summary();
        assert_eq!(summary.nodes, 4);
        assert_eq!(summary.external_calls, 2);
        assert_eq!(summary.recursive_calls, 3);
        assert_eq!(summary.failed_calls, 2);
        assert_eq!(summary.max_depth, 3);
    }
}
