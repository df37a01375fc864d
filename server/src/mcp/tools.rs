//! MCP Tool Definitions
//!
//! One tool per API operation.

use super::protocol::{PropertySchema, Tool, ToolInputSchema};
use std::collections::HashMap;

pub const ASK_QUESTION: &str = "ask_question";
pub const ADD_DOCUMENT: &str = "add_document";
pub const GET_STATUS: &str = "get_status";

/// Get all available tools
pub fn get_all_tools() -> Vec<Tool> {
    vec![ask_question_tool(), add_document_tool(), get_status_tool()]
}

fn required_string_prop(description: &str) -> PropertySchema {
    PropertySchema {
        property_type: "string".to_string(),
        description: Some(description.to_string()),
        min_length: Some(1),
    }
}

fn ask_question_tool() -> Tool {
    let mut properties = HashMap::new();
    properties.insert(
        "question".to_string(),
        required_string_prop("Question to answer from the knowledge base"),
    );

    Tool {
        name: ASK_QUESTION.to_string(),
        description: Some(
            "Answer a question using retrieved documents. Returns the answer, the \
             documents used as context and the processing latency."
                .to_string(),
        ),
        input_schema: ToolInputSchema {
            schema_type: "object".to_string(),
            properties: Some(properties),
            required: Some(vec!["question".to_string()]),
        },
    }
}

fn add_document_tool() -> Tool {
    let mut properties = HashMap::new();
    properties.insert(
        "text".to_string(),
        required_string_prop("Document text to add to the knowledge base"),
    );

    Tool {
        name: ADD_DOCUMENT.to_string(),
        description: Some(
            "Embed a document and store it for future questions. Returns the assigned id."
                .to_string(),
        ),
        input_schema: ToolInputSchema {
            schema_type: "object".to_string(),
            properties: Some(properties),
            required: Some(vec!["text".to_string()]),
        },
    }
}

fn get_status_tool() -> Tool {
    Tool {
        name: GET_STATUS.to_string(),
        description: Some(
            "Report the active storage backend, document count and pipeline readiness."
                .to_string(),
        ),
        input_schema: ToolInputSchema {
            schema_type: "object".to_string(),
            properties: Some(HashMap::new()),
            required: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_get_all_tools_count() {
        assert_eq!(get_all_tools().len(), 3);
    }

    #[test]
    fn test_tools_have_required_fields() {
        for tool in get_all_tools() {
            assert!(!tool.name.is_empty());
            assert!(tool.description.is_some());
            assert_eq!(tool.input_schema.schema_type, "object");

            let properties = tool.input_schema.properties.unwrap_or_default();
            for required in tool.input_schema.required.unwrap_or_default() {
                assert!(properties.contains_key(&required), "{} lacks {}", tool.name, required);
            }
        }
    }

    #[test]
    fn test_tool_names_are_unique() {
        let names: HashSet<_> = get_all_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(ASK_QUESTION));
        assert!(names.contains(ADD_DOCUMENT));
        assert!(names.contains(GET_STATUS));
    }
}
