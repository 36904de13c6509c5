/// Every exported API type, in the order the frontend bundle lists them
pub const API_TYPE_NAMES: &[&str] = &[
    "AgentCreate",
    "Agent",
    "AgentWithMessages",
    "DeleteResponse",
    "Source",
    "MessageCreate",
    "Message",
    "ErrorResponse",
    "HealthResponse",
];

pub fn generate_typescript_definitions(
    type_names: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    if type_names.is_empty() {
        return Err("No type names provided".into());
    }

    let mut definitions = Vec::new();

    for name in type_names {
        let type_def = export_type(name)?;
        let cleaned = clean_type(type_def);

        if !cleaned.trim().is_empty() {
            definitions.push(cleaned);
        }
    }

    Ok(definitions.join("\n\n"))
}

fn export_type(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    use crate::*;

    let result = match name {
        "AgentCreate" => AgentCreate::export_to_string()?,
        "Agent" => Agent::export_to_string()?,
        "AgentWithMessages" => AgentWithMessages::export_to_string()?,
        "DeleteResponse" => DeleteResponse::export_to_string()?,

        "Source" => Source::export_to_string()?,
        "MessageCreate" => MessageCreate::export_to_string()?,
        "Message" => Message::export_to_string()?,

        "ErrorResponse" => ErrorResponse::export_to_string()?,
        "HealthResponse" => HealthResponse::export_to_string()?,

        _ => {
            return Err(format!(
                "Unknown type: '{}'. Available types can be found in shared-types/src/",
                name
            )
            .into());
        }
    };

    Ok(result)
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .cloned()
        .collect();

    filtered.join("\n").trim().to_string()
}
