use crate::resolver::types::ResolvedParameters;

/// Suggests a struct declaration holding every resolved parameter with the
/// runtime type of its value.
pub fn describe_types(resolved: &ResolvedParameters) -> String {
    let mut text = String::from("Add to your struct:\n\n");
    text.push_str("struct ResolvedParameters {\n");
    for (name, value) in resolved.iter() {
        text.push_str(&format!("    {name}: {},\n", value.type_name()));
    }
    text.push_str("}\n");
    text
}
