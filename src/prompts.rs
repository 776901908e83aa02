pub const IDENTIFY_TEXT: &str = include_str!("../data/prompts/identify_text.txt");
pub const IDENTIFY_IMAGE: &str = include_str!("../data/prompts/identify_image.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
