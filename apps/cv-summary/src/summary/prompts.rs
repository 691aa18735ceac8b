/// Instruction sent as the system prompt and prefixed to the CV in the user turn.
pub const CV_SUMMARY_SYSTEM: &str = "generate a summary based on CV below in the format eg \
    \"3 years of experience as a {Role} with {list of companies worked at} \
    followed by brief list of projects or types of projects, and in just 1 sentence. \
    based on the following CV: ";

/// Instruction followed by the CV text verbatim. No escaping or truncation.
pub fn build_summary_prompt(cv_text: &str) -> String {
    format!("{CV_SUMMARY_SYSTEM}{cv_text}")
}
