//! Prompt templates for the insight and report generators

use crate::models::{InsightType, ReportType};

pub const INSIGHT_SYSTEM: &str =
    "You are an expert assistant in hydrogen safety and compliance insights.";

fn insight_instructions(insight_type: InsightType) -> &'static str {
    match insight_type {
        InsightType::CodeReferences => "
Analyze the conversation below and provide a detailed list of applicable codes, standards, or regulations.
Include their relevance to the context and suggest additional applicable standards if any. Use bullet points for clarity.",
        InsightType::RecommendedActions => "
Based on the conversation, provide a list of actionable recommendations.
For each, include priority (High/Medium/Low) and a brief explanation. Use the format:
- **Action Item**: Title
  - **Priority**: High/Medium/Low
  - **Details**: Explanation and reasoning.",
        InsightType::GeneralInsights => "
Summarize the conversation focusing on:
1. Key themes and recurring topics.
2. Critical challenges or risks.
3. Technical takeaways.
4. Outstanding questions or gaps for follow-up.
Organize insights under clear headers.",
    }
}

pub fn insight_prompt(insight_type: InsightType, transcript: &str) -> String {
    format!(
        "
You are an expert in hydrogen safety and compliance.
Analyze the following conversation and generate insights based on the request type.

---

**Conversation History**:
{transcript}

---

**Insight Request**:
{instructions}

Respond concisely and clearly in the requested format.
",
        transcript = transcript,
        instructions = insight_instructions(insight_type),
    )
}

/// System instruction for a single-step report
pub fn report_system(report_type: ReportType) -> &'static str {
    match report_type {
        ReportType::Summary => {
            "You are a professional technical report writer specializing in hydrogen engineering."
        }
        ReportType::Communication => {
            "You are a professional communicator skilled at writing informal summaries for email sharing."
        }
        ReportType::Custom | ReportType::Project => {
            "You are a versatile technical assistant skilled at generating customized reports."
        }
    }
}

pub fn summary_prompt(project_json: &str, transcript: &str) -> String {
    format!(
        "
Write a **comprehensive summary report** for the following hydrogen project and its associated messages.

**Project Details**: {project_json}
**Thread Conversation**:
{transcript}

The summary must include:
1. Main topics discussed in the conversation.
2. Key technical findings or standards mentioned.
3. Important conclusions and actionable next steps.
4. A professional tone with structured sections.
"
    )
}

pub fn communication_prompt(project_json: &str, transcript: &str) -> String {
    format!(
        "
Write an **informal communication summary** of the project thread, highlighting:
1. Main research findings or discussion points.
2. Big questions or potential safety concerns.
3. Relevant standards or codes.
4. Recommended next steps.

**Project Details**: {project_json}
**Thread Conversation**:
{transcript}

Keep it professional but conversational, suitable for internal email communication.
"
    )
}

pub fn custom_prompt(custom_request: &str, project_json: &str, transcript: &str) -> String {
    format!(
        "
Using the provided project details and conversation history, create a report tailored to the following custom request:
\"{custom_request}\"

**Project Details**: {project_json}
**Thread Conversation**:
{transcript}

Ensure the report is professional, detailed, and tailored to the custom request.
"
    )
}

pub const SECTIONS_SYSTEM: &str =
    "You are a professional technical writer specializing in hydrogen engineering and safety.";
pub const DRAFT_SYSTEM: &str =
    "You are a professional technical writer specializing in hydrogen engineering reports.";
pub const REFERENCES_SYSTEM: &str = "You are a technical documentation specialist.";
pub const REFINE_SYSTEM: &str = "You are a professional editor.";

/// Section taxonomy offered to the planning stage
pub const REPORT_SECTION_CATEGORIES: [&str; 7] = [
    "Engineering Codes and Standards",
    "Safety and Risk Assessment",
    "Environmental Compliance and Permitting",
    "Technical Process Analysis",
    "Project Management Recommendations",
    "References and Citations (all codes, standards, and regulations mentioned)",
    "Other Relevant Topics (if applicable)",
];

pub fn sections_prompt(project_json: &str, transcript: &str) -> String {
    let categories = REPORT_SECTION_CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "
Based on the following project details and conversation, identify the most relevant sections to include in a detailed engineering report. For each section, provide a short description of its purpose and what content it should include. Exclude irrelevant sections.

**General Categories**:
{categories}

**Inputs**:
- Project Details: {project_json}
- Thread Conversation:
{transcript}

**Output Format**:
Provide a structured list of relevant sections with descriptions.
"
    )
}

pub fn draft_prompt(sections: &str, project_json: &str, transcript: &str) -> String {
    format!(
        "
You are an expert technical report writer. Using the relevant sections identified below, draft a detailed, multipage report. Each section must be comprehensive, include all key information from the conversation and project details, and maintain a formal tone.

**Relevant Sections**:
{sections}

**Project Details**:
{project_json}

**Thread Conversation**:
{transcript}

### Report Requirements:
- Include all relevant sections identified.
- Provide in-depth analysis, citations, and actionable recommendations.
- Use structured formatting: sections, headers, bullet points, and tables where applicable.
- Focus on thoroughness and detail. Ensure no insights from the conversation are omitted.

Generate the detailed report.
"
    )
}

pub fn references_prompt(draft: &str) -> String {
    format!(
        "
From the following draft report, extract and compile a comprehensive list of all mentioned codes, standards, rules, regulations, and other referenced bodies of work. Each item should include its full name and, if possible, a brief description of its relevance to the project.

**Draft Report**:
{draft}

Provide the extracted references in a structured list format.
"
    )
}

pub fn refine_prompt(draft: &str, references: &str) -> String {
    format!(
        "
You are an expert editor. Refine the draft report below to ensure it is polished, thorough, and professional. Expand any underdeveloped sections, and integrate the references section as a formal part of the report.

**Draft Report**:
{draft}

**References Section**:
{references}

Refine and enhance the report, ensuring all insights and references are included.
"
    )
}
