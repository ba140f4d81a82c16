use crate::phases::PhaseId;

/// Inputs interpolated into a phase prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PromptVariables {
    pub bug_description: String,
    pub system_info: Option<String>,
    pub pdf_content: Option<String>,
}

struct PromptTemplate {
    opening: &'static str,
    uses_system_info: bool,
    closing: &'static str,
}

const PHASE1: PromptTemplate = PromptTemplate {
    opening: "Based on the following bug description and PDF content, suggest some command line fixes:",
    uses_system_info: false,
    closing: "Please provide a list of command line instructions to address this issue.",
};

const PHASE2: PromptTemplate = PromptTemplate {
    opening: "Based on the following bug description, system information, and PDF content, provide personalized remediation steps:",
    uses_system_info: true,
    closing: "Please provide a detailed list of steps to remediate this issue, taking into account the specific system information and PDF content provided.",
};

const PHASE3: PromptTemplate = PromptTemplate {
    opening: "Based on the following bug description and PDF content, generate a list of automated remediation steps:",
    uses_system_info: false,
    closing: "Please provide a detailed list of steps that an automated system would take to remediate this issue with minimal user intervention.",
};

fn template(phase: PhaseId) -> &'static PromptTemplate {
    match phase {
        PhaseId::Phase1 => &PHASE1,
        PhaseId::Phase2 => &PHASE2,
        PhaseId::Phase3 => &PHASE3,
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Whether a phase has what it needs to issue a generation request.
///
/// Every phase needs a bug description; phase 2 also needs system information.
pub fn is_ready(phase: PhaseId, vars: &PromptVariables) -> bool {
    if vars.bug_description.trim().is_empty() {
        return false;
    }
    !template(phase).uses_system_info || present(&vars.system_info).is_some()
}

/// Compose the prompt sent for `phase`. Sections with no content are left out.
pub fn build_prompt(phase: PhaseId, vars: &PromptVariables) -> String {
    let tpl = template(phase);
    let mut prompt = String::new();
    prompt.push_str(tpl.opening);
    prompt.push_str("\n\nBug Description: ");
    prompt.push_str(&vars.bug_description);

    if tpl.uses_system_info {
        if let Some(info) = present(&vars.system_info) {
            prompt.push_str("\n\nSystem Information: ");
            prompt.push_str(info);
        }
    }
    if let Some(pdf) = present(&vars.pdf_content) {
        prompt.push_str("\n\nPDF Content: ");
        prompt.push_str(pdf);
    }

    prompt.push_str("\n\n");
    prompt.push_str(tpl.closing);
    prompt
}

/// Text shown when the provider returns an empty completion.
pub fn empty_result_fallback(phase: PhaseId) -> &'static str {
    match phase {
        PhaseId::Phase2 => "Unable to generate personalized suggestion.",
        _ => "Unable to generate suggestion.",
    }
}

/// Split generated text into remediation steps, dropping blank lines.
pub fn split_steps(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
