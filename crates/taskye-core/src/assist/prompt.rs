// Prompt text sent to the provider.

/// Instruction used in place of an empty message when only a file is sent.
pub const ATTACHMENT_ONLY_MESSAGE: &str =
    "Analyze the attached file and create a ticket based on its content.";

const TICKET_RULES: &str = r#"Return ONLY a valid JSON object in exactly this shape (no markdown, no code fences, no commentary):
{
  "title": "Short summary of the problem (at most 60 characters)",
  "description": "Detailed description of the problem with full context",
  "priority": "High" or "Medium" or "Low",
  "category": "Hardware" or "Software" or "Access" or "Network" or "Other"
}

Priority rules:
- High: critical problems that block work, systems offline, compromised security
- Medium: problems that hurt productivity without fully blocking work
- Low: improvement requests, questions, non-urgent configuration

Category rules:
- Hardware: physical equipment (computer, printer, monitor, etc.)
- Software: programs, applications, systems
- Access: access requests, permissions, passwords, accounts
- Network: connectivity, internet, VPN, servers
- Other: anything that does not fit the categories above

IMPORTANT: return ONLY the JSON, with no explanations, no markdown and no code."#;

/// Build the ticket-extraction prompt. `message` is the trimmed user text
/// (possibly empty); `attachment` is the attached file name, if any.
pub fn ticket_prompt(message: &str, attachment: Option<&str>) -> String {
    let mut prompt = String::from(
        "You are a service desk assistant specialised in writing technical support tickets.\n",
    );

    if let Some(name) = attachment {
        prompt.push_str(&format!(
            "The user attached a file ({name}). Analyze its content carefully.\n"
        ));
    }

    prompt.push_str("Analyze the following request and extract what is needed to open a ticket.\n");
    if message.is_empty() {
        prompt.push_str(
            "The user gave no written description, so base the ticket on the attachment only.\n",
        );
    } else {
        prompt.push_str(&format!("User request: \"{message}\"\n"));
    }

    if attachment.is_some() {
        prompt.push_str(
            "\nIf the attachment is an image, describe what you see. If it is a PDF, extract the \
             relevant information and include it in the description.\n",
        );
    }

    prompt.push('\n');
    prompt.push_str(TICKET_RULES);
    prompt
}

/// Build the text-review prompt.
pub fn review_prompt(text: &str, tone: &str) -> String {
    format!(
        "Act as a professional copy editor.\n\
         Desired tone: {tone}.\n\
         Text: \"{text}\"\n\
         Return JSON only: {{ \"correctedText\": \"...\", \"improvements\": [\"...\"], \"toneAnalysis\": \"...\" }}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_prompt_embeds_message_and_rules() {
        let p = ticket_prompt("Printer is offline", None);
        assert!(p.contains("User request: \"Printer is offline\""));
        assert!(p.contains("\"priority\": \"High\" or \"Medium\" or \"Low\""));
        assert!(!p.contains("attached a file"));
    }

    #[test]
    fn attachment_only_prompt_mentions_file() {
        let p = ticket_prompt("", Some("screen.png"));
        assert!(p.contains("(screen.png)"));
        assert!(p.contains("no written description"));
    }
}
