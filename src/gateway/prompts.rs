//! Prompt text sent to the language model

use crate::interview::{render_conversation, Turn};

pub const INTERVIEWER_SYSTEM: &str = "You are a professional, neutral, and curious researcher \
conducting an alignment interview with an employee.

Guidelines:
- Be professional, warm, and genuinely curious
- Ask open-ended questions that encourage deeper thinking
- Don't be leading or judgmental
- If the employee gives a brief answer, gently probe for more details
- Focus on understanding their perspective, concerns, and ideas
- Keep responses concise but engaging";

pub const ANALYST_SYSTEM: &str = "You are an organizational analyst who summarizes employee \
alignment interviews accurately and without embellishment.";

pub fn opening_question(topic: &str) -> String {
    format!(
        "We're starting an alignment interview focused on: '{topic}'.\n\n\
         Welcome the employee in one short sentence, then ask exactly one open-ended \
         question inviting their initial thoughts on this topic: what it means to them \
         and which aspects matter most from their perspective.\n\
         Respond with only the welcome and the question."
    )
}

pub fn next_question(topic: &str, turns: &[Turn]) -> String {
    format!(
        "Interview so far:\n\n{}\n\
         Ask exactly one open-ended, non-leading follow-up question about '{topic}'. \
         Build on what the employee has already said and do not repeat earlier questions. \
         If the latest answer was short or shallow, gently probe it for more depth.\n\
         Respond with only the question.",
        render_conversation(topic, turns)
    )
}

pub fn summarize_chunk(text: &str) -> String {
    format!(
        "Write a concise summary of the following interview transcript. Capture the \
         employee's views, concerns and ideas.\n\n\"\"\"\n{text}\n\"\"\"\n\nCONCISE SUMMARY:"
    )
}

pub fn combine_chunk_summaries(partials: &[String]) -> String {
    format!(
        "The following are summaries of consecutive parts of one interview transcript. \
         Combine them into a single concise summary of the whole interview.\n\n{}\n\nCONCISE SUMMARY:",
        numbered(partials)
    )
}

pub fn synthesize(summaries: &[String]) -> String {
    format!(
        "Below are summaries of {} employee alignment interviews.\n\n{}\n\n\
         Write an organizational alignment report in markdown with these sections:\n\
         1. Recurring themes\n\
         2. Areas of consensus\n\
         3. Misalignments and points of tension\n\
         4. Recommendations",
        summaries.len(),
        numbered(summaries)
    )
}

pub fn compare(topic_summaries: &[(String, String)]) -> String {
    let body = topic_summaries
        .iter()
        .map(|(topic, summary)| format!("Topic '{topic}':\n{summary}"))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Analyze the following topic summaries and provide a comparative analysis:\n\n{body}\n\n\
         Identify:\n\
         1. Common themes across topics\n\
         2. Key differences between topics\n\
         3. Areas of alignment and misalignment\n\
         4. Strategic implications and recommendations"
    )
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("[{}] {}", i + 1, item.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
