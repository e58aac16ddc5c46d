//! Grounding prompt sent to the answer generator.

use std::fmt::Write as _;

use matcher::GatedResult;

/// Reply the model is instructed to give when the evidence has no answer.
pub const NOT_FOUND_ANSWER: &str = "Information not found in provided evidence.";

/// Build the evidence-only prompt for `question` from the passing results,
/// in ranked order.
pub fn build_prompt(question: &str, evidence: &[GatedResult]) -> String {
    let mut documents = String::new();
    for doc in evidence {
        // Writing into a String cannot fail.
        let _ = write!(
            documents,
            "\nSOURCE: {}\nCONTENT: {}\n",
            doc.source, doc.content
        );
    }

    format!(
        "\nYou are an evidence-based AI assistant.\n\n\
         You MUST answer the question using ONLY the information provided in the documents below.\n\n\
         If the answer cannot be found in the documents, respond exactly with:\n\
         \"{NOT_FOUND_ANSWER}\"\n\n\
         When answering, cite the source filenames explicitly.\n\n\
         Question:\n{question}\n\n\
         Documents:\n{documents}\n\n\
         Answer:\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use matcher::ConfidenceLevel;

    fn evidence(source: &str, content: &str) -> GatedResult {
        GatedResult {
            source: source.into(),
            content: content.into(),
            score: 0.5,
            passed_threshold: true,
            confidence: ConfidenceLevel::High,
        }
    }

    #[test]
    fn prompt_lists_every_document_in_order() {
        let prompt = build_prompt(
            "What color was the car?",
            &[
                evidence("log1.txt", "The car was red."),
                evidence("log2.txt", "Officers arrived at 9pm."),
            ],
        );

        assert!(prompt.starts_with("\nYou are an evidence-based AI assistant.\n\n"));
        assert!(prompt.contains("Question:\nWhat color was the car?\n\n"));
        assert!(prompt.contains(
            "Documents:\n\nSOURCE: log1.txt\nCONTENT: The car was red.\n\nSOURCE: log2.txt\nCONTENT: Officers arrived at 9pm.\n\n\nAnswer:\n"
        ));
        let first = prompt.find("log1.txt").unwrap();
        let second = prompt.find("log2.txt").unwrap();
        assert!(first < second);
    }

    #[test]
    fn prompt_carries_the_refusal_instruction() {
        let prompt = build_prompt("q", &[evidence("a.txt", "b")]);
        assert!(prompt.contains("respond exactly with:\n\"Information not found in provided evidence.\"\n\n"));
        assert!(prompt.contains("cite the source filenames explicitly"));
        assert!(prompt.ends_with("Answer:\n"));
    }
}
