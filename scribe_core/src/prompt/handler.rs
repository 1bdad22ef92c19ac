use crate::{
    prompt::dto::{Phase, PromptTemplate, Slot},
    summarizer::dto::SummaryStyle,
};

const SINGLE_COMPREHENSIVE: &str = "Please provide a comprehensive summary of the following transcript. Include all key points, important details, and main themes discussed.

Transcript:
{text}

Comprehensive Summary:";

const SINGLE_BRIEF: &str = "Please provide a brief, concise summary of the following transcript. Focus on the most important points only.

Transcript:
{text}

Brief Summary:";

const SINGLE_KEY_POINTS: &str = "Please extract the key points from the following transcript and present them as a bulleted list.

Transcript:
{text}

Key Points:
•";

const MAP_COMPREHENSIVE: &str = "Summarize this section of a transcript, preserving all important information and context:

Section:
{text}

Section Summary:";

const MAP_BRIEF: &str = "Briefly summarize this section of a transcript, focusing only on the most important points:

Section:
{text}

Brief Section Summary:";

const MAP_KEY_POINTS: &str = "Extract the key points from this section of a transcript:

Section:
{text}

Key Points from this section:
•";

const REDUCE_COMPREHENSIVE: &str = "Combine the following section summaries into one comprehensive, coherent summary of the entire transcript. Ensure all important information is preserved and well-organized.

Section Summaries:
{summaries}

Final Comprehensive Summary:";

const REDUCE_BRIEF: &str = "Combine the following section summaries into one brief, coherent summary of the entire transcript.

Section Summaries:
{summaries}

Final Brief Summary:";

const REDUCE_KEY_POINTS: &str = "Combine and organize the following key points from different sections into a comprehensive list of key points for the entire transcript. Remove duplicates and organize logically.

Key Points from Sections:
{summaries}

Final Key Points:
•";

pub fn prompt_for(phase: Phase, style: SummaryStyle) -> PromptTemplate {
    let template = match (phase, style) {
        (Phase::Single, SummaryStyle::Comprehensive) => SINGLE_COMPREHENSIVE,
        (Phase::Single, SummaryStyle::Brief) => SINGLE_BRIEF,
        (Phase::Single, SummaryStyle::KeyPoints) => SINGLE_KEY_POINTS,
        (Phase::Map, SummaryStyle::Comprehensive) => MAP_COMPREHENSIVE,
        (Phase::Map, SummaryStyle::Brief) => MAP_BRIEF,
        (Phase::Map, SummaryStyle::KeyPoints) => MAP_KEY_POINTS,
        (Phase::Reduce, SummaryStyle::Comprehensive) => REDUCE_COMPREHENSIVE,
        (Phase::Reduce, SummaryStyle::Brief) => REDUCE_BRIEF,
        (Phase::Reduce, SummaryStyle::KeyPoints) => REDUCE_KEY_POINTS,
    };

    let slot = match phase {
        Phase::Single | Phase::Map => Slot::Text,
        Phase::Reduce => Slot::Summaries,
    };

    PromptTemplate::from((template, slot))
}
