use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::form::{Language, Length, Tone, ValidatedForm};
use crate::wire::OutputField;

const NOT_AVAILABLE: &str = "N/A";

pub const GENERATION_SYSTEM_PROMPT: &str = "You are an expert real estate copywriter. \
You write accurate, compelling listing copy and always comply with fair housing laws: \
never reference or imply preferences about race, color, religion, sex, disability, \
familial status, national origin, or any other protected class. \
Respond with a single JSON object and nothing else.";

pub const REWRITE_SYSTEM_PROMPT: &str = "You are an expert real estate copywriter editing existing listing copy. \
Apply the requested change faithfully, keep every fact from the current text, do not invent features, \
and stay compliant with fair housing laws (no references to protected classes). \
Respond with a single JSON object and nothing else.";

pub fn tone_phrase(tone: Tone) -> &'static str {
    match tone {
        Tone::Standard => "balanced, professional, informative",
        Tone::Luxury => "high-end, premium, aspirational",
        Tone::Investor => "analytical, value-focused, return-oriented",
        Tone::Casual => "friendly, relaxed, conversational",
        Tone::Hype => "energetic, bold, attention-grabbing",
        Tone::Simple => "plain, clear, easy to read",
    }
}

pub fn length_phrase(length: Length) -> &'static str {
    match length {
        Length::Short => "60–100 words",
        Length::Medium => "120–180 words",
        Length::Long => "200–280 words",
    }
}

pub fn language_name(language: Language) -> &'static str {
    match language {
        Language::En => "English",
        Language::Es => "Spanish",
    }
}

fn or_na(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or(NOT_AVAILABLE)
}

fn output_contract() -> &'static str {
r#"Return ONLY a JSON object with exactly these keys: "heading", "mls", "zillow", "social", "email", "tiktok".
Every value must be a plain string.

Per-key requirements:
- heading: a 4–8 word headline. No emojis.
- mls: 120–160 words, formal and factual. Mention parking, lot size and year built when they are provided. No links, no MLS numbers, no agent or contact information.
- zillow: 100–140 words, lifestyle-oriented and inviting. No links.
- social: 1–3 sentences followed by 5–8 relevant hashtags. At most 2 emojis. No links.
- email: 60–100 words suitable for an email blast to prospective buyers. No email addresses.
- tiktok: an opening hook line, then 4–6 short bullet points, then a call to action. At most 2 emojis in total. No links or @handles.

Fair housing: do not mention or imply any preference, limitation or discrimination based on race, color, religion, sex, disability, familial status, national origin or any other protected class. Describe the property, not the people who should live there.
Only use facts given in the property details; never invent amenities."#
}

pub fn build_generation_prompt(form: &ValidatedForm) -> String {
    let tone = tone_phrase(form.tone);
    let length = length_phrase(form.length);
    let language = language_name(form.language);
    let contract = output_contract();

    format!(
        r#"Write real estate marketing copy for the following property.

Property details:
- Property type: {property_type}
- Address: {address}
- Price: {price}
- Bedrooms: {beds}
- Bathrooms: {baths}
- Square feet: {sqft}
- Lot size: {lot_size}
- Year built: {year_built}
- Parking: {parking}
- Neighborhood: {neighborhood}
- Highlights: {highlights}

Style:
- Tone: {tone}
- Target length for long-form pieces: {length}
- Write every value in {language}.

{contract}"#,
        property_type = form.property_type,
        address = or_na(&form.address),
        price = or_na(&form.price),
        beds = or_na(&form.beds),
        baths = or_na(&form.baths),
        sqft = or_na(&form.sqft),
        lot_size = or_na(&form.lot_size),
        year_built = or_na(&form.year_built),
        parking = or_na(&form.parking),
        neighborhood = or_na(&form.neighborhood),
        highlights = form.highlights,
    )
}

pub fn build_rewrite_prompt(field: OutputField, current_text: &str, instruction: &str) -> String {
    let key = field.as_str();
    format!(
        r#"Rewrite the "{key}" section of a real estate listing.

Instruction: {instruction}

Current text:
"""
{current_text}
"""

Keep the same language as the current text and keep it fair-housing compliant.
Return ONLY a JSON object with exactly one key, "{key}", whose value is the rewritten text. Do not include any other keys."#
    )
}

/// Canned rewrite instructions offered next to each output.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RewritePreset {
    Shorter,
    Longer,
    MoreLuxury,
    MoreCasual,
    StrongerHook,
    AddEmojis,
    NoEmojis,
}

impl RewritePreset {
    pub fn instruction(self) -> &'static str {
        match self {
            RewritePreset::Shorter => "Make it shorter",
            RewritePreset::Longer => "Make it longer",
            RewritePreset::MoreLuxury => "More luxury",
            RewritePreset::MoreCasual => "More casual",
            RewritePreset::StrongerHook => "Stronger Hook",
            RewritePreset::AddEmojis => "Add a few tasteful emojis",
            RewritePreset::NoEmojis => "Remove all emojis",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{validate, ListingForm};

    fn form() -> ValidatedForm {
        validate(&ListingForm {
            property_type: "Condo".into(),
            highlights: "ocean view, updated kitchen".into(),
            parking: "2-car garage".into(),
            tone: "luxury".into(),
            length: "short".into(),
            ..ListingForm::default()
        })
        .unwrap()
    }

    #[test]
    fn generation_prompt_is_deterministic() {
        assert_eq!(build_generation_prompt(&form()), build_generation_prompt(&form()));
    }

    #[test]
    fn absent_optionals_render_as_na() {
        let p = build_generation_prompt(&form());
        assert!(p.contains("- Address: N/A"));
        assert!(p.contains("- Parking: 2-car garage"));
        assert!(p.contains("- Highlights: ocean view, updated kitchen"));
        assert!(p.contains("60–100 words"));
        assert!(p.contains("in English"));
    }

    #[test]
    fn changing_tone_only_changes_tone_phrase() {
        let luxury = form();
        let casual = ValidatedForm { tone: Tone::Casual, ..form() };
        let a = build_generation_prompt(&luxury);
        let b = build_generation_prompt(&casual);
        assert_ne!(a, b);
        assert_eq!(
            a.replace(tone_phrase(Tone::Luxury), tone_phrase(Tone::Casual)),
            b
        );
    }

    #[test]
    fn spanish_selects_language_name() {
        let es = ValidatedForm { language: Language::Es, ..form() };
        assert!(build_generation_prompt(&es).contains("in Spanish"));
    }

    #[test]
    fn fair_housing_in_prompt_and_system_messages() {
        assert!(build_generation_prompt(&form()).contains("Fair housing"));
        assert!(GENERATION_SYSTEM_PROMPT.contains("fair housing"));
        assert!(REWRITE_SYSTEM_PROMPT.contains("fair housing"));
    }

    #[test]
    fn rewrite_prompt_names_single_key() {
        let p = build_rewrite_prompt(OutputField::Social, "Old text", "Stronger Hook");
        assert!(p.contains("exactly one key, \"social\""));
        assert!(p.contains("Instruction: Stronger Hook"));
        assert!(p.contains("Old text"));
    }
}
