use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::errors::{ListingError, Result};

pub const VALIDATION_MESSAGE: &str =
    "Please fill in the property type and highlights (at least 3 characters).";

const MIN_HIGHLIGHTS_CHARS: usize = 3;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Standard,
    Luxury,
    Investor,
    Casual,
    Hype,
    Simple,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Standard => "standard",
            Tone::Luxury => "luxury",
            Tone::Investor => "investor",
            Tone::Casual => "casual",
            Tone::Hype => "hype",
            Tone::Simple => "simple",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "standard" => Some(Tone::Standard),
            "luxury" => Some(Tone::Luxury),
            "investor" => Some(Tone::Investor),
            "casual" => Some(Tone::Casual),
            "hype" => Some(Tone::Hype),
            "simple" => Some(Tone::Simple),
            _ => None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Length {
    Short,
    Medium,
    Long,
}

impl Length {
    pub fn as_str(self) -> &'static str {
        match self {
            Length::Short => "short",
            Length::Medium => "medium",
            Length::Long => "long",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "short" => Some(Length::Short),
            "medium" => Some(Length::Medium),
            "long" => Some(Length::Long),
            _ => None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            _ => None,
        }
    }
}

/// Raw user input. Every field is a string so that anything the front end
/// (or a hand-edited history file) hands us can be represented and rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingForm {
    pub property_type: String,
    pub address: String,
    pub price: String,
    pub beds: String,
    pub baths: String,
    pub sqft: String,
    pub lot_size: String,
    pub year_built: String,
    pub parking: String,
    pub neighborhood: String,
    pub highlights: String,
    pub tone: String,
    pub length: String,
    pub language: String,
}

impl Default for ListingForm {
    fn default() -> Self {
        Self {
            property_type: String::new(),
            address: String::new(),
            price: String::new(),
            beds: String::new(),
            baths: String::new(),
            sqft: String::new(),
            lot_size: String::new(),
            year_built: String::new(),
            parking: String::new(),
            neighborhood: String::new(),
            highlights: String::new(),
            tone: Tone::Standard.as_str().into(),
            length: Length::Medium.as_str().into(),
            language: Language::En.as_str().into(),
        }
    }
}

/// A form that passed [`validate`]. Optional fields are `None` when blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub property_type: String,
    pub highlights: String,
    pub address: Option<String>,
    pub price: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub sqft: Option<String>,
    pub lot_size: Option<String>,
    pub year_built: Option<String>,
    pub parking: Option<String>,
    pub neighborhood: Option<String>,
    pub tone: Tone,
    pub length: Length,
    pub language: Language,
}

fn optional(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

pub fn validate(form: &ListingForm) -> Result<ValidatedForm> {
    if form.property_type.trim().is_empty()
        || form.highlights.trim().chars().count() < MIN_HIGHLIGHTS_CHARS
    {
        return Err(ListingError::Validation(VALIDATION_MESSAGE.into()));
    }

    let tone = Tone::parse(&form.tone)
        .ok_or_else(|| ListingError::Validation(format!("Unsupported tone: {:?}", form.tone)))?;
    let length = Length::parse(&form.length)
        .ok_or_else(|| ListingError::Validation(format!("Unsupported length: {:?}", form.length)))?;
    let language = Language::parse(&form.language).ok_or_else(|| {
        ListingError::Validation(format!("Unsupported language: {:?}", form.language))
    })?;

    Ok(ValidatedForm {
        property_type: form.property_type.clone(),
        highlights: form.highlights.clone(),
        address: optional(&form.address),
        price: optional(&form.price),
        beds: optional(&form.beds),
        baths: optional(&form.baths),
        sqft: optional(&form.sqft),
        lot_size: optional(&form.lot_size),
        year_built: optional(&form.year_built),
        parking: optional(&form.parking),
        neighborhood: optional(&form.neighborhood),
        tone,
        length,
        language,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ListingForm {
        ListingForm {
            property_type: "Condo".into(),
            highlights: "ocean view".into(),
            ..ListingForm::default()
        }
    }

    #[test]
    fn accepts_required_fields_with_blank_optionals() {
        let v = validate(&minimal()).unwrap();
        assert_eq!(v.property_type, "Condo");
        assert_eq!(v.address, None);
        assert_eq!(v.tone, Tone::Standard);
        assert_eq!(v.length, Length::Medium);
        assert_eq!(v.language, Language::En);
    }

    #[test]
    fn rejects_empty_property_type() {
        let form = ListingForm { property_type: "  ".into(), ..minimal() };
        assert_eq!(
            validate(&form),
            Err(ListingError::Validation(VALIDATION_MESSAGE.into()))
        );
    }

    #[test]
    fn rejects_short_highlights() {
        for h in ["", "a", "ab", "  ab  "] {
            let form = ListingForm { highlights: h.into(), ..minimal() };
            assert!(validate(&form).is_err(), "highlights {h:?} should be rejected");
        }
        let form = ListingForm { highlights: "abc".into(), ..minimal() };
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn rejects_injected_enum_values() {
        let bad_tone = ListingForm { tone: "snarky".into(), ..minimal() };
        let bad_length = ListingForm { length: "epic".into(), ..minimal() };
        let bad_language = ListingForm { language: "fr".into(), ..minimal() };
        for form in [bad_tone, bad_length, bad_language] {
            assert!(matches!(validate(&form), Err(ListingError::Validation(_))));
        }
    }

    #[test]
    fn optional_fields_pass_through_verbatim() {
        let form = ListingForm { parking: " 2-car garage ".into(), ..minimal() };
        let v = validate(&form).unwrap();
        assert_eq!(v.parking.as_deref(), Some(" 2-car garage "));
    }

    #[test]
    fn form_uses_camel_case_keys() {
        let json = serde_json::to_value(ListingForm { lot_size: "0.2 ac".into(), ..minimal() }).unwrap();
        assert_eq!(json["propertyType"], "Condo");
        assert_eq!(json["lotSize"], "0.2 ac");
        assert!(json.get("yearBuilt").is_some());
    }
}
