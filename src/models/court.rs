use serde::{Deserialize, Serialize};
use url::Url;

use super::validation::{required_text, FieldErrors};

const MAX_TEXT_LEN: usize = 100;
const MAX_IMAGE_URL_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub id: i64,
    pub court_name: String,
    pub court_type: String,
    pub surface: String,
    pub image_url: Option<String>,
}

/// Court fields as sent by clients on create and replace.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourtPayload {
    pub court_name: Option<String>,
    pub court_type: Option<String>,
    pub surface: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCourt {
    pub court_name: String,
    pub court_type: String,
    pub surface: String,
    pub image_url: Option<String>,
}

impl CourtPayload {
    pub fn validate(self) -> Result<NewCourt, FieldErrors> {
        let mut errors = FieldErrors::new();

        let court_name = required_text(&mut errors, "court_name", self.court_name, MAX_TEXT_LEN);
        let court_type = required_text(&mut errors, "court_type", self.court_type, MAX_TEXT_LEN);
        let surface = required_text(&mut errors, "surface", self.surface, MAX_TEXT_LEN);
        let image_url = validate_image_url(&mut errors, self.image_url);

        match (court_name, court_type, surface) {
            (Some(court_name), Some(court_type), Some(surface)) if errors.is_empty() => {
                Ok(NewCourt {
                    court_name,
                    court_type,
                    surface,
                    image_url,
                })
            }
            _ => Err(errors),
        }
    }
}

fn validate_image_url(errors: &mut FieldErrors, value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.len() > MAX_IMAGE_URL_LEN {
        errors.add(
            "image_url",
            format!("Ensure this field has no more than {MAX_IMAGE_URL_LEN} characters."),
        );
        return None;
    }

    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {
            Some(trimmed.to_string())
        }
        _ => {
            errors.add("image_url", "Enter a valid URL.");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CourtPayload {
        CourtPayload {
            court_name: Some("Court A".into()),
            court_type: Some("tennis".into()),
            surface: Some("clay".into()),
            image_url: None,
        }
    }

    #[test]
    fn test_valid_court() {
        let court = payload().validate().unwrap();
        assert_eq!(court.court_name, "Court A");
        assert_eq!(court.image_url, None);
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let errors = CourtPayload::default().validate().unwrap_err();
        assert!(errors.contains("court_name"));
        assert!(errors.contains("court_type"));
        assert!(errors.contains("surface"));
        assert!(!errors.contains("image_url"));
    }

    #[test]
    fn test_blank_image_url_is_none() {
        let court = CourtPayload {
            image_url: Some("  ".into()),
            ..payload()
        }
        .validate()
        .unwrap();
        assert_eq!(court.image_url, None);
    }

    #[test]
    fn test_image_url_must_be_http() {
        let ok = CourtPayload {
            image_url: Some("https://img.example.com/a.png".into()),
            ..payload()
        }
        .validate()
        .unwrap();
        assert_eq!(ok.image_url.as_deref(), Some("https://img.example.com/a.png"));

        for bad in ["not a url", "ftp://example.com/a.png", "/relative/a.png"] {
            let errors = CourtPayload {
                image_url: Some(bad.into()),
                ..payload()
            }
            .validate()
            .unwrap_err();
            assert_eq!(errors.get("image_url").unwrap(), ["Enter a valid URL."]);
        }
    }
}
