//! Employee domain model.
//!
//! This module defines the `Employee` record exchanged with the remote store and
//! held in the local cache, plus [`ImageSource`], a read-only classification of
//! the `imageUrl` field used for display and logging.

use serde::{Deserialize, Serialize};
use url::Url;

/// Identifier assigned by the remote store when a record is created.
pub type EmployeeId = i64;

/// A single employee record.
///
/// Records are plain values: the cache, the edit session and in-flight requests
/// each hold their own copy, so editing one never mutates another.
///
/// Field names follow the remote service's JSON (`jobTitle`, `imageUrl`,
/// `employeeCode`). Missing text fields deserialize as empty strings.
///
/// # Fields
///
/// - `id`: Store identifier, `None` until the record has been persisted
/// - `name`, `email`, `job_title`: Searchable text fields
/// - `image_url`: Absent, an http(s) URL, or a base64 `data:` URL
/// - `employee_code`: Opaque code stamped by the server on create
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EmployeeId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_code: Option<String>,
}

impl Employee {
    /// Creates an unsaved employee with the given name and no other fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster::Employee;
    ///
    /// let employee = Employee::new("Ann Lee")
    ///     .with_email("ann@example.com")
    ///     .with_job_title("Engineer");
    /// assert!(employee.id.is_none());
    /// assert_eq!(employee.job_title, "Engineer");
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: EmployeeId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    #[must_use]
    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = job_title.into();
        self
    }

    #[must_use]
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Classifies the current `image_url`.
    #[must_use]
    pub fn image_source(&self) -> ImageSource {
        self.image_url
            .as_deref()
            .map_or(ImageSource::None, ImageSource::classify)
    }
}

/// What an `imageUrl` value points at.
///
/// Classification never fails: values that are neither http(s) URLs nor
/// `data:` URLs are reported as [`ImageSource::Unrecognized`] and left as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// No image set (absent or blank).
    None,
    /// An http or https URL served elsewhere.
    Remote(Url),
    /// An inline base64 data URL carrying the given MIME type.
    Inline {
        /// MIME type declared in the data URL header, e.g. `image/png`.
        mime: String,
    },
    /// Anything else.
    Unrecognized(String),
}

impl ImageSource {
    /// Classifies a raw `imageUrl` string.
    ///
    /// # Examples
    ///
    /// ```
    /// use roster::domain::ImageSource;
    ///
    /// assert!(matches!(ImageSource::classify("https://cdn.example.com/a.png"), ImageSource::Remote(_)));
    /// assert_eq!(
    ///     ImageSource::classify("data:image/png;base64,iVBORw0KGgo="),
    ///     ImageSource::Inline { mime: "image/png".to_string() }
    /// );
    /// assert_eq!(ImageSource::classify("  "), ImageSource::None);
    /// ```
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::None;
        }

        if let Some(rest) = trimmed.strip_prefix("data:") {
            if let Some((header, _payload)) = rest.split_once(',') {
                if let Some(mime) = header.strip_suffix(";base64") {
                    return Self::Inline {
                        mime: mime.to_string(),
                    };
                }
            }
            return Self::Unrecognized(trimmed.to_string());
        }

        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            _ => Self::Unrecognized(trimmed.to_string()),
        }
    }

    /// Short label for list views.
    #[must_use]
    pub const fn badge(&self) -> &'static str {
        match self {
            Self::None => "-",
            Self::Remote(_) => "url",
            Self::Inline { .. } => "inline",
            Self::Unrecognized(_) => "?",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_and_missing_fields() {
        let json = r#"{"id":3,"name":"Bob Ann","jobTitle":"Designer","employeeCode":"c-1"}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();

        assert_eq!(employee.id, Some(3));
        assert_eq!(employee.job_title, "Designer");
        assert_eq!(employee.email, "");
        assert_eq!(employee.image_url, None);
        assert_eq!(employee.employee_code.as_deref(), Some("c-1"));
    }

    #[test]
    fn unsaved_record_serializes_without_id() {
        let employee = Employee::new("X").with_image_url("data:image/png;base64,AAAA");
        let value = serde_json::to_value(&employee).unwrap();

        assert!(value.get("id").is_none());
        assert_eq!(value["imageUrl"], "data:image/png;base64,AAAA");
        assert_eq!(value["jobTitle"], "");
    }

    #[test]
    fn classifies_non_http_schemes_as_unrecognized() {
        assert!(matches!(
            ImageSource::classify("ftp://host/a.png"),
            ImageSource::Unrecognized(_)
        ));
        assert!(matches!(
            ImageSource::classify("data:text/plain,hello"),
            ImageSource::Unrecognized(_)
        ));
        assert_eq!(Employee::new("A").image_source(), ImageSource::None);
    }
}
