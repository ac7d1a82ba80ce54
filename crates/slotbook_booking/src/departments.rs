// --- File: crates/slotbook_booking/src/departments.rs ---
use serde::Serialize;
use slotbook_config::{BookingConfig, DepartmentConfig};
use tracing::warn;

/// Everything the booking flow needs to know about a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentProfile {
    pub name: String,
    /// Calendar the interview event is created on.
    pub calendar_id: String,
    /// Reply-to address for the invite email.
    pub contact_email: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// False when the name was not in the table and defaults were used.
    #[serde(skip)]
    pub known: bool,
}

/// Case-insensitive lookup of department profiles.
#[derive(Debug, Clone)]
pub struct DepartmentDirectory {
    departments: Vec<DepartmentConfig>,
    default_department: String,
    default_calendar_id: String,
    default_location: String,
}

impl DepartmentDirectory {
    pub fn from_config(config: &BookingConfig) -> Self {
        Self {
            departments: config.departments.clone(),
            default_department: config.default_department.clone(),
            default_calendar_id: config.default_calendar_id.clone(),
            default_location: config.default_location.clone(),
        }
    }

    /// Department used when a request names none.
    pub fn default_department(&self) -> &str {
        &self.default_department
    }

    /// Resolves a department by name.
    ///
    /// Unknown names keep the caller's spelling for display but route to the default
    /// calendar and location. A blank name means the default department.
    pub fn resolve(&self, name: &str) -> DepartmentProfile {
        let wanted = match name.trim() {
            "" => self.default_department.as_str(),
            trimmed => trimmed,
        };

        match self
            .departments
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(wanted))
        {
            Some(dept) => {
                let calendar_id = dept
                    .calendar_id
                    .clone()
                    .unwrap_or_else(|| self.default_calendar_id.clone());
                DepartmentProfile {
                    name: dept.name.clone(),
                    contact_email: dept.contact_email.clone().unwrap_or_else(|| calendar_id.clone()),
                    location: dept
                        .location
                        .clone()
                        .unwrap_or_else(|| self.default_location.clone()),
                    calendar_id,
                    description: dept.description.clone(),
                    known: true,
                }
            }
            None => {
                warn!("Unknown department {:?}, using default calendar", wanted);
                DepartmentProfile {
                    name: wanted.to_string(),
                    calendar_id: self.default_calendar_id.clone(),
                    contact_email: self.default_calendar_id.clone(),
                    location: self.default_location.clone(),
                    description: None,
                    known: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> DepartmentDirectory {
        let config = BookingConfig {
            departments: vec![
                DepartmentConfig {
                    name: "Finance".into(),
                    calendar_id: Some("finance@example.org".into()),
                    contact_email: None,
                    location: Some("Room 4".into()),
                    description: Some("Budgets and reporting.".into()),
                },
                DepartmentConfig {
                    name: "Tech".into(),
                    calendar_id: Some("tech-cal@group.calendar.google.com".into()),
                    contact_email: Some("tech@example.org".into()),
                    location: None,
                    description: None,
                },
            ],
            ..BookingConfig::default()
        };
        DepartmentDirectory::from_config(&config)
    }

    #[test]
    fn lookup_ignores_case() {
        let profile = directory().resolve("fInAnCe");
        assert!(profile.known);
        assert_eq!(profile.name, "Finance");
        assert_eq!(profile.calendar_id, "finance@example.org");
        assert_eq!(profile.contact_email, "finance@example.org");
        assert_eq!(profile.location, "Room 4");
        assert_eq!(profile.description.as_deref(), Some("Budgets and reporting."));
    }

    #[test]
    fn missing_location_uses_default() {
        let profile = directory().resolve("Tech");
        assert_eq!(profile.contact_email, "tech@example.org");
        assert_eq!(profile.location, BookingConfig::default().default_location);
    }

    #[test]
    fn unknown_department_keeps_name_and_uses_defaults() {
        let profile = directory().resolve("Marketing");
        assert!(!profile.known);
        assert_eq!(profile.name, "Marketing");
        assert_eq!(profile.calendar_id, "primary");
        assert!(profile.description.is_none());
    }

    #[test]
    fn blank_name_means_default_department() {
        let profile = directory().resolve("  ");
        assert_eq!(profile.name, "Tech");
        assert!(profile.known);
    }
}
