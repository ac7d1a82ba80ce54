// --- File: crates/slotbook_booking/src/intake.rs ---
//! Sign-up intake: welcome every new form response once and mark its row.
//!
//! A row is new while its "sent" cell is blank. Rows missing a name or an email are
//! reported and left untouched, so a later run picks them up once they are completed.
//! The row is only marked after the welcome email is accepted.

use crate::departments::DepartmentDirectory;
use serde::Serialize;
use slotbook_common::error::{external_service_error, SlotbookError};
use slotbook_common::services::{
    BoxedError, DynNotificationService, DynSignupSheet, EmailMessage, SheetRow,
};
use slotbook_config::IntakeConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub const UNKNOWN_DEPARTMENT_TEXT: &str = "Department information not available.";

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Failed to read sign-ups: {0}")]
    Sheet(#[source] BoxedError),
}

impl From<IntakeError> for SlotbookError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::Sheet(e) => external_service_error("sheets", e),
        }
    }
}

/// Capitalises the first letter of every alphabetic run and lower-cases the rest,
/// so "o'neil mary-jane" becomes "O'Neil Mary-Jane".
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Comma-separated department picks, trimmed, blanks dropped.
pub fn split_departments(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

/// A response row ready to be welcomed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub row: usize,
    pub name: String,
    pub email: String,
    pub departments: Vec<String>,
}

impl Signup {
    /// `None` when the name or email cell is blank.
    pub fn from_row(row: &SheetRow, config: &IntakeConfig) -> Option<Self> {
        let name = row.get(&config.name_column);
        let email = row.get(&config.email_column);
        if name.is_empty() || email.is_empty() {
            return None;
        }
        Some(Self {
            row: row.row,
            name: title_case(name),
            email: email.to_string(),
            departments: split_departments(row.get(&config.departments_column)),
        })
    }
}

pub fn is_pending(row: &SheetRow, config: &IntakeConfig) -> bool {
    row.get(&config.sent_column).is_empty()
}

/// (display name, description) for each pick. Unknown picks keep their spelling.
pub fn department_summaries(
    departments: &[String],
    directory: &DepartmentDirectory,
) -> Vec<(String, String)> {
    departments
        .iter()
        .map(|picked| {
            let profile = directory.resolve(picked);
            match profile.description {
                Some(description) if profile.known => (profile.name, description),
                _ => {
                    warn!("No description for department {:?}", picked);
                    (picked.clone(), UNKNOWN_DEPARTMENT_TEXT.to_string())
                }
            }
        })
        .collect()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const NEXT_STEPS: &str = "Our team will review your responses and reach out to you with more \
    details about each department you've selected. You'll also receive updates about \
    opportunities, events, and important information for the upcoming semester.";

/// The welcome email for one sign-up, as plain text with an HTML alternative.
pub fn welcome_email(
    signup: &Signup,
    directory: &DepartmentDirectory,
    config: &IntakeConfig,
    organization_name: &str,
) -> EmailMessage {
    let summaries = department_summaries(&signup.departments, directory);

    let contact_line = match &config.contact_email {
        Some(contact) => format!(
            "If you have any questions, feel free to reply to this email or contact us at {}.",
            contact
        ),
        None => "If you have any questions, feel free to reply to this email.".to_string(),
    };

    let mut body = format!(
        "Hello {name},\n\n\
         Thank you so much for completing our form and for your interest in joining {org}!\n\n\
         We wanted to give you a quick update on what happens next:\n\n\
         Your Department Selections:\n",
        name = signup.name,
        org = organization_name,
    );
    for (name, description) in &summaries {
        body.push_str(&format!("  {}: {}\n", name, description));
    }
    body.push_str(&format!(
        "\nWhat to Expect Next:\n{}\n\n{}\n\nStay tuned, we're excited to connect with you soon!\n\n\
         Best regards,\nThe {} Team\n",
        NEXT_STEPS, contact_line, organization_name
    ));
    if let Some(website) = &config.website {
        body.push_str(website);
        body.push('\n');
    }

    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"UTF-8\"><title>{subject}</title></head>\n\
         <body style=\"font-family: Arial, sans-serif; font-size: 14px; color: #333333;\">\n\
         <p>Hello {name},</p>\n\
         <p>Thank you so much for completing our form and for your interest in joining {org}!</p>\n\
         <p>We wanted to give you a quick update on what happens next:</p>\n\
         <p><strong>Your Department Selections:</strong></p>\n<div style=\"margin-left: 20px;\">\n",
        subject = escape_html(&config.subject),
        name = escape_html(&signup.name),
        org = escape_html(organization_name),
    );
    for (name, description) in &summaries {
        html.push_str(&format!(
            "<strong>{}:</strong> {}<br><br>\n",
            escape_html(name),
            escape_html(description)
        ));
    }
    html.push_str(&format!(
        "</div>\n<p><strong>What to Expect Next:</strong></p>\n\
         <p style=\"margin-left: 20px;\">{}</p>\n<p>{}</p>\n\
         <p>Stay tuned, we're excited to connect with you soon!</p>\n\
         <p><strong>Best regards,</strong><br>The {} Team</p>\n",
        NEXT_STEPS,
        escape_html(&contact_line),
        escape_html(organization_name)
    ));
    if let Some(website) = &config.website {
        let website = escape_html(website);
        html.push_str(&format!(
            "<p style=\"font-size: 12px; color: #666666;\">Website: <a href=\"{0}\">{0}</a></p>\n",
            website
        ));
    }
    html.push_str("</body>\n</html>\n");

    EmailMessage {
        to: signup.email.clone(),
        subject: config.subject.clone(),
        body,
        html_body: Some(html),
        reply_to: config.contact_email.clone(),
        attachment: None,
    }
}

/// What happened to one pending row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignupStatus {
    /// Email sent and row marked.
    Welcomed,
    /// Email sent but the row could not be marked; the next run will email again.
    WelcomedUnmarked { reason: String },
    /// Email failed; the row stays pending.
    EmailFailed { reason: String },
    /// Name or email missing; the row stays pending.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SignupReport {
    pub row: usize,
    pub email: String,
    #[serde(flatten)]
    pub status: SignupStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IntakeReport {
    /// Rows whose sent cell was blank.
    pub pending: usize,
    pub welcomed: usize,
    pub signups: Vec<SignupReport>,
}

pub struct SignupIntake {
    sheet: DynSignupSheet,
    notifier: DynNotificationService,
    directory: Arc<DepartmentDirectory>,
    config: IntakeConfig,
    organization_name: String,
}

impl SignupIntake {
    pub fn new(
        sheet: DynSignupSheet,
        notifier: DynNotificationService,
        directory: Arc<DepartmentDirectory>,
        config: IntakeConfig,
        organization_name: impl Into<String>,
    ) -> Self {
        Self {
            sheet,
            notifier,
            directory,
            config,
            organization_name: organization_name.into(),
        }
    }

    /// One pass over the sheet. Only a failed read is an error; per-row failures are
    /// reported and the pass continues.
    pub async fn run(&self) -> Result<IntakeReport, IntakeError> {
        let rows = self.sheet.read_rows().await.map_err(IntakeError::Sheet)?;
        let pending: Vec<&SheetRow> = rows
            .iter()
            .filter(|row| is_pending(row, &self.config))
            .collect();
        info!("Found {} new sign-ups to process", pending.len());

        let mut report = IntakeReport {
            pending: pending.len(),
            ..IntakeReport::default()
        };
        for row in pending {
            let status = self.process(row).await;
            if matches!(
                status,
                SignupStatus::Welcomed | SignupStatus::WelcomedUnmarked { .. }
            ) {
                report.welcomed += 1;
            }
            report.signups.push(SignupReport {
                row: row.row,
                email: row.get(&self.config.email_column).to_string(),
                status,
            });
        }
        Ok(report)
    }

    async fn process(&self, row: &SheetRow) -> SignupStatus {
        let Some(signup) = Signup::from_row(row, &self.config) else {
            info!("Skipping row {}: missing name or email", row.row);
            return SignupStatus::Skipped;
        };

        let email = welcome_email(
            &signup,
            &self.directory,
            &self.config,
            &self.organization_name,
        );
        if let Err(e) = self.notifier.send_email(email).await {
            warn!("Welcome email to {} failed: {}", signup.email, e);
            return SignupStatus::EmailFailed {
                reason: e.to_string(),
            };
        }

        match self
            .sheet
            .update_cell(signup.row, &self.config.sent_column, &self.config.sent_marker)
            .await
        {
            Ok(()) => {
                info!("Welcomed {} (row {})", signup.email, signup.row);
                SignupStatus::Welcomed
            }
            Err(e) => {
                warn!(
                    "Email sent to {} but row {} not marked: {}",
                    signup.email, signup.row, e
                );
                SignupStatus::WelcomedUnmarked {
                    reason: e.to_string(),
                }
            }
        }
    }
}
