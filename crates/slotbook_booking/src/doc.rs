// File: crates/slotbook_booking/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{BookSlotRequest, BookingResponse};
use crate::intake::{IntakeReport, SignupReport, SignupStatus};
use crate::slots::TimeSlot;
use crate::view::SlotAvailabilityView;
use crate::workflow::ConfirmationRecap;

#[utoipa::path(
    get,
    path = "/slots",
    params(
        ("date" = Option<String>, Query, description = "Date in YYYY-MM-DD format, defaults to tomorrow", example = "2025-01-15", format = "date"),
        ("dept" = Option<String>, Query, description = "Department name", example = "Tech"),
        ("name" = Option<String>, Query, description = "Candidate name"),
        ("email" = Option<String>, Query, description = "Candidate email"),
        ("id" = Option<String>, Query, description = "Candidate row id")
    ),
    responses(
        (status = 200, description = "Bookable slots for the date", body = SlotAvailabilityView),
        (status = 400, description = "Invalid date format")
    )
)]
fn doc_get_slots_handler() {}

#[utoipa::path(
    post,
    path = "/confirm",
    request_body(content = BookSlotRequest, example = json!({
        "booking_id": "7",
        "name": "Jane Doe",
        "email": "jane@example.com",
        "department": "Tech",
        "start_time": "2025-01-15T10:00:00",
        "end_time": "2025-01-15T10:30:00"
    })),
    responses(
        (status = 200, description = "Booking recap", body = ConfirmationRecap,
         example = json!({
             "booking_id": "7",
             "name": "Jane Doe",
             "email": "jane@example.com",
             "department": "Tech",
             "date": "January 15, 2025",
             "time_range": "10:00 AM - 10:30 AM",
             "location": "McCombs School of Business, 2110 Speedway, Austin, TX 78705, USA",
             "start": "2025-01-15T10:00:00",
             "end": "2025-01-15T10:30:00"
         })
        ),
        (status = 400, description = "Invalid booking request")
    )
)]
fn doc_confirm_handler() {}

#[utoipa::path(
    post,
    path = "/confirm/decline",
    request_body = BookSlotRequest,
    responses(
        (status = 303, description = "Redirect back to slot selection with the candidate details")
    )
)]
fn doc_decline_handler() {}

#[utoipa::path(
    post,
    path = "/book",
    request_body = BookSlotRequest,
    responses(
        (status = 200, description = "Booking committed", body = BookingResponse,
         example = json!({
             "success": true,
             "event_id": "abc123xyz456",
             "html_link": "https://www.google.com/calendar/event?eid=abc123xyz456",
             "notification": "sent",
             "message": "A calendar invite has been sent to your email!"
         })
        ),
        (status = 400, description = "Invalid booking request"),
        (status = 502, description = "Calendar rejected the event"),
        (status = 503, description = "Calendar service disabled")
    )
)]
fn doc_book_handler() {}

#[utoipa::path(
    post,
    path = "/intake",
    responses(
        (status = 200, description = "New sign-ups processed", body = IntakeReport,
         example = json!({
             "pending": 2,
             "welcomed": 1,
             "signups": [
                 { "row": 3, "email": "jane@example.com", "status": "welcomed" },
                 { "row": 4, "email": "", "status": "skipped" }
             ]
         })
        ),
        (status = 502, description = "Sign-up sheet could not be read"),
        (status = 503, description = "Intake, sheet or notification service disabled")
    )
)]
fn doc_intake_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_slots_handler,
        doc_confirm_handler,
        doc_decline_handler,
        doc_book_handler,
        doc_intake_handler
    ),
    components(
        schemas(
            TimeSlot,
            SlotAvailabilityView,
            BookSlotRequest,
            ConfirmationRecap,
            BookingResponse,
            IntakeReport,
            SignupReport,
            SignupStatus
        )
    ),
    tags(
        (name = "booking", description = "Interview Booking API")
    ),
    servers(
        (url = "/api", description = "Interview booking server")
    )
)]
pub struct BookingApiDoc;
