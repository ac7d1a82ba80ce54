// --- File: crates/services/slotbook_backend/src/service_factory.rs ---
//! Builds the collaborators enabled by features and runtime flags.
use slotbook_booking::static_store::StaticAvailabilityStore;
use slotbook_common::services::{
    BoxedService, DynAvailabilityStore, DynCalendarService, DynNotificationService,
    DynSignupSheet, ServiceFactory,
};
use slotbook_config::AppConfig;
use std::sync::Arc;
#[allow(unused_imports)] // used by feature-gated adapters only
use {
    slotbook_common::is_feature_enabled,
    tracing::{error, info, warn},
};

#[cfg(feature = "gcal")]
use slotbook_gcal::{create_calendar_hub, GoogleCalendarService};

#[cfg(feature = "smtp")]
use slotbook_smtp::SmtpNotificationService;

#[cfg(feature = "sheets")]
use slotbook_sheets::{ServiceAccountTokens, SheetsAvailabilityStore, SheetsSignupSheet};

/// Holds whichever services initialised successfully.
///
/// A service that fails to start is logged and left out; the routes degrade accordingly.
pub struct SlotbookServiceFactory {
    calendar_service: Option<DynCalendarService>,
    notification_service: Option<DynNotificationService>,
    availability_store: Option<DynAvailabilityStore>,
    signup_sheet: Option<DynSignupSheet>,
}

impl SlotbookServiceFactory {
    pub async fn new(config: Arc<AppConfig>) -> Self {
        #[allow(unused_mut)]
        let mut factory = Self {
            calendar_service: None,
            notification_service: None,
            availability_store: None,
            signup_sheet: None,
        };

        #[cfg(feature = "gcal")]
        if let Some(gcal) = config
            .gcal
            .as_ref()
            .filter(|_| is_feature_enabled(config.use_gcal, config.gcal.as_ref()))
        {
            info!("Initializing Google Calendar service...");
            match create_calendar_hub(gcal).await {
                Ok(hub) => {
                    let service = GoogleCalendarService::new(Arc::new(hub));
                    factory.calendar_service = Some(Arc::new(BoxedService::new(service)));
                    info!("Google Calendar service initialized");
                }
                Err(e) => error!("Failed to initialize Google Calendar service: {}", e),
            }
        }

        #[cfg(feature = "smtp")]
        if let Some(smtp) = config
            .smtp
            .as_ref()
            .filter(|_| is_feature_enabled(config.use_smtp, config.smtp.as_ref()))
        {
            info!("Initializing SMTP notification service...");
            match SmtpNotificationService::new(smtp) {
                Ok(service) => {
                    factory.notification_service = Some(Arc::new(BoxedService::new(service)));
                    info!("SMTP notification service initialized for {}", smtp.host);
                }
                Err(e) => error!("Failed to initialize SMTP service: {}", e),
            }
        }

        #[cfg(feature = "sheets")]
        if let Some(sheets) = config
            .sheets
            .as_ref()
            .filter(|_| is_feature_enabled(config.use_sheets, config.sheets.as_ref()))
        {
            info!("Initializing Google Sheets availability store...");
            match SheetsAvailabilityStore::new(sheets.clone()) {
                Ok(store) => {
                    factory.availability_store = Some(Arc::new(BoxedService::new(store)));
                }
                Err(e) => error!("Failed to initialize Sheets store: {}", e),
            }
        }

        #[cfg(feature = "sheets")]
        if let Some(intake) = config
            .intake
            .as_ref()
            .filter(|_| is_feature_enabled(config.use_intake, config.intake.as_ref()))
        {
            info!("Initializing sign-up sheet...");
            let key_path = intake
                .key_path
                .as_deref()
                .or_else(|| config.gcal.as_ref().and_then(|g| g.key_path.as_deref()));
            match key_path {
                Some(key_path) => match ServiceAccountTokens::from_key_file(key_path).await {
                    Ok(tokens) => match SheetsSignupSheet::new(intake, tokens) {
                        Ok(sheet) => {
                            factory.signup_sheet = Some(Arc::new(BoxedService::new(sheet)));
                            info!("Sign-up sheet initialized for {}", intake.sheet_name);
                        }
                        Err(e) => error!("Failed to initialize sign-up sheet: {}", e),
                    },
                    Err(e) => error!("Failed to load sign-up sheet credentials: {}", e),
                },
                None => error!("Sign-up intake needs intake.key_path or gcal.key_path"),
            }
        }

        if factory.availability_store.is_none() && !config.booking.availability.is_empty() {
            info!("Using availability from configuration");
            let store = StaticAvailabilityStore::new(&config.booking.availability);
            factory.availability_store = Some(Arc::new(BoxedService::new(store)));
        }

        if factory.calendar_service.is_none() {
            warn!("No calendar service available; bookings will be rejected");
        }

        factory
    }
}

impl ServiceFactory for SlotbookServiceFactory {
    fn calendar_service(&self) -> Option<DynCalendarService> {
        self.calendar_service.clone()
    }

    fn notification_service(&self) -> Option<DynNotificationService> {
        self.notification_service.clone()
    }

    fn availability_store(&self) -> Option<DynAvailabilityStore> {
        self.availability_store.clone()
    }

    fn signup_sheet(&self) -> Option<DynSignupSheet> {
        self.signup_sheet.clone()
    }
}
