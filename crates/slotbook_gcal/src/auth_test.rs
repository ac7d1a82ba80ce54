#[cfg(test)]
mod tests {
    use crate::auth::create_calendar_hub;
    use slotbook_config::GcalConfig;

    #[tokio::test]
    async fn test_create_calendar_hub_missing_key_path() {
        let config = GcalConfig {
            key_path: None,
        };

        match create_calendar_hub(&config).await {
            Ok(_) => panic!("Expected an error but got Ok"),
            Err(err) => assert!(
                err.to_string().contains("Missing key_path"),
                "unexpected error: {}",
                err
            ),
        }
    }

    #[tokio::test]
    async fn test_create_calendar_hub_unreadable_key_file() {
        let config = GcalConfig {
            key_path: Some("./does-not-exist/service_account_key.json".to_string()),
        };

        let result = create_calendar_hub(&config).await;
        assert!(result.is_err(), "Should fail when the key file is missing");
    }
}
