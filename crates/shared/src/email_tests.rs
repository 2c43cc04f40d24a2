use super::*;

fn disabled_service() -> EmailService {
    EmailService::new(EmailConfig::default())
}

#[test]
fn test_email_config_default() {
    let config = EmailConfig::default();
    assert!(!config.enabled);
    assert_eq!(config.smtp_host, "localhost");
    assert_eq!(config.smtp_port, 1025);
}

#[test]
fn test_password_reset_url() {
    let service = EmailService::new(EmailConfig {
        frontend_url: "https://app.example.com/".to_string(),
        ..EmailConfig::default()
    });
    assert_eq!(
        service.password_reset_url("abc"),
        "https://app.example.com/reset-password?token=abc"
    );
}

#[tokio::test]
async fn test_disabled_service_logs_instead_of_sending() {
    let service = disabled_service();
    assert!(!service.is_enabled());

    let result = service
        .send_password_reset_email("user@example.com", "User", "token")
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_invalid_recipient_is_rejected_even_when_disabled() {
    let service = disabled_service();
    let result = service.send_email("not-an-address", "Subject", "Body").await;
    assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
}

#[tokio::test]
async fn test_create_transport() {
    let service = EmailService::new(EmailConfig {
        enabled: true,
        smtp_username: "user".to_string(),
        smtp_password: "password".to_string(),
        ..EmailConfig::default()
    });
    assert!(service.create_transport().is_ok());
}

#[test]
fn test_email_error_display() {
    assert_eq!(
        format!("{}", EmailError::BuildError("msg".into())),
        "Failed to build email: msg"
    );
    assert_eq!(
        format!("{}", EmailError::SendError("msg".into())),
        "Failed to send email: msg"
    );
    assert_eq!(
        format!("{}", EmailError::InvalidAddress("msg".into())),
        "Invalid email address: msg"
    );
}
