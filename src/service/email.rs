use crate::config::EmailConfig;
use crate::error::app_error::AppError;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the one-time login code. The code lives only in this message and
    /// as a digest in the database.
    pub async fn send_two_factor_code_email(&self, to_email: &str, to_name: &str, code: &str, ttl_minutes: i64) -> Result<(), AppError> {
        if !self.config.enabled {
            tracing::warn!("Email service is disabled, skipping verification code email to {}", to_email);
            return Ok(());
        }

        let subject = "Your Toolshelf verification code";
        let html_body = self.generate_code_email_html(to_name, code, ttl_minutes);
        let text_body = self.generate_code_email_text(to_name, code, ttl_minutes);

        self.send_email(to_email, subject, &html_body, &text_body).await
    }

    fn generate_code_email_html(&self, to_name: &str, code: &str, ttl_minutes: i64) -> String {
        format!(
            r##"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Your Toolshelf verification code</title>
    <style>
        body {{
            margin: 0;
            padding: 0;
            background-color: #F6F8FA;
            color: #1B1F24;
            font-family: Inter, -apple-system, 'Segoe UI', Roboto, Arial, sans-serif;
            line-height: 1.6;
        }}

        .wrapper {{
            width: 100%;
            padding: 28px 12px;
        }}

        .card {{
            max-width: 560px;
            margin: 0 auto;
            background-color: #FFFFFF;
            border: 1px solid rgba(0, 0, 0, 0.08);
            border-radius: 12px;
            padding: 28px 24px;
        }}

        .title {{
            margin: 0 0 14px;
            font-size: 24px;
            font-weight: 700;
        }}

        .body-text {{
            margin: 0 0 14px;
            color: #32383F;
            font-size: 15px;
        }}

        .code {{
            margin: 22px 0;
            padding: 16px 0;
            background-color: #F1F3F5;
            border-radius: 10px;
            text-align: center;
            font-size: 34px;
            font-weight: 700;
            letter-spacing: 0.35em;
            text-indent: 0.35em;
        }}

        .meta {{
            margin: 0 0 18px;
            color: #59636E;
            font-size: 13px;
            font-weight: 600;
        }}

        .footer {{
            margin: 18px 0 0;
            color: #59636E;
            font-size: 12px;
        }}
    </style>
</head>
<body>
    <div class="wrapper">
      <div class="card">
        <h1 class="title">Finish signing in</h1>
        <p class="body-text">Hi {},</p>
        <p class="body-text">Enter this code to complete your Toolshelf sign-in:</p>
        <div class="code">{}</div>
        <p class="meta">This code expires in {} minutes.</p>
        <p class="body-text">Toolshelf will never ask for this code outside the sign-in screen. If you did not try to sign in, you can safely ignore this message &mdash; without the code, your password alone is not enough.</p>
        <p class="footer">Toolshelf Security</p>
      </div>
    </div>
</body>
</html>
"##,
            to_name, code, ttl_minutes
        )
    }

    fn generate_code_email_text(&self, to_name: &str, code: &str, ttl_minutes: i64) -> String {
        format!(
            r#"Toolshelf | Sign-in verification

Hi {},

Enter this code to complete your Toolshelf sign-in:

    {}

This code expires in {} minutes.

Toolshelf will never ask for this code outside the sign-in screen. If you
did not try to sign in, you can safely ignore this message.

Toolshelf Security
"#,
            to_name, code, ttl_minutes
        )
    }

    /// Send an email using SMTP
    async fn send_email(&self, to_email: &str, subject: &str, html_body: &str, text_body: &str) -> Result<(), AppError> {
        let email = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_address)
                    .parse()
                    .map_err(|e| AppError::email(format!("Invalid from address: {}", e)))?,
            )
            .to(to_email.parse().map_err(|e| AppError::email(format!("Invalid to address: {}", e)))?)
            .subject(subject)
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::email(format!("Failed to build email: {}", e)))?;

        let creds = Credentials::new(self.config.smtp_username.clone(), self.config.smtp_password.clone());

        let mailer = SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::email(format!("Failed to create SMTP transport: {}", e)))?
            .credentials(creds)
            .port(self.config.smtp_port)
            .build();

        // Send the email (blocking operation, should be run in a separate thread)
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::email(format!("Failed to spawn email sending task: {}", e)))?;

        result.map_err(|e| AppError::email(format!("Failed to send email: {}", e)))?;

        tracing::info!("Verification code email sent successfully to {}", to_email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: "test".to_string(),
            smtp_password: "test".to_string(),
            from_address: "noreply@toolshelf.local".to_string(),
            from_name: "Toolshelf".to_string(),
            enabled: false,
        }
    }

    #[test]
    fn html_email_contains_code_and_expiry() {
        let service = EmailService::new(test_config());
        let html = service.generate_code_email_html("Ada Lovelace", "123456", 10);

        assert!(html.contains("Ada Lovelace"));
        assert!(html.contains("123456"));
        assert!(html.contains("10 minutes"));
    }

    #[test]
    fn text_email_contains_code_and_expiry() {
        let service = EmailService::new(test_config());
        let text = service.generate_code_email_text("Grace Hopper", "654321", 10);

        assert!(text.contains("Grace Hopper"));
        assert!(text.contains("654321"));
        assert!(text.contains("10 minutes"));
    }

    #[tokio::test]
    async fn disabled_service_skips_sending() {
        let service = EmailService::new(test_config());
        let result = service.send_two_factor_code_email("nobody@example.com", "Nobody", "123456", 10).await;
        assert!(result.is_ok());
    }
}
