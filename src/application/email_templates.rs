use url::Url;

const BRAND_NAME: &str = "Wellness";

fn origin_label(app_origin: &str) -> String {
    Url::parse(app_origin)
        .ok()
        .and_then(|url| url.host_str().map(|host| host.to_string()))
        .unwrap_or_else(|| app_origin.to_string())
}

fn code_block(code: &str) -> String {
    format!(
        r#"<p style="margin:16px 0;font-size:28px;letter-spacing:0.3em;font-weight:700;font-family:monospace;color:#111827;">{code}</p>"#
    )
}

fn expiry_note(ttl_minutes: Option<i64>) -> Option<String> {
    ttl_minutes.map(|minutes| format!("This code expires in {minutes} minutes."))
}

pub fn verification_code_email(
    app_origin: &str,
    code: &str,
    ttl_minutes: Option<i64>,
) -> (String, String) {
    let subject = "Email Verification".to_string();
    let headline = "Verify your email";
    let lead = "Enter this code on the verification page to activate your account.";
    let body = code_block(code);
    let reason = "you created an account with this email address";
    let note = expiry_note(ttl_minutes);

    let html = wrap_email(app_origin, headline, lead, &body, reason, note.as_deref());
    (subject, html)
}

pub fn reset_code_email(
    app_origin: &str,
    code: &str,
    ttl_minutes: Option<i64>,
) -> (String, String) {
    let subject = "Password Reset".to_string();
    let headline = "Reset your password";
    let lead = "Enter this code together with your new password to finish the reset.";
    let body = code_block(code);
    let reason = "someone asked to reset the password for this email address";
    let note = expiry_note(ttl_minutes);

    let html = wrap_email(app_origin, headline, lead, &body, reason, note.as_deref());
    (subject, html)
}

pub fn wrap_email(
    app_origin: &str,
    headline: &str,
    lead: &str,
    body_html: &str,
    reason: &str,
    footer_note: Option<&str>,
) -> String {
    let origin = origin_label(app_origin);

    let footer_note = footer_note
        .map(|note| {
            format!(
                r#"<p style="margin:8px 0 0;color:#4b5563;font-size:13px;">{}</p>"#,
                note
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <body style="background:#f8fafc;margin:0;padding:24px;font-family:Arial,Helvetica,sans-serif;">
    <div style="max-width:560px;margin:0 auto;background:#ffffff;border:1px solid #e5e7eb;border-radius:12px;padding:24px;">
      <div style="font-size:12px;letter-spacing:0.08em;text-transform:uppercase;color:#6b7280;">{brand} - {origin}</div>
      <h1 style="margin:12px 0 8px;font-size:22px;color:#111827;">{headline}</h1>
      <p style="margin:0 0 12px;font-size:15px;color:#111827;line-height:1.6;">{lead}</p>
      {body_html}
      <div style="margin-top:20px;padding-top:16px;border-top:1px solid #e5e7eb;">
        <p style="margin:0 0 6px;font-size:13px;color:#4b5563;">Why you got this email: {reason}.</p>
        <p style="margin:0;font-size:13px;color:#4b5563;">If you didn't request this, you can safely ignore it.</p>
        {footer_note}
      </div>
    </div>
  </body>
</html>
"#,
        brand = BRAND_NAME,
    )
}
