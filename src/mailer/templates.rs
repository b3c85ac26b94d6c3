//! Bodies for transactional emails.

/// How long a password reset token stays valid, as told to the recipient.
/// The issuer of the token enforces it.
pub const RESET_TOKEN_VALIDITY_MINUTES: u32 = 15;

pub const PASSWORD_RESET_SUBJECT: &str = "Reset your password";

/// `<frontend>/reset-password/<token>`, tolerating a trailing slash on the base.
pub fn reset_link(frontend_url: &str, reset_token: &str) -> String {
    format!(
        "{}/reset-password/{}",
        frontend_url.trim_end_matches('/'),
        reset_token
    )
}

pub fn password_reset_text(display_name: &str, link: &str) -> String {
    format!(
        "Hi {display_name},\n\n\
         We received a request to reset your password. Open the link below to choose a new one:\n\n\
         {link}\n\n\
         This link expires in {RESET_TOKEN_VALIDITY_MINUTES} minutes. \
         If you did not ask for a reset you can ignore this email.\n"
    )
}

pub fn password_reset_html(display_name: &str, link: &str) -> String {
    let name = escape_html(display_name);
    let href = escape_html(link);
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; color: #222;">
    <p>Hi {name},</p>
    <p>We received a request to reset your password. Click the button below to choose a new one.</p>
    <p>
      <a href="{href}" style="display: inline-block; padding: 10px 18px; background: #2563eb; color: #fff; text-decoration: none; border-radius: 4px;">Reset password</a>
    </p>
    <p>Or paste this link into your browser:<br><a href="{href}">{href}</a></p>
    <p>This link expires in {RESET_TOKEN_VALIDITY_MINUTES} minutes. If you did not ask for a reset you can ignore this email.</p>
  </body>
</html>
"#
    )
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
