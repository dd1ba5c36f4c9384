//! Minimal HTML page rendering

use axum::response::Html;

use crate::store::User;

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, flash: Option<&str>, body: &str) -> Html<String> {
    let notice = match flash {
        Some(message) => format!("<p class=\"flash\">{}</p>", escape(message)),
        None => String::new(),
    };
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
<h1>{title}</h1>
{notice}
{body}
</body>
</html>"#
    ))
}

pub fn login_page(flash: Option<&str>) -> Html<String> {
    layout(
        "Log in",
        flash,
        r#"<form method="post" action="/login">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<button type="submit">Log in</button>
</form>
<p><a href="/register">Create an account</a></p>"#,
    )
}

pub fn register_page(flash: Option<&str>) -> Html<String> {
    layout(
        "Register",
        flash,
        r#"<form method="post" action="/register">
<label>Username <input name="username" required></label>
<label>Password <input name="password" type="password" required></label>
<label>Phone <input name="phone" placeholder="+15551234567" required></label>
<button type="submit">Register</button>
</form>
<p><a href="/login">Back to login</a></p>"#,
    )
}

pub fn verify_page(flash: Option<&str>) -> Html<String> {
    layout(
        "Verify your phone",
        flash,
        r#"<form method="post" action="/verify">
<label>Code <input name="code" inputmode="numeric" autocomplete="one-time-code"></label>
<button type="submit">Verify</button>
</form>
<form method="post" action="/verify">
<input type="hidden" name="action" value="resend">
<button type="submit">Resend code</button>
</form>"#,
    )
}

pub fn dashboard_page(flash: Option<&str>, user: &User) -> Html<String> {
    let body = format!(
        r#"<p>Signed in as <strong>{username}</strong></p>
<p>Phone on file: {phone}</p>
<h2>Update profile</h2>
<form method="post" action="/dashboard">
<label>New password <input name="password" type="password"></label>
<label>New phone <input name="phone"></label>
<button type="submit">Save</button>
</form>
<p><a href="/logout">Log out</a></p>"#,
        username = escape(&user.username),
        phone = escape(&user.phone),
    );
    layout("Dashboard", flash, &body)
}
