use crate::models::{Contact, ContactInput, LoginOutcome, Theme};

/// Overlay shown on top of the contact page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    None,
    Edit {
        contact: Contact,
        draft: ContactInput,
        error: Option<String>,
    },
    DeleteConfirm {
        contact: Contact,
    },
}

impl Modal {
    pub fn edit(contact: Contact) -> Self {
        let draft = ContactInput {
            name: contact.name.clone(),
            phone: contact.phone.clone(),
            email: contact.email.clone(),
        };
        Self::Edit {
            contact,
            draft,
            error: None,
        }
    }
}

/// Everything the contact page shows; rebuilt on every request.
#[derive(Debug, Default)]
pub struct ContactsView {
    pub contacts: Vec<Contact>,
    pub query: String,
    pub form: ContactInput,
    pub form_error: Option<String>,
    pub modal: Modal,
    pub theme: Theme,
}

pub fn render_login(username: &str, outcome: Option<&LoginOutcome>) -> String {
    let dialog = outcome.map(render_login_dialog).unwrap_or_default();
    LOGIN_HTML
        .replace("{{STYLE}}", BASE_STYLE)
        .replace("{{USERNAME}}", &html_escape(username))
        .replace("{{DIALOG}}", &dialog)
}

fn render_login_dialog(outcome: &LoginOutcome) -> String {
    let kind = match outcome {
        LoginOutcome::Success { .. } => "ok",
        LoginOutcome::Failure | LoginOutcome::DatabaseError => "error",
        LoginOutcome::InvalidInput => "info",
    };
    format!(
        r#"<div class="overlay" role="dialog" aria-modal="true">
  <div class="dialog" data-type="{kind}" data-outcome="{code}">
    <h2>{title}</h2>
    <p>{message}</p>
    <div class="dialog-actions"><a class="btn" href="/login">OK</a></div>
  </div>
</div>"#,
        code = outcome.code(),
        title = html_escape(outcome.title()),
        message = html_escape(&outcome.message()),
    )
}

pub fn render_contacts(view: &ContactsView) -> String {
    let cards = if view.contacts.is_empty() {
        r#"<p class="hint">No contacts found.</p>"#.to_string()
    } else {
        view.contacts
            .iter()
            .map(|contact| render_card(contact, &view.query))
            .collect::<Vec<_>>()
            .join("\n")
    };

    CONTACTS_HTML
        .replace("{{STYLE}}", BASE_STYLE)
        .replace("{{THEME}}", view.theme.as_str())
        .replace("{{QUERY}}", &html_escape(&view.query))
        .replace("{{NAME}}", &html_escape(&view.form.name))
        .replace("{{PHONE}}", &html_escape(&view.form.phone))
        .replace("{{EMAIL}}", &html_escape(&view.form.email))
        .replace("{{NAME_ERROR}}", &render_field_error(view.form_error.as_deref()))
        .replace("{{CONTACTS}}", &cards)
        .replace("{{MODAL}}", &render_modal(&view.modal, &view.query))
}

fn render_card(contact: &Contact, query: &str) -> String {
    let q = urlencoding::encode(query);
    format!(
        r#"<article class="card" data-id="{id}">
  <header><span class="name">{name}</span>
    <nav><a href="/contacts?q={q}&amp;edit={id}">Edit</a> <a href="/contacts?q={q}&amp;delete={id}">Delete</a></nav>
  </header>
  <div class="detail phone">{phone}</div>
  <div class="detail email">{email}</div>
</article>"#,
        id = contact.id,
        name = html_escape(&contact.name),
        phone = html_escape(or_placeholder(&contact.phone, "No phone")),
        email = html_escape(or_placeholder(&contact.email, "No email")),
    )
}

fn render_modal(modal: &Modal, query: &str) -> String {
    let q = urlencoding::encode(query);
    match modal {
        Modal::None => String::new(),
        Modal::Edit {
            contact,
            draft,
            error,
        } => format!(
            r#"<div class="overlay" role="dialog" aria-modal="true">
  <form class="dialog" method="post" action="/contacts/{id}/edit">
    <h2>Edit Contact</h2>
    <input type="hidden" name="q" value="{query}" />
    <label>Name <input name="name" value="{name}" /></label>
    {error}
    <label>Phone <input name="phone" value="{phone}" /></label>
    <label>Email <input name="email" value="{email}" /></label>
    <div class="dialog-actions">
      <a class="btn" href="/contacts?q={q}">Cancel</a>
      <button type="submit">Save</button>
    </div>
  </form>
</div>"#,
            id = contact.id,
            query = html_escape(query),
            name = html_escape(&draft.name),
            error = render_field_error(error.as_deref()),
            phone = html_escape(&draft.phone),
            email = html_escape(&draft.email),
        ),
        Modal::DeleteConfirm { contact } => format!(
            r#"<div class="overlay" role="dialog" aria-modal="true">
  <form class="dialog" method="post" action="/contacts/{id}/delete">
    <h2>Confirm Delete</h2>
    <p>Are you sure you want to delete this contact?</p>
    <p class="hint">{name}</p>
    <input type="hidden" name="q" value="{query}" />
    <div class="dialog-actions">
      <button type="submit" name="confirm" value="no">No</button>
      <button type="submit" name="confirm" value="yes">Yes</button>
    </div>
  </form>
</div>"#,
            id = contact.id,
            name = html_escape(&contact.name),
            query = html_escape(query),
        ),
    }
}

fn render_field_error(error: Option<&str>) -> String {
    error
        .map(|message| format!(r#"<span class="field-error">{}</span>"#, html_escape(message)))
        .unwrap_or_default()
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
        // keeps user text from forming template placeholders
        .replace('{', "&#123;")
}

const BASE_STYLE: &str = r#"
    :root {
      --bg: #ffd54f;
      --ink: #1f1f1f;
      --card: #ffffff;
      --field: #4fc3f7;
      --accent: #1976d2;
      --error: #c63b2b;
    }

    body[data-theme="dark"] {
      --bg: #1e1f22;
      --ink: #ececec;
      --card: #2b2d31;
      --field: #35556b;
      --accent: #8ab4f8;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: Arial, sans-serif;
      display: grid;
      justify-items: center;
      padding: 32px 16px;
    }

    main {
      width: min(420px, 100%);
      display: grid;
      gap: 16px;
    }

    input {
      width: 100%;
      padding: 10px 12px;
      border-radius: 6px;
      border: 1px solid var(--field);
      background: var(--card);
      color: var(--ink);
    }

    button, .btn {
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-weight: 600;
      cursor: pointer;
      background: var(--card);
      color: var(--accent);
      text-decoration: none;
    }

    .card {
      background: var(--card);
      border-radius: 12px;
      padding: 12px 16px;
      display: grid;
      gap: 4px;
    }

    .card header {
      display: flex;
      justify-content: space-between;
    }

    .name {
      font-weight: 700;
    }

    .field-error {
      color: var(--error);
      font-size: 0.85rem;
    }

    .hint {
      color: #6f6a65;
      font-size: 0.9rem;
    }

    .overlay {
      position: fixed;
      inset: 0;
      background: rgba(0, 0, 0, 0.45);
      display: grid;
      place-items: center;
    }

    .dialog {
      background: var(--card);
      border-radius: 16px;
      padding: 24px;
      width: min(360px, 90vw);
      display: grid;
      gap: 12px;
    }

    .dialog[data-type="ok"] h2 {
      color: #2d7a4b;
    }

    .dialog[data-type="error"] h2 {
      color: var(--error);
    }

    .dialog-actions {
      display: flex;
      justify-content: flex-end;
      gap: 8px;
    }
"#;

const LOGIN_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>User Login</title>
  <style>{{STYLE}}</style>
</head>
<body data-theme="light">
  <main>
    <h1>User Login</h1>
    <form method="post" action="/login">
      <label>User name
        <input name="username" value="{{USERNAME}}" placeholder="Enter your user name" autofocus />
      </label>
      <p class="hint">This is your unique identifier</p>
      <label>Password
        <input name="password" type="password" placeholder="Enter your password" />
      </label>
      <p class="hint">This is your secret key</p>
      <button type="submit">Login</button>
    </form>
  </main>
  {{DIALOG}}
</body>
</html>
"#;

const CONTACTS_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Contact Book</title>
  <style>{{STYLE}}</style>
</head>
<body data-theme="{{THEME}}">
  <main>
    <header class="card">
      <h1>Contact Book</h1>
      <form method="post" action="/theme">
        <input type="hidden" name="q" value="{{QUERY}}" />
        <button type="submit" title="Toggle Dark/Light Mode">Toggle theme</button>
      </form>
    </header>

    <section>
      <h2>Enter Contact Details:</h2>
      <form method="post" action="/contacts">
        <input type="hidden" name="q" value="{{QUERY}}" />
        <label>Name <input name="name" value="{{NAME}}" /></label>
        {{NAME_ERROR}}
        <label>Phone <input name="phone" value="{{PHONE}}" /></label>
        <label>Email <input name="email" value="{{EMAIL}}" /></label>
        <button type="submit">Add Contact</button>
      </form>
    </section>

    <section>
      <h2>Contacts:</h2>
      <form method="get" action="/contacts">
        <input name="q" value="{{QUERY}}" placeholder="Search contacts by name" />
      </form>
      <div id="contacts">
{{CONTACTS}}
      </div>
    </section>
  </main>
  {{MODAL}}
</body>
</html>
"#;
