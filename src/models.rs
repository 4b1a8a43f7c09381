use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Raw contact fields as typed into a form, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub q: String,
}

impl ContactForm {
    pub fn input(&self) -> ContactInput {
        ContactInput {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success { username: String },
    Failure,
    InvalidInput,
    DatabaseError,
}

impl LoginOutcome {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Failure => "failure",
            Self::InvalidInput => "invalid_input",
            Self::DatabaseError => "database_error",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Success { .. } => "Login Successful",
            Self::Failure => "Login Failed",
            Self::InvalidInput => "Input Error",
            Self::DatabaseError => "Database Error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Success { username } => format!("Welcome, {username}!"),
            Self::Failure => "Invalid username or password".to_string(),
            Self::InvalidInput => "Please enter username and password".to_string(),
            Self::DatabaseError => {
                "An error occurred while connecting to the database".to_string()
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub outcome: String,
    pub title: String,
    pub message: String,
}

impl From<&LoginOutcome> for LoginResponse {
    fn from(outcome: &LoginOutcome) -> Self {
        Self {
            outcome: outcome.code().to_string(),
            title: outcome.title().to_string(),
            message: outcome.message(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteDecision {
    #[serde(alias = "true")]
    Yes,
    #[serde(alias = "false")]
    No,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub confirm: DeleteDecision,
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    pub confirm: DeleteDecision,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Query string of the contact page; `edit`/`delete` open the matching modal.
#[derive(Debug, Default, Deserialize)]
pub struct ContactsPageQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub edit: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub delete: Option<i64>,
}

/// `?edit=` with no value means no modal rather than a bad request.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReturnForm {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}
