use crate::errors::ContactError;
use crate::models::{Contact, ContactInput, DeleteDecision};
use crate::storage::Database;
use tracing::info;

/// Trims the name and rejects it when nothing is left. Phone and email pass
/// through untouched.
pub fn validate(input: &ContactInput) -> Result<ContactInput, ContactError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ContactError::EmptyName);
    }
    Ok(ContactInput {
        name: name.to_string(),
        phone: input.phone.clone(),
        email: input.email.clone(),
    })
}

pub async fn list(db: &Database, query: &str) -> Result<Vec<Contact>, ContactError> {
    Ok(db.list_contacts(query).await?)
}

pub async fn get(db: &Database, id: i64) -> Result<Contact, ContactError> {
    db.get_contact(id).await?.ok_or(ContactError::NotFound(id))
}

pub async fn add(db: &Database, input: &ContactInput) -> Result<Contact, ContactError> {
    let input = validate(input)?;
    let contact = db.insert_contact(&input).await?;
    info!(id = contact.id, "contact added");
    Ok(contact)
}

pub async fn edit(db: &Database, id: i64, input: &ContactInput) -> Result<Contact, ContactError> {
    let input = validate(input)?;
    let contact = db
        .update_contact(id, &input)
        .await?
        .ok_or(ContactError::NotFound(id))?;
    info!(id, "contact updated");
    Ok(contact)
}

/// Removes the contact only on an explicit yes. Returns whether a row went away.
pub async fn delete(db: &Database, id: i64, decision: DeleteDecision) -> Result<bool, ContactError> {
    match decision {
        DeleteDecision::Yes => {
            let removed = db.delete_contact(id).await?;
            info!(id, removed, "contact deleted");
            Ok(removed)
        }
        DeleteDecision::No => Ok(false),
    }
}
