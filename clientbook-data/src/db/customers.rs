use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::{DataError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: String,
}

/// A customer draft that has passed validation but has no identifier yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Insert a new customer and return the stored record with its assigned id.
pub fn create(conn: &Connection, customer: &NewCustomer) -> Result<Customer> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO customers (name, email, phone, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![customer.name, customer.email, customer.phone, now],
    )
    .map_err(map_constraint)?;
    get(conn, conn.last_insert_rowid())
}

/// Fetch a customer by id.
pub fn get(conn: &Connection, id: i64) -> Result<Customer> {
    conn.query_row(
        "SELECT id, name, email, phone, created_at FROM customers WHERE id = ?1",
        params![id],
        row_to_customer,
    )
    .optional()?
    .ok_or_else(|| DataError::not_found("customer", id))
}

/// Overwrite the fields of an existing customer. The id never changes.
pub fn update(conn: &Connection, id: i64, customer: &NewCustomer) -> Result<Customer> {
    let changed = conn
        .execute(
            "UPDATE customers SET name = ?1, email = ?2, phone = ?3 WHERE id = ?4",
            params![customer.name, customer.email, customer.phone, id],
        )
        .map_err(map_constraint)?;
    if changed == 0 {
        return Err(DataError::not_found("customer", id));
    }
    get(conn, id)
}

/// Remove a customer. The store is unchanged when the id is absent.
pub fn delete(conn: &Connection, id: i64) -> Result<()> {
    let changed = conn.execute("DELETE FROM customers WHERE id = ?1", params![id])?;
    if changed == 0 {
        return Err(DataError::not_found("customer", id));
    }
    Ok(())
}

/// List all customers, oldest first.
pub fn list(conn: &Connection) -> Result<Vec<Customer>> {
    let mut stmt =
        conn.prepare("SELECT id, name, email, phone, created_at FROM customers ORDER BY id")?;
    let rows = stmt.query_map([], row_to_customer)?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(DataError::from)
}

fn row_to_customer(row: &rusqlite::Row) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Map a UNIQUE violation on the email column to a duplicate error.
fn map_constraint(e: rusqlite::Error) -> DataError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DataError::Duplicate("email")
        }
        _ => DataError::Storage(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;

    fn draft(name: &str, email: &str) -> NewCustomer {
        NewCustomer {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_create_assigns_first_id() {
        let conn = test_db();

        let created = create(&conn, &draft("Ana Silva", "ana@example.com")).unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Ana Silva");
        assert_eq!(created.email, "ana@example.com");
        assert!(created.phone.is_none());

        let all = list(&conn).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn test_create_then_list_round_trip() {
        let conn = test_db();
        let new = NewCustomer {
            name: "Ana Silva".to_string(),
            email: "ana@example.com".to_string(),
            phone: Some("555-0100".to_string()),
        };

        let created = create(&conn, &new).unwrap();
        let all = list(&conn).unwrap();

        // Equal to the draft except for the assigned id
        assert_eq!(all, vec![created.clone()]);
        assert_eq!(created.name, new.name);
        assert_eq!(created.email, new.email);
        assert_eq!(created.phone, new.phone);
    }

    #[test]
    fn test_created_customer_listed_exactly_once() {
        let conn = test_db();
        create(&conn, &draft("Ana Silva", "ana@example.com")).unwrap();
        create(&conn, &draft("Bruno Costa", "bruno@example.com")).unwrap();

        let all = list(&conn).unwrap();
        let anas: Vec<_> = all.iter().filter(|c| c.email == "ana@example.com").collect();
        assert_eq!(anas.len(), 1);
    }

    #[test]
    fn test_create_duplicate_email_fails() {
        let conn = test_db();
        create(&conn, &draft("Ana Silva", "ana@example.com")).unwrap();

        let err = create(&conn, &draft("Other Ana", "ana@example.com")).unwrap_err();
        assert!(err.is_duplicate());

        // Only the first record survives
        assert_eq!(list(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_get_missing_customer() {
        let conn = test_db();
        let err = get(&conn, 42).unwrap_err();
        assert!(matches!(err, DataError::NotFound { .. }));
    }

    #[test]
    fn test_update_keeps_id_and_replaces_fields() {
        let conn = test_db();
        let created = create(&conn, &draft("Ana Silva", "ana@example.com")).unwrap();

        let updated = update(
            &conn,
            created.id,
            &NewCustomer {
                name: "Ana S. Pereira".to_string(),
                email: "ana.pereira@example.com".to_string(),
                phone: Some("555-0199".to_string()),
            },
        )
        .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Ana S. Pereira");
        assert_eq!(updated.email, "ana.pereira@example.com");
        assert_eq!(updated.phone.as_deref(), Some("555-0199"));

        let stored = get(&conn, created.id).unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn test_update_missing_customer() {
        let conn = test_db();
        let err = update(&conn, 7, &draft("Nobody", "nobody@example.com")).unwrap_err();
        assert!(matches!(err, DataError::NotFound { .. }));
    }

    #[test]
    fn test_update_to_duplicate_email_fails() {
        let conn = test_db();
        create(&conn, &draft("Ana Silva", "ana@example.com")).unwrap();
        let second = create(&conn, &draft("Bruno Costa", "bruno@example.com")).unwrap();

        let err = update(&conn, second.id, &draft("Bruno Costa", "ana@example.com")).unwrap_err();
        assert!(err.is_duplicate());

        // Record untouched
        let stored = get(&conn, second.id).unwrap();
        assert_eq!(stored.email, "bruno@example.com");
    }

    #[test]
    fn test_delete_removes_record() {
        let conn = test_db();
        let created = create(&conn, &draft("Ana Silva", "ana@example.com")).unwrap();

        delete(&conn, created.id).unwrap();

        assert!(list(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_leaves_store_unchanged() {
        let conn = test_db();
        create(&conn, &draft("Ana Silva", "ana@example.com")).unwrap();

        let err = delete(&conn, 999).unwrap_err();
        assert!(matches!(err, DataError::NotFound { .. }));

        assert_eq!(list(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_list_ordered_by_id() {
        let conn = test_db();
        create(&conn, &draft("Ana", "ana@example.com")).unwrap();
        create(&conn, &draft("Bruno", "bruno@example.com")).unwrap();
        create(&conn, &draft("Clara", "clara@example.com")).unwrap();

        let all = list(&conn).unwrap();
        let ids: Vec<i64> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
