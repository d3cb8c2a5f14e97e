// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User accounts and credential verification.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rusqlite::params;
use tilldesk_core::TilldeskError;

use crate::database::{map_tr_err, Database};
use crate::models::User;

/// Hash a password with Argon2id and default parameters.
pub fn hash_password(password: &str) -> Result<String, TilldeskError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TilldeskError::Internal(format!("password hashing failed: {e}")))
}

/// Create a user account and return its id.
pub async fn create_user(
    db: &Database,
    username: &str,
    password: &str,
    email: Option<&str>,
    role: &str,
    sub_role: Option<&str>,
) -> Result<i64, TilldeskError> {
    let username = username.to_string();
    let password_hash = hash_password(password)?;
    let email = email.map(|s| s.to_string());
    let role = role.to_string();
    let sub_role = sub_role.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO users (username, password_hash, email, role, sub_role)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![username, password_hash, email, role, sub_role],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Find a user by username within one portal role.
pub async fn find_user(
    db: &Database,
    username: &str,
    role: &str,
) -> Result<Option<User>, TilldeskError> {
    let username = username.to_string();
    let role = role.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, password_hash, email, role, sub_role, created_at
                 FROM users WHERE username = ?1 AND role = ?2",
            )?;
            let result = stmt.query_row(params![username, role], |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                    email: row.get(3)?,
                    role: row.get(4)?,
                    sub_role: row.get(5)?,
                    created_at: row.get(6)?,
                })
            });
            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Verify a login attempt. Returns the user when the account exists for the
/// role and the password matches its Argon2 hash; `None` for both unknown
/// accounts and wrong passwords, so callers cannot distinguish the two.
pub async fn verify_credentials(
    db: &Database,
    username: &str,
    role: &str,
    password: &str,
) -> Result<Option<User>, TilldeskError> {
    let Some(user) = find_user(db, username, role).await? else {
        return Ok(None);
    };
    let parsed = PasswordHash::new(&user.password_hash)
        .map_err(|e| TilldeskError::Internal(format!("stored hash unreadable: {e}")))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
    {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}
