//! SQLite-backed payment store implementation.

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::db::Db;
use crate::ticket::TicketStatus;

use super::{CreatePaymentRequest, Payment, PaymentError, PaymentStatus, PaymentStore};

const PAYMENT_COLUMNS: &str =
    "id, user_id, ticket_id, amount, status, method, transaction_id, created_at";

/// SQLite-backed payment store.
pub struct SqlitePaymentStore {
    db: Db,
}

impl SqlitePaymentStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    fn row_to_payment(row: &rusqlite::Row) -> rusqlite::Result<Payment> {
        let id: String = row.get(0)?;
        let user_id: String = row.get(1)?;
        let ticket_id: String = row.get(2)?;
        let amount: i64 = row.get(3)?;
        let status_str: String = row.get(4)?;
        let method: String = row.get(5)?;
        let transaction_id: String = row.get(6)?;
        let created_at_str: String = row.get(7)?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let status = PaymentStatus::parse(&status_str).unwrap_or(PaymentStatus::Pending);

        Ok(Payment {
            id,
            user_id,
            ticket_id,
            amount,
            status,
            method,
            transaction_id,
            created_at,
        })
    }

    /// Apply a settlement outcome to the payment and its ticket in one
    /// transaction.
    fn apply_outcome(
        &self,
        payment_id: &str,
        payment_status: PaymentStatus,
        ticket_id: &str,
        ticket_status: TicketStatus,
        qr_code: Option<&str>,
    ) -> Result<Payment, PaymentError> {
        let mut conn = self.db.lock();
        let tx = conn
            .transaction()
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        let mut payment = match tx.query_row(
            &format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?"),
            params![payment_id],
            Self::row_to_payment,
        ) {
            Ok(p) => p,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(PaymentError::NotFound(payment_id.to_string()));
            }
            Err(e) => return Err(PaymentError::Database(e.to_string())),
        };

        tx.execute(
            "UPDATE payments SET status = ? WHERE id = ?",
            params![payment_status.as_str(), payment_id],
        )
        .map_err(|e| PaymentError::Database(e.to_string()))?;

        match qr_code {
            Some(qr) => tx.execute(
                "UPDATE tickets SET status = ?, qr_code = ? WHERE id = ?",
                params![ticket_status.as_str(), qr, ticket_id],
            ),
            None => tx.execute(
                "UPDATE tickets SET status = ? WHERE id = ?",
                params![ticket_status.as_str(), ticket_id],
            ),
        }
        .map_err(|e| PaymentError::Database(e.to_string()))?;

        tx.commit()
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        payment.status = payment_status;
        Ok(payment)
    }
}

impl PaymentStore for SqlitePaymentStore {
    fn create(&self, request: CreatePaymentRequest) -> Result<Payment, PaymentError> {
        let conn = self.db.lock();

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let status = PaymentStatus::Pending;

        conn.execute(
            "INSERT INTO payments (id, user_id, ticket_id, amount, status, method, transaction_id, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                request.user_id,
                request.ticket_id,
                request.amount,
                status.as_str(),
                request.method,
                request.transaction_id,
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| PaymentError::Database(e.to_string()))?;

        Ok(Payment {
            id,
            user_id: request.user_id,
            ticket_id: request.ticket_id,
            amount: request.amount,
            status,
            method: request.method,
            transaction_id: request.transaction_id,
            created_at: now,
        })
    }

    fn get(&self, id: &str) -> Result<Option<Payment>, PaymentError> {
        let conn = self.db.lock();

        let result = conn.query_row(
            &format!("SELECT {PAYMENT_COLUMNS} FROM payments WHERE id = ?"),
            params![id],
            Self::row_to_payment,
        );

        match result {
            Ok(payment) => Ok(Some(payment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(PaymentError::Database(e.to_string())),
        }
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Payment>, PaymentError> {
        let conn = self.db.lock();

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {PAYMENT_COLUMNS} FROM payments WHERE user_id = ? ORDER BY created_at ASC"
            ))
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![user_id], Self::row_to_payment)
            .map_err(|e| PaymentError::Database(e.to_string()))?;

        let mut payments = Vec::new();
        for row_result in rows {
            let payment = row_result.map_err(|e| PaymentError::Database(e.to_string()))?;
            payments.push(payment);
        }

        Ok(payments)
    }

    fn complete(
        &self,
        payment_id: &str,
        ticket_id: &str,
        qr_code: &str,
    ) -> Result<Payment, PaymentError> {
        self.apply_outcome(
            payment_id,
            PaymentStatus::Completed,
            ticket_id,
            TicketStatus::Active,
            Some(qr_code),
        )
    }

    fn fail(&self, payment_id: &str, ticket_id: &str) -> Result<Payment, PaymentError> {
        self.apply_outcome(
            payment_id,
            PaymentStatus::Failed,
            ticket_id,
            TicketStatus::Cancelled,
            None,
        )
    }
}
