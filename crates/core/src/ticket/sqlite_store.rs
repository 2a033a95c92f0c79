//! SQLite-backed ticket store implementation.

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::db::Db;
use crate::fares;

use super::{
    CreateTicketRequest, Ticket, TicketError, TicketFilter, TicketStatus, TicketStore, Validation,
};

const TICKET_COLUMNS: &str =
    "id, user_id, ticket_type, route, price, status, qr_code, created_at, valid_until";

/// SQLite-backed ticket store.
pub struct SqliteTicketStore {
    db: Db,
}

impl SqliteTicketStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub(crate) fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let id: String = row.get(0)?;
        let user_id: String = row.get(1)?;
        let ticket_type: String = row.get(2)?;
        let route: String = row.get(3)?;
        let price: i64 = row.get(4)?;
        let status_str: String = row.get(5)?;
        let qr_code: Option<String> = row.get(6)?;
        let created_at_str: String = row.get(7)?;
        let valid_until_str: String = row.get(8)?;

        // Parse timestamps - use current time if parsing fails (shouldn't
        // happen with valid data)
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());
        let valid_until = DateTime::parse_from_rfc3339(&valid_until_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let status = TicketStatus::parse(&status_str).unwrap_or(TicketStatus::Pending);

        Ok(Ticket {
            id,
            user_id,
            ticket_type,
            route,
            price,
            status,
            qr_code,
            created_at,
            valid_until,
        })
    }
}

impl TicketStore for SqliteTicketStore {
    fn create(
        &self,
        request: CreateTicketRequest,
        now: DateTime<Utc>,
    ) -> Result<Ticket, TicketError> {
        let conn = self.db.lock();

        let id = uuid::Uuid::new_v4().to_string();
        let fare = fares::quote(&request.ticket_type, now);
        let status = TicketStatus::Pending;

        conn.execute(
            "INSERT INTO tickets (id, user_id, ticket_type, route, price, status, qr_code, created_at, valid_until) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                request.user_id,
                request.ticket_type,
                request.route,
                fare.price,
                status.as_str(),
                Option::<String>::None,
                now.to_rfc3339(),
                fare.valid_until.to_rfc3339(),
            ],
        )
        .map_err(|e| TicketError::Database(e.to_string()))?;

        Ok(Ticket {
            id,
            user_id: request.user_id,
            ticket_type: request.ticket_type,
            route: request.route,
            price: fare.price,
            status,
            qr_code: None,
            created_at: now,
            valid_until: fare.valid_until,
        })
    }

    fn get(&self, id: &str) -> Result<Option<Ticket>, TicketError> {
        let conn = self.db.lock();

        let result = conn.query_row(
            &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?"),
            params![id],
            Self::row_to_ticket,
        );

        match result {
            Ok(ticket) => Ok(Some(ticket)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TicketError::Database(e.to_string())),
        }
    }

    fn list_for_user(
        &self,
        user_id: &str,
        filter: &TicketFilter,
    ) -> Result<Vec<Ticket>, TicketError> {
        let conn = self.db.lock();

        let mut sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE user_id = ?");
        let mut sql_params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id.to_string())];

        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            sql_params.push(Box::new(status.as_str()));
        }

        sql.push_str(" ORDER BY created_at ASC LIMIT ? OFFSET ?");
        sql_params.push(Box::new(filter.limit));
        sql_params.push(Box::new(filter.offset));

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| TicketError::Database(e.to_string()))?;

        let param_refs: Vec<&dyn rusqlite::ToSql> =
            sql_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_ticket)
            .map_err(|e| TicketError::Database(e.to_string()))?;

        let mut tickets = Vec::new();
        for row_result in rows {
            let ticket = row_result.map_err(|e| TicketError::Database(e.to_string()))?;
            tickets.push(ticket);
        }

        Ok(tickets)
    }

    fn validate(&self, id: &str, now: DateTime<Utc>) -> Result<Validation, TicketError> {
        let mut conn = self.db.lock();
        let tx = conn
            .transaction()
            .map_err(|e| TicketError::Database(e.to_string()))?;

        let ticket = match tx.query_row(
            &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?"),
            params![id],
            Self::row_to_ticket,
        ) {
            Ok(t) => t,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(TicketError::NotFound(id.to_string()));
            }
            Err(e) => return Err(TicketError::Database(e.to_string())),
        };

        // Covers used, expired, cancelled and pending tickets alike: a
        // non-active ticket is rejected without mutation.
        if ticket.status != TicketStatus::Active {
            return Ok(Validation::rejected("Ticket not active"));
        }

        if ticket.valid_until < now {
            tx.execute(
                "UPDATE tickets SET status = ? WHERE id = ?",
                params![TicketStatus::Expired.as_str(), id],
            )
            .map_err(|e| TicketError::Database(e.to_string()))?;
            tx.commit()
                .map_err(|e| TicketError::Database(e.to_string()))?;
            return Ok(Validation::rejected("Ticket expired"));
        }

        tx.execute(
            "UPDATE tickets SET status = ? WHERE id = ?",
            params![TicketStatus::Used.as_str(), id],
        )
        .map_err(|e| TicketError::Database(e.to_string()))?;
        tx.commit()
            .map_err(|e| TicketError::Database(e.to_string()))?;

        Ok(Validation::accepted())
    }
}
